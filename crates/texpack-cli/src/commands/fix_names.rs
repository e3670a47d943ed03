//! Fix-names command implementation
//!
//! Renames every non-compliant material in a scene manifest and rewrites
//! the object slots that reference it.

use std::path::Path;
use std::process::ExitCode;

use anyhow::{bail, Result};
use colored::Colorize;
use texpack_spec::{audit_names, plan_renames, Rename};

use crate::input::{load_manifest, write_manifest};

/// Apply the rename plan to a manifest and write it to `output`
/// (`scene_path` when `None`). Nothing is written when no name changes and
/// no separate output was requested.
pub fn fix_manifest(scene_path: &Path, output: Option<&Path>) -> Result<Vec<Rename>> {
    let mut manifest = load_manifest(scene_path)?;
    let renames = plan_renames(&manifest.material_names());

    for rename in &renames {
        if !manifest.rename_material(&rename.from, &rename.to) {
            bail!("material '{}' disappeared while renaming", rename.from);
        }
    }

    let remaining = audit_names(manifest.materials.iter().map(|m| m.name.as_str()));
    if let Some(first) = remaining.first() {
        bail!(
            "'{}' is still invalid after renaming: {}",
            first.identifier,
            first.reason
        );
    }

    if !renames.is_empty() || output.is_some() {
        write_manifest(&manifest, output.unwrap_or(scene_path))?;
    }
    Ok(renames)
}

/// Run the fix-names command
pub fn run(scene_path: &Path, output: Option<&Path>) -> Result<ExitCode> {
    println!("{} {}", "Fixing names:".cyan().bold(), scene_path.display());

    let renames = fix_manifest(scene_path, output)?;
    for rename in &renames {
        println!("  {} {} -> {}", "~".yellow(), rename.from, rename.to.green());
    }

    let written = output.unwrap_or(scene_path);
    if renames.is_empty() {
        println!("\n{} All material names are already valid", "SUCCESS".green().bold());
    } else {
        println!(
            "\n{} Renamed {} material(s), wrote {}",
            "SUCCESS".green().bold(),
            renames.len(),
            written.display()
        );
    }
    Ok(ExitCode::SUCCESS)
}
