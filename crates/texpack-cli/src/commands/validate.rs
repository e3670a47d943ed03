//! Validate command implementation
//!
//! Audits every material name in a scene manifest against the naming rules.

use std::path::Path;
use std::process::ExitCode;

use anyhow::Result;
use colored::Colorize;
use serde::Serialize;
use texpack_spec::{audit_names, BackendError, InvalidName};

use crate::input::load_manifest;

/// One invalid identifier in JSON output.
#[derive(Debug, Serialize)]
struct JsonInvalidName<'a> {
    identifier: &'a str,
    code: &'static str,
    message: String,
}

#[derive(Debug, Serialize)]
struct ValidateOutput<'a> {
    ok: bool,
    scene: &'a str,
    materials: usize,
    invalid: Vec<JsonInvalidName<'a>>,
}

/// Load a manifest and return its invalid material names, in order.
pub fn audit_manifest(scene_path: &Path) -> Result<(usize, Vec<InvalidName>)> {
    let manifest = load_manifest(scene_path)?;
    let invalid = audit_names(manifest.materials.iter().map(|m| m.name.as_str()));
    Ok((manifest.materials.len(), invalid))
}

/// Run the validate command
///
/// # Returns
/// Exit code: 0 if every name is valid, 1 otherwise
pub fn run(scene_path: &Path, json_output: bool) -> Result<ExitCode> {
    let (count, invalid) = audit_manifest(scene_path)?;
    let scene = scene_path.display().to_string();

    if json_output {
        let output = ValidateOutput {
            ok: invalid.is_empty(),
            scene: &scene,
            materials: count,
            invalid: invalid
                .iter()
                .map(|i| JsonInvalidName {
                    identifier: &i.identifier,
                    code: i.reason.code(),
                    message: i.reason.message(),
                })
                .collect(),
        };
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else {
        println!("{} {}", "Validating:".cyan().bold(), scene);
        for entry in &invalid {
            println!(
                "  {} {} {}: {}",
                "x".red(),
                format!("[{}]", entry.reason.code()).dimmed(),
                entry.identifier,
                entry.reason
            );
        }

        if invalid.is_empty() {
            println!(
                "\n{} All {} material name(s) are valid",
                "SUCCESS".green().bold(),
                count
            );
        } else {
            println!(
                "\n{} {} of {} material name(s) are invalid (run `texpack fix-names`)",
                "FAILED".red().bold(),
                invalid.len(),
                count
            );
        }
    }

    Ok(if invalid.is_empty() {
        ExitCode::SUCCESS
    } else {
        ExitCode::from(1)
    })
}
