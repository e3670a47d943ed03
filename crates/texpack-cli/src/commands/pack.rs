//! Pack command implementation
//!
//! Packs every material used by a selected mesh into channel-packed PNGs.

use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::time::Instant;

use anyhow::{Context, Result};
use colored::Colorize;
use texpack_backend::{
    run_batch, BatchReport, BakeKind, Collaborators, NullRenderer, PngFileWriter, Renderer,
};
use texpack_spec::{
    audit_names, BackendError, BakeResolution, InvalidName, PackConfig, SceneManifest,
};

use crate::input::{build_scene, load_manifest, manifest_dir, LoadedScene};
use crate::renderer::BakeDirRenderer;

/// Command-line values that take precedence over the config file.
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub default_resolution: Option<u32>,
    pub bake_resolution: Option<u32>,
    pub auto_bake_ao: bool,
    pub auto_bake_emission: bool,
}

/// Load the pack config (or defaults) and apply command-line overrides.
pub fn resolve_config(config_path: Option<&Path>, overrides: &ConfigOverrides) -> Result<PackConfig> {
    let mut config = match config_path {
        Some(path) => {
            let content = std::fs::read_to_string(path)
                .with_context(|| format!("failed to read config: {}", path.display()))?;
            PackConfig::from_json(&content)
                .with_context(|| format!("failed to parse config: {}", path.display()))?
        }
        None => PackConfig::default(),
    };

    if let Some(value) = overrides.default_resolution {
        config.default_resolution = value;
    }
    if let Some(value) = overrides.bake_resolution {
        config.bake_resolution = BakeResolution::try_from(value)?;
    }
    // Flags can only switch auto-bakes on.
    config.auto_bake_ao |= overrides.auto_bake_ao;
    config.auto_bake_emission |= overrides.auto_bake_emission;

    config.validate()?;
    Ok(config)
}

#[derive(Debug, Clone)]
pub struct PackArgs {
    pub scene: PathBuf,
    pub out_dir: PathBuf,
    pub config: Option<PathBuf>,
    /// Directory of pre-rendered bakes; without it every bake is unavailable.
    pub bake_dir: Option<PathBuf>,
    pub overrides: ConfigOverrides,
}

/// Load the scene, pack it and write the results to `args.out_dir`.
///
/// Materials whose images cannot be loaded are reported as failures ahead
/// of the packed ones.
pub fn execute(args: &PackArgs) -> Result<BatchReport> {
    let config = resolve_config(args.config.as_deref(), &args.overrides)?;
    let manifest = load_manifest(&args.scene)?;
    warn_invalid_names(&manifest);
    let LoadedScene {
        scene,
        failures: mut load_failures,
    } = build_scene(&manifest, manifest_dir(&args.scene));

    std::fs::create_dir_all(&args.out_dir).with_context(|| {
        format!(
            "failed to create output directory: {}",
            args.out_dir.display()
        )
    })?;

    let mut renderer: Box<dyn Renderer> = match &args.bake_dir {
        Some(dir) => Box::new(BakeDirRenderer::new(dir)),
        None => Box::new(NullRenderer),
    };
    let mut writer = PngFileWriter::default();

    log::info!(
        "packing {} with default resolution {}, bake resolution {}",
        args.scene.display(),
        config.default_resolution,
        config.bake_resolution.pixels()
    );
    let mut report = run_batch(
        &scene,
        &config,
        &args.out_dir,
        Collaborators {
            renderer: renderer.as_mut(),
            persistence: &mut writer,
            exporter: None,
        },
        None,
    );
    load_failures.append(&mut report.failures);
    report.failures = load_failures;
    Ok(report)
}

/// Log a warning per invalid material name. Packing still goes ahead.
pub fn warn_invalid_names(manifest: &SceneManifest) -> Vec<InvalidName> {
    let invalid = audit_names(manifest.materials.iter().map(|m| m.name.as_str()));
    for entry in &invalid {
        log::warn!(
            "material name '{}' is invalid [{}]: {} (run `texpack fix-names`)",
            entry.identifier,
            entry.reason.code(),
            entry.reason
        );
    }
    invalid
}

/// Run the pack command
///
/// # Returns
/// Exit code: 0 if every material packed, 1 otherwise
pub fn run(args: &PackArgs, json_output: bool) -> Result<ExitCode> {
    let start = Instant::now();

    if !json_output {
        println!("{} {}", "Packing:".cyan().bold(), args.scene.display());
        println!("{} {}", "Output dir:".cyan().bold(), args.out_dir.display());
    }

    let report = execute(args)?;

    if json_output {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_report(&report);
        let elapsed = start.elapsed().as_millis();
        if report.is_success() {
            println!(
                "\n{} Packed {} material(s) into {} file(s) in {}ms",
                "SUCCESS".green().bold(),
                report.packed.len(),
                report.file_count(),
                elapsed
            );
        } else {
            println!(
                "\n{} {} material(s) failed, {} packed",
                "FAILED".red().bold(),
                report.failures.len(),
                report.packed.len()
            );
        }
    }

    Ok(if report.is_success() {
        ExitCode::SUCCESS
    } else {
        ExitCode::from(1)
    })
}

fn print_report(report: &BatchReport) {
    for material in &report.packed {
        let size = match material.resolution {
            Some((w, h)) => format!("{}x{}", w, h),
            None => "-".to_string(),
        };
        let note = if material.fallback {
            format!(" ({} bake)", BakeKind::Combined)
        } else {
            String::new()
        };
        println!(
            "  {} {} [{}] {}{}",
            "+".green(),
            material.identifier,
            material.variant,
            size.dimmed(),
            note.dimmed()
        );
        for file in &material.files {
            let name = file
                .path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default();
            let hash = file.hash.get(..16).unwrap_or(&file.hash);
            println!("      {} {}", name, hash.dimmed());
        }
        for failure in &material.bake_failures {
            println!(
                "      {} {} {}",
                "!".yellow(),
                format!("[{}]", failure.code).dimmed(),
                failure.message
            );
        }
    }

    for failure in &report.failures {
        println!(
            "  {} {} {}: {}",
            "x".red(),
            format!("[{}]", failure.error.code).dimmed(),
            failure.identifier,
            failure.error.message
        );
    }

    if report.cancelled {
        println!("  {} batch cancelled", "!".yellow());
    }
}
