//! texpack CLI - Channel-pack PBR material textures for game engines
//!
//! This binary provides commands for auditing material names and packing
//! the textures of a scene manifest.

use clap::{Parser, Subcommand};
use colored::Colorize;
use std::path::PathBuf;
use std::process::ExitCode;

use texpack_cli::commands;
use texpack_cli::commands::pack::{ConfigOverrides, PackArgs};

/// texpack - PBR texture channel packing
#[derive(Parser)]
#[command(name = "texpack")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Log progress to stderr (RUST_LOG overrides)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Check every material name in a scene manifest
    Validate {
        /// Path to the scene manifest (JSON)
        #[arg(short, long)]
        scene: PathBuf,

        /// Output machine-readable JSON diagnostics (no colored output)
        #[arg(long)]
        json: bool,
    },

    /// Rename invalid materials to compliant names
    FixNames {
        /// Path to the scene manifest (JSON)
        #[arg(short, long)]
        scene: PathBuf,

        /// Write the fixed manifest here instead of in place
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Show the variant and planned outputs for a material name
    Classify {
        /// Material identifier, e.g. Rock_MaskedVXM
        name: String,

        /// Output machine-readable JSON (no colored output)
        #[arg(long)]
        json: bool,
    },

    /// Pack the materials of selected meshes into PNG textures
    Pack {
        /// Path to the scene manifest (JSON)
        #[arg(short, long)]
        scene: PathBuf,

        /// Output directory (created if missing)
        #[arg(short, long, default_value = ".")]
        out_dir: PathBuf,

        /// Pack config file (JSON)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Directory of pre-rendered bakes named {material}_{AO|Emission|Combined}.png
        #[arg(long)]
        bake_dir: Option<PathBuf>,

        /// Resolution used when a material has no bitmap sources (256-8192)
        #[arg(long)]
        default_resolution: Option<u32>,

        /// Auto-bake resolution (512, 1024, 2048, 4096)
        #[arg(long)]
        bake_resolution: Option<u32>,

        /// Bake ambient occlusion when a material has no AO source
        #[arg(long)]
        auto_bake_ao: bool,

        /// Bake emission when the emission socket has no bitmap source
        #[arg(long)]
        auto_bake_emission: bool,

        /// Output machine-readable JSON report (no colored output)
        #[arg(long)]
        json: bool,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let default_filter = if cli.verbose { "info" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .init();

    let result = match cli.command {
        Commands::Validate { scene, json } => commands::validate::run(&scene, json),
        Commands::FixNames { scene, output } => {
            commands::fix_names::run(&scene, output.as_deref())
        }
        Commands::Classify { name, json } => commands::classify::run(&name, json),
        Commands::Pack {
            scene,
            out_dir,
            config,
            bake_dir,
            default_resolution,
            bake_resolution,
            auto_bake_ao,
            auto_bake_emission,
            json,
        } => commands::pack::run(
            &PackArgs {
                scene,
                out_dir,
                config,
                bake_dir,
                overrides: ConfigOverrides {
                    default_resolution,
                    bake_resolution,
                    auto_bake_ao,
                    auto_bake_emission,
                },
            },
            json,
        ),
    };

    match result {
        Ok(code) => code,
        Err(e) => {
            eprintln!("{}: {:#}", "error".red(), e);
            ExitCode::from(1)
        }
    }
}
