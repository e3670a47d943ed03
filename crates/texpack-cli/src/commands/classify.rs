//! Classify command implementation
//!
//! Shows how a single material identifier is exported: its variant, the
//! output base file name, and the packed textures its layout can produce.

use std::process::ExitCode;

use anyhow::Result;
use colored::Colorize;
use serde::Serialize;
use texpack_backend::packing::{layouts, EmitPolicy};
use texpack_backend::{ColorSpace, ErrorReport};
use texpack_spec::{classify_variant, output_base_name, validate_name, SuffixVariant};

#[derive(Debug, Serialize, PartialEq)]
pub struct PlannedOutput {
    pub file: String,
    pub color_space: ColorSpace,
    /// Only written when one of its data channels has a source.
    pub conditional: bool,
}

#[derive(Debug, Serialize, PartialEq)]
pub struct Classification {
    pub identifier: String,
    pub variant: SuffixVariant,
    pub base_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<ErrorReport>,
    pub outputs: Vec<PlannedOutput>,
}

pub fn classify(name: &str) -> Classification {
    let variant = classify_variant(name);
    let base_name = output_base_name(name);
    let outputs = layouts(variant)
        .iter()
        .map(|layout| PlannedOutput {
            file: format!("{}{}.png", base_name, layout.suffix),
            color_space: layout.color_space,
            conditional: layout.emit != EmitPolicy::Always,
        })
        .collect();

    Classification {
        identifier: name.to_string(),
        variant,
        base_name,
        error: validate_name(name).err().map(|e| ErrorReport::new(&e)),
        outputs,
    }
}

/// Run the classify command
///
/// # Returns
/// Exit code: 0 if the name is valid, 1 otherwise
pub fn run(name: &str, json_output: bool) -> Result<ExitCode> {
    let result = classify(name);

    if json_output {
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        println!("{} {}", "Identifier:".cyan().bold(), result.identifier);
        println!("{} {}", "Variant:".dimmed(), result.variant);
        println!("{} {}", "Base name:".dimmed(), result.base_name);
        if result.outputs.is_empty() {
            println!("{} none", "Outputs:".dimmed());
        } else {
            println!("{}", "Outputs:".dimmed());
        }
        for output in &result.outputs {
            let space = match output.color_space {
                ColorSpace::Srgb => "sRGB",
                ColorSpace::NonColor => "non-color",
            };
            let note = if output.conditional {
                " (when metallic, emission or AO is present)"
            } else {
                ""
            };
            println!("  {} [{}]{}", output.file, space, note.dimmed());
        }
        if let Some(error) = &result.error {
            println!(
                "\n{} [{}] {}",
                "INVALID".red().bold(),
                error.code,
                error.message
            );
        }
    }

    Ok(if result.error.is_none() {
        ExitCode::SUCCESS
    } else {
        ExitCode::from(1)
    })
}
