//! Error types shared by the texpack crates.

use std::collections::BTreeSet;

use thiserror::Error;

/// Why a material identifier is not export-compliant.
///
/// Name errors are recoverable: [`crate::naming::generate_compliant_name`]
/// always produces a replacement that passes validation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NameError {
    /// Nothing is left once the recognized suffix is removed.
    #[error("material name cannot be only a suffix")]
    EmptyBase,

    /// The base name starts with a digit.
    #[error("name cannot start with a number: '{0}'")]
    LeadingDigit(char),

    /// The base name contains separators or symbols.
    #[error("name contains invalid characters: {}", format_chars(.0))]
    InvalidChars(BTreeSet<char>),
}

fn format_chars(chars: &BTreeSet<char>) -> String {
    chars
        .iter()
        .map(|c| format!("{:?}", c))
        .collect::<Vec<_>>()
        .join(", ")
}

impl BackendError for NameError {
    fn code(&self) -> &'static str {
        match self {
            NameError::EmptyBase => "NAME_001",
            NameError::LeadingDigit(_) => "NAME_002",
            NameError::InvalidChars(_) => "NAME_003",
        }
    }

    fn category(&self) -> &'static str {
        "naming"
    }
}

/// Errors from validating a [`crate::config::PackConfig`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("default_resolution must be in {min}..={max}, got {value}")]
    DefaultResolutionOutOfRange { value: u32, min: u32, max: u32 },

    #[error("bake_resolution must be one of 512, 1024, 2048, 4096, got {0}")]
    UnsupportedBakeResolution(u32),
}

impl BackendError for ConfigError {
    fn code(&self) -> &'static str {
        match self {
            ConfigError::DefaultResolutionOutOfRange { .. } => "CONFIG_001",
            ConfigError::UnsupportedBakeResolution(_) => "CONFIG_002",
        }
    }

    fn category(&self) -> &'static str {
        "config"
    }
}

/// Trait for errors reported per material by the packing engine.
///
/// Every error the engine can attribute to a single material implements
/// this so that batch reports can carry a stable code alongside the
/// message.
///
/// ```ignore
/// use texpack_spec::error::BackendError;
///
/// fn handle_error<E: BackendError>(err: E) {
///     eprintln!("[{}] {}", err.code(), err.message());
/// }
/// ```
pub trait BackendError: std::error::Error {
    /// Stable error code such as "NAME_002" or "BAKE_001".
    fn code(&self) -> &'static str;

    /// Human-readable message, by default the `Display` output.
    fn message(&self) -> String {
        self.to_string()
    }

    /// Error category used for grouping ("naming", "bake", "pack", ...).
    fn category(&self) -> &'static str;
}
