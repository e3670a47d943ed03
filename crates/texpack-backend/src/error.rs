//! Per-material packing failures.

use std::path::PathBuf;

use texpack_spec::BackendError;
use thiserror::Error;

use crate::bake::BakeError;
use crate::packing::PackingError;
use crate::png::PngError;

/// Why a material produced no report. Never aborts a batch.
#[derive(Debug, Error)]
pub enum PackError {
    /// The graph has no principal shader and the whole-material bake failed.
    #[error("no principal shader, and the fallback bake failed: {source}")]
    NoPrincipalShader {
        #[source]
        source: BakeError,
    },

    #[error("cannot write {}: {source}", .path.display())]
    UnwritableOutput {
        path: PathBuf,
        #[source]
        source: PngError,
    },

    #[error(transparent)]
    Packing(#[from] PackingError),
}

impl BackendError for PackError {
    fn code(&self) -> &'static str {
        match self {
            PackError::NoPrincipalShader { .. } => "PACK_001",
            PackError::UnwritableOutput { .. } => "PACK_002",
            PackError::Packing(PackingError::DimensionMismatch { .. }) => "PACK_003",
            PackError::Packing(PackingError::EmptyResolution { .. }) => "PACK_004",
        }
    }

    fn category(&self) -> &'static str {
        "pack"
    }
}
