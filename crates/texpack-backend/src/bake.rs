//! The renderer collaborator that materializes bitmaps from the scene.

use std::fmt;

use serde::Serialize;
use texpack_spec::{BackendError, ObjectDesc};
use thiserror::Error;

use crate::bitmap::Bitmap;

/// What to bake.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum BakeKind {
    AmbientOcclusion,
    Emission,
    /// The full shaded result, used when a material has no principal shader.
    Combined,
}

impl BakeKind {
    /// Label used in file names, e.g. `Rock_AO.png`.
    pub fn label(&self) -> &'static str {
        match self {
            BakeKind::AmbientOcclusion => "AO",
            BakeKind::Emission => "Emission",
            BakeKind::Combined => "Combined",
        }
    }
}

impl fmt::Display for BakeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A single bake request.
#[derive(Debug, Clone, Copy)]
pub struct BakeRequest<'a> {
    pub kind: BakeKind,
    /// Identifier of the material being baked.
    pub material: &'a str,
    /// Object whose surface is baked. Always carries a UV map.
    pub object: &'a ObjectDesc,
    /// Square output size in pixels.
    pub resolution: u32,
}

/// Why a bake produced no bitmap. Never fatal for a batch.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BakeError {
    #[error("no selected mesh object uses material '{material}'")]
    NoTargetObject { material: String },

    #[error("object '{object}' has no UV map")]
    MissingUvMap { object: String },

    #[error("renderer cannot bake {kind} for '{material}'")]
    Unavailable { kind: BakeKind, material: String },

    #[error("{kind} bake failed: {reason}")]
    Failed { kind: BakeKind, reason: String },
}

impl BackendError for BakeError {
    fn code(&self) -> &'static str {
        match self {
            BakeError::NoTargetObject { .. } => "BAKE_001",
            BakeError::MissingUvMap { .. } => "BAKE_002",
            BakeError::Unavailable { .. } => "BAKE_003",
            BakeError::Failed { .. } => "BAKE_004",
        }
    }

    fn category(&self) -> &'static str {
        "bake"
    }
}

/// Bakes bitmaps on request. Calls are synchronous.
pub trait Renderer {
    fn bake(&mut self, request: &BakeRequest<'_>) -> Result<Bitmap, BakeError>;
}

/// A renderer that cannot bake anything.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullRenderer;

impl Renderer for NullRenderer {
    fn bake(&mut self, request: &BakeRequest<'_>) -> Result<Bitmap, BakeError> {
        Err(BakeError::Unavailable {
            kind: request.kind,
            material: request.material.to_string(),
        })
    }
}
