//! Texpack Channel Packing Backend
//!
//! This crate turns the PBR channels of a material's shader graph into the
//! compact packed textures a game engine consumes (`_BR`, `_MEO`, `_BA`,
//! `_MESA`).
//!
//! # Pipeline
//!
//! - **Graph resolution** ([`graph`]): the nearest image feeding each
//!   principal shader socket, through any chain of utility nodes
//! - **Resampling** ([`resample`]): bilinear, border-clamped, onto the grid
//!   of the first present channel
//! - **Packing** ([`packing`]): static per-variant layouts with fixed
//!   defaults for absent channels
//! - **Orchestration** ([`orchestrator`]): auto-bakes, whole-material
//!   fallback, persistence and the batch report
//!
//! The renderer, persistence and mesh exporter are collaborators behind
//! traits ([`Renderer`], [`Persistence`], [`MeshExporter`]).
//!
//! # Example
//!
//! ```
//! use texpack_backend::{pack_material, Bitmap, Material, NullRenderer, ShaderGraph};
//! use texpack_spec::{NodeKind, PackConfig};
//!
//! let mut graph = ShaderGraph::new();
//! let bsdf = graph.add_node("bsdf", NodeKind::PrincipledBsdf);
//! let albedo = graph.add_image("albedo", "Rock_Albedo", Bitmap::filled(8, 8, [0.5, 0.4, 0.3, 1.0]));
//! graph.link(albedo, bsdf, "Base Color");
//!
//! let material = Material { name: "Rock".into(), use_nodes: true, graph };
//! let pack = pack_material(&material, &[], &PackConfig::default(), &mut NullRenderer).unwrap();
//!
//! assert_eq!(pack.outputs.len(), 1);
//! assert_eq!(pack.file_name(&pack.outputs[0]), "Rock_BR.png");
//! ```
//!
//! # Determinism
//!
//! PNG encoding uses fixed compression and filter settings, so the same
//! inputs always produce byte-identical files. Each saved file's BLAKE3
//! hash is recorded in the [`BatchReport`].

pub mod bake;
pub mod bitmap;
pub mod channels;
pub mod error;
pub mod export;
pub mod graph;
pub mod orchestrator;
pub mod packing;
pub mod png;
pub mod resample;

// Re-export main types for convenience
pub use bake::{BakeError, BakeKind, BakeRequest, NullRenderer, Renderer};
pub use bitmap::{Bitmap, BitmapError};
pub use channels::{Channel, ChannelSet};
pub use error::PackError;
pub use export::{ExportError, MeshExporter};
pub use graph::{resolve_source, GraphView, NodeId, ShaderGraph};
pub use orchestrator::{
    find_bake_target, pack_material, request_bake, run_batch, BatchReport, Collaborators,
    ErrorReport, Material, MaterialFailure, MaterialPack, MaterialReport, MeshExportReport,
    SavedOutput, Scene,
};
pub use packing::{pack_variant, ColorSpace, PackedOutput, PackingError};
pub use png::{Persistence, PngConfig, PngError, PngFileWriter};
pub use resample::resample;
