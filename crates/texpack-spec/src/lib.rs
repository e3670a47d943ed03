//! Texpack Data Model
//!
//! This crate holds the host-independent pieces of the texpack packer:
//! the material naming rules that select an export variant, the pack
//! configuration, and the scene manifest format consumed by the CLI.
//!
//! # Overview
//!
//! Material identifiers follow a naming convention: an alphanumeric base
//! name plus an optional suffix such as `_Metal` or `_MaskedVXM`. The
//! suffix selects a [`SuffixVariant`], which decides which packed textures
//! (`_BR`, `_MEO`, `_BA`, `_MESA`) the backend produces.
//!
//! # Example
//!
//! ```
//! use texpack_spec::{classify_variant, output_base_name, validate_name, SuffixVariant};
//!
//! assert_eq!(classify_variant("Panel_Metal"), SuffixVariant::Metal);
//! assert_eq!(output_base_name("Panel_Metal"), "Panel");
//! assert!(validate_name("Panel_Metal").is_ok());
//! ```
//!
//! # Modules
//!
//! - [`naming`]: identifier validation, repair and variant classification
//! - [`config`]: pack configuration
//! - [`scene`]: scene manifest types
//! - [`error`]: error types and the [`BackendError`] reporting trait

pub mod config;
pub mod error;
pub mod naming;
pub mod scene;

pub use config::{BakeResolution, PackConfig};
pub use error::{BackendError, ConfigError, NameError};
pub use naming::{
    audit_names, classify_variant, generate_compliant_name, output_base_name, plan_renames,
    sanitize_file_name, split_suffix, validate_name, InvalidName, Rename, SplitName,
    SuffixVariant,
};
pub use scene::{
    ImageRef, LinkDesc, ManifestError, MaterialDesc, NodeDesc, NodeKind, ObjectDesc, ObjectKind,
    SceneManifest,
};
