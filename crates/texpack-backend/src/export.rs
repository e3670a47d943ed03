//! Mesh export collaborator.
//!
//! Geometry export is delegated entirely; the engine only picks the
//! objects and the destination file name.

use std::path::{Path, PathBuf};

use texpack_spec::{sanitize_file_name, BackendError, ObjectDesc, ObjectKind};
use thiserror::Error;

/// File stem used when several meshes go into one file.
pub const COMBINED_MESH_STEM: &str = "exported_meshes";

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("no selected mesh objects to export")]
    NothingSelected,

    #[error("failed to export meshes to {}: {reason}", .path.display())]
    Failed { path: PathBuf, reason: String },
}

impl BackendError for ExportError {
    fn code(&self) -> &'static str {
        match self {
            ExportError::NothingSelected => "EXPORT_001",
            ExportError::Failed { .. } => "EXPORT_002",
        }
    }

    fn category(&self) -> &'static str {
        "export"
    }
}

/// Writes mesh objects to an interchange file.
pub trait MeshExporter {
    /// File extension without the dot, e.g. `fbx`.
    fn extension(&self) -> &str;

    fn export(&mut self, objects: &[&ObjectDesc], path: &Path) -> Result<(), ExportError>;
}

/// Selected mesh objects, in scene order.
pub fn selected_meshes(objects: &[ObjectDesc]) -> Vec<&ObjectDesc> {
    objects
        .iter()
        .filter(|o| o.selected && o.kind == ObjectKind::Mesh)
        .collect()
}

/// Destination for exporting `objects` into `out_dir`.
///
/// A single mesh is named after the object; several share one file.
pub fn export_path(objects: &[&ObjectDesc], out_dir: &Path, extension: &str) -> PathBuf {
    let stem = match objects {
        [single] => sanitize_file_name(&single.name),
        _ => COMBINED_MESH_STEM.to_string(),
    };
    out_dir.join(format!("{}.{}", stem, extension))
}

/// Export the selected meshes of a scene. Returns the written path.
pub fn export_selected(
    exporter: &mut dyn MeshExporter,
    objects: &[ObjectDesc],
    out_dir: &Path,
) -> Result<PathBuf, ExportError> {
    let meshes = selected_meshes(objects);
    if meshes.is_empty() {
        return Err(ExportError::NothingSelected);
    }
    let path = export_path(&meshes, out_dir, exporter.extension());
    exporter.export(&meshes, &path)?;
    Ok(path)
}
