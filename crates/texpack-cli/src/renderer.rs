//! A renderer that serves bakes rendered ahead of time.
//!
//! The CLI cannot path-trace a scene, so bake requests are answered from a
//! directory of PNGs named `{material}_{AO|Emission|Combined}.png`. A
//! missing file is an ordinary, non-fatal bake failure.

use std::path::{Path, PathBuf};

use texpack_backend::{BakeError, BakeRequest, Bitmap, Renderer};
use texpack_spec::sanitize_file_name;

use crate::input::load_bitmap;

#[derive(Debug, Clone)]
pub struct BakeDirRenderer {
    dir: PathBuf,
}

impl BakeDirRenderer {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// File that answers `request`.
    pub fn bake_path(&self, request: &BakeRequest<'_>) -> PathBuf {
        self.dir.join(format!(
            "{}_{}.png",
            sanitize_file_name(request.material),
            request.kind.label()
        ))
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

impl Renderer for BakeDirRenderer {
    fn bake(&mut self, request: &BakeRequest<'_>) -> Result<Bitmap, BakeError> {
        let path = self.bake_path(request);
        if !path.is_file() {
            return Err(BakeError::Unavailable {
                kind: request.kind,
                material: request.material.to_string(),
            });
        }

        let bitmap = load_bitmap(&path).map_err(|e| BakeError::Failed {
            kind: request.kind,
            reason: format!("{:#}", e),
        })?;
        log::info!(
            "{}: using {} bake {} ({}x{})",
            request.material,
            request.kind,
            path.display(),
            bitmap.width(),
            bitmap.height()
        );
        Ok(bitmap)
    }
}
