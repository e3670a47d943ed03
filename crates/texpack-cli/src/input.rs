//! Loading scene manifests and source images from disk.
//!
//! Image paths in a manifest are relative to the manifest file. Only the
//! materials of selected meshes have their images read. PNGs are
//! decoded to float samples: grayscale images are expanded to RGB and alpha
//! is kept when the file has it, so every bitmap has 3 or 4 channels.

use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use texpack_backend::export::selected_meshes;
use texpack_backend::{Bitmap, ErrorReport, Material, MaterialFailure, Scene, ShaderGraph};
use texpack_spec::{BackendError, MaterialDesc, NodeKind, SceneManifest};
use thiserror::Error;

/// Read, parse and structurally validate a scene manifest.
pub fn load_manifest(path: &Path) -> Result<SceneManifest> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read scene manifest: {}", path.display()))?;
    let manifest = SceneManifest::from_json(&content)
        .with_context(|| format!("failed to parse scene manifest: {}", path.display()))?;
    manifest
        .validate()
        .with_context(|| format!("invalid scene manifest: {}", path.display()))?;
    Ok(manifest)
}

/// Write a manifest as pretty JSON.
pub fn write_manifest(manifest: &SceneManifest, path: &Path) -> Result<()> {
    let json = manifest
        .to_json_pretty()
        .context("failed to serialize scene manifest")?;
    std::fs::write(path, json + "\n")
        .with_context(|| format!("failed to write scene manifest: {}", path.display()))
}

/// Decode an image file into a float bitmap.
pub fn load_bitmap(path: &Path) -> Result<Bitmap> {
    let image =
        image::open(path).with_context(|| format!("failed to decode image: {}", path.display()))?;

    let (width, height) = (image.width(), image.height());
    let (channels, data) = if image.color().has_alpha() {
        (4, image.to_rgba32f().into_raw())
    } else {
        (3, image.to_rgb32f().into_raw())
    };

    Bitmap::from_raw(width, height, channels, data)
        .with_context(|| format!("unusable image: {}", path.display()))
}

/// An input file a material depends on could not be used. Fails only that
/// material.
#[derive(Debug, Error)]
pub enum InputError {
    #[error("node '{node}': cannot load {}: {reason}", .path.display())]
    ImageLoad {
        node: String,
        path: PathBuf,
        reason: String,
    },
}

impl BackendError for InputError {
    fn code(&self) -> &'static str {
        match self {
            InputError::ImageLoad { .. } => "INPUT_001",
        }
    }

    fn category(&self) -> &'static str {
        "input"
    }
}

/// Decodes each image file once.
#[derive(Debug, Default)]
struct ImageCache {
    bitmaps: HashMap<PathBuf, Bitmap>,
}

impl ImageCache {
    fn get(&mut self, path: PathBuf) -> Result<Bitmap> {
        if let Some(bitmap) = self.bitmaps.get(&path) {
            return Ok(bitmap.clone());
        }
        let bitmap = load_bitmap(&path)?;
        self.bitmaps.insert(path, bitmap.clone());
        Ok(bitmap)
    }
}

fn build_graph(
    desc: &MaterialDesc,
    base_dir: &Path,
    cache: &mut ImageCache,
) -> Result<ShaderGraph, InputError> {
    let mut graph = ShaderGraph::new();

    for node in &desc.nodes {
        match (&node.kind, &node.image) {
            (NodeKind::ImageTexture, Some(image)) => {
                let path = base_dir.join(&image.path);
                let bitmap = cache
                    .get(path.clone())
                    .map_err(|e| InputError::ImageLoad {
                        node: node.id.clone(),
                        path,
                        reason: format!("{:#}", e),
                    })?;
                graph.add_image(node.id.as_str(), image.name.as_str(), bitmap);
            }
            (kind, _) => {
                graph.add_node(node.id.as_str(), *kind);
            }
        }
    }

    for link in &desc.links {
        // Endpoints were checked by `SceneManifest::validate`.
        if let (Some(from), Some(to)) = (graph.find(&link.from_node), graph.find(&link.to_node)) {
            graph.link(from, to, link.to_socket.as_str());
        }
    }

    Ok(graph)
}

/// A scene ready to pack, plus the materials that could not be loaded.
#[derive(Debug, Default)]
pub struct LoadedScene {
    pub scene: Scene,
    pub failures: Vec<MaterialFailure>,
}

/// Build the in-memory scene for the materials of selected meshes.
///
/// Only those materials have their images decoded; the others are left
/// out. A material whose image cannot be loaded is reported in
/// `failures` and left out too.
pub fn build_scene(manifest: &SceneManifest, base_dir: &Path) -> LoadedScene {
    let used: HashSet<&str> = selected_meshes(&manifest.objects)
        .into_iter()
        .flat_map(|object| object.materials.iter().map(String::as_str))
        .collect();

    let mut cache = ImageCache::default();
    let mut loaded = LoadedScene::default();

    for desc in manifest
        .materials
        .iter()
        .filter(|desc| used.contains(desc.name.as_str()))
    {
        let graph = if desc.use_nodes {
            match build_graph(desc, base_dir, &mut cache) {
                Ok(graph) => graph,
                Err(error) => {
                    log::warn!("{}: {}", desc.name, error);
                    loaded.failures.push(MaterialFailure {
                        identifier: desc.name.clone(),
                        error: ErrorReport::new(&error),
                    });
                    continue;
                }
            }
        } else {
            ShaderGraph::new()
        };
        loaded.scene.materials.push(Material {
            name: desc.name.clone(),
            use_nodes: desc.use_nodes,
            graph,
        });
    }

    log::debug!(
        "loaded {} of {} materials, {} images",
        loaded.scene.materials.len(),
        manifest.materials.len(),
        cache.bitmaps.len()
    );
    loaded.scene.objects = manifest.objects.clone();
    loaded
}

/// Directory that image paths in `manifest_path` are relative to.
pub fn manifest_dir(manifest_path: &Path) -> &Path {
    manifest_path.parent().unwrap_or_else(|| Path::new("."))
}
