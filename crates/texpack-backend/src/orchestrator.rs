//! Per-material packing and the batch loop.
//!
//! A material pass classifies the identifier, resolves each channel from
//! the principal shader, fills gaps from the renderer when auto-bake is
//! enabled, resamples everything onto one grid and packs the variant's
//! layouts. The batch runs passes one material at a time, saves the
//! outputs through the persistence collaborator and collects a report.
//! No failure of a single material stops the batch.

use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};

use serde::Serialize;
use texpack_spec::{
    classify_variant, output_base_name, BackendError, ObjectDesc, ObjectKind, PackConfig,
    SuffixVariant,
};

use crate::bake::{BakeError, BakeKind, BakeRequest, Renderer};
use crate::bitmap::Bitmap;
use crate::channels::{Channel, ChannelSet};
use crate::error::PackError;
use crate::export::{export_selected, selected_meshes, MeshExporter};
use crate::graph::{resolve_source, NodeId, ShaderGraph};
use crate::packing::{pack_layouts, pack_variant, ColorSpace, PackedOutput, BR_BAKED};
use crate::png::Persistence;

/// Image name fragments that mark an ambient occlusion map.
const OCCLUSION_NAME_HINTS: [&str; 3] = ["ao", "occlusion", "ambient"];

/// A material with its shader graph loaded.
#[derive(Debug, Clone, PartialEq)]
pub struct Material {
    pub name: String,
    /// Materials without node graphs are never packed.
    pub use_nodes: bool,
    pub graph: ShaderGraph,
}

/// Everything a batch reads.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Scene {
    pub materials: Vec<Material>,
    pub objects: Vec<ObjectDesc>,
}

impl Scene {
    pub fn material(&self, name: &str) -> Option<&Material> {
        self.materials.iter().find(|m| m.name == name)
    }

    /// Node-based materials used by selected meshes, each once, in the order
    /// they are first seen.
    pub fn selected_materials(&self) -> Vec<&Material> {
        let mut seen = HashSet::new();
        selected_meshes(&self.objects)
            .into_iter()
            .flat_map(|object| object.materials.iter())
            .filter(|name| seen.insert(name.as_str()))
            .filter_map(|name| self.material(name))
            .filter(|material| material.use_nodes)
            .collect()
    }
}

/// A bake that was requested and did not produce a bitmap.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BakeFailure {
    pub kind: BakeKind,
    pub error: BakeError,
}

/// Result of packing one material, before persistence.
#[derive(Debug, Clone, PartialEq)]
pub struct MaterialPack {
    pub identifier: String,
    pub variant: SuffixVariant,
    /// Output file base name, see [`output_base_name`].
    pub base_name: String,
    /// Common grid every output was packed at; `None` when nothing was packed.
    pub resolution: Option<(u32, u32)>,
    pub outputs: Vec<PackedOutput>,
    /// Packed from a whole-material bake.
    pub fallback: bool,
    pub bake_failures: Vec<BakeFailure>,
}

impl MaterialPack {
    fn new(identifier: &str, variant: SuffixVariant) -> Self {
        Self {
            identifier: identifier.to_string(),
            variant,
            base_name: output_base_name(identifier),
            resolution: None,
            outputs: Vec::new(),
            fallback: false,
            bake_failures: Vec::new(),
        }
    }

    /// `{base}{suffix}.png` for one of this pack's outputs.
    pub fn file_name(&self, output: &PackedOutput) -> String {
        format!("{}{}.png", self.base_name, output.suffix)
    }
}

/// The object a material is baked on: the first selected mesh using it.
pub fn find_bake_target<'o>(
    material: &str,
    objects: &'o [ObjectDesc],
) -> Result<&'o ObjectDesc, BakeError> {
    let object = objects
        .iter()
        .find(|o| {
            o.selected && o.kind == ObjectKind::Mesh && o.materials.iter().any(|m| m == material)
        })
        .ok_or_else(|| BakeError::NoTargetObject {
            material: material.to_string(),
        })?;

    if !object.has_uv_map {
        return Err(BakeError::MissingUvMap {
            object: object.name.clone(),
        });
    }
    Ok(object)
}

/// Select a bake target and ask the renderer for a bitmap.
///
/// A bitmap with no pixels counts as a failed bake.
pub fn request_bake(
    renderer: &mut dyn Renderer,
    kind: BakeKind,
    material: &str,
    objects: &[ObjectDesc],
    resolution: u32,
) -> Result<Bitmap, BakeError> {
    let object = find_bake_target(material, objects)?;
    log::debug!(
        "{}: baking {} on '{}' at {}px",
        material,
        kind,
        object.name,
        resolution
    );
    let bitmap = renderer.bake(&BakeRequest {
        kind,
        material,
        object,
        resolution,
    })?;

    if bitmap.is_empty() {
        return Err(BakeError::Failed {
            kind,
            reason: format!(
                "renderer returned an empty {}x{} bitmap",
                bitmap.width(),
                bitmap.height()
            ),
        });
    }
    Ok(bitmap)
}

fn is_occlusion_name(name: &str) -> bool {
    let lower = name.to_lowercase();
    OCCLUSION_NAME_HINTS.iter().any(|hint| lower.contains(hint))
}

/// Resolve every channel the principal shader exposes.
///
/// For variants that consume occlusion, an image whose name marks it as an
/// AO map becomes the AO source.
fn gather_channels(graph: &ShaderGraph, shader: NodeId, variant: SuffixVariant) -> ChannelSet<'_> {
    let mut channels = ChannelSet::new();

    for channel in Channel::ALL {
        let source = channel
            .socket_names()
            .iter()
            .find_map(|socket| resolve_source(graph, shader, socket));
        if let Some(bitmap) = source {
            log::debug!(
                "  {}: {}x{}, {} channels",
                channel,
                bitmap.width(),
                bitmap.height(),
                bitmap.channels()
            );
            channels.set_borrowed(channel, bitmap);
        }
    }

    if variant.uses_occlusion() && !channels.contains(Channel::Ao) {
        if let Some(image) = graph.images().find(|i| is_occlusion_name(&i.name)) {
            log::debug!("  ao: image '{}' by name", image.name);
            channels.set_borrowed(Channel::Ao, &image.bitmap);
        }
    }

    channels
}

/// Pack one material.
///
/// Bake failures are recorded on the returned pack and otherwise treated as
/// an absent channel. The only errors are a failed whole-material fallback
/// and an unresolvable packing grid.
pub fn pack_material(
    material: &Material,
    objects: &[ObjectDesc],
    config: &PackConfig,
    renderer: &mut dyn Renderer,
) -> Result<MaterialPack, PackError> {
    let variant = classify_variant(&material.name);
    let mut pack = MaterialPack::new(&material.name, variant);

    if variant == SuffixVariant::Vxc {
        log::info!("{}: {} materials produce no textures", material.name, variant);
        return Ok(pack);
    }

    let Some(shader) = material.graph.principal_shader() else {
        return pack_whole_material(material, objects, config, renderer, pack);
    };

    let mut channels = gather_channels(&material.graph, shader, variant);

    if variant.uses_occlusion() {
        let wanted = [
            (config.auto_bake_ao, Channel::Ao, BakeKind::AmbientOcclusion),
            (config.auto_bake_emission, Channel::Emission, BakeKind::Emission),
        ];
        for (enabled, channel, kind) in wanted {
            if !enabled || channels.contains(channel) {
                continue;
            }
            match request_bake(
                renderer,
                kind,
                &material.name,
                objects,
                config.bake_resolution.pixels(),
            ) {
                Ok(bitmap) => channels.set_owned(channel, bitmap),
                Err(error) => {
                    log::warn!("{}: {} bake failed: {}", material.name, kind, error);
                    pack.bake_failures.push(BakeFailure { kind, error });
                }
            }
        }
    }

    let (width, height) = channels.resolution(config.default_resolution);
    let resampled = channels.resampled(width, height);
    pack.outputs = pack_variant(variant, &resampled, width, height)?;
    pack.resolution = Some((width, height));

    log::info!(
        "{}: {} at {}x{} -> [{}]",
        material.name,
        variant,
        width,
        height,
        pack.outputs
            .iter()
            .map(|o| o.suffix)
            .collect::<Vec<_>>()
            .join(", ")
    );
    Ok(pack)
}

fn pack_whole_material(
    material: &Material,
    objects: &[ObjectDesc],
    config: &PackConfig,
    renderer: &mut dyn Renderer,
    mut pack: MaterialPack,
) -> Result<MaterialPack, PackError> {
    log::warn!(
        "{}: no principal shader, baking the whole material",
        material.name
    );
    let baked = request_bake(
        renderer,
        BakeKind::Combined,
        &material.name,
        objects,
        config.default_resolution,
    )
    .map_err(|source| PackError::NoPrincipalShader { source })?;

    let (width, height) = baked.dimensions();
    let mut channels = ChannelSet::new();
    channels.set_owned(Channel::BaseColor, baked);

    pack.outputs = pack_layouts(&[BR_BAKED], &channels, width, height)?;
    pack.resolution = Some((width, height));
    pack.fallback = true;
    log::info!("{}: packed from a whole-material bake", material.name);
    Ok(pack)
}

/// The collaborators a batch drives.
pub struct Collaborators<'c> {
    pub renderer: &'c mut dyn Renderer,
    pub persistence: &'c mut dyn Persistence,
    /// Selected meshes are exported after packing when present.
    pub exporter: Option<&'c mut dyn MeshExporter>,
}

/// An error with its stable code, as reported.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ErrorReport {
    pub code: &'static str,
    pub message: String,
}

impl ErrorReport {
    pub fn new<E: BackendError>(error: &E) -> Self {
        Self {
            code: error.code(),
            message: error.message(),
        }
    }
}

/// A saved texture.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SavedOutput {
    pub path: PathBuf,
    /// BLAKE3 of the PNG bytes.
    pub hash: String,
    pub color_space: ColorSpace,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MaterialReport {
    pub identifier: String,
    pub variant: SuffixVariant,
    pub resolution: Option<(u32, u32)>,
    pub fallback: bool,
    pub files: Vec<SavedOutput>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub bake_failures: Vec<ErrorReport>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MaterialFailure {
    pub identifier: String,
    pub error: ErrorReport,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum MeshExportReport {
    Exported { path: PathBuf },
    Failed { error: ErrorReport },
}

/// Outcome of a batch.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct BatchReport {
    pub packed: Vec<MaterialReport>,
    pub failures: Vec<MaterialFailure>,
    /// The batch stopped early; materials after the last report were skipped.
    pub cancelled: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mesh_export: Option<MeshExportReport>,
}

impl BatchReport {
    /// Whether every material packed and saved.
    pub fn is_success(&self) -> bool {
        self.failures.is_empty()
    }

    pub fn file_count(&self) -> usize {
        self.packed.iter().map(|m| m.files.len()).sum()
    }
}

fn save_outputs(
    pack: &MaterialPack,
    out_dir: &Path,
    persistence: &mut dyn Persistence,
) -> Result<Vec<SavedOutput>, PackError> {
    pack.outputs
        .iter()
        .map(|output| {
            let path = out_dir.join(pack.file_name(output));
            let hash = persistence
                .save_png(&output.bitmap, output.color_space, &path)
                .map_err(|source| PackError::UnwritableOutput {
                    path: path.clone(),
                    source,
                })?;
            Ok(SavedOutput {
                path,
                hash,
                color_space: output.color_space,
            })
        })
        .collect()
}

/// Pack and save every selected material, then export meshes.
///
/// `cancel` is checked between materials; a material already being packed
/// runs to completion. Mesh export is skipped for a cancelled batch.
pub fn run_batch(
    scene: &Scene,
    config: &PackConfig,
    out_dir: &Path,
    collaborators: Collaborators<'_>,
    cancel: Option<&AtomicBool>,
) -> BatchReport {
    let Collaborators {
        renderer,
        persistence,
        exporter,
    } = collaborators;
    let mut report = BatchReport::default();

    for material in scene.selected_materials() {
        if cancel.is_some_and(|flag| flag.load(Ordering::Relaxed)) {
            log::info!("batch cancelled before '{}'", material.name);
            report.cancelled = true;
            break;
        }

        let saved = pack_material(material, &scene.objects, config, &mut *renderer).and_then(
            |pack| save_outputs(&pack, out_dir, &mut *persistence).map(|files| (pack, files)),
        );

        match saved {
            Ok((pack, files)) => report.packed.push(MaterialReport {
                identifier: pack.identifier,
                variant: pack.variant,
                resolution: pack.resolution,
                fallback: pack.fallback,
                files,
                bake_failures: pack
                    .bake_failures
                    .iter()
                    .map(|f| ErrorReport::new(&f.error))
                    .collect(),
            }),
            Err(error) => {
                log::warn!("{}: {}", material.name, error);
                report.failures.push(MaterialFailure {
                    identifier: material.name.clone(),
                    error: ErrorReport::new(&error),
                });
            }
        }
    }

    if let (false, Some(exporter)) = (report.cancelled, exporter) {
        report.mesh_export = Some(match export_selected(exporter, &scene.objects, out_dir) {
            Ok(path) => {
                log::info!("exported meshes to {}", path.display());
                MeshExportReport::Exported { path }
            }
            Err(error) => {
                log::warn!("mesh export failed: {}", error);
                MeshExportReport::Failed {
                    error: ErrorReport::new(&error),
                }
            }
        });
    }

    report
}
