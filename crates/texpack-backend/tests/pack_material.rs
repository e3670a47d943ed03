//! Material packing scenarios and batch behavior.
//!
//! Collaborators are replaced with in-memory doubles so each test can see
//! exactly which bakes were requested and which files were written.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};

use pretty_assertions::assert_eq;
use texpack_backend::png::hash_png;
use texpack_backend::{
    pack_material, run_batch, BakeError, BakeKind, BakeRequest, Bitmap, BatchReport,
    Collaborators, ColorSpace, ExportError, Material, MeshExportReport, MeshExporter,
    NullRenderer, PackError, Persistence, PngError, PngFileWriter, Renderer, Scene, ShaderGraph,
};
use texpack_spec::{
    BackendError, BakeResolution, NodeKind, ObjectDesc, ObjectKind, PackConfig, SuffixVariant,
};

// ============================================================================
// Fixtures
// ============================================================================

fn rgb(width: u32, height: u32, color: [f32; 3]) -> Bitmap {
    let mut data = Vec::new();
    for _ in 0..width * height {
        data.extend_from_slice(&color);
    }
    Bitmap::from_raw(width, height, 3, data).unwrap()
}

/// A material whose principal shader has one image linked per socket.
fn material(name: &str, sockets: Vec<(&str, Bitmap)>) -> Material {
    let mut graph = ShaderGraph::new();
    let bsdf = graph.add_node("bsdf", NodeKind::PrincipledBsdf);
    for (i, (socket, bitmap)) in sockets.into_iter().enumerate() {
        let image = graph.add_image(format!("tex{}", i), format!("{}_{}", name, socket), bitmap);
        graph.link(image, bsdf, socket);
    }
    Material {
        name: name.to_string(),
        use_nodes: true,
        graph,
    }
}

fn mesh(name: &str, materials: &[&str]) -> ObjectDesc {
    ObjectDesc {
        name: name.to_string(),
        kind: ObjectKind::Mesh,
        selected: true,
        has_uv_map: true,
        materials: materials.iter().map(|m| m.to_string()).collect(),
    }
}

fn small_config() -> PackConfig {
    PackConfig {
        default_resolution: 256,
        bake_resolution: BakeResolution::R512,
        ..PackConfig::default()
    }
}

fn suffixes(pack: &texpack_backend::MaterialPack) -> Vec<&'static str> {
    pack.outputs.iter().map(|o| o.suffix).collect()
}

/// Serves fixed bakes per kind and records every request.
#[derive(Default)]
struct ScriptedRenderer {
    bakes: HashMap<BakeKind, [f32; 4]>,
    requests: Vec<(BakeKind, String, String, u32)>,
}

impl ScriptedRenderer {
    fn with(mut self, kind: BakeKind, color: [f32; 4]) -> Self {
        self.bakes.insert(kind, color);
        self
    }
}

impl Renderer for ScriptedRenderer {
    fn bake(&mut self, request: &BakeRequest<'_>) -> Result<Bitmap, BakeError> {
        self.requests.push((
            request.kind,
            request.material.to_string(),
            request.object.name.clone(),
            request.resolution,
        ));
        match self.bakes.get(&request.kind) {
            Some(color) => Ok(Bitmap::filled(request.resolution, request.resolution, *color)),
            None => Err(BakeError::Failed {
                kind: request.kind,
                reason: "scripted failure".to_string(),
            }),
        }
    }
}

/// Keeps saved bitmaps in memory; file names in `reject` fail to save.
#[derive(Default)]
struct MemoryStore {
    saved: Vec<(PathBuf, ColorSpace, Bitmap)>,
    reject: Vec<String>,
    on_save: Option<Box<dyn FnMut()>>,
}

impl Persistence for MemoryStore {
    fn save_png(
        &mut self,
        bitmap: &Bitmap,
        color_space: ColorSpace,
        path: &Path,
    ) -> Result<String, PngError> {
        if let Some(callback) = self.on_save.as_mut() {
            callback();
        }
        let name = path.file_name().unwrap().to_string_lossy().to_string();
        if self.reject.contains(&name) {
            return Err(PngError::Io(std::io::Error::new(
                std::io::ErrorKind::PermissionDenied,
                "read-only",
            )));
        }
        self.saved
            .push((path.to_path_buf(), color_space, bitmap.clone()));
        Ok(format!("hash-of-{}", name))
    }
}

#[derive(Default)]
struct RecordingExporter {
    exported: Vec<(Vec<String>, PathBuf)>,
}

impl MeshExporter for RecordingExporter {
    fn extension(&self) -> &str {
        "glb"
    }

    fn export(&mut self, objects: &[&ObjectDesc], path: &Path) -> Result<(), ExportError> {
        self.exported.push((
            objects.iter().map(|o| o.name.clone()).collect(),
            path.to_path_buf(),
        ));
        Ok(())
    }
}

fn batch(
    scene: &Scene,
    config: &PackConfig,
    renderer: &mut dyn Renderer,
    store: &mut MemoryStore,
    cancel: Option<&AtomicBool>,
) -> BatchReport {
    run_batch(
        scene,
        config,
        Path::new("out"),
        Collaborators {
            renderer,
            persistence: store,
            exporter: None,
        },
        cancel,
    )
}

// ============================================================================
// Variant Scenarios
// ============================================================================

#[test]
fn test_metal_packs_metallic_into_alpha() {
    let material = material(
        "Panel_Metal",
        vec![
            ("Base Color", rgb(4, 4, [0.6, 0.5, 0.4])),
            ("Metallic", rgb(4, 4, [0.8, 0.0, 0.0])),
        ],
    );

    let pack = pack_material(&material, &[], &small_config(), &mut NullRenderer).unwrap();

    assert_eq!(pack.variant, SuffixVariant::Metal);
    assert_eq!(suffixes(&pack), vec!["_BR"]);
    assert_eq!(pack.file_name(&pack.outputs[0]), "Panel_BR.png");
    let [r, g, b, a] = pack.outputs[0].bitmap.pixel(2, 2);
    assert!((r - 0.6).abs() < 1e-6 && (g - 0.5).abs() < 1e-6 && (b - 0.4).abs() < 1e-6);
    assert!((a - 0.8).abs() < 1e-6);
}

#[test]
fn test_masked_vxm_packs_base_alpha() {
    let material = material("Rock_MaskedVXM", vec![("Base Color", rgb(4, 4, [0.2, 0.3, 0.4]))]);

    let pack = pack_material(&material, &[], &small_config(), &mut NullRenderer).unwrap();

    assert_eq!(pack.variant, SuffixVariant::MaskedVxm);
    assert_eq!(pack.base_name, "Rock");
    assert_eq!(suffixes(&pack), vec!["_BA"]);
    assert_eq!(pack.file_name(&pack.outputs[0]), "Rock_BA.png");
    assert_eq!(pack.outputs[0].bitmap.pixel(0, 0)[3], 1.0);
    assert_eq!(pack.outputs[0].color_space, ColorSpace::Srgb);
}

#[test]
fn test_standard_meo_requires_a_data_channel() {
    let plain = material("Wood", vec![("Base Color", rgb(4, 4, [0.5, 0.5, 0.5]))]);
    let pack = pack_material(&plain, &[], &small_config(), &mut NullRenderer).unwrap();
    assert_eq!(suffixes(&pack), vec!["_BR"]);

    let metallic = material(
        "Wood",
        vec![
            ("Base Color", rgb(4, 4, [0.5, 0.5, 0.5])),
            ("Metallic", rgb(4, 4, [0.3, 0.0, 0.0])),
        ],
    );
    let pack = pack_material(&metallic, &[], &small_config(), &mut NullRenderer).unwrap();
    assert_eq!(suffixes(&pack), vec!["_BR", "_MEO"]);
    assert_eq!(pack.outputs[1].color_space, ColorSpace::NonColor);
}

#[test]
fn test_emission_socket_fallback_name() {
    let material = material("Lamp", vec![("Emission", rgb(2, 2, [0.3, 0.6, 0.9]))]);
    let pack = pack_material(&material, &[], &small_config(), &mut NullRenderer).unwrap();

    assert_eq!(suffixes(&pack), vec!["_BR", "_MEO"]);
    let meo = pack.outputs[1].bitmap.pixel(0, 0);
    assert!((meo[1] - 0.6).abs() < 1e-6);
}

#[test]
fn test_grayscale_emission_survives_resampling() {
    let gray = Bitmap::from_raw(2, 2, 1, vec![0.0; 4]).unwrap();
    let material = material(
        "Lamp",
        vec![("Base Color", rgb(4, 4, [0.5, 0.5, 0.5])), ("Emission", gray)],
    );
    let pack = pack_material(&material, &[], &small_config(), &mut NullRenderer).unwrap();

    assert_eq!(pack.resolution, Some((4, 4)));
    let meo = pack.outputs[1].bitmap.pixel(3, 3);
    assert_eq!(meo[1], 0.0);
}

#[test]
fn test_specular_ior_level_feeds_mesa() {
    let material = material(
        "Glass_Transparent",
        vec![("Specular IOR Level", rgb(2, 2, [0.25, 0.0, 0.0]))],
    );
    let pack = pack_material(&material, &[], &small_config(), &mut NullRenderer).unwrap();

    assert_eq!(suffixes(&pack), vec!["_BR", "_MESA"]);
    assert_eq!(pack.file_name(&pack.outputs[1]), "Glass_MESA.png");
    assert_eq!(pack.outputs[1].bitmap.pixel(1, 1), [0.0, 0.25, 0.0, 1.0]);
}

#[test]
fn test_unlit_keeps_suffix_in_file_name() {
    let material = material("Sky_Unlit", vec![("Base Color", rgb(2, 2, [0.1, 0.2, 0.9]))]);
    let pack = pack_material(&material, &[], &small_config(), &mut NullRenderer).unwrap();

    assert_eq!(pack.variant, SuffixVariant::Unlit);
    assert_eq!(suffixes(&pack), vec!["_BR"]);
    assert_eq!(pack.file_name(&pack.outputs[0]), "Sky_Unlit_BR.png");
}

#[test]
fn test_reserved_characters_are_replaced_in_file_names() {
    let material = material("Rock:Big_Metal", vec![]);
    let pack = pack_material(&material, &[], &small_config(), &mut NullRenderer).unwrap();
    assert_eq!(pack.file_name(&pack.outputs[0]), "Rock_Big_BR.png");
}

#[test]
fn test_vxc_produces_nothing_and_never_bakes() {
    let material = Material {
        name: "Terrain_VXC".to_string(),
        use_nodes: true,
        graph: ShaderGraph::new(),
    };
    let objects = vec![mesh("Ground", &["Terrain_VXC"])];
    let mut renderer = ScriptedRenderer::default().with(BakeKind::Combined, [1.0; 4]);

    let pack = pack_material(&material, &objects, &small_config(), &mut renderer).unwrap();

    assert!(pack.outputs.is_empty());
    assert!(renderer.requests.is_empty());
}

// ============================================================================
// Resolution
// ============================================================================

#[test]
fn test_resolution_follows_first_present_channel() {
    let material = material(
        "Rock",
        vec![
            ("Roughness", rgb(4, 4, [0.5, 0.0, 0.0])),
            ("Base Color", rgb(8, 6, [0.5, 0.5, 0.5])),
        ],
    );
    let pack = pack_material(&material, &[], &small_config(), &mut NullRenderer).unwrap();

    assert_eq!(pack.resolution, Some((8, 6)));
    for output in &pack.outputs {
        assert_eq!(output.bitmap.dimensions(), (8, 6));
        assert_eq!(output.bitmap.channels(), 4);
    }
}

#[test]
fn test_no_sources_uses_default_resolution() {
    let material = material("Blank", vec![]);
    let pack = pack_material(&material, &[], &small_config(), &mut NullRenderer).unwrap();

    assert_eq!(pack.resolution, Some((256, 256)));
    assert_eq!(pack.outputs[0].bitmap.pixel(10, 10), [1.0, 1.0, 1.0, 1.0]);
}

// ============================================================================
// Ambient Occlusion and Auto-Bake
// ============================================================================

#[test]
fn test_ao_found_by_image_name() {
    let mut material = material("Rock", vec![("Base Color", rgb(4, 4, [0.5, 0.5, 0.5]))]);
    material
        .graph
        .add_image("loose", "Rock_Occlusion", rgb(2, 2, [0.25, 0.25, 0.25]));

    let pack = pack_material(&material, &[], &small_config(), &mut NullRenderer).unwrap();

    assert_eq!(suffixes(&pack), vec!["_BR", "_MEO"]);
    assert_eq!(pack.outputs[1].bitmap.pixel(3, 3)[2], 0.25);
}

#[test]
fn test_ao_name_ignored_for_variants_without_occlusion() {
    let mut material = material("Rock_Blend", vec![("Base Color", rgb(4, 4, [0.5, 0.5, 0.5]))]);
    material
        .graph
        .add_image("loose", "Rock_AO", rgb(4, 4, [0.25, 0.25, 0.25]));

    let pack = pack_material(&material, &[], &small_config(), &mut NullRenderer).unwrap();
    assert_eq!(suffixes(&pack), vec!["_BA"]);
}

#[test]
fn test_auto_bake_fills_missing_ao() {
    let material = material("Rock", vec![("Base Color", rgb(8, 8, [0.5, 0.5, 0.5]))]);
    let objects = vec![mesh("Boulder", &["Rock"])];
    let config = PackConfig {
        auto_bake_ao: true,
        ..small_config()
    };
    let mut renderer = ScriptedRenderer::default().with(BakeKind::AmbientOcclusion, [0.4; 4]);

    let pack = pack_material(&material, &objects, &config, &mut renderer).unwrap();

    assert_eq!(
        renderer.requests,
        vec![(
            BakeKind::AmbientOcclusion,
            "Rock".to_string(),
            "Boulder".to_string(),
            512
        )]
    );
    assert_eq!(suffixes(&pack), vec!["_BR", "_MEO"]);
    // The 512px bake is resampled onto the 8x8 base color grid.
    assert_eq!(pack.outputs[1].bitmap.dimensions(), (8, 8));
    assert!((pack.outputs[1].bitmap.pixel(4, 4)[2] - 0.4).abs() < 1e-6);
}

#[test]
fn test_auto_bake_skipped_when_channel_present() {
    let material = material(
        "Lamp",
        vec![("Emission Color", rgb(2, 2, [1.0, 1.0, 1.0]))],
    );
    let objects = vec![mesh("Bulb", &["Lamp"])];
    let config = PackConfig {
        auto_bake_emission: true,
        ..small_config()
    };
    let mut renderer = ScriptedRenderer::default().with(BakeKind::Emission, [0.0; 4]);

    pack_material(&material, &objects, &config, &mut renderer).unwrap();
    assert!(renderer.requests.is_empty());
}

#[test]
fn test_auto_bake_only_for_occlusion_variants() {
    let material = material("Panel_Metal", vec![]);
    let objects = vec![mesh("Panel", &["Panel_Metal"])];
    let config = PackConfig {
        auto_bake_ao: true,
        auto_bake_emission: true,
        ..small_config()
    };
    let mut renderer = ScriptedRenderer::default().with(BakeKind::AmbientOcclusion, [0.5; 4]);

    pack_material(&material, &objects, &config, &mut renderer).unwrap();
    assert!(renderer.requests.is_empty());
}

#[test]
fn test_bake_failure_is_not_fatal() {
    let material = material("Rock", vec![("Base Color", rgb(4, 4, [0.5, 0.5, 0.5]))]);
    let objects = vec![mesh("Boulder", &["Rock"])];
    let config = PackConfig {
        auto_bake_ao: true,
        auto_bake_emission: true,
        ..small_config()
    };
    let mut renderer = ScriptedRenderer::default();

    let pack = pack_material(&material, &objects, &config, &mut renderer).unwrap();

    assert_eq!(suffixes(&pack), vec!["_BR"]);
    assert_eq!(pack.bake_failures.len(), 2);
    assert_eq!(pack.bake_failures[0].kind, BakeKind::AmbientOcclusion);
    assert_eq!(pack.bake_failures[1].error.code(), "BAKE_004");
}

/// Answers every bake with a bitmap that has no pixels.
struct EmptyRenderer;

impl Renderer for EmptyRenderer {
    fn bake(&mut self, _request: &BakeRequest<'_>) -> Result<Bitmap, BakeError> {
        Ok(Bitmap::filled(0, 0, [1.0; 4]))
    }
}

#[test]
fn test_empty_bake_is_a_failed_bake() {
    let material = material("Rock", vec![("Base Color", rgb(4, 4, [0.5, 0.5, 0.5]))]);
    let objects = vec![mesh("Boulder", &["Rock"])];
    let config = PackConfig {
        auto_bake_ao: true,
        ..small_config()
    };

    let pack = pack_material(&material, &objects, &config, &mut EmptyRenderer).unwrap();

    assert_eq!(suffixes(&pack), vec!["_BR"]);
    assert_eq!(pack.resolution, Some((4, 4)));
    assert_eq!(pack.bake_failures.len(), 1);
    assert_eq!(pack.bake_failures[0].error.code(), "BAKE_004");
}

#[test]
fn test_empty_fallback_bake_fails_only_that_material() {
    let scene = Scene {
        materials: vec![
            shaderless("Hologram"),
            material("Rock", vec![("Base Color", rgb(2, 2, [0.5, 0.5, 0.5]))]),
        ],
        objects: vec![mesh("Screen", &["Hologram"]), mesh("Boulder", &["Rock"])],
    };
    let mut store = MemoryStore::default();

    let report = batch(&scene, &small_config(), &mut EmptyRenderer, &mut store, None);

    assert_eq!(report.failures.len(), 1);
    assert_eq!(report.failures[0].identifier, "Hologram");
    assert_eq!(report.failures[0].error.code, "PACK_001");
    assert_eq!(report.packed.len(), 1);
    assert_eq!(report.packed[0].identifier, "Rock");
}

#[test]
fn test_missing_uv_map_fails_bake_without_calling_renderer() {
    let material = material("Rock", vec![]);
    let mut object = mesh("Boulder", &["Rock"]);
    object.has_uv_map = false;
    let config = PackConfig {
        auto_bake_ao: true,
        ..small_config()
    };
    let mut renderer = ScriptedRenderer::default().with(BakeKind::AmbientOcclusion, [0.5; 4]);

    let pack = pack_material(&material, &[object], &config, &mut renderer).unwrap();

    assert!(renderer.requests.is_empty());
    assert_eq!(
        pack.bake_failures[0].error,
        BakeError::MissingUvMap {
            object: "Boulder".to_string()
        }
    );
}

// ============================================================================
// Whole-Material Fallback
// ============================================================================

fn shaderless(name: &str) -> Material {
    let mut graph = ShaderGraph::new();
    graph.add_node("emit", NodeKind::Utility);
    Material {
        name: name.to_string(),
        use_nodes: true,
        graph,
    }
}

#[test]
fn test_fallback_bakes_combined_at_default_resolution() {
    let material = shaderless("Hologram_Metal");
    let objects = vec![mesh("Screen", &["Hologram_Metal"])];
    let mut renderer = ScriptedRenderer::default().with(BakeKind::Combined, [0.2, 0.4, 0.6, 0.5]);

    let pack = pack_material(&material, &objects, &small_config(), &mut renderer).unwrap();

    assert!(pack.fallback);
    assert_eq!(renderer.requests[0].0, BakeKind::Combined);
    assert_eq!(renderer.requests[0].3, 256);
    assert_eq!(suffixes(&pack), vec!["_BR"]);
    assert_eq!(pack.file_name(&pack.outputs[0]), "Hologram_BR.png");
    assert_eq!(pack.outputs[0].bitmap.pixel(0, 0), [0.2, 0.4, 0.6, 1.0]);
}

#[test]
fn test_fallback_failure_reports_no_principal_shader() {
    let material = shaderless("Hologram");
    let err = pack_material(&material, &[], &small_config(), &mut NullRenderer).unwrap_err();

    assert!(matches!(
        err,
        PackError::NoPrincipalShader {
            source: BakeError::NoTargetObject { .. }
        }
    ));
    assert_eq!(err.code(), "PACK_001");
}

// ============================================================================
// Batch
// ============================================================================

fn two_material_scene() -> Scene {
    Scene {
        materials: vec![
            material("Rock", vec![("Base Color", rgb(2, 2, [0.5, 0.5, 0.5]))]),
            material("Panel_Metal", vec![("Base Color", rgb(2, 2, [0.7, 0.7, 0.7]))]),
        ],
        objects: vec![mesh("Boulder", &["Rock"]), mesh("Door", &["Panel_Metal", "Rock"])],
    }
}

#[test]
fn test_batch_saves_every_output() {
    let scene = two_material_scene();
    let mut store = MemoryStore::default();

    let report = batch(&scene, &small_config(), &mut NullRenderer, &mut store, None);

    assert!(report.is_success());
    assert!(!report.cancelled);
    assert_eq!(report.file_count(), 2);
    let paths: Vec<_> = store.saved.iter().map(|(p, _, _)| p.clone()).collect();
    assert_eq!(
        paths,
        vec![
            Path::new("out").join("Rock_BR.png"),
            Path::new("out").join("Panel_BR.png")
        ]
    );
    assert_eq!(report.packed[0].files[0].hash, "hash-of-Rock_BR.png");
    assert!(report.mesh_export.is_none());
}

#[test]
fn test_unwritable_output_does_not_abort_batch() {
    let scene = two_material_scene();
    let mut store = MemoryStore {
        reject: vec!["Rock_BR.png".to_string()],
        ..MemoryStore::default()
    };

    let report = batch(&scene, &small_config(), &mut NullRenderer, &mut store, None);

    assert!(!report.is_success());
    assert_eq!(report.failures.len(), 1);
    assert_eq!(report.failures[0].identifier, "Rock");
    assert_eq!(report.failures[0].error.code, "PACK_002");
    assert_eq!(report.packed.len(), 1);
    assert_eq!(report.packed[0].identifier, "Panel_Metal");
}

#[test]
fn test_failed_material_is_attributed_and_batch_continues() {
    let mut scene = two_material_scene();
    scene.materials.insert(0, shaderless("Ghost"));
    scene.objects.insert(0, mesh("Wisp", &["Ghost"]));

    let report = batch(
        &scene,
        &small_config(),
        &mut NullRenderer,
        &mut MemoryStore::default(),
        None,
    );

    assert_eq!(report.failures.len(), 1);
    assert_eq!(report.failures[0].identifier, "Ghost");
    assert_eq!(report.failures[0].error.code, "PACK_001");
    assert_eq!(report.packed.len(), 2);
}

#[test]
fn test_cancelled_before_start_packs_nothing() {
    let scene = two_material_scene();
    let cancel = AtomicBool::new(true);

    let report = batch(
        &scene,
        &small_config(),
        &mut NullRenderer,
        &mut MemoryStore::default(),
        Some(&cancel),
    );

    assert!(report.cancelled);
    assert!(report.packed.is_empty());
}

#[test]
fn test_cancel_takes_effect_between_materials() {
    static CANCEL: AtomicBool = AtomicBool::new(false);
    CANCEL.store(false, Ordering::SeqCst);

    let mut scene = two_material_scene();
    // Rock gets two outputs; both must be saved even though the first save
    // requests cancellation.
    scene.materials[0] = material(
        "Rock",
        vec![
            ("Base Color", rgb(2, 2, [0.5, 0.5, 0.5])),
            ("Metallic", rgb(2, 2, [1.0, 0.0, 0.0])),
        ],
    );
    let mut store = MemoryStore {
        on_save: Some(Box::new(|| CANCEL.store(true, Ordering::SeqCst))),
        ..MemoryStore::default()
    };

    let report = batch(&scene, &small_config(), &mut NullRenderer, &mut store, Some(&CANCEL));

    assert!(report.cancelled);
    assert_eq!(report.packed.len(), 1);
    assert_eq!(report.packed[0].files.len(), 2);
    assert_eq!(store.saved.len(), 2);
}

#[test]
fn test_unselected_and_node_less_materials_are_skipped() {
    let mut scene = two_material_scene();
    scene.objects[1].selected = false;
    scene.materials[0].use_nodes = false;

    let report = batch(
        &scene,
        &small_config(),
        &mut NullRenderer,
        &mut MemoryStore::default(),
        None,
    );

    assert!(report.packed.is_empty());
    assert!(report.failures.is_empty());
}

#[test]
fn test_batch_exports_selected_meshes() {
    let scene = two_material_scene();
    let mut exporter = RecordingExporter::default();

    let report = run_batch(
        &scene,
        &small_config(),
        Path::new("out"),
        Collaborators {
            renderer: &mut NullRenderer,
            persistence: &mut MemoryStore::default(),
            exporter: Some(&mut exporter),
        },
        None,
    );

    assert_eq!(
        report.mesh_export,
        Some(MeshExportReport::Exported {
            path: Path::new("out").join("exported_meshes.glb")
        })
    );
    assert_eq!(
        exporter.exported[0].0,
        vec!["Boulder".to_string(), "Door".to_string()]
    );
}

#[test]
fn test_batch_writes_deterministic_pngs() {
    let dir = tempfile::tempdir().unwrap();
    let scene = two_material_scene();

    let run = || {
        run_batch(
            &scene,
            &small_config(),
            dir.path(),
            Collaborators {
                renderer: &mut NullRenderer,
                persistence: &mut PngFileWriter::default(),
                exporter: None,
            },
            None,
        )
    };
    let first = run();
    let second = run();

    assert_eq!(first, second);
    for file in first.packed.iter().flat_map(|m| &m.files) {
        let bytes = std::fs::read(&file.path).unwrap();
        assert_eq!(hash_png(&bytes), file.hash);
    }
}

#[test]
fn test_report_serializes_to_json() {
    let report = batch(
        &two_material_scene(),
        &small_config(),
        &mut NullRenderer,
        &mut MemoryStore::default(),
        None,
    );
    let json = serde_json::to_value(&report).unwrap();

    assert_eq!(json["packed"][1]["variant"], "Metal");
    assert_eq!(json["packed"][0]["files"][0]["color_space"], "srgb");
    assert_eq!(json["cancelled"], false);
}
