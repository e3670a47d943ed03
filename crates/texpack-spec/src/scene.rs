//! Scene manifest types.
//!
//! A manifest describes the host scene the packer works on: materials with
//! their shader node graphs, and the mesh objects that use them. Image
//! nodes reference PNG files by path, relative to the manifest.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors from structural manifest checks.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ManifestError {
    #[error("material '{material}' declares node '{node}' more than once")]
    DuplicateNode { material: String, node: String },

    #[error("material '{material}' links node '{node}', which does not exist")]
    UnknownNode { material: String, node: String },

    #[error("material name '{0}' is used more than once")]
    DuplicateMaterial(String),
}

/// Root of a scene manifest document.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SceneManifest {
    #[serde(default)]
    pub materials: Vec<MaterialDesc>,
    #[serde(default)]
    pub objects: Vec<ObjectDesc>,
}

/// A material and its shader graph.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MaterialDesc {
    pub name: String,
    /// Materials without node graphs are never packed.
    #[serde(default = "default_true")]
    pub use_nodes: bool,
    #[serde(default)]
    pub nodes: Vec<NodeDesc>,
    #[serde(default)]
    pub links: Vec<LinkDesc>,
}

/// Node type tags the packer distinguishes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeKind {
    /// Principal physically-based shader exposing the PBR input sockets.
    PrincipledBsdf,
    /// Bitmap source.
    ImageTexture,
    /// Anything else (mix, color ramp, math, normal map, ...).
    #[serde(other)]
    Utility,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeDesc {
    pub id: String,
    pub kind: NodeKind,
    /// Bound image, for `image_texture` nodes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<ImageRef>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageRef {
    /// Image datablock name, used for AO discovery.
    pub name: String,
    /// PNG path relative to the manifest.
    pub path: String,
}

/// A directed edge from a node's output to another node's input socket.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkDesc {
    pub from_node: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub from_socket: Option<String>,
    pub to_node: String,
    pub to_socket: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ObjectKind {
    #[default]
    Mesh,
    #[serde(other)]
    Other,
}

/// A scene object and the materials in its slots.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ObjectDesc {
    pub name: String,
    #[serde(default)]
    pub kind: ObjectKind,
    #[serde(default = "default_true")]
    pub selected: bool,
    #[serde(default = "default_true")]
    pub has_uv_map: bool,
    #[serde(default)]
    pub materials: Vec<String>,
}

fn default_true() -> bool {
    true
}

impl SceneManifest {
    /// Parse a manifest from JSON.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Serialize to pretty JSON.
    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Check node id uniqueness, link endpoints, and material name uniqueness.
    pub fn validate(&self) -> Result<(), ManifestError> {
        let mut material_names = HashSet::new();
        for material in &self.materials {
            if !material_names.insert(material.name.as_str()) {
                return Err(ManifestError::DuplicateMaterial(material.name.clone()));
            }

            let mut ids = HashSet::new();
            for node in &material.nodes {
                if !ids.insert(node.id.as_str()) {
                    return Err(ManifestError::DuplicateNode {
                        material: material.name.clone(),
                        node: node.id.clone(),
                    });
                }
            }
            for link in &material.links {
                for endpoint in [&link.from_node, &link.to_node] {
                    if !ids.contains(endpoint.as_str()) {
                        return Err(ManifestError::UnknownNode {
                            material: material.name.clone(),
                            node: endpoint.clone(),
                        });
                    }
                }
            }
        }
        Ok(())
    }

    /// All material names in declaration order.
    pub fn material_names(&self) -> Vec<String> {
        self.materials.iter().map(|m| m.name.clone()).collect()
    }

    pub fn material(&self, name: &str) -> Option<&MaterialDesc> {
        self.materials.iter().find(|m| m.name == name)
    }

    /// Rename a material and every object slot that references it.
    ///
    /// Returns `false` if no material has the old name.
    pub fn rename_material(&mut self, from: &str, to: &str) -> bool {
        let Some(material) = self.materials.iter_mut().find(|m| m.name == from) else {
            return false;
        };
        material.name = to.to_string();

        for object in &mut self.objects {
            for slot in &mut object.materials {
                if slot == from {
                    *slot = to.to_string();
                }
            }
        }
        true
    }
}
