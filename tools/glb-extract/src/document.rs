//! glTF JSON document for a single mesh, node and scene
//!
//! Accessors, buffers, views, nodes and scenes are `gltf_json` types. Only the
//! mesh primitive is modelled here, because its attribute names are free-form
//! (custom aliases pass through unchanged) and must keep insertion order.

use gltf_json as json;
use gltf_json::validation::Checked::{self, Valid};
use serde::Serialize;
use serde_json::{Map, Value};

/// Top-level glTF document
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Root {
    pub accessors: Vec<json::Accessor>,
    pub asset: json::Asset,
    pub buffers: Vec<json::Buffer>,
    pub buffer_views: Vec<json::buffer::View>,
    pub meshes: Vec<Mesh>,
    pub nodes: Vec<json::Node>,
    pub scene: json::Index<json::Scene>,
    pub scenes: Vec<json::Scene>,
}

#[derive(Debug, Clone, Serialize)]
pub struct Mesh {
    pub primitives: Vec<Primitive>,
}

#[derive(Debug, Clone, Serialize)]
pub struct Primitive {
    /// glTF semantic -> accessor index, in attribute order
    pub attributes: Map<String, Value>,
    pub mode: Checked<json::mesh::Mode>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub indices: Option<json::Index<json::Accessor>>,
}

impl Root {
    /// Skeleton document: one buffer, one mesh with one primitive, one node, one scene
    pub fn single_mesh(mode: json::mesh::Mode, generator: Option<String>) -> Self {
        Self {
            accessors: Vec::new(),
            asset: json::Asset {
                copyright: None,
                extensions: Default::default(),
                extras: Default::default(),
                generator,
                min_version: None,
                version: "2.0".to_string(),
            },
            buffers: vec![json::Buffer {
                byte_length: 0u64.into(),
                extensions: Default::default(),
                extras: Default::default(),
                name: None,
                uri: None,
            }],
            buffer_views: Vec::new(),
            meshes: vec![Mesh {
                primitives: vec![Primitive {
                    attributes: Map::new(),
                    mode: Valid(mode),
                    indices: None,
                }],
            }],
            nodes: vec![json::Node {
                camera: None,
                children: None,
                extensions: Default::default(),
                extras: Default::default(),
                matrix: None,
                mesh: Some(json::Index::new(0)),
                name: None,
                rotation: None,
                scale: None,
                skin: None,
                translation: None,
                weights: None,
            }],
            scene: json::Index::new(0),
            scenes: vec![json::Scene {
                extensions: Default::default(),
                extras: Default::default(),
                name: None,
                nodes: vec![json::Index::new(0)],
            }],
        }
    }

    /// The only primitive of the only mesh
    pub fn primitive_mut(&mut self) -> &mut Primitive {
        &mut self.meshes[0].primitives[0]
    }

    /// Serialize to compact JSON text
    pub fn to_writer<W: std::io::Write>(&self, writer: W) -> serde_json::Result<()> {
        serde_json::to_writer(writer, self)
    }
}
