//! Mesh manifest parsing
//!
//! A manifest describes a raw mesh dump on disk so the CLI can export it:
//!
//! ```toml
//! vertices = "cube.vtx"   # interleaved vertex bytes, host byte order
//! indices = "cube.idx"    # optional little-endian u16 indices
//!
//! [[attributes]]
//! alias = "position"
//! component_type = "f32"
//! components = 3
//!
//! [[attributes]]
//! alias = "color"
//! component_type = 5121
//! components = 4
//! normalized = true
//!
//! [options]
//! mode = "triangles"
//! attribute_map = { a_uv = "TEXCOORD_0" }
//! ```

use crate::mesh::{RawMesh, VertexAttribute, component_type_from_gl, component_type_from_name};
use crate::options::{ExtractOptions, parse_mode};
use anyhow::{Context, Result, bail};
use gltf_json::accessor::ComponentType;
use hashbrown::HashMap;
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Mesh manifest structure
#[derive(Debug, Deserialize)]
pub struct MeshManifest {
    /// Raw interleaved vertex data
    pub vertices: PathBuf,
    /// Raw u16 index data
    #[serde(default)]
    pub indices: Option<PathBuf>,
    /// Expected vertex count; derived from the file size when omitted
    #[serde(default)]
    pub vertex_count: Option<usize>,
    pub attributes: Vec<AttributeEntry>,
    #[serde(default)]
    pub options: OptionsSection,
}

/// One `[[attributes]]` entry
#[derive(Debug, Deserialize)]
pub struct AttributeEntry {
    pub alias: String,
    pub component_type: ComponentTypeEntry,
    pub components: u8,
    #[serde(default)]
    pub normalized: bool,
}

/// Component type by name (`"f32"`) or GL enum value (`5126`)
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum ComponentTypeEntry {
    Code(u32),
    Name(String),
}

impl ComponentTypeEntry {
    fn resolve(&self) -> Option<ComponentType> {
        match self {
            ComponentTypeEntry::Code(code) => component_type_from_gl(*code),
            ComponentTypeEntry::Name(name) => component_type_from_name(name),
        }
    }
}

/// Export options stored alongside the mesh
#[derive(Debug, Default, Deserialize)]
pub struct OptionsSection {
    pub output: Option<PathBuf>,
    pub mode: Option<String>,
    pub position_alias: Option<String>,
    #[serde(default)]
    pub attribute_map: HashMap<String, String>,
}

impl MeshManifest {
    /// Load manifest from file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read manifest: {}", path.display()))?;
        Self::parse(&content)
    }

    /// Parse manifest from string
    pub fn parse(content: &str) -> Result<Self> {
        toml::from_str(content).context("Failed to parse mesh manifest")
    }

    /// Resolved vertex attributes
    pub fn vertex_attributes(&self) -> Result<Vec<VertexAttribute>> {
        self.attributes
            .iter()
            .map(|entry| {
                let Some(component_type) = entry.component_type.resolve() else {
                    bail!(
                        "Attribute '{}' has unknown component type {:?}",
                        entry.alias,
                        entry.component_type
                    );
                };
                Ok(VertexAttribute {
                    alias: entry.alias.clone(),
                    component_type,
                    components: entry.components,
                    normalized: entry.normalized,
                })
            })
            .collect()
    }

    /// Read the raw vertex and index files (relative to `base_dir`) into a mesh
    pub fn load_mesh(&self, base_dir: &Path) -> Result<RawMesh> {
        let vertices_path = base_dir.join(&self.vertices);
        let vertices = std::fs::read(&vertices_path)
            .with_context(|| format!("Failed to read vertices: {}", vertices_path.display()))?;

        let mut mesh = RawMesh::new(self.vertex_attributes()?).vertices(vertices);
        if let Some(count) = self.vertex_count {
            mesh = mesh.with_vertex_count(count);
        }

        if let Some(indices) = &self.indices {
            let indices_path = base_dir.join(indices);
            let bytes = std::fs::read(&indices_path)
                .with_context(|| format!("Failed to read indices: {}", indices_path.display()))?;
            if bytes.len() % 2 != 0 {
                bail!(
                    "Index file {} has odd length {}",
                    indices_path.display(),
                    bytes.len()
                );
            }
            let indices: Vec<u16> = bytes
                .chunks_exact(2)
                .map(|b| u16::from_le_bytes([b[0], b[1]]))
                .collect();
            mesh = mesh.indices(&indices);
        }

        Ok(mesh)
    }

    /// Apply the `[options]` section on top of `options`
    pub fn apply_options(
        &self,
        mut options: ExtractOptions,
        base_dir: &Path,
    ) -> Result<ExtractOptions> {
        let section = &self.options;
        if let Some(output) = &section.output {
            options.output = base_dir.join(output);
        }
        if let Some(mode) = &section.mode {
            options.render_mode =
                parse_mode(mode).with_context(|| format!("Unknown primitive mode: {mode}"))?;
        }
        if let Some(alias) = &section.position_alias {
            options.position_alias = alias.clone();
        }
        for (alias, semantic) in &section.attribute_map {
            options.attribute_map.insert(alias.clone(), semantic.clone());
        }
        Ok(options)
    }
}
