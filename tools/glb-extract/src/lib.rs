//! Mesh export to glTF 2.0 binary (.glb) containers
//!
//! Takes a mesh with interleaved vertex attributes and optional u16 indices
//! and writes a single self-contained GLB file:
//! - EndianWriter: Buffered binary writer with a selectable byte order
//! - build_vertex_accessors: One accessor per attribute into a strided buffer view
//! - pack_buffers: Vertex bytes, then index bytes, into the binary chunk
//! - extract: JSON + binary chunks framed in the GLB header
//!
//! # Example
//!
//! ```no_run
//! use glb_extract::*;
//!
//! let mesh = RawMesh::new(vec![VertexAttribute::position3()])
//!     .vertex_data(&[[0.0f32, 0.0, 0.0], [1.0, 0.0, 0.0], [0.5, 1.0, 0.0]])
//!     .indices(&[0, 1, 2]);
//!
//! let options = ExtractOptions::new().with_output("triangle.glb");
//! extract(&mesh, &options)?;
//! # Ok::<(), ExtractError>(())
//! ```

pub mod accessor;
pub mod document;
pub mod error;
pub mod glb;
pub mod manifest;
pub mod mesh;
pub mod options;
pub mod packer;
pub mod writer;

pub use accessor::{VertexAccessors, build_vertex_accessors, compute_bounds};
pub use error::{ExtractError, ExtractResult};
pub use glb::{encode_glb, extract, extract_to_writer};
pub use manifest::MeshManifest;
pub use mesh::{MeshSource, RawMesh, VertexAttribute};
pub use options::ExtractOptions;
pub use packer::{PackedSections, pack_buffers};
pub use writer::{ByteOrder, EndianWriter};

// Re-export the glTF enums used in the public API
pub use gltf_json::accessor::ComponentType;
pub use gltf_json::mesh::Mode;
