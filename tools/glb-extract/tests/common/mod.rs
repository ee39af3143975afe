//! Shared helpers for integration tests: container parsing and mesh fixtures.

#![allow(dead_code)]

use glb_extract::{ComponentType, RawMesh, VertexAttribute};
use serde_json::Value;

/// Header fields and chunk contents of a GLB container
pub struct ParsedGlb<'a> {
    pub version: u32,
    pub total_length: u32,
    pub json_length: u32,
    pub json_bytes: &'a [u8],
    pub bin_length: u32,
    pub bin_type: &'a [u8],
    pub bin: &'a [u8],
}

fn u32_at(bytes: &[u8], at: usize) -> u32 {
    u32::from_le_bytes(bytes[at..at + 4].try_into().expect("4 bytes"))
}

/// Split a container into header fields and chunks, asserting the chunk tags
pub fn parse_glb(bytes: &[u8]) -> ParsedGlb<'_> {
    assert_eq!(&bytes[0..4], b"glTF", "magic");
    assert_eq!(&bytes[16..20], b"JSON", "JSON chunk tag");

    let json_length = u32_at(bytes, 12);
    let json_end = 20 + json_length as usize;
    let bin_length = u32_at(bytes, json_end);
    let bin_start = json_end + 8;

    ParsedGlb {
        version: u32_at(bytes, 4),
        total_length: u32_at(bytes, 8),
        json_length,
        json_bytes: &bytes[20..json_end],
        bin_length,
        bin_type: &bytes[json_end + 4..bin_start],
        bin: &bytes[bin_start..bin_start + bin_length as usize],
    }
}

impl ParsedGlb<'_> {
    pub fn json(&self) -> Value {
        serde_json::from_slice(self.json_bytes).expect("JSON chunk should parse")
    }
}

/// Position + normalized RGBA8 color record (16 bytes)
#[repr(C)]
#[derive(Clone, Copy, bytemuck::Pod, bytemuck::Zeroable)]
pub struct PosColor {
    pub pos: [f32; 3],
    pub color: [u8; 4],
}

/// Three-vertex position/color triangle without indices
pub fn pos_color_triangle() -> RawMesh {
    let vertices = [
        PosColor {
            pos: [0.0, 0.0, 0.0],
            color: [255, 0, 0, 255],
        },
        PosColor {
            pos: [1.0, 0.0, 0.0],
            color: [0, 255, 0, 255],
        },
        PosColor {
            pos: [0.5, 1.0, 0.0],
            color: [0, 0, 255, 255],
        },
    ];
    RawMesh::new(vec![VertexAttribute::position3(), VertexAttribute::color()])
        .vertex_data(&vertices)
}

/// Unit quad with position, normal and UVs, indexed as two triangles
pub fn textured_quad() -> RawMesh {
    let vertices: [[f32; 8]; 4] = [
        [-0.5, -0.5, 0.0, 0.0, 0.0, 1.0, 0.0, 0.0],
        [0.5, -0.5, 0.0, 0.0, 0.0, 1.0, 1.0, 0.0],
        [0.5, 0.5, 0.0, 0.0, 0.0, 1.0, 1.0, 1.0],
        [-0.5, 0.5, 0.0, 0.0, 0.0, 1.0, 0.0, 1.0],
    ];
    RawMesh::new(vec![
        VertexAttribute::position3(),
        VertexAttribute::normal(),
        VertexAttribute::tex_coords(),
    ])
    .vertex_data(&vertices)
    .indices(&[0, 1, 2, 0, 2, 3])
}

/// Mesh with a custom u16 attribute whose record size is not a multiple of 4
pub fn odd_stride_mesh() -> RawMesh {
    let mut bytes = Vec::new();
    for (i, pos) in [[0.0f32, 0.0, 0.0], [2.0, 0.0, 0.0], [0.0, 3.0, 1.0]]
        .iter()
        .enumerate()
    {
        for v in pos {
            bytes.extend_from_slice(&v.to_ne_bytes());
        }
        bytes.extend_from_slice(&(i as u16 * 100).to_ne_bytes());
    }
    RawMesh::new(vec![
        VertexAttribute::position3(),
        VertexAttribute::new("a_id", ComponentType::U16, 1),
    ])
    .vertices(bytes)
    .indices(&[0, 1, 2])
}
