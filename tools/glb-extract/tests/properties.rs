//! Property tests for container framing and bounds

mod common;

use common::parse_glb;
use glb_extract::mesh::COMPONENT_TYPES;
use glb_extract::{ExtractOptions, RawMesh, VertexAttribute, encode_glb};
use proptest::prelude::*;

fn finite_position() -> impl Strategy<Value = [f32; 3]> {
    prop::array::uniform3(-1.0e6f32..1.0e6)
}

/// Custom attribute of any component type and shape; never the position alias
fn attribute() -> impl Strategy<Value = VertexAttribute> {
    (prop::sample::select(COMPONENT_TYPES.to_vec()), 1u8..=4, any::<bool>()).prop_map(
        |(component_type, components, normalized)| VertexAttribute {
            alias: String::new(),
            component_type,
            components,
            normalized,
        },
    )
}

/// Attribute list, matching random vertex bytes, and random indices
fn interleaved_mesh() -> impl Strategy<Value = (Vec<VertexAttribute>, Vec<u8>, Vec<u16>)> {
    (
        prop::collection::vec(attribute(), 1..6),
        1usize..16,
        prop::collection::vec(any::<u16>(), 0..33),
    )
        .prop_flat_map(|(attributes, vertex_count, indices)| {
            let attributes: Vec<VertexAttribute> = attributes
                .into_iter()
                .enumerate()
                .map(|(i, attribute)| VertexAttribute {
                    alias: format!("_ATTR{i}"),
                    ..attribute
                })
                .collect();
            let stride: usize = attributes.iter().map(VertexAttribute::size).sum();
            (
                Just(attributes),
                prop::collection::vec(any::<u8>(), vertex_count * stride),
                Just(indices),
            )
        })
}

fn build_mesh(attributes: &[VertexAttribute], vertices: &[u8], indices: &[u16]) -> RawMesh {
    let mesh = RawMesh::new(attributes.to_vec()).vertices(vertices.to_vec());
    if indices.is_empty() {
        mesh
    } else {
        mesh.indices(indices)
    }
}

proptest! {
    #[test]
    fn framing_is_consistent(
        positions in prop::collection::vec(finite_position(), 1..64),
        indices in prop::collection::vec(any::<u16>(), 0..97),
    ) {
        let mut mesh = RawMesh::new(vec![VertexAttribute::position3()]).vertex_data(&positions);
        if !indices.is_empty() {
            mesh = mesh.indices(&indices);
        }
        let glb = encode_glb(&mesh, &ExtractOptions::default()).unwrap();
        let parsed = parse_glb(&glb);

        prop_assert_eq!(parsed.total_length as usize, glb.len());
        prop_assert_eq!(glb.len() % 4, 0);
        prop_assert_eq!(parsed.json_length % 4, 0);
        prop_assert_eq!(parsed.bin_length % 4, 0);

        let raw_length = positions.len() * 12 + indices.len() * 2;
        prop_assert!(parsed.bin_length as usize >= raw_length);
        prop_assert!((parsed.bin_length as usize) < raw_length + 4);

        let json = parsed.json();
        prop_assert_eq!(json["buffers"][0]["byteLength"].as_u64(), Some(parsed.bin_length as u64));
        let views = json["bufferViews"].as_array().unwrap().len();
        prop_assert_eq!(views, if indices.is_empty() { 1 } else { 2 });
    }

    #[test]
    fn bounds_enclose_every_position(
        positions in prop::collection::vec(finite_position(), 1..64),
    ) {
        let mesh = RawMesh::new(vec![VertexAttribute::position3()]).vertex_data(&positions);
        let glb = encode_glb(&mesh, &ExtractOptions::default()).unwrap();
        let json = parse_glb(&glb).json();

        let min: Vec<f64> = json["accessors"][0]["min"]
            .as_array()
            .unwrap()
            .iter()
            .map(|v| v.as_f64().unwrap())
            .collect();
        let max: Vec<f64> = json["accessors"][0]["max"]
            .as_array()
            .unwrap()
            .iter()
            .map(|v| v.as_f64().unwrap())
            .collect();

        for c in 0..3 {
            let expected_min = positions.iter().map(|p| p[c]).fold(f32::INFINITY, f32::min);
            let expected_max = positions.iter().map(|p| p[c]).fold(f32::NEG_INFINITY, f32::max);
            prop_assert_eq!(min[c] as f32, expected_min);
            prop_assert_eq!(max[c] as f32, expected_max);
        }
    }

    #[test]
    fn byte_offsets_follow_attribute_sizes(
        (attributes, vertices, indices) in interleaved_mesh(),
    ) {
        let mesh = build_mesh(&attributes, &vertices, &indices);
        let glb = encode_glb(&mesh, &ExtractOptions::default()).unwrap();
        let json = parse_glb(&glb).json();
        let accessors = json["accessors"].as_array().unwrap();

        let mut expected_offset = 0usize;
        for (i, attribute) in attributes.iter().enumerate() {
            prop_assert_eq!(accessors[i]["byteOffset"].as_u64(), Some(expected_offset as u64));
            prop_assert_eq!(json["meshes"][0]["primitives"][0]["attributes"][&attribute.alias].as_u64(), Some(i as u64));
            expected_offset += attribute.size();
        }

        let stride = json["bufferViews"][0]["byteStride"].as_u64().unwrap() as usize;
        prop_assert_eq!(expected_offset, stride);
        let vertex_count = vertices.len() / stride;
        prop_assert!(accessors[..attributes.len()]
            .iter()
            .all(|a| a["count"].as_u64() == Some(vertex_count as u64)));
    }

    #[test]
    fn binary_sections_round_trip(
        (attributes, vertices, indices) in interleaved_mesh(),
    ) {
        let mesh = build_mesh(&attributes, &vertices, &indices);
        let glb = encode_glb(&mesh, &ExtractOptions::default()).unwrap();
        let parsed = parse_glb(&glb);
        let json = parsed.json();

        let vertex_length = json["bufferViews"][0]["byteLength"].as_u64().unwrap() as usize;
        prop_assert_eq!(vertex_length, vertices.len());

        // Whole 32-bit words are little-endian in the file; trailing bytes are copied
        let section = &parsed.bin[..vertex_length];
        let whole = vertex_length - vertex_length % 4;
        let mut restored: Vec<u8> = section[..whole]
            .chunks_exact(4)
            .flat_map(|w| u32::from_le_bytes([w[0], w[1], w[2], w[3]]).to_ne_bytes())
            .collect();
        restored.extend_from_slice(&section[whole..]);
        prop_assert_eq!(restored, vertices);

        if indices.is_empty() {
            prop_assert_eq!(json["bufferViews"].as_array().unwrap().len(), 1);
            prop_assert!(json["meshes"][0]["primitives"][0].get("indices").is_none());
        } else {
            let view = &json["bufferViews"][1];
            let offset = view["byteOffset"].as_u64().unwrap() as usize;
            let length = view["byteLength"].as_u64().unwrap() as usize;
            prop_assert_eq!(offset, vertex_length);
            prop_assert_eq!(length, indices.len() * 2);

            let restored: Vec<u16> = parsed.bin[offset..offset + length]
                .chunks_exact(2)
                .map(|b| u16::from_le_bytes([b[0], b[1]]))
                .collect();
            prop_assert_eq!(restored, indices);
        }
    }
}
