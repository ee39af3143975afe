//! Accessor and buffer view construction for interleaved vertex data
//!
//! Every vertex attribute becomes one accessor into a single strided buffer
//! view. Accessor byte offsets are relative to the start of a vertex record,
//! not to the binary chunk.

use crate::error::{ExtractError, ExtractResult};
use crate::mesh::{MeshSource, VertexAttribute};
use crate::options::ExtractOptions;
use gltf_json as json;
use gltf_json::accessor::{ComponentType, GenericComponentType, Type};
use gltf_json::validation::Checked::Valid;
use serde_json::{Map, Value};

/// Buffer view index of the interleaved vertex data
pub const VERTEX_VIEW: u32 = 0;
/// Buffer view index of the index data, when present
pub const INDEX_VIEW: u32 = 1;

/// Element types an attribute can map to, by component count
const ELEMENT_TYPES: [Type; 4] = [Type::Scalar, Type::Vec2, Type::Vec3, Type::Vec4];

/// Accessors and primitive attributes for the vertex attributes of a mesh
#[derive(Debug, Clone)]
pub struct VertexAccessors {
    pub accessors: Vec<json::Accessor>,
    /// glTF semantic -> accessor index
    pub attributes: Map<String, Value>,
}

/// glTF element type for a component count
pub fn element_type(components: u8) -> Option<Type> {
    ELEMENT_TYPES
        .into_iter()
        .find(|ty| ty.multiplicity() == components as usize)
}

/// Build one accessor per vertex attribute.
///
/// The attribute named by `options.position_alias` additionally gets
/// per-component min/max bounds scanned from the vertex bytes.
pub fn build_vertex_accessors(
    mesh: &dyn MeshSource,
    options: &ExtractOptions,
) -> ExtractResult<VertexAccessors> {
    let vertex_count = mesh.vertex_count();
    let stride = mesh.vertex_stride();

    let mut accessors = Vec::with_capacity(mesh.attributes().len());
    let mut attributes = Map::new();
    let mut offset = 0usize;

    for attribute in mesh.attributes() {
        let type_ = element_type(attribute.components).ok_or_else(|| {
            ExtractError::UnsupportedAttributeShape {
                alias: attribute.alias.clone(),
                components: attribute.components,
            }
        })?;

        let (min, max) = if attribute.alias == options.position_alias {
            let (min, max) =
                compute_bounds(mesh.vertex_bytes(), stride, offset, attribute, vertex_count)?;
            (
                Some(bounds_json(attribute.component_type, &min)),
                Some(bounds_json(attribute.component_type, &max)),
            )
        } else {
            (None, None)
        };

        let index = accessors.len();
        accessors.push(json::Accessor {
            buffer_view: Some(json::Index::new(VERTEX_VIEW)),
            byte_offset: Some((offset as u64).into()),
            count: vertex_count.into(),
            component_type: Valid(GenericComponentType(attribute.component_type)),
            extensions: Default::default(),
            extras: Default::default(),
            type_: Valid(type_),
            min,
            max,
            name: None,
            normalized: attribute.normalized,
            sparse: None,
        });

        attributes.insert(
            options.semantic_for(&attribute.alias).to_string(),
            Value::from(index),
        );
        offset += attribute.size();
    }

    Ok(VertexAccessors {
        accessors,
        attributes,
    })
}

/// Per-component min/max of one attribute across all vertices.
///
/// Reads each component at its absolute offset in `bytes` (host byte
/// order). `bytes` must hold `vertex_count` records of `stride` bytes with
/// the attribute inside each record. NaN or infinite components fail with
/// [`ExtractError::NonFiniteComponent`], so the bounds are always finite and
/// attained by some vertex.
pub fn compute_bounds(
    bytes: &[u8],
    stride: usize,
    offset: usize,
    attribute: &VertexAttribute,
    vertex_count: usize,
) -> ExtractResult<(Vec<f64>, Vec<f64>)> {
    let components = attribute.components as usize;
    let width = attribute.component_type.size();
    let mut min = vec![f64::INFINITY; components];
    let mut max = vec![f64::NEG_INFINITY; components];

    for vertex in 0..vertex_count {
        let base = vertex * stride + offset;
        for c in 0..components {
            let value = read_component(bytes, base + c * width, attribute.component_type);
            if !value.is_finite() {
                return Err(ExtractError::NonFiniteComponent {
                    alias: attribute.alias.clone(),
                    vertex,
                    component: c,
                });
            }
            min[c] = min[c].min(value);
            max[c] = max[c].max(value);
        }
    }

    Ok((min, max))
}

/// Read one component at an absolute byte offset
fn read_component(bytes: &[u8], at: usize, ty: ComponentType) -> f64 {
    let raw = &bytes[at..at + ty.size()];
    match ty {
        ComponentType::I8 => raw[0] as i8 as f64,
        ComponentType::U8 => raw[0] as f64,
        ComponentType::I16 => bytemuck::pod_read_unaligned::<i16>(raw) as f64,
        ComponentType::U16 => bytemuck::pod_read_unaligned::<u16>(raw) as f64,
        ComponentType::U32 => bytemuck::pod_read_unaligned::<u32>(raw) as f64,
        ComponentType::F32 => bytemuck::pod_read_unaligned::<f32>(raw) as f64,
    }
}

/// Bounds as a JSON array in the attribute's own component type
fn bounds_json(ty: ComponentType, values: &[f64]) -> Value {
    Value::Array(
        values
            .iter()
            .map(|&v| match ty {
                ComponentType::F32 => Value::from(v as f32),
                _ => Value::from(v as i64),
            })
            .collect(),
    )
}

/// Strided view over all vertex records
pub fn vertex_view(byte_length: usize, stride: usize) -> json::buffer::View {
    json::buffer::View {
        buffer: json::Index::new(0),
        byte_length: byte_length.into(),
        byte_offset: Some(0u64.into()),
        byte_stride: Some(json::buffer::Stride(stride)),
        extensions: Default::default(),
        extras: Default::default(),
        name: None,
        target: Some(Valid(json::buffer::Target::ArrayBuffer)),
    }
}

/// View over the u16 index data that follows the vertex data
pub fn index_view(byte_offset: usize, byte_length: usize) -> json::buffer::View {
    json::buffer::View {
        buffer: json::Index::new(0),
        byte_length: byte_length.into(),
        byte_offset: Some((byte_offset as u64).into()),
        byte_stride: None,
        extensions: Default::default(),
        extras: Default::default(),
        name: None,
        target: Some(Valid(json::buffer::Target::ElementArrayBuffer)),
    }
}

/// Scalar u16 accessor over the index view
pub fn index_accessor(index_count: usize) -> json::Accessor {
    json::Accessor {
        buffer_view: Some(json::Index::new(INDEX_VIEW)),
        byte_offset: None,
        count: index_count.into(),
        component_type: Valid(GenericComponentType(ComponentType::U16)),
        extensions: Default::default(),
        extras: Default::default(),
        type_: Valid(Type::Scalar),
        min: None,
        max: None,
        name: None,
        normalized: false,
        sparse: None,
    }
}
