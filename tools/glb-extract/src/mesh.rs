//! Mesh input: vertex attribute layout and raw vertex/index data

use gltf_json::accessor::ComponentType;

/// Alias of the 3-component position attribute
pub const POSITION: &str = "position";
/// Alias of the packed RGBA color attribute
pub const COLOR: &str = "color";
/// Alias of the normal attribute
pub const NORMAL: &str = "normal";
/// Alias of the first texture coordinate attribute
pub const TEX_COORDS: &str = "texCoords";

/// Every component type a vertex attribute may use
pub const COMPONENT_TYPES: [ComponentType; 6] = [
    ComponentType::I8,
    ComponentType::U8,
    ComponentType::I16,
    ComponentType::U16,
    ComponentType::U32,
    ComponentType::F32,
];

/// Parse a component type from its GL enum value
pub fn component_type_from_gl(code: u32) -> Option<ComponentType> {
    COMPONENT_TYPES
        .into_iter()
        .find(|ty| ty.as_gl_enum() == code)
}

/// Parse a component type from a short name (`f32`, `u8`, ...)
pub fn component_type_from_name(name: &str) -> Option<ComponentType> {
    Some(match name.to_ascii_lowercase().as_str() {
        "i8" | "byte" => ComponentType::I8,
        "u8" | "ubyte" | "unsigned_byte" => ComponentType::U8,
        "i16" | "short" => ComponentType::I16,
        "u16" | "ushort" | "unsigned_short" => ComponentType::U16,
        "u32" | "uint" | "unsigned_int" => ComponentType::U32,
        "f32" | "float" => ComponentType::F32,
        _ => return None,
    })
}

/// One attribute of an interleaved vertex record
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VertexAttribute {
    /// Host-side name, mapped to a glTF semantic at export time
    pub alias: String,
    pub component_type: ComponentType,
    /// Number of components (1-4 for exportable attributes)
    pub components: u8,
    /// Integer values are normalized to [0, 1] / [-1, 1]
    pub normalized: bool,
}

impl VertexAttribute {
    pub fn new(alias: impl Into<String>, component_type: ComponentType, components: u8) -> Self {
        Self {
            alias: alias.into(),
            component_type,
            components,
            normalized: false,
        }
    }

    /// Mark integer components as normalized
    pub fn normalized(mut self) -> Self {
        self.normalized = true;
        self
    }

    /// 3 x f32 position
    pub fn position3() -> Self {
        Self::new(POSITION, ComponentType::F32, 3)
    }

    /// 4 x u8 normalized color
    pub fn color() -> Self {
        Self::new(COLOR, ComponentType::U8, 4).normalized()
    }

    /// 3 x f32 normal
    pub fn normal() -> Self {
        Self::new(NORMAL, ComponentType::F32, 3)
    }

    /// 2 x f32 texture coordinates
    pub fn tex_coords() -> Self {
        Self::new(TEX_COORDS, ComponentType::F32, 2)
    }

    /// Size of one element in bytes (components x component width)
    pub fn size(&self) -> usize {
        self.components as usize * self.component_type.size()
    }
}

/// Read-only view of a mesh owned by the host.
///
/// Vertex and index bytes are in host byte order. Implementations must not
/// change while an export is reading them.
pub trait MeshSource {
    /// Attributes in interleaved order
    fn attributes(&self) -> &[VertexAttribute];

    fn vertex_count(&self) -> usize;

    /// Number of 16-bit indices (0 if unindexed)
    fn index_count(&self) -> usize;

    /// Raw vertex bytes, `vertex_count * vertex_stride` long
    fn vertex_bytes(&self) -> &[u8];

    /// Raw 16-bit index bytes; `None` when the mesh is unindexed
    fn index_bytes(&self) -> Option<&[u8]>;

    /// Bytes per vertex record
    fn vertex_stride(&self) -> usize {
        self.attributes().iter().map(VertexAttribute::size).sum()
    }
}

impl<M: MeshSource + ?Sized> MeshSource for &M {
    fn attributes(&self) -> &[VertexAttribute] {
        (**self).attributes()
    }

    fn vertex_count(&self) -> usize {
        (**self).vertex_count()
    }

    fn index_count(&self) -> usize {
        (**self).index_count()
    }

    fn vertex_bytes(&self) -> &[u8] {
        (**self).vertex_bytes()
    }

    fn index_bytes(&self) -> Option<&[u8]> {
        (**self).index_bytes()
    }

    fn vertex_stride(&self) -> usize {
        (**self).vertex_stride()
    }
}

/// In-memory mesh with interleaved vertex bytes and u16 indices
#[derive(Debug, Clone, Default)]
pub struct RawMesh {
    attributes: Vec<VertexAttribute>,
    vertex_count: usize,
    vertices: Vec<u8>,
    indices: Vec<u16>,
}

impl RawMesh {
    pub fn new(attributes: Vec<VertexAttribute>) -> Self {
        Self {
            attributes,
            ..Default::default()
        }
    }

    /// Set raw interleaved vertex bytes; the vertex count is derived from the stride
    pub fn vertices(mut self, bytes: impl Into<Vec<u8>>) -> Self {
        self.vertices = bytes.into();
        let stride = self.vertex_stride();
        self.vertex_count = if stride == 0 {
            0
        } else {
            self.vertices.len() / stride
        };
        self
    }

    /// Set interleaved vertex data from any plain-old-data records
    pub fn vertex_data<T: bytemuck::Pod>(self, records: &[T]) -> Self {
        self.vertices(bytemuck::cast_slice::<T, u8>(records).to_vec())
    }

    /// Override the derived vertex count
    pub fn with_vertex_count(mut self, count: usize) -> Self {
        self.vertex_count = count;
        self
    }

    /// Set 16-bit indices
    pub fn indices(mut self, indices: &[u16]) -> Self {
        self.indices = indices.to_vec();
        self
    }
}

impl MeshSource for RawMesh {
    fn attributes(&self) -> &[VertexAttribute] {
        &self.attributes
    }

    fn vertex_count(&self) -> usize {
        self.vertex_count
    }

    fn index_count(&self) -> usize {
        self.indices.len()
    }

    fn vertex_bytes(&self) -> &[u8] {
        &self.vertices
    }

    fn index_bytes(&self) -> Option<&[u8]> {
        if self.indices.is_empty() {
            None
        } else {
            Some(bytemuck::cast_slice(&self.indices))
        }
    }
}
