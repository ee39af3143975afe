//! GLB container framing and the top-level export entry points

use crate::accessor::{build_vertex_accessors, index_accessor, index_view, vertex_view};
use crate::document::Root;
use crate::error::{ExtractError, ExtractResult};
use crate::mesh::{MeshSource, VertexAttribute};
use crate::options::ExtractOptions;
use crate::packer::pack_buffers;
use crate::writer::{ByteOrder, EndianWriter};
use gltf_json as json;
use std::fs::OpenOptions;
use std::io::{self, Write};

/// "glTF"
pub const GLB_MAGIC: u32 = 0x4654_6C67;
/// Container format version
pub const GLB_VERSION: u32 = 2;
/// "JSON"
pub const CHUNK_JSON: u32 = 0x4E4F_534A;
/// "BIN\0"
pub const CHUNK_BIN: u32 = 0x004E_4942;

/// Bytes in the GLB header
pub const HEADER_LENGTH: usize = 12;
/// Bytes in each chunk header (length + type)
pub const CHUNK_HEADER_LENGTH: usize = 8;

/// Padding byte for the JSON chunk
const JSON_PADDING: u8 = 0x20;
/// Padding byte for the binary chunk
const BIN_PADDING: u8 = 0x00;

/// Export `mesh` to the file named by `options.output`.
///
/// Fails with [`ExtractError::DestinationExists`] if the path is taken and
/// with [`ExtractError::EmptyMesh`] if there is nothing to export; in both
/// cases nothing is written. The container is fully built in memory before
/// the file is created.
pub fn extract(mesh: &dyn MeshSource, options: &ExtractOptions) -> ExtractResult<()> {
    let path = &options.output;
    if path.try_exists()? {
        return Err(ExtractError::DestinationExists(path.clone()));
    }

    let glb = encode_glb(mesh, options)?;

    let mut file = OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(path)
        .map_err(|e| match e.kind() {
            io::ErrorKind::AlreadyExists => ExtractError::DestinationExists(path.clone()),
            _ => ExtractError::Io(e),
        })?;
    file.write_all(&glb)?;
    file.flush()?;

    tracing::info!(
        path = %path.display(),
        vertices = mesh.vertex_count(),
        indices = mesh.index_count(),
        bytes = glb.len(),
        "Exported mesh"
    );
    Ok(())
}

/// Encode `mesh` as a GLB container in memory
pub fn encode_glb(mesh: &dyn MeshSource, options: &ExtractOptions) -> ExtractResult<Vec<u8>> {
    let mut glb = Vec::new();
    extract_to_writer(mesh, options, &mut glb)?;
    Ok(glb)
}

/// Encode `mesh` as a GLB container and write it to `sink`.
///
/// Both chunks are assembled before the first byte reaches `sink`, since
/// the header needs their final lengths. Returns the total container length.
pub fn extract_to_writer<W: Write>(
    mesh: &dyn MeshSource,
    options: &ExtractOptions,
    sink: W,
) -> ExtractResult<usize> {
    if mesh.vertex_count() == 0 {
        return Err(ExtractError::EmptyMesh);
    }
    validate_buffers(mesh)?;

    let mut root = Root::single_mesh(options.render_mode, options.generator.clone());

    let vertex = build_vertex_accessors(mesh, options)?;
    root.accessors = vertex.accessors;
    root.primitive_mut().attributes = vertex.attributes;

    let mut bin = EndianWriter::new(Vec::new(), ByteOrder::LittleEndian);
    let sections = pack_buffers(mesh, &mut bin)?;
    root.buffer_views
        .push(vertex_view(sections.vertex_length, mesh.vertex_stride()));

    if let Some(index) = sections.index {
        root.buffer_views
            .push(index_view(index.byte_offset, index.byte_length));
        let accessor = json::Index::new(root.accessors.len() as u32);
        root.accessors.push(index_accessor(mesh.index_count()));
        root.primitive_mut().indices = Some(accessor);
    }

    pad_to_alignment(&mut bin, BIN_PADDING)?;
    let bin = bin.finish()?;
    root.buffers[0].byte_length = bin.len().into();

    let mut json = EndianWriter::new(Vec::new(), ByteOrder::LittleEndian);
    root.to_writer(&mut json)?;
    pad_to_alignment(&mut json, JSON_PADDING)?;
    let json = json.finish()?;

    let total =
        HEADER_LENGTH + CHUNK_HEADER_LENGTH + json.len() + CHUNK_HEADER_LENGTH + bin.len();
    let total_u32 = u32::try_from(total).map_err(|_| ExtractError::ContainerTooLarge(total))?;
    tracing::debug!(
        json_length = json.len(),
        bin_length = bin.len(),
        total,
        "Framing GLB container"
    );

    let mut out = EndianWriter::new(sink, ByteOrder::LittleEndian);
    out.write_u32(GLB_MAGIC)?;
    out.write_u32(GLB_VERSION)?;
    out.write_u32(total_u32)?;
    write_chunk(&mut out, CHUNK_JSON, &json)?;
    write_chunk(&mut out, CHUNK_BIN, &bin)?;
    out.finish()?;

    Ok(total)
}

/// Check the attribute layout against the stride and the raw byte views
/// against the declared counts.
///
/// Expected lengths saturate, so an absurd declared count reports a
/// mismatch instead of overflowing.
fn validate_buffers(mesh: &dyn MeshSource) -> ExtractResult<()> {
    let stride = mesh.vertex_stride();
    let layout: usize = mesh.attributes().iter().map(VertexAttribute::size).sum();
    if layout > stride {
        return Err(ExtractError::StrideTooSmall { layout, stride });
    }

    let expected = mesh.vertex_count().saturating_mul(stride);
    let actual = mesh.vertex_bytes().len();
    if actual != expected {
        return Err(ExtractError::BufferSizeMismatch {
            what: "vertex",
            expected,
            actual,
        });
    }

    if mesh.index_count() > 0 {
        let expected = mesh.index_count().saturating_mul(2);
        let actual = mesh.index_bytes().map_or(0, <[u8]>::len);
        if actual != expected {
            return Err(ExtractError::BufferSizeMismatch {
                what: "index",
                expected,
                actual,
            });
        }
    }

    Ok(())
}

/// Pad an in-memory accumulator to a 4-byte boundary with `fill`
fn pad_to_alignment(writer: &mut EndianWriter<Vec<u8>>, fill: u8) -> io::Result<()> {
    let len = writer.get_ref().len() + writer.buffered();
    for _ in 0..(4 - len % 4) % 4 {
        writer.write_u8(fill)?;
    }
    Ok(())
}

/// Write one length-prefixed, type-tagged chunk
fn write_chunk<W: Write>(
    out: &mut EndianWriter<W>,
    chunk_type: u32,
    data: &[u8],
) -> ExtractResult<()> {
    let length =
        u32::try_from(data.len()).map_err(|_| ExtractError::ContainerTooLarge(data.len()))?;
    out.write_u32(length)?;
    out.write_u32(chunk_type)?;
    out.write_slice(data)?;
    Ok(())
}
