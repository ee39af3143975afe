//! Binary chunk packing: vertex data first, then index data

use crate::mesh::MeshSource;
use crate::writer::{Element, EndianWriter};
use std::io::{self, Write};

/// Byte ranges written to the binary accumulator
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PackedSections {
    /// Length of the vertex section (starts at offset 0)
    pub vertex_length: usize,
    /// Index section, present only for indexed meshes
    pub index: Option<IndexSection>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IndexSection {
    pub byte_offset: usize,
    pub byte_length: usize,
}

/// Write the vertex bytes (as f32 values) and index bytes (as u16 values)
/// of `mesh` into `bin`, flushing after each section so the lengths are exact.
pub fn pack_buffers(
    mesh: &dyn MeshSource,
    bin: &mut EndianWriter<Vec<u8>>,
) -> io::Result<PackedSections> {
    bin.flush()?;
    let start = bin.get_ref().len();

    write_reinterpreted::<f32, _>(bin, mesh.vertex_bytes())?;
    bin.flush()?;
    let vertex_end = bin.get_ref().len();

    let index = match mesh.index_bytes() {
        Some(bytes) if mesh.index_count() > 0 => {
            write_reinterpreted::<u16, _>(bin, bytes)?;
            bin.flush()?;
            let index_end = bin.get_ref().len();
            Some(IndexSection {
                byte_offset: vertex_end - start,
                byte_length: index_end - vertex_end,
            })
        }
        _ => None,
    };

    let sections = PackedSections {
        vertex_length: vertex_end - start,
        index,
    };
    tracing::debug!(?sections, "Packed binary chunk");
    Ok(sections)
}

/// Write host-order `bytes` as a run of `T` values in the writer's byte order.
///
/// Trailing bytes that do not fill a whole `T` are copied unchanged.
fn write_reinterpreted<T: Element, W: Write>(
    writer: &mut EndianWriter<W>,
    bytes: &[u8],
) -> io::Result<()> {
    let size = std::mem::size_of::<T>();
    let (whole, tail) = bytes.split_at(bytes.len() - bytes.len() % size);

    match bytemuck::try_cast_slice::<u8, T>(whole) {
        Ok(values) => writer.write_slice(values)?,
        Err(_) => {
            // Unaligned source
            let values: Vec<T> = whole
                .chunks_exact(size)
                .map(bytemuck::pod_read_unaligned::<T>)
                .collect();
            writer.write_slice(&values)?;
        }
    }

    writer.write_slice(tail)
}
