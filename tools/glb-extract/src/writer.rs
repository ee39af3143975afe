//! Buffered binary writer with a selectable byte order
//!
//! [`EndianWriter`] accumulates scalar and bulk writes in a fixed-capacity
//! buffer and hands it to the underlying sink whenever the next write would
//! not fit. Call [`EndianWriter::flush`] before reading byte counts off the
//! sink, and [`EndianWriter::finish`] when done.

use crate::error::{ExtractError, ExtractResult};
use std::io::{self, Write};

/// Default buffer capacity in bytes
pub const DEFAULT_CAPACITY: usize = 8 * 1024;

/// Smallest usable capacity: one 64-bit value must always fit.
const MIN_CAPACITY: usize = std::mem::size_of::<u64>();

/// Largest modified UTF-8 payload the 16-bit length prefix can describe
const MAX_UTF_LEN: usize = u16::MAX as usize;

/// Byte order used for multi-byte values
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ByteOrder {
    /// Least significant byte first (GLB)
    #[default]
    LittleEndian,
    /// Most significant byte first
    BigEndian,
}

impl ByteOrder {
    /// Byte order of the host
    pub const fn native() -> Self {
        if cfg!(target_endian = "little") {
            ByteOrder::LittleEndian
        } else {
            ByteOrder::BigEndian
        }
    }

    fn is_native(self) -> bool {
        self == Self::native()
    }
}

/// Fixed-width numeric value the writer can emit in either byte order.
///
/// `to_order` returns a value whose in-memory bytes are the requested
/// encoding; floats are converted through their raw bit pattern so every
/// value (NaN payloads included) is written losslessly.
pub trait Element: bytemuck::Pod {
    fn to_order(self, order: ByteOrder) -> Self;
}

macro_rules! impl_element_int {
    ($($ty:ty),*) => {
        $(impl Element for $ty {
            #[inline]
            fn to_order(self, order: ByteOrder) -> Self {
                match order {
                    ByteOrder::LittleEndian => self.to_le(),
                    ByteOrder::BigEndian => self.to_be(),
                }
            }
        })*
    };
}

impl_element_int!(u8, i8, u16, i16, u32, i32, u64, i64);

impl Element for f32 {
    #[inline]
    fn to_order(self, order: ByteOrder) -> Self {
        f32::from_bits(self.to_bits().to_order(order))
    }
}

impl Element for f64 {
    #[inline]
    fn to_order(self, order: ByteOrder) -> Self {
        f64::from_bits(self.to_bits().to_order(order))
    }
}

/// Buffered writer emitting values in a fixed byte order
pub struct EndianWriter<W: Write> {
    sink: W,
    buffer: Vec<u8>,
    capacity: usize,
    order: ByteOrder,
}

impl<W: Write> EndianWriter<W> {
    /// Create a writer with [`DEFAULT_CAPACITY`]
    pub fn new(sink: W, order: ByteOrder) -> Self {
        Self::with_capacity(sink, DEFAULT_CAPACITY, order)
    }

    /// Create a writer with a custom buffer capacity (clamped to at least 8 bytes)
    pub fn with_capacity(sink: W, capacity: usize, order: ByteOrder) -> Self {
        let capacity = capacity.max(MIN_CAPACITY);
        Self {
            sink,
            buffer: Vec::with_capacity(capacity),
            capacity,
            order,
        }
    }

    /// Byte order used for multi-byte writes
    pub fn order(&self) -> ByteOrder {
        self.order
    }

    /// Buffer capacity in bytes
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Number of bytes waiting to be flushed
    pub fn buffered(&self) -> usize {
        self.buffer.len()
    }

    /// Borrow the underlying sink (does not include buffered bytes)
    pub fn get_ref(&self) -> &W {
        &self.sink
    }

    /// Push all buffered bytes to the sink and reset the buffer
    pub fn flush(&mut self) -> io::Result<()> {
        if !self.buffer.is_empty() {
            self.sink.write_all(&self.buffer)?;
            self.buffer.clear();
        }
        Ok(())
    }

    /// Flush remaining bytes and return the sink
    pub fn finish(mut self) -> io::Result<W> {
        self.flush()?;
        self.sink.flush()?;
        Ok(self.sink)
    }

    fn ensure(&mut self, add: usize) -> io::Result<()> {
        if self.buffer.len() > self.capacity - add {
            self.flush()?;
        }
        Ok(())
    }

    /// Write one numeric value
    pub fn write_value<T: Element>(&mut self, value: T) -> io::Result<()> {
        self.ensure(std::mem::size_of::<T>())?;
        self.buffer
            .extend_from_slice(bytemuck::bytes_of(&value.to_order(self.order)));
        Ok(())
    }

    /// Write a contiguous run of numeric values.
    ///
    /// Copies as many elements as fit into the buffer, flushes, and continues
    /// until `src` is exhausted.
    pub fn write_slice<T: Element>(&mut self, src: &[T]) -> io::Result<()> {
        let size = std::mem::size_of::<T>();
        let mut rest = src;

        while !rest.is_empty() {
            let fit = (self.capacity - self.buffer.len()) / size;
            if fit == 0 {
                self.flush()?;
                continue;
            }

            let (head, tail) = rest.split_at(fit.min(rest.len()));
            if self.order.is_native() || size == 1 {
                self.buffer.extend_from_slice(bytemuck::cast_slice(head));
            } else {
                for &value in head {
                    self.buffer
                        .extend_from_slice(bytemuck::bytes_of(&value.to_order(self.order)));
                }
            }
            rest = tail;
        }

        Ok(())
    }

    pub fn write_u8(&mut self, v: u8) -> io::Result<()> {
        self.write_value(v)
    }

    pub fn write_i8(&mut self, v: i8) -> io::Result<()> {
        self.write_value(v)
    }

    /// Write a boolean as a single 1/0 byte
    pub fn write_bool(&mut self, v: bool) -> io::Result<()> {
        self.write_value(v as u8)
    }

    pub fn write_u16(&mut self, v: u16) -> io::Result<()> {
        self.write_value(v)
    }

    pub fn write_i16(&mut self, v: i16) -> io::Result<()> {
        self.write_value(v)
    }

    pub fn write_u32(&mut self, v: u32) -> io::Result<()> {
        self.write_value(v)
    }

    pub fn write_i32(&mut self, v: i32) -> io::Result<()> {
        self.write_value(v)
    }

    pub fn write_u64(&mut self, v: u64) -> io::Result<()> {
        self.write_value(v)
    }

    pub fn write_i64(&mut self, v: i64) -> io::Result<()> {
        self.write_value(v)
    }

    /// Write the raw bit pattern of an `f32`
    pub fn write_f32(&mut self, v: f32) -> io::Result<()> {
        self.write_value(v.to_bits())
    }

    /// Write the raw bit pattern of an `f64`
    pub fn write_f64(&mut self, v: f64) -> io::Result<()> {
        self.write_value(v.to_bits())
    }

    /// Write the low byte of every UTF-16 code unit of `s`
    pub fn write_low_bytes(&mut self, s: &str) -> io::Result<()> {
        for unit in s.encode_utf16() {
            self.write_u8(unit as u8)?;
        }
        Ok(())
    }

    /// Write every UTF-16 code unit of `s` as a 16-bit value
    pub fn write_chars(&mut self, s: &str) -> io::Result<()> {
        for unit in s.encode_utf16() {
            self.write_u16(unit)?;
        }
        Ok(())
    }

    /// Write `s` as modified UTF-8 with a 2-byte length prefix.
    ///
    /// The prefix is always most significant byte first, whatever the
    /// writer's byte order. NUL is encoded as `C0 80` and supplementary
    /// characters as two 3-byte surrogate encodings.
    pub fn write_utf(&mut self, s: &str) -> ExtractResult<()> {
        let len: usize = s.encode_utf16().map(modified_utf8_len).sum();
        if len > MAX_UTF_LEN {
            return Err(ExtractError::TextTooLong(len));
        }

        self.write_u8((len >> 8) as u8)?;
        self.write_u8(len as u8)?;

        for unit in s.encode_utf16() {
            match unit {
                0x0001..=0x007f => self.write_u8(unit as u8)?,
                0x0000 | 0x0080..=0x07ff => {
                    self.write_u8(0xc0 | ((unit >> 6) & 0x1f) as u8)?;
                    self.write_u8(0x80 | (unit & 0x3f) as u8)?;
                }
                _ => {
                    self.write_u8(0xe0 | ((unit >> 12) & 0x0f) as u8)?;
                    self.write_u8(0x80 | ((unit >> 6) & 0x3f) as u8)?;
                    self.write_u8(0x80 | (unit & 0x3f) as u8)?;
                }
            }
        }

        Ok(())
    }
}

fn modified_utf8_len(unit: u16) -> usize {
    match unit {
        0x0001..=0x007f => 1,
        0x0000 | 0x0080..=0x07ff => 2,
        _ => 3,
    }
}

impl<W: Write> Write for EndianWriter<W> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.write_slice(buf)?;
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        EndianWriter::flush(self)
    }
}
