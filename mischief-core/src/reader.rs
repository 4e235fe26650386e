//! Little-endian reader for the decompressed `.art` payload.
//!
//! The payload is a flat record stream: 32-bit little-endian integers,
//! 32-bit floats (mostly in 4x4 matrices and point arrays), 3-byte colors,
//! and fixed-width NUL-padded UTF-8 strings. `ByteReader` tracks its
//! position so parse errors can report the exact payload offset.

use crate::error::{MischiefError, Result};

/// A 4x4 float matrix, stored as four rows of four columns.
pub type Matrix4 = [[f32; 4]; 4];

/// The identity 4x4 matrix.
pub const MATRIX4_IDENTITY: Matrix4 = [
    [1.0, 0.0, 0.0, 0.0],
    [0.0, 1.0, 0.0, 0.0],
    [0.0, 0.0, 1.0, 0.0],
    [0.0, 0.0, 0.0, 1.0],
];

/// Position-tracked little-endian reader over a byte slice.
#[derive(Debug, Clone)]
pub struct ByteReader<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> ByteReader<'a> {
    /// Create a reader over the whole slice.
    pub fn new(data: &'a [u8]) -> Self {
        Self { data, pos: 0 }
    }

    /// Current offset from the start of the slice.
    pub fn position(&self) -> usize {
        self.pos
    }

    /// Number of unread bytes.
    pub fn remaining(&self) -> usize {
        self.data.len() - self.pos
    }

    /// Check whether the reader has been fully consumed.
    pub fn is_empty(&self) -> bool {
        self.pos == self.data.len()
    }

    /// Consume `count` bytes and return them as a subslice.
    pub fn read_bytes(&mut self, count: usize) -> Result<&'a [u8]> {
        if self.remaining() < count {
            return Err(MischiefError::unexpected_eof(
                count - self.remaining(),
                self.pos,
            ));
        }
        let slice = &self.data[self.pos..self.pos + count];
        self.pos += count;
        Ok(slice)
    }

    /// Read a single byte.
    pub fn read_u8(&mut self) -> Result<u8> {
        Ok(self.read_bytes(1)?[0])
    }

    /// Read a 32-bit little-endian unsigned integer.
    pub fn read_u32(&mut self) -> Result<u32> {
        let bytes = self.read_bytes(4)?;
        Ok(u32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]))
    }

    /// Read a 32-bit little-endian float.
    pub fn read_f32(&mut self) -> Result<f32> {
        let bytes = self.read_bytes(4)?;
        Ok(f32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]))
    }

    /// Read `count` consecutive 32-bit integers.
    pub fn read_u32_array(&mut self, count: usize) -> Result<Vec<u32>> {
        let mut values = Vec::with_capacity(count);
        for _ in 0..count {
            values.push(self.read_u32()?);
        }
        Ok(values)
    }

    /// Read `count` consecutive floats.
    pub fn read_f32_array(&mut self, count: usize) -> Result<Vec<f32>> {
        let mut values = Vec::with_capacity(count);
        for _ in 0..count {
            values.push(self.read_f32()?);
        }
        Ok(values)
    }

    /// Read a 4x4 float matrix (16 floats, row-major).
    pub fn read_matrix(&mut self) -> Result<Matrix4> {
        let mut matrix = [[0.0f32; 4]; 4];
        for row in &mut matrix {
            for cell in row.iter_mut() {
                *cell = self.read_f32()?;
            }
        }
        Ok(matrix)
    }

    /// Read a 3-byte RGB color.
    pub fn read_color(&mut self) -> Result<[u8; 3]> {
        let bytes = self.read_bytes(3)?;
        Ok([bytes[0], bytes[1], bytes[2]])
    }

    /// Read a fixed-width NUL-padded UTF-8 string field.
    ///
    /// The field always occupies `width` bytes; the value ends at the first
    /// NUL byte (or the full width if none is present).
    pub fn read_string(&mut self, width: usize) -> Result<String> {
        let start = self.pos;
        let raw = self.read_bytes(width)?;
        let end = raw.iter().position(|&b| b == 0).unwrap_or(width);
        std::str::from_utf8(&raw[..end])
            .map(str::to_owned)
            .map_err(|_| MischiefError::invalid_string(start))
    }
}
