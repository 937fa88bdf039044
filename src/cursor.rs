//! Bounds-checked reads over an immutable byte slice

use byteorder::{ByteOrder, NativeEndian};

use crate::error::{ReadError, Result};

/// A forward cursor over mapped bytes
///
/// Every read advances the position and fails with
/// [`ReadError::FileTruncation`] instead of reading past the end of the buffer.
#[derive(Debug, Clone, Copy)]
pub struct ByteCursor<'a> {
    buffer: &'a [u8],
    pos: usize,
}
impl<'a> ByteCursor<'a> {
    #[must_use]
    pub fn new(buffer: &'a [u8]) -> Self {
        Self { buffer, pos: 0 }
    }

    /// Creates a cursor positioned at `pos`
    pub fn at(buffer: &'a [u8], pos: usize) -> Result<Self> {
        let mut cursor = Self::new(buffer);
        cursor.seek(pos)?;
        Ok(cursor)
    }

    /// Current byte offset from the start of the buffer
    #[must_use]
    pub fn position(&self) -> usize {
        self.pos
    }

    pub fn seek(&mut self, pos: usize) -> Result<()> {
        if pos > self.buffer.len() {
            return Err(ReadError::FileTruncation(self.buffer.len()).into());
        }
        self.pos = pos;
        Ok(())
    }

    /// Returns the next `n` bytes and advances past them
    pub fn read_bytes(&mut self, n: usize) -> Result<&'a [u8]> {
        let end = self
            .pos
            .checked_add(n)
            .filter(|&end| end <= self.buffer.len())
            .ok_or(ReadError::FileTruncation(self.buffer.len()))?;
        let bytes = &self.buffer[self.pos..end];
        self.pos = end;
        Ok(bytes)
    }

    pub fn skip(&mut self, n: usize) -> Result<()> {
        self.read_bytes(n).map(|_| ())
    }

    pub fn read_u8(&mut self) -> Result<u8> {
        Ok(self.read_bytes(1)?[0])
    }

    /// Reads a 32-bit field in host byte order
    pub fn read_u32(&mut self) -> Result<u32> {
        Ok(NativeEndian::read_u32(self.read_bytes(4)?))
    }

    /// Reads `n` consecutive 32-bit fields
    pub fn read_u32_array(&mut self, n: usize) -> Result<Vec<u32>> {
        let len = n
            .checked_mul(4)
            .ok_or(ReadError::FileTruncation(self.buffer.len()))?;
        let bytes = self.read_bytes(len)?;
        Ok(bytes.chunks_exact(4).map(NativeEndian::read_u32).collect())
    }
}
