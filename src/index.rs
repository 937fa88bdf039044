//! Sequence index for 2bit files
//!
//! The index directly follows the header and holds one entry per sequence:
//!
//! | Size (bytes) | Name        | Description                               |
//! | ------------ | ----------- | ----------------------------------------- |
//! | 1            | name_size   | Length of the sequence name               |
//! | name_size    | name        | Sequence name (not terminated)            |
//! | 4            | offset      | Absolute byte offset of the record        |
//!
//! Each record starts with its own header:
//!
//! | Size (bytes)   | Name            | Description                         |
//! | -------------- | --------------- | ----------------------------------- |
//! | 4              | dna_size        | Number of bases                     |
//! | 4              | n_block_count   | Number of N-blocks                  |
//! | 4 * n          | n_block_starts  | Zero-based block starts             |
//! | 4 * n          | n_block_sizes   | Block lengths                       |
//! | 4              | mask_block_count| Number of soft-mask blocks          |
//! | 8 * m          | mask blocks     | Starts and sizes (skipped)          |
//! | 4              | reserved        | Skipped                             |
//! | ceil(size / 4) | packed dna      | 2 bits per base                     |

use std::collections::HashMap;

use log::trace;

use crate::cursor::ByteCursor;
use crate::error::{IndexError, ReadError, Result};
use crate::header::SIZE_HEADER;

/// Name length byte, a one-byte name and the record offset
const MIN_INDEX_ENTRY_SIZE: usize = 1 + 1 + 4;

/// A run of unknown bases, `[start, start + size)`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NBlock {
    pub start: u32,
    pub size: u32,
}
impl NBlock {
    #[must_use]
    pub fn new(start: u32, size: u32) -> Self {
        Self { start, size }
    }

    /// Exclusive end position of the block
    #[must_use]
    pub fn end(&self) -> u64 {
        u64::from(self.start) + u64::from(self.size)
    }
}

/// Parsed index entry and record header of a single sequence
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SequenceRecord {
    /// Sequence name, unique within the file
    pub name: String,
    /// Number of bases
    pub size: u32,
    /// Runs of unknown bases, in file order
    pub n_blocks: Vec<NBlock>,
    /// Number of soft-mask blocks declared by the record (their data is skipped)
    pub n_mask_blocks: u32,
    /// Absolute byte offset of the record header
    pub offset: usize,
    /// Absolute byte offset of the packed base stream
    pub dna_offset: usize,
}
impl SequenceRecord {
    /// Number of bytes of the packed base stream
    #[must_use]
    pub fn packed_len(&self) -> usize {
        (self.size as usize).div_ceil(4)
    }

    /// Parses the record header found at `offset`
    fn from_buffer(buffer: &[u8], name: String, offset: usize) -> Result<Self> {
        let mut cursor = ByteCursor::at(buffer, offset)?;

        let size = cursor.read_u32()?;

        let n_block_count = cursor.read_u32()? as usize;
        let starts = cursor.read_u32_array(n_block_count)?;
        let sizes = cursor.read_u32_array(n_block_count)?;
        let n_blocks = starts
            .into_iter()
            .zip(sizes)
            .map(|(start, size)| NBlock::new(start, size))
            .collect();

        // mask blocks: starts and sizes
        let n_mask_blocks = cursor.read_u32()?;
        let mask_len = (n_mask_blocks as usize)
            .checked_mul(8)
            .ok_or(ReadError::FileTruncation(buffer.len()))?;
        cursor.skip(mask_len)?;

        // reserved
        cursor.skip(4)?;

        let dna_offset = cursor.position();
        let record = Self {
            name,
            size,
            n_blocks,
            n_mask_blocks,
            offset,
            dna_offset,
        };

        // packed bases must be fully mapped
        cursor.skip(record.packed_len())?;

        Ok(record)
    }
}

/// Ordered collection of sequence records with name lookup
#[derive(Debug, Clone, Default)]
pub struct SequenceIndex {
    records: Vec<SequenceRecord>,
    lookup: HashMap<String, usize>,
}
impl SequenceIndex {
    /// Walks `sequence_count` index entries directly following the header
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// * Any entry or record header extends past the end of the buffer
    /// * A name is empty or not valid UTF-8
    /// * A name occurs more than once
    pub fn parse(buffer: &[u8], sequence_count: u32) -> Result<Self> {
        let mut cursor = ByteCursor::at(buffer, SIZE_HEADER)?;

        // the count is untrusted: reserve no more entries than the buffer can hold
        let capacity = (sequence_count as usize)
            .min(buffer.len().saturating_sub(SIZE_HEADER) / MIN_INDEX_ENTRY_SIZE);
        let mut index = Self {
            records: Vec::with_capacity(capacity),
            lookup: HashMap::with_capacity(capacity),
        };

        for entry in 0..sequence_count as usize {
            let name_size = cursor.read_u8()?;
            if name_size == 0 {
                return Err(IndexError::EmptyName(entry).into());
            }
            let name = std::str::from_utf8(cursor.read_bytes(name_size as usize)?)?.to_string();
            let offset = cursor.read_u32()? as usize;

            let record = SequenceRecord::from_buffer(buffer, name, offset)?;
            trace!(
                "index entry {}: {} ({} bp, {} N-blocks) at offset {}",
                entry,
                record.name,
                record.size,
                record.n_blocks.len(),
                record.offset
            );
            index.push(record)?;
        }

        Ok(index)
    }

    fn push(&mut self, record: SequenceRecord) -> Result<()> {
        if self.lookup.contains_key(&record.name) {
            return Err(IndexError::DuplicateName(record.name).into());
        }
        self.lookup.insert(record.name.clone(), self.records.len());
        self.records.push(record);
        Ok(())
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&SequenceRecord> {
        self.position(name).map(|idx| &self.records[idx])
    }

    /// Position of `name` in file order
    #[must_use]
    pub fn position(&self, name: &str) -> Option<usize> {
        self.lookup.get(name).copied()
    }

    #[must_use]
    pub fn get_index(&self, idx: usize) -> Option<&SequenceRecord> {
        self.records.get(idx)
    }

    /// Sequence names in file order
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.records.iter().map(|record| record.name.as_str())
    }

    pub fn iter(&self) -> std::slice::Iter<'_, SequenceRecord> {
        self.records.iter()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
