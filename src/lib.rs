//! # twobit
//!
//! Memory-mapped, read-only access to UCSC 2bit genome files.
//!
//! A 2bit file stores each sequence at two bits per base together with the
//! runs of unknown bases (N-blocks). The whole file is mapped at open time,
//! its index parsed once, and every query decodes straight from the mapped
//! bytes into owned output.
//!
//! ## Usage
//!
//! ```no_run
//! use twobit::{Result, TwoBitReader};
//!
//! fn main() -> Result<()> {
//!     let reader = TwoBitReader::new("./data/hg38.2bit")?;
//!
//!     // zero-based, inclusive coordinates; out-of-bounds positions are N
//!     let bases = reader.sequence_range("chrM", -5, 10)?;
//!     assert_eq!(bases.len(), 16);
//!
//!     // [A, C, G, T]
//!     let freqs = reader.base_frequencies("chrM")?;
//!     println!("{freqs:?}");
//!
//!     Ok(())
//! }
//! ```
//!
//! ## File format
//!
//! All fields are 32-bit integers in the byte order of the host that wrote
//! the file. No byte swapping is done: files from a host of the other byte
//! order are rejected by the signature check.
//!
//! 1. Header (16 bytes): signature `0x1A412743`, version `0`, sequence count, reserved `0`
//! 2. Index: per sequence a `u8` name length, the name, and a `u32` record offset
//! 3. Records: size, N-blocks, mask blocks, reserved field, then the packed bases
//!
//! Bases are packed four per byte, first base in the most significant bits:
//!
//! | Code | Base |
//! | ---- | ---- |
//! | 00   | T    |
//! | 01   | C    |
//! | 10   | A    |
//! | 11   | G    |
//!
//! See [`index`] for the layout of index entries and records.

mod composition;
mod cursor;
mod decode;
mod error;
pub mod fasta;
mod header;
pub mod index;
pub mod ops;
mod parallel;
mod reader;
mod record;

#[cfg(test)]
mod test_utils;

pub use composition::BaseCounts;
pub use decode::{Bases, BASES, UNKNOWN};
pub use error::{Error, HeaderError, IndexError, ReadError, Result};
pub use header::{TwoBitHeader, MAGIC, SIZE_HEADER};
pub use index::{NBlock, SequenceIndex, SequenceRecord};
pub use ops::DnaOps;
pub use parallel::{ParallelProcessor, ParallelReader};
pub use reader::TwoBitReader;
pub use record::RefSequence;
