//! Header module for the twobit library
//!
//! The 2bit header is a fixed 16-byte block made of four 32-bit fields. Fields are
//! stored in the byte order of the host that wrote the file and are read here
//! without any swapping, so a file written on a host of the other endianness
//! is reported as having an invalid signature.

use byteorder::{ByteOrder, NativeEndian};

use crate::{error::Result, HeaderError};

/// 2bit signature as read on a host matching the file's byte order
pub const MAGIC: u32 = 0x1A41_2743;

/// The only supported format version
pub const VERSION: u32 = 0;

/// Size of the header in bytes
pub const SIZE_HEADER: usize = 16;

/// Header structure for 2bit files
///
/// | Offset | Size (bytes) | Name           | Description                 |
/// | ------ | ------------ | -------------- | --------------------------- |
/// | 0      | 4            | signature      | Magic number (0x1A412743)   |
/// | 4      | 4            | version        | Format version (must be 0)  |
/// | 8      | 4            | sequence_count | Number of index entries     |
/// | 12     | 4            | reserved       | Must be 0                   |
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TwoBitHeader {
    /// Magic number identifying the file format
    pub signature: u32,

    /// Version of the file format
    pub version: u32,

    /// Number of sequences listed in the index
    pub sequence_count: u32,

    /// Reserved field, always zero in valid files
    pub reserved: u32,
}
impl TwoBitHeader {
    /// Creates a valid header declaring `sequence_count` sequences
    #[must_use]
    pub fn new(sequence_count: u32) -> Self {
        Self {
            signature: MAGIC,
            version: VERSION,
            sequence_count,
            reserved: 0,
        }
    }

    /// Parses a header from a fixed-size byte array
    ///
    /// Fields are validated in file order: signature, version, then the
    /// reserved field. The sequence count is not constrained.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// * The signature is not [`MAGIC`]
    /// * The version is not [`VERSION`]
    /// * The reserved field is not zero
    pub fn from_bytes(buffer: &[u8; SIZE_HEADER]) -> Result<Self> {
        let signature = NativeEndian::read_u32(&buffer[0..4]);
        if signature != MAGIC {
            return Err(HeaderError::InvalidSignature(signature).into());
        }
        let version = NativeEndian::read_u32(&buffer[4..8]);
        if version != VERSION {
            return Err(HeaderError::UnsupportedVersion(version).into());
        }
        let sequence_count = NativeEndian::read_u32(&buffer[8..12]);
        let reserved = NativeEndian::read_u32(&buffer[12..16]);
        if reserved != 0 {
            return Err(HeaderError::InvalidReserved(reserved).into());
        }
        Ok(Self {
            signature,
            version,
            sequence_count,
            reserved,
        })
    }

    /// Parses a header from the start of an arbitrarily sized buffer
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// * The buffer is smaller than `SIZE_HEADER`
    /// * The header data is invalid (see `from_bytes` for validation details)
    pub fn from_buffer(buffer: &[u8]) -> Result<Self> {
        let mut bytes = [0u8; SIZE_HEADER];
        if buffer.len() < SIZE_HEADER {
            return Err(HeaderError::InvalidSize(buffer.len(), SIZE_HEADER).into());
        }
        bytes.copy_from_slice(&buffer[..SIZE_HEADER]);
        Self::from_bytes(&bytes)
    }

    /// Serializes the header in native byte order
    #[must_use]
    pub fn to_bytes(&self) -> [u8; SIZE_HEADER] {
        let mut buffer = [0u8; SIZE_HEADER];
        NativeEndian::write_u32(&mut buffer[0..4], self.signature);
        NativeEndian::write_u32(&mut buffer[4..8], self.version);
        NativeEndian::write_u32(&mut buffer[8..12], self.sequence_count);
        NativeEndian::write_u32(&mut buffer[12..16], self.reserved);
        buffer
    }
}
