/// Custom Result type for twobit operations, wrapping the custom [`Error`] type
pub type Result<T> = std::result::Result<T, Error>;

/// The main error type for the twobit library, encompassing all possible error cases
/// that can occur while opening and querying 2bit files.
#[derive(thiserror::Error, Debug)]
#[error(transparent)]
pub enum Error {
    /// Errors related to 2bit header validation
    HeaderError(#[from] HeaderError),
    /// Errors found while parsing the sequence index
    IndexError(#[from] IndexError),
    /// Errors that occur during read operations
    ReadError(#[from] ReadError),
    /// Standard I/O errors from the Rust standard library (open and mapping failures)
    IoError(#[from] std::io::Error),
    /// UTF-8 encoding/decoding errors
    Utf8Error(#[from] std::str::Utf8Error),
    /// Generic errors that can occur in any part of the system
    AnyhowError(#[from] anyhow::Error),
}

impl Error {
    /// Returns true if the error is a per-query lookup failure
    /// (unknown sequence name), which leaves the reader usable.
    #[must_use]
    pub fn is_unknown_sequence(&self) -> bool {
        matches!(self, Self::ReadError(ReadError::UnknownSequence(_)))
    }

    /// Returns true if the error was raised for a range with `start > end`.
    #[must_use]
    pub fn is_invalid_range(&self) -> bool {
        matches!(self, Self::ReadError(ReadError::InvalidRange { .. }))
    }

    /// Returns true if the range is valid but its rendering cannot be held in memory.
    #[must_use]
    pub fn is_range_too_large(&self) -> bool {
        matches!(self, Self::ReadError(ReadError::RangeTooLarge { .. }))
    }
}

/// Errors specific to processing and validating the 2bit file header
#[derive(thiserror::Error, Debug)]
pub enum HeaderError {
    /// The signature does not match the 2bit magic number
    ///
    /// Either the file is not a 2bit file or it was written on a host
    /// with a different byte order.
    ///
    /// # Arguments
    /// * `u32` - The invalid signature that was found
    #[error("Invalid signature or wrong architecture: {0:#010x}")]
    InvalidSignature(u32),

    /// The version field is not supported
    ///
    /// # Arguments
    /// * `u32` - The unsupported version number that was found
    #[error("Unknown file version: {0}")]
    UnsupportedVersion(u32),

    /// The reserved header field is not zero
    ///
    /// # Arguments
    /// * `u32` - The value found in the reserved field
    #[error("Reserved bytes not zero: {0}")]
    InvalidReserved(u32),

    /// The buffer is too small to hold a header
    ///
    /// # Arguments
    /// * First `usize` - The actual number of bytes provided
    /// * Second `usize` - The expected number of bytes
    #[error("Invalid number of bytes provided: {0}. Expected: {1}")]
    InvalidSize(usize, usize),
}

/// Errors found while walking the sequence index
#[derive(thiserror::Error, Debug)]
pub enum IndexError {
    /// An index entry declares a zero-length name
    ///
    /// # Arguments
    /// * `usize` - Position of the entry in the index
    #[error("Empty sequence name at index entry {0}")]
    EmptyName(usize),

    /// The same sequence name appears more than once in the index
    #[error("Duplicate sequence name in index: {0}")]
    DuplicateName(String),
}

/// Errors that can occur while reading 2bit data
#[derive(thiserror::Error, Debug)]
pub enum ReadError {
    /// The file being read is not a regular file (e.g., it might be a directory or special file)
    #[error("File is not regular")]
    IncompatibleFile,

    /// The file appears to be truncated or corrupted
    ///
    /// # Arguments
    /// * `usize` - The byte position where the truncation was detected
    #[error("Unexpected end of file - possibly truncated at byte pos {0}")]
    FileTruncation(usize),

    /// The requested sequence is not present in the index
    #[error("Unknown sequence: {0}")]
    UnknownSequence(String),

    /// Attempted to access a sequence index that is beyond the available range
    ///
    /// # Arguments
    /// * First `usize` - The requested sequence index
    /// * Second `usize` - The number of sequences in the file
    #[error("Requested sequence index ({0}) is out of range ({1})")]
    OutOfRange(usize, usize),

    /// The requested range has `start > end`
    #[error("Invalid range: start ({start}) is greater than end ({end})")]
    InvalidRange { start: i64, end: i64 },

    /// The range holds more bases than can be rendered in memory
    #[error("Range too large to render: {start}..={end}")]
    RangeTooLarge { start: i64, end: i64 },
}
