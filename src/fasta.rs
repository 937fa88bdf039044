//! FASTA output for decoded sequences

use std::io::Write;

use crate::Result;

/// Default number of bases per FASTA line
pub const DEFAULT_LINE_WIDTH: usize = 50;

/// Builds a `name:start-end` header for the inclusive range `[start, end]`
///
/// The printed end is exclusive (`end + 1`), as in UCSC region strings.
#[must_use]
pub fn region_header(name: &str, start: i64, end: i64) -> String {
    let mut buffer = itoa::Buffer::new();
    let mut header = String::with_capacity(name.len() + 24);
    header.push_str(name);
    header.push(':');
    header.push_str(buffer.format(start));
    header.push('-');
    header.push_str(buffer.format(end + 1));
    header
}

/// Writes one FASTA record, wrapping the sequence every `width` bases
///
/// A `width` of 0 writes the sequence on a single line.
pub fn write_fasta<W: Write>(writer: &mut W, header: &str, seq: &[u8], width: usize) -> Result<()> {
    writer.write_all(b">")?;
    writer.write_all(header.as_bytes())?;
    writer.write_all(b"\n")?;
    if seq.is_empty() {
        return Ok(());
    }
    let width = if width == 0 { seq.len() } else { width };
    for line in seq.chunks(width) {
        writer.write_all(line)?;
        writer.write_all(b"\n")?;
    }
    Ok(())
}
