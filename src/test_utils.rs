//! Test-only 2bit encoder

use std::io::Write;

use byteorder::{NativeEndian, WriteBytesExt};
use tempfile::NamedTempFile;

use crate::header::{TwoBitHeader, SIZE_HEADER};

/// Packs bases four per byte, first base in the high bits
///
/// Anything but `C`, `A` or `G` is stored as `T` (code 0).
pub fn pack(bases: &[u8]) -> Vec<u8> {
    let mut packed = vec![0u8; bases.len().div_ceil(4)];
    for (i, base) in bases.iter().enumerate() {
        let code = match base.to_ascii_uppercase() {
            b'C' => 1,
            b'A' => 2,
            b'G' => 3,
            _ => 0,
        };
        packed[i / 4] |= code << (6 - 2 * (i % 4));
    }
    packed
}

/// Runs of `N` as `(start, size)` pairs
pub fn n_runs(bases: &[u8]) -> Vec<(u32, u32)> {
    let mut runs = Vec::new();
    let mut i = 0;
    while i < bases.len() {
        if bases[i].eq_ignore_ascii_case(&b'N') {
            let start = i;
            while i < bases.len() && bases[i].eq_ignore_ascii_case(&b'N') {
                i += 1;
            }
            runs.push((start as u32, (i - start) as u32));
        } else {
            i += 1;
        }
    }
    runs
}

#[derive(Debug, Clone)]
struct TestSequence {
    name: String,
    bases: Vec<u8>,
    n_blocks: Vec<(u32, u32)>,
    mask_blocks: Vec<(u32, u32)>,
}
impl TestSequence {
    fn record_len(&self) -> usize {
        4 + 4 + 8 * self.n_blocks.len() + 4 + 8 * self.mask_blocks.len() + 4
            + self.bases.len().div_ceil(4)
    }
}

/// Builds in-memory 2bit files
#[derive(Debug, Clone, Default)]
pub struct TwoBitBuilder {
    sequences: Vec<TestSequence>,
}
impl TwoBitBuilder {
    /// Adds a sequence whose N-blocks are the runs of `N` in `bases`
    pub fn sequence(self, name: &str, bases: &[u8]) -> Self {
        let n_blocks = n_runs(bases);
        self.sequence_with_blocks(name, bases, &n_blocks, &[])
    }

    /// Adds a sequence with explicit N-blocks and mask blocks
    pub fn sequence_with_blocks(
        mut self,
        name: &str,
        bases: &[u8],
        n_blocks: &[(u32, u32)],
        mask_blocks: &[(u32, u32)],
    ) -> Self {
        self.sequences.push(TestSequence {
            name: name.to_string(),
            bases: bases.to_vec(),
            n_blocks: n_blocks.to_vec(),
            mask_blocks: mask_blocks.to_vec(),
        });
        self
    }

    pub fn len(&self) -> usize {
        self.sequences.len()
    }

    pub fn build(&self) -> Vec<u8> {
        let mut buffer = TwoBitHeader::new(self.sequences.len() as u32)
            .to_bytes()
            .to_vec();

        let index_len: usize = self.sequences.iter().map(|s| 1 + s.name.len() + 4).sum();
        let mut offset = SIZE_HEADER + index_len;
        for seq in &self.sequences {
            buffer.push(seq.name.len() as u8);
            buffer.extend_from_slice(seq.name.as_bytes());
            buffer.write_u32::<NativeEndian>(offset as u32).unwrap();
            offset += seq.record_len();
        }

        for seq in &self.sequences {
            buffer.write_u32::<NativeEndian>(seq.bases.len() as u32).unwrap();
            buffer.write_u32::<NativeEndian>(seq.n_blocks.len() as u32).unwrap();
            for (start, _) in &seq.n_blocks {
                buffer.write_u32::<NativeEndian>(*start).unwrap();
            }
            for (_, size) in &seq.n_blocks {
                buffer.write_u32::<NativeEndian>(*size).unwrap();
            }
            buffer.write_u32::<NativeEndian>(seq.mask_blocks.len() as u32).unwrap();
            for (start, _) in &seq.mask_blocks {
                buffer.write_u32::<NativeEndian>(*start).unwrap();
            }
            for (_, size) in &seq.mask_blocks {
                buffer.write_u32::<NativeEndian>(*size).unwrap();
            }
            buffer.write_u32::<NativeEndian>(0).unwrap();
            buffer.extend_from_slice(&pack(&seq.bases));
        }
        buffer
    }

    /// Writes the file to a temporary path
    pub fn write_temp(&self) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(&self.build()).unwrap();
        file.flush().unwrap();
        file
    }
}

#[test]
fn test_n_runs() {
    assert_eq!(n_runs(b"NNACNGTNNN"), vec![(0, 2), (4, 1), (7, 3)]);
    assert!(n_runs(b"ACGT").is_empty());
}
