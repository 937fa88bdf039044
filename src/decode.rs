//! 2-bit base decoding
//!
//! Each byte of the packed stream holds four bases, the first one in the most
//! significant bit pair. Two-bit codes map to bases as `0 -> T`, `1 -> C`,
//! `2 -> A`, `3 -> G`.

use crate::index::NBlock;

/// Base letter for each 2-bit code
pub const BASES: [u8; 4] = *b"TCAG";

/// Placeholder for unknown or out-of-bounds positions
pub const UNKNOWN: u8 = b'N';

/// All four bases of every possible packed byte
pub(crate) const BYTE_TO_BASES: [[u8; 4]; 256] = {
    let mut table = [[0u8; 4]; 256];
    let mut byte = 0;
    while byte < 256 {
        let mut offset = 0;
        while offset < 4 {
            let shift = 6 - 2 * offset;
            table[byte][offset] = BASES[(byte >> shift) & 3];
            offset += 1;
        }
        byte += 1;
    }
    table
};

/// Decodes the base at bit-pair `offset` (0..4) of a packed byte
#[inline]
#[must_use]
pub fn byte_to_base(byte: u8, offset: usize) -> u8 {
    BYTE_TO_BASES[byte as usize][offset]
}

/// Decodes the base at `position` of a packed stream
#[inline]
#[must_use]
pub fn base_at(packed: &[u8], position: usize) -> u8 {
    byte_to_base(packed[position / 4], position % 4)
}

/// Decodes the bases `first..first + out.len()` of a packed stream into `out`
///
/// # Panics
///
/// Panics if the range extends past the packed stream.
pub fn unpack_into(packed: &[u8], first: usize, out: &mut [u8]) {
    let mut position = first;
    let mut written = 0;

    // leading bases up to the next byte boundary
    while written < out.len() && position % 4 != 0 {
        out[written] = base_at(packed, position);
        position += 1;
        written += 1;
    }

    // whole bytes
    let whole = (out.len() - written) / 4;
    let bytes = &packed[position / 4..position / 4 + whole];
    for (chunk, &byte) in out[written..written + whole * 4]
        .chunks_exact_mut(4)
        .zip(bytes)
    {
        chunk.copy_from_slice(&BYTE_TO_BASES[byte as usize]);
    }
    position += whole * 4;
    written += whole * 4;

    // trailing bases
    while written < out.len() {
        out[written] = base_at(packed, position);
        position += 1;
        written += 1;
    }
}

/// Resolved coordinates of a range query against a sequence of `size` bases
///
/// `len` is the output length (`end - start + 1`). When any part of the request
/// overlaps `[0, size)` the decoded positions are `first..=last`, written from
/// output slot `lead` onward; every other slot stays `N`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RangePlan {
    pub len: usize,
    pub lead: usize,
    pub overlap: Option<(u64, u64)>,
}
impl RangePlan {
    /// Plans the inclusive range `[start, end]`
    ///
    /// Returns `None` if `start > end` or if the output length does not fit
    /// in a `usize`.
    #[must_use]
    pub fn new(size: u32, start: i64, end: i64) -> Option<Self> {
        let len = end.checked_sub(start)?.checked_add(1)?;
        let len = usize::try_from(len).ok().filter(|&len| len > 0)?;

        // clamp the end, then the start
        let last = end.min(i64::from(size) - 1);
        let first = start.max(0);
        if last < first {
            return Some(Self {
                len,
                lead: len,
                overlap: None,
            });
        }
        // start <= first <= last <= end, so the lead is shorter than len
        Some(Self {
            len,
            lead: usize::try_from(first - start).ok()?,
            overlap: Some((first.unsigned_abs(), last.unsigned_abs())),
        })
    }

    /// Number of positions backed by packed data
    #[must_use]
    pub fn decoded(&self) -> usize {
        match self.overlap {
            Some((first, last)) => (last - first + 1) as usize,
            None => 0,
        }
    }
}

/// Appends the fixed-length rendering of a planned range to `out`
///
/// Positions outside the sequence and positions covered by an N-block are
/// written as `N`; the rest are decoded from `packed`.
pub fn decode_range(packed: &[u8], n_blocks: &[NBlock], plan: RangePlan, out: &mut Vec<u8>) {
    let base = out.len();
    out.resize(base + plan.len, UNKNOWN);

    let Some((first, last)) = plan.overlap else {
        return;
    };
    let dest = &mut out[base + plan.lead..base + plan.lead + plan.decoded()];
    unpack_into(packed, first as usize, dest);

    // N-blocks always override the packed bits
    for block in n_blocks {
        if block.size == 0 {
            continue;
        }
        let bstart = u64::from(block.start).max(first);
        let bend = (block.end() - 1).min(last);
        if bstart > bend {
            continue;
        }
        let lo = (bstart - first) as usize;
        let hi = (bend - first) as usize;
        dest[lo..=hi].fill(UNKNOWN);
    }
}

/// Lazy rendering of a range, yielding the same bytes as [`decode_range`]
#[derive(Debug, Clone)]
pub struct Bases<'a> {
    packed: &'a [u8],
    n_blocks: &'a [NBlock],
    plan: RangePlan,
    /// Next output slot
    idx: usize,
    /// Block currently or next overlapping the cursor
    block: usize,
    /// Whether blocks are ordered by start, as in well-formed files
    sorted: bool,
}
impl<'a> Bases<'a> {
    pub(crate) fn new(packed: &'a [u8], n_blocks: &'a [NBlock], plan: RangePlan) -> Self {
        Self {
            packed,
            n_blocks,
            plan,
            idx: 0,
            block: 0,
            sorted: n_blocks.windows(2).all(|w| w[0].start <= w[1].start),
        }
    }

    fn in_n_block(&mut self, position: u64) -> bool {
        if !self.sorted {
            return self
                .n_blocks
                .iter()
                .any(|block| u64::from(block.start) <= position && position < block.end());
        }
        while let Some(block) = self.n_blocks.get(self.block) {
            if block.end() <= position {
                self.block += 1;
                continue;
            }
            return u64::from(block.start) <= position;
        }
        false
    }
}
impl Iterator for Bases<'_> {
    type Item = u8;

    fn next(&mut self) -> Option<u8> {
        if self.idx >= self.plan.len {
            return None;
        }
        let slot = self.idx;
        self.idx += 1;

        let Some((first, _)) = self.plan.overlap else {
            return Some(UNKNOWN);
        };
        if slot < self.plan.lead || slot >= self.plan.lead + self.plan.decoded() {
            return Some(UNKNOWN);
        }
        let position = first + (slot - self.plan.lead) as u64;
        if self.in_n_block(position) {
            Some(UNKNOWN)
        } else {
            Some(base_at(self.packed, position as usize))
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.plan.len - self.idx;
        (remaining, Some(remaining))
    }
}
impl ExactSizeIterator for Bases<'_> {}
