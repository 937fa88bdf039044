//! Nucleotide composition of sequences and ranges

use crate::decode::BYTE_TO_BASES;

/// Per-base tallies of a decoded sequence or range
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BaseCounts {
    pub a: u64,
    pub c: u64,
    pub g: u64,
    pub t: u64,
    /// Unknown bases (only produced by rendered ranges)
    pub n: u64,
}
impl BaseCounts {
    /// Tallies every base of a packed stream holding `size` bases
    ///
    /// N-blocks are not consulted: positions inside them are counted from
    /// whatever bits are stored there.
    #[must_use]
    pub fn from_packed(packed: &[u8], size: usize) -> Self {
        let mut counts = Self::default();
        let whole = size / 4;
        for &byte in &packed[..whole] {
            counts.extend(BYTE_TO_BASES[byte as usize]);
        }
        let rem = size % 4;
        if rem > 0 {
            counts.extend(BYTE_TO_BASES[packed[whole] as usize][..rem].iter().copied());
        }
        counts
    }

    /// Tallies already-rendered bases (`A`, `C`, `G`, `T`, anything else as `N`)
    #[must_use]
    pub fn from_bases(bases: &[u8]) -> Self {
        let mut counts = Self::default();
        counts.extend(bases.iter().copied());
        counts
    }

    #[inline]
    pub fn add(&mut self, base: u8) {
        match base {
            b'A' => self.a += 1,
            b'C' => self.c += 1,
            b'G' => self.g += 1,
            b'T' => self.t += 1,
            _ => self.n += 1,
        }
    }

    /// Number of known bases
    #[must_use]
    pub fn acgt(&self) -> u64 {
        self.a + self.c + self.g + self.t
    }

    /// Number of tallied positions, unknown bases included
    #[must_use]
    pub fn total(&self) -> u64 {
        self.acgt() + self.n
    }

    /// Frequencies `[A, C, G, T]` relative to `denominator`; zeros when it is 0
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn frequencies_over(&self, denominator: u64) -> [f64; 4] {
        if denominator == 0 {
            return [0.0; 4];
        }
        let denominator = denominator as f64;
        [
            self.a as f64 / denominator,
            self.c as f64 / denominator,
            self.g as f64 / denominator,
            self.t as f64 / denominator,
        ]
    }

    /// Frequencies `[A, C, G, T]` relative to the known bases
    #[must_use]
    pub fn frequencies(&self) -> [f64; 4] {
        self.frequencies_over(self.acgt())
    }
}
impl Extend<u8> for BaseCounts {
    fn extend<I: IntoIterator<Item = u8>>(&mut self, iter: I) {
        for base in iter {
            self.add(base);
        }
    }
}
