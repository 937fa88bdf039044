//! Nucleotide helpers for decoded sequences

/// Complement of a single base, preserving case; anything else becomes `N`
#[inline]
#[must_use]
pub fn complement(base: u8) -> u8 {
    match base {
        b'A' => b'T',
        b'a' => b't',
        b'C' => b'G',
        b'c' => b'g',
        b'G' => b'C',
        b'g' => b'c',
        b'T' => b'A',
        b't' => b'a',
        _ => b'N',
    }
}

/// Common operations on decoded nucleotide sequences
pub trait DnaOps {
    type Owned;

    /// Reverse complement of the sequence
    fn reverse_complement(&self) -> Self::Owned;

    /// Maps `A, C, G, T` (any case) to `offset..offset + 4`, anything else to `offset + 4`
    fn to_numeric(&self, offset: u8) -> Vec<u8>;
}

impl DnaOps for [u8] {
    type Owned = Vec<u8>;

    fn reverse_complement(&self) -> Vec<u8> {
        self.iter().rev().map(|&base| complement(base)).collect()
    }

    fn to_numeric(&self, offset: u8) -> Vec<u8> {
        self.iter()
            .map(|base| match base {
                b'a' | b'A' => offset,
                b'c' | b'C' => offset + 1,
                b'g' | b'G' => offset + 2,
                b't' | b'T' => offset + 3,
                _ => offset + 4,
            })
            .collect()
    }
}

impl DnaOps for str {
    type Owned = String;

    fn reverse_complement(&self) -> String {
        // complement() only yields ASCII
        self.bytes().rev().map(|base| complement(base) as char).collect()
    }

    fn to_numeric(&self, offset: u8) -> Vec<u8> {
        self.as_bytes().to_numeric(offset)
    }
}
