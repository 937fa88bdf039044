use crate::composition::BaseCounts;
use crate::decode::{decode_range, Bases, RangePlan};
use crate::error::{ReadError, Result};
use crate::index::{NBlock, SequenceRecord};

/// A reference to a single sequence of a memory-mapped 2bit file
///
/// The view borrows both the parsed record and the packed bases from the
/// reader, so it cannot outlive the mapping. Everything it returns is an
/// owned copy.
#[derive(Debug, Clone, Copy)]
pub struct RefSequence<'a> {
    /// Position of the sequence in the index (file order)
    idx: usize,
    /// Parsed index entry
    record: &'a SequenceRecord,
    /// Packed 2-bit bases, exactly `ceil(size / 4)` bytes
    packed: &'a [u8],
}
impl<'a> RefSequence<'a> {
    pub(crate) fn new(idx: usize, record: &'a SequenceRecord, packed: &'a [u8]) -> Self {
        debug_assert_eq!(packed.len(), record.packed_len());
        Self {
            idx,
            record,
            packed,
        }
    }

    #[must_use]
    pub fn index(&self) -> usize {
        self.idx
    }

    #[must_use]
    pub fn name(&self) -> &'a str {
        &self.record.name
    }

    /// Number of bases in the sequence
    #[must_use]
    pub fn size(&self) -> u32 {
        self.record.size
    }

    #[must_use]
    pub fn n_blocks(&self) -> &'a [NBlock] {
        &self.record.n_blocks
    }

    #[must_use]
    pub fn record(&self) -> &'a SequenceRecord {
        self.record
    }

    /// The raw packed base stream
    #[must_use]
    pub fn packed(&self) -> &'a [u8] {
        self.packed
    }

    fn plan(&self, start: i64, end: i64) -> Result<RangePlan> {
        if start > end {
            return Err(ReadError::InvalidRange { start, end }.into());
        }
        RangePlan::new(self.record.size, start, end)
            .ok_or_else(|| ReadError::RangeTooLarge { start, end }.into())
    }

    /// Appends the bases of the inclusive, zero-based range `[start, end]` to `dbuf`
    ///
    /// Exactly `end - start + 1` bytes are appended. Positions before 0, at or
    /// past `size`, or inside an N-block are rendered as `N`.
    ///
    /// # Errors
    ///
    /// * [`ReadError::InvalidRange`] if `start > end`
    /// * [`ReadError::RangeTooLarge`] if the output cannot be allocated
    pub fn decode_into(&self, start: i64, end: i64, dbuf: &mut Vec<u8>) -> Result<()> {
        let plan = self.plan(start, end)?;
        dbuf.try_reserve(plan.len).map_err(|_| ReadError::RangeTooLarge { start, end })?;
        decode_range(self.packed, &self.record.n_blocks, plan, dbuf);
        Ok(())
    }

    /// Returns the bases of the inclusive, zero-based range `[start, end]`
    pub fn range(&self, start: i64, end: i64) -> Result<String> {
        let mut dbuf = Vec::new();
        self.decode_into(start, end, &mut dbuf)?;
        Ok(String::from_utf8(dbuf).map_err(|e| e.utf8_error())?)
    }

    /// Returns the whole sequence (N-blocks rendered as `N`)
    pub fn sequence(&self) -> Result<String> {
        if self.record.size == 0 {
            return Ok(String::new());
        }
        self.range(0, i64::from(self.record.size) - 1)
    }

    /// Lazily yields the same bytes as [`RefSequence::range`]
    pub fn bases(&self, start: i64, end: i64) -> Result<Bases<'a>> {
        let plan = self.plan(start, end)?;
        Ok(Bases::new(self.packed, &self.record.n_blocks, plan))
    }

    /// Tallies every stored base, without applying N-blocks
    #[must_use]
    pub fn counts(&self) -> BaseCounts {
        BaseCounts::from_packed(self.packed, self.record.size as usize)
    }

    /// Base frequencies `[A, C, G, T]` over all `size` positions
    ///
    /// N-blocks are not applied, so the stored bits under them (usually `T`)
    /// are counted. An empty sequence yields all zeros.
    #[must_use]
    pub fn frequencies(&self) -> [f64; 4] {
        self.counts().frequencies_over(u64::from(self.record.size))
    }

    /// Tallies the rendered range `[start, end]`, padding and N-blocks included
    pub fn range_counts(&self, start: i64, end: i64) -> Result<BaseCounts> {
        let mut counts = BaseCounts::default();
        counts.extend(self.bases(start, end)?);
        Ok(counts)
    }

    /// Base frequencies `[A, C, G, T]` of the rendered range, relative to its known bases
    pub fn range_frequencies(&self, start: i64, end: i64) -> Result<[f64; 4]> {
        Ok(self.range_counts(start, end)?.frequencies())
    }
}

#[cfg(test)]
mod testing {
    use super::*;
    use crate::index::SequenceIndex;
    use crate::test_utils::TwoBitBuilder;
    use crate::Error;

    fn with_sequence<F: FnOnce(RefSequence<'_>)>(builder: &TwoBitBuilder, name: &str, f: F) {
        let buffer = builder.build();
        let index = SequenceIndex::parse(&buffer, builder.len() as u32).unwrap();
        let (idx, record) = index
            .iter()
            .enumerate()
            .find(|(_, r)| r.name == name)
            .unwrap();
        let packed = &buffer[record.dna_offset..record.dna_offset + record.packed_len()];
        f(RefSequence::new(idx, record, packed));
    }

    #[test]
    fn test_range_and_sequence() {
        let builder = TwoBitBuilder::default().sequence("chr1", b"ACGTNNACGT");
        with_sequence(&builder, "chr1", |seq| {
            assert_eq!(seq.size(), 10);
            assert_eq!(seq.sequence().unwrap(), "ACGTNNACGT");
            assert_eq!(seq.range(3, 6).unwrap(), "TNNA");
            assert_eq!(seq.range(8, 12).unwrap(), "GTNNN");
        });
    }

    #[test]
    fn test_invalid_range() {
        let builder = TwoBitBuilder::default().sequence("chr1", b"ACGT");
        with_sequence(&builder, "chr1", |seq| {
            let err = seq.range(3, 2).unwrap_err();
            assert!(matches!(
                err,
                Error::ReadError(ReadError::InvalidRange { start: 3, end: 2 })
            ));
            assert!(seq.bases(1, 0).is_err());
            assert_eq!(seq.range(2, 2).unwrap(), "G");
        });
    }

    #[test]
    fn test_range_too_large() {
        let builder = TwoBitBuilder::default().sequence("chr1", b"ACGT");
        with_sequence(&builder, "chr1", |seq| {
            for (start, end) in [(i64::MIN, 0), (0, i64::MAX), (i64::MIN, i64::MAX)] {
                let err = seq.range(start, end).unwrap_err();
                assert!(err.is_range_too_large());
                assert!(seq.bases(start, end).is_err());
            }

            // representable length, but no allocator can serve it
            let mut dbuf = b">".to_vec();
            let err = seq.decode_into(-(1 << 62), 0, &mut dbuf).unwrap_err();
            assert!(matches!(
                err,
                Error::ReadError(ReadError::RangeTooLarge { end: 0, .. })
            ));
            assert_eq!(dbuf, b">");

            // the lazy iterator never allocates the rendering
            let mut lazy = seq.bases(i64::MIN + 1, -1).unwrap();
            assert_eq!(lazy.len() as u64, i64::MAX.unsigned_abs());
            assert_eq!(lazy.next(), Some(b'N'));
            assert_eq!(seq.range(0, 3).unwrap(), "ACGT");
        });
    }

    #[test]
    fn test_decode_into_appends() {
        let builder = TwoBitBuilder::default().sequence("chr1", b"ACGT");
        with_sequence(&builder, "chr1", |seq| {
            let mut dbuf = b">".to_vec();
            seq.decode_into(0, 1, &mut dbuf).unwrap();
            seq.decode_into(2, 5, &mut dbuf).unwrap();
            assert_eq!(dbuf, b">ACGTNN");
        });
    }

    #[test]
    fn test_frequencies_ignore_n_blocks() {
        // N positions are stored as T bits
        let builder = TwoBitBuilder::default().sequence("chr1", b"AANNCCGG");
        with_sequence(&builder, "chr1", |seq| {
            assert_eq!(seq.frequencies(), [0.25, 0.25, 0.25, 0.25]);
            let third = 1.0 / 3.0;
            assert_eq!(seq.range_frequencies(0, 7).unwrap(), [third, third, third, 0.0]);
            let counts = seq.range_counts(-2, 7).unwrap();
            assert_eq!(counts.n, 4);
            assert_eq!(counts.total(), 10);
        });
    }

    #[test]
    fn test_empty_sequence() {
        let builder = TwoBitBuilder::default().sequence("empty", b"");
        with_sequence(&builder, "empty", |seq| {
            assert_eq!(seq.sequence().unwrap(), "");
            assert_eq!(seq.frequencies(), [0.0; 4]);
            assert_eq!(seq.range(0, 1).unwrap(), "NN");
        });
    }
}
