//! Memory-mapped 2bit reader
//!
//! The whole file is mapped read-only, the header is validated and the full
//! index is parsed once at open time. Every query afterwards reads straight
//! from the mapping and returns owned data.

use std::fs::File;
use std::path::Path;
use std::sync::Arc;

use log::{debug, warn};
use memmap2::Mmap;

use crate::error::{ReadError, Result};
use crate::header::TwoBitHeader;
use crate::index::SequenceIndex;
use crate::record::RefSequence;
use crate::{ParallelProcessor, ParallelReader};

/// A memory-mapped reader for 2bit files
///
/// The reader is `Send + Sync`: all queries take `&self` and nothing is
/// mutated after open, so it can be shared between threads without locking.
/// Borrowed views ([`RefSequence`]) are tied to the reader's lifetime, and
/// [`TwoBitReader::close`] takes the reader by value, so a close can never
/// race with an in-flight query.
///
/// # Examples
///
/// ```no_run
/// use twobit::{Result, TwoBitReader};
///
/// fn main() -> Result<()> {
///     let reader = TwoBitReader::new("./data/hg38.2bit")?;
///
///     for name in reader.sequence_names() {
///         println!("{name}\t{:?}", reader.sequence_size(name));
///     }
///
///     // zero-based, inclusive on both ends
///     let bases = reader.sequence_range("chr1", 10_000, 10_099)?;
///     assert_eq!(bases.len(), 100);
///
///     reader.close();
///     Ok(())
/// }
/// ```
pub struct TwoBitReader {
    /// Memory mapped file contents, wrapped in Arc for thread-safe sharing
    mmap: Arc<Mmap>,

    /// Validated file header
    header: TwoBitHeader,

    /// Parsed sequence index, in file order
    index: SequenceIndex,
}

impl TwoBitReader {
    /// Opens, maps and indexes a 2bit file
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// * The file cannot be opened or mapped
    /// * The file is not a regular file
    /// * The header is invalid (signature, version or reserved field)
    /// * The index is truncated or holds empty or duplicate names
    pub fn new<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();

        // Verify input file is a file before attempting to map
        let file = File::open(path)?;
        if !file.metadata()?.is_file() {
            return Err(ReadError::IncompatibleFile.into());
        }

        // Safety: the file is open and won't be modified while mapped
        let mmap = unsafe { Mmap::map(&file)? };

        advise_random(&mmap, path);

        let header = TwoBitHeader::from_buffer(&mmap)?;
        let index = SequenceIndex::parse(&mmap, header.sequence_count)?;
        debug!(
            "opened {} ({} bytes, {} sequences)",
            path.display(),
            mmap.len(),
            index.len()
        );

        Ok(Self {
            mmap: Arc::new(mmap),
            header,
            index,
        })
    }

    /// Releases the mapping, the file descriptor and the index
    ///
    /// Dropping the reader has the same effect.
    pub fn close(self) {
        debug!("closing 2bit reader ({} sequences)", self.index.len());
    }

    #[must_use]
    pub fn header(&self) -> TwoBitHeader {
        self.header
    }

    #[must_use]
    pub fn index(&self) -> &SequenceIndex {
        &self.index
    }

    /// Returns the number of sequences in the file
    #[must_use]
    pub fn num_sequences(&self) -> usize {
        self.index.len()
    }

    /// Sequence names in file order
    #[must_use]
    pub fn sequence_names(&self) -> Vec<&str> {
        self.index.names().collect()
    }

    /// Number of bases of `name`, or `None` if the sequence is unknown
    #[must_use]
    pub fn sequence_size(&self, name: &str) -> Option<u32> {
        self.index.get(name).map(|record| record.size)
    }

    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.index.get(name).is_some()
    }

    fn view(&self, idx: usize) -> Option<RefSequence<'_>> {
        let record = self.index.get_index(idx)?;
        let packed = &self.mmap[record.dna_offset..record.dna_offset + record.packed_len()];
        Some(RefSequence::new(idx, record, packed))
    }

    /// Returns a view of the sequence at position `idx` of the index
    pub fn get_index(&self, idx: usize) -> Result<RefSequence<'_>> {
        self.view(idx)
            .ok_or_else(|| ReadError::OutOfRange(idx, self.num_sequences()).into())
    }

    /// Returns a view of the sequence called `name`
    pub fn get(&self, name: &str) -> Result<RefSequence<'_>> {
        self.index
            .position(name)
            .and_then(|idx| self.view(idx))
            .ok_or_else(|| ReadError::UnknownSequence(name.to_string()).into())
    }

    /// Iterates over all sequences in file order
    pub fn sequences(&self) -> impl Iterator<Item = RefSequence<'_>> {
        (0..self.num_sequences()).filter_map(move |idx| self.view(idx))
    }

    /// Bases of `name` over the inclusive, zero-based range `[start, end]`
    ///
    /// The result always holds `end - start + 1` bases; positions outside the
    /// sequence or inside N-blocks are `N`.
    ///
    /// # Errors
    ///
    /// * [`ReadError::UnknownSequence`] if `name` is not in the index
    /// * [`ReadError::InvalidRange`] if `start > end`
    /// * [`ReadError::RangeTooLarge`] if `end - start + 1` bases cannot be held in memory
    pub fn sequence_range(&self, name: &str, start: i64, end: i64) -> Result<String> {
        self.get(name)?.range(start, end)
    }

    /// Base frequencies `[A, C, G, T]` of the whole sequence `name`
    ///
    /// N-blocks are not applied; an empty sequence yields all zeros.
    pub fn base_frequencies(&self, name: &str) -> Result<[f64; 4]> {
        Ok(self.get(name)?.frequencies())
    }

    /// Base frequencies `[A, C, G, T]` of the rendered range `[start, end]`,
    /// relative to the known bases in it
    pub fn range_frequencies(&self, name: &str, start: i64, end: i64) -> Result<[f64; 4]> {
        self.get(name)?.range_frequencies(start, end)
    }
}

/// Queries jump between sequences, so readahead is disabled
#[cfg(unix)]
fn advise_random(mmap: &Mmap, path: &Path) {
    if let Err(e) = mmap.advise(memmap2::Advice::Random) {
        warn!("madvise failed for {}: {}", path.display(), e);
    }
}

#[cfg(not(unix))]
fn advise_random(_mmap: &Mmap, _path: &Path) {}

pub const BATCH_SIZE: usize = 64;

/// Parallel processing of the sequences of one reader
impl ParallelReader for TwoBitReader {
    fn process_parallel<P: ParallelProcessor + Clone + 'static>(
        self,
        processor: P,
        num_threads: usize,
    ) -> Result<()> {
        let num_sequences = self.num_sequences();
        let num_threads = if num_threads == 0 {
            num_cpus::get()
        } else {
            num_threads
        }
        .clamp(1, num_sequences.max(1));
        let sequences_per_thread = num_sequences.div_ceil(num_threads);
        debug!(
            "processing {} sequences on {} threads",
            num_sequences, num_threads
        );

        // Arc self
        let reader = Arc::new(self);

        // Build thread handles
        let mut handles = Vec::new();
        for tid in 0..num_threads {
            let mut processor = processor.clone();
            let reader = reader.clone();
            processor.set_tid(tid);

            let handle = std::thread::spawn(move || -> Result<()> {
                let start_idx = tid * sequences_per_thread;
                let end_idx = (start_idx + sequences_per_thread).min(num_sequences);

                for (batch_idx, idx) in (start_idx..end_idx).enumerate() {
                    let sequence = reader.get_index(idx)?;
                    processor.process_sequence(sequence)?;

                    if (batch_idx + 1) % BATCH_SIZE == 0 {
                        processor.on_batch_complete()?;
                    }
                }
                processor.on_batch_complete()?;

                Ok(())
            });

            handles.push(handle);
        }

        for handle in handles {
            handle.join().expect("Error joining worker thread")?;
        }

        Ok(())
    }
}
