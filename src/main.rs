use std::io::{self, BufWriter, Write};
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{bail, Result};
use clap::{Parser, Subcommand};
use log::{debug, info};
use parking_lot::Mutex;

use twobit::fasta::{region_header, write_fasta, DEFAULT_LINE_WIDTH};
use twobit::{ParallelProcessor, ParallelReader, RefSequence, TwoBitReader};

#[derive(Parser)]
#[command(name = "twobit")]
#[command(about = "Query UCSC 2bit genome files")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable debug logging (overrides RUST_LOG)
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// List sequence names in file order
    Names {
        /// Input 2bit file
        input: PathBuf,

        /// Print `name<TAB>size` instead of names only
        #[arg(short, long)]
        sizes: bool,
    },

    /// Print the number of bases of a sequence
    Size {
        /// Input 2bit file
        input: PathBuf,

        /// Sequence name
        name: String,
    },

    /// Extract a range as FASTA (zero-based, inclusive; out-of-bounds bases are N)
    Seq {
        /// Input 2bit file
        input: PathBuf,

        /// Sequence name
        name: String,

        /// First position (defaults to 0)
        #[arg(allow_negative_numbers = true)]
        start: Option<i64>,

        /// Last position (defaults to the last base)
        #[arg(allow_negative_numbers = true)]
        end: Option<i64>,

        /// Bases per output line (0 for a single line)
        #[arg(short, long, default_value_t = DEFAULT_LINE_WIDTH)]
        width: usize,
    },

    /// Print base frequencies (ACGT) of whole sequences
    Freq {
        /// Input 2bit file
        input: PathBuf,

        /// Sequence names (defaults to every sequence)
        names: Vec<String>,

        /// Number of threads (0 for all CPUs)
        #[arg(short = 'T', long, default_value = "0")]
        threads: usize,
    },
}

fn init_logger(verbose: bool) {
    let env = env_logger::Env::default().default_filter_or("warn");
    let mut builder = env_logger::Builder::from_env(env);
    if verbose {
        builder.filter_level(log::LevelFilter::Debug);
    }
    builder.init();
}

fn print_frequencies<W: Write>(writer: &mut W, name: &str, freqs: [f64; 4]) -> io::Result<()> {
    writeln!(
        writer,
        "{} base frequencies (ACGT): {} {} {} {}",
        name, freqs[0], freqs[1], freqs[2], freqs[3]
    )
}

fn run_names(input: PathBuf, sizes: bool) -> Result<()> {
    let reader = TwoBitReader::new(input)?;
    let mut out = BufWriter::new(io::stdout().lock());
    for seq in reader.sequences() {
        if sizes {
            writeln!(out, "{}\t{}", seq.name(), seq.size())?;
        } else {
            writeln!(out, "{}", seq.name())?;
        }
    }
    out.flush()?;
    Ok(())
}

fn run_size(input: PathBuf, name: &str) -> Result<()> {
    let reader = TwoBitReader::new(input)?;
    match reader.sequence_size(name) {
        Some(size) => println!("{size}"),
        None => bail!("unknown sequence: {name}"),
    }
    Ok(())
}

fn run_seq(
    input: PathBuf,
    name: &str,
    start: Option<i64>,
    end: Option<i64>,
    width: usize,
) -> Result<()> {
    let reader = TwoBitReader::new(input)?;
    let seq = reader.get(name)?;
    info!("{}: size = {}", name, seq.size());

    // an empty sequence has no default range
    if seq.size() == 0 && start.is_none() && end.is_none() {
        write_fasta(&mut io::stdout().lock(), &region_header(name, 0, -1), b"", width)?;
        return Ok(());
    }
    let start = start.unwrap_or(0);
    let end = end.unwrap_or(i64::from(seq.size()) - 1);

    let mut dbuf = Vec::new();
    seq.decode_into(start, end, &mut dbuf)?;

    let mut out = BufWriter::new(io::stdout().lock());
    write_fasta(&mut out, &region_header(name, start, end), &dbuf, width)?;
    out.flush()?;
    Ok(())
}

/// Collects whole-sequence frequencies across worker threads
#[derive(Clone, Default)]
struct FrequencyCollector {
    tid: Option<usize>,

    // (thread) local results
    local: Vec<(usize, String, [f64; 4])>,

    // global results
    results: Arc<Mutex<Vec<(usize, String, [f64; 4])>>>,
}
impl FrequencyCollector {
    fn into_sorted(self) -> Vec<(usize, String, [f64; 4])> {
        let mut results = std::mem::take(&mut *self.results.lock());
        results.sort_by_key(|(idx, _, _)| *idx);
        results
    }
}
impl ParallelProcessor for FrequencyCollector {
    fn process_sequence(&mut self, sequence: RefSequence<'_>) -> twobit::Result<()> {
        self.local.push((
            sequence.index(),
            sequence.name().to_string(),
            sequence.frequencies(),
        ));
        Ok(())
    }

    fn on_batch_complete(&mut self) -> twobit::Result<()> {
        debug!(
            "thread {:?}: flushing {} results",
            self.get_tid(),
            self.local.len()
        );
        self.results.lock().append(&mut self.local);
        Ok(())
    }

    fn set_tid(&mut self, tid: usize) {
        self.tid = Some(tid);
    }

    fn get_tid(&self) -> Option<usize> {
        self.tid
    }
}

fn run_freq(input: PathBuf, names: &[String], threads: usize) -> Result<()> {
    let reader = TwoBitReader::new(input)?;
    let mut out = BufWriter::new(io::stdout().lock());

    if names.is_empty() {
        debug!("computing frequencies for all {} sequences", reader.num_sequences());
        let collector = FrequencyCollector::default();
        reader.process_parallel(collector.clone(), threads)?;
        for (_, name, freqs) in collector.into_sorted() {
            print_frequencies(&mut out, &name, freqs)?;
        }
    } else {
        for name in names {
            print_frequencies(&mut out, name, reader.base_frequencies(name)?)?;
        }
    }
    out.flush()?;
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logger(cli.verbose);

    match cli.command {
        Commands::Names { input, sizes } => run_names(input, sizes),
        Commands::Size { input, name } => run_size(input, &name),
        Commands::Seq {
            input,
            name,
            start,
            end,
            width,
        } => run_seq(input, &name, start, end, width),
        Commands::Freq {
            input,
            names,
            threads,
        } => run_freq(input, &names, threads),
    }
}
