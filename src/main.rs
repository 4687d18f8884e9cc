//! chromavg command-line interface.
//!
//! Usage: chromavg <COMMAND> [OPTIONS]

use clap::{Parser, Subcommand, ValueEnum};
use std::fs::File;
use std::io::{self, BufReader, Read};
use std::path::PathBuf;
use std::process;

use chromavg::chromcode;
use chromavg::config::{Config, Origin, DEFAULT_CHROM_LENGTH};
use chromavg::parse::parse_unitized;
use chromavg::progress::{Progress, Verbosity};
use chromavg::{Accumulator, IntervalReader, Registry, Result, RunEncoder, RunWriter};

#[derive(Parser)]
#[command(name = "chromavg")]
#[command(version)]
#[command(about = "Per-position coverage averaging for genomic interval streams", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Report the average interval value for each position of chromosomes of interest
    Avg {
        /// Chromosomes to track: <name>[:<length>] or <name>:<start>:<end>
        /// (start/end are origin-zero half-open regardless of --origin)
        #[arg(required = true, value_name = "CHROMOSOME")]
        chromosomes: Vec<String>,

        /// Length for chromosomes without one; accepts K/M/G suffixes.
        /// 0 means every chromosome must specify its own length
        #[arg(short = 'L', long = "default-length", value_parser = parse_unitized)]
        default_length: Option<u64>,

        /// 1-based input column containing the interval value
        #[arg(long = "value", default_value_t = 4, value_parser = clap::value_parser!(u64).range(4..))]
        value_column: u64,

        /// Number of digits to round average values to
        #[arg(long, default_value_t = 0)]
        precision: usize,

        /// Input/output coordinate convention
        #[arg(long, value_enum, default_value_t = OriginArg::Zero)]
        origin: OriginArg,

        /// Report each batch of each chromosome as it is encountered
        #[arg(long)]
        progress: bool,

        /// Also report chromosomes that are ignored
        #[arg(long = "progress-chromosomes")]
        progress_chromosomes: bool,

        /// Input intervals file (use - for stdin)
        #[arg(short, long)]
        input: Option<PathBuf>,
    },

    /// Numerically encode chromosome names at line start, for numeric sorting
    Encode {
        /// Input files (default: stdin)
        files: Vec<PathBuf>,
    },

    /// Restore chromosome names encoded by `encode`
    Decode {
        /// Input files (default: stdin)
        files: Vec<PathBuf>,
    },
}

/// Coordinate convention CLI argument.
#[derive(Debug, Clone, Copy, ValueEnum)]
enum OriginArg {
    /// Origin-zero, half-open intervals (the default)
    Zero,
    /// Origin-one, closed intervals
    One,
}

impl From<OriginArg> for Origin {
    fn from(arg: OriginArg) -> Self {
        match arg {
            OriginArg::Zero => Origin::Zero,
            OriginArg::One => Origin::One,
        }
    }
}

fn main() {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Avg {
            chromosomes,
            default_length,
            value_column,
            precision,
            origin,
            progress,
            progress_chromosomes,
            input,
        } => {
            let verbosity = if progress_chromosomes {
                Verbosity::Chromosomes
            } else if progress {
                Verbosity::Batches
            } else {
                Verbosity::Quiet
            };
            let config = Config {
                value_column: value_column as usize,
                precision,
                origin: origin.into(),
                verbosity,
                default_length: default_length.unwrap_or(DEFAULT_CHROM_LENGTH),
            };
            run_avg(&chromosomes, &config, input)
        }

        Commands::Encode { files } => run_codec(files, chromcode::encode_stream),
        Commands::Decode { files } => run_codec(files, chromcode::decode_stream),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

fn run_avg(chromosomes: &[String], config: &Config, input: Option<PathBuf>) -> Result<()> {
    let mut progress = Progress::new(config.verbosity);

    let mut registry = Registry::from_args(chromosomes)?;
    registry.resolve_default_lengths(config.default_length)?;
    registry.allocate()?;

    // Read phase: stream records into the registry buffers.
    let mut reader = IntervalReader::new(open_input(input)?, config.value_column);
    let mut acc = Accumulator::new(&mut registry, config.origin, &mut progress);
    while let Some(record) = reader.next_record()? {
        acc.apply(&record)?;
    }

    // Report phase: drain each chromosome in registration order.
    let stdout = io::stdout();
    let mut writer = RunWriter::new(stdout.lock(), config.precision);
    let encoder = RunEncoder::new(config.origin);
    for spec in registry.iter() {
        progress.processing(spec.name());
        encoder.encode(spec, &mut writer)?;
    }
    writer.flush()
}

fn run_codec(
    files: Vec<PathBuf>,
    codec: fn(BufReader<Box<dyn Read>>, io::StdoutLock<'static>) -> Result<()>,
) -> Result<()> {
    let stdout = io::stdout();
    if files.is_empty() {
        codec(BufReader::new(open_input(None)?), stdout.lock())
    } else {
        for file in files {
            codec(BufReader::new(open_input(Some(file))?), stdout.lock())?;
        }
        Ok(())
    }
}

fn open_input(input: Option<PathBuf>) -> Result<Box<dyn Read>> {
    match input {
        Some(path) if path.as_os_str() != "-" => Ok(Box::new(File::open(path)?)),
        _ => Ok(Box::new(io::stdin())),
    }
}
