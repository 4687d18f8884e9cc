//! Error taxonomy for the coverage-averaging pipeline.

use std::io;
use thiserror::Error;

/// Errors that can occur while configuring or running the pipeline.
///
/// Every variant is fatal: the pipeline is a single-pass batch tool and
/// errors propagate to one top-level handler rather than being retried.
#[derive(Error, Debug)]
pub enum AvgError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("can't specify {0} more than once")]
    DuplicateChrom(String),

    #[error("no chromosomes of interest were given")]
    NoChroms,

    #[error("no length was specified for {0}")]
    NoLength(String),

    #[error("invalid chromosome spec \"{spec}\": {message}")]
    BadChromSpec { spec: String, message: String },

    #[error("failed to allocate {entries}-entry {kind} vector for {chrom}, {bytes_per_entry} bytes per entry")]
    Allocation {
        chrom: String,
        entries: u64,
        kind: &'static str,
        bytes_per_entry: usize,
    },

    #[error("problem at line {line}, {message}")]
    Parse { line: u64, message: String },

    #[error("{chrom} {start} {end} is beyond the end of the chromosome (L={length})")]
    BeyondChromEnd {
        chrom: String,
        start: u64,
        end: u64,
        length: u64,
    },
}

pub type Result<T> = std::result::Result<T, AvgError>;

impl AvgError {
    /// Build a parse error for a 1-based input line.
    pub fn parse(line: u64, message: impl Into<String>) -> Self {
        AvgError::Parse {
            line,
            message: message.into(),
        }
    }
}
