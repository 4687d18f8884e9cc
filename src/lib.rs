//! chromavg: per-position coverage averaging for genomic intervals.
//!
//! Reads a stream of (chromosome, start, end, value) interval records,
//! accumulates per-base coverage counts and value sums for chromosomes
//! of interest, and reports the minimal set of intervals over which the
//! position-wise average is constant.
//!
//! # Example
//!
//! ```rust
//! use chromavg::config::Origin;
//! use chromavg::prelude::*;
//!
//! let mut registry = Registry::new();
//! registry.register("chr1", 0, 20).unwrap();
//! registry.allocate().unwrap();
//!
//! let mut progress = Progress::new(Verbosity::Quiet);
//! let mut reader = IntervalReader::new("chr1\t0\t10\t5.0\n".as_bytes(), 4);
//! let mut acc = Accumulator::new(&mut registry, Origin::Zero, &mut progress);
//! while let Some(record) = reader.next_record().unwrap() {
//!     acc.apply(&record).unwrap();
//! }
//!
//! let mut out = Vec::new();
//! let mut writer = RunWriter::new(&mut out, 2);
//! let encoder = RunEncoder::new(Origin::Zero);
//! for spec in registry.iter() {
//!     encoder.encode(spec, &mut writer).unwrap();
//! }
//! writer.flush().unwrap();
//! drop(writer);
//! assert_eq!(out, b"chr1\t0\t10\t5.00\n");
//! ```

pub mod accumulator;
pub mod chromcode;
pub mod config;
pub mod encoder;
pub mod error;
pub mod output;
pub mod parse;
pub mod progress;
pub mod reader;
pub mod registry;

// Re-export commonly used types
pub use accumulator::Accumulator;
pub use config::{Config, Origin};
pub use encoder::RunEncoder;
pub use error::{AvgError, Result};
pub use output::RunWriter;
pub use reader::{IntervalReader, IntervalRecord};
pub use registry::{ChromSpec, Registry};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::accumulator::Accumulator;
    pub use crate::config::{Config, Origin};
    pub use crate::encoder::RunEncoder;
    pub use crate::error::{AvgError, Result};
    pub use crate::output::RunWriter;
    pub use crate::progress::{Progress, Verbosity};
    pub use crate::reader::{IntervalReader, IntervalRecord};
    pub use crate::registry::{ChromSpec, Registry};
}
