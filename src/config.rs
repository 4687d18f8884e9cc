//! Runtime configuration for the averaging pipeline.
//!
//! All options are gathered into one immutable [`Config`] value built from
//! parsed arguments and passed explicitly into the registry, accumulator,
//! and encoder. Nothing here is global or mutable after startup.

use crate::progress::Verbosity;

/// Length assigned to chromosomes that do not declare their own,
/// unless the user overrides the default.
pub const DEFAULT_CHROM_LENGTH: u64 = 250_000_000;

/// Coordinate convention for input and output intervals.
///
/// Only the displayed/read `start` value is affected; internal indexing
/// is always origin-zero half-open.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Origin {
    /// Origin-zero, half-open (BED-style). The default.
    #[default]
    Zero,
    /// Origin-one, closed (UCSC browser style).
    One,
}

impl Origin {
    /// Offset subtracted from input starts and added back to output starts.
    #[inline]
    pub fn offset(self) -> u64 {
        match self {
            Origin::Zero => 0,
            Origin::One => 1,
        }
    }
}

/// Immutable pipeline configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// 1-based input column holding the interval value (always >= 4).
    pub value_column: usize,
    /// Fractional digits when formatting averages.
    pub precision: usize,
    /// Input/output coordinate convention.
    pub origin: Origin,
    /// Progress reporting verbosity.
    pub verbosity: Verbosity,
    /// Default window length for chromosomes that do not declare one;
    /// zero forces every chromosome to declare its own length.
    pub default_length: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            value_column: 4,
            precision: 0,
            origin: Origin::Zero,
            verbosity: Verbosity::Quiet,
            default_length: DEFAULT_CHROM_LENGTH,
        }
    }
}
