//! Progress reporting on stderr.
//!
//! Reports each batch of input lines and each chromosome drained during
//! the report phase, prefixed with the wall-clock time spent since the
//! previous report.

use std::time::Instant;

/// How much progress chatter to emit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Verbosity {
    /// No progress output. The default.
    #[default]
    Quiet,
    /// Report batches and the report phase.
    Batches,
    /// Report batches, the report phase, and ignored chromosomes.
    Chromosomes,
}

/// Lap-timing progress reporter.
#[derive(Debug)]
pub struct Progress {
    verbosity: Verbosity,
    clock: Instant,
}

impl Progress {
    pub fn new(verbosity: Verbosity) -> Self {
        Self {
            verbosity,
            clock: Instant::now(),
        }
    }

    /// Seconds since the previous report, resetting the lap clock.
    fn lap(&mut self) -> f64 {
        let secs = self.clock.elapsed().as_secs_f64();
        self.clock = Instant::now();
        secs
    }

    /// A new contiguous batch of lines for a tracked chromosome.
    pub fn batch(&mut self, chrom: &str, batch: u32) {
        if self.verbosity == Verbosity::Quiet {
            return;
        }
        let lap = self.lap();
        eprintln!(
            "({}) progress: reading {} batch {}",
            format_duration(lap),
            chrom,
            batch
        );
    }

    /// A batch naming a chromosome that is not of interest.
    pub fn ignoring(&self, chrom: &str) {
        if self.verbosity == Verbosity::Chromosomes {
            eprintln!("progress: ignoring {}", chrom);
        }
    }

    /// The report phase has reached a chromosome.
    pub fn processing(&mut self, chrom: &str) {
        if self.verbosity == Verbosity::Quiet {
            return;
        }
        let lap = self.lap();
        eprintln!(
            "({}) progress: processing {}",
            format_duration(lap),
            chrom
        );
    }
}

/// Format a duration as `0.123s`, `3m06.123s`, or `1h02m06.123s`.
pub fn format_duration(seconds: f64) -> String {
    if seconds < 60.0 {
        format!("{:.3}s", seconds)
    } else if seconds < 3600.0 {
        let minutes = (seconds / 60.0) as u64;
        let secs = seconds - 60.0 * minutes as f64;
        format!("{}m{:06.3}s", minutes, secs)
    } else {
        let total_minutes = (seconds / 60.0) as u64;
        let secs = seconds - 60.0 * total_minutes as f64;
        let hours = total_minutes / 60;
        let minutes = total_minutes % 60;
        format!("{}h{:02}m{:06.3}s", hours, minutes, secs)
    }
}
