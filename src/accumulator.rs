//! Streaming accumulator: applies interval records to registry buffers.
//!
//! Resolves each record's chromosome against the registry, applies the
//! window clipping policy, and updates per-position counts and sums.
//! Records naming chromosomes that are not of interest are skipped.

use crate::config::Origin;
use crate::error::{AvgError, Result};
use crate::progress::Progress;
use crate::reader::IntervalRecord;
use crate::registry::Registry;

/// Applies records to a registry during the read phase.
pub struct Accumulator<'a> {
    registry: &'a mut Registry,
    origin: u64,
    progress: &'a mut Progress,
    /// Chromosome named by the previous record; a change marks a new batch.
    prev_chrom: String,
    /// Spec index for `prev_chrom`, if it is of interest.
    current: Option<usize>,
}

impl<'a> Accumulator<'a> {
    pub fn new(registry: &'a mut Registry, origin: Origin, progress: &'a mut Progress) -> Self {
        Self {
            registry,
            origin: origin.offset(),
            progress,
            prev_chrom: String::new(),
            current: None,
        }
    }

    /// Apply one record, updating the owning chromosome's buffers.
    pub fn apply(&mut self, record: &IntervalRecord<'_>) -> Result<()> {
        if record.chrom != self.prev_chrom {
            self.current = self.registry.lookup(record.chrom);
            match self.current {
                Some(index) => {
                    let spec = self.registry.get_mut(index);
                    let batch = spec.begin_batch();
                    self.progress.batch(record.chrom, batch);
                }
                None => self.progress.ignoring(record.chrom),
            }
            self.prev_chrom.clear();
            self.prev_chrom.push_str(record.chrom);
        }

        let Some(index) = self.current else {
            return Ok(());
        };
        let spec = self.registry.get_mut(index);

        let start = record.start.saturating_sub(self.origin);
        let end = record.end;

        let (clipped_start, clipped_end) = if spec.window_start() == 0 {
            // With only a length specified, intervals past the end are
            // rejected rather than clipped.
            if end > spec.length() {
                return Err(AvgError::BeyondChromEnd {
                    chrom: record.chrom.to_string(),
                    start,
                    end,
                    length: spec.length(),
                });
            }
            (start, end)
        } else {
            // With start and end specified, intervals (or portions of
            // intervals) outside the window are ignored.
            if end <= spec.window_start() {
                return Ok(());
            }
            let clipped_end = (end - spec.window_start()).min(spec.length());
            let clipped_start = start.saturating_sub(spec.window_start());
            if clipped_start >= spec.length() {
                return Ok(());
            }
            (clipped_start, clipped_end)
        };

        if clipped_start < clipped_end {
            spec.accumulate(clipped_start as usize..clipped_end as usize, record.value);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::progress::Verbosity;

    fn registry_with(specs: &[(&str, u64, u64)]) -> Registry {
        let mut registry = Registry::new();
        for &(name, window_start, length) in specs {
            registry.register(name, window_start, length).unwrap();
        }
        registry.allocate().unwrap();
        registry
    }

    fn record(chrom: &str, start: u64, end: u64, value: f64) -> IntervalRecord<'_> {
        IntervalRecord {
            chrom,
            start,
            end,
            value,
        }
    }

    fn apply_all(
        registry: &mut Registry,
        origin: Origin,
        records: &[(&str, u64, u64, f64)],
    ) -> Result<()> {
        let mut progress = Progress::new(Verbosity::Quiet);
        let mut acc = Accumulator::new(registry, origin, &mut progress);
        for &(chrom, start, end, value) in records {
            acc.apply(&record(chrom, start, end, value))?;
        }
        Ok(())
    }

    #[test]
    fn test_simple_accumulation() {
        let mut registry = registry_with(&[("chr1", 0, 20)]);
        apply_all(
            &mut registry,
            Origin::Zero,
            &[("chr1", 0, 10, 5.0), ("chr1", 5, 15, 3.0)],
        )
        .unwrap();

        let (counts, sums) = registry.get(0).buffers();
        assert_eq!(counts[0], 1);
        assert_eq!(sums[0], 5.0);
        assert_eq!(counts[7], 2);
        assert_eq!(sums[7], 8.0);
        assert_eq!(counts[12], 1);
        assert_eq!(sums[12], 3.0);
        assert_eq!(counts[15], 0);
    }

    #[test]
    fn test_unknown_chromosome_is_skipped() {
        let mut registry = registry_with(&[("chr1", 0, 20)]);
        apply_all(
            &mut registry,
            Origin::Zero,
            &[("chrX", 0, 10, 5.0), ("chr1", 0, 5, 1.0)],
        )
        .unwrap();

        let (counts, _) = registry.get(0).buffers();
        assert_eq!(counts[0], 1);
    }

    #[test]
    fn test_beyond_length_only_window_is_fatal() {
        let mut registry = registry_with(&[("chr1", 0, 100)]);
        let err = apply_all(&mut registry, Origin::Zero, &[("chr1", 90, 150, 1.0)])
            .unwrap_err();
        assert!(matches!(err, AvgError::BeyondChromEnd { length: 100, .. }));
    }

    #[test]
    fn test_window_clipping() {
        // chr1:100:200 -> window_start 100, length 100
        let mut registry = registry_with(&[("chr1", 100, 100)]);
        apply_all(
            &mut registry,
            Origin::Zero,
            &[
                ("chr1", 0, 100, 9.0),   // entirely before the window: ignored
                ("chr1", 150, 250, 2.0), // clipped to window-local [50,100)
                ("chr1", 90, 120, 4.0),  // clipped to window-local [0,20)
                ("chr1", 300, 400, 8.0), // starts past the window: ignored
            ],
        )
        .unwrap();

        let (counts, sums) = registry.get(0).buffers();
        assert_eq!(counts[49], 0);
        assert_eq!(counts[50], 1);
        assert_eq!(sums[50], 2.0);
        assert_eq!(counts[99], 1);
        assert_eq!(counts[0], 1);
        assert_eq!(sums[0], 4.0);
        assert_eq!(counts[19], 1);
        assert_eq!(counts[20], 0);
    }

    #[test]
    fn test_origin_one_shifts_start_only() {
        let mut registry = registry_with(&[("chr1", 0, 10)]);
        // origin-one closed [1,5] covers origin-zero positions 0..5
        apply_all(&mut registry, Origin::One, &[("chr1", 1, 5, 2.0)]).unwrap();

        let (counts, _) = registry.get(0).buffers();
        assert_eq!(counts[0], 1);
        assert_eq!(counts[4], 1);
        assert_eq!(counts[5], 0);
    }

    #[test]
    fn test_batches_counted_per_contiguous_run() {
        let mut registry = registry_with(&[("chr1", 0, 10), ("chr2", 0, 10)]);
        apply_all(
            &mut registry,
            Origin::Zero,
            &[
                ("chr1", 0, 1, 1.0),
                ("chr1", 1, 2, 1.0),
                ("chr2", 0, 1, 1.0),
                ("chr1", 2, 3, 1.0),
            ],
        )
        .unwrap();

        assert_eq!(registry.get(0).batches_seen(), 2);
        assert_eq!(registry.get(1).batches_seen(), 1);
    }
}
