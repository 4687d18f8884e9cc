//! Run encoder: merges equal-average positions into output intervals.
//!
//! Walks a chromosome's finished buffers once, emitting one interval per
//! maximal run of covered positions whose averages are bit-identical.
//! The walk is read-only, so re-encoding unchanged buffers reproduces
//! the same output bytes.

use crate::config::Origin;
use crate::error::Result;
use crate::output::RunWriter;
use crate::registry::ChromSpec;
use std::io::Write;

/// Encodes one chromosome's buffers into merged average runs.
#[derive(Debug, Clone, Copy)]
pub struct RunEncoder {
    origin: u64,
}

impl RunEncoder {
    pub fn new(origin: Origin) -> Self {
        Self {
            origin: origin.offset(),
        }
    }

    /// Emit the merged runs for one chromosome, in ascending position.
    ///
    /// Output coordinates are `window_start + position`, with the origin
    /// offset added to starts only (a closed origin-one end equals the
    /// half-open end).
    pub fn encode<W: Write>(&self, spec: &ChromSpec, out: &mut RunWriter<W>) -> Result<()> {
        let (counts, sums) = spec.buffers();
        let length = counts.len();

        let mut active = false;
        let mut run_start = 0usize;
        let mut run_avg = 0.0f64;

        for i in 0..length {
            if counts[i] == 0 {
                if active && i != run_start {
                    self.emit(spec, out, run_start, i, run_avg)?;
                }
                active = false;
                run_start = 0;
                run_avg = 0.0;
                continue;
            }

            let avg = sums[i] / counts[i] as f64;
            if !active {
                active = true;
                run_start = i;
                run_avg = avg;
                continue;
            }

            // Bit-exact comparison: any drift in the average closes the run.
            if avg != run_avg {
                if i != run_start {
                    self.emit(spec, out, run_start, i, run_avg)?;
                }
                run_start = i;
                run_avg = avg;
            }
        }

        if active && run_start != length {
            self.emit(spec, out, run_start, length, run_avg)?;
        }
        Ok(())
    }

    fn emit<W: Write>(
        &self,
        spec: &ChromSpec,
        out: &mut RunWriter<W>,
        run_start: usize,
        run_end: usize,
        average: f64,
    ) -> Result<()> {
        out.write_run(
            spec.name(),
            spec.window_start() + run_start as u64 + self.origin,
            spec.window_start() + run_end as u64,
            average,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::Registry;

    fn encoded(registry: &Registry, origin: Origin, precision: usize) -> String {
        let mut out = Vec::new();
        {
            let mut writer = RunWriter::new(&mut out, precision);
            let encoder = RunEncoder::new(origin);
            for spec in registry.iter() {
                encoder.encode(spec, &mut writer).unwrap();
            }
            writer.flush().unwrap();
        }
        String::from_utf8(out).unwrap()
    }

    fn filled(length: u64, intervals: &[(u64, u64, f64)]) -> Registry {
        let mut registry = Registry::new();
        registry.register("chr1", 0, length).unwrap();
        registry.allocate().unwrap();
        for &(start, end, value) in intervals {
            registry
                .get_mut(0)
                .accumulate(start as usize..end as usize, value);
        }
        registry
    }

    #[test]
    fn test_uncovered_chromosome_emits_nothing() {
        let registry = filled(100, &[]);
        assert_eq!(encoded(&registry, Origin::Zero, 4), "");
    }

    #[test]
    fn test_overlap_splits_into_three_runs() {
        let registry = filled(20, &[(0, 10, 5.0), (5, 15, 3.0)]);
        assert_eq!(
            encoded(&registry, Origin::Zero, 4),
            "chr1\t0\t5\t5.0000\nchr1\t5\t10\t4.0000\nchr1\t10\t15\t3.0000\n"
        );
    }

    #[test]
    fn test_gap_closes_run() {
        let registry = filled(30, &[(0, 5, 1.0), (10, 15, 1.0)]);
        assert_eq!(
            encoded(&registry, Origin::Zero, 1),
            "chr1\t0\t5\t1.0\nchr1\t10\t15\t1.0\n"
        );
    }

    #[test]
    fn test_run_reaching_buffer_end_is_emitted() {
        let registry = filled(10, &[(6, 10, 2.0)]);
        assert_eq!(encoded(&registry, Origin::Zero, 0), "chr1\t6\t10\t2\n");
    }

    #[test]
    fn test_origin_one_offsets_start_only() {
        let registry = filled(10, &[(0, 4, 2.0)]);
        assert_eq!(encoded(&registry, Origin::One, 0), "chr1\t1\t4\t2\n");
    }

    #[test]
    fn test_window_start_offsets_coordinates() {
        let mut registry = Registry::new();
        registry.register("chr1", 100, 100).unwrap();
        registry.allocate().unwrap();
        registry.get_mut(0).accumulate(50..100, 2.0);

        assert_eq!(
            encoded(&registry, Origin::Zero, 0),
            "chr1\t150\t200\t2\n"
        );
    }

    #[test]
    fn test_encoding_is_idempotent() {
        let registry = filled(64, &[(0, 40, 1.5), (20, 64, 2.5), (3, 9, 0.25)]);
        let first = encoded(&registry, Origin::Zero, 3);
        let second = encoded(&registry, Origin::Zero, 3);
        assert!(!first.is_empty());
        assert_eq!(first, second);
    }

    #[test]
    fn test_averages_merge_bit_exactly() {
        // Same average reached through different counts still merges.
        let registry = filled(8, &[(0, 4, 2.0), (2, 4, 2.0), (2, 4, 2.0)]);
        // positions 0,1: avg 2.0 from one interval; 2,3: avg 2.0 from three
        assert_eq!(encoded(&registry, Origin::Zero, 1), "chr1\t0\t4\t2.0\n");
    }
}
