//! Buffered output formatting for the report phase.
//!
//! Uses itoa for coordinate formatting to avoid allocation in the hot
//! path; averages go through std's fixed-precision float formatting.

use crate::error::Result;
use std::io::{BufWriter, Write};

/// Buffer size for RunWriter (8MB default).
const DEFAULT_BUFFER_SIZE: usize = 8 * 1024 * 1024;

/// Writer for `chrom\tstart\tend\taverage` run lines.
pub struct RunWriter<W: Write> {
    writer: BufWriter<W>,
    itoa_buf: itoa::Buffer,
    /// Fractional digits for the average field.
    precision: usize,
}

impl<W: Write> RunWriter<W> {
    /// Create a RunWriter with the default 8MB buffer.
    pub fn new(output: W, precision: usize) -> Self {
        Self::with_capacity(DEFAULT_BUFFER_SIZE, output, precision)
    }

    /// Create a RunWriter with a specific buffer size.
    pub fn with_capacity(capacity: usize, output: W, precision: usize) -> Self {
        Self {
            writer: BufWriter::with_capacity(capacity, output),
            itoa_buf: itoa::Buffer::new(),
            precision,
        }
    }

    /// Write one output run line.
    #[inline]
    pub fn write_run(&mut self, chrom: &str, start: u64, end: u64, average: f64) -> Result<()> {
        self.writer.write_all(chrom.as_bytes())?;
        self.writer.write_all(b"\t")?;
        self.writer.write_all(self.itoa_buf.format(start).as_bytes())?;
        self.writer.write_all(b"\t")?;
        self.writer.write_all(self.itoa_buf.format(end).as_bytes())?;
        self.writer.write_all(b"\t")?;
        write!(self.writer, "{:.*}", self.precision, average)?;
        self.writer.write_all(b"\n")?;
        Ok(())
    }

    /// Flush all buffered output.
    pub fn flush(&mut self) -> Result<()> {
        self.writer.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rendered(precision: usize, runs: &[(&str, u64, u64, f64)]) -> String {
        let mut out = Vec::new();
        {
            let mut writer = RunWriter::new(&mut out, precision);
            for &(chrom, start, end, avg) in runs {
                writer.write_run(chrom, start, end, avg).unwrap();
            }
            writer.flush().unwrap();
        }
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn test_write_run_precision() {
        assert_eq!(
            rendered(4, &[("chr1", 0, 5, 5.0)]),
            "chr1\t0\t5\t5.0000\n"
        );
        assert_eq!(rendered(0, &[("chr1", 10, 20, 2.5)]), "chr1\t10\t20\t2\n");
        assert_eq!(rendered(2, &[("chrX", 7, 9, 1.2345)]), "chrX\t7\t9\t1.23\n");
    }
}
