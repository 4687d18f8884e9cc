//! Streaming interval reader.
//!
//! Produces a lazy, single-pass sequence of interval records from a
//! line-oriented text stream. Fields are separated by runs of spaces or
//! tabs; the value field lives in a configurable 1-based column. The
//! reader is stateful only in its current line number and line buffer.

use crate::error::{AvgError, Result};
use crate::parse::{parse_f64, parse_u64_fast};
use memchr::memchr2;
use std::fs::File;
use std::io::{BufRead, BufReader, Read};
use std::path::Path;

/// Fixed line capacity; longer lines are a fatal parse error.
pub const MAX_LINE_BYTES: usize = 1024;

/// One parsed input line. The chromosome name borrows the reader's line
/// buffer and is valid only until the next record is read.
#[derive(Debug, PartialEq)]
pub struct IntervalRecord<'a> {
    pub chrom: &'a str,
    pub start: u64,
    /// Exclusive end.
    pub end: u64,
    pub value: f64,
}

/// Streaming reader over whitespace-delimited interval lines.
pub struct IntervalReader<R: Read> {
    reader: BufReader<R>,
    buf: Vec<u8>,
    line_number: u64,
    /// 1-based column holding the value (>= 4).
    value_column: usize,
}

impl IntervalReader<File> {
    pub fn from_path<P: AsRef<Path>>(path: P, value_column: usize) -> Result<Self> {
        let file = File::open(path)?;
        Ok(Self::new(file, value_column))
    }
}

impl<R: Read> IntervalReader<R> {
    pub fn new(reader: R, value_column: usize) -> Self {
        debug_assert!(value_column >= 4);
        Self {
            reader: BufReader::new(reader),
            buf: Vec::with_capacity(MAX_LINE_BYTES),
            line_number: 0,
            value_column,
        }
    }

    /// 1-based number of the most recently read line.
    pub fn line_number(&self) -> u64 {
        self.line_number
    }

    /// Read the next interval record, or `None` at end of input.
    ///
    /// Blank lines and comment lines (first dark character `#`) are
    /// skipped. Any malformed line is a fatal error naming its 1-based
    /// line number.
    pub fn next_record(&mut self) -> Result<Option<IntervalRecord<'_>>> {
        loop {
            self.buf.clear();
            let bytes_read = self.reader.read_until(b'\n', &mut self.buf)?;
            if bytes_read == 0 {
                return Ok(None);
            }
            self.line_number += 1;

            if self.buf.last() == Some(&b'\n') {
                self.buf.pop();
                if self.buf.last() == Some(&b'\r') {
                    self.buf.pop();
                }
            }
            if self.buf.len() > MAX_LINE_BYTES {
                return Err(AvgError::parse(
                    self.line_number,
                    "line is longer than the internal buffer",
                ));
            }

            match self.buf.iter().position(|&b| b != b' ' && b != b'\t') {
                // blank line
                None => continue,
                // comment line, possibly indented
                Some(i) if self.buf[i] == b'#' => continue,
                Some(0) => break,
                Some(_) => {
                    return Err(AvgError::parse(
                        self.line_number,
                        "line contains no chromosome or begins with whitespace",
                    ));
                }
            }
        }

        let line_number = self.line_number;
        let mut fields = Fields::new(&self.buf);

        let chrom_bytes = fields.next().ok_or_else(|| {
            AvgError::parse(line_number, "line contains no chromosome")
        })?;
        let chrom = std::str::from_utf8(chrom_bytes).map_err(|_| {
            AvgError::parse(line_number, "chromosome name is not valid UTF-8")
        })?;

        let start_field = fields
            .next()
            .ok_or_else(|| AvgError::parse(line_number, "line contains no interval start"))?;
        let start = parse_u64_fast(start_field).ok_or_else(|| {
            AvgError::parse(
                line_number,
                format!(
                    "\"{}\" is not an unsigned integer",
                    String::from_utf8_lossy(start_field)
                ),
            )
        })?;

        let end_field = fields
            .next()
            .ok_or_else(|| AvgError::parse(line_number, "line contains no interval end"))?;
        let end = parse_u64_fast(end_field).ok_or_else(|| {
            AvgError::parse(
                line_number,
                format!(
                    "\"{}\" is not an unsigned integer",
                    String::from_utf8_lossy(end_field)
                ),
            )
        })?;

        // Scan forward to the value column; columns 4..k-1 are ignored.
        let mut value_field = fields
            .next()
            .ok_or_else(|| AvgError::parse(line_number, "line contains no interval value"))?;
        for _col in 5..=self.value_column {
            value_field = fields.next().ok_or_else(|| {
                AvgError::parse(line_number, "line contains no interval value")
            })?;
        }
        let value = parse_f64(value_field).ok_or_else(|| {
            AvgError::parse(
                line_number,
                format!(
                    "\"{}\" is not a number",
                    String::from_utf8_lossy(value_field)
                ),
            )
        })?;

        Ok(Some(IntervalRecord {
            chrom,
            start,
            end,
            value,
        }))
    }
}

/// Iterator over space/tab-delimited fields of a line.
struct Fields<'a> {
    rest: &'a [u8],
}

impl<'a> Fields<'a> {
    fn new(line: &'a [u8]) -> Self {
        Self { rest: line }
    }
}

impl<'a> Iterator for Fields<'a> {
    type Item = &'a [u8];

    fn next(&mut self) -> Option<&'a [u8]> {
        let start = self
            .rest
            .iter()
            .position(|&b| b != b' ' && b != b'\t')?;
        let rest = &self.rest[start..];
        let end = memchr2(b' ', b'\t', rest).unwrap_or(rest.len());
        self.rest = &rest[end..];
        Some(&rest[..end])
    }
}
