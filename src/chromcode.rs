//! Chromosome-name numeric codec.
//!
//! `encode` rewrites lines tagged with chromosome names (such as a
//! typical genomic intervals file) so the name is replaced by a number,
//! letting `sort -n -k1 -k2` order lines genomically with the sex
//! chromosomes as X, Y, W, Z and mitochondrial M ahead of other letters.
//! `decode` restores the original lines. Typical use:
//!
//! ```text
//! chromavg encode in.ranges | env LC_ALL=C sort -n -k1 -k2 | chromavg decode > out.sorted
//! ```
//!
//! Encoding of the leading name:
//! - `#` comment lines -> `0` plus a fractional suffix for the rest
//! - `chr0`..`chr99` -> `1`..`100` (at most two digits)
//! - `chrX`/`chrY`/`chrW`/`chrZ`/`chrM` -> `101`..`105`
//! - other `chr` letters -> `106 + (letter - 'A')`, uppercased
//! - `chr` followed by a non-alphanumeric -> `200`, non-`chr` names -> `300`
//!
//! Leftover name characters become a fractional suffix after a decimal
//! point: digits as `0d`, letters as `100 + 2*(c-'A')` / `101 + 2*(c-'a')`,
//! and any other byte as `200 + byte`, each a sortable fixed width. The
//! remainder of the line is copied verbatim.

use crate::error::{AvgError, Result};
use std::io::{BufRead, Write};

/// Encode one line (without its terminator) into `out`.
pub fn encode_line(line: &[u8], out: &mut Vec<u8>) {
    let mut pos = line
        .iter()
        .position(|b| !b.is_ascii_whitespace())
        .unwrap_or(line.len());

    if pos < line.len() && line[pos] == b'#' {
        out.push(b'0');
        pos = encode_fraction(line, pos + 1, out);
        out.extend_from_slice(&line[pos..]);
        return;
    }

    if !starts_with_chr(&line[pos..]) {
        out.extend_from_slice(b"300");
        pos = encode_fraction(line, pos, out);
        out.extend_from_slice(&line[pos..]);
        return;
    }

    pos += 3;
    if pos >= line.len() || !line[pos].is_ascii_alphanumeric() {
        out.extend_from_slice(b"200");
        pos = encode_fraction(line, pos, out);
        out.extend_from_slice(&line[pos..]);
        return;
    }

    let number;
    if line[pos].is_ascii_alphabetic() {
        let c = line[pos].to_ascii_uppercase();
        pos += 1;
        number = match c {
            b'X' => 101,
            b'Y' => 102,
            b'W' => 103,
            b'Z' => 104,
            b'M' => 105,
            _ => 106 + (c - b'A') as u32,
        };
    } else {
        let mut n = (line[pos] - b'0') as u32;
        pos += 1;
        if pos < line.len() && line[pos].is_ascii_digit() {
            n = 10 * n + (line[pos] - b'0') as u32;
            pos += 1;
        }
        number = n + 1;
    }

    let mut itoa_buf = itoa::Buffer::new();
    out.extend_from_slice(itoa_buf.format(number).as_bytes());

    if pos < line.len() && !line[pos].is_ascii_whitespace() {
        pos = encode_fraction(line, pos, out);
    }
    out.extend_from_slice(&line[pos..]);
}

/// Decode one line previously produced by [`encode_line`].
pub fn decode_line(line: &[u8], line_number: u64, out: &mut Vec<u8>) -> Result<()> {
    let improper = |pos: usize| {
        AvgError::parse(line_number, format!("improper input (column {})", pos + 1))
    };

    if line.first() == Some(&b'#') {
        out.extend_from_slice(&line[1..]);
        return Ok(());
    }

    let mut pos = 0;
    let mut number: u32 = 0;
    while pos < line.len() && line[pos].is_ascii_digit() {
        number = number
            .checked_mul(10)
            .and_then(|n| n.checked_add((line[pos] - b'0') as u32))
            .ok_or_else(|| improper(pos))?;
        pos += 1;
    }
    if pos < line.len() && !line[pos].is_ascii_whitespace() && line[pos] != b'.' {
        return Err(improper(pos));
    }

    match number {
        0 => out.push(b'#'),
        1..=100 => {
            out.extend_from_slice(b"chr");
            let mut itoa_buf = itoa::Buffer::new();
            out.extend_from_slice(itoa_buf.format(number - 1).as_bytes());
        }
        101 => out.extend_from_slice(b"chrX"),
        102 => out.extend_from_slice(b"chrY"),
        103 => out.extend_from_slice(b"chrW"),
        104 => out.extend_from_slice(b"chrZ"),
        105 => out.extend_from_slice(b"chrM"),
        106..=127 => {
            out.extend_from_slice(b"chr");
            out.push(b'A' + (number - 106) as u8);
        }
        200 => out.extend_from_slice(b"chr"),
        300 => {}
        _ => return Err(improper(pos)),
    }

    if pos < line.len() && line[pos] == b'.' {
        pos += 1;
        while pos < line.len() && line[pos].is_ascii_digit() {
            let mut num = (line[pos] - b'0') as u32;
            pos += 1;
            if pos >= line.len() || !line[pos].is_ascii_digit() {
                return Err(improper(pos));
            }
            num = 10 * num + (line[pos] - b'0') as u32;
            pos += 1;
            if num < 10 {
                out.push(b'0' + num as u8);
                continue;
            }
            if pos >= line.len() || !line[pos].is_ascii_digit() {
                return Err(improper(pos));
            }
            num = 10 * num + (line[pos] - b'0') as u32;
            pos += 1;
            match num {
                100..=151 => out.push(declet(num)),
                200..=455 => out.push((num - 200) as u8),
                _ => return Err(improper(pos)),
            }
        }
        if pos < line.len() && !line[pos].is_ascii_whitespace() {
            return Err(improper(pos));
        }
    }

    out.extend_from_slice(&line[pos..]);
    Ok(())
}

/// Encode an input stream line by line.
pub fn encode_stream<R: BufRead, W: Write>(mut input: R, mut output: W) -> Result<()> {
    let mut line = Vec::with_capacity(256);
    let mut encoded = Vec::with_capacity(256);
    loop {
        line.clear();
        if input.read_until(b'\n', &mut line)? == 0 {
            return Ok(());
        }
        trim_newline(&mut line);
        encoded.clear();
        encode_line(&line, &mut encoded);
        output.write_all(&encoded)?;
        output.write_all(b"\n")?;
    }
}

/// Decode an input stream line by line; empty lines are discarded.
pub fn decode_stream<R: BufRead, W: Write>(mut input: R, mut output: W) -> Result<()> {
    let mut line = Vec::with_capacity(256);
    let mut decoded = Vec::with_capacity(256);
    let mut line_number = 0u64;
    loop {
        line.clear();
        if input.read_until(b'\n', &mut line)? == 0 {
            return Ok(());
        }
        line_number += 1;
        trim_newline(&mut line);
        if line.is_empty() {
            continue;
        }
        decoded.clear();
        decode_line(&line, line_number, &mut decoded)?;
        output.write_all(&decoded)?;
        output.write_all(b"\n")?;
    }
}

/// Inverse of the letter encoding: even codes are uppercase, odd lowercase.
fn declet(number: u32) -> u8 {
    if number % 2 == 0 {
        b'A' + ((number - 100) / 2) as u8
    } else {
        b'a' + ((number - 101) / 2) as u8
    }
}

fn starts_with_chr(s: &[u8]) -> bool {
    s.len() >= 3 && s[..3].eq_ignore_ascii_case(b"chr")
}

/// Push the sortable fractional encoding of name characters starting at
/// `pos`, stopping at whitespace or end of line; returns the new position.
fn encode_fraction(line: &[u8], mut pos: usize, out: &mut Vec<u8>) -> usize {
    out.push(b'.');
    while pos < line.len() && !line[pos].is_ascii_whitespace() {
        let b = line[pos];
        if b.is_ascii_digit() {
            out.push(b'0');
            out.push(b);
        } else if b.is_ascii_uppercase() {
            push_three_digits(100 + 2 * (b - b'A') as u32, out);
        } else if b.is_ascii_lowercase() {
            push_three_digits(101 + 2 * (b - b'a') as u32, out);
        } else {
            push_three_digits(200 + b as u32, out);
        }
        pos += 1;
    }
    pos
}

fn push_three_digits(v: u32, out: &mut Vec<u8>) {
    out.push(b'0' + (v / 100) as u8);
    out.push(b'0' + ((v / 10) % 10) as u8);
    out.push(b'0' + (v % 10) as u8);
}

fn trim_newline(line: &mut Vec<u8>) {
    if line.last() == Some(&b'\n') {
        line.pop();
        if line.last() == Some(&b'\r') {
            line.pop();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn encoded(line: &str) -> String {
        let mut out = Vec::new();
        encode_line(line.as_bytes(), &mut out);
        String::from_utf8(out).unwrap()
    }

    fn decoded(line: &str) -> String {
        let mut out = Vec::new();
        decode_line(line.as_bytes(), 1, &mut out).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn test_encode_numeric_chromosomes() {
        assert_eq!(encoded("chr1\t100\t200"), "2\t100\t200");
        assert_eq!(encoded("chr0\t1\t2"), "1\t1\t2");
        assert_eq!(encoded("chr22 5 9"), "23 5 9");
        assert_eq!(encoded("chr99\ta"), "100\ta");
    }

    #[test]
    fn test_encode_sex_and_lettered_chromosomes() {
        assert_eq!(encoded("chrX\t1\t2"), "101\t1\t2");
        assert_eq!(encoded("chrY\t1\t2"), "102\t1\t2");
        assert_eq!(encoded("chrW\t1\t2"), "103\t1\t2");
        assert_eq!(encoded("chrZ\t1\t2"), "104\t1\t2");
        assert_eq!(encoded("chrM\t1\t2"), "105\t1\t2");
        assert_eq!(encoded("chrA\t1\t2"), "106\t1\t2");
        assert_eq!(encoded("chrV\t1\t2"), "127\t1\t2");
    }

    #[test]
    fn test_encode_name_suffixes() {
        // chr2_random: "2" then one digit used, suffix "_random"
        let enc = encoded("chr10_random\t5\t6");
        assert!(enc.starts_with("11."), "got {enc}");
        assert_eq!(decoded(&enc), "chr10_random\t5\t6");
    }

    #[test]
    fn test_encode_non_chr_and_comment_lines() {
        assert_eq!(encoded("# header"), "0. header");
        assert_eq!(decoded("0. header"), "# header");
        let enc = encoded("scaffold_1\t0\t5");
        assert!(enc.starts_with("300."), "got {enc}");
        assert_eq!(decoded(&enc), "scaffold_1\t0\t5");
    }

    #[test]
    fn test_encode_chr_with_odd_first_character() {
        let enc = encoded("chr@\t0\t5");
        assert!(enc.starts_with("200."), "got {enc}");
        assert_eq!(decoded(&enc), "chr@\t0\t5");
    }

    #[test]
    fn test_three_digit_chromosome_round_trips() {
        // Only two digits are consumed; the third becomes a suffix.
        let enc = encoded("chr800\t1\t2");
        assert_eq!(enc, "81.00\t1\t2");
        assert_eq!(decoded(&enc), "chr800\t1\t2");
    }

    #[test]
    fn test_decode_rejects_improper_input() {
        assert!(decode_line(b"999\t1\t2", 3, &mut Vec::new()).is_err());
        assert!(decode_line(b"2.9\t1\t2", 3, &mut Vec::new()).is_err());
        let err = decode_line(b"xyz", 3, &mut Vec::new()).unwrap_err();
        assert!(matches!(err, AvgError::Parse { line: 3, .. }));
    }

    #[test]
    fn test_stream_round_trip() {
        let input = b"chr1\t10\t20\nchrX\t5\t9\nscaffold_7\t1\t2\n# note\n".to_vec();
        let mut encoded = Vec::new();
        encode_stream(&input[..], &mut encoded).unwrap();
        let mut decoded = Vec::new();
        decode_stream(&encoded[..], &mut decoded).unwrap();
        assert_eq!(decoded, input);
    }
}
