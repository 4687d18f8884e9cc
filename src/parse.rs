//! Zero-allocation numeric parsing helpers.
//!
//! These functions parse fields straight from the reader's byte buffer
//! without heap allocation in the hot path.

/// Fast u64 parsing - no allocation, no error formatting.
///
/// Returns None if the input is empty or contains non-digit characters.
#[inline(always)]
pub fn parse_u64_fast(bytes: &[u8]) -> Option<u64> {
    if bytes.is_empty() {
        return None;
    }
    let mut n: u64 = 0;
    for &b in bytes {
        let d = b.wrapping_sub(b'0');
        if d > 9 {
            return None;
        }
        n = n.checked_mul(10)?.checked_add(d as u64)?;
    }
    Some(n)
}

/// Parse a floating-point field from raw bytes.
///
/// Returns None for empty, non-UTF-8, or malformed input.
#[inline]
pub fn parse_f64(bytes: &[u8]) -> Option<f64> {
    if bytes.is_empty() {
        return None;
    }
    std::str::from_utf8(bytes).ok()?.parse().ok()
}

/// Parse an unsigned integer allowing K, M, and G suffixes (thousands).
///
/// Accepts a fractional mantissa before the suffix, so "2.5M" is
/// 2,500,000. Used by the CLI for the default chromosome length; the
/// `String` error feeds straight into clap's value-parser reporting.
pub fn parse_unitized(s: &str) -> std::result::Result<u64, String> {
    let s = s.trim();
    if s.is_empty() {
        return Err("an empty string is not an integer".to_string());
    }

    let (mantissa, mult) = match s.as_bytes()[s.len() - 1] {
        b'K' | b'k' => (&s[..s.len() - 1], 1_000u64),
        b'M' | b'm' => (&s[..s.len() - 1], 1_000_000),
        b'G' | b'g' => (&s[..s.len() - 1], 1_000_000_000),
        _ => (s, 1),
    };

    if let Ok(v) = mantissa.parse::<u64>() {
        return v
            .checked_mul(mult)
            .ok_or_else(|| format!("\"{}\" is out of range", s));
    }

    // Allow a fractional mantissa with a unit suffix, e.g. "2.5M".
    let v: f64 = mantissa
        .parse()
        .map_err(|_| format!("\"{}\" is not an integer", s))?;
    if v < 0.0 {
        return Err(format!("\"{}\" can't be negative", s));
    }
    let scaled = v * mult as f64 + 0.5;
    if scaled > u64::MAX as f64 {
        return Err(format!("\"{}\" is out of range", s));
    }
    Ok(scaled as u64)
}
