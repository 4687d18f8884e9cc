//! Chromosome-of-interest registry.
//!
//! The registry owns one [`ChromSpec`] per tracked chromosome, in
//! registration order, with a name index for record resolution. Buffers
//! are allocated once after all specs are known and lengths resolved,
//! mutated only during the read phase, and read-only afterwards.

use crate::error::{AvgError, Result};
use rustc_hash::FxHashMap;
use std::ops::Range;

/// Counter ceiling; a saturated position accepts no further contributions.
pub const MAX_COUNT: u32 = u32::MAX;

/// One chromosome of interest and its accumulation buffers.
#[derive(Debug)]
pub struct ChromSpec {
    name: String,
    /// Untracked bases before the window, in chromosome coordinates.
    window_start: u64,
    /// Number of tracked positions; zero until resolved.
    length: u64,
    /// Saturating per-position coverage counts.
    counts: Vec<u32>,
    /// Per-position value sums; meaningful only where the count is nonzero.
    sums: Vec<f64>,
    /// Contiguous input batches seen for this chromosome (diagnostic).
    batches_seen: u32,
}

impl ChromSpec {
    fn new(name: String, window_start: u64, length: u64) -> Self {
        Self {
            name,
            window_start,
            length,
            counts: Vec::new(),
            sums: Vec::new(),
            batches_seen: 0,
        }
    }

    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[inline]
    pub fn window_start(&self) -> u64 {
        self.window_start
    }

    #[inline]
    pub fn length(&self) -> u64 {
        self.length
    }

    #[inline]
    pub fn batches_seen(&self) -> u32 {
        self.batches_seen
    }

    /// Note the start of another contiguous batch of lines for this
    /// chromosome, returning the new batch number.
    pub fn begin_batch(&mut self) -> u32 {
        self.batches_seen += 1;
        self.batches_seen
    }

    /// Per-position buffers for the report phase.
    #[inline]
    pub fn buffers(&self) -> (&[u32], &[f64]) {
        (&self.counts, &self.sums)
    }

    /// Add `value` to every position in `range` (window-local), skipping
    /// positions whose counter has saturated.
    pub fn accumulate(&mut self, range: Range<usize>, value: f64) {
        for i in range {
            if self.counts[i] < MAX_COUNT {
                self.counts[i] += 1;
                self.sums[i] += value;
            }
        }
    }

    /// Allocate and zero both buffers, reporting the chromosome and the
    /// request size on failure.
    fn allocate(&mut self) -> Result<()> {
        let entries = self.length as usize;

        self.counts.try_reserve_exact(entries).map_err(|_| {
            AvgError::Allocation {
                chrom: self.name.clone(),
                entries: self.length,
                kind: "counting",
                bytes_per_entry: std::mem::size_of::<u32>(),
            }
        })?;
        self.counts.resize(entries, 0);

        self.sums.try_reserve_exact(entries).map_err(|_| {
            AvgError::Allocation {
                chrom: self.name.clone(),
                entries: self.length,
                kind: "summing",
                bytes_per_entry: std::mem::size_of::<f64>(),
            }
        })?;
        self.sums.resize(entries, 0.0);

        Ok(())
    }
}

/// Parse a chromosome argument of the form `name`, `name:length`, or
/// `name:start:end` into `(name, window_start, length)`.
///
/// `start`/`end` are origin-zero half-open regardless of the I/O origin
/// setting; a `length` of zero leaves the length unresolved.
pub fn parse_chrom_arg(arg: &str) -> Result<(&str, u64, u64)> {
    let bad = |message: &str| AvgError::BadChromSpec {
        spec: arg.to_string(),
        message: message.to_string(),
    };

    let mut parts = arg.splitn(3, ':');
    let name = parts.next().unwrap_or("");
    if name.is_empty() {
        return Err(bad("chromosome name is empty"));
    }

    match (parts.next(), parts.next()) {
        (None, _) => Ok((name, 0, 0)),
        (Some(length), None) => {
            let length = length
                .parse()
                .map_err(|_| bad("length is not an unsigned integer"))?;
            Ok((name, 0, length))
        }
        (Some(start), Some(end)) => {
            let start: u64 = start
                .parse()
                .map_err(|_| bad("start is not an unsigned integer"))?;
            let end: u64 = end
                .parse()
                .map_err(|_| bad("end is not an unsigned integer"))?;
            if end <= start {
                return Err(bad("end must be greater than start"));
            }
            Ok((name, start, end - start))
        }
    }
}

/// Ordered collection of chromosomes of interest.
#[derive(Debug, Default)]
pub struct Registry {
    specs: Vec<ChromSpec>,
    by_name: FxHashMap<String, usize>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a registry from `name[:length]` / `name:start:end` arguments.
    pub fn from_args<S: AsRef<str>>(args: &[S]) -> Result<Self> {
        let mut registry = Self::new();
        for arg in args {
            let (name, window_start, length) = parse_chrom_arg(arg.as_ref())?;
            registry.register(name, window_start, length)?;
        }
        if registry.is_empty() {
            return Err(AvgError::NoChroms);
        }
        Ok(registry)
    }

    /// Add a chromosome of interest. A `length` of zero is "unresolved"
    /// and must be filled in by [`Registry::resolve_default_lengths`].
    pub fn register(&mut self, name: &str, window_start: u64, length: u64) -> Result<()> {
        if self.by_name.contains_key(name) {
            return Err(AvgError::DuplicateChrom(name.to_string()));
        }
        self.by_name.insert(name.to_string(), self.specs.len());
        self.specs
            .push(ChromSpec::new(name.to_string(), window_start, length));
        Ok(())
    }

    /// Assign `default` to every spec without a length. A default of zero
    /// means every chromosome must declare its own; any spec still
    /// unresolved afterwards is a configuration error.
    pub fn resolve_default_lengths(&mut self, default: u64) -> Result<()> {
        for spec in &mut self.specs {
            if spec.length == 0 {
                spec.length = default;
            }
            if spec.length == 0 {
                return Err(AvgError::NoLength(spec.name.clone()));
            }
        }
        Ok(())
    }

    /// Allocate count and sum buffers for every spec.
    pub fn allocate(&mut self) -> Result<()> {
        for spec in &mut self.specs {
            spec.allocate()?;
        }
        Ok(())
    }

    /// Index of the spec for `name`, if the chromosome is of interest.
    #[inline]
    pub fn lookup(&self, name: &str) -> Option<usize> {
        self.by_name.get(name).copied()
    }

    #[inline]
    pub fn get(&self, index: usize) -> &ChromSpec {
        &self.specs[index]
    }

    #[inline]
    pub fn get_mut(&mut self, index: usize) -> &mut ChromSpec {
        &mut self.specs[index]
    }

    /// Specs in registration order.
    pub fn iter(&self) -> impl Iterator<Item = &ChromSpec> {
        self.specs.iter()
    }

    pub fn len(&self) -> usize {
        self.specs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.specs.is_empty()
    }
}
