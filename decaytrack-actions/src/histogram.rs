//! Fixed-width 1D histogram.

use decaytrack_core::{Error, Result};

/// A 1D histogram with equal-width bins over `[min, max)`.
///
/// Values outside the range go to the underflow/overflow counters; NaN is
/// counted as overflow.
#[derive(Debug, Clone, PartialEq)]
pub struct Histogram1D {
    counts: Vec<u64>,
    min: f64,
    max: f64,
    underflow: u64,
    overflow: u64,
}

impl Histogram1D {
    /// Creates an empty histogram.
    ///
    /// # Errors
    /// Returns [`Error::InvalidBinning`] if `bins` is zero or the range is
    /// empty or not finite.
    pub fn new(bins: usize, min: f64, max: f64) -> Result<Self> {
        if bins == 0 || !min.is_finite() || !max.is_finite() || max <= min {
            return Err(Error::InvalidBinning { bins, min, max });
        }
        Ok(Self {
            counts: vec![0; bins],
            min,
            max,
            underflow: 0,
            overflow: 0,
        })
    }

    /// Number of bins.
    #[must_use]
    pub fn bins(&self) -> usize {
        self.counts.len()
    }

    /// Width of every bin.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn bin_width(&self) -> f64 {
        (self.max - self.min) / self.counts.len() as f64
    }

    /// Lower and upper edge of bin `i`.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn bin_edges(&self, i: usize) -> (f64, f64) {
        let width = self.bin_width();
        let low = self.min + width * i as f64;
        (low, low + width)
    }

    /// Index of the bin containing `value`, if in range.
    #[must_use]
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn find_bin(&self, value: f64) -> Option<usize> {
        if !(value >= self.min && value < self.max) {
            return None;
        }
        let bin = ((value - self.min) / self.bin_width()) as usize;
        // Rounding can push values just below max into the next bin
        Some(bin.min(self.counts.len() - 1))
    }

    /// Adds one entry.
    pub fn fill(&mut self, value: f64) {
        match self.find_bin(value) {
            Some(bin) => self.counts[bin] += 1,
            None if value < self.min => self.underflow += 1,
            None => self.overflow += 1,
        }
    }

    /// Per-bin counts.
    #[must_use]
    pub fn counts(&self) -> &[u64] {
        &self.counts
    }

    /// Entries below the range.
    #[must_use]
    pub fn underflow(&self) -> u64 {
        self.underflow
    }

    /// Entries at or above the range (and NaN).
    #[must_use]
    pub fn overflow(&self) -> u64 {
        self.overflow
    }

    /// Total number of entries, including under/overflow.
    #[must_use]
    pub fn entries(&self) -> u64 {
        self.counts.iter().sum::<u64>() + self.underflow + self.overflow
    }

    /// Iterates over `(low_edge, high_edge, count)` for every bin.
    pub fn iter_bins(&self) -> impl Iterator<Item = (f64, f64, u64)> + '_ {
        self.counts.iter().enumerate().map(|(i, &count)| {
            let (low, high) = self.bin_edges(i);
            (low, high, count)
        })
    }
}
