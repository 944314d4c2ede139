//! Statistics accumulators and equal-width histograms.

use bmc_core::{ensure, errors::Result, Real};
use serde::Serialize;

/// Incremental statistics accumulator.
///
/// Accumulates samples and computes mean, variance, standard deviation,
/// standard error, and the largest sample.
#[derive(Debug, Clone, Serialize)]
pub struct Statistics {
    count: usize,
    sum: Real,
    sum_sq: Real,
    max: Real,
}

impl Default for Statistics {
    fn default() -> Self {
        Self::new()
    }
}

impl Statistics {
    /// Create a new empty accumulator.
    pub fn new() -> Self {
        Self {
            count: 0,
            sum: 0.0,
            sum_sq: 0.0,
            max: f64::NEG_INFINITY,
        }
    }

    /// Add a sample.
    pub fn add(&mut self, x: Real) {
        self.count += 1;
        self.sum += x;
        self.sum_sq += x * x;
        self.max = self.max.max(x);
    }

    /// Mean.  Returns `None` if no samples have been added.
    pub fn mean(&self) -> Option<Real> {
        (self.count > 0).then(|| self.sum / self.count as Real)
    }

    /// Unbiased (Bessel-corrected) variance.  Returns `None` for fewer than
    /// 2 samples.
    pub fn variance(&self) -> Option<Real> {
        if self.count < 2 {
            return None;
        }
        let n = self.count as Real;
        let m = self.sum / n;
        let s2 = (self.sum_sq / n - m * m).max(0.0);
        Some(s2 * n / (n - 1.0))
    }

    /// Standard deviation.  Returns `None` for fewer than 2 samples.
    pub fn std_dev(&self) -> Option<Real> {
        self.variance().map(|v| v.sqrt())
    }

    /// Standard error of the mean, `σ / √n`.
    pub fn error_estimate(&self) -> Option<Real> {
        self.std_dev().map(|s| s / (self.count as Real).sqrt())
    }

    /// Maximum sample value.  Returns `None` if no samples have been added.
    pub fn maximum(&self) -> Option<Real> {
        (self.count > 0).then_some(self.max)
    }
}

// ── Histogram ─────────────────────────────────────────────────────────────────

/// A histogram with equal-width bins over `[min, max]`.
///
/// Bins are half-open `[lo, hi)` except the last one, which also holds
/// samples equal to `max`.  Samples outside the range are tallied in
/// `underflow` / `overflow`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Histogram {
    min: Real,
    max: Real,
    counts: Vec<usize>,
    underflow: usize,
    overflow: usize,
}

impl Histogram {
    /// Create an empty histogram.
    pub fn new(bins: usize, min: Real, max: Real) -> Result<Self> {
        ensure!(bins > 0, "histogram needs at least one bin");
        ensure!(
            min.is_finite() && max.is_finite() && min < max,
            "invalid histogram range [{min}, {max}]"
        );
        Ok(Self {
            min,
            max,
            counts: vec![0; bins],
            underflow: 0,
            overflow: 0,
        })
    }

    /// Build a histogram spanning the range of `samples`.
    ///
    /// When all samples are equal the range is widened by ±0.5 around the
    /// common value, so the result always has a non-empty range.
    pub fn from_samples(samples: &[Real], bins: usize) -> Result<Self> {
        ensure!(!samples.is_empty(), "cannot build a histogram from no samples");
        let lo = samples.iter().copied().fold(f64::INFINITY, f64::min);
        let hi = samples.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        let (lo, hi) = if lo < hi { (lo, hi) } else { (lo - 0.5, hi + 0.5) };
        let mut hist = Self::new(bins, lo, hi)?;
        for &x in samples {
            hist.add(x);
        }
        Ok(hist)
    }

    /// Record one sample.
    pub fn add(&mut self, x: Real) {
        if x.is_nan() || x < self.min {
            self.underflow += 1;
        } else if x > self.max {
            self.overflow += 1;
        } else {
            let bins = self.counts.len();
            let idx = ((x - self.min) / self.bin_width()) as usize;
            self.counts[idx.min(bins - 1)] += 1;
        }
    }

    fn bin_width(&self) -> Real {
        (self.max - self.min) / self.counts.len() as Real
    }

    /// Counts per bin.
    pub fn counts(&self) -> &[usize] {
        &self.counts
    }

    /// Total number of samples in range.
    pub fn total(&self) -> usize {
        self.counts.iter().sum()
    }

    /// `bins + 1` bin edges from `min` to `max`.
    pub fn bin_edges(&self) -> Vec<Real> {
        let w = self.bin_width();
        (0..=self.counts.len())
            .map(|i| self.min + i as Real * w)
            .collect()
    }

    /// Fraction of in-range samples falling in each bin.
    pub fn frequencies(&self) -> Vec<Real> {
        let total = self.total();
        if total == 0 {
            return vec![0.0; self.counts.len()];
        }
        self.counts
            .iter()
            .map(|&c| c as Real / total as Real)
            .collect()
    }
}
