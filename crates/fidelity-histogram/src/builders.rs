//! Reference bin-edge strategies

use crate::traits::HistogramBuilder;
use crate::types::Histogram;
use fidelity_core::{Error, Result};

/// Half-width of the single bin used for a sample without spread
pub const DEGENERATE_HALF_WIDTH: f64 = 0.5;

/// Edges closer than this are merged by the quantile builder
const EDGE_EPSILON: f64 = 1e-10;

/// Equal-width histogram builder
///
/// Creates `num_bins` bins of identical width spanning `[min, max]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UniformBuilder {
    num_bins: usize,
}

impl UniformBuilder {
    /// Create a new equal-width histogram builder
    pub fn new(num_bins: usize) -> Self {
        Self {
            num_bins: num_bins.max(1),
        }
    }
}

impl HistogramBuilder for UniformBuilder {
    fn build_sorted(&self, sorted_sample: &[f64]) -> Result<Histogram> {
        let (min, max) = range_of(sorted_sample)?;
        if max <= min {
            return degenerate(sorted_sample);
        }
        let width = (max - min) / self.num_bins as f64;
        let mut edges: Vec<f64> = (0..self.num_bins)
            .map(|i| min + i as f64 * width)
            .collect();
        // Ensure last bin includes max
        edges.push(max);
        finish(edges, sorted_sample)
    }

    fn target_bins(&self) -> Option<usize> {
        Some(self.num_bins)
    }
}

/// Equal-frequency histogram builder
///
/// Places the edges at empirical quantiles so that each bin holds roughly the
/// same number of points. Tied quantiles collapse into one edge, so discrete
/// data can yield fewer bins than requested.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuantileBuilder {
    num_bins: usize,
}

impl QuantileBuilder {
    /// Create a new quantile-based histogram builder
    pub fn new(num_bins: usize) -> Self {
        Self {
            num_bins: num_bins.max(1),
        }
    }
}

impl HistogramBuilder for QuantileBuilder {
    fn build_sorted(&self, sorted_sample: &[f64]) -> Result<Histogram> {
        let (min, max) = range_of(sorted_sample)?;
        if max <= min {
            return degenerate(sorted_sample);
        }
        if sorted_sample.len() < self.num_bins {
            // Not enough data for requested bins
            return UniformBuilder::new(sorted_sample.len()).build_sorted(sorted_sample);
        }

        let mut edges: Vec<f64> = (0..=self.num_bins)
            .map(|i| quantile_sorted(sorted_sample, i as f64 / self.num_bins as f64))
            .collect();
        edges[0] = min;
        edges[self.num_bins] = max;
        // Remove duplicate edges (can happen with discrete data)
        edges.dedup_by(|a, b| (*a - *b).abs() < EDGE_EPSILON);
        if let Some(last) = edges.last_mut() {
            *last = max;
        }
        finish(edges, sorted_sample)
    }

    fn target_bins(&self) -> Option<usize> {
        Some(self.num_bins)
    }
}

/// Geometrically spaced histogram builder
///
/// Requires strictly positive data; bins have equal width in log space.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LogarithmicBuilder {
    num_bins: usize,
}

impl LogarithmicBuilder {
    /// Create a new log-spaced histogram builder
    pub fn new(num_bins: usize) -> Self {
        Self {
            num_bins: num_bins.max(1),
        }
    }
}

impl HistogramBuilder for LogarithmicBuilder {
    fn build_sorted(&self, sorted_sample: &[f64]) -> Result<Histogram> {
        let (min, max) = range_of(sorted_sample)?;
        if min <= 0.0 {
            return Err(Error::InvalidInput(format!(
                "logarithmic bins need strictly positive values, minimum is {min}"
            )));
        }
        if max <= min {
            return degenerate(sorted_sample);
        }
        let (log_min, log_max) = (min.ln(), max.ln());
        let step = (log_max - log_min) / self.num_bins as f64;
        let mut edges: Vec<f64> = std::iter::once(min)
            .chain((1..self.num_bins).map(|i| (log_min + i as f64 * step).exp()))
            .collect();
        edges.push(max);
        finish(edges, sorted_sample)
    }

    fn target_bins(&self) -> Option<usize> {
        Some(self.num_bins)
    }
}

/// Linear-interpolation quantile of sorted data (Hyndman-Fan type 7)
pub fn quantile_sorted(sorted: &[f64], p: f64) -> f64 {
    let n = sorted.len();
    if n == 0 {
        return 0.0;
    }
    let h = (n - 1) as f64 * p.clamp(0.0, 1.0);
    let lo = h.floor() as usize;
    let hi = (lo + 1).min(n - 1);
    sorted[lo] + (h - lo as f64) * (sorted[hi] - sorted[lo])
}

fn range_of(sorted_sample: &[f64]) -> Result<(f64, f64)> {
    match (sorted_sample.first(), sorted_sample.last()) {
        (Some(&min), Some(&max)) => Ok((min, max)),
        _ => Err(Error::empty_input("histogram construction")),
    }
}

/// Single bin centred on a sample without spread
fn degenerate(sorted_sample: &[f64]) -> Result<Histogram> {
    let value = sorted_sample[0];
    Histogram::from_edges(
        &[value - DEGENERATE_HALF_WIDTH, value + DEGENERATE_HALF_WIDTH],
        &[sorted_sample.len() as u64],
    )
}

/// Drop edges that rounding made non-increasing, then count
fn finish(mut edges: Vec<f64>, sorted_sample: &[f64]) -> Result<Histogram> {
    edges.dedup_by(|a, b| *a <= *b);
    if edges.len() < 2 {
        return degenerate(sorted_sample);
    }
    let num_bins = edges.len() - 1;
    let mut counts = vec![0u64; num_bins];

    // Efficient single pass through sorted data
    let mut current_bin = 0;
    for &value in sorted_sample {
        while current_bin < num_bins - 1 && value >= edges[current_bin + 1] {
            current_bin += 1;
        }
        counts[current_bin] += 1;
    }

    Histogram::from_edges(&edges, &counts)
}
