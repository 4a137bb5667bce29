//! Core types for histogram representation

use fidelity_core::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A single bin in a histogram
#[derive(Debug, Clone, PartialEq)]
pub struct HistogramBin {
    /// Left edge of the bin (inclusive)
    pub left: f64,
    /// Right edge of the bin (exclusive, except for the last bin)
    pub right: f64,
    /// Number of values in this bin
    pub count: u64,
    /// Density (count / (total_count * bin_width))
    pub density: f64,
}

impl HistogramBin {
    /// Create a new histogram bin
    pub fn new(left: f64, right: f64, count: u64, total_count: u64) -> Self {
        let width = right - left;
        let density = if width > 0.0 && total_count > 0 {
            count as f64 / (total_count as f64 * width)
        } else {
            0.0
        };

        Self {
            left,
            right,
            count,
            density,
        }
    }

    /// Get the center point of the bin
    pub fn center(&self) -> f64 {
        (self.left + self.right) / 2.0
    }

    /// Get the width of the bin
    pub fn width(&self) -> f64 {
        self.right - self.left
    }

    /// Check if a value falls within this bin
    pub fn contains(&self, value: f64) -> bool {
        value >= self.left && value < self.right
    }

    /// Get the relative frequency (count / total_count)
    pub fn frequency(&self, total_count: u64) -> f64 {
        if total_count > 0 {
            self.count as f64 / total_count as f64
        } else {
            0.0
        }
    }
}

impl fmt::Display for HistogramBin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{:.3}, {:.3}): count={}, density={:.3}",
            self.left, self.right, self.count, self.density
        )
    }
}

/// A binned view of a sample.
///
/// Holds `n + 1` strictly increasing finite edges and `n` counts, with
/// `n >= 1`. Bins are half-open `[left, right)` except the last one, which
/// also includes its right edge.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawHistogram")]
pub struct Histogram {
    bin_edges: Vec<f64>,
    bin_counts: Vec<u64>,
}

#[derive(Deserialize)]
struct RawHistogram {
    bin_edges: Vec<f64>,
    bin_counts: Vec<u64>,
}

impl TryFrom<RawHistogram> for Histogram {
    type Error = Error;

    fn try_from(raw: RawHistogram) -> Result<Self> {
        Histogram::from_edges(&raw.bin_edges, &raw.bin_counts)
    }
}

impl Histogram {
    /// Create a histogram from explicit edges and counts
    ///
    /// Fails when there is no bin, when `edges.len() != counts.len() + 1`, or
    /// when the edges are not finite and strictly increasing.
    pub fn from_edges(edges: &[f64], counts: &[u64]) -> Result<Self> {
        validate_edges(edges)?;
        if edges.len() != counts.len() + 1 {
            return Err(Error::size_mismatch(
                counts.len() + 1,
                edges.len(),
                "histogram edges",
            ));
        }
        Ok(Self {
            bin_edges: edges.to_vec(),
            bin_counts: counts.to_vec(),
        })
    }

    /// Create a histogram over `edges` by counting the values of `sample`
    ///
    /// Values outside `[edges[0], edges[n]]` are not counted.
    pub fn from_sample(edges: &[f64], sample: &[f64]) -> Result<Self> {
        validate_edges(edges)?;
        let num_bins = edges.len() - 1;
        let mut counts = vec![0u64; num_bins];
        for &value in sample {
            if let Some(idx) = locate(edges, value) {
                counts[idx] += 1;
            }
        }
        Ok(Self {
            bin_edges: edges.to_vec(),
            bin_counts: counts,
        })
    }

    /// Get bin edges (including rightmost edge)
    pub fn edges(&self) -> &[f64] {
        &self.bin_edges
    }

    /// Get counts
    pub fn counts(&self) -> &[u64] {
        &self.bin_counts
    }

    /// Get the number of bins
    pub fn len(&self) -> usize {
        self.bin_counts.len()
    }

    /// Check if the histogram has no bins
    pub fn is_empty(&self) -> bool {
        self.bin_counts.is_empty()
    }

    /// Get the total count of data points
    pub fn total_count(&self) -> u64 {
        self.bin_counts.iter().sum()
    }

    /// Left edge of the first bin
    pub fn min(&self) -> f64 {
        self.bin_edges[0]
    }

    /// Right edge of the last bin
    pub fn max(&self) -> f64 {
        self.bin_edges[self.bin_edges.len() - 1]
    }

    /// Get bin centers as a vector
    pub fn centers(&self) -> Vec<f64> {
        self.bin_edges
            .windows(2)
            .map(|w| (w[0] + w[1]) / 2.0)
            .collect()
    }

    /// Get bin widths as a vector
    pub fn widths(&self) -> Vec<f64> {
        self.bin_edges.windows(2).map(|w| w[1] - w[0]).collect()
    }

    /// Get frequencies as a vector; all zeros when nothing was counted
    pub fn frequencies(&self) -> Vec<f64> {
        let total = self.total_count();
        if total == 0 {
            return vec![0.0; self.len()];
        }
        self.bin_counts
            .iter()
            .map(|&c| c as f64 / total as f64)
            .collect()
    }

    /// Get the bins
    pub fn bins(&self) -> Vec<HistogramBin> {
        let total = self.total_count();
        self.bin_edges
            .windows(2)
            .zip(&self.bin_counts)
            .map(|(w, &count)| HistogramBin::new(w[0], w[1], count, total))
            .collect()
    }

    /// Find which bin contains a given value
    pub fn find_bin(&self, value: f64) -> Option<usize> {
        locate(&self.bin_edges, value)
    }
}

impl fmt::Display for Histogram {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Histogram({} bins, n={}, range=[{:.3}, {:.3}])",
            self.len(),
            self.total_count(),
            self.min(),
            self.max()
        )
    }
}

fn validate_edges(edges: &[f64]) -> Result<()> {
    if edges.len() < 2 {
        return Err(Error::InvalidInput(format!(
            "a histogram needs at least 2 edges, got {}",
            edges.len()
        )));
    }
    if edges.iter().any(|e| !e.is_finite()) {
        return Err(Error::InvalidInput(
            "histogram edges must be finite".to_string(),
        ));
    }
    if let Some(i) = edges.windows(2).position(|w| w[1] <= w[0]) {
        return Err(Error::InvalidInput(format!(
            "histogram edges must be strictly increasing (edge {} = {} follows {})",
            i + 1,
            edges[i + 1],
            edges[i]
        )));
    }
    Ok(())
}

/// Bin index of `value` for validated edges
fn locate(edges: &[f64], value: f64) -> Option<usize> {
    let last = edges.len() - 1;
    if !(value >= edges[0] && value <= edges[last]) {
        return None;
    }
    if value == edges[last] {
        return Some(last - 1);
    }
    Some(edges.partition_point(|&e| e <= value) - 1)
}
