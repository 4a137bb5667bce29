//! Core traits for histogram building

use crate::types::Histogram;
use fidelity_core::{utils, Result};

/// Trait for building histograms from sample data
pub trait HistogramBuilder {
    /// Build a histogram from the given sample
    fn build(&self, sample: &[f64]) -> Result<Histogram> {
        utils::check_finite(sample, "sample")?;
        self.build_sorted(&utils::sorted(sample))
    }

    /// Build a histogram from pre-sorted, finite data
    fn build_sorted(&self, sorted_sample: &[f64]) -> Result<Histogram>;

    /// Get the target number of bins (if known)
    fn target_bins(&self) -> Option<usize> {
        None
    }
}

impl<B: HistogramBuilder + ?Sized> HistogramBuilder for &B {
    fn build(&self, sample: &[f64]) -> Result<Histogram> {
        (**self).build(sample)
    }

    fn build_sorted(&self, sorted_sample: &[f64]) -> Result<Histogram> {
        (**self).build_sorted(sorted_sample)
    }

    fn target_bins(&self) -> Option<usize> {
        (**self).target_bins()
    }
}
