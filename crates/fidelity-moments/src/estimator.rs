//! Moment reconstruction from binned data

use fidelity_core::MomentSet;
use fidelity_histogram::Histogram;
use serde::{Deserialize, Serialize};

/// Rebuilds moments from a histogram by placing each bin's mass at its center.
///
/// Variance is reduced by Sheppard's correction unless that is switched off;
/// the corrected figure is clamped at zero and also scales skewness and
/// kurtosis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MomentEstimator {
    apply_correction: bool,
}

impl Default for MomentEstimator {
    fn default() -> Self {
        Self {
            apply_correction: true,
        }
    }
}

impl MomentEstimator {
    /// Estimator with Sheppard's correction enabled
    pub fn new() -> Self {
        Self::default()
    }

    /// Estimator that reports the raw binned variance
    pub fn without_correction() -> Self {
        Self {
            apply_correction: false,
        }
    }

    pub fn with_correction(mut self, apply_correction: bool) -> Self {
        self.apply_correction = apply_correction;
        self
    }

    pub fn applies_correction(&self) -> bool {
        self.apply_correction
    }

    /// Estimate mean, variance, skewness and kurtosis of the binned data.
    ///
    /// A histogram with no counts yields mean 0, variance 0, skewness 0 and
    /// kurtosis 3.
    pub fn estimate(&self, histogram: &Histogram) -> MomentSet {
        if histogram.total_count() == 0 {
            return MomentSet::degenerate();
        }
        let freqs = histogram.frequencies();
        let centers = histogram.centers();

        let mean: f64 = freqs.iter().zip(&centers).map(|(f, c)| f * c).sum();

        let (mut m2, mut m3, mut m4) = (0.0, 0.0, 0.0);
        for (f, c) in freqs.iter().zip(&centers) {
            let d = c - mean;
            let d2 = d * d;
            m2 += f * d2;
            m3 += f * d2 * d;
            m4 += f * d2 * d2;
        }

        if self.apply_correction {
            m2 = (m2 - sheppard_correction(histogram)).max(0.0);
        }

        MomentSet::from_central(mean, m2, m3, m4)
    }
}

/// Sheppard's variance correction, `(Σ freq·width)² / 12`
pub fn sheppard_correction(histogram: &Histogram) -> f64 {
    let mean_width: f64 = histogram
        .frequencies()
        .iter()
        .zip(histogram.widths())
        .map(|(f, w)| f * w)
        .sum();
    mean_width * mean_width / 12.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_uncorrected_moments() {
        // Mass 1/4, 1/2, 1/4 at centers 0.5, 1.5, 2.5
        let hist = Histogram::from_edges(&[0.0, 1.0, 2.0, 3.0], &[1, 2, 1]).unwrap();
        let m = MomentEstimator::without_correction().estimate(&hist);
        assert_relative_eq!(m.mean, 1.5);
        assert_relative_eq!(m.variance, 0.5);
        assert_relative_eq!(m.skewness, 0.0);
        // m4 = 0.5, m2^2 = 0.25
        assert_relative_eq!(m.kurtosis, 2.0);
    }

    #[test]
    fn test_sheppard_correction_applied() {
        let hist = Histogram::from_edges(&[0.0, 1.0, 2.0, 3.0], &[1, 2, 1]).unwrap();
        assert_relative_eq!(sheppard_correction(&hist), 1.0 / 12.0);

        let m = MomentEstimator::new().estimate(&hist);
        let corrected = 0.5 - 1.0 / 12.0;
        assert_relative_eq!(m.variance, corrected);
        assert_relative_eq!(m.kurtosis, 0.5 / (corrected * corrected));
    }

    #[test]
    fn test_correction_clamped_at_zero() {
        // All mass in one wide bin: raw m2 is 0, correction is positive
        let hist = Histogram::from_edges(&[0.0, 10.0], &[5]).unwrap();
        let m = MomentEstimator::new().estimate(&hist);
        assert_eq!(m.variance, 0.0);
        assert_eq!(m.skewness, 0.0);
        assert_eq!(m.kurtosis, 3.0);
        assert_relative_eq!(m.mean, 5.0);
    }

    #[test]
    fn test_empty_histogram_does_not_fail() {
        let hist = Histogram::from_edges(&[0.0, 1.0, 2.0], &[0, 0]).unwrap();
        let m = MomentEstimator::new().estimate(&hist);
        assert_eq!(m, MomentSet::new(0.0, 0.0, 0.0, 3.0));
    }

    #[test]
    fn test_with_correction_toggle() {
        let est = MomentEstimator::new().with_correction(false);
        assert!(!est.applies_correction());
        assert_eq!(est, MomentEstimator::without_correction());
    }
}
