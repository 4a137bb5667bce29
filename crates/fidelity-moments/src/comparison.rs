//! Weighted comparison of sample moments against histogram moments

use crate::estimator::MomentEstimator;
use crate::sample::sample_moments;
use fidelity_core::moments::to_array;
use fidelity_core::{Error, Moment, MomentSet, Result};
use fidelity_histogram::Histogram;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Magnitudes at or below this count as zero in [`relative_error`]
pub const ZERO_TOLERANCE: f64 = 1e-10;

/// Error reported when the reference is zero but the estimate is not
pub const FULL_ERROR_PCT: f64 = 100.0;

/// Per-moment error breakdown keyed by moment
pub type ErrorComponents = BTreeMap<Moment, ErrorComponent>;

/// Relative error of `estimated` against `raw`, in percent.
///
/// `|raw - estimated| / |raw| * 100` when `|raw| > 1e-10`. With a zero
/// reference the error is 100 if the estimate is non-zero and 0 otherwise.
pub fn relative_error(raw: f64, estimated: f64) -> f64 {
    if raw.abs() > ZERO_TOLERANCE {
        (raw - estimated).abs() / raw.abs() * 100.0
    } else if estimated.abs() > ZERO_TOLERANCE {
        FULL_ERROR_PCT
    } else {
        0.0
    }
}

/// Error of one moment before and after weighting
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ErrorComponent {
    /// Unweighted relative error in percent
    pub raw_error_pct: f64,
    /// Normalized weight in `[0, 1]`
    pub weight: f64,
    /// `weight * raw_error_pct`
    pub weighted_error: f64,
}

impl ErrorComponent {
    pub fn new(raw_error_pct: f64, weight: f64) -> Self {
        Self {
            raw_error_pct,
            weight,
            weighted_error: weight * raw_error_pct,
        }
    }
}

/// Compares raw-sample moments with histogram-estimated moments
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WeightedErrorCalculator {
    estimator: MomentEstimator,
}

impl WeightedErrorCalculator {
    /// Calculator using Sheppard-corrected histogram moments
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_estimator(estimator: MomentEstimator) -> Self {
        Self { estimator }
    }

    pub fn estimator(&self) -> &MomentEstimator {
        &self.estimator
    }

    /// Weighted and raw error of a single moment.
    ///
    /// Returns `(weighted_error, raw_error_pct)`. A zero weight yields a zero
    /// weighted error while still reporting the raw error.
    pub fn per_moment(
        &self,
        sample: &[f64],
        histogram: &Histogram,
        moment: Moment,
        weight: f64,
    ) -> Result<(f64, f64)> {
        check_weight(moment, weight)?;
        let raw = sample_moments(sample).get(moment);
        let estimated = self.estimator.estimate(histogram).get(moment);
        let component = ErrorComponent::new(relative_error(raw, estimated), weight);
        Ok((component.weighted_error, component.raw_error_pct))
    }

    /// Total weighted error across all four moments.
    ///
    /// `weights` must have exactly four finite, non-negative entries. They are
    /// normalized to sum to one, except that an all-zero vector is passed
    /// through unchanged and yields a total of zero.
    pub fn total(
        &self,
        sample: &[f64],
        histogram: &Histogram,
        weights: &[f64],
    ) -> Result<(f64, ErrorComponents)> {
        let raw = sample_moments(sample);
        let estimated = self.estimator.estimate(histogram);
        compare_moments(&raw, &estimated, weights)
    }

    /// Raw relative error of the variance, with Sheppard's correction on or off
    pub fn variance_error(
        &self,
        sample: &[f64],
        histogram: &Histogram,
        apply_correction: bool,
    ) -> f64 {
        let raw = sample_moments(sample).variance;
        let estimated = self
            .estimator
            .with_correction(apply_correction)
            .estimate(histogram)
            .variance;
        relative_error(raw, estimated)
    }
}

/// Weighted comparison of two precomputed moment sets.
///
/// Same weight rules as [`WeightedErrorCalculator::total`].
pub fn compare_moments(
    raw: &MomentSet,
    estimated: &MomentSet,
    weights: &[f64],
) -> Result<(f64, ErrorComponents)> {
    let weights = to_array(weights)?;
    for (&moment, &w) in Moment::ALL.iter().zip(&weights) {
        check_weight(moment, w)?;
    }
    let sum: f64 = weights.iter().sum();
    let weights = if sum > 0.0 {
        weights.map(|w| w / sum)
    } else {
        weights
    };

    let components: ErrorComponents = Moment::ALL
        .iter()
        .map(|&moment| {
            let err = relative_error(raw.get(moment), estimated.get(moment));
            (moment, ErrorComponent::new(err, weights[moment.index()]))
        })
        .collect();
    let total = components.values().map(|c| c.weighted_error).sum();

    Ok((total, components))
}

fn check_weight(moment: Moment, weight: f64) -> Result<()> {
    if !weight.is_finite() || weight < 0.0 {
        return Err(Error::InvalidParameter(format!(
            "{moment} weight must be finite and non-negative, got {weight}"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn fixture() -> (Vec<f64>, Histogram) {
        let sample = vec![0.2, 0.7, 1.1, 1.4, 1.6, 1.9, 2.5, 2.8];
        let hist = Histogram::from_sample(&[0.0, 1.0, 2.0, 3.0], &sample).unwrap();
        (sample, hist)
    }

    #[test]
    fn test_relative_error_convention() {
        assert_relative_eq!(relative_error(10.0, 9.0), 10.0);
        assert_relative_eq!(relative_error(-4.0, -5.0), 25.0);
        assert_eq!(relative_error(0.0, 0.5), 100.0);
        assert_eq!(relative_error(0.0, 1e-11), 0.0);
        assert_eq!(relative_error(1e-12, 0.0), 0.0);
    }

    #[test]
    fn test_zero_weight_keeps_raw_error() {
        let (sample, hist) = fixture();
        let calc = WeightedErrorCalculator::new();
        let (weighted, raw) = calc
            .per_moment(&sample, &hist, Moment::Kurtosis, 0.0)
            .unwrap();
        assert_eq!(weighted, 0.0);
        assert!(raw > 0.0);
    }

    #[test]
    fn test_unit_weight_is_raw_error() {
        let (sample, hist) = fixture();
        let calc = WeightedErrorCalculator::new();
        for moment in Moment::ALL {
            let (weighted, raw) = calc.per_moment(&sample, &hist, moment, 1.0).unwrap();
            assert_eq!(weighted, raw);
        }
    }

    #[test]
    fn test_total_normalizes_weights() {
        let (sample, hist) = fixture();
        let calc = WeightedErrorCalculator::new();
        let (total_a, comps_a) = calc.total(&sample, &hist, &[2.0, 2.0, 0.0, 0.0]).unwrap();
        let (total_b, _) = calc.total(&sample, &hist, &[0.5, 0.5, 0.0, 0.0]).unwrap();
        assert_relative_eq!(total_a, total_b);
        assert_relative_eq!(comps_a[&Moment::Mean].weight, 0.5);
        let sum: f64 = comps_a.values().map(|c| c.weighted_error).sum();
        assert_relative_eq!(sum, total_a);
    }

    #[test]
    fn test_all_zero_weights_pass_through() {
        let (sample, hist) = fixture();
        let calc = WeightedErrorCalculator::new();
        let (total, comps) = calc.total(&sample, &hist, &[0.0; 4]).unwrap();
        assert_eq!(total, 0.0);
        assert_eq!(comps.len(), 4);
        for c in comps.values() {
            assert_eq!(c.weight, 0.0);
            assert_eq!(c.weighted_error, 0.0);
        }
        assert!(comps[&Moment::Variance].raw_error_pct > 0.0);
    }

    #[test]
    fn test_weight_validation() {
        let (sample, hist) = fixture();
        let calc = WeightedErrorCalculator::new();
        assert!(matches!(
            calc.total(&sample, &hist, &[0.5, 0.5]),
            Err(Error::InvalidParameter(_))
        ));
        assert!(matches!(
            calc.total(&sample, &hist, &[0.5, 0.5, -0.1, 0.1]),
            Err(Error::InvalidParameter(_))
        ));
        assert!(calc.total(&sample, &hist, &[f64::NAN, 0.5, 0.0, 0.0]).is_err());
        assert!(calc.per_moment(&sample, &hist, Moment::Mean, -1.0).is_err());
    }

    #[test]
    fn test_empty_inputs_fail_soft() {
        let hist = Histogram::from_edges(&[0.0, 1.0], &[0]).unwrap();
        let calc = WeightedErrorCalculator::new();
        let (total, comps) = calc.total(&[1.0, 2.0, 3.0], &hist, &[0.25; 4]).unwrap();
        assert_eq!(comps[&Moment::Mean].raw_error_pct, 100.0);
        assert_eq!(comps[&Moment::Variance].raw_error_pct, 100.0);
        assert!(total > 0.0);
    }
}
