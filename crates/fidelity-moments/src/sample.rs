//! Moments of the raw sample

use fidelity_core::MomentSet;

/// Population moments of a sample (divisor `n`).
///
/// An empty sample yields mean 0, variance 0, skewness 0 and kurtosis 3. A
/// sample without spread keeps its mean and reports skewness 0, kurtosis 3.
pub fn sample_moments(sample: &[f64]) -> MomentSet {
    if sample.is_empty() {
        return MomentSet::degenerate();
    }
    let n = sample.len() as f64;
    let mean = sample.iter().sum::<f64>() / n;

    let (mut m2, mut m3, mut m4) = (0.0, 0.0, 0.0);
    for &x in sample {
        let d = x - mean;
        let d2 = d * d;
        m2 += d2;
        m3 += d2 * d;
        m4 += d2 * d2;
    }

    MomentSet::from_central(mean, m2 / n, m3 / n, m4 / n)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_empty_sample() {
        assert_eq!(sample_moments(&[]), MomentSet::new(0.0, 0.0, 0.0, 3.0));
    }

    #[test]
    fn test_constant_sample() {
        let m = sample_moments(&[2.5; 10]);
        assert_eq!(m.mean, 2.5);
        assert_eq!(m.variance, 0.0);
        assert_eq!(m.skewness, 0.0);
        assert_eq!(m.kurtosis, 3.0);
    }

    #[test]
    fn test_symmetric_two_point() {
        // ±1 with equal mass: variance 1, skewness 0, kurtosis 1
        let m = sample_moments(&[-1.0, 1.0, -1.0, 1.0]);
        assert_relative_eq!(m.mean, 0.0);
        assert_relative_eq!(m.variance, 1.0);
        assert_relative_eq!(m.skewness, 0.0);
        assert_relative_eq!(m.kurtosis, 1.0);
    }

    #[test]
    fn test_right_skewed() {
        let m = sample_moments(&[1.0, 1.0, 1.0, 1.0, 10.0]);
        assert!(m.skewness > 1.0);
        assert!(m.kurtosis > 2.0);
    }
}
