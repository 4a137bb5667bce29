use approx::assert_abs_diff_eq;
use fidelity_core::Moment;
use fidelity_histogram::{BinningConfig, Histogram, HistogramBuilder};
use fidelity_moments::{sample_moments, MomentEstimator, WeightedErrorCalculator};
use proptest::prelude::*;
use rand::rngs::StdRng;
use rand::SeedableRng;
use rand_distr::{Distribution, Normal, Uniform};

fn normal_sample(seed: u64, n: usize) -> Vec<f64> {
    let mut rng = StdRng::seed_from_u64(seed);
    let dist = Normal::new(100.0, 15.0).unwrap();
    (0..n).map(|_| dist.sample(&mut rng)).collect()
}

/// One bin per distinct value, with empty gap bins in between
fn perfect_histogram(sample: &[f64]) -> Histogram {
    let mut distinct = sample.to_vec();
    distinct.sort_by(|a, b| a.total_cmp(b));
    distinct.dedup();

    let mut edges = Vec::with_capacity(distinct.len() * 2);
    for &v in &distinct {
        edges.push(v - 1e-9);
        edges.push(v + 1e-9);
    }
    Histogram::from_sample(&edges, sample).unwrap()
}

#[test]
fn perfect_histogram_conserves_all_moments() {
    let sample = vec![1.0, 2.0, 2.0, 3.0, 7.0, 7.0, 7.0, 12.0, 20.0, 41.0];
    let hist = perfect_histogram(&sample);
    assert_eq!(hist.total_count(), sample.len() as u64);

    // 2e-9 wide bins leave Sheppard's correction far below the tolerance
    for estimator in [MomentEstimator::new(), MomentEstimator::without_correction()] {
        let calc = WeightedErrorCalculator::with_estimator(estimator);
        let (total, components) = calc.total(&sample, &hist, &[0.25; 4]).unwrap();
        for moment in Moment::ALL {
            assert!(
                components[&moment].raw_error_pct < 1e-8,
                "{moment} (correction {}): {}",
                estimator.applies_correction(),
                components[&moment].raw_error_pct
            );
        }
        assert!(total < 1e-8);
    }
}

/// Deterministic bell-shaped sample: a fine grid with Gaussian multiplicities
fn bell_sample(location: f64, scale: f64) -> Vec<f64> {
    let mut sample = Vec::new();
    for j in -400i32..=400 {
        let z = j as f64 * 0.01;
        let copies = (200.0 * (-z * z / 2.0).exp()).round() as usize;
        sample.extend(std::iter::repeat(location + scale * z).take(copies));
    }
    sample
}

#[test]
fn sheppard_correction_improves_variance_of_uniform_bins() {
    let sample = bell_sample(100.0, 15.0);
    let calc = WeightedErrorCalculator::new();
    for bins in [5, 10, 20] {
        let hist = BinningConfig::uniform(bins).build(&sample).unwrap();
        let corrected = calc.variance_error(&sample, &hist, true);
        let uncorrected = calc.variance_error(&sample, &hist, false);
        assert!(
            uncorrected > corrected,
            "{bins} bins: corrected {corrected} vs uncorrected {uncorrected}"
        );
    }
}

#[test]
fn coarse_binning_loses_more_variance_than_fine_binning() {
    let sample = normal_sample(3, 2000);
    let est = MomentEstimator::without_correction();
    let raw = sample_moments(&sample).variance;
    let coarse = est.estimate(&BinningConfig::uniform(4).build(&sample).unwrap());
    let fine = est.estimate(&BinningConfig::uniform(64).build(&sample).unwrap());
    assert!((coarse.variance - raw).abs() > (fine.variance - raw).abs());
}

proptest! {
    #[test]
    fn zero_weight_means_zero_weighted_error(
        seed in any::<u64>(),
        bins in 1usize..30,
        moment_idx in 0usize..4,
    ) {
        let mut rng = StdRng::seed_from_u64(seed);
        let dist = Uniform::new(-50.0, 50.0);
        let sample: Vec<f64> = (0..64).map(|_| dist.sample(&mut rng)).collect();
        let hist = BinningConfig::uniform(bins).build(&sample).unwrap();

        let calc = WeightedErrorCalculator::new();
        let moment = Moment::ALL[moment_idx];
        let (weighted, raw) = calc.per_moment(&sample, &hist, moment, 0.0).unwrap();
        prop_assert_eq!(weighted, 0.0);
        prop_assert!(raw >= 0.0);

        let (weighted, raw) = calc.per_moment(&sample, &hist, moment, 1.0).unwrap();
        prop_assert_eq!(weighted, raw);
    }

    #[test]
    fn total_is_sum_of_weighted_components(
        seed in any::<u64>(),
        w in prop::array::uniform4(0.0f64..1.0),
    ) {
        prop_assume!(w.iter().sum::<f64>() > 1e-6);
        let sample = normal_sample(seed, 200);
        let hist = BinningConfig::quantile(12).build(&sample).unwrap();

        let (total, components) = WeightedErrorCalculator::new().total(&sample, &hist, &w).unwrap();
        let weight_sum: f64 = components.values().map(|c| c.weight).sum();
        let weighted_sum: f64 = components.values().map(|c| c.weighted_error).sum();
        assert_abs_diff_eq!(weight_sum, 1.0, epsilon = 1e-12);
        assert_abs_diff_eq!(weighted_sum, total, epsilon = 1e-9);
    }

    #[test]
    fn disabling_sheppard_never_helps_smooth_samples(
        location in -1.0e3f64..1.0e3,
        scale in 0.5f64..50.0,
        bins in 3usize..=20,
    ) {
        let sample = bell_sample(location, scale);
        let hist = BinningConfig::uniform(bins).build(&sample).unwrap();
        let calc = WeightedErrorCalculator::new();
        let corrected = calc.variance_error(&sample, &hist, true);
        let uncorrected = calc.variance_error(&sample, &hist, false);
        prop_assert!(uncorrected > corrected);
    }
}
