use fidelity_shape::test_data::TestDistributions;
use moment_fidelity::prelude::*;
use tracing_subscriber::EnvFilter;

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

fn normal_sample() -> Vec<f64> {
    TestDistributions::normal(100.0, 15.0, 1000, 42)
}

#[test]
fn twenty_uniform_bins_beat_five_on_a_normal_sample() {
    init_tracing();
    let registry = ThresholdRegistry::default();
    let evaluator = QualityEvaluator::new(&registry);
    let sample = normal_sample();
    let request = EvaluationRequest::new();

    let fine = BinningConfig::uniform(20).build(&sample).unwrap();
    let coarse = BinningConfig::uniform(5).build(&sample).unwrap();
    let fine = evaluator.evaluate(&sample, &fine, &request).unwrap();
    let coarse = evaluator.evaluate(&sample, &coarse, &request).unwrap();

    assert_eq!(fine.distribution.distribution_type, DistributionType::Normal);
    assert!(
        fine.overall_tier.is_at_least(QualityTier::Good),
        "20 bins graded {fine}"
    );
    assert!(fine.overall_tier < coarse.overall_tier);
    assert!(fine.composite_score > coarse.composite_score);
}

#[test]
fn one_bin_per_value_preserves_every_moment() {
    let sample = [1.0, 2.0, 2.0, 3.0, 3.0, 3.0, 4.0, 4.0, 5.0, 9.0];
    let edges: Vec<f64> = (0..=9).map(|v| f64::from(v) + 0.5).collect();
    let histogram = Histogram::from_sample(&edges, &sample).unwrap();
    assert_eq!(histogram.total_count(), sample.len() as u64);

    let registry = ThresholdRegistry::default();
    let evaluator =
        QualityEvaluator::new(&registry).with_estimator(MomentEstimator::without_correction());
    let result = evaluator
        .evaluate(&sample, &histogram, &EvaluationRequest::new())
        .unwrap();
    for moment in Moment::ALL {
        assert!(result.raw_error(moment).unwrap() < 1e-8, "{moment}");
    }
    assert!(result.total_error < 1e-8);
}

#[test]
fn default_pipeline_preserves_moments_with_narrow_bins() {
    let sample = [1.0, 2.0, 2.0, 3.0, 3.0, 3.0, 4.0, 4.0, 5.0, 9.0];
    let edges: Vec<f64> = [1.0, 2.0, 3.0, 4.0, 5.0, 9.0]
        .iter()
        .flat_map(|&v| [v - 1e-9, v + 1e-9])
        .collect();
    let histogram = Histogram::from_sample(&edges, &sample).unwrap();
    assert_eq!(histogram.total_count(), sample.len() as u64);

    let registry = ThresholdRegistry::default();
    let result = QualityEvaluator::new(&registry)
        .evaluate(&sample, &histogram, &EvaluationRequest::new())
        .unwrap();
    for moment in Moment::ALL {
        assert!(result.raw_error(moment).unwrap() < 1e-8, "{moment}");
    }
    assert!(result.total_error < 1e-8);
}

#[test]
fn evaluation_is_referentially_transparent() {
    let registry = ThresholdRegistry::default();
    let evaluator = QualityEvaluator::new(&registry);
    let sample = TestDistributions::lognormal();
    let histogram = BinningConfig::quantile(16).build(&sample).unwrap();
    let request = EvaluationRequest::new()
        .context(AnalysisContext::AnomalyDetection)
        .objective(Objective::TailRisk);

    let first = evaluator.evaluate(&sample, &histogram, &request).unwrap();
    let second = evaluator.evaluate(&sample, &histogram, &request).unwrap();
    assert_eq!(first, second);
    assert_eq!(first.total_error.to_bits(), second.total_error.to_bits());
    assert_eq!(
        first.composite_score.to_bits(),
        second.composite_score.to_bits()
    );
}

#[test]
fn optimizer_trace_matches_direct_evaluation() {
    init_tracing();
    let registry = ThresholdRegistry::default();
    let optimizer = BinningOptimizer::new(&registry);
    let sample = normal_sample();
    let request = OptimizationRequest::new(QualityTier::Excellent, [40, 5, 10, 20]);

    let outcome = optimizer.optimize(&sample, &request).unwrap();
    assert!(!outcome.trace.is_empty());
    if outcome.target_met {
        assert_eq!(outcome.trace.last().map(|a| a.config), Some(outcome.chosen));
    }

    let evaluator = optimizer.evaluator();
    for attempt in &outcome.trace {
        let histogram = attempt.config.build(&sample).unwrap();
        let direct = evaluator
            .evaluate(&sample, &histogram, &request.evaluation)
            .unwrap();
        assert_eq!(direct, attempt.result);
    }

    let histogram = outcome.chosen.build(&sample).unwrap();
    let direct = evaluator
        .evaluate(&sample, &histogram, &request.evaluation)
        .unwrap();
    assert_eq!(direct, outcome.result);
    assert_eq!(outcome.target_met, outcome.result.meets(QualityTier::Excellent));
}

#[test]
fn optimizer_is_deterministic() {
    let registry = ThresholdRegistry::default();
    let optimizer = BinningOptimizer::new(&registry);
    let sample = TestDistributions::right_skewed();
    let request = OptimizationRequest::new(QualityTier::Excellent, [4, 8, 16, 32])
        .context(AnalysisContext::Characterization);

    let a = optimizer.optimize(&sample, &request).unwrap();
    let b = optimizer.optimize(&sample, &request).unwrap();
    assert_eq!(a, b);
}

#[test]
fn optimizer_prefers_fewer_bins() {
    let registry = ThresholdRegistry::default();
    let optimizer = BinningOptimizer::new(&registry);
    let sample = normal_sample();
    let request = OptimizationRequest::new(QualityTier::Good, [5, 10, 20, 40])
        .strategies([BinningStrategy::Uniform]);

    let outcome = optimizer.optimize(&sample, &request).unwrap();
    assert!(outcome.target_met);
    let counts: Vec<usize> = outcome.trace.iter().map(|a| a.config.num_bins).collect();
    assert!(counts.windows(2).all(|w| w[0] < w[1]));
    assert_eq!(outcome.chosen, outcome.trace[outcome.trace.len() - 1].config);
    assert!(outcome.chosen.num_bins <= 20);
}

#[test]
fn disabling_sheppard_correction_does_not_help() {
    let mut sample = Vec::new();
    for j in -400i32..=400 {
        let z = f64::from(j) * 0.01;
        let copies = (200.0 * (-z * z / 2.0).exp()).round() as usize;
        sample.extend(std::iter::repeat(40.0 + 6.0 * z).take(copies));
    }
    let histogram = BinningConfig::uniform(12).build(&sample).unwrap();
    let registry = ThresholdRegistry::default();
    let request = EvaluationRequest::new().distribution(DistributionType::Normal);

    let corrected = QualityEvaluator::new(&registry)
        .evaluate(&sample, &histogram, &request)
        .unwrap();
    let uncorrected = QualityEvaluator::new(&registry)
        .with_estimator(MomentEstimator::without_correction())
        .evaluate(&sample, &histogram, &request)
        .unwrap();
    let variance = |r: &QualityResult| r.raw_error(Moment::Variance).unwrap();
    assert!(variance(&uncorrected) >= variance(&corrected));
}

#[test]
fn overrides_change_grading() {
    let registry = ThresholdRegistry::default();
    let sample = normal_sample();
    let histogram = BinningConfig::uniform(20).build(&sample).unwrap();
    let request = EvaluationRequest::new().distribution(DistributionType::Normal);
    let before = QualityEvaluator::new(&registry)
        .evaluate(&sample, &histogram, &request)
        .unwrap();

    // a tenfold tightening of every ceiling
    registry
        .load_overrides_json(
            r#"{"contexts": {"default": {
                "mean": 0.1, "variance": 0.1, "skewness": 0.1, "kurtosis": 0.1, "total": 0.1
            }}}"#,
        )
        .unwrap();
    let after = QualityEvaluator::new(&registry)
        .evaluate(&sample, &histogram, &request)
        .unwrap();

    assert_eq!(before.total_error, after.total_error);
    assert!(after.overall_tier >= before.overall_tier);
}

#[test]
fn result_serializes_with_stable_identifiers() {
    let registry = ThresholdRegistry::default();
    let sample = TestDistributions::bimodal_symmetric();
    let histogram = BinningConfig::uniform(30).build(&sample).unwrap();
    let result = QualityEvaluator::new(&registry)
        .evaluate(&sample, &histogram, &EvaluationRequest::new())
        .unwrap();

    let json = serde_json::to_value(&result).unwrap();
    assert_eq!(json["distribution"]["distribution_type"], "multimodal");
    assert_eq!(json["overall_tier"], result.overall_tier.name());
    assert!(json["components"]["variance"]["raw_error_pct"].is_number());
    assert!(json["moment_tiers"]["kurtosis"].is_string());
}
