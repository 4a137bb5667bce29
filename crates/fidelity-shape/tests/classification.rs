use fidelity_core::{DistributionType, MomentSet};
use fidelity_shape::test_data::TestDistributions;
use fidelity_shape::{
    DistributionClassifier, ModeDetector, ModeDetectorBuilder, ModeDetectorConfig, ModeSummary,
    RegionBand, RegionTable, ShapeCutPoints,
};
use proptest::prelude::*;

#[test]
fn lognormal_is_leptokurtic_before_asymmetric() {
    let label = DistributionClassifier::default()
        .classify(&TestDistributions::lognormal())
        .unwrap();
    assert_eq!(label.distribution_type, DistributionType::Leptokurtic);
    assert!(label.skewness > 1.0);
}

#[test]
fn inverted_bin_range_still_classifies() {
    let detector = ModeDetector::new(ModeDetectorConfig {
        min_bins: 50,
        max_bins: 10,
        ..ModeDetectorConfig::default()
    });
    let classifier = DistributionClassifier::new(ShapeCutPoints::default(), detector);
    let label = classifier
        .classify(&TestDistributions::bimodal_symmetric())
        .unwrap();
    assert_eq!(label.distribution_type, DistributionType::Multimodal);
}

#[test]
fn trimodal_is_multimodal() {
    let label = DistributionClassifier::default()
        .classify(&TestDistributions::trimodal_symmetric())
        .unwrap();
    assert_eq!(label.distribution_type, DistributionType::Multimodal);
    assert_eq!(label.mode_count, Some(3));
}

#[test]
fn cut_points_are_configurable() {
    let strict_normal = ShapeCutPoints {
        normal_skewness: 0.01,
        normal_excess: 0.01,
        ..ShapeCutPoints::default()
    };
    let classifier = DistributionClassifier::new(strict_normal, Default::default());
    let moments = MomentSet::new(0.0, 1.0, 0.2, 3.3);
    let modes = ModeSummary {
        mode_count: 1,
        separation: 0.0,
        peak_locations: vec![0.0],
    };
    let label = classifier.label_from(&moments, &modes, 1000);
    assert_eq!(label.distribution_type, DistributionType::QuasiNormal);

    let label = DistributionClassifier::default().label_from(&moments, &modes, 1000);
    assert_eq!(label.distribution_type, DistributionType::Normal);
}

#[test]
fn unseparated_modes_fall_through_to_moment_checks() {
    let classifier = DistributionClassifier::default();
    let moments = MomentSet::new(0.0, 1.0, 0.0, 3.0);
    let shallow = ModeSummary {
        mode_count: 2,
        separation: 0.1,
        peak_locations: vec![-1.0, 1.0],
    };
    let label = classifier.label_from(&moments, &shallow, 1000);
    assert_eq!(label.distribution_type, DistributionType::Normal);
}

#[test]
fn unreachable_separation_collapses_modes() {
    let sample = TestDistributions::bimodal_symmetric();
    let default = ModeDetectorBuilder::new().build();
    let never_separated = ModeDetectorBuilder::new().min_separation_bins(100).build();
    assert_eq!(default.detect(&sample).unwrap().mode_count, 2);
    assert_eq!(never_separated.detect(&sample).unwrap().mode_count, 1);
}

#[test]
fn region_table_attached_to_classifier() {
    let table = RegionTable::from_json(
        r#"[
            {"name": "cold", "lower": -1e308, "upper": 0.0},
            {"name": "mild", "lower": 0.0, "upper": 25.0},
            {"name": "hot", "lower": 25.0, "upper": 1e308}
        ]"#,
    )
    .unwrap();
    let classifier = DistributionClassifier::default().with_regions(table);

    let label = classifier
        .classify_region(&[12.0, 14.0, 16.0, 18.0])
        .unwrap()
        .unwrap();
    assert_eq!(label.name, "mild");
    assert!(label.confidence > 0.5);

    assert!(DistributionClassifier::default()
        .classify_region(&[1.0, 2.0])
        .unwrap()
        .is_none());
}

#[test]
fn region_table_round_trips_through_json() {
    let table = RegionTable::new(vec![
        RegionBand::new("low", 0.0, 1.0),
        RegionBand::new("high", 1.0, 2.0),
    ])
    .unwrap();
    let json = serde_json::to_string(&table).unwrap();
    assert_eq!(RegionTable::from_json(&json).unwrap(), table);
}

proptest! {
    #[test]
    fn confidence_always_in_unit_interval(
        sample in prop::collection::vec(-1.0e4f64..1.0e4, 0..400),
    ) {
        let label = DistributionClassifier::default().classify(&sample).unwrap();
        prop_assert!((0.0..=1.0).contains(&label.confidence));
    }

    #[test]
    fn label_confidence_bounded_for_any_statistics(
        skewness in -10.0f64..10.0,
        kurtosis in 1.0f64..50.0,
        mode_count in 1usize..5,
        separation in 0.0f64..1.0,
        n in 1usize..5000,
    ) {
        let moments = MomentSet::new(0.0, 1.0, skewness, kurtosis);
        let modes = ModeSummary { mode_count, separation, peak_locations: vec![0.0; mode_count] };
        let label = DistributionClassifier::default().label_from(&moments, &modes, n);
        prop_assert!((0.0..=1.0).contains(&label.confidence));
    }
}
