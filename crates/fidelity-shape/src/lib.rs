//! Distribution shape detection for histogram fidelity analysis
//!
//! The [`DistributionClassifier`] tags a sample as `normal`, `quasi_normal`,
//! `asymmetric`, `leptokurtic` or `multimodal` from its skewness, excess
//! kurtosis and the number of separated modes found by the [`ModeDetector`].
//! Every tag carries a confidence in `[0, 1]` that grows with how deep the
//! statistics sit inside the tag's interval.
//!
//! A [`RegionTable`] of named value bands can be attached to tag the value
//! range a sample lives in.
//!
//! # Example
//!
//! ```rust
//! use fidelity_shape::DistributionClassifier;
//!
//! let sample: Vec<f64> = (0..500).map(|i| ((i * 7919) % 1000) as f64 / 10.0).collect();
//! let label = DistributionClassifier::default().classify(&sample).unwrap();
//! assert!(label.confidence >= 0.0 && label.confidence <= 1.0);
//! println!("{label}");
//! ```

pub mod classifier;
pub mod modes;
pub mod region;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_data;

pub use classifier::{DistributionClassifier, DistributionLabel, ShapeCutPoints};
pub use modes::{ModeDetector, ModeDetectorBuilder, ModeDetectorConfig, ModeSummary};
pub use region::{RegionBand, RegionLabel, RegionTable};
