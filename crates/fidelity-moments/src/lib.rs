//! Moment estimation and moment-conservation errors
//!
//! This crate measures how well a histogram preserves the first four moments
//! of the sample it was built from:
//!
//! - [`sample_moments`]: population moments of the raw sample
//! - [`MomentEstimator`]: moments rebuilt from bin centers, with optional
//!   Sheppard correction of the variance
//! - [`WeightedErrorCalculator`]: per-moment relative errors and their
//!   weighted total
//!
//! # Example
//!
//! ```rust
//! use fidelity_histogram::{BinningConfig, HistogramBuilder};
//! use fidelity_moments::WeightedErrorCalculator;
//!
//! let sample: Vec<f64> = (0..200).map(|i| (i as f64 * 0.37).sin() * 10.0).collect();
//! let histogram = BinningConfig::uniform(16).build(&sample).unwrap();
//!
//! let calc = WeightedErrorCalculator::new();
//! let (total, components) = calc.total(&sample, &histogram, &[0.4, 0.3, 0.2, 0.1]).unwrap();
//! assert_eq!(components.len(), 4);
//! assert!(total >= 0.0);
//! ```

pub mod comparison;
pub mod estimator;
pub mod sample;

pub use comparison::{
    compare_moments, relative_error, ErrorComponent, ErrorComponents, WeightedErrorCalculator,
};
pub use estimator::{sheppard_correction, MomentEstimator};
pub use sample::sample_moments;
