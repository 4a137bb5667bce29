//! Adaptive quality assessment of histogram moment conservation
//!
//! Given a raw sample and a histogram built from it, this crate measures how
//! well the histogram preserves the sample's mean, variance, skewness and
//! kurtosis. Weights and acceptance thresholds adapt to the detected shape of
//! the sample, the analysis context and an optional precision level. A
//! binning optimizer searches for the cheapest configuration that reaches a
//! target quality tier.
//!
//! # Crates
//!
//! - [`fidelity_core`]: error type, quality tiers, moments and table keys
//! - [`fidelity_histogram`]: histograms and the reference bin-edge builders
//! - [`fidelity_moments`]: moment estimation and weighted error comparison
//! - [`fidelity_shape`]: distribution shape and value-region classification
//! - [`fidelity_quality`]: weighting, thresholds, evaluation and optimization
//!
//! # Example
//!
//! ```rust
//! use moment_fidelity::prelude::*;
//!
//! let sample: Vec<f64> = (0..1000).map(|i| ((i * 37) % 1000) as f64 / 10.0).collect();
//! let registry = ThresholdRegistry::default();
//!
//! let histogram = BinningConfig::uniform(20).build(&sample).unwrap();
//! let result = QualityEvaluator::new(&registry)
//!     .evaluate(&sample, &histogram, &EvaluationRequest::new())
//!     .unwrap();
//! println!("{result}");
//!
//! let request = OptimizationRequest::new(QualityTier::Acceptable, [5, 10, 20, 40]);
//! let outcome = BinningOptimizer::new(&registry).optimize(&sample, &request).unwrap();
//! println!("chose {} (target met: {})", outcome.chosen, outcome.target_met);
//! ```

pub use fidelity_core;
pub use fidelity_histogram;
pub use fidelity_moments;
pub use fidelity_quality;
pub use fidelity_shape;

pub use fidelity_core::{Error, Result};

/// Prelude for convenient imports
pub mod prelude {
    pub use fidelity_core::prelude::*;
    pub use fidelity_histogram::{BinningConfig, BinningStrategy, Histogram, HistogramBuilder};
    pub use fidelity_moments::{sample_moments, MomentEstimator, WeightedErrorCalculator};
    pub use fidelity_quality::{
        AdaptiveWeightEngine, BinningOptimizer, EvaluationRequest, OptimizationRequest,
        OptimizationResult, QualityEvaluator, QualityResult, ThresholdRegistry,
    };
    pub use fidelity_shape::{DistributionClassifier, DistributionLabel, RegionTable};
}
