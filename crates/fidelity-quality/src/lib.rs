//! Adaptive quality grading of histogram moment conservation
//!
//! This crate ties the lower layers together:
//!
//! - [`AdaptiveWeightEngine`] picks the moment weights from the analysis
//!   context, the detected shape and an optional objective
//! - [`ThresholdRegistry`] owns the tiered error ceilings
//! - [`QualityEvaluator`] grades one histogram of a sample
//! - [`BinningOptimizer`] searches binning configurations for the cheapest
//!   one that reaches a target tier
//!
//! # Example
//!
//! ```rust
//! use fidelity_histogram::{BinningConfig, HistogramBuilder};
//! use fidelity_quality::{EvaluationRequest, QualityEvaluator, ThresholdRegistry};
//!
//! let sample: Vec<f64> = (0..400).map(|i| (i as f64 * 0.37).sin() * 10.0 + 50.0).collect();
//! let histogram = BinningConfig::uniform(16).build(&sample).unwrap();
//!
//! let registry = ThresholdRegistry::default();
//! let result = QualityEvaluator::new(&registry)
//!     .evaluate(&sample, &histogram, &EvaluationRequest::new())
//!     .unwrap();
//! assert!(result.composite_score >= 0.0 && result.composite_score <= 1.0);
//! println!("{result}");
//! ```

pub mod evaluator;
pub mod optimizer;
pub mod result;
pub mod thresholds;
pub mod weights;

pub use evaluator::{EvaluationRequest, QualityEvaluator};
pub use optimizer::{
    Attempt, BinningOptimizer, HistogramFactory, OptimizationRequest, OptimizationResult,
    StandardBinning,
};
pub use result::{composite_score, score_band, QualityResult};
pub use thresholds::{
    ContextMultipliers, EntryConfig, MetricCeilings, RegistryKey, SampleSizeRequirements,
    ThresholdOverrides, ThresholdRegistry, ThresholdSet, ThresholdTables, TierCeilings,
};
pub use weights::{AdaptiveWeightEngine, WeightInfluence, WeightSignal, WeightTables};
