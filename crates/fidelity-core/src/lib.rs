//! Core types for histogram moment fidelity analysis
//!
//! This crate holds the vocabulary shared by every other fidelity crate:
//!
//! - the unified [`Error`] type and [`Result`] alias
//! - the ordered [`QualityTier`] grade
//! - [`Moment`], [`MomentSet`] and the validated [`WeightVector`]
//! - the table keys [`DistributionType`], [`AnalysisContext`],
//!   [`PrecisionLevel`] and [`Objective`]

pub mod error;
pub mod keys;
pub mod moments;
pub mod tier;
pub mod utils;

pub use error::{Error, Result};
pub use keys::{AnalysisContext, DistributionType, Objective, PrecisionLevel};
pub use moments::{Moment, MomentSet, WeightVector, WEIGHT_SUM_TOLERANCE};
pub use tier::QualityTier;

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::{
        AnalysisContext, DistributionType, Error, Moment, MomentSet, Objective, PrecisionLevel,
        QualityTier, Result, WeightVector,
    };
}
