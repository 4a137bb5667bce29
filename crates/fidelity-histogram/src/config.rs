//! Binning configurations: a strategy paired with a bin count

use crate::builders::{LogarithmicBuilder, QuantileBuilder, UniformBuilder};
use crate::traits::HistogramBuilder;
use crate::types::Histogram;
use fidelity_core::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// How bin edges are placed
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BinningStrategy {
    /// Equal-width bins
    Uniform,
    /// Equal-frequency bins
    Quantile,
    /// Equal width in log space; positive data only
    Logarithmic,
}

impl BinningStrategy {
    /// All strategies in their default search order
    pub const ALL: [BinningStrategy; 3] = [
        BinningStrategy::Uniform,
        BinningStrategy::Quantile,
        BinningStrategy::Logarithmic,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Self::Uniform => "uniform",
            Self::Quantile => "quantile",
            Self::Logarithmic => "logarithmic",
        }
    }
}

impl fmt::Display for BinningStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl FromStr for BinningStrategy {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "uniform" => Ok(Self::Uniform),
            "quantile" => Ok(Self::Quantile),
            "logarithmic" | "log" => Ok(Self::Logarithmic),
            _ => Err(Error::unknown_key("binning strategy", s)),
        }
    }
}

/// A binning strategy together with the requested number of bins
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BinningConfig {
    pub strategy: BinningStrategy,
    pub num_bins: usize,
}

impl BinningConfig {
    pub fn new(strategy: BinningStrategy, num_bins: usize) -> Self {
        Self { strategy, num_bins }
    }

    pub fn uniform(num_bins: usize) -> Self {
        Self::new(BinningStrategy::Uniform, num_bins)
    }

    pub fn quantile(num_bins: usize) -> Self {
        Self::new(BinningStrategy::Quantile, num_bins)
    }

    pub fn logarithmic(num_bins: usize) -> Self {
        Self::new(BinningStrategy::Logarithmic, num_bins)
    }

    /// Reject a zero bin count
    pub fn validate(&self) -> Result<()> {
        if self.num_bins == 0 {
            return Err(Error::InvalidParameter(
                "num_bins must be positive".to_string(),
            ));
        }
        Ok(())
    }
}

impl HistogramBuilder for BinningConfig {
    fn build_sorted(&self, sorted_sample: &[f64]) -> Result<Histogram> {
        self.validate()?;
        match self.strategy {
            BinningStrategy::Uniform => UniformBuilder::new(self.num_bins).build_sorted(sorted_sample),
            BinningStrategy::Quantile => {
                QuantileBuilder::new(self.num_bins).build_sorted(sorted_sample)
            }
            BinningStrategy::Logarithmic => {
                LogarithmicBuilder::new(self.num_bins).build_sorted(sorted_sample)
            }
        }
    }

    fn target_bins(&self) -> Option<usize> {
        Some(self.num_bins)
    }
}

impl fmt::Display for BinningConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.strategy, self.num_bins)
    }
}
