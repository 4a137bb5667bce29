//! Moment identifiers, moment sets and importance weights

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Tolerance used when checking that a weight vector sums to one
pub const WEIGHT_SUM_TOLERANCE: f64 = 1e-9;

/// The four standardized moments tracked by the engine
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Moment {
    Mean,
    Variance,
    Skewness,
    Kurtosis,
}

impl Moment {
    /// All moments in weight-vector order
    pub const ALL: [Moment; 4] = [
        Moment::Mean,
        Moment::Variance,
        Moment::Skewness,
        Moment::Kurtosis,
    ];

    /// Position of this moment inside a weight vector
    pub fn index(&self) -> usize {
        *self as usize
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Mean => "mean",
            Self::Variance => "variance",
            Self::Skewness => "skewness",
            Self::Kurtosis => "kurtosis",
        }
    }
}

impl fmt::Display for Moment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl FromStr for Moment {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "mean" => Ok(Self::Mean),
            "variance" => Ok(Self::Variance),
            "skewness" => Ok(Self::Skewness),
            "kurtosis" => Ok(Self::Kurtosis),
            _ => Err(Error::unknown_key("moment", s)),
        }
    }
}

/// Mean, variance, skewness and (non-excess) kurtosis of a distribution
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MomentSet {
    pub mean: f64,
    pub variance: f64,
    pub skewness: f64,
    /// Non-excess kurtosis; a normal distribution gives 3
    pub kurtosis: f64,
}

impl MomentSet {
    /// Kurtosis reported for distributions without spread
    pub const DEGENERATE_KURTOSIS: f64 = 3.0;

    /// Second moments below this are treated as zero spread
    pub const DEGENERATE_VARIANCE: f64 = 1e-10;

    pub fn new(mean: f64, variance: f64, skewness: f64, kurtosis: f64) -> Self {
        Self {
            mean,
            variance,
            skewness,
            kurtosis,
        }
    }

    /// Build a moment set from central moments.
    ///
    /// `m2` is the second moment used both as the reported variance and as the
    /// scale of the shape ratios. When it is below
    /// [`MomentSet::DEGENERATE_VARIANCE`], skewness falls back to 0 and
    /// kurtosis to 3.
    pub fn from_central(mean: f64, m2: f64, m3: f64, m4: f64) -> Self {
        if m2 < Self::DEGENERATE_VARIANCE {
            return Self::new(mean, m2, 0.0, Self::DEGENERATE_KURTOSIS);
        }
        Self::new(mean, m2, m3 / m2.powf(1.5), m4 / (m2 * m2))
    }

    /// Moments of an empty distribution
    pub fn degenerate() -> Self {
        Self::new(0.0, 0.0, 0.0, Self::DEGENERATE_KURTOSIS)
    }

    pub fn get(&self, moment: Moment) -> f64 {
        match moment {
            Moment::Mean => self.mean,
            Moment::Variance => self.variance,
            Moment::Skewness => self.skewness,
            Moment::Kurtosis => self.kurtosis,
        }
    }

    /// Kurtosis minus the normal reference of 3
    pub fn excess_kurtosis(&self) -> f64 {
        self.kurtosis - 3.0
    }

    pub fn is_finite(&self) -> bool {
        Moment::ALL.iter().all(|&m| self.get(m).is_finite())
    }
}

impl fmt::Display for MomentSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "mean={:.4}, variance={:.4}, skewness={:.4}, kurtosis={:.4}",
            self.mean, self.variance, self.skewness, self.kurtosis
        )
    }
}

/// Importance weights for (mean, variance, skewness, kurtosis).
///
/// Every component lies in `[0, 1]` and the components sum to one.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "[f64; 4]", into = "[f64; 4]")]
pub struct WeightVector([f64; 4]);

impl WeightVector {
    /// Validate an already-normalized weight vector
    pub fn new(weights: [f64; 4]) -> Result<Self> {
        validate_components(&weights)?;
        let sum: f64 = weights.iter().sum();
        if (sum - 1.0).abs() > WEIGHT_SUM_TOLERANCE {
            return Err(Error::InvalidParameter(format!(
                "weights must sum to 1, got {sum}"
            )));
        }
        Ok(Self(weights))
    }

    /// Scale non-negative weights so they sum to one.
    ///
    /// Fails on an all-zero vector, which has no direction to normalize.
    pub fn normalized(weights: [f64; 4]) -> Result<Self> {
        validate_components(&weights)?;
        let sum: f64 = weights.iter().sum();
        if sum <= 0.0 {
            return Err(Error::InvalidParameter(
                "cannot normalize an all-zero weight vector".to_string(),
            ));
        }
        Ok(Self(weights.map(|w| w / sum)))
    }

    /// Normalize a weight slice, rejecting anything but four components
    pub fn from_slice(weights: &[f64]) -> Result<Self> {
        Self::normalized(to_array(weights)?)
    }

    /// Wrap a literal table row without validation.
    ///
    /// Meant for built-in constant tables; their rows are checked by tests.
    pub const fn from_table(weights: [f64; 4]) -> Self {
        Self(weights)
    }

    /// Equal weight on every moment
    pub fn uniform() -> Self {
        Self([0.25; 4])
    }

    pub fn get(&self, moment: Moment) -> f64 {
        self.0[moment.index()]
    }

    pub fn as_array(&self) -> [f64; 4] {
        self.0
    }

    pub fn sum(&self) -> f64 {
        self.0.iter().sum()
    }
}

impl TryFrom<[f64; 4]> for WeightVector {
    type Error = Error;

    fn try_from(weights: [f64; 4]) -> Result<Self> {
        Self::new(weights)
    }
}

impl From<WeightVector> for [f64; 4] {
    fn from(weights: WeightVector) -> Self {
        weights.0
    }
}

impl fmt::Display for WeightVector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[mean={:.3}, variance={:.3}, skewness={:.3}, kurtosis={:.3}]",
            self.0[0], self.0[1], self.0[2], self.0[3]
        )
    }
}

/// Convert a weight slice into a fixed array, failing on the wrong length
pub fn to_array(weights: &[f64]) -> Result<[f64; 4]> {
    <[f64; 4]>::try_from(weights).map_err(|_| {
        Error::InvalidParameter(format!(
            "weight vector must have 4 components, got {}",
            weights.len()
        ))
    })
}

fn validate_components(weights: &[f64; 4]) -> Result<()> {
    for (moment, &w) in Moment::ALL.iter().zip(weights.iter()) {
        if !w.is_finite() || w < 0.0 {
            return Err(Error::InvalidParameter(format!(
                "{moment} weight must be finite and non-negative, got {w}"
            )));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_moment_indices() {
        for (i, m) in Moment::ALL.iter().enumerate() {
            assert_eq!(m.index(), i);
            assert_eq!(m.name().parse::<Moment>().unwrap(), *m);
        }
        assert!("median".parse::<Moment>().is_err());
    }

    #[test]
    fn test_from_central_degenerate() {
        let set = MomentSet::from_central(5.0, 0.0, 1.0, 1.0);
        assert_eq!(set.skewness, 0.0);
        assert_eq!(set.kurtosis, 3.0);
        assert_eq!(set.mean, 5.0);
    }

    #[test]
    fn test_from_central_ratios() {
        let set = MomentSet::from_central(0.0, 4.0, 8.0, 48.0);
        assert_relative_eq!(set.skewness, 1.0);
        assert_relative_eq!(set.kurtosis, 3.0);
        assert_relative_eq!(set.excess_kurtosis(), 0.0);
    }

    #[test]
    fn test_weight_vector_validation() {
        assert!(WeightVector::new([0.4, 0.3, 0.2, 0.1]).is_ok());
        assert!(WeightVector::new([0.4, 0.3, 0.2, 0.2]).is_err());
        assert!(WeightVector::new([1.2, -0.2, 0.0, 0.0]).is_err());
        assert!(WeightVector::new([f64::NAN, 0.5, 0.5, 0.0]).is_err());
    }

    #[test]
    fn test_weight_vector_normalized() {
        let w = WeightVector::normalized([2.0, 1.0, 1.0, 0.0]).unwrap();
        assert_relative_eq!(w.get(Moment::Mean), 0.5);
        assert_relative_eq!(w.sum(), 1.0);
        assert!(WeightVector::normalized([0.0; 4]).is_err());
    }

    #[test]
    fn test_weight_vector_from_slice_length() {
        assert!(WeightVector::from_slice(&[0.5, 0.5, 0.0]).is_err());
        assert!(WeightVector::from_slice(&[0.2, 0.2, 0.2, 0.2, 0.2]).is_err());
        assert!(WeightVector::from_slice(&[1.0, 1.0, 1.0, 1.0]).is_ok());
    }

    #[test]
    fn test_weight_vector_serde() {
        let w = WeightVector::new([0.4, 0.3, 0.2, 0.1]).unwrap();
        let json = serde_json::to_string(&w).unwrap();
        assert_eq!(json, "[0.4,0.3,0.2,0.1]");
        let back: WeightVector = serde_json::from_str(&json).unwrap();
        assert_eq!(back, w);
        assert!(serde_json::from_str::<WeightVector>("[0.9,0.9,0.0,0.0]").is_err());
    }
}
