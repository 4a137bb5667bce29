//! Ordered quality tiers shared by every grading component

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Quality grade of a histogram, best first.
///
/// The derived ordering follows the declaration order, so
/// `Excellent < Good < Acceptable < Poor < Unacceptable`. A *smaller* tier is
/// a *better* tier; use [`QualityTier::is_at_least`] when asking whether a
/// result meets a target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QualityTier {
    Excellent,
    Good,
    Acceptable,
    Poor,
    /// Everything beyond the poor ceiling. Its ceiling is +∞.
    Unacceptable,
}

impl QualityTier {
    /// All tiers, best to worst
    pub const ALL: [QualityTier; 5] = [
        QualityTier::Excellent,
        QualityTier::Good,
        QualityTier::Acceptable,
        QualityTier::Poor,
        QualityTier::Unacceptable,
    ];

    /// The four tiers that carry a finite ceiling, best to worst
    pub const BOUNDED: [QualityTier; 4] = [
        QualityTier::Excellent,
        QualityTier::Good,
        QualityTier::Acceptable,
        QualityTier::Poor,
    ];

    /// Lowercase identifier used in configuration files and reports
    pub fn name(&self) -> &'static str {
        match self {
            Self::Excellent => "excellent",
            Self::Good => "good",
            Self::Acceptable => "acceptable",
            Self::Poor => "poor",
            Self::Unacceptable => "unacceptable",
        }
    }

    /// Position in the best-to-worst order (0 = excellent)
    pub fn rank(&self) -> usize {
        *self as usize
    }

    /// True when `self` is as good as `target` or better
    pub fn is_at_least(&self, target: QualityTier) -> bool {
        *self <= target
    }

    /// The worse of two tiers
    pub fn worse(self, other: QualityTier) -> QualityTier {
        self.max(other)
    }

    /// The worst tier of a collection; `Excellent` for an empty one
    pub fn worst_of<I>(tiers: I) -> QualityTier
    where
        I: IntoIterator<Item = QualityTier>,
    {
        tiers
            .into_iter()
            .fold(QualityTier::Excellent, QualityTier::worse)
    }
}

impl fmt::Display for QualityTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl FromStr for QualityTier {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "excellent" => Ok(Self::Excellent),
            "good" => Ok(Self::Good),
            "acceptable" => Ok(Self::Acceptable),
            "poor" => Ok(Self::Poor),
            "unacceptable" => Ok(Self::Unacceptable),
            _ => Err(Error::unknown_key("quality tier", s)),
        }
    }
}
