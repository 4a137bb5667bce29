//! Lookup keys for the weight and threshold tables
//!
//! Each key is a closed enum with a stable snake_case identifier. Parsing an
//! unknown identifier fails with [`Error::UnknownKey`] instead of falling back
//! to a default.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

fn normalize_key(s: &str) -> String {
    s.trim().to_ascii_lowercase().replace(['-', ' '], "_")
}

/// Shape tag assigned to a sample
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum DistributionType {
    #[default]
    Normal,
    QuasiNormal,
    Asymmetric,
    Leptokurtic,
    Multimodal,
}

impl DistributionType {
    pub const ALL: [DistributionType; 5] = [
        DistributionType::Normal,
        DistributionType::QuasiNormal,
        DistributionType::Asymmetric,
        DistributionType::Leptokurtic,
        DistributionType::Multimodal,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Self::Normal => "normal",
            Self::QuasiNormal => "quasi_normal",
            Self::Asymmetric => "asymmetric",
            Self::Leptokurtic => "leptokurtic",
            Self::Multimodal => "multimodal",
        }
    }
}

impl fmt::Display for DistributionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl FromStr for DistributionType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match normalize_key(s).as_str() {
            "normal" => Ok(Self::Normal),
            "quasi_normal" => Ok(Self::QuasiNormal),
            "asymmetric" => Ok(Self::Asymmetric),
            "leptokurtic" => Ok(Self::Leptokurtic),
            "multimodal" => Ok(Self::Multimodal),
            _ => Err(Error::unknown_key("distribution type", s)),
        }
    }
}

/// What the histogram is going to be used for
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum AnalysisContext {
    #[default]
    Default,
    Monitoring,
    Stability,
    AnomalyDetection,
    Characterization,
}

impl AnalysisContext {
    pub const ALL: [AnalysisContext; 5] = [
        AnalysisContext::Default,
        AnalysisContext::Monitoring,
        AnalysisContext::Stability,
        AnalysisContext::AnomalyDetection,
        AnalysisContext::Characterization,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Self::Default => "default",
            Self::Monitoring => "monitoring",
            Self::Stability => "stability",
            Self::AnomalyDetection => "anomaly_detection",
            Self::Characterization => "characterization",
        }
    }
}

impl fmt::Display for AnalysisContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl FromStr for AnalysisContext {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match normalize_key(s).as_str() {
            "default" => Ok(Self::Default),
            "monitoring" => Ok(Self::Monitoring),
            "stability" => Ok(Self::Stability),
            "anomaly_detection" => Ok(Self::AnomalyDetection),
            "characterization" => Ok(Self::Characterization),
            _ => Err(Error::unknown_key("analysis context", s)),
        }
    }
}

/// Requested strictness of the threshold tables
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PrecisionLevel {
    High,
    Medium,
    Low,
    Minimal,
}

impl PrecisionLevel {
    pub const ALL: [PrecisionLevel; 4] = [
        PrecisionLevel::High,
        PrecisionLevel::Medium,
        PrecisionLevel::Low,
        PrecisionLevel::Minimal,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Self::High => "high",
            Self::Medium => "medium",
            Self::Low => "low",
            Self::Minimal => "minimal",
        }
    }
}

impl fmt::Display for PrecisionLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl FromStr for PrecisionLevel {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match normalize_key(s).as_str() {
            "high" => Ok(Self::High),
            "medium" => Ok(Self::Medium),
            "low" => Ok(Self::Low),
            "minimal" => Ok(Self::Minimal),
            _ => Err(Error::unknown_key("precision level", s)),
        }
    }
}

/// Analysis objective that shifts weight towards particular moments
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Objective {
    CentralTendency,
    Dispersion,
    Shape,
    TailRisk,
    Balanced,
}

impl Objective {
    pub const ALL: [Objective; 5] = [
        Objective::CentralTendency,
        Objective::Dispersion,
        Objective::Shape,
        Objective::TailRisk,
        Objective::Balanced,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Self::CentralTendency => "central_tendency",
            Self::Dispersion => "dispersion",
            Self::Shape => "shape",
            Self::TailRisk => "tail_risk",
            Self::Balanced => "balanced",
        }
    }
}

impl fmt::Display for Objective {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl FromStr for Objective {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match normalize_key(s).as_str() {
            "central_tendency" => Ok(Self::CentralTendency),
            "dispersion" => Ok(Self::Dispersion),
            "shape" => Ok(Self::Shape),
            "tail_risk" => Ok(Self::TailRisk),
            "balanced" => Ok(Self::Balanced),
            _ => Err(Error::unknown_key("objective", s)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_distribution_type_parsing() {
        for t in DistributionType::ALL {
            assert_eq!(t.name().parse::<DistributionType>().unwrap(), t);
        }
        assert_eq!(
            "quasi-normal".parse::<DistributionType>().unwrap(),
            DistributionType::QuasiNormal
        );
        let err = "bimodal".parse::<DistributionType>().unwrap_err();
        assert!(matches!(err, Error::UnknownKey { kind: "distribution type", .. }));
    }

    #[test]
    fn test_context_parsing() {
        for c in AnalysisContext::ALL {
            assert_eq!(c.to_string().parse::<AnalysisContext>().unwrap(), c);
        }
        assert_eq!(
            "Anomaly Detection".parse::<AnalysisContext>().unwrap(),
            AnalysisContext::AnomalyDetection
        );
        assert!("forecasting".parse::<AnalysisContext>().is_err());
    }

    #[test]
    fn test_precision_and_objective_parsing() {
        for p in PrecisionLevel::ALL {
            assert_eq!(p.name().parse::<PrecisionLevel>().unwrap(), p);
        }
        for o in Objective::ALL {
            assert_eq!(o.name().parse::<Objective>().unwrap(), o);
        }
        assert!("ultra".parse::<PrecisionLevel>().is_err());
        assert!("tails".parse::<Objective>().is_err());
    }

    #[test]
    fn test_serde_identifiers() {
        assert_eq!(
            serde_json::to_string(&DistributionType::QuasiNormal).unwrap(),
            "\"quasi_normal\""
        );
        assert_eq!(
            serde_json::to_string(&AnalysisContext::AnomalyDetection).unwrap(),
            "\"anomaly_detection\""
        );
        let o: Objective = serde_json::from_str("\"tail_risk\"").unwrap();
        assert_eq!(o, Objective::TailRisk);
    }
}
