//! Value-region tagging against a configurable table of numeric bands

use fidelity_core::{utils, Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::path::Path;

/// A named half-open value band `[lower, upper)`.
///
/// Either bound may be infinite to leave the band open-ended.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegionBand {
    pub name: String,
    pub lower: f64,
    pub upper: f64,
}

impl RegionBand {
    pub fn new(name: impl Into<String>, lower: f64, upper: f64) -> Self {
        Self {
            name: name.into(),
            lower,
            upper,
        }
    }

    pub fn contains(&self, value: f64) -> bool {
        value >= self.lower && value < self.upper
    }
}

/// Region tag of a sample
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegionLabel {
    pub name: String,
    /// Blend of how central the sample mean sits in the band and how much of
    /// the sample range the band covers, in `[0, 1]`
    pub confidence: f64,
}

impl fmt::Display for RegionLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (confidence {:.2})", self.name, self.confidence)
    }
}

/// Ordered list of value bands; the first band containing the sample mean wins
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<RegionBand>", into = "Vec<RegionBand>")]
pub struct RegionTable {
    bands: Vec<RegionBand>,
}

impl TryFrom<Vec<RegionBand>> for RegionTable {
    type Error = Error;

    fn try_from(bands: Vec<RegionBand>) -> Result<Self> {
        Self::new(bands)
    }
}

impl From<RegionTable> for Vec<RegionBand> {
    fn from(table: RegionTable) -> Self {
        table.bands
    }
}

impl RegionTable {
    /// Validate and wrap a list of bands.
    ///
    /// Names must be non-empty and unique; bounds must not be NaN and
    /// `lower < upper`.
    pub fn new(bands: Vec<RegionBand>) -> Result<Self> {
        let mut seen = BTreeSet::new();
        for band in &bands {
            if band.name.trim().is_empty() {
                return Err(Error::InvalidConfig(
                    "region band name must not be empty".to_string(),
                ));
            }
            if !seen.insert(band.name.as_str()) {
                return Err(Error::InvalidConfig(format!(
                    "duplicate region band '{}'",
                    band.name
                )));
            }
            if band.lower.is_nan() || band.upper.is_nan() || band.lower >= band.upper {
                return Err(Error::InvalidConfig(format!(
                    "region band '{}' needs lower < upper, got [{}, {})",
                    band.name, band.lower, band.upper
                )));
            }
        }
        Ok(Self { bands })
    }

    /// Parse a JSON array of `{"name", "lower", "upper"}` objects
    pub fn from_json(json: &str) -> Result<Self> {
        let bands: Vec<RegionBand> = serde_json::from_str(json)?;
        Self::new(bands)
    }

    /// Load a JSON band table from disk
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        Self::from_json(&std::fs::read_to_string(path)?)
    }

    pub fn bands(&self) -> &[RegionBand] {
        &self.bands
    }

    /// Tag a finite sample by the band containing its mean
    pub fn classify(&self, sample: &[f64]) -> Option<RegionLabel> {
        let (min, max) = utils::min_max(sample)?;
        let mean = utils::mean(sample);
        let band = self.bands.iter().find(|b| b.contains(mean))?;

        let range = max - min;
        let edge_distance = (mean - band.lower).min(band.upper - mean);
        let half_width = (band.upper - band.lower) / 2.0;
        let depth = if half_width.is_finite() {
            edge_distance / half_width
        } else if edge_distance.is_infinite() || range <= 0.0 {
            1.0
        } else {
            edge_distance / range
        };

        let coverage = if range > 0.0 {
            let overlap = max.min(band.upper) - min.max(band.lower);
            overlap.max(0.0) / range
        } else {
            1.0
        };

        let confidence = 0.5 * depth.clamp(0.0, 1.0) + 0.5 * coverage.clamp(0.0, 1.0);
        Some(RegionLabel {
            name: band.name.clone(),
            confidence,
        })
    }
}
