//! Distribution shape classification

use crate::modes::{ModeDetector, ModeSummary};
use crate::region::{RegionLabel, RegionTable};
use fidelity_core::{utils, DistributionType, MomentSet, Result};
use fidelity_moments::sample_moments;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Boundaries of the shape heuristics
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ShapeCutPoints {
    /// Minimum relative valley depth for separated modes to count as multimodal
    pub min_mode_separation: f64,
    /// Excess kurtosis above which a sample is leptokurtic
    pub leptokurtic_excess: f64,
    /// Absolute skewness at or above which a sample is asymmetric
    pub asymmetric_skewness: f64,
    /// Absolute skewness below which a sample may be normal
    pub normal_skewness: f64,
    /// Absolute excess kurtosis below which a sample may be normal
    pub normal_excess: f64,
    /// Sample size from which confidence is no longer discounted
    pub full_confidence_size: usize,
}

impl Default for ShapeCutPoints {
    fn default() -> Self {
        Self {
            min_mode_separation: 0.4,
            leptokurtic_excess: 2.0,
            asymmetric_skewness: 1.0,
            normal_skewness: 0.5,
            normal_excess: 1.0,
            full_confidence_size: 200,
        }
    }
}

/// Shape tag of a sample with its supporting statistics
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DistributionLabel {
    pub distribution_type: DistributionType,
    /// How deep the statistics sit inside the tag's interval, in `[0, 1]`
    pub confidence: f64,
    pub skewness: f64,
    pub excess_kurtosis: f64,
    /// `None` when the tag was supplied rather than detected
    pub mode_count: Option<usize>,
}

impl DistributionLabel {
    /// A caller-supplied tag, taken at full confidence
    pub fn assumed(distribution_type: DistributionType, moments: &MomentSet) -> Self {
        Self {
            distribution_type,
            confidence: 1.0,
            skewness: moments.skewness,
            excess_kurtosis: moments.excess_kurtosis(),
            mode_count: None,
        }
    }
}

impl fmt::Display for DistributionLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} (confidence {:.2})",
            self.distribution_type, self.confidence
        )
    }
}

/// Tags a sample's shape and, when a region table is configured, its value
/// region
#[derive(Debug, Clone, Default)]
pub struct DistributionClassifier {
    cut_points: ShapeCutPoints,
    mode_detector: ModeDetector,
    regions: Option<RegionTable>,
}

impl DistributionClassifier {
    pub fn new(cut_points: ShapeCutPoints, mode_detector: ModeDetector) -> Self {
        Self {
            cut_points,
            mode_detector,
            regions: None,
        }
    }

    pub fn with_regions(mut self, regions: RegionTable) -> Self {
        self.regions = Some(regions);
        self
    }

    pub fn cut_points(&self) -> &ShapeCutPoints {
        &self.cut_points
    }

    pub fn regions(&self) -> Option<&RegionTable> {
        self.regions.as_ref()
    }

    /// Classify the shape of a sample.
    ///
    /// Multimodality is checked first, then heavy tails, then asymmetry.
    /// Empty and constant samples are tagged `normal` with zero confidence.
    pub fn classify(&self, sample: &[f64]) -> Result<DistributionLabel> {
        utils::check_finite(sample, "sample")?;
        let moments = sample_moments(sample);
        if sample.is_empty() || moments.variance < MomentSet::DEGENERATE_VARIANCE {
            return Ok(DistributionLabel {
                distribution_type: DistributionType::Normal,
                confidence: 0.0,
                skewness: moments.skewness,
                excess_kurtosis: moments.excess_kurtosis(),
                mode_count: Some(1),
            });
        }
        let modes = self.mode_detector.detect(sample)?;
        Ok(self.label_from(&moments, &modes, sample.len()))
    }

    /// Classify from precomputed statistics
    pub fn label_from(
        &self,
        moments: &MomentSet,
        modes: &ModeSummary,
        sample_size: usize,
    ) -> DistributionLabel {
        let cp = &self.cut_points;
        let skew = moments.skewness;
        let abs_skew = skew.abs();
        let excess = moments.excess_kurtosis();
        let size_factor = (sample_size as f64 / cp.full_confidence_size.max(1) as f64)
            .sqrt()
            .min(1.0);

        let (distribution_type, depth) =
            if modes.mode_count >= 2 && modes.separation >= cp.min_mode_separation {
                (DistributionType::Multimodal, modes.separation)
            } else if excess > cp.leptokurtic_excess {
                let depth = (excess - cp.leptokurtic_excess) / cp.leptokurtic_excess;
                (DistributionType::Leptokurtic, depth)
            } else if abs_skew >= cp.asymmetric_skewness {
                (DistributionType::Asymmetric, abs_skew - cp.asymmetric_skewness)
            } else if abs_skew < cp.normal_skewness && excess.abs() < cp.normal_excess {
                let skew_depth = (cp.normal_skewness - abs_skew) / cp.normal_skewness;
                let excess_depth = (cp.normal_excess - excess.abs()) / cp.normal_excess;
                (DistributionType::Normal, skew_depth.min(excess_depth))
            } else {
                let skew_room = (cp.asymmetric_skewness - abs_skew)
                    / (cp.asymmetric_skewness - cp.normal_skewness);
                let tail_room = (cp.leptokurtic_excess - excess)
                    / (cp.leptokurtic_excess - cp.normal_excess);
                (DistributionType::QuasiNormal, skew_room.min(tail_room))
            };

        // Quasi-normal is a fallback tag and never reaches full confidence
        let (base, span) = match distribution_type {
            DistributionType::QuasiNormal => (0.4, 0.4),
            _ => (0.5, 0.5),
        };
        let depth = if depth.is_finite() { depth.clamp(0.0, 1.0) } else { 0.0 };
        let confidence = ((base + span * depth) * size_factor).clamp(0.0, 1.0);

        DistributionLabel {
            distribution_type,
            confidence,
            skewness: skew,
            excess_kurtosis: excess,
            mode_count: Some(modes.mode_count),
        }
    }

    /// Match the sample against the configured value regions.
    ///
    /// Returns `None` when no table is configured, the sample is empty, or no
    /// band contains the sample mean.
    pub fn classify_region(&self, sample: &[f64]) -> Result<Option<RegionLabel>> {
        utils::check_finite(sample, "sample")?;
        Ok(self
            .regions
            .as_ref()
            .and_then(|table| table.classify(sample)))
    }
}
