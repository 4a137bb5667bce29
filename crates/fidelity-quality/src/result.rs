//! Quality verdicts

use fidelity_core::{AnalysisContext, Moment, MomentSet, PrecisionLevel, QualityTier};
use fidelity_moments::ErrorComponents;
use fidelity_shape::DistributionLabel;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Position inside a tier's score band is `1 / (1 + total / SCORE_SCALE)`
pub const SCORE_SCALE: f64 = 10.0;

/// Score band `[low, high]` owned by a tier
pub fn score_band(tier: QualityTier) -> (f64, f64) {
    match tier {
        QualityTier::Excellent => (0.9, 1.0),
        QualityTier::Good => (0.75, 0.9),
        QualityTier::Acceptable => (0.5, 0.75),
        QualityTier::Poor => (0.25, 0.5),
        QualityTier::Unacceptable => (0.0, 0.25),
    }
}

/// Composite score in `[0, 1]`.
///
/// The tier picks the band and the total error the position inside it, so
/// the score falls strictly with the error and a better tier always scores
/// higher.
pub fn composite_score(overall: QualityTier, total_error: f64) -> f64 {
    let (low, high) = score_band(overall);
    let position = if total_error.is_nan() {
        0.0
    } else {
        1.0 / (1.0 + total_error.max(0.0) / SCORE_SCALE)
    };
    low + (high - low) * position
}

/// Quality verdict for one (sample, histogram) pair
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QualityResult {
    /// Sum of the weighted per-moment errors
    pub total_error: f64,
    pub components: ErrorComponents,
    pub moment_tiers: BTreeMap<Moment, QualityTier>,
    pub total_tier: QualityTier,
    /// Tier allowed by the sample size alone
    pub size_tier: QualityTier,
    /// Worst of the moment, total and size tiers
    pub overall_tier: QualityTier,
    pub composite_score: f64,
    pub sample_size: usize,
    pub distribution: DistributionLabel,
    pub context: AnalysisContext,
    pub precision: Option<PrecisionLevel>,
    /// Normalized weights actually applied
    pub weights: [f64; 4],
    pub raw_moments: MomentSet,
    pub histogram_moments: MomentSet,
}

impl QualityResult {
    pub fn meets(&self, target: QualityTier) -> bool {
        self.overall_tier.is_at_least(target)
    }

    pub fn moment_tier(&self, moment: Moment) -> QualityTier {
        self.moment_tiers
            .get(&moment)
            .copied()
            .unwrap_or(QualityTier::Unacceptable)
    }

    pub fn raw_error(&self, moment: Moment) -> Option<f64> {
        self.components.get(&moment).map(|c| c.raw_error_pct)
    }

    /// Moment with the largest weighted error; the first one wins ties
    pub fn dominant_moment(&self) -> Option<Moment> {
        let mut best: Option<(Moment, f64)> = None;
        for (&moment, component) in &self.components {
            if best.map_or(true, |(_, e)| component.weighted_error > e) {
                best = Some((moment, component.weighted_error));
            }
        }
        best.map(|(moment, _)| moment)
    }
}

impl fmt::Display for QualityResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} (score {:.3}, total error {:.4}, {})",
            self.overall_tier, self.composite_score, self.total_error, self.distribution
        )
    }
}
