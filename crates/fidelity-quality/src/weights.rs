//! Adaptive moment weighting
//!
//! The weight vector starts from the analysis context and is pulled towards
//! the distribution-specific correction and, optionally, an objective vector.
//! Each pull is scaled by the confidence of its signal.

use fidelity_core::{
    AnalysisContext, DistributionType, Error, Objective, Result, WeightVector,
};
use fidelity_shape::DistributionLabel;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Base weights per analysis context
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ContextWeights {
    pub default: WeightVector,
    pub monitoring: WeightVector,
    pub stability: WeightVector,
    pub anomaly_detection: WeightVector,
    pub characterization: WeightVector,
}

impl Default for ContextWeights {
    fn default() -> Self {
        Self {
            default: WeightVector::from_table([0.40, 0.30, 0.20, 0.10]),
            monitoring: WeightVector::from_table([0.45, 0.35, 0.12, 0.08]),
            stability: WeightVector::from_table([0.30, 0.45, 0.15, 0.10]),
            anomaly_detection: WeightVector::from_table([0.15, 0.25, 0.25, 0.35]),
            characterization: WeightVector::from_table([0.25; 4]),
        }
    }
}

impl ContextWeights {
    pub fn get(&self, context: AnalysisContext) -> WeightVector {
        match context {
            AnalysisContext::Default => self.default,
            AnalysisContext::Monitoring => self.monitoring,
            AnalysisContext::Stability => self.stability,
            AnalysisContext::AnomalyDetection => self.anomaly_detection,
            AnalysisContext::Characterization => self.characterization,
        }
    }
}

/// Correction vectors per distribution type
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DistributionWeights {
    pub normal: WeightVector,
    pub quasi_normal: WeightVector,
    pub asymmetric: WeightVector,
    pub leptokurtic: WeightVector,
    pub multimodal: WeightVector,
}

impl Default for DistributionWeights {
    fn default() -> Self {
        Self {
            // Skewness of a normal sample is noise around zero
            normal: WeightVector::from_table([0.50, 0.42, 0.00, 0.08]),
            quasi_normal: WeightVector::from_table([0.40, 0.32, 0.16, 0.12]),
            asymmetric: WeightVector::from_table([0.30, 0.25, 0.30, 0.15]),
            leptokurtic: WeightVector::from_table([0.25, 0.25, 0.15, 0.35]),
            multimodal: WeightVector::from_table([0.30, 0.30, 0.20, 0.20]),
        }
    }
}

impl DistributionWeights {
    pub fn get(&self, distribution_type: DistributionType) -> WeightVector {
        match distribution_type {
            DistributionType::Normal => self.normal,
            DistributionType::QuasiNormal => self.quasi_normal,
            DistributionType::Asymmetric => self.asymmetric,
            DistributionType::Leptokurtic => self.leptokurtic,
            DistributionType::Multimodal => self.multimodal,
        }
    }
}

/// Weight vectors per analysis objective
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ObjectiveWeights {
    pub central_tendency: WeightVector,
    pub dispersion: WeightVector,
    pub shape: WeightVector,
    pub tail_risk: WeightVector,
    pub balanced: WeightVector,
}

impl Default for ObjectiveWeights {
    fn default() -> Self {
        Self {
            central_tendency: WeightVector::from_table([0.60, 0.25, 0.10, 0.05]),
            dispersion: WeightVector::from_table([0.20, 0.60, 0.10, 0.10]),
            shape: WeightVector::from_table([0.10, 0.15, 0.40, 0.35]),
            tail_risk: WeightVector::from_table([0.10, 0.20, 0.25, 0.45]),
            balanced: WeightVector::from_table([0.25; 4]),
        }
    }
}

impl ObjectiveWeights {
    pub fn get(&self, objective: Objective) -> WeightVector {
        match objective {
            Objective::CentralTendency => self.central_tendency,
            Objective::Dispersion => self.dispersion,
            Objective::Shape => self.shape,
            Objective::TailRisk => self.tail_risk,
            Objective::Balanced => self.balanced,
        }
    }
}

/// All weight lookup tables.
///
/// Deserialized rows are validated by [`WeightVector`] itself, so a table
/// loaded from JSON always holds normalized vectors.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct WeightTables {
    pub contexts: ContextWeights,
    pub distributions: DistributionWeights,
    pub objectives: ObjectiveWeights,
}

impl WeightTables {
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        Self::from_json(&std::fs::read_to_string(path)?)
    }

    /// Check that every row is a normalized weight vector, naming the first
    /// row that is not
    pub fn validate(&self) -> Result<()> {
        let rows = AnalysisContext::ALL
            .iter()
            .map(|&c| (format!("contexts.{c}"), self.contexts.get(c)))
            .chain(
                DistributionType::ALL
                    .iter()
                    .map(|&d| (format!("distributions.{d}"), self.distributions.get(d))),
            )
            .chain(
                Objective::ALL
                    .iter()
                    .map(|&o| (format!("objectives.{o}"), self.objectives.get(o))),
            );
        for (field, row) in rows {
            WeightVector::new(row.as_array())
                .map_err(|e| Error::InvalidConfig(format!("{field}: {e}")))?;
        }
        Ok(())
    }
}

/// How strongly each signal may pull the weights away from the context
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WeightInfluence {
    /// Multiplier on the distribution label confidence, in `[0, 1]`
    pub distribution: f64,
    /// Multiplier on the objective confidence, in `[0, 1]`
    pub objective: f64,
    /// Upper bound on the combined strength of both signals
    pub max_blend: f64,
}

impl Default for WeightInfluence {
    fn default() -> Self {
        Self {
            distribution: 1.0,
            objective: 0.5,
            max_blend: 0.95,
        }
    }
}

impl WeightInfluence {
    /// Context weights only; labels and objectives are ignored
    pub fn context_only() -> Self {
        Self {
            distribution: 0.0,
            objective: 0.0,
            ..Self::default()
        }
    }

    /// Labels nudge the weights but the context keeps the larger share
    pub fn conservative() -> Self {
        Self {
            distribution: 0.5,
            objective: 0.25,
            max_blend: 0.75,
        }
    }

    /// Clamp every field into its valid range. NaN becomes zero.
    pub fn sanitized(self) -> Self {
        Self {
            distribution: unit(self.distribution),
            objective: unit(self.objective),
            max_blend: unit(self.max_blend),
        }
    }
}

fn unit(x: f64) -> f64 {
    if x.is_nan() {
        0.0
    } else {
        x.clamp(0.0, 1.0)
    }
}

/// A weight vector together with how much it should be trusted
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WeightSignal {
    pub weights: WeightVector,
    pub confidence: f64,
}

impl WeightSignal {
    pub fn new(weights: WeightVector, confidence: f64) -> Self {
        Self {
            weights,
            confidence,
        }
    }
}

/// Derives the moment weight vector from context, shape and objective
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct AdaptiveWeightEngine {
    tables: WeightTables,
    influence: WeightInfluence,
}

impl AdaptiveWeightEngine {
    /// Engine over custom tables, validated up front
    pub fn new(tables: WeightTables, influence: WeightInfluence) -> Result<Self> {
        tables.validate()?;
        Ok(Self {
            tables,
            influence: influence.sanitized(),
        })
    }

    /// Built-in tables with the given influence
    pub fn with_influence(influence: WeightInfluence) -> Self {
        Self {
            tables: WeightTables::default(),
            influence: influence.sanitized(),
        }
    }

    pub fn tables(&self) -> &WeightTables {
        &self.tables
    }

    pub fn influence(&self) -> &WeightInfluence {
        &self.influence
    }

    pub fn base_weights(&self, context: AnalysisContext) -> WeightVector {
        self.tables.contexts.get(context)
    }

    pub fn correction(&self, distribution_type: DistributionType) -> WeightVector {
        self.tables.distributions.get(distribution_type)
    }

    pub fn objective_weights(&self, objective: Objective) -> WeightVector {
        self.tables.objectives.get(objective)
    }

    /// Effective blend strengths `(distribution, objective)` for the given
    /// signal confidences.
    ///
    /// Each strength is the clamped confidence times its influence. When the
    /// two together exceed `max_blend` they are scaled down proportionally.
    pub fn blend_strengths(
        &self,
        distribution_confidence: Option<f64>,
        objective_confidence: Option<f64>,
    ) -> (f64, f64) {
        let s_d = distribution_confidence.map_or(0.0, unit) * self.influence.distribution;
        let s_o = objective_confidence.map_or(0.0, unit) * self.influence.objective;
        let total = s_d + s_o;
        if total > self.influence.max_blend {
            let scale = self.influence.max_blend / total;
            (s_d * scale, s_o * scale)
        } else {
            (s_d, s_o)
        }
    }

    /// Confidence-scaled blend of the context vector with the optional
    /// distribution and objective signals, renormalized to sum to one.
    ///
    /// Without any effective signal the context weights come back unchanged.
    pub fn combine(
        &self,
        context: WeightVector,
        distribution: Option<WeightSignal>,
        objective: Option<WeightSignal>,
    ) -> WeightVector {
        let (s_d, s_o) = self.blend_strengths(
            distribution.map(|s| s.confidence),
            objective.map(|s| s.confidence),
        );
        if s_d + s_o <= 0.0 {
            return context;
        }

        let keep = 1.0 - s_d - s_o;
        let ctx = context.as_array();
        let dist = distribution.map_or([0.0; 4], |s| s.weights.as_array());
        let obj = objective.map_or([0.0; 4], |s| s.weights.as_array());

        let blended: [f64; 4] =
            std::array::from_fn(|i| keep * ctx[i] + s_d * dist[i] + s_o * obj[i]);
        WeightVector::normalized(blended).unwrap_or(context)
    }

    /// Full weighting pipeline: context base, distribution correction at the
    /// label's confidence, objective at full confidence.
    pub fn resolve(
        &self,
        context: AnalysisContext,
        label: Option<&DistributionLabel>,
        objective: Option<Objective>,
    ) -> WeightVector {
        let distribution = label.map(|l| {
            WeightSignal::new(self.correction(l.distribution_type), l.confidence)
        });
        let objective = objective.map(|o| WeightSignal::new(self.objective_weights(o), 1.0));
        self.combine(self.base_weights(context), distribution, objective)
    }
}
