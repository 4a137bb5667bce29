//! Quality evaluation of a histogram against the sample it was built from

use crate::result::{composite_score, QualityResult};
use crate::thresholds::{ThresholdRegistry, ThresholdTables};
use crate::weights::AdaptiveWeightEngine;
use fidelity_core::moments::to_array;
use fidelity_core::{
    utils, AnalysisContext, DistributionType, Error, Moment, MomentSet, Objective,
    PrecisionLevel, QualityTier, Result,
};
use fidelity_histogram::Histogram;
use fidelity_moments::{compare_moments, sample_moments, MomentEstimator};
use fidelity_shape::{DistributionClassifier, DistributionLabel};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::{debug, instrument};

/// Options of one evaluation.
///
/// Everything left unset is resolved automatically: the distribution type by
/// the classifier and the weights by the weight engine.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EvaluationRequest {
    pub context: AnalysisContext,
    pub distribution: Option<DistributionType>,
    pub precision: Option<PrecisionLevel>,
    pub weights: Option<Vec<f64>>,
    pub objective: Option<Objective>,
}

impl EvaluationRequest {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn context(mut self, context: AnalysisContext) -> Self {
        self.context = context;
        self
    }

    /// Skip classification and grade against this distribution type
    pub fn distribution(mut self, distribution: DistributionType) -> Self {
        self.distribution = Some(distribution);
        self
    }

    pub fn precision(mut self, precision: PrecisionLevel) -> Self {
        self.precision = Some(precision);
        self
    }

    /// Explicit moment weights; they replace the adaptive weights entirely
    pub fn weights(mut self, weights: impl Into<Vec<f64>>) -> Self {
        self.weights = Some(weights.into());
        self
    }

    pub fn objective(mut self, objective: Objective) -> Self {
        self.objective = Some(objective);
        self
    }

    /// Reject malformed explicit weights before any work is done
    pub fn validate(&self) -> Result<()> {
        if let Some(weights) = &self.weights {
            for (moment, &w) in Moment::ALL.iter().zip(to_array(weights)?.iter()) {
                if !w.is_finite() || w < 0.0 {
                    return Err(Error::InvalidParameter(format!(
                        "{moment} weight must be finite and non-negative, got {w}"
                    )));
                }
            }
        }
        Ok(())
    }
}

/// Grades how well a histogram preserves the moments of its sample.
///
/// Holds the registry by reference; evaluation only reads it.
#[derive(Debug, Clone)]
pub struct QualityEvaluator<'a> {
    registry: &'a ThresholdRegistry,
    classifier: DistributionClassifier,
    weight_engine: AdaptiveWeightEngine,
    estimator: MomentEstimator,
}

impl<'a> QualityEvaluator<'a> {
    pub fn new(registry: &'a ThresholdRegistry) -> Self {
        Self {
            registry,
            classifier: DistributionClassifier::default(),
            weight_engine: AdaptiveWeightEngine::default(),
            estimator: MomentEstimator::default(),
        }
    }

    pub fn with_classifier(mut self, classifier: DistributionClassifier) -> Self {
        self.classifier = classifier;
        self
    }

    pub fn with_weight_engine(mut self, weight_engine: AdaptiveWeightEngine) -> Self {
        self.weight_engine = weight_engine;
        self
    }

    pub fn with_estimator(mut self, estimator: MomentEstimator) -> Self {
        self.estimator = estimator;
        self
    }

    pub fn registry(&self) -> &'a ThresholdRegistry {
        self.registry
    }

    pub fn classifier(&self) -> &DistributionClassifier {
        &self.classifier
    }

    pub fn weight_engine(&self) -> &AdaptiveWeightEngine {
        &self.weight_engine
    }

    /// Evaluate one histogram of `sample`.
    ///
    /// Fails fast on malformed weights and non-finite samples. Degenerate
    /// inputs such as an empty sample or an all-zero histogram are graded,
    /// not rejected.
    #[instrument(skip(self, sample, histogram, request), fields(n = sample.len(), bins = histogram.len()))]
    pub fn evaluate(
        &self,
        sample: &[f64],
        histogram: &Histogram,
        request: &EvaluationRequest,
    ) -> Result<QualityResult> {
        let prepared = self.prepare(sample, request)?;
        self.evaluate_prepared(&prepared, histogram, request)
    }

    /// Raw moments, distribution label and threshold snapshot of a sample,
    /// shared by every histogram built from it
    pub(crate) fn prepare(
        &self,
        sample: &[f64],
        request: &EvaluationRequest,
    ) -> Result<PreparedSample> {
        request.validate()?;
        utils::check_finite(sample, "sample")?;
        let moments = sample_moments(sample);
        let label = match request.distribution {
            Some(distribution_type) => DistributionLabel::assumed(distribution_type, &moments),
            None => self.classifier.classify(sample)?,
        };
        Ok(PreparedSample {
            sample_size: sample.len(),
            moments,
            label,
            tables: self.registry.snapshot()?,
        })
    }

    pub(crate) fn evaluate_prepared(
        &self,
        prepared: &PreparedSample,
        histogram: &Histogram,
        request: &EvaluationRequest,
    ) -> Result<QualityResult> {
        let label = &prepared.label;
        let weights = match &request.weights {
            Some(explicit) => to_array(explicit)?,
            None => self
                .weight_engine
                .resolve(request.context, Some(label), request.objective)
                .as_array(),
        };

        let histogram_moments = self.estimator.estimate(histogram);
        let (total_error, components) =
            compare_moments(&prepared.moments, &histogram_moments, &weights)?;

        let thresholds = prepared.tables.resolve(
            label.distribution_type,
            request.context,
            request.precision,
        );
        let moment_tiers: BTreeMap<Moment, QualityTier> = components
            .iter()
            .map(|(&moment, c)| (moment, thresholds.moment_tier(moment, c.weighted_error)))
            .collect();
        let total_tier = thresholds.total_tier(total_error);
        let size_tier = thresholds.size_tier(prepared.sample_size);
        let overall_tier = QualityTier::worst_of(
            moment_tiers
                .values()
                .copied()
                .chain([total_tier, size_tier]),
        );
        let composite_score = composite_score(overall_tier, total_error);

        debug!(
            distribution = %label.distribution_type,
            confidence = label.confidence,
            context = %request.context,
            total_error,
            %total_tier,
            %size_tier,
            %overall_tier,
            "histogram graded"
        );

        let applied = Moment::ALL.map(|m| components.get(&m).map_or(0.0, |c| c.weight));
        Ok(QualityResult {
            total_error,
            components,
            moment_tiers,
            total_tier,
            size_tier,
            overall_tier,
            composite_score,
            sample_size: prepared.sample_size,
            distribution: label.clone(),
            context: request.context,
            precision: request.precision,
            weights: applied,
            raw_moments: prepared.moments,
            histogram_moments,
        })
    }
}

/// Histogram-independent part of an evaluation
#[derive(Debug, Clone)]
pub(crate) struct PreparedSample {
    pub(crate) sample_size: usize,
    pub(crate) moments: MomentSet,
    pub(crate) label: DistributionLabel,
    /// Tables every histogram of this sample is graded against
    pub(crate) tables: Arc<ThresholdTables>,
}
