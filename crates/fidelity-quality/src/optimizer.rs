//! Search for the cheapest binning that reaches a target quality tier

use crate::evaluator::{EvaluationRequest, QualityEvaluator};
use crate::result::QualityResult;
use crate::thresholds::ThresholdRegistry;
use fidelity_core::{AnalysisContext, Error, PrecisionLevel, QualityTier, Result};
use fidelity_histogram::{BinningConfig, BinningStrategy, Histogram, HistogramBuilder};
use ordered_float::OrderedFloat;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument, warn};

/// Builds the histogram for one candidate configuration
pub trait HistogramFactory {
    fn histogram(&self, config: &BinningConfig, sample: &[f64]) -> Result<Histogram>;
}

impl<F> HistogramFactory for F
where
    F: Fn(&BinningConfig, &[f64]) -> Result<Histogram>,
{
    fn histogram(&self, config: &BinningConfig, sample: &[f64]) -> Result<Histogram> {
        self(config, sample)
    }
}

/// Uniform, quantile and logarithmic reference builders
#[derive(Debug, Clone, Copy, Default)]
pub struct StandardBinning;

impl HistogramFactory for StandardBinning {
    fn histogram(&self, config: &BinningConfig, sample: &[f64]) -> Result<Histogram> {
        config.build(sample)
    }
}

/// Search space and target of an optimization
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OptimizationRequest {
    pub target: QualityTier,
    /// Tried in this order at each bin count
    pub strategies: Vec<BinningStrategy>,
    pub bin_counts: Vec<usize>,
    pub evaluation: EvaluationRequest,
}

impl OptimizationRequest {
    /// All reference strategies over the given bin counts
    pub fn new(target: QualityTier, bin_counts: impl Into<Vec<usize>>) -> Self {
        Self {
            target,
            strategies: BinningStrategy::ALL.to_vec(),
            bin_counts: bin_counts.into(),
            evaluation: EvaluationRequest::default(),
        }
    }

    pub fn strategies(mut self, strategies: impl Into<Vec<BinningStrategy>>) -> Self {
        self.strategies = strategies.into();
        self
    }

    pub fn context(mut self, context: AnalysisContext) -> Self {
        self.evaluation.context = context;
        self
    }

    pub fn precision(mut self, precision: PrecisionLevel) -> Self {
        self.evaluation.precision = Some(precision);
        self
    }

    /// Evaluation options applied to every candidate
    pub fn evaluation(mut self, evaluation: EvaluationRequest) -> Self {
        self.evaluation = evaluation;
        self
    }

    /// Sorted, de-duplicated bin counts and strategies in first-seen order.
    ///
    /// Fails on empty lists and on a zero bin count.
    pub fn search_space(&self) -> Result<(Vec<BinningStrategy>, Vec<usize>)> {
        if self.strategies.is_empty() {
            return Err(Error::InvalidParameter(
                "at least one binning strategy is required".to_string(),
            ));
        }
        if self.bin_counts.is_empty() {
            return Err(Error::InvalidParameter(
                "at least one bin count candidate is required".to_string(),
            ));
        }
        if self.bin_counts.contains(&0) {
            return Err(Error::InvalidParameter(
                "bin count candidates must be positive".to_string(),
            ));
        }

        let mut counts = self.bin_counts.clone();
        counts.sort_unstable();
        counts.dedup();

        let mut strategies = Vec::with_capacity(self.strategies.len());
        for &s in &self.strategies {
            if !strategies.contains(&s) {
                strategies.push(s);
            }
        }
        Ok((strategies, counts))
    }
}

/// One evaluated candidate
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Attempt {
    pub config: BinningConfig,
    pub result: QualityResult,
}

/// Outcome of a binning search
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OptimizationResult {
    pub chosen: BinningConfig,
    pub result: QualityResult,
    /// Every evaluated candidate in search order
    pub trace: Vec<Attempt>,
    /// False when no candidate reached the target and `chosen` is only the
    /// best-scoring fallback
    pub target_met: bool,
}

/// Walks the candidate configurations from the fewest bins up
#[derive(Debug, Clone)]
pub struct BinningOptimizer<'a, F = StandardBinning> {
    evaluator: QualityEvaluator<'a>,
    factory: F,
}

impl<'a> BinningOptimizer<'a, StandardBinning> {
    pub fn new(registry: &'a ThresholdRegistry) -> Self {
        Self::with_factory(QualityEvaluator::new(registry), StandardBinning)
    }

    pub fn with_evaluator(evaluator: QualityEvaluator<'a>) -> Self {
        Self::with_factory(evaluator, StandardBinning)
    }
}

impl<'a, F: HistogramFactory> BinningOptimizer<'a, F> {
    pub fn with_factory(evaluator: QualityEvaluator<'a>, factory: F) -> Self {
        Self { evaluator, factory }
    }

    pub fn evaluator(&self) -> &QualityEvaluator<'a> {
        &self.evaluator
    }

    /// Find the first configuration, by ascending bin count and then strategy
    /// order, whose overall tier reaches the target.
    ///
    /// Every candidate is graded against the threshold tables as they stood
    /// when the search started. Candidates the factory cannot build are
    /// skipped. When nothing reaches
    /// the target the best composite score is returned with
    /// `target_met = false`; ties go to the earliest attempt.
    #[instrument(skip(self, sample, request), fields(n = sample.len(), target = %request.target))]
    pub fn optimize(
        &self,
        sample: &[f64],
        request: &OptimizationRequest,
    ) -> Result<OptimizationResult> {
        let (strategies, counts) = request.search_space()?;
        let prepared = self.evaluator.prepare(sample, &request.evaluation)?;

        let mut trace: Vec<Attempt> = Vec::new();
        for &num_bins in &counts {
            for &strategy in &strategies {
                let config = BinningConfig::new(strategy, num_bins);
                let histogram = match self.factory.histogram(&config, sample) {
                    Ok(h) => h,
                    Err(e) => {
                        warn!(%config, error = %e, "skipping binning candidate");
                        continue;
                    }
                };
                let result =
                    self.evaluator
                        .evaluate_prepared(&prepared, &histogram, &request.evaluation)?;
                let met = result.meets(request.target);
                trace.push(Attempt { config, result });

                if met {
                    debug!(%config, attempts = trace.len(), "target tier reached");
                    return Ok(finish(trace.len() - 1, trace, true));
                }
            }
        }

        if trace.is_empty() {
            return Err(Error::InvalidInput(
                "no binning candidate could be built for the sample".to_string(),
            ));
        }

        let mut best = 0;
        for (i, attempt) in trace.iter().enumerate().skip(1) {
            if OrderedFloat(attempt.result.composite_score)
                > OrderedFloat(trace[best].result.composite_score)
            {
                best = i;
            }
        }
        debug!(
            chosen = %trace[best].config,
            attempts = trace.len(),
            "target tier not reached, returning best score"
        );
        Ok(finish(best, trace, false))
    }
}

fn finish(index: usize, trace: Vec<Attempt>, target_met: bool) -> OptimizationResult {
    let Attempt { config, result } = trace[index].clone();
    OptimizationResult {
        chosen: config,
        result,
        trace,
        target_met,
    }
}
