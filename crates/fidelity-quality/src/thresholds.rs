//! Tiered error ceilings and the registry that owns them
//!
//! Ceilings are looked up by distribution type and scaled per metric by the
//! analysis context. An explicit precision level replaces the result with its
//! own table. The registry keeps the tables behind `RwLock<Arc<_>>`: readers
//! clone the current snapshot and updates swap in a fully validated copy.

use fidelity_core::{
    AnalysisContext, DistributionType, Error, Moment, PrecisionLevel, QualityTier, Result,
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::path::Path;
use std::str::FromStr;
use std::sync::{Arc, RwLock};
use tracing::debug;

/// Upper bounds of the four bounded tiers for one metric.
///
/// Anything above `poor` is unacceptable.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TierCeilings {
    pub excellent: f64,
    pub good: f64,
    pub acceptable: f64,
    pub poor: f64,
}

impl TierCeilings {
    pub const fn new(ceilings: [f64; 4]) -> Self {
        Self {
            excellent: ceilings[0],
            good: ceilings[1],
            acceptable: ceilings[2],
            poor: ceilings[3],
        }
    }

    pub fn as_array(&self) -> [f64; 4] {
        [self.excellent, self.good, self.acceptable, self.poor]
    }

    /// Ceiling of a tier; `+∞` for unacceptable
    pub fn ceiling(&self, tier: QualityTier) -> f64 {
        match tier {
            QualityTier::Excellent => self.excellent,
            QualityTier::Good => self.good,
            QualityTier::Acceptable => self.acceptable,
            QualityTier::Poor => self.poor,
            QualityTier::Unacceptable => f64::INFINITY,
        }
    }

    /// Best tier whose ceiling `value` does not exceed. NaN is unacceptable.
    pub fn tier_for(&self, value: f64) -> QualityTier {
        QualityTier::BOUNDED
            .into_iter()
            .find(|&tier| value <= self.ceiling(tier))
            .unwrap_or(QualityTier::Unacceptable)
    }

    pub fn scaled(&self, factor: f64) -> Self {
        Self::new(self.as_array().map(|c| c * factor))
    }

    fn validate(&self, field: &str) -> Result<()> {
        let ceilings = self.as_array();
        for (tier, c) in QualityTier::BOUNDED.iter().zip(ceilings) {
            if !c.is_finite() || c <= 0.0 {
                return Err(Error::InvalidConfig(format!(
                    "{field}.{tier} must be finite and positive, got {c}"
                )));
            }
        }
        for (pair, tiers) in ceilings.windows(2).zip(QualityTier::BOUNDED.windows(2)) {
            if pair[1] < pair[0] {
                return Err(Error::InvalidConfig(format!(
                    "{field}.{} ({}) is below {field}.{} ({})",
                    tiers[1], pair[1], tiers[0], pair[0]
                )));
            }
        }
        Ok(())
    }
}

/// Ceilings for each moment's weighted error and for the total
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MetricCeilings {
    pub mean: TierCeilings,
    pub variance: TierCeilings,
    pub skewness: TierCeilings,
    pub kurtosis: TierCeilings,
    pub total: TierCeilings,
}

impl MetricCeilings {
    pub fn moment(&self, moment: Moment) -> &TierCeilings {
        match moment {
            Moment::Mean => &self.mean,
            Moment::Variance => &self.variance,
            Moment::Skewness => &self.skewness,
            Moment::Kurtosis => &self.kurtosis,
        }
    }

    fn scaled(&self, m: &ContextMultipliers) -> Self {
        Self {
            mean: self.mean.scaled(m.mean),
            variance: self.variance.scaled(m.variance),
            skewness: self.skewness.scaled(m.skewness),
            kurtosis: self.kurtosis.scaled(m.kurtosis),
            total: self.total.scaled(m.total),
        }
    }

    fn validate(&self, field: &str) -> Result<()> {
        for moment in Moment::ALL {
            self.moment(moment).validate(&format!("{field}.{moment}"))?;
        }
        self.total.validate(&format!("{field}.total"))
    }
}

/// Minimum sample size for each bounded tier.
///
/// A sample smaller than the poor minimum is unacceptable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SampleSizeRequirements {
    pub excellent: usize,
    pub good: usize,
    pub acceptable: usize,
    pub poor: usize,
}

impl SampleSizeRequirements {
    pub const fn new(minima: [usize; 4]) -> Self {
        Self {
            excellent: minima[0],
            good: minima[1],
            acceptable: minima[2],
            poor: minima[3],
        }
    }

    pub fn as_array(&self) -> [usize; 4] {
        [self.excellent, self.good, self.acceptable, self.poor]
    }

    /// Best tier whose minimum the sample size reaches
    pub fn tier_for(&self, sample_size: usize) -> QualityTier {
        QualityTier::BOUNDED
            .into_iter()
            .zip(self.as_array())
            .find(|&(_, min)| sample_size >= min)
            .map_or(QualityTier::Unacceptable, |(tier, _)| tier)
    }

    fn validate(&self, field: &str) -> Result<()> {
        let minima = self.as_array();
        for (pair, tiers) in minima.windows(2).zip(QualityTier::BOUNDED.windows(2)) {
            if pair[1] > pair[0] {
                return Err(Error::InvalidConfig(format!(
                    "{field}.{} ({}) exceeds {field}.{} ({})",
                    tiers[1], pair[1], tiers[0], pair[0]
                )));
            }
        }
        Ok(())
    }
}

/// Error ceilings and sample-size minima used to grade one evaluation
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ThresholdSet {
    pub ceilings: MetricCeilings,
    pub min_sample_size: SampleSizeRequirements,
}

impl ThresholdSet {
    pub fn moment_tier(&self, moment: Moment, weighted_error: f64) -> QualityTier {
        self.ceilings.moment(moment).tier_for(weighted_error)
    }

    pub fn total_tier(&self, total_error: f64) -> QualityTier {
        self.ceilings.total.tier_for(total_error)
    }

    pub fn size_tier(&self, sample_size: usize) -> QualityTier {
        self.min_sample_size.tier_for(sample_size)
    }

    /// Check every ceiling and minimum, naming the first offending field
    pub fn validate(&self, field: &str) -> Result<()> {
        self.ceilings.validate(&format!("{field}.ceilings"))?;
        self.min_sample_size
            .validate(&format!("{field}.min_sample_size"))
    }

    fn with_context(&self, multipliers: &ContextMultipliers) -> Self {
        Self {
            ceilings: self.ceilings.scaled(multipliers),
            min_sample_size: self.min_sample_size,
        }
    }
}

/// Per-metric scaling applied to the distribution ceilings
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ContextMultipliers {
    pub mean: f64,
    pub variance: f64,
    pub skewness: f64,
    pub kurtosis: f64,
    pub total: f64,
}

impl Default for ContextMultipliers {
    fn default() -> Self {
        Self::new([1.0; 5])
    }
}

impl ContextMultipliers {
    /// `[mean, variance, skewness, kurtosis, total]`
    pub const fn new(m: [f64; 5]) -> Self {
        Self {
            mean: m[0],
            variance: m[1],
            skewness: m[2],
            kurtosis: m[3],
            total: m[4],
        }
    }

    pub fn as_array(&self) -> [f64; 5] {
        [self.mean, self.variance, self.skewness, self.kurtosis, self.total]
    }

    pub fn validate(&self, field: &str) -> Result<()> {
        const NAMES: [&str; 5] = ["mean", "variance", "skewness", "kurtosis", "total"];
        for (name, m) in NAMES.iter().zip(self.as_array()) {
            if !m.is_finite() || m <= 0.0 {
                return Err(Error::InvalidConfig(format!(
                    "{field}.{name} must be finite and positive, got {m}"
                )));
            }
        }
        Ok(())
    }
}

const fn threshold_set(
    mean: [f64; 4],
    variance: [f64; 4],
    skewness: [f64; 4],
    kurtosis: [f64; 4],
    total: [f64; 4],
    min_sample_size: [usize; 4],
) -> ThresholdSet {
    ThresholdSet {
        ceilings: MetricCeilings {
            mean: TierCeilings::new(mean),
            variance: TierCeilings::new(variance),
            skewness: TierCeilings::new(skewness),
            kurtosis: TierCeilings::new(kurtosis),
            total: TierCeilings::new(total),
        },
        min_sample_size: SampleSizeRequirements::new(min_sample_size),
    }
}

const STANDARD_SIZES: [usize; 4] = [500, 100, 30, 10];

/// Threshold sets per distribution type
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DistributionThresholds {
    pub normal: ThresholdSet,
    pub quasi_normal: ThresholdSet,
    pub asymmetric: ThresholdSet,
    pub leptokurtic: ThresholdSet,
    pub multimodal: ThresholdSet,
}

impl Default for DistributionThresholds {
    fn default() -> Self {
        Self {
            // Skewness of a symmetric sample sits near zero, so its relative
            // error is large and mostly noise
            normal: threshold_set(
                [0.05, 0.15, 0.5, 1.5],
                [0.3, 1.25, 3.0, 6.0],
                [6.0, 25.0, 60.0, 150.0],
                [0.15, 0.4, 1.0, 2.5],
                [8.0, 30.0, 70.0, 170.0],
                STANDARD_SIZES,
            ),
            quasi_normal: threshold_set(
                [0.1, 0.3, 0.8, 2.0],
                [0.5, 1.5, 4.0, 8.0],
                [1.0, 3.0, 8.0, 20.0],
                [0.3, 0.8, 2.0, 5.0],
                [2.0, 6.0, 15.0, 35.0],
                STANDARD_SIZES,
            ),
            asymmetric: threshold_set(
                [0.1, 0.3, 1.0, 2.5],
                [0.5, 1.5, 4.0, 8.0],
                [0.5, 1.5, 4.0, 10.0],
                [0.3, 1.0, 2.5, 6.0],
                [1.5, 5.0, 12.0, 30.0],
                STANDARD_SIZES,
            ),
            leptokurtic: threshold_set(
                [0.1, 0.3, 1.0, 2.5],
                [0.8, 2.0, 5.0, 10.0],
                [1.0, 3.0, 8.0, 20.0],
                [1.0, 3.0, 8.0, 20.0],
                [3.0, 8.0, 20.0, 50.0],
                STANDARD_SIZES,
            ),
            multimodal: threshold_set(
                [0.15, 0.4, 1.2, 3.0],
                [0.8, 2.0, 5.0, 10.0],
                [1.5, 4.0, 10.0, 25.0],
                [0.8, 2.0, 5.0, 12.0],
                [3.0, 8.0, 20.0, 50.0],
                [1000, 300, 100, 30],
            ),
        }
    }
}

impl DistributionThresholds {
    pub fn get(&self, distribution_type: DistributionType) -> &ThresholdSet {
        match distribution_type {
            DistributionType::Normal => &self.normal,
            DistributionType::QuasiNormal => &self.quasi_normal,
            DistributionType::Asymmetric => &self.asymmetric,
            DistributionType::Leptokurtic => &self.leptokurtic,
            DistributionType::Multimodal => &self.multimodal,
        }
    }

    fn get_mut(&mut self, distribution_type: DistributionType) -> &mut ThresholdSet {
        match distribution_type {
            DistributionType::Normal => &mut self.normal,
            DistributionType::QuasiNormal => &mut self.quasi_normal,
            DistributionType::Asymmetric => &mut self.asymmetric,
            DistributionType::Leptokurtic => &mut self.leptokurtic,
            DistributionType::Multimodal => &mut self.multimodal,
        }
    }
}

/// Multipliers per analysis context
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ContextAdjustments {
    pub default: ContextMultipliers,
    pub monitoring: ContextMultipliers,
    pub stability: ContextMultipliers,
    pub anomaly_detection: ContextMultipliers,
    pub characterization: ContextMultipliers,
}

impl Default for ContextAdjustments {
    fn default() -> Self {
        Self {
            default: ContextMultipliers::default(),
            monitoring: ContextMultipliers::new([0.8, 0.9, 1.5, 1.5, 1.0]),
            stability: ContextMultipliers::new([1.0, 0.8, 1.2, 1.2, 0.9]),
            anomaly_detection: ContextMultipliers::new([1.2, 1.0, 0.8, 0.7, 1.0]),
            characterization: ContextMultipliers::new([0.9, 0.9, 0.9, 0.9, 0.8]),
        }
    }
}

impl ContextAdjustments {
    pub fn get(&self, context: AnalysisContext) -> &ContextMultipliers {
        match context {
            AnalysisContext::Default => &self.default,
            AnalysisContext::Monitoring => &self.monitoring,
            AnalysisContext::Stability => &self.stability,
            AnalysisContext::AnomalyDetection => &self.anomaly_detection,
            AnalysisContext::Characterization => &self.characterization,
        }
    }

    fn get_mut(&mut self, context: AnalysisContext) -> &mut ContextMultipliers {
        match context {
            AnalysisContext::Default => &mut self.default,
            AnalysisContext::Monitoring => &mut self.monitoring,
            AnalysisContext::Stability => &mut self.stability,
            AnalysisContext::AnomalyDetection => &mut self.anomaly_detection,
            AnalysisContext::Characterization => &mut self.characterization,
        }
    }
}

/// Threshold sets per precision level
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PrecisionThresholds {
    pub high: ThresholdSet,
    pub medium: ThresholdSet,
    pub low: ThresholdSet,
    pub minimal: ThresholdSet,
}

impl Default for PrecisionThresholds {
    fn default() -> Self {
        Self {
            high: threshold_set(
                [0.02, 0.05, 0.1, 0.25],
                [0.1, 0.3, 0.75, 1.5],
                [0.5, 1.5, 4.0, 10.0],
                [0.1, 0.3, 0.75, 1.5],
                [0.5, 1.5, 4.0, 10.0],
                [1000, 500, 200, 50],
            ),
            medium: threshold_set(
                [0.05, 0.15, 0.5, 1.5],
                [0.3, 1.25, 3.0, 6.0],
                [2.0, 8.0, 20.0, 50.0],
                [0.2, 0.5, 1.25, 3.0],
                [3.0, 10.0, 25.0, 60.0],
                STANDARD_SIZES,
            ),
            low: threshold_set(
                [0.125, 0.375, 1.25, 3.75],
                [0.75, 3.0, 7.5, 15.0],
                [5.0, 20.0, 50.0, 125.0],
                [0.5, 1.25, 3.0, 7.5],
                [7.5, 25.0, 60.0, 150.0],
                [200, 50, 20, 5],
            ),
            minimal: threshold_set(
                [0.3, 0.9, 3.0, 9.0],
                [1.8, 7.5, 18.0, 36.0],
                [12.0, 48.0, 120.0, 300.0],
                [1.2, 3.0, 7.5, 18.0],
                [18.0, 60.0, 150.0, 360.0],
                [100, 30, 10, 3],
            ),
        }
    }
}

impl PrecisionThresholds {
    pub fn get(&self, precision: PrecisionLevel) -> &ThresholdSet {
        match precision {
            PrecisionLevel::High => &self.high,
            PrecisionLevel::Medium => &self.medium,
            PrecisionLevel::Low => &self.low,
            PrecisionLevel::Minimal => &self.minimal,
        }
    }

    fn get_mut(&mut self, precision: PrecisionLevel) -> &mut ThresholdSet {
        match precision {
            PrecisionLevel::High => &mut self.high,
            PrecisionLevel::Medium => &mut self.medium,
            PrecisionLevel::Low => &mut self.low,
            PrecisionLevel::Minimal => &mut self.minimal,
        }
    }
}

/// The complete set of threshold tables
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ThresholdTables {
    pub distributions: DistributionThresholds,
    pub contexts: ContextAdjustments,
    pub precisions: PrecisionThresholds,
}

impl ThresholdTables {
    /// Distribution ceilings scaled by the context, unless an explicit
    /// precision level asks for its own table
    pub fn resolve(
        &self,
        distribution_type: DistributionType,
        context: AnalysisContext,
        precision: Option<PrecisionLevel>,
    ) -> ThresholdSet {
        match precision {
            Some(level) => *self.precisions.get(level),
            None => self
                .distributions
                .get(distribution_type)
                .with_context(self.contexts.get(context)),
        }
    }

    pub fn validate(&self) -> Result<()> {
        for d in DistributionType::ALL {
            self.distributions
                .get(d)
                .validate(&format!("distributions.{d}"))?;
        }
        for c in AnalysisContext::ALL {
            self.contexts.get(c).validate(&format!("contexts.{c}"))?;
        }
        for p in PrecisionLevel::ALL {
            self.precisions.get(p).validate(&format!("precisions.{p}"))?;
        }
        Ok(())
    }

    fn apply(&mut self, key: RegistryKey, entry: EntryConfig) -> Result<()> {
        match (key, entry) {
            (RegistryKey::Distribution(d), EntryConfig::Thresholds(set)) => {
                *self.distributions.get_mut(d) = set;
            }
            (RegistryKey::Precision(p), EntryConfig::Thresholds(set)) => {
                *self.precisions.get_mut(p) = set;
            }
            (RegistryKey::Context(c), EntryConfig::Multipliers(m)) => {
                *self.contexts.get_mut(c) = m;
            }
            (key, entry) => {
                return Err(Error::InvalidConfig(format!(
                    "{key} expects {}, got {}",
                    key.expected_entry(),
                    entry.kind()
                )));
            }
        }
        Ok(())
    }
}

/// Address of one entry in the threshold tables.
///
/// Parses from `distribution:<type>`, `context:<context>` or
/// `precision:<level>`; displays as the table path, e.g.
/// `distributions.normal`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum RegistryKey {
    Distribution(DistributionType),
    Context(AnalysisContext),
    Precision(PrecisionLevel),
}

impl RegistryKey {
    fn expected_entry(&self) -> &'static str {
        match self {
            RegistryKey::Context(_) => "multipliers",
            _ => "thresholds",
        }
    }
}

impl fmt::Display for RegistryKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RegistryKey::Distribution(d) => write!(f, "distributions.{d}"),
            RegistryKey::Context(c) => write!(f, "contexts.{c}"),
            RegistryKey::Precision(p) => write!(f, "precisions.{p}"),
        }
    }
}

impl FromStr for RegistryKey {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let (table, key) = s
            .split_once(':')
            .ok_or_else(|| Error::unknown_key("registry", s))?;
        match table.trim() {
            "distribution" => Ok(RegistryKey::Distribution(key.parse()?)),
            "context" => Ok(RegistryKey::Context(key.parse()?)),
            "precision" => Ok(RegistryKey::Precision(key.parse()?)),
            _ => Err(Error::unknown_key("registry", s)),
        }
    }
}

/// Replacement value for one registry entry
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntryConfig {
    Thresholds(ThresholdSet),
    Multipliers(ContextMultipliers),
}

impl EntryConfig {
    fn kind(&self) -> &'static str {
        match self {
            EntryConfig::Thresholds(_) => "thresholds",
            EntryConfig::Multipliers(_) => "multipliers",
        }
    }
}

/// Partial replacement of the built-in tables, keyed the same way as
/// [`ThresholdTables`]. Every listed entry must be complete.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ThresholdOverrides {
    pub distributions: BTreeMap<DistributionType, ThresholdSet>,
    pub contexts: BTreeMap<AnalysisContext, ContextMultipliers>,
    pub precisions: BTreeMap<PrecisionLevel, ThresholdSet>,
}

impl ThresholdOverrides {
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    fn entries(&self) -> impl Iterator<Item = (RegistryKey, EntryConfig)> + '_ {
        let distributions = self
            .distributions
            .iter()
            .map(|(&d, &set)| (RegistryKey::Distribution(d), EntryConfig::Thresholds(set)));
        let contexts = self
            .contexts
            .iter()
            .map(|(&c, &m)| (RegistryKey::Context(c), EntryConfig::Multipliers(m)));
        let precisions = self
            .precisions
            .iter()
            .map(|(&p, &set)| (RegistryKey::Precision(p), EntryConfig::Thresholds(set)));
        distributions.chain(contexts).chain(precisions)
    }

    pub fn len(&self) -> usize {
        self.distributions.len() + self.contexts.len() + self.precisions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Owner of the threshold tables.
///
/// Starts from the built-in defaults, optionally takes JSON overrides, then
/// accepts validated updates. Each change builds a new table set and swaps it
/// in whole, so readers only ever see complete snapshots.
#[derive(Debug)]
pub struct ThresholdRegistry {
    tables: RwLock<Arc<ThresholdTables>>,
}

impl Default for ThresholdRegistry {
    fn default() -> Self {
        Self {
            tables: RwLock::new(Arc::new(ThresholdTables::default())),
        }
    }
}

impl ThresholdRegistry {
    /// Registry over custom tables, validated up front
    pub fn new(tables: ThresholdTables) -> Result<Self> {
        tables.validate()?;
        Ok(Self {
            tables: RwLock::new(Arc::new(tables)),
        })
    }

    /// Built-in defaults with a JSON override document applied
    pub fn with_overrides_json(json: &str) -> Result<Self> {
        let registry = Self::default();
        registry.load_overrides_json(json)?;
        Ok(registry)
    }

    /// Current tables. Later updates do not affect the returned snapshot.
    pub fn snapshot(&self) -> Result<Arc<ThresholdTables>> {
        let guard = self
            .tables
            .read()
            .map_err(|_| Error::Computation("threshold registry lock poisoned".to_string()))?;
        Ok(Arc::clone(&guard))
    }

    pub fn get_thresholds(
        &self,
        distribution_type: DistributionType,
        context: AnalysisContext,
        precision: Option<PrecisionLevel>,
    ) -> Result<ThresholdSet> {
        Ok(self
            .snapshot()?
            .resolve(distribution_type, context, precision))
    }

    /// String-keyed lookup; unknown identifiers fail with
    /// [`Error::UnknownKey`]
    pub fn get_thresholds_by_name(
        &self,
        distribution_type: &str,
        context: &str,
        precision: Option<&str>,
    ) -> Result<ThresholdSet> {
        let precision = precision.map(str::parse).transpose()?;
        self.get_thresholds(distribution_type.parse()?, context.parse()?, precision)
    }

    /// Replace one entry. Invalid entries are rejected and leave the
    /// registry untouched.
    pub fn update(&self, key: RegistryKey, entry: EntryConfig) -> Result<()> {
        self.replace(|tables| tables.apply(key, entry))?;
        debug!(%key, "threshold entry updated");
        Ok(())
    }

    /// Apply a JSON override document, all entries or none
    pub fn load_overrides_json(&self, json: &str) -> Result<()> {
        let overrides = ThresholdOverrides::from_json(json)?;
        self.apply_overrides(&overrides)
    }

    pub fn load_overrides_file(&self, path: impl AsRef<Path>) -> Result<()> {
        self.load_overrides_json(&std::fs::read_to_string(path)?)
    }

    pub fn apply_overrides(&self, overrides: &ThresholdOverrides) -> Result<()> {
        self.replace(|tables| {
            for (key, entry) in overrides.entries() {
                tables.apply(key, entry)?;
            }
            Ok(())
        })?;
        debug!(entries = overrides.len(), "threshold overrides applied");
        Ok(())
    }

    /// Reset every table to the built-in defaults
    pub fn reset(&self) -> Result<()> {
        self.replace(|tables| {
            *tables = ThresholdTables::default();
            Ok(())
        })
    }

    /// Copy-on-write: edit a private copy, validate it, then swap it in
    fn replace<F>(&self, edit: F) -> Result<()>
    where
        F: FnOnce(&mut ThresholdTables) -> Result<()>,
    {
        let mut guard = self
            .tables
            .write()
            .map_err(|_| Error::Computation("threshold registry lock poisoned".to_string()))?;
        let mut next = ThresholdTables::clone(&guard);
        edit(&mut next)?;
        next.validate()?;
        *guard = Arc::new(next);
        Ok(())
    }
}
