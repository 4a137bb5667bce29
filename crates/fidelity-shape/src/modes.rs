//! Quick mode counting on a smoothed fixed-width density estimate

use fidelity_core::{utils, Result};
use fidelity_histogram::{HistogramBuilder, UniformBuilder};
use ordered_float::OrderedFloat;
use serde::{Deserialize, Serialize};

/// Parameters of the mode counter
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ModeDetectorConfig {
    /// Peaks lower than this fraction of the tallest bin are ignored
    pub min_peak_ratio: f64,
    /// Two peaks are separated only if the valley between them is at most
    /// this fraction of the smaller peak
    pub valley_ratio: f64,
    /// Minimum distance, in bins, between two separated peaks
    pub min_separation_bins: usize,
    /// Smaller samples always report a single mode
    pub min_sample_size: usize,
    /// Lower clamp of the Scott's-rule bin count
    pub min_bins: usize,
    /// Upper clamp of the Scott's-rule bin count
    pub max_bins: usize,
}

impl Default for ModeDetectorConfig {
    fn default() -> Self {
        Self {
            min_peak_ratio: 0.15,
            valley_ratio: 0.6,
            min_separation_bins: 3,
            min_sample_size: 30,
            min_bins: 8,
            max_bins: 40,
        }
    }
}

impl ModeDetectorConfig {
    /// Fewer spurious modes: taller peaks and deeper valleys required
    pub fn conservative() -> Self {
        Self {
            min_peak_ratio: 0.25,
            valley_ratio: 0.4,
            min_separation_bins: 4,
            min_sample_size: 50,
            ..Self::default()
        }
    }

    /// Clamp every field into the range the detector can work with.
    ///
    /// Ratios go to `[0, 1]` (NaN becomes zero), the separation to at least
    /// one bin, the minimum sample size to at least 3, and `max_bins` is raised
    /// to `min_bins` when it falls below.
    pub fn sanitized(self) -> Self {
        let ratio = |r: f64| if r.is_nan() { 0.0 } else { r.clamp(0.0, 1.0) };
        let min_bins = self.min_bins.max(3);
        Self {
            min_peak_ratio: ratio(self.min_peak_ratio),
            valley_ratio: ratio(self.valley_ratio),
            min_separation_bins: self.min_separation_bins.max(1),
            min_sample_size: self.min_sample_size.max(3),
            min_bins,
            max_bins: self.max_bins.max(min_bins),
        }
    }

    /// Picks up weaker secondary modes
    pub fn sensitive() -> Self {
        Self {
            min_peak_ratio: 0.08,
            valley_ratio: 0.75,
            min_separation_bins: 2,
            min_sample_size: 20,
            ..Self::default()
        }
    }
}

/// Builder for [`ModeDetector`] with clamping setters
#[derive(Debug, Clone, Default)]
pub struct ModeDetectorBuilder {
    config: ModeDetectorConfig,
}

impl ModeDetectorBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from an existing configuration
    pub fn from_config(config: ModeDetectorConfig) -> Self {
        Self { config }
    }

    /// Sets the minimum peak height relative to the tallest bin (0.0-1.0)
    pub fn min_peak_ratio(mut self, ratio: f64) -> Self {
        self.config.min_peak_ratio = ratio.clamp(0.0, 1.0);
        self
    }

    /// Sets the maximum valley depth relative to the smaller peak (0.0-1.0)
    ///
    /// Lower values require deeper valleys between modes.
    pub fn valley_ratio(mut self, ratio: f64) -> Self {
        self.config.valley_ratio = ratio.clamp(0.0, 1.0);
        self
    }

    /// Sets the minimum peak distance in bins (at least 1)
    pub fn min_separation_bins(mut self, bins: usize) -> Self {
        self.config.min_separation_bins = bins.max(1);
        self
    }

    /// Sets the sample size below which a single mode is reported (at least 3)
    pub fn min_sample_size(mut self, n: usize) -> Self {
        self.config.min_sample_size = n.max(3);
        self
    }

    /// Sets the clamp range of the density-estimate bin count
    pub fn bin_range(mut self, min_bins: usize, max_bins: usize) -> Self {
        let min_bins = min_bins.max(3);
        self.config.min_bins = min_bins;
        self.config.max_bins = max_bins.max(min_bins);
        self
    }

    pub fn build(self) -> ModeDetector {
        ModeDetector::new(self.config)
    }
}

/// Outcome of mode counting
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModeSummary {
    /// Number of separated peaks, at least 1
    pub mode_count: usize,
    /// Weakest relative valley depth between adjacent modes, `1 - valley/peak`.
    /// Zero for a single mode.
    pub separation: f64,
    /// Bin centers of the surviving peaks
    pub peak_locations: Vec<f64>,
}

impl ModeSummary {
    fn single(location: f64) -> Self {
        Self {
            mode_count: 1,
            separation: 0.0,
            peak_locations: vec![location],
        }
    }

    pub fn is_multimodal(&self) -> bool {
        self.mode_count > 1
    }
}

/// Counts modes of a sample
#[derive(Debug, Clone, Default)]
pub struct ModeDetector {
    config: ModeDetectorConfig,
}

impl ModeDetector {
    /// Detector over `config` after [`ModeDetectorConfig::sanitized`]
    pub fn new(config: ModeDetectorConfig) -> Self {
        Self {
            config: config.sanitized(),
        }
    }

    pub fn config(&self) -> &ModeDetectorConfig {
        &self.config
    }

    /// Count the modes of a finite sample
    pub fn detect(&self, sample: &[f64]) -> Result<ModeSummary> {
        let n = sample.len();
        let center = utils::mean(sample);
        if n < self.config.min_sample_size {
            return Ok(ModeSummary::single(center));
        }
        let sorted = utils::sorted(sample);
        let (Some(&min), Some(&max)) = (sorted.first(), sorted.last()) else {
            return Ok(ModeSummary::single(center));
        };
        let sd = utils::population_std_dev(sample);
        if max <= min || sd <= 0.0 {
            return Ok(ModeSummary::single(center));
        }

        let histogram = UniformBuilder::new(self.bin_count(n, sd, max - min)).build_sorted(&sorted)?;
        let centers = histogram.centers();
        let heights = smooth(histogram.counts());

        let (kept, separations) = self.separated_peaks(&heights);
        if kept.is_empty() {
            return Ok(ModeSummary::single(center));
        }
        let separation = separations
            .iter()
            .copied()
            .min_by_key(|&s| OrderedFloat(s))
            .unwrap_or(0.0);
        Ok(ModeSummary {
            mode_count: kept.len(),
            separation,
            peak_locations: kept.iter().map(|&i| centers[i]).collect(),
        })
    }

    /// Indices of the separated peaks of a smoothed density, left to right,
    /// and the relative valley depth between each adjacent pair
    fn separated_peaks(&self, heights: &[f64]) -> (Vec<usize>, Vec<f64>) {
        let tallest = heights
            .iter()
            .copied()
            .max_by_key(|&h| OrderedFloat(h))
            .unwrap_or(0.0);
        let floor = self.config.min_peak_ratio * tallest;
        let last = heights.len().saturating_sub(1);
        let candidates = (0..heights.len()).filter(|&i| {
            let rising = i == 0 || heights[i] > heights[i - 1];
            let falling = i == last || heights[i] >= heights[i + 1];
            rising && falling && heights[i] >= floor
        });

        // Walk the peaks left to right; an unseparated peak replaces its
        // neighbour only if it is taller
        let mut kept: Vec<usize> = Vec::new();
        let mut separations: Vec<f64> = Vec::new();
        for peak in candidates {
            let Some(&previous) = kept.last() else {
                kept.push(peak);
                continue;
            };
            let (valley, lower_peak) = valley_between(heights, previous, peak);
            let far_enough = peak - previous >= self.config.min_separation_bins;
            let deep_enough = lower_peak > 0.0 && valley <= self.config.valley_ratio * lower_peak;
            if far_enough && deep_enough {
                kept.push(peak);
                separations.push(1.0 - valley / lower_peak);
            } else if heights[peak] > heights[previous] {
                kept.pop();
                // the replacement is bounded by a different valley
                if let Some(&before) = kept.last() {
                    let (valley, lower_peak) = valley_between(heights, before, peak);
                    if let Some(s) = separations.last_mut() {
                        *s = if lower_peak > 0.0 { 1.0 - valley / lower_peak } else { 0.0 };
                    }
                }
                kept.push(peak);
            }
        }
        (kept, separations)
    }

    /// Scott's rule bin count, clamped to the configured range
    fn bin_count(&self, n: usize, sd: f64, range: f64) -> usize {
        let width = 3.49 * sd * (n as f64).powf(-1.0 / 3.0);
        let bins = (range / width).ceil();
        let bins = if bins.is_finite() { bins as usize } else { self.config.max_bins };
        bins.clamp(self.config.min_bins, self.config.max_bins)
    }
}

/// Lowest height between two peaks (inclusive) and the lower of the peaks
fn valley_between(heights: &[f64], left: usize, right: usize) -> (f64, f64) {
    let valley = heights[left..=right]
        .iter()
        .copied()
        .min_by_key(|&h| OrderedFloat(h))
        .unwrap_or(0.0);
    (valley, heights[left].min(heights[right]))
}

/// 3-tap moving average; edge bins average over the neighbours they have
fn smooth(counts: &[u64]) -> Vec<f64> {
    (0..counts.len())
        .map(|i| {
            let lo = i.saturating_sub(1);
            let hi = (i + 2).min(counts.len());
            let window = &counts[lo..hi];
            window.iter().sum::<u64>() as f64 / window.len() as f64
        })
        .collect()
}
