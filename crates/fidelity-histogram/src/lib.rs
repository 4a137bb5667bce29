//! Histogram representation and bin-edge strategies
//!
//! A [`Histogram`] is a validated pair of bin edges and bin counts. Histograms
//! are produced by any [`HistogramBuilder`]; three reference strategies are
//! included:
//!
//! - **Uniform**: equal-width bins over `[min, max]`
//! - **Quantile**: equal-frequency bins placed at empirical quantiles
//! - **Logarithmic**: equal width in log space, for positive data
//!
//! # Example
//!
//! ```rust
//! use fidelity_histogram::{BinningConfig, HistogramBuilder};
//!
//! let data = vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0, 9.0, 10.0];
//! let histogram = BinningConfig::uniform(5).build(&data).unwrap();
//!
//! assert_eq!(histogram.len(), 5);
//! assert_eq!(histogram.total_count(), 10);
//! ```

pub mod builders;
pub mod config;
pub mod traits;
pub mod types;

pub use builders::{LogarithmicBuilder, QuantileBuilder, UniformBuilder};
pub use config::{BinningConfig, BinningStrategy};
pub use traits::HistogramBuilder;
pub use types::{Histogram, HistogramBin};
