//! Test data generators for shape classification
//!
//! Seeded synthetic samples shared by the unit, integration and end-to-end
//! tests so that every crate exercises the same shapes.

use rand::rngs::StdRng;
use rand::SeedableRng;
use rand_distr::{Beta, Distribution, LogNormal, Normal, Uniform};

/// Standard test distributions for shape classification
pub struct TestDistributions;

impl TestDistributions {
    /// `n` draws from N(mean, sd) with a fixed seed
    pub fn normal(mean: f64, sd: f64, n: usize, seed: u64) -> Vec<f64> {
        let mut rng = StdRng::seed_from_u64(seed);
        let normal = Normal::new(mean, sd).unwrap();
        (0..n).map(|_| normal.sample(&mut rng)).collect()
    }

    /// Create a clearly unimodal normal distribution
    ///
    /// Returns 10000 samples from N(0, 1)
    pub fn unimodal_normal() -> Vec<f64> {
        Self::normal(0.0, 1.0, 10000, 42)
    }

    /// Create a unimodal distribution with heavy tails
    ///
    /// Returns 10000 samples: 90% from N(0, 1), 10% from N(0, 9)
    pub fn unimodal_heavy_tails() -> Vec<f64> {
        let mut rng = StdRng::seed_from_u64(42);
        let normal = Normal::new(0.0, 1.0).unwrap();
        let uniform = Uniform::new(0.0, 1.0);

        (0..10000)
            .map(|_| {
                let u = uniform.sample(&mut rng);
                if u < 0.9 {
                    normal.sample(&mut rng)
                } else {
                    normal.sample(&mut rng) * 3.0
                }
            })
            .collect()
    }

    /// Create a strongly right-skewed distribution with light tails
    ///
    /// Returns 10000 samples from Beta(1, 5) scaled to [0, 100]
    /// (skewness ≈ 1.18, excess kurtosis ≈ 1.2)
    pub fn right_skewed() -> Vec<f64> {
        let mut rng = StdRng::seed_from_u64(42);
        let beta = Beta::new(1.0, 5.0).unwrap();
        (0..10000).map(|_| beta.sample(&mut rng) * 100.0).collect()
    }

    /// Create a mildly skewed distribution
    ///
    /// Returns 10000 samples from Beta(2, 5) scaled to [-2, 2]
    /// (skewness ≈ 0.6, excess kurtosis ≈ -0.1)
    pub fn mildly_skewed() -> Vec<f64> {
        let mut rng = StdRng::seed_from_u64(42);
        let beta = Beta::new(2.0, 5.0).unwrap();
        (0..10000)
            .map(|_| beta.sample(&mut rng) * 4.0 - 2.0)
            .collect()
    }

    /// Create a log-normal distribution (skewed and heavy tailed)
    ///
    /// Returns 5000 samples from LogNormal(0, 1)
    pub fn lognormal() -> Vec<f64> {
        let mut rng = StdRng::seed_from_u64(42);
        let dist = LogNormal::new(0.0, 1.0).unwrap();
        (0..5000).map(|_| dist.sample(&mut rng)).collect()
    }

    /// Create a clearly bimodal distribution
    ///
    /// Returns 10000 samples: 5000 from N(-3, 0.8) and 5000 from N(3, 0.8)
    pub fn bimodal_symmetric() -> Vec<f64> {
        let mut rng = StdRng::seed_from_u64(42);
        let normal1 = Normal::new(-3.0, 0.8).unwrap();
        let normal2 = Normal::new(3.0, 0.8).unwrap();

        let mut data = Vec::with_capacity(10000);
        for _ in 0..5000 {
            data.push(normal1.sample(&mut rng));
        }
        for _ in 0..5000 {
            data.push(normal2.sample(&mut rng));
        }
        data
    }

    /// Create a trimodal distribution
    ///
    /// Returns 12000 samples: 4000 each from N(-4, 0.6), N(0, 0.6), N(4, 0.6)
    pub fn trimodal_symmetric() -> Vec<f64> {
        let mut rng = StdRng::seed_from_u64(42);
        let mut data = Vec::with_capacity(12000);
        for center in [-4.0, 0.0, 4.0] {
            let normal = Normal::new(center, 0.6).unwrap();
            for _ in 0..4000 {
                data.push(normal.sample(&mut rng));
            }
        }
        data
    }

    /// Create a uniform distribution (no clear modes)
    ///
    /// Returns 10000 samples from U(-5, 5)
    pub fn uniform_flat() -> Vec<f64> {
        let mut rng = StdRng::seed_from_u64(42);
        let uniform = Uniform::new(-5.0, 5.0);
        (0..10000).map(|_| uniform.sample(&mut rng)).collect()
    }
}
