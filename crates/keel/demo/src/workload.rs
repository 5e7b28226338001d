//! Simulated collector for the Keel demo.
//!
//! Produces [`Sample`]s for healthy, degrading and collapsed operating
//! regimes. Values are health readings in `[0, 1]` with a little seeded
//! noise so runs are reproducible.

use keel_types::Sample;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

const NOISE: f64 = 0.02;

/// Generates simulated samples for demo purposes.
pub struct SimulatedWorkload {
    dimensions: usize,
    rng: StdRng,
}

impl SimulatedWorkload {
    pub fn new(dimensions: usize, seed: u64) -> Self {
        Self {
            dimensions,
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Every dimension close to full health.
    pub fn healthy(&mut self) -> Sample {
        let values = (0..self.dimensions).map(|_| self.jitter(0.93)).collect();
        Sample::new(values)
    }

    /// The first half of the dimensions lose health linearly with `step`;
    /// the rest stay healthy.
    pub fn degrading(&mut self, step: usize) -> Sample {
        let failing = (self.dimensions / 2).max(1);
        let level = (0.9 - 0.09 * step as f64).max(0.05);
        let values = (0..self.dimensions)
            .map(|d| {
                let base = if d < failing { level } else { 0.92 };
                self.jitter(base)
            })
            .collect();
        Sample::new(values)
    }

    /// Every dimension near zero.
    pub fn collapsed(&mut self) -> Sample {
        let values = (0..self.dimensions).map(|_| self.jitter(0.02)).collect();
        Sample::new(values)
    }

    fn jitter(&mut self, base: f64) -> f64 {
        (base + self.rng.gen_range(-NOISE..=NOISE)).clamp(0.0, 1.0)
    }
}
