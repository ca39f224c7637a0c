//! Stress reading sources.
//!
//! Production deployments would plug a real sensor in here; the default is a
//! synthetic generator good enough to exercise the whole pipeline.

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

/// A source of stress scores in `[0, 100]`.
pub trait StressProbe {
    fn produce_reading(&mut self) -> f64;
}

/// Synthetic signal: a slow sine swell around a calm baseline, occasional
/// spikes, and white noise.
pub struct SyntheticProbe {
    rng: Pcg32,
    tick: u64,
}

impl SyntheticProbe {
    pub fn new() -> Self {
        Self {
            rng: Pcg32::from_entropy(),
            tick: 0,
        }
    }

    /// Deterministic stream for a given seed.
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: Pcg32::seed_from_u64(seed),
            tick: 0,
        }
    }
}

impl Default for SyntheticProbe {
    fn default() -> Self {
        Self::new()
    }
}

impl StressProbe for SyntheticProbe {
    fn produce_reading(&mut self) -> f64 {
        self.tick += 1;
        let base = 25.0;
        let wave = (self.tick as f64 / 30.0).sin() * 10.0;
        let spike = if self.rng.gen::<f64>() < 0.1 {
            self.rng.gen::<f64>() * 40.0
        } else {
            0.0
        };
        let noise = (self.rng.gen::<f64>() - 0.5) * 15.0;
        (base + wave + spike + noise).clamp(0.0, 100.0).round()
    }
}
