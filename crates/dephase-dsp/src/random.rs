//! Random phase source.
//!
//! Owned per processor, so a fixed seed gives a reproducible phase sequence.

use core::f32::consts::PI;
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

/// Spread of the Gaussian phase relative to π.
pub const GAUSSIAN_CONCENTRATION: f32 = 0.5;

#[derive(Debug, Clone)]
pub struct PhaseRng {
    rng: SmallRng,
    /// Second normal variate from the last polar Box-Muller draw.
    spare: Option<f32>,
}

impl PhaseRng {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: SmallRng::seed_from_u64(seed),
            spare: None,
        }
    }

    /// Seeded from OS entropy.
    pub fn from_entropy() -> Self {
        Self {
            rng: SmallRng::from_entropy(),
            spare: None,
        }
    }

    pub fn from_seed(seed: Option<u64>) -> Self {
        match seed {
            Some(seed) => Self::new(seed),
            None => Self::from_entropy(),
        }
    }

    /// Reseed and drop any cached variate.
    pub fn reseed(&mut self, seed: u64) {
        self.rng = SmallRng::seed_from_u64(seed);
        self.spare = None;
    }

    /// Uniform phase in [-π, π).
    #[inline]
    pub fn uniform_phase(&mut self) -> f32 {
        (self.rng.gen::<f32>() * 2.0 - 1.0) * PI
    }

    /// Standard normal variate. Draws come in pairs; the second is cached for
    /// the next call.
    #[inline]
    pub fn standard_normal(&mut self) -> f32 {
        if let Some(spare) = self.spare.take() {
            return spare;
        }

        loop {
            let u1 = self.rng.gen::<f32>() * 2.0 - 1.0;
            let u2 = self.rng.gen::<f32>() * 2.0 - 1.0;
            let s = u1 * u1 + u2 * u2;
            if s < 1.0 && s > 0.0 {
                let scale = (-2.0 * s.ln() / s).sqrt();
                self.spare = Some(u2 * scale);
                return u1 * scale;
            }
        }
    }

    /// Normal phase centred on 0, clamped to [-π, π].
    #[inline]
    pub fn gaussian_phase(&mut self) -> f32 {
        (self.standard_normal() * PI * GAUSSIAN_CONCENTRATION).clamp(-PI, PI)
    }
}
