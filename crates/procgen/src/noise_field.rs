//! Seeded 2D coherent noise shared by terrain and particle textures.

use noise::{NoiseFn, Simplex};

/// Derive a deterministic u32 noise seed from a session seed.
#[inline]
fn deterministic_noise_seed(seed: u64) -> u32 {
    (seed.wrapping_mul(0x9e3779b97f4a7c15_u64) >> 32) as u32
}

/// Deterministic, continuous 2D noise in [-1, 1].
#[derive(Clone)]
pub struct NoiseField {
    simplex: Simplex,
    seed: u64,
}

impl std::fmt::Debug for NoiseField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NoiseField").field("seed", &self.seed).finish()
    }
}

impl NoiseField {
    pub fn new(seed: u64) -> Self {
        Self {
            simplex: Simplex::new(deterministic_noise_seed(seed)),
            seed,
        }
    }

    /// Sample the field. Same input, same output, for the lifetime of the field.
    #[inline]
    pub fn sample(&self, x: f32, z: f32) -> f32 {
        (self.simplex.get([x as f64, z as f64]) as f32).clamp(-1.0, 1.0)
    }
}
