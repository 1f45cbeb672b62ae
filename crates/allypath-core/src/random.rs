//! Randomness capability
//!
//! Sampling draws through [`RandomSource`] so callers decide where entropy
//! comes from. Any [`rand::RngCore`] qualifies, which makes a seeded
//! `ChaCha20Rng` the usual choice for reproducible runs.

use rand::{Rng, RngCore};

/// Source of uniform draws.
pub trait RandomSource {
    /// A value in `[0, upper)`. For `upper <= 0` the result is `0.0`.
    fn uniform(&mut self, upper: f64) -> f64;
}

impl<R> RandomSource for R
where
    R: RngCore + ?Sized,
{
    fn uniform(&mut self, upper: f64) -> f64 {
        if upper > 0.0 {
            self.gen::<f64>() * upper
        } else {
            0.0
        }
    }
}
