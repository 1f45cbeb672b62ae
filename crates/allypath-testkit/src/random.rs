//! Deterministic randomness for tests

use allypath_core::RandomSource;
use rand_chacha::rand_core::SeedableRng;
use rand_chacha::ChaCha20Rng;
use std::collections::VecDeque;

/// ChaCha20 generator seeded from a small integer.
pub fn seeded_rng(seed: u64) -> ChaCha20Rng {
    ChaCha20Rng::seed_from_u64(seed)
}

/// Replays scripted fractions of the requested upper bound, cycling when
/// the script runs out.
///
/// A fraction of `0.0` always selects the first candidate, whatever its
/// bandwidth, which makes selection order follow input order.
#[derive(Debug, Clone)]
pub struct ScriptedDraws {
    script: VecDeque<f64>,
    draws: usize,
}

impl ScriptedDraws {
    /// Script of fractions in `[0, 1)`.
    pub fn new(fractions: impl IntoIterator<Item = f64>) -> Self {
        Self {
            script: fractions.into_iter().collect(),
            draws: 0,
        }
    }

    /// Always draw zero.
    pub fn first() -> Self {
        Self::new([0.0])
    }

    /// Number of draws served so far.
    pub fn draws(&self) -> usize {
        self.draws
    }
}

impl RandomSource for ScriptedDraws {
    fn uniform(&mut self, upper: f64) -> f64 {
        self.draws += 1;
        let fraction = match self.script.pop_front() {
            Some(fraction) => {
                self.script.push_back(fraction);
                fraction
            }
            None => 0.0,
        };
        fraction * upper
    }
}
