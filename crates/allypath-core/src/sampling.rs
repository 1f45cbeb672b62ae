//! Bandwidth-weighted sampling
//!
//! Both primitives weight relays by measured bandwidth: a relay with twice
//! the bandwidth is twice as likely to be drawn.

use crate::random::RandomSource;
use crate::relay::Relay;

/// Draw one relay with probability proportional to measured bandwidth.
///
/// The draw `r` is uniform in `[0, total)`; the first relay whose running
/// bandwidth sum reaches `r` is returned, and the last relay covers
/// floating-point leftovers. Returns `None` only for an empty slice.
pub fn pick_weighted_random<'a, R>(relays: &[&'a Relay], rng: &mut R) -> Option<&'a Relay>
where
    R: RandomSource + ?Sized,
{
    pick_weighted_index(relays, rng).map(|index| relays[index])
}

/// Full permutation of `relays`, drawn without replacement by
/// [`pick_weighted_random`].
///
/// Quadratic in the number of relays, which is fine at consensus scale.
pub fn bandwidth_weighted_shuffle<'a, R>(relays: &[&'a Relay], rng: &mut R) -> Vec<&'a Relay>
where
    R: RandomSource + ?Sized,
{
    let mut pool = relays.to_vec();
    let mut shuffled = Vec::with_capacity(pool.len());
    while let Some(index) = pick_weighted_index(&pool, rng) {
        shuffled.push(pool.remove(index));
    }
    shuffled
}

fn pick_weighted_index<R>(relays: &[&Relay], rng: &mut R) -> Option<usize>
where
    R: RandomSource + ?Sized,
{
    let last = relays.len().checked_sub(1)?;
    let total: f64 = relays
        .iter()
        .map(|relay| relay.bandwidth_measured() as f64)
        .sum();
    let draw = rng.uniform(total);

    let mut cumulative = 0.0;
    for (index, relay) in relays.iter().enumerate() {
        cumulative += relay.bandwidth_measured() as f64;
        if draw <= cumulative {
            return Some(index);
        }
    }
    Some(last)
}
