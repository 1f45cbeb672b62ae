//! Tiered relay ranking
//!
//! Scores are compared against the best score in the mapping. Relays close
//! enough to it form the safe tier, a looser band forms the acceptable tier,
//! and everything else is dropped. Within a tier, order is a
//! bandwidth-weighted shuffle rather than a score sort.

use crate::params::AlphaParams;
use crate::random::RandomSource;
use crate::relay::Relay;
use crate::sampling::bandwidth_weighted_shuffle;
use crate::scoring::ScoreMap;
use serde::{Deserialize, Serialize};
use tracing::trace;

/// Tier a scored relay falls into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Tier {
    /// Close to the best score.
    Safe,
    /// Within the looser band.
    Acceptable,
}

/// Relays split by tier, each in score-map order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Tiers<'a> {
    /// Safe tier
    pub safe: Vec<&'a Relay>,
    /// Acceptable tier
    pub acceptable: Vec<&'a Relay>,
}

impl Tiers<'_> {
    /// Total relays kept across both tiers.
    pub fn len(&self) -> usize {
        self.safe.len() + self.acceptable.len()
    }

    /// Whether both tiers are empty.
    pub fn is_empty(&self) -> bool {
        self.safe.is_empty() && self.acceptable.is_empty()
    }
}

/// Ranks a score mapping under one set of thresholds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RelayRanker {
    params: AlphaParams,
}

impl RelayRanker {
    /// Ranker for the given thresholds.
    pub fn new(params: AlphaParams) -> Self {
        Self { params }
    }

    /// Thresholds in use.
    pub fn params(&self) -> &AlphaParams {
        &self.params
    }

    /// Tier of a score given the best score, or `None` when excluded.
    pub fn classify(&self, score: f64, max_score: f64) -> Option<Tier> {
        let p = &self.params;
        if score >= max_score * p.safe_upper && (1.0 - score) <= (1.0 - max_score) * p.safe_lower
        {
            Some(Tier::Safe)
        } else if score >= max_score * p.accept_upper
            && (1.0 - score) <= (1.0 - max_score) * p.accept_lower
        {
            Some(Tier::Acceptable)
        } else {
            None
        }
    }

    /// Split relays into tiers without reordering them.
    pub fn partition<'a>(&self, scores: &ScoreMap<'a>) -> Tiers<'a> {
        let max_score = max_score(scores);
        let mut tiers = Tiers::default();
        for (&relay, &score) in scores {
            match self.classify(score, max_score) {
                Some(Tier::Safe) => tiers.safe.push(relay),
                Some(Tier::Acceptable) => tiers.acceptable.push(relay),
                None => trace!(relay = %relay.fingerprint(), score, "excluded from ranking"),
            }
        }
        tiers
    }

    /// Safe tier then acceptable tier, each bandwidth-weighted shuffled.
    pub fn rank<'a, R>(&self, scores: &ScoreMap<'a>, rng: &mut R) -> Vec<&'a Relay>
    where
        R: RandomSource + ?Sized,
    {
        let tiers = self.partition(scores);
        let mut ranked = bandwidth_weighted_shuffle(&tiers.safe, rng);
        ranked.extend(bandwidth_weighted_shuffle(&tiers.acceptable, rng));
        ranked
    }
}

/// Best score in the mapping, `0.0` when empty.
pub fn max_score(scores: &ScoreMap<'_>) -> f64 {
    scores.values().copied().reduce(f64::max).unwrap_or(0.0)
}
