//! Path Selection
//!
//! Greedy backtracking over ranked candidates:
//!
//! 1. Rank every pool relay as a guard.
//! 2. For each guard in order, rank the exits that accept the destination
//!    and are not in the guard's family.
//! 3. For each exit in order, draw a bandwidth-weighted middle from the
//!    relays outside both families. The first pair with any middle
//!    candidate wins.
//!
//! The result is the first feasible path in ranked order, not the best one.

use crate::alliance::Alliance;
use crate::error::PathError;
use crate::geo::Geolocator;
use crate::params::AlphaParams;
use crate::random::RandomSource;
use crate::ranking::RelayRanker;
use crate::relay::{Fingerprint, Relay};
use crate::sampling::pick_weighted_random;
use crate::scoring::{ScoreMap, SecurityScorer};
use crate::trust::TrustModel;
use tracing::{debug, info, trace, warn};

/// A constructed three-hop path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectedPath {
    /// Entry hop
    pub guard: Relay,
    /// Middle hop
    pub middle: Relay,
    /// Exit hop
    pub exit: Relay,
}

impl SelectedPath {
    /// Fingerprints in hop order: guard, middle, exit.
    pub fn fingerprints(&self) -> [&Fingerprint; 3] {
        [
            self.guard.fingerprint(),
            self.middle.fingerprint(),
            self.exit.fingerprint(),
        ]
    }
}

/// Trust-aware path selector over one relay/alliance snapshot.
///
/// The randomness source is owned by the selector; seed it to make
/// selections reproducible.
pub struct PathSelector<G, R> {
    trust: TrustModel,
    relays: Vec<Relay>,
    geo: G,
    rng: R,
}

impl<G, R> PathSelector<G, R>
where
    G: Geolocator,
    R: RandomSource,
{
    /// Build a selector. Relays without measured bandwidth never enter the
    /// candidate pool.
    pub fn new(alliances: Vec<Alliance>, relays: Vec<Relay>, geo: G, rng: R) -> Self {
        let offered = relays.len();
        let relays: Vec<Relay> = relays
            .into_iter()
            .filter(|relay| relay.bandwidth_measured() > 0)
            .collect();
        debug!(
            pool = relays.len(),
            excluded = offered - relays.len(),
            alliances = alliances.len(),
            "built relay pool"
        );

        Self {
            trust: TrustModel::new(alliances),
            relays,
            geo,
            rng,
        }
    }

    /// Candidate pool (relays with measured bandwidth).
    pub fn relays(&self) -> &[Relay] {
        &self.relays
    }

    /// Trust model derived from the alliances.
    pub fn trust_model(&self) -> &TrustModel {
        &self.trust
    }

    /// Geolocation capability in use.
    pub fn geolocator(&self) -> &G {
        &self.geo
    }

    /// Random source in use.
    pub fn rng(&self) -> &R {
        &self.rng
    }

    /// Scorer over this selector's trust model and geolocator.
    pub fn scorer(&self) -> SecurityScorer<'_, G> {
        SecurityScorer::new(&self.trust, &self.geo)
    }

    /// Score each of `guards` for `client_ip`.
    pub fn guard_security<'r, I>(&self, client_ip: &str, guards: I) -> ScoreMap<'r>
    where
        I: IntoIterator<Item = &'r Relay>,
    {
        self.scorer().guard_security(client_ip, guards)
    }

    /// Score one (guard, exit) pair.
    pub fn exit_security(
        &self,
        client_ip: &str,
        guard: &Relay,
        exit: &Relay,
        destination_ip: &str,
    ) -> f64 {
        self.scorer()
            .exit_security(client_ip, guard, exit, destination_ip)
    }

    /// Ranked guard candidates from the whole pool.
    pub fn rank_guards(&mut self, client_ip: &str, params: &AlphaParams) -> Vec<&Relay> {
        let scorer = SecurityScorer::new(&self.trust, &self.geo);
        rank_guards(&scorer, &self.relays, &mut self.rng, client_ip, params)
    }

    /// Ranked exit candidates for a fixed guard.
    pub fn rank_exits(
        &mut self,
        client_ip: &str,
        guard: &Relay,
        destination_ip: &str,
        params: &AlphaParams,
    ) -> Vec<&Relay> {
        let scorer = SecurityScorer::new(&self.trust, &self.geo);
        rank_exits(
            &scorer,
            &self.relays,
            &mut self.rng,
            client_ip,
            guard,
            destination_ip,
            params,
        )
    }

    /// Select a guard, middle and exit for `client_ip` reaching
    /// `destination_ip`.
    ///
    /// Returns [`PathError::NoValidPath`] when no ranked (guard, exit) pair
    /// leaves a middle relay outside both families.
    pub fn select_path(
        &mut self,
        client_ip: &str,
        destination_ip: &str,
        guard_params: &AlphaParams,
        exit_params: &AlphaParams,
    ) -> Result<SelectedPath, PathError> {
        let Self {
            trust,
            relays,
            geo,
            rng,
        } = self;
        let scorer = SecurityScorer::new(&*trust, &*geo);
        let relays: &[Relay] = relays;

        let guards = rank_guards(&scorer, relays, rng, client_ip, guard_params);
        debug!(guards = guards.len(), "ranked guard candidates");

        let mut exits_tried = 0;
        for (guards_tried, guard) in guards.iter().copied().enumerate() {
            let exits = rank_exits(
                &scorer,
                relays,
                rng,
                client_ip,
                guard,
                destination_ip,
                exit_params,
            );
            trace!(guard = %guard.fingerprint(), exits = exits.len(), "ranked exit candidates");

            for exit in exits {
                exits_tried += 1;
                let middles: Vec<&Relay> = relays
                    .iter()
                    .filter(|relay| !relay.same_family(guard) && !relay.same_family(exit))
                    .collect();

                if let Some(middle) = pick_weighted_random(&middles, rng) {
                    info!(
                        guard = %guard.fingerprint(),
                        middle = %middle.fingerprint(),
                        exit = %exit.fingerprint(),
                        guards_tried = guards_tried + 1,
                        exits_tried,
                        "selected path"
                    );
                    return Ok(SelectedPath {
                        guard: guard.clone(),
                        middle: middle.clone(),
                        exit: exit.clone(),
                    });
                }
            }
        }

        warn!(
            guards_tried = guards.len(),
            exits_tried, "exhausted guard/exit candidates without a middle relay"
        );
        Err(PathError::no_valid_path(guards.len(), exits_tried))
    }
}

fn rank_guards<'s, G, R>(
    scorer: &SecurityScorer<'_, G>,
    relays: &'s [Relay],
    rng: &mut R,
    client_ip: &str,
    params: &AlphaParams,
) -> Vec<&'s Relay>
where
    G: Geolocator + ?Sized,
    R: RandomSource + ?Sized,
{
    let scores = scorer.guard_security(client_ip, relays);
    RelayRanker::new(*params).rank(&scores, rng)
}

fn rank_exits<'s, G, R>(
    scorer: &SecurityScorer<'_, G>,
    relays: &'s [Relay],
    rng: &mut R,
    client_ip: &str,
    guard: &Relay,
    destination_ip: &str,
    params: &AlphaParams,
) -> Vec<&'s Relay>
where
    G: Geolocator + ?Sized,
    R: RandomSource + ?Sized,
{
    let candidates = relays
        .iter()
        .filter(|relay| relay.can_be_exit(destination_ip) && !relay.same_family(guard));
    let scores = scorer.exit_scores(client_ip, guard, candidates, destination_ip);
    RelayRanker::new(*params).rank(&scores, rng)
}
