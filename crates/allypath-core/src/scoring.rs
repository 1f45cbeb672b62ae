//! Guard and exit security scores
//!
//! Both scores are pure functions of the alliance list and the geolocation
//! capability. Unresolved addresses score as a jurisdiction with no allies
//! and zero trust.
//!
//! The two scores do not share a polarity: a guard's score grows with the
//! trust of its jurisdiction, while an exit pair with no common adversary
//! scores `1.0`. Ranking consumes them as-is.

use crate::alliance::CountryCode;
use crate::geo::Geolocator;
use crate::relay::Relay;
use crate::trust::TrustModel;
use indexmap::IndexMap;
use std::collections::BTreeSet;
use tracing::trace;

/// Multiplier applied to a guard whose jurisdiction shares no alliance with
/// the client's.
pub const GUARD_ALLIANCE_MISMATCH_PENALTY: f64 = 0.75;

/// Score of an exit pair when no adversary spans both ends.
pub const NO_SHARED_ADVERSARY_SCORE: f64 = 1.0;

/// Relay scores in the order the relays were scored.
pub type ScoreMap<'a> = IndexMap<&'a Relay, f64>;

/// Scores candidates against a trust model through a geolocator.
pub struct SecurityScorer<'a, G: ?Sized> {
    trust: &'a TrustModel,
    geo: &'a G,
}

impl<'a, G> SecurityScorer<'a, G>
where
    G: Geolocator + ?Sized,
{
    /// Borrow a trust model and geolocator for scoring.
    pub fn new(trust: &'a TrustModel, geo: &'a G) -> Self {
        Self { trust, geo }
    }

    /// Score each guard independently.
    ///
    /// A guard scores the trust of its jurisdiction, multiplied by
    /// [`GUARD_ALLIANCE_MISMATCH_PENALTY`] when its allied set and the
    /// client's allied set do not intersect.
    pub fn guard_security<'r, I>(&self, client_ip: &str, guards: I) -> ScoreMap<'r>
    where
        I: IntoIterator<Item = &'r Relay>,
    {
        let client_allies = self.allies_at(client_ip);

        guards
            .into_iter()
            .map(|guard| {
                let country = self.geo.locate(guard.ip());
                let mut score = self.trust.trust_of(country.as_ref());
                let guard_allies = self.trust.allies_of(country.as_ref());
                if client_allies.is_disjoint(&guard_allies) {
                    score *= GUARD_ALLIANCE_MISMATCH_PENALTY;
                }
                trace!(guard = %guard.fingerprint(), country = ?country, score, "scored guard");
                (guard, score)
            })
            .collect()
    }

    /// Score an exit for a fixed guard.
    ///
    /// Adversaries on the entry side are the allies of the client and guard
    /// jurisdictions; on the exit side, the allies of the destination and
    /// exit jurisdictions. The score is the lowest trust among adversaries
    /// present on both sides, or [`NO_SHARED_ADVERSARY_SCORE`] when none is.
    pub fn exit_security(
        &self,
        client_ip: &str,
        guard: &Relay,
        exit: &Relay,
        destination_ip: &str,
    ) -> f64 {
        let mut entry_side = self.allies_at(client_ip);
        entry_side.extend(self.allies_at(guard.ip()));

        let mut exit_side = self.allies_at(destination_ip);
        exit_side.extend(self.allies_at(exit.ip()));

        entry_side
            .intersection(&exit_side)
            .map(|country| self.trust.country_trust(country))
            .reduce(f64::min)
            .unwrap_or(NO_SHARED_ADVERSARY_SCORE)
    }

    /// Score every exit candidate for a fixed guard.
    pub fn exit_scores<'r, I>(
        &self,
        client_ip: &str,
        guard: &Relay,
        exits: I,
        destination_ip: &str,
    ) -> ScoreMap<'r>
    where
        I: IntoIterator<Item = &'r Relay>,
    {
        exits
            .into_iter()
            .map(|exit| {
                let score = self.exit_security(client_ip, guard, exit, destination_ip);
                (exit, score)
            })
            .collect()
    }

    fn allies_at(&self, ip: &str) -> BTreeSet<CountryCode> {
        self.trust.allies_of(self.geo.locate(ip).as_ref())
    }
}

impl<G: ?Sized> Clone for SecurityScorer<'_, G> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<G: ?Sized> Copy for SecurityScorer<'_, G> {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::alliance::Alliance;
    use std::collections::HashMap;

    const CLIENT: &str = "193.136.122.65";
    const DESTINATION: &str = "185.199.111.153";

    fn trust() -> TrustModel {
        TrustModel::new(vec![
            Alliance::new(["PT", "BR", "AO", "MZ", "ST"], 0.25).unwrap(),
            Alliance::new(["US", "RU"], 0.01).unwrap(),
            Alliance::new(["PT", "CN"], 0.4).unwrap(),
            Alliance::new(["IR", "DE"], 0.8).unwrap(),
        ])
    }

    fn geo() -> impl Fn(&str) -> Option<CountryCode> {
        let table: HashMap<&'static str, &'static str> = [
            (CLIENT, "PT"),
            (DESTINATION, "US"),
            ("5.199.134.200", "DE"),
            ("202.108.35.147", "CN"),
            ("177.192.255.38", "BR"),
            ("103.117.124.1", "HK"),
            ("91.198.174.192", "NL"),
            ("62.210.16.1", "FR"),
        ]
        .into_iter()
        .collect();
        move |ip: &str| table.get(ip).map(|code| CountryCode::new(*code))
    }

    #[test]
    fn test_guard_without_shared_allies_is_penalized() {
        let trust = trust();
        let geo = geo();
        let scorer = SecurityScorer::new(&trust, &geo);

        let guard = Relay::new("G1", "5.199.134.200");
        let scores = scorer.guard_security(CLIENT, [&guard]);
        assert_eq!(scores[&guard], 0.8 * GUARD_ALLIANCE_MISMATCH_PENALTY);
        assert!((scores[&guard] - 0.6).abs() < 1e-12);
    }

    #[test]
    fn test_guard_with_shared_allies_keeps_trust() {
        let trust = trust();
        let geo = geo();
        let scorer = SecurityScorer::new(&trust, &geo);

        // CN shares the PT-CN alliance with the client.
        let guard = Relay::new("M1", "202.108.35.147");
        let scores = scorer.guard_security(CLIENT, [&guard]);
        assert_eq!(scores[&guard], 0.4);
    }

    #[test]
    fn test_guard_scores_are_independent_and_ordered() {
        let trust = trust();
        let geo = geo();
        let scorer = SecurityScorer::new(&trust, &geo);

        let de = Relay::new("DE", "5.199.134.200");
        let cn = Relay::new("CN", "202.108.35.147");
        let unknown = Relay::new("XX", "198.51.100.1");
        let scores = scorer.guard_security(CLIENT, [&de, &cn, &unknown]);

        let order: Vec<&str> = scores.keys().map(|r| r.fingerprint().as_str()).collect();
        assert_eq!(order, ["DE", "CN", "XX"]);
        assert_eq!(scores[&cn], 0.4);
        assert_eq!(scores[&unknown], 0.0);
    }

    #[test]
    fn test_exit_security_takes_minimum_shared_trust() {
        let trust = trust();
        let geo = geo();
        let scorer = SecurityScorer::new(&trust, &geo);

        let guard = Relay::new("G1", "103.117.124.1");
        let exit = Relay::new("E1", "177.192.255.38");
        assert_eq!(scorer.exit_security(CLIENT, &guard, &exit, DESTINATION), 0.25);
    }

    #[test]
    fn test_exit_security_without_shared_adversary() {
        let trust = trust();
        let geo = geo();
        let scorer = SecurityScorer::new(&trust, &geo);

        // Client FR and guard NL belong to no alliance: nothing can be shared.
        let guard = Relay::new("G1", "91.198.174.192");
        let exit = Relay::new("E1", "177.192.255.38");
        let score = scorer.exit_security("62.210.16.1", &guard, &exit, DESTINATION);
        assert_eq!(score, NO_SHARED_ADVERSARY_SCORE);
    }

    #[test]
    fn test_exit_scores_cover_each_candidate() {
        let trust = trust();
        let geo = geo();
        let scorer = SecurityScorer::new(&trust, &geo);

        let guard = Relay::new("G1", "103.117.124.1");
        let br = Relay::new("E1", "177.192.255.38");
        let nl = Relay::new("E2", "91.198.174.192");
        let scores = scorer.exit_scores(CLIENT, &guard, [&br, &nl], DESTINATION);
        assert_eq!(scores.len(), 2);
        assert_eq!(scores[&br], 0.25);
        // US-RU on the exit side never meets PT's allies: 1.0.
        assert_eq!(scores[&nl], 1.0);
    }

    #[test]
    fn test_unresolved_client_guard_is_penalized() {
        let trust = trust();
        let geo = geo();
        let scorer = SecurityScorer::new(&trust, &geo);

        // No client country means no client allies, so no guard shares any.
        let de = Relay::new("DE", "5.199.134.200");
        let cn = Relay::new("CN", "202.108.35.147");
        let unknown = Relay::new("XX", "198.51.100.1");
        let scores = scorer.guard_security("198.51.100.9", [&de, &cn, &unknown]);
        assert!((scores[&de] - 0.8 * GUARD_ALLIANCE_MISMATCH_PENALTY).abs() < 1e-12);
        assert!((scores[&cn] - 0.4 * GUARD_ALLIANCE_MISMATCH_PENALTY).abs() < 1e-12);
        assert_eq!(scores[&unknown], 0.0);
    }

    #[test]
    fn test_exit_security_with_unresolved_client_and_destination() {
        let trust = trust();
        let geo = geo();
        let scorer = SecurityScorer::new(&trust, &geo);

        // Entry side is the DE guard's allies, exit side is the US exit's.
        let guard = Relay::new("G1", "5.199.134.200");
        let exit = Relay::new("E1", DESTINATION);
        let score = scorer.exit_security("198.51.100.9", &guard, &exit, "198.51.100.10");
        assert_eq!(score, NO_SHARED_ADVERSARY_SCORE);
    }

    #[test]
    fn test_exit_security_with_unresolved_client() {
        let trust = trust();
        let geo = geo();
        let scorer = SecurityScorer::new(&trust, &geo);

        // CN guard and BR exit with a US destination only share PT.
        let guard = Relay::new("G1", "202.108.35.147");
        let exit = Relay::new("E1", "177.192.255.38");
        let score = scorer.exit_security("198.51.100.9", &guard, &exit, DESTINATION);
        assert_eq!(score, 0.4);
    }

    #[test]
    fn test_exit_security_with_unresolved_destination() {
        let trust = trust();
        let geo = geo();
        let scorer = SecurityScorer::new(&trust, &geo);

        let guard = Relay::new("G1", "5.199.134.200");
        let exit = Relay::new("E1", "177.192.255.38");
        let score = scorer.exit_security(CLIENT, &guard, &exit, "198.51.100.10");
        assert_eq!(score, 0.25);
    }
}
