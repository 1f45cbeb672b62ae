//! Property test strategies for path selection
//!
//! Relay sets use index-derived fingerprints (`R0`, `R1`, ...) so they are
//! always unique. Family declarations refer to other members of the same
//! set and are frequently one-sided, which exercises the symmetric family
//! check.

use crate::fixtures::StaticGeolocator;
use allypath_core::{Alliance, AlphaParams, Bandwidth, ExitPolicy, Relay};
use proptest::prelude::*;

// Re-export proptest for convenience
pub use proptest;

/// Client address used by generated scenarios.
pub const SCENARIO_CLIENT_IP: &str = "192.0.2.10";

/// Destination address used by generated scenarios.
pub const SCENARIO_DESTINATION_IP: &str = "203.0.113.80";

/// Jurisdictions generated relays and alliances draw from.
pub const COUNTRY_POOL: [&str; 8] = ["PT", "BR", "US", "RU", "CN", "DE", "IR", "FR"];

const POLICIES: [&str; 4] = [
    "reject *:*",
    "accept *:443",
    "accept *:*",
    "reject 203.0.113.0/24:*, accept *:*",
];

/// A generated selection input.
#[derive(Debug, Clone)]
pub struct Scenario {
    /// Relays offered to the selector, including unmeasured ones.
    pub relays: Vec<Relay>,
    /// Alliance list
    pub alliances: Vec<Alliance>,
    /// Geolocation for every relay plus the client and destination
    pub geo: StaticGeolocator,
    /// Seed for the selector's generator
    pub seed: u64,
}

/// Strategy for an exit policy drawn from a small fixed set.
pub fn arb_exit_policy() -> impl Strategy<Value = ExitPolicy> {
    (0..POLICIES.len()).prop_map(|idx| POLICIES[idx].parse().unwrap())
}

/// Strategy for an alliance over [`COUNTRY_POOL`].
pub fn arb_alliance() -> impl Strategy<Value = Alliance> {
    (
        prop::collection::btree_set(0..COUNTRY_POOL.len(), 1..4),
        0.0f64..=1.0,
    )
        .prop_map(|(members, trust)| {
            Alliance::new(members.into_iter().map(|idx| COUNTRY_POOL[idx]), trust).unwrap()
        })
}

/// Strategy for an alliance list.
pub fn arb_alliances() -> impl Strategy<Value = Vec<Alliance>> {
    prop::collection::vec(arb_alliance(), 0..5)
}

/// Strategy for threshold parameters whose bands are non-empty.
pub fn arb_alpha_params() -> impl Strategy<Value = AlphaParams> {
    (0.5f64..=1.0, 1.0f64..=3.0, 0.0f64..=0.5, 3.0f64..=12.0)
        .prop_map(|(su, sl, au, al)| AlphaParams::new(su, sl, au, al, 0.2))
}

/// Strategy for a set of up to `max` relays with unique fingerprints.
///
/// Roughly one relay in ten has zero measured bandwidth.
pub fn arb_relay_set(max: usize) -> impl Strategy<Value = Vec<Relay>> {
    let relay = (
        prop_oneof![1 => Just(0u64), 9 => 1u64..5000],
        arb_exit_policy(),
        prop::collection::vec(0usize..64, 0..3),
    );
    prop::collection::vec(relay, 0..=max).prop_map(|specs| {
        let count = specs.len();
        specs
            .into_iter()
            .enumerate()
            .map(|(idx, (measured, policy, family))| {
                let family: Vec<String> = family
                    .into_iter()
                    .map(|member| format!("R{}", member % count))
                    .filter(|fp| *fp != format!("R{idx}"))
                    .collect();
                Relay::new(format!("R{idx}"), relay_ip(idx))
                    .with_nickname(format!("relay{idx}"))
                    .with_bandwidth(Bandwidth::measured(measured))
                    .with_exit_policy(policy)
                    .with_family(family)
            })
            .collect()
    })
}

/// Strategy for a full selection scenario.
pub fn arb_scenario(max_relays: usize) -> impl Strategy<Value = Scenario> {
    arb_relay_set(max_relays)
        .prop_flat_map(|relays| {
            let count = relays.len();
            (
                Just(relays),
                arb_alliances(),
                prop::collection::vec(prop::option::of(0..COUNTRY_POOL.len()), count + 2),
                any::<u64>(),
            )
        })
        .prop_map(|(relays, alliances, countries, seed)| {
            let mut geo = StaticGeolocator::new();
            let addresses = relays
                .iter()
                .map(|relay| relay.ip().to_string())
                .chain([
                    SCENARIO_CLIENT_IP.to_string(),
                    SCENARIO_DESTINATION_IP.to_string(),
                ]);
            for (ip, country) in addresses.zip(countries) {
                if let Some(idx) = country {
                    geo.insert(&ip, COUNTRY_POOL[idx]);
                }
            }
            Scenario {
                relays,
                alliances,
                geo,
                seed,
            }
        })
}

/// Deterministic address for the relay at `idx`.
pub fn relay_ip(idx: usize) -> String {
    format!("198.18.{}.{}", idx / 256, idx % 256)
}
