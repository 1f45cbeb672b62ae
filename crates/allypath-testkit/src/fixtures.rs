//! Path Selection Test Fixtures
//!
//! The reference scenario mirrors a small real-world setup: a Portuguese
//! client reaching a US-hosted destination, four alliances, and relays in
//! Germany, China and the US.

use allypath_core::{Alliance, Bandwidth, CountryCode, ExitPolicy, Geolocator, Relay};
use std::collections::HashMap;

/// Client address used across fixtures (resolves to PT).
pub const CLIENT_IP: &str = "193.136.122.65";

/// Destination address used across fixtures (resolves to US).
pub const DESTINATION_IP: &str = "185.199.111.153";

/// Geolocator backed by an exact-address map.
#[derive(Debug, Clone, Default)]
pub struct StaticGeolocator {
    table: HashMap<String, CountryCode>,
}

impl StaticGeolocator {
    /// Empty map; every lookup is unresolved.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a mapping, builder style.
    pub fn with(mut self, ip: &str, country: &str) -> Self {
        self.insert(ip, country);
        self
    }

    /// Add a mapping.
    pub fn insert(&mut self, ip: &str, country: &str) {
        self.table.insert(ip.to_string(), CountryCode::new(country));
    }
}

impl Geolocator for StaticGeolocator {
    fn locate(&self, ip: &str) -> Option<CountryCode> {
        self.table.get(ip).cloned()
    }
}

/// The four reference alliances.
pub fn reference_alliances() -> Vec<Alliance> {
    vec![
        Alliance::new(["PT", "BR", "AO", "MZ", "ST"], 0.25).unwrap(),
        Alliance::new(["US", "RU"], 0.01).unwrap(),
        Alliance::new(["PT", "CN"], 0.4).unwrap(),
        Alliance::new(["IR", "DE"], 0.8).unwrap(),
    ]
}

/// Geolocation for every address the reference fixtures use.
pub fn reference_geolocator() -> StaticGeolocator {
    StaticGeolocator::new()
        .with(CLIENT_IP, "PT")
        .with(DESTINATION_IP, "US")
        .with("5.199.134.200", "DE")
        .with("202.108.35.147", "CN")
        .with("185.199.109.153", "US")
        .with("185.199.109.154", "US")
        .with("177.192.255.38", "BR")
        .with("103.117.124.1", "HK")
}

/// Non-exit relay with the given measured bandwidth.
pub fn test_relay(fingerprint: &str, ip: &str, measured: u64) -> Relay {
    Relay::new(fingerprint, ip)
        .with_nickname(fingerprint.to_lowercase())
        .with_port(9001)
        .with_bandwidth(Bandwidth::measured(measured))
        .with_exit_policy(ExitPolicy::reject_all())
}

/// Relay with an exit policy in consensus form (`"accept *:443"`).
pub fn exit_relay(fingerprint: &str, ip: &str, measured: u64, policy: &str) -> Relay {
    test_relay(fingerprint, ip, measured).with_exit_policy(policy.parse().unwrap())
}

/// Guard G1 (DE), middle M1 (CN) and exit E1 (US).
pub fn reference_relays() -> Vec<Relay> {
    vec![
        test_relay("G1", "5.199.134.200", 3000),
        test_relay("M1", "202.108.35.147", 1500),
        exit_relay("E1", "185.199.109.153", 2500, "accept *:443"),
    ]
}

/// Two exits and nothing else: every (guard, exit) pair uses both relays.
pub fn exits_only_relays() -> Vec<Relay> {
    vec![
        exit_relay("R1", "185.199.109.153", 1000, "accept *:443"),
        exit_relay("R2", "185.199.109.154", 1000, "accept *:443"),
    ]
}
