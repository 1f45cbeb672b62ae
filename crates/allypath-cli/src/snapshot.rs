//! On-disk inputs: consensus snapshot, client request, prefix table
//!
//! The consensus and request are JSON, the prefix table is TOML. Records
//! are deserialized into plain structs first and converted to core types
//! afterwards so conversion failures can name the offending record.

use allypath_core::{Alliance, AllianceError, Bandwidth, ExitPolicy, PrefixGeolocator, Relay};
use anyhow::{Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::Path;
use tracing::{debug, warn};

/// One relay as it appears in the consensus JSON.
#[derive(Debug, Clone, Deserialize)]
pub struct ConsensusRelay {
    pub fingerprint: String,
    #[serde(default)]
    pub nickname: String,
    pub ip: String,
    #[serde(default)]
    pub port: u16,
    #[serde(default)]
    pub asn: String,
    #[serde(default)]
    pub bandwidth: BandwidthRecord,
    /// Related fingerprints, usually `$`-prefixed.
    #[serde(default)]
    pub family: Vec<String>,
    /// Exit rules joined by `", "`.
    #[serde(default)]
    pub exit: String,
}

/// Bandwidth triple. Signed so that negative values in the wild can be
/// clamped rather than rejected.
#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct BandwidthRecord {
    #[serde(default)]
    pub measured: i64,
    #[serde(default)]
    pub average: i64,
    #[serde(default)]
    pub burst: i64,
}

impl From<BandwidthRecord> for Bandwidth {
    fn from(record: BandwidthRecord) -> Self {
        let clamp = |value: i64| u64::try_from(value).unwrap_or(0);
        Bandwidth {
            measured: clamp(record.measured),
            average: clamp(record.average),
            burst: clamp(record.burst),
        }
    }
}

impl ConsensusRelay {
    /// Convert to a core relay.
    ///
    /// A policy with an unknown rule keyword cannot be evaluated; the relay
    /// is kept with an empty policy, which never allows exiting, so it still
    /// serves as guard or middle.
    pub fn into_relay(self) -> Relay {
        let policy = self.exit.parse::<ExitPolicy>().unwrap_or_else(|error| {
            warn!(
                relay = %self.fingerprint,
                policy = %self.exit,
                %error,
                "unusable exit policy, keeping relay as non-exit"
            );
            ExitPolicy::default()
        });
        let family = self
            .family
            .iter()
            .map(|member| member.strip_prefix('$').unwrap_or(member).to_string());

        Relay::new(self.fingerprint, self.ip)
            .with_nickname(self.nickname)
            .with_port(self.port)
            .with_asn(self.asn)
            .with_bandwidth(self.bandwidth.into())
            .with_exit_policy(policy)
            .with_family(family)
    }
}

/// Client request JSON.
#[derive(Debug, Clone, Deserialize)]
pub struct ClientRequest {
    /// Client IP address
    #[serde(rename = "Client")]
    pub client: String,
    /// Destination IP address
    #[serde(rename = "Destination")]
    pub destination: String,
    /// Alliance records
    #[serde(rename = "Alliances", default)]
    pub alliances: Vec<AllianceRecord>,
}

/// One alliance as it appears in the request.
#[derive(Debug, Clone, Deserialize)]
pub struct AllianceRecord {
    pub countries: Vec<String>,
    pub trust: f64,
}

impl ClientRequest {
    /// Validated alliances in declared order.
    pub fn alliances(&self) -> Result<Vec<Alliance>, AllianceError> {
        self.alliances
            .iter()
            .map(|record| Alliance::new(record.countries.iter().map(String::as_str), record.trust))
            .collect()
    }
}

#[derive(Debug, Deserialize)]
struct PrefixTable {
    #[serde(default)]
    prefix: Vec<PrefixRecord>,
}

#[derive(Debug, Deserialize)]
struct PrefixRecord {
    network: String,
    country: String,
}

/// Parse consensus JSON. Every record becomes a relay.
pub fn parse_consensus(json: &str) -> Result<Vec<Relay>> {
    let records: Vec<ConsensusRelay> =
        serde_json::from_str(json).context("consensus is not a JSON array of relays")?;

    let relays: Vec<Relay> = records.into_iter().map(ConsensusRelay::into_relay).collect();
    let exits = relays
        .iter()
        .filter(|relay| !relay.exit_policy().rules().is_empty())
        .count();

    debug!(relays = relays.len(), with_exit_rules = exits, "parsed consensus");
    Ok(relays)
}

/// Read and parse a consensus file.
pub fn load_consensus(path: &Path) -> Result<Vec<Relay>> {
    let json = fs::read_to_string(path)
        .with_context(|| format!("failed to read consensus {}", path.display()))?;
    parse_consensus(&json).with_context(|| format!("in {}", path.display()))
}

/// Read and parse a client request file.
pub fn load_request(path: &Path) -> Result<ClientRequest> {
    let json = fs::read_to_string(path)
        .with_context(|| format!("failed to read request {}", path.display()))?;
    serde_json::from_str(&json).with_context(|| format!("invalid request {}", path.display()))
}

/// Parse a TOML prefix table of `[[prefix]]` entries.
pub fn parse_prefix_table(source: &str) -> Result<PrefixGeolocator> {
    let table: PrefixTable = toml::from_str(source).context("invalid prefix table")?;
    let mut geo = PrefixGeolocator::new();
    for record in &table.prefix {
        geo.insert_str(&record.network, &record.country)?;
    }
    debug!(entries = geo.len(), "parsed prefix table");
    Ok(geo)
}

/// Read and parse a prefix table file.
pub fn load_prefix_table(path: &Path) -> Result<PrefixGeolocator> {
    let source = fs::read_to_string(path)
        .with_context(|| format!("failed to read prefix table {}", path.display()))?;
    parse_prefix_table(&source).with_context(|| format!("in {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use allypath_core::Geolocator;

    #[test]
    fn test_consensus_record_conversion() {
        let json = r#"[{
            "fingerprint": "AAAA",
            "nickname": "alpha",
            "ip": "5.199.134.200",
            "port": 9001,
            "asn": "AS1234",
            "bandwidth": { "measured": 3000, "average": 4000, "burst": -5 },
            "family": ["$BBBB", "CCCC"],
            "exit": "reject 10.0.0.0/8:*, accept *:443"
        }]"#;
        let relays = parse_consensus(json).unwrap();
        assert_eq!(relays.len(), 1);

        let relay = &relays[0];
        assert_eq!(relay.nickname(), "alpha");
        assert_eq!(relay.port(), 9001);
        assert_eq!(relay.bandwidth().burst, 0);
        assert_eq!(relay.exit_policy().rules().len(), 2);
        let family: Vec<&str> = relay.family().iter().map(|fp| fp.as_str()).collect();
        assert_eq!(family, ["BBBB", "CCCC"]);
    }

    #[test]
    fn test_unusable_policy_keeps_relay_as_non_exit() {
        let json = r#"[
            { "fingerprint": "A", "ip": "192.0.2.1", "exit": "allow *:*" },
            { "fingerprint": "B", "ip": "192.0.2.2", "exit": "accept *:*" }
        ]"#;
        let relays = parse_consensus(json).unwrap();
        assert_eq!(relays.len(), 2);
        assert!(!relays[0].can_be_exit("93.184.216.34"));
        assert!(relays[1].can_be_exit("93.184.216.34"));
    }

    #[test]
    fn test_symbolic_and_summary_policies_are_kept() {
        let json = r#"[
            { "fingerprint": "P", "ip": "192.0.2.1", "exit": "reject private:*, accept *:*" },
            { "fingerprint": "S", "ip": "192.0.2.2", "exit": "accept 80,443" },
            { "fingerprint": "OK", "ip": "192.0.2.3", "exit": "reject *:*" }
        ]"#;
        let relays = parse_consensus(json).unwrap();
        let names: Vec<&str> = relays.iter().map(|r| r.fingerprint().as_str()).collect();
        assert_eq!(names, ["P", "S", "OK"]);

        assert!(relays[0].can_be_exit("185.199.111.153"));
        assert!(relays[1].can_be_exit("185.199.111.153"));
        assert!(!relays[2].can_be_exit("185.199.111.153"));
    }

    #[test]
    fn test_negative_measured_bandwidth_clamps_to_zero() {
        let json = r#"[{ "fingerprint": "A", "ip": "192.0.2.1",
                         "bandwidth": { "measured": -1 } }]"#;
        let relays = parse_consensus(json).unwrap();
        assert_eq!(relays[0].bandwidth_measured(), 0);
    }

    #[test]
    fn test_request_alliances_are_validated() {
        let ok: ClientRequest = serde_json::from_str(
            r#"{ "Client": "193.136.122.65", "Destination": "185.199.111.153",
                 "Alliances": [{ "countries": ["US", "RU"], "trust": 0.01 }] }"#,
        )
        .unwrap();
        assert_eq!(ok.alliances().unwrap().len(), 1);

        let bad: ClientRequest = serde_json::from_str(
            r#"{ "Client": "a", "Destination": "b",
                 "Alliances": [{ "countries": ["US"], "trust": 1.5 }] }"#,
        )
        .unwrap();
        assert!(bad.alliances().is_err());
    }

    #[test]
    fn test_prefix_table() {
        let geo = parse_prefix_table(
            r#"
            [[prefix]]
            network = "193.136.0.0/15"
            country = "PT"

            [[prefix]]
            network = "193.136.122.0/24"
            country = "BR"
            "#,
        )
        .unwrap();
        assert_eq!(geo.len(), 2);
        assert_eq!(geo.locate("193.136.122.65").unwrap().as_str(), "BR");
        assert_eq!(geo.locate("193.137.1.1").unwrap().as_str(), "PT");

        assert!(parse_prefix_table("[[prefix]]\nnetwork = \"nope\"\ncountry = \"PT\"").is_err());
    }
}
