//! Relay records
//!
//! A [`Relay`] is one consensus entry. Its identity is the fingerprint alone:
//! two snapshots of the same relay with different bandwidth figures compare
//! equal and hash identically.

use crate::policy::ExitPolicy;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::hash::{Hash, Hasher};

/// Opaque relay identifier, unique within a snapshot.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Fingerprint(String);

impl Fingerprint {
    /// Wrap a fingerprint string as-is.
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Borrow the underlying string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Fingerprint {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for Fingerprint {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl AsRef<str> for Fingerprint {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Advertised and measured bandwidth, in consensus units.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bandwidth {
    /// Bandwidth-authority measurement; the sampling weight.
    pub measured: u64,
    /// Self-reported average
    pub average: u64,
    /// Self-reported burst
    pub burst: u64,
}

impl Bandwidth {
    /// Bandwidth with only the measured figure set.
    pub fn measured(measured: u64) -> Self {
        Self {
            measured,
            ..Self::default()
        }
    }
}

/// One relay from a consensus snapshot.
#[derive(Debug, Clone)]
pub struct Relay {
    fingerprint: Fingerprint,
    nickname: String,
    ip: String,
    asn: String,
    exit_policy: ExitPolicy,
    port: u16,
    bandwidth: Bandwidth,
    family: BTreeSet<Fingerprint>,
}

impl Relay {
    /// A relay with the given identity and address; every other field empty.
    ///
    /// The default exit policy has no rules, so the relay cannot exit.
    pub fn new(fingerprint: impl Into<Fingerprint>, ip: impl Into<String>) -> Self {
        Self {
            fingerprint: fingerprint.into(),
            nickname: String::new(),
            ip: ip.into(),
            asn: String::new(),
            exit_policy: ExitPolicy::default(),
            port: 0,
            bandwidth: Bandwidth::default(),
            family: BTreeSet::new(),
        }
    }

    /// Set the nickname.
    pub fn with_nickname(mut self, nickname: impl Into<String>) -> Self {
        self.nickname = nickname.into();
        self
    }

    /// Set the autonomous-system id.
    pub fn with_asn(mut self, asn: impl Into<String>) -> Self {
        self.asn = asn.into();
        self
    }

    /// Set the OR port.
    pub fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    /// Set the bandwidth figures.
    pub fn with_bandwidth(mut self, bandwidth: Bandwidth) -> Self {
        self.bandwidth = bandwidth;
        self
    }

    /// Set the exit policy.
    pub fn with_exit_policy(mut self, exit_policy: ExitPolicy) -> Self {
        self.exit_policy = exit_policy;
        self
    }

    /// Set the self-declared family.
    pub fn with_family<I, F>(mut self, family: I) -> Self
    where
        I: IntoIterator<Item = F>,
        F: Into<Fingerprint>,
    {
        self.family = family.into_iter().map(Into::into).collect();
        self
    }

    /// Relay identity.
    pub fn fingerprint(&self) -> &Fingerprint {
        &self.fingerprint
    }

    /// Operator-chosen name.
    pub fn nickname(&self) -> &str {
        &self.nickname
    }

    /// Address the relay is reachable at, used for geolocation.
    pub fn ip(&self) -> &str {
        &self.ip
    }

    /// Autonomous-system id.
    pub fn asn(&self) -> &str {
        &self.asn
    }

    /// OR port.
    pub fn port(&self) -> u16 {
        self.port
    }

    /// Bandwidth figures.
    pub fn bandwidth(&self) -> Bandwidth {
        self.bandwidth
    }

    /// Measured bandwidth, the sampling weight.
    pub fn bandwidth_measured(&self) -> u64 {
        self.bandwidth.measured
    }

    /// Ordered exit rules.
    pub fn exit_policy(&self) -> &ExitPolicy {
        &self.exit_policy
    }

    /// Fingerprints this relay declares as related.
    pub fn family(&self) -> &BTreeSet<Fingerprint> {
        &self.family
    }

    /// Whether the relay may serve as exit towards `destination`.
    ///
    /// See [`ExitPolicy::allows_exit_to`]: the first `accept` rule makes the
    /// relay eligible without checking that the rule covers `destination`.
    pub fn can_be_exit(&self, destination: &str) -> bool {
        self.exit_policy.allows_exit_to(destination)
    }

    /// Whether the two relays are the same relay or either lists the other in
    /// its family.
    pub fn same_family(&self, other: &Relay) -> bool {
        self.fingerprint == other.fingerprint
            || self.family.contains(&other.fingerprint)
            || other.family.contains(&self.fingerprint)
    }
}

impl PartialEq for Relay {
    fn eq(&self, other: &Self) -> bool {
        self.fingerprint == other.fingerprint
    }
}

impl Eq for Relay {}

impl Hash for Relay {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.fingerprint.hash(state);
    }
}

impl fmt::Display for Relay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.nickname.is_empty() {
            write!(f, "{}", self.fingerprint)
        } else {
            write!(f, "{} ({})", self.nickname, self.fingerprint)
        }
    }
}
