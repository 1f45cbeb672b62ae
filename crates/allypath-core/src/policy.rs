//! Exit Policies
//!
//! Typed form of the consensus exit-policy lines (`accept *:443`,
//! `reject 10.0.0.0/8:*`, ...) and the eligibility rule applied to exit
//! candidates.

use crate::error::PolicyError;
use crate::net::IpPrefix;
use std::fmt;
use std::net::IpAddr;
use std::str::FromStr;

/// What a rule does when it fires.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ExitAction {
    /// Carry traffic to the target.
    Accept,
    /// Refuse traffic to the target.
    Reject,
}

/// Address half of a rule target.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum AddressPattern {
    /// `*`
    Any,
    /// `*4`
    AnyV4,
    /// `*6`
    AnyV6,
    /// A host address or CIDR prefix.
    Prefix(IpPrefix),
    /// Text that is not an address pattern (`private`, a port list, ...).
    /// Covers nothing.
    Unrecognized(String),
}

impl AddressPattern {
    /// Whether the pattern covers `addr`.
    pub fn contains(&self, addr: &IpAddr) -> bool {
        match self {
            Self::Any => true,
            Self::AnyV4 => addr.is_ipv4(),
            Self::AnyV6 => addr.is_ipv6(),
            Self::Prefix(prefix) => prefix.contains(addr),
            Self::Unrecognized(_) => false,
        }
    }

    /// Whether the pattern covers a textual address. Unparseable input is
    /// covered by no pattern.
    pub fn contains_str(&self, addr: &str) -> bool {
        addr.trim()
            .parse::<IpAddr>()
            .map(|ip| self.contains(&ip))
            .unwrap_or(false)
    }
}

impl FromStr for AddressPattern {
    type Err = PolicyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "*" => Ok(Self::Any),
            "*4" => Ok(Self::AnyV4),
            "*6" => Ok(Self::AnyV6),
            other => other
                .parse::<IpPrefix>()
                .map(Self::Prefix)
                .map_err(|_| PolicyError::invalid_address(other)),
        }
    }
}

impl fmt::Display for AddressPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Any => f.write_str("*"),
            Self::AnyV4 => f.write_str("*4"),
            Self::AnyV6 => f.write_str("*6"),
            Self::Prefix(prefix) => write!(f, "{prefix}"),
            Self::Unrecognized(text) => f.write_str(text),
        }
    }
}

/// Port half of a rule target. Inclusive on both ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PortRange {
    /// Lowest covered port
    pub low: u16,
    /// Highest covered port
    pub high: u16,
}

impl PortRange {
    /// Every port.
    pub const ALL: Self = Self { low: 1, high: 65535 };

    /// Whether `port` is covered.
    pub fn contains(&self, port: u16) -> bool {
        (self.low..=self.high).contains(&port)
    }
}

impl FromStr for PortRange {
    type Err = PolicyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s == "*" {
            return Ok(Self::ALL);
        }
        let parse = |p: &str| p.parse::<u16>().map_err(|_| PolicyError::invalid_ports(s));
        let (low, high) = match s.split_once('-') {
            Some((low, high)) => (parse(low)?, parse(high)?),
            None => {
                let port = parse(s)?;
                (port, port)
            }
        };
        if low > high {
            return Err(PolicyError::invalid_ports(s));
        }
        Ok(Self { low, high })
    }
}

impl fmt::Display for PortRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if *self == Self::ALL {
            f.write_str("*")
        } else if self.low == self.high {
            write!(f, "{}", self.low)
        } else {
            write!(f, "{}-{}", self.low, self.high)
        }
    }
}

/// One `accept|reject addr:ports` line.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ExitRule {
    /// Accept or reject
    pub action: ExitAction,
    /// Destination addresses covered
    pub address: AddressPattern,
    /// Destination ports covered
    pub ports: PortRange,
}

impl ExitRule {
    /// `accept <address>:<ports>`
    pub fn accept(address: AddressPattern, ports: PortRange) -> Self {
        Self {
            action: ExitAction::Accept,
            address,
            ports,
        }
    }

    /// `reject <address>:<ports>`
    pub fn reject(address: AddressPattern, ports: PortRange) -> Self {
        Self {
            action: ExitAction::Reject,
            address,
            ports,
        }
    }

    /// Parse a rule as eligibility reads it: only the action has to be
    /// valid.
    ///
    /// An address that does not parse becomes
    /// [`AddressPattern::Unrecognized`], and ports that do not parse (or are
    /// absent) become [`PortRange::ALL`]. Summary forms such as
    /// `accept 80,443` and symbolic targets such as `reject private:*` are
    /// therefore kept.
    pub fn parse_lenient(s: &str) -> Result<Self, PolicyError> {
        let (action, target) = split_action(s)?;
        let target = target.unwrap_or_default();
        let (address, ports) = match split_target(target) {
            Some((address, ports)) => (address, ports.parse().ok()),
            None => (target, None),
        };

        Ok(Self {
            action,
            address: address
                .parse()
                .unwrap_or_else(|_| AddressPattern::Unrecognized(address.to_string())),
            ports: ports.unwrap_or(PortRange::ALL),
        })
    }
}

fn split_action(s: &str) -> Result<(ExitAction, Option<&str>), PolicyError> {
    let mut parts = s.split_whitespace();
    let action = match parts.next() {
        Some("accept") => ExitAction::Accept,
        Some("reject") => ExitAction::Reject,
        Some(other) => return Err(PolicyError::UnknownAction(other.to_string())),
        None => return Err(PolicyError::EmptyRule),
    };
    Ok((action, parts.next()))
}

// The port separator is the last ':'; bracketed v6 addresses keep theirs.
fn split_target(target: &str) -> Option<(&str, &str)> {
    target.rsplit_once(':').filter(|(addr, _)| !addr.is_empty())
}

impl FromStr for ExitRule {
    type Err = PolicyError;

    /// Strict form: both halves of the target must parse.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (action, target) = split_action(s)?;
        let target = target.ok_or_else(|| PolicyError::MissingTarget(s.trim().to_string()))?;
        let (address, ports) =
            split_target(target).ok_or_else(|| PolicyError::invalid_address(target))?;

        Ok(Self {
            action,
            address: address.parse()?,
            ports: ports.parse()?,
        })
    }
}

impl fmt::Display for ExitRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let action = match self.action {
            ExitAction::Accept => "accept",
            ExitAction::Reject => "reject",
        };
        write!(f, "{action} {}:{}", self.address, self.ports)
    }
}

/// Ordered exit rules of one relay.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExitPolicy {
    rules: Vec<ExitRule>,
}

impl ExitPolicy {
    /// Wrap already-typed rules.
    pub fn new(rules: Vec<ExitRule>) -> Self {
        Self { rules }
    }

    /// The `reject *:*` policy of a non-exit relay.
    pub fn reject_all() -> Self {
        Self::new(vec![ExitRule::reject(AddressPattern::Any, PortRange::ALL)])
    }

    /// Parse rule lines in declared order with [`ExitRule::parse_lenient`].
    /// Fails only on a line without a valid `accept`/`reject` keyword.
    pub fn parse<I, S>(lines: I) -> Result<Self, PolicyError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        lines
            .into_iter()
            .map(|line| ExitRule::parse_lenient(line.as_ref()))
            .collect::<Result<Vec<_>, _>>()
            .map(Self::new)
    }

    /// Rules in declared order.
    pub fn rules(&self) -> &[ExitRule] {
        &self.rules
    }

    /// Whether a relay with this policy may carry traffic to `destination`.
    ///
    /// Rules are walked in order. A `reject` whose address pattern covers the
    /// destination ends the walk with `false`. The first `accept` ends the
    /// walk with `true` without consulting its own pattern. With no firing
    /// rule the answer is `false`. Ports never participate.
    pub fn allows_exit_to(&self, destination: &str) -> bool {
        for rule in &self.rules {
            match rule.action {
                ExitAction::Reject if rule.address.contains_str(destination) => return false,
                ExitAction::Reject => {}
                ExitAction::Accept => return true,
            }
        }
        false
    }
}

impl FromStr for ExitPolicy {
    type Err = PolicyError;

    /// Consensus form: rules joined by `", "`. A bare `,` stays inside a
    /// rule, as in the summary form `accept 80,443`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s.split(", ").map(str::trim).filter(|line| !line.is_empty()))
    }
}
