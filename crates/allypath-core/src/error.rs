//! Path selection error types
//!
//! Errors raised while building the snapshot types (policies, alliances,
//! prefix tables) and by the path search itself.

use thiserror::Error;

/// Failure of the guard/exit backtracking search.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PathError {
    /// Every ranked (guard, exit) pair was tried and none left a middle relay.
    #[error("no valid path could be constructed")]
    NoValidPath {
        /// Number of ranked guard candidates visited
        guards_tried: usize,
        /// Number of (guard, exit) pairs visited
        exits_tried: usize,
    },
}

impl PathError {
    /// Create a no-valid-path error.
    pub fn no_valid_path(guards_tried: usize, exits_tried: usize) -> Self {
        Self::NoValidPath {
            guards_tried,
            exits_tried,
        }
    }
}

/// Malformed exit-policy rule.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PolicyError {
    /// The rule has no `accept`/`reject` keyword.
    #[error("empty exit policy rule")]
    EmptyRule,

    /// The rule keyword is neither `accept` nor `reject`.
    #[error("unknown exit policy action: {0}")]
    UnknownAction(String),

    /// The rule has an action but no `addr:ports` target.
    #[error("exit policy rule `{0}` has no target")]
    MissingTarget(String),

    /// The address half of the target did not parse.
    #[error("invalid address pattern: {0}")]
    InvalidAddress(String),

    /// The port half of the target did not parse.
    #[error("invalid port spec: {0}")]
    InvalidPorts(String),
}

impl PolicyError {
    /// Create an invalid address error.
    pub fn invalid_address(pattern: impl Into<String>) -> Self {
        Self::InvalidAddress(pattern.into())
    }

    /// Create an invalid ports error.
    pub fn invalid_ports(spec: impl Into<String>) -> Self {
        Self::InvalidPorts(spec.into())
    }
}

/// Invalid alliance record.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum AllianceError {
    /// Trust must lie in `[0, 1]`.
    #[error("alliance trust must be within [0, 1], got {0}")]
    TrustOutOfRange(f64),
}

/// Malformed geolocation prefix-table entry.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GeoError {
    /// The network prefix did not parse.
    #[error("invalid network prefix: {0}")]
    InvalidPrefix(String),

    /// The country code is empty.
    #[error("empty country code for prefix {0}")]
    EmptyCountry(String),
}
