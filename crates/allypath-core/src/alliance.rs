//! Jurisdictions and alliances

use crate::error::AllianceError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

/// Jurisdiction code as produced by the geolocation capability, e.g. `"DE"`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CountryCode(String);

impl CountryCode {
    /// Wrap a code as-is. Codes are compared verbatim.
    pub fn new(code: impl Into<String>) -> Self {
        Self(code.into())
    }

    /// Borrow the code.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CountryCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for CountryCode {
    fn from(code: &str) -> Self {
        Self::new(code)
    }
}

impl From<String> for CountryCode {
    fn from(code: String) -> Self {
        Self(code)
    }
}

/// A group of jurisdictions assumed to cooperate against the user, with the
/// strength of that assumption.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Alliance {
    countries: BTreeSet<CountryCode>,
    trust: f64,
}

impl Alliance {
    /// Build an alliance. `trust` must lie in `[0, 1]`.
    pub fn new<I, C>(countries: I, trust: f64) -> Result<Self, AllianceError>
    where
        I: IntoIterator<Item = C>,
        C: Into<CountryCode>,
    {
        if !(0.0..=1.0).contains(&trust) {
            return Err(AllianceError::TrustOutOfRange(trust));
        }
        Ok(Self {
            countries: countries.into_iter().map(Into::into).collect(),
            trust,
        })
    }

    /// Member jurisdictions.
    pub fn countries(&self) -> &BTreeSet<CountryCode> {
        &self.countries
    }

    /// Collusion trust in `[0, 1]`.
    pub fn trust(&self) -> f64 {
        self.trust
    }

    /// Whether `code` is a member.
    pub fn contains(&self, code: &CountryCode) -> bool {
        self.countries.contains(code)
    }
}
