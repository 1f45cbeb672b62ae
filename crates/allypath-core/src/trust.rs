//! Jurisdiction trust derived from the alliance list.
//!
//! Nothing is cached: both queries scan the alliance list, which stays
//! immutable for the lifetime of a selection.

use crate::alliance::{Alliance, CountryCode};
use std::collections::BTreeSet;

/// Read-only view over the alliance list.
#[derive(Debug, Clone, Default)]
pub struct TrustModel {
    alliances: Vec<Alliance>,
}

impl TrustModel {
    /// Take ownership of the alliance list.
    pub fn new(alliances: Vec<Alliance>) -> Self {
        Self { alliances }
    }

    /// Highest trust of any alliance containing `code`, or `0.0`.
    ///
    /// Max, not sum: the most suspicious alliance dominates.
    pub fn country_trust(&self, code: &CountryCode) -> f64 {
        self.alliances
            .iter()
            .filter(|alliance| alliance.contains(code))
            .map(Alliance::trust)
            .fold(0.0, f64::max)
    }

    /// Union of every alliance containing `code`, including `code` itself.
    pub fn allied_countries(&self, code: &CountryCode) -> BTreeSet<CountryCode> {
        self.alliances
            .iter()
            .filter(|alliance| alliance.contains(code))
            .flat_map(|alliance| alliance.countries().iter().cloned())
            .collect()
    }

    /// [`Self::country_trust`] for a possibly unresolved jurisdiction.
    pub fn trust_of(&self, code: Option<&CountryCode>) -> f64 {
        code.map_or(0.0, |code| self.country_trust(code))
    }

    /// [`Self::allied_countries`] for a possibly unresolved jurisdiction.
    pub fn allies_of(&self, code: Option<&CountryCode>) -> BTreeSet<CountryCode> {
        code.map(|code| self.allied_countries(code)).unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn model() -> TrustModel {
        TrustModel::new(vec![
            Alliance::new(["PT", "BR", "AO", "MZ", "ST"], 0.25).unwrap(),
            Alliance::new(["US", "RU"], 0.01).unwrap(),
            Alliance::new(["PT", "CN"], 0.4).unwrap(),
            Alliance::new(["IR", "DE"], 0.8).unwrap(),
        ])
    }

    fn code(s: &str) -> CountryCode {
        CountryCode::new(s)
    }

    #[test]
    fn test_country_trust_takes_max() {
        let model = model();
        assert_eq!(model.country_trust(&code("PT")), 0.4);
        assert_eq!(model.country_trust(&code("BR")), 0.25);
        assert_eq!(model.country_trust(&code("DE")), 0.8);
    }

    #[test]
    fn test_country_trust_unknown_is_zero() {
        let model = model();
        assert_eq!(model.country_trust(&code("FR")), 0.0);
        assert_eq!(model.trust_of(None), 0.0);
    }

    #[test]
    fn test_allied_countries_union_includes_self() {
        let allies = model().allied_countries(&code("PT"));
        let expected: BTreeSet<CountryCode> = ["PT", "BR", "AO", "MZ", "ST", "CN"]
            .into_iter()
            .map(CountryCode::new)
            .collect();
        assert_eq!(allies, expected);
    }

    #[test]
    fn test_allied_countries_unaligned_is_empty() {
        let model = model();
        assert!(model.allied_countries(&code("FR")).is_empty());
        assert!(model.allies_of(None).is_empty());
    }
}
