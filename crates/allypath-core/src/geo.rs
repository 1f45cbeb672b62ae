//! Geolocation capability
//!
//! Scoring only needs `ip -> optional jurisdiction`. How that answer is
//! produced (database, prefix table, fixture map) stays behind [`Geolocator`].

use crate::alliance::CountryCode;
use crate::error::GeoError;
use crate::net::IpPrefix;
use std::net::IpAddr;

/// Resolves an IP address to the jurisdiction it operates in.
///
/// Implementations must be fast and non-blocking. `None` means unresolved,
/// which scoring treats as a jurisdiction with no allies and zero trust.
pub trait Geolocator {
    /// Jurisdiction of `ip`, if known.
    fn locate(&self, ip: &str) -> Option<CountryCode>;
}

/// Blanket implementation for closures.
impl<F> Geolocator for F
where
    F: Fn(&str) -> Option<CountryCode>,
{
    fn locate(&self, ip: &str) -> Option<CountryCode> {
        (self)(ip)
    }
}

/// Longest-prefix-match table of networks to jurisdictions.
#[derive(Debug, Clone, Default)]
pub struct PrefixGeolocator {
    entries: Vec<(IpPrefix, CountryCode)>,
}

impl PrefixGeolocator {
    /// An empty table; every lookup is unresolved.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add one entry. A later entry for an identical prefix replaces the
    /// earlier one.
    pub fn insert(&mut self, prefix: IpPrefix, country: CountryCode) {
        match self.entries.iter_mut().find(|(p, _)| *p == prefix) {
            Some(entry) => entry.1 = country,
            None => self.entries.push((prefix, country)),
        }
    }

    /// Parse and add one `network`/`country` pair.
    pub fn insert_str(&mut self, network: &str, country: &str) -> Result<(), GeoError> {
        let prefix: IpPrefix = network
            .trim()
            .parse()
            .map_err(|_| GeoError::InvalidPrefix(network.to_string()))?;
        let country = country.trim();
        if country.is_empty() {
            return Err(GeoError::EmptyCountry(network.to_string()));
        }
        self.insert(prefix, CountryCode::new(country));
        Ok(())
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the table has no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Most specific entry covering `addr`.
    pub fn lookup(&self, addr: &IpAddr) -> Option<&CountryCode> {
        self.entries
            .iter()
            .filter(|(prefix, _)| prefix.contains(addr))
            .max_by_key(|(prefix, _)| prefix.len())
            .map(|(_, country)| country)
    }
}

impl Geolocator for PrefixGeolocator {
    fn locate(&self, ip: &str) -> Option<CountryCode> {
        let addr: IpAddr = ip.trim().parse().ok()?;
        self.lookup(&addr).cloned()
    }
}
