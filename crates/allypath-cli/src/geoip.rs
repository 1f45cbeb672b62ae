//! Geolocation sources for the CLI
//!
//! `--geo` takes either a MaxMind DB (GeoLite2-Country or compatible,
//! recognised by the `.mmdb` extension) or a TOML prefix table.

use crate::snapshot::load_prefix_table;
use allypath_core::{CountryCode, Geolocator, PrefixGeolocator};
use anyhow::{Context, Result};
use maxminddb::geoip2;
use std::net::IpAddr;
use std::path::Path;
use tracing::{debug, trace};

/// Country lookups against a MaxMind DB held in memory.
pub struct MaxMindGeolocator {
    reader: maxminddb::Reader<Vec<u8>>,
}

impl MaxMindGeolocator {
    /// Read a database file.
    pub fn open(path: &Path) -> Result<Self> {
        let reader = maxminddb::Reader::open_readfile(path)
            .with_context(|| format!("failed to open GeoIP database {}", path.display()))?;
        debug!(
            database = %reader.metadata.database_type,
            nodes = reader.metadata.node_count,
            "opened GeoIP database"
        );
        Ok(Self { reader })
    }

    /// Use a database image already in memory.
    pub fn from_bytes(bytes: Vec<u8>) -> Result<Self> {
        let reader = maxminddb::Reader::from_source(bytes).context("invalid GeoIP database")?;
        Ok(Self { reader })
    }
}

impl Geolocator for MaxMindGeolocator {
    fn locate(&self, ip: &str) -> Option<CountryCode> {
        let address: IpAddr = ip.parse().ok()?;
        match self.reader.lookup::<geoip2::Country>(address) {
            Ok(record) => record
                .country
                .and_then(|country| country.iso_code)
                .map(CountryCode::new),
            Err(error) => {
                trace!(ip, %error, "address not in GeoIP database");
                None
            }
        }
    }
}

impl std::fmt::Debug for MaxMindGeolocator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MaxMindGeolocator")
            .field("database_type", &self.reader.metadata.database_type)
            .finish_non_exhaustive()
    }
}

/// Geolocation chosen from the `--geo` file.
#[derive(Debug)]
pub enum GeoSource {
    MaxMind(MaxMindGeolocator),
    Prefix(PrefixGeolocator),
}

impl GeoSource {
    /// Open `path` as a MaxMind DB when it ends in `.mmdb`, otherwise as a
    /// prefix table.
    pub fn load(path: &Path) -> Result<Self> {
        let is_mmdb = path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("mmdb"));
        if is_mmdb {
            MaxMindGeolocator::open(path).map(Self::MaxMind)
        } else {
            load_prefix_table(path).map(Self::Prefix)
        }
    }
}

impl Geolocator for GeoSource {
    fn locate(&self, ip: &str) -> Option<CountryCode> {
        match self {
            Self::MaxMind(geo) => geo.locate(ip),
            Self::Prefix(geo) => geo.locate(ip),
        }
    }
}
