//! Allypath CLI Library
//!
//! Input loading and report formatting behind the `allypath` binary:
//! - consensus and client-request JSON ([`snapshot`])
//! - geolocation from a MaxMind DB or a TOML prefix table ([`geoip`])
//! - TOML tiering parameters ([`config`])
//! - JSON reports for stdout ([`output`])

#![allow(missing_docs)]

pub mod config;
pub mod geoip;
pub mod output;
pub mod snapshot;

pub use config::SelectionConfig;
pub use geoip::{GeoSource, MaxMindGeolocator};
pub use output::{guard_reports, GuardReport, PathReport};
pub use snapshot::{
    load_consensus, load_prefix_table, load_request, parse_consensus, parse_prefix_table,
    ClientRequest,
};
