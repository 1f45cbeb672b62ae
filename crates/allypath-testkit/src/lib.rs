//! Allypath Testing Infrastructure
//!
//! Shared fixtures for path-selection tests: relay builders, a fixed
//! geolocation map, the reference alliance set, deterministic randomness,
//! a tiny MaxMind DB image and proptest strategies.
//!
//! # Usage
//!
//! ```toml
//! [dev-dependencies]
//! allypath-testkit = { path = "../allypath-testkit" }
//! ```
//!
//! ```rust,no_run
//! use allypath_testkit::*;
//!
//! let relays = vec![test_relay("G1", "5.199.134.200", 3000)];
//! let geo = reference_geolocator();
//! let rng = seeded_rng(42);
//! ```

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]

pub mod fixtures;
pub mod mmdb;
pub mod random;
pub mod strategies;

pub use fixtures::*;
pub use mmdb::single_country_mmdb;
pub use random::*;
