//! Allypath Core - Trust-Aware Path Selection
//!
//! Chooses a guard, middle and exit relay from a consensus snapshot while
//! steering away from jurisdictions likely to collude against the client.
//!
//! # Architecture
//!
//! Data flows one way through four layers:
//!
//! - [`TrustModel`]: per-jurisdiction trust and allied sets from the alliance list
//! - [`SecurityScorer`]: guard scores and (guard, exit) pair scores
//! - [`RelayRanker`]: safe/acceptable tiers, bandwidth-weighted within a tier
//! - [`PathSelector`]: greedy backtracking over ranked guards and exits
//!
//! Geolocation ([`Geolocator`]) and randomness ([`RandomSource`]) are
//! capabilities supplied by the caller. Nothing here performs I/O.
//!
//! # Example
//!
//! ```ignore
//! use allypath_core::{AlphaParams, PathSelector, PrefixGeolocator};
//! use rand_chacha::{rand_core::SeedableRng, ChaCha20Rng};
//!
//! let mut selector = PathSelector::new(alliances, relays, geo, ChaCha20Rng::seed_from_u64(7));
//! let path = selector.select_path(
//!     client_ip,
//!     destination_ip,
//!     &AlphaParams::guard_default(),
//!     &AlphaParams::exit_default(),
//! )?;
//! println!("{} -> {} -> {}", path.guard, path.middle, path.exit);
//! ```

pub mod alliance;
pub mod error;
pub mod geo;
pub mod net;
pub mod params;
pub mod policy;
pub mod random;
pub mod ranking;
pub mod relay;
pub mod sampling;
pub mod scoring;
pub mod selector;
pub mod trust;

pub use alliance::{Alliance, CountryCode};
pub use error::{AllianceError, GeoError, PathError, PolicyError};
pub use geo::{Geolocator, PrefixGeolocator};
pub use net::IpPrefix;
pub use params::AlphaParams;
pub use policy::{AddressPattern, ExitAction, ExitPolicy, ExitRule, PortRange};
pub use random::RandomSource;
pub use ranking::{RelayRanker, Tier, Tiers};
pub use relay::{Bandwidth, Fingerprint, Relay};
pub use sampling::{bandwidth_weighted_shuffle, pick_weighted_random};
pub use scoring::{
    ScoreMap, SecurityScorer, GUARD_ALLIANCE_MISMATCH_PENALTY, NO_SHARED_ADVERSARY_SCORE,
};
pub use selector::{PathSelector, SelectedPath};
pub use trust::TrustModel;
