//! Tiering thresholds

use serde::{Deserialize, Serialize};

/// Thresholds splitting scored relays into safe and acceptable tiers.
///
/// One instance governs guard ranking and another exit ranking. Values are
/// conventionally in `[0, 1]` for the upper factors but nothing here checks
/// that; the lower factors are usually greater than one.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AlphaParams {
    /// Safe tier: score must reach `max_score * safe_upper`.
    pub safe_upper: f64,
    /// Safe tier: `1 - score` may not exceed `(1 - max_score) * safe_lower`.
    pub safe_lower: f64,
    /// Acceptable tier: score must reach `max_score * accept_upper`.
    pub accept_upper: f64,
    /// Acceptable tier: `1 - score` may not exceed `(1 - max_score) * accept_lower`.
    pub accept_lower: f64,
    /// Bandwidth fraction the safe tier should carry. Carried for
    /// configuration compatibility; ranking does not read it.
    pub bandwidth_frac: f64,
}

impl AlphaParams {
    /// Build from the five thresholds in declaration order.
    pub const fn new(
        safe_upper: f64,
        safe_lower: f64,
        accept_upper: f64,
        accept_lower: f64,
        bandwidth_frac: f64,
    ) -> Self {
        Self {
            safe_upper,
            safe_lower,
            accept_upper,
            accept_lower,
            bandwidth_frac,
        }
    }

    /// Every factor set to `value`.
    pub const fn uniform(value: f64) -> Self {
        Self::new(value, value, value, value, value)
    }

    /// Default guard thresholds.
    pub const fn guard_default() -> Self {
        Self::new(0.95, 2.0, 0.5, 5.0, 0.2)
    }

    /// Default exit thresholds.
    pub const fn exit_default() -> Self {
        Self::new(0.95, 2.0, 0.1, 10.0, 0.2)
    }
}
