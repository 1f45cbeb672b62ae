//! Tiering configuration file
//!
//! ```toml
//! [guard]
//! safe_upper = 0.95
//! safe_lower = 2.0
//! accept_upper = 0.5
//! accept_lower = 5.0
//! bandwidth_frac = 0.2
//!
//! [exit]
//! safe_upper = 0.95
//! safe_lower = 2.0
//! accept_upper = 0.1
//! accept_lower = 10.0
//! bandwidth_frac = 0.2
//! ```

use allypath_core::AlphaParams;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Guard and exit thresholds.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SelectionConfig {
    /// Guard ranking thresholds
    #[serde(default = "AlphaParams::guard_default")]
    pub guard: AlphaParams,
    /// Exit ranking thresholds
    #[serde(default = "AlphaParams::exit_default")]
    pub exit: AlphaParams,
}

impl Default for SelectionConfig {
    fn default() -> Self {
        Self {
            guard: AlphaParams::guard_default(),
            exit: AlphaParams::exit_default(),
        }
    }
}

impl SelectionConfig {
    /// Parse from TOML text. Missing tables take their defaults.
    pub fn from_toml(source: &str) -> Result<Self> {
        toml::from_str(source).context("invalid selection parameters")
    }

    /// Read a TOML file.
    pub fn load(path: &Path) -> Result<Self> {
        let source = fs::read_to_string(path)
            .with_context(|| format!("failed to read parameters {}", path.display()))?;
        Self::from_toml(&source).with_context(|| format!("in {}", path.display()))
    }

    /// Values outside their conventional ranges. Never fatal.
    pub fn check(&self) -> Vec<String> {
        let mut warnings = Vec::new();
        for (role, params) in [("guard", &self.guard), ("exit", &self.exit)] {
            for (name, value) in [
                ("safe_upper", params.safe_upper),
                ("accept_upper", params.accept_upper),
                ("bandwidth_frac", params.bandwidth_frac),
            ] {
                if !(0.0..=1.0).contains(&value) {
                    warnings.push(format!("{role}.{name} = {value} is outside [0, 1]"));
                }
            }
            for (name, value) in [
                ("safe_lower", params.safe_lower),
                ("accept_lower", params.accept_lower),
            ] {
                if value < 0.0 || value.is_nan() {
                    warnings.push(format!("{role}.{name} = {value} is negative"));
                }
            }
        }
        warnings
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_tables_use_defaults() {
        let config = SelectionConfig::from_toml("").unwrap();
        assert_eq!(config, SelectionConfig::default());

        let config = SelectionConfig::from_toml(
            "[guard]\nsafe_upper = 0.9\nsafe_lower = 3.0\naccept_upper = 0.4\naccept_lower = 6.0\nbandwidth_frac = 0.3\n",
        )
        .unwrap();
        assert_eq!(config.guard, AlphaParams::new(0.9, 3.0, 0.4, 6.0, 0.3));
        assert_eq!(config.exit, AlphaParams::exit_default());
    }

    #[test]
    fn test_incomplete_table_is_an_error() {
        assert!(SelectionConfig::from_toml("[exit]\nsafe_upper = 0.9\n").is_err());
    }

    #[test]
    fn test_check_reports_out_of_range_values() {
        let mut config = SelectionConfig::default();
        assert!(config.check().is_empty());

        config.guard.safe_upper = 1.5;
        config.exit.accept_lower = -1.0;
        let warnings = config.check();
        assert_eq!(warnings.len(), 2);
        assert!(warnings[0].starts_with("guard.safe_upper"));
        assert!(warnings[1].starts_with("exit.accept_lower"));
    }
}
