// Configuration Management for the Chan Watch monitor
// Per-market Chanlun thresholds plus store/deduper sizing

use crate::core::types::Market;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::Path;
use thiserror::Error;
use tracing::{info, warn};

// ============================================================================
// Error Type
// ============================================================================

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Validation error: {0}")]
    Validation(String),
}

// ============================================================================
// Chanlun Parameters
// ============================================================================

/// Rule deciding when a third-buy candidate is confirmed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConfirmRule {
    /// Confirming bi must exceed the breakout bi's end price.
    NewHigh,
    /// Confirming bi must exceed the price the pullback started from.
    BreakPullbackHigh,
}

/// Thresholds for the Chanlun pipeline. ATR factors scale with the
/// average ATR over the bi span they apply to.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ChanlunParams {
    pub min_bi_kbars: usize,
    pub min_bi_move_atr: f64,
    pub breakout_atr: f64,
    pub pullback_tolerance_atr: f64,
    pub confirm_rule: ConfirmRule,
}

impl Default for ChanlunParams {
    fn default() -> Self {
        Self {
            min_bi_kbars: 5,
            min_bi_move_atr: 1.0,
            breakout_atr: 0.5,
            pullback_tolerance_atr: 0.3,
            confirm_rule: ConfirmRule::BreakPullbackHigh,
        }
    }
}

impl ChanlunParams {
    /// Looser thresholds for round-the-clock crypto markets.
    pub fn crypto() -> Self {
        Self {
            min_bi_kbars: 4,
            min_bi_move_atr: 0.8,
            breakout_atr: 0.4,
            pullback_tolerance_atr: 0.4,
            confirm_rule: ConfirmRule::BreakPullbackHigh,
        }
    }

    /// Built-in defaults for a market segment.
    pub fn for_market(market: Market) -> Self {
        match market {
            Market::Crypto => Self::crypto(),
            _ => Self::default(),
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.min_bi_kbars < 2 {
            return Err(ConfigError::Validation(format!(
                "min_bi_kbars must be at least 2, got {}",
                self.min_bi_kbars
            )));
        }

        for (name, value) in [
            ("min_bi_move_atr", self.min_bi_move_atr),
            ("breakout_atr", self.breakout_atr),
            ("pullback_tolerance_atr", self.pullback_tolerance_atr),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(ConfigError::Validation(format!(
                    "{} must be finite and non-negative, got {}",
                    name, value
                )));
            }
        }

        Ok(())
    }
}

// ============================================================================
// Monitor Configuration
// ============================================================================

/// Top-level configuration for one monitor instance. Everything is fixed at
/// initialization; per-market entries override the built-in defaults.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonitorConfig {
    pub chanlun: HashMap<Market, ChanlunParams>,
    pub dedup_window_ms: i64,
    pub store_capacity: usize,
    pub toast_capacity: usize,
    pub toast_lifetime_ms: u64,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        let mut chanlun = HashMap::new();
        for market in Market::all() {
            chanlun.insert(market, ChanlunParams::for_market(market));
        }

        Self {
            chanlun,
            dedup_window_ms: 300_000,
            store_capacity: 500,
            toast_capacity: 5,
            toast_lifetime_ms: 8_000,
        }
    }
}

impl MonitorConfig {
    /// Load configuration from a JSON file. A missing file is tolerated and
    /// falls back to the defaults.
    pub fn from_file(config_path: &str) -> Result<Self, ConfigError> {
        let path = Path::new(config_path);
        if !path.exists() {
            warn!(path = config_path, "Config file not found, using defaults");
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path)?;
        let config: MonitorConfig = serde_json::from_str(&content)?;
        config.validate()?;

        info!(path = config_path, "Configuration loaded");
        Ok(config)
    }

    /// Parameters for a market: the configured entry, or the built-in
    /// per-market defaults when none was supplied.
    pub fn chanlun_params(&self, market: Market) -> ChanlunParams {
        self.chanlun
            .get(&market)
            .copied()
            .unwrap_or_else(|| ChanlunParams::for_market(market))
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        for (market, params) in &self.chanlun {
            params.validate().map_err(|e| {
                ConfigError::Validation(format!("chanlun[{}]: {}", market, e))
            })?;
        }

        if self.dedup_window_ms < 0 {
            return Err(ConfigError::Validation(format!(
                "dedup_window_ms must be non-negative, got {}",
                self.dedup_window_ms
            )));
        }
        if self.store_capacity == 0 {
            return Err(ConfigError::Validation(
                "store_capacity must be positive".to_string(),
            ));
        }
        if self.toast_capacity == 0 {
            return Err(ConfigError::Validation(
                "toast_capacity must be positive".to_string(),
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_params() {
        let params = ChanlunParams::default();
        assert_eq!(params.min_bi_kbars, 5);
        assert_eq!(params.min_bi_move_atr, 1.0);
        assert_eq!(params.breakout_atr, 0.5);
        assert_eq!(params.pullback_tolerance_atr, 0.3);
        assert_eq!(params.confirm_rule, ConfirmRule::BreakPullbackHigh);
        assert!(params.validate().is_ok());
    }

    #[test]
    fn test_crypto_override() {
        let params = ChanlunParams::for_market(Market::Crypto);
        assert_eq!(params.min_bi_kbars, 4);
        assert_eq!(params.min_bi_move_atr, 0.8);
        assert_eq!(params.breakout_atr, 0.4);
        assert_eq!(params.pullback_tolerance_atr, 0.4);

        let params = ChanlunParams::for_market(Market::Us);
        assert_eq!(params.min_bi_kbars, 5);
    }

    #[test]
    fn test_params_validation() {
        let mut params = ChanlunParams::default();
        params.min_bi_kbars = 1;
        assert!(params.validate().is_err());

        let mut params = ChanlunParams::default();
        params.breakout_atr = f64::NAN;
        assert!(params.validate().is_err());

        let mut params = ChanlunParams::default();
        params.min_bi_move_atr = -0.5;
        assert!(params.validate().is_err());
    }

    #[test]
    fn test_monitor_config_defaults() {
        let config = MonitorConfig::default();
        assert_eq!(config.dedup_window_ms, 300_000);
        assert_eq!(config.store_capacity, 500);
        assert_eq!(config.toast_capacity, 5);
        assert_eq!(config.toast_lifetime_ms, 8_000);
        assert!(config.validate().is_ok());

        // The per-market table carries the crypto override.
        assert_eq!(config.chanlun_params(Market::Crypto).min_bi_kbars, 4);
        assert_eq!(config.chanlun_params(Market::Fx).min_bi_kbars, 5);
    }

    #[test]
    fn test_monitor_config_rejects_bad_table() {
        let mut config = MonitorConfig::default();
        config
            .chanlun
            .insert(Market::Us, ChanlunParams { min_bi_kbars: 0, ..ChanlunParams::default() });
        assert!(config.validate().is_err());

        let mut config = MonitorConfig::default();
        config.store_capacity = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_config_json_round_trip() {
        let config = MonitorConfig::default();
        let json = serde_json::to_string(&config).unwrap();
        let back: MonitorConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(back.store_capacity, config.store_capacity);
        assert_eq!(
            back.chanlun_params(Market::Crypto),
            config.chanlun_params(Market::Crypto)
        );
    }

    #[test]
    fn test_missing_file_falls_back() {
        let config = MonitorConfig::from_file("does/not/exist.json").unwrap();
        assert_eq!(config.store_capacity, 500);
    }
}
