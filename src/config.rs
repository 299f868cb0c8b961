//! Configuration module
//!
//! Reads a TOML file (default `~/.config/solara-pms/config.toml`, overridable
//! via `SOLARA_CONFIG`); every section falls back to sensible defaults.

use std::path::{Path, PathBuf};

use chrono::Duration;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Bind address
    pub host: String,
    /// HTTP port
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
        }
    }
}

impl ServerConfig {
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Database configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DatabaseSection {
    /// SeaORM connection URL
    pub url: String,
}

impl Default for DatabaseSection {
    fn default() -> Self {
        Self {
            url: "sqlite://./solara.db?mode=rwc".to_string(),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Default tracing filter when RUST_LOG is unset
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

/// Booking policy knobs used by pricing and the reservation lifecycle
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BookingPolicy {
    /// Tax applied to the nightly subtotal, e.g. 0.10 for 10%
    pub tax_rate: Decimal,
    /// Hours before check-in during which guest self-service
    /// edit/cancel is refused
    pub cancellation_lockout_hours: i64,
    /// ISO 4217 currency all quotes are issued in
    pub currency: String,
}

impl Default for BookingPolicy {
    fn default() -> Self {
        Self {
            tax_rate: Decimal::new(10, 2),
            cancellation_lockout_hours: 24,
            currency: "USD".to_string(),
        }
    }
}

impl BookingPolicy {
    pub fn lockout(&self) -> Duration {
        Duration::hours(self.cancellation_lockout_hours)
    }
}

/// Top-level application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub database: DatabaseSection,
    pub logging: LoggingConfig,
    pub booking: BookingPolicy,
}

impl AppConfig {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path)?;
        Ok(toml::from_str(&raw)?)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("cannot read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("cannot parse config file: {0}")]
    Parse(#[from] toml::de::Error),
}

/// `~/.config/solara-pms/config.toml` (or the platform equivalent)
pub fn default_config_path() -> PathBuf {
    dirs_next::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("solara-pms")
        .join("config.toml")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_sane() {
        let cfg = AppConfig::default();
        assert_eq!(cfg.server.port, 8080);
        assert_eq!(cfg.booking.tax_rate, Decimal::new(10, 2));
        assert_eq!(cfg.booking.cancellation_lockout_hours, 24);
        assert_eq!(cfg.booking.currency, "USD");
    }

    #[test]
    fn partial_toml_fills_in_defaults() {
        let cfg: AppConfig = toml::from_str(
            r#"
            [server]
            port = 9999

            [booking]
            cancellation_lockout_hours = 48
            "#,
        )
        .unwrap();
        assert_eq!(cfg.server.port, 9999);
        assert_eq!(cfg.server.host, "0.0.0.0");
        assert_eq!(cfg.booking.cancellation_lockout_hours, 48);
        assert_eq!(cfg.booking.tax_rate, Decimal::new(10, 2));
    }

    #[test]
    fn tax_rate_parses_from_string() {
        // rust_decimal deserializes TOML strings without float rounding.
        let cfg: AppConfig = toml::from_str(
            r#"
            [booking]
            tax_rate = "0.21"
            "#,
        )
        .unwrap();
        assert_eq!(cfg.booking.tax_rate, Decimal::new(21, 2));
    }

    #[test]
    fn server_address_joins_host_and_port() {
        let cfg = AppConfig::default();
        assert_eq!(cfg.server.address(), "0.0.0.0:8080");
    }
}
