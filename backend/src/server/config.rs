//! Server settings loaded via OrthoConfig.
//!
//! Values come from CLI flags, `EXPLORER_*` environment variables, and an
//! optional configuration file, in OrthoConfig's usual precedence.

use std::net::SocketAddr;
use std::time::Duration;

use ortho_config::OrthoConfig;
use serde::Deserialize;

use explorer::domain::{DEFAULT_MAX_GPS_DISCOVERY_RADIUS_METERS, DiscoverySettings};
use explorer::outbound::persistence::PoolConfig;

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";
const DEFAULT_POOL_MAX_SIZE: u32 = 10;
const DEFAULT_POOL_MIN_IDLE: u32 = 2;
const DEFAULT_POOL_CONNECTION_TIMEOUT_SECS: u64 = 30;

/// Configuration for the explorer HTTP server.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "EXPLORER")]
pub struct ServerSettings {
    /// Socket address to listen on.
    pub bind_addr: Option<String>,
    /// PostgreSQL URL; the in-memory store is used when absent.
    pub database_url: Option<String>,
    pub pool_max_size: Option<u32>,
    pub pool_min_idle: Option<u32>,
    pub pool_connection_timeout_secs: Option<u64>,
    /// Load the Trondheim and Cologne catalogue into the in-memory store.
    #[ortho_config(default = false)]
    pub seed_example_data: bool,
    /// Upper bound on the prefilter radius used by GPS discovery.
    pub max_gps_discovery_radius_meters: Option<f64>,
}

/// Rejected configuration values.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SettingsError {
    #[error("bind address {value:?} is not a socket address")]
    BindAddr { value: String },
    #[error("max GPS discovery radius must be positive, got {value}")]
    GpsRadius { value: f64 },
}

impl ServerSettings {
    /// Parsed listen address, falling back to `0.0.0.0:8080`.
    pub fn bind_addr(&self) -> Result<SocketAddr, SettingsError> {
        let raw = self.bind_addr.as_deref().unwrap_or(DEFAULT_BIND_ADDR);
        raw.parse().map_err(|_| SettingsError::BindAddr {
            value: raw.to_owned(),
        })
    }

    /// Pool settings for the configured database, if any.
    pub fn pool_config(&self) -> Option<PoolConfig> {
        let url = self.database_url.as_deref().filter(|url| !url.is_empty())?;
        Some(
            PoolConfig::new(url)
                .with_max_size(self.pool_max_size.unwrap_or(DEFAULT_POOL_MAX_SIZE))
                .with_min_idle(Some(self.pool_min_idle.unwrap_or(DEFAULT_POOL_MIN_IDLE)))
                .with_connection_timeout(Duration::from_secs(
                    self.pool_connection_timeout_secs
                        .unwrap_or(DEFAULT_POOL_CONNECTION_TIMEOUT_SECS),
                )),
        )
    }

    /// Ledger tunables with the configured GPS radius cap.
    pub fn discovery_settings(&self) -> Result<DiscoverySettings, SettingsError> {
        let cap = self
            .max_gps_discovery_radius_meters
            .unwrap_or(DEFAULT_MAX_GPS_DISCOVERY_RADIUS_METERS);
        if !(cap.is_finite() && cap > 0.0) {
            return Err(SettingsError::GpsRadius { value: cap });
        }
        Ok(DiscoverySettings {
            max_gps_radius_meters: cap,
            ..DiscoverySettings::default()
        })
    }
}
