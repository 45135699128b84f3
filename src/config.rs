//! Service configuration.
//!
//! Values are layered: built-in defaults, then an optional TOML file, then
//! command-line flags / environment variables. The result is resolved once
//! at startup and never changes afterwards.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;
use thiserror::Error;

use crate::auth::AuthPolicy;
use crate::geofence::{GeofenceConfig, GeofenceError};
use crate::models::GeoPoint;

pub const DEFAULT_CENTER_LAT: f64 = 28.453489;
pub const DEFAULT_CENTER_LNG: f64 = 77.495797;
pub const DEFAULT_RADIUS_M: f64 = 150.0;
pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 8080;
pub const DEFAULT_STATIC_DIR: &str = "static";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error(transparent)]
    Geofence(#[from] GeofenceError),
}

/// Optional TOML configuration file
#[derive(Debug, Default, Deserialize, Clone)]
#[serde(deny_unknown_fields)]
pub struct FileConfig {
    #[serde(default)]
    pub geofence: GeofenceSection,
    #[serde(default)]
    pub server: ServerSection,
    #[serde(default)]
    pub auth: AuthSection,
}

#[derive(Debug, Default, Deserialize, Clone)]
#[serde(deny_unknown_fields)]
pub struct GeofenceSection {
    pub center_lat: Option<f64>,
    pub center_lng: Option<f64>,
    pub radius_m: Option<f64>,
}

#[derive(Debug, Default, Deserialize, Clone)]
#[serde(deny_unknown_fields)]
pub struct ServerSection {
    pub host: Option<String>,
    pub port: Option<u16>,
    pub static_dir: Option<PathBuf>,
}

#[derive(Debug, Default, Deserialize, Clone)]
#[serde(deny_unknown_fields)]
pub struct AuthSection {
    pub secret_token: Option<String>,
}

impl FileConfig {
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path).context("Failed to read config file")?;
        let config: FileConfig = toml::from_str(&content).context("Failed to parse config file")?;
        Ok(config)
    }
}

/// Values taken from flags or the environment; these win over the file
#[derive(Debug, Default, Clone)]
pub struct Overrides {
    pub center_lat: Option<f64>,
    pub center_lng: Option<f64>,
    pub radius_m: Option<f64>,
    pub secret_token: Option<String>,
    pub host: Option<String>,
    pub port: Option<u16>,
    pub static_dir: Option<PathBuf>,
}

/// Fully resolved, immutable service configuration
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    pub geofence: GeofenceConfig,
    pub auth: AuthPolicy,
    pub host: String,
    pub port: u16,
    pub static_dir: PathBuf,
}

impl ServiceConfig {
    pub fn resolve(file: FileConfig, overrides: Overrides) -> Result<Self, ConfigError> {
        let center = GeoPoint::new(
            overrides
                .center_lat
                .or(file.geofence.center_lat)
                .unwrap_or(DEFAULT_CENTER_LAT),
            overrides
                .center_lng
                .or(file.geofence.center_lng)
                .unwrap_or(DEFAULT_CENTER_LNG),
        );
        let radius_m = overrides
            .radius_m
            .or(file.geofence.radius_m)
            .unwrap_or(DEFAULT_RADIUS_M);

        let geofence = GeofenceConfig::new(center, radius_m)?;
        let auth = AuthPolicy::from_token(overrides.secret_token.or(file.auth.secret_token));

        Ok(Self {
            geofence,
            auth,
            host: overrides
                .host
                .or(file.server.host)
                .unwrap_or_else(|| DEFAULT_HOST.to_string()),
            port: overrides.port.or(file.server.port).unwrap_or(DEFAULT_PORT),
            static_dir: overrides
                .static_dir
                .or(file.server.static_dir)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_STATIC_DIR)),
        })
    }

    /// Address string for `TcpListener::bind`
    pub fn listen_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
