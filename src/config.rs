//! Trip configuration parsed from environment variables.
//!
//! All settings have defaults except the route token, which is only read when
//! `ROUTE_API_TOKEN_ENV` names the variable that holds it.

#[cfg(test)]
#[path = "config_test.rs"]
mod config_test;

use std::time::Duration;

use crate::camera::CameraSettings;
use crate::consts::{
    GEO_MAX_AGE_MS, GEO_MIN_DISTANCE_M, GEO_TIMEOUT_MS, RECENTER_ANIMATION_MS, RECENTER_PITCH_DEG,
    RECENTER_THRESHOLD_M, RECENTER_ZOOM,
};
use crate::error::ErrorCode;
use crate::location::WatchOptions;

pub const DEFAULT_ROUTE_SERVICE_URL: &str = "http://127.0.0.1:8000";
pub const DEFAULT_ROUTE_REQUEST_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_ROUTE_CONNECT_TIMEOUT_SECS: u64 = 10;

// =============================================================================
// ERROR
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    /// `ROUTE_API_TOKEN_ENV` names a variable that is not set.
    #[error("missing route API token: {var} is not set")]
    MissingToken { var: String },

    #[error("invalid value for {key}: {value}")]
    InvalidValue { key: &'static str, value: String },
}

impl ErrorCode for ConfigError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::MissingToken { .. } => "E_CONFIG_MISSING_TOKEN",
            Self::InvalidValue { .. } => "E_CONFIG_INVALID",
        }
    }
}

// =============================================================================
// TYPES
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteServiceConfig {
    /// Base URL without a trailing slash.
    pub base_url: String,
    pub token: Option<String>,
    pub request_timeout_secs: u64,
    pub connect_timeout_secs: u64,
}

impl Default for RouteServiceConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_ROUTE_SERVICE_URL.to_owned(),
            token: None,
            request_timeout_secs: DEFAULT_ROUTE_REQUEST_TIMEOUT_SECS,
            connect_timeout_secs: DEFAULT_ROUTE_CONNECT_TIMEOUT_SECS,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct TripConfig {
    pub route: RouteServiceConfig,
    pub location: WatchOptions,
    pub camera: CameraSettings,
}

impl TripConfig {
    /// Build typed config from the process environment.
    ///
    /// Optional:
    /// - `ROUTE_SERVICE_URL`: default `http://127.0.0.1:8000`
    /// - `ROUTE_API_TOKEN_ENV`: names the env var containing the bearer token
    /// - `ROUTE_REQUEST_TIMEOUT_SECS` / `ROUTE_CONNECT_TIMEOUT_SECS`: 30 / 10
    /// - `GEO_HIGH_ACCURACY`: `true` or `false`
    /// - `GEO_TIMEOUT_MS` / `GEO_MAX_AGE_MS` / `GEO_MIN_DISTANCE_M`
    /// - `CAMERA_ZOOM` / `CAMERA_PITCH` / `CAMERA_ANIMATION_MS` / `CAMERA_RECENTER_M`
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the named token variable is unset or a
    /// boolean flag does not parse.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`Self::from_env`] over an arbitrary key lookup.
    ///
    /// # Errors
    ///
    /// See [`Self::from_env`].
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let token = match lookup("ROUTE_API_TOKEN_ENV") {
            Some(var) => Some(lookup(&var).ok_or(ConfigError::MissingToken { var })?),
            None => None,
        };

        let route = RouteServiceConfig {
            base_url: lookup("ROUTE_SERVICE_URL")
                .unwrap_or_else(|| DEFAULT_ROUTE_SERVICE_URL.to_owned())
                .trim_end_matches('/')
                .to_owned(),
            token,
            request_timeout_secs: parse_or(&lookup, "ROUTE_REQUEST_TIMEOUT_SECS", DEFAULT_ROUTE_REQUEST_TIMEOUT_SECS),
            connect_timeout_secs: parse_or(&lookup, "ROUTE_CONNECT_TIMEOUT_SECS", DEFAULT_ROUTE_CONNECT_TIMEOUT_SECS),
        };

        let location = WatchOptions {
            high_accuracy: parse_bool(lookup("GEO_HIGH_ACCURACY").as_deref(), "GEO_HIGH_ACCURACY", true)?,
            timeout: Duration::from_millis(parse_or(&lookup, "GEO_TIMEOUT_MS", GEO_TIMEOUT_MS)),
            maximum_age: Duration::from_millis(parse_or(&lookup, "GEO_MAX_AGE_MS", GEO_MAX_AGE_MS)),
            min_distance_m: parse_finite_or(&lookup, "GEO_MIN_DISTANCE_M", GEO_MIN_DISTANCE_M),
        };

        let camera = CameraSettings {
            zoom: parse_finite_or(&lookup, "CAMERA_ZOOM", RECENTER_ZOOM),
            pitch: parse_finite_or(&lookup, "CAMERA_PITCH", RECENTER_PITCH_DEG),
            animation_ms: parse_or(&lookup, "CAMERA_ANIMATION_MS", RECENTER_ANIMATION_MS),
            recenter_threshold_m: parse_finite_or(&lookup, "CAMERA_RECENTER_M", RECENTER_THRESHOLD_M),
        };

        Ok(Self { route, location, camera })
    }
}

/// Parse `key` through `lookup`, falling back to `default` when it is missing
/// or does not parse.
fn parse_or<T>(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: T) -> T
where
    T: std::str::FromStr + Copy,
{
    lookup(key)
        .and_then(|v| v.trim().parse::<T>().ok())
        .unwrap_or(default)
}

/// [`parse_or`] for floats: `NaN` and infinities fall back to `default`.
fn parse_finite_or(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: f64) -> f64 {
    Some(parse_or(lookup, key, default))
        .filter(|v| v.is_finite())
        .unwrap_or(default)
}

fn parse_bool(raw: Option<&str>, key: &'static str, default: bool) -> Result<bool, ConfigError> {
    match raw.map(str::trim) {
        None => Ok(default),
        Some("true" | "1" | "yes") => Ok(true),
        Some("false" | "0" | "no") => Ok(false),
        Some(other) => Err(ConfigError::InvalidValue { key, value: other.to_owned() }),
    }
}
