//! Error taxonomy shared by the trip engine.
//!
//! DESIGN
//! ======
//! Each concern owns its error enum (`ValidationError` here, `RouteError` in
//! `route::types`, `LocationError` in `location`, `ConfigError` in `config`).
//! `TripError` wraps them for the diagnostics sink. Every error carries a
//! grepable code and a retryable flag through [`ErrorCode`]. None of them are
//! fatal: the screen keeps running after reporting.

#[cfg(test)]
#[path = "error_test.rs"]
mod error_test;

use crate::config::ConfigError;
use crate::location::LocationError;
use crate::route::types::RouteError;

/// Grepable code and retry hint for an error.
pub trait ErrorCode: std::fmt::Display {
    fn error_code(&self) -> &'static str;

    fn retryable(&self) -> bool {
        false
    }
}

// =============================================================================
// VALIDATION
// =============================================================================

/// A user edit that would break a stop-list invariant. Rejected before any
/// mutation is applied.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ValidationError {
    /// Removal would leave fewer than the minimum number of stops.
    #[error("a trip needs at least {min} stops (has {count})")]
    BelowMinimumStops { count: usize, min: usize },

    /// The last stop has no outgoing segment to assign a mode to.
    #[error("stop {index} is the last stop and has no outgoing segment")]
    TerminalStop { index: usize },

    /// No stop exists at the given index.
    #[error("stop index {index} out of range (len {len})")]
    IndexOutOfRange { index: usize, len: usize },

    /// No stop with this id is in the trip.
    #[error("unknown stop {id}")]
    UnknownStop { id: uuid::Uuid },

    /// The stop coordinate is not a valid latitude/longitude.
    #[error("invalid coordinate: {latitude}, {longitude}")]
    InvalidCoordinate { latitude: f64, longitude: f64 },
}

impl ErrorCode for ValidationError {
    fn error_code(&self) -> &'static str {
        "E_VALIDATION"
    }
}

// =============================================================================
// AGGREGATE
// =============================================================================

/// Every error the engine reports to diagnostics.
#[derive(Debug, thiserror::Error)]
pub enum TripError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// The route request failed; the last good route stays on screen.
    #[error("route request failed: {0}")]
    Network(#[from] RouteError),

    /// A route response no longer matches the trip and was dropped.
    #[error("stale route response discarded (dispatch {seq}, latest {latest})")]
    StaleResponseDiscarded { seq: u64, latest: u64 },

    /// No usable device location; the camera simply stops following.
    #[error("location unavailable: {0}")]
    LocationUnavailable(#[from] LocationError),

    #[error(transparent)]
    Config(#[from] ConfigError),
}

impl ErrorCode for TripError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::Validation(e) => e.error_code(),
            Self::Network(e) => e.error_code(),
            Self::StaleResponseDiscarded { .. } => "E_STALE_RESPONSE",
            Self::LocationUnavailable(e) => e.error_code(),
            Self::Config(e) => e.error_code(),
        }
    }

    fn retryable(&self) -> bool {
        match self {
            Self::Network(e) => e.retryable(),
            Self::LocationUnavailable(e) => e.retryable(),
            Self::Validation(_) | Self::StaleResponseDiscarded { .. } | Self::Config(_) => false,
        }
    }
}

impl TripError {
    /// Whether the user should ever see this error.
    #[must_use]
    pub fn is_user_visible(&self) -> bool {
        !matches!(self, Self::StaleResponseDiscarded { .. })
    }
}
