//! Shared numeric constants.

/// Fewest stops a trip may be reduced to by removal.
pub const MIN_STOPS: usize = 2;

/// Zoom level used when the camera recenters on the user.
pub const RECENTER_ZOOM: f64 = 16.0;

/// Camera pitch in degrees used when recentering on the user.
pub const RECENTER_PITCH_DEG: f64 = 45.0;

/// Duration of the recenter animation in milliseconds.
pub const RECENTER_ANIMATION_MS: u64 = 1000;

/// Upper bound on any camera animation, in milliseconds.
pub const MAX_ANIMATION_MS: u64 = 3000;

/// Minimum movement, in meters, before the camera follows the user again.
pub const RECENTER_THRESHOLD_M: f64 = 5.0;

/// Default minimum movement, in meters, between delivered location updates.
pub const GEO_MIN_DISTANCE_M: f64 = 10.0;

/// Default time without a fix before the tracker reports a timeout.
pub const GEO_TIMEOUT_MS: u64 = 20_000;

/// Default maximum age of a fix before it is ignored.
pub const GEO_MAX_AGE_MS: u64 = 10_000;

/// Slack applied to distance comparisons to absorb floating-point error.
pub const DISTANCE_EPSILON_M: f64 = 1e-6;

/// Marker key for the live user location.
pub const USER_MARKER_KEY: &str = "user";
