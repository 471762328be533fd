//! Device location subscription.
//!
//! DESIGN
//! ======
//! The platform side is a [`LocationSource`]: `watch` starts delivering
//! [`LocationEvent`]s and `clear_watch` stops them. [`GeolocationTracker`] owns
//! exactly one watch for its whole lifetime and clears it on drop, so tearing
//! down the screen can never leave a subscription behind.
//!
//! Between the raw stream and the caller sit two gates:
//!
//! - a freshness and distance throttle: a fix older than `maximum_age`, or
//!   closer than `min_distance_m` to the last delivered fix, is dropped,
//! - a silence timeout: no fix at all within `timeout` is reported as
//!   [`LocationError::Timeout`] and the timer restarts.
//!
//! `high_accuracy` is passed through to the platform untouched.

#[cfg(test)]
#[path = "location_test.rs"]
mod location_test;

use std::sync::Arc;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use futures::StreamExt;
use futures::stream::BoxStream;
use tokio::sync::watch;
use tokio::time::Instant;
use tracing::{debug, info};

use crate::consts::{DISTANCE_EPSILON_M, GEO_MAX_AGE_MS, GEO_MIN_DISTANCE_M, GEO_TIMEOUT_MS};
use crate::error::ErrorCode;
use crate::position::LatLng;

// =============================================================================
// TYPES
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LocationError {
    #[error("location permission denied")]
    PermissionDenied,

    #[error("position unavailable: {0}")]
    Unavailable(String),

    #[error("no position within the configured timeout")]
    Timeout,
}

impl ErrorCode for LocationError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::PermissionDenied => "E_LOCATION_DENIED",
            Self::Unavailable(_) => "E_LOCATION_UNAVAILABLE",
            Self::Timeout => "E_LOCATION_TIMEOUT",
        }
    }

    fn retryable(&self) -> bool {
        matches!(self, Self::Unavailable(_) | Self::Timeout)
    }
}

/// Options handed to the platform when a watch starts.
#[derive(Debug, Clone, PartialEq)]
pub struct WatchOptions {
    pub high_accuracy: bool,
    /// Silence longer than this is reported as a timeout. Zero disables it.
    pub timeout: Duration,
    /// Fixes older than this are dropped. Zero disables the check.
    pub maximum_age: Duration,
    pub min_distance_m: f64,
}

impl Default for WatchOptions {
    fn default() -> Self {
        Self {
            high_accuracy: true,
            timeout: Duration::from_millis(GEO_TIMEOUT_MS),
            maximum_age: Duration::from_millis(GEO_MAX_AGE_MS),
            min_distance_m: GEO_MIN_DISTANCE_M,
        }
    }
}

/// A location fix as delivered to the rest of the engine.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct UserLocation {
    pub latitude: f64,
    pub longitude: f64,
    pub accuracy_m: Option<f64>,
    /// Platform timestamp, milliseconds since the Unix epoch.
    pub timestamp_ms: u64,
}

impl UserLocation {
    #[must_use]
    pub fn position(&self) -> LatLng {
        LatLng::new(self.latitude, self.longitude)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum LocationEvent {
    Fix(UserLocation),
    Error(LocationError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct WatchId(pub u64);

/// An active platform watch.
pub struct WatchHandle {
    pub id: WatchId,
    pub events: BoxStream<'static, LocationEvent>,
}

/// Platform geolocation.
pub trait LocationSource: Send + Sync {
    /// Start a watch.
    ///
    /// # Errors
    ///
    /// Returns [`LocationError::PermissionDenied`] or
    /// [`LocationError::Unavailable`] when no watch can be started.
    fn watch(&self, options: &WatchOptions) -> Result<WatchHandle, LocationError>;

    /// Stop a watch. Clearing an unknown id is a no-op.
    fn clear_watch(&self, id: WatchId);
}

// =============================================================================
// THROTTLE
// =============================================================================

/// Wall clock in milliseconds since the Unix epoch.
pub type Clock = fn() -> u64;

fn system_clock() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(0, |d| u64::try_from(d.as_millis()).unwrap_or(u64::MAX))
}

/// Drops stale fixes and fixes that have not moved far enough from the last
/// delivered one.
#[derive(Debug, Clone)]
pub struct FixThrottle {
    min_distance_m: f64,
    maximum_age_ms: u64,
    last: Option<UserLocation>,
}

impl FixThrottle {
    #[must_use]
    pub fn new(min_distance_m: f64, maximum_age: Duration) -> Self {
        Self {
            min_distance_m: min_distance_m.max(0.0),
            maximum_age_ms: u64::try_from(maximum_age.as_millis()).unwrap_or(u64::MAX),
            last: None,
        }
    }

    /// Whether `fix` should be delivered at wall-clock time `now_ms`. Accepted
    /// fixes become the new reference point.
    pub fn accept(&mut self, fix: &UserLocation, now_ms: u64) -> bool {
        if !fix.position().is_valid() {
            debug!(lat = fix.latitude, lon = fix.longitude, "dropping fix with invalid coordinates");
            return false;
        }
        let age_ms = now_ms.saturating_sub(fix.timestamp_ms);
        if self.maximum_age_ms > 0 && age_ms > self.maximum_age_ms {
            debug!(age_ms, max_age_ms = self.maximum_age_ms, "dropping stale fix");
            return false;
        }
        if let Some(last) = &self.last {
            if fix.timestamp_ms < last.timestamp_ms {
                debug!(ts = fix.timestamp_ms, last_ts = last.timestamp_ms, "dropping out-of-order fix");
                return false;
            }
            let moved = last.position().distance_m(fix.position());
            if moved + DISTANCE_EPSILON_M < self.min_distance_m {
                debug!(moved_m = moved, min_m = self.min_distance_m, "fix below distance threshold");
                return false;
            }
        }
        self.last = Some(*fix);
        true
    }

    #[must_use]
    pub fn last(&self) -> Option<&UserLocation> {
        self.last.as_ref()
    }
}

// =============================================================================
// TRACKER
// =============================================================================

/// Owns one platform watch and yields throttled fixes.
pub struct GeolocationTracker {
    source: Arc<dyn LocationSource>,
    watch_id: WatchId,
    events: BoxStream<'static, LocationEvent>,
    throttle: FixThrottle,
    timeout: Duration,
    deadline: Option<Instant>,
    latest: watch::Sender<Option<UserLocation>>,
    clock: Clock,
    finished: bool,
}

impl GeolocationTracker {
    /// Start watching `source`.
    ///
    /// # Errors
    ///
    /// Propagates the source's error when the watch cannot start.
    pub fn start(source: Arc<dyn LocationSource>, options: &WatchOptions) -> Result<Self, LocationError> {
        Self::start_with_clock(source, options, system_clock)
    }

    /// [`Self::start`] with an explicit clock for fix freshness.
    ///
    /// # Errors
    ///
    /// Propagates the source's error when the watch cannot start.
    pub fn start_with_clock(
        source: Arc<dyn LocationSource>,
        options: &WatchOptions,
        clock: Clock,
    ) -> Result<Self, LocationError> {
        let handle = source.watch(options)?;
        info!(
            watch_id = handle.id.0,
            high_accuracy = options.high_accuracy,
            min_distance_m = options.min_distance_m,
            "location watch started"
        );
        let (latest, _) = watch::channel(None);
        let mut tracker = Self {
            source,
            watch_id: handle.id,
            events: handle.events,
            throttle: FixThrottle::new(options.min_distance_m, options.maximum_age),
            timeout: options.timeout,
            deadline: None,
            latest,
            clock,
            finished: false,
        };
        tracker.reset_deadline();
        Ok(tracker)
    }

    /// Next delivered fix, or an error event. Returns `None` once the platform
    /// stream has ended; after that the tracker stays quiet.
    pub async fn next(&mut self) -> Option<Result<UserLocation, LocationError>> {
        loop {
            if self.finished {
                return None;
            }

            let event = match self.deadline {
                Some(deadline) => match tokio::time::timeout_at(deadline, self.events.next()).await {
                    Ok(event) => event,
                    Err(_) => {
                        self.reset_deadline();
                        debug!(watch_id = self.watch_id.0, "no fix within timeout");
                        return Some(Err(LocationError::Timeout));
                    }
                },
                None => self.events.next().await,
            };

            match event {
                None => {
                    self.finished = true;
                    info!(watch_id = self.watch_id.0, "location stream ended");
                    return None;
                }
                Some(LocationEvent::Error(e)) => {
                    self.reset_deadline();
                    return Some(Err(e));
                }
                Some(LocationEvent::Fix(fix)) => {
                    self.reset_deadline();
                    if self.throttle.accept(&fix, (self.clock)()) {
                        self.latest.send_replace(Some(fix));
                        return Some(Ok(fix));
                    }
                }
            }
        }
    }

    /// Receiver that always holds the most recent delivered fix.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<Option<UserLocation>> {
        self.latest.subscribe()
    }

    #[must_use]
    pub fn latest(&self) -> Option<UserLocation> {
        *self.latest.borrow()
    }

    #[must_use]
    pub fn watch_id(&self) -> WatchId {
        self.watch_id
    }

    fn reset_deadline(&mut self) {
        self.deadline = (!self.timeout.is_zero()).then(|| Instant::now() + self.timeout);
    }
}

impl Drop for GeolocationTracker {
    fn drop(&mut self) {
        self.source.clear_watch(self.watch_id);
        info!(watch_id = self.watch_id.0, "location watch cleared");
    }
}
