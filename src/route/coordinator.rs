//! Route request coordination and the staleness guard.
//!
//! ARCHITECTURE
//! ============
//! `dispatch` snapshots the trip into a request, a [`Fingerprint`] and a
//! sequence number, and hands back a [`PendingRoute`] the caller awaits however
//! it likes. The reply comes back through `complete`, which decides whether it
//! may touch the map:
//!
//! 1. Only the latest dispatch is authoritative. Replies from earlier dispatches
//!    are discarded.
//! 2. The reply's fingerprint must equal the model's fingerprint *now*. Edits
//!    made while the request was in flight make it stale.
//! 3. On success the polyline set is swapped in one assignment. On failure the
//!    previous set is kept.
//!
//! Discards surface as [`TripError::StaleResponseDiscarded`] so tests and
//! diagnostics can see them; the screen never shows them to the user.

#[cfg(test)]
#[path = "coordinator_test.rs"]
mod coordinator_test;

use std::sync::Arc;

use tracing::{debug, info};

use super::types::{RouteError, RoutePolyline, RouteRequest, RouteResponse, RouteService};
use crate::consts::MIN_STOPS;
use crate::error::{ErrorCode, TripError, ValidationError};
use crate::mode::TransportMode;
use crate::position::LatLng;
use crate::stops::StopListModel;

// =============================================================================
// FINGERPRINT
// =============================================================================

/// Exact snapshot of stop coordinates and segment modes.
///
/// Coordinates compare by bit pattern, so any edit to a stop position, even one
/// that rounds away on screen, counts as a change.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Fingerprint {
    points: Vec<[u64; 2]>,
    modes: Vec<TransportMode>,
}

impl Fingerprint {
    #[must_use]
    pub fn new(points: impl IntoIterator<Item = LatLng>, modes: impl IntoIterator<Item = TransportMode>) -> Self {
        Self {
            points: points
                .into_iter()
                .map(|p| [p.latitude.to_bits(), p.longitude.to_bits()])
                .collect(),
            modes: modes.into_iter().collect(),
        }
    }

    #[must_use]
    pub fn stop_count(&self) -> usize {
        self.points.len()
    }
}

// =============================================================================
// STATUS
// =============================================================================

/// Route state as the caller should present it.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum RouteStatus {
    /// No request issued yet.
    #[default]
    Idle,
    /// A request is in flight.
    Loading { seq: u64 },
    /// The displayed polylines came from the latest successful request.
    Ready { seq: u64 },
    /// The latest request failed; the previous polylines are still shown.
    Failed { seq: u64, code: &'static str, message: String, retryable: bool },
}

// =============================================================================
// PENDING REQUEST
// =============================================================================

/// A dispatched request that has not been sent yet.
pub struct PendingRoute {
    pub seq: u64,
    pub fingerprint: Fingerprint,
    pub request: RouteRequest,
    service: Arc<dyn RouteService>,
}

impl PendingRoute {
    /// Call the route service. Dropping the returned future cancels the call.
    pub async fn send(self) -> RouteReply {
        let result = self.service.compute(&self.request).await;
        RouteReply { seq: self.seq, fingerprint: self.fingerprint, request: self.request, result }
    }
}

impl std::fmt::Debug for PendingRoute {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PendingRoute")
            .field("seq", &self.seq)
            .field("fingerprint", &self.fingerprint)
            .field("request", &self.request)
            .finish_non_exhaustive()
    }
}

/// The service's answer, tagged with the dispatch it belongs to.
#[derive(Debug)]
pub struct RouteReply {
    pub seq: u64,
    pub fingerprint: Fingerprint,
    pub request: RouteRequest,
    pub result: Result<RouteResponse, RouteError>,
}

// =============================================================================
// COORDINATOR
// =============================================================================

pub struct RouteRequestCoordinator {
    service: Arc<dyn RouteService>,
    latest_seq: u64,
    polylines: Arc<[RoutePolyline]>,
    polyline_fingerprint: Option<Fingerprint>,
    status: RouteStatus,
}

impl RouteRequestCoordinator {
    #[must_use]
    pub fn new(service: Arc<dyn RouteService>) -> Self {
        Self {
            service,
            latest_seq: 0,
            polylines: Arc::from(Vec::new()),
            polyline_fingerprint: None,
            status: RouteStatus::Idle,
        }
    }

    /// Snapshot the trip into a request. Supersedes any earlier dispatch.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::BelowMinimumStops`] when there is nothing to route.
    pub fn dispatch(&mut self, model: &StopListModel) -> Result<PendingRoute, ValidationError> {
        if model.len() < MIN_STOPS {
            return Err(ValidationError::BelowMinimumStops { count: model.len(), min: MIN_STOPS });
        }

        let points = model
            .stops()
            .iter()
            .map(|s| s.position().to_lon_lat())
            .collect();
        let modes = model.segments().map(|s| s.mode).collect();
        let request = RouteRequest { points, modes };

        self.latest_seq += 1;
        self.status = RouteStatus::Loading { seq: self.latest_seq };
        debug!(seq = self.latest_seq, stops = model.len(), "route request dispatched");

        Ok(PendingRoute {
            seq: self.latest_seq,
            fingerprint: model.fingerprint(),
            request,
            service: Arc::clone(&self.service),
        })
    }

    /// Apply a reply if it still describes the current trip.
    ///
    /// Returns the number of polylines now displayed.
    ///
    /// # Errors
    ///
    /// - [`TripError::StaleResponseDiscarded`]: superseded dispatch or the trip
    ///   changed since dispatch. Polylines are untouched.
    /// - [`TripError::Network`]: the request or its response failed. Polylines
    ///   are kept and the status becomes [`RouteStatus::Failed`].
    pub fn complete(&mut self, reply: RouteReply, model: &StopListModel) -> Result<usize, TripError> {
        if reply.seq != self.latest_seq || reply.fingerprint != model.fingerprint() {
            debug!(seq = reply.seq, latest = self.latest_seq, "discarding stale route response");
            if reply.seq == self.latest_seq {
                self.status = RouteStatus::Idle;
            }
            return Err(TripError::StaleResponseDiscarded { seq: reply.seq, latest: self.latest_seq });
        }

        let polylines = reply
            .result
            .and_then(|response| response.into_polylines(&reply.request));

        match polylines {
            Ok(lines) => {
                let count = lines.len();
                self.polylines = Arc::from(lines);
                self.polyline_fingerprint = Some(reply.fingerprint);
                self.status = RouteStatus::Ready { seq: reply.seq };
                info!(seq = reply.seq, segments = count, "route applied");
                Ok(count)
            }
            Err(e) => {
                self.status = RouteStatus::Failed {
                    seq: reply.seq,
                    code: e.error_code(),
                    message: e.to_string(),
                    retryable: e.retryable(),
                };
                Err(TripError::Network(e))
            }
        }
    }

    /// Dispatch, await and apply in one call. The model must not change while
    /// the request is in flight, so this suits one-shot callers like the CLI.
    ///
    /// # Errors
    ///
    /// Same as [`Self::dispatch`] and [`Self::complete`].
    pub async fn fetch(&mut self, model: &StopListModel) -> Result<usize, TripError> {
        let pending = self.dispatch(model)?;
        let reply = pending.send().await;
        self.complete(reply, model)
    }

    // --- Queries ---

    /// The full polyline set from the last applied response.
    #[must_use]
    pub fn polylines(&self) -> &[RoutePolyline] {
        &self.polylines
    }

    /// A cheap shared handle on the current polyline set.
    #[must_use]
    pub fn snapshot(&self) -> Arc<[RoutePolyline]> {
        Arc::clone(&self.polylines)
    }

    /// Polylines that may be drawn alongside `model`: the current set if it was
    /// produced for exactly this trip, otherwise nothing.
    #[must_use]
    pub fn visible_polylines(&self, model: &StopListModel) -> &[RoutePolyline] {
        match &self.polyline_fingerprint {
            Some(fp) if *fp == model.fingerprint() => &self.polylines[..],
            _ => &[],
        }
    }

    #[must_use]
    pub fn status(&self) -> &RouteStatus {
        &self.status
    }

    /// Sequence number of the most recent dispatch (0 before the first).
    #[must_use]
    pub fn latest_seq(&self) -> u64 {
        self.latest_seq
    }
}
