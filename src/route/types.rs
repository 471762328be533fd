//! Route service wire types and errors.
//!
//! REQUEST
//! =======
//! `{ "points": [[lon, lat], ...], "modes": ["walk", ...] }` with one mode per
//! consecutive pair of points.
//!
//! RESPONSE
//! ========
//! `{ "segments": [{ "mode": "walk", "coordinates": [[lon, lat], ...] }, ...] }`.
//! The schema is strict: unknown fields are rejected, and [`RouteResponse::into_polylines`]
//! checks the segments line up 1:1 with the request before anything is drawn.

use serde::{Deserialize, Serialize};

use crate::error::ErrorCode;
use crate::mode::TransportMode;
use crate::position::LatLng;

// =============================================================================
// ERROR
// =============================================================================

/// Errors produced while computing a route.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RouteError {
    /// The underlying HTTP client could not be constructed.
    #[error("HTTP client build failed: {0}")]
    ClientBuild(String),

    /// The request never produced a response (connect, timeout, reset).
    #[error("route request failed: {0}")]
    Request(String),

    /// The service answered with a non-success status.
    #[error("route service returned status {status}")]
    Status { status: u16, body: String },

    /// The body was not valid JSON for the response schema.
    #[error("route response parse failed: {0}")]
    Parse(String),

    /// The body parsed but does not match the request it answers.
    #[error("route response schema mismatch: {0}")]
    Schema(String),
}

impl ErrorCode for RouteError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::ClientBuild(_) => "E_HTTP_CLIENT_BUILD",
            Self::Request(_) => "E_ROUTE_REQUEST",
            Self::Status { .. } => "E_ROUTE_STATUS",
            Self::Parse(_) => "E_ROUTE_PARSE",
            Self::Schema(_) => "E_ROUTE_SCHEMA",
        }
    }

    fn retryable(&self) -> bool {
        matches!(self, Self::Request(_) | Self::Status { status: 429 | 500..=599, .. })
    }
}

// =============================================================================
// WIRE TYPES
// =============================================================================

/// Body sent to the route service.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RouteRequest {
    /// Stop coordinates as `[longitude, latitude]`, in stop order.
    pub points: Vec<[f64; 2]>,
    /// One mode per segment; `modes.len() == points.len() - 1`.
    pub modes: Vec<TransportMode>,
}

impl RouteRequest {
    /// Number of segments the response must contain.
    #[must_use]
    pub fn segment_count(&self) -> usize {
        self.points.len().saturating_sub(1)
    }
}

/// Body returned by the route service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RouteResponse {
    pub segments: Vec<RouteSegment>,
}

/// Geometry for one requested segment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RouteSegment {
    pub mode: TransportMode,
    /// `[longitude, latitude]` pairs from the segment start to its end.
    pub coordinates: Vec<[f64; 2]>,
}

/// Drawable geometry for one segment.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RoutePolyline {
    pub mode: TransportMode,
    pub coordinates: Vec<LatLng>,
}

// =============================================================================
// PARSING
// =============================================================================

/// Parse a raw response body.
///
/// # Errors
///
/// Returns [`RouteError::Parse`] for malformed JSON, missing fields, unknown
/// fields, or unknown modes.
pub fn parse_response(json: &str) -> Result<RouteResponse, RouteError> {
    serde_json::from_str(json).map_err(|e| RouteError::Parse(e.to_string()))
}

impl RouteResponse {
    /// Check the response against the request it answers and convert it into
    /// polylines.
    ///
    /// # Errors
    ///
    /// Returns [`RouteError::Schema`] when the segment count or any segment's
    /// mode differs from the request, or a segment has fewer than two valid
    /// coordinates.
    pub fn into_polylines(self, request: &RouteRequest) -> Result<Vec<RoutePolyline>, RouteError> {
        let expected = request.segment_count();
        if self.segments.len() != expected {
            return Err(RouteError::Schema(format!(
                "expected {expected} segments, got {}",
                self.segments.len()
            )));
        }

        self.segments
            .into_iter()
            .zip(&request.modes)
            .enumerate()
            .map(|(i, (segment, requested))| {
                if segment.mode != *requested {
                    return Err(RouteError::Schema(format!(
                        "segment {i}: requested {requested}, got {}",
                        segment.mode
                    )));
                }
                if segment.coordinates.len() < 2 {
                    return Err(RouteError::Schema(format!("segment {i}: fewer than two coordinates")));
                }
                let coordinates = segment
                    .coordinates
                    .into_iter()
                    .map(LatLng::from_lon_lat)
                    .collect::<Vec<_>>();
                if let Some(bad) = coordinates.iter().find(|c| !c.is_valid()) {
                    return Err(RouteError::Schema(format!(
                        "segment {i}: coordinate out of range ({}, {})",
                        bad.latitude, bad.longitude
                    )));
                }
                Ok(RoutePolyline { mode: segment.mode, coordinates })
            })
            .collect()
    }
}

/// Something that can compute a route. Implemented over HTTP by
/// [`super::client::HttpRouteService`]; tests substitute their own.
#[async_trait::async_trait]
pub trait RouteService: Send + Sync {
    async fn compute(&self, request: &RouteRequest) -> Result<RouteResponse, RouteError>;
}

#[cfg(test)]
#[path = "types_test.rs"]
mod tests;
