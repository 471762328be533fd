//! Projection of trip state onto map primitives.
//!
//! [`project`] is pure: the same stops, polylines, user location and readiness
//! always produce the same [`Scene`]. Before the map is ready the scene is
//! empty, so nothing is ever drawn onto an unloaded map.

#[cfg(test)]
#[path = "render_test.rs"]
mod render_test;

use serde::Serialize;

use crate::consts::USER_MARKER_KEY;
use crate::location::UserLocation;
use crate::mode::TransportMode;
use crate::position::LatLng;
use crate::route::RoutePolyline;
use crate::stops::Stop;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MarkerKind {
    Stop { index: usize },
    User,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Marker {
    /// Stable across renders for the same stop at the same place and index.
    pub key: String,
    pub kind: MarkerKind,
    pub position: LatLng,
    pub title: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Line {
    pub key: String,
    pub mode: TransportMode,
    /// `#RRGGBB`.
    pub color: &'static str,
    pub coordinates: Vec<LatLng>,
}

/// Everything the map should currently show.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct Scene {
    pub markers: Vec<Marker>,
    pub lines: Vec<Line>,
}

impl Scene {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.markers.is_empty() && self.lines.is_empty()
    }
}

/// Marker key for a stop: `"{latitude}:{longitude}:{index}"`.
#[must_use]
pub fn stop_marker_key(stop: &Stop) -> String {
    format!("{}:{}:{}", stop.latitude, stop.longitude, stop.order_index)
}

/// Build the scene for the current state.
#[must_use]
pub fn project(
    stops: &[Stop],
    polylines: &[RoutePolyline],
    user: Option<&UserLocation>,
    map_ready: bool,
) -> Scene {
    if !map_ready {
        return Scene::default();
    }

    let mut markers: Vec<Marker> = stops
        .iter()
        .map(|stop| Marker {
            key: stop_marker_key(stop),
            kind: MarkerKind::Stop { index: stop.order_index },
            position: stop.position(),
            title: stop.name.clone(),
        })
        .collect();

    if let Some(user) = user {
        markers.push(Marker {
            key: USER_MARKER_KEY.to_owned(),
            kind: MarkerKind::User,
            position: user.position(),
            title: String::new(),
        });
    }

    let lines = polylines
        .iter()
        .enumerate()
        .map(|(i, line)| Line {
            key: format!("segment:{i}"),
            mode: line.mode,
            color: line.mode.color(),
            coordinates: line.coordinates.clone(),
        })
        .collect();

    Scene { markers, lines }
}
