//! Map camera reconciliation.
//!
//! The controller folds three inputs, the latest user location, the `follow`
//! flag and map readiness, into at most one [`CameraCommand`] per input. It
//! never talks to the map itself; callers forward the returned command to the
//! map surface.
//!
//! Recenter rules:
//!
//! - nothing is emitted while the map is not ready,
//! - a location update recenters only with follow on and only once the user
//!   has moved at least `recenter_threshold_m` from the last animated center,
//! - turning follow on, or the map becoming ready with follow on, recenters on
//!   the latest location immediately,
//! - a user gesture turns follow off and becomes the current view.

#[cfg(test)]
#[path = "camera_test.rs"]
mod camera_test;

use serde::Serialize;
use tracing::debug;

use crate::consts::{
    DISTANCE_EPSILON_M, MAX_ANIMATION_MS, RECENTER_ANIMATION_MS, RECENTER_PITCH_DEG, RECENTER_THRESHOLD_M,
    RECENTER_ZOOM,
};
use crate::position::LatLng;

/// Camera view on the map.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CameraState {
    pub center: LatLng,
    pub zoom: f64,
    /// Degrees from straight down.
    pub pitch: f64,
}

/// Animate the map camera to a new view.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CameraCommand {
    pub target: CameraState,
    pub duration_ms: u64,
}

/// Recenter parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct CameraSettings {
    pub zoom: f64,
    pub pitch: f64,
    pub animation_ms: u64,
    pub recenter_threshold_m: f64,
}

impl Default for CameraSettings {
    fn default() -> Self {
        Self {
            zoom: RECENTER_ZOOM,
            pitch: RECENTER_PITCH_DEG,
            animation_ms: RECENTER_ANIMATION_MS,
            recenter_threshold_m: RECENTER_THRESHOLD_M,
        }
    }
}

// =============================================================================
// CONTROLLER
// =============================================================================

#[derive(Debug, Clone)]
pub struct MapCameraController {
    settings: CameraSettings,
    follow: bool,
    map_ready: bool,
    latest: Option<LatLng>,
    last_animated: Option<LatLng>,
    view: Option<CameraState>,
}

impl MapCameraController {
    /// A controller that starts in follow mode with the map not yet ready.
    #[must_use]
    pub fn new(settings: CameraSettings) -> Self {
        Self { settings, follow: true, map_ready: false, latest: None, last_animated: None, view: None }
    }

    /// Record a delivered location fix.
    pub fn on_location(&mut self, position: LatLng) -> Option<CameraCommand> {
        self.latest = Some(position);
        if !self.map_ready || !self.follow {
            return None;
        }
        if let Some(prev) = self.last_animated {
            let moved = prev.distance_m(position);
            if moved + DISTANCE_EPSILON_M < self.settings.recenter_threshold_m {
                debug!(moved_m = moved, "camera holds; below recenter threshold");
                return None;
            }
        }
        Some(self.recenter(position))
    }

    /// The map finished loading.
    pub fn on_map_ready(&mut self) -> Option<CameraCommand> {
        self.map_ready = true;
        self.recenter_on_latest()
    }

    /// The user panned or zoomed; `view` is where they left the camera.
    pub fn on_user_gesture(&mut self, view: CameraState) {
        if self.follow {
            debug!("user gesture; follow disabled");
        }
        self.follow = false;
        self.view = Some(view);
    }

    /// Turn follow on or off. Turning it on recenters immediately when possible.
    pub fn set_follow(&mut self, follow: bool) -> Option<CameraCommand> {
        self.follow = follow;
        if follow { self.recenter_on_latest() } else { None }
    }

    #[must_use]
    pub fn follow(&self) -> bool {
        self.follow
    }

    #[must_use]
    pub fn map_ready(&self) -> bool {
        self.map_ready
    }

    /// Latest known user position, whether or not the camera followed it.
    #[must_use]
    pub fn latest(&self) -> Option<LatLng> {
        self.latest
    }

    /// The view as last set by a recenter or a gesture.
    #[must_use]
    pub fn view(&self) -> Option<CameraState> {
        self.view
    }

    fn recenter_on_latest(&mut self) -> Option<CameraCommand> {
        if !self.map_ready || !self.follow {
            return None;
        }
        let position = self.latest?;
        Some(self.recenter(position))
    }

    fn recenter(&mut self, center: LatLng) -> CameraCommand {
        let target = CameraState { center, zoom: self.settings.zoom, pitch: self.settings.pitch };
        self.last_animated = Some(center);
        self.view = Some(target);
        CameraCommand { target, duration_ms: self.settings.animation_ms.min(MAX_ANIMATION_MS) }
    }
}

impl Default for MapCameraController {
    fn default() -> Self {
        Self::new(CameraSettings::default())
    }
}
