//! The trip screen: one task that owns all trip state.
//!
//! ARCHITECTURE
//! ============
//! [`TripCore`] is synchronous. It takes one input at a time (a UI event, a
//! location result or a route reply), updates the model, and returns
//! [`Action`]s for the host to carry out. It never awaits and never touches
//! the map, so tests drive it directly.
//!
//! [`TripScreen`] is the host. Its `run` loop is a `biased` `select!` over:
//!
//! 1. UI events from an mpsc channel,
//! 2. the geolocation tracker,
//! 3. the single in-flight route request.
//!
//! UI events come first so a gesture that is already queued is applied before
//! a location fix that would otherwise recenter the camera. Dispatching a new
//! route request replaces the in-flight future, which drops and thereby
//! cancels the older HTTP call.
//!
//! LIFECYCLE
//! =========
//! 1. `TripScreen::new` starts the location watch.
//! 2. `run` processes inputs until `Teardown` or the event channel closes.
//! 3. On exit the tracker is dropped (clearing the watch) and any in-flight
//!    request is dropped. `run` hands the core back for inspection.

#[cfg(test)]
#[path = "screen_test.rs"]
mod screen_test;

use std::future::pending;
use std::sync::Arc;

use futures::FutureExt;
use futures::future::BoxFuture;
use tokio::sync::mpsc;
use tracing::{debug, info};

use crate::camera::{CameraCommand, CameraSettings, CameraState, MapCameraController};
use crate::diagnostics::DiagnosticsSink;
use crate::error::TripError;
use crate::location::{GeolocationTracker, LocationError, LocationSource, UserLocation, WatchOptions};
use crate::mode::TransportMode;
use crate::position::LatLng;
use crate::render::{Scene, project};
use crate::route::{PendingRoute, RouteReply, RouteRequestCoordinator, RouteService, RouteStatus};
use crate::selector::{ModeSelectors, SelectorState};
use crate::stops::{NewStop, StopId, StopListModel};

// =============================================================================
// EVENTS AND ACTIONS
// =============================================================================

/// Input from the UI and the map.
#[derive(Debug, Clone, PartialEq)]
pub enum ScreenEvent {
    /// The map finished loading.
    MapReady,
    /// Long press on the map adds a stop there.
    LongPress { position: LatLng, name: String },
    RemoveStop { index: usize },
    ToggleSelector { stop: StopId },
    PickMode { stop: StopId, mode: TransportMode },
    /// The user panned or zoomed and left the camera at `view`.
    UserGesture { view: CameraState },
    SetFollow(bool),
    RequestRoute,
    Teardown,
}

/// Work for the host produced by [`TripCore`].
#[derive(Debug)]
pub enum Action {
    AnimateCamera(CameraCommand),
    Render(Scene),
    FetchRoute(PendingRoute),
    RouteStatusChanged(RouteStatus),
    SelectorChanged { stop: StopId, state: SelectorState },
}

/// The map and surrounding UI as seen from the screen loop.
pub trait MapSurface: Send + Sync {
    fn animate_camera(&self, command: &CameraCommand);

    fn show(&self, scene: &Scene);

    fn route_status(&self, _status: &RouteStatus) {}

    fn selector_state(&self, _stop: StopId, _state: SelectorState) {}
}

// =============================================================================
// CORE
// =============================================================================

pub struct TripCore {
    model: StopListModel,
    selectors: ModeSelectors,
    camera: MapCameraController,
    coordinator: RouteRequestCoordinator,
    user: Option<UserLocation>,
    diagnostics: Arc<dyn DiagnosticsSink>,
}

impl TripCore {
    #[must_use]
    pub fn new(
        service: Arc<dyn RouteService>,
        camera: CameraSettings,
        diagnostics: Arc<dyn DiagnosticsSink>,
    ) -> Self {
        Self {
            model: StopListModel::new(),
            selectors: ModeSelectors::new(),
            camera: MapCameraController::new(camera),
            coordinator: RouteRequestCoordinator::new(service),
            user: None,
            diagnostics,
        }
    }

    // --- Inputs ---

    /// Apply one UI event. `Teardown` is handled by the host and yields nothing.
    pub fn handle(&mut self, event: ScreenEvent) -> Vec<Action> {
        let mut actions = Vec::new();
        match event {
            ScreenEvent::MapReady => {
                actions.extend(self.camera.on_map_ready().map(Action::AnimateCamera));
                actions.push(self.render_action());
            }
            ScreenEvent::LongPress { position, name } => {
                let last = self.last_stop();
                match self.model.add(NewStop::new(name, position)) {
                    Ok(stop) => {
                        debug!(stop_id = %stop.id, index = stop.order_index, "stop added");
                        self.selectors.retain(&self.model);
                        actions.push(self.render_action());
                        self.push_last_stop_changes(last, &mut actions);
                    }
                    Err(e) => self.report(e.into()),
                }
            }
            ScreenEvent::RemoveStop { index } => {
                let last = self.last_stop();
                match self.model.remove(index) {
                    Ok(stop) => {
                        debug!(stop_id = %stop.id, index, "stop removed");
                        self.selectors.retain(&self.model);
                        actions.push(self.render_action());
                        self.push_last_stop_changes(last, &mut actions);
                    }
                    Err(e) => self.report(e.into()),
                }
            }
            ScreenEvent::ToggleSelector { stop } => {
                let state = self.selectors.toggle(stop, &self.model);
                actions.push(Action::SelectorChanged { stop, state });
            }
            ScreenEvent::PickMode { stop, mode } => {
                let result = self.selectors.pick(stop, mode, &mut self.model);
                actions.push(Action::SelectorChanged { stop, state: self.selectors.state(stop, &self.model) });
                match result {
                    Ok(()) => actions.push(self.render_action()),
                    Err(e) => self.report(e.into()),
                }
            }
            ScreenEvent::UserGesture { view } => self.camera.on_user_gesture(view),
            ScreenEvent::SetFollow(follow) => {
                actions.extend(self.camera.set_follow(follow).map(Action::AnimateCamera));
            }
            ScreenEvent::RequestRoute => match self.coordinator.dispatch(&self.model) {
                Ok(pending) => {
                    actions.push(Action::RouteStatusChanged(self.coordinator.status().clone()));
                    actions.push(Action::FetchRoute(pending));
                }
                Err(e) => self.report(e.into()),
            },
            ScreenEvent::Teardown => {}
        }
        actions
    }

    /// Apply one result from the location tracker.
    pub fn on_location(&mut self, result: Result<UserLocation, LocationError>) -> Vec<Action> {
        match result {
            Ok(fix) => {
                self.user = Some(fix);
                let mut actions: Vec<Action> =
                    self.camera.on_location(fix.position()).map(Action::AnimateCamera).into_iter().collect();
                actions.push(self.render_action());
                actions
            }
            Err(e) => {
                self.report(TripError::LocationUnavailable(e));
                Vec::new()
            }
        }
    }

    /// Apply a route reply, or discard it if it no longer matches the trip.
    pub fn on_route_reply(&mut self, reply: RouteReply) -> Vec<Action> {
        let outcome = self.coordinator.complete(reply, &self.model);
        let mut actions = vec![Action::RouteStatusChanged(self.coordinator.status().clone())];
        match outcome {
            Ok(_) => actions.push(self.render_action()),
            Err(e) => self.report(e),
        }
        actions
    }

    // --- Queries ---

    /// The scene for the current state.
    #[must_use]
    pub fn render(&self) -> Scene {
        project(
            self.model.stops(),
            self.coordinator.visible_polylines(&self.model),
            self.user.as_ref(),
            self.camera.map_ready(),
        )
    }

    #[must_use]
    pub fn model(&self) -> &StopListModel {
        &self.model
    }

    #[must_use]
    pub fn selectors(&self) -> &ModeSelectors {
        &self.selectors
    }

    #[must_use]
    pub fn camera(&self) -> &MapCameraController {
        &self.camera
    }

    #[must_use]
    pub fn coordinator(&self) -> &RouteRequestCoordinator {
        &self.coordinator
    }

    #[must_use]
    pub fn user_location(&self) -> Option<&UserLocation> {
        self.user.as_ref()
    }

    fn last_stop(&self) -> Option<StopId> {
        self.model.stops().last().map(|s| s.id)
    }

    /// Announce the pickers whose last-stop status changed: the previous last
    /// stop (if it still exists) and the new one.
    fn push_last_stop_changes(&self, previous: Option<StopId>, actions: &mut Vec<Action>) {
        let current = self.last_stop();
        if previous == current {
            return;
        }
        for stop in [previous, current].into_iter().flatten() {
            if self.model.index_of(stop).is_some() {
                actions.push(Action::SelectorChanged { stop, state: self.selectors.state(stop, &self.model) });
            }
        }
    }

    fn render_action(&self) -> Action {
        Action::Render(self.render())
    }

    fn report(&self, error: TripError) {
        self.diagnostics.report(&error);
    }
}

// =============================================================================
// SCREEN LOOP
// =============================================================================

pub struct TripScreen {
    core: TripCore,
    surface: Arc<dyn MapSurface>,
    tracker: Option<GeolocationTracker>,
    in_flight: Option<BoxFuture<'static, RouteReply>>,
}

impl TripScreen {
    /// Build the screen and start watching the device location. A watch that
    /// cannot start is reported and the screen runs without live location.
    pub fn new(
        core: TripCore,
        surface: Arc<dyn MapSurface>,
        location: Arc<dyn LocationSource>,
        options: &WatchOptions,
    ) -> Self {
        let tracker = match GeolocationTracker::start(location, options) {
            Ok(tracker) => Some(tracker),
            Err(e) => {
                core.report(TripError::LocationUnavailable(e));
                None
            }
        };
        Self { core, surface, tracker, in_flight: None }
    }

    /// Process inputs until teardown. Returns the core with its final state.
    pub async fn run(mut self, mut events: mpsc::Receiver<ScreenEvent>) -> TripCore {
        info!(location = self.tracker.is_some(), "trip screen started");
        loop {
            let actions = tokio::select! {
                biased;
                event = events.recv() => match event {
                    None | Some(ScreenEvent::Teardown) => break,
                    Some(event) => self.core.handle(event),
                },
                fix = next_fix(&mut self.tracker) => match fix {
                    Some(result) => self.core.on_location(result),
                    None => {
                        self.tracker = None;
                        Vec::new()
                    }
                },
                reply = next_reply(&mut self.in_flight) => {
                    self.in_flight = None;
                    self.core.on_route_reply(reply)
                }
            };
            self.apply(actions);
        }

        self.tracker = None;
        if self.in_flight.take().is_some() {
            debug!("in-flight route request dropped on teardown");
        }
        info!("trip screen torn down");
        self.core
    }

    fn apply(&mut self, actions: Vec<Action>) {
        for action in actions {
            match action {
                Action::AnimateCamera(command) => self.surface.animate_camera(&command),
                Action::Render(scene) => self.surface.show(&scene),
                Action::FetchRoute(pending) => {
                    if self.in_flight.is_some() {
                        debug!(seq = pending.seq, "superseding in-flight route request");
                    }
                    self.in_flight = Some(pending.send().boxed());
                }
                Action::RouteStatusChanged(status) => self.surface.route_status(&status),
                Action::SelectorChanged { stop, state } => self.surface.selector_state(stop, state),
            }
        }
    }
}

async fn next_fix(tracker: &mut Option<GeolocationTracker>) -> Option<Result<UserLocation, LocationError>> {
    match tracker {
        Some(tracker) => tracker.next().await,
        None => pending().await,
    }
}

async fn next_reply(in_flight: &mut Option<BoxFuture<'static, RouteReply>>) -> RouteReply {
    match in_flight {
        Some(request) => request.await,
        None => pending().await,
    }
}
