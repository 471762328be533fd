//! Route computation: wire schema, HTTP client, and request coordination.
//!
//! DESIGN
//! ======
//! The screen talks to an `Arc<dyn RouteService>` handed to it at construction.
//! [`client::HttpRouteService`] is the production implementation; tests plug in
//! scripted services. [`coordinator::RouteRequestCoordinator`] owns the
//! displayed polylines and decides which replies may replace them.

pub mod client;
pub mod coordinator;
pub mod types;

pub use coordinator::{Fingerprint, PendingRoute, RouteReply, RouteRequestCoordinator, RouteStatus};
pub use types::{RouteError, RoutePolyline, RouteRequest, RouteResponse, RouteService};
