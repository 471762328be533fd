//! Trip composition and live map synchronization engine.
//!
//! A user builds an ordered list of stops, assigns a transport mode to each leg,
//! and asks an external service to compute a multi-modal route. Meanwhile the
//! device location stream drives the map camera. This crate keeps those inputs
//! consistent: edits, location fixes, map readiness and route responses are all
//! applied on one task, and route responses that no longer match the trip are
//! dropped before they can reach the map.
//!
//! ## Module layout
//!
//! | Module | Role |
//! |--------|------|
//! | [`stops`] | Ordered stop list and per-segment modes |
//! | [`selector`] | Per-stop expand/collapse mode picker state |
//! | [`location`] | Throttled geolocation subscription |
//! | [`camera`] | Follow/readiness-gated camera reconciliation |
//! | [`route`] | Route service client, wire schema and staleness guard |
//! | [`render`] | Pure projection of trip state to markers and lines |
//! | [`screen`] | Testable [`screen::TripCore`] and the async [`screen::TripScreen`] loop |
//! | [`position`] | Coordinates and great-circle distance |
//! | [`mode`] | Transport modes and their fixed colors/icons |
//! | [`error`] | Error taxonomy and the [`error::ErrorCode`] trait |
//! | [`diagnostics`] | Error reporting sink |
//! | [`config`] | Environment configuration |
//! | [`consts`] | Shared numeric defaults |

pub mod camera;
pub mod config;
pub mod consts;
pub mod diagnostics;
pub mod error;
pub mod location;
pub mod mode;
pub mod position;
pub mod render;
pub mod route;
pub mod screen;
pub mod selector;
pub mod stops;
