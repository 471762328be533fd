//! Geographic coordinates and distances.
//!
//! Everything in the crate stores positions as [`LatLng`] in degrees. The route
//! service speaks `[longitude, latitude]` pairs, so conversion helpers for that
//! ordering live here too.

#[cfg(test)]
#[path = "position_test.rs"]
mod position_test;

use ::geo::{Distance, Haversine, Point};
use serde::{Deserialize, Serialize};

/// A WGS84 coordinate in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LatLng {
    pub latitude: f64,
    pub longitude: f64,
}

impl LatLng {
    #[must_use]
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self { latitude, longitude }
    }

    /// Build from a `[longitude, latitude]` pair as used on the wire.
    #[must_use]
    pub fn from_lon_lat(pair: [f64; 2]) -> Self {
        Self { latitude: pair[1], longitude: pair[0] }
    }

    /// The `[longitude, latitude]` pair for this coordinate.
    #[must_use]
    pub fn to_lon_lat(self) -> [f64; 2] {
        [self.longitude, self.latitude]
    }

    /// Whether both components are finite and inside the valid degree ranges.
    #[must_use]
    pub fn is_valid(self) -> bool {
        self.latitude.is_finite()
            && self.longitude.is_finite()
            && (-90.0..=90.0).contains(&self.latitude)
            && (-180.0..=180.0).contains(&self.longitude)
    }

    /// Great-circle distance to `other` in meters.
    #[must_use]
    pub fn distance_m(self, other: LatLng) -> f64 {
        Haversine::distance(Point::from(self), Point::from(other))
    }
}

impl From<LatLng> for Point<f64> {
    fn from(value: LatLng) -> Self {
        Point::new(value.longitude, value.latitude)
    }
}
