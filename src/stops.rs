//! Stop list: the authoritative ordered trip and its per-segment modes.
//!
//! ARCHITECTURE
//! ============
//! Stops live in a `Vec` whose position is the order index. Modes live in a
//! parallel `Vec` with one entry per segment, so `modes.len() == stops.len() - 1`
//! whenever there is at least one stop. Segments are never stored; every call
//! to [`StopListModel::segments`] derives them from the two vectors.
//!
//! INVARIANTS
//! ==========
//! - `stops[i].order_index == i` for every `i`.
//! - `modes.len() == stops.len().saturating_sub(1)`.
//! - A rejected edit leaves both vectors untouched.

#[cfg(test)]
#[path = "stops_test.rs"]
mod stops_test;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::consts::MIN_STOPS;
use crate::error::ValidationError;
use crate::mode::TransportMode;
use crate::position::LatLng;
use crate::route::coordinator::Fingerprint;

/// Stable identifier for a stop. Survives renumbering.
pub type StopId = Uuid;

/// A named point the trip passes through.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Stop {
    pub id: StopId,
    pub latitude: f64,
    pub longitude: f64,
    pub name: String,
    /// Position in the trip, always contiguous from zero.
    pub order_index: usize,
}

impl Stop {
    #[must_use]
    pub fn position(&self) -> LatLng {
        LatLng::new(self.latitude, self.longitude)
    }
}

/// Input for [`StopListModel::add`]: everything but the assigned id and index.
#[derive(Debug, Clone, PartialEq)]
pub struct NewStop {
    pub name: String,
    pub position: LatLng,
}

impl NewStop {
    #[must_use]
    pub fn new(name: impl Into<String>, position: LatLng) -> Self {
        Self { name: name.into(), position }
    }
}

/// The leg between two order-adjacent stops.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Segment<'a> {
    pub from: &'a Stop,
    pub to: &'a Stop,
    pub mode: TransportMode,
}

impl Segment<'_> {
    /// Order index of the stop this segment starts at.
    #[must_use]
    pub fn index(&self) -> usize {
        self.from.order_index
    }
}

/// Ordered stops plus one mode per segment.
#[derive(Debug, Clone, Default)]
pub struct StopListModel {
    stops: Vec<Stop>,
    modes: Vec<TransportMode>,
}

impl StopListModel {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    // --- Mutations ---

    /// Append a stop. The segment it closes (if any) starts as the default mode.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::InvalidCoordinate`] for an out-of-range position.
    pub fn add(&mut self, stop: NewStop) -> Result<&Stop, ValidationError> {
        if !stop.position.is_valid() {
            return Err(ValidationError::InvalidCoordinate {
                latitude: stop.position.latitude,
                longitude: stop.position.longitude,
            });
        }
        if !self.stops.is_empty() {
            self.modes.push(TransportMode::default());
        }
        let order_index = self.stops.len();
        self.stops.push(Stop {
            id: Uuid::new_v4(),
            latitude: stop.position.latitude,
            longitude: stop.position.longitude,
            name: stop.name,
            order_index,
        });
        Ok(&self.stops[order_index])
    }

    /// Remove the stop at `index` and renumber the stops after it.
    ///
    /// The mode of the segment starting at `index` is dropped and later modes
    /// shift down. Removing the final stop drops the final segment's mode.
    ///
    /// # Errors
    ///
    /// Fails without mutating if `index` is out of range or the trip would
    /// drop below [`MIN_STOPS`].
    pub fn remove(&mut self, index: usize) -> Result<Stop, ValidationError> {
        let len = self.stops.len();
        if index >= len {
            return Err(ValidationError::IndexOutOfRange { index, len });
        }
        if len <= MIN_STOPS {
            return Err(ValidationError::BelowMinimumStops { count: len, min: MIN_STOPS });
        }

        let removed = self.stops.remove(index);
        if index < self.modes.len() {
            self.modes.remove(index);
        } else {
            self.modes.pop();
        }
        for (i, stop) in self.stops.iter_mut().enumerate().skip(index) {
            stop.order_index = i;
        }
        Ok(removed)
    }

    /// Set the mode of the segment starting at stop `index`.
    ///
    /// # Errors
    ///
    /// The last stop has no outgoing segment; setting its mode is rejected, as
    /// is any index past the end.
    pub fn set_mode(&mut self, index: usize, mode: TransportMode) -> Result<(), ValidationError> {
        let len = self.stops.len();
        if index >= len {
            return Err(ValidationError::IndexOutOfRange { index, len });
        }
        let Some(slot) = self.modes.get_mut(index) else {
            return Err(ValidationError::TerminalStop { index });
        };
        *slot = mode;
        Ok(())
    }

    // --- Queries ---

    /// Segments between adjacent stops, derived fresh from current state.
    pub fn segments(&self) -> impl Iterator<Item = Segment<'_>> + '_ {
        self.stops
            .windows(2)
            .zip(self.modes.iter().copied())
            .map(|(pair, mode)| Segment { from: &pair[0], to: &pair[1], mode })
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.stops.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.stops.is_empty()
    }

    #[must_use]
    pub fn stops(&self) -> &[Stop] {
        &self.stops
    }

    /// One mode per segment, in order.
    #[must_use]
    pub fn modes(&self) -> &[TransportMode] {
        &self.modes
    }

    #[must_use]
    pub fn get(&self, index: usize) -> Option<&Stop> {
        self.stops.get(index)
    }

    /// Current order index of the stop with the given id.
    #[must_use]
    pub fn index_of(&self, id: StopId) -> Option<usize> {
        self.stops.iter().position(|s| s.id == id)
    }

    /// Whether `index` is the final stop (which has no assignable mode).
    #[must_use]
    pub fn is_last(&self, index: usize) -> bool {
        index + 1 == self.stops.len()
    }

    /// Snapshot of stop coordinates and modes for staleness checks.
    #[must_use]
    pub fn fingerprint(&self) -> Fingerprint {
        Fingerprint::new(self.stops.iter().map(Stop::position), self.modes.iter().copied())
    }
}
