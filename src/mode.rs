//! Transport modes and their fixed presentation.
//!
//! The set of modes is closed. Every lookup is an exhaustive `match`, so adding a
//! mode fails to compile until it has a color, icon and label.

#[cfg(test)]
#[path = "mode_test.rs"]
mod mode_test;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// How a segment between two stops is travelled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransportMode {
    #[default]
    Car,
    Walk,
    Bus,
    Cycle,
}

impl TransportMode {
    /// Every mode, in picker order.
    pub const ALL: [TransportMode; 4] = [Self::Car, Self::Walk, Self::Bus, Self::Cycle];

    /// Wire name (`"car"`, `"walk"`, ...).
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Car => "car",
            Self::Walk => "walk",
            Self::Bus => "bus",
            Self::Cycle => "cycle",
        }
    }

    /// Polyline stroke color as a CSS hex string.
    #[must_use]
    pub fn color(self) -> &'static str {
        match self {
            Self::Car => "#1E88E5",
            Self::Walk => "#43A047",
            Self::Bus => "#FB8C00",
            Self::Cycle => "#8E24AA",
        }
    }

    /// Icon name shown in the mode picker.
    #[must_use]
    pub fn icon(self) -> &'static str {
        match self {
            Self::Car => "car",
            Self::Walk => "walk",
            Self::Bus => "bus",
            Self::Cycle => "bicycle",
        }
    }

    /// Human-readable label.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Car => "Car",
            Self::Walk => "Walk",
            Self::Bus => "Bus",
            Self::Cycle => "Cycle",
        }
    }
}

impl fmt::Display for TransportMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returned when a string does not name a [`TransportMode`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown transport mode: {0}")]
pub struct UnknownMode(pub String);

impl FromStr for TransportMode {
    type Err = UnknownMode;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "car" => Ok(Self::Car),
            "walk" => Ok(Self::Walk),
            "bus" => Ok(Self::Bus),
            "cycle" => Ok(Self::Cycle),
            other => Err(UnknownMode(other.to_owned())),
        }
    }
}
