//! Mode picker state for each stop row.
//!
//! A selector is either collapsed or expanded. Picking a mode writes through to
//! [`StopListModel::set_mode`] and collapses the picker. The last stop has no
//! outgoing segment, so its selector reports [`SelectorState::Disabled`] and
//! ignores toggles. State is keyed by stop id so it follows the stop when
//! earlier stops are removed.

#[cfg(test)]
#[path = "selector_test.rs"]
mod selector_test;

use std::collections::HashMap;

use crate::error::ValidationError;
use crate::mode::TransportMode;
use crate::stops::{StopId, StopListModel};

/// What a stop row's mode picker currently shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SelectorState {
    /// Shows the current mode only.
    #[default]
    Collapsed,
    /// Shows every mode for picking.
    Expanded,
    /// No picker at all (last stop, or the stop is gone).
    Disabled,
}

/// Expand/collapse state for a single stop.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ModeSelector {
    expanded: bool,
}

impl ModeSelector {
    /// Resolve the visible state against the model.
    #[must_use]
    pub fn state(self, stop: StopId, model: &StopListModel) -> SelectorState {
        match model.index_of(stop) {
            Some(index) if !model.is_last(index) => {
                if self.expanded {
                    SelectorState::Expanded
                } else {
                    SelectorState::Collapsed
                }
            }
            _ => SelectorState::Disabled,
        }
    }

    /// Flip between collapsed and expanded. No-op while disabled.
    pub fn toggle(&mut self, stop: StopId, model: &StopListModel) -> SelectorState {
        match self.state(stop, model) {
            SelectorState::Disabled => self.expanded = false,
            SelectorState::Collapsed | SelectorState::Expanded => self.expanded = !self.expanded,
        }
        self.state(stop, model)
    }

    /// Assign `mode` to the stop's outgoing segment and collapse.
    ///
    /// # Errors
    ///
    /// Propagates the model's rejection (stop gone or now last). The selector
    /// collapses either way.
    pub fn pick(&mut self, stop: StopId, mode: TransportMode, model: &mut StopListModel) -> Result<(), ValidationError> {
        self.expanded = false;
        let Some(index) = model.index_of(stop) else {
            return Err(ValidationError::UnknownStop { id: stop });
        };
        model.set_mode(index, mode)
    }
}

/// All selectors on the screen, keyed by stop id.
#[derive(Debug, Clone, Default)]
pub struct ModeSelectors {
    selectors: HashMap<StopId, ModeSelector>,
}

impl ModeSelectors {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn state(&self, stop: StopId, model: &StopListModel) -> SelectorState {
        self.selectors
            .get(&stop)
            .copied()
            .unwrap_or_default()
            .state(stop, model)
    }

    /// Toggle the stop's picker. Unknown stops report `Disabled` and leave no
    /// entry behind.
    pub fn toggle(&mut self, stop: StopId, model: &StopListModel) -> SelectorState {
        if model.index_of(stop).is_none() {
            return SelectorState::Disabled;
        }
        self.selectors.entry(stop).or_default().toggle(stop, model)
    }

    /// See [`ModeSelector::pick`].
    ///
    /// # Errors
    ///
    /// Propagates the model's rejection.
    pub fn pick(&mut self, stop: StopId, mode: TransportMode, model: &mut StopListModel) -> Result<(), ValidationError> {
        if model.index_of(stop).is_none() {
            return Err(ValidationError::UnknownStop { id: stop });
        }
        self.selectors.entry(stop).or_default().pick(stop, mode, model)
    }

    /// Drop selectors whose stop no longer exists and collapse the last stop's,
    /// so a stop that stops being last comes back collapsed.
    pub fn retain(&mut self, model: &StopListModel) {
        let last = model.stops().last().map(|s| s.id);
        self.selectors.retain(|id, _| model.index_of(*id).is_some());
        if let Some(selector) = last.and_then(|id| self.selectors.get_mut(&id)) {
            selector.expanded = false;
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.selectors.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.selectors.is_empty()
    }
}
