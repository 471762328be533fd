use super::*;
use crate::position::LatLng;
use crate::stops::NewStop;

fn model_with(n: usize) -> StopListModel {
    let mut model = StopListModel::new();
    for i in 0..n {
        #[allow(clippy::cast_precision_loss)]
        let lat = i as f64;
        model.add(NewStop::new(format!("S{i}"), LatLng::new(lat, 0.0))).unwrap();
    }
    model
}

fn id_at(model: &StopListModel, index: usize) -> StopId {
    model.get(index).unwrap().id
}

#[test]
fn starts_collapsed() {
    let model = model_with(3);
    let selectors = ModeSelectors::new();
    assert_eq!(selectors.state(id_at(&model, 0), &model), SelectorState::Collapsed);
}

#[test]
fn toggle_expands_then_collapses() {
    let model = model_with(3);
    let mut selectors = ModeSelectors::new();
    let id = id_at(&model, 1);
    assert_eq!(selectors.toggle(id, &model), SelectorState::Expanded);
    assert_eq!(selectors.toggle(id, &model), SelectorState::Collapsed);
}

#[test]
fn last_stop_is_disabled_and_ignores_toggle() {
    let model = model_with(3);
    let mut selectors = ModeSelectors::new();
    let last = id_at(&model, 2);
    assert_eq!(selectors.state(last, &model), SelectorState::Disabled);
    assert_eq!(selectors.toggle(last, &model), SelectorState::Disabled);
}

#[test]
fn pick_sets_mode_and_collapses() {
    let mut model = model_with(3);
    let mut selectors = ModeSelectors::new();
    let id = id_at(&model, 0);
    selectors.toggle(id, &model);

    selectors.pick(id, TransportMode::Walk, &mut model).unwrap();
    assert_eq!(model.modes()[0], TransportMode::Walk);
    assert_eq!(selectors.state(id, &model), SelectorState::Collapsed);
}

#[test]
fn pick_on_stop_that_became_last_is_rejected() {
    let mut model = model_with(3);
    let mut selectors = ModeSelectors::new();
    let middle = id_at(&model, 1);
    selectors.toggle(middle, &model);
    model.remove(2).unwrap();

    let before = model.modes().to_vec();
    let err = selectors.pick(middle, TransportMode::Bus, &mut model).unwrap_err();
    assert_eq!(err, ValidationError::TerminalStop { index: 1 });
    assert_eq!(model.modes(), before.as_slice());
    assert_eq!(selectors.state(middle, &model), SelectorState::Disabled);
}

#[test]
fn state_follows_stop_through_renumbering() {
    let mut model = model_with(4);
    let mut selectors = ModeSelectors::new();
    let id = id_at(&model, 2);
    selectors.toggle(id, &model);
    model.remove(0).unwrap();

    assert_eq!(model.index_of(id), Some(1));
    assert_eq!(selectors.state(id, &model), SelectorState::Expanded);
    selectors.pick(id, TransportMode::Cycle, &mut model).unwrap();
    assert_eq!(model.modes()[1], TransportMode::Cycle);
}

#[test]
fn retain_prunes_removed_stops() {
    let mut model = model_with(3);
    let mut selectors = ModeSelectors::new();
    let first = id_at(&model, 0);
    let second = id_at(&model, 1);
    selectors.toggle(first, &model);
    selectors.toggle(second, &model);
    assert_eq!(selectors.len(), 2);

    model.remove(0).unwrap();
    selectors.retain(&model);
    assert_eq!(selectors.len(), 1);
    assert_eq!(selectors.state(first, &model), SelectorState::Disabled);
}

#[test]
fn stop_that_was_last_comes_back_collapsed() {
    let mut model = model_with(3);
    let mut selectors = ModeSelectors::new();
    let middle = id_at(&model, 1);
    assert_eq!(selectors.toggle(middle, &model), SelectorState::Expanded);

    model.remove(2).unwrap();
    selectors.retain(&model);
    assert_eq!(selectors.state(middle, &model), SelectorState::Disabled);

    model.add(NewStop::new("D", LatLng::new(9.0, 0.0))).unwrap();
    selectors.retain(&model);
    assert_eq!(selectors.state(middle, &model), SelectorState::Collapsed);
}

#[test]
fn unknown_stop_leaves_no_entry() {
    let mut model = model_with(2);
    let other = model_with(2);
    let stranger = id_at(&other, 0);
    let mut selectors = ModeSelectors::new();

    assert_eq!(selectors.toggle(stranger, &model), SelectorState::Disabled);
    let err = selectors.pick(stranger, TransportMode::Walk, &mut model).unwrap_err();
    assert_eq!(err, ValidationError::UnknownStop { id: stranger });
    assert!(selectors.is_empty());
}
