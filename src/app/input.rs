use bevy::prelude::*;

use super::SimRunState;
use super::resources::{GameAction, SessionState};

const UPGRADE_KEYS: [KeyCode; 4] = [
    KeyCode::Digit1,
    KeyCode::Digit2,
    KeyCode::Digit3,
    KeyCode::Digit4,
];

pub fn handle_keyboard_controls(
    keys: Res<ButtonInput<KeyCode>>,
    session: Res<SessionState>,
    run_state: Res<State<SimRunState>>,
    mut next_run_state: ResMut<NextState<SimRunState>>,
    mut actions: EventWriter<GameAction>,
) {
    let ids = &session.ids;

    if keys.just_pressed(KeyCode::KeyL) {
        actions.send(GameAction::Reset(ids.lines));
    }
    if keys.just_pressed(KeyCode::KeyI) {
        actions.send(GameAction::Reset(ids.irregular));
    }
    if keys.just_pressed(KeyCode::KeyA) {
        actions.send(GameAction::Reset(ids.alpha));
    }

    for (key, upgrade) in UPGRADE_KEYS.iter().zip(ids.vertex_upgrades) {
        if keys.just_pressed(*key) {
            actions.send(GameAction::BuyUpgrade(upgrade));
        }
    }
    if keys.just_pressed(KeyCode::Digit5) {
        actions.send(GameAction::BuyGenerator(ids.vertex_repeatable));
    }
    if keys.just_pressed(KeyCode::KeyG) {
        actions.send(GameAction::BuyGenerator(ids.alpha_generators[0]));
    }
    if keys.just_pressed(KeyCode::KeyH) {
        actions.send(GameAction::BuyGenerator(ids.alpha_generators[1]));
    }

    if keys.just_pressed(KeyCode::Space) || keys.just_pressed(KeyCode::KeyP) {
        let next = match run_state.get() {
            SimRunState::Running => SimRunState::Paused,
            SimRunState::Paused => SimRunState::Running,
        };
        next_run_state.set(next);
    }
}
