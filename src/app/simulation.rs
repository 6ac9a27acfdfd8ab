use std::path::Path;

use bevy::prelude::*;
use tracing::{info, warn};
use vertex_tree::{apply_save_data, read_save_file, save_data_from_game, write_save_file};

use super::SimRunState;
use super::resources::{GameAction, RuntimeConfig, SessionState, unix_now};

pub fn apply_game_actions(mut actions: EventReader<GameAction>, mut session: ResMut<SessionState>) {
    for action in actions.read() {
        let outcome = match *action {
            GameAction::Reset(layer) => session.game.request_reset(layer).map(|report| {
                format!(
                    "Reset gained {} ({} layers)",
                    report.gained.format(0),
                    report.layers_reset.len()
                )
            }),
            GameAction::BuyUpgrade(upgrade) => session
                .game
                .purchase_upgrade(upgrade)
                .map(|()| "Upgrade bought".to_string()),
            GameAction::BuyGenerator(generator) => session
                .game
                .purchase_default(generator)
                .map(|receipt| format!("Bought {} for {}", receipt.count, receipt.cost.format(2))),
        };
        session.status = Some(match outcome {
            Ok(message) => message,
            Err(err) => err.to_string(),
        });
    }
}

pub fn tick_game(time: Res<Time>, mut session: ResMut<SessionState>) {
    let steps = session
        .tick_timer
        .tick(time.delta())
        .times_finished_this_tick();
    let dt = session.tick_timer.duration().as_secs_f64();

    let SessionState { game, engine, .. } = &mut *session;
    for _ in 0..steps {
        engine.advance(game, dt);
    }
}

pub fn handle_save_hotkeys(
    keys: Res<ButtonInput<KeyCode>>,
    config: Res<RuntimeConfig>,
    mut session: ResMut<SessionState>,
    mut next_run_state: ResMut<NextState<SimRunState>>,
) {
    if keys.just_pressed(KeyCode::F5) {
        save_session(&mut session, &config, "manual save");
    }
    if keys.just_pressed(KeyCode::F9) {
        let path = config.save_path();
        session.status = Some(match load_session(&mut session, &path) {
            Ok(run_state) => {
                next_run_state.set(run_state);
                info!(path = %path.display(), ?run_state, "loaded save");
                "Loaded".to_string()
            }
            Err(err) => {
                warn!(error = %format!("{err:#}"), "load failed");
                format!("Load failed: {err}")
            }
        });
    }
}

pub fn autosave_session(
    time: Res<Time>,
    config: Res<RuntimeConfig>,
    mut session: ResMut<SessionState>,
) {
    if session.autosave_timer.tick(time.delta()).just_finished() {
        save_session(&mut session, &config, "autosave");
    }
}

pub fn mark_sim_running(session: Option<ResMut<SessionState>>) {
    if let Some(mut session) = session {
        session.game.paused = false;
    }
}

pub fn mark_sim_paused(session: Option<ResMut<SessionState>>) {
    if let Some(mut session) = session {
        session.game.paused = true;
    }
}

/// Applies the save at `path` and returns the run state its pause flag
/// calls for.
fn load_session(session: &mut SessionState, path: &Path) -> anyhow::Result<SimRunState> {
    let save = read_save_file(path)?;
    apply_save_data(&mut session.game, &save)?;
    Ok(SimRunState::from_paused(session.game.paused))
}

fn save_session(session: &mut SessionState, config: &RuntimeConfig, label: &str) {
    let path = config.save_path();
    let save = save_data_from_game(&session.game, unix_now());
    match write_save_file(&path, &save) {
        Ok(()) => {
            info!(path = %path.display(), label, "saved");
            session.status = Some(format!("Saved ({label})"));
        }
        Err(err) => {
            warn!(error = %format!("{err:#}"), label, "save failed");
            session.status = Some(format!("Save failed: {err}"));
        }
    }
}
