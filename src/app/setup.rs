use bevy::prelude::*;
use tracing::{error, info, warn};
use vertex_tree::{TickEngine, apply_save_data, build_game, read_save_file};

use super::resources::{RuntimeConfig, SessionState, unix_now};
use super::{AppPhase, SimRunState};

pub fn spawn_camera(mut commands: Commands) {
    commands.spawn((Name::new("PrimaryCamera"), Camera2d));
}

pub fn bootstrap_session(
    mut commands: Commands,
    config: Res<RuntimeConfig>,
    mut next_phase: ResMut<NextState<AppPhase>>,
    mut next_run_state: ResMut<NextState<SimRunState>>,
    mut exit: EventWriter<AppExit>,
) {
    let (mut game, ids) = match build_game() {
        Ok(built) => built,
        Err(err) => {
            error!(%err, "game content failed validation");
            exit.send(AppExit::error());
            return;
        }
    };
    let engine = TickEngine::new(config.session.dev_speed);

    let save_path = config.save_path();
    let mut paused = config.session.dev_speed == 0.0;
    if save_path.exists() {
        match read_save_file(&save_path).and_then(|save| {
            apply_save_data(&mut game, &save)?;
            Ok(save)
        }) {
            Ok(save) => {
                paused |= save.paused;
                let away = unix_now().saturating_sub(save.saved_at) as f64;
                if save.saved_at > 0 && !paused {
                    let report =
                        engine.catch_up(&mut game, away, config.session.offline_cap_seconds);
                    info!(away_seconds = away, advanced = report.advanced, "applied offline progress");
                }
                info!(path = %save_path.display(), "loaded save");
            }
            Err(err) => warn!(error = %format!("{err:#}"), "save unreadable, starting fresh"),
        }
    }

    next_run_state.set(SimRunState::from_paused(paused));

    let tick_seconds = config.session.tick_seconds() as f32;
    commands.insert_resource(SessionState {
        game,
        ids,
        engine,
        tick_timer: Timer::from_seconds(tick_seconds.max(0.01), TimerMode::Repeating),
        autosave_timer: Timer::from_seconds(
            (config.session.autosave_interval_seconds as f32).max(1.0),
            TimerMode::Repeating,
        ),
        status: None,
    });

    next_phase.set(AppPhase::InGame);
}
