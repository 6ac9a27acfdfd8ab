mod input;
mod resources;
mod setup;
mod simulation;
mod view;

use bevy::prelude::*;

pub use resources::RuntimeConfig;
use resources::GameAction;

#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash, States, Default)]
pub enum AppPhase {
    #[default]
    Boot,
    InGame,
}

#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash, States, Default)]
pub enum SimRunState {
    #[default]
    Running,
    Paused,
}

impl SimRunState {
    pub fn from_paused(paused: bool) -> Self {
        if paused { Self::Paused } else { Self::Running }
    }
}

pub struct VertexTreePlugin;

impl Plugin for VertexTreePlugin {
    fn build(&self, app: &mut App) {
        app.init_state::<AppPhase>()
            .init_state::<SimRunState>()
            .init_resource::<RuntimeConfig>()
            .add_event::<GameAction>()
            .add_systems(Startup, setup::spawn_camera)
            .add_systems(OnEnter(AppPhase::Boot), setup::bootstrap_session)
            .add_systems(OnEnter(AppPhase::InGame), view::spawn_hud)
            .add_systems(OnEnter(SimRunState::Running), simulation::mark_sim_running)
            .add_systems(OnEnter(SimRunState::Paused), simulation::mark_sim_paused)
            .add_systems(
                Update,
                (
                    input::handle_keyboard_controls,
                    simulation::handle_save_hotkeys,
                    simulation::apply_game_actions,
                    simulation::tick_game.run_if(in_state(SimRunState::Running)),
                    simulation::autosave_session,
                    view::refresh_hud,
                )
                    .chain()
                    .run_if(in_state(AppPhase::InGame)),
            );
    }
}
