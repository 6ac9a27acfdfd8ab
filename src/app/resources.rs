use std::path::PathBuf;
use std::time::{SystemTime, UNIX_EPOCH};

use bevy::prelude::*;
use vertex_tree::{ContentIds, Game, GeneratorId, LayerId, SessionConfig, TickEngine, UpgradeId};

#[derive(Resource, Debug, Clone, Default)]
pub struct RuntimeConfig {
    pub session: SessionConfig,
}

impl RuntimeConfig {
    pub fn save_path(&self) -> PathBuf {
        PathBuf::from(&self.session.save_path)
    }
}

#[derive(Resource, Debug)]
pub struct SessionState {
    pub game: Game,
    pub ids: ContentIds,
    pub engine: TickEngine,
    pub tick_timer: Timer,
    pub autosave_timer: Timer,
    /// Last action or save outcome worth showing on the HUD.
    pub status: Option<String>,
}

#[derive(Event, Debug, Clone, Copy)]
pub enum GameAction {
    Reset(LayerId),
    BuyUpgrade(UpgradeId),
    BuyGenerator(GeneratorId),
}

#[derive(Component)]
pub struct HudText;

pub fn unix_now() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_secs())
        .unwrap_or(0)
}
