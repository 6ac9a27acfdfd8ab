use anyhow::{Result, bail};
use tracing::debug;

use crate::core::Game;

use super::{SAVE_VERSION, SaveData, SaveGenerator, SaveResource};

pub fn save_data_from_game(game: &Game, saved_at: u64) -> SaveData {
    let resources = game
        .resources()
        .iter()
        .map(|resource| {
            (
                resource.key.clone(),
                SaveResource {
                    value: resource.value(),
                    best: resource.best(),
                    total: resource.total(),
                },
            )
        })
        .collect();
    let generators = game
        .generators()
        .iter()
        .map(|generator| {
            (
                generator.key.clone(),
                SaveGenerator {
                    owned: generator.owned(),
                    bonus: generator.bonus(),
                },
            )
        })
        .collect();
    let upgrades = game
        .upgrades()
        .iter()
        .map(|upgrade| (upgrade.key.clone(), upgrade.is_bought()))
        .collect();

    SaveData {
        version: SAVE_VERSION,
        resources,
        generators,
        upgrades,
        total_ticks: game.tick_index,
        play_time: game.play_time,
        paused: game.paused,
        saved_at,
    }
}

/// Overwrites durable state from `save`. Keys the game does not know are
/// skipped; objects the save does not mention keep their current state.
pub fn apply_save_data(game: &mut Game, save: &SaveData) -> Result<()> {
    if save.version > SAVE_VERSION {
        bail!(
            "save version {} is newer than supported version {SAVE_VERSION}",
            save.version
        );
    }

    let mut skipped = 0usize;
    for (key, entry) in &save.resources {
        let Some(resource) = game
            .resources
            .iter_mut()
            .find(|resource| &resource.key == key)
        else {
            skipped += 1;
            continue;
        };
        resource.restore(entry.value, entry.best, entry.total);
    }
    for (key, entry) in &save.generators {
        let Some(generator) = game
            .generators
            .iter_mut()
            .find(|generator| &generator.key == key)
        else {
            skipped += 1;
            continue;
        };
        generator.restore(entry.owned, entry.bonus);
    }
    for (key, bought) in &save.upgrades {
        let Some(upgrade) = game.upgrades.iter_mut().find(|upgrade| &upgrade.key == key) else {
            skipped += 1;
            continue;
        };
        upgrade.set_bought(*bought);
    }
    if skipped > 0 {
        debug!(skipped, "ignored save entries with unknown keys");
    }

    game.tick_index = save.total_ticks;
    game.play_time = if save.play_time.is_finite() {
        save.play_time.max(0.0)
    } else {
        0.0
    };
    game.paused = save.paused;
    Ok(())
}
