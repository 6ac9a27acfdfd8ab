use std::fmt::Write as _;

use bevy::prelude::*;
use vertex_tree::model::rate::growth_rate;
use vertex_tree::{Game, LayerId, StateView};

use super::SimRunState;
use super::resources::{HudText, SessionState};

pub fn spawn_hud(mut commands: Commands) {
    commands.spawn((
        Name::new("HudText"),
        HudText,
        Text::new("Initializing..."),
        TextFont {
            font_size: 18.0,
            ..default()
        },
        TextColor(Color::srgb(0.94, 0.97, 0.99)),
        Node {
            position_type: PositionType::Absolute,
            left: Val::Px(12.0),
            top: Val::Px(10.0),
            ..default()
        },
    ));
}

pub fn refresh_hud(
    session: Res<SessionState>,
    run_state: Res<State<SimRunState>>,
    mut hud_query: Query<&mut Text, With<HudText>>,
) {
    let Ok(mut hud) = hud_query.get_single_mut() else {
        return;
    };

    let game = &session.game;
    let ids = &session.ids;
    let run_label = match run_state.get() {
        SimRunState::Running => "RUNNING",
        SimRunState::Paused => "PAUSED",
    };

    let mut out = String::new();
    if let Some(points) = game.resource(ids.points) {
        let rate = game.production_rate(ids.points).unwrap_or_default();
        let _ = writeln!(
            out,
            "You have {} {}  ({})",
            points.value().format(points.precision),
            points.name,
            growth_rate(points.value(), rate)
        );
    }
    let _ = writeln!(out, "Mode: {run_label}  Tick: {}", game.tick_index);

    let reset_keys = [(ids.lines, "L"), (ids.irregular, "I"), (ids.alpha, "A")];
    for layer in game.tree().rows().iter().flatten() {
        if let Some((_, hotkey)) = reset_keys.iter().find(|(id, _)| id == layer) {
            layer_line(&mut out, game, hotkey, *layer);
        }
    }

    let _ = write!(out, "Vertex upgrades:");
    for (slot, id) in ids.vertex_upgrades.iter().enumerate() {
        let state = match game.upgrade_bought(*id) {
            Some(true) => "bought".to_string(),
            _ if !game.is_upgrade_visible(*id) => "locked".to_string(),
            _ => game
                .upgrade_cost(*id)
                .map(|cost| cost.format(0))
                .unwrap_or_else(|_| "?".to_string()),
        };
        let _ = write!(out, "  [{}] {state}", slot + 1);
    }
    let _ = writeln!(out);

    let generators = [
        ("5", ids.vertex_repeatable),
        ("G", ids.alpha_generators[0]),
        ("H", ids.alpha_generators[1]),
    ];
    for (key, id) in generators {
        let Some(generator) = game.generator(id) else {
            continue;
        };
        if !game.is_generator_visible(id) {
            continue;
        }
        let cost = game
            .generator_cost(id)
            .map(|cost| cost.format(2))
            .unwrap_or_else(|_| "?".to_string());
        let _ = writeln!(
            out,
            "[{key}] {}: {} (+{})  next {cost}",
            generator.name,
            generator.owned().format(0),
            generator.bonus().format(2),
        );
    }

    let _ = writeln!(out, "L/I/A reset, 1-5 G H buy, Space/P pause, F5 save, F9 load");
    if let Some(status) = &session.status {
        let _ = write!(out, "{status}");
    }

    *hud = Text::new(out);
}

fn layer_line(out: &mut String, game: &Game, hotkey: &str, layer: LayerId) {
    let Some(entry) = game.layer(layer) else {
        return;
    };
    if !game.is_layer_visible(layer) {
        return;
    }
    let held = entry
        .conversion
        .as_ref()
        .and_then(|conversion| game.resource(conversion.gain))
        .map(|resource| resource.value().format(0))
        .unwrap_or_default();
    let pending = game
        .pending_gain(layer)
        .map(|gain| gain.format(0))
        .unwrap_or_else(|_| "?".to_string());
    let _ = writeln!(out, "[{hotkey}] {}: {held}  reset for +{pending}", entry.name);
}
