use std::collections::BTreeMap;

use tracing::warn;

use crate::model::{FormulaError, GeneratorId, GeneratorOutput, Layer, LayerId, ResourceId};
use crate::num::Decimal;

use super::error::TickError;
use super::game::Game;

/// Net change a tick applied, per target.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TickReport {
    pub advanced: bool,
    pub resource_deltas: BTreeMap<ResourceId, Decimal>,
    pub bonus_deltas: BTreeMap<GeneratorId, Decimal>,
    pub skipped: Vec<(LayerId, TickError)>,
}

/// Inflow and outflow into one resource, kept apart so `total` sees every
/// positive contribution.
#[derive(Debug, Clone, Copy, Default)]
struct Flow {
    inflow: Decimal,
    outflow: Decimal,
}

impl Flow {
    fn push(&mut self, amount: Decimal) {
        if amount.is_negative() {
            self.outflow += amount;
        } else {
            self.inflow += amount;
        }
    }

    fn net(&self) -> Decimal {
        self.inflow + self.outflow
    }
}

#[derive(Debug, Default)]
struct PendingWrites {
    resources: BTreeMap<ResourceId, Flow>,
    bonus: BTreeMap<GeneratorId, Decimal>,
}

impl PendingWrites {
    fn merge(&mut self, other: PendingWrites) {
        for (id, flow) in other.resources {
            let slot = self.resources.entry(id).or_default();
            slot.inflow += flow.inflow;
            slot.outflow += flow.outflow;
        }
        for (id, amount) in other.bonus {
            *self.bonus.entry(id).or_default() += amount;
        }
    }
}

/// Advances production by elapsed time.
///
/// A tick reads every effect against the state as it was when the tick
/// began, nets the writes per target, then applies them. The result does
/// not depend on layer or generator order.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TickEngine {
    /// Multiplier on every `dt`; 1.0 outside of development.
    pub speed: f64,
}

impl Default for TickEngine {
    fn default() -> Self {
        Self { speed: 1.0 }
    }
}

impl TickEngine {
    pub fn new(speed: f64) -> Self {
        Self { speed }
    }

    pub fn advance(&self, game: &mut Game, dt: f64) -> TickReport {
        let mut report = TickReport::default();
        let scaled = dt * self.speed;
        if game.paused || !scaled.is_finite() || scaled <= 0.0 {
            return report;
        }
        let dt = Decimal::from_f64(scaled);

        let mut writes = PendingWrites::default();
        for layer in game.layers() {
            match plan_layer(game, layer, dt) {
                Ok(layer_writes) => writes.merge(layer_writes),
                Err(err) => {
                    warn!(layer = %layer.key, %err, "discarding layer production for this tick");
                    report.skipped.push((layer.id, err));
                }
            }
        }

        for (id, flow) in &writes.resources {
            if let Some(resource) = game.resources.get_mut(id.index()) {
                resource.add_flow(flow.inflow, flow.outflow);
            }
        }
        for (id, amount) in &writes.bonus {
            if let Some(generator) = game.generators.get_mut(id.index()) {
                generator.add_bonus(*amount);
            }
        }

        game.tick_index += 1;
        game.play_time += scaled;
        report.advanced = true;
        report.resource_deltas = writes
            .resources
            .iter()
            .map(|(id, flow)| (*id, flow.net()))
            .collect();
        report.bonus_deltas = writes.bonus;
        report
    }

    /// Applies time spent away as a single tick of at most `cap_seconds`.
    pub fn catch_up(&self, game: &mut Game, elapsed_seconds: f64, cap_seconds: f64) -> TickReport {
        if !elapsed_seconds.is_finite() || elapsed_seconds <= 0.0 {
            return TickReport::default();
        }
        self.advance(game, elapsed_seconds.min(cap_seconds.max(0.0)))
    }
}

fn plan_layer(game: &Game, layer: &Layer, dt: Decimal) -> Result<PendingWrites, TickError> {
    let mut writes = PendingWrites::default();

    for production in &layer.production {
        let amount = production.per_second.try_evaluate(game, Decimal::ZERO)? * dt;
        ensure_representable(amount, &layer.key)?;
        writes.resources.entry(production.resource).or_default().push(amount);
    }

    for id in &layer.generators {
        let generator = game
            .generator(*id)
            .ok_or(FormulaError::UnknownGenerator(*id))?;
        if generator.output == GeneratorOutput::None {
            continue;
        }
        let amount = generator.effect_value(game)? * dt;
        ensure_representable(amount, &generator.key)?;
        match generator.output {
            GeneratorOutput::Resource(resource) => {
                writes.resources.entry(resource).or_default().push(amount);
            }
            GeneratorOutput::Bonus(target) => {
                *writes.bonus.entry(target).or_default() += amount;
            }
            GeneratorOutput::None => {}
        }
    }

    Ok(writes)
}

fn ensure_representable(amount: Decimal, source: &str) -> Result<(), TickError> {
    if amount.abs() >= Decimal::MAX {
        return Err(TickError::NonFinite(source.to_string()));
    }
    Ok(())
}
