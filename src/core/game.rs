use std::collections::{HashSet, VecDeque};

use petgraph::algo::is_cyclic_directed;
use petgraph::graph::DiGraph;
use tracing::info;

use crate::model::{
    Formula, FormulaError, Generator, GeneratorCounts, GeneratorId, GeneratorOutput, Layer,
    LayerId, MAX_BULK, Purchasable, PurchaseMode, Reference, ResetPhase, ResetRule, Resource,
    ResourceId, StateView, Upgrade, UpgradeId,
};
use crate::num::Decimal;

use super::error::ActionError;
use super::tick::{TickEngine, TickReport};
use super::tree::Tree;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PurchaseReceipt {
    pub count: u64,
    pub cost: Decimal,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResetReport {
    /// Gain credited by the requested layer's own conversion.
    pub gained: Decimal,
    /// Every layer that went through `Resetting`, requested layer first.
    pub layers_reset: Vec<LayerId>,
}

/// Registry owning every piece of game state, addressed by typed ids.
///
/// Built once through [`super::GameBuilder`]; the set of objects never
/// changes afterwards, only their values.
#[derive(Debug, Clone)]
pub struct Game {
    pub(crate) layers: Vec<Layer>,
    pub(crate) resources: Vec<Resource>,
    pub(crate) resource_owners: Vec<LayerId>,
    pub(crate) generators: Vec<Generator>,
    pub(crate) upgrades: Vec<Upgrade>,
    pub(crate) tree: Tree,
    pub paused: bool,
    pub tick_index: u64,
    /// Simulated seconds, scaled by the engine speed.
    pub play_time: f64,
}

impl Game {
    pub fn layers(&self) -> &[Layer] {
        &self.layers
    }

    pub fn resources(&self) -> &[Resource] {
        &self.resources
    }

    pub fn generators(&self) -> &[Generator] {
        &self.generators
    }

    pub fn upgrades(&self) -> &[Upgrade] {
        &self.upgrades
    }

    pub fn tree(&self) -> &Tree {
        &self.tree
    }

    pub fn layer(&self, id: LayerId) -> Option<&Layer> {
        self.layers.get(id.index())
    }

    pub fn resource(&self, id: ResourceId) -> Option<&Resource> {
        self.resources.get(id.index())
    }

    pub fn generator(&self, id: GeneratorId) -> Option<&Generator> {
        self.generators.get(id.index())
    }

    pub fn upgrade(&self, id: UpgradeId) -> Option<&Upgrade> {
        self.upgrades.get(id.index())
    }

    pub fn layer_id(&self, key: &str) -> Option<LayerId> {
        self.layers.iter().find(|layer| layer.key == key).map(|layer| layer.id)
    }

    pub fn resource_id(&self, key: &str) -> Option<ResourceId> {
        self.resources
            .iter()
            .position(|resource| resource.key == key)
            .map(ResourceId)
    }

    pub fn generator_id(&self, key: &str) -> Option<GeneratorId> {
        self.generators
            .iter()
            .position(|generator| generator.key == key)
            .map(GeneratorId)
    }

    pub fn upgrade_id(&self, key: &str) -> Option<UpgradeId> {
        self.upgrades
            .iter()
            .position(|upgrade| upgrade.key == key)
            .map(UpgradeId)
    }

    pub fn resource_owner(&self, id: ResourceId) -> Option<LayerId> {
        self.resource_owners.get(id.index()).copied()
    }

    pub fn is_layer_visible(&self, id: LayerId) -> bool {
        self.layer(id)
            .is_some_and(|layer| layer.visibility.check(self))
    }

    pub fn is_generator_visible(&self, id: GeneratorId) -> bool {
        self.generator(id)
            .is_some_and(|generator| self.is_layer_visible(generator.layer) && generator.is_visible(self))
    }

    pub fn is_upgrade_visible(&self, id: UpgradeId) -> bool {
        self.upgrade(id)
            .is_some_and(|upgrade| self.is_layer_visible(upgrade.layer) && upgrade.is_visible(self))
    }

    /// True when no layer's visibility depends, directly or through other
    /// layers, on itself.
    pub fn visibility_is_acyclic(&self) -> bool {
        let mut graph = DiGraph::<LayerId, ()>::new();
        let nodes = self
            .layers
            .iter()
            .map(|layer| graph.add_node(layer.id))
            .collect::<Vec<_>>();

        for layer in &self.layers {
            for reference in layer.visibility.references() {
                let Some(owner) = self.owner_of(reference) else {
                    continue;
                };
                if owner != layer.id {
                    graph.update_edge(nodes[layer.id.index()], nodes[owner.index()], ());
                }
            }
        }

        !is_cyclic_directed(&graph)
    }

    fn owner_of(&self, reference: Reference) -> Option<LayerId> {
        match reference {
            Reference::Resource(id) => self.resource_owner(id),
            Reference::Generator(id) => self.generator(id).map(|generator| generator.layer),
            Reference::Upgrade(id) => self.upgrade(id).map(|upgrade| upgrade.layer),
            Reference::Layer(id) => self.layer(id).map(|layer| layer.id),
        }
    }

    /// Current value of a generator's effect formula.
    pub fn generator_effect(&self, id: GeneratorId) -> Result<Decimal, ActionError> {
        let generator = self.generator(id).ok_or(ActionError::UnknownGenerator(id))?;
        Ok(generator.effect_value(self)?)
    }

    pub fn generator_cost(&self, id: GeneratorId) -> Result<Decimal, ActionError> {
        let generator = self.generator(id).ok_or(ActionError::UnknownGenerator(id))?;
        Ok(generator.next_cost(self)?)
    }

    pub fn upgrade_cost(&self, id: UpgradeId) -> Result<Decimal, ActionError> {
        let upgrade = self.upgrade(id).ok_or(ActionError::UnknownUpgrade(id))?;
        Ok(upgrade.next_cost(self)?)
    }

    pub fn can_afford_generator(&self, id: GeneratorId) -> bool {
        self.generator(id)
            .is_some_and(|generator| generator.can_afford(self))
    }

    pub fn can_afford_upgrade(&self, id: UpgradeId) -> bool {
        self.upgrade(id)
            .is_some_and(|upgrade| !upgrade.is_bought() && upgrade.can_afford(self))
    }

    /// What resetting `layer` right now would credit to its gain resource.
    pub fn pending_gain(&self, layer: LayerId) -> Result<Decimal, ActionError> {
        let layer = self.layer(layer).ok_or(ActionError::UnknownLayer(layer))?;
        match &layer.conversion {
            Some(conversion) => Ok(conversion.pending_gain(self)?),
            None => Ok(Decimal::ZERO),
        }
    }

    /// Per-second inflow into `resource` from passive production and
    /// generators, as the next tick would see it.
    pub fn production_rate(&self, resource: ResourceId) -> Result<Decimal, FormulaError> {
        let mut rate = Decimal::ZERO;
        for layer in &self.layers {
            for production in layer.production.iter().filter(|entry| entry.resource == resource) {
                rate += production.per_second.try_evaluate(self, Decimal::ZERO)?;
            }
        }
        for generator in &self.generators {
            if generator.output == GeneratorOutput::Resource(resource) {
                rate += generator.effect_value(self)?;
            }
        }
        Ok(rate)
    }

    pub fn evaluate(&self, formula: &Formula, variable: Decimal) -> Decimal {
        formula.evaluate(self, variable)
    }

    /// Advances one tick at normal speed.
    pub fn tick(&mut self, dt: f64) -> TickReport {
        TickEngine::default().advance(self, dt)
    }

    pub fn purchase_default(&mut self, id: GeneratorId) -> Result<PurchaseReceipt, ActionError> {
        let mode = self
            .generator(id)
            .ok_or(ActionError::UnknownGenerator(id))?
            .purchase_mode;
        self.purchase(id, mode)
    }

    pub fn purchase(
        &mut self,
        id: GeneratorId,
        mode: PurchaseMode,
    ) -> Result<PurchaseReceipt, ActionError> {
        let generator = self.generator(id).ok_or(ActionError::UnknownGenerator(id))?;
        if !self.is_generator_visible(id) {
            return Err(ActionError::Locked(generator.name.clone()));
        }

        let requirement = &generator.cost;
        let owned = generator.owned();
        let (count, cost) = match mode {
            PurchaseMode::One => (1, requirement.cost_at(self, owned)?),
            PurchaseMode::Max => {
                let budget = self
                    .resource_value(requirement.resource)
                    .ok_or(FormulaError::UnknownResource(requirement.resource))?;
                let affordable = requirement.max_affordable(self, owned, budget, MAX_BULK)?;
                if affordable.count == 0 {
                    // Report the single next unit the player is short of.
                    (1, requirement.cost_at(self, owned)?)
                } else {
                    (affordable.count, affordable.total_cost)
                }
            }
        };
        let resource = requirement.resource;
        let name = generator.name.clone();

        self.spend(resource, cost)?;
        if let Some(generator) = self.generators.get_mut(id.index()) {
            generator.add_owned(count);
        }
        info!(generator = %name, count, cost = %cost.format(2), "purchased generator");
        Ok(PurchaseReceipt { count, cost })
    }

    pub fn purchase_upgrade(&mut self, id: UpgradeId) -> Result<(), ActionError> {
        let upgrade = self.upgrade(id).ok_or(ActionError::UnknownUpgrade(id))?;
        if upgrade.is_bought() {
            return Err(ActionError::AlreadyBought(upgrade.key.clone()));
        }
        if !self.is_upgrade_visible(id) {
            return Err(ActionError::Locked(upgrade.key.clone()));
        }

        let cost = upgrade.next_cost(self)?;
        let resource = upgrade.cost.resource;
        let key = upgrade.key.clone();

        self.spend(resource, cost)?;
        if let Some(upgrade) = self.upgrades.get_mut(id.index()) {
            upgrade.set_bought(true);
        }
        info!(upgrade = %key, cost = %cost.format(2), "purchased upgrade");
        Ok(())
    }

    fn spend(&mut self, resource: ResourceId, amount: Decimal) -> Result<(), ActionError> {
        let slot = self
            .resources
            .get_mut(resource.index())
            .ok_or(FormulaError::UnknownResource(resource))?;
        if slot.try_spend(amount) {
            return Ok(());
        }
        Err(ActionError::InsufficientResource {
            resource: slot.name.clone(),
            required: amount,
            available: slot.value(),
        })
    }

    /// Converts `layer`, then reinitializes it and everything its branches
    /// reach.
    ///
    /// Only the requested layer converts; cascaded layers apply their reset
    /// rule alone. The conversion runs before anything else is touched, so a
    /// malformed conversion leaves the game unchanged. Descendants reached
    /// through several branches reset once.
    pub fn request_reset(&mut self, layer: LayerId) -> Result<ResetReport, ActionError> {
        let origin = self.layer(layer).ok_or(ActionError::UnknownLayer(layer))?;
        if !origin.visibility.check(self) {
            return Err(ActionError::Locked(origin.name.clone()));
        }
        let origin_key = origin.key.clone();

        let gained = self.apply_conversion(layer)?;
        let mut report = ResetReport {
            gained,
            layers_reset: Vec::new(),
        };
        let mut seen = HashSet::from([layer]);
        let mut queue = VecDeque::from([layer]);
        self.set_phase(layer, ResetPhase::ResetRequested);

        while let Some(current) = queue.pop_front() {
            if self.layer(current).map(Layer::phase) == Some(ResetPhase::Resetting) {
                continue;
            }
            self.set_phase(current, ResetPhase::Resetting);

            if let Some(rule) = self.layer(current).map(|entry| entry.reset_rule.clone()) {
                self.apply_reset_rule(&rule);
            }

            for child in self.tree.children(current) {
                if seen.insert(child) {
                    self.set_phase(child, ResetPhase::ResetRequested);
                    queue.push_back(child);
                }
            }
            report.layers_reset.push(current);
        }

        let on_reset = self.tree.on_reset().clone();
        self.apply_reset_rule(&on_reset);
        for id in &report.layers_reset {
            self.set_phase(*id, ResetPhase::Idle);
        }

        info!(
            layer = %origin_key,
            gained = %report.gained.format(2),
            cascaded = report.layers_reset.len().saturating_sub(1),
            "layer reset"
        );
        Ok(report)
    }

    fn set_phase(&mut self, layer: LayerId, phase: ResetPhase) {
        if let Some(layer) = self.layers.get_mut(layer.index()) {
            layer.phase = phase;
        }
    }

    /// Raises the layer's gain resource to its conversion target. Never
    /// lowers it.
    fn apply_conversion(&mut self, layer: LayerId) -> Result<Decimal, FormulaError> {
        let Some(conversion) = self.layer(layer).and_then(|entry| entry.conversion.clone()) else {
            return Ok(Decimal::ZERO);
        };
        let target = conversion.target(self)?;
        let gain = self
            .resources
            .get_mut(conversion.gain.index())
            .ok_or(FormulaError::UnknownResource(conversion.gain))?;
        let gained = (target - gain.value()).max(Decimal::ZERO);
        if gained.is_positive() {
            gain.set(target);
        }
        Ok(gained)
    }

    pub(crate) fn apply_reset_rule(&mut self, rule: &ResetRule) {
        if rule.is_empty() {
            return;
        }
        let mut resources = rule.resources.clone();
        let mut generators = rule.generators.clone();
        let mut upgrades = rule.upgrades.clone();
        for layer in rule.layers.iter().filter_map(|id| self.layers.get(id.index())) {
            resources.extend_from_slice(&layer.resources);
            generators.extend_from_slice(&layer.generators);
            upgrades.extend_from_slice(&layer.upgrades);
        }

        for id in resources {
            if let Some(resource) = self.resources.get_mut(id.index()) {
                resource.reset();
            }
        }
        for id in generators {
            if let Some(generator) = self.generators.get_mut(id.index()) {
                generator.reset();
            }
        }
        for id in upgrades {
            if let Some(upgrade) = self.upgrades.get_mut(id.index()) {
                upgrade.set_bought(false);
            }
        }
    }
}

impl StateView for Game {
    fn resource_value(&self, id: ResourceId) -> Option<Decimal> {
        self.resource(id).map(Resource::value)
    }

    fn generator_counts(&self, id: GeneratorId) -> Option<GeneratorCounts> {
        self.generator(id).map(|generator| GeneratorCounts {
            owned: generator.owned(),
            bonus: generator.bonus(),
        })
    }

    fn upgrade_bought(&self, id: UpgradeId) -> Option<bool> {
        self.upgrade(id).map(Upgrade::is_bought)
    }

    fn upgrades_bought_in(&self, layer: LayerId) -> Option<usize> {
        self.layer(layer).map(|layer| {
            layer
                .upgrades
                .iter()
                .filter(|id| self.upgrade_bought(**id) == Some(true))
                .count()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::Game;
    use crate::core::{ActionError, Branch, GameBuilder, TopologyError};
    use crate::model::{
        Condition, Conversion, CostRequirement, Formula, FormulaError, Generator, GeneratorId,
        LayerId, PurchaseMode, ResetPhase, ResetRule, Resource, ResourceId, StateView, Upgrade,
        UpgradeId,
    };
    use crate::num::Decimal;

    struct Fixture {
        game: Game,
        child: LayerId,
        top: LayerId,
        points: ResourceId,
        shards: ResourceId,
        crowns: ResourceId,
        miner: GeneratorId,
        boost: UpgradeId,
    }

    fn fixture() -> Fixture {
        let mut builder = GameBuilder::new();
        let main = builder.layer("main", "Main");
        let child = builder.layer("c", "Child");
        let top = builder.layer("t", "Top");
        let points = builder.resource(
            main,
            Resource::new("main.points", "points", 10).with_best().with_total(),
        );
        let shards = builder.resource(child, Resource::new("c.points", "shards", 0));
        let crowns = builder.resource(top, Resource::new("t.points", "crowns", 0));
        let miner = builder.generator(
            child,
            Generator::new(
                "c.miner",
                "miner",
                CostRequirement::new(shards, Formula::variable().add(1)),
            ),
        );
        let boost = builder.upgrade(
            child,
            Upgrade::new("c.boost", "unlocks with the first miner", CostRequirement::new(shards, 2))
                .visible_when(Condition::GeneratorOwned {
                    generator: miner,
                    at_least: Decimal::ONE,
                }),
        );
        builder.conversion(
            child,
            Conversion::cumulative(points, shards, Formula::variable().div(5).sqrt()),
        );
        builder.conversion(top, Conversion::cumulative(shards, crowns, Formula::variable()));
        builder.reset_rule(child, ResetRule::resources([points]));
        builder.reset_rule(top, ResetRule::whole_layer(child));

        let game = builder
            .build(
                vec![vec![child], vec![top]],
                &[Branch::new(top, child)],
                ResetRule::default(),
            )
            .expect("fixture should build");

        Fixture {
            game,
            child,
            top,
            points,
            shards,
            crowns,
            miner,
            boost,
        }
    }

    fn set(game: &mut Game, id: ResourceId, value: i32) {
        game.resources[id.index()].set(Decimal::from(value));
    }

    fn value(game: &Game, id: ResourceId) -> Decimal {
        game.resource_value(id).expect("known resource")
    }

    #[test]
    fn reset_converts_then_second_reset_gains_nothing() {
        let Fixture {
            mut game,
            child,
            points,
            shards,
            ..
        } = fixture();
        set(&mut game, points, 125);

        let first = game.request_reset(child).expect("reset");
        assert_eq!(first.gained, Decimal::from(5));
        assert_eq!(first.layers_reset, vec![child]);
        assert_eq!(value(&game, shards), Decimal::from(5));
        assert_eq!(value(&game, points), Decimal::from(10));

        let second = game.request_reset(child).expect("reset");
        assert_eq!(second.gained, Decimal::ZERO);
        assert_eq!(value(&game, shards), Decimal::from(5));
        assert_eq!(value(&game, points), Decimal::from(10));
    }

    #[test]
    fn reset_cascades_to_branch_targets_and_keeps_trackers() {
        let Fixture {
            mut game,
            child,
            top,
            points,
            shards,
            crowns,
            miner,
            ..
        } = fixture();
        set(&mut game, shards, 7);
        game.generators[miner.index()].add_owned(3);
        set(&mut game, points, 125);

        let report = game.request_reset(top).expect("reset");

        assert_eq!(report.gained, Decimal::from(7));
        assert_eq!(report.layers_reset, vec![top, child]);
        assert_eq!(value(&game, crowns), Decimal::from(7));
        assert_eq!(value(&game, shards), Decimal::ZERO);
        assert_eq!(value(&game, points), Decimal::from(10));
        assert_eq!(game.generator(miner).map(|g| g.owned()), Some(Decimal::ZERO));

        let tracked = game.resource(points).expect("points");
        assert_eq!(tracked.best(), Some(Decimal::from(125)));
        assert_eq!(tracked.total(), Some(Decimal::from(125)));
        assert!(game.layers().iter().all(|layer| layer.phase() == ResetPhase::Idle));
    }

    #[test]
    fn cascaded_layers_do_not_convert_so_repeat_resets_are_stable() {
        let Fixture {
            mut game,
            top,
            points,
            shards,
            crowns,
            miner,
            ..
        } = fixture();
        set(&mut game, shards, 7);
        game.generators[miner.index()].add_owned(2);
        set(&mut game, points, 125);

        let snapshot = |game: &Game| {
            (
                value(game, points),
                value(game, shards),
                value(game, crowns),
                game.generator(miner).map(|g| g.owned()),
            )
        };

        let first = game.request_reset(top).expect("reset");
        let once = snapshot(&game);
        let second = game.request_reset(top).expect("reset");

        assert_eq!(first.gained, Decimal::from(7));
        assert_eq!(second.gained, Decimal::ZERO);
        assert_eq!(snapshot(&game), once);
        assert_eq!(
            once,
            (Decimal::from(10), Decimal::ZERO, Decimal::from(7), Some(Decimal::ZERO))
        );
    }

    #[test]
    fn shared_descendants_reset_once() {
        let mut builder = GameBuilder::new();
        let root = builder.layer("root", "Root");
        let left = builder.layer("left", "Left");
        let right = builder.layer("right", "Right");
        let leaf = builder.layer("leaf", "Leaf");
        let mut game = builder
            .build(
                vec![vec![leaf], vec![left, right], vec![root]],
                &[
                    Branch::new(root, left),
                    Branch::new(root, right),
                    Branch::new(left, leaf),
                    Branch::new(right, leaf),
                ],
                ResetRule::default(),
            )
            .expect("diamond builds");

        let report = game.request_reset(root).expect("reset");

        assert_eq!(report.layers_reset, vec![root, left, right, leaf]);
    }

    #[test]
    fn malformed_conversion_aborts_before_any_change() {
        let Fixture {
            mut game,
            child,
            points,
            shards,
            ..
        } = fixture();
        set(&mut game, points, 125);
        game.layers[child.index()].conversion = Some(Conversion::cumulative(
            ResourceId(99),
            shards,
            Formula::variable(),
        ));

        let result = game.request_reset(child);

        assert_eq!(
            result,
            Err(ActionError::Formula(FormulaError::UnknownResource(ResourceId(99))))
        );
        assert_eq!(value(&game, points), Decimal::from(125));
    }

    #[test]
    fn hidden_or_unknown_layers_refuse_to_reset() {
        let Fixture { mut game, top, .. } = fixture();
        game.layers[top.index()].visibility = Condition::Never;

        assert!(matches!(game.request_reset(top), Err(ActionError::Locked(_))));
        assert_eq!(
            game.request_reset(LayerId(9)),
            Err(ActionError::UnknownLayer(LayerId(9)))
        );
    }

    #[test]
    fn purchases_spend_atomically() {
        let Fixture {
            mut game,
            shards,
            miner,
            ..
        } = fixture();

        let short = game.purchase(miner, PurchaseMode::One);
        assert_eq!(
            short,
            Err(ActionError::InsufficientResource {
                resource: "shards".to_string(),
                required: Decimal::ONE,
                available: Decimal::ZERO,
            })
        );
        assert_eq!(game.generator(miner).map(|g| g.owned()), Some(Decimal::ZERO));

        set(&mut game, shards, 11);
        let receipt = game.purchase(miner, PurchaseMode::Max).expect("buy max");
        assert_eq!(receipt.count, 4);
        assert_eq!(receipt.cost, Decimal::from(10));
        assert_eq!(value(&game, shards), Decimal::ONE);
        assert_eq!(game.generator(miner).map(|g| g.owned()), Some(Decimal::from(4)));

        let nothing = game.purchase(miner, PurchaseMode::Max);
        assert!(matches!(nothing, Err(ActionError::InsufficientResource { .. })));
        assert_eq!(value(&game, shards), Decimal::ONE);
    }

    #[test]
    fn upgrades_unlock_then_buy_once() {
        let Fixture {
            mut game,
            child,
            shards,
            miner,
            boost,
            ..
        } = fixture();

        assert!(matches!(game.purchase_upgrade(boost), Err(ActionError::Locked(_))));

        set(&mut game, shards, 1);
        game.purchase(miner, PurchaseMode::One).expect("first miner");
        assert!(game.is_upgrade_visible(boost));
        assert!(!game.can_afford_upgrade(boost));

        set(&mut game, shards, 5);
        game.purchase_upgrade(boost).expect("upgrade");
        assert_eq!(value(&game, shards), Decimal::from(3));
        assert_eq!(game.upgrades_bought_in(child), Some(1));
        assert_eq!(
            game.purchase_upgrade(boost),
            Err(ActionError::AlreadyBought("c.boost".to_string()))
        );
        assert_eq!(
            game.purchase_upgrade(UpgradeId(7)),
            Err(ActionError::UnknownUpgrade(UpgradeId(7)))
        );
    }

    #[test]
    fn builder_rejects_foreign_writes_duplicates_and_cycles() {
        let mut builder = GameBuilder::new();
        let home = builder.layer("home", "Home");
        let away = builder.layer("away", "Away");
        let foreign = builder.resource(away, Resource::new("away.points", "away", 0));
        builder.generator(
            home,
            Generator::new("home.gen", "gen", CostRequirement::new(foreign, 1)).producing(foreign),
        );
        let result = builder.build(vec![vec![home, away]], &[], ResetRule::default());
        assert!(matches!(result, Err(TopologyError::CrossLayerWrite { .. })));

        let mut builder = GameBuilder::new();
        let home = builder.layer("home", "Home");
        builder.resource(home, Resource::new("home.points", "a", 0));
        builder.resource(home, Resource::new("home.points", "b", 0));
        let result = builder.build(vec![vec![home]], &[], ResetRule::default());
        assert_eq!(
            result.err(),
            Some(TopologyError::DuplicateKey("home.points".to_string()))
        );

        let mut builder = GameBuilder::new();
        let first = builder.layer("first", "First");
        let second = builder.layer("second", "Second");
        let result = builder.build(
            vec![vec![first, second]],
            &[Branch::new(first, second), Branch::new(second, first)],
            ResetRule::default(),
        );
        assert!(matches!(result, Err(TopologyError::Cycle(_))));
    }

    #[test]
    fn visibility_cycles_are_detected() {
        let Fixture {
            mut game,
            child,
            top,
            crowns,
            boost,
            ..
        } = fixture();
        assert!(game.visibility_is_acyclic());

        game.layers[child.index()].visibility = Condition::ResourceAtLeast {
            resource: crowns,
            amount: Decimal::ONE,
        };
        assert!(game.visibility_is_acyclic());

        game.layers[top.index()].visibility = Condition::UpgradeBought(boost);
        assert!(!game.visibility_is_acyclic());
    }

    #[test]
    fn lookups_resolve_stable_keys() {
        let Fixture {
            game,
            top,
            points,
            miner,
            boost,
            ..
        } = fixture();

        assert_eq!(game.layer_id("t"), Some(top));
        assert_eq!(game.resource_id("main.points"), Some(points));
        assert_eq!(game.generator_id("c.miner"), Some(miner));
        assert_eq!(game.upgrade_id("c.boost"), Some(boost));
        assert_eq!(game.resource_id("missing"), None);
        assert_eq!(game.generator_cost(miner), Ok(Decimal::ONE));
    }
}
