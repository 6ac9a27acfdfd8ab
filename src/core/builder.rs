use std::collections::HashSet;

use crate::model::{
    Condition, Conversion, Formula, Generator, GeneratorId, GeneratorOutput, Layer, LayerId,
    Production, ResetRule, Resource, ResourceId, Upgrade, UpgradeId,
};

use super::error::TopologyError;
use super::game::Game;
use super::tree::{Branch, Tree};

/// Collects a game definition and validates it in one place.
///
/// Ids are handed out in registration order, so content code can wire
/// formulas to objects registered earlier.
#[derive(Debug, Default)]
pub struct GameBuilder {
    layers: Vec<Layer>,
    resources: Vec<(LayerId, Resource)>,
    generators: Vec<Generator>,
    upgrades: Vec<Upgrade>,
    conversions: Vec<(LayerId, Conversion)>,
    production: Vec<(LayerId, Production)>,
    reset_rules: Vec<(LayerId, ResetRule)>,
    visibility: Vec<(LayerId, Condition)>,
}

impl GameBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn layer(&mut self, key: impl Into<String>, name: impl Into<String>) -> LayerId {
        let id = LayerId(self.layers.len());
        self.layers.push(Layer::new(id, key, name));
        id
    }

    pub fn resource(&mut self, layer: LayerId, resource: Resource) -> ResourceId {
        self.resources.push((layer, resource));
        ResourceId(self.resources.len() - 1)
    }

    pub fn generator(&mut self, layer: LayerId, mut generator: Generator) -> GeneratorId {
        generator.layer = layer;
        self.generators.push(generator);
        GeneratorId(self.generators.len() - 1)
    }

    pub fn upgrade(&mut self, layer: LayerId, mut upgrade: Upgrade) -> UpgradeId {
        upgrade.layer = layer;
        self.upgrades.push(upgrade);
        UpgradeId(self.upgrades.len() - 1)
    }

    pub fn conversion(&mut self, layer: LayerId, conversion: Conversion) {
        self.conversions.push((layer, conversion));
    }

    pub fn production(&mut self, layer: LayerId, resource: ResourceId, per_second: Formula) {
        self.production.push((
            layer,
            Production {
                resource,
                per_second,
            },
        ));
    }

    pub fn reset_rule(&mut self, layer: LayerId, rule: ResetRule) {
        self.reset_rules.push((layer, rule));
    }

    pub fn visible_when(&mut self, layer: LayerId, condition: Condition) {
        self.visibility.push((layer, condition));
    }

    pub fn build(
        self,
        rows: Vec<Vec<LayerId>>,
        branches: &[Branch],
        on_reset: ResetRule,
    ) -> Result<Game, TopologyError> {
        let Self {
            mut layers,
            resources,
            generators,
            upgrades,
            conversions,
            production,
            reset_rules,
            visibility,
        } = self;

        let layer_count = layers.len();
        let known = |layer: LayerId| {
            if layer.index() < layer_count {
                Ok(layer)
            } else {
                Err(TopologyError::UnknownLayer(layer))
            }
        };

        unique_keys(layers.iter().map(|layer| layer.key.as_str()))?;
        unique_keys(resources.iter().map(|(_, resource)| resource.key.as_str()))?;
        unique_keys(generators.iter().map(|generator| generator.key.as_str()))?;
        unique_keys(upgrades.iter().map(|upgrade| upgrade.key.as_str()))?;

        let mut resource_owners = Vec::with_capacity(resources.len());
        let mut resource_list = Vec::with_capacity(resources.len());
        for (index, (layer, resource)) in resources.into_iter().enumerate() {
            layers[known(layer)?.index()].resources.push(ResourceId(index));
            resource_owners.push(layer);
            resource_list.push(resource);
        }
        for (index, generator) in generators.iter().enumerate() {
            layers[known(generator.layer)?.index()]
                .generators
                .push(GeneratorId(index));
        }
        for (index, upgrade) in upgrades.iter().enumerate() {
            layers[known(upgrade.layer)?.index()]
                .upgrades
                .push(UpgradeId(index));
        }

        let owns_resource = |layer: LayerId, resource: ResourceId| {
            resource_owners.get(resource.index()) == Some(&layer)
        };
        let write_error = |owner: &str, target: String| TopologyError::CrossLayerWrite {
            owner: owner.to_string(),
            target,
        };

        for generator in &generators {
            let writes_own = match generator.output {
                GeneratorOutput::None => true,
                GeneratorOutput::Resource(resource) => owns_resource(generator.layer, resource),
                GeneratorOutput::Bonus(target) => generators
                    .get(target.index())
                    .is_some_and(|target| target.layer == generator.layer),
            };
            if !writes_own {
                return Err(write_error(&generator.key, format!("{:?}", generator.output)));
            }
        }
        for (layer, entry) in production {
            let layer = known(layer)?;
            if !owns_resource(layer, entry.resource) {
                return Err(write_error(&layers[layer.index()].key, format!("{:?}", entry.resource)));
            }
            layers[layer.index()].production.push(entry);
        }
        for (layer, conversion) in conversions {
            let layer = known(layer)?;
            if !owns_resource(layer, conversion.gain) {
                return Err(write_error(&layers[layer.index()].key, format!("{:?}", conversion.gain)));
            }
            layers[layer.index()].conversion = Some(conversion);
        }
        for (layer, rule) in reset_rules {
            for target in &rule.layers {
                known(*target)?;
            }
            layers[known(layer)?.index()].reset_rule = rule;
        }
        for (layer, condition) in visibility {
            layers[known(layer)?.index()].visibility = condition;
        }

        let tree = Tree::new(rows, branches, on_reset, layer_count)?;

        Ok(Game {
            layers,
            resources: resource_list,
            resource_owners,
            generators,
            upgrades,
            tree,
            paused: false,
            tick_index: 0,
            play_time: 0.0,
        })
    }
}

fn unique_keys<'a>(keys: impl Iterator<Item = &'a str>) -> Result<(), TopologyError> {
    let mut seen = HashSet::new();
    for key in keys {
        if !seen.insert(key) {
            return Err(TopologyError::DuplicateKey(key.to_string()));
        }
    }
    Ok(())
}
