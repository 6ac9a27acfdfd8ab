use super::condition::Condition;
use super::conversion::Conversion;
use super::formula::Formula;
use super::ids::{GeneratorId, LayerId, ResourceId, UpgradeId};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ResetPhase {
    #[default]
    Idle,
    ResetRequested,
    Resetting,
}

/// Objects reinitialized when a reset fires. `layers` expands to every
/// resource, generator and upgrade the named layer owns.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResetRule {
    pub resources: Vec<ResourceId>,
    pub generators: Vec<GeneratorId>,
    pub upgrades: Vec<UpgradeId>,
    pub layers: Vec<LayerId>,
}

impl ResetRule {
    pub fn whole_layer(layer: LayerId) -> Self {
        Self {
            layers: vec![layer],
            ..Self::default()
        }
    }

    pub fn resources(resources: impl IntoIterator<Item = ResourceId>) -> Self {
        Self {
            resources: resources.into_iter().collect(),
            ..Self::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        self.resources.is_empty()
            && self.generators.is_empty()
            && self.upgrades.is_empty()
            && self.layers.is_empty()
    }
}

/// Passive per-second gain into one of the layer's resources.
#[derive(Debug, Clone)]
pub struct Production {
    pub resource: ResourceId,
    pub per_second: Formula,
}

#[derive(Debug, Clone)]
pub struct Layer {
    pub id: LayerId,
    pub key: String,
    pub name: String,
    pub resources: Vec<ResourceId>,
    pub generators: Vec<GeneratorId>,
    pub upgrades: Vec<UpgradeId>,
    pub conversion: Option<Conversion>,
    pub production: Vec<Production>,
    pub reset_rule: ResetRule,
    pub visibility: Condition,
    pub(crate) phase: ResetPhase,
}

impl Layer {
    pub fn new(id: LayerId, key: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id,
            key: key.into(),
            name: name.into(),
            resources: Vec::new(),
            generators: Vec::new(),
            upgrades: Vec::new(),
            conversion: None,
            production: Vec::new(),
            reset_rule: ResetRule::default(),
            visibility: Condition::Always,
            phase: ResetPhase::Idle,
        }
    }

    pub fn phase(&self) -> ResetPhase {
        self.phase
    }
}
