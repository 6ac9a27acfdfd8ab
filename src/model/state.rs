use crate::num::Decimal;

use super::ids::{GeneratorId, LayerId, ResourceId, UpgradeId};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GeneratorCounts {
    pub owned: Decimal,
    pub bonus: Decimal,
}

impl GeneratorCounts {
    pub fn total(&self) -> Decimal {
        self.owned + self.bonus
    }
}

/// Read-only view of live game state that formulas and conditions pull from.
///
/// Every accessor returns `None` for an id the view does not know, which
/// surfaces as a [`super::FormulaError`] instead of a panic.
pub trait StateView {
    fn resource_value(&self, id: ResourceId) -> Option<Decimal>;
    fn generator_counts(&self, id: GeneratorId) -> Option<GeneratorCounts>;
    fn upgrade_bought(&self, id: UpgradeId) -> Option<bool>;
    fn upgrades_bought_in(&self, layer: LayerId) -> Option<usize>;
}

/// A piece of state a formula or condition reads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Reference {
    Resource(ResourceId),
    Generator(GeneratorId),
    Upgrade(UpgradeId),
    Layer(LayerId),
}
