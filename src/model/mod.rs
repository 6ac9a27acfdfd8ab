mod condition;
mod conversion;
mod formula;
mod generator;
mod ids;
mod layer;
mod purchasable;
pub mod rate;
mod requirement;
mod resource;
mod state;
mod upgrade;

pub use condition::Condition;
pub use conversion::Conversion;
pub use formula::{Formula, FormulaError};
pub use generator::{Generator, GeneratorOutput, PurchaseMode};
pub use ids::{GeneratorId, LayerId, ResourceId, UpgradeId};
pub use layer::{Layer, Production, ResetPhase, ResetRule};
pub use purchasable::Purchasable;
pub use requirement::{Affordable, CostRequirement, FirstUnitCost, MAX_BULK};
pub use resource::Resource;
pub use state::{GeneratorCounts, Reference, StateView};
pub use upgrade::Upgrade;

#[cfg(test)]
pub(crate) mod test_support {
    use std::collections::HashMap;

    use crate::num::Decimal;

    use super::{GeneratorCounts, GeneratorId, LayerId, ResourceId, StateView, UpgradeId};

    /// Hand-filled state for exercising formulas without a full game.
    #[derive(Debug, Default)]
    pub struct FixedState {
        pub resources: HashMap<ResourceId, Decimal>,
        pub generators: HashMap<GeneratorId, GeneratorCounts>,
        pub upgrades: HashMap<UpgradeId, bool>,
        pub bought_per_layer: HashMap<LayerId, usize>,
    }

    impl FixedState {
        pub fn set_generator(
            &mut self,
            id: GeneratorId,
            owned: impl Into<Decimal>,
            bonus: impl Into<Decimal>,
        ) {
            self.generators.insert(
                id,
                GeneratorCounts {
                    owned: owned.into(),
                    bonus: bonus.into(),
                },
            );
        }
    }

    impl StateView for FixedState {
        fn resource_value(&self, id: ResourceId) -> Option<Decimal> {
            self.resources.get(&id).copied()
        }

        fn generator_counts(&self, id: GeneratorId) -> Option<GeneratorCounts> {
            self.generators.get(&id).copied()
        }

        fn upgrade_bought(&self, id: UpgradeId) -> Option<bool> {
            self.upgrades.get(&id).copied()
        }

        fn upgrades_bought_in(&self, layer: LayerId) -> Option<usize> {
            self.bought_per_layer.get(&layer).copied()
        }
    }
}
