use crate::num::Decimal;

use super::condition::Condition;
use super::ids::LayerId;
use super::purchasable::Purchasable;
use super::requirement::CostRequirement;

/// One-shot purchasable; only `bought` persists.
#[derive(Debug, Clone)]
pub struct Upgrade {
    pub key: String,
    pub description: String,
    pub layer: LayerId,
    pub cost: CostRequirement,
    pub visibility: Condition,
    bought: bool,
}

impl Upgrade {
    pub fn new(key: impl Into<String>, description: impl Into<String>, cost: CostRequirement) -> Self {
        Self {
            key: key.into(),
            description: description.into(),
            layer: LayerId(0),
            cost,
            visibility: Condition::Always,
            bought: false,
        }
    }

    pub fn visible_when(mut self, condition: Condition) -> Self {
        self.visibility = condition;
        self
    }

    pub fn is_bought(&self) -> bool {
        self.bought
    }

    pub fn set_bought(&mut self, bought: bool) {
        self.bought = bought;
    }
}

impl Purchasable for Upgrade {
    fn requirement(&self) -> &CostRequirement {
        &self.cost
    }

    fn visibility(&self) -> &Condition {
        &self.visibility
    }

    fn purchased_count(&self) -> Decimal {
        if self.bought { Decimal::ONE } else { Decimal::ZERO }
    }
}
