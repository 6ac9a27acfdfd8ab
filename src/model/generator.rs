use crate::num::Decimal;

use super::condition::Condition;
use super::formula::{Formula, FormulaError};
use super::ids::{GeneratorId, LayerId, ResourceId};
use super::purchasable::Purchasable;
use super::requirement::CostRequirement;
use super::state::StateView;

/// Where a generator's effect flows each tick, scaled by elapsed seconds.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum GeneratorOutput {
    /// The effect is only read by other formulas (a multiplier, say).
    #[default]
    None,
    Resource(ResourceId),
    /// Adds to another generator's bonus count.
    Bonus(GeneratorId),
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum PurchaseMode {
    #[default]
    One,
    Max,
}

/// Repeatable purchasable.
///
/// `owned` grows through purchases, `bonus` through other generators feeding
/// it; both persist. The effect formula's variable is `owned + bonus` and is
/// re-evaluated on every read.
#[derive(Debug, Clone)]
pub struct Generator {
    pub key: String,
    pub name: String,
    pub description: String,
    pub layer: LayerId,
    pub cost: CostRequirement,
    pub effect: Formula,
    pub output: GeneratorOutput,
    /// Mode used when the caller does not pick one.
    pub purchase_mode: PurchaseMode,
    pub visibility: Condition,
    owned: Decimal,
    bonus: Decimal,
}

impl Generator {
    pub fn new(key: impl Into<String>, name: impl Into<String>, cost: CostRequirement) -> Self {
        Self {
            key: key.into(),
            name: name.into(),
            description: String::new(),
            layer: LayerId(0),
            cost,
            effect: Formula::variable(),
            output: GeneratorOutput::None,
            purchase_mode: PurchaseMode::One,
            visibility: Condition::Always,
            owned: Decimal::ZERO,
            bonus: Decimal::ZERO,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_effect(mut self, effect: Formula) -> Self {
        self.effect = effect;
        self
    }

    pub fn producing(mut self, resource: ResourceId) -> Self {
        self.output = GeneratorOutput::Resource(resource);
        self
    }

    pub fn feeding(mut self, generator: GeneratorId) -> Self {
        self.output = GeneratorOutput::Bonus(generator);
        self
    }

    pub fn with_purchase_mode(mut self, mode: PurchaseMode) -> Self {
        self.purchase_mode = mode;
        self
    }

    pub fn visible_when(mut self, condition: Condition) -> Self {
        self.visibility = condition;
        self
    }

    pub fn owned(&self) -> Decimal {
        self.owned
    }

    pub fn bonus(&self) -> Decimal {
        self.bonus
    }

    pub fn total(&self) -> Decimal {
        self.owned + self.bonus
    }

    pub fn effect_value<S>(&self, state: &S) -> Result<Decimal, FormulaError>
    where
        S: StateView + ?Sized,
    {
        self.effect.try_evaluate(state, self.total())
    }

    pub fn add_owned(&mut self, count: u64) {
        self.owned += Decimal::from(count);
    }

    pub fn add_bonus(&mut self, amount: Decimal) {
        self.bonus = (self.bonus + amount).max(Decimal::ZERO);
    }

    pub fn reset(&mut self) {
        self.owned = Decimal::ZERO;
        self.bonus = Decimal::ZERO;
    }

    pub fn restore(&mut self, owned: Decimal, bonus: Decimal) {
        self.owned = owned.floor().max(Decimal::ZERO);
        self.bonus = bonus.max(Decimal::ZERO);
    }
}

impl Purchasable for Generator {
    fn requirement(&self) -> &CostRequirement {
        &self.cost
    }

    fn visibility(&self) -> &Condition {
        &self.visibility
    }

    fn purchased_count(&self) -> Decimal {
        self.owned
    }
}

#[cfg(test)]
mod tests {
    use super::{Generator, GeneratorOutput};
    use crate::model::test_support::FixedState;
    use crate::model::{CostRequirement, Formula, GeneratorId, Purchasable, ResourceId};
    use crate::num::Decimal;

    fn alpha_one() -> Generator {
        Generator::new(
            "a.gen.1",
            "Generator α1",
            CostRequirement::new(ResourceId(0), Formula::variable().div(5).floor().pow_base(3)),
        )
        .producing(ResourceId(1))
    }

    #[test]
    fn effect_reads_owned_plus_bonus() {
        let state = FixedState::default();
        let mut generator = alpha_one();
        generator.add_owned(2);
        generator.add_bonus(Decimal::from(0.5));

        assert_eq!(generator.total(), Decimal::from(2.5));
        assert_eq!(generator.effect_value(&state), Ok(Decimal::from(2.5)));
        assert_eq!(generator.output, GeneratorOutput::Resource(ResourceId(1)));
    }

    #[test]
    fn next_cost_tracks_owned_count_only() {
        let state = FixedState::default();
        let mut generator = alpha_one();
        generator.add_owned(5);
        generator.add_bonus(Decimal::from(100));

        assert_eq!(generator.next_cost(&state), Ok(Decimal::from(3)));
    }

    #[test]
    fn reset_and_restore_sanitize_counts() {
        let mut generator = alpha_one().feeding(GeneratorId(4));
        generator.add_owned(3);
        generator.reset();
        assert_eq!(generator.total(), Decimal::ZERO);

        generator.restore(Decimal::from(2.7), Decimal::from(-1));
        assert_eq!(generator.owned(), Decimal::from(2));
        assert_eq!(generator.bonus(), Decimal::ZERO);
        assert_eq!(generator.output, GeneratorOutput::Bonus(GeneratorId(4)));
    }
}
