use crate::num::Decimal;

use super::condition::Condition;
use super::formula::FormulaError;
use super::requirement::CostRequirement;
use super::state::StateView;

/// Capability shared by everything bought with a [`CostRequirement`].
pub trait Purchasable {
    fn requirement(&self) -> &CostRequirement;
    fn visibility(&self) -> &Condition;
    /// Units already bought; the cost formula's variable.
    fn purchased_count(&self) -> Decimal;

    fn next_cost<S>(&self, state: &S) -> Result<Decimal, FormulaError>
    where
        S: StateView + ?Sized,
    {
        self.requirement().cost_at(state, self.purchased_count())
    }

    fn can_afford<S>(&self, state: &S) -> bool
    where
        S: StateView + ?Sized,
    {
        self.requirement()
            .is_satisfied(state, self.purchased_count())
            .unwrap_or(false)
    }

    fn is_visible<S>(&self, state: &S) -> bool
    where
        S: StateView + ?Sized,
    {
        self.visibility().check(state)
    }
}
