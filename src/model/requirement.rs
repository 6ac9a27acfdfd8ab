use crate::num::Decimal;

use super::formula::{Formula, FormulaError};
use super::ids::ResourceId;
use super::state::StateView;

/// Largest number of units a single "buy max" may purchase.
pub const MAX_BULK: u64 = 1 << 16;

/// Price convention for the very first unit (owned count 0).
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub enum FirstUnitCost {
    /// Evaluate the cost formula at 0 as written (`floor(0/5)^3 = 0`, `3^0 = 1`).
    #[default]
    Formula,
    Free,
    Flat(Decimal),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Affordable {
    pub count: u64,
    pub total_cost: Decimal,
}

/// Gates a purchase on `resource >= cost(count)`.
///
/// The cost formula's variable is the number of units already owned, so a
/// one-shot upgrade simply uses a constant formula.
#[derive(Debug, Clone)]
pub struct CostRequirement {
    pub resource: ResourceId,
    pub cost: Formula,
    pub first_unit: FirstUnitCost,
}

impl CostRequirement {
    pub fn new(resource: ResourceId, cost: impl Into<Formula>) -> Self {
        Self {
            resource,
            cost: cost.into(),
            first_unit: FirstUnitCost::default(),
        }
    }

    pub fn with_first_unit(mut self, first_unit: FirstUnitCost) -> Self {
        self.first_unit = first_unit;
        self
    }

    /// Price of the next unit when `owned` units are held. Never negative.
    pub fn cost_at<S>(&self, state: &S, owned: Decimal) -> Result<Decimal, FormulaError>
    where
        S: StateView + ?Sized,
    {
        let cost = match self.first_unit {
            FirstUnitCost::Free if owned.is_zero() => Decimal::ZERO,
            FirstUnitCost::Flat(cost) if owned.is_zero() => cost,
            _ => self.cost.try_evaluate(state, owned)?,
        };
        Ok(cost.max(Decimal::ZERO))
    }

    pub fn is_satisfied<S>(&self, state: &S, owned: Decimal) -> Result<bool, FormulaError>
    where
        S: StateView + ?Sized,
    {
        let available = state
            .resource_value(self.resource)
            .ok_or(FormulaError::UnknownResource(self.resource))?;
        Ok(available >= self.cost_at(state, owned)?)
    }

    /// Largest `n <= cap` with `cost(owned) + ... + cost(owned + n - 1) <= budget`.
    ///
    /// Doubles `n` until the cumulative cost exceeds the budget, then binary
    /// searches the last gap. The cost formula must be non-decreasing in the
    /// count; partial sums are computed once and reused across lookups.
    pub fn max_affordable<S>(
        &self,
        state: &S,
        owned: Decimal,
        budget: Decimal,
        cap: u64,
    ) -> Result<Affordable, FormulaError>
    where
        S: StateView + ?Sized,
    {
        let mut sums = vec![Decimal::ZERO];
        let mut sum_of = |count: u64| -> Result<Decimal, FormulaError> {
            while (sums.len() as u64) <= count {
                let next = sums.len() as u64 - 1;
                let unit = self.cost_at(state, owned + Decimal::from(next))?;
                let last = sums[sums.len() - 1];
                sums.push(last + unit);
            }
            Ok(sums[count as usize])
        };

        if cap == 0 || sum_of(1)? > budget {
            return Ok(Affordable {
                count: 0,
                total_cost: Decimal::ZERO,
            });
        }

        let mut low = 1;
        let mut high = 2;
        while high <= cap {
            if sum_of(high)? > budget {
                break;
            }
            low = high;
            high = high.saturating_mul(2);
        }
        let mut high = high.min(cap.saturating_add(1));

        while high - low > 1 {
            let mid = low + (high - low) / 2;
            if sum_of(mid)? <= budget {
                low = mid;
            } else {
                high = mid;
            }
        }

        Ok(Affordable {
            count: low,
            total_cost: sum_of(low)?,
        })
    }
}
