use crate::num::Decimal;

use super::formula::{Formula, FormulaError};
use super::ids::ResourceId;
use super::state::StateView;

/// Cumulative conversion from a base resource into a gain resource.
///
/// The formula (variable = base amount) names the amount of the gain resource
/// the player should hold. A reset tops the gain resource up to that target,
/// so converting twice from the same base never pays out twice.
#[derive(Debug, Clone)]
pub struct Conversion {
    pub base: ResourceId,
    pub gain: ResourceId,
    pub formula: Formula,
    /// Floor the target before comparing; on by default.
    pub round_down: bool,
}

impl Conversion {
    pub fn cumulative(base: ResourceId, gain: ResourceId, formula: Formula) -> Self {
        Self {
            base,
            gain,
            formula,
            round_down: true,
        }
    }

    pub fn target<S>(&self, state: &S) -> Result<Decimal, FormulaError>
    where
        S: StateView + ?Sized,
    {
        let base = state
            .resource_value(self.base)
            .ok_or(FormulaError::UnknownResource(self.base))?;
        let mut target = self.formula.try_evaluate(state, base)?;
        if self.round_down {
            target = target.floor();
        }
        Ok(target.max(Decimal::ZERO))
    }

    /// `max(0, target - held)`: what a reset right now would add.
    pub fn pending_gain<S>(&self, state: &S) -> Result<Decimal, FormulaError>
    where
        S: StateView + ?Sized,
    {
        let held = state
            .resource_value(self.gain)
            .ok_or(FormulaError::UnknownResource(self.gain))?;
        Ok((self.target(state)? - held).max(Decimal::ZERO))
    }
}

#[cfg(test)]
mod tests {
    use super::Conversion;
    use crate::model::test_support::FixedState;
    use crate::model::{Formula, ResourceId};
    use crate::num::Decimal;

    const BASE: ResourceId = ResourceId(0);
    const GAIN: ResourceId = ResourceId(1);

    fn alpha() -> Conversion {
        Conversion::cumulative(BASE, GAIN, Formula::variable().div(5).sqrt())
    }

    #[test]
    fn target_is_floored_formula_of_base() {
        let mut state = FixedState::default();
        state.resources.insert(BASE, Decimal::from(125));
        state.resources.insert(GAIN, Decimal::ZERO);

        assert_eq!(alpha().target(&state), Ok(Decimal::from(5)));

        state.resources.insert(BASE, Decimal::from(130));
        assert_eq!(alpha().target(&state), Ok(Decimal::from(5)));
    }

    #[test]
    fn pending_gain_tops_up_instead_of_adding() {
        let mut state = FixedState::default();
        state.resources.insert(BASE, Decimal::from(125));
        state.resources.insert(GAIN, Decimal::from(3));

        assert_eq!(alpha().pending_gain(&state), Ok(Decimal::from(2)));

        state.resources.insert(GAIN, Decimal::from(8));
        assert_eq!(alpha().pending_gain(&state), Ok(Decimal::ZERO));
    }

    #[test]
    fn negative_targets_clamp_to_zero() {
        let mut state = FixedState::default();
        state.resources.insert(BASE, Decimal::from(10));
        state.resources.insert(GAIN, Decimal::ZERO);
        let lines = Conversion::cumulative(BASE, GAIN, Formula::variable().log10().div(6).sub(1));

        assert_eq!(lines.target(&state), Ok(Decimal::ZERO));

        state.resources.insert(BASE, "1e21".parse().expect("literal"));
        assert_eq!(lines.target(&state), Ok(Decimal::from(2)));
    }
}
