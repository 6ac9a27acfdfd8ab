use tracing::warn;

use crate::num::Decimal;

use super::formula::FormulaError;
use super::ids::{GeneratorId, ResourceId, UpgradeId};
use super::state::{Reference, StateView};

/// Predicate over live state: visibility gates and formula branches.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum Condition {
    #[default]
    Always,
    Never,
    UpgradeBought(UpgradeId),
    GeneratorOwned {
        generator: GeneratorId,
        at_least: Decimal,
    },
    ResourceAtLeast {
        resource: ResourceId,
        amount: Decimal,
    },
    All(Vec<Condition>),
    Any(Vec<Condition>),
    Not(Box<Condition>),
}

impl Condition {
    pub fn try_check<S>(&self, state: &S) -> Result<bool, FormulaError>
    where
        S: StateView + ?Sized,
    {
        match self {
            Self::Always => Ok(true),
            Self::Never => Ok(false),
            Self::UpgradeBought(id) => state
                .upgrade_bought(*id)
                .ok_or(FormulaError::UnknownUpgrade(*id)),
            Self::GeneratorOwned {
                generator,
                at_least,
            } => {
                let counts = state
                    .generator_counts(*generator)
                    .ok_or(FormulaError::UnknownGenerator(*generator))?;
                Ok(counts.owned >= *at_least)
            }
            Self::ResourceAtLeast { resource, amount } => {
                let value = state
                    .resource_value(*resource)
                    .ok_or(FormulaError::UnknownResource(*resource))?;
                Ok(value >= *amount)
            }
            Self::All(conditions) => {
                for condition in conditions {
                    if !condition.try_check(state)? {
                        return Ok(false);
                    }
                }
                Ok(true)
            }
            Self::Any(conditions) => {
                for condition in conditions {
                    if condition.try_check(state)? {
                        return Ok(true);
                    }
                }
                Ok(false)
            }
            Self::Not(inner) => Ok(!inner.try_check(state)?),
        }
    }

    /// Malformed conditions read as `false`, hiding what they gate.
    pub fn check<S>(&self, state: &S) -> bool
    where
        S: StateView + ?Sized,
    {
        self.try_check(state).unwrap_or_else(|err| {
            warn!(%err, "condition check failed; reading false");
            false
        })
    }

    pub fn references(&self) -> Vec<Reference> {
        let mut out = Vec::new();
        self.collect_references(&mut out);
        out
    }

    pub(crate) fn collect_references(&self, out: &mut Vec<Reference>) {
        match self {
            Self::Always | Self::Never => {}
            Self::UpgradeBought(id) => out.push(Reference::Upgrade(*id)),
            Self::GeneratorOwned { generator, .. } => out.push(Reference::Generator(*generator)),
            Self::ResourceAtLeast { resource, .. } => out.push(Reference::Resource(*resource)),
            Self::All(conditions) | Self::Any(conditions) => {
                for condition in conditions {
                    condition.collect_references(out);
                }
            }
            Self::Not(inner) => inner.collect_references(out),
        }
    }
}
