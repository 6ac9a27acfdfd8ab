use std::sync::Arc;

use thiserror::Error;
use tracing::warn;

use crate::num::Decimal;

use super::condition::Condition;
use super::ids::{GeneratorId, LayerId, ResourceId, UpgradeId};
use super::state::{Reference, StateView};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum FormulaError {
    #[error("unknown resource {0:?}")]
    UnknownResource(ResourceId),
    #[error("unknown generator {0:?}")]
    UnknownGenerator(GeneratorId),
    #[error("unknown upgrade {0:?}")]
    UnknownUpgrade(UpgradeId),
    #[error("unknown layer {0:?}")]
    UnknownLayer(LayerId),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum UnaryOp {
    Neg,
    Abs,
    Floor,
    Sqrt,
    Log10,
    Ln,
}

impl UnaryOp {
    fn apply(self, value: Decimal) -> Decimal {
        match self {
            Self::Neg => -value,
            Self::Abs => value.abs(),
            Self::Floor => value.floor(),
            Self::Sqrt => value.sqrt(),
            Self::Log10 => value.log10(),
            Self::Ln => value.ln(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum BinaryOp {
    Add,
    Sub,
    Mul,
    Div,
    Pow,
    Min,
    Max,
}

impl BinaryOp {
    fn apply(self, lhs: Decimal, rhs: Decimal) -> Decimal {
        match self {
            Self::Add => lhs + rhs,
            Self::Sub => lhs - rhs,
            Self::Mul => lhs * rhs,
            Self::Div => lhs / rhs,
            Self::Pow => lhs.pow(rhs),
            Self::Min => lhs.min(rhs),
            Self::Max => lhs.max(rhs),
        }
    }
}

#[derive(Debug)]
enum Node {
    Constant(Decimal),
    Variable,
    Resource(ResourceId),
    Owned(GeneratorId),
    Bonus(GeneratorId),
    TotalCount(GeneratorId),
    UpgradesBought(LayerId),
    Unary(UnaryOp, Formula),
    Binary(BinaryOp, Formula, Formula),
    Select {
        condition: Condition,
        then: Formula,
        otherwise: Formula,
    },
}

/// Immutable expression over live game state.
///
/// Built by chaining from a leaf (`Formula::variable().div(5).floor()`); each
/// step returns a new node that shares its children. Nothing is cached: every
/// [`Formula::evaluate`] reads the current values of the referenced state, plus
/// the single bound variable `x` (a generator's count for costs and effects, a
/// base amount for conversions).
#[derive(Debug, Clone)]
pub struct Formula(Arc<Node>);

impl Formula {
    fn node(node: Node) -> Self {
        Self(Arc::new(node))
    }

    pub fn constant(value: impl Into<Decimal>) -> Self {
        Self::node(Node::Constant(value.into()))
    }

    pub fn variable() -> Self {
        Self::node(Node::Variable)
    }

    pub fn resource(id: ResourceId) -> Self {
        Self::node(Node::Resource(id))
    }

    pub fn owned(id: GeneratorId) -> Self {
        Self::node(Node::Owned(id))
    }

    pub fn bonus(id: GeneratorId) -> Self {
        Self::node(Node::Bonus(id))
    }

    /// Owned plus bonus count of a generator.
    pub fn total_count(id: GeneratorId) -> Self {
        Self::node(Node::TotalCount(id))
    }

    pub fn upgrades_bought(layer: LayerId) -> Self {
        Self::node(Node::UpgradesBought(layer))
    }

    pub fn select(condition: Condition, then: impl Into<Self>, otherwise: impl Into<Self>) -> Self {
        Self::node(Node::Select {
            condition,
            then: then.into(),
            otherwise: otherwise.into(),
        })
    }

    /// `self` when the upgrade is bought, `1` otherwise. The usual shape of a
    /// multiplicative upgrade effect.
    pub fn when_bought(self, upgrade: UpgradeId) -> Self {
        Self::select(Condition::UpgradeBought(upgrade), self, 1)
    }

    fn unary(self, op: UnaryOp) -> Self {
        Self::node(Node::Unary(op, self))
    }

    fn binary(self, op: BinaryOp, rhs: impl Into<Self>) -> Self {
        Self::node(Node::Binary(op, self, rhs.into()))
    }

    #[allow(clippy::should_implement_trait)]
    pub fn add(self, rhs: impl Into<Self>) -> Self {
        self.binary(BinaryOp::Add, rhs)
    }

    #[allow(clippy::should_implement_trait)]
    pub fn sub(self, rhs: impl Into<Self>) -> Self {
        self.binary(BinaryOp::Sub, rhs)
    }

    #[allow(clippy::should_implement_trait)]
    pub fn mul(self, rhs: impl Into<Self>) -> Self {
        self.binary(BinaryOp::Mul, rhs)
    }

    #[allow(clippy::should_implement_trait)]
    pub fn div(self, rhs: impl Into<Self>) -> Self {
        self.binary(BinaryOp::Div, rhs)
    }

    pub fn pow(self, exponent: impl Into<Self>) -> Self {
        self.binary(BinaryOp::Pow, exponent)
    }

    /// `base ^ self`.
    pub fn pow_base(self, base: impl Into<Self>) -> Self {
        base.into().binary(BinaryOp::Pow, self)
    }

    pub fn min(self, rhs: impl Into<Self>) -> Self {
        self.binary(BinaryOp::Min, rhs)
    }

    pub fn max(self, rhs: impl Into<Self>) -> Self {
        self.binary(BinaryOp::Max, rhs)
    }

    #[allow(clippy::should_implement_trait)]
    pub fn neg(self) -> Self {
        self.unary(UnaryOp::Neg)
    }

    pub fn abs(self) -> Self {
        self.unary(UnaryOp::Abs)
    }

    pub fn floor(self) -> Self {
        self.unary(UnaryOp::Floor)
    }

    pub fn sqrt(self) -> Self {
        self.unary(UnaryOp::Sqrt)
    }

    pub fn log10(self) -> Self {
        self.unary(UnaryOp::Log10)
    }

    pub fn ln(self) -> Self {
        self.unary(UnaryOp::Ln)
    }

    pub fn try_evaluate<S>(&self, state: &S, variable: Decimal) -> Result<Decimal, FormulaError>
    where
        S: StateView + ?Sized,
    {
        let value = match self.0.as_ref() {
            Node::Constant(value) => *value,
            Node::Variable => variable,
            Node::Resource(id) => state
                .resource_value(*id)
                .ok_or(FormulaError::UnknownResource(*id))?,
            Node::Owned(id) => {
                state
                    .generator_counts(*id)
                    .ok_or(FormulaError::UnknownGenerator(*id))?
                    .owned
            }
            Node::Bonus(id) => {
                state
                    .generator_counts(*id)
                    .ok_or(FormulaError::UnknownGenerator(*id))?
                    .bonus
            }
            Node::TotalCount(id) => state
                .generator_counts(*id)
                .ok_or(FormulaError::UnknownGenerator(*id))?
                .total(),
            Node::UpgradesBought(layer) => {
                let count = state
                    .upgrades_bought_in(*layer)
                    .ok_or(FormulaError::UnknownLayer(*layer))?;
                Decimal::from(count as u64)
            }
            Node::Unary(op, inner) => op.apply(inner.try_evaluate(state, variable)?),
            Node::Binary(op, lhs, rhs) => op.apply(
                lhs.try_evaluate(state, variable)?,
                rhs.try_evaluate(state, variable)?,
            ),
            Node::Select {
                condition,
                then,
                otherwise,
            } => {
                if condition.try_check(state)? {
                    then.try_evaluate(state, variable)?
                } else {
                    otherwise.try_evaluate(state, variable)?
                }
            }
        };
        Ok(value)
    }

    /// Like [`Formula::try_evaluate`], reading zero for a malformed formula.
    pub fn evaluate<S>(&self, state: &S, variable: Decimal) -> Decimal
    where
        S: StateView + ?Sized,
    {
        self.try_evaluate(state, variable).unwrap_or_else(|err| {
            warn!(%err, "formula evaluation failed; reading zero");
            Decimal::ZERO
        })
    }

    /// Every piece of state this formula reads.
    pub fn references(&self) -> Vec<Reference> {
        let mut out = Vec::new();
        self.collect_references(&mut out);
        out
    }

    pub(crate) fn collect_references(&self, out: &mut Vec<Reference>) {
        match self.0.as_ref() {
            Node::Constant(_) | Node::Variable => {}
            Node::Resource(id) => out.push(Reference::Resource(*id)),
            Node::Owned(id) | Node::Bonus(id) | Node::TotalCount(id) => {
                out.push(Reference::Generator(*id));
            }
            Node::UpgradesBought(layer) => out.push(Reference::Layer(*layer)),
            Node::Unary(_, inner) => inner.collect_references(out),
            Node::Binary(_, lhs, rhs) => {
                lhs.collect_references(out);
                rhs.collect_references(out);
            }
            Node::Select {
                condition,
                then,
                otherwise,
            } => {
                condition.collect_references(out);
                then.collect_references(out);
                otherwise.collect_references(out);
            }
        }
    }
}

impl From<Decimal> for Formula {
    fn from(value: Decimal) -> Self {
        Self::constant(value)
    }
}

impl From<f64> for Formula {
    fn from(value: f64) -> Self {
        Self::constant(value)
    }
}

impl From<i32> for Formula {
    fn from(value: i32) -> Self {
        Self::constant(value)
    }
}
