use thiserror::Error;

/// Invalid arithmetic input.
///
/// The `checked_*` operations on [`super::Decimal`] surface these. The plain
/// operations never do: they log the error at `debug` level and clamp the
/// result to [`super::Decimal::ZERO`], so a bad formula degrades a value
/// instead of halting the simulation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum DomainError {
    #[error("division by zero")]
    DivisionByZero,
    #[error("logarithm of a non-positive value")]
    NonPositiveLogarithm,
    #[error("square root of a negative value")]
    NegativeSquareRoot,
    #[error("zero raised to a negative power")]
    ZeroToNegativePower,
    #[error("negative base raised to a non-integer power")]
    NegativeBaseFractionalPower,
    #[error("value is not a number")]
    NotANumber,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid decimal literal: {0:?}")]
pub struct ParseDecimalError(pub String);
