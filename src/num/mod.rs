mod decimal;
mod error;

pub use decimal::Decimal;
pub use error::{DomainError, ParseDecimalError};
