use thiserror::Error;

use crate::model::{FormulaError, GeneratorId, LayerId, UpgradeId};
use crate::num::Decimal;

/// Failure of a player action. Returned, never panicked; the caller decides
/// whether to surface it.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ActionError {
    #[error("unknown layer {0:?}")]
    UnknownLayer(LayerId),
    #[error("unknown generator {0:?}")]
    UnknownGenerator(GeneratorId),
    #[error("unknown upgrade {0:?}")]
    UnknownUpgrade(UpgradeId),
    #[error("{0} is not unlocked yet")]
    Locked(String),
    #[error("{0} is already bought")]
    AlreadyBought(String),
    #[error("not enough {resource}: need {}, have {}", .required.format(2), .available.format(2))]
    InsufficientResource {
        resource: String,
        required: Decimal,
        available: Decimal,
    },
    #[error(transparent)]
    Formula(#[from] FormulaError),
}

/// Construction-time rejection of a game definition.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TopologyError {
    #[error("reset branches form a cycle through layer {0:?}")]
    Cycle(LayerId),
    #[error("unknown layer {0:?}")]
    UnknownLayer(LayerId),
    #[error("duplicate key {0:?}")]
    DuplicateKey(String),
    #[error("{owner} writes into {target}, which belongs to another layer")]
    CrossLayerWrite { owner: String, target: String },
}

/// Why one layer's production was discarded for a tick.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum TickError {
    #[error(transparent)]
    Formula(#[from] FormulaError),
    #[error("production from {0} left the representable range")]
    NonFinite(String),
}
