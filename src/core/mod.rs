mod builder;
mod error;
mod game;
mod tick;
mod tree;

pub use builder::GameBuilder;
pub use error::{ActionError, TickError, TopologyError};
pub use game::{Game, PurchaseReceipt, ResetReport};
pub use tick::{TickEngine, TickReport};
pub use tree::{Branch, Tree};
