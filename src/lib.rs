pub mod core;
pub mod data;
pub mod model;
pub mod num;
pub mod save;

pub use core::{
    ActionError, Branch, Game, GameBuilder, PurchaseReceipt, ResetReport, TickEngine, TickError,
    TickReport, TopologyError, Tree,
};
pub use data::{
    ContentIds, SessionConfig, build_game, load_session_config, load_session_config_from_path,
    load_session_config_or_default, session_config_path,
};
pub use model::{
    Condition, Conversion, CostRequirement, FirstUnitCost, Formula, FormulaError, Generator,
    GeneratorId, GeneratorOutput, LayerId, PurchaseMode, ResetRule, Resource, ResourceId,
    StateView, Upgrade, UpgradeId,
};
pub use num::{Decimal, DomainError};
pub use save::{
    SaveData, apply_save_data, export_to_base64, import_from_base64, load_from_json_string,
    read_save_file, save_data_from_game, save_to_json_string, write_save_file,
};
