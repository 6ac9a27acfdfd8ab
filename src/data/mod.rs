mod config;
mod content;
mod loader;

pub use config::SessionConfig;
pub use content::{ContentIds, STARTING_POINTS, build_game};
pub use loader::{
    load_session_config, load_session_config_from_path, load_session_config_or_default,
    session_config_path,
};
