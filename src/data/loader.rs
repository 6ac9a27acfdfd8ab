use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::de::DeserializeOwned;
use tracing::{info, warn};

use super::SessionConfig;

const SESSION_CONFIG_RELATIVE_PATH: &str = "assets/session.json";

pub fn session_config_path() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join(SESSION_CONFIG_RELATIVE_PATH)
}

pub fn load_session_config() -> Result<SessionConfig> {
    load_session_config_from_path(session_config_path())
}

pub fn load_session_config_from_path(path: impl AsRef<Path>) -> Result<SessionConfig> {
    read_json(path.as_ref(), "session config")
}

/// Missing file means defaults; a file that exists but fails to parse is
/// reported and also falls back to defaults.
pub fn load_session_config_or_default(path: impl AsRef<Path>) -> SessionConfig {
    let path = path.as_ref();
    if !path.exists() {
        info!(path = %path.display(), "no session config, using defaults");
        return SessionConfig::default();
    }
    load_session_config_from_path(path).unwrap_or_else(|err| {
        warn!(error = %format!("{err:#}"), "session config unreadable, using defaults");
        SessionConfig::default()
    })
}

fn read_json<T>(path: &Path, label: &str) -> Result<T>
where
    T: DeserializeOwned,
{
    let raw = fs::read_to_string(path)
        .with_context(|| format!("failed reading {label} file: {}", path.display()))?;

    serde_json::from_str(&raw)
        .with_context(|| format!("failed parsing {label} file as JSON: {}", path.display()))
}
