use std::fs;
use std::path::Path;

use anyhow::{Context, Result, bail};
use base64::{Engine as _, engine::general_purpose::STANDARD};

use super::{SAVE_VERSION, SaveData};

pub fn save_to_json_string(save_data: &SaveData) -> Result<String> {
    serde_json::to_string(save_data).context("failed to serialize save data to JSON")
}

pub fn load_from_json_string(json: &str) -> Result<SaveData> {
    let save: SaveData = serde_json::from_str(json).context("failed to parse save JSON")?;
    if save.version > SAVE_VERSION {
        bail!(
            "save version {} is newer than supported version {SAVE_VERSION}",
            save.version
        );
    }
    Ok(save)
}

pub fn export_to_base64(save_data: &SaveData) -> Result<String> {
    let json = save_to_json_string(save_data)?;
    Ok(STANDARD.encode(json.as_bytes()))
}

pub fn import_from_base64(encoded: &str) -> Result<SaveData> {
    let trimmed = encoded.trim();
    let raw = STANDARD
        .decode(trimmed)
        .context("failed to decode base64 save payload")?;
    let json = String::from_utf8(raw).context("decoded base64 payload is not UTF-8")?;
    load_from_json_string(&json)
}

pub fn write_save_file(path: impl AsRef<Path>, save_data: &SaveData) -> Result<()> {
    let path = path.as_ref();
    let json = save_to_json_string(save_data)?;
    fs::write(path, json).with_context(|| format!("failed writing save file: {}", path.display()))
}

pub fn read_save_file(path: impl AsRef<Path>) -> Result<SaveData> {
    let path = path.as_ref();
    let json = fs::read_to_string(path)
        .with_context(|| format!("failed reading save file: {}", path.display()))?;
    load_from_json_string(&json)
        .with_context(|| format!("failed loading save file: {}", path.display()))
}
