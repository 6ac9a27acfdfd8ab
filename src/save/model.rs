use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::num::Decimal;

pub const SAVE_VERSION: u32 = 1;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct SaveResource {
    pub value: Decimal,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub best: Option<Decimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total: Option<Decimal>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct SaveGenerator {
    pub owned: Decimal,
    pub bonus: Decimal,
}

/// Durable state keyed by stable string keys (`"main.points"`, `"a.gen.1"`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SaveData {
    pub version: u32,
    pub resources: BTreeMap<String, SaveResource>,
    pub generators: BTreeMap<String, SaveGenerator>,
    pub upgrades: BTreeMap<String, bool>,
    pub total_ticks: u64,
    pub play_time: f64,
    pub paused: bool,
    /// Unix seconds at the time of saving; 0 when unknown.
    pub saved_at: u64,
}

impl Default for SaveData {
    fn default() -> Self {
        Self {
            version: SAVE_VERSION,
            resources: BTreeMap::new(),
            generators: BTreeMap::new(),
            upgrades: BTreeMap::new(),
            total_ticks: 0,
            play_time: 0.0,
            paused: false,
            saved_at: 0,
        }
    }
}
