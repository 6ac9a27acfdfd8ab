use serde::{Deserialize, Serialize};

/// Shell settings; every field falls back to its default when absent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    pub tick_hz: f64,
    pub autosave_interval_seconds: f64,
    pub save_path: String,
    /// Multiplier on elapsed time. 0 pauses.
    pub dev_speed: f64,
    pub offline_cap_seconds: f64,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            tick_hz: 20.0,
            autosave_interval_seconds: 30.0,
            save_path: "vertex_tree_save.json".to_string(),
            dev_speed: 1.0,
            offline_cap_seconds: 3_600.0,
        }
    }
}

impl SessionConfig {
    pub fn tick_seconds(&self) -> f64 {
        if self.tick_hz.is_finite() && self.tick_hz > 0.0 {
            1.0 / self.tick_hz
        } else {
            1.0 / Self::default().tick_hz
        }
    }
}
