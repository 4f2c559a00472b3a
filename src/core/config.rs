//! Engine tunables
//!
//! Every field defaults to the value the engine has always used, so an empty
//! JSON object yields the stock behavior.

use serde::{Deserialize, Serialize};
use std::path::Path;

use super::errors::CoreError;
use crate::drw::LegacyPositionRemap;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct EngineConfig {
    pub stroke: StrokeConfig,
    pub playback: PlaybackConfig,
    pub codec: CodecConfig,
}

impl EngineConfig {
    pub fn from_json_str(json: &str) -> Result<Self, CoreError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn load(path: &Path) -> Result<Self, CoreError> {
        let text = std::fs::read_to_string(path)?;
        let config = Self::from_json_str(&text)?;
        tracing::debug!("[EngineConfig] loaded {}", path.display());
        Ok(config)
    }

    pub fn to_json_string(&self) -> Result<String, CoreError> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// Stroke interpolation constants
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct StrokeConfig {
    /// Stamp spacing as a fraction of the diameter
    pub spacing: f32,
    /// Lower bound of the adaptive spacing used by hard variable-opacity strokes
    pub min_adaptive_spacing: f32,
    /// Numerator of the adaptive spacing term
    pub adaptive_spacing_factor: f32,
    /// Sub-spacing samples tolerated before a stamp is forced
    pub idle_threshold: u32,
    /// Idle counter value after a forced stamp
    pub idle_reset: u32,
    /// Substitute for a zero-length segment
    pub min_distance: f32,
}

impl Default for StrokeConfig {
    fn default() -> Self {
        Self {
            spacing: 0.225,
            min_adaptive_spacing: 0.05,
            adaptive_spacing_factor: 15.0,
            idle_threshold: 15,
            idle_reset: 10,
            min_distance: 0.0001,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PlaybackConfig {
    /// Commands executed per `update_playback` call
    pub speed: usize,
    /// Stamp every sub-spacing sample during replay instead of applying the
    /// idle counter. Replays then differ from the live raster.
    pub force_idle_stamps: bool,
}

impl Default for PlaybackConfig {
    fn default() -> Self {
        Self {
            speed: 1,
            force_idle_stamps: false,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CodecConfig {
    pub legacy_position_remap: LegacyPositionRemap,
}
