//! Application configuration loaded from an optional TOML file.
//!
//! ```toml
//! frame_rate_hz = 30
//!
//! [game]
//! grid_width = 24
//! base_move_delay_ms = 250
//!
//! [game.boost]
//! consumption_rate = 25.0
//!
//! [gesture]
//! deadzone = 0.08
//! ```
//!
//! Every key is optional; missing ones keep their defaults.

use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

use crate::error::ConfigError;
use crate::game::GameConfig;
use crate::vision::GestureConfig;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub game: GameConfig,
    pub gesture: GestureConfig,
    /// Host loop rate for rendering, input polling and camera polling
    pub frame_rate_hz: u32,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            game: GameConfig::default(),
            gesture: GestureConfig::default(),
            frame_rate_hz: 30,
        }
    }
}

impl AppConfig {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        let config: AppConfig = toml::from_str(&raw).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.game.validate()?;
        self.gesture.validate()?;

        if self.frame_rate_hz == 0 || self.frame_rate_hz > 240 {
            return Err(ConfigError::Invalid(format!(
                "frame_rate_hz must be in 1..=240, got {}",
                self.frame_rate_hz
            )));
        }

        Ok(())
    }

    pub fn frame_interval(&self) -> Duration {
        Duration::from_secs(1) / self.frame_rate_hz.max(1)
    }
}
