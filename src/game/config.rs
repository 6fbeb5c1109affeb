use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::error::ConfigError;

/// Configuration for the game
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Width of the game grid
    pub grid_width: usize,
    /// Height of the game grid
    pub grid_height: usize,
    /// Initial length of the snake
    pub initial_snake_length: usize,
    /// Time between moves at difficulty 1.0 without boost
    pub base_move_delay_ms: u64,
    /// Points awarded per food
    pub food_score: u32,
    /// Difficulty rises once per this many points
    pub difficulty_score_step: u32,
    /// Added to the difficulty multiplier at each step
    pub difficulty_increment: f32,
    pub phase: PhaseConfig,
    pub boost: BoostConfig,
}

/// Phase ability: lets the head pass through the body for a while
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PhaseConfig {
    pub cooldown_secs: f64,
    pub duration_secs: f64,
}

/// Boost ability: doubles speed while energy lasts
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BoostConfig {
    /// Energy drained per second while held
    pub consumption_rate: f32,
    /// Energy regained per second while idle
    pub recharge_rate: f32,
    /// Length of the burst re-armed on every update while held
    pub burst_secs: f64,
    /// Speed multiplier applied while boosting
    pub speed_factor: f32,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            grid_width: 20,
            grid_height: 20,
            initial_snake_length: 3,
            base_move_delay_ms: 300,
            food_score: 10,
            difficulty_score_step: 50,
            difficulty_increment: 0.1,
            phase: PhaseConfig::default(),
            boost: BoostConfig::default(),
        }
    }
}

impl Default for PhaseConfig {
    fn default() -> Self {
        Self {
            cooldown_secs: 10.0,
            duration_secs: 3.0,
        }
    }
}

impl Default for BoostConfig {
    fn default() -> Self {
        Self {
            consumption_rate: 20.0,
            recharge_rate: 5.0,
            burst_secs: 0.1,
            speed_factor: 2.0,
        }
    }
}

impl GameConfig {
    /// Create a new configuration with custom grid size
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            grid_width: width,
            grid_height: height,
            ..Default::default()
        }
    }

    /// Create a small grid for testing
    pub fn small() -> Self {
        Self::new(10, 10)
    }

    pub fn base_move_delay(&self) -> Duration {
        Duration::from_millis(self.base_move_delay_ms)
    }

    /// Difficulty multiplier for a given score: a step function rising by
    /// `difficulty_increment` every `difficulty_score_step` points.
    pub fn difficulty_for(&self, score: u32) -> f32 {
        let steps = score / self.difficulty_score_step.max(1);
        1.0 + steps as f32 * self.difficulty_increment
    }

    /// Check that all parameters are usable
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.grid_width < 3 || self.grid_height < 3 {
            return Err(ConfigError::Invalid(format!(
                "grid must be at least 3x3, got {}x{}",
                self.grid_width, self.grid_height
            )));
        }

        if self.initial_snake_length == 0 {
            return Err(ConfigError::Invalid(
                "initial_snake_length must be at least 1".to_string(),
            ));
        }

        // The body trails downward from the center
        if self.initial_snake_length > self.grid_height - self.grid_height / 2 {
            return Err(ConfigError::Invalid(format!(
                "initial_snake_length {} does not fit below the center of a grid of height {}",
                self.initial_snake_length, self.grid_height
            )));
        }

        if self.base_move_delay_ms == 0 {
            return Err(ConfigError::Invalid(
                "base_move_delay_ms must be positive".to_string(),
            ));
        }

        if self.difficulty_score_step == 0 {
            return Err(ConfigError::Invalid(
                "difficulty_score_step must be at least 1".to_string(),
            ));
        }

        if !(0.0..=MAX_DIFFICULTY_INCREMENT).contains(&self.difficulty_increment) {
            return Err(ConfigError::Invalid(format!(
                "difficulty_increment must be in [0, {MAX_DIFFICULTY_INCREMENT}], got {}",
                self.difficulty_increment
            )));
        }

        check_secs("phase.cooldown_secs", self.phase.cooldown_secs, true)?;
        check_secs("phase.duration_secs", self.phase.duration_secs, true)?;
        check_secs("boost.burst_secs", self.boost.burst_secs, false)?;

        check_rate("boost.consumption_rate", self.boost.consumption_rate)?;
        check_rate("boost.recharge_rate", self.boost.recharge_rate)?;

        if !(1.0..=MAX_SPEED_FACTOR).contains(&self.boost.speed_factor) {
            return Err(ConfigError::Invalid(format!(
                "boost.speed_factor must be in [1, {MAX_SPEED_FACTOR}], got {}",
                self.boost.speed_factor
            )));
        }

        Ok(())
    }
}

/// Longest ability duration accepted from configuration
pub const MAX_ABILITY_SECS: f64 = 3600.0;
const MAX_DIFFICULTY_INCREMENT: f32 = 10.0;
const MAX_SPEED_FACTOR: f32 = 100.0;

/// Finite and within `[0, MAX_ABILITY_SECS]`; zero only if `allow_zero`.
/// NaN fails every range check.
fn check_secs(name: &str, value: f64, allow_zero: bool) -> Result<(), ConfigError> {
    let in_range = (0.0..=MAX_ABILITY_SECS).contains(&value) && (allow_zero || value > 0.0);
    if in_range {
        Ok(())
    } else {
        Err(ConfigError::Invalid(format!(
            "{name} must be at most {MAX_ABILITY_SECS} seconds{}, got {value}",
            if allow_zero { "" } else { " and positive" }
        )))
    }
}

fn check_rate(name: &str, value: f32) -> Result<(), ConfigError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::Invalid(format!(
            "{name} must be positive and finite, got {value}"
        )))
    }
}
