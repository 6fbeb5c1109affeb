//! Hand Snake - a Snake game with abilities, steered by keyboard or hand gestures
//!
//! This library provides:
//! - Core game logic: grid, snake, food, phase and boost abilities (game module)
//! - Gesture recognition from hand landmarks and background frame capture (vision module)
//! - Keyboard input mapped to the same per-frame command (input module)
//! - TUI rendering (render module)
//! - Interactive and headless execution modes (modes module)

pub mod config;
pub mod error;
pub mod game;
pub mod input;
pub mod modes;
pub mod render;
pub mod vision;

pub use config::AppConfig;
pub use error::{CaptureError, ConfigError};
