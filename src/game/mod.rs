//! Core game logic module for Snake
//!
//! This module contains all the game logic without any I/O or rendering dependencies.
//! Keyboard and gesture input both reach it through the same [`Command`] record.

pub mod ability;
pub mod action;
pub mod board;
pub mod config;
pub mod engine;
pub mod session;
pub mod state;

// Re-export commonly used types
pub use ability::{Ability, BoostAbility, TimedAbility};
pub use action::{Action, Command, Direction, DirectionIntent};
pub use board::Board;
pub use config::{BoostConfig, GameConfig, PhaseConfig};
pub use engine::{GameEngine, TickInfo};
pub use session::{GameSnapshot, GameStatus, Session};
pub use state::{CollisionType, Position, Snake};
