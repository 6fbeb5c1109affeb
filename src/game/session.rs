use serde::{Deserialize, Serialize};
use tracing::info;

use super::action::Direction;
use super::state::Position;

/// High-level lifecycle of a game
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum GameStatus {
    Menu,
    Playing,
    Paused,
    GameOver,
}

/// Status, score and difficulty bookkeeping.
///
/// The high score lives for the whole process and survives restarts.
#[derive(Debug, Clone, PartialEq)]
pub struct Session {
    status: GameStatus,
    score: u32,
    high_score: u32,
    difficulty: f32,
}

impl Session {
    pub fn new() -> Self {
        Self {
            status: GameStatus::Menu,
            score: 0,
            high_score: 0,
            difficulty: 1.0,
        }
    }

    pub fn status(&self) -> GameStatus {
        self.status
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn high_score(&self) -> u32 {
        self.high_score
    }

    pub fn difficulty(&self) -> f32 {
        self.difficulty
    }

    pub fn is_playing(&self) -> bool {
        self.status == GameStatus::Playing
    }

    /// Begin a fresh game from any state
    pub fn start_game(&mut self) {
        self.status = GameStatus::Playing;
        self.score = 0;
        self.difficulty = 1.0;
        info!(high_score = self.high_score, "game started");
    }

    /// Toggle between playing and paused. Other states are unaffected.
    pub fn toggle_pause(&mut self) {
        self.status = match self.status {
            GameStatus::Playing => GameStatus::Paused,
            GameStatus::Paused => GameStatus::Playing,
            other => other,
        };
    }

    /// Transition to game over, recording the high score once
    pub fn end_game(&mut self) {
        if self.status == GameStatus::GameOver {
            return;
        }

        self.status = GameStatus::GameOver;
        if self.score > self.high_score {
            self.high_score = self.score;
        }
        info!(
            score = self.score,
            high_score = self.high_score,
            "game over"
        );
    }

    /// Add points and recompute the difficulty with `difficulty_for`
    pub fn add_score(&mut self, points: u32, difficulty_for: impl Fn(u32) -> f32) {
        self.score += points;
        self.difficulty = difficulty_for(self.score);
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

/// Read-only view of the game handed to renderers once per frame
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameSnapshot {
    pub status: GameStatus,
    pub score: u32,
    pub high_score: u32,
    pub difficulty: f32,
    /// Head first
    pub snake_body: Vec<Position>,
    pub snake_direction: Direction,
    pub food: Option<Position>,
    pub phase_active: bool,
    pub phase_cooldown_remaining: f32,
    pub phase_cooldown_total: f32,
    pub boost_active: bool,
    pub boost_energy: f32,
    pub grid_width: usize,
    pub grid_height: usize,
}

impl GameSnapshot {
    pub fn snake_head(&self) -> Position {
        self.snake_body[0]
    }

    /// Display level, 1 at the starting difficulty
    pub fn level(&self) -> u32 {
        ((self.difficulty - 1.0) * 10.0).round() as u32 + 1
    }
}
