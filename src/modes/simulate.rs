//! Headless, deterministic run.
//!
//! Recorded landmarks are classified synchronously, one recording frame per
//! game frame, so the same seed and recording always give the same result.

use std::time::Duration;
use tracing::{debug, info};

use super::frame_command;
use crate::game::{Command, GameEngine, GameSnapshot, GameStatus};
use crate::vision::{FrameSource, GestureClassifier, HandDetector, LandmarkReplay, PassthroughDetector};

pub struct SimulateMode {
    engine: GameEngine,
    replay: Option<LandmarkReplay>,
    detector: PassthroughDetector,
    classifier: GestureClassifier,
    frame_dt: Duration,
}

/// Totals gathered over a run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SimulationSummary {
    pub frames: u64,
    pub moves: u64,
    pub food_eaten: u32,
    pub games: u32,
}

impl SimulateMode {
    pub fn new(
        engine: GameEngine,
        replay: Option<LandmarkReplay>,
        classifier: GestureClassifier,
        frame_dt: Duration,
    ) -> Self {
        Self {
            engine,
            replay,
            detector: PassthroughDetector,
            classifier,
            frame_dt,
        }
    }

    pub fn engine(&self) -> &GameEngine {
        &self.engine
    }

    /// Run `frames` frames. The first frame starts a game; later games only
    /// start if the recording shows a fist.
    pub fn run(&mut self, frames: u64) -> SimulationSummary {
        let mut summary = SimulationSummary::default();

        for frame in 0..frames {
            let gesture = match self.replay.as_mut().and_then(|replay| replay.read_frame()) {
                Some(landmarks) => {
                    let landmarks = self.detector.detect(&landmarks);
                    self.classifier.interpret(&landmarks)
                }
                None => Command::default(),
            };

            let keys = if frame == 0 {
                Command::restart()
            } else {
                Command::default()
            };

            let status = self.engine.status();
            let command = frame_command(status, keys, gesture);
            if command.restart && status != GameStatus::Playing {
                summary.games += 1;
            }
            self.engine.process_command(&command);

            let tick = self.engine.update(self.frame_dt);
            summary.frames += 1;
            summary.moves += u64::from(tick.moves);
            if tick.ate_food {
                summary.food_eaten += 1;
            }
            if let Some(collision) = tick.collision_type {
                debug!(frame, ?collision, "simulated game over");
            }
        }

        info!(
            frames = summary.frames,
            moves = summary.moves,
            food = summary.food_eaten,
            games = summary.games,
            score = self.engine.score(),
            "simulation finished"
        );
        summary
    }

    pub fn snapshot(&self) -> GameSnapshot {
        self.engine.snapshot()
    }

    pub fn snapshot_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(&self.snapshot())
    }
}
