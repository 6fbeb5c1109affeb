//! Turns one detected hand into a game [`Command`].
//!
//! Three independent rules run on every frame:
//!
//! - **Direction**: the index fingertip's offset from the wrist, along its
//!   dominant axis, once it leaves the deadzone. Ties go to the vertical axis.
//! - **Phase**: thumb tip and index tip pinched together.
//! - **Boost**: a fist, i.e. all four non-thumb fingers folded. A finger is
//!   folded when its tip is no farther from the wrist than its middle knuckle,
//!   up to `fold_margin`. Requiring all four keeps a steering finger from
//!   triggering it.

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::landmark::{Finger, Hand, HandJoint, Landmark};
use crate::error::ConfigError;
use crate::game::{Command, Direction};

/// Thresholds for gesture recognition, in normalized image units
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GestureConfig {
    /// Minimum dominant-axis offset before a direction is accepted
    pub deadzone: f32,
    /// Maximum thumb-to-index distance for a pinch
    pub pinch_threshold: f32,
    /// Allowed ratio of tip distance over knuckle distance for a folded finger
    pub fold_margin: f32,
}

impl Default for GestureConfig {
    fn default() -> Self {
        Self {
            deadzone: 0.1,
            pinch_threshold: 0.05,
            fold_margin: 1.1,
        }
    }
}

impl GestureConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(0.0..1.0).contains(&self.deadzone) {
            return Err(ConfigError::Invalid(format!(
                "deadzone must be in [0, 1), got {}",
                self.deadzone
            )));
        }

        if !(self.pinch_threshold.is_finite() && self.pinch_threshold > 0.0) {
            return Err(ConfigError::Invalid(format!(
                "pinch_threshold must be positive, got {}",
                self.pinch_threshold
            )));
        }

        if !(self.fold_margin.is_finite() && self.fold_margin > 0.0) {
            return Err(ConfigError::Invalid(format!(
                "fold_margin must be positive, got {}",
                self.fold_margin
            )));
        }

        Ok(())
    }
}

/// Classify one frame of landmarks. No hand means a neutral command.
pub fn classify(landmarks: &[Landmark], config: &GestureConfig) -> Command {
    let Some(hand) = Hand::new(landmarks) else {
        return Command::default();
    };

    let wrist = hand.joint(HandJoint::Wrist);
    let index_tip = hand.joint(HandJoint::IndexTip);
    let (dx, dy) = index_tip.offset_from(wrist);

    Command {
        direction: pointing_direction(dx, dy, config.deadzone).into(),
        phase: is_pinching(&hand, config.pinch_threshold),
        boost: is_fist(&hand, config.fold_margin),
        restart: false,
        offset: Some((dx, dy)),
    }
}

fn pointing_direction(dx: f32, dy: f32, deadzone: f32) -> Option<Direction> {
    if dx.abs() > dy.abs() {
        if dx.abs() > deadzone {
            return Some(if dx < 0.0 {
                Direction::Left
            } else {
                Direction::Right
            });
        }
    } else if dy.abs() > deadzone {
        return Some(if dy < 0.0 {
            Direction::Up
        } else {
            Direction::Down
        });
    }

    None
}

fn is_pinching(hand: &Hand<'_>, threshold: f32) -> bool {
    hand.joint(HandJoint::ThumbTip)
        .planar_distance(hand.joint(HandJoint::IndexTip))
        < threshold
}

fn is_folded(hand: &Hand<'_>, finger: Finger, margin: f32) -> bool {
    let wrist = hand.joint(HandJoint::Wrist);
    let tip = hand.joint(finger.tip()).planar_distance(wrist);
    let knuckle = hand.joint(finger.knuckle()).planar_distance(wrist);

    tip <= knuckle * margin
}

fn is_fist(hand: &Hand<'_>, margin: f32) -> bool {
    Finger::ALL
        .iter()
        .all(|finger| is_folded(hand, *finger, margin))
}

/// Stateful wrapper around [`classify`] that logs direction changes.
///
/// The remembered direction never influences the returned command.
pub struct GestureClassifier {
    config: GestureConfig,
    last_direction: Option<Direction>,
}

impl GestureClassifier {
    pub fn new(config: GestureConfig) -> Self {
        Self {
            config,
            last_direction: None,
        }
    }

    pub fn config(&self) -> &GestureConfig {
        &self.config
    }

    pub fn last_direction(&self) -> Option<Direction> {
        self.last_direction
    }

    pub fn interpret(&mut self, landmarks: &[Landmark]) -> Command {
        let command = classify(landmarks, &self.config);

        let direction = command.direction.direction();
        if direction != self.last_direction {
            debug!(
                from = ?self.last_direction,
                to = ?direction,
                offset = ?command.offset,
                "gesture direction changed"
            );
            self.last_direction = direction;
        }

        command
    }
}

impl Default for GestureClassifier {
    fn default() -> Self {
        Self::new(GestureConfig::default())
    }
}
