use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Direction the snake can move
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    /// Returns true if turning from self to other would be a 180-degree turn
    pub fn is_opposite(&self, other: Direction) -> bool {
        *self == other.opposite()
    }

    pub fn opposite(&self) -> Direction {
        match self {
            Direction::Up => Direction::Down,
            Direction::Down => Direction::Up,
            Direction::Left => Direction::Right,
            Direction::Right => Direction::Left,
        }
    }

    /// Returns the delta (dx, dy) for moving in this direction.
    /// The y axis grows downward.
    pub fn delta(&self) -> (i32, i32) {
        match self {
            Direction::Up => (0, -1),
            Direction::Down => (0, 1),
            Direction::Left => (-1, 0),
            Direction::Right => (1, 0),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Direction::Up => "UP",
            Direction::Down => "DOWN",
            Direction::Left => "LEFT",
            Direction::Right => "RIGHT",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Parses the direction tokens used by external command producers
/// (case-insensitive).
impl FromStr for Direction {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "UP" => Ok(Direction::Up),
            "DOWN" => Ok(Direction::Down),
            "LEFT" => Ok(Direction::Left),
            "RIGHT" => Ok(Direction::Right),
            _ => Err(()),
        }
    }
}

/// A single discrete command tag, as produced by one key press.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Steer in a specific direction
    Move(Direction),
    Phase,
    Boost,
    Pause,
    Restart,
    Quit,
}

impl From<Direction> for Action {
    fn from(direction: Direction) -> Self {
        Action::Move(direction)
    }
}

/// Steering part of a [`Command`].
///
/// `Invalid` keeps an unrecognized token apart from "no steering at all";
/// the engine ignores both.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum DirectionIntent {
    #[default]
    None,
    Move(Direction),
    Invalid(String),
}

impl DirectionIntent {
    /// Build an intent from an optional textual token.
    pub fn from_token(token: Option<&str>) -> Self {
        match token {
            None => DirectionIntent::None,
            Some(raw) => match raw.parse::<Direction>() {
                Ok(direction) => DirectionIntent::Move(direction),
                Err(()) => DirectionIntent::Invalid(raw.to_string()),
            },
        }
    }

    pub fn direction(&self) -> Option<Direction> {
        match self {
            DirectionIntent::Move(direction) => Some(*direction),
            _ => None,
        }
    }

    pub fn is_none(&self) -> bool {
        matches!(self, DirectionIntent::None)
    }
}

impl From<Option<Direction>> for DirectionIntent {
    fn from(direction: Option<Direction>) -> Self {
        direction.map_or(DirectionIntent::None, DirectionIntent::Move)
    }
}

/// Per-frame command record, identical for keyboard and gesture input.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Command {
    pub direction: DirectionIntent,
    pub phase: bool,
    /// Held state, not an edge trigger
    pub boost: bool,
    pub restart: bool,
    /// Raw (dx, dy) gesture offset. Display only.
    pub offset: Option<(f32, f32)>,
}

impl Command {
    pub fn steer(direction: Direction) -> Self {
        Self {
            direction: DirectionIntent::Move(direction),
            ..Default::default()
        }
    }

    pub fn restart() -> Self {
        Self {
            restart: true,
            ..Default::default()
        }
    }

    /// Merge two commands; fields set on `self` take precedence over `other`.
    ///
    /// The host calls this as `keyboard.merged_over(gesture)`.
    pub fn merged_over(self, other: Command) -> Command {
        Command {
            direction: if self.direction.is_none() {
                other.direction
            } else {
                self.direction
            },
            phase: self.phase || other.phase,
            boost: self.boost || other.boost,
            restart: self.restart || other.restart,
            offset: self.offset.or(other.offset),
        }
    }
}
