use std::time::{Duration, Instant};

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use crate::game::{Action, Command, Direction};

/// How long a boost key press counts as held. Terminals only report key
/// repeats, so the key is considered released once repeats stop.
pub const BOOST_HOLD_WINDOW: Duration = Duration::from_millis(200);

pub struct InputHandler;

impl InputHandler {
    pub fn new() -> Self {
        Self
    }

    /// Map a key to its action, if it has one
    pub fn handle_key_event(&self, key: KeyEvent) -> Option<Action> {
        // Handle Ctrl+C
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            return Some(Action::Quit);
        }

        let action = match key.code {
            // Movement - Arrow keys
            KeyCode::Up => Action::Move(Direction::Up),
            KeyCode::Down => Action::Move(Direction::Down),
            KeyCode::Left => Action::Move(Direction::Left),
            KeyCode::Right => Action::Move(Direction::Right),

            KeyCode::Char(c) => match c.to_ascii_lowercase() {
                // Movement - WASD
                'w' => Action::Move(Direction::Up),
                's' => Action::Move(Direction::Down),
                'a' => Action::Move(Direction::Left),
                'd' => Action::Move(Direction::Right),

                // Abilities
                ' ' => Action::Phase,
                'b' => Action::Boost,

                // Controls
                'p' => Action::Pause,
                'r' => Action::Restart,
                'q' => Action::Quit,
                _ => return None,
            },

            KeyCode::Esc => Action::Quit,
            _ => return None,
        };

        Some(action)
    }
}

impl Default for InputHandler {
    fn default() -> Self {
        Self::new()
    }
}

/// Collects key events between frames into one [`Command`].
///
/// Steering, phase and restart are edge triggered and cleared by
/// [`take_command`](Self::take_command). Boost is level triggered and stays
/// on while presses keep arriving within [`BOOST_HOLD_WINDOW`].
pub struct KeyboardInput {
    handler: InputHandler,
    direction: Option<Direction>,
    phase: bool,
    restart: bool,
    pause: bool,
    quit: bool,
    boost_pressed_at: Option<Instant>,
    hold_window: Duration,
}

impl KeyboardInput {
    pub fn new() -> Self {
        Self::with_hold_window(BOOST_HOLD_WINDOW)
    }

    pub fn with_hold_window(hold_window: Duration) -> Self {
        Self {
            handler: InputHandler::new(),
            direction: None,
            phase: false,
            restart: false,
            pause: false,
            quit: false,
            boost_pressed_at: None,
            hold_window,
        }
    }

    pub fn handle_key_event(&mut self, key: KeyEvent, now: Instant) {
        let Some(action) = self.handler.handle_key_event(key) else {
            return;
        };

        if key.kind == KeyEventKind::Release {
            if action == Action::Boost {
                self.boost_pressed_at = None;
            }
            return;
        }

        match action {
            // Last steering key in a frame wins
            Action::Move(direction) => self.direction = Some(direction),
            Action::Phase => self.phase = true,
            Action::Boost => self.boost_pressed_at = Some(now),
            Action::Pause => self.pause = !self.pause,
            Action::Restart => self.restart = true,
            Action::Quit => self.quit = true,
        }
    }

    pub fn boost_held(&self, now: Instant) -> bool {
        self.boost_pressed_at
            .is_some_and(|at| now.saturating_duration_since(at) <= self.hold_window)
    }

    /// Command for this frame; clears the edge-triggered inputs
    pub fn take_command(&mut self, now: Instant) -> Command {
        Command {
            direction: self.direction.take().into(),
            phase: std::mem::take(&mut self.phase),
            boost: self.boost_held(now),
            restart: std::mem::take(&mut self.restart),
            offset: None,
        }
    }

    /// True once per odd number of pause presses since the last call
    pub fn take_pause(&mut self) -> bool {
        std::mem::take(&mut self.pause)
    }

    pub fn quit_requested(&self) -> bool {
        self.quit
    }
}

impl Default for KeyboardInput {
    fn default() -> Self {
        Self::new()
    }
}
