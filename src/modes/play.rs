use anyhow::{Context, Result};
use crossterm::{
    event::{Event, EventStream},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use futures::StreamExt;
use ratatui::{Terminal, backend::CrosstermBackend};
use std::io::{Stderr, stderr};
use std::time::{Duration, Instant};
use tokio::time::{MissedTickBehavior, interval};
use tracing::{info, warn};

use super::frame_command;
use crate::config::AppConfig;
use crate::game::{Command, GameEngine, TickInfo};
use crate::input::KeyboardInput;
use crate::render::{GestureStatus, Renderer};
use crate::vision::{GestureInput, PassthroughDetector};

/// Longest frame the simulation will absorb at once, e.g. after a suspend
const MAX_FRAME_DT: Duration = Duration::from_millis(250);

/// Interactive terminal host: keyboard plus optional gesture input
pub struct PlayMode {
    engine: GameEngine,
    renderer: Renderer,
    keyboard: KeyboardInput,
    gesture_input: Option<GestureInput<PassthroughDetector>>,
    gesture: GestureStatus,
    frame_interval: Duration,
    should_quit: bool,
}

impl PlayMode {
    pub fn new(
        config: &AppConfig,
        engine: GameEngine,
        gesture_input: Option<GestureInput<PassthroughDetector>>,
    ) -> Self {
        let gesture = if gesture_input.is_some() {
            GestureStatus::NoHand
        } else {
            GestureStatus::Disabled
        };

        Self {
            engine,
            renderer: Renderer::new(),
            keyboard: KeyboardInput::new(),
            gesture_input,
            gesture,
            frame_interval: config.frame_interval(),
            should_quit: false,
        }
    }

    pub async fn run(&mut self) -> Result<()> {
        // Setup terminal
        enable_raw_mode().context("Failed to enable raw mode")?;
        let mut stderr = stderr();
        execute!(stderr, EnterAlternateScreen).context("Failed to enter alternate screen")?;
        let backend = CrosstermBackend::new(stderr);
        let mut terminal = Terminal::new(backend).context("Failed to create terminal")?;
        terminal.hide_cursor().context("Failed to hide cursor")?;
        terminal.clear().context("Failed to clear terminal")?;

        // Run game loop with cleanup
        let result = self.run_game_loop(&mut terminal).await;

        if let Some(gesture_input) = self.gesture_input.as_mut() {
            gesture_input.stop();
        }
        self.cleanup_terminal(&mut terminal)?;

        info!(high_score = self.engine.high_score(), "session ended");
        result
    }

    async fn run_game_loop(
        &mut self,
        terminal: &mut Terminal<CrosstermBackend<Stderr>>,
    ) -> Result<()> {
        let mut event_stream = EventStream::new();

        let mut frame_timer = interval(self.frame_interval);
        frame_timer.set_missed_tick_behavior(MissedTickBehavior::Skip);
        let mut last_frame = Instant::now();

        loop {
            tokio::select! {
                // Handle terminal events
                maybe_event = event_stream.next() => {
                    match maybe_event {
                        Some(Ok(Event::Key(key))) => {
                            self.keyboard.handle_key_event(key, Instant::now());
                        }
                        Some(Ok(_)) => {}
                        Some(Err(err)) => {
                            return Err(err).context("Failed to read terminal event");
                        }
                        None => self.should_quit = true,
                    }
                }

                // Game frame: input, simulation, render
                _ = frame_timer.tick() => {
                    let now = Instant::now();
                    let dt = now.duration_since(last_frame).min(MAX_FRAME_DT);
                    last_frame = now;

                    self.step_frame(dt, now);
                    terminal.draw(|frame| {
                        self.renderer.render(frame, &self.engine.snapshot(), &self.gesture);
                    }).context("Failed to draw frame")?;
                }

                // Handle Ctrl+C
                _ = tokio::signal::ctrl_c() => {
                    self.should_quit = true;
                }
            }

            if self.should_quit || self.keyboard.quit_requested() {
                break;
            }
        }

        Ok(())
    }

    fn step_frame(&mut self, dt: Duration, now: Instant) -> TickInfo {
        if self.keyboard.take_pause() {
            self.engine.toggle_pause();
        }

        let keys = self.keyboard.take_command(now);
        let gesture = match self.gesture_input.as_mut() {
            Some(gesture_input) => {
                let command = gesture_input.poll();
                self.gesture = GestureStatus::from_command(command.clone());
                command
            }
            None => Command::default(),
        };

        let command = frame_command(self.engine.status(), keys, gesture);
        self.engine.process_command(&command);

        let tick = self.engine.update(dt);
        if let Some(collision) = tick.collision_type {
            warn!(?collision, score = self.engine.score(), "snake crashed");
        }
        tick
    }

    fn cleanup_terminal(
        &mut self,
        terminal: &mut Terminal<CrosstermBackend<Stderr>>,
    ) -> Result<()> {
        disable_raw_mode().context("Failed to disable raw mode")?;
        execute!(terminal.backend_mut(), LeaveAlternateScreen)
            .context("Failed to leave alternate screen")?;
        terminal.show_cursor().context("Failed to show cursor")?;
        Ok(())
    }
}
