use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Gauge, Paragraph},
};

use crate::game::{Command, GameSnapshot, GameStatus, Position};
use crate::game::ability::MAX_ENERGY;

/// What the gesture pipeline saw on the latest frame
#[derive(Debug, Clone, Default, PartialEq)]
pub enum GestureStatus {
    /// No capture source configured
    #[default]
    Disabled,
    NoHand,
    Tracking(Command),
}

impl GestureStatus {
    pub fn from_command(command: Command) -> Self {
        if command.offset.is_some() {
            GestureStatus::Tracking(command)
        } else {
            GestureStatus::NoHand
        }
    }
}

pub struct Renderer;

impl Renderer {
    pub fn new() -> Self {
        Self
    }

    pub fn render(&self, frame: &mut Frame, snapshot: &GameSnapshot, gesture: &GestureStatus) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3), // Header
                Constraint::Min(0),    // Game area
                Constraint::Length(3), // Ability meters
                Constraint::Length(2), // Gesture line and controls
            ])
            .split(frame.area());

        frame.render_widget(self.render_stats(snapshot), chunks[0]);

        // Center the game grid horizontally
        let game_area = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([
                Constraint::Percentage(10),
                Constraint::Percentage(80),
                Constraint::Percentage(10),
            ])
            .split(chunks[1])[1];

        let main = match snapshot.status {
            GameStatus::Playing => self.render_grid(snapshot),
            GameStatus::Menu => self.render_menu(snapshot),
            GameStatus::Paused => self.render_paused(snapshot),
            GameStatus::GameOver => self.render_game_over(snapshot),
        };
        frame.render_widget(main, game_area);

        let meters = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
            .split(chunks[2]);
        frame.render_widget(self.render_phase_meter(snapshot), meters[0]);
        frame.render_widget(self.render_boost_meter(snapshot), meters[1]);

        let footer = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(1), Constraint::Length(1)])
            .split(chunks[3]);
        frame.render_widget(self.render_gesture(gesture), footer[0]);
        frame.render_widget(self.render_controls(), footer[1]);
    }

    fn render_grid(&self, snapshot: &GameSnapshot) -> Paragraph<'static> {
        let head = snapshot.snake_head();
        let head_color = if snapshot.phase_active {
            Color::Magenta
        } else if snapshot.boost_active {
            Color::Yellow
        } else {
            Color::Cyan
        };
        let body_style = if snapshot.phase_active {
            Style::default().fg(Color::DarkGray)
        } else {
            Style::default().fg(Color::Green)
        };

        let mut lines = Vec::with_capacity(snapshot.grid_height);

        for y in 0..snapshot.grid_height {
            let mut spans = Vec::with_capacity(snapshot.grid_width);

            for x in 0..snapshot.grid_width {
                let pos = Position::new(x as i32, y as i32);

                let cell = if pos == head {
                    Span::styled(
                        "■ ",
                        Style::default().fg(head_color).add_modifier(Modifier::BOLD),
                    )
                } else if snapshot.snake_body.contains(&pos) {
                    Span::styled("□ ", body_style)
                } else if snapshot.food == Some(pos) {
                    Span::styled(
                        "O ",
                        Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
                    )
                } else {
                    Span::styled(". ", Style::default().fg(Color::DarkGray))
                };

                spans.push(cell);
            }

            lines.push(Line::from(spans));
        }

        Paragraph::new(lines)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_type(BorderType::Double)
                    .border_style(Style::default().fg(Color::White))
                    .title(" Snake "),
            )
            .alignment(Alignment::Center)
    }

    fn render_stats(&self, snapshot: &GameSnapshot) -> Paragraph<'static> {
        let label = Style::default().fg(Color::Yellow);
        let value = Style::default().fg(Color::White).add_modifier(Modifier::BOLD);

        let text = vec![Line::from(vec![
            Span::styled("Score: ", label),
            Span::styled(snapshot.score.to_string(), value),
            Span::raw("    "),
            Span::styled("High: ", label),
            Span::styled(snapshot.high_score.to_string(), value),
            Span::raw("    "),
            Span::styled("Level: ", label),
            Span::styled(snapshot.level().to_string(), value),
        ])];

        Paragraph::new(text).alignment(Alignment::Center)
    }

    fn render_phase_meter(&self, snapshot: &GameSnapshot) -> Gauge<'static> {
        let (ratio, label, color) = if snapshot.phase_active {
            (1.0, "ACTIVE".to_string(), Color::Magenta)
        } else if snapshot.phase_cooldown_remaining > 0.0 {
            let total = snapshot.phase_cooldown_total.max(f32::EPSILON);
            (
                1.0 - snapshot.phase_cooldown_remaining / total,
                format!("{:.1}s", snapshot.phase_cooldown_remaining),
                Color::DarkGray,
            )
        } else {
            (1.0, "READY".to_string(), Color::Blue)
        };

        Gauge::default()
            .block(Block::default().borders(Borders::ALL).title(" Phase "))
            .gauge_style(Style::default().fg(color))
            .ratio(f64::from(ratio.clamp(0.0, 1.0)))
            .label(label)
    }

    fn render_boost_meter(&self, snapshot: &GameSnapshot) -> Gauge<'static> {
        let color = if snapshot.boost_active {
            Color::Yellow
        } else {
            Color::Green
        };

        Gauge::default()
            .block(Block::default().borders(Borders::ALL).title(" Boost "))
            .gauge_style(Style::default().fg(color))
            .ratio(f64::from((snapshot.boost_energy / MAX_ENERGY).clamp(0.0, 1.0)))
            .label(format!("{:.0}%", snapshot.boost_energy))
    }

    fn render_menu(&self, snapshot: &GameSnapshot) -> Paragraph<'static> {
        let text = vec![
            Line::from(""),
            Line::from(vec![Span::styled(
                "HAND SNAKE",
                Style::default()
                    .fg(Color::Cyan)
                    .add_modifier(Modifier::BOLD),
            )]),
            Line::from(""),
            Line::from(vec![Span::styled(
                "Show a fist or press R to start",
                Style::default().fg(Color::Gray),
            )]),
            Line::from(""),
            Line::from(vec![
                Span::styled("High Score: ", Style::default().fg(Color::Yellow)),
                Span::styled(snapshot.high_score.to_string(), Style::default().fg(Color::White)),
            ]),
        ];

        Paragraph::new(text).alignment(Alignment::Center).block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Cyan)),
        )
    }

    fn render_paused(&self, snapshot: &GameSnapshot) -> Paragraph<'static> {
        let text = vec![
            Line::from(""),
            Line::from(vec![Span::styled(
                "PAUSED",
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::BOLD),
            )]),
            Line::from(""),
            Line::from(vec![
                Span::styled("Score: ", Style::default().fg(Color::Yellow)),
                Span::styled(snapshot.score.to_string(), Style::default().fg(Color::White)),
            ]),
            Line::from(""),
            Line::from(vec![Span::styled(
                "Press P to resume",
                Style::default().fg(Color::Gray),
            )]),
        ];

        Paragraph::new(text).alignment(Alignment::Center).block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Yellow)),
        )
    }

    fn render_game_over(&self, snapshot: &GameSnapshot) -> Paragraph<'static> {
        let text = vec![
            Line::from(""),
            Line::from(vec![Span::styled(
                "GAME OVER",
                Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
            )]),
            Line::from(""),
            Line::from(vec![
                Span::styled("Final Score: ", Style::default().fg(Color::Yellow)),
                Span::styled(
                    snapshot.score.to_string(),
                    Style::default()
                        .fg(Color::White)
                        .add_modifier(Modifier::BOLD),
                ),
                Span::raw("    "),
                Span::styled("High Score: ", Style::default().fg(Color::Yellow)),
                Span::styled(snapshot.high_score.to_string(), Style::default().fg(Color::White)),
            ]),
            Line::from(""),
            Line::from(vec![
                Span::styled("Show a fist or press ", Style::default().fg(Color::Gray)),
                Span::styled(
                    "R",
                    Style::default()
                        .fg(Color::Green)
                        .add_modifier(Modifier::BOLD),
                ),
                Span::styled(" to restart, ", Style::default().fg(Color::Gray)),
                Span::styled(
                    "Q",
                    Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
                ),
                Span::styled(" to quit", Style::default().fg(Color::Gray)),
            ]),
        ];

        Paragraph::new(text).alignment(Alignment::Center).block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Red)),
        )
    }

    fn render_gesture(&self, gesture: &GestureStatus) -> Paragraph<'static> {
        let line = match gesture {
            GestureStatus::Disabled => Line::from(Span::styled(
                "Gesture input off",
                Style::default().fg(Color::DarkGray),
            )),
            GestureStatus::NoHand => Line::from(Span::styled(
                "No hand detected",
                Style::default().fg(Color::DarkGray),
            )),
            GestureStatus::Tracking(command) => {
                let (dx, dy) = command.offset.unwrap_or_default();
                let direction = command
                    .direction
                    .direction()
                    .map_or("-", |direction| direction.as_str());

                let mut spans = vec![
                    Span::styled("Hand ", Style::default().fg(Color::Green)),
                    Span::raw(format!("dx {dx:+.2} dy {dy:+.2} ")),
                    Span::styled(direction, Style::default().fg(Color::Cyan)),
                ];
                if command.phase {
                    spans.push(Span::styled(" PINCH", Style::default().fg(Color::Magenta)));
                }
                if command.boost {
                    spans.push(Span::styled(" FIST", Style::default().fg(Color::Yellow)));
                }
                Line::from(spans)
            }
        };

        Paragraph::new(vec![line]).alignment(Alignment::Center)
    }

    fn render_controls(&self) -> Paragraph<'static> {
        let text = vec![Line::from(vec![
            Span::styled("↑↓←→", Style::default().fg(Color::Cyan)),
            Span::raw(" or "),
            Span::styled("WASD", Style::default().fg(Color::Cyan)),
            Span::raw(" move | "),
            Span::styled("Space", Style::default().fg(Color::Magenta)),
            Span::raw(" phase | "),
            Span::styled("B", Style::default().fg(Color::Yellow)),
            Span::raw(" boost | "),
            Span::styled("P", Style::default().fg(Color::Cyan)),
            Span::raw(" pause | "),
            Span::styled("Q", Style::default().fg(Color::Red)),
            Span::raw(" quit"),
        ])];

        Paragraph::new(text).alignment(Alignment::Center)
    }
}

impl Default for Renderer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::{Direction, GameConfig, GameEngine};
    use ratatui::{Terminal, backend::TestBackend};

    fn draw(snapshot: &GameSnapshot, gesture: &GestureStatus) -> String {
        let mut terminal = Terminal::new(TestBackend::new(80, 40)).expect("test terminal");
        let renderer = Renderer::new();
        terminal
            .draw(|frame| renderer.render(frame, snapshot, gesture))
            .expect("draw");

        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|cell| cell.symbol())
            .collect()
    }

    fn engine() -> GameEngine {
        GameEngine::with_seed(GameConfig::small(), 3)
    }

    #[test]
    fn test_menu_prompt() {
        let screen = draw(&engine().snapshot(), &GestureStatus::Disabled);
        assert!(screen.contains("Show a fist or press R to start"));
        assert!(screen.contains("Gesture input off"));
    }

    #[test]
    fn test_playing_shows_meters() {
        let mut engine = engine();
        engine.process_command(&Command::restart());
        let screen = draw(&engine.snapshot(), &GestureStatus::NoHand);

        assert!(screen.contains("Score: 0"));
        assert!(screen.contains("Level: 1"));
        assert!(screen.contains("READY"));
        assert!(screen.contains("100%"));
        assert!(screen.contains("No hand detected"));
    }

    #[test]
    fn test_paused_and_game_over_overlays() {
        let mut engine = engine();
        engine.process_command(&Command::restart());
        engine.toggle_pause();
        assert!(draw(&engine.snapshot(), &GestureStatus::Disabled).contains("PAUSED"));

        let mut snapshot = engine.snapshot();
        snapshot.status = GameStatus::GameOver;
        assert!(draw(&snapshot, &GestureStatus::Disabled).contains("GAME OVER"));
    }

    #[test]
    fn test_gesture_line() {
        let command = Command {
            offset: Some((0.2, -0.01)),
            boost: true,
            ..Command::steer(Direction::Right)
        };
        let status = GestureStatus::from_command(command);
        let screen = draw(&engine().snapshot(), &status);
        assert!(screen.contains("RIGHT"));
        assert!(screen.contains("FIST"));

        assert_eq!(GestureStatus::from_command(Command::default()), GestureStatus::NoHand);
    }
}
