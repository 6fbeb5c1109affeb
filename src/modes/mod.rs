pub mod play;
pub mod simulate;

pub use play::PlayMode;
pub use simulate::SimulateMode;

use crate::game::{Command, GameStatus};

/// Combine one frame of keyboard and gesture input.
///
/// Keyboard steering wins over gesture steering. On the menu and game over
/// screens a fist starts a new game.
pub fn frame_command(status: GameStatus, keys: Command, gesture: Command) -> Command {
    let fist = gesture.boost;
    let mut command = keys.merged_over(gesture);

    if matches!(status, GameStatus::Menu | GameStatus::GameOver) && fist {
        command.restart = true;
    }

    command
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::{Direction, DirectionIntent};

    fn fist() -> Command {
        Command {
            boost: true,
            offset: Some((0.0, -0.02)),
            ..Default::default()
        }
    }

    #[test]
    fn test_fist_starts_from_menu_and_game_over() {
        assert!(frame_command(GameStatus::Menu, Command::default(), fist()).restart);
        assert!(frame_command(GameStatus::GameOver, Command::default(), fist()).restart);
    }

    #[test]
    fn test_fist_boosts_while_playing() {
        let command = frame_command(GameStatus::Playing, Command::default(), fist());
        assert!(command.boost);
        assert!(!command.restart);

        assert!(!frame_command(GameStatus::Paused, Command::default(), fist()).restart);
    }

    #[test]
    fn test_keyboard_steering_wins() {
        let command = frame_command(
            GameStatus::Playing,
            Command::steer(Direction::Left),
            Command::steer(Direction::Up),
        );
        assert_eq!(command.direction, DirectionIntent::Move(Direction::Left));

        let command = frame_command(GameStatus::Playing, Command::default(), Command::steer(Direction::Up));
        assert_eq!(command.direction, DirectionIntent::Move(Direction::Up));
    }
}
