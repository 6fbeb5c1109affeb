use rand::SeedableRng;
use rand::rngs::StdRng;
use std::time::Duration;
use tracing::{debug, trace, warn};

use super::{
    ability::{Ability, BoostAbility, TimedAbility},
    action::{Command, Direction, DirectionIntent},
    board::Board,
    config::GameConfig,
    session::{GameSnapshot, GameStatus, Session},
    state::{CollisionType, Position, Snake},
};

/// Information about one call to [`GameEngine::update`]
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TickInfo {
    /// Number of discrete move steps performed
    pub moves: u32,
    /// Whether the snake ate food during this tick
    pub ate_food: bool,
    /// Type of collision if one ended the game
    pub collision_type: Option<CollisionType>,
}

/// The game engine that handles all game logic.
///
/// The engine is a deterministic function of its seed, the commands it is
/// given and the `dt` values passed to [`update`](Self::update). It never
/// reads the wall clock.
pub struct GameEngine {
    config: GameConfig,
    board: Board,
    snake: Snake,
    food: Option<Position>,
    session: Session,
    phase: TimedAbility,
    boost: BoostAbility,
    boost_held: bool,
    phase_active: bool,
    /// Simulation time since the current game started
    clock: Duration,
    move_timer: Duration,
    rng: StdRng,
}

impl GameEngine {
    /// Create a new game engine in the menu state
    pub fn new(config: GameConfig) -> Self {
        Self::with_rng(config, StdRng::from_entropy())
    }

    /// Create an engine whose food placement is reproducible
    pub fn with_seed(config: GameConfig, seed: u64) -> Self {
        Self::with_rng(config, StdRng::seed_from_u64(seed))
    }

    fn with_rng(config: GameConfig, rng: StdRng) -> Self {
        let board = Board::new(config.grid_width, config.grid_height);
        let snake = Self::spawn_snake(&config, &board);

        Self {
            phase: TimedAbility::phase(&config.phase),
            boost: BoostAbility::new(&config.boost),
            config,
            board,
            snake,
            food: None,
            session: Session::new(),
            boost_held: false,
            phase_active: false,
            clock: Duration::ZERO,
            move_timer: Duration::ZERO,
            rng,
        }
    }

    fn spawn_snake(config: &GameConfig, board: &Board) -> Snake {
        Snake::new(board.center(), Direction::Up, config.initial_snake_length)
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn snake(&self) -> &Snake {
        &self.snake
    }

    pub fn food(&self) -> Option<Position> {
        self.food
    }

    pub fn status(&self) -> GameStatus {
        self.session.status()
    }

    pub fn score(&self) -> u32 {
        self.session.score()
    }

    pub fn high_score(&self) -> u32 {
        self.session.high_score()
    }

    pub fn difficulty(&self) -> f32 {
        self.session.difficulty()
    }

    pub fn clock(&self) -> Duration {
        self.clock
    }

    pub fn boost_energy(&self) -> f32 {
        self.boost.energy()
    }

    /// Start a new game: snake at the center, fresh food, score and
    /// difficulty back to their initial values, abilities recharged.
    pub fn reset(&mut self) {
        self.session.start_game();
        self.snake = Self::spawn_snake(&self.config, &self.board);
        self.phase = TimedAbility::phase(&self.config.phase);
        self.boost = BoostAbility::new(&self.config.boost);
        self.boost_held = false;
        self.phase_active = false;
        self.clock = Duration::ZERO;
        self.move_timer = Duration::ZERO;
        self.food = self.place_food();
    }

    /// Apply one frame's worth of input.
    ///
    /// Outside of play only `restart` is honored.
    pub fn process_command(&mut self, command: &Command) {
        if !self.session.is_playing() {
            if command.restart {
                self.reset();
            }
            return;
        }

        match &command.direction {
            DirectionIntent::Move(direction) => {
                let before = self.snake.pending_direction();
                self.snake.set_direction(*direction);
                if self.snake.pending_direction() != before {
                    debug!(direction = %direction, "direction queued");
                }
            }
            DirectionIntent::Invalid(token) => {
                trace!(token = %token, "ignoring unrecognized direction");
            }
            DirectionIntent::None => {}
        }

        if command.phase && self.phase.activate(self.clock) {
            self.phase_active = true;
            debug!(at = ?self.clock, "phase activated");
        }

        self.boost_held = command.boost;
    }

    /// Toggle between playing and paused
    pub fn toggle_pause(&mut self) {
        self.session.toggle_pause();
        debug!(status = ?self.session.status(), "pause toggled");
    }

    /// Advance the simulation by `dt` of wall-clock time
    pub fn update(&mut self, dt: Duration) -> TickInfo {
        let mut info = TickInfo::default();

        if !self.session.is_playing() {
            return info;
        }

        self.clock += dt;
        self.boost.update(dt, self.boost_held, self.clock);
        self.phase_active = self.phase.is_active(self.clock);

        let move_delay = self.move_delay();
        self.move_timer += dt;

        while self.move_timer >= move_delay {
            self.move_timer -= move_delay;
            self.do_move(&mut info);

            if !self.session.is_playing() {
                break;
            }
        }

        info
    }

    /// True while boost is both held and effective
    pub fn is_boosting(&self) -> bool {
        self.boost_held && self.boost.is_active(self.clock)
    }

    /// Current time between moves, scaled by difficulty and boost
    pub fn move_delay(&self) -> Duration {
        let mut speed = self.session.difficulty() as f64;
        if self.is_boosting() {
            speed *= self.config.boost.speed_factor as f64;
        }

        let nanos = self.config.base_move_delay().as_nanos() as f64 / speed;
        Duration::from_nanos(nanos.round() as u64).max(Duration::from_nanos(1))
    }

    /// One discrete grid step
    fn do_move(&mut self, info: &mut TickInfo) {
        self.snake.move_forward();
        info.moves += 1;

        if let Some(collision) = self.check_collision() {
            debug!(?collision, head = ?self.snake.head(), "collision");
            info.collision_type = Some(collision);
            self.session.end_game();
            return;
        }

        if self.food == Some(self.snake.head()) {
            self.snake.grow();
            let config = &self.config;
            self.session
                .add_score(config.food_score, |score| config.difficulty_for(score));
            self.food = self.place_food();
            info.ate_food = true;
        }
    }

    /// Wall first: a snake outside the board is not checked against itself
    fn check_collision(&self) -> Option<CollisionType> {
        if !self.board.in_bounds(self.snake.head()) {
            return Some(CollisionType::Wall);
        }

        if self.snake.check_self_collision(self.phase_active) {
            return Some(CollisionType::SelfCollision);
        }

        None
    }

    /// Spawn food at a random empty position
    fn place_food(&mut self) -> Option<Position> {
        let cell = self
            .board
            .random_empty_cell(self.snake.body(), &mut self.rng);

        if self.board.in_bounds(cell) {
            Some(cell)
        } else {
            warn!(
                length = self.snake.len(),
                "no free cell left for food"
            );
            None
        }
    }

    /// Copy of everything a renderer may observe
    pub fn snapshot(&self) -> GameSnapshot {
        GameSnapshot {
            status: self.session.status(),
            score: self.session.score(),
            high_score: self.session.high_score(),
            difficulty: self.session.difficulty(),
            snake_body: self.snake.body().to_vec(),
            snake_direction: self.snake.direction(),
            food: self.food,
            phase_active: self.phase_active,
            phase_cooldown_remaining: self.phase.cooldown_remaining(self.clock).as_secs_f32(),
            phase_cooldown_total: self.phase.cooldown().as_secs_f32(),
            boost_active: self.is_boosting(),
            boost_energy: self.boost.energy(),
            grid_width: self.board.width(),
            grid_height: self.board.height(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TICK: Duration = Duration::from_millis(300);

    fn playing_engine(config: GameConfig) -> GameEngine {
        let mut engine = GameEngine::with_seed(config, 42);
        engine.process_command(&Command::restart());
        engine
    }

    #[test]
    fn test_starts_in_menu() {
        let mut engine = GameEngine::with_seed(GameConfig::default(), 1);
        assert_eq!(engine.status(), GameStatus::Menu);
        assert_eq!(engine.food(), None);

        // Updates and steering do nothing outside of play
        let head = engine.snake().head();
        engine.process_command(&Command::steer(Direction::Left));
        let info = engine.update(Duration::from_secs(5));
        assert_eq!(info.moves, 0);
        assert_eq!(engine.snake().head(), head);
    }

    #[test]
    fn test_reset() {
        let engine = playing_engine(GameConfig::default());

        assert_eq!(engine.status(), GameStatus::Playing);
        assert_eq!(engine.score(), 0);
        assert_eq!(engine.difficulty(), 1.0);
        assert_eq!(engine.snake().len(), 3);
        assert_eq!(engine.snake().head(), Position::new(10, 10));
        assert_eq!(engine.snake().direction(), Direction::Up);

        let food = engine.food().expect("food placed");
        assert!(engine.board().in_bounds(food));
        assert!(!engine.snake().occupies(food));
    }

    #[test]
    fn test_accumulator_moves_once_per_delay() {
        let mut engine = playing_engine(GameConfig::default());
        engine.food = Some(Position::new(0, 0));
        let start = engine.snake().head();

        // 200ms is below the 300ms delay
        assert_eq!(engine.update(Duration::from_millis(200)).moves, 0);
        assert_eq!(engine.snake().head(), start);

        // 200 + 100 crosses it exactly once
        assert_eq!(engine.update(Duration::from_millis(100)).moves, 1);
        assert_eq!(engine.snake().head(), start.moved_in_direction(Direction::Up));

        // A long stall catches up with several moves
        assert_eq!(engine.update(Duration::from_millis(900)).moves, 3);
        assert_eq!(engine.snake().head(), Position::new(10, 6));
    }

    #[test]
    fn test_boost_doubles_speed() {
        let mut engine = playing_engine(GameConfig::default());
        engine.food = Some(Position::new(0, 0));
        let boost = Command {
            boost: true,
            ..Default::default()
        };

        engine.process_command(&boost);
        let info = engine.update(Duration::from_millis(150));
        assert!(engine.is_boosting());
        assert_eq!(engine.move_delay(), Duration::from_millis(150));
        assert_eq!(info.moves, 1);
        assert!(engine.boost_energy() < 100.0);

        engine.process_command(&Command::default());
        engine.update(Duration::from_millis(10));
        assert!(!engine.is_boosting());
        assert_eq!(engine.move_delay(), TICK);
    }

    #[test]
    fn test_exhausted_boost_stops_speedup() {
        let mut config = GameConfig::new(40, 40);
        config.boost.consumption_rate = 1000.0;
        let mut engine = playing_engine(config);
        engine.food = Some(Position::new(0, 0));

        let boost = Command {
            boost: true,
            ..Default::default()
        };
        engine.process_command(&boost);
        engine.update(Duration::from_millis(100));

        assert_eq!(engine.boost_energy(), 0.0);
        assert!(!engine.is_boosting());
        assert_eq!(engine.move_delay(), TICK);
    }

    #[test]
    fn test_wall_collision_ends_game() {
        let mut engine = playing_engine(GameConfig::small());
        engine.snake = Snake::new(Position::new(0, 5), Direction::Left, 3);
        engine.food = Some(Position::new(-1, 5));

        let info = engine.update(TICK);

        assert_eq!(info.collision_type, Some(CollisionType::Wall));
        assert_eq!(engine.status(), GameStatus::GameOver);
        // No food check is made once the snake left the board
        assert!(!info.ate_food);
        assert_eq!(engine.score(), 0);
    }

    #[test]
    fn test_game_over_stops_catch_up_moves() {
        let mut engine = playing_engine(GameConfig::small());
        engine.snake = Snake::new(Position::new(1, 5), Direction::Left, 3);
        engine.food = Some(Position::new(8, 8));

        let info = engine.update(TICK * 5);
        assert_eq!(info.moves, 2);
        assert_eq!(engine.status(), GameStatus::GameOver);
    }

    fn curl_into_self(engine: &mut GameEngine) -> TickInfo {
        // Body (5,5) (4,5) (3,5) (2,5) (1,5) heading right
        engine.snake = Snake::new(Position::new(5, 5), Direction::Right, 5);
        engine.food = Some(Position::new(9, 9));

        let mut info = TickInfo::default();
        for direction in [Direction::Down, Direction::Left, Direction::Up] {
            engine.process_command(&Command::steer(direction));
            info = engine.update(TICK);
        }
        info
    }

    #[test]
    fn test_self_collision() {
        let mut engine = playing_engine(GameConfig::small());
        let info = curl_into_self(&mut engine);

        assert_eq!(info.collision_type, Some(CollisionType::SelfCollision));
        assert_eq!(engine.status(), GameStatus::GameOver);
    }

    #[test]
    fn test_phase_allows_passing_through_body() {
        let mut engine = playing_engine(GameConfig::small());
        let phase = Command {
            phase: true,
            ..Default::default()
        };
        engine.process_command(&phase);
        assert!(engine.snapshot().phase_active);

        let info = curl_into_self(&mut engine);

        assert_eq!(info.collision_type, None);
        assert_eq!(engine.status(), GameStatus::Playing);
        assert!(engine.snapshot().phase_active);
    }

    #[test]
    fn test_phase_cooldown_in_snapshot() {
        let mut engine = playing_engine(GameConfig::new(40, 40));
        engine.food = Some(Position::new(0, 0));
        let phase = Command {
            phase: true,
            ..Default::default()
        };

        engine.process_command(&phase);
        engine.update(Duration::from_secs(1));
        let snapshot = engine.snapshot();
        assert!(snapshot.phase_active);
        assert!((snapshot.phase_cooldown_remaining - 9.0).abs() < 1e-4);

        // Re-activation while cooling down is a no-op
        engine.process_command(&phase);
        engine.update(Duration::from_secs(3));
        assert!(!engine.snapshot().phase_active);
    }

    #[test]
    fn test_reverse_command_ignored() {
        let mut engine = playing_engine(GameConfig::default());
        engine.food = Some(Position::new(0, 0));

        engine.process_command(&Command::steer(Direction::Down));
        engine.update(TICK);

        assert_eq!(engine.snake().direction(), Direction::Up);
        assert_eq!(engine.status(), GameStatus::Playing);
    }

    #[test]
    fn test_invalid_direction_token_ignored() {
        let mut engine = playing_engine(GameConfig::default());
        engine.food = Some(Position::new(0, 0));
        let command = Command {
            direction: DirectionIntent::from_token(Some("NORTHWEST")),
            ..Default::default()
        };

        engine.process_command(&command);
        engine.update(TICK);
        assert_eq!(engine.snake().direction(), Direction::Up);
    }

    #[test]
    fn test_eat_food_end_to_end() {
        let mut engine = playing_engine(GameConfig::default());
        engine.food = Some(Position::new(12, 10));

        engine.process_command(&Command::steer(Direction::Right));
        let first = engine.update(TICK);
        assert!(!first.ate_food);

        let second = engine.update(TICK);
        assert!(second.ate_food);
        assert_eq!(engine.score(), 10);
        assert_eq!(engine.snake().head(), Position::new(12, 10));

        // Growth lands on the following move; keep it off the new food
        let ahead = Position::new(13, 10);
        let turn = if engine.food() == Some(ahead) {
            Direction::Up
        } else {
            Direction::Right
        };
        engine.process_command(&Command::steer(turn));
        engine.update(TICK);

        let snapshot = engine.snapshot();
        assert_eq!(snapshot.score, 10);
        assert_eq!(snapshot.snake_body.len(), 4);
        assert_eq!(snapshot.status, GameStatus::Playing);

        let food = snapshot.food.expect("food relocated");
        assert_ne!(food, Position::new(12, 10));
        assert!(!snapshot.snake_body.contains(&food));
    }

    #[test]
    fn test_difficulty_rises_with_score() {
        let mut engine = playing_engine(GameConfig::new(40, 40));

        for _ in 0..5 {
            let next = engine.snake().head().moved_in_direction(Direction::Up);
            engine.food = Some(next);
            engine.update(engine.move_delay());
        }

        assert_eq!(engine.score(), 50);
        assert!((engine.difficulty() - 1.1).abs() < 1e-6);
        assert!(engine.move_delay() < TICK);
    }

    #[test]
    fn test_high_score_and_restart() {
        let mut engine = playing_engine(GameConfig::small());
        engine.food = Some(engine.snake().head().moved_in_direction(Direction::Up));
        engine.update(TICK);
        assert_eq!(engine.score(), 10);
        engine.food = Some(Position::new(0, 9));

        // Run into the top wall
        engine.update(TICK * 10);
        assert_eq!(engine.status(), GameStatus::GameOver);
        assert_eq!(engine.high_score(), 10);

        // Only restart is honored after game over
        engine.process_command(&Command::steer(Direction::Left));
        assert_eq!(engine.status(), GameStatus::GameOver);

        engine.process_command(&Command::restart());
        assert_eq!(engine.status(), GameStatus::Playing);
        assert_eq!(engine.score(), 0);
        assert_eq!(engine.high_score(), 10);
        assert_eq!(engine.snake().len(), 3);
    }

    #[test]
    fn test_pause_freezes_simulation() {
        let mut engine = playing_engine(GameConfig::default());
        engine.food = Some(Position::new(0, 0));

        engine.toggle_pause();
        assert_eq!(engine.status(), GameStatus::Paused);
        let head = engine.snake().head();
        assert_eq!(engine.update(TICK * 3).moves, 0);
        assert_eq!(engine.snake().head(), head);
        assert_eq!(engine.clock(), Duration::ZERO);

        engine.toggle_pause();
        assert_eq!(engine.update(TICK).moves, 1);
    }

    #[test]
    fn test_restart_from_pause() {
        let mut engine = playing_engine(GameConfig::default());
        engine.food = Some(engine.snake().head().moved_in_direction(Direction::Up));
        engine.update(TICK);
        assert_eq!(engine.score(), 10);

        engine.toggle_pause();
        assert_eq!(engine.status(), GameStatus::Paused);

        // Steering is ignored while paused, restart is not
        engine.process_command(&Command::steer(Direction::Left));
        assert_eq!(engine.status(), GameStatus::Paused);

        engine.process_command(&Command::restart());
        assert_eq!(engine.status(), GameStatus::Playing);
        assert_eq!(engine.score(), 0);
        assert_eq!(engine.clock(), Duration::ZERO);
        assert_eq!(engine.snake().head(), Position::new(10, 10));
        assert_eq!(engine.snake().len(), 3);
        // No game over happened, so the high score is untouched
        assert_eq!(engine.high_score(), 0);
    }

    #[test]
    fn test_full_board_leaves_no_food() {
        let mut engine = playing_engine(GameConfig::new(3, 3));
        engine.snake = Snake::from_segments(
            vec![
                Position::new(0, 0),
                Position::new(1, 0),
                Position::new(2, 0),
                Position::new(2, 1),
                Position::new(1, 1),
                Position::new(0, 1),
                Position::new(0, 2),
                Position::new(1, 2),
                Position::new(2, 2),
            ],
            Direction::Left,
        );

        assert_eq!(engine.place_food(), None);
    }

    #[test]
    fn test_eating_last_food_keeps_game_running() {
        let mut engine = playing_engine(GameConfig::new(3, 3));
        // Every cell but the top-left corner, head moving left toward it
        engine.snake = Snake::from_segments(
            vec![
                Position::new(1, 0),
                Position::new(2, 0),
                Position::new(2, 1),
                Position::new(1, 1),
                Position::new(0, 1),
                Position::new(0, 2),
                Position::new(1, 2),
                Position::new(2, 2),
            ],
            Direction::Left,
        );
        // Growth owed from an earlier food keeps the tail in place
        engine.snake.grow();
        engine.food = Some(Position::new(0, 0));
        engine.process_command(&Command {
            phase: true,
            ..Default::default()
        });

        let eat = engine.update(TICK);
        assert_eq!(eat.moves, 1);
        assert!(eat.ate_food);
        assert_eq!(eat.collision_type, None);
        assert_eq!(engine.snake().len(), 9);
        assert_eq!(engine.food(), None);
        assert_eq!(engine.score(), 10);

        // Keep ticking on a board with no food; phase lets the head cross the body
        engine.process_command(&Command::steer(Direction::Down));
        let next = engine.update(TICK);
        assert_eq!(next.moves, 1);
        assert!(!next.ate_food);
        assert_eq!(next.collision_type, None);
        assert_eq!(engine.status(), GameStatus::Playing);
        assert_eq!(engine.food(), None);
        assert_eq!(engine.snapshot().food, None);
    }

    #[test]
    fn test_food_never_on_snake_for_any_seed() {
        for seed in 0..50 {
            let mut engine = GameEngine::with_seed(GameConfig::small(), seed);
            engine.reset();
            let food = engine.food().expect("free cells remain");
            assert!(!engine.snake().occupies(food));
        }
    }
}
