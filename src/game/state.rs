use serde::{Deserialize, Serialize};

use super::action::Direction;

/// A position on the game grid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    /// Returned when no free cell exists. Never inside any board.
    pub const OFF_BOARD: Position = Position { x: -1, y: -1 };

    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Move position by delta
    pub fn moved_by(&self, dx: i32, dy: i32) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
        }
    }

    /// Move position in a direction
    pub fn moved_in_direction(&self, direction: Direction) -> Self {
        let (dx, dy) = direction.delta();
        self.moved_by(dx, dy)
    }

    pub fn is_adjacent(&self, other: Position) -> bool {
        (self.x - other.x).abs() + (self.y - other.y).abs() == 1
    }
}

/// The snake in the game
#[derive(Debug, Clone, PartialEq)]
pub struct Snake {
    /// Body segments, with head at index 0
    body: Vec<Position>,
    /// Direction of the last move
    direction: Direction,
    /// Direction the next move will take
    pending: Direction,
    growing: bool,
}

impl Snake {
    /// Create a snake whose body trails behind the head, opposite to `direction`
    pub fn new(head: Position, direction: Direction, length: usize) -> Self {
        let mut body = vec![head];

        let (dx, dy) = direction.opposite().delta();
        for i in 1..length.max(1) {
            let prev = body[i - 1];
            body.push(prev.moved_by(dx, dy));
        }

        Self {
            body,
            direction,
            pending: direction,
            growing: false,
        }
    }

    /// Build a snake from explicit segments. An empty list yields a
    /// single-cell snake at the origin.
    pub fn from_segments(segments: Vec<Position>, direction: Direction) -> Self {
        let body = if segments.is_empty() {
            vec![Position::new(0, 0)]
        } else {
            segments
        };

        Self {
            body,
            direction,
            pending: direction,
            growing: false,
        }
    }

    /// Get the head position
    pub fn head(&self) -> Position {
        self.body[0]
    }

    pub fn body(&self) -> &[Position] {
        &self.body
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    pub fn pending_direction(&self) -> Direction {
        self.pending
    }

    pub fn is_growing(&self) -> bool {
        self.growing
    }

    /// Get body segments (excluding head)
    pub fn body_segments(&self) -> &[Position] {
        &self.body[1..]
    }

    /// Check if position collides with snake body (excluding head)
    pub fn collides_with_body(&self, pos: Position) -> bool {
        self.body_segments().contains(&pos)
    }

    pub fn occupies(&self, pos: Position) -> bool {
        self.body.contains(&pos)
    }

    /// Queue a direction for the next move. A reversal of the current
    /// direction is ignored.
    pub fn set_direction(&mut self, direction: Direction) {
        if !self.direction.is_opposite(direction) {
            self.pending = direction;
        }
    }

    /// Grow by one segment on the next move
    pub fn grow(&mut self) {
        self.growing = true;
    }

    /// Advance one cell in the pending direction
    pub fn move_forward(&mut self) {
        self.direction = self.pending;

        let new_head = self.head().moved_in_direction(self.direction);
        self.body.insert(0, new_head);

        if self.growing {
            self.growing = false;
        } else {
            self.body.pop();
        }
    }

    /// True if the head overlaps any other segment. Always false while
    /// phasing.
    pub fn check_self_collision(&self, phase_active: bool) -> bool {
        !phase_active && self.collides_with_body(self.head())
    }

    /// Get the length of the snake
    pub fn len(&self) -> usize {
        self.body.len()
    }

    /// Check if the snake is empty (should never happen in practice)
    pub fn is_empty(&self) -> bool {
        self.body.is_empty()
    }
}

/// Type of collision that occurred
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CollisionType {
    /// Snake hit a wall
    Wall,
    /// Snake hit itself
    SelfCollision,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_position_movement() {
        let pos = Position::new(5, 5);
        assert_eq!(pos.moved_by(1, 0), Position::new(6, 5));
        assert_eq!(pos.moved_by(-1, 0), Position::new(4, 5));
        assert_eq!(pos.moved_in_direction(Direction::Down), Position::new(5, 6));
        assert_eq!(pos.moved_in_direction(Direction::Up), Position::new(5, 4));
    }

    #[test]
    fn test_snake_creation() {
        let snake = Snake::new(Position::new(10, 10), Direction::Up, 3);
        assert_eq!(snake.len(), 3);
        assert_eq!(snake.head(), Position::new(10, 10));
        assert_eq!(snake.body()[1], Position::new(10, 11));
        assert_eq!(snake.body()[2], Position::new(10, 12));
    }

    #[test]
    fn test_snake_movement() {
        let mut snake = Snake::new(Position::new(10, 10), Direction::Up, 3);

        snake.move_forward();
        assert_eq!(snake.head(), Position::new(10, 9));
        assert_eq!(snake.len(), 3);
    }

    #[test]
    fn test_grow_adds_exactly_one_segment() {
        let mut snake = Snake::new(Position::new(10, 10), Direction::Up, 3);

        snake.grow();
        snake.move_forward();
        assert_eq!(snake.len(), 4);
        assert!(!snake.is_growing());

        snake.move_forward();
        assert_eq!(snake.len(), 4);
    }

    #[test]
    fn test_reverse_is_ignored() {
        let mut snake = Snake::new(Position::new(10, 10), Direction::Up, 3);

        snake.set_direction(Direction::Down);
        assert_eq!(snake.pending_direction(), Direction::Up);

        snake.move_forward();
        assert_eq!(snake.direction(), Direction::Up);
    }

    #[test]
    fn test_reverse_checked_against_current_not_pending() {
        let mut snake = Snake::new(Position::new(10, 10), Direction::Up, 3);

        // Queue LEFT, then DOWN: DOWN reverses the current UP and is dropped
        snake.set_direction(Direction::Left);
        snake.set_direction(Direction::Down);
        assert_eq!(snake.pending_direction(), Direction::Left);

        snake.move_forward();
        assert_eq!(snake.direction(), Direction::Left);
    }

    #[test]
    fn test_realized_direction_never_reverses() {
        let all = [
            Direction::Up,
            Direction::Down,
            Direction::Left,
            Direction::Right,
        ];
        let mut snake = Snake::new(Position::new(50, 50), Direction::Up, 3);

        for (i, a) in all.iter().cycle().take(40).enumerate() {
            let before = snake.direction();
            snake.set_direction(*a);
            snake.set_direction(all[(i * 7) % 4]);
            snake.move_forward();
            assert!(!snake.direction().is_opposite(before));
        }
    }

    #[test]
    fn test_segments_stay_adjacent() {
        let mut snake = Snake::new(Position::new(10, 10), Direction::Up, 4);
        snake.set_direction(Direction::Left);
        snake.move_forward();
        snake.grow();
        snake.set_direction(Direction::Down);
        snake.move_forward();

        for pair in snake.body().windows(2) {
            assert!(pair[0].is_adjacent(pair[1]));
        }
    }

    #[test]
    fn test_self_collision_respects_phase() {
        let loop_body = vec![
            Position::new(10, 10),
            Position::new(10, 11),
            Position::new(11, 11),
            Position::new(11, 10),
            Position::new(10, 10),
        ];
        let snake = Snake::from_segments(loop_body, Direction::Up);

        assert!(snake.check_self_collision(false));
        assert!(!snake.check_self_collision(true));
    }

    #[test]
    fn test_collision_detection() {
        let snake = Snake::new(Position::new(5, 5), Direction::Right, 3);
        assert!(!snake.collides_with_body(Position::new(5, 5))); // head
        assert!(snake.collides_with_body(Position::new(4, 5))); // body
        assert!(!snake.collides_with_body(Position::new(10, 10))); // empty
        assert!(!snake.check_self_collision(false));
    }
}
