use rand::Rng;
use rand::seq::SliceRandom;
use std::collections::HashSet;

use super::state::Position;

/// The fixed-size playing field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Board {
    width: usize,
    height: usize,
}

impl Board {
    pub fn new(width: usize, height: usize) -> Self {
        Self { width, height }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Check if a position is within the grid bounds
    pub fn in_bounds(&self, pos: Position) -> bool {
        pos.x >= 0 && pos.x < self.width as i32 && pos.y >= 0 && pos.y < self.height as i32
    }

    /// Spawn point of the snake
    pub fn center(&self) -> Position {
        Position::new((self.width / 2) as i32, (self.height / 2) as i32)
    }

    /// Pick a cell uniformly among those not in `occupied`.
    ///
    /// Returns [`Position::OFF_BOARD`] when every cell is taken.
    pub fn random_empty_cell<R: Rng + ?Sized>(
        &self,
        occupied: &[Position],
        rng: &mut R,
    ) -> Position {
        let taken: HashSet<Position> = occupied.iter().copied().collect();

        let free: Vec<Position> = (0..self.height as i32)
            .flat_map(|y| (0..self.width as i32).map(move |x| Position::new(x, y)))
            .filter(|pos| !taken.contains(pos))
            .collect();

        free.choose(rng).copied().unwrap_or(Position::OFF_BOARD)
    }
}
