use crate::config::GRID_SIZE;

/// The four directions tiles can be pushed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    #[cfg(test)]
    pub fn all() -> [Direction; 4] {
        [Direction::Up, Direction::Down, Direction::Left, Direction::Right]
    }

    /// Row/column step of one cell in this direction
    pub fn delta(self) -> (isize, isize) {
        match self {
            Direction::Up => (-1, 0),
            Direction::Down => (1, 0),
            Direction::Left => (0, -1),
            Direction::Right => (0, 1),
        }
    }

    /// Neighbouring cell in this direction, or `None` off the board edge
    pub fn step(self, row: usize, col: usize) -> Option<(usize, usize)> {
        let (dr, dc) = self.delta();
        let next_row = row.checked_add_signed(dr)?;
        let next_col = col.checked_add_signed(dc)?;
        if next_row < GRID_SIZE && next_col < GRID_SIZE {
            Some((next_row, next_col))
        } else {
            None
        }
    }

    /// Every cell, ordered nearest-to-farthest from the edge tiles are pushed toward
    ///
    /// Resolving tiles in this order lets each one slide into space freed by
    /// the tile ahead of it within the same move.
    pub fn traversal(self) -> Vec<(usize, usize)> {
        let forward: Vec<usize> = (0..GRID_SIZE).collect();
        let backward: Vec<usize> = (0..GRID_SIZE).rev().collect();

        let mut cells = Vec::with_capacity(GRID_SIZE * GRID_SIZE);
        match self {
            Direction::Up | Direction::Down => {
                let rows = if self == Direction::Up { &forward } else { &backward };
                for &row in rows {
                    for col in 0..GRID_SIZE {
                        cells.push((row, col));
                    }
                }
            }
            Direction::Left | Direction::Right => {
                let cols = if self == Direction::Left { &forward } else { &backward };
                for &col in cols {
                    for row in 0..GRID_SIZE {
                        cells.push((row, col));
                    }
                }
            }
        }
        cells
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_step_stays_on_board() {
        assert_eq!(Direction::Up.step(0, 2), None);
        assert_eq!(Direction::Left.step(1, 0), None);
        assert_eq!(Direction::Down.step(3, 0), None);
        assert_eq!(Direction::Right.step(0, 3), None);

        assert_eq!(Direction::Up.step(2, 2), Some((1, 2)));
        assert_eq!(Direction::Right.step(2, 2), Some((2, 3)));
    }

    #[test]
    fn test_traversal_starts_at_target_edge() {
        assert_eq!(Direction::Up.traversal()[0].0, 0);
        assert_eq!(Direction::Down.traversal()[0].0, 3);
        assert_eq!(Direction::Left.traversal()[0].1, 0);
        assert_eq!(Direction::Right.traversal()[0].1, 3);
    }

    #[test]
    fn test_traversal_covers_every_cell_once() {
        for direction in Direction::all() {
            let mut cells = direction.traversal();
            cells.sort();
            cells.dedup();
            assert_eq!(cells.len(), GRID_SIZE * GRID_SIZE);
        }
    }
}
