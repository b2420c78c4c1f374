use crate::config::{CELL_COUNT, GRID_SIZE, SpawnConfig};
use log::{debug, info, trace};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::direction::Direction;
use super::tile::{Tile, TileArena, TileId, TileVisual};

/// What a single call to [`GridEngine::move_tiles`] changed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MoveOutcome {
    /// At least one tile changed cell or merged
    pub moved: bool,
    pub merges: u32,
    pub score_gained: u32,
    /// Tile spawned after a successful move (`None` for no-op moves or a full board)
    pub spawned: Option<TileId>,
}

/// Cells that already produced a merge during the current move
///
/// Lives only for the duration of one `move_tiles` call.
#[derive(Debug, Clone, Copy, Default)]
struct MergedCells(u16);

impl MergedCells {
    fn bit(row: usize, col: usize) -> u16 {
        1 << (row * GRID_SIZE + col)
    }

    fn insert(&mut self, row: usize, col: usize) {
        self.0 |= Self::bit(row, col);
    }

    fn contains(&self, row: usize, col: usize) -> bool {
        self.0 & Self::bit(row, col) != 0
    }
}

/// Logical 4x4 board: tile positions, values, score and game-over state
///
/// `cells` gives O(1) lookup of the tile resting in each cell; tile data
/// itself lives in the arena. Exactly one tile id per occupied cell, and
/// every live tile is referenced by exactly one cell.
pub struct GridEngine {
    cells: [[Option<TileId>; GRID_SIZE]; GRID_SIZE],
    tiles: TileArena,
    score: u32,
    game_over: bool,
    four_probability: f64,
    rng: StdRng,
}

impl GridEngine {
    /// Start a new game with an OS-seeded RNG
    pub fn new(spawn: &SpawnConfig) -> Self {
        Self::with_rng(StdRng::from_os_rng(), spawn.four_probability)
    }

    /// Start a new game with a fixed seed (deterministic spawns)
    #[cfg(test)]
    pub fn with_seed(seed: u64, four_probability: f64) -> Self {
        Self::with_rng(StdRng::seed_from_u64(seed), four_probability)
    }

    pub fn with_rng(rng: StdRng, four_probability: f64) -> Self {
        let mut engine = Self::empty(rng, four_probability);
        engine.spawn_tile();
        engine.spawn_tile();
        engine
    }

    fn empty(rng: StdRng, four_probability: f64) -> Self {
        GridEngine {
            cells: [[None; GRID_SIZE]; GRID_SIZE],
            tiles: TileArena::new(),
            score: 0,
            game_over: false,
            four_probability: four_probability.clamp(0.0, 1.0),
            rng,
        }
    }

    /// Throw away the current game and deal a fresh two-tile board
    pub fn reset(&mut self) {
        self.cells = [[None; GRID_SIZE]; GRID_SIZE];
        self.tiles.clear();
        self.score = 0;
        self.game_over = false;
        self.spawn_tile();
        self.spawn_tile();
        info!("New game started");
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn is_game_over(&self) -> bool {
        self.game_over
    }

    pub fn tile_count(&self) -> usize {
        self.tiles.len()
    }

    pub fn tiles(&self) -> impl Iterator<Item = &Tile> {
        self.tiles.iter()
    }

    /// Visual state of every tile alongside its logical cell, for the animation layer
    pub fn visuals_mut(&mut self) -> impl Iterator<Item = (usize, usize, &mut TileVisual)> {
        self.tiles
            .iter_mut()
            .map(|tile| (tile.row, tile.col, &mut tile.visual))
    }

    pub fn tile(&self, id: TileId) -> Option<&Tile> {
        self.tiles.get(id)
    }

    pub fn tile_at(&self, row: usize, col: usize) -> Option<&Tile> {
        let id = (*self.cells.get(row)?.get(col)?)?;
        self.tiles.get(id)
    }

    pub fn highest_value(&self) -> u32 {
        self.tiles.iter().map(|t| t.value).max().unwrap_or(0)
    }

    fn value_at(&self, row: usize, col: usize) -> Option<u32> {
        self.tile_at(row, col).map(|t| t.value)
    }

    fn empty_cells(&self) -> Vec<(usize, usize)> {
        let mut empty = Vec::with_capacity(CELL_COUNT);
        for row in 0..GRID_SIZE {
            for col in 0..GRID_SIZE {
                if self.cells[row][col].is_none() {
                    empty.push((row, col));
                }
            }
        }
        empty
    }

    /// Place a 2 (or, rarely, a 4) on a random empty cell
    ///
    /// Does nothing on a full board. Game over is re-evaluated either way.
    pub fn spawn_tile(&mut self) -> Option<TileId> {
        let empty = self.empty_cells();
        let spawned = if empty.is_empty() {
            None
        } else {
            let (row, col) = empty[self.rng.random_range(0..empty.len())];
            let value = if self.rng.random_bool(self.four_probability) { 4 } else { 2 };
            let id = self.tiles.insert(Tile::new(value, row, col, TileVisual::spawned()));
            self.cells[row][col] = Some(id);
            trace!("Spawned {} at ({}, {})", value, row, col);
            Some(id)
        };

        self.check_game_over();
        spawned
    }

    /// Push every tile as far as it goes in `direction`, merging equal pairs
    ///
    /// A tile merges at most once per move, and the merged result does not
    /// merge again until the next move. A new tile spawns only if something
    /// actually moved. Ignored once the game is over.
    pub fn move_tiles(&mut self, direction: Direction) -> MoveOutcome {
        let mut outcome = MoveOutcome::default();
        if self.game_over {
            return outcome;
        }

        let mut merged = MergedCells::default();

        for (start_row, start_col) in direction.traversal() {
            let Some(id) = self.cells[start_row][start_col] else {
                continue;
            };
            let Some(value) = self.tiles.get(id).map(|t| t.value) else {
                continue;
            };

            let (mut row, mut col) = (start_row, start_col);
            let mut merge_into = None;

            while let Some((next_row, next_col)) = direction.step(row, col) {
                match self.value_at(next_row, next_col) {
                    None => {
                        row = next_row;
                        col = next_col;
                    }
                    Some(other) if other == value && !merged.contains(next_row, next_col) => {
                        merge_into = Some((next_row, next_col));
                        break;
                    }
                    Some(_) => break,
                }
            }

            if let Some((merge_row, merge_col)) = merge_into {
                let gained = self.merge(start_row, start_col, merge_row, merge_col);
                merged.insert(merge_row, merge_col);
                self.score += gained;
                outcome.score_gained += gained;
                outcome.merges += 1;
                outcome.moved = true;
            } else if (row, col) != (start_row, start_col) {
                self.cells[start_row][start_col] = None;
                self.cells[row][col] = Some(id);
                if let Some(tile) = self.tiles.get_mut(id) {
                    tile.row = row;
                    tile.col = col;
                }
                outcome.moved = true;
            }
        }

        if outcome.moved {
            outcome.spawned = self.spawn_tile();
            debug!(
                "Moved {:?}: {} merge(s), +{} (score {})",
                direction, outcome.merges, outcome.score_gained, self.score
            );
        } else {
            trace!("Move {:?} changed nothing", direction);
        }

        outcome
    }

    /// Replace the tiles at `from` and `into` with one doubled tile at `into`
    ///
    /// Both inputs leave the board in the same step the result arrives, so
    /// there is never a moment where two tiles claim one cell.
    fn merge(&mut self, from_row: usize, from_col: usize, into_row: usize, into_col: usize) -> u32 {
        let mut value = 0;
        if let Some(id) = self.cells[from_row][from_col].take() {
            value += self.tiles.remove(id).map_or(0, |t| t.value);
        }
        if let Some(id) = self.cells[into_row][into_col].take() {
            value += self.tiles.remove(id).map_or(0, |t| t.value);
        }

        let id = self
            .tiles
            .insert(Tile::new(value, into_row, into_col, TileVisual::merged()));
        self.cells[into_row][into_col] = Some(id);
        value
    }

    /// Some horizontally or vertically adjacent pair shares a value
    fn has_available_merge(&self) -> bool {
        for row in 0..GRID_SIZE {
            for col in 0..GRID_SIZE {
                let Some(value) = self.value_at(row, col) else {
                    continue;
                };
                if self.value_at(row, col + 1) == Some(value) {
                    return true;
                }
                if self.value_at(row + 1, col) == Some(value) {
                    return true;
                }
            }
        }
        false
    }

    fn check_game_over(&mut self) {
        let over = self.tile_count() >= CELL_COUNT && !self.has_available_merge();
        if over && !self.game_over {
            info!(
                "Game over: score {}, highest tile {}",
                self.score,
                self.highest_value()
            );
        }
        self.game_over = over;
    }

    /// Board built from a value matrix (0 = empty), without the opening spawns
    #[cfg(test)]
    pub(crate) fn from_values(values: [[u32; GRID_SIZE]; GRID_SIZE], seed: u64) -> Self {
        let mut engine = Self::empty(StdRng::seed_from_u64(seed), 0.1);
        for (row, line) in values.iter().enumerate() {
            for (col, &value) in line.iter().enumerate() {
                if value != 0 {
                    let id = engine.tiles.insert(Tile::new(value, row, col, TileVisual::spawned()));
                    engine.cells[row][col] = Some(id);
                }
            }
        }
        engine.check_game_over();
        engine
    }

    /// Value matrix of the board (0 = empty)
    #[cfg(test)]
    pub(crate) fn values(&self) -> [[u32; GRID_SIZE]; GRID_SIZE] {
        let mut values = [[0; GRID_SIZE]; GRID_SIZE];
        for (row, line) in values.iter_mut().enumerate() {
            for (col, value) in line.iter_mut().enumerate() {
                *value = self.value_at(row, col).unwrap_or(0);
            }
        }
        values
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn total(engine: &GridEngine) -> u32 {
        engine.tiles().map(|t| t.value).sum()
    }

    /// Values of the board excluding the tile spawned by the last move
    fn values_without(engine: &GridEngine, spawned: Option<TileId>) -> [[u32; GRID_SIZE]; GRID_SIZE] {
        let mut values = engine.values();
        if let Some(tile) = spawned.and_then(|id| engine.tiles.get(id)) {
            values[tile.row][tile.col] = 0;
        }
        values
    }

    fn assert_cells_consistent(engine: &GridEngine) {
        let mut seen = 0;
        for row in 0..GRID_SIZE {
            for col in 0..GRID_SIZE {
                if let Some(id) = engine.cells[row][col] {
                    let tile = engine.tiles.get(id).expect("cell points at a live tile");
                    assert_eq!((tile.row, tile.col), (row, col));
                    seen += 1;
                }
            }
        }
        assert_eq!(seen, engine.tile_count());
    }

    #[test]
    fn test_new_game_has_two_tiles() {
        for seed in 0..50 {
            let engine = GridEngine::with_seed(seed, 0.1);
            assert_eq!(engine.tile_count(), 2);
            let tiles: Vec<&Tile> = engine.tiles().collect();
            assert!(tiles.iter().all(|t| t.value == 2 || t.value == 4));
            assert_ne!((tiles[0].row, tiles[0].col), (tiles[1].row, tiles[1].col));
            assert_eq!(engine.score(), 0);
            assert!(!engine.is_game_over());
            assert_cells_consistent(&engine);
        }
    }

    #[test]
    fn test_spawn_on_empty_board_twice() {
        let mut engine = GridEngine::from_values([[0; 4]; 4], 3);
        let a = engine.spawn_tile();
        let b = engine.spawn_tile();
        assert!(a.is_some() && b.is_some());
        assert_eq!(engine.tile_count(), 2);
        assert_cells_consistent(&engine);
    }

    #[test]
    fn test_spawn_values_are_mostly_twos() {
        let mut engine = GridEngine::from_values([[0; 4]; 4], 42);
        let mut fours = 0;
        let trials = 10_000;
        for _ in 0..trials {
            let id = engine.spawn_tile().expect("board has room");
            let value = engine.tiles.get(id).map(|t| t.value).unwrap_or(0);
            assert!(value == 2 || value == 4);
            if value == 4 {
                fours += 1;
            }
            engine.cells = [[None; GRID_SIZE]; GRID_SIZE];
            engine.tiles.clear();
        }
        let ratio = fours as f64 / trials as f64;
        assert!((0.08..0.12).contains(&ratio), "ratio of fours was {}", ratio);
    }

    #[test]
    fn test_spawn_on_full_board_is_noop() {
        let mut engine = GridEngine::from_values(
            [[2, 4, 2, 4], [4, 2, 4, 2], [2, 4, 2, 4], [4, 2, 4, 2]],
            1,
        );
        assert_eq!(engine.spawn_tile(), None);
        assert_eq!(engine.tile_count(), 16);
    }

    #[test]
    fn test_move_left_merges_pair() {
        let mut engine = GridEngine::from_values(
            [[2, 2, 0, 0], [0, 0, 0, 0], [0, 0, 0, 0], [0, 0, 0, 0]],
            7,
        );
        let outcome = engine.move_tiles(Direction::Left);

        assert!(outcome.moved);
        assert_eq!(outcome.merges, 1);
        assert_eq!(outcome.score_gained, 4);
        assert_eq!(engine.score(), 4);
        assert_eq!(engine.tile_at(0, 0).map(|t| t.value), Some(4));
        assert_eq!(engine.tile_count(), 2);

        let spawned = outcome.spawned.and_then(|id| engine.tile(id)).expect("spawned");
        assert_ne!((spawned.row, spawned.col), (0, 0));
        assert_eq!(engine.tile_at(spawned.row, spawned.col).map(|t| t.value), Some(spawned.value));
        assert_cells_consistent(&engine);
    }

    #[test]
    fn test_noop_move_changes_nothing() {
        let start = [[2, 4, 0, 0], [8, 0, 0, 0], [0, 0, 0, 0], [0, 0, 0, 0]];
        let mut engine = GridEngine::from_values(start, 7);
        let outcome = engine.move_tiles(Direction::Left);

        assert_eq!(outcome, MoveOutcome::default());
        assert_eq!(engine.values(), start);
        assert_eq!(engine.tile_count(), 3);
        assert_eq!(engine.score(), 0);
    }

    #[test]
    fn test_slide_without_merge() {
        let mut engine = GridEngine::from_values(
            [[0, 0, 0, 2], [0, 4, 0, 0], [0, 0, 0, 0], [0, 0, 0, 0]],
            9,
        );
        let outcome = engine.move_tiles(Direction::Left);
        assert!(outcome.moved);
        assert_eq!(outcome.merges, 0);
        assert_eq!(
            values_without(&engine, outcome.spawned),
            [[2, 0, 0, 0], [4, 0, 0, 0], [0, 0, 0, 0], [0, 0, 0, 0]]
        );
        assert_cells_consistent(&engine);
    }

    #[test]
    fn test_no_chain_merge_in_one_move() {
        let mut engine = GridEngine::from_values(
            [[4, 2, 2, 0], [0, 0, 0, 0], [0, 0, 0, 0], [0, 0, 0, 0]],
            11,
        );
        let outcome = engine.move_tiles(Direction::Left);
        assert_eq!(outcome.merges, 1);
        assert_eq!(
            values_without(&engine, outcome.spawned)[0],
            [4, 4, 0, 0]
        );
    }

    #[test]
    fn test_four_equal_tiles_make_two_pairs() {
        let mut engine = GridEngine::from_values(
            [[2, 2, 2, 2], [0, 0, 0, 0], [0, 0, 0, 0], [0, 0, 0, 0]],
            5,
        );
        let outcome = engine.move_tiles(Direction::Right);
        assert_eq!(outcome.merges, 2);
        assert_eq!(outcome.score_gained, 8);
        assert_eq!(values_without(&engine, outcome.spawned)[0], [0, 0, 4, 4]);
    }

    #[test]
    fn test_three_in_a_row_merges_nearest_pair() {
        let mut engine = GridEngine::from_values(
            [[2, 0, 0, 0], [2, 0, 0, 0], [2, 0, 0, 0], [0, 0, 0, 0]],
            13,
        );
        let outcome = engine.move_tiles(Direction::Down);
        let column: Vec<u32> = values_without(&engine, outcome.spawned)
            .iter()
            .map(|line| line[0])
            .collect();
        assert_eq!(column, vec![0, 0, 2, 4]);
    }

    #[test]
    fn test_move_up_slides_through_gaps() {
        let mut engine = GridEngine::from_values(
            [[0, 0, 0, 0], [0, 0, 0, 0], [0, 8, 0, 0], [0, 8, 0, 0]],
            17,
        );
        let outcome = engine.move_tiles(Direction::Up);
        assert_eq!(outcome.merges, 1);
        assert_eq!(engine.tile_at(0, 1).map(|t| t.value), Some(16));
        assert_eq!(engine.score(), 16);
    }

    #[test]
    fn test_merge_preserves_value_sum() {
        let mut engine = GridEngine::from_values(
            [[2, 2, 4, 4], [8, 0, 8, 0], [0, 16, 0, 16], [2, 4, 8, 16]],
            19,
        );
        let before = total(&engine);
        let outcome = engine.move_tiles(Direction::Left);
        let spawned_value = outcome
            .spawned
            .and_then(|id| engine.tiles.get(id))
            .map_or(0, |t| t.value);
        assert_eq!(total(&engine) - spawned_value, before);
    }

    #[test]
    fn test_random_play_keeps_invariants() {
        let mut engine = GridEngine::with_seed(2024, 0.1);
        let mut score = 0;
        for step in 0..500 {
            if engine.is_game_over() {
                break;
            }
            let before = engine.tile_count();
            let outcome = engine.move_tiles(Direction::all()[step % 4]);

            assert!(engine.score() >= score);
            score = engine.score();
            let expected = before - outcome.merges as usize + usize::from(outcome.spawned.is_some());
            assert_eq!(engine.tile_count(), expected);
            assert!(engine.tile_count() <= CELL_COUNT);
            if !outcome.moved {
                assert!(outcome.spawned.is_none());
            }
            assert!(engine.tiles().all(|t| t.value >= 2 && t.value.is_power_of_two()));
            assert_cells_consistent(&engine);
        }
    }

    #[test]
    fn test_checkerboard_is_game_over() {
        let engine = GridEngine::from_values(
            [[2, 4, 2, 4], [4, 2, 4, 2], [2, 4, 2, 4], [4, 2, 4, 2]],
            1,
        );
        assert!(engine.is_game_over());
    }

    #[test]
    fn test_full_board_with_pair_is_not_over() {
        let engine = GridEngine::from_values(
            [[2, 4, 2, 4], [4, 2, 4, 2], [2, 4, 2, 4], [4, 2, 4, 4]],
            1,
        );
        assert!(!engine.is_game_over());

        let vertical = GridEngine::from_values(
            [[2, 4, 2, 4], [4, 2, 4, 2], [2, 4, 2, 4], [2, 2, 4, 2]],
            1,
        );
        assert!(!vertical.is_game_over());
    }

    #[test]
    fn test_board_with_space_is_not_over() {
        let engine = GridEngine::from_values(
            [[2, 4, 2, 4], [4, 2, 4, 2], [2, 4, 2, 4], [4, 2, 4, 0]],
            1,
        );
        assert!(!engine.is_game_over());
    }

    #[test]
    fn test_move_ignored_after_game_over() {
        let start = [[2, 4, 2, 4], [4, 2, 4, 2], [2, 4, 2, 4], [4, 2, 4, 2]];
        let mut engine = GridEngine::from_values(start, 1);
        for direction in Direction::all() {
            assert!(!engine.move_tiles(direction).moved);
        }
        assert_eq!(engine.values(), start);
    }

    #[test]
    fn test_last_spawn_can_end_the_game() {
        // Sliding left frees only (0, 3); a 2 or 4 there has no equal neighbour
        let mut engine = GridEngine::from_values(
            [[0, 8, 16, 32], [16, 32, 64, 128], [32, 64, 128, 256], [64, 128, 256, 512]],
            23,
        );
        let outcome = engine.move_tiles(Direction::Left);
        assert!(outcome.moved);
        assert_eq!(engine.tile_count(), 16);
        assert!(engine.is_game_over());
    }

    #[test]
    fn test_reset_starts_fresh() {
        let mut engine = GridEngine::from_values(
            [[2, 4, 2, 4], [4, 2, 4, 2], [2, 4, 2, 4], [4, 2, 4, 2]],
            1,
        );
        engine.score = 1234;
        engine.reset();
        assert!(!engine.is_game_over());
        assert_eq!(engine.score(), 0);
        assert_eq!(engine.tile_count(), 2);
        assert_cells_consistent(&engine);
    }

    #[test]
    fn test_highest_value() {
        let engine = GridEngine::from_values(
            [[2, 0, 0, 0], [0, 256, 0, 0], [0, 0, 8, 0], [0, 0, 0, 0]],
            1,
        );
        assert_eq!(engine.highest_value(), 256);
    }
}
