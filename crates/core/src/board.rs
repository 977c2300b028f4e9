//! Board module - manages the 4x4 grid and the tile table
//!
//! The grid is a flat row-major array of tile ids and is the only source of
//! spatial truth. Tile values live in a side table keyed by [`TileId`]; an
//! ordered id list keeps iteration stable (spawn order, absorbed ids removed).
//!
//! Coordinates: (x, y) where x ranges 0..3 (left to right), y ranges 0..3 (top to bottom).

use std::collections::BTreeMap;
use std::fmt;

use arrayvec::ArrayVec;

use crate::prng::Xorshift128Plus;
use crate::types::{
    Direction, Position, Tile, TileId, BOARD_SIZE, CELL_COUNT, TWO_TILE_THRESHOLD,
};

/// One merge performed by a slide.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Merge {
    /// Tile that keeps its id and doubles.
    pub survivor: TileId,
    /// Tile retired by the merge.
    pub absorbed: TileId,
    /// Value after the merge.
    pub value: u32,
    pub position: Position,
}

/// Result of sliding a board in one direction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Slide {
    pub board: Board,
    pub score_delta: u32,
    /// True iff any tile moved or merged.
    pub changed: bool,
    pub merges: ArrayVec<Merge, 8>,
}

/// The game board - grid of tile ids plus the tile table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Board {
    /// Flat array of cells, row-major order (y * SIZE + x)
    cells: [Option<TileId>; CELL_COUNT],
    tiles: BTreeMap<TileId, Tile>,
    order: Vec<TileId>,
    next_id: u32,
}

impl Board {
    /// Create a new empty board
    pub fn new() -> Self {
        Self {
            cells: [None; CELL_COUNT],
            tiles: BTreeMap::new(),
            order: Vec::with_capacity(CELL_COUNT),
            next_id: 1,
        }
    }

    /// Build a board from a grid of values indexed `[y][x]` (0 = empty).
    ///
    /// Tiles get ids in row-major order. Meant for fixtures and position
    /// analysis: values are taken as given, so anything other than a power of
    /// two can never arise in play. Merged values saturate at `u32::MAX`.
    pub fn from_values(rows: [[u32; BOARD_SIZE]; BOARD_SIZE]) -> Self {
        let mut board = Self::new();
        for (y, row) in rows.iter().enumerate() {
            for (x, &value) in row.iter().enumerate() {
                if value != 0 {
                    board.place(value, Position::new(x as u8, y as u8));
                }
            }
        }
        board
    }

    /// Tile id at a position, `None` if empty or out of bounds.
    pub fn cell(&self, pos: Position) -> Option<TileId> {
        if !Self::in_bounds(pos) {
            return None;
        }
        self.cells[pos.index()]
    }

    /// Tile record at a position.
    pub fn tile_at(&self, pos: Position) -> Option<&Tile> {
        self.cell(pos).and_then(|id| self.tiles.get(&id))
    }

    pub fn tile(&self, id: TileId) -> Option<&Tile> {
        self.tiles.get(&id)
    }

    /// Live tiles in stable (spawn) order.
    pub fn tiles(&self) -> impl Iterator<Item = &Tile> + '_ {
        self.order.iter().filter_map(|id| self.tiles.get(id))
    }

    pub fn tile_table(&self) -> &BTreeMap<TileId, Tile> {
        &self.tiles
    }

    pub fn tiles_by_ids(&self) -> &[TileId] {
        &self.order
    }

    pub fn tile_count(&self) -> usize {
        self.tiles.len()
    }

    /// All empty cells in row-major order.
    pub fn empty_cells(&self) -> ArrayVec<Position, CELL_COUNT> {
        self.cells
            .iter()
            .enumerate()
            .filter(|(_, cell)| cell.is_none())
            .filter_map(|(idx, _)| Position::from_index(idx))
            .collect()
    }

    pub fn is_full(&self) -> bool {
        self.cells.iter().all(|cell| cell.is_some())
    }

    /// Place a new tile with a fresh id.
    ///
    /// Returns `None` if the cell is occupied or out of bounds.
    pub fn place(&mut self, value: u32, position: Position) -> Option<Tile> {
        if !Self::in_bounds(position) || self.cells[position.index()].is_some() {
            return None;
        }
        let id = TileId(self.next_id);
        self.next_id = self.next_id.wrapping_add(1);
        let tile = Tile::new(id, value, position);
        self.insert(tile);
        Some(tile)
    }

    /// Spawn a 2 (9/10) or a 4 (1/10) on a random empty cell.
    ///
    /// Draws the value first, then the cell index. A full board returns `None`
    /// without consuming any randomness.
    pub fn spawn_tile(&mut self, rng: &mut Xorshift128Plus) -> Option<Tile> {
        let empty = self.empty_cells();
        if empty.is_empty() {
            return None;
        }
        let value = if rng.next_u64() < TWO_TILE_THRESHOLD {
            2
        } else {
            4
        };
        let position = empty[rng.next_index(empty.len())];
        self.place(value, position)
    }

    /// Slide and merge every line toward the edge `direction` points at.
    ///
    /// Each line is walked starting from that edge. A tile merges into the
    /// previously placed tile when their values match and the previous tile
    /// has not merged during this slide. The survivor keeps its id and position.
    pub fn apply_direction(&self, direction: Direction) -> Slide {
        let mut next = Board {
            cells: [None; CELL_COUNT],
            tiles: BTreeMap::new(),
            order: Vec::with_capacity(self.order.len()),
            next_id: self.next_id,
        };
        let mut score_delta = 0u32;
        let mut changed = false;
        let mut merges = ArrayVec::new();

        for lane in 0..BOARD_SIZE {
            let line = Self::line(direction, lane);
            let mut write = 0usize;
            // Last tile written to this line and whether it already merged.
            let mut last: Option<(TileId, bool)> = None;

            for &pos in &line {
                let Some(tile) = self.tile_at(pos).copied() else {
                    continue;
                };

                if let Some((prev_id, false)) = last {
                    if let Some(prev) = next.tiles.get(&prev_id).copied() {
                        if prev.value == tile.value {
                            let merged = prev.doubled();
                            next.tiles.insert(prev_id, merged);
                            score_delta = score_delta.saturating_add(merged.value);
                            merges.push(Merge {
                                survivor: prev_id,
                                absorbed: tile.id,
                                value: merged.value,
                                position: merged.position,
                            });
                            last = Some((prev_id, true));
                            changed = true;
                            continue;
                        }
                    }
                }

                let target = line[write];
                write += 1;
                if target != tile.position {
                    changed = true;
                }
                next.insert(tile.moved_to(target));
                last = Some((tile.id, false));
            }
        }

        next.order = self
            .order
            .iter()
            .copied()
            .filter(|id| next.tiles.contains_key(id))
            .collect();

        Slide {
            board: next,
            score_delta,
            changed,
            merges,
        }
    }

    /// True if two horizontally or vertically adjacent tiles share a value.
    pub fn has_adjacent_match(&self) -> bool {
        let values = self.values();
        for y in 0..BOARD_SIZE {
            for x in 0..BOARD_SIZE {
                let v = values[y][x];
                if v == 0 {
                    continue;
                }
                if x + 1 < BOARD_SIZE && values[y][x + 1] == v {
                    return true;
                }
                if y + 1 < BOARD_SIZE && values[y + 1][x] == v {
                    return true;
                }
            }
        }
        false
    }

    /// Largest tile value on the board (0 when empty).
    pub fn max_tile(&self) -> u32 {
        self.tiles.values().map(|t| t.value).max().unwrap_or(0)
    }

    /// Grid of values indexed `[y][x]`, 0 for empty cells.
    pub fn values(&self) -> [[u32; BOARD_SIZE]; BOARD_SIZE] {
        let mut out = [[0u32; BOARD_SIZE]; BOARD_SIZE];
        for tile in self.tiles.values() {
            out[tile.position.y as usize][tile.position.x as usize] = tile.value;
        }
        out
    }

    /// Grid of tile ids indexed `[y][x]`.
    pub fn rows(&self) -> [[Option<TileId>; BOARD_SIZE]; BOARD_SIZE] {
        let mut out = [[None; BOARD_SIZE]; BOARD_SIZE];
        for (idx, cell) in self.cells.iter().enumerate() {
            out[idx / BOARD_SIZE][idx % BOARD_SIZE] = *cell;
        }
        out
    }

    /// Clear the entire board. The id counter restarts.
    pub fn clear(&mut self) {
        *self = Self::new();
    }

    fn insert(&mut self, tile: Tile) {
        self.cells[tile.position.index()] = Some(tile.id);
        self.tiles.insert(tile.id, tile);
        self.order.push(tile.id);
    }

    fn in_bounds(pos: Position) -> bool {
        (pos.x as usize) < BOARD_SIZE && (pos.y as usize) < BOARD_SIZE
    }

    /// Cells of one line, ordered from the edge `direction` points at.
    fn line(direction: Direction, lane: usize) -> [Position; BOARD_SIZE] {
        let lane = lane as u8;
        let last = (BOARD_SIZE - 1) as u8;
        let mut out = [Position::new(0, 0); BOARD_SIZE];
        for (k, slot) in out.iter_mut().enumerate() {
            let k = k as u8;
            *slot = match direction {
                Direction::Up => Position::new(lane, k),
                Direction::Down => Position::new(lane, last - k),
                Direction::Left => Position::new(k, lane),
                Direction::Right => Position::new(last - k, lane),
            };
        }
        out
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in self.values() {
            for value in row {
                if value == 0 {
                    write!(f, "{:>5}", ".")?;
                } else {
                    write!(f, "{:>5}", value)?;
                }
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_board_new_empty() {
        let board = Board::new();
        assert_eq!(board.tile_count(), 0);
        assert_eq!(board.empty_cells().len(), CELL_COUNT);
        assert!(!board.is_full());
    }

    #[test]
    fn empty_cells_are_row_major() {
        let board = Board::from_values([[2, 0, 0, 0], [0, 4, 0, 0], [0; 4], [0; 4]]);
        let empty = board.empty_cells();
        assert_eq!(empty.len(), 14);
        assert_eq!(empty[0], Position::new(1, 0));
        assert_eq!(empty[1], Position::new(2, 0));
        assert_eq!(empty[2], Position::new(3, 0));
        assert_eq!(empty[3], Position::new(0, 1));
        assert_eq!(empty[4], Position::new(2, 1));
    }

    #[test]
    fn place_rejects_occupied_and_out_of_bounds() {
        let mut board = Board::new();
        let tile = board.place(2, Position::new(1, 2)).unwrap();
        assert_eq!(tile.id, TileId(1));
        assert_eq!(board.cell(Position::new(1, 2)), Some(TileId(1)));
        assert!(board.place(4, Position::new(1, 2)).is_none());
        assert!(board.place(4, Position::new(4, 0)).is_none());
        assert_eq!(board.tile_count(), 1);
    }

    #[test]
    fn spawn_with_zero_seed_takes_first_empty_cell() {
        let mut rng = Xorshift128Plus::new(0);
        let mut board = Board::new();
        let tile = board.spawn_tile(&mut rng).unwrap();
        assert_eq!(tile.position, Position::new(0, 0));
        assert_eq!(tile.value, 2);
        let tile = board.spawn_tile(&mut rng).unwrap();
        assert_eq!(tile.position, Position::new(1, 0));
    }

    #[test]
    fn spawn_draws_value_before_cell() {
        // Seed 123456789: draw 1 (< threshold) is a 2, draw 2 picks cell 5 of 16;
        // draw 3 (>= threshold) is a 4, draw 4 picks the last of 15 cells.
        let mut rng = Xorshift128Plus::new(123456789);
        let mut board = Board::new();
        let first = board.spawn_tile(&mut rng).unwrap();
        assert_eq!((first.value, first.position), (2, Position::new(1, 1)));
        let second = board.spawn_tile(&mut rng).unwrap();
        assert_eq!((second.value, second.position), (4, Position::new(3, 3)));
    }

    #[test]
    fn oversized_fixture_values_saturate() {
        let big = 1u32 << 31;
        let board = Board::from_values([[big, big, u32::MAX, u32::MAX], [0; 4], [0; 4], [0; 4]]);
        let slide = board.apply_direction(Direction::Left);
        assert_eq!(slide.board.values()[0], [u32::MAX, u32::MAX, 0, 0]);
        assert_eq!(slide.score_delta, u32::MAX);
    }

    #[test]
    fn spawn_on_full_board_draws_nothing() {
        let mut board = Board::from_values([[2, 4, 2, 4], [4, 2, 4, 2], [2, 4, 2, 4], [4, 2, 4, 2]]);
        let mut rng = Xorshift128Plus::new(99);
        let before = rng.clone();
        assert!(board.spawn_tile(&mut rng).is_none());
        assert_eq!(rng, before);
    }

    #[test]
    fn slide_left_merges_once_per_tile() {
        let board = Board::from_values([[2, 2, 2, 2], [0; 4], [0; 4], [0; 4]]);
        let slide = board.apply_direction(Direction::Left);
        assert!(slide.changed);
        assert_eq!(slide.score_delta, 8);
        assert_eq!(slide.board.values()[0], [4, 4, 0, 0]);
        assert_eq!(slide.merges.len(), 2);
        assert_eq!(slide.board.tile_count(), 2);
    }

    #[test]
    fn slide_does_not_chain_merges() {
        let board = Board::from_values([[4, 2, 2, 0], [0; 4], [0; 4], [0; 4]]);
        let slide = board.apply_direction(Direction::Left);
        assert_eq!(slide.board.values()[0], [4, 4, 0, 0]);
        assert_eq!(slide.score_delta, 4);
    }

    #[test]
    fn slide_right_anchors_at_right_edge() {
        let board = Board::from_values([[2, 2, 4, 0], [0; 4], [0; 4], [0; 4]]);
        let slide = board.apply_direction(Direction::Right);
        assert_eq!(slide.board.values()[0], [0, 0, 4, 4]);
        assert_eq!(slide.score_delta, 4);
    }

    #[test]
    fn slide_up_and_down_work_on_columns() {
        let board = Board::from_values([[2, 0, 0, 0], [0, 0, 0, 0], [2, 0, 0, 0], [4, 0, 0, 0]]);

        let up = board.apply_direction(Direction::Up);
        let values = up.board.values();
        assert_eq!([values[0][0], values[1][0], values[2][0], values[3][0]], [4, 4, 0, 0]);

        let down = board.apply_direction(Direction::Down);
        let values = down.board.values();
        assert_eq!([values[0][0], values[1][0], values[2][0], values[3][0]], [0, 0, 4, 4]);
    }

    #[test]
    fn merge_keeps_edge_side_id() {
        let board = Board::from_values([[0, 2, 0, 2], [0; 4], [0; 4], [0; 4]]);
        // ids: (1,0) -> t1, (3,0) -> t2
        let slide = board.apply_direction(Direction::Left);
        let merged = slide.board.tile_at(Position::new(0, 0)).unwrap();
        assert_eq!(merged.id, TileId(1));
        assert_eq!(merged.value, 4);
        assert!(slide.board.tile(TileId(2)).is_none());
        assert_eq!(slide.board.tiles_by_ids(), &[TileId(1)]);

        let slide = board.apply_direction(Direction::Right);
        let merged = slide.board.tile_at(Position::new(3, 0)).unwrap();
        assert_eq!(merged.id, TileId(2));
    }

    #[test]
    fn unchanged_slide_reports_no_change() {
        let board = Board::from_values([[2, 4, 0, 0], [8, 0, 0, 0], [0; 4], [0; 4]]);
        let slide = board.apply_direction(Direction::Left);
        assert!(!slide.changed);
        assert_eq!(slide.score_delta, 0);
        assert_eq!(slide.board, board);
    }

    #[test]
    fn grid_and_table_stay_consistent() {
        let board = Board::from_values([[2, 2, 4, 4], [8, 0, 8, 2], [0, 2, 0, 2], [4, 4, 4, 0]]);
        for dir in Direction::ALL {
            let slide = board.apply_direction(dir);
            let b = &slide.board;
            for tile in b.tiles() {
                assert_eq!(b.cell(tile.position), Some(tile.id));
            }
            let occupied = CELL_COUNT - b.empty_cells().len();
            assert_eq!(occupied, b.tile_count());
            assert_eq!(b.tiles_by_ids().len(), b.tile_count());
        }
    }

    #[test]
    fn adjacent_match_detection() {
        let locked = Board::from_values([[2, 4, 2, 4], [4, 2, 4, 2], [2, 4, 2, 4], [4, 2, 4, 2]]);
        assert!(!locked.has_adjacent_match());

        let vertical = Board::from_values([[2, 4, 2, 4], [2, 8, 4, 2], [8, 4, 2, 4], [4, 2, 4, 2]]);
        assert!(vertical.has_adjacent_match());
    }

    #[test]
    fn display_renders_grid() {
        let board = Board::from_values([[2, 0, 0, 0], [0; 4], [0; 4], [0, 0, 0, 1024]]);
        let text = board.to_string();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 4);
        assert_eq!(lines[0], "    2    .    .    .");
        assert_eq!(lines[3], "    .    .    . 1024");
    }

    mod props {
        use super::*;
        use proptest::prelude::*;

        fn grid() -> impl Strategy<Value = [[u32; BOARD_SIZE]; BOARD_SIZE]> {
            let cell = prop_oneof![Just(0u32), Just(2), Just(4), Just(8), Just(16)];
            prop::array::uniform4(prop::array::uniform4(cell))
        }

        fn total(board: &Board) -> u32 {
            board.tiles().map(|t| t.value).sum()
        }

        proptest! {
            #[test]
            fn slide_conserves_value_and_counts_merges(rows in grid(), code in 0u8..4) {
                let board = Board::from_values(rows);
                let dir = Direction::from_code(code).unwrap();
                let slide = board.apply_direction(dir);

                prop_assert_eq!(total(&slide.board), total(&board));
                prop_assert_eq!(slide.board.tile_count(), board.tile_count() - slide.merges.len());
                prop_assert_eq!(
                    slide.score_delta,
                    slide.merges.iter().map(|m| m.value).sum::<u32>()
                );
                prop_assert_eq!(slide.changed, slide.board.rows() != board.rows() || !slide.merges.is_empty());
            }
        }
    }
}
