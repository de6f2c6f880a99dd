//! Board module - manages the locked-cell grid
//!
//! The board is a 10x20 grid where each cell is empty or holds a [`Block`].
//! Uses a flat array for cache locality and zero allocation.
//! Coordinates: (x, y) where x ranges 0..9 (left to right), y ranges 0..19
//! (bottom to top). Pieces may extend above row 19 while spawning; those
//! coordinates are treated as empty and are never stored.

use arrayvec::ArrayVec;
use log::debug;

use crate::piece::{Block, Piece};
use crate::types::{BOARD_HEIGHT, BOARD_WIDTH, LOCAL_GRID};

/// Total number of cells on the board
const BOARD_SIZE: usize = (BOARD_WIDTH as usize) * (BOARD_HEIGHT as usize);

/// A board cell: `None` when empty
pub type Cell = Option<Block>;

/// Full-row indices found by [`Board::detect_full_lines`], ascending
pub type FullLines = ArrayVec<usize, { BOARD_HEIGHT as usize }>;

/// Spawn anchor for new pieces: the 4x4 local grid centred horizontally with
/// its second row on the top playable row
pub const SPAWN_POSITION: (i8, i8) = (
    (BOARD_WIDTH / 2 - LOCAL_GRID / 2) as i8,
    (BOARD_HEIGHT - LOCAL_GRID + 1) as i8,
);

/// Cell whose occupancy ends the round when a piece is about to spawn
pub const GAME_OVER_CELL: (i8, i8) = ((BOARD_WIDTH / 2) as i8, (BOARD_HEIGHT - 1) as i8);

/// The game board - 10 columns x 20 rows using flat array storage
#[derive(Debug, Clone, PartialEq)]
pub struct Board {
    /// Flat array of cells, row-major order (y * WIDTH + x), row 0 at the floor
    cells: [Cell; BOARD_SIZE],
}

impl Board {
    /// Create a new empty board
    pub fn new() -> Self {
        Self {
            cells: [None; BOARD_SIZE],
        }
    }

    /// Calculate flat index from (x, y) coordinates
    #[inline(always)]
    fn index(x: i8, y: i8) -> Option<usize> {
        if x < 0 || x >= BOARD_WIDTH as i8 || y < 0 || y >= BOARD_HEIGHT as i8 {
            return None;
        }
        Some((y as usize) * (BOARD_WIDTH as usize) + (x as usize))
    }

    pub fn width(&self) -> u8 {
        BOARD_WIDTH
    }

    pub fn height(&self) -> u8 {
        BOARD_HEIGHT
    }

    /// Get cell at position (x, y)
    /// Returns None if out of bounds
    pub fn get(&self, x: i8, y: i8) -> Option<Cell> {
        Self::index(x, y).map(|idx| self.cells[idx])
    }

    /// Set cell at position (x, y)
    /// Returns false if out of bounds
    pub fn set(&mut self, x: i8, y: i8, cell: Cell) -> bool {
        match Self::index(x, y) {
            Some(idx) => {
                self.cells[idx] = cell;
                true
            }
            None => false,
        }
    }

    /// Check if position is occupied (within bounds and filled)
    ///
    /// Anything outside the grid, including the unbounded space above it,
    /// reads as unoccupied; bounds are the collision resolver's concern.
    pub fn is_occupied(&self, x: i8, y: i8) -> bool {
        matches!(self.get(x, y), Some(Some(_)))
    }

    /// Check if a row is completely filled
    pub fn is_row_full(&self, y: usize) -> bool {
        if y >= BOARD_HEIGHT as usize {
            return false;
        }
        let start = y * BOARD_WIDTH as usize;
        let end = start + BOARD_WIDTH as usize;
        self.cells[start..end].iter().all(|cell| cell.is_some())
    }

    /// Write every block of `piece` into the grid at its board position
    ///
    /// Ownership of the blocks moves to the board and the piece is left
    /// cleared. Blocks above the top row have nowhere to go and are dropped.
    /// Returns false (and does nothing) for an empty piece.
    pub fn commit(&mut self, piece: &mut Piece) -> bool {
        if piece.is_empty() {
            return false;
        }

        let (px, py) = piece.position();
        let blocks = piece.take_blocks();
        for (slot, block) in blocks.iter().enumerate() {
            let Some(block) = *block else {
                continue;
            };
            let (lx, ly) = crate::piece::slot_xy(slot);
            let (x, y) = (px + lx, py + ly);
            if !self.set(x, y, Some(block)) {
                debug!("block at ({x}, {y}) is outside the grid and was discarded");
            }
        }

        true
    }

    /// Scan rows bottom to top and return the full ones (ascending)
    pub fn detect_full_lines(&self) -> FullLines {
        let mut rows = FullLines::new();
        for y in 0..BOARD_HEIGHT as usize {
            if self.is_row_full(y) {
                rows.push(y);
            }
        }
        rows
    }

    /// Remove one row and collapse everything above it by exactly one row
    ///
    /// Blocks move as values, so tags survive the shift.
    /// Returns the number of lines removed (1 or 0).
    pub fn remove_line(&mut self, y: usize) -> usize {
        if y >= BOARD_HEIGHT as usize {
            return 0;
        }

        let width = BOARD_WIDTH as usize;
        let row = y * width;
        for cell in &mut self.cells[row..row + width] {
            *cell = None;
        }

        for yy in (y + 1)..BOARD_HEIGHT as usize {
            for xx in 0..width {
                let idx = yy * width + xx;
                if let Some(block) = self.cells[idx].take() {
                    self.cells[idx - width] = Some(block);
                }
            }
        }

        1
    }

    /// Remove the given rows, highest index first so lower indices stay valid
    ///
    /// Returns the number of lines removed.
    pub fn clear_lines(&mut self, rows: &[usize]) -> usize {
        let mut removed = 0;
        for &y in rows.iter().rev() {
            removed += self.remove_line(y);
        }
        removed
    }

    /// True when the spawn cell is occupied
    pub fn is_game_over(&self) -> bool {
        self.is_occupied(GAME_OVER_CELL.0, GAME_OVER_CELL.1)
    }

    /// Number of occupied cells
    pub fn occupied_count(&self) -> usize {
        self.cells.iter().filter(|c| c.is_some()).count()
    }

    /// Get a reference to the internal cells array
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    /// Write shape codes (0 = empty) into a row-major grid, row 0 at the floor
    pub fn write_u8_grid(&self, out: &mut [[u8; BOARD_WIDTH as usize]; BOARD_HEIGHT as usize]) {
        let width = BOARD_WIDTH as usize;
        for (y, row) in out.iter_mut().enumerate() {
            for (x, code) in row.iter_mut().enumerate() {
                *code = self.cells[y * width + x].map_or(0, |b| b.kind.code());
            }
        }
    }

    /// Clear the entire board
    pub fn clear(&mut self) {
        for cell in &mut self.cells {
            *cell = None;
        }
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ShapeKind;

    fn block(tag: u32) -> Cell {
        Some(Block::new(ShapeKind::T, tag))
    }

    #[test]
    fn test_board_index_calculation() {
        assert_eq!(Board::index(0, 0), Some(0));
        assert_eq!(Board::index(9, 0), Some(9));
        assert_eq!(Board::index(0, 1), Some(10));
        assert_eq!(Board::index(9, 19), Some(199));
        assert_eq!(Board::index(-1, 0), None);
        assert_eq!(Board::index(10, 0), None);
        assert_eq!(Board::index(0, 20), None);
    }

    #[test]
    fn test_spawn_constants() {
        assert_eq!(SPAWN_POSITION, (3, 17));
        assert_eq!(GAME_OVER_CELL, (5, 19));
    }

    #[test]
    fn test_commit_transfers_blocks() {
        let mut board = Board::new();
        let mut piece = Piece::new();
        piece.create_tagged(ShapeKind::O, 7);
        piece.set_position(0, -1);

        assert!(board.commit(&mut piece));
        assert!(piece.is_empty());
        assert_eq!(board.occupied_count(), 4);
        assert_eq!(board.get(1, 0), Some(Some(Block::new(ShapeKind::O, 7))));
        assert!(board.is_occupied(2, 1));
    }

    #[test]
    fn test_commit_empty_piece_is_noop() {
        let mut board = Board::new();
        let mut piece = Piece::new();
        assert!(!board.commit(&mut piece));
        assert_eq!(board.occupied_count(), 0);
    }

    #[test]
    fn test_commit_discards_blocks_above_top() {
        let mut board = Board::new();
        let mut piece = Piece::of(ShapeKind::I);
        piece.rotate_clockwise();
        piece.set_position(0, 17);

        board.commit(&mut piece);
        // Vertical I occupies local rows 0..=3 -> board rows 17..=20.
        assert_eq!(board.occupied_count(), 3);
    }

    #[test]
    fn test_remove_line_preserves_tags_above() {
        let mut board = Board::new();
        for x in 0..10 {
            board.set(x, 2, block(1));
        }
        board.set(4, 3, block(99));
        board.set(0, 1, block(5));

        board.remove_line(2);

        assert_eq!(board.get(4, 2), Some(block(99)));
        assert_eq!(board.get(4, 3), Some(None));
        assert_eq!(board.get(0, 1), Some(block(5)));
        assert_eq!(board.occupied_count(), 2);
    }

    #[test]
    fn test_game_over_cell() {
        let mut board = Board::new();
        assert!(!board.is_game_over());
        board.set(4, 19, block(0));
        assert!(!board.is_game_over());
        board.set(5, 19, block(0));
        assert!(board.is_game_over());
    }
}
