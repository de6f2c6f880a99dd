//! Collision resolver - pure placement checks and post-rotation correction
//!
//! Bounds are the side walls and the floor (`y >= 0`); the top is open so a
//! freshly spawned piece may poke above the visible board. Kicks are reactive
//! and column/row granular: a rotated piece is pushed back inside the walls,
//! lifted off the floor, and if it still overlaps locked cells only the
//! horizontal push is undone.

use log::trace;

use crate::board::Board;
use crate::piece::Piece;
use crate::types::Spin;

#[inline]
fn inside_walls(board: &Board, x: i8) -> bool {
    x >= 0 && x < board.width() as i8
}

/// True iff every cell of `piece`, shifted by `(dx, dy)`, is inside the walls,
/// on or above the floor, and over an empty board cell
///
/// An empty piece never fits anywhere.
pub fn can_move_to(piece: &Piece, board: &Board, dx: i8, dy: i8) -> bool {
    if piece.is_empty() {
        return false;
    }
    piece.board_cells().all(|(x, y, _)| {
        let (x, y) = (x.saturating_add(dx), y.saturating_add(dy));
        inside_walls(board, x) && y >= 0 && !board.is_occupied(x, y)
    })
}

/// Single-column horizontal check
pub fn can_move_side(piece: &Piece, board: &Board, dx: i8) -> bool {
    can_move_to(piece, board, dx, 0)
}

/// One-row downward check
pub fn can_move_down(piece: &Piece, board: &Board) -> bool {
    can_move_to(piece, board, 0, -1)
}

/// Correct a piece that was just rotated in place
///
/// Shifts the piece back inside the side walls one column at a time, then up
/// one row at a time while any cell is below the floor. If a locked cell is
/// still overlapped, the horizontal shifts are undone (the vertical lift is
/// kept) and `false` is returned; reverting the rotation is up to the caller.
pub fn resolve_after_rotation(piece: &mut Piece, board: &Board) -> bool {
    let width = board.width() as i8;
    let mut shifted: i8 = 0;

    while piece.board_cells().any(|(x, _, _)| x >= width) {
        piece.translate(-1, 0);
        shifted -= 1;
    }
    while piece.board_cells().any(|(x, _, _)| x < 0) {
        piece.translate(1, 0);
        shifted += 1;
    }
    while piece.board_cells().any(|(_, y, _)| y < 0) {
        piece.translate(0, 1);
    }

    if piece.board_cells().any(|(x, y, _)| board.is_occupied(x, y)) {
        piece.translate(-shifted, 0);
        trace!("rotation blocked, undid {shifted} column shift(s)");
        return false;
    }

    true
}

/// Rotate, resolve, and revert with the inverse rotation on failure
pub fn try_rotate(piece: &mut Piece, board: &Board, spin: Spin) -> bool {
    if piece.is_empty() {
        return false;
    }
    piece.rotate(spin);
    if resolve_after_rotation(piece, board) {
        return true;
    }
    piece.rotate(spin.inverse());
    false
}

/// Move one column (`dx` = -1 or 1) if the target is free
pub fn try_move_side(piece: &mut Piece, board: &Board, dx: i8) -> bool {
    if !can_move_side(piece, board, dx) {
        return false;
    }
    piece.translate(dx, 0);
    true
}

/// Move one row down if the target is free
pub fn try_move_down(piece: &mut Piece, board: &Board) -> bool {
    if !can_move_down(piece, board) {
        return false;
    }
    piece.translate(0, -1);
    true
}

/// Hard drop: move down until blocked, returning the number of rows fallen
pub fn drop(piece: &mut Piece, board: &Board) -> u32 {
    let mut steps = 0;
    while try_move_down(piece, board) {
        steps += 1;
    }
    steps
}

/// Landing anchor of `piece` without moving it (ghost placement)
pub fn landing_y(piece: &Piece, board: &Board) -> Option<i8> {
    if piece.is_empty() {
        return None;
    }
    let mut dy = 0;
    while dy > i8::MIN && can_move_to(piece, board, 0, dy - 1) {
        dy -= 1;
    }
    Some(piece.y().saturating_add(dy))
}
