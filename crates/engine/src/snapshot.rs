//! Observer snapshots - plain serializable copies of the game state for hosts and viewers.

use serde::Serialize;

use crate::core::Piece;
use crate::types::{BOARD_HEIGHT, BOARD_WIDTH, NEXT_QUEUE_LEN, PIECE_CELLS};

/// Lifecycle of a round.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RoundState {
    /// No round created yet, or reset after game over.
    Empty,
    Playing,
    GameOver,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct PieceSnapshot {
    /// Shape code (1..=7).
    pub kind: u8,
    pub rotation: u8,
    pub x: i8,
    pub y: i8,
    /// Occupied cells in board coordinates.
    pub cells: [(i8, i8); PIECE_CELLS],
}

impl PieceSnapshot {
    pub fn from_piece(piece: &Piece) -> Option<Self> {
        let kind = piece.kind()?;
        let mut cells = [(0, 0); PIECE_CELLS];
        for (out, (x, y, _)) in cells.iter_mut().zip(piece.board_cells()) {
            *out = (x, y);
        }
        Some(Self {
            kind: kind.code(),
            rotation: piece.rotation(),
            x: piece.x(),
            y: piece.y(),
            cells,
        })
    }
}

/// Observer view of a game. Grid codes are 0 for empty, otherwise the shape code.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct GameSnapshot {
    /// Row 0 is the floor.
    pub board: [[u8; BOARD_WIDTH as usize]; BOARD_HEIGHT as usize],
    pub active: Option<PieceSnapshot>,
    pub ghost: Option<PieceSnapshot>,
    pub hold: Option<u8>,
    pub next: [u8; NEXT_QUEUE_LEN],
    pub can_hold: bool,
    pub state: RoundState,
    pub paused: bool,
    pub resume_remaining_ms: u32,
    pub score: u32,
    pub level: u32,
    pub lines: u32,
    /// Slow motion meter in 0.0..=1.0.
    pub slowmo_meter: f32,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ShapeKind;

    #[test]
    fn test_piece_snapshot_of_empty_piece() {
        assert_eq!(PieceSnapshot::from_piece(&Piece::new()), None);
    }

    #[test]
    fn test_piece_snapshot_cells_are_in_board_space() {
        let mut piece = Piece::of(ShapeKind::O);
        piece.set_position(4, 10);
        let snap = PieceSnapshot::from_piece(&piece).unwrap();
        assert_eq!(snap.kind, ShapeKind::O.code());
        assert_eq!(snap.cells, [(5, 11), (6, 11), (5, 12), (6, 12)]);
    }

    #[test]
    fn test_serialized_field_names() {
        let mut piece = Piece::of(ShapeKind::I);
        piece.set_position(3, 17);
        let snap = PieceSnapshot::from_piece(&piece).unwrap();

        let value = serde_json::to_value(snap).unwrap();
        assert_eq!(value["kind"], 2);
        assert_eq!(value["cells"][0], serde_json::json!([3, 19]));
        assert_eq!(serde_json::to_value(RoundState::GameOver).unwrap(), "game_over");
    }
}
