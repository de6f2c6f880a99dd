//! Core types module - shared data structures and constants
//!
//! This module defines the fundamental vocabulary used by every other crate.
//! All types are plain data with no external dependencies, so they can be used
//! from the simulation core, the input controller and any host (renderer,
//! audio, persistence) alike.
//!
//! # Board Dimensions
//!
//! - **Width**: 10 columns (indexed 0-9, left to right)
//! - **Height**: 20 rows (indexed 0-19, **bottom to top**; row 0 is the floor)
//! - **Local grid**: every piece lives in a 4x4 local grid of 16 slots
//!
//! # Timing Defaults
//!
//! Timing values are in milliseconds:
//!
//! | Constant | Value | Description |
//! |----------|-------|-------------|
//! | `FINALIZE_MS` | 700 | Lock delay before a resting piece is committed |
//! | `ROTATE_REPEAT_MS` | 200 | Interval between auto-repeated rotations |
//! | `MOVE_SIDE_REPEAT_MS` | 50 | Interval between auto-repeated side moves |
//! | `SOFT_DROP_REPEAT_MS` | 50 | Interval between auto-repeated soft drops |
//! | `REPEAT_DELAY_MS` | 300 | Hold time before auto-repeat starts |
//! | `GRAVITY_UNIT_MS` | 50 | Gravity interval is `(MAX_LEVEL + 1 - level) * unit` |
//!
//! # Examples
//!
//! ```
//! use blocktris_types::{Action, ShapeKind, BOARD_HEIGHT, BOARD_WIDTH};
//!
//! let kind = ShapeKind::from_str("t").unwrap();
//! assert_eq!(kind, ShapeKind::T);
//! assert_eq!(ShapeKind::from_code(kind.code()), Some(ShapeKind::T));
//!
//! assert_eq!(Action::from_binding("RotateClockwise"), Some(Action::RotateCw));
//!
//! assert_eq!(BOARD_WIDTH, 10);
//! assert_eq!(BOARD_HEIGHT, 20);
//! ```

/// Board width in cells (10 columns)
pub const BOARD_WIDTH: u8 = 10;

/// Board height in cells (20 rows)
pub const BOARD_HEIGHT: u8 = 20;

/// Side length of the local piece grid
pub const LOCAL_GRID: u8 = 4;

/// Number of slots in a piece's local grid (4x4)
pub const PIECE_SLOTS: usize = (LOCAL_GRID as usize) * (LOCAL_GRID as usize);

/// Number of occupied cells in every live piece
pub const PIECE_CELLS: usize = 4;

/// Number of previews held in the next queue
pub const NEXT_QUEUE_LEN: usize = 3;

/// Lowest level
pub const MIN_LEVEL: u32 = 1;

/// Highest level (level-ups clamp here)
pub const MAX_LEVEL: u32 = 10;

/// Lines per level step: the next level needs `level * LINES_PER_LEVEL` lines in total
pub const LINES_PER_LEVEL: u32 = 10;

/// Number of leaderboard records (always exactly this many)
pub const LEADERBOARD_LEN: usize = 7;

/// Lock delay ("finalize") threshold
pub const FINALIZE_MS: u32 = 700;

/// Auto-repeat interval for rotations
pub const ROTATE_REPEAT_MS: u32 = 200;

/// Auto-repeat interval for side moves
pub const MOVE_SIDE_REPEAT_MS: u32 = 50;

/// Auto-repeat interval for soft drops
pub const SOFT_DROP_REPEAT_MS: u32 = 50;

/// Hold time before any auto-repeat starts
pub const REPEAT_DELAY_MS: u32 = 300;

/// Gravity base unit
pub const GRAVITY_UNIT_MS: u32 = 50;

/// Countdown after `resume()` before play continues
pub const RESUME_WAIT_MS: u32 = 3000;

/// Line clear base scores for 1..=4 lines (index 0 is unused)
pub const LINE_SCORES: [u32; 5] = [0, 100, 220, 360, 600];

/// Hard drop bonus multiplier (per dropped row, times level)
pub const DROP_SCORE_MULTIPLIER: u32 = 2;

/// The seven shape kinds
///
/// Numeric codes follow catalog order (`O = 1 .. T = 7`); code 0
/// is reserved for "no shape" in grids and snapshots.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShapeKind {
    O,
    I,
    S,
    Z,
    L,
    J,
    T,
}

impl ShapeKind {
    /// All kinds in catalog order
    pub const ALL: [ShapeKind; 7] = [
        ShapeKind::O,
        ShapeKind::I,
        ShapeKind::S,
        ShapeKind::Z,
        ShapeKind::L,
        ShapeKind::J,
        ShapeKind::T,
    ];

    /// Parse shape kind from string (case-insensitive)
    ///
    /// # Examples
    ///
    /// ```
    /// use blocktris_types::ShapeKind;
    ///
    /// assert_eq!(ShapeKind::from_str("i"), Some(ShapeKind::I));
    /// assert_eq!(ShapeKind::from_str("O"), Some(ShapeKind::O));
    /// assert_eq!(ShapeKind::from_str("unknown"), None);
    /// ```
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_ascii_lowercase().as_str() {
            "o" => Some(ShapeKind::O),
            "i" => Some(ShapeKind::I),
            "s" => Some(ShapeKind::S),
            "z" => Some(ShapeKind::Z),
            "l" => Some(ShapeKind::L),
            "j" => Some(ShapeKind::J),
            "t" => Some(ShapeKind::T),
            _ => None,
        }
    }

    /// Lowercase string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            ShapeKind::O => "o",
            ShapeKind::I => "i",
            ShapeKind::S => "s",
            ShapeKind::Z => "z",
            ShapeKind::L => "l",
            ShapeKind::J => "j",
            ShapeKind::T => "t",
        }
    }

    /// Grid code (1..=7)
    pub fn code(&self) -> u8 {
        match self {
            ShapeKind::O => 1,
            ShapeKind::I => 2,
            ShapeKind::S => 3,
            ShapeKind::Z => 4,
            ShapeKind::L => 5,
            ShapeKind::J => 6,
            ShapeKind::T => 7,
        }
    }

    pub fn from_code(code: u8) -> Option<Self> {
        match code {
            1..=7 => Some(Self::ALL[(code - 1) as usize]),
            _ => None,
        }
    }

    /// Number of distinct rotation states (1 for O, 2 for I/S/Z, 4 for L/J/T)
    pub fn rotation_period(&self) -> u8 {
        match self {
            ShapeKind::O => 1,
            ShapeKind::I | ShapeKind::S | ShapeKind::Z => 2,
            ShapeKind::L | ShapeKind::J | ShapeKind::T => 4,
        }
    }
}

/// Rotation direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Spin {
    Clockwise,
    Anticlockwise,
}

impl Spin {
    pub fn inverse(self) -> Self {
        match self {
            Spin::Clockwise => Spin::Anticlockwise,
            Spin::Anticlockwise => Spin::Clockwise,
        }
    }
}

/// Logical key bindings consumed by the input controller
///
/// Binding names match the host's input map (`"RotateClockwise"`, `"MoveLeft"`, ...).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    /// Rotate piece clockwise
    RotateCw,
    /// Rotate piece anticlockwise
    RotateCcw,
    /// Move piece one column left
    MoveLeft,
    /// Move piece one column right
    MoveRight,
    /// Soft drop one row (scores `level` per row)
    MoveDown,
    /// Hard drop to the landing row and lock immediately
    Drop,
    /// Swap with the hold slot (once per spawn)
    Hold,
    /// Slow motion while held (drains the slow-motion meter)
    SlowMo,
}

impl Action {
    pub const ALL: [Action; 8] = [
        Action::RotateCw,
        Action::RotateCcw,
        Action::MoveLeft,
        Action::MoveRight,
        Action::MoveDown,
        Action::Drop,
        Action::Hold,
        Action::SlowMo,
    ];

    /// Dense index for bitset-backed key state
    pub fn index(&self) -> usize {
        *self as usize
    }

    /// Binding name in the host input map
    pub fn binding(&self) -> &'static str {
        match self {
            Action::RotateCw => "RotateClockwise",
            Action::RotateCcw => "RotateAnticlockwise",
            Action::MoveLeft => "MoveLeft",
            Action::MoveRight => "MoveRight",
            Action::MoveDown => "MoveDown",
            Action::Drop => "Drop",
            Action::Hold => "Hold",
            Action::SlowMo => "Slowmo",
        }
    }

    /// Parse a binding name (exact match)
    pub fn from_binding(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|a| a.binding() == name)
    }
}

/// Observable outcome of a game tick
///
/// Hosts use these to drive presentation and audio; the core never renders.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameEvent {
    /// A piece entered play from the next queue
    PieceSpawned(ShapeKind),
    /// The active piece rotated (after kick resolution)
    PieceRotated,
    /// The active piece moved sideways or was soft dropped
    PieceMoved,
    /// Hard drop fell this many rows
    HardDropped(u32),
    /// The active piece was committed to the board
    PieceLocked,
    /// Lines were removed (1..=4)
    LinesCleared(u8),
    /// Level increased to the given value
    LevelUp(u32),
    /// Active piece went to (or swapped with) the hold slot
    HoldSwapped,
    /// Hold requested twice for one spawn
    HoldRejected,
    /// Resume countdown finished
    Resumed,
    /// Round ended; `rank` is the leaderboard insertion index, if any
    GameOver { rank: Option<usize> },
}

/// Timing parameters of the input controller, in milliseconds
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timings {
    pub finalize_ms: u32,
    pub rotate_repeat_ms: u32,
    pub move_side_repeat_ms: u32,
    pub soft_drop_repeat_ms: u32,
    pub repeat_delay_ms: u32,
    pub gravity_unit_ms: u32,
}

impl Timings {
    /// Gravity interval for a level: `(MAX_LEVEL + 1 - level) * unit`
    pub fn gravity_interval_ms(&self, level: u32) -> u32 {
        let level = level.clamp(MIN_LEVEL, MAX_LEVEL);
        (MAX_LEVEL + 1 - level) * self.gravity_unit_ms
    }
}

impl Default for Timings {
    fn default() -> Self {
        Self {
            finalize_ms: FINALIZE_MS,
            rotate_repeat_ms: ROTATE_REPEAT_MS,
            move_side_repeat_ms: MOVE_SIDE_REPEAT_MS,
            soft_drop_repeat_ms: SOFT_DROP_REPEAT_MS,
            repeat_delay_ms: REPEAT_DELAY_MS,
            gravity_unit_ms: GRAVITY_UNIT_MS,
        }
    }
}

/// Score parameters
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScoreTable {
    /// Base points for 1..=4 lines (index 0 unused)
    pub lines: [u32; 5],
    /// Hard drop bonus multiplier
    pub drop_multiplier: u32,
}

impl ScoreTable {
    /// Base points for clearing `count` lines at once (0 outside 1..=4)
    pub fn line_clear(&self, count: usize) -> u32 {
        match count {
            1..=4 => self.lines[count],
            _ => 0,
        }
    }
}

impl Default for ScoreTable {
    fn default() -> Self {
        Self {
            lines: LINE_SCORES,
            drop_multiplier: DROP_SCORE_MULTIPLIER,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn timing_defaults_match_classic_tuning() {
        assert_eq!(FINALIZE_MS, 700);
        assert_eq!(ROTATE_REPEAT_MS, 200);
        assert_eq!(MOVE_SIDE_REPEAT_MS, 50);
        assert_eq!(SOFT_DROP_REPEAT_MS, 50);
        assert_eq!(REPEAT_DELAY_MS, 300);
        assert_eq!(GRAVITY_UNIT_MS, 50);

        let t = Timings::default();
        assert_eq!(t.gravity_interval_ms(MIN_LEVEL), 500);
        assert_eq!(t.gravity_interval_ms(MAX_LEVEL), 50);
    }

    #[test]
    fn shape_codes_roundtrip() {
        for kind in ShapeKind::ALL {
            assert_eq!(ShapeKind::from_code(kind.code()), Some(kind));
            assert_eq!(ShapeKind::from_str(kind.as_str()), Some(kind));
        }
        assert_eq!(ShapeKind::from_code(0), None);
        assert_eq!(ShapeKind::from_code(8), None);
    }

    #[test]
    fn action_bindings_roundtrip() {
        for action in Action::ALL {
            assert_eq!(Action::from_binding(action.binding()), Some(action));
        }
        assert_eq!(Action::from_binding("Jump"), None);
    }

    #[test]
    fn score_table_default_matches_constants() {
        let table = ScoreTable::default();
        assert_eq!(table.line_clear(0), 0);
        assert_eq!(table.line_clear(1), 100);
        assert_eq!(table.line_clear(4), 600);
        assert_eq!(table.line_clear(5), 0);
        assert_eq!(table.drop_multiplier, 2);
    }
}
