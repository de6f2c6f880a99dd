//! Core simulation module - pure, deterministic, and testable
//!
//! This crate holds the rules of the falling-block game. It has **zero
//! dependencies** on rendering, audio or input devices:
//!
//! - **Deterministic**: the same seed produces the same shape sequence
//! - **Zero-allocation hot paths**: pieces and the board are fixed-size arrays
//!   that are cleared and reused, never reallocated per tick
//! - **Single owner**: blocks move from a [`Piece`] into the [`Board`] on commit
//!
//! # Module Structure
//!
//! - [`piece`]: shape catalog and table-driven rotation in a 4x4 local grid
//! - [`board`]: 10x20 grid of locked blocks, commit, line detection and collapse
//! - [`collision`]: placement predicates and post-rotation kick correction
//! - [`progression`]: level, line total, score and gravity interval
//! - [`leaderboard`]: fixed-length best score table
//! - [`settings`]: player preferences
//! - [`store`]: key-value persistence contract shared by the two above
//! - [`rng`]: seeded uniform shape generator
//!
//! # Example
//!
//! ```
//! use blocktris_core::{board::SPAWN_POSITION, collision, Board, Piece, Progression};
//! use blocktris_core::types::ShapeKind;
//!
//! let mut board = Board::new();
//! let mut piece = Piece::of(ShapeKind::I);
//! piece.set_position(SPAWN_POSITION.0, SPAWN_POSITION.1);
//!
//! let rows = collision::drop(&mut piece, &board);
//! let mut progression = Progression::default();
//! progression.hard_drop(rows);
//! board.commit(&mut piece);
//!
//! assert_eq!(rows, 19);
//! assert_eq!(progression.score(), 38);
//! assert!((3..7).all(|x| board.is_occupied(x, 0)));
//! ```

pub mod board;
pub mod collision;
pub mod error;
pub mod leaderboard;
pub mod piece;
pub mod progression;
pub mod rng;
pub mod settings;
pub mod store;

pub use blocktris_types as types;

// Re-export commonly used types for convenience
pub use board::Board;
pub use error::LeaderboardError;
pub use leaderboard::{Leaderboard, ScoreRecord};
pub use piece::{Block, Piece};
pub use progression::{LineClearScore, Progression};
pub use rng::SimpleRng;
pub use settings::Settings;
pub use store::{KeyValueStore, MemoryStore};
