//! Engine module - the round orchestrator.
//!
//! [`Game`] owns one instance of each component (board, active piece, next
//! queue, hold slot, ghost, controller, progression, slow motion, leaderboard,
//! settings) and is advanced by the host once per frame with [`Game::tick`].
//! Nothing is global; hosts pass key state in and read reports, events and
//! snapshots out.

pub mod config;
pub mod game;
pub mod slowmo;
pub mod snapshot;

pub use blocktris_core as core;
pub use blocktris_input as input;
pub use blocktris_types as types;

pub use config::GameConfig;
pub use game::{Game, TickReport, MAX_TICK_EVENTS};
pub use slowmo::{SlowMo, SlowMoConfig};
pub use snapshot::{GameSnapshot, PieceSnapshot, RoundState};
