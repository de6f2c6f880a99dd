//! Blocktris (workspace facade crate).
//!
//! Re-exports the member crates as `blocktris::{types, core, input, engine}`
//! so hosts depend on a single package while the implementation lives in
//! dedicated crates under `crates/`.

pub use blocktris_core as core;
pub use blocktris_engine as engine;
pub use blocktris_input as input;
pub use blocktris_types as types;
