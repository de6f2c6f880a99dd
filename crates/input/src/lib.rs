//! Input module (engine-facing).
//!
//! This crate is independent of any device or UI framework. Hosts report
//! logical key state through [`KeySource`]; the [`Controller`] turns it into
//! piece moves with delayed auto-repeat, gravity and lock delay.

pub mod controller;
pub mod keys;

pub use blocktris_core as core;
pub use blocktris_types as types;

pub use controller::{ControlOutcome, Controller};
pub use keys::{KeyFrame, KeySource, KeyTracker};
