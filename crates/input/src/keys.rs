//! Logical key state consumed by the controller.
//!
//! The core never talks to a device. A host supplies, per [`Action`], whether
//! the key went down this frame and whether it is currently held.

use crate::types::Action;

/// Per-frame key state for every logical binding.
pub trait KeySource {
    /// Key went down this frame.
    fn is_down_edge(&self, action: Action) -> bool;

    /// Key is held this frame (including the frame it went down).
    fn is_held(&self, action: Action) -> bool;
}

/// Bitset snapshot of one frame of key state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct KeyFrame {
    down: u16,
    held: u16,
}

impl KeyFrame {
    /// No keys down or held.
    pub const NONE: Self = Self { down: 0, held: 0 };

    pub fn new() -> Self {
        Self::NONE
    }

    #[inline]
    fn bit(action: Action) -> u16 {
        1 << action.index()
    }

    /// Key went down this frame (and is therefore held).
    pub fn press(mut self, action: Action) -> Self {
        self.down |= Self::bit(action);
        self.held |= Self::bit(action);
        self
    }

    /// Key is held from an earlier frame.
    pub fn hold(mut self, action: Action) -> Self {
        self.held |= Self::bit(action);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.held == 0 && self.down == 0
    }
}

impl KeySource for KeyFrame {
    fn is_down_edge(&self, action: Action) -> bool {
        self.down & Self::bit(action) != 0
    }

    fn is_held(&self, action: Action) -> bool {
        self.held & Self::bit(action) != 0
    }
}

/// Turns press/release notifications into per-frame [`KeyFrame`]s.
///
/// Down edges are latched until the next [`KeyTracker::frame`] call, so a tap
/// that is pressed and released between two frames is still seen once.
#[derive(Debug, Clone, Default)]
pub struct KeyTracker {
    held: u16,
    pending_down: u16,
}

impl KeyTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn handle_key_press(&mut self, action: Action) {
        let bit = KeyFrame::bit(action);
        if self.held & bit == 0 {
            self.pending_down |= bit;
        }
        self.held |= bit;
    }

    pub fn handle_key_release(&mut self, action: Action) {
        self.held &= !KeyFrame::bit(action);
    }

    /// State for this frame; clears latched down edges.
    pub fn frame(&mut self) -> KeyFrame {
        let frame = KeyFrame {
            down: self.pending_down,
            held: self.held | self.pending_down,
        };
        self.pending_down = 0;
        frame
    }

    pub fn reset(&mut self) {
        self.held = 0;
        self.pending_down = 0;
    }
}
