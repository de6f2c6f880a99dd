//! Input/timing controller.
//!
//! Converts one frame of logical key state plus elapsed time into piece
//! actions, and runs the gravity and lock-delay ("finalize") timers.
//!
//! Two clocks are fed in: `real_ms` drives key auto-repeat, `game_ms` (real
//! time scaled by slow motion) drives gravity and lock delay. Per call the
//! order is fixed: advance timers, rotation, side moves, soft drop, gravity,
//! hard drop, finalize decision.

use log::trace;

use crate::core::{collision, Board, Piece};
use crate::keys::KeySource;
use crate::types::{Action, Spin, Timings};

/// What happened to the piece during one [`Controller::apply`] call.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ControlOutcome {
    /// Commit the piece now.
    pub finalize: bool,
    /// Rows fallen by a hard drop this frame.
    pub hard_drop: Option<u32>,
    /// Successful soft drop rows (each scores `level`).
    pub soft_drop_steps: u32,
    /// A rotation succeeded.
    pub rotated: bool,
    /// A side move succeeded.
    pub moved: bool,
    /// Gravity pulled the piece down one row.
    pub fell: bool,
}

/// Auto-repeat state of one key.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
struct RepeatTimer {
    pressed_ms: u32,
    last_ms: u32,
}

impl RepeatTimer {
    fn reset(&mut self) {
        *self = Self::default();
    }

    /// Accumulate held time; true when a repeat is due.
    fn advance(&mut self, real_ms: u32, delay_ms: u32, interval_ms: u32) -> bool {
        self.pressed_ms = self.pressed_ms.saturating_add(real_ms);
        self.last_ms = self.last_ms.saturating_add(real_ms);
        if self.pressed_ms >= delay_ms && self.last_ms >= interval_ms {
            self.last_ms = 0;
            return true;
        }
        false
    }

    fn is_pressed(&self) -> bool {
        self.pressed_ms != 0
    }
}

/// Act on the down edge, then auto-repeat while held.
///
/// `blocked` is true while the opposite key of the pair is being held; the
/// key is then ignored and its timers are reset.
#[allow(clippy::too_many_arguments)]
fn repeat_key<K: KeySource + ?Sized>(
    keys: &K,
    action: Action,
    timer: &mut RepeatTimer,
    blocked: bool,
    real_ms: u32,
    delay_ms: u32,
    interval_ms: u32,
    mut act: impl FnMut() -> bool,
) -> bool {
    let mut done = false;

    if keys.is_down_edge(action) && !blocked {
        done |= act();
    }

    if keys.is_held(action) && !blocked {
        if timer.advance(real_ms, delay_ms, interval_ms) {
            done |= act();
        }
    } else {
        timer.reset();
    }

    done
}

/// Per-piece controller state: gravity, lock delay and auto-repeat timers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Controller {
    timings: Timings,
    gravity_ms: u32,
    finalize_ms: u32,
    rotate_cw: RepeatTimer,
    rotate_ccw: RepeatTimer,
    move_left: RepeatTimer,
    move_right: RepeatTimer,
    move_down: RepeatTimer,
}

impl Controller {
    pub fn new(timings: Timings) -> Self {
        Self {
            timings,
            gravity_ms: 0,
            finalize_ms: 0,
            rotate_cw: RepeatTimer::default(),
            rotate_ccw: RepeatTimer::default(),
            move_left: RepeatTimer::default(),
            move_right: RepeatTimer::default(),
            move_down: RepeatTimer::default(),
        }
    }

    pub fn timings(&self) -> &Timings {
        &self.timings
    }

    /// Zero every timer (new piece, hold swap, new round).
    pub fn reset_timers(&mut self) {
        *self = Self::new(self.timings);
    }

    /// Time since the last gravity step or soft drop.
    pub fn gravity_timer_ms(&self) -> u32 {
        self.gravity_ms
    }

    /// Time since the piece last moved.
    pub fn finalize_timer_ms(&self) -> u32 {
        self.finalize_ms
    }

    /// Run one frame of input and timers against `piece`.
    pub fn apply<K: KeySource + ?Sized>(
        &mut self,
        piece: &mut Piece,
        board: &Board,
        keys: &K,
        real_ms: u32,
        game_ms: u32,
        gravity_interval_ms: u32,
    ) -> ControlOutcome {
        let mut outcome = ControlOutcome::default();
        if piece.is_empty() {
            return outcome;
        }

        self.gravity_ms = self.gravity_ms.saturating_add(game_ms);
        self.finalize_ms = self.finalize_ms.saturating_add(game_ms);

        outcome.rotated = self.input_rotation(piece, board, keys, real_ms);
        outcome.moved = self.input_move_side(piece, board, keys, real_ms);
        outcome.soft_drop_steps = self.input_move_down(piece, board, keys, real_ms);
        if outcome.rotated || outcome.moved || outcome.soft_drop_steps > 0 {
            self.finalize_ms = 0;
        }

        if self.gravity_ms >= gravity_interval_ms {
            self.gravity_ms = 0;
            if collision::try_move_down(piece, board) {
                self.finalize_ms = 0;
                outcome.fell = true;
            }
        }

        if keys.is_down_edge(Action::Drop) {
            let rows = collision::drop(piece, board);
            trace!("hard drop fell {rows} rows");
            outcome.hard_drop = Some(rows);
        }

        outcome.finalize = outcome.hard_drop.is_some() || self.finalize_ms >= self.timings.finalize_ms;
        outcome
    }

    fn input_rotation<K: KeySource + ?Sized>(
        &mut self,
        piece: &mut Piece,
        board: &Board,
        keys: &K,
        real_ms: u32,
    ) -> bool {
        let Timings {
            repeat_delay_ms,
            rotate_repeat_ms,
            ..
        } = self.timings;

        let blocked = self.rotate_ccw.is_pressed();
        let cw = repeat_key(
            keys,
            Action::RotateCw,
            &mut self.rotate_cw,
            blocked,
            real_ms,
            repeat_delay_ms,
            rotate_repeat_ms,
            || collision::try_rotate(piece, board, Spin::Clockwise),
        );

        let blocked = self.rotate_cw.is_pressed();
        let ccw = repeat_key(
            keys,
            Action::RotateCcw,
            &mut self.rotate_ccw,
            blocked,
            real_ms,
            repeat_delay_ms,
            rotate_repeat_ms,
            || collision::try_rotate(piece, board, Spin::Anticlockwise),
        );

        cw || ccw
    }

    fn input_move_side<K: KeySource + ?Sized>(
        &mut self,
        piece: &mut Piece,
        board: &Board,
        keys: &K,
        real_ms: u32,
    ) -> bool {
        let Timings {
            repeat_delay_ms,
            move_side_repeat_ms,
            ..
        } = self.timings;

        let blocked = self.move_left.is_pressed();
        let right = repeat_key(
            keys,
            Action::MoveRight,
            &mut self.move_right,
            blocked,
            real_ms,
            repeat_delay_ms,
            move_side_repeat_ms,
            || collision::try_move_side(piece, board, 1),
        );

        let blocked = self.move_right.is_pressed();
        let left = repeat_key(
            keys,
            Action::MoveLeft,
            &mut self.move_left,
            blocked,
            real_ms,
            repeat_delay_ms,
            move_side_repeat_ms,
            || collision::try_move_side(piece, board, -1),
        );

        right || left
    }

    /// Soft drop. Holding the key keeps gravity from firing.
    fn input_move_down<K: KeySource + ?Sized>(
        &mut self,
        piece: &mut Piece,
        board: &Board,
        keys: &K,
        real_ms: u32,
    ) -> u32 {
        let mut steps = 0;

        if keys.is_down_edge(Action::MoveDown) && collision::try_move_down(piece, board) {
            self.gravity_ms = 0;
            steps += 1;
        }

        if keys.is_held(Action::MoveDown) {
            self.gravity_ms = 0;
            if self.move_down.advance(
                real_ms,
                self.timings.repeat_delay_ms,
                self.timings.soft_drop_repeat_ms,
            ) && collision::try_move_down(piece, board)
            {
                steps += 1;
            }
        } else {
            self.move_down.reset();
        }

        steps
    }
}

impl Default for Controller {
    fn default() -> Self {
        Self::new(Timings::default())
    }
}
