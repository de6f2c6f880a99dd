//! Game orchestrator - owns one of every component and runs the tick loop
//!
//! Per tick, in order:
//! 1. advance the resume countdown
//! 2. spawn from the next queue if the active slot is empty (or end the round)
//! 3. stop here while paused
//! 4. slow motion turns real time into game time
//! 5. hold swap on its down edge
//! 6. controller: rotation, side moves, soft drop, gravity, hard drop, finalize
//! 7. on finalize commit the piece, otherwise refresh the ghost
//! 8. detect and clear full lines, score them, level up
//! 9. spawn again if the active slot was emptied
//!
//! Everything is fixed-size; a tick never allocates unless the round ends
//! (the leaderboard record owns the player's name).

use arrayvec::ArrayVec;
use log::{debug, info};

use crate::config::GameConfig;
use crate::core::board::SPAWN_POSITION;
use crate::core::{collision, Board, Leaderboard, Piece, Progression, ScoreRecord, Settings, SimpleRng};
use crate::input::{Controller, KeySource};
use crate::slowmo::SlowMo;
use crate::snapshot::{GameSnapshot, PieceSnapshot, RoundState};
use crate::types::{Action, GameEvent, ShapeKind, BOARD_HEIGHT, BOARD_WIDTH, NEXT_QUEUE_LEN};

/// Upper bound on events raised by one tick
pub const MAX_TICK_EVENTS: usize = 16;

/// What one tick did
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TickReport {
    /// The active piece was committed this tick
    pub finalized: bool,
    pub events: ArrayVec<GameEvent, MAX_TICK_EVENTS>,
}

impl TickReport {
    fn push(&mut self, event: GameEvent) {
        let _ = self.events.try_push(event);
    }

    pub fn contains(&self, event: &GameEvent) -> bool {
        self.events.contains(event)
    }
}

/// Complete game state
#[derive(Debug, Clone)]
pub struct Game {
    config: GameConfig,
    state: RoundState,
    board: Board,
    current: Piece,
    next: [Piece; NEXT_QUEUE_LEN],
    hold: Piece,
    ghost: Piece,
    hold_used: bool,
    controller: Controller,
    progression: Progression,
    slowmo: SlowMo,
    rng: SimpleRng,
    leaderboard: Leaderboard,
    settings: Settings,
    paused: bool,
    resume_remaining_ms: Option<u32>,
    /// Tag stamped on the blocks of the next created piece
    next_tag: u32,
}

impl Game {
    /// A game in the `Empty` state; call [`Game::create`] to start a round
    pub fn new(config: GameConfig) -> Self {
        Self {
            state: RoundState::Empty,
            board: Board::new(),
            current: Piece::new(),
            next: Default::default(),
            hold: Piece::new(),
            ghost: Piece::new(),
            hold_used: false,
            controller: Controller::new(config.timings),
            progression: Progression::new(config.scores, config.timings),
            slowmo: SlowMo::new(config.slowmo),
            rng: SimpleRng::new(config.seed),
            leaderboard: Leaderboard::new(),
            settings: Settings::default(),
            paused: false,
            resume_remaining_ms: None,
            next_tag: 0,
            config,
        }
    }

    pub fn with_settings(mut self, settings: Settings) -> Self {
        self.settings = settings;
        self
    }

    pub fn with_leaderboard(mut self, leaderboard: Leaderboard) -> Self {
        self.leaderboard = leaderboard;
        self
    }

    /// Reset everything and start a new round with a full next queue
    pub fn create(&mut self) {
        self.clear();
        for i in 0..NEXT_QUEUE_LEN {
            self.refill_preview(i);
        }
        self.state = RoundState::Playing;
        info!("new round, seed state {}", self.rng.state());
    }

    /// Drop the round: empty board, pieces, queue and timers, back to `Empty`
    pub fn clear(&mut self) {
        self.state = RoundState::Empty;
        self.board.clear();
        self.current.clear();
        for piece in &mut self.next {
            piece.clear();
        }
        self.hold.clear();
        self.ghost.clear();
        self.hold_used = false;
        self.controller.reset_timers();
        self.progression.clear();
        self.slowmo.clear();
        self.paused = false;
        self.resume_remaining_ms = None;
    }

    pub fn state(&self) -> RoundState {
        self.state
    }

    pub fn is_game_over(&self) -> bool {
        self.state == RoundState::GameOver
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn board_mut(&mut self) -> &mut Board {
        &mut self.board
    }

    /// The falling piece (empty between lock and spawn)
    pub fn current(&self) -> &Piece {
        &self.current
    }

    pub fn next_queue(&self) -> &[Piece; NEXT_QUEUE_LEN] {
        &self.next
    }

    pub fn hold_piece(&self) -> &Piece {
        &self.hold
    }

    /// Landing preview of the active piece (empty when shadows are off)
    pub fn ghost(&self) -> &Piece {
        &self.ghost
    }

    pub fn can_hold(&self) -> bool {
        !self.hold_used
    }

    pub fn progression(&self) -> &Progression {
        &self.progression
    }

    pub fn score(&self) -> u32 {
        self.progression.score()
    }

    pub fn level(&self) -> u32 {
        self.progression.level()
    }

    pub fn lines(&self) -> u32 {
        self.progression.lines()
    }

    pub fn controller(&self) -> &Controller {
        &self.controller
    }

    pub fn slowmo(&self) -> &SlowMo {
        &self.slowmo
    }

    pub fn leaderboard(&self) -> &Leaderboard {
        &self.leaderboard
    }

    pub fn leaderboard_mut(&mut self) -> &mut Leaderboard {
        &mut self.leaderboard
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn settings_mut(&mut self) -> &mut Settings {
        &mut self.settings
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    /// Halt input and gravity; cancels a running resume countdown
    pub fn pause(&mut self) {
        self.paused = true;
        self.resume_remaining_ms = None;
    }

    /// Start the countdown after which play continues
    pub fn resume(&mut self) {
        if self.paused {
            self.resume_remaining_ms = Some(self.config.resume_wait_ms);
        }
    }

    /// Time left on the resume countdown, if one is running
    pub fn resume_remaining_ms(&self) -> Option<u32> {
        self.resume_remaining_ms
    }

    /// Replace a preview with a specific shape (scripted openings, tests)
    ///
    /// Returns false for an index outside the queue.
    pub fn set_next(&mut self, index: usize, kind: ShapeKind) -> bool {
        if index >= NEXT_QUEUE_LEN {
            return false;
        }
        self.create_preview(index, kind);
        true
    }

    /// Advance the simulation by `real_ms` of wall-clock time
    pub fn tick<K: KeySource + ?Sized>(&mut self, keys: &K, real_ms: u32) -> TickReport {
        let mut report = TickReport::default();

        self.advance_resume(real_ms, &mut report);

        if self.state != RoundState::Playing {
            return report;
        }
        if self.current.is_empty() && !self.spawn(&mut report) {
            return report;
        }
        if self.paused {
            return report;
        }

        let game_ms = self.slowmo.update(
            keys.is_held(Action::SlowMo),
            keys.is_down_edge(Action::SlowMo),
            real_ms,
        );

        if keys.is_down_edge(Action::Hold) {
            self.hold(&mut report);
        }

        if !self.current.is_empty() {
            let outcome = self.controller.apply(
                &mut self.current,
                &self.board,
                keys,
                real_ms,
                game_ms,
                self.progression.gravity_interval_ms(),
            );

            if outcome.rotated {
                report.push(GameEvent::PieceRotated);
            }
            if outcome.moved || outcome.soft_drop_steps > 0 {
                report.push(GameEvent::PieceMoved);
            }
            for _ in 0..outcome.soft_drop_steps {
                self.progression.soft_drop_step();
            }
            if let Some(rows) = outcome.hard_drop {
                self.progression.hard_drop(rows);
                report.push(GameEvent::HardDropped(rows));
            }

            if outcome.finalize {
                self.lock_current(&mut report);
            } else {
                self.update_ghost();
            }
        }

        self.check_lines(&mut report);

        if self.current.is_empty() {
            self.spawn(&mut report);
        }

        report
    }

    /// Observer view of the current state
    pub fn snapshot(&self) -> GameSnapshot {
        let mut board = [[0u8; BOARD_WIDTH as usize]; BOARD_HEIGHT as usize];
        self.board.write_u8_grid(&mut board);

        let mut next = [0u8; NEXT_QUEUE_LEN];
        for (code, piece) in next.iter_mut().zip(&self.next) {
            *code = piece.kind().map_or(0, |k| k.code());
        }

        GameSnapshot {
            board,
            active: PieceSnapshot::from_piece(&self.current),
            ghost: PieceSnapshot::from_piece(&self.ghost),
            hold: self.hold.kind().map(|k| k.code()),
            next,
            can_hold: self.can_hold(),
            state: self.state,
            paused: self.paused,
            resume_remaining_ms: self.resume_remaining_ms.unwrap_or(0),
            score: self.progression.score(),
            level: self.progression.level(),
            lines: self.progression.lines(),
            slowmo_meter: self.slowmo.meter_fraction(),
        }
    }

    fn advance_resume(&mut self, real_ms: u32, report: &mut TickReport) {
        let Some(remaining) = self.resume_remaining_ms else {
            return;
        };
        let remaining = remaining.saturating_sub(real_ms);
        if remaining == 0 {
            self.resume_remaining_ms = None;
            self.paused = false;
            report.push(GameEvent::Resumed);
        } else {
            self.resume_remaining_ms = Some(remaining);
        }
    }

    fn take_tag(&mut self) -> u32 {
        let tag = self.next_tag;
        self.next_tag = self.next_tag.wrapping_add(1);
        tag
    }

    fn create_preview(&mut self, index: usize, kind: ShapeKind) {
        let tag = self.take_tag();
        let piece = &mut self.next[index];
        piece.create_tagged(kind, tag);
        piece.move_center_to_origin();
    }

    fn refill_preview(&mut self, index: usize) {
        let kind = self.rng.next_shape();
        self.create_preview(index, kind);
    }

    /// Move the head of the queue into play; ends the round when the spawn cell is taken
    fn spawn(&mut self, report: &mut TickReport) -> bool {
        if self.board.is_game_over() {
            self.game_over(report);
            return false;
        }

        std::mem::swap(&mut self.current, &mut self.next[0]);
        self.next.rotate_left(1);
        self.refill_preview(NEXT_QUEUE_LEN - 1);

        if self.current.is_empty() {
            let kind = self.rng.next_shape();
            let tag = self.take_tag();
            self.current.create_tagged(kind, tag);
        }

        self.current.set_position(SPAWN_POSITION.0, SPAWN_POSITION.1);
        self.controller.reset_timers();
        self.hold_used = false;

        if let Some(kind) = self.current.kind() {
            debug!("spawned {}", kind.as_str());
            report.push(GameEvent::PieceSpawned(kind));
        }
        self.update_ghost();
        true
    }

    fn game_over(&mut self, report: &mut TickReport) {
        self.state = RoundState::GameOver;
        self.ghost.clear();

        let score = self.progression.score();
        let rank = self
            .leaderboard
            .add(ScoreRecord::new(self.settings.player_name.clone(), score));
        info!(
            "game over: score {}, level {}, lines {}, rank {:?}",
            score,
            self.progression.level(),
            self.progression.lines(),
            rank
        );
        report.push(GameEvent::GameOver { rank });
    }

    fn hold(&mut self, report: &mut TickReport) {
        if self.hold_used {
            debug!("hold rejected, already used for this piece");
            report.push(GameEvent::HoldRejected);
            return;
        }
        if self.current.is_empty() {
            return;
        }
        self.hold_used = true;

        std::mem::swap(&mut self.current, &mut self.hold);
        self.hold.rotate_to(0);
        self.hold.move_center_to_origin();
        self.ghost.clear();

        if !self.current.is_empty() {
            self.current.set_position(SPAWN_POSITION.0, SPAWN_POSITION.1);
            self.controller.reset_timers();
        }

        debug!(
            "hold: {:?} stored, {:?} in play",
            self.hold.kind(),
            self.current.kind()
        );
        report.push(GameEvent::HoldSwapped);
    }

    fn lock_current(&mut self, report: &mut TickReport) {
        if self.board.commit(&mut self.current) {
            debug!("piece locked, {} cells on board", self.board.occupied_count());
            report.finalized = true;
            report.push(GameEvent::PieceLocked);
        }
        self.ghost.clear();
    }

    fn check_lines(&mut self, report: &mut TickReport) {
        let rows = self.board.detect_full_lines();
        if rows.is_empty() {
            return;
        }

        let removed = self.board.clear_lines(&rows);
        let scored = self.progression.lines_cleared(removed);
        debug!("cleared {} line(s) for {} points", removed, scored.points);
        report.push(GameEvent::LinesCleared(removed as u8));
        if let Some(level) = scored.level_up {
            report.push(GameEvent::LevelUp(level));
        }
    }

    fn update_ghost(&mut self) {
        let Some(kind) = self.current.kind().filter(|_| self.settings.draw_shadow) else {
            self.ghost.clear();
            return;
        };

        if self.ghost.kind() != Some(kind) {
            self.ghost.create(kind);
        }
        self.ghost.set_position(self.current.x(), self.current.y());
        self.ghost.rotate_to(i32::from(self.current.rotation()));
        collision::drop(&mut self.ghost, &self.board);
    }
}

impl Default for Game {
    fn default() -> Self {
        Self::new(GameConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Block;
    use crate::input::KeyFrame;

    fn started(first: ShapeKind) -> Game {
        let mut game = Game::default();
        game.create();
        game.set_next(0, first);
        game
    }

    fn fill_row_except(game: &mut Game, y: i8, gaps: &[i8]) {
        for x in 0..10 {
            if !gaps.contains(&x) {
                game.board_mut().set(x, y, Some(Block::new(ShapeKind::O, 0)));
            }
        }
    }

    #[test]
    fn test_new_game_is_empty_and_inert() {
        let mut game = Game::default();
        assert_eq!(game.state(), RoundState::Empty);
        let report = game.tick(&KeyFrame::NONE, 16);
        assert!(report.events.is_empty());
        assert!(game.current().is_empty());
    }

    #[test]
    fn test_create_fills_queue_and_first_tick_spawns() {
        let mut game = started(ShapeKind::T);
        assert_eq!(game.state(), RoundState::Playing);
        assert!(game.next_queue().iter().all(|p| !p.is_empty()));

        let report = game.tick(&KeyFrame::NONE, 16);
        assert!(report.contains(&GameEvent::PieceSpawned(ShapeKind::T)));
        assert_eq!(game.current().kind(), Some(ShapeKind::T));
        assert_eq!(game.current().position(), SPAWN_POSITION);
        assert!(game.next_queue().iter().all(|p| !p.is_empty()));
    }

    #[test]
    fn test_queue_shifts_forward() {
        let mut game = started(ShapeKind::I);
        game.set_next(1, ShapeKind::O);
        game.set_next(2, ShapeKind::S);
        game.tick(&KeyFrame::NONE, 16);
        assert_eq!(game.next_queue()[0].kind(), Some(ShapeKind::O));
        assert_eq!(game.next_queue()[1].kind(), Some(ShapeKind::S));
    }

    #[test]
    fn test_hard_drop_locks_scores_and_respawns() {
        let mut game = started(ShapeKind::I);
        game.tick(&KeyFrame::NONE, 16);

        let report = game.tick(&KeyFrame::new().press(Action::Drop), 16);
        assert!(report.finalized);
        assert!(report.contains(&GameEvent::HardDropped(19)));
        assert!(report.contains(&GameEvent::PieceLocked));
        assert_eq!(game.score(), 38);
        assert!((3..7).all(|x| game.board().is_occupied(x, 0)));
        assert!(!game.current().is_empty(), "next piece spawns in the same tick");
    }

    #[test]
    fn test_line_clear_scores_and_collapses() {
        let mut game = started(ShapeKind::I);
        fill_row_except(&mut game, 0, &[3, 4, 5, 6]);
        game.board_mut().set(0, 1, Some(Block::new(ShapeKind::T, 9)));
        game.tick(&KeyFrame::NONE, 16);

        let report = game.tick(&KeyFrame::new().press(Action::Drop), 16);
        assert!(report.contains(&GameEvent::LinesCleared(1)));
        assert_eq!(game.lines(), 1);
        assert_eq!(game.score(), 38 + 100);
        assert_eq!(game.board().get(0, 0), Some(Some(Block::new(ShapeKind::T, 9))));
        assert_eq!(game.board().occupied_count(), 1);
    }

    #[test]
    fn test_hold_once_per_spawn() {
        let mut game = started(ShapeKind::L);
        game.set_next(1, ShapeKind::J);
        game.tick(&KeyFrame::NONE, 16);

        let report = game.tick(&KeyFrame::new().press(Action::Hold), 16);
        assert!(report.contains(&GameEvent::HoldSwapped));
        assert_eq!(game.hold_piece().kind(), Some(ShapeKind::L));
        // Empty hold: the next piece comes in straight away.
        assert_eq!(game.current().kind(), Some(ShapeKind::J));
        assert!(game.can_hold());

        let report = game.tick(&KeyFrame::new().press(Action::Hold), 16);
        assert!(report.contains(&GameEvent::HoldSwapped));
        assert_eq!(game.current().kind(), Some(ShapeKind::L));
        assert_eq!(game.current().position(), SPAWN_POSITION);
        assert_eq!(game.hold_piece().kind(), Some(ShapeKind::J));
        assert!(!game.can_hold());

        let report = game.tick(&KeyFrame::new().press(Action::Hold), 16);
        assert!(report.contains(&GameEvent::HoldRejected));
        assert_eq!(game.current().kind(), Some(ShapeKind::L));
    }

    #[test]
    fn test_held_piece_is_reset_to_spawn_rotation() {
        let mut game = started(ShapeKind::T);
        game.tick(&KeyFrame::NONE, 16);
        game.tick(&KeyFrame::new().press(Action::RotateCcw), 16);
        assert_eq!(game.current().rotation(), 1);

        game.tick(&KeyFrame::new().press(Action::Hold), 16);
        assert_eq!(game.hold_piece().rotation(), 0);
    }

    #[test]
    fn test_ghost_follows_active_piece() {
        let mut game = started(ShapeKind::O);
        game.tick(&KeyFrame::NONE, 16);
        assert_eq!(game.ghost().kind(), Some(ShapeKind::O));
        assert_eq!(game.ghost().x(), game.current().x());
        assert_eq!(game.ghost().y(), -1);

        game.settings_mut().draw_shadow = false;
        game.tick(&KeyFrame::NONE, 16);
        assert!(game.ghost().is_empty());
    }

    #[test]
    fn test_pause_and_resume_countdown() {
        let mut game = started(ShapeKind::O);
        game.tick(&KeyFrame::NONE, 16);
        let y = game.current().y();

        game.pause();
        game.tick(&KeyFrame::new().press(Action::MoveDown), 1000);
        assert_eq!(game.current().y(), y);

        game.resume();
        assert_eq!(game.resume_remaining_ms(), Some(3000));
        game.tick(&KeyFrame::NONE, 2000);
        assert!(game.is_paused());
        assert_eq!(game.resume_remaining_ms(), Some(1000));

        let report = game.tick(&KeyFrame::NONE, 1000);
        assert!(report.contains(&GameEvent::Resumed));
        assert!(!game.is_paused());
        assert_eq!(game.resume_remaining_ms(), None);
    }

    #[test]
    fn test_pause_cancels_countdown() {
        let mut game = started(ShapeKind::O);
        game.pause();
        game.resume();
        game.pause();
        assert_eq!(game.resume_remaining_ms(), None);
        game.tick(&KeyFrame::NONE, 5000);
        assert!(game.is_paused());
    }

    #[test]
    fn test_game_over_records_score() {
        let mut game = started(ShapeKind::O);
        game.settings_mut().player_name = "ann".to_string();
        game.board_mut().set(5, 19, Some(Block::new(ShapeKind::I, 0)));
        game.progression.hard_drop(10);

        let report = game.tick(&KeyFrame::NONE, 16);
        assert!(report.contains(&GameEvent::GameOver { rank: Some(0) }));
        assert!(game.is_game_over());
        assert_eq!(game.leaderboard().records()[0], ScoreRecord::new("ann", 20));

        // Frozen until an explicit reset.
        assert!(game.tick(&KeyFrame::new().press(Action::Drop), 16).events.is_empty());
        game.clear();
        assert_eq!(game.state(), RoundState::Empty);
    }

    #[test]
    fn test_snapshot_reflects_state() {
        let mut game = started(ShapeKind::I);
        game.tick(&KeyFrame::NONE, 16);
        let snap = game.snapshot();
        assert_eq!(snap.state, RoundState::Playing);
        let active = snap.active.unwrap();
        assert_eq!(active.kind, ShapeKind::I.code());
        assert_eq!((active.x, active.y), SPAWN_POSITION);
        assert!(active.cells.iter().all(|&(_, y)| y == 19));
        assert_eq!(snap.ghost.unwrap().cells[0].1, 0);
        assert_eq!(snap.hold, None);
        assert!(snap.next.iter().all(|&c| (1..=7).contains(&c)));
    }
}
