//! Progression module - level, line total, score and gravity speed
//!
//! Scoring:
//! - soft drop: `level` per row
//! - hard drop: `rows * drop_multiplier * level`
//! - line clear: `table[count] * level`, using the level before any level-up
//!
//! A level-up happens once the running line total reaches `level * 10`; the
//! level is clamped to [`MAX_LEVEL`] and the gravity interval is recomputed.

use log::debug;

use crate::types::{ScoreTable, Timings, LINES_PER_LEVEL, MAX_LEVEL, MIN_LEVEL};

/// Result of recording a line clear
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LineClearScore {
    /// Points awarded for the clear
    pub points: u32,
    /// New level if this clear caused a level-up
    pub level_up: Option<u32>,
}

/// Running level/score ledger for one round
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Progression {
    level: u32,
    lines: u32,
    score: u32,
    gravity_interval_ms: u32,
    scores: ScoreTable,
    timings: Timings,
}

impl Progression {
    pub fn new(scores: ScoreTable, timings: Timings) -> Self {
        Self {
            level: MIN_LEVEL,
            lines: 0,
            score: 0,
            gravity_interval_ms: timings.gravity_interval_ms(MIN_LEVEL),
            scores,
            timings,
        }
    }

    pub fn level(&self) -> u32 {
        self.level
    }

    /// Total lines cleared this round
    pub fn lines(&self) -> u32 {
        self.lines
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    /// Current gravity step interval in milliseconds
    pub fn gravity_interval_ms(&self) -> u32 {
        self.gravity_interval_ms
    }

    /// Line total that triggers the next level-up
    pub fn next_level_lines(&self) -> u32 {
        self.level * LINES_PER_LEVEL
    }

    /// Award one soft drop row; returns the points added
    pub fn soft_drop_step(&mut self) -> u32 {
        let points = self.level;
        self.score = self.score.saturating_add(points);
        points
    }

    /// Award a hard drop of `rows` rows; returns the points added
    pub fn hard_drop(&mut self, rows: u32) -> u32 {
        let points = rows
            .saturating_mul(self.scores.drop_multiplier)
            .saturating_mul(self.level);
        self.score = self.score.saturating_add(points);
        points
    }

    /// Record `count` simultaneously cleared lines
    pub fn lines_cleared(&mut self, count: usize) -> LineClearScore {
        let points = self.scores.line_clear(count).saturating_mul(self.level);
        self.score = self.score.saturating_add(points);
        self.lines += count as u32;

        let mut level_up = None;
        if self.lines >= self.next_level_lines() && self.level < MAX_LEVEL {
            self.level += 1;
            self.gravity_interval_ms = self.timings.gravity_interval_ms(self.level);
            debug!(
                "level up to {} after {} lines, gravity {} ms",
                self.level, self.lines, self.gravity_interval_ms
            );
            level_up = Some(self.level);
        }

        LineClearScore { points, level_up }
    }

    /// Back to level 1 with no lines and no score
    pub fn clear(&mut self) {
        self.level = MIN_LEVEL;
        self.lines = 0;
        self.score = 0;
        self.gravity_interval_ms = self.timings.gravity_interval_ms(MIN_LEVEL);
    }
}

impl Default for Progression {
    fn default() -> Self {
        Self::new(ScoreTable::default(), Timings::default())
    }
}
