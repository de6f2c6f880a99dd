//! Leaderboard module - fixed-length best score table
//!
//! Always exactly [`LEADERBOARD_LEN`] records, highest score first. Empty
//! positions hold the default record (`"NoName"`, 0). Records persist under
//! `best_score_0 ..= best_score_6` as `` name`score ``.

use log::debug;

use crate::error::LeaderboardError;
use crate::store::KeyValueStore;
use crate::types::LEADERBOARD_LEN;

/// Placeholder name for padding and unreadable records
pub const NO_NAME: &str = "NoName";

const KEY_PREFIX: &str = "best_score_";
const FIELD_SEPARATOR: char = '`';

/// One `(player name, score)` entry
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ScoreRecord {
    pub name: String,
    pub score: u32,
}

impl ScoreRecord {
    pub fn new(name: impl Into<String>, score: u32) -> Self {
        Self {
            name: name.into(),
            score,
        }
    }

    /// Decode a stored `` name`score `` value
    ///
    /// A value without exactly two fields yields the default record. An empty
    /// name becomes [`NO_NAME`]; a score that is not a number becomes 0.
    /// Signed scores are accepted and clamped into `0..=u32::MAX`.
    pub fn parse(value: &str) -> Self {
        let mut fields = value.split(FIELD_SEPARATOR);
        let (Some(name), Some(score), None) = (fields.next(), fields.next(), fields.next()) else {
            debug!("malformed leaderboard value {value:?}, using default record");
            return Self::default();
        };

        let name = if name.is_empty() { NO_NAME } else { name };
        let score = match score.trim().parse::<i64>() {
            Ok(score) => score.clamp(0, i64::from(u32::MAX)) as u32,
            Err(_) => {
                debug!("malformed leaderboard score {score:?}, using 0");
                0
            }
        };
        Self::new(name, score)
    }

    /// Encode for storage
    pub fn encode(&self) -> String {
        format!("{}{}{}", self.name, FIELD_SEPARATOR, self.score)
    }
}

impl Default for ScoreRecord {
    fn default() -> Self {
        Self::new(NO_NAME, 0)
    }
}

/// Top-N score table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Leaderboard {
    records: [ScoreRecord; LEADERBOARD_LEN],
}

impl Leaderboard {
    /// A table filled with default records
    pub fn new() -> Self {
        Self {
            records: std::array::from_fn(|_| ScoreRecord::default()),
        }
    }

    pub fn records(&self) -> &[ScoreRecord] {
        &self.records
    }

    pub fn get(&self, index: usize) -> Option<&ScoreRecord> {
        self.records.get(index)
    }

    /// Insert before the first record with a strictly lower score
    ///
    /// The lowest record falls off the end. Returns the insertion index, or
    /// `None` when the score does not beat any record. Equal scores are never
    /// displaced.
    pub fn add(&mut self, record: ScoreRecord) -> Option<usize> {
        let index = self.records.iter().position(|r| record.score > r.score)?;
        self.records[index..].rotate_right(1);
        debug!("leaderboard: {:?} with {} at rank {}", record.name, record.score, index);
        self.records[index] = record;
        Some(index)
    }

    /// Remove the record at `index`, shifting lower records up and padding the end
    pub fn remove_at(&mut self, index: usize) -> Result<ScoreRecord, LeaderboardError> {
        if index >= LEADERBOARD_LEN {
            return Err(LeaderboardError::IndexOutOfRange { index });
        }
        self.records[index..].rotate_left(1);
        let removed = std::mem::take(&mut self.records[LEADERBOARD_LEN - 1]);
        Ok(removed)
    }

    /// Reset every record to the default
    pub fn clear(&mut self) {
        for record in &mut self.records {
            *record = ScoreRecord::default();
        }
    }

    /// Replace the table with stored records; missing keys read as default
    pub fn load<S: KeyValueStore + ?Sized>(&mut self, store: &S) {
        for (i, record) in self.records.iter_mut().enumerate() {
            *record = store
                .get(&record_key(i))
                .map(|value| ScoreRecord::parse(&value))
                .unwrap_or_default();
        }
    }

    /// Write every record to the store
    pub fn save<S: KeyValueStore + ?Sized>(&self, store: &mut S) {
        for (i, record) in self.records.iter().enumerate() {
            store.set(&record_key(i), record.encode());
        }
    }
}

impl Default for Leaderboard {
    fn default() -> Self {
        Self::new()
    }
}

fn record_key(index: usize) -> String {
    format!("{KEY_PREFIX}{index}")
}
