//! Game configuration.
//!
//! Defaults reproduce the classic tuning. Every value can be overridden through
//! a `BLOCKTRIS_*` environment variable; unset or unparsable variables keep the
//! default.

use log::debug;

use crate::slowmo::SlowMoConfig;
use crate::types::{ScoreTable, Timings, RESUME_WAIT_MS};

/// Everything tunable about a round.
#[derive(Debug, Clone, PartialEq)]
pub struct GameConfig {
    pub timings: Timings,
    pub scores: ScoreTable,
    pub slowmo: SlowMoConfig,
    /// Countdown between `resume()` and play continuing.
    pub resume_wait_ms: u32,
    /// Seed of the shape generator.
    pub seed: u32,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            timings: Timings::default(),
            scores: ScoreTable::default(),
            slowmo: SlowMoConfig::default(),
            resume_wait_ms: RESUME_WAIT_MS,
            seed: 1,
        }
    }
}

impl GameConfig {
    /// Create from `BLOCKTRIS_*` environment variables.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Create from an arbitrary variable lookup (same keys as [`GameConfig::from_env`]).
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let num = |key: &str, default: u32| -> u32 {
            match lookup(key) {
                Some(raw) => raw.trim().parse().unwrap_or_else(|_| {
                    debug!("{key}={raw:?} is not a number, using {default}");
                    default
                }),
                None => default,
            }
        };

        let d = Self::default();
        let timings = Timings {
            finalize_ms: num("BLOCKTRIS_FINALIZE_MS", d.timings.finalize_ms),
            rotate_repeat_ms: num("BLOCKTRIS_ROTATE_REPEAT_MS", d.timings.rotate_repeat_ms),
            move_side_repeat_ms: num("BLOCKTRIS_MOVE_SIDE_REPEAT_MS", d.timings.move_side_repeat_ms),
            soft_drop_repeat_ms: num("BLOCKTRIS_SOFT_DROP_REPEAT_MS", d.timings.soft_drop_repeat_ms),
            repeat_delay_ms: num("BLOCKTRIS_REPEAT_DELAY_MS", d.timings.repeat_delay_ms),
            gravity_unit_ms: num("BLOCKTRIS_GRAVITY_UNIT_MS", d.timings.gravity_unit_ms),
        };

        let scores = ScoreTable {
            drop_multiplier: num("BLOCKTRIS_DROP_MULTIPLIER", d.scores.drop_multiplier),
            ..d.scores
        };

        let slowmo = SlowMoConfig {
            max_ms: num("BLOCKTRIS_SLOWMO_MAX_MS", d.slowmo.max_ms),
            ..d.slowmo
        };

        Self {
            timings,
            scores,
            slowmo,
            resume_wait_ms: num("BLOCKTRIS_RESUME_WAIT_MS", d.resume_wait_ms),
            seed: num("BLOCKTRIS_SEED", d.seed),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = GameConfig::default();
        assert_eq!(config.timings.finalize_ms, 700);
        assert_eq!(config.timings.gravity_interval_ms(1), 500);
        assert_eq!(config.resume_wait_ms, 3000);
        assert_eq!(config.scores.line_clear(4), 600);
    }

    #[test]
    fn test_no_variables_gives_defaults() {
        assert_eq!(GameConfig::from_lookup(lookup(&[])), GameConfig::default());
    }

    #[test]
    fn test_overrides_and_fallbacks() {
        let config = GameConfig::from_lookup(lookup(&[
            ("BLOCKTRIS_FINALIZE_MS", "450"),
            ("BLOCKTRIS_SEED", " 99 "),
            ("BLOCKTRIS_REPEAT_DELAY_MS", "soon"),
        ]));
        assert_eq!(config.timings.finalize_ms, 450);
        assert_eq!(config.seed, 99);
        assert_eq!(config.timings.repeat_delay_ms, 300);
    }
}
