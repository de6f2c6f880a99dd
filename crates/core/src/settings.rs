//! Player settings persisted through a [`KeyValueStore`]
//!
//! Booleans are stored as `True`/`False` and read case-insensitively; floats
//! as decimal text. Missing or unreadable keys leave the current value alone.

use std::str::FromStr;

use log::debug;

use crate::store::KeyValueStore;

const VOLUME: &str = "volume";
const PLAYER_NAME: &str = "player_name";
const DRAW_SHADOW: &str = "draw_shadow";
const GLOBAL_EFFECTS: &str = "global_effects_switch";
const DRAW_GRID: &str = "draw_grid";
const HIDE_CURSOR_IN_GAME: &str = "hide_cursor_in_game";
const HIDE_CURSOR_DELAY: &str = "hide_cursor_delay";

#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    /// Master volume in 0.0..=1.0
    pub volume: f32,
    /// Name recorded on the leaderboard at game over
    pub player_name: String,
    /// Maintain the ghost piece
    pub draw_shadow: bool,
    pub global_effects: bool,
    pub draw_grid: bool,
    pub hide_cursor_in_game: bool,
    /// Seconds of mouse inactivity before the cursor hides
    pub hide_cursor_delay: f32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            volume: 1.0,
            player_name: "Player".to_string(),
            draw_shadow: true,
            global_effects: true,
            draw_grid: true,
            hide_cursor_in_game: true,
            hide_cursor_delay: 2.0,
        }
    }
}

impl Settings {
    /// Read every known key, keeping the current value where a key is missing or malformed
    pub fn load<S: KeyValueStore + ?Sized>(&mut self, store: &S) {
        load_parsed(store, VOLUME, &mut self.volume);
        if let Some(name) = store.get(PLAYER_NAME) {
            self.player_name = name;
        }
        load_bool(store, DRAW_SHADOW, &mut self.draw_shadow);
        load_bool(store, GLOBAL_EFFECTS, &mut self.global_effects);
        load_bool(store, DRAW_GRID, &mut self.draw_grid);
        load_bool(store, HIDE_CURSOR_IN_GAME, &mut self.hide_cursor_in_game);
        load_parsed(store, HIDE_CURSOR_DELAY, &mut self.hide_cursor_delay);
    }

    /// Defaults overlaid with whatever the store holds
    pub fn from_store<S: KeyValueStore + ?Sized>(store: &S) -> Self {
        let mut settings = Self::default();
        settings.load(store);
        settings
    }

    pub fn save<S: KeyValueStore + ?Sized>(&self, store: &mut S) {
        store.set(VOLUME, self.volume.to_string());
        store.set(PLAYER_NAME, self.player_name.clone());
        store.set(DRAW_SHADOW, encode_bool(self.draw_shadow));
        store.set(GLOBAL_EFFECTS, encode_bool(self.global_effects));
        store.set(DRAW_GRID, encode_bool(self.draw_grid));
        store.set(HIDE_CURSOR_IN_GAME, encode_bool(self.hide_cursor_in_game));
        store.set(HIDE_CURSOR_DELAY, self.hide_cursor_delay.to_string());
    }
}

fn encode_bool(value: bool) -> String {
    if value { "True" } else { "False" }.to_string()
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "true" => Some(true),
        "false" => Some(false),
        _ => None,
    }
}

fn load_bool<S: KeyValueStore + ?Sized>(store: &S, key: &str, out: &mut bool) {
    let Some(raw) = store.get(key) else {
        return;
    };
    match parse_bool(&raw) {
        Some(value) => *out = value,
        None => debug!("setting {key}: cannot read {raw:?} as a boolean, keeping {out}"),
    }
}

fn load_parsed<T, S>(store: &S, key: &str, out: &mut T)
where
    T: FromStr + std::fmt::Debug,
    S: KeyValueStore + ?Sized,
{
    let Some(raw) = store.get(key) else {
        return;
    };
    match raw.trim().parse() {
        Ok(value) => *out = value,
        Err(_) => debug!("setting {key}: cannot parse {raw:?}, keeping {out:?}"),
    }
}
