//! Named save slots
//!
//! A save captures where the player stands, how many dots have been
//! collected, and where the live dots are. Slots are a name -> record map
//! stored as one JSON blob in LocalStorage.

use std::collections::BTreeMap;

use glam::Vec2;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::sim::{EnemyTier, GamePhase, GameState, Player};

/// Why a save could not be loaded
#[derive(Debug, Error)]
pub enum SaveError {
    #[error("no save named \"{0}\"")]
    NotFound(String),
    #[error("save data is corrupt: {0}")]
    Corrupt(#[from] serde_json::Error),
    #[error("saved position ({x}, {y}) is outside the arena")]
    OutOfBounds { x: f32, y: f32 },
}

/// A saved dot position
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SavedPoint {
    pub x: f32,
    pub y: f32,
}

/// One save slot
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaveRecord {
    pub player_x: f32,
    pub player_y: f32,
    pub collected_count: u32,
    #[serde(default)]
    pub enemy_positions: Vec<SavedPoint>,
}

impl SaveRecord {
    /// Snapshot the parts of a session a save keeps
    pub fn capture(state: &GameState) -> Self {
        Self {
            player_x: state.player.pos.x,
            player_y: state.player.pos.y,
            collected_count: state.collected,
            enemy_positions: state
                .enemies
                .iter()
                .map(|e| SavedPoint {
                    x: e.pos.x,
                    y: e.pos.y,
                })
                .collect(),
        }
    }

    /// Restore into a session.
    ///
    /// Everything is validated first, so on error the state is untouched.
    /// Restored dots come back as fresh red dots; the door closes. A session
    /// that had ended resumes play; a paused one stays paused.
    pub fn apply(&self, state: &mut GameState) -> Result<(), SaveError> {
        let player_pos = Vec2::new(self.player_x, self.player_y);
        check_in_arena(state, player_pos, Player::frame_size())?;

        let dot_size = Vec2::splat(crate::consts::ENEMY_SIZE);
        let dots: Vec<Vec2> = self
            .enemy_positions
            .iter()
            .map(|p| Vec2::new(p.x, p.y))
            .collect();
        for pos in &dots {
            check_in_arena(state, *pos, dot_size)?;
        }

        state.reset_player();
        state.player.pos = player_pos;
        state.collected = self.collected_count;
        state.enemies.clear();
        state.door = None;
        for pos in dots {
            state.insert_enemy(pos, EnemyTier::Red);
        }
        if state.phase == GamePhase::GameOver {
            state.phase = GamePhase::Playing;
        }
        Ok(())
    }
}

fn check_in_arena(state: &GameState, pos: Vec2, size: Vec2) -> Result<(), SaveError> {
    if pos.is_finite() && state.arena.contains(pos, size) {
        Ok(())
    } else {
        Err(SaveError::OutOfBounds { x: pos.x, y: pos.y })
    }
}

/// All save slots, ordered by name
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SaveSlots {
    slots: BTreeMap<String, SaveRecord>,
}

impl SaveSlots {
    /// LocalStorage key (used only in wasm32)
    #[allow(dead_code)]
    const STORAGE_KEY: &'static str = "dot_arena_saves";

    pub fn new() -> Self {
        Self::default()
    }

    /// Save the session under `name`, replacing any previous slot
    pub fn save(&mut self, name: &str, state: &GameState) {
        self.slots.insert(name.to_string(), SaveRecord::capture(state));
        log::info!("Game saved to \"{}\"", name);
    }

    /// Load slot `name` into the session
    pub fn load(&self, name: &str, state: &mut GameState) -> Result<(), SaveError> {
        let record = self
            .slots
            .get(name)
            .ok_or_else(|| SaveError::NotFound(name.to_string()))?;
        record.apply(state)?;
        log::info!("Loaded save \"{}\"", name);
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<&SaveRecord> {
        self.slots.get(name)
    }

    pub fn remove(&mut self, name: &str) -> Option<SaveRecord> {
        self.slots.remove(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.slots.keys().map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn to_json(&self) -> Result<String, SaveError> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn from_json(json: &str) -> Result<Self, SaveError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Load save slots from LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn read_storage() -> Self {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(Some(json)) = storage.get_item(Self::STORAGE_KEY) {
                match Self::from_json(&json) {
                    Ok(slots) => {
                        log::info!("Loaded {} save slot(s)", slots.slots.len());
                        return slots;
                    }
                    Err(e) => log::warn!("Ignoring stored saves: {}", e),
                }
            }
        }

        Self::new()
    }

    /// Save slots to LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn write_storage(&self) {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        match (storage, self.to_json()) {
            (Some(storage), Ok(json)) => {
                if let Err(e) = storage.set_item(Self::STORAGE_KEY, &json) {
                    log::warn!("Could not write saves to LocalStorage: {:?}", e);
                }
            }
            (None, _) => log::warn!("LocalStorage unavailable, saves not written"),
            (_, Err(e)) => log::warn!("Could not encode saves: {}", e),
        }
    }

    /// Native stubs
    #[cfg(not(target_arch = "wasm32"))]
    pub fn read_storage() -> Self {
        Self::new()
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn write_storage(&self) {
        // No-op for native
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::Rules;
    use crate::sim::{Arena, KeyState, TickInput, tick};

    #[test]
    fn test_save_then_load_restores_session() {
        let mut state = GameState::new(11);
        state.player.pos = Vec2::new(40.0, 60.0);
        state.collected = 7;

        let mut slots = SaveSlots::new();
        slots.save("slot1", &state);
        let dots: Vec<Vec2> = state.enemies.iter().map(|e| e.pos).collect();

        let mut other = GameState::new(99);
        slots.load("slot1", &mut other).unwrap();
        assert_eq!(other.player.pos, Vec2::new(40.0, 60.0));
        assert_eq!(other.collected, 7);
        let restored: Vec<Vec2> = other.enemies.iter().map(|e| e.pos).collect();
        assert_eq!(restored, dots);
    }

    #[test]
    fn test_record_json_shape() {
        let record = SaveRecord {
            player_x: 1.0,
            player_y: 2.0,
            collected_count: 3,
            enemy_positions: vec![SavedPoint { x: 4.0, y: 5.0 }],
        };
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["playerX"], 1.0);
        assert_eq!(json["playerY"], 2.0);
        assert_eq!(json["collectedCount"], 3);
        assert_eq!(json["enemyPositions"][0]["x"], 4.0);
    }

    #[test]
    fn test_older_saves_without_dots_load() {
        let slots =
            SaveSlots::from_json(r#"{"old":{"playerX":10,"playerY":20,"collectedCount":2}}"#)
                .unwrap();
        let mut state = GameState::new(1);
        slots.load("old", &mut state).unwrap();
        assert_eq!(state.collected, 2);
        assert!(state.enemies.is_empty());
    }

    #[test]
    fn test_missing_slot_leaves_state() {
        let slots = SaveSlots::new();
        let mut state = GameState::new(4);
        let before = SaveRecord::capture(&state);

        let err = slots.load("nope", &mut state).unwrap_err();
        assert!(matches!(err, SaveError::NotFound(ref name) if name == "nope"));
        assert_eq!(SaveRecord::capture(&state), before);
    }

    #[test]
    fn test_corrupt_json_is_an_error() {
        let err = SaveSlots::from_json("{not json").unwrap_err();
        assert!(matches!(err, SaveError::Corrupt(_)));
    }

    #[test]
    fn test_out_of_bounds_leaves_state() {
        let mut state = GameState::new(4);
        let before = SaveRecord::capture(&state);
        let record = SaveRecord {
            player_x: 590.0,
            player_y: 10.0,
            collected_count: 50,
            enemy_positions: Vec::new(),
        };
        let err = record.apply(&mut state).unwrap_err();
        assert!(matches!(err, SaveError::OutOfBounds { .. }));
        assert_eq!(SaveRecord::capture(&state), before);
    }

    #[test]
    fn test_load_after_game_over_resumes_play() {
        let mut state = GameState::new(6);
        let mut slots = SaveSlots::new();
        slots.save("before", &state);

        state.phase = GamePhase::GameOver;
        slots.load("before", &mut state).unwrap();
        assert_eq!(state.phase, GamePhase::Playing);

        let start = state.player.pos;
        let walk = TickInput {
            keys: KeyState {
                left: true,
                ..Default::default()
            },
            ..Default::default()
        };
        tick(&mut state, &walk);
        assert!(state.player.pos.x < start.x);
    }

    #[test]
    fn test_load_keeps_pause() {
        let mut state = GameState::new(6);
        let mut slots = SaveSlots::new();
        slots.save("before", &state);

        state.phase = GamePhase::Paused;
        slots.load("before", &mut state).unwrap();
        assert_eq!(state.phase, GamePhase::Paused);
    }

    #[test]
    fn test_slots_json_round_trip_and_names() {
        let mut state = GameState::empty(2, Arena::default(), Rules::default());
        state.insert_enemy(Vec2::new(12.0, 48.0), EnemyTier::Red);
        state.insert_enemy(Vec2::new(300.5, 96.25), EnemyTier::Red);
        let mut slots = SaveSlots::new();
        slots.save("b", &state);
        slots.save("a", &state);

        let back = SaveSlots::from_json(&slots.to_json().unwrap()).unwrap();
        assert_eq!(back, slots);
        assert_eq!(back.names().collect::<Vec<_>>(), vec!["a", "b"]);

        let mut back = back;
        assert!(back.remove("a").is_some());
        assert!(back.get("a").is_none());
        assert!(!back.is_empty());
    }
}
