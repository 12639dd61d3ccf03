//! Game settings and preferences
//!
//! Persisted separately from game saves in LocalStorage.

use serde::{Deserialize, Serialize};

use crate::consts::{DEFAULT_ENEMY_COUNT, DEFAULT_MIN_DISTANCE, DEFAULT_SPAWN_BUFFER};
use crate::sim::weapon::WeaponKind;

/// What happens when the player walks into a dot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum ContactPolicy {
    /// Nothing; only the weapon removes dots
    #[default]
    Ignore,
    /// The dot is picked up and counted
    Collect,
    /// The run ends
    GameOver,
}

impl ContactPolicy {
    pub fn as_str(&self) -> &'static str {
        match self {
            ContactPolicy::Ignore => "Ignore",
            ContactPolicy::Collect => "Collect",
            ContactPolicy::GameOver => "GameOver",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "ignore" | "none" => Some(ContactPolicy::Ignore),
            "collect" => Some(ContactPolicy::Collect),
            "gameover" | "game_over" | "game-over" => Some(ContactPolicy::GameOver),
            _ => None,
        }
    }
}

/// Gameplay rules for one session (saved with the game state)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Rules {
    /// Dots requested per stage
    pub enemy_count: u32,
    /// Minimum distance between dot positions
    pub min_distance: f32,
    /// Keep dots this far clear of the player's spawn frame (None disables)
    pub spawn_buffer: Option<f32>,
    pub contact: ContactPolicy,
}

impl Default for Rules {
    fn default() -> Self {
        Self {
            enemy_count: DEFAULT_ENEMY_COUNT,
            min_distance: DEFAULT_MIN_DISTANCE,
            spawn_buffer: Some(DEFAULT_SPAWN_BUFFER),
            contact: ContactPolicy::Ignore,
        }
    }
}

/// Game settings/preferences
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // === Gameplay ===
    /// Dot contact behavior for new sessions
    pub contact_policy: ContactPolicy,
    /// Dots per stage for new sessions
    pub enemy_count: u32,
    /// Weapon equipped at the start of a run
    pub starting_weapon: WeaponKind,

    // === Debug ===
    /// Outline player and weapon hitboxes
    pub debug_hitboxes: bool,

    // === Audio ===
    /// Master volume (0.0 - 1.0)
    pub master_volume: f32,
    /// Sound effects volume (0.0 - 1.0)
    pub sfx_volume: f32,
    /// Mute when window loses focus
    pub mute_on_blur: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            contact_policy: ContactPolicy::Ignore,
            enemy_count: DEFAULT_ENEMY_COUNT,
            starting_weapon: WeaponKind::Fist,

            debug_hitboxes: false,

            master_volume: 0.8,
            sfx_volume: 1.0,
            mute_on_blur: true,
        }
    }
}

impl Settings {
    /// Session rules derived from these preferences
    pub fn rules(&self) -> Rules {
        Rules {
            enemy_count: self.enemy_count,
            contact: self.contact_policy,
            ..Rules::default()
        }
    }

    /// LocalStorage key
    #[allow(dead_code)]
    const STORAGE_KEY: &'static str = "dot_arena_settings";

    /// Load settings from LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(Some(json)) = storage.get_item(Self::STORAGE_KEY) {
                match serde_json::from_str(&json) {
                    Ok(settings) => {
                        log::info!("Loaded settings from LocalStorage");
                        return settings;
                    }
                    Err(e) => log::warn!("Ignoring unreadable settings: {}", e),
                }
            }
        }

        log::info!("Using default settings");
        Self::default()
    }

    /// Save settings to LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn save(&self) {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(json) = serde_json::to_string(self) {
                let _ = storage.set_item(Self::STORAGE_KEY, &json);
                log::info!("Settings saved");
            }
        }
    }

    /// Native stubs
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Self {
        Self::default()
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn save(&self) {
        // No-op for native
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_policy_names() {
        for policy in [
            ContactPolicy::Ignore,
            ContactPolicy::Collect,
            ContactPolicy::GameOver,
        ] {
            assert_eq!(ContactPolicy::from_str(policy.as_str()), Some(policy));
        }
        assert_eq!(ContactPolicy::from_str("game-over"), Some(ContactPolicy::GameOver));
        assert_eq!(ContactPolicy::from_str("explode"), None);
    }

    #[test]
    fn test_rules_from_settings() {
        let settings = Settings {
            contact_policy: ContactPolicy::Collect,
            enemy_count: 8,
            ..Settings::default()
        };
        let rules = settings.rules();
        assert_eq!(rules.enemy_count, 8);
        assert_eq!(rules.contact, ContactPolicy::Collect);
        assert_eq!(rules.min_distance, DEFAULT_MIN_DISTANCE);
        assert_eq!(rules.spawn_buffer, Some(DEFAULT_SPAWN_BUFFER));
    }

    #[test]
    fn test_settings_json_defaults_survive() {
        let json = serde_json::to_string(&Settings::default()).unwrap();
        let back: Settings = serde_json::from_str(&json).unwrap();
        assert_eq!(back.starting_weapon, WeaponKind::Fist);
        assert_eq!(back.master_volume, 0.8);
    }

    #[test]
    fn test_older_settings_fill_missing_fields() {
        let back: Settings = serde_json::from_str(r#"{"enemy_count": 9}"#).unwrap();
        assert_eq!(back.enemy_count, 9);
        assert_eq!(back.contact_policy, ContactPolicy::Ignore);
        assert!(back.mute_on_blur);
    }
}
