//! Dot Arena - A top-down arena game
//!
//! Core modules:
//! - `sim`: Deterministic simulation (movement, collisions, combat, stages)
//! - `renderer`: Stateless draw-list builder for the host painter
//! - `platform`: Browser input mapping
//! - `persistence`: Named save slots
//! - `settings`: Player preferences and session rules

#[cfg(target_arch = "wasm32")]
pub mod audio;
pub mod persistence;
pub mod platform;
pub mod renderer;
pub mod settings;
pub mod sim;

pub use persistence::{SaveError, SaveRecord, SaveSlots};
pub use settings::{ContactPolicy, Rules, Settings};

/// Game configuration constants
pub mod consts {
    /// Fixed simulation timestep (one tick per 60 Hz display refresh)
    pub const SIM_DT: f32 = 1.0 / 60.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 4;

    /// Arena dimensions
    pub const ARENA_WIDTH: f32 = 600.0;
    pub const ARENA_HEIGHT: f32 = 600.0;

    /// Player sprite frame (one cell of the sprite sheet)
    pub const FRAME_WIDTH: f32 = 66.0;
    pub const FRAME_HEIGHT: f32 = 100.0;
    /// Frames per sprite-sheet row
    pub const SHEET_COLUMNS: u32 = 4;
    /// Movement per tick
    pub const PLAYER_SPEED: f32 = 5.0;
    /// Ticks between walk-cycle frames (100 ms)
    pub const ANIMATION_TICKS: u32 = 6;

    /// Player hitbox, relative to the sprite frame's top-left corner
    pub const HITBOX_OFFSET_X: f32 = 14.0;
    pub const HITBOX_OFFSET_Y: f32 = 20.0;
    pub const HITBOX_WIDTH: f32 = 40.0;
    pub const HITBOX_HEIGHT: f32 = 68.0;

    /// Dot diameter
    pub const ENEMY_SIZE: f32 = 20.0;
    /// Door edge length
    pub const DOOR_SIZE: f32 = 40.0;

    /// Attack lock duration (200 ms)
    pub const ATTACK_COOLDOWN_TICKS: u32 = 12;

    /// Rejection-sampling budget per enemy
    pub const MAX_PLACEMENT_ATTEMPTS: u32 = 50;

    /// Placement defaults
    pub const DEFAULT_ENEMY_COUNT: u32 = 5;
    pub const DEFAULT_MIN_DISTANCE: f32 = 30.0;
    pub const DEFAULT_SPAWN_BUFFER: f32 = 20.0;
}
