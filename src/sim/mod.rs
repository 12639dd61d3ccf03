//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - One tick per call, no wall-clock time
//! - Seeded RNG only
//! - Stable iteration order (by entity ID)
//! - No rendering or platform dependencies

pub mod collision;
pub mod combat;
pub mod placement;
pub mod state;
pub mod tick;
pub mod weapon;

pub use collision::Rect;
pub use combat::{SwingReport, advance_cooldown, begin_attack};
pub use placement::place_enemies;
pub use state::{
    Arena, AttackState, Door, Enemy, EnemyTier, Facing, GameEvent, GamePhase, GameState, Player,
};
pub use tick::{KeyState, TickInput, tick, update_player, update_stage};
pub use weapon::{Weapon, WeaponKind};
