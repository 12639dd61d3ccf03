//! Per-frame simulation tick
//!
//! Core game loop that advances simulation deterministically.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::combat::{advance_cooldown, begin_attack};
use super::state::{Door, Facing, GameEvent, GamePhase, GameState, Player};
use super::weapon::WeaponKind;
use crate::consts::*;
use crate::settings::ContactPolicy;

/// Held movement keys
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyState {
    pub left: bool,
    pub right: bool,
    pub up: bool,
    pub down: bool,
}

impl KeyState {
    /// Record a press/release for one direction
    pub fn set(&mut self, direction: Facing, held: bool) {
        match direction {
            Facing::Left => self.left = held,
            Facing::Right => self.right = held,
            Facing::Up => self.up = held,
            Facing::Down => self.down = held,
        }
    }

    /// Held directions, highest priority first
    pub fn held(&self) -> impl Iterator<Item = Facing> + '_ {
        [
            (self.left, Facing::Left),
            (self.right, Facing::Right),
            (self.up, Facing::Up),
            (self.down, Facing::Down),
        ]
        .into_iter()
        .filter_map(|(held, facing)| held.then_some(facing))
    }
}

/// Input commands for a single tick (deterministic)
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Movement keys currently held
    pub keys: KeyState,
    /// Swing the weapon (one-shot)
    pub attack: bool,
    /// Pause toggle (one-shot)
    pub pause: bool,
    /// Start over after game over (one-shot)
    pub restart: bool,
    /// Swap weapon (one-shot)
    pub equip: Option<WeaponKind>,
}

impl TickInput {
    /// Clear one-shot commands after a tick consumed them
    pub fn clear_one_shots(&mut self) {
        self.attack = false;
        self.pause = false;
        self.restart = false;
        self.equip = None;
    }
}

/// Advance the game state by one tick
pub fn tick(state: &mut GameState, input: &TickInput) {
    // Handle pause toggle
    if input.pause {
        match state.phase {
            GamePhase::Playing => {
                state.phase = GamePhase::Paused;
                return;
            }
            GamePhase::Paused => state.phase = GamePhase::Playing,
            GamePhase::GameOver => {}
        }
    }

    match state.phase {
        GamePhase::Paused => return,
        GamePhase::GameOver => {
            if input.restart {
                state.restart();
            }
            return;
        }
        GamePhase::Playing => {}
    }

    state.time_ticks += 1;

    if let Some(kind) = input.equip {
        state.equip_kind(kind);
    }

    update_player(state, &input.keys);

    advance_cooldown(state);
    if input.attack {
        begin_attack(state);
    }

    resolve_contacts(state);
    if state.phase == GamePhase::GameOver {
        return;
    }
    update_stage(state);

    update_animation(&mut state.player);

    // Ensure deterministic ordering
    state.normalize_order();
}

/// Move the player one step in the highest-priority direction that can move.
///
/// Left beats Right beats Up beats Down. A held direction already flush with
/// the wall is passed over for the next held one.
pub fn update_player(state: &mut GameState, keys: &KeyState) {
    let player = &mut state.player;
    if player.is_locked() {
        return;
    }

    let max = state.arena.max_position(Player::frame_size());
    player.moving = false;

    for facing in keys.held() {
        let can_move = match facing {
            Facing::Left => player.pos.x > 0.0,
            Facing::Right => player.pos.x < max.x,
            Facing::Up => player.pos.y > 0.0,
            Facing::Down => player.pos.y < max.y,
        };
        if can_move {
            let next = player.pos + facing.step() * PLAYER_SPEED;
            player.pos = next.clamp(Vec2::ZERO, max);
            player.facing = facing;
            player.moving = true;
            break;
        }
    }
}

/// Player-vs-dot contact, per the session's contact policy
fn resolve_contacts(state: &mut GameState) {
    if state.rules.contact == ContactPolicy::Ignore {
        return;
    }

    let hitbox = state.player.hitbox();
    let before = state.enemies.len();
    state.enemies.retain(|enemy| !hitbox.overlaps(&enemy.rect()));
    let touched = (before - state.enemies.len()) as u32;
    if touched == 0 {
        return;
    }

    match state.rules.contact {
        ContactPolicy::Collect => {
            state.collected += touched;
            for _ in 0..touched {
                state.push_event(GameEvent::Collected);
            }
            log::debug!("Collected {} dot(s), total {}", touched, state.collected);
        }
        ContactPolicy::GameOver => {
            state.phase = GamePhase::GameOver;
            state.push_event(GameEvent::GameOver);
            log::info!(
                "Game over at stage {} with {} collected",
                state.stage_index,
                state.collected
            );
        }
        ContactPolicy::Ignore => {}
    }
}

/// Spawn the door once the stage is clear; walk through it to advance
pub fn update_stage(state: &mut GameState) {
    if state.enemies.is_empty() && state.door.is_none() {
        state.door = Some(Door::new(state.arena.door_position()));
        log::info!("Stage {} cleared, door open", state.stage_index);
    }

    let entered = state
        .door
        .is_some_and(|door| state.player.hitbox().overlaps(&door.rect()));
    if entered {
        state.push_event(GameEvent::DoorEntered);
        state.advance_stage();
        log::info!("Entered stage {}", state.stage_index);
    }
}

/// Walk cycle while moving, standing frame otherwise
fn update_animation(player: &mut Player) {
    if player.is_locked() {
        return;
    }
    if !player.moving {
        player.anim_frame = player.standing_frame();
        player.anim_ticks = 0;
        return;
    }

    player.anim_ticks += 1;
    if player.anim_ticks >= ANIMATION_TICKS {
        player.anim_ticks = 0;
        player.anim_frame = (player.anim_frame + 1) % SHEET_COLUMNS;
    }
}
