//! Melee combat
//!
//! Idle -> Attacking (movement locked, hitbox live) -> Idle after the
//! cooldown. Damage is applied once, when the swing starts.

use super::state::{AttackState, GameEvent, GamePhase, GameState};
use crate::consts::ATTACK_COOLDOWN_TICKS;

/// Outcome of one swing
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SwingReport {
    /// Dots hit but still standing
    pub damaged: u32,
    /// Dots removed
    pub defeated: u32,
}

/// Start a swing if the player is free to attack.
///
/// Returns `None` when the trigger is ignored (already swinging, paused,
/// or the run is over).
pub fn begin_attack(state: &mut GameState) -> Option<SwingReport> {
    if state.phase != GamePhase::Playing || state.player.is_locked() {
        return None;
    }

    let player = &state.player;
    let hitbox = player.weapon.hitbox(player.pos, player.facing);
    let damage = player.weapon.damage;

    state.attack_generation = state.attack_generation.wrapping_add(1);
    state.player.attack = AttackState::Attacking {
        hitbox,
        ticks_left: ATTACK_COOLDOWN_TICKS,
        generation: state.attack_generation,
    };

    let mut report = SwingReport::default();
    let mut events = Vec::new();
    state.enemies.retain_mut(|enemy| {
        if !hitbox.overlaps(&enemy.rect()) {
            return true;
        }
        enemy.hp -= damage;
        if enemy.hp <= 0 {
            log::debug!("Dot {} defeated", enemy.id);
            report.defeated += 1;
            events.push(GameEvent::Collected);
            false
        } else {
            log::debug!("Dot {} hit, {} hp left", enemy.id, enemy.hp);
            report.damaged += 1;
            events.push(GameEvent::Damaged);
            true
        }
    });

    state.collected += report.defeated;
    state.events.extend(events);
    Some(report)
}

/// Count down the active swing; unlock movement when it ends or goes stale
pub fn advance_cooldown(state: &mut GameState) {
    if let AttackState::Attacking {
        ticks_left,
        generation,
        ..
    } = &mut state.player.attack
    {
        if *generation != state.attack_generation {
            state.player.attack = AttackState::Idle;
            return;
        }
        *ticks_left = ticks_left.saturating_sub(1);
        if *ticks_left == 0 {
            state.player.attack = AttackState::Idle;
        }
    }
}
