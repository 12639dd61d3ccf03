//! Draw-list generation
//!
//! One pass over the state per frame, back to front: door, dots, player
//! sprite, weapon swing, then debug outlines.

use crate::consts::{FRAME_HEIGHT, FRAME_WIDTH};
use crate::sim::{GamePhase, GameState, Rect};

/// Door fill
pub const DOOR_COLOR: u32 = 0x1565c0;
/// Weapon swing fill
pub const SWING_COLOR: u32 = 0xd32f2f;
/// Hitbox outlines
pub const DEBUG_COLOR: u32 = 0xff0000;

/// One primitive for the host painter
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    /// Copy `src` from the player sprite sheet to `dst`
    Sprite { src: Rect, dst: Rect },
    FillRect { rect: Rect, color: u32 },
    /// Filled circle inscribed in `rect`
    FillCircle { rect: Rect, color: u32 },
    StrokeRect { rect: Rect, color: u32 },
}

/// Per-frame presentation switches
#[derive(Debug, Clone, Copy, Default)]
pub struct RenderOptions {
    /// Outline the player's hitbox and the live weapon swing
    pub debug_hitboxes: bool,
}

/// Sprite-sheet cell for the player's current facing and frame
pub fn sprite_source(state: &GameState) -> Rect {
    let player = &state.player;
    Rect::new(
        player.anim_frame as f32 * FRAME_WIDTH,
        player.facing.row() as f32 * FRAME_HEIGHT,
        FRAME_WIDTH,
        FRAME_HEIGHT,
    )
}

/// Build the draw list for one frame
pub fn build_frame(state: &GameState, options: &RenderOptions) -> Vec<DrawCommand> {
    let mut commands = Vec::with_capacity(state.enemies.len() + 5);

    if let Some(door) = state.door {
        commands.push(DrawCommand::FillRect {
            rect: door.rect(),
            color: DOOR_COLOR,
        });
    }

    commands.extend(state.enemies.iter().map(|enemy| DrawCommand::FillCircle {
        rect: enemy.rect(),
        color: enemy.tier.color(),
    }));

    // The player is hidden on the game-over screen
    if state.phase != GamePhase::GameOver {
        commands.push(DrawCommand::Sprite {
            src: sprite_source(state),
            dst: state.player.frame_rect(),
        });
    }

    let swing = state.player.weapon_hitbox();
    if let Some(rect) = swing {
        commands.push(DrawCommand::FillRect {
            rect,
            color: SWING_COLOR,
        });
    }

    if options.debug_hitboxes {
        commands.push(DrawCommand::StrokeRect {
            rect: state.player.hitbox(),
            color: DEBUG_COLOR,
        });
        if let Some(rect) = swing {
            commands.push(DrawCommand::StrokeRect {
                rect,
                color: DEBUG_COLOR,
            });
        }
    }

    commands
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::Rules;
    use crate::sim::{Arena, EnemyTier, Facing, GameState, begin_attack};
    use glam::Vec2;

    #[test]
    fn test_sprite_cell_from_facing_and_frame() {
        let mut state = GameState::empty(1, Arena::default(), Rules::default());
        state.player.facing = Facing::Left;
        state.player.anim_frame = 3;
        assert_eq!(sprite_source(&state), Rect::new(198.0, 200.0, 66.0, 100.0));
    }

    #[test]
    fn test_frame_order() {
        let mut state = GameState::empty(1, Arena::default(), Rules::default());
        state.insert_enemy(Vec2::new(10.0, 10.0), EnemyTier::Blue);
        state.door = Some(crate::sim::Door::new(state.arena.door_position()));

        let commands = build_frame(&state, &RenderOptions::default());
        assert_eq!(commands.len(), 3);
        assert!(matches!(commands[0], DrawCommand::FillRect { color: DOOR_COLOR, .. }));
        assert!(matches!(commands[1], DrawCommand::FillCircle { color: 0x1e88e5, .. }));
        assert!(matches!(commands[2], DrawCommand::Sprite { .. }));
    }

    #[test]
    fn test_debug_outlines_include_swing() {
        let mut state = GameState::empty(1, Arena::default(), Rules::default());
        begin_attack(&mut state);

        let options = RenderOptions {
            debug_hitboxes: true,
        };
        let commands = build_frame(&state, &options);
        let outlines = commands
            .iter()
            .filter(|c| matches!(c, DrawCommand::StrokeRect { .. }))
            .count();
        assert_eq!(outlines, 2);
        assert!(commands.contains(&DrawCommand::StrokeRect {
            rect: state.player.hitbox(),
            color: DEBUG_COLOR,
        }));
    }
}
