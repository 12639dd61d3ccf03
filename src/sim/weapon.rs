//! Weapon descriptors
//!
//! Each weapon is a static table entry: swing size for vertical and
//! horizontal facings, one offset per facing, and a damage value.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::collision::Rect;
use super::state::Facing;
use crate::consts::{FRAME_HEIGHT, FRAME_WIDTH};

/// Built-in weapons
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum WeaponKind {
    #[default]
    Fist,
    Knife,
    Broadsword,
    Spear,
    Whip,
}

impl WeaponKind {
    pub const ALL: [WeaponKind; 5] = [
        WeaponKind::Fist,
        WeaponKind::Knife,
        WeaponKind::Broadsword,
        WeaponKind::Spear,
        WeaponKind::Whip,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            WeaponKind::Fist => "fist",
            WeaponKind::Knife => "knife",
            WeaponKind::Broadsword => "broadsword",
            WeaponKind::Spear => "spear",
            WeaponKind::Whip => "whip",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "fist" => Some(WeaponKind::Fist),
            "knife" => Some(WeaponKind::Knife),
            "broadsword" | "sword" => Some(WeaponKind::Broadsword),
            "spear" => Some(WeaponKind::Spear),
            "whip" => Some(WeaponKind::Whip),
            _ => None,
        }
    }
}

/// Swing geometry and damage for one weapon
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Weapon {
    pub kind: WeaponKind,
    /// Swing size when facing up/down
    pub width_v: f32,
    pub height_v: f32,
    /// Swing size when facing left/right
    pub width_h: f32,
    pub height_h: f32,
    pub offset_down: Vec2,
    pub offset_up: Vec2,
    pub offset_left: Vec2,
    pub offset_right: Vec2,
    pub damage: i32,
}

impl Default for Weapon {
    fn default() -> Self {
        Self::of(WeaponKind::Fist)
    }
}

impl Weapon {
    /// Descriptor for a built-in weapon
    pub fn of(kind: WeaponKind) -> Self {
        // (width_v, height_v, width_h, height_h, x offset up/down, y offset up, damage)
        let (width_v, height_v, width_h, height_h, x_vertical, y_up, damage) = match kind {
            WeaponKind::Fist => (20.0, 20.0, 20.0, 20.0, 25.0, 0.0, 1),
            WeaponKind::Knife => (20.0, 40.0, 40.0, 20.0, 25.0, 20.0, 2),
            WeaponKind::Broadsword => (30.0, 60.0, 60.0, 30.0, 20.0, 40.0, 4),
            WeaponKind::Spear => (10.0, 90.0, 90.0, 10.0, 30.0, 70.0, 3),
            WeaponKind::Whip => (5.0, 120.0, 120.0, 5.0, 30.0, 100.0, 2),
        };

        // Side swings sit at hand height, down swings start just under the feet
        Self {
            kind,
            width_v,
            height_v,
            width_h,
            height_h,
            offset_down: Vec2::new(x_vertical, -5.0),
            offset_up: Vec2::new(x_vertical, y_up),
            offset_left: Vec2::new(-10.0, 50.0),
            offset_right: Vec2::new(-10.0, 50.0),
            damage,
        }
    }

    /// Swing size for a facing
    pub fn swing_size(&self, facing: Facing) -> Vec2 {
        if facing.is_vertical() {
            Vec2::new(self.width_v, self.height_v)
        } else {
            Vec2::new(self.width_h, self.height_h)
        }
    }

    /// Transient hitbox for a swing from a player frame at `pos`
    pub fn hitbox(&self, pos: Vec2, facing: Facing) -> Rect {
        let size = self.swing_size(facing);
        let origin = match facing {
            Facing::Down => Vec2::new(
                pos.x + self.offset_down.x,
                pos.y + FRAME_HEIGHT + self.offset_down.y,
            ),
            Facing::Up => Vec2::new(pos.x + self.offset_up.x, pos.y - self.offset_up.y),
            Facing::Left => Vec2::new(
                pos.x - (self.offset_left.x + size.x),
                pos.y + self.offset_left.y,
            ),
            Facing::Right => Vec2::new(
                pos.x + FRAME_WIDTH + self.offset_right.x,
                pos.y + self.offset_right.y,
            ),
        };
        Rect::at(origin, size)
    }
}
