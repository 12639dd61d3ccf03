//! Axis-aligned collision detection
//!
//! Everything in the arena collides as a rectangle: the player's hitbox,
//! the dots, the door, and the transient weapon swing.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// An axis-aligned rectangle (top-left corner + size)
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

impl Rect {
    pub const fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self { x, y, w, h }
    }

    /// Rectangle of the given size with its top-left corner at `pos`
    pub fn at(pos: Vec2, size: Vec2) -> Self {
        Self::new(pos.x, pos.y, size.x, size.y)
    }

    pub fn right(&self) -> f32 {
        self.x + self.w
    }

    pub fn bottom(&self) -> f32 {
        self.y + self.h
    }

    /// Grow by `margin` on every side
    pub fn inflate(&self, margin: f32) -> Self {
        Self::new(
            self.x - margin,
            self.y - margin,
            self.w + margin * 2.0,
            self.h + margin * 2.0,
        )
    }

    /// Separating-axis overlap test.
    ///
    /// Two rectangles are apart when one lies entirely beyond the other's
    /// opposite edge on either axis. Shared edges do not count as overlap.
    pub fn overlaps(&self, other: &Rect) -> bool {
        self.x < other.right()
            && self.right() > other.x
            && self.y < other.bottom()
            && self.bottom() > other.y
    }

    /// True when this rectangle lies fully inside `bounds`
    pub fn within(&self, bounds: &Rect) -> bool {
        self.x >= bounds.x
            && self.y >= bounds.y
            && self.right() <= bounds.right()
            && self.bottom() <= bounds.bottom()
    }
}
