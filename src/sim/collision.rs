//! Collision tests between projectiles and targets
//!
//! Player projectiles are circles, everything else is an axis-aligned
//! rectangle with its origin at the top-left corner (screen coordinates,
//! y grows downward).

use glam::Vec2;

/// Axis-aligned rectangle (top-left origin)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub pos: Vec2,
    pub size: Vec2,
}

impl Rect {
    pub fn new(pos: Vec2, size: Vec2) -> Self {
        Self { pos, size }
    }

    #[inline]
    pub fn left(&self) -> f32 {
        self.pos.x
    }

    #[inline]
    pub fn right(&self) -> f32 {
        self.pos.x + self.size.x
    }

    #[inline]
    pub fn top(&self) -> f32 {
        self.pos.y
    }

    #[inline]
    pub fn bottom(&self) -> f32 {
        self.pos.y + self.size.y
    }

    pub fn center(&self) -> Vec2 {
        self.pos + self.size * 0.5
    }
}

/// Invader projectile vs player test
///
/// The projectile only ever travels downward toward a player sitting at the
/// bottom of the viewport, so reaching the player's top edge while the
/// horizontal ranges overlap counts as a hit.
pub fn projectile_hits_player(projectile: Rect, player: Rect) -> bool {
    projectile.bottom() >= player.top()
        && projectile.right() >= player.left()
        && projectile.left() <= player.right()
}

/// Circle vs rectangle test using the circle's radius-expanded bounds
pub fn circle_hits_rect(center: Vec2, radius: f32, rect: Rect) -> bool {
    center.y - radius <= rect.bottom()
        && center.x + radius >= rect.left()
        && center.x - radius <= rect.right()
        && center.y + radius >= rect.top()
}
