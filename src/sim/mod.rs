//! Simulation module
//!
//! All gameplay logic lives here. This module stays free of rendering and
//! platform code:
//! - One tick per animation frame, no wall-clock time
//! - Injectable RNG (seeded PCG by default)
//! - Collections keep creation order; removal is destruction

pub mod collision;
pub mod grid;
pub mod state;
pub mod tick;

pub use collision::{Rect, circle_hits_rect, projectile_hits_player};
pub use grid::Grid;
pub use state::{
    GamePhase, GameState, Invader, InvaderProjectile, Particle, Player, Projectile, SpriteKind,
    SpriteState, Viewport, STAR_COLOR,
};
pub use tick::{TickInput, tick};
