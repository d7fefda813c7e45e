//! Invaders - the arcade shooter embedded in the game hub
//!
//! Core modules:
//! - `sim`: Simulation (entities, grid formations, collisions, game phase)
//! - `renderer`: 2D canvas drawing, one immediate-mode redraw per frame
//! - `platform`: Input mapping and the mount/tick driver used by the play shell
//! - `score`: Final score submission to the hub API
//! - `settings`: Key bindings and host preferences

pub mod platform;
pub mod renderer;
pub mod score;
pub mod settings;
pub mod sim;

pub use platform::{Engine, LoopToken};
pub use score::{ReportError, ScoreReporter, ScoreSubmission};
pub use settings::{KeyBindings, Settings};

/// Game configuration constants
pub mod consts {
    /// Game code reported to the hub (upper-cased on submission)
    pub const GAME_CODE: &str = "INVADERS";
    /// Points per destroyed invader
    pub const SCORE_PER_INVADER: u64 = 100;

    /// Player defaults
    pub const PLAYER_SPEED: f32 = 5.0;
    /// Visual bank angle while moving (radians)
    pub const PLAYER_BANK: f32 = 0.15;
    /// Player sprite is drawn at this fraction of its native size
    pub const PLAYER_SPRITE_SCALE: f32 = 0.15;
    /// Gap between the player and the bottom of the viewport
    pub const PLAYER_BOTTOM_MARGIN: f32 = 20.0;

    /// Player projectile (circle, fired straight up)
    pub const PROJECTILE_SPEED: f32 = 10.0;
    pub const PROJECTILE_RADIUS: f32 = 4.0;

    /// Invader projectile (rectangle, falls straight down)
    pub const INVADER_PROJECTILE_SPEED: f32 = 5.0;
    pub const INVADER_PROJECTILE_WIDTH: f32 = 7.0;
    pub const INVADER_PROJECTILE_HEIGHT: f32 = 14.0;

    /// Grid formation
    pub const GRID_CELL: f32 = 30.0;
    pub const GRID_SPEED: f32 = 5.0;
    /// Downward step applied once per bounce
    pub const GRID_DROP: f32 = 30.0;
    pub const GRID_COLUMNS_MIN: usize = 5;
    pub const GRID_COLUMNS_MAX: usize = 15; // exclusive
    pub const GRID_ROWS_MIN: usize = 2;
    pub const GRID_ROWS_MAX: usize = 7; // exclusive

    /// Every live grid fires once per this many ticks
    pub const INVADER_FIRE_INTERVAL: u32 = 100;
    /// New grid spawn interval range in ticks (upper bound exclusive)
    pub const SPAWN_INTERVAL_MIN: u32 = 500;
    pub const SPAWN_INTERVAL_MAX: u32 = 1000;

    /// Background stars
    pub const PARTICLES_PER_TICK: usize = 2;
    pub const PARTICLE_FADE: f32 = 0.01;
    pub const PARTICLE_MAX_RADIUS: f32 = 3.0;
    pub const PARTICLE_MAX_SPEED: f32 = 3.0;
}
