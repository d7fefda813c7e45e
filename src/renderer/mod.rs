//! 2D canvas rendering
//!
//! Immediate mode: every frame clears the surface and redraws the whole
//! scene from `GameState`. Drawing never mutates simulation state.

#[cfg(target_arch = "wasm32")]
pub mod canvas2d;
pub mod recording;

#[cfg(target_arch = "wasm32")]
pub use canvas2d::Canvas2d;
pub use recording::{DrawCommand, RecordingCanvas};

use glam::Vec2;

use crate::sim::{
    GamePhase, GameState, Grid, Invader, InvaderProjectile, Particle, Player, Projectile, Rect,
    SpriteKind,
};

pub const BACKGROUND_COLOR: &str = "black";
pub const PROJECTILE_COLOR: &str = "red";
pub const INVADER_PROJECTILE_COLOR: &str = "white";
pub const TEXT_COLOR: &str = "white";
pub const GAME_OVER_COLOR: &str = "red";

pub const TITLE_FONT_PX: f32 = 60.0;
pub const PROMPT_FONT_PX: f32 = 30.0;

/// A 2D drawing surface
pub trait Canvas {
    /// Fill the whole surface
    fn clear(&mut self, width: f32, height: f32, color: &str);
    fn fill_rect(&mut self, rect: Rect, color: &str);
    fn fill_circle(&mut self, center: Vec2, radius: f32, color: &str, alpha: f32);
    /// Draw a sprite into `rect`, rotated about the rect center
    fn draw_sprite(&mut self, sprite: SpriteKind, rect: Rect, rotation: f32, alpha: f32);
    /// Horizontally centered text with its baseline at `at.y`
    fn fill_text(&mut self, text: &str, at: Vec2, font_px: f32, color: &str);
}

/// Render current state, no mutation
pub trait Draw {
    fn draw(&self, canvas: &mut dyn Canvas);
}

impl Draw for Player {
    fn draw(&self, canvas: &mut dyn Canvas) {
        if let Some(bounds) = self.bounds() {
            canvas.draw_sprite(SpriteKind::Player, bounds, self.rotation, self.opacity);
        }
    }
}

impl Draw for Projectile {
    fn draw(&self, canvas: &mut dyn Canvas) {
        canvas.fill_circle(self.pos, self.radius, PROJECTILE_COLOR, 1.0);
    }
}

impl Draw for InvaderProjectile {
    fn draw(&self, canvas: &mut dyn Canvas) {
        canvas.fill_rect(self.bounds(), INVADER_PROJECTILE_COLOR);
    }
}

impl Draw for Invader {
    fn draw(&self, canvas: &mut dyn Canvas) {
        if let Some(bounds) = self.bounds() {
            canvas.draw_sprite(SpriteKind::Invader, bounds, 0.0, 1.0);
        }
    }
}

impl Draw for Grid {
    fn draw(&self, canvas: &mut dyn Canvas) {
        for invader in &self.invaders {
            invader.draw(canvas);
        }
    }
}

impl Draw for Particle {
    fn draw(&self, canvas: &mut dyn Canvas) {
        canvas.fill_circle(self.pos, self.radius, self.color, self.opacity.max(0.0));
    }
}

/// Per-frame render preferences
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderOptions {
    /// Draw background stars
    pub starfield: bool,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self { starfield: true }
    }
}

/// Redraw the whole frame for the current phase
pub fn draw_frame<R>(state: &GameState<R>, canvas: &mut dyn Canvas, options: RenderOptions) {
    let viewport = state.viewport;
    canvas.clear(viewport.width, viewport.height, BACKGROUND_COLOR);

    match state.phase {
        GamePhase::Start => draw_start_screen(state, canvas),
        GamePhase::GameOver => draw_game_over_screen(state, canvas),
        GamePhase::Playing => {
            state.player.draw(canvas);
            if options.starfield {
                for particle in &state.particles {
                    particle.draw(canvas);
                }
            }
            for projectile in &state.projectiles {
                projectile.draw(canvas);
            }
            for projectile in &state.invader_projectiles {
                projectile.draw(canvas);
            }
            for grid in &state.grids {
                grid.draw(canvas);
            }
        }
    }
}

fn draw_start_screen<R>(state: &GameState<R>, canvas: &mut dyn Canvas) {
    let (title, prompt) = screen_anchors(state);
    canvas.fill_text("SPACE INVADERS", title, TITLE_FONT_PX, TEXT_COLOR);
    canvas.fill_text("Press SPACE to Start", prompt, PROMPT_FONT_PX, TEXT_COLOR);
}

fn draw_game_over_screen<R>(state: &GameState<R>, canvas: &mut dyn Canvas) {
    let (title, prompt) = screen_anchors(state);
    canvas.fill_text("GAME OVER", title, TITLE_FONT_PX, GAME_OVER_COLOR);
    canvas.fill_text("Press SPACE to Restart", prompt, PROMPT_FONT_PX, TEXT_COLOR);
}

/// Title at a third of the height, prompt at half
fn screen_anchors<R>(state: &GameState<R>) -> (Vec2, Vec2) {
    let viewport = state.viewport;
    let x = viewport.width / 2.0;
    (
        Vec2::new(x, viewport.height / 3.0),
        Vec2::new(x, viewport.height / 2.0),
    )
}
