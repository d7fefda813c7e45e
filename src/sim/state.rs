//! Game state and entity types
//!
//! Every moving thing owns its position and velocity. Collection membership
//! is liveness: removing an entity from its `Vec` destroys it. The player is
//! the exception, it lives in a singleton slot and uses `opacity` as its
//! death marker.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::collision::Rect;
use super::grid::Grid;
use crate::consts::*;

/// Current phase of the game
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum GamePhase {
    /// Title screen, waiting for confirm
    #[default]
    Start,
    /// Active gameplay
    Playing,
    /// Player was hit, waiting for confirm to restart
    GameOver,
}

impl GamePhase {
    pub fn as_str(&self) -> &'static str {
        match self {
            GamePhase::Start => "start",
            GamePhase::Playing => "playing",
            GamePhase::GameOver => "gameover",
        }
    }
}

/// Sprite-backed entity kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SpriteKind {
    Player,
    Invader,
}

/// Readiness of an entity's sprite
///
/// Sprites load asynchronously; an entity stays inert (no movement, no
/// drawing, no collisions) until its sprite is `Ready`.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum SpriteState {
    #[default]
    Loading,
    Ready { size: Vec2 },
}

impl SpriteState {
    pub fn size(&self) -> Option<Vec2> {
        match self {
            SpriteState::Loading => None,
            SpriteState::Ready { size } => Some(*size),
        }
    }

    pub fn is_ready(&self) -> bool {
        matches!(self, SpriteState::Ready { .. })
    }
}

/// Drawing surface extents
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

impl Viewport {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }
}

/// The player's ship
#[derive(Debug, Clone, PartialEq)]
pub struct Player {
    /// Top-left corner
    pub pos: Vec2,
    pub vel: Vec2,
    /// Bank angle (radians), follows the sign of `vel.x`
    pub rotation: f32,
    /// 1 = alive, 0 = destroyed
    pub opacity: f32,
    pub sprite: SpriteState,
}

impl Default for Player {
    fn default() -> Self {
        Self {
            pos: Vec2::ZERO,
            vel: Vec2::ZERO,
            rotation: 0.0,
            opacity: 1.0,
            sprite: SpriteState::Loading,
        }
    }
}

impl Player {
    /// Sprite finished loading: take its scaled size and move to the spawn point
    pub fn on_sprite_ready(&mut self, native_size: Vec2, viewport: Viewport) {
        let size = native_size * PLAYER_SPRITE_SCALE;
        self.sprite = SpriteState::Ready { size };
        self.pos = Vec2::new(
            viewport.width / 2.0 - size.x / 2.0,
            viewport.height - size.y - PLAYER_BOTTOM_MARGIN,
        );
    }

    /// Hitbox, `None` while the sprite is loading
    pub fn bounds(&self) -> Option<Rect> {
        self.sprite.size().map(|size| Rect::new(self.pos, size))
    }

    pub fn is_alive(&self) -> bool {
        self.opacity > 0.0
    }

    /// Recompute velocity and bank angle from held movement keys
    ///
    /// Nothing accumulates between ticks: with no key held the ship stops.
    pub fn steer(&mut self, left: bool, right: bool, viewport_width: f32) {
        let width = self.sprite.size().map_or(0.0, |s| s.x);
        if left && self.pos.x >= 0.0 {
            self.vel.x = -PLAYER_SPEED;
            self.rotation = -PLAYER_BANK;
        } else if right && self.pos.x <= viewport_width - width {
            self.vel.x = PLAYER_SPEED;
            self.rotation = PLAYER_BANK;
        } else {
            self.vel.x = 0.0;
            self.rotation = 0.0;
        }
    }

    pub fn update(&mut self) {
        if self.sprite.is_ready() {
            self.pos.x += self.vel.x;
        }
    }

    /// Where player projectiles leave the ship (top center)
    pub fn muzzle(&self) -> Option<Vec2> {
        self.sprite
            .size()
            .map(|size| Vec2::new(self.pos.x + size.x / 2.0, self.pos.y))
    }

    /// Restore a destroyed ship for a new run
    pub fn reset(&mut self, viewport: Viewport) {
        self.opacity = 1.0;
        self.rotation = 0.0;
        self.vel.x = 0.0;
        if let Some(size) = self.sprite.size() {
            self.pos.x = viewport.width / 2.0 - size.x / 2.0;
        }
    }
}

/// Player-fired shot
#[derive(Debug, Clone, PartialEq)]
pub struct Projectile {
    /// Center
    pub pos: Vec2,
    pub vel: Vec2,
    pub radius: f32,
}

impl Projectile {
    pub fn new(pos: Vec2) -> Self {
        Self {
            pos,
            vel: Vec2::new(0.0, -PROJECTILE_SPEED),
            radius: PROJECTILE_RADIUS,
        }
    }

    pub fn update(&mut self) {
        self.pos += self.vel;
    }

    /// Fully above the top of the viewport
    pub fn is_offscreen(&self) -> bool {
        self.pos.y + self.radius <= 0.0
    }
}

/// Invader-fired shot
#[derive(Debug, Clone, PartialEq)]
pub struct InvaderProjectile {
    /// Top-left corner
    pub pos: Vec2,
    pub vel: Vec2,
    pub size: Vec2,
}

impl InvaderProjectile {
    pub fn new(pos: Vec2) -> Self {
        Self {
            pos,
            vel: Vec2::new(0.0, INVADER_PROJECTILE_SPEED),
            size: Vec2::new(INVADER_PROJECTILE_WIDTH, INVADER_PROJECTILE_HEIGHT),
        }
    }

    pub fn update(&mut self) {
        self.pos += self.vel;
    }

    pub fn bounds(&self) -> Rect {
        Rect::new(self.pos, self.size)
    }

    /// Bottom edge reached the bottom of the viewport
    pub fn is_offscreen(&self, viewport_height: f32) -> bool {
        self.pos.y + self.size.y >= viewport_height
    }
}

/// A single invader, always owned by exactly one `Grid`
#[derive(Debug, Clone, PartialEq)]
pub struct Invader {
    /// Top-left corner
    pub pos: Vec2,
    pub sprite: SpriteState,
}

impl Invader {
    pub fn new(pos: Vec2, sprite: SpriteState) -> Self {
        Self { pos, sprite }
    }

    /// Integrate the owning grid's velocity
    pub fn update(&mut self, grid_vel: Vec2) {
        if self.sprite.is_ready() {
            self.pos += grid_vel;
        }
    }

    pub fn bounds(&self) -> Option<Rect> {
        self.sprite.size().map(|size| Rect::new(self.pos, size))
    }

    /// Fire from bottom center
    pub fn shoot(&self) -> Option<InvaderProjectile> {
        let size = self.sprite.size()?;
        Some(InvaderProjectile::new(Vec2::new(
            self.pos.x + size.x / 2.0,
            self.pos.y + size.y,
        )))
    }
}

/// Particle color used for background stars
pub const STAR_COLOR: &str = "orange";

/// Decorative background star
#[derive(Debug, Clone, PartialEq)]
pub struct Particle {
    pub pos: Vec2,
    pub vel: Vec2,
    pub radius: f32,
    pub color: &'static str,
    pub opacity: f32,
}

impl Particle {
    /// A star at a random spot drifting down at a random speed
    pub fn star<R: Rng + ?Sized>(rng: &mut R, viewport: Viewport) -> Self {
        Self {
            pos: Vec2::new(
                rng.random::<f32>() * viewport.width,
                rng.random::<f32>() * viewport.height,
            ),
            vel: Vec2::new(0.0, rng.random::<f32>() * PARTICLE_MAX_SPEED),
            radius: rng.random::<f32>() * PARTICLE_MAX_RADIUS,
            color: STAR_COLOR,
            opacity: 1.0,
        }
    }

    pub fn update(&mut self) {
        self.pos += self.vel;
        self.opacity -= PARTICLE_FADE;
    }

    pub fn is_faded(&self) -> bool {
        self.opacity <= 0.0
    }
}

/// Simulation root: everything the tick reads or writes
///
/// Collections keep insertion order, which is creation order.
#[derive(Debug, Clone)]
pub struct GameState<R = Pcg32> {
    pub viewport: Viewport,
    pub phase: GamePhase,
    pub score: u64,
    /// Ticks since the last grid spawn
    pub frames: u32,
    /// Ticks between the last spawn and the next one
    pub spawn_interval: u32,
    pub player: Player,
    pub projectiles: Vec<Projectile>,
    pub invader_projectiles: Vec<InvaderProjectile>,
    pub grids: Vec<Grid>,
    pub particles: Vec<Particle>,
    /// Readiness handed to newly spawned invaders
    invader_sprite: SpriteState,
    pub(super) rng: R,
}

impl GameState<Pcg32> {
    /// Create a new game state with a seeded PCG random source
    pub fn new(viewport: Viewport, seed: u64) -> Self {
        Self::with_rng(viewport, Pcg32::seed_from_u64(seed))
    }
}

impl<R: Rng> GameState<R> {
    /// Create a new game state driven by the given random source
    pub fn with_rng(viewport: Viewport, mut rng: R) -> Self {
        let spawn_interval = roll_spawn_interval(&mut rng);
        Self {
            viewport,
            phase: GamePhase::Start,
            score: 0,
            frames: 0,
            spawn_interval,
            player: Player::default(),
            projectiles: Vec::new(),
            invader_projectiles: Vec::new(),
            grids: Vec::new(),
            particles: Vec::new(),
            invader_sprite: SpriteState::Loading,
            rng,
        }
    }

    /// A sprite image finished loading with the given native size
    pub fn sprite_loaded(&mut self, kind: SpriteKind, native_size: Vec2) {
        match kind {
            SpriteKind::Player => {
                self.player.on_sprite_ready(native_size, self.viewport);
                log::info!("Player sprite ready ({}x{})", native_size.x, native_size.y);
            }
            SpriteKind::Invader => {
                let sprite = SpriteState::Ready { size: native_size };
                self.invader_sprite = sprite;
                for invader in self.grids.iter_mut().flat_map(|g| g.invaders.iter_mut()) {
                    if !invader.sprite.is_ready() {
                        invader.sprite = sprite;
                    }
                }
                log::info!("Invader sprite ready ({}x{})", native_size.x, native_size.y);
            }
        }
    }

    /// Spawn a player projectile from the ship's muzzle
    pub fn fire(&mut self) {
        if let Some(muzzle) = self.player.muzzle() {
            self.projectiles.push(Projectile::new(muzzle));
        }
    }

    /// Spawn a new grid formation at the top-left corner
    pub fn spawn_grid(&mut self) {
        let grid = Grid::new(&mut self.rng, self.invader_sprite);
        log::debug!(
            "Spawned grid {}x{} (next in {} ticks)",
            grid.columns,
            grid.rows,
            self.spawn_interval
        );
        self.grids.push(grid);
    }

    /// Reroll the ticks until the next spawn
    pub fn reroll_spawn_interval(&mut self) {
        self.spawn_interval = roll_spawn_interval(&mut self.rng);
    }

    /// Full world reset for a new run
    ///
    /// The spawn interval is kept; the zeroed frame counter makes the first
    /// grid appear on the first playing tick.
    pub fn reset(&mut self) {
        self.projectiles.clear();
        self.grids.clear();
        self.invader_projectiles.clear();
        self.particles.clear();
        self.score = 0;
        self.player.reset(self.viewport);
        self.frames = 0;
    }

    /// Total live invaders across all grids
    pub fn invader_count(&self) -> usize {
        self.grids.iter().map(|g| g.invaders.len()).sum()
    }
}

fn roll_spawn_interval<R: Rng + ?Sized>(rng: &mut R) -> u32 {
    rng.random_range(SPAWN_INTERVAL_MIN..SPAWN_INTERVAL_MAX)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn viewport() -> Viewport {
        Viewport::new(1024.0, 576.0)
    }

    #[test]
    fn test_player_inert_until_sprite_ready() {
        let mut player = Player::default();
        player.vel.x = 5.0;
        player.update();
        assert_eq!(player.pos, Vec2::ZERO);
        assert!(player.bounds().is_none());
        assert!(player.muzzle().is_none());
    }

    #[test]
    fn test_player_spawns_centered_above_bottom() {
        let mut player = Player::default();
        player.on_sprite_ready(Vec2::new(400.0, 200.0), viewport());
        let bounds = player.bounds().unwrap();
        assert!((bounds.size - Vec2::new(60.0, 30.0)).length() < 1e-3);
        assert!((bounds.center().x - 512.0).abs() < 1e-3);
        assert!((bounds.bottom() - (576.0 - PLAYER_BOTTOM_MARGIN)).abs() < 1e-3);
    }

    #[test]
    fn test_player_steer_is_recomputed() {
        let mut player = Player::default();
        player.on_sprite_ready(Vec2::new(400.0, 200.0), viewport());

        player.steer(true, false, 1024.0);
        assert_eq!(player.vel.x, -PLAYER_SPEED);
        assert_eq!(player.rotation, -PLAYER_BANK);

        player.steer(false, true, 1024.0);
        assert_eq!(player.vel.x, PLAYER_SPEED);
        assert_eq!(player.rotation, PLAYER_BANK);

        player.steer(false, false, 1024.0);
        assert_eq!(player.vel.x, 0.0);
        assert_eq!(player.rotation, 0.0);
    }

    #[test]
    fn test_player_steer_respects_edges() {
        let mut player = Player::default();
        player.on_sprite_ready(Vec2::new(400.0, 200.0), viewport());

        player.pos.x = -1.0;
        player.steer(true, false, 1024.0);
        assert_eq!(player.vel.x, 0.0);

        player.pos.x = 1024.0 - 50.0;
        player.steer(false, true, 1024.0);
        assert_eq!(player.vel.x, 0.0);
    }

    #[test]
    fn test_projectile_offscreen_when_fully_above() {
        let mut p = Projectile::new(Vec2::new(10.0, 14.0));
        assert!(!p.is_offscreen());
        p.update();
        assert!(p.is_offscreen()); // y = 4, radius 4
    }

    #[test]
    fn test_invader_shoots_from_bottom_center() {
        let invader = Invader::new(
            Vec2::new(30.0, 60.0),
            SpriteState::Ready {
                size: Vec2::new(30.0, 20.0),
            },
        );
        let shot = invader.shoot().unwrap();
        assert_eq!(shot.pos, Vec2::new(45.0, 80.0));
        assert_eq!(shot.vel, Vec2::new(0.0, INVADER_PROJECTILE_SPEED));

        let loading = Invader::new(Vec2::ZERO, SpriteState::Loading);
        assert!(loading.shoot().is_none());
    }

    #[test]
    fn test_particle_fades_out() {
        let mut rng = Pcg32::seed_from_u64(7);
        let mut star = Particle::star(&mut rng, viewport());
        assert!(star.pos.x >= 0.0 && star.pos.x < 1024.0);
        assert!(star.radius < PARTICLE_MAX_RADIUS);
        let mut ticks = 0;
        while !star.is_faded() {
            star.update();
            ticks += 1;
        }
        assert!((99..=101).contains(&ticks));
    }

    #[test]
    fn test_invader_sprite_resolves_existing_grids() {
        let mut state = GameState::new(viewport(), 1);
        state.spawn_grid();
        assert!(state.grids[0].invaders.iter().all(|i| !i.sprite.is_ready()));

        state.sprite_loaded(SpriteKind::Invader, Vec2::new(31.0, 20.0));
        assert!(state.grids[0].invaders.iter().all(|i| i.sprite.is_ready()));

        state.spawn_grid();
        assert!(state.grids[1].invaders.iter().all(|i| i.sprite.is_ready()));
    }

    #[test]
    fn test_spawn_interval_in_range() {
        for seed in 0..50 {
            let state = GameState::new(viewport(), seed);
            assert!((SPAWN_INTERVAL_MIN..SPAWN_INTERVAL_MAX).contains(&state.spawn_interval));
        }
    }
}
