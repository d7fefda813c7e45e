//! Per-frame simulation tick
//!
//! One call advances the game by exactly one animation frame.

use rand::Rng;

use super::collision::{circle_hits_rect, projectile_hits_player};
use super::state::{GamePhase, GameState, Particle};
use crate::consts::*;

/// Input commands for a single tick
///
/// Movement flags mirror currently held keys; `confirm` is one-shot and must
/// be cleared by the caller once the tick has consumed it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TickInput {
    pub left: bool,
    pub right: bool,
    /// Start, restart or fire, depending on the phase
    pub confirm: bool,
}

/// Advance the game state by one frame
pub fn tick<R: Rng>(state: &mut GameState<R>, input: &TickInput) {
    if input.confirm {
        match state.phase {
            GamePhase::Start => {
                state.phase = GamePhase::Playing;
                log::info!("Game started");
                return;
            }
            GamePhase::GameOver => {
                state.reset();
                state.phase = GamePhase::Playing;
                log::info!("Game restarted");
                return;
            }
            GamePhase::Playing => state.fire(),
        }
    }

    // Start and game over screens are static
    if state.phase != GamePhase::Playing {
        return;
    }

    for _ in 0..PARTICLES_PER_TICK {
        let star = Particle::star(&mut state.rng, state.viewport);
        state.particles.push(star);
    }

    state
        .player
        .steer(input.left, input.right, state.viewport.width);
    state.player.update();

    state.particles.retain(|p| !p.is_faded());
    for particle in &mut state.particles {
        particle.update();
    }

    state.projectiles.retain(|p| !p.is_offscreen());
    for projectile in &mut state.projectiles {
        projectile.update();
    }

    let height = state.viewport.height;
    state.invader_projectiles.retain(|p| !p.is_offscreen(height));
    for projectile in &mut state.invader_projectiles {
        projectile.update();
    }

    if let Some(player) = state.player.bounds() {
        let before = state.invader_projectiles.len();
        state
            .invader_projectiles
            .retain(|p| !projectile_hits_player(p.bounds(), player));
        if state.invader_projectiles.len() < before {
            state.player.opacity = 0.0;
            state.phase = GamePhase::GameOver;
            log::info!("Player destroyed");
        }
    }

    let fire = state.frames % INVADER_FIRE_INTERVAL == 0;
    let GameState {
        viewport,
        grids,
        projectiles,
        invader_projectiles,
        score,
        rng,
        ..
    } = state;

    grids.retain_mut(|grid| {
        grid.update(viewport.width);

        if fire
            && let Some(shot) = grid
                .pick_shooter(rng)
                .and_then(|idx| grid.invaders[idx].shoot())
        {
            invader_projectiles.push(shot);
        }

        let vel = grid.vel;
        grid.invaders.retain_mut(|invader| {
            invader.update(vel);
            let Some(bounds) = invader.bounds() else {
                return true;
            };
            match projectiles
                .iter()
                .position(|p| circle_hits_rect(p.pos, p.radius, bounds))
            {
                Some(hit) => {
                    projectiles.remove(hit);
                    *score += SCORE_PER_INVADER;
                    false
                }
                None => true,
            }
        });

        // A grid lives exactly as long as it has invaders
        !grid.is_empty()
    });

    if state.frames % state.spawn_interval == 0 {
        state.reroll_spawn_interval();
        state.spawn_grid();
        state.frames = 0;
    }

    state.frames += 1;

    if state.phase == GamePhase::GameOver {
        log::info!("Game over, final score {}", state.score);
    }
}
