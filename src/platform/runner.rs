//! Frame driver and mount contract
//!
//! The play shell mounts the game with `start()` and tears it down with
//! `stop()`. Every scheduled frame carries the loop generation it was started
//! with; once `stop()` cancels the token, pending frames see a stale
//! generation and stop rescheduling.

use std::cell::Cell;
use std::rc::Rc;

use glam::Vec2;
use rand::Rng;
use rand_pcg::Pcg32;

use super::input::Controls;
use crate::renderer::{Canvas, RenderOptions, draw_frame};
use crate::score::{ScoreReporter, ScoreSubmission};
use crate::settings::Settings;
use crate::sim::{GamePhase, GameState, SpriteKind, Viewport, tick};

#[derive(Debug, Clone, Copy, Default)]
struct LoopState {
    generation: u64,
    running: bool,
}

/// Cancellation token shared between the engine and its scheduled frames
#[derive(Debug, Clone, Default)]
pub struct LoopToken {
    state: Rc<Cell<LoopState>>,
}

impl LoopToken {
    /// Start a new loop generation
    pub fn begin(&self) -> u64 {
        let mut s = self.state.get();
        s.generation += 1;
        s.running = true;
        self.state.set(s);
        s.generation
    }

    pub fn cancel(&self) {
        let mut s = self.state.get();
        s.running = false;
        self.state.set(s);
    }

    pub fn is_running(&self) -> bool {
        self.state.get().running
    }

    /// Frames from `generation` may still run
    pub fn is_current(&self, generation: u64) -> bool {
        let s = self.state.get();
        s.running && s.generation == generation
    }
}

/// Game instance: simulation, input, scheduling state and score reporting
pub struct Engine<R = Pcg32> {
    state: GameState<R>,
    controls: Controls,
    settings: Settings,
    reporter: Box<dyn ScoreReporter>,
    token: LoopToken,
    paused: bool,
    last_phase: GamePhase,
}

impl Engine<Pcg32> {
    pub fn new(
        viewport: Viewport,
        seed: u64,
        settings: Settings,
        reporter: Box<dyn ScoreReporter>,
    ) -> Self {
        Self::with_state(GameState::new(viewport, seed), settings, reporter)
    }
}

impl<R: Rng> Engine<R> {
    pub fn with_state(
        state: GameState<R>,
        settings: Settings,
        reporter: Box<dyn ScoreReporter>,
    ) -> Self {
        let last_phase = state.phase;
        Self {
            state,
            controls: Controls::new(settings.bindings.clone()),
            settings,
            reporter,
            token: LoopToken::default(),
            paused: false,
            last_phase,
        }
    }

    /// Begin scheduling; `None` if a loop is already running
    ///
    /// The world is left as it was, so a stopped game continues where it
    /// left off.
    pub fn start(&mut self) -> Option<u64> {
        if self.token.is_running() {
            return None;
        }
        self.paused = false;
        let generation = self.token.begin();
        log::info!("Invaders started (loop {})", generation);
        Some(generation)
    }

    /// Halt scheduling; pending frames will not reschedule
    pub fn stop(&mut self) {
        if self.token.is_running() {
            self.token.cancel();
            log::info!("Invaders stopped");
        }
    }

    /// Freeze the game; frames keep arriving but do nothing
    pub fn pause(&mut self) {
        if !self.paused {
            self.paused = true;
            log::info!("Invaders paused");
        }
    }

    pub fn resume(&mut self) {
        if self.paused {
            self.paused = false;
            log::info!("Invaders resumed");
        }
    }

    pub fn is_running(&self) -> bool {
        self.token.is_running()
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    /// Swap in new settings and the reporter that goes with them
    ///
    /// Held keys are released since the bindings may have changed.
    pub fn reconfigure(&mut self, settings: Settings, reporter: Box<dyn ScoreReporter>) {
        self.controls = Controls::new(settings.bindings.clone());
        self.settings = settings;
        self.reporter = reporter;
        log::info!("Settings applied");
    }

    pub fn key_down(&mut self, key: &str) -> bool {
        self.controls.key_down(key, self.state.phase)
    }

    pub fn key_up(&mut self, key: &str) -> bool {
        self.controls.key_up(key, self.state.phase)
    }

    pub fn sprite_loaded(&mut self, kind: SpriteKind, native_size: Vec2) {
        self.state.sprite_loaded(kind, native_size);
    }

    /// Run one animation frame
    ///
    /// Returns false once the loop that scheduled this frame was stopped; the
    /// caller must not schedule another frame for it.
    pub fn frame(&mut self, generation: u64, canvas: &mut dyn Canvas) -> bool {
        if !self.token.is_current(generation) {
            return false;
        }
        if self.paused {
            return true;
        }

        let input = self.controls.consume();
        tick(&mut self.state, &input);
        self.track_phase();

        let options = RenderOptions {
            starfield: self.settings.starfield,
        };
        draw_frame(&self.state, canvas, options);
        true
    }

    fn track_phase(&mut self) {
        let phase = self.state.phase;
        if phase != self.last_phase {
            log::debug!(
                "Phase {} -> {}",
                self.last_phase.as_str(),
                phase.as_str()
            );
            if phase == GamePhase::GameOver {
                self.submit_score();
            }
            self.last_phase = phase;
        }
    }

    fn submit_score(&self) {
        if !self.settings.report_scores {
            return;
        }
        let result = ScoreSubmission::new(&self.settings.game_code, self.state.score)
            .and_then(|submission| self.reporter.report(&submission));
        if let Err(e) = result {
            log::warn!("Score not submitted: {}", e);
        }
    }

    pub fn score(&self) -> u64 {
        self.state.score
    }

    pub fn phase(&self) -> GamePhase {
        self.state.phase
    }

    pub fn state(&self) -> &GameState<R> {
        &self.state
    }

    pub fn state_mut(&mut self) -> &mut GameState<R> {
        &mut self.state
    }
}
