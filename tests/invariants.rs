//! Property tests for the simulation over random input sequences

use glam::Vec2;
use proptest::prelude::*;

use invaders::consts::SCORE_PER_INVADER;
use invaders::renderer::{RecordingCanvas, RenderOptions, draw_frame};
use invaders::sim::{GamePhase, GameState, SpriteKind, TickInput, Viewport, tick};

fn loaded_state(seed: u64) -> GameState {
    let mut state = GameState::new(Viewport::new(800.0, 600.0), seed);
    state.sprite_loaded(SpriteKind::Player, Vec2::new(400.0, 200.0));
    state.sprite_loaded(SpriteKind::Invader, Vec2::new(30.0, 20.0));
    state
}

/// Per-frame input; confirm is rare so runs last a while
fn input_strategy() -> impl Strategy<Value = TickInput> {
    (any::<bool>(), any::<bool>(), prop::bool::weighted(0.05)).prop_map(
        |(left, right, confirm)| TickInput {
            left,
            right,
            confirm,
        },
    )
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(24))]

    #[test]
    fn score_counts_each_destroyed_invader_once(
        seed in any::<u64>(),
        inputs in prop::collection::vec(input_strategy(), 1..1500),
    ) {
        let mut state = loaded_state(seed);
        start_playing(&mut state);

        for input in &inputs {
            let (phase, score) = (state.phase, state.score);
            let invaders = state.invader_count();
            tick(&mut state, input);

            match phase {
                GamePhase::Playing => {
                    // A spawn appends one untouched grid after the sweep
                    let spawned = if state.frames == 1 {
                        state.grids.last().map_or(0, |g| g.invaders.len())
                    } else {
                        0
                    };
                    let destroyed = invaders + spawned - state.invader_count();
                    prop_assert_eq!(
                        state.score - score,
                        SCORE_PER_INVADER * destroyed as u64
                    );
                }
                GamePhase::GameOver if state.phase == GamePhase::Playing => {
                    prop_assert_eq!(state.score, 0);
                }
                _ => prop_assert_eq!(state.score, score),
            }
        }
    }

    #[test]
    fn grids_are_never_left_empty(
        seed in any::<u64>(),
        inputs in prop::collection::vec(input_strategy(), 1..1500),
    ) {
        let mut state = loaded_state(seed);
        for input in &inputs {
            tick(&mut state, input);
            for grid in &state.grids {
                prop_assert!(!grid.invaders.is_empty());
                prop_assert!(grid.invaders.len() <= grid.columns * grid.rows);
            }
            let total: usize = state.grids.iter().map(|g| g.invaders.len()).sum();
            prop_assert_eq!(state.invader_count(), total);
        }
    }

    #[test]
    fn spawns_follow_the_rolled_interval(
        seed in any::<u64>(),
        steps in 1200usize..2400,
    ) {
        let mut state = loaded_state(seed);
        start_playing(&mut state);

        // (ticks since the last spawn, interval rolled at that spawn)
        let mut pending: Option<(u32, u32)> = None;
        for _ in 0..steps {
            tick(&mut state, &TickInput::default());

            // frames restarts at 1 right after a spawn
            if state.frames == 1 {
                if let Some((ticks, interval)) = pending {
                    prop_assert_eq!(ticks + 1, interval);
                }
                pending = Some((0, state.spawn_interval));
            } else if let Some((ticks, _)) = pending.as_mut() {
                *ticks += 1;
            }

            if state.phase != GamePhase::Playing {
                // Spacing restarts with the next run
                break;
            }
        }
    }

    #[test]
    fn drawing_twice_gives_the_same_frame(
        seed in any::<u64>(),
        inputs in prop::collection::vec(input_strategy(), 0..600),
        starfield in any::<bool>(),
    ) {
        let mut state = loaded_state(seed);
        for input in &inputs {
            tick(&mut state, input);
        }

        let options = RenderOptions { starfield };
        let mut first = RecordingCanvas::default();
        let mut second = RecordingCanvas::default();
        draw_frame(&state, &mut first, options);
        draw_frame(&state, &mut second, options);
        prop_assert_eq!(first.commands, second.commands);
    }
}

fn start_playing(state: &mut GameState) {
    let confirm = TickInput {
        confirm: true,
        ..Default::default()
    };
    tick(state, &confirm);
    assert_eq!(state.phase, GamePhase::Playing);
}
