//! Invaders entry point
//!
//! On the web the play shell drives the game through the exported
//! `start`/`stop`/`pause`/`resume` functions. Natively there is no window;
//! the binary plays a headless demo run and logs the outcome.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;

    use glam::Vec2;
    use wasm_bindgen::prelude::*;
    use web_sys::{Element, HtmlCanvasElement, HtmlImageElement, KeyboardEvent, Window};

    use invaders::renderer::Canvas2d;
    use invaders::score::{FetchReporter, LogReporter, ScoreReporter};
    use invaders::sim::{SpriteKind, Viewport};
    use invaders::{Engine, Settings};

    const PLAYER_IMAGE: &str = "./img/spaceship.png";
    const INVADER_IMAGE: &str = "./img/invader.png";

    /// Game instance bound to the page
    struct Game {
        engine: Engine,
        canvas: Canvas2d,
        score_el: Option<Element>,
        shown_score: Option<u64>,
    }

    impl Game {
        fn frame(&mut self, generation: u64) -> bool {
            let keep_going = self.engine.frame(generation, &mut self.canvas);
            self.update_hud();
            keep_going
        }

        /// Mirror the score into `#scoreEl`
        fn update_hud(&mut self) {
            let score = self.engine.score();
            if self.shown_score == Some(score) {
                return;
            }
            if let Some(el) = &self.score_el {
                el.set_text_content(Some(&score.to_string()));
            }
            self.shown_score = Some(score);
        }
    }

    thread_local! {
        static GAME: RefCell<Option<Rc<RefCell<Game>>>> = const { RefCell::new(None) };
    }

    fn mount() -> Result<Rc<RefCell<Game>>, JsValue> {
        let window = web_sys::window().ok_or("no window")?;
        let document = window.document().ok_or("no document")?;

        let canvas: HtmlCanvasElement = document
            .query_selector("canvas")?
            .ok_or("no canvas")?
            .dyn_into()
            .map_err(|_| "not a canvas")?;

        let width = window
            .inner_width()?
            .as_f64()
            .unwrap_or(canvas.width() as f64);
        let height = window
            .inner_height()?
            .as_f64()
            .unwrap_or(canvas.height() as f64);
        canvas.set_width(width as u32);
        canvas.set_height(height as u32);

        let score_el = document.get_element_by_id("scoreEl");
        if score_el.is_none() {
            log::warn!("No #scoreEl on the page, score HUD disabled");
        }

        let settings = Settings::load();
        let reporter = reporter_for(&settings);

        let player_image = HtmlImageElement::new()?;
        let invader_image = HtmlImageElement::new()?;
        let canvas2d = Canvas2d::new(&canvas, player_image.clone(), invader_image.clone())
            .ok_or("no 2d context")?;

        let seed = js_sys::Date::now() as u64;
        let viewport = Viewport::new(width as f32, height as f32);
        let game = Rc::new(RefCell::new(Game {
            engine: Engine::new(viewport, seed, settings, reporter),
            canvas: canvas2d,
            score_el,
            shown_score: None,
        }));
        log::info!(
            "Invaders mounted ({}x{}, seed {})",
            viewport.width,
            viewport.height,
            seed
        );

        // Entities stay inert until their sprite resolves
        load_sprite(&game, &player_image, SpriteKind::Player, PLAYER_IMAGE);
        load_sprite(&game, &invader_image, SpriteKind::Invader, INVADER_IMAGE);

        setup_input_handlers(&window, game.clone());

        Ok(game)
    }

    fn reporter_for(settings: &Settings) -> Box<dyn ScoreReporter> {
        if settings.report_scores {
            Box::new(FetchReporter::new(settings.score_endpoint.clone()))
        } else {
            Box::new(LogReporter)
        }
    }

    fn load_sprite(
        game: &Rc<RefCell<Game>>,
        image: &HtmlImageElement,
        kind: SpriteKind,
        src: &str,
    ) {
        let game = game.clone();
        let loaded = image.clone();
        let closure = Closure::<dyn FnMut()>::new(move || {
            let size = Vec2::new(
                loaded.natural_width() as f32,
                loaded.natural_height() as f32,
            );
            game.borrow_mut().engine.sprite_loaded(kind, size);
        });
        image.set_onload(Some(closure.as_ref().unchecked_ref()));
        closure.forget();
        image.set_src(src);
    }

    fn setup_input_handlers(window: &Window, game: Rc<RefCell<Game>>) {
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                if game.borrow_mut().engine.key_down(&event.key()) {
                    // Space would scroll the page
                    event.prevent_default();
                }
            });
            let _ = window
                .add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        {
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                if game.borrow_mut().engine.key_up(&event.key()) {
                    event.prevent_default();
                }
            });
            let _ =
                window.add_event_listener_with_callback("keyup", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn request_animation_frame(game: Rc<RefCell<Game>>, generation: u64) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let closure = Closure::once(move |_time: f64| {
            game_loop(game, generation);
        });
        let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn game_loop(game: Rc<RefCell<Game>>, generation: u64) {
        let keep_going = game.borrow_mut().frame(generation);
        if keep_going {
            request_animation_frame(game, generation);
        } else {
            log::debug!("Frame loop {} ended", generation);
        }
    }

    fn with_game(f: impl FnOnce(&mut Game)) {
        GAME.with(|slot| {
            if let Some(game) = slot.borrow().as_ref() {
                f(&mut game.borrow_mut());
            }
        });
    }

    /// Mount on first call, then (re)start the frame loop
    #[wasm_bindgen]
    pub fn start() -> Result<(), JsValue> {
        let existing = GAME.with(|slot| slot.borrow().clone());
        let game = match existing {
            Some(game) => game,
            None => {
                let game = mount()?;
                GAME.with(|slot| *slot.borrow_mut() = Some(game.clone()));
                game
            }
        };

        let generation = game.borrow_mut().engine.start();
        if let Some(generation) = generation {
            request_animation_frame(game, generation);
        }
        Ok(())
    }

    #[wasm_bindgen]
    pub fn stop() {
        with_game(|g| g.engine.stop());
    }

    #[wasm_bindgen]
    pub fn pause() {
        with_game(|g| g.engine.pause());
    }

    #[wasm_bindgen]
    pub fn resume() {
        with_game(|g| g.engine.resume());
    }

    /// Apply host settings (JSON, missing fields default) and remember them
    #[wasm_bindgen]
    pub fn configure(json: &str) -> Result<(), JsValue> {
        let settings =
            Settings::from_json(json).map_err(|e| JsValue::from_str(&e.to_string()))?;
        settings.save();
        let reporter = reporter_for(&settings);
        with_game(|g| g.engine.reconfigure(settings, reporter));
        Ok(())
    }

    pub fn run() {
        console_error_panic_hook::set_once();
        let _ = console_log::init_with_level(log::Level::Info);

        log::info!("Invaders starting...");
        if let Err(e) = start() {
            log::error!("Failed to mount Invaders: {:?}", e);
        }
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() {
    wasm_game::run();
}

#[cfg(not(target_arch = "wasm32"))]
mod headless {
    use glam::Vec2;

    use invaders::renderer::RecordingCanvas;
    use invaders::score::LogReporter;
    use invaders::sim::{SpriteKind, Viewport};
    use invaders::{Engine, Settings};

    /// Play `frames` frames with a simple autopilot
    ///
    /// The pilot chases the first invader of the oldest grid and fires
    /// every ten frames; the same key also restarts after a game over.
    pub fn run(seed: u64, frames: u32) {
        let settings = Settings::load();
        let bindings = settings.bindings.clone();
        let mut engine = Engine::new(
            Viewport::new(1024.0, 576.0),
            seed,
            settings,
            Box::new(LogReporter),
        );
        engine.sprite_loaded(SpriteKind::Player, Vec2::new(400.0, 400.0));
        engine.sprite_loaded(SpriteKind::Invader, Vec2::new(30.0, 30.0));

        let mut canvas = RecordingCanvas::default();
        let Some(generation) = engine.start() else {
            return;
        };

        let mut games = 0;
        for frame in 0..frames {
            let state = engine.state();
            let target = state
                .grids
                .first()
                .and_then(|g| g.invaders.first())
                .and_then(|i| i.bounds())
                .map(|r| r.center().x);
            let player = state.player.bounds().map(|r| r.center().x);

            let (left, right) = match (target, player) {
                (Some(t), Some(p)) => (t < p - 5.0, t > p + 5.0),
                _ => (false, false),
            };
            steer(&mut engine, &bindings.left, left);
            steer(&mut engine, &bindings.right, right);

            if frame % 10 == 0 {
                if engine.phase() != invaders::sim::GamePhase::Playing {
                    games += 1;
                }
                engine.key_down(&bindings.confirm);
                engine.key_up(&bindings.confirm);
            }

            engine.frame(generation, &mut canvas);
        }

        log::info!(
            "Headless run finished: {} game(s), phase {}, score {}, {} invaders on screen, {} sprites in last frame",
            games,
            engine.phase().as_str(),
            engine.score(),
            engine.state().invader_count(),
            canvas.sprite_count()
        );
        engine.stop();
    }

    fn steer(engine: &mut Engine, key: &str, held: bool) {
        if held {
            engine.key_down(key);
        } else {
            engine.key_up(key);
        }
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Invaders (native) starting...");
    log::info!("The game renders to a browser canvas - run with `trunk serve` for the web version");

    let mut args = std::env::args().skip(1);
    let seed = args.next().and_then(|s| s.parse().ok()).unwrap_or(42);
    let frames = args.next().and_then(|s| s.parse().ok()).unwrap_or(3600);
    headless::run(seed, frames);
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}
