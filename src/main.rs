//! Flying Meme entry point
//!
//! Handles platform-specific initialization and runs the game loop.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use web_sys::{HtmlCanvasElement, KeyboardEvent, PointerEvent, Window};

    use flying_meme::audio::BrowserAssets;
    use flying_meme::platform::{BrowserFrameHost, InputAction, action_for_key};
    use flying_meme::renderer::{CanvasSurface, ImageBank};
    use flying_meme::score_sink::JsScoreSink;
    use flying_meme::sim::Playfield;
    use flying_meme::theme::{CustomTheme, SilentAssets, ThemeAssets, ThemeKind, resolve_theme};
    use flying_meme::{FrameOutcome, HighScores, SchedulerPhase, Session, Settings, Tuning};

    /// Page-level function that receives `(gameId, score)` when present
    const SCORE_CALLBACK: &str = "submitScore";

    /// Game instance holding all state
    struct Game {
        session: Session<BrowserFrameHost>,
        surface: CanvasSurface,
        images: Rc<RefCell<ImageBank>>,
        settings: Settings,
        window: Window,
    }

    impl Game {
        /// Size the canvas to the viewport; the playfield is fixed for the run
        fn fit_canvas(&mut self) -> Playfield {
            let dim = |v: Result<JsValue, JsValue>| v.ok().and_then(|v| v.as_f64());
            let w = dim(self.window.inner_width()).unwrap_or(800.0);
            let h = dim(self.window.inner_height()).unwrap_or(600.0);
            self.surface.resize(w as u32, h as u32);
            Playfield::new(w as f32, h as f32)
        }

        /// Fresh run parked at "tap to start"
        fn new_run(&mut self) {
            let playfield = self.fit_canvas();
            let seed = js_sys::Date::now() as u64;
            if let Err(e) = self.session.restart(seed, playfield) {
                log::warn!("Could not start run: {e}");
            }
        }

        /// Load a theme's assets; an incomplete custom theme falls back to the default
        fn apply_theme(&mut self, kind: ThemeKind) {
            let custom = CustomTheme::load();
            let (kind, theme) = match resolve_theme(kind, Some(&custom)) {
                Ok(theme) => (kind, theme),
                Err(e) => {
                    log::warn!("{e}; using the {} theme", ThemeKind::default().as_str());
                    (ThemeKind::default(), ThemeAssets::default())
                }
            };

            let mut assets = BrowserAssets::new(self.images.clone());
            assets.set_volume(self.settings.effective_volume());
            assets.load_theme(&theme);
            self.session.set_assets(Box::new(assets));

            self.settings.theme = kind;
            log::info!("Theme: {}", kind.as_str());
        }

        fn handle(&mut self, action: InputAction) {
            match action {
                InputAction::Jump => {
                    if self.session.phase() == SchedulerPhase::Running {
                        self.session.jump();
                    } else {
                        self.new_run();
                    }
                }
                InputAction::Abort => {
                    if self.session.abort() {
                        // No more frames are coming; paint the game over state once
                        self.session.render(&mut self.surface);
                    }
                }
                InputAction::CycleTheme => {
                    self.apply_theme(self.settings.theme.next());
                    self.settings.save();
                    self.new_run();
                }
            }
        }

        fn on_frame(&mut self) {
            match self.session.on_frame(&mut self.surface) {
                Ok(FrameOutcome::Continue) => {}
                Ok(FrameOutcome::Finished) => {
                    log::info!("Game over - final score {}", self.session.state().run.score);
                }
                Err(e) => log::warn!("{e}"),
            }
        }
    }

    pub fn run() {
        console_error_panic_hook::set_once();
        if console_log::init_with_level(log::Level::Info).is_err() {
            web_sys::console::warn_1(&"Logger already initialized".into());
        }

        log::info!("Flying Meme starting...");

        let Some(window) = web_sys::window() else {
            return;
        };
        let Some(canvas) = window
            .document()
            .and_then(|d| d.get_element_by_id("canvas"))
            .and_then(|el| el.dyn_into::<HtmlCanvasElement>().ok())
        else {
            log::error!("No <canvas id=\"canvas\"> on the page");
            return;
        };

        // Balance overrides: <canvas data-tuning='{"gravity": 0.3}'>
        let tuning = match canvas.get_attribute("data-tuning") {
            Some(json) => Tuning::from_json(&json).unwrap_or_else(|e| {
                log::warn!("Ignoring data-tuning: {e}");
                Tuning::default()
            }),
            None => Tuning::default(),
        };

        let settings = Settings::load();
        let images = Rc::new(RefCell::new(ImageBank::default()));
        let Some(surface) = CanvasSurface::new(canvas.clone(), images.clone()) else {
            log::error!("Canvas 2D context unavailable");
            return;
        };

        let host = BrowserFrameHost::new(window.clone());
        let frame_slot = host.callback_slot();
        let mut session = Session::new(
            host,
            tuning,
            Playfield::new(1.0, 1.0),
            Box::new(SilentAssets),
        );
        session.set_hud(settings.hud());
        session.add_sink(Box::new(Rc::new(RefCell::new(HighScores::load()))));
        match JsScoreSink::from_global(SCORE_CALLBACK) {
            Ok(sink) => session.add_sink(Box::new(sink)),
            Err(e) => log::info!("{e}; scores stay local"),
        }

        let game = Rc::new(RefCell::new(Game {
            session,
            surface,
            images,
            settings: settings.clone(),
            window: window.clone(),
        }));

        // The frame callback must exist before the first run requests a frame
        {
            let game = game.clone();
            *frame_slot.borrow_mut() = Some(Closure::<dyn FnMut(f64)>::new(move |_time: f64| {
                game.borrow_mut().on_frame();
            }));
        }

        {
            let mut g = game.borrow_mut();
            g.apply_theme(settings.theme);
            g.new_run();
        }

        setup_input_handlers(&canvas, &window, game.clone());
        setup_unload(&window, game);

        log::info!("Flying Meme running!");
    }

    fn setup_input_handlers(canvas: &HtmlCanvasElement, window: &Window, game: Rc<RefCell<Game>>) {
        // Pointer down covers mouse, touch and pen
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: PointerEvent| {
                event.prevent_default();
                game.borrow_mut().handle(InputAction::Jump);
            });
            let _ = canvas
                .add_event_listener_with_callback("pointerdown", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Keyboard
        {
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                if event.repeat() {
                    return;
                }
                let Some(action) = action_for_key(&event.key()) else {
                    return;
                };
                if action == InputAction::Jump {
                    // Space would scroll the page
                    event.prevent_default();
                }
                game.borrow_mut().handle(action);
            });
            let _ = window
                .add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    /// Cancel the pending frame when the page goes away
    fn setup_unload(window: &Window, game: Rc<RefCell<Game>>) {
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
            let mut g = game.borrow_mut();
            g.session.stop();
            g.settings.save();
        });
        let _ = window.add_event_listener_with_callback("pagehide", closure.as_ref().unchecked_ref());
        closure.forget();
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() {
    wasm_game::run();
}

/// Frames per demo run before it is cut short
#[cfg(not(target_arch = "wasm32"))]
const MAX_DEMO_FRAMES: u64 = 36_000;

/// Demo pilot: flap whenever the avatar sinks below the next gap's centre
#[cfg(not(target_arch = "wasm32"))]
fn demo_wants_jump(state: &flying_meme::sim::GameState) -> bool {
    let behind = state.avatar_x() - state.tuning.avatar_half();
    let target = state
        .obstacles
        .iter()
        .find(|o| o.right() > behind)
        .map_or(state.playfield.center_y(), |o| o.gap_center());
    !state.is_active() || (state.avatar.y > target && state.avatar.velocity >= 0.0)
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use std::cell::RefCell;
    use std::rc::Rc;

    use flying_meme::platform::HeadlessFrameHost;
    use flying_meme::renderer::RecordingSurface;
    use flying_meme::sim::Playfield;
    use flying_meme::theme::SilentAssets;
    use flying_meme::{FrameOutcome, HighScores, Session, Tuning};

    env_logger::init();
    log::info!("Flying Meme (native) starting...");
    log::info!("Native mode runs a headless scripted demo - run with `trunk serve` for the web version");

    // Optional balance overrides: flying-meme tuning.json
    let tuning = match std::env::args().nth(1) {
        Some(path) => {
            let loaded = std::fs::read_to_string(&path)
                .map_err(|e| e.to_string())
                .and_then(|json| Tuning::from_json(&json).map_err(|e| e.to_string()));
            match loaded {
                Ok(tuning) => tuning,
                Err(e) => {
                    log::error!("Could not load tuning from {path}: {e}");
                    std::process::exit(1);
                }
            }
        }
        None => Tuning::default(),
    };

    let playfield = Playfield::new(1280.0, 720.0);
    let mut session = Session::new(
        HeadlessFrameHost::default(),
        tuning,
        playfield,
        Box::new(SilentAssets),
    );
    let board = Rc::new(RefCell::new(HighScores::load()));
    session.add_sink(Box::new(board.clone()));
    let mut surface = RecordingSurface::default();

    for seed in 1..=3u64 {
        if let Err(e) = session.restart(seed, playfield) {
            log::error!("{e}");
            return;
        }
        let mut outcome = FrameOutcome::Continue;
        while outcome == FrameOutcome::Continue && session.scheduler().frames() < MAX_DEMO_FRAMES {
            if session.scheduler_mut().host_mut().fire().is_none() {
                break;
            }
            if demo_wants_jump(session.state()) {
                session.jump();
            }
            match session.on_frame(&mut surface) {
                Ok(next) => outcome = next,
                Err(e) => {
                    log::error!("{e}");
                    break;
                }
            }
        }
        if outcome == FrameOutcome::Continue {
            session.abort();
        }

        let run = &session.state().run;
        println!(
            "Run {seed}: score {} after {} ticks ({} lives left)",
            run.score, run.ticks, run.lives
        );
    }

    if let Some(best) = board.borrow().top_score() {
        println!("Best: {best}");
    }
    println!("Frames presented: {}", surface.frames_presented);
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}
