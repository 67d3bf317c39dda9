//! Reflex Dot entry point
//!
//! Handles platform-specific initialization and runs the frame loop.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use web_sys::Element;

    use reflex_dot::presentation::dom::{DomPresentation, TARGET_ATTR};
    use reflex_dot::sim::{PlayArea, SessionController, TargetId};
    use reflex_dot::Settings;

    /// Game instance holding the controller and frame timing
    struct Game {
        controller: SessionController<DomPresentation>,
        last_time: f64,
        /// Sub-millisecond remainder carried between frames
        carry_ms: f64,
    }

    impl Game {
        fn new(presentation: DomPresentation, seed: u64, settings: Settings) -> Self {
            let area = presentation
                .area_size()
                .map(|(w, h)| PlayArea::new(w, h))
                .unwrap_or(PlayArea::new(0.0, 0.0));
            Self {
                controller: SessionController::new(presentation, area, seed)
                    .with_settings(settings),
                last_time: 0.0,
                carry_ms: 0.0,
            }
        }

        /// Feed elapsed frame time into the controller clock
        fn update(&mut self, time: f64) {
            if self.last_time > 0.0 {
                self.carry_ms += (time - self.last_time).max(0.0);
                let whole = self.carry_ms.floor();
                self.carry_ms -= whole;
                self.controller.advance(whole as u64);
            }
            self.last_time = time;
        }

        /// Re-read the game area size before it matters
        fn refresh_area(&mut self) {
            if let Some((w, h)) = self.controller.presentation().area_size() {
                self.controller.set_play_area(PlayArea::new(w, h));
            }
        }
    }

    pub fn run() {
        console_error_panic_hook::set_once();
        if console_log::init_with_level(log::Level::Info).is_err() {
            web_sys::console::warn_1(&"Logger already initialized".into());
        }

        log::info!("Reflex Dot starting...");

        let Some(document) = web_sys::window().and_then(|w| w.document()) else {
            log::error!("No document, nothing to run");
            return;
        };

        let seed = js_sys::Date::now() as u64;
        let settings = Settings::load();
        let game = Rc::new(RefCell::new(Game::new(
            DomPresentation::new(document.clone()),
            seed,
            settings,
        )));

        log::info!("Game initialized with seed: {}", seed);

        setup_buttons(&document, game.clone());
        setup_target_input(game.clone());
        setup_resize(game.clone());
        setup_keyboard(game.clone());

        request_animation_frame(game);

        log::info!("Reflex Dot running!");
    }

    fn on_click(el: &Element, handler: impl FnMut(web_sys::Event) + 'static) {
        let closure = Closure::<dyn FnMut(web_sys::Event)>::new(handler);
        let _ = el.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn setup_buttons(document: &web_sys::Document, game: Rc<RefCell<Game>>) {
        if let Some(btn) = document.get_element_by_id("startBtn") {
            let game = game.clone();
            on_click(&btn, move |_| {
                let mut g = game.borrow_mut();
                g.refresh_area();
                g.controller.start();
            });
        } else {
            log::warn!("Missing #startBtn");
        }

        if let Some(btn) = document.get_element_by_id("restartBtn") {
            on_click(&btn, move |_| game.borrow_mut().controller.restart());
        } else {
            log::warn!("Missing #restartBtn");
        }
    }

    /// Target id under the event, if it hit a live dot
    fn target_of(event: &web_sys::Event) -> Option<TargetId> {
        let el = event.target()?.dyn_into::<Element>().ok()?;
        let dot = el.closest(&format!("[{}]", TARGET_ATTR)).ok()??;
        let raw = dot.get_attribute(TARGET_ATTR)?;
        raw.parse().ok().map(TargetId)
    }

    fn setup_target_input(game: Rc<RefCell<Game>>) {
        let Some(area) = game.borrow().controller.presentation().game_area().cloned() else {
            return;
        };

        // Click
        {
            let game = game.clone();
            on_click(&area, move |event| {
                if let Some(id) = target_of(&event) {
                    game.borrow_mut().controller.activate(id);
                }
            });
        }

        // Touch start (suppress the emulated click that follows)
        {
            let closure = Closure::<dyn FnMut(_)>::new(move |event: web_sys::TouchEvent| {
                event.prevent_default();
                if let Some(id) = target_of(&event) {
                    game.borrow_mut().controller.activate(id);
                }
            });
            let _ = area
                .add_event_listener_with_callback("touchstart", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn setup_resize(game: Rc<RefCell<Game>>) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
            game.borrow_mut().refresh_area();
        });
        let _ = window.add_event_listener_with_callback("resize", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn setup_keyboard(game: Rc<RefCell<Game>>) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let closure = Closure::<dyn FnMut(_)>::new(move |event: web_sys::KeyboardEvent| {
            if matches!(event.key().as_str(), "m" | "M") {
                let mut g = game.borrow_mut();
                let mut settings = g.controller.settings().clone();
                let reduced = settings.toggle_reduced_motion();
                settings.save();
                g.controller.set_settings(settings);
                log::info!("Reduced motion: {}", reduced);
            }
        });
        let _ = window.add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn request_animation_frame(game: Rc<RefCell<Game>>) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let closure = Closure::once(move |time: f64| {
            game_loop(game, time);
        });
        let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn game_loop(game: Rc<RefCell<Game>>, time: f64) {
        game.borrow_mut().update(time);
        request_animation_frame(game);
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() {
    wasm_game::run();
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Reflex Dot (native) starting...");
    log::info!("Native mode plays one headless session - run with `trunk serve` for the web version");

    let mut args = std::env::args().skip(1);
    let seed = args.next().and_then(|s| s.parse().ok()).unwrap_or(42);
    let reaction_ms = args.next().and_then(|s| s.parse().ok()).unwrap_or(650);

    let (score, tier) = headless::play(seed, reaction_ms);
    println!("\nFinal score: {} ({})", score, tier);
}

/// Scripted session against the command log, printed as JSON lines
#[cfg(not(target_arch = "wasm32"))]
mod headless {
    use reflex_dot::sim::{Phase, PlayArea, SessionController, TargetId, Tier};
    use reflex_dot::{Command, CommandLog};

    /// Clock step between bot decisions
    const STEP_MS: u64 = 50;

    pub fn play(seed: u64, reaction_ms: u64) -> (u32, Tier) {
        log::info!("Headless session: seed {}, reaction {}ms", seed, reaction_ms);

        let mut c = SessionController::new(CommandLog::new(), PlayArea::new(400.0, 400.0), seed);
        c.start();
        flush(&mut c);

        // Target the bot has noticed and when
        let mut seen: Option<(TargetId, u64)> = None;
        while c.phase() == Phase::Playing {
            c.advance(STEP_MS);

            match (c.live_target().map(|t| t.id), seen) {
                (Some(id), Some((noticed, at))) if noticed == id => {
                    if c.now_ms() - at >= reaction_ms {
                        c.activate(id);
                    }
                }
                (Some(id), _) => seen = Some((id, c.now_ms())),
                (None, _) => {}
            }
            flush(&mut c);
        }

        let result = (c.score(), c.session().tier());
        c.restart();
        flush(&mut c);
        result
    }

    fn flush(c: &mut SessionController<CommandLog>) {
        for cmd in c.presentation_mut().drain() {
            print_command(&cmd);
        }
    }

    fn print_command(cmd: &Command) {
        match serde_json::to_string(cmd) {
            Ok(line) => println!("{}", line),
            Err(e) => log::warn!("Could not encode {:?}: {}", cmd, e),
        }
    }
}

#[cfg(all(test, not(target_arch = "wasm32")))]
mod tests {
    use super::headless;
    use reflex_dot::Tier;

    #[test]
    fn test_quick_bot_scores() {
        let (score, tier) = headless::play(7, 0);
        assert!(score >= 20, "score was {}", score);
        assert_eq!(tier, Tier::NotBad);
    }

    #[test]
    fn test_slow_bot_scores_nothing() {
        let (score, tier) = headless::play(7, 60_000);
        assert_eq!(score, 0);
        assert_eq!(tier, Tier::CouldBeBetter);
    }
}
