//! Yoru Survivor entry point
//!
//! Handles platform-specific initialization and runs the game loop.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;
#[cfg(not(target_arch = "wasm32"))]
use yoru_survivor::Tuning;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use web_sys::{Document, KeyboardEvent};

    use yoru_survivor::consts::MAX_FRAME_DELTA_MS;
    use yoru_survivor::input::InputState;
    use yoru_survivor::platform::LocalStorage;
    use yoru_survivor::profile::{ProfileStore, UpgradeKind};
    use yoru_survivor::session::{Screen, Session};
    use yoru_survivor::sim::{RunPhase, TickInput, UpgradeChoice};
    use yoru_survivor::tuning::Tuning;

    /// Game instance holding all state
    struct Game {
        session: Session<LocalStorage>,
        input: InputState,
        /// One-shot commands collected between frames
        commands: TickInput,
        last_time: f64,
        shop_message: String,
    }

    impl Game {
        fn new() -> Self {
            let profile = ProfileStore::load(LocalStorage::new());
            Self {
                session: Session::new(profile, Tuning::default()),
                input: InputState::default(),
                commands: TickInput::default(),
                last_time: 0.0,
                shop_message: String::new(),
            }
        }

        fn run_phase(&self) -> Option<RunPhase> {
            self.session.run().map(|run| run.phase)
        }

        fn update(&mut self, dt_ms: f32) {
            let mut input = std::mem::take(&mut self.commands);
            input.direction = self.input.direction();
            let (_, events) = self.session.update(&input, dt_ms);
            for event in &events {
                log::debug!("{:?}", event);
            }
        }

        fn on_key_down(&mut self, key: &str) {
            if self.input.set_key(key, true) {
                return;
            }
            match (self.session.screen(), key) {
                (Screen::Title, "Enter") => {
                    let seed = js_sys::Date::now() as u64;
                    self.session.start_run(seed);
                }
                (Screen::Title, "u" | "U") => {
                    self.session.open_shop();
                    self.shop_message.clear();
                }
                (Screen::Shop, "1" | "2" | "3") => {
                    let slot = key.parse::<usize>().unwrap_or(1) - 1;
                    let outcome = self.session.buy(UpgradeKind::ALL[slot]);
                    self.shop_message = outcome.message();
                }
                (Screen::Shop, "Escape") => self.session.close_shop(),
                (Screen::Run, "Escape" | "p" | "P") => {
                    if self.run_phase() == Some(RunPhase::PausedByUser) {
                        self.commands.resume = true;
                    } else {
                        self.commands.pause = true;
                    }
                }
                (Screen::Run, "1" | "2" | "3") => {
                    let slot = key.parse::<usize>().unwrap_or(1);
                    self.commands.upgrade = UpgradeChoice::from_slot(slot);
                }
                (Screen::Run, "t" | "T") => self.commands.return_to_title = true,
                _ => {}
            }
        }

        fn auto_pause(&mut self, reason: &str) {
            self.input.clear();
            if self.run_phase() == Some(RunPhase::Running) {
                self.commands.pause = true;
                log::info!("Auto-paused ({})", reason);
            }
        }

        fn update_hud(&self, document: &Document) {
            let screen = self.session.screen();
            set_visible(document, "title-screen", screen == Screen::Title);
            set_visible(document, "shop-screen", screen == Screen::Shop);
            set_visible(document, "hud", screen == Screen::Run);

            match screen {
                Screen::Title => {
                    let coins = self.session.profile().profile().total_coins;
                    set_text(document, "title-coins", &coins.to_string());
                    if let Some(summary) = self.session.last_summary() {
                        set_text(
                            document,
                            "run-reward",
                            &format!("+{} coins", summary.coins_earned),
                        );
                    }
                    set_visible(document, "run-reward", self.session.last_summary().is_some());
                }
                Screen::Shop => {
                    let profile = self.session.profile().profile();
                    set_text(document, "shop-coins", &profile.total_coins.to_string());
                    for kind in UpgradeKind::ALL {
                        let level = profile.level(kind);
                        set_text(
                            document,
                            &format!("shop-{}-level", kind.as_str()),
                            &level.to_string(),
                        );
                        set_text(
                            document,
                            &format!("shop-{}-cost", kind.as_str()),
                            &profile.next_upgrade_cost(kind).to_string(),
                        );
                    }
                    set_text(document, "shop-message", &self.shop_message);
                }
                Screen::Run => {
                    let hud = &self.session.hud;
                    set_text(document, "hud-timer", &hud.timer_text());
                    set_text(document, "hud-kills", &hud.kills_text());
                    set_text(document, "hud-level", &hud.level_text());
                    set_width(document, "hud-hp-fill", hud.health_fraction());
                    set_width(document, "hud-exp-fill", hud.experience_fraction());
                    set_visible(document, "level-up", hud.level_up_prompt_visible);
                    set_visible(document, "pause-menu", hud.paused);
                    set_visible(document, "game-over", hud.game_over);
                    if hud.game_over {
                        set_text(document, "final-kills", &hud.kill_count.to_string());
                        set_text(document, "final-time", &hud.timer_text());
                    }
                }
            }
        }
    }

    fn set_text(document: &Document, id: &str, text: &str) {
        if let Some(el) = document.get_element_by_id(id) {
            el.set_text_content(Some(text));
        }
    }

    fn set_visible(document: &Document, id: &str, visible: bool) {
        if let Some(el) = document.get_element_by_id(id) {
            let _ = el.set_attribute("class", if visible { "" } else { "hidden" });
        }
    }

    fn set_width(document: &Document, id: &str, fraction: f32) {
        if let Some(el) = document.get_element_by_id(id) {
            let _ = el.set_attribute("style", &format!("width: {:.1}%", fraction * 100.0));
        }
    }

    pub fn run() {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info).expect("Failed to init logger");

        log::info!("Yoru Survivor starting...");

        let window = web_sys::window().expect("no window");
        let document = window.document().expect("no document");

        if let Some(loading) = document.get_element_by_id("loading") {
            let _ = loading.set_attribute("class", "hidden");
        }

        let game = Rc::new(RefCell::new(Game::new()));

        setup_input_handlers(game.clone());
        setup_auto_pause(game.clone());

        request_animation_frame(game);

        log::info!("Yoru Survivor running!");
    }

    fn setup_input_handlers(game: Rc<RefCell<Game>>) {
        let window = web_sys::window().unwrap();

        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                if event.repeat() {
                    return;
                }
                game.borrow_mut().on_key_down(&event.key());
            });
            let _ = window
                .add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        {
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                game.borrow_mut().input.set_key(&event.key(), false);
            });
            let _ = window
                .add_event_listener_with_callback("keyup", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn request_animation_frame(game: Rc<RefCell<Game>>) {
        let window = web_sys::window().unwrap();
        let closure = Closure::once(move |time: f64| {
            game_loop(game, time);
        });
        let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn game_loop(game: Rc<RefCell<Game>>, time: f64) {
        {
            let mut g = game.borrow_mut();

            let dt_ms = if g.last_time > 0.0 {
                ((time - g.last_time) as f32).min(MAX_FRAME_DELTA_MS)
            } else {
                0.0
            };
            g.last_time = time;

            g.update(dt_ms);
            if let Some(document) = web_sys::window().and_then(|w| w.document()) {
                g.update_hud(&document);
            }
        }

        request_animation_frame(game);
    }

    fn setup_auto_pause(game: Rc<RefCell<Game>>) {
        let window = web_sys::window().unwrap();
        let document = window.document().unwrap();

        // Tab switch, minimize
        {
            let game = game.clone();
            let document_clone = document.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
                if document_clone.visibility_state() == web_sys::VisibilityState::Hidden {
                    game.borrow_mut().auto_pause("tab hidden");
                }
            });
            let _ = document.add_event_listener_with_callback(
                "visibilitychange",
                closure.as_ref().unchecked_ref(),
            );
            closure.forget();
        }

        // Click outside
        {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::FocusEvent| {
                game.borrow_mut().auto_pause("window blur");
            });
            let _ = window.add_event_listener_with_callback("blur", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() {
    wasm_game::run();
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Yoru Survivor (native) starting...");
    log::info!("Native mode runs a headless demo - run with `trunk serve` for the web version");

    let tuning = match std::env::args().nth(1) {
        Some(path) => load_tuning(&path),
        None => Tuning::default(),
    };
    headless_demo(42, tuning);
}

/// Read a JSON balance override, falling back to defaults on any failure
#[cfg(not(target_arch = "wasm32"))]
fn load_tuning(path: &str) -> Tuning {
    let json = match std::fs::read_to_string(path) {
        Ok(json) => json,
        Err(e) => {
            log::warn!("Failed to read tuning file {}: {}", path, e);
            return Tuning::default();
        }
    };
    match Tuning::from_json(&json) {
        Ok(tuning) => {
            log::info!("Loaded tuning override from {}", path);
            tuning
        }
        Err(e) => {
            log::warn!("Ignoring tuning file {}: {}", path, e);
            Tuning::default()
        }
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

/// Play one run with a circling autopilot and report the payout
#[cfg(not(target_arch = "wasm32"))]
fn headless_demo(seed: u64, tuning: Tuning) {
    use glam::Vec2;
    use yoru_survivor::platform::MemoryStorage;
    use yoru_survivor::sim::{RunPhase, TickInput, UpgradeChoice};
    use yoru_survivor::{ProfileStore, Session};

    const FRAME_MS: f32 = 1000.0 / 60.0;
    const MAX_RUN_MS: f64 = 180_000.0;

    let mut session = Session::new(ProfileStore::load(MemoryStorage::new()), tuning);
    session.start_run(seed);

    let mut choices = UpgradeChoice::ALL.iter().copied().cycle();
    loop {
        let Some(run) = session.run() else {
            break;
        };
        if run.phase == RunPhase::GameOver || run.stats.elapsed_ms >= MAX_RUN_MS {
            break;
        }

        let mut input = TickInput {
            direction: Vec2::from_angle(run.stats.elapsed_ms as f32 / 2000.0),
            ..Default::default()
        };
        if run.phase == RunPhase::PausedForLevelUp {
            input.upgrade = choices.next();
        }
        session.update(&input, FRAME_MS);
    }

    session.return_to_title();
    match session.last_summary() {
        Some(summary) => log::info!(
            "Demo run over: {} kills, level {}, {:.1}s, +{} coins ({} total)",
            summary.kill_count,
            summary.level,
            summary.elapsed_ms / 1000.0,
            summary.coins_earned,
            session.profile().profile().total_coins
        ),
        None => log::warn!("Demo run produced no summary"),
    }
}
