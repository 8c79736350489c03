//! Basket Catcher entry point
//!
//! Handles platform-specific initialization and runs the game loop.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use web_sys::{Document, HtmlCanvasElement, HtmlInputElement};

    use basket_catcher::Settings;
    use basket_catcher::audio::{AudioManager, SoundEffect};
    use basket_catcher::consts::*;
    use basket_catcher::highscores::{HighScores, ScoreEntry};
    use basket_catcher::render::CanvasRenderer;
    use basket_catcher::sim::{
        FixedStep, GameEvent, GameOverCause, GamePhase, GameState, TickInput, tick,
    };
    use basket_catcher::sprites::SpriteAtlas;

    /// Game instance holding all state
    struct Game {
        state: GameState,
        renderer: Option<CanvasRenderer>,
        audio: AudioManager,
        scores: HighScores,
        settings: Settings,
        stepper: FixedStep,
        input: TickInput,
        player_name: String,
        last_time: f64,
        // FPS tracking
        frame_times: [f64; 60],
        frame_index: usize,
        fps: u32,
    }

    impl Game {
        fn new(seed: u64, settings: Settings, scores: HighScores) -> Self {
            let mut audio = AudioManager::new();
            audio.apply_settings(&settings);
            Self {
                state: GameState::new(seed),
                renderer: None,
                audio,
                scores,
                settings,
                stepper: FixedStep::new(),
                input: TickInput::default(),
                player_name: "Anonymous".to_string(),
                last_time: 0.0,
                frame_times: [0.0; 60],
                frame_index: 0,
                fps: 0,
            }
        }

        /// Run simulation ticks for one frame
        fn update(&mut self, dt: f32) {
            let steps = self.stepper.advance(dt);
            for _ in 0..steps {
                let input = self.input.clone();
                tick(&mut self.state, &input, SIM_DT);

                // Clear one-shot inputs after processing
                self.input.start = false;
                self.input.pause = false;
            }

            let events = self.state.drain_events();
            if !events.is_empty() {
                self.handle_events(&events);
            }
        }

        /// Map queued simulation events onto sounds and screens
        fn handle_events(&mut self, events: &[GameEvent]) {
            let Some(document) = web_sys::window().and_then(|w| w.document()) else {
                return;
            };

            for event in events {
                match event {
                    GameEvent::Started | GameEvent::Resumed => self.audio.start_music(),
                    GameEvent::Paused => self.audio.stop_music(),
                    GameEvent::Collected { .. } => self.audio.play(SoundEffect::Collect),
                    GameEvent::LevelUp { level } => {
                        self.audio.play(SoundEffect::LevelUp);
                        if !self.settings.reduced_motion {
                            show_level_up_banner(&document, *level);
                        }
                    }
                    GameEvent::GameOver { score, level, cause } => {
                        self.audio.stop_music();
                        match cause {
                            GameOverCause::BombCaught => self.audio.play(SoundEffect::Bomb),
                            GameOverCause::FruitMissed => self.audio.play(SoundEffect::GameOver),
                        }
                        if self.scores.qualifies(*score) {
                            self.audio.play(SoundEffect::HighScore);
                        }
                        self.scores.record(ScoreEntry {
                            name: self.player_name.clone(),
                            score: *score,
                            level: *level,
                        });
                        update_scoreboard(&document, &self.scores);
                        show_game_over_screen(&document, *score, cause.message());
                    }
                }
            }
        }

        /// Render the current frame
        fn render(&self) {
            if let Some(renderer) = &self.renderer {
                if let Err(err) = renderer.render(&self.state, self.fps, self.settings.show_fps) {
                    log::warn!("Render error: {err:?}");
                }
            }
        }

        fn track_fps(&mut self, time: f64) {
            self.frame_times[self.frame_index] = time;
            self.frame_index = (self.frame_index + 1) % 60;

            let oldest = self.frame_times[self.frame_index];
            if oldest > 0.0 {
                let elapsed = time - oldest;
                if elapsed > 0.0 {
                    self.fps = (60_000.0 / elapsed).round() as u32;
                }
            }
        }

        /// Full reset to a fresh session
        fn restart(&mut self, seed: u64) {
            self.state = GameState::new(seed);
            self.stepper.reset();
            self.input = TickInput::default();
            log::info!("Game restarted with seed: {seed}");
        }
    }

    /// Toggle one of the stacked screens by id
    fn set_hidden(document: &Document, id: &str, hidden: bool) {
        if let Some(el) = document.get_element_by_id(id) {
            let _ = el.set_attribute("class", if hidden { "screen hidden" } else { "screen" });
        }
    }

    fn show_game_over_screen(document: &Document, score: u32, message: &str) {
        set_hidden(document, "game-screen", true);
        set_hidden(document, "game-over-screen", false);
        if let Some(el) = document.get_element_by_id("final-score") {
            el.set_text_content(Some(&score.to_string()));
        }
        if let Some(el) = document.get_element_by_id("game-over-message") {
            el.set_text_content(Some(message));
        }
    }

    /// Transient "Level N!" banner; a fire-once timer removes it and
    /// touches nothing else
    fn show_level_up_banner(document: &Document, level: u32) {
        let Some(screen) = document.get_element_by_id("game-screen") else {
            return;
        };
        let Ok(banner) = document.create_element("div") else {
            return;
        };
        banner.set_class_name("level-up-message");
        banner.set_text_content(Some(&format!("Level {level}!")));
        if screen.append_child(&banner).is_err() {
            return;
        }

        let closure = Closure::once(move || {
            banner.remove();
        });
        if let Some(window) = web_sys::window() {
            let _ = window.set_timeout_with_callback_and_timeout_and_arguments_0(
                closure.as_ref().unchecked_ref(),
                2000,
            );
        }
        closure.forget();
    }

    /// Rebuild the scoreboard list from the ordered entries
    fn update_scoreboard(document: &Document, scores: &HighScores) {
        let Some(list) = document.get_element_by_id("scores-list") else {
            return;
        };
        list.set_inner_html("");

        for (index, entry) in scores.entries().iter().enumerate() {
            let Ok(item) = document.create_element("div") else {
                continue;
            };
            item.set_class_name(if index == 0 {
                "score-item latest"
            } else {
                "score-item"
            });

            let Ok(info) = document.create_element("div") else {
                continue;
            };
            info.set_class_name("score-info");
            for (class, text) in [
                ("rank", format!("#{}", index + 1)),
                ("name", entry.name.clone()),
                ("level", format!("Lvl {}", entry.level)),
            ] {
                if let Ok(span) = document.create_element("span") {
                    span.set_class_name(class);
                    span.set_text_content(Some(&text));
                    let _ = info.append_child(&span);
                }
            }
            let _ = item.append_child(&info);

            if let Ok(score_span) = document.create_element("span") {
                score_span.set_class_name("score");
                score_span.set_text_content(Some(&entry.score.to_string()));
                let _ = item.append_child(&score_span);
            }

            let _ = list.append_child(&item);
        }
    }

    pub fn run() {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info).expect("Failed to init logger");

        log::info!("Basket Catcher starting...");

        let window = web_sys::window().expect("no window");
        let document = window.document().expect("no document");

        let canvas: HtmlCanvasElement = document
            .get_element_by_id("gameCanvas")
            .expect("no canvas")
            .dyn_into()
            .expect("not a canvas");
        canvas.set_width(FIELD_WIDTH as u32);
        canvas.set_height(FIELD_HEIGHT as u32);

        let settings = Settings::load();
        let scores = HighScores::load();
        let seed = js_sys::Date::now() as u64;

        let atlas = SpriteAtlas::generate(seed, settings.quality);
        let renderer = match CanvasRenderer::new(&document, &canvas, &atlas) {
            Ok(renderer) => Some(renderer),
            Err(err) => {
                log::error!("Renderer init failed: {err:?}");
                None
            }
        };

        let game = Rc::new(RefCell::new(Game::new(seed, settings, scores)));
        game.borrow_mut().renderer = renderer;

        log::info!("Game initialized with seed: {seed}");

        update_scoreboard(&document, &game.borrow().scores);

        setup_input_handlers(game.clone());
        setup_buttons(game.clone());
        setup_auto_pause(game.clone());

        request_animation_frame(game);

        log::info!("Basket Catcher running!");
    }

    fn setup_input_handlers(game: Rc<RefCell<Game>>) {
        let window = web_sys::window().expect("no window");

        // Keyboard state is captured here and polled by the sim each tick
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: web_sys::KeyboardEvent| {
                let mut g = game.borrow_mut();
                match event.key().as_str() {
                    "ArrowLeft" | "a" | "A" => g.input.move_left = true,
                    "ArrowRight" | "d" | "D" => g.input.move_right = true,
                    "Escape" | "p" | "P" => g.input.pause = true,
                    "i" | "I" => {
                        g.input.autopilot = !g.input.autopilot;
                        log::info!("Autopilot: {}", g.input.autopilot);
                    }
                    _ => {}
                }
            });
            let _ = window
                .add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: web_sys::KeyboardEvent| {
                let mut g = game.borrow_mut();
                match event.key().as_str() {
                    "ArrowLeft" | "a" | "A" => g.input.move_left = false,
                    "ArrowRight" | "d" | "D" => g.input.move_right = false,
                    _ => {}
                }
            });
            let _ =
                window.add_event_listener_with_callback("keyup", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn setup_buttons(game: Rc<RefCell<Game>>) {
        let window = web_sys::window().expect("no window");
        let document = window.document().expect("no document");

        if let Some(btn) = document.get_element_by_id("start-button") {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::MouseEvent| {
                let Some(document) = web_sys::window().and_then(|w| w.document()) else {
                    return;
                };
                let name = document
                    .get_element_by_id("player-name")
                    .and_then(|el| el.dyn_into::<HtmlInputElement>().ok())
                    .map(|input| input.value().trim().to_string())
                    .filter(|name| !name.is_empty())
                    .unwrap_or_else(|| "Anonymous".to_string());

                let mut g = game.borrow_mut();
                g.player_name = name;
                g.input.start = true;
                g.audio.resume();

                set_hidden(&document, "start-screen", true);
                set_hidden(&document, "game-over-screen", true);
                set_hidden(&document, "game-screen", false);
                log::info!("Starting session as {}", g.player_name);
            });
            let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        if let Some(btn) = document.get_element_by_id("pause-button") {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::MouseEvent| {
                game.borrow_mut().input.pause = true;
            });
            let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        if let Some(btn) = document.get_element_by_id("restart-button") {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::MouseEvent| {
                let Some(document) = web_sys::window().and_then(|w| w.document()) else {
                    return;
                };
                let seed = js_sys::Date::now() as u64;
                let mut g = game.borrow_mut();
                g.restart(seed);
                g.input.start = true;

                set_hidden(&document, "game-over-screen", true);
                set_hidden(&document, "game-screen", false);
            });
            let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn setup_auto_pause(game: Rc<RefCell<Game>>) {
        let window = web_sys::window().expect("no window");
        let document = window.document().expect("no document");

        // Tab hidden: pause the sim
        {
            let game = game.clone();
            let document_clone = document.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
                if document_clone.visibility_state() == web_sys::VisibilityState::Hidden {
                    let mut g = game.borrow_mut();
                    if g.state.phase == GamePhase::Running {
                        g.input.pause = true;
                        log::info!("Auto-paused (tab hidden)");
                    }
                }
            });
            let _ = document.add_event_listener_with_callback(
                "visibilitychange",
                closure.as_ref().unchecked_ref(),
            );
            closure.forget();
        }

        // Window blur/focus: mute per preference
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::FocusEvent| {
                let mut g = game.borrow_mut();
                if g.settings.mute_on_blur {
                    g.audio.set_muted(true);
                }
            });
            let _ =
                window.add_event_listener_with_callback("blur", closure.as_ref().unchecked_ref());
            closure.forget();
        }
        {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::FocusEvent| {
                game.borrow_mut().audio.set_muted(false);
            });
            let _ =
                window.add_event_listener_with_callback("focus", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn request_animation_frame(game: Rc<RefCell<Game>>) {
        let window = web_sys::window().expect("no window");
        let closure = Closure::once(move |time: f64| {
            game_loop(game, time);
        });
        let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn game_loop(game: Rc<RefCell<Game>>, time: f64) {
        {
            let mut g = game.borrow_mut();

            let dt = if g.last_time > 0.0 {
                ((time - g.last_time) / 1000.0) as f32
            } else {
                SIM_DT
            };
            g.last_time = time;

            g.update(dt);
            g.track_fps(time);
            g.render();
        }

        request_animation_frame(game);
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() {
    wasm_game::run();
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use basket_catcher::consts::*;
    use basket_catcher::sim::{GamePhase, GameState, TickInput, tick};

    env_logger::init();
    log::info!("Basket Catcher (native) starting...");

    // Headless demo: the autopilot plays until it slips up or time runs out
    let seed = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(1);
    let mut state = GameState::new(seed);
    let mut input = TickInput {
        start: true,
        autopilot: true,
        ..TickInput::default()
    };

    let max_ticks = 60 * 120;
    for _ in 0..max_ticks {
        tick(&mut state, &input, SIM_DT);
        input.start = false;
        state.drain_events();
        if state.phase == GamePhase::GameOver {
            break;
        }
    }

    println!(
        "Demo run (seed {seed}): score {}, level {}, {} ticks",
        state.score, state.level, state.time_ticks
    );
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}
