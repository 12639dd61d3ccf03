//! Dot Arena entry point
//!
//! Handles platform-specific initialization and runs the game loop.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, HtmlImageElement};

    use dot_arena::audio::AudioManager;
    use dot_arena::consts::*;
    use dot_arena::platform::apply_key;
    use dot_arena::renderer::{CanvasPainter, RenderOptions, build_frame};
    use dot_arena::sim::{Arena, GamePhase, GameState, TickInput, tick};
    use dot_arena::{SaveSlots, Settings};

    /// Slot used by the quick-save/quick-load keys
    const QUICK_SLOT: &str = "quick";

    /// Game instance holding all state
    struct Game {
        state: GameState,
        painter: Option<CanvasPainter>,
        audio: AudioManager,
        settings: Settings,
        saves: SaveSlots,
        accumulator: f32,
        last_time: f64,
        input: TickInput,
        // Track collected count for the HUD
        shown_collected: Option<u32>,
    }

    impl Game {
        fn new(seed: u64, settings: Settings) -> Self {
            let mut state = GameState::with_rules(seed, Arena::default(), settings.rules());
            state.equip_kind(settings.starting_weapon);

            let mut audio = AudioManager::new();
            audio.set_master_volume(settings.master_volume);
            audio.set_sfx_volume(settings.sfx_volume);

            Self {
                state,
                painter: None,
                audio,
                settings,
                saves: SaveSlots::read_storage(),
                accumulator: 0.0,
                last_time: 0.0,
                input: TickInput::default(),
                shown_collected: None,
            }
        }

        /// Run simulation ticks
        fn update(&mut self, dt: f32) {
            let dt = dt.min(0.1);
            self.accumulator += dt;

            let mut substeps = 0;
            while self.accumulator >= SIM_DT && substeps < MAX_SUBSTEPS {
                tick(&mut self.state, &self.input);
                self.accumulator -= SIM_DT;
                substeps += 1;

                // Clear one-shot inputs after processing
                self.input.clear_one_shots();
            }
            if substeps == MAX_SUBSTEPS {
                self.accumulator = 0.0;
            }

            let events = self.state.drain_events();
            self.audio.play_events(&events);
        }

        /// Render the current frame
        fn render(&mut self) {
            let Some(painter) = &self.painter else { return };
            let options = RenderOptions {
                debug_hitboxes: self.settings.debug_hitboxes,
            };
            painter.paint(&build_frame(&self.state, &options));
        }

        /// Update HUD elements in DOM
        fn update_hud(&mut self) {
            let Some(document) = web_sys::window().and_then(|w| w.document()) else {
                return;
            };

            if self.shown_collected != Some(self.state.collected) {
                if let Some(el) = document.get_element_by_id("dot-counter") {
                    el.set_text_content(Some(&format!(
                        "Dots Collected: {}",
                        self.state.collected
                    )));
                }
                self.shown_collected = Some(self.state.collected);
            }

            for (id, visible) in [
                ("pause-menu", self.state.phase == GamePhase::Paused),
                ("game-over-screen", self.state.phase == GamePhase::GameOver),
            ] {
                if let Some(el) = document.get_element_by_id(id) {
                    let class = if visible { "" } else { "hidden" };
                    let _ = el.set_attribute("class", class);
                }
            }
        }

        fn quick_save(&mut self) {
            self.saves.save(QUICK_SLOT, &self.state);
            self.saves.write_storage();
        }

        fn quick_load(&mut self) {
            if let Err(e) = self.saves.load(QUICK_SLOT, &mut self.state) {
                log::warn!("Quick load failed: {}", e);
            }
        }
    }

    pub fn run() {
        console_error_panic_hook::set_once();
        if console_log::init_with_level(log::Level::Info).is_err() {
            web_sys::console::warn_1(&"Logger already initialized".into());
        }

        log::info!("Dot Arena starting...");

        let Some(document) = web_sys::window().and_then(|w| w.document()) else {
            log::error!("No document - cannot start");
            return;
        };

        let seed = js_sys::Date::now() as u64;
        let settings = Settings::load();
        // Write back so the stored copy picks up fields added since it was saved
        settings.save();
        let game = Rc::new(RefCell::new(Game::new(seed, settings)));
        log::info!("Game initialized with seed: {}", seed);

        match create_painter(&document) {
            Some(painter) => game.borrow_mut().painter = Some(painter),
            None => log::warn!("Canvas unavailable - running without rendering"),
        }

        setup_input_handlers(game.clone());
        setup_auto_pause(game.clone());

        // Start game loop
        request_animation_frame(game);
        log::info!("Dot Arena running!");
    }

    fn create_painter(document: &web_sys::Document) -> Option<CanvasPainter> {
        let canvas: HtmlCanvasElement = document
            .get_element_by_id("gameCanvas")?
            .dyn_into()
            .ok()?;
        canvas.set_width(ARENA_WIDTH as u32);
        canvas.set_height(ARENA_HEIGHT as u32);

        let ctx: CanvasRenderingContext2d = canvas.get_context("2d").ok()??.dyn_into().ok()?;

        let sprite_sheet = HtmlImageElement::new().ok()?;
        sprite_sheet.set_src("images/ex_player_ss_v2.png");

        Some(CanvasPainter::new(
            ctx,
            sprite_sheet,
            (ARENA_WIDTH as f64, ARENA_HEIGHT as f64),
        ))
    }

    fn setup_input_handlers(game: Rc<RefCell<Game>>) {
        let Some(window) = web_sys::window() else { return };

        // Key down
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: web_sys::KeyboardEvent| {
                let mut g = game.borrow_mut();
                g.audio.resume();
                match event.key().as_str() {
                    "F5" => {
                        event.prevent_default();
                        g.quick_save();
                    }
                    "F9" => {
                        event.prevent_default();
                        g.quick_load();
                    }
                    key => {
                        if apply_key(&mut g.input, key, true) {
                            event.prevent_default();
                        }
                    }
                }
            });
            let _ = window
                .add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Key up
        {
            let closure = Closure::<dyn FnMut(_)>::new(move |event: web_sys::KeyboardEvent| {
                let mut g = game.borrow_mut();
                apply_key(&mut g.input, &event.key(), false);
            });
            let _ = window
                .add_event_listener_with_callback("keyup", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn request_animation_frame(game: Rc<RefCell<Game>>) {
        let Some(window) = web_sys::window() else { return };
        let closure = Closure::once(move |time: f64| {
            game_loop(game, time);
        });
        let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn game_loop(game: Rc<RefCell<Game>>, time: f64) {
        {
            let mut g = game.borrow_mut();

            // Calculate delta time
            let dt = if g.last_time > 0.0 {
                ((time - g.last_time) / 1000.0) as f32
            } else {
                SIM_DT
            };
            g.last_time = time;

            g.update(dt);
            g.render();
            g.update_hud();
        }

        request_animation_frame(game);
    }

    fn setup_auto_pause(game: Rc<RefCell<Game>>) {
        let Some(window) = web_sys::window() else { return };

        // Window blur (tab switch, click outside)
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
                let mut g = game.borrow_mut();
                // Keys released while unfocused never reach us
                g.input.keys = Default::default();
                if g.settings.mute_on_blur {
                    g.audio.set_muted(true);
                }
                if g.state.phase == GamePhase::Playing {
                    g.input.pause = true;
                    log::info!("Auto-paused (window blur)");
                }
            });
            let _ =
                window.add_event_listener_with_callback("blur", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Focus restores sound but leaves the game paused
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
            game.borrow_mut().audio.set_muted(false);
        });
        let _ = window.add_event_listener_with_callback("focus", closure.as_ref().unchecked_ref());
        closure.forget();
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

/// Headless run: a scripted player sweeps the arena swinging a broadsword
#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use dot_arena::sim::{GameState, KeyState, TickInput, WeaponKind, tick};

    env_logger::init();
    log::info!("Dot Arena (native) starting...");
    log::info!("Native mode runs headless - serve the wasm build for the playable version");

    let seed = std::env::args()
        .nth(1)
        .and_then(|s| s.parse().ok())
        .unwrap_or(2024);
    let mut state = GameState::new(seed);

    // Ten simulated seconds at 60 Hz
    for t in 0..600u32 {
        // Change direction every second: left, up, right, down
        let mut keys = KeyState::default();
        match (t / 60) % 4 {
            0 => keys.left = true,
            1 => keys.up = true,
            2 => keys.right = true,
            _ => keys.down = true,
        }
        let input = TickInput {
            keys,
            attack: t % 15 == 0,
            equip: (t == 0).then_some(WeaponKind::Broadsword),
            ..Default::default()
        };
        tick(&mut state, &input);
        for event in state.drain_events() {
            log::debug!("tick {}: {:?}", state.time_ticks, event);
        }
    }

    println!(
        "seed {}: stage {}, {} dots collected, {} left, player at ({}, {})",
        seed,
        state.stage_index,
        state.collected,
        state.enemies.len(),
        state.player.pos.x,
        state.player.pos.y
    );
}
