//! Star Seeker entry point
//!
//! Handles platform-specific initialization and runs the game loop.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use web_sys::{HtmlCanvasElement, KeyboardEvent, MouseEvent};

    use star_seeker::platform::web::WebStage;
    use star_seeker::platform::{Stage, handle_events, present};
    use star_seeker::renderer::SdfRenderState;
    use star_seeker::sim::{GameState, TickInput, tick};
    use star_seeker::{Settings, Tuning};

    /// Game instance holding all state
    struct Game {
        state: GameState,
        settings: Settings,
        stage: WebStage,
        autopilot: bool,
        pointer_locked: bool,
    }

    impl Game {
        fn new(seed: u64, settings: Settings) -> Self {
            let mut game = Self {
                state: GameState::new(seed, Tuning::default(), settings.level),
                settings,
                stage: WebStage::new(),
                autopilot: false,
                pointer_locked: false,
            };
            // Present the first level before the loop starts
            game.flush_events();
            game
        }

        fn flush_events(&mut self) {
            let events = self.state.drain_events();
            handle_events(&events, &self.state, &mut self.stage);
        }

        /// One simulation tick per displayed frame
        fn frame(&mut self, time: f64) {
            let input = TickInput {
                now_ms: time,
                autopilot: self.autopilot,
            };
            tick(&mut self.state, &input);
            self.flush_events();

            self.stage.set_time(time);
            present(&self.state, &self.settings, &mut self.stage);
        }

        /// First user gesture: audio needs it, pointer lock needs it
        fn start_audio(&mut self) {
            if self.stage.audio_playing() {
                return;
            }
            if let Err(e) = self.stage.play_ambient_audio() {
                log::error!("Error playing background music: {}", e);
            }
        }
    }

    pub async fn run() {
        console_error_panic_hook::set_once();
        if let Err(e) = console_log::init_with_level(log::Level::Info) {
            web_sys::console::error_1(&format!("Failed to init logger: {}", e).into());
        }

        log::info!("Star Seeker starting...");

        let Some(window) = web_sys::window() else {
            log::error!("No window");
            return;
        };
        let Some(document) = window.document() else {
            log::error!("No document");
            return;
        };

        // Hide loading indicator
        if let Some(loading) = document.get_element_by_id("loading") {
            let _ = loading.set_attribute("class", "hidden");
        }

        let Some(canvas) = document
            .get_element_by_id("canvas")
            .and_then(|el| el.dyn_into::<HtmlCanvasElement>().ok())
        else {
            log::error!("No #canvas element");
            return;
        };

        let (width, height) = fit_canvas(&window, &canvas);

        // Initialize game
        let settings = Settings::load();
        let seed = settings.seed.unwrap_or(js_sys::Date::now() as u64);
        let game = Rc::new(RefCell::new(Game::new(seed, settings)));

        log::info!("Game initialized with seed: {}", seed);

        // Initialize WebGPU
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::BROWSER_WEBGPU | wgpu::Backends::GL,
            ..Default::default()
        });

        match instance.create_surface(wgpu::SurfaceTarget::Canvas(canvas.clone())) {
            Ok(surface) => {
                let adapter = instance
                    .request_adapter(&wgpu::RequestAdapterOptions {
                        power_preference: wgpu::PowerPreference::HighPerformance,
                        compatible_surface: Some(&surface),
                        force_fallback_adapter: false,
                    })
                    .await;
                match adapter {
                    Ok(adapter) => {
                        log::info!("Using adapter: {:?}", adapter.get_info().name);
                        match SdfRenderState::new(surface, &adapter, width, height).await {
                            Ok(mut render_state) => {
                                render_state.set_start_time(js_sys::Date::now());
                                game.borrow_mut().stage.render_state = Some(render_state);
                            }
                            Err(e) => log::error!("Failed to create device: {}", e),
                        }
                    }
                    Err(e) => log::error!("Failed to get adapter: {}", e),
                }
            }
            // Gameplay and audio keep running without a scene
            Err(e) => log::error!("Failed to create surface: {}", e),
        }

        setup_input_handlers(&canvas, game.clone());
        setup_resize(&canvas, game.clone());

        // Start game loop
        request_animation_frame(game);

        log::info!("Star Seeker running!");
    }

    /// Size the backing store to the CSS size times the device pixel ratio
    fn fit_canvas(window: &web_sys::Window, canvas: &HtmlCanvasElement) -> (u32, u32) {
        let dpr = window.device_pixel_ratio();
        let width = (canvas.client_width() as f64 * dpr) as u32;
        let height = (canvas.client_height() as f64 * dpr) as u32;
        canvas.set_width(width);
        canvas.set_height(height);
        (width, height)
    }

    fn setup_input_handlers(canvas: &HtmlCanvasElement, game: Rc<RefCell<Game>>) {
        let Some(window) = web_sys::window() else { return };
        let Some(document) = window.document() else { return };

        // Pointer lock change: losing capture zeroes the stick
        {
            let game = game.clone();
            let doc = document.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
                let locked = doc.pointer_lock_element().is_some();
                if locked {
                    log::info!("Pointer lock acquired");
                } else {
                    log::info!("Pointer lock released");
                }
                let mut g = game.borrow_mut();
                g.pointer_locked = locked;
                g.state.input.capture_changed(locked);
            });
            let _ = document.add_event_listener_with_callback(
                "pointerlockchange",
                closure.as_ref().unchecked_ref(),
            );
            closure.forget();
        }

        // Pointer lock error handler
        {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
                log::error!("Pointer lock error!");
            });
            let _ = document.add_event_listener_with_callback(
                "pointerlockerror",
                closure.as_ref().unchecked_ref(),
            );
            closure.forget();
        }

        // Mouse move - relative deltas drive the virtual stick
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: MouseEvent| {
                let mut g = game.borrow_mut();
                let g = &mut *g;
                g.state.input.pointer_moved(
                    event.movement_x() as f32,
                    event.movement_y() as f32,
                    &g.state.tuning,
                );
            });
            let _ = document
                .add_event_listener_with_callback("mousemove", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Click - start audio and request pointer lock
        {
            let game = game.clone();
            let canvas_clone = canvas.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
                let mut g = game.borrow_mut();
                g.start_audio();
                if !g.pointer_locked {
                    drop(g);
                    canvas_clone.request_pointer_lock();
                }
            });
            let _ = canvas
                .add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Keyboard
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                let mut g = game.borrow_mut();
                let key = event.key();
                match key.as_str() {
                    "i" | "I" => {
                        if !event.repeat() {
                            g.autopilot = !g.autopilot;
                            log::info!("Autopilot: {}", g.autopilot);
                        }
                    }
                    "p" | "P" => {
                        if !event.repeat() {
                            g.settings.panning = !g.settings.panning;
                            if !g.settings.panning {
                                g.stage.set_audio_pan(0.0);
                            }
                            g.settings.save();
                            log::info!("Panning: {}", g.settings.panning);
                        }
                    }
                    _ => {
                        if key.starts_with("Arrow") {
                            event.prevent_default();
                        }
                        g.state.input.key_changed(&key, true);
                    }
                }
            });
            let _ = window
                .add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        {
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                game.borrow_mut().state.input.key_changed(&event.key(), false);
            });
            let _ = window
                .add_event_listener_with_callback("keyup", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn setup_resize(canvas: &HtmlCanvasElement, game: Rc<RefCell<Game>>) {
        let Some(window) = web_sys::window() else { return };
        let canvas = canvas.clone();
        let win = window.clone();
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
            let (width, height) = fit_canvas(&win, &canvas);
            if let Some(render_state) = game.borrow_mut().stage.render_state.as_mut() {
                render_state.resize(width, height);
            }
        });
        let _ = window.add_event_listener_with_callback("resize", closure.as_ref().unchecked_ref());
        closure.forget();
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
        game.borrow_mut().frame(time);
        request_animation_frame(game);
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub async fn wasm_main() {
    wasm_game::run().await;
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

/// Headless autopilot session: plays a few rounds and logs the lifecycle.
///
/// Usage: `star-seeker [level|random|cycle] [seed] [rounds]`
#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use star_seeker::platform::{RecordingStage, Stage, handle_events, present};
    use star_seeker::sim::{GameEvent, GameState, TickInput, tick};
    use star_seeker::{LevelSelection, Settings, Tuning};

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    log::info!("Star Seeker (native) starting...");
    log::info!("Native mode runs headless - serve the wasm build for the browser version");

    let mut args = std::env::args().skip(1);
    let mut settings = Settings::load();
    if let Some(arg) = args.next() {
        match LevelSelection::from_str(&arg) {
            Some(level) => settings.level = level,
            None => log::warn!("Unknown level selection '{}', using {:?}", arg, settings.level),
        }
    }
    let seed = args
        .next()
        .and_then(|s| s.parse().ok())
        .or(settings.seed)
        .unwrap_or(12345);
    let rounds: u32 = args.next().and_then(|s| s.parse().ok()).unwrap_or(2);

    let mut state = GameState::new(seed, Tuning::default(), settings.level);
    let mut stage = RecordingStage::new();
    if let Err(e) = stage.play_ambient_audio() {
        log::error!("Error playing background music: {}", e);
    }

    let mut completed = 0;
    let mut round_start = 0;
    while completed < rounds {
        // Wall clock advances with the fixed tick
        let input = TickInput {
            now_ms: state.time_ticks as f64 * 1000.0 / 60.0,
            autopilot: true,
        };
        tick(&mut state, &input);

        let events = state.drain_events();
        handle_events(&events, &state, &mut stage);
        present(&state, &settings, &mut stage);

        for event in &events {
            match event {
                GameEvent::RoundEnding => {
                    log::info!(
                        "Round {} on '{}' completed in {} ticks",
                        state.round.round(),
                        state.level().name,
                        state.time_ticks - round_start
                    );
                }
                GameEvent::RoundReset { .. } => {
                    completed += 1;
                    round_start = state.time_ticks;
                }
                _ => {}
            }
        }

        if state.time_ticks > 1_000_000 {
            log::error!("Autopilot stalled in {:?}", state.round_state());
            break;
        }
    }

    log::info!(
        "Finished {} round(s) in {} ticks, {} frames presented, now {:?}",
        completed,
        state.time_ticks,
        stage.frames,
        state.round_state()
    );
}
