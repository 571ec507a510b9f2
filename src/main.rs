//! Flappy Arcade entry point
//!
//! Handles platform-specific initialization and drives the game loop from
//! animation frames and countdown timers.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use web_sys::{Document, HtmlCanvasElement, KeyboardEvent, PointerEvent, Window};

    use flappy_arcade::renderer::{RenderState, scene};
    use flappy_arcade::sim::{GameEvent, GameLoop, GamePhase, InputEvent, Key, Playfield, Wake};
    use flappy_arcade::{AudioCueDispatcher, BestScore, GameMode, SessionConfig};

    /// Game instance holding all state
    struct Game {
        engine: GameLoop,
        audio: AudioCueDispatcher,
        render_state: Option<RenderState>,
        /// Outstanding animation frame request
        frame_handle: Option<i32>,
        /// Outstanding countdown timer
        timer_handle: Option<i32>,
    }

    impl Game {
        /// Cancel whatever was scheduled for the previous state
        fn cancel_pending(&mut self, window: &Window) {
            if let Some(handle) = self.frame_handle.take() {
                let _ = window.cancel_animation_frame(handle);
            }
            if let Some(handle) = self.timer_handle.take() {
                window.clear_timeout_with_handle(handle);
            }
        }

        /// Render the current frame
        fn render(&mut self) {
            let bird_sprite = self.render_state.as_ref().is_some_and(|r| r.has_sprite());
            let frame = scene(self.engine.state(), bird_sprite);
            if let Some(ref mut render_state) = self.render_state {
                match render_state.render(&frame) {
                    Ok(_) => {}
                    Err(wgpu::SurfaceError::Lost) => {
                        render_state.resize(render_state.size.0, render_state.size.1);
                    }
                    Err(wgpu::SurfaceError::OutOfMemory) => {
                        log::error!("Out of memory!");
                    }
                    Err(e) => log::warn!("Render error: {:?}", e),
                }
            }
        }

        /// Play cues, persist records, refresh the HUD
        fn handle_events(&mut self) {
            for event in self.engine.drain_events() {
                match event {
                    GameEvent::Cue(cue) => self.audio.trigger(cue),
                    GameEvent::Scored { score } => log::debug!("Score: {}", score),
                    GameEvent::PhaseChanged(phase) => log::info!("Phase: {:?}", phase),
                    GameEvent::Ended { outcome, score } => {
                        log::info!("{:?} with score {}", outcome, score);
                        // The engine read the stored best at session start
                        if let Some(previous) = self.engine.best() {
                            BestScore::new(previous).record(score);
                        }
                    }
                }
            }
            self.update_hud();
        }

        /// Update HUD elements in DOM
        fn update_hud(&self) {
            let Some(document) = web_sys::window().and_then(|w| w.document()) else {
                return;
            };
            let phase = self.engine.phase();
            let score = self.engine.score();
            // Once the session ends the stored best includes this run
            let best = self.engine.best().map(|b| {
                if phase.is_terminal() { b.max(score) } else { b }
            });
            let score = score.to_string();

            set_text(&document, "hud-score-value", &score);
            set_visible(&document, "hud-best", best.is_some());
            if let Some(best) = best {
                set_text(&document, "hud-best-value", &best.to_string());
            }
            if let Some(name) = self.engine.config().bird_name.as_deref() {
                set_text(&document, "bird-name", name);
            }

            // Countdown number, then "GO!"
            match phase {
                GamePhase::Countdown { remaining } => {
                    set_visible(&document, "countdown", true);
                    let text = if remaining == 0 {
                        "GO!".to_string()
                    } else {
                        remaining.to_string()
                    };
                    set_text(&document, "countdown", &text);
                }
                _ => set_visible(&document, "countdown", false),
            }

            // Pause / game over / win overlay
            let title = match phase {
                GamePhase::Paused => Some("Paused"),
                GamePhase::GameOver => Some("Game Over"),
                GamePhase::Win => Some("You Won!"),
                _ => None,
            };
            set_visible(&document, "overlay", title.is_some());
            if let Some(title) = title {
                set_text(&document, "overlay-title", title);
                set_text(&document, "overlay-score", &score);
                set_visible(&document, "resume-btn", phase == GamePhase::Paused);
                set_visible(&document, "overlay-best", best.is_some());
                if let Some(best) = best {
                    set_text(&document, "overlay-best-value", &best.to_string());
                }
                let new_best = phase.is_terminal() && self.engine.state().score.is_new_best();
                set_visible(&document, "new-best", new_best);
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
            let _ = el.class_list().toggle_with_force("hidden", !visible);
        }
    }

    /// Current time on the same clock as animation frame timestamps
    fn now_ms() -> f64 {
        web_sys::window()
            .and_then(|w| w.performance())
            .map(|p| p.now())
            .unwrap_or_else(js_sys::Date::now)
    }

    /// Read `?mode=` from the page URL
    fn mode_from_url(window: &Window) -> GameMode {
        let mode = window
            .location()
            .search()
            .ok()
            .and_then(|search| web_sys::UrlSearchParams::new_with_str(&search).ok())
            .and_then(|params| params.get("mode"));
        GameMode::from_query(mode.as_deref())
    }

    pub async fn run() {
        console_error_panic_hook::set_once();
        if console_log::init_with_level(log::Level::Info).is_err() {
            web_sys::console::warn_1(&"Logger already initialized".into());
        }
        log::info!("Flappy Arcade starting...");

        let Some(window) = web_sys::window() else {
            return;
        };
        let Some(document) = window.document() else {
            return;
        };

        let Some(canvas) = document
            .get_element_by_id("canvas")
            .and_then(|el| el.dyn_into::<HtmlCanvasElement>().ok())
        else {
            log::error!("No #canvas element");
            return;
        };

        // Playfield in CSS pixels, surface in physical pixels
        let dpr = window.device_pixel_ratio();
        let client_w = canvas.client_width().max(1);
        let client_h = canvas.client_height().max(1);
        let width = (client_w as f64 * dpr) as u32;
        let height = (client_h as f64 * dpr) as u32;
        canvas.set_width(width);
        canvas.set_height(height);
        let playfield = Playfield::new(client_w as f32, client_h as f32);

        let mode = mode_from_url(&window);
        let config = SessionConfig::load();
        let audio = AudioCueDispatcher::new(config.custom_audio.clone());
        let seed = js_sys::Date::now() as u64;
        let engine = GameLoop::new(config, mode, playfield, seed, now_ms());
        log::info!("Game initialized in {} mode with seed: {}", mode.as_str(), seed);

        let render_state = init_renderer(&canvas, width, height, playfield).await;

        let game = Rc::new(RefCell::new(Game {
            engine,
            audio,
            render_state,
            frame_handle: None,
            timer_handle: None,
        }));

        let bird_sprite = game.borrow().engine.config().bird_sprite.clone();
        if let Some(src) = bird_sprite {
            load_bird_image(&src, game.clone());
        }

        setup_input_handlers(&canvas, game.clone());
        setup_overlay_buttons(game.clone());
        setup_auto_pause(game.clone());

        {
            let mut g = game.borrow_mut();
            g.render();
            g.handle_events();
        }
        schedule(&game);
        log::info!("Flappy Arcade running!");
    }

    /// Set up WebGPU; the game still runs (without drawing) if this fails
    async fn init_renderer(
        canvas: &HtmlCanvasElement,
        width: u32,
        height: u32,
        playfield: Playfield,
    ) -> Option<RenderState> {
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::BROWSER_WEBGPU,
            ..Default::default()
        });

        let surface = match instance.create_surface(wgpu::SurfaceTarget::Canvas(canvas.clone())) {
            Ok(surface) => surface,
            Err(e) => {
                log::error!("Failed to create surface: {}", e);
                return None;
            }
        };

        let adapter = match instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
        {
            Ok(adapter) => adapter,
            Err(e) => {
                log::error!("Failed to get adapter: {}", e);
                return None;
            }
        };
        log::info!("Using adapter: {:?}", adapter.get_info().name);

        match RenderState::new(
            surface,
            &adapter,
            width,
            height,
            (playfield.width, playfield.height),
        )
        .await
        {
            Ok(render_state) => Some(render_state),
            Err(e) => {
                log::error!("Failed to create device: {}", e);
                None
            }
        }
    }

    /// Decode the custom bird image; the default disc is drawn until it loads
    fn load_bird_image(src: &str, game: Rc<RefCell<Game>>) {
        let Ok(image) = web_sys::HtmlImageElement::new() else {
            log::warn!("Failed to create image element, drawing default bird");
            return;
        };

        let loaded = image.clone();
        let onload = Closure::once(move || {
            let mut g = game.borrow_mut();
            if let Some(render_state) = g.render_state.as_mut() {
                render_state.load_sprite(&loaded);
            }
            g.render();
        });
        image.set_onload(Some(onload.as_ref().unchecked_ref()));
        onload.forget();

        let onerror = Closure::once(move || {
            log::warn!("Bird image failed to decode, drawing default bird");
        });
        image.set_onerror(Some(onerror.as_ref().unchecked_ref()));
        onerror.forget();

        image.set_src(src);
    }

    /// Arm the next callback the engine asks for, cancelling the previous one
    fn schedule(game: &Rc<RefCell<Game>>) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let mut g = game.borrow_mut();
        g.cancel_pending(&window);
        let generation = g.engine.generation();

        match g.engine.next_wake() {
            Wake::Frame => {
                let game = game.clone();
                let closure = Closure::once(move |time: f64| {
                    on_frame(game, generation, time);
                });
                g.frame_handle = window
                    .request_animation_frame(closure.as_ref().unchecked_ref())
                    .ok();
                closure.forget();
            }
            Wake::Timer { at_ms } => {
                let game = game.clone();
                let closure = Closure::once(move || {
                    on_timer(game, generation);
                });
                let delay = (at_ms - now_ms()).max(0.0).round() as i32;
                g.timer_handle = window
                    .set_timeout_with_callback_and_timeout_and_arguments_0(
                        closure.as_ref().unchecked_ref(),
                        delay,
                    )
                    .ok();
                closure.forget();
            }
            Wake::Idle => {}
        }
    }

    fn on_frame(game: Rc<RefCell<Game>>, generation: u64, time: f64) {
        {
            let mut g = game.borrow_mut();
            if g.engine.generation() != generation {
                return;
            }
            g.frame_handle = None;
            g.engine.frame(generation, time);
            g.render();
            g.handle_events();
        }
        schedule(&game);
    }

    fn on_timer(game: Rc<RefCell<Game>>, generation: u64) {
        {
            let mut g = game.borrow_mut();
            if g.engine.generation() != generation {
                return;
            }
            g.timer_handle = None;
            g.engine.on_timer(generation, now_ms());
            g.render();
            g.handle_events();
        }
        schedule(&game);
    }

    fn setup_input_handlers(canvas: &HtmlCanvasElement, game: Rc<RefCell<Game>>) {
        // Any key jumps, Escape pauses
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                let key = Key::from_dom(&event.key());
                game.borrow_mut().engine.push_input(InputEvent::KeyDown(key));
            });
            if let Some(window) = web_sys::window() {
                let _ = window
                    .add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
            }
            closure.forget();
        }

        // Click/tap jumps
        {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: PointerEvent| {
                game.borrow_mut().engine.push_input(InputEvent::PointerDown);
            });
            let _ = canvas
                .add_event_listener_with_callback("pointerdown", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn on_click(document: &Document, id: &str, handler: impl FnMut(web_sys::MouseEvent) + 'static) {
        if let Some(btn) = document.get_element_by_id(id) {
            let closure = Closure::<dyn FnMut(web_sys::MouseEvent)>::new(handler);
            let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn setup_overlay_buttons(game: Rc<RefCell<Game>>) {
        let Some(document) = web_sys::window().and_then(|w| w.document()) else {
            return;
        };

        // Continue after pause
        {
            let game = game.clone();
            on_click(&document, "resume-btn", move |_event| {
                {
                    let mut g = game.borrow_mut();
                    g.engine.resume(now_ms());
                    g.handle_events();
                }
                schedule(&game);
            });
        }

        // Start a fresh session from the countdown
        {
            let game = game.clone();
            on_click(&document, "restart-btn", move |_event| {
                let seed = js_sys::Date::now() as u64;
                {
                    let mut g = game.borrow_mut();
                    g.engine.restart(seed, now_ms());
                    g.render();
                    g.handle_events();
                }
                schedule(&game);
                log::info!("Game restarted with seed: {}", seed);
            });
        }

        // Back to the dashboard
        on_click(&document, "menu-btn", move |_event| {
            {
                let mut g = game.borrow_mut();
                if let Some(window) = web_sys::window() {
                    g.cancel_pending(&window);
                }
            }
            if let Some(window) = web_sys::window() {
                let _ = window.location().set_href("/dashboard");
            }
        });
    }

    fn setup_auto_pause(game: Rc<RefCell<Game>>) {
        let Some(document) = web_sys::window().and_then(|w| w.document()) else {
            return;
        };

        // Visibility change (tab switch, minimize)
        let document_clone = document.clone();
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
            if document_clone.visibility_state() == web_sys::VisibilityState::Hidden {
                {
                    let mut g = game.borrow_mut();
                    if g.engine.phase() != GamePhase::Playing {
                        return;
                    }
                    g.engine.pause();
                    g.handle_events();
                    log::info!("Auto-paused (tab hidden)");
                }
                schedule(&game);
            }
        });
        let _ = document
            .add_event_listener_with_callback("visibilitychange", closure.as_ref().unchecked_ref());
        closure.forget();
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub async fn wasm_main() {
    wasm_game::run().await;
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Flappy Arcade (native) starting...");
    log::info!("The game runs in the browser - build for wasm32 and serve index.html");
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}
