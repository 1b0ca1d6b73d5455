//! Spoke entry point
//!
//! Handles platform-specific initialization and runs the game loop.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use web_sys::{HtmlCanvasElement, KeyboardEvent};

    use spoke::renderer::vertex::colors;
    use spoke::renderer::{Frame, RenderState, draw_world};
    use spoke::sim::{Command, Display};
    use spoke::{App, AppError, Settings};

    const CANVAS_ID: &str = "canvas";

    /// Game instance holding all state
    struct Game {
        app: App,
        canvas: HtmlCanvasElement,
        render_state: Option<RenderState>,
        last_time: f64,
        /// A requestAnimationFrame chain is scheduled
        loop_active: bool,
    }

    impl Game {
        /// Display size in CSS pixels
        fn display(&self) -> Display {
            Display::new(self.canvas.client_width(), self.canvas.client_height())
        }

        /// Keep the backing store in step with the CSS size and pixel ratio
        fn sync_canvas_size(&mut self) {
            let (width, height) = physical_size(&self.canvas);
            if let Some(ref mut render_state) = self.render_state {
                if render_state.size != (width, height) {
                    self.canvas.set_width(width);
                    self.canvas.set_height(height);
                    render_state.resize(width, height);
                }
            }
        }

        /// Run timer ticks for the time since the last frame
        fn update(&mut self, time: f64) -> u32 {
            let dt = if self.last_time > 0.0 {
                ((time - self.last_time) / 1000.0) as f32
            } else {
                0.0
            };
            self.last_time = time;
            self.sync_canvas_size();
            let display = self.display();
            self.app.update(dt, display)
        }

        /// Render the current frame (blank once the session is gone)
        fn render(&mut self) {
            let frame = match self.app.session() {
                Some(session) => draw_world(session.world(), self.app.settings()),
                None => {
                    let mut frame = Frame::new(self.display(), colors::BLACK);
                    frame.clear();
                    frame
                }
            };
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

        /// Show the pending dialog with a blocking alert, then close it
        fn show_dialog(&mut self) {
            if let Some(dialog) = self.app.dialog() {
                if let Some(window) = web_sys::window() {
                    let _ = window.alert_with_message(&dialog.to_string());
                }
            }
            self.app.dismiss_dialog();
        }
    }

    /// Canvas size in device pixels
    fn physical_size(canvas: &HtmlCanvasElement) -> (u32, u32) {
        let dpr = web_sys::window().map_or(1.0, |w| w.device_pixel_ratio());
        let width = (canvas.client_width() as f64 * dpr) as u32;
        let height = (canvas.client_height() as f64 * dpr) as u32;
        (width.max(1), height.max(1))
    }

    pub async fn run() {
        console_error_panic_hook::set_once();
        if let Err(e) = console_log::init_with_level(log::Level::Info) {
            web_sys::console::warn_1(&format!("Logger already set: {}", e).into());
        }

        log::info!("Spoke starting...");

        if let Err(err) = start().await {
            log::error!("{}", err);
            if let Some(window) = web_sys::window() {
                let _ = window.alert_with_message(&err.dialog().to_string());
            }
        }
    }

    async fn start() -> Result<(), AppError> {
        let window = web_sys::window().ok_or(AppError::NoWindow)?;
        let document = window.document().ok_or(AppError::NoWindow)?;

        // Hide loading indicator
        if let Some(loading) = document.get_element_by_id("loading") {
            let _ = loading.set_attribute("class", "hidden");
        }

        let canvas: HtmlCanvasElement = document
            .get_element_by_id(CANVAS_ID)
            .and_then(|el| el.dyn_into().ok())
            .ok_or_else(|| AppError::NoCanvas(CANVAS_ID.to_string()))?;

        let (width, height) = physical_size(&canvas);
        canvas.set_width(width);
        canvas.set_height(height);

        // Initialize WebGPU
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::BROWSER_WEBGPU,
            ..Default::default()
        });

        let surface = instance.create_surface(wgpu::SurfaceTarget::Canvas(canvas.clone()))?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::LowPower,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await?;

        log::info!("Using adapter: {:?}", adapter.get_info().name);

        let render_state = RenderState::new(surface, &adapter, width, height).await?;

        let game = Rc::new(RefCell::new(Game {
            app: App::init(Settings::load()),
            canvas,
            render_state: Some(render_state),
            last_time: 0.0,
            loop_active: false,
        }));

        setup_input_handlers(game.clone());
        setup_lifecycle(game.clone());
        setup_network_errors(game.clone());

        start_session(game);

        log::info!("Spoke running!");
        Ok(())
    }

    /// Start or resume the session and make sure the frame loop is running
    fn start_session(game: Rc<RefCell<Game>>) {
        let mut g = game.borrow_mut();
        let display = g.display();
        g.app.start(display);
        g.last_time = 0.0;
        g.render();
        if !g.loop_active {
            g.loop_active = true;
            drop(g);
            request_animation_frame(game);
        }
    }

    fn setup_input_handlers(game: Rc<RefCell<Game>>) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
            let Some(command) = Command::from_key(event.key().as_str()) else {
                return;
            };
            // Arrow keys would scroll the page
            event.prevent_default();

            let mut g = game.borrow_mut();
            if command == Command::Restart && g.app.has_exited() {
                drop(g);
                start_session(game.clone());
                return;
            }
            g.app.handle_command(command);
            if g.app.has_exited() {
                log::info!("Press R to play again");
            }
        });
        let _ = window.add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    /// Map page visibility onto stop/start and page teardown onto destroy
    fn setup_lifecycle(game: Rc<RefCell<Game>>) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let Some(document) = window.document() else {
            return;
        };

        // Visibility change (tab switch, minimize)
        {
            let game = game.clone();
            let document_clone = document.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
                if document_clone.visibility_state() == web_sys::VisibilityState::Hidden {
                    game.borrow_mut().app.stop();
                } else if !game.borrow().app.has_exited() {
                    start_session(game.clone());
                }
            });
            let _ = document.add_event_listener_with_callback(
                "visibilitychange",
                closure.as_ref().unchecked_ref(),
            );
            closure.forget();
        }

        // Page unload
        {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
                game.borrow_mut().app.destroy();
            });
            let _ = window.add_event_listener_with_callback("pagehide", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    /// Losing the connection opens the connection error dialog
    fn setup_network_errors(game: Rc<RefCell<Game>>) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let window_clone = window.clone();
        let closure = Closure::<dyn FnMut(_)>::new(move |event: web_sys::Event| {
            // Consumed here; nothing else should react
            event.stop_propagation();
            let url = window_clone.location().href().unwrap_or_default();
            let mut g = game.borrow_mut();
            g.app
                .on_network_error(&url, Some("browser went offline".to_string()));
            g.show_dialog();
        });
        let _ = window.add_event_listener_with_callback("offline", closure.as_ref().unchecked_ref());
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
        {
            let mut g = game.borrow_mut();

            if !g.app.is_running() {
                // Suspended or quit: let the chain lapse until the next start
                g.loop_active = false;
                if g.app.has_exited() {
                    g.render();
                }
                return;
            }

            if g.update(time) > 0 {
                g.render();
            }
        }

        request_animation_frame(game);
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub async fn wasm_main() {
    wasm_game::run().await;
}

#[cfg(not(target_arch = "wasm32"))]
fn main() -> std::process::ExitCode {
    env_logger::init();
    log::info!("Spoke (native) starting...");

    let result = spoke::Settings::load().and_then(spoke::platform::terminal::run);
    match result {
        Ok(()) => {
            log::info!("Bye");
            std::process::ExitCode::SUCCESS
        }
        Err(err) => {
            log::error!("{}", err);
            eprintln!("{}", err.dialog());
            std::process::ExitCode::FAILURE
        }
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}
