//! Starfield entry point
//!
//! Handles platform-specific initialization and runs the frame loop.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_app {
    use std::cell::RefCell;
    use std::f64::consts::TAU;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, KeyboardEvent, WheelEvent};

    use starfield::Settings;
    use starfield::platform::{DialInput, ManualDial};
    use starfield::renderer::{Frame, Renderer};
    use starfield::sim::{Scheduler, TickInput, Viewport};

    /// Dial degrees per wheel pixel
    const WHEEL_DEGREES_PER_PIXEL: f32 = 0.1;
    /// Dial degrees per arrow key press
    const KEY_DEGREES: f32 = 5.0;

    /// Draws frames onto a 2D canvas
    struct CanvasRenderer {
        ctx: CanvasRenderingContext2d,
        dpr: f64,
    }

    impl CanvasRenderer {
        fn paint(&self, frame: &Frame<'_>) -> Result<(), JsValue> {
            let ctx = &self.ctx;
            let vp = frame.viewport;
            let (w, h) = (vp.width as f64, vp.height as f64);

            ctx.set_transform(self.dpr, 0.0, 0.0, self.dpr, 0.0, 0.0)?;
            ctx.set_global_alpha(1.0);
            ctx.set_fill_style_str("black");
            ctx.fill_rect(0.0, 0.0, w, h);

            ctx.save();
            // Round face
            ctx.begin_path();
            ctx.arc(w / 2.0, h / 2.0, vp.inscribed_radius() as f64, 0.0, TAU)?;
            ctx.clip();

            ctx.translate(w / 2.0, h / 2.0)?;
            ctx.rotate((frame.rotation_degrees as f64).to_radians())?;
            ctx.translate(-w / 2.0, -h / 2.0)?;

            ctx.set_fill_style_str("white");
            for star in frame.stars {
                if star.opacity <= 0.0 {
                    continue;
                }
                ctx.set_global_alpha(star.opacity as f64);
                ctx.begin_path();
                ctx.arc(
                    star.position.x as f64,
                    star.position.y as f64,
                    star.size as f64,
                    0.0,
                    TAU,
                )?;
                ctx.fill();
            }

            ctx.set_global_alpha(1.0);
            ctx.set_font("bold 24px monospace");
            ctx.set_text_align("center");
            ctx.set_text_baseline("middle");
            ctx.fill_text(frame.clock_text, w / 2.0, h / 2.0)?;
            ctx.restore();
            Ok(())
        }
    }

    impl Renderer for CanvasRenderer {
        fn draw(&mut self, frame: &Frame<'_>) {
            if let Err(e) = self.paint(frame) {
                log::warn!("Render error: {:?}", e);
            }
        }
    }

    /// App instance holding all state
    struct App {
        scheduler: Scheduler,
        renderer: CanvasRenderer,
        canvas: HtmlCanvasElement,
        dial: ManualDial,
        active: bool,
        last_time: f64,
    }

    impl App {
        /// Current viewport in CSS pixels, resizing the backing store to match
        fn viewport(&mut self) -> Viewport {
            let client_w = self.canvas.client_width().max(0);
            let client_h = self.canvas.client_height().max(0);
            let width = (client_w as f64 * self.renderer.dpr) as u32;
            let height = (client_h as f64 * self.renderer.dpr) as u32;
            if self.canvas.width() != width || self.canvas.height() != height {
                self.canvas.set_width(width);
                self.canvas.set_height(height);
            }
            Viewport::new(client_w as f32, client_h as f32)
        }

        fn frame(&mut self, time: f64) {
            let dt = if self.last_time > 0.0 {
                ((time - self.last_time) / 1000.0) as f32
            } else {
                0.0
            };
            self.last_time = time;

            let viewport = self.viewport();
            let input = TickInput {
                dial_value: self.dial.read(),
                active: self.active,
            };
            let report = self.scheduler.update(dt, viewport, &input);
            if report.needs_redraw() {
                let frame = Frame::capture(&self.scheduler, viewport);
                self.renderer.draw(&frame);
            }
        }
    }

    pub fn run() {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info).expect("Failed to init logger");

        log::info!("Starfield starting...");

        let window = web_sys::window().expect("no window");
        let document = window.document().expect("no document");

        let canvas: HtmlCanvasElement = document
            .get_element_by_id("canvas")
            .expect("no canvas")
            .dyn_into()
            .expect("not a canvas");
        let ctx: CanvasRenderingContext2d = canvas
            .get_context("2d")
            .ok()
            .flatten()
            .expect("no 2d context")
            .dyn_into()
            .expect("not a 2d context");

        let settings = Settings::load();
        let seed = js_sys::Date::now() as u64;
        let config = settings.scheduler_config(seed);
        log::info!(
            "Variant {} with seed {}",
            settings.variant.as_str(),
            config.seed
        );

        let app = Rc::new(RefCell::new(App {
            scheduler: Scheduler::new(config),
            renderer: CanvasRenderer {
                ctx,
                dpr: window.device_pixel_ratio(),
            },
            canvas: canvas.clone(),
            dial: ManualDial::new(settings.dial_range),
            active: true,
            last_time: 0.0,
        }));

        setup_dial(&canvas, app.clone());
        setup_activity(app.clone());

        request_animation_frame(app);

        log::info!("Starfield running!");
    }

    fn setup_dial(canvas: &HtmlCanvasElement, app: Rc<RefCell<App>>) {
        // Mouse wheel / trackpad stands in for the crown
        {
            let app = app.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: WheelEvent| {
                event.prevent_default();
                app.borrow_mut()
                    .dial
                    .turn(event.delta_y() as f32 * WHEEL_DEGREES_PER_PIXEL);
            });
            let _ = canvas.add_event_listener_with_callback("wheel", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Arrow keys
        {
            let window = web_sys::window().unwrap();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                let degrees = match event.key().as_str() {
                    "ArrowUp" | "ArrowRight" => KEY_DEGREES,
                    "ArrowDown" | "ArrowLeft" => -KEY_DEGREES,
                    _ => return,
                };
                app.borrow_mut().dial.turn(degrees);
            });
            let _ = window.add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn setup_activity(app: Rc<RefCell<App>>) {
        let document = web_sys::window().unwrap().document().unwrap();

        // Visibility change (tab switch, minimize)
        let document_clone = document.clone();
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
            let active = document_clone.visibility_state() == web_sys::VisibilityState::Visible;
            let mut a = app.borrow_mut();
            a.active = active;
            // Don't count hidden time as elapsed
            a.last_time = 0.0;
            log::info!("Activity changed: {}", if active { "foreground" } else { "background" });
        });
        let _ = document.add_event_listener_with_callback(
            "visibilitychange",
            closure.as_ref().unchecked_ref(),
        );
        closure.forget();
    }

    fn request_animation_frame(app: Rc<RefCell<App>>) {
        let window = web_sys::window().unwrap();
        let closure = Closure::once(move |time: f64| {
            frame_loop(app, time);
        });
        let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn frame_loop(app: Rc<RefCell<App>>, time: f64) {
        app.borrow_mut().frame(time);
        request_animation_frame(app);
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() {
    wasm_app::run();
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use std::io::Write;
    use std::time::{Duration, SystemTime, UNIX_EPOCH};

    use starfield::Settings;
    use starfield::platform::{ActivityState, AlwaysActive, DialInput, SweepDial};
    use starfield::renderer::{Frame, Renderer, TextRenderer};
    use starfield::sim::{Scheduler, TickInput, Viewport};

    /// Native frame pacing
    const FRAME_DT: f32 = 1.0 / 30.0;
    /// Display size of a 45mm watch, in points
    const VIEWPORT: Viewport = Viewport::new(198.0, 242.0);
    /// Synthetic crown speed
    const SWEEP_DEGREES_PER_SEC: f32 = 15.0;

    env_logger::init();
    log::info!("Starfield (native) starting...");

    let seconds: f32 = match std::env::args().nth(1) {
        Some(arg) => arg.parse().unwrap_or_else(|_| {
            log::warn!("Ignoring run length {:?}, using 10s", arg);
            10.0
        }),
        None => 10.0,
    };

    let settings = Settings::load();
    let fallback_seed = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos() as u64)
        .unwrap_or(0);
    let config = settings.scheduler_config(fallback_seed);
    log::info!(
        "Variant {} with seed {}, running {:.1}s",
        settings.variant.as_str(),
        config.seed,
        seconds
    );

    let mut scheduler = Scheduler::new(config);
    let mut dial = SweepDial::new(SWEEP_DEGREES_PER_SEC, settings.dial_range);
    let activity = AlwaysActive;
    let mut renderer = TextRenderer::new(44, 22);
    let mut stdout = std::io::stdout();

    let frames = (seconds / FRAME_DT).max(0.0) as u32;
    for _ in 0..frames {
        dial.advance(FRAME_DT);
        let input = TickInput {
            dial_value: dial.read(),
            active: activity.is_active(),
        };
        let report = scheduler.update(FRAME_DT, VIEWPORT, &input);
        if report.needs_redraw() {
            renderer.draw(&Frame::capture(&scheduler, VIEWPORT));
            // Home the cursor and clear before each frame
            let _ = writeln!(stdout, "\x1b[H\x1b[2J{}", renderer.to_text());
            let _ = stdout.flush();
        }
        std::thread::sleep(Duration::from_secs_f32(FRAME_DT));
    }

    if let Some(field) = scheduler.field() {
        log::info!(
            "Ran {} star ticks; {} stars, mean opacity {:.3}, display rotation {:.1}°",
            scheduler.time_ticks(),
            field.len(),
            field.mean_opacity(),
            scheduler.display_rotation_degrees()
        );
    }
}
