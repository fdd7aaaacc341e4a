// Decorative browser chrome compiled to wasm: a full-viewport particle
// backdrop and a persistent light/dark toggle. The host page calls
// `apply_preferred_theme()` from a blocking script so the saved theme
// lands before first paint, then `start()` once the DOM is ready.

pub mod color;
pub mod field;
pub mod input;
pub mod particle;
pub mod raf_loop;
pub mod renderer;
pub mod theme;
mod utils;

use std::cell::RefCell;
use std::rc::Rc;

use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{console, MouseEvent, Window};

use crate::field::ParticleField;
use crate::input::PointerState;
use crate::raf_loop::FrameLoop;
use crate::renderer::Renderer;
use crate::theme::ThemeStore;

#[cfg(feature = "wee_alloc")]
#[global_allocator]
static ALLOC: wee_alloc::WeeAlloc = wee_alloc::WeeAlloc::INIT;

#[wasm_bindgen]
pub fn initialize() {
    utils::set_panic_hook();
}

// Synchronous pre-paint theme pass; see module docs in theme.rs
#[wasm_bindgen]
pub fn apply_preferred_theme() -> Result<(), JsValue> {
    theme::apply_preferred(&window()?)
}

// Everything one animation frame touches: the simulation, the pointer
// coordinates fed by the event handlers, and the canvas to draw on.
struct App {
    field: ParticleField,
    pointer: PointerState,
    renderer: Renderer,
}

impl App {
    fn frame(&mut self) -> Result<(), JsValue> {
        self.field.step(&self.pointer);
        self.renderer.clear(self.field.width(), self.field.height());
        self.renderer.draw_particles(self.field.particles())?;
        self.renderer.draw_connections(&self.field.connections());
        self.renderer
            .draw_pointer_links(&self.field.pointer_links(&self.pointer));
        Ok(())
    }

    // Re-reads the viewport and sizes both the canvas element and the
    // simulation bounds to match
    fn sync_viewport(&mut self, window: &Window) -> Result<(), JsValue> {
        let width = window
            .inner_width()?
            .as_f64()
            .ok_or_else(|| JsValue::from_str("inner_width is not a number"))?;
        let height = window
            .inner_height()?
            .as_f64()
            .ok_or_else(|| JsValue::from_str("inner_height is not a number"))?;
        self.renderer.set_size(width as u32, height as u32);
        self.field.resize(width, height);
        Ok(())
    }
}

#[wasm_bindgen]
pub struct ParticleBackdrop {
    frame_loop: FrameLoop,
    app: Rc<RefCell<App>>,
}

#[wasm_bindgen]
impl ParticleBackdrop {
    // Mounts the overlay canvas, populates the field, wires the pointer
    // and resize listeners, and starts the redraw loop.
    pub fn mount() -> Result<ParticleBackdrop, JsValue> {
        let window = window()?;
        let document = window
            .document()
            .ok_or_else(|| JsValue::from_str("no document"))?;

        let renderer = Renderer::mount(&document)?;
        let width = window
            .inner_width()?
            .as_f64()
            .ok_or_else(|| JsValue::from_str("inner_width is not a number"))?;
        let height = window
            .inner_height()?
            .as_f64()
            .ok_or_else(|| JsValue::from_str("inner_height is not a number"))?;
        renderer.set_size(width as u32, height as u32);

        let app = Rc::new(RefCell::new(App {
            field: ParticleField::new(width, height),
            pointer: PointerState::new(),
            renderer,
        }));

        {
            let app = Rc::clone(&app);
            let on_move = Closure::wrap(Box::new(move |event: MouseEvent| {
                app.borrow_mut()
                    .pointer
                    .set(event.client_x() as f64, event.client_y() as f64);
            }) as Box<dyn FnMut(MouseEvent)>);
            document
                .add_event_listener_with_callback("mousemove", on_move.as_ref().unchecked_ref())?;
            on_move.forget();
        }
        {
            let app = Rc::clone(&app);
            let on_leave = Closure::wrap(Box::new(move |_event: MouseEvent| {
                app.borrow_mut().pointer.clear();
            }) as Box<dyn FnMut(MouseEvent)>);
            document.add_event_listener_with_callback(
                "mouseleave",
                on_leave.as_ref().unchecked_ref(),
            )?;
            on_leave.forget();
        }
        {
            let app = Rc::clone(&app);
            let on_resize = Closure::wrap(Box::new(move || {
                if let Some(window) = web_sys::window() {
                    let _ = app.borrow_mut().sync_viewport(&window);
                }
            }) as Box<dyn FnMut()>);
            window
                .add_event_listener_with_callback("resize", on_resize.as_ref().unchecked_ref())?;
            on_resize.forget();
        }

        let frame_loop = FrameLoop::new();
        {
            let app = Rc::clone(&app);
            frame_loop.start(move || {
                if let Err(err) = app.borrow_mut().frame() {
                    console::error_1(&err);
                }
            })?;
        }

        Ok(ParticleBackdrop { frame_loop, app })
    }

    pub fn stop(&self) {
        self.frame_loop.stop();
    }

    pub fn is_running(&self) -> bool {
        self.frame_loop.is_running()
    }
}

impl ParticleBackdrop {
    fn app_handle(&self) -> Rc<RefCell<App>> {
        Rc::clone(&self.app)
    }
}

// Full page setup: backdrop, theme store, and toggle button, with the
// backdrop subscribed to theme changes so it can re-sync its canvas the
// way the old global resize hook would have.
#[wasm_bindgen]
pub fn start() -> Result<ParticleBackdrop, JsValue> {
    utils::set_panic_hook();
    let window = window()?;

    let backdrop = ParticleBackdrop::mount()?;
    let store = Rc::new(ThemeStore::bootstrap(&window)?);
    {
        let app = backdrop.app_handle();
        store.subscribe(move |_theme| {
            if let Some(window) = web_sys::window() {
                let _ = app.borrow_mut().sync_viewport(&window);
            }
        });
    }
    theme::mount_toggle_button(&window, store)?;
    Ok(backdrop)
}

fn window() -> Result<Window, JsValue> {
    web_sys::window().ok_or_else(|| JsValue::from_str("no window"))
}
