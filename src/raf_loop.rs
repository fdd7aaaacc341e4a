// Render-loop wrapper around requestAnimationFrame. The browser keeps at
// most one callback pending and pauses delivery while the page is hidden;
// this type only adds explicit start/stop so the loop is not an anonymous
// self-rescheduling closure.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;

pub struct FrameLoop {
    raf_id: Rc<Cell<Option<i32>>>,
}

impl FrameLoop {
    pub fn new() -> FrameLoop {
        FrameLoop {
            raf_id: Rc::new(Cell::new(None)),
        }
    }

    pub fn is_running(&self) -> bool {
        self.raf_id.get().is_some()
    }

    // Schedules `tick` once per display refresh until stop() is called.
    // The closure holds a strong reference to itself so it lives for as
    // long as the loop keeps rescheduling.
    pub fn start<F>(&self, mut tick: F) -> Result<(), JsValue>
    where
        F: FnMut() + 'static,
    {
        if self.is_running() {
            return Ok(());
        }

        let raf_id = Rc::clone(&self.raf_id);
        let handle: Rc<RefCell<Option<Closure<dyn FnMut()>>>> = Rc::new(RefCell::new(None));
        let inner_handle = Rc::clone(&handle);

        *handle.borrow_mut() = Some(Closure::wrap(Box::new(move || {
            // stop() raced this frame; do not reschedule
            if raf_id.get().is_none() {
                return;
            }
            tick();
            let next = inner_handle
                .borrow()
                .as_ref()
                .map(request_frame)
                .transpose();
            match next {
                Ok(id) => raf_id.set(id),
                Err(_) => raf_id.set(None),
            }
        }) as Box<dyn FnMut()>));

        let first = handle
            .borrow()
            .as_ref()
            .map(request_frame)
            .transpose()?;
        self.raf_id.set(first);
        Ok(())
    }

    pub fn stop(&self) {
        if let Some(id) = self.raf_id.take() {
            if let Some(window) = web_sys::window() {
                let _ = window.cancel_animation_frame(id);
            }
        }
    }
}

fn request_frame(closure: &Closure<dyn FnMut()>) -> Result<i32, JsValue> {
    web_sys::window()
        .ok_or_else(|| JsValue::from_str("no window"))?
        .request_animation_frame(closure.as_ref().unchecked_ref())
}
