use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;
use tunnel_core::{BeatTimer, SequencerError};
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys as web;

pub type BeatCallback = Rc<RefCell<Option<Closure<dyn FnMut()>>>>;

/// `setTimeout`-backed beat timer. Every schedule reuses the same callback.
pub struct WindowTimer {
    window: web::Window,
    callback: BeatCallback,
}

impl WindowTimer {
    pub fn new(window: web::Window, callback: BeatCallback) -> Self {
        Self { window, callback }
    }
}

impl BeatTimer for WindowTimer {
    type Handle = i32;

    fn schedule(&mut self, delay: Duration) -> Result<i32, SequencerError> {
        let cb = self.callback.borrow();
        let cb = cb
            .as_ref()
            .ok_or_else(|| SequencerError::Timer("beat callback not installed".into()))?;
        let delay_ms = delay.as_millis().min(i32::MAX as u128) as i32;
        self.window
            .set_timeout_with_callback_and_timeout_and_arguments_0(cb.as_ref().unchecked_ref(), delay_ms)
            .map_err(|e| SequencerError::Timer(format!("{:?}", e)))
    }

    fn cancel(&mut self, handle: i32) {
        self.window.clear_timeout_with_handle(handle);
    }
}
