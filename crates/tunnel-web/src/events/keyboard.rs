use crate::frame::FrameContext;
use std::cell::RefCell;
use std::rc::Rc;
use tunnel_core::effect_for_key;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys as web;

/// Digit keys 1-6 toggle free-play effects. The sequencer ignores them
/// until the timeline hands the keyboard over.
pub fn wire_effect_keys(document: &web::Document, frame_ctx: Rc<RefCell<FrameContext>>) -> anyhow::Result<()> {
    let closure = Closure::wrap(Box::new(move |ev: web::KeyboardEvent| {
        if ev.repeat() {
            return;
        }
        if let Some(effect) = effect_for_key(&ev.key()) {
            _ = frame_ctx.borrow_mut().sequencer.toggle_effect(effect);
        }
    }) as Box<dyn FnMut(_)>);
    document
        .add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref())
        .map_err(|e| anyhow::anyhow!("{:?}", e))?;
    closure.forget();
    Ok(())
}
