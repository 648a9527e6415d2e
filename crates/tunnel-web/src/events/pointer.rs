//! Pointer listeners. They only write the shared [`InputState`]; the frame
//! loop reads it once per frame.

use crate::dom;
use std::cell::RefCell;
use std::rc::Rc;
use tunnel_core::InputState;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys as web;

fn listen<E: JsCast + 'static>(
    target: &web::EventTarget,
    event: &str,
    mut handler: impl FnMut(E) + 'static,
) -> anyhow::Result<()> {
    let closure = Closure::wrap(Box::new(move |ev: web::Event| {
        if let Ok(ev) = ev.dyn_into::<E>() {
            handler(ev);
        }
    }) as Box<dyn FnMut(_)>);
    target
        .add_event_listener_with_callback(event, closure.as_ref().unchecked_ref())
        .map_err(|e| anyhow::anyhow!("{:?}", e))?;
    closure.forget();
    Ok(())
}

pub fn wire_pointer_handlers(window: &web::Window, input: &Rc<RefCell<InputState>>) -> anyhow::Result<()> {
    let target: &web::EventTarget = window.as_ref();

    let st = input.clone();
    listen(target, "pointerdown", move |ev: web::PointerEvent| {
        st.borrow_mut().set_button(ev.button(), true);
    })?;

    let st = input.clone();
    listen(target, "pointerup", move |ev: web::PointerEvent| {
        st.borrow_mut().set_button(ev.button(), false);
    })?;

    let st = input.clone();
    listen(target, "pointermove", move |ev: web::PointerEvent| {
        let (w, h) = dom::viewport_size();
        st.borrow_mut()
            .set_pointer(ev.client_x() as f32, ev.client_y() as f32, w, h);
    })?;

    // A release outside the page never reaches pointerup.
    for event in ["pointercancel", "blur"] {
        let st = input.clone();
        listen(target, event, move |_: web::Event| st.borrow_mut().release_all())?;
    }

    // The right button brakes; keep the context menu out of the way.
    listen(target, "contextmenu", |ev: web::MouseEvent| ev.prevent_default())?;
    Ok(())
}
