//! Load screen, start screen and timeline captions.
//!
//! Elements are only faded through inline opacity; layout and transitions
//! belong to the page stylesheet.

use crate::dom;
use tunnel_core::Caption;
use web_sys as web;

pub const LOAD_SCREEN: &str = "load-screen";
pub const START_SCREEN: &str = "start-screen";

// Delay between hiding the load screen and revealing the start screen.
const SCREEN_SWAP_MS: u32 = 550;

#[inline]
pub fn show(document: &web::Document, id: &str) {
    if let Some(el) = dom::element_by_id(document, id) {
        _ = el.class_list().remove_1("hidden");
        dom::set_opacity(&el, 1.0);
    }
}

#[inline]
pub fn hide(document: &web::Document, id: &str) {
    if let Some(el) = dom::element_by_id(document, id) {
        dom::set_opacity(&el, 0.0);
    }
}

/// Fade the load screen out, then bring up the start screen.
pub fn swap_load_for_start(document: &web::Document) {
    hide(document, LOAD_SCREEN);
    let doc = document.clone();
    dom::set_timeout_once(SCREEN_SWAP_MS, move || {
        if let Some(el) = dom::element_by_id(&doc, LOAD_SCREEN) {
            _ = el.class_list().add_1("hidden");
        }
        show(&doc, START_SCREEN);
    });
}

/// Fade a caption in; with `hold_ms` it fades back out after that delay.
pub fn flash_caption(document: &web::Document, caption: Caption, hold_ms: Option<u32>) {
    let id = caption.element_id();
    let Some(el) = dom::element_by_id(document, id) else {
        log::warn!("[timeline] caption element #{} missing", id);
        return;
    };
    dom::set_opacity(&el, 1.0);
    if let Some(hold) = hold_ms {
        dom::set_timeout_once(hold, move || dom::set_opacity(&el, 0.0));
    }
}
