#![cfg(target_arch = "wasm32")]
mod audio;
mod dom;
mod events;
mod frame;
mod overlay;
mod render;
mod scene;
mod tempo;
mod timer;

use audio::TrackPlayer;
use frame::FrameContext;
use render::GpuState;
use std::cell::RefCell;
use std::rc::Rc;
use std::sync::atomic::{AtomicBool, Ordering};
use tunnel_core::{TempoSource, TunnelConfig};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::spawn_local;
use web_sys as web;

#[wasm_bindgen(start)]
pub fn start() -> Result<(), JsValue> {
    console_error_panic_hook::set_once();
    let location = read_location();
    let cfg = match &location {
        Ok((search, hash)) => TunnelConfig::from_location(search, hash),
        Err(_) => TunnelConfig::default(),
    };
    console_log::init_with_level(if cfg.debug { log::Level::Debug } else { log::Level::Info }).ok();
    if let Err(e) = &location {
        log::warn!("[config] {:#}; using defaults", e);
    }
    for reason in &cfg.rejected {
        log::warn!("[config] {}; keeping the other overrides", reason);
    }
    log::info!("tunnel-web starting");

    spawn_local(async move {
        if let Err(e) = init(cfg).await {
            log::error!("init error: {:?}", e);
        }
    });
    Ok(())
}

fn read_location() -> anyhow::Result<(String, String)> {
    let location = web::window()
        .ok_or_else(|| anyhow::anyhow!("no window"))?
        .location();
    let search = location.search().map_err(|e| anyhow::anyhow!("{:?}", e))?;
    let hash = location.hash().map_err(|e| anyhow::anyhow!("{:?}", e))?;
    Ok((search, hash))
}

async fn init(cfg: TunnelConfig) -> anyhow::Result<()> {
    let window = web::window().ok_or_else(|| anyhow::anyhow!("no window"))?;
    let document = window
        .document()
        .ok_or_else(|| anyhow::anyhow!("no document"))?;

    let canvas: web::HtmlCanvasElement = document
        .get_element_by_id("app-canvas")
        .ok_or_else(|| anyhow::anyhow!("missing #app-canvas"))?
        .dyn_into::<web::HtmlCanvasElement>()
        .map_err(|e| anyhow::anyhow!("{:?}", e))?;

    // Keep the canvas backing store at CSS size * devicePixelRatio
    dom::sync_canvas_backing_size(&canvas);
    {
        let canvas_resize = canvas.clone();
        let resize_closure = Closure::wrap(Box::new(move || {
            dom::sync_canvas_backing_size(&canvas_resize);
        }) as Box<dyn FnMut()>);
        window
            .add_event_listener_with_callback("resize", resize_closure.as_ref().unchecked_ref())
            .ok();
        resize_closure.forget();
    }

    let audio_ctx = web::AudioContext::new().map_err(|e| anyhow::anyhow!("{:?}", e))?;
    let buffer = audio::load_track(&audio_ctx, &cfg.track_url).await?;
    let player = TrackPlayer::new(audio_ctx, buffer);
    let gpu = GpuState::new(&canvas, &cfg).await?;

    let frame_ctx = Rc::new(RefCell::new(FrameContext::new(
        &cfg,
        canvas,
        document.clone(),
        gpu,
        player,
    )));
    frame::install_beat_timer(&frame_ctx)?;
    let input = frame_ctx.borrow().input.clone();
    events::wire_pointer_handlers(&window, &input)?;
    events::wire_effect_keys(&document, frame_ctx.clone())?;
    frame::start_loop(frame_ctx.clone());

    overlay::swap_load_for_start(&document);

    // The audio context may only start from a user gesture.
    static STARTED: AtomicBool = AtomicBool::new(false);
    let doc = document.clone();
    let analysis = cfg.analysis;
    let tempo_source = cfg.tempo.clone();
    dom::add_click_listener(&document, overlay::START_SCREEN, move || {
        if STARTED.swap(true, Ordering::SeqCst) {
            log::warn!("[gesture] start already triggered; ignoring extra click");
            return;
        }
        overlay::hide(&doc, overlay::START_SCREEN);
        let buffer = {
            let mut ctx = frame_ctx.borrow_mut();
            if let Err(e) = ctx.player.start(0.0) {
                log::error!("[audio] {:?}", e);
            }
            ctx.player.buffer().clone()
        };
        let ctx = frame_ctx.clone();
        let tempo_source = tempo_source.clone();
        spawn_local(async move {
            let bpm = match tempo_source {
                TempoSource::Fixed(bpm) => {
                    log::info!("[tempo] using bpm override {:.2}", bpm);
                    bpm
                }
                TempoSource::Rejected(reason) => {
                    log::error!("[tempo] {}; the tunnel stays idle", reason);
                    return;
                }
                TempoSource::Estimate => match tempo::estimate(&buffer, analysis).await {
                    Ok(bpm) => bpm,
                    Err(e) => {
                        log::error!("[tempo] {}; the tunnel stays idle", e);
                        return;
                    }
                },
            };
            if let Err(e) = ctx.borrow_mut().start_beats(bpm) {
                log::error!("[tempo] {}", e);
            }
        });
    })?;
    Ok(())
}
