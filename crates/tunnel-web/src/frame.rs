use crate::audio::TrackPlayer;
use crate::dom;
use crate::overlay;
use crate::render::GpuState;
use crate::scene::SceneState;
use crate::timer::{BeatCallback, WindowTimer};
use instant::Instant;
use std::cell::RefCell;
use std::rc::Rc;
use tunnel_core::{
    FrameClock, InputState, SceneCommand, Sequencer, SequencerError, TempoScheduler, TunnelConfig,
};
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys as web;

pub struct FrameContext {
    pub sequencer: Sequencer,
    // installed once the beat callback exists; see `install_beat_timer`
    pub scheduler: Option<TempoScheduler<WindowTimer>>,
    pub input: Rc<RefCell<InputState>>,
    pub scene: SceneState,
    pub gpu: GpuState,
    pub player: TrackPlayer,
    pub clock: FrameClock,
    pub canvas: web::HtmlCanvasElement,
    pub document: web::Document,
    commands: Vec<SceneCommand>,
}

impl FrameContext {
    pub fn new(
        cfg: &TunnelConfig,
        canvas: web::HtmlCanvasElement,
        document: web::Document,
        gpu: GpuState,
        player: TrackPlayer,
    ) -> Self {
        Self {
            sequencer: Sequencer::new(cfg),
            scheduler: None,
            input: Rc::new(RefCell::new(InputState::default())),
            scene: SceneState::new(cfg.trail_damp),
            gpu,
            player,
            clock: FrameClock::new(Instant::now()),
            canvas,
            document,
            commands: Vec::with_capacity(64),
        }
    }

    pub fn frame(&mut self) {
        let time = self.clock.tick(Instant::now());
        let input = *self.input.borrow();
        self.sequencer.frame(&input, time, &mut self.commands);
        self.apply_commands();

        self.gpu
            .resize_if_needed(self.canvas.width(), self.canvas.height());
        match self.gpu.render(&self.scene) {
            Ok(()) => {}
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => self.gpu.reconfigure(),
            Err(e) => log::error!("render error: {:?}", e),
        }
    }

    /// Beat timer callback: run one beat and arm the next.
    pub fn beat(&mut self) {
        let Some(scheduler) = self.scheduler.as_mut() else {
            log::warn!("[beat] fired without a scheduler");
            return;
        };
        match scheduler.fire(&mut self.sequencer, &mut self.commands) {
            Ok(next) => log::debug!("[beat] next in {} ms", next.as_millis()),
            Err(e) => log::error!("[beat] {}", e),
        }
        self.apply_commands();
    }

    /// Accept the tempo and run the first beat right away.
    pub fn start_beats(&mut self, bpm: f32) -> Result<(), SequencerError> {
        self.sequencer.begin(bpm)?;
        self.beat();
        Ok(())
    }

    fn apply_commands(&mut self) {
        let mut commands = std::mem::take(&mut self.commands);
        for cmd in commands.drain(..) {
            if self.scene.apply(&cmd) {
                continue;
            }
            match cmd {
                SceneCommand::ShowCaption { caption, hold_ms } => {
                    overlay::flash_caption(&self.document, caption, hold_ms)
                }
                SceneCommand::SetSurfaceVisible(visible) => {
                    dom::set_opacity(&self.canvas, if visible { 1.0 } else { 0.0 })
                }
                SceneCommand::SetPlaybackRate(rate) => self.player.set_playback_rate(rate),
                SceneCommand::EnableKeyboard => log::info!("[keys] effect keys 1-6 enabled"),
                other => log::warn!("unhandled scene command {:?}", other),
            }
        }
        // keep the allocation
        self.commands = commands;
    }
}

/// Create the `setTimeout` callback that drives beats and hand the scheduler
/// its timer.
pub fn install_beat_timer(frame_ctx: &Rc<RefCell<FrameContext>>) -> anyhow::Result<()> {
    let window = web::window().ok_or_else(|| anyhow::anyhow!("no window"))?;
    let callback: BeatCallback = Rc::new(RefCell::new(None));
    let ctx = frame_ctx.clone();
    *callback.borrow_mut() = Some(Closure::wrap(Box::new(move || {
        ctx.borrow_mut().beat();
    }) as Box<dyn FnMut()>));
    let timer = WindowTimer::new(window, callback);
    frame_ctx.borrow_mut().scheduler = Some(TempoScheduler::new(timer));
    Ok(())
}

pub fn start_loop(frame_ctx: Rc<RefCell<FrameContext>>) {
    let tick: Rc<RefCell<Option<Closure<dyn FnMut()>>>> = Rc::new(RefCell::new(None));
    let tick_clone = tick.clone();
    *tick.borrow_mut() = Some(Closure::wrap(Box::new(move || {
        frame_ctx.borrow_mut().frame();
        request_frame(&tick_clone);
    }) as Box<dyn FnMut()>));
    request_frame(&tick);
}

fn request_frame(tick: &Rc<RefCell<Option<Closure<dyn FnMut()>>>>) {
    let Some(w) = web::window() else {
        return;
    };
    if let Some(cb) = tick.borrow().as_ref() {
        _ = w.request_animation_frame(cb.as_ref().unchecked_ref());
    }
}
