use crate::clock::FrameTime;
use crate::config::TunnelConfig;
use crate::constants::{BOUNCE_SCALE, CONTAINER_ROTATION_STEP, SEGMENT_ROTATION_STEP};
use crate::error::SequencerError;
use crate::input::InputState;
use crate::integrator::{backdrop_position, camera_position};
use crate::scene::SceneCommand;
use crate::speed::SpeedState;
use crate::tempo::TempoState;
use crate::timeline::{Caption, Effect, EffectAction, EffectDirector, EffectFlags, Phase};
use crate::tunnel::{GroupLayout, Segment, TunnelBuilder};
use glam::Vec3;

/// Beat-synchronized tunnel sequencer.
///
/// Two independent sources drive it: [`Sequencer::beat_tick`] from the tempo
/// timer and [`Sequencer::frame`] from the display loop. Both run to
/// completion on one thread, so each observes the other's committed state.
pub struct Sequencer {
    spacing: u32,
    tempo: Option<TempoState>,
    phase: Phase,
    speed: SpeedState,
    playback_rate: f32,
    flags: EffectFlags,
    builder: TunnelBuilder,
    director: EffectDirector,
    camera: Vec3,
    surface_visible: bool,
    backdrop: bool,
    bloom: bool,
    trail_damp: f32,
    trail_damp_intense: f32,
    caption_hold_ms: u32,
    keyboard_enabled: bool,
}

impl Sequencer {
    pub fn new(config: &TunnelConfig) -> Self {
        Self {
            spacing: config.spacing,
            tempo: None,
            phase: Phase::Intro,
            speed: SpeedState::default(),
            playback_rate: 1.0,
            flags: EffectFlags::default(),
            builder: TunnelBuilder::new(config.spacing, config.seed),
            director: EffectDirector::new(),
            camera: Vec3::ZERO,
            surface_visible: true,
            backdrop: false,
            bloom: false,
            trail_damp: config.trail_damp,
            trail_damp_intense: config.trail_damp_intense,
            caption_hold_ms: config.caption_hold_ms,
            keyboard_enabled: false,
        }
    }

    /// Accept the estimated tempo. Beats may be ticked from now on.
    pub fn begin(&mut self, bpm: f32) -> Result<(), SequencerError> {
        if self.tempo.is_some() {
            return Err(SequencerError::AlreadyStarted);
        }
        let tempo = TempoState::new(bpm, self.spacing)?;
        log::info!(
            "[tempo] {:.2} bpm, beat period {:.1} ms",
            tempo.bpm(),
            tempo.period_ms(self.speed.factor)
        );
        self.tempo = Some(tempo);
        Ok(())
    }

    /// One beat: grow the tunnel by one group and run the timeline.
    pub fn beat_tick(&mut self, out: &mut Vec<SceneCommand>) -> Result<(), SequencerError> {
        let tempo = self.tempo.ok_or(SequencerError::NotStarted)?;
        if self.phase == Phase::Intro {
            self.phase = Phase::ScriptedTimeline;
            log::info!("[timeline] scripted timeline started");
        }
        let tween_ms = tempo.period_ms(self.speed.factor);
        let layout = self.builder.advance(tween_ms, out);
        let length = self.builder.length();
        log::debug!(
            "[beat] length={} segments={} speed={:.3}",
            length,
            self.builder.segments().len(),
            self.speed.factor
        );
        for action in self.director.plan(length, &self.flags) {
            self.apply(action, layout, tween_ms, out);
        }
        Ok(())
    }

    /// One display frame: speed control, camera integration, per-frame uniforms.
    pub fn frame(&mut self, input: &InputState, time: FrameTime, out: &mut Vec<SceneCommand>) {
        let rate_delta = self.speed.step(input.hold());
        if rate_delta != 0.0 {
            self.playback_rate += rate_delta;
            out.push(SceneCommand::SetPlaybackRate(self.playback_rate));
        }

        let pointer = [input.pointer_x, input.pointer_y];
        self.camera = match self.tempo {
            Some(tempo) => camera_position(
                self.camera,
                pointer,
                self.spacing,
                time.delta_ms,
                tempo.bpm(),
                self.speed.factor,
            ),
            None => Vec3::new(pointer[0], pointer[1], self.camera.z),
        };
        out.push(SceneCommand::SetCamera(self.camera));
        if self.backdrop {
            out.push(SceneCommand::PlaceBackdrop(backdrop_position(self.camera)));
        }
        out.push(SceneCommand::SetTime(time.elapsed_sec));
    }

    /// Flip a free-play effect. Returns `None` while the keyboard is not yet handed over.
    pub fn toggle_effect(&mut self, effect: Effect) -> Option<bool> {
        if !self.keyboard_enabled {
            log::debug!("[keys] {} ignored before free play", effect.label());
            return None;
        }
        let on = self.flags.toggle(effect);
        log::info!("[keys] {} {}", effect.label(), if on { "on" } else { "off" });
        Some(on)
    }

    fn apply(&mut self, action: EffectAction, layout: GroupLayout, tween_ms: f32, out: &mut Vec<SceneCommand>) {
        match action {
            EffectAction::ExtraSegments => self.builder.spawn_small(layout, tween_ms, out),
            EffectAction::Bounce => out.push(SceneCommand::PulseSegments {
                scale: BOUNCE_SCALE,
                duration_ms: tween_ms * 0.5,
            }),
            EffectAction::RotateSegments => out.push(SceneCommand::RotateSegments {
                step: SEGMENT_ROTATION_STEP,
            }),
            EffectAction::RotateContainer => out.push(SceneCommand::RotateContainer {
                step: CONTAINER_ROTATION_STEP,
            }),
            EffectAction::ShadeSegments => {
                self.builder.shade_pending(out);
            }
            EffectAction::HideSurface => self.set_surface(false, out),
            EffectAction::FlashCaption(caption) => out.push(SceneCommand::ShowCaption {
                caption,
                hold_ms: Some(self.caption_hold_ms),
            }),
            EffectAction::RevealBackdrop => {
                self.set_surface(true, out);
                self.set_backdrop(true, out);
                if !self.bloom {
                    self.bloom = true;
                    out.push(SceneCommand::SetBloom(true));
                }
            }
            EffectAction::IntensifyTrail => {
                if self.trail_damp != self.trail_damp_intense {
                    self.trail_damp = self.trail_damp_intense;
                    out.push(SceneCommand::SetTrailDamp(self.trail_damp));
                }
            }
            EffectAction::EnterFreePlay => {
                self.set_backdrop(false, out);
                out.push(SceneCommand::ShowCaption {
                    caption: Caption::Tutorial,
                    hold_ms: None,
                });
                out.push(SceneCommand::EnableKeyboard);
                self.keyboard_enabled = true;
                self.phase = Phase::FreePlay;
                log::info!("[timeline] free play at length {}", self.builder.length());
            }
            EffectAction::OverlayPlane(on) => self.set_backdrop(on, out),
        }
    }

    fn set_surface(&mut self, visible: bool, out: &mut Vec<SceneCommand>) {
        if self.surface_visible != visible {
            self.surface_visible = visible;
            out.push(SceneCommand::SetSurfaceVisible(visible));
        }
    }

    fn set_backdrop(&mut self, present: bool, out: &mut Vec<SceneCommand>) {
        if self.backdrop == present {
            return;
        }
        self.backdrop = present;
        if present {
            out.push(SceneCommand::SpawnBackdrop);
            out.push(SceneCommand::PlaceBackdrop(backdrop_position(self.camera)));
        } else {
            out.push(SceneCommand::RemoveBackdrop);
        }
    }

    #[inline]
    pub fn phase(&self) -> Phase {
        self.phase
    }

    #[inline]
    pub fn length(&self) -> u32 {
        self.builder.length()
    }

    #[inline]
    pub fn bpm(&self) -> Option<f32> {
        self.tempo.map(|t| t.bpm())
    }

    #[inline]
    pub fn is_running(&self) -> bool {
        self.tempo.is_some()
    }

    /// Beat period for the current speed, if the tempo is known.
    #[inline]
    pub fn period_ms(&self) -> Option<f32> {
        self.tempo.map(|t| t.period_ms(self.speed.factor))
    }

    #[inline]
    pub fn speed(&self) -> SpeedState {
        self.speed
    }

    #[inline]
    pub fn playback_rate(&self) -> f32 {
        self.playback_rate
    }

    #[inline]
    pub fn flags(&self) -> &EffectFlags {
        &self.flags
    }

    #[inline]
    pub fn segments(&self) -> &[Segment] {
        self.builder.segments()
    }

    #[inline]
    pub fn camera(&self) -> Vec3 {
        self.camera
    }

    #[inline]
    pub fn keyboard_enabled(&self) -> bool {
        self.keyboard_enabled
    }

    #[inline]
    pub fn backdrop_present(&self) -> bool {
        self.backdrop
    }

    #[inline]
    pub fn bloom_enabled(&self) -> bool {
        self.bloom
    }

    #[inline]
    pub fn trail_damp(&self) -> f32 {
        self.trail_damp
    }

    #[inline]
    pub fn surface_visible(&self) -> bool {
        self.surface_visible
    }
}
