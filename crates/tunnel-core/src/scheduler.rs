//! Tempo-locked beat scheduling.
//!
//! The scheduler arms one timer at a time. When it fires, the beat runs
//! first and the next period is computed afterwards from the speed at that
//! moment; the interval already pending is never retimed, so a speed change
//! shows up one beat late.

use crate::error::SequencerError;
use crate::scene::SceneCommand;
use crate::sequencer::Sequencer;
use crate::tempo::{beat_period, validate_bpm};
use std::time::Duration;

/// One-shot timer provided by the host event loop.
pub trait BeatTimer {
    type Handle;

    fn schedule(&mut self, delay: Duration) -> Result<Self::Handle, SequencerError>;
    fn cancel(&mut self, handle: Self::Handle);
}

pub struct TempoScheduler<T: BeatTimer> {
    timer: T,
    pending: Option<T::Handle>,
    armed_period: Option<Duration>,
}

impl<T: BeatTimer> TempoScheduler<T> {
    pub fn new(timer: T) -> Self {
        Self {
            timer,
            pending: None,
            armed_period: None,
        }
    }

    /// Cancel whatever is pending and arm the next beat.
    pub fn arm(&mut self, bpm: f32, speed_factor: f32) -> Result<Duration, SequencerError> {
        let bpm = validate_bpm(bpm)?;
        if !(speed_factor.is_finite() && speed_factor > 0.0) {
            return Err(SequencerError::InvalidSpeed(speed_factor));
        }
        self.cancel_pending();
        let period = beat_period(bpm, speed_factor);
        self.pending = Some(self.timer.schedule(period)?);
        self.armed_period = Some(period);
        Ok(period)
    }

    /// Handle a timer firing: run the beat, then re-arm from the current speed.
    pub fn fire(
        &mut self,
        sequencer: &mut Sequencer,
        out: &mut Vec<SceneCommand>,
    ) -> Result<Duration, SequencerError> {
        // The handle that just fired is spent.
        self.pending = None;
        sequencer.beat_tick(out)?;
        let bpm = sequencer.bpm().ok_or(SequencerError::NotStarted)?;
        self.arm(bpm, sequencer.speed().factor)
    }

    pub fn stop(&mut self) {
        self.cancel_pending();
        self.armed_period = None;
    }

    #[inline]
    pub fn is_armed(&self) -> bool {
        self.pending.is_some()
    }

    /// Period of the interval currently pending.
    #[inline]
    pub fn armed_period(&self) -> Option<Duration> {
        self.armed_period
    }

    fn cancel_pending(&mut self) {
        if let Some(handle) = self.pending.take() {
            self.timer.cancel(handle);
        }
    }
}

impl<T: BeatTimer> Drop for TempoScheduler<T> {
    fn drop(&mut self) {
        self.cancel_pending();
    }
}
