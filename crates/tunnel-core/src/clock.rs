use crate::constants::{FIRST_FRAME_DELTA_MS, MAX_FRAME_DELTA_MS};
use instant::Instant;

/// Timing of one display frame.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FrameTime {
    /// Milliseconds since the previous frame, clamped to [`MAX_FRAME_DELTA_MS`].
    pub delta_ms: f32,
    /// Seconds since the clock started.
    pub elapsed_sec: f32,
}

/// Frame delta source for the render loop.
///
/// The first frame reports a nominal 16 ms; a stalled or backgrounded loop
/// never produces a step longer than 60 ms.
#[derive(Clone, Debug)]
pub struct FrameClock {
    start: Instant,
    last: Option<Instant>,
}

impl FrameClock {
    pub fn new(start: Instant) -> Self {
        Self { start, last: None }
    }

    pub fn tick(&mut self, now: Instant) -> FrameTime {
        let delta_ms = match self.last {
            Some(last) => clamp_delta_ms(now.duration_since(last).as_secs_f32() * 1000.0),
            None => FIRST_FRAME_DELTA_MS,
        };
        self.last = Some(now);
        FrameTime {
            delta_ms,
            elapsed_sec: now.duration_since(self.start).as_secs_f32(),
        }
    }
}

#[inline]
pub fn clamp_delta_ms(delta_ms: f32) -> f32 {
    delta_ms.clamp(0.0, MAX_FRAME_DELTA_MS)
}
