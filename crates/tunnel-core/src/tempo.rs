use crate::constants::{ANALYSIS_DURATION_SEC, ANALYSIS_OFFSET_SEC, SPACING};
use crate::error::SequencerError;
use std::time::Duration;

/// Tempo of the analyzed track plus the fixed distance between segment groups.
///
/// `bpm` is only ever constructed through [`TempoState::new`], which rejects
/// zero, negative and non-finite values.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TempoState {
    bpm: f32,
    pub spacing: u32,
}

impl TempoState {
    pub fn new(bpm: f32, spacing: u32) -> Result<Self, SequencerError> {
        Ok(Self {
            bpm: validate_bpm(bpm)?,
            spacing,
        })
    }

    pub fn with_default_spacing(bpm: f32) -> Result<Self, SequencerError> {
        Self::new(bpm, SPACING)
    }

    #[inline]
    pub fn bpm(&self) -> f32 {
        self.bpm
    }

    /// Beat period at the given speed multiplier, in milliseconds.
    #[inline]
    pub fn period_ms(&self, speed_factor: f32) -> f32 {
        beat_period_ms(self.bpm, speed_factor)
    }
}

/// Slice of the track handed to the tempo estimator.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AnalysisWindow {
    pub offset_sec: f64,
    pub duration_sec: f64,
}

impl Default for AnalysisWindow {
    fn default() -> Self {
        Self {
            offset_sec: ANALYSIS_OFFSET_SEC,
            duration_sec: ANALYSIS_DURATION_SEC,
        }
    }
}

impl AnalysisWindow {
    /// Shift the window so it fits inside a track of `track_sec` seconds.
    ///
    /// Short tracks are analyzed from the start; the duration is never
    /// stretched beyond the track.
    pub fn fit_to(&self, track_sec: f64) -> Self {
        let duration_sec = self.duration_sec.min(track_sec.max(0.0));
        let latest_offset = (track_sec - duration_sec).max(0.0);
        Self {
            offset_sec: self.offset_sec.min(latest_offset),
            duration_sec,
        }
    }
}

#[inline]
pub fn validate_bpm(bpm: f32) -> Result<f32, SequencerError> {
    if bpm.is_finite() && bpm > 0.0 {
        Ok(bpm)
    } else {
        Err(SequencerError::InvalidTempo(bpm))
    }
}

/// `(60 / bpm) * 1000 * (1 / speed_factor)`.
#[inline]
pub fn beat_period_ms(bpm: f32, speed_factor: f32) -> f32 {
    (60.0 / bpm) * 1000.0 * (1.0 / speed_factor)
}

#[inline]
pub fn beat_period(bpm: f32, speed_factor: f32) -> Duration {
    Duration::from_secs_f64(beat_period_ms(bpm, speed_factor) as f64 / 1000.0)
}
