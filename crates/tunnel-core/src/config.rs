//! Session configuration.
//!
//! Defaults come from `constants.rs`; the page URL can override a few of them:
//!
//! - `?bpm=126` skip tempo estimation and use this tempo (still validated)
//! - `?seed=7` fix the tunnel layout RNG
//! - `?track=sounds/other.mp3` play a different track
//! - `#debug` raise the log level
//!
//! Each key is parsed on its own. A malformed value is logged and the key
//! keeps its default, except `bpm`: a rejected tempo override leaves the
//! tunnel idle, the same as a failed estimation.

use crate::constants::*;
use crate::tempo::{validate_bpm, AnalysisWindow};
use anyhow::Context;

pub const DEFAULT_TRACK_URL: &str = "sounds/track.mp3";
pub const DEFAULT_SEED: u64 = 0x7A11_5EED;

#[derive(Clone, Debug, PartialEq)]
pub struct BloomParams {
    pub strength: f32,
    pub threshold: f32,
    pub radius: f32,
}

impl Default for BloomParams {
    fn default() -> Self {
        Self {
            strength: BLOOM_STRENGTH,
            threshold: BLOOM_THRESHOLD,
            radius: BLOOM_RADIUS,
        }
    }
}

/// Where the session tempo comes from.
#[derive(Clone, Debug, Default, PartialEq)]
pub enum TempoSource {
    /// Estimate from the decoded track.
    #[default]
    Estimate,
    /// `?bpm=` override, already validated.
    Fixed(f32),
    /// `?bpm=` was present but unusable; the tunnel stays in the intro.
    Rejected(String),
}

#[derive(Clone, Debug, PartialEq)]
pub struct TunnelConfig {
    pub spacing: u32,
    pub analysis: AnalysisWindow,
    pub bloom: BloomParams,
    pub trail_damp: f32,
    pub trail_damp_intense: f32,
    pub clear_color: [f32; 3],
    pub caption_hold_ms: u32,
    pub track_url: String,
    pub seed: u64,
    pub tempo: TempoSource,
    pub debug: bool,
    /// Query values that were malformed, for logging once a logger exists.
    pub rejected: Vec<String>,
}

impl Default for TunnelConfig {
    fn default() -> Self {
        Self {
            spacing: SPACING,
            analysis: AnalysisWindow::default(),
            bloom: BloomParams::default(),
            trail_damp: TRAIL_DAMP,
            trail_damp_intense: TRAIL_DAMP_INTENSE,
            clear_color: CLEAR_COLOR,
            caption_hold_ms: CAPTION_HOLD_MS,
            track_url: DEFAULT_TRACK_URL.to_string(),
            seed: DEFAULT_SEED,
            tempo: TempoSource::Estimate,
            debug: false,
            rejected: Vec::new(),
        }
    }
}

impl TunnelConfig {
    /// Build a config from `location.search` and `location.hash`.
    ///
    /// Unknown keys are ignored. A malformed value only affects its own key.
    pub fn from_location(search: &str, hash: &str) -> Self {
        let mut cfg = Self::default();
        for (key, value) in query_pairs(search) {
            if let Err(e) = cfg.apply_query(key, value) {
                let reason = format!("{:#}", e);
                if key == "bpm" {
                    cfg.tempo = TempoSource::Rejected(reason.clone());
                }
                cfg.rejected.push(reason);
            }
        }
        if hash.trim_start_matches('#') == "debug" {
            cfg.debug = true;
        }
        cfg
    }

    fn apply_query(&mut self, key: &str, value: &str) -> anyhow::Result<()> {
        match key {
            "bpm" => {
                let bpm: f32 = value
                    .parse()
                    .with_context(|| format!("bpm override {value:?} is not a number"))?;
                let bpm = validate_bpm(bpm).context("bpm override rejected")?;
                self.tempo = TempoSource::Fixed(bpm);
            }
            "seed" => {
                self.seed = value
                    .parse()
                    .with_context(|| format!("seed {value:?} is not an unsigned integer"))?;
            }
            "track" if !value.is_empty() => self.track_url = value.to_string(),
            "debug" => self.debug = true,
            _ => {}
        }
        Ok(())
    }
}

fn query_pairs(search: &str) -> impl Iterator<Item = (&str, &str)> {
    search
        .trim_start_matches('?')
        .split('&')
        .filter(|pair| !pair.is_empty())
        .map(|pair| pair.split_once('=').unwrap_or((pair, "")))
}
