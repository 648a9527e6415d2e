//! Bridge to the `web-audio-beat-detector` JS module.

use tunnel_core::{validate_bpm, AnalysisWindow, SequencerError};
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::JsFuture;
use web_sys as web;

#[wasm_bindgen(module = "web-audio-beat-detector")]
extern "C" {
    /// Resolves to `{ bpm, offset, tempo }`.
    #[wasm_bindgen(catch)]
    fn guess(buffer: &web::AudioBuffer, offset: f64, duration: f64) -> Result<js_sys::Promise, JsValue>;
}

/// Estimate the tempo of `buffer` inside `window`.
pub async fn estimate(buffer: &web::AudioBuffer, window: AnalysisWindow) -> Result<f32, SequencerError> {
    let window = window.fit_to(buffer.duration());
    log::info!(
        "[tempo] analyzing {:.1}s from {:.1}s",
        window.duration_sec,
        window.offset_sec
    );
    let promise = guess(buffer, window.offset_sec, window.duration_sec)
        .map_err(|e| SequencerError::TempoEstimation(format!("{:?}", e)))?;
    let result = JsFuture::from(promise)
        .await
        .map_err(|e| SequencerError::TempoEstimation(format!("{:?}", e)))?;
    let bpm = js_sys::Reflect::get(&result, &JsValue::from_str("bpm"))
        .ok()
        .and_then(|v| v.as_f64())
        .ok_or_else(|| SequencerError::TempoEstimation("result has no numeric bpm".into()))?;
    validate_bpm(bpm as f32)
}
