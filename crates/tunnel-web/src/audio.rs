use js_sys::ArrayBuffer;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::JsFuture;
use web_sys as web;

/// Fetch and decode the track into an `AudioBuffer`.
pub async fn load_track(audio_ctx: &web::AudioContext, url: &str) -> anyhow::Result<web::AudioBuffer> {
    let window = web::window().ok_or_else(|| anyhow::anyhow!("no window"))?;
    let resp = JsFuture::from(window.fetch_with_str(url))
        .await
        .map_err(|e| anyhow::anyhow!("fetch {} failed: {:?}", url, e))?;
    let resp: web::Response = resp
        .dyn_into()
        .map_err(|e| anyhow::anyhow!("fetch {} returned {:?}", url, e))?;
    if !resp.ok() {
        anyhow::bail!("fetch {} returned HTTP {}", url, resp.status());
    }
    let bytes = JsFuture::from(resp.array_buffer().map_err(|e| anyhow::anyhow!("{:?}", e))?)
        .await
        .map_err(|e| anyhow::anyhow!("{:?}", e))?;
    let bytes: ArrayBuffer = bytes.dyn_into().map_err(|e| anyhow::anyhow!("{:?}", e))?;
    let decoded = JsFuture::from(
        audio_ctx
            .decode_audio_data(&bytes)
            .map_err(|e| anyhow::anyhow!("{:?}", e))?,
    )
    .await
    .map_err(|e| anyhow::anyhow!("decode {} failed: {:?}", url, e))?;
    let buffer: web::AudioBuffer = decoded.dyn_into().map_err(|e| anyhow::anyhow!("{:?}", e))?;
    log::info!(
        "[audio] decoded {} ({:.1} s, {} ch, {} Hz)",
        url,
        buffer.duration(),
        buffer.number_of_channels(),
        buffer.sample_rate()
    );
    Ok(buffer)
}

/// One-shot playback of the decoded track with a variable playback rate.
pub struct TrackPlayer {
    audio_ctx: web::AudioContext,
    buffer: web::AudioBuffer,
    source: Option<web::AudioBufferSourceNode>,
}

impl TrackPlayer {
    pub fn new(audio_ctx: web::AudioContext, buffer: web::AudioBuffer) -> Self {
        Self {
            audio_ctx,
            buffer,
            source: None,
        }
    }

    #[inline]
    pub fn buffer(&self) -> &web::AudioBuffer {
        &self.buffer
    }

    /// Resume the context and start playing from `offset_sec`.
    pub fn start(&mut self, offset_sec: f64) -> anyhow::Result<()> {
        if self.source.is_some() {
            return Ok(());
        }
        _ = self.audio_ctx.resume();
        let source = self
            .audio_ctx
            .create_buffer_source()
            .map_err(|e| anyhow::anyhow!("{:?}", e))?;
        source.set_buffer(Some(&self.buffer));
        source
            .connect_with_audio_node(&self.audio_ctx.destination())
            .map_err(|e| anyhow::anyhow!("{:?}", e))?;
        source
            .start_with_when_and_grid_offset(0.0, offset_sec)
            .map_err(|e| anyhow::anyhow!("{:?}", e))?;
        log::info!("[audio] playback started at {:.1} s", offset_sec);
        self.source = Some(source);
        Ok(())
    }

    pub fn set_playback_rate(&self, rate: f32) {
        if let Some(source) = &self.source {
            source.playback_rate().set_value(rate);
        }
    }
}
