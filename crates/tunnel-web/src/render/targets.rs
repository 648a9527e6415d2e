use super::helpers;

/// Offscreen targets for one frame.
///
/// - `hdr_*` and `depth_*` receive the scene at full resolution.
/// - `trail` is a full-resolution ping-pong pair: each frame blends the new
///   scene with the previous frame's trail into the other slot.
/// - `bloom_*` are half-resolution buffers for the bright pass and blur.
pub(crate) struct RenderTargets {
    #[allow(dead_code)]
    pub(crate) hdr_tex: wgpu::Texture,
    pub(crate) hdr_view: wgpu::TextureView,
    #[allow(dead_code)]
    pub(crate) depth_tex: wgpu::Texture,
    pub(crate) depth_view: wgpu::TextureView,
    pub(crate) trail: [(wgpu::Texture, wgpu::TextureView); 2],
    pub(crate) bloom_a: wgpu::Texture,
    pub(crate) bloom_a_view: wgpu::TextureView,
    #[allow(dead_code)]
    pub(crate) bloom_b: wgpu::Texture,
    pub(crate) bloom_b_view: wgpu::TextureView,
}

impl RenderTargets {
    pub(crate) fn new(device: &wgpu::Device, width: u32, height: u32) -> Self {
        let (hdr_tex, hdr_view) = helpers::create_hdr_texture(device, "hdr_tex", width, height);
        let (depth_tex, depth_view) = helpers::create_depth_texture(device, width, height);
        let trail = [
            helpers::create_hdr_texture(device, "trail_0", width, height),
            helpers::create_hdr_texture(device, "trail_1", width, height),
        ];
        let (bw, bh) = bloom_size(width, height);
        let (bloom_a, bloom_a_view) = helpers::create_hdr_texture(device, "bloom_a", bw, bh);
        let (bloom_b, bloom_b_view) = helpers::create_hdr_texture(device, "bloom_b", bw, bh);
        Self {
            hdr_tex,
            hdr_view,
            depth_tex,
            depth_view,
            trail,
            bloom_a,
            bloom_a_view,
            bloom_b,
            bloom_b_view,
        }
    }

    pub(crate) fn recreate(&mut self, device: &wgpu::Device, width: u32, height: u32) {
        *self = Self::new(device, width, height);
    }

    #[inline]
    pub(crate) fn trail_view(&self, slot: usize) -> &wgpu::TextureView {
        &self.trail[slot & 1].1
    }

    #[inline]
    pub(crate) fn bloom_size(&self) -> (u32, u32) {
        (self.bloom_a.width(), self.bloom_a.height())
    }
}

#[inline]
pub(crate) fn bloom_size(width: u32, height: u32) -> (u32, u32) {
    ((width.max(1) / 2).max(1), (height.max(1) / 2).max(1))
}
