use crate::constants::BACKDROP_DEPTH;
use crate::tempo::beat_period_ms;
use glam::Vec3;

/// New camera depth after one frame.
///
/// `period_ms` is recomputed by the caller from the *current* tempo and speed,
/// so it can briefly disagree with the interval the beat timer has armed.
#[inline]
pub fn advance_depth(camera_z: f32, spacing: u32, frame_delta_ms: f32, period_ms: f32, speed_factor: f32) -> f32 {
    camera_z - (spacing as f32 * frame_delta_ms / period_ms) * speed_factor / 1000.0
}

/// Camera position for this frame: lateral from the pointer, depth integrated.
#[inline]
pub fn camera_position(
    camera: Vec3,
    pointer: [f32; 2],
    spacing: u32,
    frame_delta_ms: f32,
    bpm: f32,
    speed_factor: f32,
) -> Vec3 {
    let period_ms = beat_period_ms(bpm, speed_factor);
    Vec3::new(
        pointer[0],
        pointer[1],
        advance_depth(camera.z, spacing, frame_delta_ms, period_ms, speed_factor),
    )
}

/// Where the background plane sits relative to the camera.
#[inline]
pub fn backdrop_position(camera: Vec3) -> Vec3 {
    Vec3::new(0.0, 0.0, camera.z - BACKDROP_DEPTH)
}
