//! Commands the sequencer emits for the renderer, caption layer and audio
//! source. The core never touches those collaborators directly; the frontend
//! drains the command list after every beat and every frame.

use crate::timeline::Caption;
use crate::tunnel::{Material, Segment, SegmentId};
use glam::Vec3;

#[derive(Clone, Debug, PartialEq)]
pub enum SceneCommand {
    /// Add a primitive and tween it from `segment.spawn` to `segment.rest`.
    SpawnSegment { segment: Segment, tween_ms: f32 },
    /// Scale every segment up to `scale` and back over `duration_ms`.
    PulseSegments { scale: f32, duration_ms: f32 },
    /// Rotate every segment by `step` radians about its own X and Y axes.
    RotateSegments { step: f32 },
    /// Rotate the whole tunnel container about the view axis.
    RotateContainer { step: f32 },
    SetMaterial { id: SegmentId, material: Material },
    /// Fade the render surface out (false) or in (true).
    SetSurfaceVisible(bool),
    /// Fade a caption in; `hold_ms` fades it back out after that delay.
    ShowCaption { caption: Caption, hold_ms: Option<u32> },
    SpawnBackdrop,
    PlaceBackdrop(Vec3),
    RemoveBackdrop,
    SetBloom(bool),
    SetTrailDamp(f32),
    SetCamera(Vec3),
    /// Elapsed seconds for time-varying shader uniforms.
    SetTime(f32),
    SetPlaybackRate(f32),
    /// Keyboard toggles are accepted from now on.
    EnableKeyboard,
}
