//! Render-side mirror of the tunnel: applies scene commands and produces
//! per-frame instance data.

use crate::render::{linear_rgb, InstanceRaw, KIND_BACKDROP, KIND_BASIC, KIND_SHADER};
use glam::{EulerRot, Mat4, Quat, Vec3};
use tunnel_core::palette::segment_rgb;
use tunnel_core::{Material, SceneCommand, Segment};

const BACKDROP_SIZE: f32 = 80.0;
const BACKDROP_COLOR: [f32; 4] = [0.85, 0.85, 0.9, 1.0];

struct SegmentVisual {
    segment: Segment,
    spawned_at: f32,
    tween_sec: f32,
    // value of the shared spin when this segment appeared
    spin_at_spawn: f32,
}

#[derive(Clone, Copy)]
struct Pulse {
    started_at: f32,
    duration_sec: f32,
    scale: f32,
}

pub struct SceneState {
    segments: Vec<SegmentVisual>,
    spin: f32,
    container_angle: f32,
    pulse: Option<Pulse>,
    backdrop: Option<Vec3>,
    camera: Vec3,
    time: f32,
    bloom: bool,
    trail_damp: f32,
}

impl SceneState {
    pub fn new(trail_damp: f32) -> Self {
        Self {
            segments: Vec::new(),
            spin: 0.0,
            container_angle: 0.0,
            pulse: None,
            backdrop: None,
            camera: Vec3::ZERO,
            time: 0.0,
            bloom: false,
            trail_damp,
        }
    }

    /// Apply a render command. Returns `false` for commands that belong to
    /// another collaborator (captions, audio, DOM).
    pub fn apply(&mut self, cmd: &SceneCommand) -> bool {
        match cmd {
            SceneCommand::SpawnSegment { segment, tween_ms } => {
                self.segments.push(SegmentVisual {
                    segment: *segment,
                    spawned_at: self.time,
                    tween_sec: (tween_ms / 1000.0).max(1e-3),
                    spin_at_spawn: self.spin,
                });
            }
            SceneCommand::PulseSegments { scale, duration_ms } => {
                self.pulse = Some(Pulse {
                    started_at: self.time,
                    duration_sec: (duration_ms / 1000.0).max(1e-3),
                    scale: *scale,
                });
            }
            SceneCommand::RotateSegments { step } => self.spin += step,
            SceneCommand::RotateContainer { step } => self.container_angle += step,
            SceneCommand::SetMaterial { id, material } => {
                if let Some(v) = self.segments.get_mut(id.0 as usize) {
                    v.segment.material = *material;
                }
            }
            SceneCommand::SpawnBackdrop => self.backdrop = Some(self.camera),
            SceneCommand::PlaceBackdrop(pos) => {
                if self.backdrop.is_some() {
                    self.backdrop = Some(*pos);
                }
            }
            SceneCommand::RemoveBackdrop => self.backdrop = None,
            SceneCommand::SetBloom(on) => self.bloom = *on,
            SceneCommand::SetTrailDamp(damp) => self.trail_damp = *damp,
            SceneCommand::SetCamera(pos) => self.camera = *pos,
            SceneCommand::SetTime(t) => self.time = *t,
            SceneCommand::SetSurfaceVisible(_)
            | SceneCommand::ShowCaption { .. }
            | SceneCommand::SetPlaybackRate(_)
            | SceneCommand::EnableKeyboard => return false,
        }
        true
    }

    #[inline]
    pub fn camera(&self) -> Vec3 {
        self.camera
    }

    #[inline]
    pub fn time(&self) -> f32 {
        self.time
    }

    #[inline]
    pub fn bloom(&self) -> bool {
        self.bloom
    }

    #[inline]
    pub fn trail_damp(&self) -> f32 {
        self.trail_damp
    }

    fn pulse_factor(&self) -> f32 {
        let Some(p) = self.pulse else {
            return 1.0;
        };
        let t = (self.time - p.started_at) / p.duration_sec;
        if !(0.0..=1.0).contains(&t) {
            return 1.0;
        }
        // up and back down over the pulse duration
        let tri = 1.0 - (2.0 * t - 1.0).abs();
        1.0 + (p.scale - 1.0) * tri
    }

    pub fn build_instances(&self, out: &mut Vec<InstanceRaw>) {
        out.clear();
        let container = Mat4::from_rotation_z(self.container_angle);
        let pulse = self.pulse_factor();
        for v in &self.segments {
            let seg = &v.segment;
            let t = ((self.time - v.spawned_at) / v.tween_sec).clamp(0.0, 1.0);
            let pos = seg.spawn.lerp(seg.rest, ease_out_cubic(t));
            let spin = self.spin - v.spin_at_spawn;
            let rot = Quat::from_euler(EulerRot::XYZ, spin, spin, 0.0);
            let model = container
                * Mat4::from_scale_rotation_translation(Vec3::splat(seg.scale * pulse), rot, pos);
            let [r, g, b] = linear_rgb(segment_rgb(seg.hue));
            let params = match seg.material {
                Material::Basic => [0.0, 0.0, 0.0, KIND_BASIC],
                Material::Shader { params } => [params.x, params.y, params.z, KIND_SHADER],
            };
            out.push(InstanceRaw::new(model, [r, g, b, 1.0], params));
        }
        if let Some(pos) = self.backdrop {
            let model = Mat4::from_scale_rotation_translation(
                Vec3::new(BACKDROP_SIZE, BACKDROP_SIZE, 0.01),
                Quat::IDENTITY,
                pos,
            );
            out.push(InstanceRaw::new(model, BACKDROP_COLOR, [0.0, 0.0, 0.0, KIND_BACKDROP]));
        }
    }
}

#[inline]
fn ease_out_cubic(t: f32) -> f32 {
    1.0 - (1.0 - t).powi(3)
}
