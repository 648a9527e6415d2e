//! Procedural tunnel geometry.
//!
//! Every beat appends one group of four primitives at the new tunnel depth.
//! A group shares a random side (±1) that decides which way its primitives
//! fly in from, and a random jitter that widens the gap between the two
//! side primitives.

use crate::constants::{REST_LAYOUT, SEGMENTS_PER_GROUP, SIDE_OFFSET, SMALL_GROUP_SCALE};
use crate::palette::group_hue;
use crate::scene::SceneCommand;
use glam::Vec3;
use rand::prelude::*;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SegmentId(pub u32);

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Material {
    /// Flat HSL color derived from the segment hue.
    Basic,
    /// Shader variant fed with the segment's normalized position.
    Shader { params: Vec3 },
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Segment {
    pub id: SegmentId,
    /// Beat index (1-based) that spawned this segment.
    pub group: u32,
    pub spawn: Vec3,
    pub rest: Vec3,
    pub scale: f32,
    pub hue: f32,
    pub material: Material,
}

/// Random choices shared by every primitive of one beat.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GroupLayout {
    pub side: f32,
    pub jitter: f32,
}

/// `(spawn, rest)` positions of the four primitives of a group at `depth`.
pub fn group_placements(layout: GroupLayout, depth: f32, scale: f32) -> [(Vec3, Vec3); SEGMENTS_PER_GROUP] {
    let GroupLayout { side, jitter } = layout;
    let z = -depth;
    let rest = [
        [REST_LAYOUT[0][0] + jitter, REST_LAYOUT[0][1]],
        [REST_LAYOUT[1][0] - jitter, REST_LAYOUT[1][1]],
        REST_LAYOUT[2],
        REST_LAYOUT[3],
    ];
    let spawn = [
        [rest[0][0], side * -SIDE_OFFSET],
        [rest[1][0], side * SIDE_OFFSET],
        [side * SIDE_OFFSET, rest[2][1]],
        [side * -SIDE_OFFSET, rest[3][1]],
    ];
    let at = |xy: [f32; 2]| Vec3::new(xy[0] * scale, xy[1] * scale, z);
    [
        (at(spawn[0]), at(rest[0])),
        (at(spawn[1]), at(rest[1])),
        (at(spawn[2]), at(rest[2])),
        (at(spawn[3]), at(rest[3])),
    ]
}

/// Shader parameters for a segment: lateral position over the fly-in
/// distance, depth over the current tunnel length.
#[inline]
pub fn shader_params(rest: Vec3, length: u32) -> Vec3 {
    Vec3::new(
        rest.x / SIDE_OFFSET,
        rest.y / SIDE_OFFSET,
        rest.z / length.max(1) as f32,
    )
}

pub struct TunnelBuilder {
    rng: StdRng,
    spacing: u32,
    length: u32,
    groups: u32,
    segments: Vec<Segment>,
}

impl TunnelBuilder {
    pub fn new(spacing: u32, seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
            spacing,
            length: 0,
            groups: 0,
            segments: Vec::new(),
        }
    }

    /// Advance the tunnel by one spacing and append the beat's main group.
    pub fn advance(&mut self, tween_ms: f32, out: &mut Vec<SceneCommand>) -> GroupLayout {
        self.length += self.spacing;
        self.groups += 1;
        let layout = GroupLayout {
            side: if self.rng.gen_bool(0.5) { 1.0 } else { -1.0 },
            jitter: self.rng.gen::<f32>(),
        };
        self.push_group(layout, 1.0, tween_ms, out);
        layout
    }

    /// Append the half-scale companion group at the current depth.
    pub fn spawn_small(&mut self, layout: GroupLayout, tween_ms: f32, out: &mut Vec<SceneCommand>) {
        self.push_group(layout, SMALL_GROUP_SCALE, tween_ms, out);
    }

    /// Switch every still-basic segment to the shader material.
    pub fn shade_pending(&mut self, out: &mut Vec<SceneCommand>) -> usize {
        let length = self.length;
        let mut shaded = 0;
        for seg in self.segments.iter_mut() {
            if seg.material != Material::Basic {
                continue;
            }
            seg.material = Material::Shader {
                params: shader_params(seg.rest, length),
            };
            out.push(SceneCommand::SetMaterial {
                id: seg.id,
                material: seg.material,
            });
            shaded += 1;
        }
        shaded
    }

    fn push_group(&mut self, layout: GroupLayout, scale: f32, tween_ms: f32, out: &mut Vec<SceneCommand>) {
        let hue = group_hue(self.groups);
        for (spawn, rest) in group_placements(layout, self.length as f32, scale) {
            let segment = Segment {
                id: SegmentId(self.segments.len() as u32),
                group: self.groups,
                spawn,
                rest,
                scale,
                hue,
                material: Material::Basic,
            };
            self.segments.push(segment);
            out.push(SceneCommand::SpawnSegment { segment, tween_ms });
        }
    }

    #[inline]
    pub fn length(&self) -> u32 {
        self.length
    }

    #[inline]
    pub fn groups(&self) -> u32 {
        self.groups
    }

    #[inline]
    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }
}
