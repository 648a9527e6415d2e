// Host-side tests for group layout, palette and camera integration.

use glam::Vec3;
use tunnel_core::integrator::{advance_depth, backdrop_position, camera_position};
use tunnel_core::palette::{group_hue, segment_rgb};
use tunnel_core::*;

fn close(a: [f32; 3], b: [f32; 3]) -> bool {
    a.iter().zip(b).all(|(x, y)| (x - y).abs() < 1e-5)
}

#[test]
fn placements_fly_in_from_the_chosen_side() {
    let layout = GroupLayout {
        side: 1.0,
        jitter: 0.0,
    };
    let p = group_placements(layout, 10.0, 1.0);
    assert_eq!(p[0], (Vec3::new(2.0, -5.0, -10.0), Vec3::new(2.0, 1.0, -10.0)));
    assert_eq!(p[1], (Vec3::new(-2.0, 5.0, -10.0), Vec3::new(-2.0, 1.0, -10.0)));
    assert_eq!(p[2], (Vec3::new(5.0, 4.0, -10.0), Vec3::new(0.0, 4.0, -10.0)));
    assert_eq!(p[3], (Vec3::new(-5.0, -2.0, -10.0), Vec3::new(0.0, -2.0, -10.0)));

    let flipped = group_placements(GroupLayout { side: -1.0, ..layout }, 10.0, 1.0);
    assert_eq!(flipped[0].0.y, 5.0);
    assert_eq!(flipped[2].0.x, -5.0);
}

#[test]
fn jitter_widens_side_primitives() {
    let layout = GroupLayout {
        side: 1.0,
        jitter: 0.75,
    };
    let p = group_placements(layout, 4.0, 1.0);
    assert_eq!(p[0].1.x, 2.75);
    assert_eq!(p[1].1.x, -2.75);
    assert_eq!(p[2].1.x, 0.0);
}

#[test]
fn small_group_is_half_scale_at_same_depth() {
    let layout = GroupLayout {
        side: -1.0,
        jitter: 0.5,
    };
    let full = group_placements(layout, 36.0, 1.0);
    let small = group_placements(layout, 36.0, SMALL_GROUP_SCALE);
    for (f, s) in full.iter().zip(small.iter()) {
        assert_eq!(s.1.z, f.1.z);
        assert_eq!(s.1.x, f.1.x * 0.5);
        assert_eq!(s.0.y, f.0.y * 0.5);
    }
}

#[test]
fn builder_groups_share_hue_and_depth() {
    let mut builder = TunnelBuilder::new(SPACING, 1);
    let mut out = Vec::new();
    for _ in 0..3 {
        builder.advance(500.0, &mut out);
    }
    assert_eq!(builder.length(), 6);
    assert_eq!(builder.groups(), 3);
    let last = &builder.segments()[8..];
    assert!(last.iter().all(|s| s.hue == 30.0 && s.rest.z == -6.0 && s.group == 3));
    let ids: Vec<u32> = builder.segments().iter().map(|s| s.id.0).collect();
    assert_eq!(ids, (0..12).collect::<Vec<_>>());
}

#[test]
fn shading_touches_only_basic_segments() {
    let mut builder = TunnelBuilder::new(SPACING, 3);
    let mut out = Vec::new();
    builder.advance(500.0, &mut out);
    assert_eq!(builder.shade_pending(&mut out), 4);
    assert_eq!(builder.shade_pending(&mut out), 0);
    builder.advance(500.0, &mut out);
    assert_eq!(builder.shade_pending(&mut out), 4);
}

#[test]
fn shader_params_normalize_position() {
    let p = shader_params(Vec3::new(2.5, -5.0, -20.0), 40);
    assert_eq!(p, Vec3::new(0.5, -1.0, -0.5));
    // zero length never divides by zero
    assert!(shader_params(Vec3::new(0.0, 0.0, -2.0), 0).is_finite());
}

#[test]
fn hue_wraps_every_36_groups() {
    assert_eq!(group_hue(1), 10.0);
    assert_eq!(group_hue(35), 350.0);
    assert_eq!(group_hue(36), 0.0);
    assert_eq!(group_hue(37), 10.0);
}

#[test]
fn segment_colors_are_mid_saturation() {
    assert!(close(segment_rgb(0.0), [0.75, 0.25, 0.25]));
    assert!(close(segment_rgb(120.0), [0.25, 0.75, 0.25]));
    assert!(close(segment_rgb(240.0), [0.25, 0.25, 0.75]));
}

#[test]
fn depth_advance_scales_with_frame_and_speed() {
    let z = advance_depth(0.0, 2, 16.0, 500.0, 1.0);
    assert!((z + 0.000064).abs() < 1e-9);
    let z_fast = advance_depth(0.0, 2, 16.0, 500.0, 2.0);
    assert!((z_fast - 2.0 * z).abs() < 1e-9);
}

#[test]
fn camera_follows_pointer_laterally() {
    let cam = camera_position(Vec3::new(0.3, 0.3, -1.0), [-0.5, 0.8], 2, 16.0, 120.0, 1.0);
    assert_eq!(cam.x, -0.5);
    assert_eq!(cam.y, 0.8);
    assert!(cam.z < -1.0);
    assert_eq!(backdrop_position(cam), Vec3::new(0.0, 0.0, cam.z - BACKDROP_DEPTH));
}
