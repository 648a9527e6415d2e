// Host-side tests for pointer normalization, button mapping and key bindings.

use std::time::Duration;
use tunnel_core::*;

#[test]
fn pointer_x_is_flipped_around_center() {
    assert_eq!(normalized_pointer(400.0, 0.0, 800.0, 600.0), [0.0, 0.0]);
    assert_eq!(normalized_pointer(0.0, 600.0, 800.0, 600.0), [1.0, 1.0]);
    assert_eq!(normalized_pointer(800.0, 300.0, 800.0, 600.0), [-1.0, 0.5]);
}

#[test]
fn pointer_outside_viewport_is_clamped() {
    assert_eq!(normalized_pointer(-200.0, -10.0, 800.0, 600.0), [1.0, 0.0]);
    assert_eq!(normalized_pointer(2000.0, 900.0, 800.0, 600.0), [-1.0, 1.0]);
}

#[test]
fn degenerate_viewport_maps_to_center() {
    assert_eq!(normalized_pointer(10.0, 10.0, 0.0, 600.0), [0.0, 0.5]);
}

#[test]
fn only_left_and_right_buttons_count() {
    let mut input = InputState::default();
    input.set_button(1, true);
    assert_eq!(input.hold(), Hold::Released);
    input.set_button(BUTTON_LEFT, true);
    assert_eq!(input.hold(), Hold::Faster);
    input.set_button(BUTTON_RIGHT, true);
    assert_eq!(input.hold(), Hold::Both);
    input.set_button(BUTTON_LEFT, false);
    assert_eq!(input.hold(), Hold::Slower);
    input.release_all();
    assert_eq!(input.hold(), Hold::Released);
}

#[test]
fn digit_keys_select_effects() {
    let expected = [
        ("1", Effect::MoreSegments),
        ("2", Effect::Bounce),
        ("3", Effect::RotateSegments),
        ("4", Effect::RotateContainer),
        ("5", Effect::ShaderMaterial),
        ("6", Effect::OverlayPlane),
    ];
    for (key, effect) in expected {
        assert_eq!(effect_for_key(key), Some(effect));
    }
    for key in ["0", "7", "a", " ", "Enter"] {
        assert_eq!(effect_for_key(key), None);
    }
}

#[test]
fn first_frame_reports_nominal_delta() {
    let start = instant::Instant::now();
    let mut clock = FrameClock::new(start);
    let t = clock.tick(start + Duration::from_millis(250));
    assert_eq!(t.delta_ms, FIRST_FRAME_DELTA_MS);
    assert!((t.elapsed_sec - 0.25).abs() < 1e-4);
}

#[test]
fn frame_delta_is_clamped_after_stall() {
    let start = instant::Instant::now();
    let mut clock = FrameClock::new(start);
    clock.tick(start);
    let t = clock.tick(start + Duration::from_millis(20));
    assert!((t.delta_ms - 20.0).abs() < 1e-3);
    let t = clock.tick(start + Duration::from_secs(3));
    assert_eq!(t.delta_ms, MAX_FRAME_DELTA_MS);
    assert!((t.elapsed_sec - 3.0).abs() < 1e-4);
}

#[test]
fn clamp_keeps_deltas_in_range() {
    assert_eq!(clamp_delta_ms(-5.0), 0.0);
    assert_eq!(clamp_delta_ms(33.0), 33.0);
    assert_eq!(clamp_delta_ms(1000.0), MAX_FRAME_DELTA_MS);
}
