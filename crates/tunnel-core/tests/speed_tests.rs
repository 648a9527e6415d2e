// Host-side tests for the pointer-driven speed controller.

use rand::prelude::*;
use tunnel_core::*;

#[test]
fn ease_out_quart_endpoints_and_monotonicity() {
    assert_eq!(ease_out_quart(0.0), 0.0);
    assert_eq!(ease_out_quart(1.0), 1.0);
    let mut prev = ease_out_quart(0.0);
    for i in 1..=100 {
        let v = ease_out_quart(i as f32 / 100.0);
        assert!(v >= prev, "ease not monotonic at {i}");
        prev = v;
    }
}

#[test]
fn hold_classification_treats_buttons_as_exclusive() {
    assert_eq!(Hold::from_buttons(true, false), Hold::Faster);
    assert_eq!(Hold::from_buttons(false, true), Hold::Slower);
    assert_eq!(Hold::from_buttons(false, false), Hold::Released);
    assert_eq!(Hold::from_buttons(true, true), Hold::Both);
}

#[test]
fn first_push_only_builds_acceleration() {
    // ease is evaluated on the pre-update acceleration, which starts at zero
    let mut s = SpeedState::default();
    let rate = s.step(Hold::Faster);
    assert_eq!(s.factor, 1.0);
    assert!((s.acceleration - SPEED_STEP).abs() < 1e-6);
    assert_eq!(rate, 0.0);

    let rate = s.step(Hold::Faster);
    let expected = SPEED_STEP * ease_out_quart(SPEED_STEP);
    assert!((s.factor - (1.0 + expected)).abs() < 1e-6);
    assert!((rate - PLAYBACK_STEP * ease_out_quart(SPEED_STEP)).abs() < 1e-6);
    assert!(rate > 0.0);
}

#[test]
fn braking_mirrors_pushing_in_sign() {
    let mut s = SpeedState::default();
    s.step(Hold::Slower);
    let rate = s.step(Hold::Slower);
    assert!(s.factor < 1.0);
    assert!(rate < 0.0);
}

#[test]
fn braking_stops_at_floor() {
    let mut s = SpeedState::default();
    for _ in 0..500 {
        s.step(Hold::Slower);
    }
    // the guard is checked before the step, so one step may dip below the floor
    assert!(s.factor > SPEED_BRAKE_FLOOR - SPEED_STEP, "factor {}", s.factor);
    assert!(s.acceleration <= 1.0);
}

#[test]
fn pushing_saturates_acceleration() {
    let mut s = SpeedState::default();
    for _ in 0..200 {
        s.step(Hold::Faster);
    }
    assert_eq!(s.acceleration, 1.0);
    assert!(s.factor > 1.0 && s.factor <= SPEED_MAX);
}

#[test]
fn release_relaxes_toward_neutral_and_settles() {
    let mut s = SpeedState::default();
    for _ in 0..30 {
        s.step(Hold::Faster);
    }
    let pushed = s.factor;
    assert!(pushed > 1.0);
    for _ in 0..200 {
        s.step(Hold::Released);
    }
    assert!(s.factor < pushed, "release should slow down");
    assert!(s.acceleration <= ACCEL_RELAX_FLOOR + 1e-6);
    let settled = s;
    let rate = s.step(Hold::Released);
    assert_eq!(s, settled, "controller keeps moving after settling");
    assert_eq!(rate, 0.0);
}

#[test]
fn release_after_braking_speeds_back_up() {
    let mut s = SpeedState::default();
    for _ in 0..15 {
        s.step(Hold::Slower);
    }
    let braked = s.factor;
    assert!(braked < 1.0);
    let rate = s.step(Hold::Released);
    assert!(s.factor > braked);
    assert!(rate > 0.0);
}

#[test]
fn both_buttons_change_nothing() {
    let mut s = SpeedState {
        factor: 1.3,
        acceleration: 0.5,
    };
    let before = s;
    let rate = s.step(Hold::Both);
    assert_eq!(s, before);
    assert_eq!(rate, 0.0);
}

#[test]
fn speed_and_acceleration_stay_bounded_for_any_input() {
    let holds = [Hold::Faster, Hold::Slower, Hold::Released, Hold::Both];
    for seed in 0..32u64 {
        let mut rng = StdRng::seed_from_u64(seed);
        let mut s = SpeedState::default();
        let mut current = Hold::Released;
        for step in 0..5_000 {
            // hold each input for a random stretch like a real pointer
            if rng.gen_bool(0.05) {
                current = *holds.choose(&mut rng).unwrap();
            }
            s.step(current);
            assert!(
                (SPEED_MIN..=SPEED_MAX).contains(&s.factor),
                "seed {seed} step {step}: factor {}",
                s.factor
            );
            assert!(
                (0.0..=1.0).contains(&s.acceleration),
                "seed {seed} step {step}: acceleration {}",
                s.acceleration
            );
        }
    }
}

#[test]
fn playback_delta_tracks_speed_delta() {
    let mut s = SpeedState::default();
    for _ in 0..10 {
        let before = s.factor;
        let rate = s.step(Hold::Faster);
        let delta = s.factor - before;
        // both scale the same eased value: 0.05 vs 0.051
        assert!((rate - delta * PLAYBACK_STEP / SPEED_STEP).abs() < 1e-5);
    }
}
