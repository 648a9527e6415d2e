// Host-side tests for the tunnel-length threshold table.

use tunnel_core::*;

fn one_shots(actions: &[EffectAction]) -> Vec<EffectAction> {
    actions
        .iter()
        .copied()
        .filter(|a| {
            matches!(
                a,
                EffectAction::HideSurface
                    | EffectAction::FlashCaption(_)
                    | EffectAction::RevealBackdrop
                    | EffectAction::IntensifyTrail
                    | EffectAction::EnterFreePlay
            )
        })
        .collect()
}

#[test]
fn nothing_fires_early_in_the_tunnel() {
    let mut director = EffectDirector::new();
    let flags = EffectFlags::default();
    for length in 0..=EXTRA_SEGMENTS_AFTER {
        assert!(
            director.plan(length, &flags).is_empty(),
            "unexpected action at {length}"
        );
    }
}

#[test]
fn range_rules_switch_on_past_their_threshold() {
    let mut director = EffectDirector::new();
    let flags = EffectFlags::default();
    let has = |actions: &Actions, a: EffectAction| actions.contains(&a);

    let a = director.plan(36, &flags);
    assert!(has(&a, EffectAction::ExtraSegments));
    assert!(!has(&a, EffectAction::Bounce));

    let a = director.plan(66, &flags);
    assert!(!has(&a, EffectAction::Bounce));
    let a = director.plan(68, &flags);
    assert!(has(&a, EffectAction::Bounce));
    assert!(!has(&a, EffectAction::RotateSegments));

    let a = director.plan(100, &flags);
    assert!(has(&a, EffectAction::RotateSegments));
    assert!(!has(&a, EffectAction::RotateContainer));

    let a = director.plan(132, &flags);
    assert!(has(&a, EffectAction::RotateContainer));
    assert!(!has(&a, EffectAction::ShadeSegments));
}

#[test]
fn shader_range_is_exclusive_on_both_ends() {
    let mut director = EffectDirector::new();
    let flags = EffectFlags::default();
    assert!(!director.plan(160, &flags).contains(&EffectAction::ShadeSegments));
    assert!(director.plan(162, &flags).contains(&EffectAction::ShadeSegments));
    assert!(director.plan(250, &flags).contains(&EffectAction::ShadeSegments));
    assert!(!director.plan(252, &flags).contains(&EffectAction::ShadeSegments));
}

#[test]
fn extra_segments_stop_at_free_play_edge() {
    let mut director = EffectDirector::new();
    let flags = EffectFlags::default();
    assert!(director.plan(518, &flags).contains(&EffectAction::ExtraSegments));
    assert!(!director.plan(520, &flags).contains(&EffectAction::ExtraSegments));
    assert!(!director.plan(522, &flags).contains(&EffectAction::ExtraSegments));
}

#[test]
fn one_shots_fire_exactly_once_over_unit_sweep() {
    let mut director = EffectDirector::new();
    let flags = EffectFlags::default();
    let mut fired = Vec::new();
    for length in 0..=600u32 {
        // evaluate every value twice; the second pass must stay silent
        for _ in 0..2 {
            let actions = director.plan(length, &flags);
            for a in one_shots(&actions) {
                fired.push((length, a));
            }
        }
    }
    assert_eq!(
        fired,
        vec![
            (250, EffectAction::HideSurface),
            (290, EffectAction::FlashCaption(Caption::First)),
            (376, EffectAction::FlashCaption(Caption::Second)),
            (388, EffectAction::RevealBackdrop),
            (412, EffectAction::IntensifyTrail),
            (520, EffectAction::EnterFreePlay),
        ]
    );
    assert_eq!(director.fired_count(), 6);
}

#[test]
fn free_play_follows_flags_instead_of_length() {
    let mut director = EffectDirector::new();
    let mut flags = EffectFlags::default();

    let idle = director.plan(600, &flags);
    assert_eq!(idle.as_slice(), &[EffectAction::OverlayPlane(false)]);

    flags.toggle(Effect::Bounce);
    flags.toggle(Effect::ShaderMaterial);
    let a = director.plan(602, &flags);
    assert!(a.contains(&EffectAction::Bounce));
    assert!(a.contains(&EffectAction::ShadeSegments));
    assert!(!a.contains(&EffectAction::ExtraSegments));
    assert!(!a.contains(&EffectAction::RotateSegments));
}

#[test]
fn overlay_flag_retriggers_trail_intensity() {
    let mut director = EffectDirector::new();
    let mut flags = EffectFlags::default();
    flags.set(Effect::OverlayPlane, true);
    for length in [522, 524, 526] {
        let a = director.plan(length, &flags);
        assert!(a.contains(&EffectAction::OverlayPlane(true)));
        assert!(a.contains(&EffectAction::IntensifyTrail));
    }
}

#[test]
fn flags_toggle_independently() {
    let mut flags = EffectFlags::default();
    assert_eq!(flags.active().count(), 0);
    for effect in Effect::ALL {
        assert!(flags.toggle(effect));
    }
    assert_eq!(flags.active().count(), 6);
    assert!(!flags.toggle(Effect::RotateContainer));
    assert!(!flags.get(Effect::RotateContainer));
    assert!(flags.get(Effect::RotateSegments));
    assert_eq!(flags.active().count(), 5);
}

#[test]
fn caption_element_ids_are_distinct() {
    let ids = [
        Caption::First.element_id(),
        Caption::Second.element_id(),
        Caption::Tutorial.element_id(),
    ];
    assert_ne!(ids[0], ids[1]);
    assert_ne!(ids[1], ids[2]);
    assert_ne!(ids[0], ids[2]);
}
