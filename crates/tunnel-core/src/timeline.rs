//! Tunnel-length timeline.
//!
//! Up to and including [`FREE_PLAY_AT`] every effect is driven by the
//! cumulative tunnel length: `>` rules repeat on every beat while they hold,
//! `==` rules fire once. Past that length the same effects are driven by
//! [`EffectFlags`] toggled from the keyboard.

use crate::constants::*;
use smallvec::SmallVec;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Phase {
    /// Waiting for a tempo; no beat has fired.
    #[default]
    Intro,
    ScriptedTimeline,
    FreePlay,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Effect {
    MoreSegments,
    Bounce,
    RotateSegments,
    RotateContainer,
    ShaderMaterial,
    OverlayPlane,
}

impl Effect {
    pub const ALL: [Effect; 6] = [
        Effect::MoreSegments,
        Effect::Bounce,
        Effect::RotateSegments,
        Effect::RotateContainer,
        Effect::ShaderMaterial,
        Effect::OverlayPlane,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Effect::MoreSegments => "more segments",
            Effect::Bounce => "bounce",
            Effect::RotateSegments => "rotate segments",
            Effect::RotateContainer => "rotate tunnel",
            Effect::ShaderMaterial => "shader material",
            Effect::OverlayPlane => "overlay plane",
        }
    }
}

/// User-toggled effects, consulted only in [`Phase::FreePlay`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct EffectFlags {
    pub more_segments: bool,
    pub bounce: bool,
    pub rotate_segments: bool,
    pub rotate_container: bool,
    pub shader_material: bool,
    pub overlay_plane: bool,
}

impl EffectFlags {
    pub fn get(&self, effect: Effect) -> bool {
        match effect {
            Effect::MoreSegments => self.more_segments,
            Effect::Bounce => self.bounce,
            Effect::RotateSegments => self.rotate_segments,
            Effect::RotateContainer => self.rotate_container,
            Effect::ShaderMaterial => self.shader_material,
            Effect::OverlayPlane => self.overlay_plane,
        }
    }

    fn slot(&mut self, effect: Effect) -> &mut bool {
        match effect {
            Effect::MoreSegments => &mut self.more_segments,
            Effect::Bounce => &mut self.bounce,
            Effect::RotateSegments => &mut self.rotate_segments,
            Effect::RotateContainer => &mut self.rotate_container,
            Effect::ShaderMaterial => &mut self.shader_material,
            Effect::OverlayPlane => &mut self.overlay_plane,
        }
    }

    /// Flip one flag and return its new value.
    pub fn toggle(&mut self, effect: Effect) -> bool {
        let slot = self.slot(effect);
        *slot = !*slot;
        *slot
    }

    pub fn set(&mut self, effect: Effect, on: bool) {
        *self.slot(effect) = on;
    }

    pub fn active(&self) -> impl Iterator<Item = Effect> + '_ {
        Effect::ALL.into_iter().filter(|e| self.get(*e))
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Caption {
    First,
    Second,
    Tutorial,
}

impl Caption {
    /// DOM id of the element carrying this caption.
    pub fn element_id(self) -> &'static str {
        match self {
            Caption::First => "caption-first",
            Caption::Second => "caption-second",
            Caption::Tutorial => "caption-tutorial",
        }
    }
}

/// One decision of the director for the current beat.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum EffectAction {
    ExtraSegments,
    Bounce,
    RotateSegments,
    RotateContainer,
    ShadeSegments,
    HideSurface,
    FlashCaption(Caption),
    /// Show the surface again, spawn the background plane, enable bloom.
    RevealBackdrop,
    IntensifyTrail,
    /// Remove the plane, show the tutorial and hand effects to the keyboard.
    EnterFreePlay,
    /// Free-play only: whether the overlay plane should exist this beat.
    OverlayPlane(bool),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[repr(u8)]
enum OneShot {
    HideSurface = 1 << 0,
    FirstCaption = 1 << 1,
    SecondCaption = 1 << 2,
    Backdrop = 1 << 3,
    TrailBoost = 1 << 4,
    FreePlay = 1 << 5,
}

pub type Actions = SmallVec<[EffectAction; 8]>;

/// Threshold table over the tunnel length.
///
/// The only state is the set of exact-match actions that already fired, so
/// re-evaluating the same length never repeats a one-shot.
#[derive(Clone, Debug, Default)]
pub struct EffectDirector {
    fired: u8,
}

impl EffectDirector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn plan(&mut self, length: u32, flags: &EffectFlags) -> Actions {
        if length > FREE_PLAY_AT {
            return free_play_actions(flags);
        }
        let mut out = Actions::new();
        if length > EXTRA_SEGMENTS_AFTER && length < FREE_PLAY_AT {
            out.push(EffectAction::ExtraSegments);
        }
        if length > BOUNCE_AFTER {
            out.push(EffectAction::Bounce);
        }
        if length > ROTATE_SEGMENTS_AFTER {
            out.push(EffectAction::RotateSegments);
        }
        if length > ROTATE_CONTAINER_AFTER {
            out.push(EffectAction::RotateContainer);
        }
        if length > SHADER_AFTER && length < SHADER_BEFORE {
            out.push(EffectAction::ShadeSegments);
        }
        let one_shot = match length {
            HIDE_SURFACE_AT => Some((OneShot::HideSurface, EffectAction::HideSurface)),
            FIRST_CAPTION_AT => Some((
                OneShot::FirstCaption,
                EffectAction::FlashCaption(Caption::First),
            )),
            SECOND_CAPTION_AT => Some((
                OneShot::SecondCaption,
                EffectAction::FlashCaption(Caption::Second),
            )),
            BACKDROP_AT => Some((OneShot::Backdrop, EffectAction::RevealBackdrop)),
            TRAIL_BOOST_AT => Some((OneShot::TrailBoost, EffectAction::IntensifyTrail)),
            FREE_PLAY_AT => Some((OneShot::FreePlay, EffectAction::EnterFreePlay)),
            _ => None,
        };
        if let Some((shot, action)) = one_shot {
            if self.take(shot) {
                out.push(action);
            }
        }
        out
    }

    /// Number of exact-match actions that have fired so far.
    pub fn fired_count(&self) -> u32 {
        self.fired.count_ones()
    }

    fn take(&mut self, shot: OneShot) -> bool {
        let bit = shot as u8;
        if self.fired & bit != 0 {
            return false;
        }
        self.fired |= bit;
        true
    }
}

fn free_play_actions(flags: &EffectFlags) -> Actions {
    let mut out = Actions::new();
    if flags.more_segments {
        out.push(EffectAction::ExtraSegments);
    }
    if flags.bounce {
        out.push(EffectAction::Bounce);
    }
    if flags.rotate_segments {
        out.push(EffectAction::RotateSegments);
    }
    if flags.rotate_container {
        out.push(EffectAction::RotateContainer);
    }
    if flags.shader_material {
        out.push(EffectAction::ShadeSegments);
    }
    out.push(EffectAction::OverlayPlane(flags.overlay_plane));
    if flags.overlay_plane {
        out.push(EffectAction::IntensifyTrail);
    }
    out
}
