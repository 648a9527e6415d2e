// Shared layout, timeline and control-law constants used by the sequencer and
// the web frontend.

// Tunnel layout
pub const SPACING: u32 = 2; // depth units between two segment groups
pub const SEGMENTS_PER_GROUP: usize = 4;
pub const SIDE_OFFSET: f32 = 5.0; // lateral distance primitives fly in from
pub const SMALL_GROUP_SCALE: f32 = 0.5;
pub const HUE_STEP_DEG: f32 = 10.0; // hue advance per group

// Rest layout of one group before jitter: (x, y) per primitive
pub const REST_LAYOUT: [[f32; 2]; SEGMENTS_PER_GROUP] = [[2.0, 1.0], [-2.0, 1.0], [0.0, 4.0], [0.0, -2.0]];

// Speed controller
pub const SPEED_NEUTRAL: f32 = 1.0;
pub const SPEED_MIN: f32 = 0.02;
pub const SPEED_MAX: f32 = 1.98;
pub const SPEED_BRAKE_FLOOR: f32 = 0.49; // right-hold never brakes below this
pub const ACCEL_PUSH_CEILING: f32 = 0.98;
pub const ACCEL_BRAKE_CEILING: f32 = 1.0;
pub const ACCEL_RELAX_FLOOR: f32 = 0.04;
pub const SPEED_STEP: f32 = 0.051;
pub const PLAYBACK_STEP: f32 = 0.05;

// Timeline thresholds (cumulative tunnel length)
pub const EXTRA_SEGMENTS_AFTER: u32 = 34;
pub const BOUNCE_AFTER: u32 = 66;
pub const ROTATE_SEGMENTS_AFTER: u32 = 98;
pub const ROTATE_CONTAINER_AFTER: u32 = 130;
pub const SHADER_AFTER: u32 = 160;
pub const SHADER_BEFORE: u32 = 252;
pub const HIDE_SURFACE_AT: u32 = 250;
pub const FIRST_CAPTION_AT: u32 = 290;
pub const SECOND_CAPTION_AT: u32 = 376;
pub const BACKDROP_AT: u32 = 388;
pub const TRAIL_BOOST_AT: u32 = 412;
pub const FREE_PLAY_AT: u32 = 520;

// Effect magnitudes
pub const BOUNCE_SCALE: f32 = 1.4;
pub const SEGMENT_ROTATION_STEP: f32 = 0.05; // radians per beat
pub const CONTAINER_ROTATION_STEP: f32 = 0.01; // radians per beat
pub const BACKDROP_DEPTH: f32 = 40.0; // distance ahead of the camera

// Frame clock
pub const FIRST_FRAME_DELTA_MS: f32 = 16.0;
pub const MAX_FRAME_DELTA_MS: f32 = 60.0;

// Tempo analysis window inside the track
pub const ANALYSIS_OFFSET_SEC: f64 = 100.0;
pub const ANALYSIS_DURATION_SEC: f64 = 5.0;

// Post-processing defaults
pub const BLOOM_STRENGTH: f32 = 0.3;
pub const BLOOM_THRESHOLD: f32 = 0.7;
pub const BLOOM_RADIUS: f32 = 0.5;
pub const TRAIL_DAMP: f32 = 0.6;
pub const TRAIL_DAMP_INTENSE: f32 = 0.9;
pub const CLEAR_COLOR: [f32; 3] = [0x21 as f32 / 255.0, 0x21 as f32 / 255.0, 0x21 as f32 / 255.0];

// Captions
pub const CAPTION_HOLD_MS: u32 = 2500;
