use crate::constants::HUE_STEP_DEG;

/// Hue (degrees) of the n-th segment group: ten degrees further per group.
#[inline]
pub fn group_hue(group: u32) -> f32 {
    (group as f32 * HUE_STEP_DEG) % 360.0
}

/// Convert HSL (hue in degrees, saturation/lightness in 0..1) to RGB in 0..1.
pub fn hsl_to_rgb(hue_deg: f32, saturation: f32, lightness: f32) -> [f32; 3] {
    let h = hue_deg.rem_euclid(360.0) / 60.0;
    let c = (1.0 - (2.0 * lightness - 1.0).abs()) * saturation;
    let x = c * (1.0 - (h % 2.0 - 1.0).abs());
    let m = lightness - c * 0.5;
    let (r, g, b) = match h as u32 {
        0 => (c, x, 0.0),
        1 => (x, c, 0.0),
        2 => (0.0, c, x),
        3 => (0.0, x, c),
        4 => (x, 0.0, c),
        _ => (c, 0.0, x),
    };
    [r + m, g + m, b + m]
}

/// Segment color used by the basic material: HSL(hue, 50%, 50%).
#[inline]
pub fn segment_rgb(hue_deg: f32) -> [f32; 3] {
    hsl_to_rgb(hue_deg, 0.5, 0.5)
}
