use crate::speed::Hold;
use crate::timeline::Effect;

pub const BUTTON_LEFT: i16 = 0;
pub const BUTTON_RIGHT: i16 = 2;

/// Pointer state written by the input listeners and read once per frame.
///
/// `pointer_x` is in [-1, 1] (positive toward the left edge) and `pointer_y`
/// in [0, 1] from the top edge.
#[derive(Default, Clone, Copy, Debug, PartialEq)]
pub struct InputState {
    pub pointer_left_down: bool,
    pub pointer_right_down: bool,
    pub pointer_x: f32,
    pub pointer_y: f32,
}

impl InputState {
    #[inline]
    pub fn hold(&self) -> Hold {
        Hold::from_buttons(self.pointer_left_down, self.pointer_right_down)
    }

    /// Record a button transition; buttons other than left/right are ignored.
    pub fn set_button(&mut self, button: i16, down: bool) {
        match button {
            BUTTON_LEFT => self.pointer_left_down = down,
            BUTTON_RIGHT => self.pointer_right_down = down,
            _ => {}
        }
    }

    pub fn set_pointer(&mut self, client_x: f32, client_y: f32, width: f32, height: f32) {
        let [x, y] = normalized_pointer(client_x, client_y, width, height);
        self.pointer_x = x;
        self.pointer_y = y;
    }

    pub fn release_all(&mut self) {
        self.pointer_left_down = false;
        self.pointer_right_down = false;
    }
}

/// Map viewport coordinates to camera-lateral coordinates.
///
/// x is measured from the viewport center and flipped, so the camera leans
/// away from the pointer. Degenerate viewports map to the center.
#[inline]
pub fn normalized_pointer(client_x: f32, client_y: f32, width: f32, height: f32) -> [f32; 2] {
    if width <= 0.0 || height <= 0.0 {
        return [0.0, 0.5];
    }
    let half_w = width * 0.5;
    let x = ((half_w - client_x) / half_w).clamp(-1.0, 1.0);
    let y = (client_y / height).clamp(0.0, 1.0);
    [x, y]
}

#[inline]
pub fn effect_for_key(key: &str) -> Option<Effect> {
    match key {
        "1" => Some(Effect::MoreSegments),
        "2" => Some(Effect::Bounce),
        "3" => Some(Effect::RotateSegments),
        "4" => Some(Effect::RotateContainer),
        "5" => Some(Effect::ShaderMaterial),
        "6" => Some(Effect::OverlayPlane),
        _ => None,
    }
}
