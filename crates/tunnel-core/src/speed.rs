//! Pointer-driven speed control.
//!
//! Holding the left button pushes the speed factor up, holding the right
//! button brakes it, and releasing both relaxes it back toward neutral. Each
//! step moves the factor by `SPEED_STEP * ease(acceleration)` where the ease is
//! evaluated on the acceleration from *before* the step, so the curve trails
//! the state by one step.

use crate::constants::*;

/// Which pointer buttons are held, reduced to the three control laws.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Hold {
    Faster,
    Slower,
    Released,
    /// Both buttons down; neither law applies.
    Both,
}

impl Hold {
    #[inline]
    pub fn from_buttons(left: bool, right: bool) -> Self {
        match (left, right) {
            (true, false) => Hold::Faster,
            (false, true) => Hold::Slower,
            (false, false) => Hold::Released,
            (true, true) => Hold::Both,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SpeedState {
    pub factor: f32,
    pub acceleration: f32,
}

impl Default for SpeedState {
    fn default() -> Self {
        Self {
            factor: SPEED_NEUTRAL,
            acceleration: 0.0,
        }
    }
}

impl SpeedState {
    /// Advance one integration step and return the playback-rate delta.
    pub fn step(&mut self, hold: Hold) -> f32 {
        let eased = ease_out_quart(self.acceleration);
        let direction = match hold {
            Hold::Faster
                if self.factor < SPEED_MAX && self.acceleration < ACCEL_PUSH_CEILING =>
            {
                self.acceleration += SPEED_STEP;
                1.0
            }
            Hold::Slower
                if self.factor > SPEED_BRAKE_FLOOR && self.acceleration < ACCEL_BRAKE_CEILING =>
            {
                self.acceleration += SPEED_STEP;
                -1.0
            }
            Hold::Released if self.acceleration > ACCEL_RELAX_FLOOR => {
                self.acceleration -= SPEED_STEP;
                relax_direction(self.factor)
            }
            _ => 0.0,
        };
        self.factor = (self.factor + direction * SPEED_STEP * eased).clamp(SPEED_MIN, SPEED_MAX);
        self.acceleration = self.acceleration.clamp(0.0, 1.0);
        direction * PLAYBACK_STEP * eased
    }
}

// Above neutral relaxes down, below relaxes up. Exactly neutral only bleeds
// off acceleration.
#[inline]
fn relax_direction(factor: f32) -> f32 {
    if factor > SPEED_NEUTRAL && factor > SPEED_MIN {
        -1.0
    } else if factor < SPEED_NEUTRAL && factor < SPEED_MAX {
        1.0
    } else {
        0.0
    }
}

/// Quartic ease-out: `1 - (t - 1)^4`.
#[inline]
pub fn ease_out_quart(t: f32) -> f32 {
    1.0 - (t - 1.0).powi(4)
}
