//! Dial rotation integration
//!
//! The dial reports an absolute position. Each sample turns it into a display angle
//! and, when velocity rotation is enabled, a per-tick delta that steers star motion.

use serde::{Deserialize, Serialize};

/// Dial registers. Written only by [`RotationIntegrator::sample`].
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct RotationState {
    pub absolute_dial_value: f32,
    pub previous_absolute_dial_value: f32,
    pub display_rotation_degrees: f32,
}

#[derive(Debug, Clone)]
pub struct RotationIntegrator {
    state: RotationState,
    scale_factor: f32,
    rotate_velocity: bool,
    last_delta: f32,
}

impl RotationIntegrator {
    /// `scale_factor` is display degrees per dial degree. With `rotate_velocity`
    /// off, samples only turn the displayed frame and the returned delta is zero.
    pub fn new(scale_factor: f32, rotate_velocity: bool) -> Self {
        Self {
            state: RotationState::default(),
            scale_factor,
            rotate_velocity,
            last_delta: 0.0,
        }
    }

    /// Take one dial sample and return the velocity-rotation delta in radians.
    ///
    /// The value is accepted as-is, whether unbounded or pre-wrapped by the dial.
    pub fn sample(&mut self, absolute: f32) -> f32 {
        let state = &mut self.state;
        state.absolute_dial_value = absolute;
        state.display_rotation_degrees = absolute * self.scale_factor;

        let delta = if self.rotate_velocity {
            (state.absolute_dial_value - state.previous_absolute_dial_value).to_radians()
                * self.scale_factor
        } else {
            0.0
        };
        // Must follow the delta computation
        state.previous_absolute_dial_value = state.absolute_dial_value;

        self.last_delta = delta;
        delta
    }

    pub fn state(&self) -> &RotationState {
        &self.state
    }

    pub fn display_rotation_degrees(&self) -> f32 {
        self.state.display_rotation_degrees
    }

    pub fn display_rotation_radians(&self) -> f32 {
        self.state.display_rotation_degrees.to_radians()
    }

    /// Delta produced by the most recent sample
    pub fn last_delta(&self) -> f32 {
        self.last_delta
    }

    pub fn scale_factor(&self) -> f32 {
        self.scale_factor
    }

    pub fn rotates_velocity(&self) -> bool {
        self.rotate_velocity
    }
}
