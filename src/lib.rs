//! Starfield - an animated starfield clock for small circular displays
//!
//! Core modules:
//! - `sim`: Deterministic simulation (star motion, dial integration, tick scheduling)
//! - `clock`: Wall-clock text for the overlay
//! - `renderer`: Drawing seam plus a text-mode renderer
//! - `platform`: Dial and activity collaborators
//! - `settings`: Variant selection and tuning

pub mod clock;
pub mod platform;
pub mod renderer;
pub mod settings;
pub mod sim;

pub use settings::{Settings, Variant};

use glam::Vec2;

/// Simulation configuration constants
pub mod consts {
    /// Number of stars alive at all times
    pub const STAR_COUNT: usize = 50;

    /// Star radius range (device-independent units)
    pub const STAR_MIN_SIZE: f32 = 1.0;
    pub const STAR_MAX_SIZE: f32 = 3.0;

    /// Star speed range (units per tick)
    pub const STAR_MIN_SPEED: f32 = 0.5;
    pub const STAR_MAX_SPEED: f32 = 2.0;

    /// Star motion period (20 Hz)
    pub const STAR_PERIOD_SECS: f32 = 0.05;
    /// Dial sampling period bounds
    pub const DIAL_MIN_PERIOD_SECS: f32 = 0.05;
    pub const DIAL_MAX_PERIOD_SECS: f32 = 0.1;
    /// Clock text refresh period
    pub const CLOCK_PERIOD_SECS: f32 = 1.0;

    /// Maximum ticks a single ticker may run per frame; older backlog is dropped
    pub const MAX_CATCHUP_TICKS: u32 = 8;

    /// Display degrees per dial degree
    pub const PRIMARY_ROTATION_SCALE: f32 = 2.0;
    pub const VELOCITY_ROTATION_SCALE: f32 = 10.0;

    /// Full dial turn for the wrapped dial range
    pub const DIAL_FULL_TURN: f32 = 360.0;
}

/// Rotate a displacement vector by `radians` about the origin
#[inline]
pub fn rotate(v: Vec2, radians: f32) -> Vec2 {
    if radians == 0.0 {
        return v;
    }
    Vec2::from_angle(radians).rotate(v)
}

/// Rotate `point` by `radians` about `pivot`
#[inline]
pub fn rotate_about(point: Vec2, pivot: Vec2, radians: f32) -> Vec2 {
    pivot + rotate(point - pivot, radians)
}
