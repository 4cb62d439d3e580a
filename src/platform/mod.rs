//! Platform abstraction layer
//!
//! Collaborators the host feeds into the scheduler each frame:
//! - Dial position (crown, mouse wheel, or a synthetic sweep)
//! - Foreground/background activity

use serde::{Deserialize, Serialize};

use crate::consts::DIAL_FULL_TURN;

/// How the dial device reports its position
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DialRange {
    /// Raw accumulator, turning forever in either direction
    #[default]
    Unbounded,
    /// Wraps into [0, 360) and snaps to multiples of `step` degrees
    Wrapped { step: f32 },
}

impl DialRange {
    /// Shape a raw reading the way the device would report it
    pub fn apply(&self, raw: f32) -> f32 {
        match *self {
            DialRange::Unbounded => raw,
            DialRange::Wrapped { step } => {
                let mut value = raw.rem_euclid(DIAL_FULL_TURN);
                if step > 0.0 {
                    value = (value / step).round() * step;
                }
                if value >= DIAL_FULL_TURN { value - DIAL_FULL_TURN } else { value }
            }
        }
    }
}

/// Absolute dial position source, read once per frame
pub trait DialInput {
    fn read(&mut self) -> f32;
}

/// Dial driven by discrete turns (wheel notches, key presses)
#[derive(Debug, Clone, Default)]
pub struct ManualDial {
    raw: f32,
    range: DialRange,
}

impl ManualDial {
    pub fn new(range: DialRange) -> Self {
        Self { raw: 0.0, range }
    }

    /// Turn by `degrees` (positive is clockwise)
    pub fn turn(&mut self, degrees: f32) {
        if degrees.is_finite() {
            self.raw += degrees;
        }
    }
}

impl DialInput for ManualDial {
    fn read(&mut self) -> f32 {
        self.range.apply(self.raw)
    }
}

/// Dial turning at a constant rate, for headless runs
#[derive(Debug, Clone)]
pub struct SweepDial {
    degrees_per_sec: f32,
    elapsed: f32,
    range: DialRange,
}

impl SweepDial {
    pub fn new(degrees_per_sec: f32, range: DialRange) -> Self {
        Self {
            degrees_per_sec,
            elapsed: 0.0,
            range,
        }
    }

    pub fn advance(&mut self, dt: f32) {
        if dt > 0.0 {
            self.elapsed += dt;
        }
    }
}

impl DialInput for SweepDial {
    fn read(&mut self) -> f32 {
        self.range.apply(self.elapsed * self.degrees_per_sec)
    }
}

/// Foreground-active signal
pub trait ActivityState {
    fn is_active(&self) -> bool;
}

/// Host with no background state (native terminal runs)
#[derive(Debug, Clone, Copy, Default)]
pub struct AlwaysActive;

impl ActivityState for AlwaysActive {
    fn is_active(&self) -> bool {
        true
    }
}

impl ActivityState for bool {
    fn is_active(&self) -> bool {
        *self
    }
}
