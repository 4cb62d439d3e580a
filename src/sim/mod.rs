//! Deterministic simulation module
//!
//! Star motion and dial integration live here. This module must be pure and deterministic:
//! - Seeded RNG only
//! - Stable iteration order (by star index)
//! - No rendering or platform dependencies

pub mod field;
pub mod rotation;
pub mod star;
pub mod tick;

pub use field::{RecyclePolicy, StarField};
pub use rotation::{RotationIntegrator, RotationState};
pub use star::{Star, Viewport};
pub use tick::{FrameReport, Scheduler, SchedulerConfig, TickInput, Ticker};
