//! Rendering seam
//!
//! The simulation never draws and never notifies anyone. Hosts call
//! [`Renderer::draw`] themselves after an update reports new state.

pub mod text;

pub use text::TextRenderer;

use crate::sim::{Scheduler, Star, Viewport};

/// Everything a renderer needs for one frame
#[derive(Debug, Clone, Copy)]
pub struct Frame<'a> {
    pub stars: &'a [Star],
    pub viewport: Viewport,
    /// Rotation applied to the whole display face (degrees, clockwise on screen)
    pub rotation_degrees: f32,
    pub clock_text: &'a str,
}

impl<'a> Frame<'a> {
    /// Snapshot the scheduler. Before the field exists the frame has no stars.
    pub fn capture(scheduler: &'a Scheduler, viewport: Viewport) -> Self {
        Self {
            stars: scheduler.field().map(|f| f.stars()).unwrap_or(&[]),
            viewport,
            rotation_degrees: scheduler.display_rotation_degrees(),
            clock_text: scheduler.clock_text(),
        }
    }
}

pub trait Renderer {
    fn draw(&mut self, frame: &Frame<'_>);
}
