//! Character-grid renderer for terminals and logs
//!
//! The grid is masked to the inscribed circle of the viewport, like the round
//! display face. Stars are turned by the display rotation about the center and
//! shaded by opacity; the clock text sits on the middle row.

use glam::Vec2;

use super::{Frame, Renderer};
use crate::rotate_about;

/// Glyphs from faint to bright
const RAMP: [char; 4] = ['.', '+', '*', '@'];
/// Stars dimmer than this aren't drawn
const MIN_VISIBLE_OPACITY: f32 = 0.05;

#[derive(Debug, Clone)]
pub struct TextRenderer {
    cols: usize,
    rows: usize,
    cells: Vec<char>,
}

impl TextRenderer {
    pub fn new(cols: usize, rows: usize) -> Self {
        let cols = cols.max(1);
        let rows = rows.max(1);
        Self {
            cols,
            rows,
            cells: vec![' '; cols * rows],
        }
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cell(&self, col: usize, row: usize) -> char {
        self.cells[row * self.cols + col]
    }

    pub fn row_string(&self, row: usize) -> String {
        self.cells[row * self.cols..(row + 1) * self.cols].iter().collect()
    }

    /// The whole grid, one line per row
    pub fn to_text(&self) -> String {
        (0..self.rows)
            .map(|r| self.row_string(r))
            .collect::<Vec<_>>()
            .join("\n")
    }

    fn glyph(opacity: f32) -> Option<char> {
        if opacity < MIN_VISIBLE_OPACITY {
            return None;
        }
        let idx = ((opacity * RAMP.len() as f32) as usize).min(RAMP.len() - 1);
        Some(RAMP[idx])
    }

    /// Map a viewport point to a grid cell
    fn cell_of(&self, point: Vec2, frame: &Frame<'_>) -> Option<(usize, usize)> {
        let u = point.x / frame.viewport.width;
        let v = point.y / frame.viewport.height;
        if !(0.0..1.0).contains(&u) || !(0.0..1.0).contains(&v) {
            return None;
        }
        Some(((u * self.cols as f32) as usize, (v * self.rows as f32) as usize))
    }

    /// Viewport point at the middle of a grid cell
    fn cell_center(&self, col: usize, row: usize, frame: &Frame<'_>) -> Vec2 {
        Vec2::new(
            (col as f32 + 0.5) / self.cols as f32 * frame.viewport.width,
            (row as f32 + 0.5) / self.rows as f32 * frame.viewport.height,
        )
    }

    fn on_face(&self, point: Vec2, frame: &Frame<'_>) -> bool {
        point.distance(frame.viewport.center()) <= frame.viewport.inscribed_radius()
    }

    fn write_centered(&mut self, row: usize, text: &str) {
        let len = text.chars().count().min(self.cols);
        let start = (self.cols - len) / 2;
        for (i, ch) in text.chars().take(len).enumerate() {
            self.cells[row * self.cols + start + i] = ch;
        }
    }
}

impl Renderer for TextRenderer {
    fn draw(&mut self, frame: &Frame<'_>) {
        self.cells.fill(' ');
        if frame.viewport.is_degenerate() {
            return;
        }

        let center = frame.viewport.center();
        let radians = frame.rotation_degrees.to_radians();

        for star in frame.stars {
            let Some(glyph) = Self::glyph(star.opacity) else {
                continue;
            };
            let point = rotate_about(star.position, center, radians);
            if !self.on_face(point, frame) {
                continue;
            }
            if let Some((col, row)) = self.cell_of(point, frame) {
                let cell = &mut self.cells[row * self.cols + col];
                // Brighter star wins a shared cell
                if RAMP.iter().position(|&c| c == *cell) < RAMP.iter().position(|&c| c == glyph) {
                    *cell = glyph;
                }
            }
        }

        // Nothing shows past the edge of the face
        for row in 0..self.rows {
            for col in 0..self.cols {
                let p = self.cell_center(col, row, frame);
                if !self.on_face(p, frame) {
                    self.cells[row * self.cols + col] = ' ';
                }
            }
        }

        self.write_centered(self.rows / 2, frame.clock_text);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::{Star, Viewport};

    fn star_at(x: f32, y: f32, opacity: f32) -> Star {
        Star {
            position: Vec2::new(x, y),
            size: 2.0,
            opacity,
            angle: 0.0,
            speed: 1.0,
        }
    }

    fn frame<'a>(stars: &'a [Star], rotation_degrees: f32, clock_text: &'a str) -> Frame<'a> {
        Frame {
            stars,
            viewport: Viewport::new(100.0, 100.0),
            rotation_degrees,
            clock_text,
        }
    }

    #[test]
    fn test_clock_centered() {
        let mut r = TextRenderer::new(20, 9);
        r.draw(&frame(&[], 0.0, "9:41:00 AM"));
        assert_eq!(r.row_string(4), "     9:41:00 AM     ");
    }

    #[test]
    fn test_bright_star_drawn() {
        let mut r = TextRenderer::new(10, 10);
        let stars = [star_at(75.0, 25.0, 0.99)];
        r.draw(&frame(&stars, 0.0, ""));
        assert_eq!(r.cell(7, 2), '@');
    }

    #[test]
    fn test_faint_star_hidden() {
        let mut r = TextRenderer::new(10, 10);
        let stars = [star_at(75.0, 25.0, 0.0)];
        r.draw(&frame(&stars, 0.0, ""));
        assert!(r.to_text().chars().all(|c| c == ' ' || c == '\n'));
    }

    #[test]
    fn test_corner_masked_off_face() {
        let mut r = TextRenderer::new(10, 10);
        let stars = [star_at(2.0, 2.0, 1.0)];
        r.draw(&frame(&stars, 0.0, ""));
        assert_eq!(r.cell(0, 0), ' ');
    }

    #[test]
    fn test_rotation_moves_star() {
        let mut r = TextRenderer::new(10, 10);
        let stars = [star_at(75.0, 55.0, 0.6)];
        r.draw(&frame(&stars, 180.0, ""));
        assert_eq!(r.cell(7, 5), ' ');
        assert_eq!(r.cell(2, 4), '*');
    }
}
