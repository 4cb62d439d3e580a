//! Star particles and the viewport they live in

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::consts::*;

/// Drawable area in device-independent units. Its center is the simulation origin.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

impl Viewport {
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// True when either dimension can't host the simulation (zero, negative or NaN)
    pub fn is_degenerate(&self) -> bool {
        !(self.width > 0.0 && self.height > 0.0) || !self.width.is_finite() || !self.height.is_finite()
    }

    pub fn center(&self) -> Vec2 {
        Vec2::new(self.width / 2.0, self.height / 2.0)
    }

    /// Distance from the center to a corner
    pub fn max_distance(&self) -> f32 {
        (self.width / 2.0).hypot(self.height / 2.0)
    }

    /// Radius of the largest circle that fits (the round display face)
    pub fn inscribed_radius(&self) -> f32 {
        self.width.min(self.height) / 2.0
    }
}

/// A single star. Direction, speed and size are fixed for its lifetime.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Star {
    pub position: Vec2,
    pub size: f32,
    /// Always `distance_from_center / max_distance`, recomputed every advance
    pub opacity: f32,
    /// Direction of travel (radians, [0, 2π))
    pub angle: f32,
    pub speed: f32,
}

impl Star {
    /// Spawn an invisible star at `origin` with random direction, speed and size
    pub fn spawn<R: Rng + ?Sized>(origin: Vec2, rng: &mut R) -> Self {
        let (angle, speed, size) = Self::roll(rng);
        Self {
            position: origin,
            size,
            opacity: 0.0,
            angle,
            speed,
        }
    }

    fn roll<R: Rng + ?Sized>(rng: &mut R) -> (f32, f32, f32) {
        let angle = rng.random_range(0.0..std::f32::consts::TAU);
        let speed = rng.random_range(STAR_MIN_SPEED..=STAR_MAX_SPEED);
        let size = rng.random_range(STAR_MIN_SIZE..=STAR_MAX_SIZE);
        (angle, speed, size)
    }

    /// Per-tick displacement along the star's own heading
    #[inline]
    pub fn velocity(&self) -> Vec2 {
        Vec2::new(self.angle.cos() * self.speed, self.angle.sin() * self.speed)
    }

    /// Return to `origin` with zero opacity, keeping heading, speed and size
    pub fn recycle(&mut self, origin: Vec2) {
        self.position = origin;
        self.opacity = 0.0;
    }

    /// Return to `origin` and draw a new heading, speed and size
    pub fn respawn<R: Rng + ?Sized>(&mut self, origin: Vec2, rng: &mut R) {
        *self = Self::spawn(origin, rng);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    #[test]
    fn test_viewport_geometry() {
        let vp = Viewport::new(100.0, 60.0);
        assert_eq!(vp.center(), Vec2::new(50.0, 30.0));
        assert!((vp.max_distance() - 50.0_f32.hypot(30.0)).abs() < 1e-5);
        assert_eq!(vp.inscribed_radius(), 30.0);
    }

    #[test]
    fn test_viewport_degenerate() {
        assert!(Viewport::new(0.0, 100.0).is_degenerate());
        assert!(Viewport::new(100.0, 0.0).is_degenerate());
        assert!(Viewport::new(-5.0, 100.0).is_degenerate());
        assert!(Viewport::new(f32::NAN, 100.0).is_degenerate());
        assert!(Viewport::new(f32::INFINITY, 100.0).is_degenerate());
        assert!(!Viewport::new(1.0, 1.0).is_degenerate());
    }

    #[test]
    fn test_spawn_ranges() {
        let mut rng = Pcg32::seed_from_u64(7);
        for _ in 0..500 {
            let star = Star::spawn(Vec2::new(10.0, 20.0), &mut rng);
            assert_eq!(star.position, Vec2::new(10.0, 20.0));
            assert_eq!(star.opacity, 0.0);
            assert!((0.0..std::f32::consts::TAU).contains(&star.angle));
            assert!((STAR_MIN_SPEED..=STAR_MAX_SPEED).contains(&star.speed));
            assert!((STAR_MIN_SIZE..=STAR_MAX_SIZE).contains(&star.size));
        }
    }

    #[test]
    fn test_recycle_keeps_heading() {
        let mut rng = Pcg32::seed_from_u64(3);
        let mut star = Star::spawn(Vec2::ZERO, &mut rng);
        let (angle, speed, size) = (star.angle, star.speed, star.size);
        star.position = Vec2::new(500.0, 500.0);
        star.opacity = 0.9;

        star.recycle(Vec2::new(1.0, 2.0));
        assert_eq!(star.position, Vec2::new(1.0, 2.0));
        assert_eq!(star.opacity, 0.0);
        assert_eq!((star.angle, star.speed, star.size), (angle, speed, size));
    }
}
