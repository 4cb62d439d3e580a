//! The star field: spawning, motion integration and recycling
//!
//! Stars radiate outward from the viewport center. Each advance moves every star one
//! step along its heading (optionally turned by the dial delta), then either fades it
//! in by distance or sends it back to the center once it leaves the circumscribed
//! circle of the viewport.

use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::star::{Star, Viewport};
use crate::consts::STAR_COUNT;
use crate::rotate;

/// What happens to a star's random parameters when it is recycled
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecyclePolicy {
    /// Reset position and opacity only; the star keeps its heading, speed and size
    #[default]
    CheapReuse,
    /// Reset position and opacity and draw new heading, speed and size
    FreshRandomize,
}

/// Fixed-size collection of stars with its own seeded RNG
#[derive(Debug, Clone)]
pub struct StarField {
    stars: Vec<Star>,
    rng: Pcg32,
    recycle: RecyclePolicy,
}

impl StarField {
    /// Create an empty field whose random draws are fully determined by `seed`
    pub fn new(seed: u64) -> Self {
        Self::with_rng(Pcg32::seed_from_u64(seed))
    }

    pub fn with_rng(rng: Pcg32) -> Self {
        Self {
            stars: Vec::with_capacity(STAR_COUNT),
            rng,
            recycle: RecyclePolicy::default(),
        }
    }

    pub fn with_recycle_policy(mut self, policy: RecyclePolicy) -> Self {
        self.recycle = policy;
        self
    }

    pub fn recycle_policy(&self) -> RecyclePolicy {
        self.recycle
    }

    /// Spawn `STAR_COUNT` stars at the viewport center.
    ///
    /// Not guarded against repeat calls: every call appends another batch. Callers
    /// invoke it once, when the viewport first has a usable size. A degenerate
    /// viewport is a no-op.
    pub fn initialize(&mut self, viewport: Viewport) {
        if viewport.is_degenerate() {
            log::debug!("Skipping star field init for degenerate viewport {:?}", viewport);
            return;
        }

        let center = viewport.center();
        self.stars.reserve(STAR_COUNT);
        for _ in 0..STAR_COUNT {
            self.stars.push(Star::spawn(center, &mut self.rng));
        }

        log::debug!(
            "Star field initialized: {} stars at ({:.1}, {:.1})",
            self.stars.len(),
            center.x,
            center.y
        );
    }

    /// Move every star one step and refresh its opacity.
    ///
    /// `rotation_delta` (radians) turns each step before it is applied; pass 0.0 to
    /// keep trajectories fixed and rotate only the displayed frame.
    pub fn advance(&mut self, viewport: Viewport, rotation_delta: f32) {
        if viewport.is_degenerate() {
            log::debug!("Skipping star field advance for degenerate viewport {:?}", viewport);
            return;
        }

        let center = viewport.center();
        let max_distance = viewport.max_distance();
        let mut recycled = 0usize;

        for star in &mut self.stars {
            let step = rotate(star.velocity(), rotation_delta);
            star.position += step;

            let distance = star.position.distance(center);
            if distance > max_distance {
                match self.recycle {
                    RecyclePolicy::CheapReuse => star.recycle(center),
                    RecyclePolicy::FreshRandomize => star.respawn(center, &mut self.rng),
                }
                recycled += 1;
            } else {
                star.opacity = distance / max_distance;
            }
        }

        if recycled > 0 {
            log::trace!("Recycled {} stars", recycled);
        }
    }

    pub fn stars(&self) -> &[Star] {
        &self.stars
    }

    /// Lets tests place stars directly
    #[cfg(test)]
    pub(crate) fn stars_mut(&mut self) -> &mut [Star] {
        &mut self.stars
    }

    pub fn iter(&self) -> impl Iterator<Item = &Star> {
        self.stars.iter()
    }

    pub fn len(&self) -> usize {
        self.stars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stars.is_empty()
    }

    /// Mean opacity, a cheap summary for logs
    pub fn mean_opacity(&self) -> f32 {
        if self.stars.is_empty() {
            return 0.0;
        }
        self.stars.iter().map(|s| s.opacity).sum::<f32>() / self.stars.len() as f32
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec2;
    use proptest::prelude::*;

    const VP: Viewport = Viewport::new(100.0, 100.0);

    fn field() -> StarField {
        let mut field = StarField::new(12345);
        field.initialize(VP);
        field
    }

    #[test]
    fn test_initialize_count_and_centering() {
        let field = field();
        assert_eq!(field.len(), STAR_COUNT);
        for star in field.iter() {
            assert_eq!(star.position, Vec2::new(50.0, 50.0));
            assert_eq!(star.opacity, 0.0);
        }
    }

    #[test]
    fn test_initialize_twice_appends() {
        let mut field = field();
        field.initialize(VP);
        assert_eq!(field.len(), 2 * STAR_COUNT);
    }

    #[test]
    fn test_advance_keeps_count() {
        let mut field = field();
        for i in 0..500 {
            field.advance(VP, if i % 2 == 0 { 0.0 } else { 0.3 });
            assert_eq!(field.len(), STAR_COUNT);
        }
    }

    #[test]
    fn test_scenario_single_step() {
        let mut field = field();
        {
            let star = &mut field.stars_mut()[0];
            star.angle = 0.0;
            star.speed = 1.0;
        }
        field.advance(VP, 0.0);

        let star = field.stars()[0];
        assert!((star.position.x - 51.0).abs() < 1e-5);
        assert!((star.position.y - 50.0).abs() < 1e-5);
        assert!((VP.max_distance() - 70.7107).abs() < 1e-3);
        assert!((star.opacity - 0.014142).abs() < 1e-5);
    }

    #[test]
    fn test_recycle_out_of_bounds() {
        let mut field = field();
        let max = VP.max_distance();
        let (angle, speed) = {
            let star = &mut field.stars_mut()[0];
            star.angle = 0.0;
            star.position = VP.center() + Vec2::new(max + 0.01, 0.0);
            star.opacity = 1.0;
            (star.angle, star.speed)
        };
        field.advance(VP, 0.0);

        let star = field.stars()[0];
        assert_eq!(star.position, VP.center());
        assert_eq!(star.opacity, 0.0);
        assert_eq!(star.angle, angle);
        assert_eq!(star.speed, speed);
    }

    #[test]
    fn test_fresh_randomize_redraws_heading() {
        let mut field = StarField::new(9).with_recycle_policy(RecyclePolicy::FreshRandomize);
        field.initialize(VP);
        let before = field.stars()[0];
        field.stars_mut()[0].position = Vec2::new(1000.0, 1000.0);
        field.advance(VP, 0.0);

        let after = field.stars()[0];
        assert_eq!(after.position, VP.center());
        assert_eq!(after.opacity, 0.0);
        assert!(after.angle != before.angle || after.speed != before.speed);
    }

    #[test]
    fn test_opacity_increases_until_recycle() {
        let mut field = field();
        field.stars_mut()[0].angle = 0.7;
        field.stars_mut()[0].speed = 1.3;

        let mut last = 0.0;
        loop {
            field.advance(VP, 0.0);
            let star = field.stars()[0];
            if star.position == VP.center() {
                assert_eq!(star.opacity, 0.0);
                break;
            }
            assert!(star.opacity > last, "{} <= {}", star.opacity, last);
            last = star.opacity;
        }
        assert!(last > 0.9);
    }

    #[test]
    fn test_rotation_delta_turns_step() {
        let mut field = field();
        field.stars_mut()[0].angle = 0.0;
        field.stars_mut()[0].speed = 2.0;
        field.advance(VP, std::f32::consts::FRAC_PI_2);

        let star = field.stars()[0];
        assert!((star.position.x - 50.0).abs() < 1e-4);
        assert!((star.position.y - 52.0).abs() < 1e-4);
        // Heading itself is never rewritten
        assert_eq!(star.angle, 0.0);
    }

    #[test]
    fn test_heading_and_speed_fixed_across_ticks() {
        let mut field = field();
        let before: Vec<(f32, f32, f32)> = field.iter().map(|s| (s.angle, s.speed, s.size)).collect();
        for _ in 0..300 {
            field.advance(VP, 0.2);
        }
        let after: Vec<(f32, f32, f32)> = field.iter().map(|s| (s.angle, s.speed, s.size)).collect();
        assert_eq!(before, after);
    }

    #[test]
    fn test_degenerate_viewport_is_noop() {
        let mut empty = StarField::new(1);
        empty.initialize(Viewport::new(0.0, 100.0));
        empty.initialize(Viewport::new(100.0, 0.0));
        assert!(empty.is_empty());

        let mut field = field();
        let snapshot = field.stars().to_vec();
        field.advance(Viewport::new(0.0, 0.0), 0.0);
        field.advance(Viewport::new(100.0, 0.0), 0.5);
        assert_eq!(field.len(), STAR_COUNT);
        assert_eq!(field.stars(), snapshot.as_slice());
    }

    #[test]
    fn test_determinism() {
        let mut a = StarField::new(424242);
        let mut b = StarField::new(424242);
        a.initialize(VP);
        b.initialize(VP);
        for _ in 0..200 {
            a.advance(VP, 0.01);
            b.advance(VP, 0.01);
        }
        assert_eq!(a.stars(), b.stars());
    }

    proptest! {
        #[test]
        fn prop_opacity_bounded_and_count_fixed(
            seed in any::<u64>(),
            width in 1.0f32..500.0,
            height in 1.0f32..500.0,
            delta in -1.0f32..1.0,
            ticks in 1usize..300,
        ) {
            let vp = Viewport::new(width, height);
            let mut field = StarField::new(seed);
            field.initialize(vp);
            for _ in 0..ticks {
                field.advance(vp, delta);
                prop_assert_eq!(field.len(), STAR_COUNT);
                for star in field.iter() {
                    prop_assert!((0.0..=1.0).contains(&star.opacity));
                }
            }
        }

        #[test]
        fn prop_initialize_centers_every_star(
            seed in any::<u64>(),
            width in 1.0f32..2000.0,
            height in 1.0f32..2000.0,
        ) {
            let vp = Viewport::new(width, height);
            let mut field = StarField::new(seed);
            field.initialize(vp);
            prop_assert_eq!(field.len(), STAR_COUNT);
            for star in field.iter() {
                prop_assert_eq!(star.position, vp.center());
            }
        }
    }
}
