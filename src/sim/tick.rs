//! Fixed-period scheduling
//!
//! The host pumps [`Scheduler::update`] from its frame callback with the elapsed
//! wall time. Independent tickers decide how many dial samples, star steps and clock
//! refreshes are due. Everything runs on the caller's thread.

use super::field::{RecyclePolicy, StarField};
use super::rotation::RotationIntegrator;
use super::star::Viewport;
use crate::clock::{Clock, LocalClock};
use crate::consts::*;

/// Fixed-period trigger fed with elapsed time
#[derive(Debug, Clone)]
pub struct Ticker {
    period: f32,
    accumulator: f32,
}

impl Ticker {
    pub fn new(period: f32) -> Self {
        Self {
            period: period.max(1e-3),
            accumulator: 0.0,
        }
    }

    pub fn period(&self) -> f32 {
        self.period
    }

    /// Add `dt` seconds and return how many ticks are due.
    ///
    /// At most `MAX_CATCHUP_TICKS` fire per call; backlog beyond that is dropped so a
    /// long stall (backgrounded tab, suspended process) doesn't replay in a burst.
    pub fn poll(&mut self, dt: f32) -> u32 {
        if !(dt > 0.0) {
            return 0;
        }

        self.accumulator += dt;
        let mut ticks = 0;
        while self.accumulator >= self.period && ticks < MAX_CATCHUP_TICKS {
            self.accumulator -= self.period;
            ticks += 1;
        }
        if self.accumulator >= self.period {
            log::trace!("Dropping {:.3}s of tick backlog", self.accumulator);
            self.accumulator %= self.period;
        }
        ticks
    }
}

/// Collaborator readings for one frame
#[derive(Debug, Clone, Copy)]
pub struct TickInput {
    /// Absolute dial position, in dial degrees
    pub dial_value: f32,
    /// Foreground-active signal; star steps are skipped while false if the
    /// scheduler pauses on background
    pub active: bool,
}

impl Default for TickInput {
    fn default() -> Self {
        Self {
            dial_value: 0.0,
            active: true,
        }
    }
}

/// What one update did, so the host knows whether to redraw
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FrameReport {
    pub dial_ticks: u32,
    pub star_ticks: u32,
    pub skipped_star_ticks: u32,
    pub clock_ticks: u32,
}

impl FrameReport {
    pub fn needs_redraw(&self) -> bool {
        self.dial_ticks > 0 || self.star_ticks > 0 || self.clock_ticks > 0
    }
}

#[derive(Debug, Clone)]
pub struct SchedulerConfig {
    pub seed: u64,
    pub rotation_scale: f32,
    pub rotate_velocity: bool,
    pub recycle: RecyclePolicy,
    pub star_period: f32,
    pub dial_period: f32,
    pub clock_period: f32,
    pub pause_on_background: bool,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            seed: 0,
            rotation_scale: PRIMARY_ROTATION_SCALE,
            rotate_velocity: false,
            recycle: RecyclePolicy::CheapReuse,
            star_period: STAR_PERIOD_SECS,
            dial_period: DIAL_MIN_PERIOD_SECS,
            clock_period: CLOCK_PERIOD_SECS,
            pause_on_background: false,
        }
    }
}

/// Owns the star field and dial integrator and drives them from elapsed time
pub struct Scheduler {
    config: SchedulerConfig,
    field: Option<StarField>,
    rotation: RotationIntegrator,
    star_ticker: Ticker,
    dial_ticker: Ticker,
    clock_ticker: Ticker,
    /// Committed dial delta not yet applied to star motion (radians)
    pending_delta: f32,
    clock: Box<dyn Clock>,
    clock_text: String,
    /// Star steps applied so far
    time_ticks: u64,
}

impl Scheduler {
    pub fn new(config: SchedulerConfig) -> Self {
        Self::with_clock(config, Box::new(LocalClock))
    }

    pub fn with_clock(config: SchedulerConfig, clock: Box<dyn Clock>) -> Self {
        let clock_text = clock.now_string();
        Self {
            field: None,
            rotation: RotationIntegrator::new(config.rotation_scale, config.rotate_velocity),
            star_ticker: Ticker::new(config.star_period),
            dial_ticker: Ticker::new(config.dial_period),
            clock_ticker: Ticker::new(config.clock_period),
            pending_delta: 0.0,
            clock,
            clock_text,
            time_ticks: 0,
            config,
        }
    }

    /// Advance by `dt` seconds of wall time
    pub fn update(&mut self, dt: f32, viewport: Viewport, input: &TickInput) -> FrameReport {
        let mut report = FrameReport::default();

        // The field appears once, on the first usable viewport
        if self.field.is_none() && !viewport.is_degenerate() {
            let mut field =
                StarField::new(self.config.seed).with_recycle_policy(self.config.recycle);
            field.initialize(viewport);
            log::info!(
                "Star field created for {}x{} viewport (seed {})",
                viewport.width,
                viewport.height,
                self.config.seed
            );
            self.field = Some(field);
        }

        report.dial_ticks = self.dial_ticker.poll(dt);
        for _ in 0..report.dial_ticks {
            self.pending_delta += self.rotation.sample(input.dial_value);
        }

        let star_ticks = self.star_ticker.poll(dt);
        if self.config.pause_on_background && !input.active {
            report.skipped_star_ticks = star_ticks;
            // Frozen stars don't bank steering for later
            self.pending_delta = 0.0;
        } else if let Some(field) = self.field.as_mut().filter(|_| !viewport.is_degenerate()) {
            for _ in 0..star_ticks {
                let delta = std::mem::take(&mut self.pending_delta);
                field.advance(viewport, delta);
            }
            report.star_ticks = star_ticks;
            self.time_ticks += u64::from(star_ticks);
        }

        report.clock_ticks = self.clock_ticker.poll(dt);
        if report.clock_ticks > 0 {
            self.clock_text = self.clock.now_string();
        }

        report
    }

    pub fn field(&self) -> Option<&StarField> {
        self.field.as_ref()
    }

    pub fn field_mut(&mut self) -> Option<&mut StarField> {
        self.field.as_mut()
    }

    pub fn rotation(&self) -> &RotationIntegrator {
        &self.rotation
    }

    pub fn display_rotation_degrees(&self) -> f32 {
        self.rotation.display_rotation_degrees()
    }

    pub fn clock_text(&self) -> &str {
        &self.clock_text
    }

    pub fn time_ticks(&self) -> u64 {
        self.time_ticks
    }

    pub fn config(&self) -> &SchedulerConfig {
        &self.config
    }
}
