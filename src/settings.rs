//! Starfield settings
//!
//! Persisted in LocalStorage on the web, read from a JSON file natively.

use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::platform::DialRange;
use crate::sim::{RecyclePolicy, SchedulerConfig};

/// Behaviour variants of the watch face
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Variant {
    /// Dial turns the displayed frame only; star headings never change
    #[default]
    Primary,
    /// Dial also steers star motion, with a faster scale and a wrapping dial
    VelocityRotating,
}

impl Variant {
    pub fn as_str(&self) -> &'static str {
        match self {
            Variant::Primary => "Primary",
            Variant::VelocityRotating => "VelocityRotating",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "primary" | "frame" => Some(Variant::Primary),
            "velocity" | "velocity_rotating" | "velocityrotating" => {
                Some(Variant::VelocityRotating)
            }
            _ => None,
        }
    }

    /// Display degrees per dial degree
    pub fn rotation_scale(&self) -> f32 {
        match self {
            Variant::Primary => PRIMARY_ROTATION_SCALE,
            Variant::VelocityRotating => VELOCITY_ROTATION_SCALE,
        }
    }

    pub fn rotates_velocity(&self) -> bool {
        matches!(self, Variant::VelocityRotating)
    }

    pub fn dial_range(&self) -> DialRange {
        match self {
            Variant::Primary => DialRange::Unbounded,
            Variant::VelocityRotating => DialRange::Wrapped { step: 1.0 },
        }
    }

    pub fn dial_period(&self) -> f32 {
        match self {
            Variant::Primary => DIAL_MIN_PERIOD_SECS,
            Variant::VelocityRotating => DIAL_MAX_PERIOD_SECS,
        }
    }

    /// Only the velocity variant listens to the foreground signal
    pub fn pause_on_background(&self) -> bool {
        matches!(self, Variant::VelocityRotating)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub variant: Variant,
    /// Overrides the variant's display degrees per dial degree
    pub rotation_scale: Option<f32>,
    pub recycle: RecyclePolicy,
    pub dial_range: DialRange,

    // === Timing ===
    pub star_period_secs: f32,
    /// Clamped into [0.05, 0.1]
    pub dial_period_secs: f32,
    pub clock_period_secs: f32,

    pub pause_on_background: bool,
    /// Star RNG seed; the host picks one when unset
    pub seed: Option<u64>,
}

impl Default for Settings {
    fn default() -> Self {
        Self::from_variant(Variant::Primary)
    }
}

impl Settings {
    /// Create settings with a variant's defaults
    pub fn from_variant(variant: Variant) -> Self {
        Self {
            variant,
            rotation_scale: None,
            recycle: RecyclePolicy::CheapReuse,
            dial_range: variant.dial_range(),
            star_period_secs: STAR_PERIOD_SECS,
            dial_period_secs: variant.dial_period(),
            clock_period_secs: CLOCK_PERIOD_SECS,
            pause_on_background: variant.pause_on_background(),
            seed: None,
        }
    }

    pub fn effective_rotation_scale(&self) -> f32 {
        self.rotation_scale
            .filter(|s| s.is_finite())
            .unwrap_or_else(|| self.variant.rotation_scale())
    }

    pub fn effective_dial_period(&self) -> f32 {
        if self.dial_period_secs.is_finite() {
            self.dial_period_secs
                .clamp(DIAL_MIN_PERIOD_SECS, DIAL_MAX_PERIOD_SECS)
        } else {
            self.variant.dial_period()
        }
    }

    fn period_or(value: f32, fallback: f32) -> f32 {
        if value.is_finite() && value > 0.0 { value } else { fallback }
    }

    /// Scheduler configuration, with `fallback_seed` used when no seed is set
    pub fn scheduler_config(&self, fallback_seed: u64) -> SchedulerConfig {
        SchedulerConfig {
            seed: self.seed.unwrap_or(fallback_seed),
            rotation_scale: self.effective_rotation_scale(),
            rotate_velocity: self.variant.rotates_velocity(),
            recycle: self.recycle,
            star_period: Self::period_or(self.star_period_secs, STAR_PERIOD_SECS),
            dial_period: self.effective_dial_period(),
            clock_period: Self::period_or(self.clock_period_secs, CLOCK_PERIOD_SECS),
            pause_on_background: self.pause_on_background,
        }
    }

    /// Parse settings JSON, falling back to defaults on malformed input
    pub fn from_json(json: &str) -> Self {
        match serde_json::from_str(json) {
            Ok(settings) => settings,
            Err(e) => {
                log::warn!("Ignoring malformed settings ({}), using defaults", e);
                Self::default()
            }
        }
    }

    /// LocalStorage key (used only in wasm32)
    #[allow(dead_code)]
    const STORAGE_KEY: &'static str = "starfield_settings";
    /// Environment variable naming the native settings file
    pub const PATH_ENV: &'static str = "STARFIELD_SETTINGS";

    /// Load settings from LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(Some(json)) = storage.get_item(Self::STORAGE_KEY) {
                log::info!("Loaded settings from LocalStorage");
                return Self::from_json(&json);
            }
        }

        log::info!("Using default settings");
        Self::default()
    }

    /// Save settings to LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn save(&self) {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(json) = serde_json::to_string(self) {
                let _ = storage.set_item(Self::STORAGE_KEY, &json);
                log::info!("Settings saved");
            }
        }
    }

    /// Load settings from the file named by `STARFIELD_SETTINGS`, if any
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Self {
        match std::env::var_os(Self::PATH_ENV) {
            Some(path) => Self::load_from(std::path::Path::new(&path)),
            None => {
                log::info!("Using default settings");
                Self::default()
            }
        }
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn load_from(path: &std::path::Path) -> Self {
        match std::fs::read_to_string(path) {
            Ok(json) => {
                log::info!("Loaded settings from {}", path.display());
                Self::from_json(&json)
            }
            Err(e) => {
                log::warn!("Can't read settings {} ({}), using defaults", path.display(), e);
                Self::default()
            }
        }
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn save_to(&self, path: &std::path::Path) {
        match serde_json::to_string_pretty(self) {
            Ok(json) => match std::fs::write(path, json) {
                Ok(()) => log::info!("Settings saved to {}", path.display()),
                Err(e) => log::warn!("Can't write settings {}: {}", path.display(), e),
            },
            Err(e) => log::warn!("Can't serialize settings: {}", e),
        }
    }
}
