//! Zen Sprint - a focus/reaction tap game
//!
//! Core modules:
//! - `sim`: Deterministic game loop (difficulty, circle pool, clock, scoring, session)
//! - `theme`: Colour palettes selectable by name
//! - `feedback`: Haptic/sound cue sink
//! - `persistence`: Session history, stats and streaks
//! - `highscores`: Top-10 leaderboard
//! - `settings`: Player preferences

pub mod feedback;
pub mod highscores;
pub mod persistence;
pub mod settings;
pub mod sim;
pub mod theme;

pub use feedback::{FeedbackCue, FeedbackSink};
pub use highscores::HighScores;
pub use persistence::{ProgressStore, SessionSink};
pub use settings::Settings;
pub use theme::Theme;

use std::fmt;

use serde::{Deserialize, Serialize};

/// Game configuration constants
pub mod consts {
    /// Countdown granularity (ms)
    pub const COUNTDOWN_PERIOD_MS: u64 = 1000;
    /// Expiry sweep cadence (ms), bounds how long an expired circle stays visible
    pub const SWEEP_PERIOD_MS: u64 = 100;

    /// Circle radius in play-field units
    pub const CIRCLE_RADIUS: f32 = 40.0;
    /// Live circle cap; spawns beyond this are dropped
    pub const MAX_CIRCLES: usize = 6;

    /// Probability a spawned circle takes the focus colour
    pub const FOCUS_SPAWN_CHANCE: f64 = 0.4;

    /// Spawn margins from the play-field edges
    pub const SPAWN_MARGIN_X: f32 = 50.0;
    pub const SPAWN_MARGIN_Y: f32 = 150.0;

    /// Default play-field size (portrait phone)
    pub const FIELD_WIDTH: f32 = 390.0;
    pub const FIELD_HEIGHT: f32 = 844.0;

    /// Points for a correct tap, before the level multiplier
    pub const CORRECT_TAP_POINTS: u64 = 10;
    /// Bonus per combo step already banked
    pub const COMBO_BONUS: u64 = 2;
    /// Points lost on a wrong tap (floored at zero)
    pub const WRONG_TAP_PENALTY: u64 = 5;
}

/// An sRGB colour packed as `0xRRGGBB`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Color(pub u32);

impl Color {
    pub const fn rgb(hex: u32) -> Self {
        Self(hex & 0x00FF_FFFF)
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:06X}", self.0)
    }
}

/// Integer percentage, rounded half away from zero. Zero denominator gives 0.
#[inline]
pub fn percent(part: u64, whole: u64) -> u32 {
    if whole == 0 {
        return 0;
    }
    ((part as f64 / whole as f64) * 100.0).round() as u32
}
