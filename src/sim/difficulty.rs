//! Difficulty presets and per-level scaling

use serde::{Deserialize, Serialize};

/// Selectable difficulty
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum DifficultyLevel {
    Easy,
    #[default]
    Medium,
    Hard,
}

impl DifficultyLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            DifficultyLevel::Easy => "easy",
            DifficultyLevel::Medium => "medium",
            DifficultyLevel::Hard => "hard",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "easy" | "relaxed" => Some(DifficultyLevel::Easy),
            "medium" | "med" | "balanced" => Some(DifficultyLevel::Medium),
            "hard" | "intense" => Some(DifficultyLevel::Hard),
            _ => None,
        }
    }

    /// Parse a name, falling back to `Medium` on anything unrecognised
    pub fn from_name_or_default(s: &str) -> Self {
        Self::from_str(s).unwrap_or_else(|| {
            log::warn!("Unknown difficulty '{}', using medium", s);
            Self::default()
        })
    }

    pub fn preset(&self) -> &'static DifficultyPreset {
        match self {
            DifficultyLevel::Easy => &EASY,
            DifficultyLevel::Medium => &MEDIUM,
            DifficultyLevel::Hard => &HARD,
        }
    }
}

/// Immutable tuning for one difficulty
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DifficultyPreset {
    pub name: &'static str,
    pub description: &'static str,
    /// Seconds per level
    pub session_duration: u32,
    /// Circle lifetime at level 1 (ms)
    pub base_circle_lifetime: f64,
    /// Spawn interval at level 1 (ms)
    pub base_spawn_interval: f64,
    pub max_lives: u32,
    pub start_level: u32,
    pub score_multiplier_base: u64,
}

pub const EASY: DifficultyPreset = DifficultyPreset {
    name: "Relaxed",
    description: "Perfect for beginners and relaxation",
    session_duration: 60,
    base_circle_lifetime: 3500.0,
    base_spawn_interval: 1000.0,
    max_lives: 5,
    start_level: 1,
    score_multiplier_base: 1,
};

pub const MEDIUM: DifficultyPreset = DifficultyPreset {
    name: "Balanced",
    description: "The classic experience",
    session_duration: 60,
    base_circle_lifetime: 2500.0,
    base_spawn_interval: 800.0,
    max_lives: 3,
    start_level: 1,
    score_multiplier_base: 1,
};

pub const HARD: DifficultyPreset = DifficultyPreset {
    name: "Intense",
    description: "For focus masters seeking a challenge",
    session_duration: 45,
    base_circle_lifetime: 1800.0,
    base_spawn_interval: 600.0,
    max_lives: 3,
    start_level: 3,
    score_multiplier_base: 1,
};

/// Speed-up per level, in percent of the base timings
const SPEEDUP_PERCENT_PER_LEVEL: u32 = 10;
/// Floor on the timing multiplier (2x base speed)
const MIN_SPEED_PERCENT: u32 = 50;

/// Timings and score weight for one level
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LevelScale {
    /// ms a new circle stays alive
    pub circle_lifetime: f64,
    /// ms between spawn attempts
    pub spawn_interval: f64,
    pub score_multiplier: u64,
}

impl LevelScale {
    /// Spawn interval as a whole-millisecond timer period (at least 1 ms)
    pub fn spawn_period_ms(&self) -> u64 {
        (self.spawn_interval.round() as u64).max(1)
    }
}

/// Timing multiplier for a level, as a percentage: 100, 90, 80, ... floored at 50.
pub fn speed_percent(level: u32) -> u32 {
    let speedup = level.saturating_sub(1).saturating_mul(SPEEDUP_PERCENT_PER_LEVEL);
    100u32.saturating_sub(speedup).max(MIN_SPEED_PERCENT)
}

/// Scale a preset's base timings for `level` (levels start at 1).
///
/// Each level is 10% faster than the last until timings reach half the
/// base values. The score multiplier grows linearly with the level.
pub fn scale(level: u32, preset: &DifficultyPreset) -> LevelScale {
    // Percent arithmetic keeps whole-ms bases exact (2500 * 70 / 100 == 1750.0)
    let percent = speed_percent(level) as f64;
    LevelScale {
        circle_lifetime: preset.base_circle_lifetime * percent / 100.0,
        spawn_interval: preset.base_spawn_interval * percent / 100.0,
        score_multiplier: level as u64 * preset.score_multiplier_base,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_level_one_uses_base_timings() {
        let s = scale(1, &MEDIUM);
        assert_eq!(s.circle_lifetime, 2500.0);
        assert_eq!(s.spawn_interval, 800.0);
        assert_eq!(s.score_multiplier, 1);
        assert_eq!(s.spawn_period_ms(), 800);
    }

    #[test]
    fn test_ten_percent_per_level() {
        assert_eq!(scale(2, &MEDIUM).circle_lifetime, 2250.0);
        assert_eq!(scale(4, &MEDIUM).circle_lifetime, 1750.0);
        assert_eq!(scale(4, &MEDIUM).spawn_interval, 560.0);
        assert_eq!(scale(3, &HARD).circle_lifetime, 1440.0);
        assert_eq!(scale(3, &HARD).score_multiplier, 3);
    }

    #[test]
    fn test_multiplier_floors_at_half() {
        assert_eq!(speed_percent(6), 50);
        assert_eq!(speed_percent(7), 50);
        assert_eq!(speed_percent(u32::MAX), 50);
        let s = scale(20, &EASY);
        assert_eq!(s.circle_lifetime, 1750.0);
        assert_eq!(s.spawn_interval, 500.0);
        assert_eq!(s.score_multiplier, 20);
    }

    #[test]
    fn test_difficulty_names() {
        assert_eq!(DifficultyLevel::from_str("HARD"), Some(DifficultyLevel::Hard));
        assert_eq!(DifficultyLevel::from_str("relaxed"), Some(DifficultyLevel::Easy));
        assert_eq!(DifficultyLevel::from_str("nightmare"), None);
        assert_eq!(
            DifficultyLevel::from_name_or_default("nightmare"),
            DifficultyLevel::Medium
        );
        assert_eq!(DifficultyLevel::Hard.preset().start_level, 3);
        assert_eq!(DifficultyLevel::Easy.preset().max_lives, 5);
    }
}
