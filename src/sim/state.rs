//! Session state aggregate
//!
//! Everything the presentation layer needs to draw the HUD lives here.

use serde::{Deserialize, Serialize};

use super::difficulty::DifficultyLevel;
use crate::Color;

/// Session lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SessionPhase {
    /// Menu, nothing scheduled
    Idle,
    /// Clock running, circles spawning
    Running,
    /// Time ran out with lives to spare
    LevelComplete,
    /// Lives exhausted
    GameOver,
}

impl SessionPhase {
    pub fn is_terminal(&self) -> bool {
        matches!(self, SessionPhase::LevelComplete | SessionPhase::GameOver)
    }
}

/// Score, lives and progress for the current session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameState {
    /// Score for the level in progress
    pub score: u64,
    /// Banked score from finished levels
    pub total_score: u64,
    pub level: u32,
    pub lives: u32,
    pub max_lives: u32,
    /// Consecutive correct taps
    pub combo: u32,
    /// Best combo this session
    pub max_combo: u32,
    pub correct_taps: u32,
    pub missed_taps: u32,
    /// Seconds left in the level
    pub time_remaining: u32,
    /// The colour to tap this level
    pub focus_color: Color,
    pub phase: SessionPhase,
    pub difficulty: DifficultyLevel,
    /// Theme key
    pub theme: String,
}

impl GameState {
    /// Idle state for a difficulty/theme pair, before any level starts
    pub fn new(difficulty: DifficultyLevel, theme: &str, focus_color: Color) -> Self {
        let preset = difficulty.preset();
        Self {
            score: 0,
            total_score: 0,
            level: preset.start_level,
            lives: preset.max_lives,
            max_lives: preset.max_lives,
            combo: 0,
            max_combo: 0,
            correct_taps: 0,
            missed_taps: 0,
            time_remaining: preset.session_duration,
            focus_color,
            phase: SessionPhase::Idle,
            difficulty,
            theme: theme.to_string(),
        }
    }

    pub fn is_playing(&self) -> bool {
        self.phase == SessionPhase::Running
    }

    /// Rounded percentage of correct taps over all taps and misses
    pub fn accuracy(&self) -> u32 {
        crate::percent(
            self.correct_taps as u64,
            self.correct_taps as u64 + self.missed_taps as u64,
        )
    }

    /// Seconds played in the current level
    pub fn elapsed_secs(&self) -> u32 {
        self.difficulty
            .preset()
            .session_duration
            .saturating_sub(self.time_remaining)
    }
}
