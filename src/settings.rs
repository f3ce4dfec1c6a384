//! Player settings and preferences
//!
//! Persisted separately from progress as a small JSON file.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::persistence::PersistError;
use crate::sim::{DifficultyLevel, GameConfig};
use crate::theme::{DEFAULT_THEME, Theme};

/// Game settings/preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub difficulty: DifficultyLevel,
    /// Theme key
    pub theme: String,

    // === Feedback ===
    pub sound_enabled: bool,
    pub haptics_enabled: bool,
    /// Sound effects volume (0.0 - 1.0)
    pub sfx_volume: f32,
    pub music_enabled: bool,
    /// Music volume (0.0 - 1.0)
    pub music_volume: f32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            difficulty: DifficultyLevel::Medium,
            theme: DEFAULT_THEME.to_string(),

            sound_enabled: true,
            haptics_enabled: true,
            sfx_volume: 1.0,
            music_enabled: true,
            music_volume: 0.7,
        }
    }
}

impl Settings {
    /// Resolved theme (unknown keys fall back to the default)
    pub fn theme(&self) -> &'static Theme {
        Theme::by_name(&self.theme)
    }

    /// Session config for these settings
    pub fn game_config(&self) -> GameConfig {
        GameConfig {
            theme: self.theme().key.to_string(),
            ..GameConfig::default()
        }
    }

    /// Clamp volumes and canonicalise the theme key
    pub fn normalize(&mut self) {
        self.sfx_volume = self.sfx_volume.clamp(0.0, 1.0);
        self.music_volume = self.music_volume.clamp(0.0, 1.0);
        self.theme = self.theme().key.to_string();
    }

    pub fn load_from(path: &Path) -> Result<Self, PersistError> {
        let json = fs::read_to_string(path)?;
        let mut settings: Settings = serde_json::from_str(&json)?;
        settings.normalize();
        log::info!("Loaded settings from {}", path.display());
        Ok(settings)
    }

    /// Load settings, using defaults when the file is missing or unreadable
    pub fn load_or_default(path: &Path) -> Self {
        match Self::load_from(path) {
            Ok(settings) => settings,
            Err(PersistError::Io(e)) if e.kind() == std::io::ErrorKind::NotFound => {
                log::info!("No settings at {}, using defaults", path.display());
                Self::default()
            }
            Err(e) => {
                log::warn!("Ignoring settings at {}: {}", path.display(), e);
                Self::default()
            }
        }
    }

    pub fn save_to(&self, path: &Path) -> Result<(), PersistError> {
        fs::write(path, serde_json::to_string_pretty(self)?)?;
        log::info!("Settings saved");
        Ok(())
    }
}
