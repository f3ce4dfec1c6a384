//! JSON-backed progress store

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use super::history::{
    DEFAULT_HISTORY_LIMIT, Insights, SessionHistory, SessionRecord, StreakData, UserStats,
};
use super::{PersistError, SessionSink};
use crate::highscores::{HighScoreEntry, HighScores};
use crate::sim::{SessionEnding, SessionSummary};

/// Everything persisted about the player's progress
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProgressStore {
    #[serde(default)]
    pub history: SessionHistory,
    #[serde(default)]
    pub stats: UserStats,
    #[serde(default)]
    pub streak: StreakData,
    #[serde(default)]
    pub leaderboard: HighScores,
    /// Autosave target
    #[serde(skip)]
    path: Option<PathBuf>,
}

impl ProgressStore {
    /// In-memory store
    pub fn new() -> Self {
        Self::default()
    }

    /// Store that saves to `path` after every recorded session
    pub fn at(path: impl Into<PathBuf>) -> Self {
        Self {
            path: Some(path.into()),
            ..Self::default()
        }
    }

    /// Load from `path`, keeping it as the autosave target
    pub fn load(path: impl Into<PathBuf>) -> Result<Self, PersistError> {
        let path = path.into();
        let json = fs::read_to_string(&path)?;
        let mut store: ProgressStore = serde_json::from_str(&json)?;
        log::info!(
            "Loaded progress: {} sessions, {} high scores",
            store.history.len(),
            store.leaderboard.entries.len()
        );
        store.path = Some(path);
        Ok(store)
    }

    /// Load from `path`, starting fresh if it is missing or unreadable
    pub fn load_or_default(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        match Self::load(&path) {
            Ok(store) => store,
            Err(PersistError::Io(e)) if e.kind() == std::io::ErrorKind::NotFound => {
                log::info!("No saved progress at {}, starting fresh", path.display());
                Self::at(path)
            }
            Err(e) => {
                log::warn!("Ignoring saved progress at {}: {}", path.display(), e);
                Self::at(path)
            }
        }
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub fn save_to(&self, path: &Path) -> Result<(), PersistError> {
        let json = serde_json::to_string_pretty(self)?;
        // Write then rename so a crash never leaves a half-written file
        let tmp = path.with_extension("tmp");
        fs::write(&tmp, json)?;
        fs::rename(&tmp, path)?;
        Ok(())
    }

    /// Save to the autosave target, if any
    pub fn save(&self) -> Result<(), PersistError> {
        match &self.path {
            Some(path) => self.save_to(path),
            None => Ok(()),
        }
    }

    /// Up to `limit` most recent sessions (default page size when `None`)
    pub fn sessions(&self, limit: Option<usize>) -> &[SessionRecord] {
        self.history.recent(limit.unwrap_or(DEFAULT_HISTORY_LIMIT))
    }

    pub fn insights(&self) -> Insights {
        self.history.insights()
    }

    /// Apply a finished session to history, stats, streak and leaderboard
    pub fn apply(&mut self, summary: &SessionSummary) -> Option<usize> {
        let record = SessionRecord::from(summary);
        self.history.push(record.clone());
        self.stats.apply(&record, &self.history);
        self.streak.touch(record.timestamp);

        // Only finished games compete; a level total is still in progress
        if summary.ending != SessionEnding::GameOver {
            return None;
        }
        let rank = self.leaderboard.add(HighScoreEntry {
            score: summary.total_score,
            level: summary.level,
            difficulty: summary.difficulty,
            max_combo: summary.max_combo,
            timestamp: summary.timestamp,
        });
        if let Some(rank) = rank {
            log::info!("New high score #{}: {}", rank, summary.total_score);
        }
        rank
    }

    /// Wipe all progress (and the save file, if any)
    pub fn clear_all(&mut self) {
        let path = self.path.take();
        *self = Self::default();
        self.path = path;
        if let Err(e) = self.save() {
            log::warn!("Failed to clear saved progress: {}", e);
        }
    }
}

impl SessionSink for ProgressStore {
    fn record(&mut self, summary: &SessionSummary) {
        self.apply(summary);
        if let Err(e) = self.save() {
            log::warn!("Failed to save progress: {}", e);
        }
    }
}
