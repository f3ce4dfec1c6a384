//! Local progress persistence
//!
//! The session hands a `SessionSummary` to a `SessionSink` whenever a level
//! or game ends. Sinks own every storage policy (history cap, leaderboard
//! ranking, stats) and swallow their own failures.

pub mod history;
pub mod store;

pub use history::{
    Insights, SessionHistory, SessionRecord, StreakData, TimeOfDay, Trend, UserStats,
};
pub use store::ProgressStore;

use std::fmt;
use std::io;

use crate::sim::SessionSummary;

/// Receiver for finished-session summaries
pub trait SessionSink {
    fn record(&mut self, summary: &SessionSummary);
}

impl<T: SessionSink + ?Sized> SessionSink for &mut T {
    fn record(&mut self, summary: &SessionSummary) {
        (**self).record(summary);
    }
}

impl<T: SessionSink + ?Sized> SessionSink for Box<T> {
    fn record(&mut self, summary: &SessionSummary) {
        (**self).record(summary);
    }
}

/// Discards summaries
#[derive(Debug, Clone, Copy, Default)]
pub struct NullSink;

impl SessionSink for NullSink {
    fn record(&mut self, _summary: &SessionSummary) {}
}

/// Keeps summaries in memory
#[derive(Debug, Clone, Default)]
pub struct MemorySink {
    pub summaries: Vec<SessionSummary>,
}

impl SessionSink for MemorySink {
    fn record(&mut self, summary: &SessionSummary) {
        self.summaries.push(summary.clone());
    }
}

/// Load/save failure
#[derive(Debug)]
pub enum PersistError {
    Io(io::Error),
    Json(serde_json::Error),
}

impl fmt::Display for PersistError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(e) => write!(f, "storage i/o error: {e}"),
            Self::Json(e) => write!(f, "corrupt save data: {e}"),
        }
    }
}

impl std::error::Error for PersistError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            Self::Json(e) => Some(e),
        }
    }
}

impl From<io::Error> for PersistError {
    fn from(e: io::Error) -> Self {
        Self::Io(e)
    }
}

impl From<serde_json::Error> for PersistError {
    fn from(e: serde_json::Error) -> Self {
        Self::Json(e)
    }
}

const MS_PER_HOUR: u64 = 60 * 60 * 1000;
const MS_PER_DAY: u64 = 24 * MS_PER_HOUR;

/// Days since the Unix epoch (UTC)
pub fn day_number(timestamp_ms: u64) -> u64 {
    timestamp_ms / MS_PER_DAY
}

/// Hour of day (UTC, 0-23)
pub fn hour_of_day(timestamp_ms: u64) -> u32 {
    ((timestamp_ms / MS_PER_HOUR) % 24) as u32
}

/// Current wall-clock time in ms since the Unix epoch
pub fn now_ms() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}
