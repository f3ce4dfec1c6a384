//! Session history, lifetime stats, daily streak and trend insights

use serde::{Deserialize, Serialize};

use super::{day_number, hour_of_day};
use crate::sim::{DifficultyLevel, SessionEnding, SessionSummary};

/// Records kept on disk
pub const MAX_HISTORY: usize = 100;
/// Default page size for history queries
pub const DEFAULT_HISTORY_LIMIT: usize = 50;
/// Window used for favourite time and insights
pub const RECENT_WINDOW: usize = 20;
/// Sessions needed before a trend is reported
const MIN_TREND_SESSIONS: usize = 5;
/// Percent change that counts as a trend
const TREND_THRESHOLD: i64 = 10;

/// One finished level or game
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionRecord {
    pub ending: SessionEnding,
    pub score: u64,
    pub total_score: u64,
    pub level: u32,
    pub difficulty: DifficultyLevel,
    pub correct_taps: u32,
    pub missed_taps: u32,
    pub max_combo: u32,
    pub duration: u32,
    pub accuracy: u32,
    pub timestamp: u64,
}

impl From<&SessionSummary> for SessionRecord {
    fn from(s: &SessionSummary) -> Self {
        Self {
            ending: s.ending,
            score: s.score,
            total_score: s.total_score,
            level: s.level,
            difficulty: s.difficulty,
            correct_taps: s.correct_taps,
            missed_taps: s.missed_taps,
            max_combo: s.max_combo,
            duration: s.duration,
            accuracy: s.accuracy,
            timestamp: s.timestamp,
        }
    }
}

/// Newest-first, capped session log
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SessionHistory {
    records: Vec<SessionRecord>,
}

impl SessionHistory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, record: SessionRecord) {
        self.records.insert(0, record);
        self.records.truncate(MAX_HISTORY);
    }

    /// Up to `limit` most recent records, newest first
    pub fn recent(&self, limit: usize) -> &[SessionRecord] {
        &self.records[..limit.min(self.records.len())]
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Best part of the day over the recent window, by summed score
    pub fn favorite_time(&self) -> TimeOfDay {
        TimeOfDay::best_by(self.recent(RECENT_WINDOW), |scores| scores.iter().sum::<u64>() as f64)
    }

    pub fn insights(&self) -> Insights {
        let sessions = self.recent(RECENT_WINDOW);
        if sessions.len() < MIN_TREND_SESSIONS {
            return Insights::default();
        }

        let recent = &sessions[..MIN_TREND_SESSIONS];
        let older = &sessions[MIN_TREND_SESSIONS..sessions.len().min(2 * MIN_TREND_SESSIONS)];
        let recent_avg = mean(recent.iter().map(|s| s.score as f64));
        let older_avg = if older.is_empty() {
            recent_avg
        } else {
            mean(older.iter().map(|s| s.score as f64))
        };

        let change_percent = if older_avg > 0.0 {
            ((recent_avg - older_avg) / older_avg * 100.0).round() as i64
        } else {
            0
        };
        let trend = if change_percent > TREND_THRESHOLD {
            Trend::Improving
        } else if change_percent < -TREND_THRESHOLD {
            Trend::Declining
        } else {
            Trend::Steady
        };

        Insights {
            trend,
            trend_percentage: change_percent.unsigned_abs() as u32,
            best_time_of_day: TimeOfDay::best_by(sessions, |scores| {
                if scores.is_empty() {
                    0.0
                } else {
                    mean(scores.iter().map(|s| *s as f64))
                }
            }),
            recent_avg_score: recent_avg.round() as u64,
            recent_avg_accuracy: mean(recent.iter().map(|s| s.accuracy as f64)).round() as u32,
        }
    }
}

fn mean(values: impl Iterator<Item = f64>) -> f64 {
    let (sum, n) = values.fold((0.0, 0usize), |(sum, n), v| (sum + v, n + 1));
    if n == 0 { 0.0 } else { sum / n as f64 }
}

/// Coarse part of the day (UTC)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimeOfDay {
    #[default]
    Morning,
    Afternoon,
    Evening,
}

impl TimeOfDay {
    pub fn from_hour(hour: u32) -> Self {
        match hour {
            5..=11 => TimeOfDay::Morning,
            12..=17 => TimeOfDay::Afternoon,
            _ => TimeOfDay::Evening,
        }
    }

    pub fn of(timestamp_ms: u64) -> Self {
        Self::from_hour(hour_of_day(timestamp_ms))
    }

    /// Bucket scores by time of day and pick the best bucket. Ties go to the later bucket.
    fn best_by(sessions: &[SessionRecord], rate: impl Fn(&[u64]) -> f64) -> Self {
        let mut buckets: [Vec<u64>; 3] = Default::default();
        for s in sessions {
            buckets[Self::of(s.timestamp) as usize].push(s.score);
        }
        [TimeOfDay::Morning, TimeOfDay::Afternoon, TimeOfDay::Evening]
            .into_iter()
            .zip(buckets.iter().map(|b| rate(b.as_slice())))
            .fold(None, |best: Option<(TimeOfDay, f64)>, (time, value)| match best {
                Some((_, top)) if top > value => best,
                _ => Some((time, value)),
            })
            .map(|(time, _)| time)
            .unwrap_or_default()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Trend {
    Improving,
    #[default]
    Steady,
    Declining,
}

/// Recent performance summary
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Insights {
    pub trend: Trend,
    /// Magnitude of the recent-vs-older change, percent
    pub trend_percentage: u32,
    pub best_time_of_day: TimeOfDay,
    pub recent_avg_score: u64,
    pub recent_avg_accuracy: u32,
}

/// Lifetime totals
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserStats {
    pub total_games_played: u32,
    pub levels_completed: u32,
    pub total_score: u64,
    pub highest_level: u32,
    pub best_combo: u32,
    pub total_correct_taps: u64,
    pub total_missed_taps: u64,
    pub average_accuracy: u32,
    pub favorite_time: TimeOfDay,
    pub last_played: Option<u64>,
}

impl Default for UserStats {
    fn default() -> Self {
        Self {
            total_games_played: 0,
            levels_completed: 0,
            total_score: 0,
            highest_level: 1,
            best_combo: 0,
            total_correct_taps: 0,
            total_missed_taps: 0,
            average_accuracy: 0,
            favorite_time: TimeOfDay::Morning,
            last_played: None,
        }
    }
}

impl UserStats {
    /// Fold in a record that has already been pushed onto `history`
    pub fn apply(&mut self, record: &SessionRecord, history: &SessionHistory) {
        match record.ending {
            SessionEnding::GameOver => self.total_games_played += 1,
            SessionEnding::LevelComplete => self.levels_completed += 1,
        }
        self.total_score += record.score;
        self.highest_level = self.highest_level.max(record.level);
        self.best_combo = self.best_combo.max(record.max_combo);
        self.total_correct_taps += record.correct_taps as u64;
        self.total_missed_taps += record.missed_taps as u64;
        self.average_accuracy = crate::percent(
            self.total_correct_taps,
            self.total_correct_taps + self.total_missed_taps,
        );
        self.favorite_time = history.favorite_time();
        self.last_played = Some(record.timestamp);
    }
}

/// Consecutive-day play streak
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct StreakData {
    pub current_streak: u32,
    pub longest_streak: u32,
    pub last_played: Option<u64>,
}

impl StreakData {
    /// Count a play at `now`: same day keeps the streak, the next day extends it,
    /// anything later starts over at 1.
    pub fn touch(&mut self, now: u64) {
        let today = day_number(now);
        match self.last_played.map(day_number) {
            Some(last) if last == today => return,
            Some(last) if last + 1 == today => self.current_streak += 1,
            _ => self.current_streak = 1,
        }
        self.longest_streak = self.longest_streak.max(self.current_streak);
        self.last_played = Some(now);
    }
}
