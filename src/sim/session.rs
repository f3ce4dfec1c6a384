//! Session orchestrator
//!
//! Owns the game state, circle pool and clock, and is the only writer of
//! any of them. Phase machine:
//!
//! ```text
//! Idle -> Running -> LevelComplete -> Running (next_level)
//!                 -> GameOver      -> Running (restart)
//! any  -> Idle (reset)
//! ```
//!
//! Timer handlers re-read the phase and the clock epoch when they run, so
//! a fire scheduled for a level that has since ended does nothing.

use std::collections::VecDeque;

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::clock::{ClockAction, ClockFire, GameClock};
use super::difficulty::{DifficultyLevel, LevelScale, scale};
use super::pool::{Circle, CircleId, CirclePool};
use super::scoring::{self, Outcome};
use super::state::{GameState, SessionPhase};
use crate::Color;
use crate::consts::*;
use crate::feedback::{FeedbackCue, FeedbackSink, NullFeedback};
use crate::persistence::{NullSink, SessionSink};
use crate::theme::{DEFAULT_THEME, Theme};

/// Play-field size in layout units
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PlayField {
    pub width: f32,
    pub height: f32,
}

impl Default for PlayField {
    fn default() -> Self {
        Self {
            width: FIELD_WIDTH,
            height: FIELD_HEIGHT,
        }
    }
}

impl PlayField {
    /// Spawn rectangle `(min, max)`, collapsed to its min corner on tiny fields
    pub fn spawn_bounds(&self) -> (Vec2, Vec2) {
        let min = Vec2::new(SPAWN_MARGIN_X, SPAWN_MARGIN_Y);
        let max = Vec2::new(self.width - SPAWN_MARGIN_X, self.height - SPAWN_MARGIN_Y);
        (min, max.max(min))
    }
}

/// Static session configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameConfig {
    pub field: PlayField,
    pub max_circles: usize,
    pub circle_radius: f32,
    /// Theme key; unknown keys fall back to the default theme
    pub theme: String,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            field: PlayField::default(),
            max_circles: MAX_CIRCLES,
            circle_radius: CIRCLE_RADIUS,
            theme: DEFAULT_THEME.to_string(),
        }
    }
}

/// How a level ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SessionEnding {
    LevelComplete,
    GameOver,
}

/// Finalised numbers for one level/game ending, handed to persistence
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionSummary {
    pub ending: SessionEnding,
    /// Score earned in the level that just ended
    pub score: u64,
    /// Banked total including `score`
    pub total_score: u64,
    pub level: u32,
    pub difficulty: DifficultyLevel,
    pub correct_taps: u32,
    pub missed_taps: u32,
    pub max_combo: u32,
    /// Seconds played in the level
    pub duration: u32,
    /// Rounded percentage
    pub accuracy: u32,
    /// ms timestamp of the ending
    pub timestamp: u64,
}

/// Things that happened during processing, for the presentation layer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    Started { level: u32, focus_color: Color },
    Spawned { id: CircleId },
    Tapped { id: CircleId, correct: bool, points: u64 },
    /// A circle timed out; `focus` marks a missed focus circle
    Expired { id: CircleId, focus: bool },
    Countdown { remaining: u32 },
    LevelComplete { level: u32, total_score: u64 },
    GameOver { level: u32, total_score: u64 },
}

/// Read-only view for rendering
#[derive(Debug, Clone, Serialize)]
pub struct SessionView {
    pub now: u64,
    pub state: GameState,
    pub circles: Vec<Circle>,
}

/// The game session state machine
pub struct Session<F = NullFeedback, P = NullSink> {
    state: GameState,
    pool: CirclePool,
    clock: GameClock,
    rng: Pcg32,
    config: GameConfig,
    theme: &'static Theme,
    /// Timings for the level in progress
    level_scale: LevelScale,
    pending_taps: VecDeque<CircleId>,
    events: Vec<GameEvent>,
    /// Last processed time (ms)
    now: u64,
    feedback: F,
    sink: P,
}

impl Session {
    /// Session with default config and no collaborators
    pub fn headless(seed: u64) -> Self {
        Session::new(seed, GameConfig::default(), NullFeedback, NullSink)
    }
}

impl<F: FeedbackSink, P: SessionSink> Session<F, P> {
    pub fn new(seed: u64, config: GameConfig, feedback: F, sink: P) -> Self {
        let theme = Theme::by_name(&config.theme);
        let mut rng = Pcg32::seed_from_u64(seed);
        let focus = roll_focus(&mut rng, theme);
        let difficulty = DifficultyLevel::default();
        let state = GameState::new(difficulty, theme.key, focus);
        Self {
            level_scale: scale(state.level, difficulty.preset()),
            state,
            pool: CirclePool::new(config.max_circles),
            clock: GameClock::new(),
            rng,
            config,
            theme,
            pending_taps: VecDeque::new(),
            events: Vec::new(),
            now: 0,
            feedback,
            sink,
        }
    }

    // === Accessors ===

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn phase(&self) -> SessionPhase {
        self.state.phase
    }

    pub fn pool(&self) -> &CirclePool {
        &self.pool
    }

    pub fn clock(&self) -> &GameClock {
        &self.clock
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn theme(&self) -> &'static Theme {
        self.theme
    }

    pub fn level_scale(&self) -> LevelScale {
        self.level_scale
    }

    pub fn now(&self) -> u64 {
        self.now
    }

    pub fn feedback(&self) -> &F {
        &self.feedback
    }

    pub fn sink(&self) -> &P {
        &self.sink
    }

    /// Snapshot for the renderer
    pub fn snapshot(&self) -> SessionView {
        SessionView {
            now: self.now,
            state: self.state.clone(),
            circles: self.pool.iter().cloned().collect(),
        }
    }

    /// Take the events produced since the last drain
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    // === Configuration ===

    /// Switch theme between levels. Ignored while running.
    pub fn set_theme(&mut self, key: &str) -> bool {
        if self.state.is_playing() {
            return false;
        }
        self.theme = Theme::by_name(key);
        self.state.theme = self.theme.key.to_string();
        true
    }

    // === Transitions ===

    /// Begin a fresh game from `Idle` or an ended level/game
    pub fn start(&mut self, difficulty: DifficultyLevel, now: u64) -> bool {
        if self.state.is_playing() {
            log::debug!("start ignored: session already running");
            return false;
        }
        let focus = roll_focus(&mut self.rng, self.theme);
        self.state = GameState::new(difficulty, self.theme.key, focus);
        log::info!(
            "Game started: {} from level {} (focus {})",
            difficulty.as_str(),
            self.state.level,
            focus
        );
        self.begin_level(now);
        true
    }

    /// `start` by difficulty name, falling back to medium
    pub fn start_named(&mut self, difficulty: &str, now: u64) -> bool {
        self.start(DifficultyLevel::from_name_or_default(difficulty), now)
    }

    /// Advance from `LevelComplete` to the next level
    pub fn next_level(&mut self, now: u64) -> bool {
        if self.state.phase != SessionPhase::LevelComplete {
            return false;
        }
        let preset = self.state.difficulty.preset();
        let state = &mut self.state;
        state.level += 1;
        state.lives = preset.max_lives;
        state.max_lives = preset.max_lives;
        state.score = 0;
        state.correct_taps = 0;
        state.missed_taps = 0;
        state.focus_color = roll_focus(&mut self.rng, self.theme);
        log::info!(
            "Level {} (focus {}, total {})",
            self.state.level,
            self.state.focus_color,
            self.state.total_score
        );
        self.begin_level(now);
        true
    }

    /// Start over at the preset's first level after `GameOver`
    pub fn restart(&mut self, now: u64) -> bool {
        if self.state.phase != SessionPhase::GameOver {
            return false;
        }
        let difficulty = self.state.difficulty;
        self.start(difficulty, now)
    }

    /// Drop everything and return to `Idle`
    pub fn reset(&mut self) {
        self.clock.stop();
        self.pool.clear();
        self.pending_taps.clear();
        let focus = roll_focus(&mut self.rng, self.theme);
        self.state = GameState::new(self.state.difficulty, self.theme.key, focus);
        self.level_scale = scale(self.state.level, self.state.difficulty.preset());
    }

    fn begin_level(&mut self, now: u64) {
        let preset = self.state.difficulty.preset();
        self.state.time_remaining = preset.session_duration;
        self.state.phase = SessionPhase::Running;
        // Only circles spawned from here on see the new timings
        self.level_scale = scale(self.state.level, preset);
        self.pool.clear();
        self.pending_taps.clear();
        self.now = self.now.max(now);
        self.clock.start(now, self.level_scale.spawn_period_ms());
        self.events.push(GameEvent::Started {
            level: self.state.level,
            focus_color: self.state.focus_color,
        });
    }

    /// Leave `Running` for a terminal phase. No-op unless running.
    fn finish(&mut self, ending: SessionEnding, now: u64) {
        if !self.state.is_playing() {
            return;
        }
        self.clock.stop();
        self.pool.clear();
        self.pending_taps.clear();

        let state = &mut self.state;
        state.total_score += state.score;
        let (phase, cue) = match ending {
            SessionEnding::LevelComplete => {
                (SessionPhase::LevelComplete, FeedbackCue::LevelComplete)
            }
            SessionEnding::GameOver => (SessionPhase::GameOver, FeedbackCue::GameOver),
        };
        state.phase = phase;

        let summary = SessionSummary {
            ending,
            score: state.score,
            total_score: state.total_score,
            level: state.level,
            difficulty: state.difficulty,
            correct_taps: state.correct_taps,
            missed_taps: state.missed_taps,
            max_combo: state.max_combo,
            duration: state.elapsed_secs(),
            accuracy: state.accuracy(),
            timestamp: now,
        };

        let event = match ending {
            SessionEnding::LevelComplete => {
                log::info!(
                    "Level {} complete: {} (total {})",
                    state.level,
                    state.score,
                    state.total_score
                );
                GameEvent::LevelComplete {
                    level: state.level,
                    total_score: state.total_score,
                }
            }
            SessionEnding::GameOver => {
                log::info!("Game over at level {}: total {}", state.level, state.total_score);
                GameEvent::GameOver {
                    level: state.level,
                    total_score: state.total_score,
                }
            }
        };
        self.events.push(event);
        self.feedback.notify(cue);
        self.sink.record(&summary);
    }

    // === Player input ===

    /// Queue a tap for the next `advance`
    pub fn submit_tap(&mut self, id: CircleId) {
        if self.state.is_playing() {
            self.pending_taps.push_back(id);
        }
    }

    /// Score and remove a tapped circle right away.
    ///
    /// Returns `None` when not running or when the circle is already gone.
    pub fn tap(&mut self, id: CircleId) -> Option<Outcome> {
        self.tap_at(id, self.now)
    }

    fn tap_at(&mut self, id: CircleId, now: u64) -> Option<Outcome> {
        if !self.state.is_playing() {
            return None;
        }
        let circle = self.pool.remove_by_tap(id)?;
        let multiplier = self.level_scale.score_multiplier;
        let scored = scoring::apply_tap(&mut self.state, circle.color, multiplier);
        let (correct, points, cue) = match scored.outcome {
            Outcome::Correct { points } => (true, points, FeedbackCue::CorrectTap),
            _ => (false, 0, FeedbackCue::WrongTap),
        };
        self.events.push(GameEvent::Tapped { id, correct, points });
        self.feedback.notify(cue);
        if scored.lives_exhausted {
            self.finish(SessionEnding::GameOver, now);
        }
        Some(scored.outcome)
    }

    // === Timers ===

    /// Run every queued tap, then every timer due up to `now`, in order.
    /// Queued taps count as happening at `now`.
    pub fn advance(&mut self, now: u64) {
        let tap_time = self.now.max(now);
        while let Some(id) = self.pending_taps.pop_front() {
            self.tap_at(id, tap_time);
        }
        while let Some(fire) = self.clock.poll(now) {
            self.handle_fire(fire);
        }
        self.now = self.now.max(now);
    }

    /// Run one timer fire. Stale fires (old epoch, or session not running) do nothing.
    pub(crate) fn handle_fire(&mut self, fire: ClockFire) -> bool {
        if !self.clock.is_current(&fire) || !self.state.is_playing() {
            log::trace!("stale {:?} fire at {} ignored", fire.action, fire.due);
            return false;
        }
        self.now = self.now.max(fire.due);
        match fire.action {
            ClockAction::Sweep => self.sweep(fire.due),
            ClockAction::Countdown => self.count_down(fire.due),
            ClockAction::Spawn => {
                self.spawn_circle(fire.due);
            }
        }
        true
    }

    fn count_down(&mut self, now: u64) {
        self.state.time_remaining = self.state.time_remaining.saturating_sub(1);
        self.events.push(GameEvent::Countdown {
            remaining: self.state.time_remaining,
        });
        if self.state.time_remaining == 0 {
            self.finish(SessionEnding::LevelComplete, now);
        }
    }

    fn sweep(&mut self, now: u64) {
        let sweep = self.pool.sweep_expired(now, self.state.focus_color);
        if sweep.discarded > 0 {
            log::trace!("{} distractors expired", sweep.discarded);
        }
        for circle in sweep.focus_misses {
            if !self.state.is_playing() {
                break;
            }
            log::debug!("Focus circle {:?} expired", circle.id);
            self.events.push(GameEvent::Expired {
                id: circle.id,
                focus: true,
            });
            if scoring::apply_focus_miss(&mut self.state).lives_exhausted {
                self.finish(SessionEnding::GameOver, now);
            }
        }
    }

    /// One spawn attempt. Returns `None` when the pool is full.
    fn spawn_circle(&mut self, now: u64) -> Option<CircleId> {
        if self.pool.is_full() {
            log::trace!("pool full, spawn skipped");
            return None;
        }
        let color = self.pick_color();
        let (min, max) = self.config.field.spawn_bounds();
        let pos = min + (max - min) * Vec2::new(self.rng.random::<f32>(), self.rng.random::<f32>());
        let id = self.pool.spawn(
            color,
            pos,
            self.config.circle_radius,
            now,
            self.level_scale.circle_lifetime,
        )?;
        log::debug!("Spawned {:?} {} at {} ms", id, color, now);
        self.events.push(GameEvent::Spawned { id });
        Some(id)
    }

    /// 40% focus colour, otherwise uniform over the rest of the palette
    fn pick_color(&mut self) -> Color {
        if self.rng.random_bool(FOCUS_SPAWN_CHANCE) {
            return self.state.focus_color;
        }
        self.pick_distractor()
    }

    /// Uniform over the palette without the focus colour
    fn pick_distractor(&mut self) -> Color {
        let focus = self.state.focus_color;
        let others = self.theme.palette.iter().filter(|c| **c != focus);
        let count = others.clone().count();
        if count == 0 {
            return focus;
        }
        let pick = self.rng.random_range(0..count);
        others.copied().nth(pick).unwrap_or(focus)
    }
}

fn roll_focus(rng: &mut Pcg32, theme: &Theme) -> Color {
    match theme.palette.len() {
        0 => theme.accent,
        n => theme.palette[rng.random_range(0..n)],
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;
    use crate::feedback::FeedbackLog;
    use crate::persistence::MemorySink;

    type TestSession = Session<FeedbackLog, MemorySink>;

    fn session(seed: u64) -> TestSession {
        Session::new(seed, GameConfig::default(), FeedbackLog::default(), MemorySink::default())
    }

    /// Put a circle of `color` into the live pool at `now`
    fn plant(s: &mut TestSession, color: Color, now: u64) -> CircleId {
        let lifetime = s.level_scale.circle_lifetime;
        s.pool.spawn(color, Vec2::ZERO, CIRCLE_RADIUS, now, lifetime).unwrap()
    }

    fn distractor(s: &TestSession) -> Color {
        *s.theme.palette.iter().find(|c| **c != s.state.focus_color).unwrap()
    }

    #[test]
    fn test_start_resets_to_preset() {
        let mut s = session(1);
        assert_eq!(s.phase(), SessionPhase::Idle);
        assert!(s.start(DifficultyLevel::Hard, 0));
        assert_eq!(s.phase(), SessionPhase::Running);
        assert_eq!(s.state.level, 3);
        assert_eq!(s.state.time_remaining, 45);
        assert!(s.theme.palette.contains(&s.state.focus_color));
        assert!(s.clock.is_running());
        // Starting twice is refused
        assert!(!s.start(DifficultyLevel::Easy, 10));
    }

    #[test]
    fn test_three_wrong_taps_end_the_game() {
        let mut s = session(2);
        s.start(DifficultyLevel::Medium, 0);
        s.state.score = 40;
        let wrong = distractor(&s);

        for expected_lives in [2, 1, 0] {
            let id = plant(&mut s, wrong, 0);
            assert!(matches!(s.tap(id), Some(Outcome::Wrong { .. })));
            assert_eq!(s.state.lives, expected_lives);
        }
        assert_eq!(s.phase(), SessionPhase::GameOver);
        assert_eq!(s.state.score, 25);
        assert_eq!(s.state.total_score, 25);
        assert!(!s.clock.is_running());
        assert_eq!(s.sink.summaries.len(), 1);
        assert_eq!(s.sink.summaries[0].ending, SessionEnding::GameOver);
        assert_eq!(s.feedback.count(FeedbackCue::GameOver), 1);
        assert_eq!(s.feedback.count(FeedbackCue::LevelComplete), 0);
    }

    #[test]
    fn test_timeout_completes_level_keeping_lives() {
        let mut s = session(3);
        s.start(DifficultyLevel::Medium, 0);
        // No spawns, so no focus misses
        s.pool = CirclePool::new(0);
        s.state.lives = 2;
        s.state.score = 120;
        s.advance(60_000);

        assert_eq!(s.phase(), SessionPhase::LevelComplete);
        assert_eq!(s.state.time_remaining, 0);
        assert_eq!(s.state.lives, 2);
        assert_eq!(s.state.total_score, 120);
        assert!(s.pool.is_empty());
        let summary = &s.sink.summaries[0];
        assert_eq!(summary.ending, SessionEnding::LevelComplete);
        assert_eq!(summary.duration, 60);
        assert_eq!(summary.timestamp, 60_000);
    }

    #[test]
    fn test_focus_circle_expiry_costs_a_life() {
        let mut s = session(4);
        s.start(DifficultyLevel::Medium, 0);
        // Keep the spawner out of the way
        s.pool = CirclePool::new(1);
        s.state.combo = 2;
        let focus = s.state.focus_color;
        let created = 1_000;
        s.pool.spawn(focus, Vec2::ZERO, CIRCLE_RADIUS, created, 2500.0).unwrap();

        s.advance(created + 2_600);
        assert!(s.pool.is_empty());
        assert_eq!(s.state.missed_taps, 1);
        assert_eq!(s.state.lives, 2);
        assert_eq!(s.state.combo, 0);
    }

    #[test]
    fn test_distractor_expiry_is_free() {
        let mut s = session(5);
        s.start(DifficultyLevel::Medium, 0);
        s.pool = CirclePool::new(1);
        s.state.combo = 2;
        let other = distractor(&s);
        s.pool.spawn(other, Vec2::ZERO, CIRCLE_RADIUS, 0, 500.0).unwrap();

        s.advance(700);
        assert!(s.pool.is_empty());
        assert_eq!(s.state.lives, 3);
        assert_eq!(s.state.combo, 2);
    }

    #[test]
    fn test_spawner_respects_capacity() {
        let mut s = session(6);
        s.start(DifficultyLevel::Medium, 0);
        let wrong = distractor(&s);
        for _ in 0..MAX_CIRCLES {
            s.pool.spawn(wrong, Vec2::ZERO, CIRCLE_RADIUS, 0, 1_000_000.0).unwrap();
        }
        assert_eq!(s.spawn_circle(800), None);
        s.advance(800);
        assert_eq!(s.pool.len(), MAX_CIRCLES);
    }

    #[test]
    fn test_correct_tap_scales_with_level() {
        let mut s = session(7);
        s.start(DifficultyLevel::Medium, 0);
        s.state.level = 2;
        s.level_scale = scale(2, DifficultyLevel::Medium.preset());
        s.state.combo = 3;
        let focus = s.state.focus_color;
        let id = plant(&mut s, focus, 0);

        assert_eq!(s.tap(id), Some(Outcome::Correct { points: 26 }));
        assert_eq!(s.state.score, 26);
        // Second tap on the same circle is a no-op
        assert_eq!(s.tap(id), None);
        assert_eq!(s.state.score, 26);
    }

    #[test]
    fn test_next_level_carries_totals() {
        let mut s = session(8);
        s.start(DifficultyLevel::Medium, 0);
        s.pool = CirclePool::new(0);
        s.state.score = 50;
        s.state.max_combo = 7;
        s.state.lives = 1;
        s.advance(60_000);
        assert!(!s.restart(60_000));
        assert!(s.next_level(61_000));

        assert_eq!(s.phase(), SessionPhase::Running);
        assert_eq!(s.state.level, 2);
        assert_eq!(s.state.lives, 3);
        assert_eq!(s.state.score, 0);
        assert_eq!(s.state.total_score, 50);
        assert_eq!(s.state.max_combo, 7);
        assert_eq!(s.state.time_remaining, 60);
        assert_eq!(s.level_scale.circle_lifetime, 2250.0);
        assert_eq!(s.clock.spawn_period(), Some(720));
    }

    #[test]
    fn test_restart_zeroes_totals() {
        let mut s = session(9);
        s.start(DifficultyLevel::Easy, 0);
        s.state.score = 30;
        s.state.lives = 1;
        let wrong = distractor(&s);
        let id = plant(&mut s, wrong, 0);
        s.tap(id);
        assert_eq!(s.phase(), SessionPhase::GameOver);
        assert!(!s.next_level(100));

        assert!(s.restart(100));
        assert_eq!(s.state.total_score, 0);
        assert_eq!(s.state.level, 1);
        assert_eq!(s.state.lives, 5);
        assert_eq!(s.state.max_combo, 0);
    }

    #[test]
    fn test_spawned_circles_keep_their_lifetime() {
        let mut s = session(10);
        s.start(DifficultyLevel::Medium, 0);
        s.advance(800);
        let first = s.pool.iter().next().cloned().unwrap();
        assert_eq!(first.lifetime, 2500.0);
        assert_eq!(first.created_at, 800);

        // A mid-flight rescale only reaches later spawns
        s.level_scale = scale(5, DifficultyLevel::Medium.preset());
        s.advance(1_600);
        assert_eq!(s.pool.get(first.id).unwrap().lifetime, 2500.0);
        let latest = s.pool.iter().last().unwrap();
        assert_eq!(latest.lifetime, 1500.0);
    }

    #[test]
    fn test_stale_fire_after_game_over_is_ignored() {
        let mut s = session(11);
        s.start(DifficultyLevel::Medium, 0);
        let countdown = ClockFire {
            action: ClockAction::Countdown,
            due: 1_000,
            epoch: s.clock.epoch(),
        };
        s.state.lives = 1;
        let wrong = distractor(&s);
        let id = plant(&mut s, wrong, 0);
        s.tap(id);
        assert_eq!(s.phase(), SessionPhase::GameOver);

        let before = s.state.clone();
        assert!(!s.handle_fire(countdown));
        assert_eq!(s.state, before);
        assert_eq!(s.sink.summaries.len(), 1);
    }

    #[test]
    fn test_lives_and_time_same_tick_game_over_wins() {
        let mut s = session(12);
        s.start(DifficultyLevel::Medium, 0);
        s.pool = CirclePool::new(1);
        s.state.lives = 1;
        let focus = s.state.focus_color;
        // Expires during the sweep at 60_000, which runs before the final countdown
        s.pool.spawn(focus, Vec2::ZERO, CIRCLE_RADIUS, 57_450, 2500.0).unwrap();
        s.advance(59_999);
        assert_eq!(s.phase(), SessionPhase::Running);
        s.advance(60_000);

        assert_eq!(s.phase(), SessionPhase::GameOver);
        assert_eq!(s.sink.summaries.len(), 1);
        assert_eq!(s.sink.summaries[0].ending, SessionEnding::GameOver);
        assert_eq!(s.state.time_remaining, 1);
    }

    #[test]
    fn test_queued_taps_run_on_advance() {
        let mut s = session(13);
        s.start(DifficultyLevel::Medium, 0);
        let focus = s.state.focus_color;
        let id = plant(&mut s, focus, 0);
        s.submit_tap(id);
        assert_eq!(s.state.correct_taps, 0);
        s.advance(10);
        assert_eq!(s.state.correct_taps, 1);
        assert!(s.drain_events().contains(&GameEvent::Tapped {
            id,
            correct: true,
            points: 10
        }));
    }

    #[test]
    fn test_reset_returns_to_idle() {
        let mut s = session(14);
        s.start(DifficultyLevel::Hard, 0);
        s.advance(1_000);
        s.reset();
        assert_eq!(s.phase(), SessionPhase::Idle);
        assert!(s.pool.is_empty());
        assert!(!s.clock.is_running());
        assert_eq!(s.state.difficulty, DifficultyLevel::Hard);
        assert!(s.sink.summaries.is_empty());
    }

    #[test]
    fn test_unknown_names_fall_back() {
        let config = GameConfig {
            theme: "vaporwave".into(),
            ..GameConfig::default()
        };
        let mut s = Session::new(15, config, NullFeedback, NullSink);
        assert_eq!(s.theme().key, DEFAULT_THEME);
        assert!(s.start_named("extreme", 0));
        assert_eq!(s.state().difficulty, DifficultyLevel::Medium);
        assert!(!s.set_theme("ocean"));
    }

    #[test]
    fn test_same_seed_same_session() {
        let run = |seed| {
            let mut s = Session::headless(seed);
            s.start(DifficultyLevel::Medium, 0);
            s.advance(5_000);
            s.snapshot()
        };
        let (a, b) = (run(99), run(99));
        assert_eq!(a.state, b.state);
        assert_eq!(a.circles, b.circles);
    }

    #[test]
    fn test_game_ending_tap_uses_the_turn_time() {
        let mut s = session(13);
        s.start(DifficultyLevel::Medium, 0);
        s.pool = CirclePool::new(0);
        s.advance(5_000);
        s.pool = CirclePool::new(1);
        s.state.lives = 1;
        let wrong = distractor(&s);
        let id = plant(&mut s, wrong, 5_000);

        s.submit_tap(id);
        s.advance(9_000);
        assert_eq!(s.phase(), SessionPhase::GameOver);
        let summary = s.sink.summaries.last().unwrap();
        assert_eq!(summary.ending, SessionEnding::GameOver);
        assert_eq!(summary.timestamp, 9_000);
        assert_eq!(s.now(), 9_000);
    }

    #[test]
    fn test_spawn_colour_mix() {
        const DRAWS: usize = 20_000;
        let mut s = session(14);
        s.start(DifficultyLevel::Medium, 0);
        let focus = s.state.focus_color;

        let mut counts: HashMap<Color, usize> = HashMap::new();
        for _ in 0..DRAWS {
            *counts.entry(s.pick_color()).or_default() += 1;
        }
        let share = |c: Color| counts.get(&c).copied().unwrap_or(0) as f64 / DRAWS as f64;
        assert!((share(focus) - FOCUS_SPAWN_CHANCE).abs() < 0.02, "focus {}", share(focus));

        let others: Vec<Color> = s.theme.palette.iter().copied().filter(|c| *c != focus).collect();
        assert_eq!(others.len(), 7);
        assert_eq!(counts.len(), 8);
        let expected = (1.0 - FOCUS_SPAWN_CHANCE) / others.len() as f64;
        for c in others {
            assert!((share(c) - expected).abs() < 0.015, "{} at {}", c, share(c));
        }

        for _ in 0..DRAWS {
            assert_ne!(s.pick_distractor(), focus);
        }
    }
}
