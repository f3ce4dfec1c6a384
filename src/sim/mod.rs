//! Deterministic game loop
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Virtual millisecond timestamps only
//! - Seeded RNG only
//! - Stable iteration order (by circle id)
//! - No rendering, storage or platform dependencies

pub mod autoplay;
pub mod clock;
pub mod difficulty;
pub mod pool;
pub mod scoring;
pub mod session;
pub mod state;
pub mod tick;

pub use autoplay::Autoplay;
pub use clock::{ClockAction, ClockFire, GameClock};
pub use difficulty::{DifficultyLevel, DifficultyPreset, LevelScale, scale};
pub use pool::{Circle, CircleId, CirclePool, Sweep};
pub use scoring::{Outcome, Scored, apply_focus_miss, apply_tap};
pub use session::{
    GameConfig, GameEvent, PlayField, Session, SessionEnding, SessionSummary, SessionView,
};
pub use state::{GameState, SessionPhase};
pub use tick::{TickInput, tick};
