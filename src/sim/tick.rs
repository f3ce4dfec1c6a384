//! One cooperative processing turn
//!
//! Taps gathered since the last turn are scored first, then every timer due
//! up to `now` fires in time order. Each handler finishes its state update
//! before the next one starts.

use super::pool::CircleId;
use super::session::{GameEvent, Session};
use crate::feedback::FeedbackSink;
use crate::persistence::SessionSink;

/// Input gathered for a single turn
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Circles the player touched, in touch order
    pub taps: Vec<CircleId>,
}

impl TickInput {
    pub fn tap(id: CircleId) -> Self {
        Self { taps: vec![id] }
    }
}

/// Advance the session to `now`, returning everything that happened
pub fn tick<F: FeedbackSink, P: SessionSink>(
    session: &mut Session<F, P>,
    input: &TickInput,
    now: u64,
) -> Vec<GameEvent> {
    for id in &input.taps {
        session.submit_tap(*id);
    }
    session.advance(now);
    session.drain_events()
}
