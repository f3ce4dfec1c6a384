//! Tap and miss scoring
//!
//! Pure state updates. Phase transitions are left to the session, which
//! reads `lives_exhausted` on the result.

use super::state::GameState;
use crate::Color;
use crate::consts::{COMBO_BONUS, CORRECT_TAP_POINTS, WRONG_TAP_PENALTY};

/// What a scored event did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// Focus-coloured circle tapped
    Correct { points: u64 },
    /// Distractor tapped; `penalty` is what was actually deducted
    Wrong { penalty: u64 },
    /// Focus-coloured circle expired untapped
    Missed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Scored {
    pub outcome: Outcome,
    /// True only for the event that took lives from 1 to 0
    pub lives_exhausted: bool,
}

/// Score a tap on a circle of `color` against the current focus colour
pub fn apply_tap(state: &mut GameState, color: Color, score_multiplier: u64) -> Scored {
    if color == state.focus_color {
        let points = CORRECT_TAP_POINTS * score_multiplier + state.combo as u64 * COMBO_BONUS;
        state.score += points;
        state.correct_taps += 1;
        state.combo += 1;
        state.max_combo = state.max_combo.max(state.combo);
        Scored {
            outcome: Outcome::Correct { points },
            lives_exhausted: false,
        }
    } else {
        let penalty = state.score.min(WRONG_TAP_PENALTY);
        state.score -= penalty;
        Scored {
            outcome: Outcome::Wrong { penalty },
            lives_exhausted: lose_life(state),
        }
    }
}

/// Score a focus-coloured circle that expired untapped
pub fn apply_focus_miss(state: &mut GameState) -> Scored {
    Scored {
        outcome: Outcome::Missed,
        lives_exhausted: lose_life(state),
    }
}

fn lose_life(state: &mut GameState) -> bool {
    state.missed_taps += 1;
    state.combo = 0;
    let had_lives = state.lives > 0;
    state.lives = state.lives.saturating_sub(1);
    had_lives && state.lives == 0
}
