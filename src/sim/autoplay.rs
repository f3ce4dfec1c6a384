//! Idle/demo player
//!
//! Looks at the same snapshot a renderer gets and decides what to tap.
//! Used by the headless driver and for soak-testing the loop.

use std::collections::BTreeMap;

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use super::pool::CircleId;
use super::session::SessionView;

/// What the bot decided for one circle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Plan {
    /// Tap once the circle is this old (ms)
    TapAt(u64),
    Ignore,
}

#[derive(Debug, Clone)]
pub struct Autoplay {
    rng: Pcg32,
    /// Decisions for circles still on screen, made once per circle
    plans: BTreeMap<CircleId, Plan>,
    /// ms a circle must be visible before the bot reacts to it
    pub reaction_ms: u64,
    /// Chance per distractor of tapping it anyway
    pub mistake_chance: f64,
    /// Chance per focus circle of reacting a second reaction time late
    pub hesitate_chance: f64,
}

impl Autoplay {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: Pcg32::seed_from_u64(seed),
            plans: BTreeMap::new(),
            reaction_ms: 450,
            mistake_chance: 0.02,
            hesitate_chance: 0.1,
        }
    }

    /// Taps for this frame
    pub fn choose_taps(&mut self, view: &SessionView) -> Vec<CircleId> {
        self.plans.retain(|id, _| view.circles.iter().any(|c| c.id == *id));
        if !view.state.is_playing() {
            return Vec::new();
        }
        let focus = view.state.focus_color;
        let mut taps = Vec::new();
        for circle in &view.circles {
            let age = circle.age(view.now);
            if age < self.reaction_ms || circle.is_expired(view.now) {
                continue;
            }
            let plan = match self.plans.get(&circle.id) {
                Some(plan) => *plan,
                None => {
                    let plan = if circle.color == focus {
                        if self.rng.random_bool(self.hesitate_chance) {
                            Plan::TapAt(self.reaction_ms * 2)
                        } else {
                            Plan::TapAt(self.reaction_ms)
                        }
                    } else if self.rng.random_bool(self.mistake_chance) {
                        Plan::TapAt(self.reaction_ms)
                    } else {
                        Plan::Ignore
                    };
                    self.plans.insert(circle.id, plan);
                    plan
                }
            };
            if matches!(plan, Plan::TapAt(at) if age >= at) {
                taps.push(circle.id);
            }
        }
        taps
    }
}
