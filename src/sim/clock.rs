//! Game clock: three periodic timers on a shared virtual timeline
//!
//! The clock never calls back into game code. Callers poll it for the next
//! due action and run the handler to completion before polling again, so
//! handlers never interleave. Every fire carries the clock epoch it was
//! scheduled under; `start`/`stop` bump the epoch, which lets handlers
//! recognise fires left over from a previous level.

use crate::consts::{COUNTDOWN_PERIOD_MS, SWEEP_PERIOD_MS};

/// Periodic actions, in tie-break order for fires due at the same instant
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ClockAction {
    /// Expiry sweep (100 ms)
    Sweep,
    /// One-second countdown
    Countdown,
    /// Spawn attempt at the level's spawn interval
    Spawn,
}

/// A due timer firing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClockFire {
    pub action: ClockAction,
    /// Scheduled time (ms); handlers use this as "now"
    pub due: u64,
    pub epoch: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Periodic {
    period: u64,
    next_due: u64,
}

impl Periodic {
    fn starting_at(now: u64, period: u64) -> Self {
        let period = period.max(1);
        Self {
            period,
            next_due: now.saturating_add(period),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct GameClock {
    sweep: Option<Periodic>,
    countdown: Option<Periodic>,
    spawn: Option<Periodic>,
    epoch: u64,
}

impl GameClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Arm all three timers from `now`, invalidating fires from any earlier run
    pub fn start(&mut self, now: u64, spawn_period: u64) {
        self.epoch += 1;
        self.sweep = Some(Periodic::starting_at(now, SWEEP_PERIOD_MS));
        self.countdown = Some(Periodic::starting_at(now, COUNTDOWN_PERIOD_MS));
        self.spawn = Some(Periodic::starting_at(now, spawn_period));
        log::debug!(
            "Clock started at {} ms (epoch {}, spawn every {} ms)",
            now,
            self.epoch,
            spawn_period
        );
    }

    /// Disarm all timers. Outstanding fires become stale.
    pub fn stop(&mut self) {
        if self.is_running() {
            log::debug!("Clock stopped (epoch {})", self.epoch);
        }
        self.epoch += 1;
        self.sweep = None;
        self.countdown = None;
        self.spawn = None;
    }

    pub fn is_running(&self) -> bool {
        self.sweep.is_some() || self.countdown.is_some() || self.spawn.is_some()
    }

    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    /// Whether a fire was scheduled under the current run
    pub fn is_current(&self, fire: &ClockFire) -> bool {
        fire.epoch == self.epoch && self.is_running()
    }

    pub fn spawn_period(&self) -> Option<u64> {
        self.spawn.map(|p| p.period)
    }

    /// Earliest pending fire, due or not
    pub fn peek(&self) -> Option<ClockFire> {
        [
            (ClockAction::Sweep, self.sweep),
            (ClockAction::Countdown, self.countdown),
            (ClockAction::Spawn, self.spawn),
        ]
        .into_iter()
        .filter_map(|(action, timer)| timer.map(|t| (t.next_due, action)))
        .min()
        .map(|(due, action)| ClockFire {
            action,
            due,
            epoch: self.epoch,
        })
    }

    /// Take the earliest fire due at or before `now`, rescheduling its timer
    pub fn poll(&mut self, now: u64) -> Option<ClockFire> {
        let fire = self.peek().filter(|f| f.due <= now)?;
        let timer = match fire.action {
            ClockAction::Sweep => &mut self.sweep,
            ClockAction::Countdown => &mut self.countdown,
            ClockAction::Spawn => &mut self.spawn,
        };
        if let Some(t) = timer {
            t.next_due = t.next_due.saturating_add(t.period);
        }
        Some(fire)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn drain(clock: &mut GameClock, now: u64) -> Vec<(u64, ClockAction)> {
        std::iter::from_fn(|| clock.poll(now))
            .map(|f| (f.due, f.action))
            .collect()
    }

    #[test]
    fn test_stopped_clock_never_fires() {
        let mut clock = GameClock::new();
        assert!(!clock.is_running());
        assert_eq!(clock.poll(u64::MAX), None);
    }

    #[test]
    fn test_fires_in_time_order() {
        let mut clock = GameClock::new();
        clock.start(0, 800);
        let fires = drain(&mut clock, 1000);

        let sweeps = fires.iter().filter(|(_, a)| *a == ClockAction::Sweep).count();
        assert_eq!(sweeps, 10);
        assert!(fires.contains(&(800, ClockAction::Spawn)));
        assert!(fires.windows(2).all(|w| w[0] <= w[1]));
        // Sweep wins ties with the countdown at t=1000
        let tail: Vec<_> = fires.iter().rev().take(2).collect();
        assert_eq!(*tail[0], (1000, ClockAction::Countdown));
        assert_eq!(*tail[1], (1000, ClockAction::Sweep));
    }

    #[test]
    fn test_stop_invalidates_outstanding_fires() {
        let mut clock = GameClock::new();
        clock.start(0, 800);
        let fire = clock.poll(100).unwrap();
        assert!(clock.is_current(&fire));

        clock.stop();
        assert!(!clock.is_current(&fire));
        assert_eq!(clock.poll(10_000), None);

        clock.start(10_000, 800);
        assert!(!clock.is_current(&fire));
    }
}
