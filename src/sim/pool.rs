//! Live circle collection
//!
//! Circles are kept sorted by id so iteration order is stable.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::Color;

/// Opaque circle handle. Never reused within a pool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CircleId(pub u32);

/// A tappable circle
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Circle {
    pub id: CircleId,
    pub color: Color,
    /// Top-left of the bounding box, in play-field units
    pub pos: Vec2,
    pub radius: f32,
    /// Spawn timestamp (ms)
    pub created_at: u64,
    /// ms until expiry, fixed at spawn
    pub lifetime: f64,
}

impl Circle {
    /// Age in ms at `now`; zero if `now` precedes creation
    pub fn age(&self, now: u64) -> u64 {
        now.saturating_sub(self.created_at)
    }

    pub fn is_expired(&self, now: u64) -> bool {
        self.age(now) as f64 > self.lifetime
    }

    /// Remaining fraction of life in `[0, 1]`, used for fade-out
    pub fn life_fraction(&self, now: u64) -> f32 {
        if self.lifetime <= 0.0 {
            return 0.0;
        }
        (1.0 - self.age(now) as f64 / self.lifetime).clamp(0.0, 1.0) as f32
    }
}

/// Result of one expiry sweep
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Sweep {
    /// Expired distractors, dropped without consequence
    pub discarded: usize,
    /// Expired focus-coloured circles
    pub focus_misses: Vec<Circle>,
}

impl Sweep {
    pub fn is_empty(&self) -> bool {
        self.discarded == 0 && self.focus_misses.is_empty()
    }
}

/// The set of live circles, bounded by `capacity`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CirclePool {
    circles: Vec<Circle>,
    capacity: usize,
    next_id: u32,
}

impl CirclePool {
    pub fn new(capacity: usize) -> Self {
        Self {
            circles: Vec::with_capacity(capacity),
            capacity,
            next_id: 1,
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.circles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.circles.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.circles.len() >= self.capacity
    }

    pub fn iter(&self) -> impl Iterator<Item = &Circle> {
        self.circles.iter()
    }

    pub fn get(&self, id: CircleId) -> Option<&Circle> {
        self.index_of(id).map(|i| &self.circles[i])
    }

    /// Insert a new circle. Returns `None` without allocating an id when full.
    pub fn spawn(
        &mut self,
        color: Color,
        pos: Vec2,
        radius: f32,
        created_at: u64,
        lifetime: f64,
    ) -> Option<CircleId> {
        if self.is_full() {
            return None;
        }
        let id = CircleId(self.next_id);
        self.next_id += 1;
        // Ids are monotonic, so pushing keeps the vec sorted
        self.circles.push(Circle {
            id,
            color,
            pos,
            radius,
            created_at,
            lifetime,
        });
        Some(id)
    }

    /// Remove a tapped circle. A missing id (already expired or tapped) is a no-op.
    pub fn remove_by_tap(&mut self, id: CircleId) -> Option<Circle> {
        self.index_of(id).map(|i| self.circles.remove(i))
    }

    /// Remove every circle older than its lifetime at `now`.
    ///
    /// Only circles matching `focus` are reported as misses.
    pub fn sweep_expired(&mut self, now: u64, focus: Color) -> Sweep {
        let mut sweep = Sweep::default();
        self.circles.retain(|circle| {
            if !circle.is_expired(now) {
                return true;
            }
            if circle.color == focus {
                sweep.focus_misses.push(circle.clone());
            } else {
                sweep.discarded += 1;
            }
            false
        });
        sweep
    }

    /// Drop all circles. Ids keep counting so stale taps never hit a new circle.
    pub fn clear(&mut self) {
        self.circles.clear();
    }

    fn index_of(&self, id: CircleId) -> Option<usize> {
        self.circles.binary_search_by_key(&id, |c| c.id).ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FOCUS: Color = Color::rgb(0x4ECDC4);
    const OTHER: Color = Color::rgb(0xFF6B6B);

    fn spawn(pool: &mut CirclePool, color: Color, at: u64, lifetime: f64) -> CircleId {
        pool.spawn(color, Vec2::ZERO, 40.0, at, lifetime).unwrap()
    }

    #[test]
    fn test_capacity_refuses_insert() {
        let mut pool = CirclePool::new(6);
        for i in 0..6 {
            spawn(&mut pool, OTHER, i, 2500.0);
        }
        assert!(pool.is_full());
        assert_eq!(pool.spawn(FOCUS, Vec2::ZERO, 40.0, 10, 2500.0), None);
        assert_eq!(pool.len(), 6);
    }

    #[test]
    fn test_remove_by_tap_is_idempotent() {
        let mut pool = CirclePool::new(6);
        let a = spawn(&mut pool, FOCUS, 0, 2500.0);
        let b = spawn(&mut pool, OTHER, 0, 2500.0);

        assert_eq!(pool.remove_by_tap(a).map(|c| c.id), Some(a));
        assert_eq!(pool.remove_by_tap(a), None);
        assert_eq!(pool.len(), 1);
        assert!(pool.get(b).is_some());
    }

    #[test]
    fn test_sweep_reports_only_focus_misses() {
        let mut pool = CirclePool::new(6);
        let focus = spawn(&mut pool, FOCUS, 1000, 2500.0);
        spawn(&mut pool, OTHER, 1000, 2500.0);
        let young = spawn(&mut pool, FOCUS, 3000, 2500.0);

        let sweep = pool.sweep_expired(1000 + 2600, FOCUS);
        assert_eq!(sweep.discarded, 1);
        assert_eq!(sweep.focus_misses.len(), 1);
        assert_eq!(sweep.focus_misses[0].id, focus);
        assert_eq!(pool.len(), 1);
        assert!(pool.get(young).is_some());
    }

    #[test]
    fn test_expiry_is_strictly_after_lifetime() {
        let mut pool = CirclePool::new(6);
        spawn(&mut pool, FOCUS, 0, 2500.0);
        assert!(pool.sweep_expired(2500, FOCUS).is_empty());
        assert_eq!(pool.sweep_expired(2501, FOCUS).focus_misses.len(), 1);
    }

    #[test]
    fn test_ids_survive_clear() {
        let mut pool = CirclePool::new(6);
        let old = spawn(&mut pool, FOCUS, 0, 2500.0);
        pool.clear();
        let new = spawn(&mut pool, FOCUS, 0, 2500.0);
        assert_ne!(old, new);
        assert_eq!(pool.remove_by_tap(old), None);
    }

    #[test]
    fn test_life_fraction() {
        let mut pool = CirclePool::new(6);
        let id = spawn(&mut pool, FOCUS, 100, 1000.0);
        let circle = pool.get(id).unwrap();
        assert_eq!(circle.life_fraction(100), 1.0);
        assert!((circle.life_fraction(600) - 0.5).abs() < 1e-6);
        assert_eq!(circle.life_fraction(5000), 0.0);
    }
}
