//! Short eased displacement applied to characters that take damage.

use std::f32::consts::PI;

use crate::physics::Vec2;

/// Length of a knockback tween
pub const KNOCKBACK_DURATION_MS: u64 = 60;

/// An in-flight knockback tween
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Knockback {
    pub from: Vec2,
    pub to: Vec2,
    pub started_at: u64,
    pub duration_ms: u64,
}

impl Knockback {
    /// Push `target` directly away from `source` by `distance` units.
    /// Returns `None` when the two positions coincide or the distance is not positive.
    pub fn away_from(source: Vec2, target: Vec2, distance: f32, now: u64) -> Option<Self> {
        if distance <= 0.0 || !distance.is_finite() {
            return None;
        }
        let dir = (target - source).normalized();
        if dir.is_zero() {
            return None;
        }
        Some(Self {
            from: target,
            to: target + dir * distance,
            started_at: now,
            duration_ms: KNOCKBACK_DURATION_MS,
        })
    }

    /// Position along the tween at `now` (sine in-out easing).
    pub fn position_at(&self, now: u64) -> Vec2 {
        let t = self.progress(now);
        let eased = 0.5 * (1.0 - (PI * t).cos());
        self.from + (self.to - self.from) * eased
    }

    pub fn is_finished(&self, now: u64) -> bool {
        now >= self.started_at + self.duration_ms
    }

    fn progress(&self, now: u64) -> f32 {
        if self.duration_ms == 0 {
            return 1.0;
        }
        let elapsed = now.saturating_sub(self.started_at) as f32;
        (elapsed / self.duration_ms as f32).clamp(0.0, 1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_knockback_direction_and_easing() {
        let kb = Knockback::away_from(Vec2::new(0.0, 0.0), Vec2::new(50.0, 0.0), 8.0, 1000).unwrap();
        assert_eq!(kb.to, Vec2::new(58.0, 0.0));
        assert_eq!(kb.position_at(1000), Vec2::new(50.0, 0.0));

        let midway = kb.position_at(1030);
        assert!((midway.x - 54.0).abs() < 1e-3);

        assert_eq!(kb.position_at(2000), Vec2::new(58.0, 0.0));
        assert!(kb.is_finished(1060));
        assert!(!kb.is_finished(1059));
    }

    #[test]
    fn test_knockback_requires_separation() {
        let pos = Vec2::new(10.0, 10.0);
        assert!(Knockback::away_from(pos, pos, 8.0, 0).is_none());
        assert!(Knockback::away_from(Vec2::ZERO, pos, 0.0, 0).is_none());
    }
}
