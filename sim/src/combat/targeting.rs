//! Range and arc tests for swings.

use rpg_shared::EntityId;

use super::{ATTACK_ARC, DAMAGE_RANGE_BONUS};
use crate::physics::{within_arc, Vec2};

/// Weapon range plus the fixed reach bonus.
pub fn effective_range(weapon_range: f32) -> f32 {
    weapon_range + DAMAGE_RANGE_BONUS
}

/// Squared distance to `target` if a swing from `origin` aimed at `aim` (radians)
/// with `weapon_range` reaches it, boundary inclusive.
pub fn in_strike_zone(origin: Vec2, aim: f32, target: Vec2, weapon_range: f32) -> Option<f32> {
    let reach = effective_range(weapon_range);
    let dist_sq = origin.distance_squared_to(target);
    if dist_sq > reach * reach {
        return None;
    }
    if !within_arc(aim, origin.angle_to(target), ATTACK_ARC / 2.0) {
        return None;
    }
    Some(dist_sq)
}

/// The single closest candidate inside the strike zone.
pub fn closest_target<I>(origin: Vec2, aim: f32, weapon_range: f32, candidates: I) -> Option<EntityId>
where
    I: IntoIterator<Item = (EntityId, Vec2)>,
{
    candidates
        .into_iter()
        .filter_map(|(id, pos)| in_strike_zone(origin, aim, pos, weapon_range).map(|d| (id, d)))
        .min_by(|a, b| a.1.total_cmp(&b.1))
        .map(|(id, _)| id)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_range_boundary() {
        let origin = Vec2::new(0.0, 0.0);
        // Sword: 80 + 54 = 134
        assert!(in_strike_zone(origin, 0.0, Vec2::new(134.0, 0.0), 80.0).is_some());
        assert!(in_strike_zone(origin, 0.0, Vec2::new(134.5, 0.0), 80.0).is_none());
    }

    #[test]
    fn test_arc_boundary() {
        let origin = Vec2::new(0.0, 0.0);
        assert!(in_strike_zone(origin, 0.0, Vec2::new(70.0, 70.0), 80.0).is_some());

        let off = 46f32.to_radians();
        let outside = Vec2::new(off.cos() * 90.0, off.sin() * 90.0);
        assert!(in_strike_zone(origin, 0.0, outside, 80.0).is_none());

        // Directly behind
        assert!(in_strike_zone(origin, 0.0, Vec2::new(-50.0, 0.0), 80.0).is_none());
    }

    #[test]
    fn test_closest_target_wins() {
        let origin = Vec2::new(0.0, 0.0);
        let candidates = vec![
            (1, Vec2::new(120.0, 0.0)),
            (2, Vec2::new(60.0, 10.0)),
            (3, Vec2::new(-30.0, 0.0)),
        ];
        assert_eq!(closest_target(origin, 0.0, 80.0, candidates), Some(2));
        assert_eq!(closest_target(origin, 0.0, 80.0, Vec::new()), None);
    }
}
