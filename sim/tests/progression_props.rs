//! Property tests for the XP curve, XP grants and damage arithmetic.

use proptest::prelude::*;
use rand::rngs::StdRng;
use rand::SeedableRng;
use rpg_shared::{
    xp_for_level, xp_needed_for_level, CharacterKind, DifficultySettings, ItemCatalog, StatBlock, StatName,
    MAX_STAT_LEVEL,
};
use rpg_sim::combat::{calculate_damage, resolve_blow};
use rpg_sim::entities::CharacterFactory;
use rpg_sim::events::EventBus;
use rpg_sim::progression::{apply_xp, grant_xp, scaled_xp};

fn stat_name() -> impl Strategy<Value = StatName> {
    prop::sample::select(StatName::ALL.to_vec())
}

#[test]
fn xp_table_strictly_increases() {
    for level in 1..MAX_STAT_LEVEL {
        assert!(xp_needed_for_level(level + 1) > 0, "level {level}");
        assert!(xp_for_level(level + 1) > xp_for_level(level));
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    #[test]
    fn prop_grants_never_lower_levels(
        stat in stat_name(),
        start in 1u32..=MAX_STAT_LEVEL,
        grants in prop::collection::vec(0.0f64..50_000.0, 1..20),
        xp_mult in 0.1f64..3.0,
    ) {
        let mut stats = StatBlock::with_levels(&[(stat, start)]);
        for raw in grants {
            let before = *stats.get(stat);
            apply_xp(&mut stats, stat, raw, xp_mult);
            let after = *stats.get(stat);

            prop_assert!(after.level >= before.level);
            prop_assert!(after.level <= MAX_STAT_LEVEL);
            if after.level < MAX_STAT_LEVEL {
                prop_assert!(after.xp < after.next, "xp {} next {}", after.xp, after.next);
            } else {
                prop_assert!(after.xp <= xp_needed_for_level(MAX_STAT_LEVEL));
            }
        }
    }

    #[test]
    fn prop_small_awards_still_count(raw in 1.0f64..10.0, xp_mult in 0.01f64..5.0) {
        prop_assert!(scaled_xp(raw, xp_mult) >= 1);
    }

    #[test]
    fn prop_invalid_awards_grant_nothing(raw in prop_oneof![Just(f64::NAN), -1000.0f64..=0.0]) {
        let mut stats = StatBlock::default();
        prop_assert!(apply_xp(&mut stats, StatName::Might, raw, 1.0).is_none());
        prop_assert_eq!(stats, StatBlock::default());
    }

    #[test]
    fn prop_endurance_level_up_heals_the_delta(damage_taken in 0u32..55, raw in 1.0f64..20_000.0) {
        let catalog = ItemCatalog::builtin();
        let mut rng = StdRng::seed_from_u64(0);
        let mut player = CharacterFactory::new(&catalog, DifficultySettings::default())
            .create(CharacterKind::Player, 1, 100.0, 100.0, 0, &mut rng)
            .unwrap();
        player.health -= damage_taken;
        let (health_before, max_before) = (player.health, player.max_health);

        let mut events = EventBus::new();
        grant_xp(&mut player, StatName::Endurance, raw, &DifficultySettings::default(), &mut events);

        prop_assert!(player.max_health >= max_before);
        prop_assert_eq!(player.health - health_before, player.max_health - max_before);
    }

    #[test]
    fn prop_damage_is_flat_subtraction(attack in 0u32..500, defense in 0u32..500, bonus in 0u32..20) {
        prop_assert_eq!(calculate_damage(attack, defense), attack.saturating_sub(defense));

        let blow = resolve_blow(attack, defense, Some(bonus));
        prop_assert!(blow.damage <= blow.unblocked_damage);
        prop_assert_eq!(blow.mitigated, blow.unblocked_damage - blow.damage);
        prop_assert_eq!(blow.blocked, bonus > 0);
    }
}
