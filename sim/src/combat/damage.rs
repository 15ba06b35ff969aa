//! Attack power, defense and damage resolution.
//!
//! Damage is flat subtraction: `damage = max(0, attack_power - defense)`.
//! A raised shield that faces the attacker adds its bonus to defense for that
//! one blow; the difference it makes is the mitigated damage.

use rpg_shared::{Equipment, ItemType, StatBlock, StatName};

use super::{ENDURANCE_XP_PER_BLOCK_MITIGATION, ENDURANCE_XP_PER_DAMAGE};

/// Might level plus the primary weapon's damage.
pub fn attack_power(stats: &StatBlock, equipment: Option<&Equipment>) -> u32 {
    let weapon_damage = equipment
        .and_then(|e| e.primary.as_ref())
        .and_then(|item| item.def.combat)
        .map_or(0, |combat| combat.damage);
    stats.level(StatName::Might) + weapon_damage
}

/// Endurance level plus passive equipment defense.
///
/// Shields only count while blocking, so an off-hand shield is excluded here.
pub fn effective_defense(stats: &StatBlock, equipment: Option<&Equipment>) -> u32 {
    let mut defense = stats.level(StatName::Endurance);
    if let Some(equipment) = equipment {
        if let Some(primary) = &equipment.primary {
            defense += primary.def.defense_bonus;
        }
        if let Some(off_hand) = &equipment.off_hand {
            if off_hand.def.item_type != ItemType::Shield {
                defense += off_hand.def.defense_bonus;
            }
        }
        defense += equipment.armor.iter().map(|(_, item)| item.def.defense_bonus).sum::<u32>();
    }
    defense
}

/// Apply a difficulty damage multiplier, flooring.
pub fn scale_attack(attack_power: u32, mult: f64) -> u32 {
    let scaled = (attack_power as f64 * mult).floor();
    if scaled.is_finite() && scaled > 0.0 {
        scaled.min(u32::MAX as f64) as u32
    } else {
        0
    }
}

pub fn calculate_damage(attack_power: u32, defense: u32) -> u32 {
    attack_power.saturating_sub(defense)
}

/// Outcome of one blow against a defender
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Blow {
    pub damage: u32,
    /// Damage the blow would have done without a block
    pub unblocked_damage: u32,
    pub mitigated: u32,
    pub blocked: bool,
}

impl Blow {
    /// Endurance XP the defender earns from this blow.
    pub fn endurance_xp(&self) -> u32 {
        let from_damage = self.damage * ENDURANCE_XP_PER_DAMAGE;
        let from_block = if self.blocked { self.mitigated * ENDURANCE_XP_PER_BLOCK_MITIGATION } else { 0 };
        from_damage + from_block
    }
}

/// Resolve a blow. `shield_bonus` is the bonus of a shield that blocked, if any;
/// a zero bonus does not count as a block.
pub fn resolve_blow(attack_power: u32, defense: u32, shield_bonus: Option<u32>) -> Blow {
    let unblocked_damage = calculate_damage(attack_power, defense);
    match shield_bonus.filter(|bonus| *bonus > 0) {
        Some(bonus) => {
            let damage = calculate_damage(attack_power, defense.saturating_add(bonus));
            Blow {
                damage,
                unblocked_damage,
                mitigated: unblocked_damage - damage,
                blocked: true,
            }
        }
        None => Blow {
            damage: unblocked_damage,
            unblocked_damage,
            mitigated: 0,
            blocked: false,
        },
    }
}
