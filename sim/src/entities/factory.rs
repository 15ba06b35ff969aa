//! Character creation for every kind.

use log::{error, warn};
use rand::seq::SliceRandom;
use rand::Rng;
use rpg_shared::{
    ArmorSlot, CharacterKind, DifficultySettings, EntityId, Equipment, ItemCatalog, StatBlock,
    StatName,
};

use super::character::{max_health_for, tree_health_for, Character, Role, TREE_ENDURANCE};
use super::npc::{BanditState, Brain, VillagerState, BANDIT_NAMES, VILLAGER_DIALOGUE_POOL, VILLAGER_NAMES};
use super::player::PlayerState;
use crate::physics::Vec2;

pub const PLAYER_SPEED: f32 = 200.0;
pub const PLAYER_SLOW_SPEED: f32 = 60.0;
pub const BANDIT_SPEED: f32 = 80.0;
pub const BANDIT_SLOW_SPEED: f32 = 30.0;
pub const VILLAGER_SPEED: f32 = 70.0;
pub const VILLAGER_SLOW_SPEED: f32 = 25.0;

/// Items the player starts with, in inventory order
const STARTER_KIT: [&str; 7] = [
    "iron_sword",
    "iron_axe",
    "crude_shield",
    "iron_spear",
    "leather_coif",
    "leather_tunic",
    "leather_pants",
];

/// Builds fully initialised characters
pub struct CharacterFactory<'a> {
    catalog: &'a ItemCatalog,
    difficulty: DifficultySettings,
}

impl<'a> CharacterFactory<'a> {
    pub fn new(catalog: &'a ItemCatalog, difficulty: DifficultySettings) -> Self {
        Self { catalog, difficulty }
    }

    /// Create a character of `kind` at (x, y). Returns `None` for non-finite coordinates.
    pub fn create<R: Rng>(
        &self,
        kind: CharacterKind,
        id: EntityId,
        x: f32,
        y: f32,
        now: u64,
        rng: &mut R,
    ) -> Option<Character> {
        if !x.is_finite() || !y.is_finite() {
            error!("Refusing to create {} at invalid position ({}, {})", kind.name(), x, y);
            return None;
        }

        let character = match kind {
            CharacterKind::Player => {
                let stats = StatBlock::default();
                let health = max_health_for(stats.level(StatName::Endurance));
                Self::base(id, "Player", x, y, stats, health, (PLAYER_SPEED, PLAYER_SLOW_SPEED))
                    .with_role(Role::Player(Box::new(self.starter_state())))
            }
            CharacterKind::Bandit => {
                let stats = StatBlock::with_levels(&[
                    (StatName::Might, 3),
                    (StatName::Endurance, 3),
                    (StatName::Agility, 2),
                    (StatName::Stealth, 2),
                ]);
                let base_health = max_health_for(stats.level(StatName::Endurance));
                let health = ((base_health as f64 * self.difficulty.enemy_health_mult).floor() as u32).max(1);
                let name = BANDIT_NAMES.choose(rng).copied().unwrap_or("Bandit");
                let equipment = self.bandit_equipment(rng);
                Self::base(id, name, x, y, stats, health, (BANDIT_SPEED, BANDIT_SLOW_SPEED)).with_role(
                    Role::Bandit(BanditState {
                        brain: Brain::spawned(now, rng),
                        equipment,
                        next_attack_at: now,
                    }),
                )
            }
            CharacterKind::Villager => {
                let stats = StatBlock::default();
                let health = max_health_for(stats.level(StatName::Endurance));
                let name = VILLAGER_NAMES.choose(rng).copied().unwrap_or("Villager");
                let dialogue = VILLAGER_DIALOGUE_POOL
                    .choose(rng)
                    .map(|lines| lines.iter().map(|line| line.to_string()).collect())
                    .unwrap_or_default();
                Self::base(id, name, x, y, stats, health, (VILLAGER_SPEED, VILLAGER_SLOW_SPEED)).with_role(
                    Role::Villager(VillagerState {
                        brain: Brain::spawned(now, rng),
                        dialogue,
                    }),
                )
            }
            CharacterKind::Tree => {
                let stats = StatBlock::with_levels(&[(StatName::Endurance, TREE_ENDURANCE)]);
                let health = tree_health_for(TREE_ENDURANCE);
                Self::base(id, "Tree", x, y, stats, health, (0.0, 0.0)).with_role(Role::Tree)
            }
        };

        Some(character)
    }

    /// Starter loadout in slots 0-6, with copies of the sword and shield equipped.
    fn starter_state(&self) -> PlayerState {
        let mut state = PlayerState::default();
        for (index, item_id) in STARTER_KIT.iter().enumerate() {
            match self.catalog.instance(item_id, 1) {
                Some(item) => {
                    state.inventory.replace(index, Some(item));
                }
                None => warn!("Starter item '{}' is missing from the catalog", item_id),
            }
        }
        state.equipment.primary = self.catalog.instance("iron_sword", 1);
        state.equipment.off_hand = self.catalog.instance("crude_shield", 1);
        state
    }

    /// Random weapon (sword or axe, evenly) plus a leather coif, tunic and pants.
    fn bandit_equipment<R: Rng>(&self, rng: &mut R) -> Equipment {
        let weapon_id = if rng.gen_bool(0.5) { "iron_sword" } else { "iron_axe" };
        let mut equipment = Equipment {
            primary: self
                .catalog
                .instance(weapon_id, 1)
                .or_else(|| self.catalog.instance("iron_sword", 1)),
            ..Equipment::default()
        };
        for (slot, item_id) in [
            (ArmorSlot::Head, "leather_coif"),
            (ArmorSlot::UpperBody, "leather_tunic"),
            (ArmorSlot::LowerBody, "leather_pants"),
        ] {
            equipment.armor.replace(slot, self.catalog.instance(item_id, 1));
        }
        equipment
    }

    fn base(
        id: EntityId,
        name: &str,
        x: f32,
        y: f32,
        stats: StatBlock,
        health: u32,
        (speed, slow_speed): (f32, f32),
    ) -> Character {
        Character {
            id,
            name: name.to_string(),
            position: Vec2::new(x, y),
            velocity: Vec2::ZERO,
            facing: Vec2::new(0.0, 1.0),
            health,
            max_health: health,
            stats,
            active: true,
            remove_at: None,
            speed,
            slow_speed,
            in_water: false,
            knockback: None,
            role: Role::Tree,
        }
    }
}

impl Character {
    fn with_role(mut self, role: Role) -> Self {
        self.role = role;
        self
    }
}
