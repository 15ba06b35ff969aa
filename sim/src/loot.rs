//! Drop tables and pickup.

use log::{debug, warn};
use rand::Rng;
use rpg_shared::{ItemCatalog, LootKind};

use crate::entities::{LootDrop, PlayerState};
use crate::physics::Vec2;

pub const BANDIT_DROP_CHANCE: f64 = 0.9;

/// Share of bandit drops that are potions rather than gold
pub const BANDIT_POTION_CHANCE: f64 = 0.3;

pub const BANDIT_GOLD_MIN: u32 = 5;
pub const BANDIT_GOLD_MAX: u32 = 20;

pub const TREE_LOGS_MIN: u32 = 1;
pub const TREE_LOGS_MAX: u32 = 3;

/// How far logs scatter from the tree base on each axis
pub const LOG_SCATTER: f32 = 25.0;

/// Distance from a tree's anchor down to its base
pub const TREE_BASE_OFFSET: f32 = 7.68;

/// A drop to be placed in the world
#[derive(Debug, Clone, PartialEq)]
pub struct LootRoll {
    pub kind: LootKind,
    pub value: u32,
    pub position: Vec2,
}

/// Roll a defeated bandit's drop, if any.
pub fn roll_bandit_loot<R: Rng>(rng: &mut R, at: Vec2) -> Option<LootRoll> {
    if !rng.gen_bool(BANDIT_DROP_CHANCE) {
        return None;
    }
    let roll = if rng.gen_bool(BANDIT_POTION_CHANCE) {
        LootRoll { kind: LootKind::Item("health_potion".into()), value: 1, position: at }
    } else {
        let gold = rng.gen_range(BANDIT_GOLD_MIN..=BANDIT_GOLD_MAX);
        LootRoll { kind: LootKind::Gold, value: gold, position: at }
    };
    Some(roll)
}

/// Logs dropped by a felled tree, one per drop, scattered around its base.
pub fn roll_tree_loot<R: Rng>(rng: &mut R, tree: Vec2) -> Vec<LootRoll> {
    let base = Vec2::new(tree.x, tree.y + TREE_BASE_OFFSET);
    let count = rng.gen_range(TREE_LOGS_MIN..=TREE_LOGS_MAX);
    (0..count)
        .map(|_| {
            let offset = Vec2::new(
                rng.gen_range(-LOG_SCATTER..=LOG_SCATTER),
                rng.gen_range(-LOG_SCATTER..=LOG_SCATTER),
            );
            LootRoll { kind: LootKind::Item("log".into()), value: 1, position: base + offset }
        })
        .collect()
}

/// Result of the player walking over a drop
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PickupOutcome {
    Gold(u32),
    /// Every item went into the inventory
    Stored,
    /// Some items fit; the drop keeps the rest
    Partial { remaining: u32 },
    InventoryFull,
    UnknownItem,
}

impl PickupOutcome {
    /// Whether the drop should leave the world.
    pub fn consumes_drop(&self) -> bool {
        matches!(self, Self::Gold(_) | Self::Stored)
    }
}

/// Move a drop's contents into the player's purse or inventory.
pub fn pick_up(player: &mut PlayerState, drop: &LootDrop, catalog: &ItemCatalog) -> PickupOutcome {
    match &drop.kind {
        LootKind::Gold => {
            player.gold += u64::from(drop.value);
            PickupOutcome::Gold(drop.value)
        }
        LootKind::Item(item_id) => {
            let Some(def) = catalog.get(item_id) else {
                warn!("Loot drop {} holds unknown item '{}'", drop.id, item_id);
                return PickupOutcome::UnknownItem;
            };
            let remaining = player.inventory.add(def, drop.value);
            if remaining == 0 {
                PickupOutcome::Stored
            } else if remaining < drop.value {
                PickupOutcome::Partial { remaining }
            } else {
                debug!("Inventory full, leaving {} on the ground", item_id);
                PickupOutcome::InventoryFull
            }
        }
    }
}
