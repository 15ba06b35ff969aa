//! Messages exchanged between the simulation core and its presentation layer.

use serde::{Deserialize, Serialize};

use crate::entities::{CharacterKind, EntityId, LootKind};
use crate::items::{ArmorSlot, Equipment, HandSlot, ItemInstance};
use crate::stats::{StatBlock, StatName};

/// Default simulation tick rate in Hz
pub const DEFAULT_TICK_RATE: u32 = 60;

/// Number of inventory slots a player has
pub const INVENTORY_SIZE: usize = 28;

// =============================================================================
// Presentation -> simulation
// =============================================================================

/// Per-tick player input
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PlayerInput {
    /// -1, 0 or 1 on each axis
    pub move_x: i8,
    pub move_y: i8,
    /// World point to aim the primary action at
    pub primary: Option<[f32; 2]>,
    /// World point to aim the off-hand action at
    pub off_hand: Option<[f32; 2]>,
    pub interact: bool,
    pub use_item: bool,
}

/// Requests issued by menus and dialogue UI
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum PlayerRequest {
    EquipItem {
        item_id: String,
        slot: HandSlot,
    },
    EquipArmor {
        item_id: String,
        inventory_index: usize,
        slot: ArmorSlot,
    },
    UnequipArmor {
        slot: ArmorSlot,
    },
    CompleteDialogue,
    RequestStats,
    RequestInventory,
    RequestEquipment,
}

// =============================================================================
// Simulation -> presentation
// =============================================================================

/// Player-facing vitals and stats
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerStatsSnapshot {
    pub health: u32,
    pub max_health: u32,
    pub gold: u64,
    pub stats: StatBlock,
}

/// Events published by the simulation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    StatsChanged(PlayerStatsSnapshot),
    StatLeveledUp {
        stat: StatName,
        level: u32,
    },
    InventoryChanged(Vec<Option<ItemInstance>>),
    EquipmentChanged(Equipment),
    DialogueOpened {
        npc_id: EntityId,
        speaker: String,
        lines: Vec<String>,
    },
    DialogueClosed {
        npc_id: EntityId,
    },
    PrimaryActionUsed {
        cooldown_ms: u64,
    },
    OffHandActionUsed {
        cooldown_ms: u64,
        block_duration_ms: u64,
    },
    /// A strike landed. `amount` may be zero when armor absorbed it.
    DamageDealt {
        attacker: EntityId,
        target: EntityId,
        amount: u32,
        blocked: bool,
        position: [f32; 2],
    },
    TreeChopped {
        tree: EntityId,
        damage: u32,
        remaining: u32,
    },
    EntityDefeated {
        id: EntityId,
        kind: CharacterKind,
    },
    EntityRemoved {
        id: EntityId,
    },
    LootDropped {
        id: EntityId,
        kind: LootKind,
        value: u32,
        position: [f32; 2],
    },
    LootCollected {
        id: EntityId,
        kind: LootKind,
        value: u32,
    },
    PlayerDied,
}

impl PlayerRequest {
    pub fn serialize(&self) -> Result<Vec<u8>, bincode::Error> {
        bincode::serialize(self)
    }

    pub fn deserialize(data: &[u8]) -> Result<Self, bincode::Error> {
        bincode::deserialize(data)
    }
}

impl GameEvent {
    pub fn serialize(&self) -> Result<Vec<u8>, bincode::Error> {
        bincode::serialize(self)
    }

    pub fn deserialize(data: &[u8]) -> Result<Self, bincode::Error> {
        bincode::deserialize(data)
    }

    /// Short label used in logs.
    pub fn label(&self) -> &'static str {
        match self {
            Self::StatsChanged(_) => "stats_changed",
            Self::StatLeveledUp { .. } => "stat_leveled_up",
            Self::InventoryChanged(_) => "inventory_changed",
            Self::EquipmentChanged(_) => "equipment_changed",
            Self::DialogueOpened { .. } => "dialogue_opened",
            Self::DialogueClosed { .. } => "dialogue_closed",
            Self::PrimaryActionUsed { .. } => "primary_action_used",
            Self::OffHandActionUsed { .. } => "off_hand_action_used",
            Self::DamageDealt { .. } => "damage_dealt",
            Self::TreeChopped { .. } => "tree_chopped",
            Self::EntityDefeated { .. } => "entity_defeated",
            Self::EntityRemoved { .. } => "entity_removed",
            Self::LootDropped { .. } => "loot_dropped",
            Self::LootCollected { .. } => "loot_collected",
            Self::PlayerDied => "player_died",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_wire_format() {
        let request = PlayerRequest::EquipArmor {
            item_id: "leather_coif".into(),
            inventory_index: 3,
            slot: ArmorSlot::Head,
        };
        let bytes = request.serialize().unwrap();
        assert_eq!(PlayerRequest::deserialize(&bytes).unwrap(), request);
    }

    #[test]
    fn test_truncated_event_is_rejected() {
        let event = GameEvent::DialogueOpened {
            npc_id: 7,
            speaker: "Alden".into(),
            lines: vec!["".into(), "Hello there.".into()],
        };
        let bytes = event.serialize().unwrap();
        assert!(GameEvent::deserialize(&bytes[..bytes.len() / 2]).is_err());
    }
}
