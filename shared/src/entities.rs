//! Shared entity definitions.

use serde::{Deserialize, Serialize};

/// Unique id of any simulated entity (characters, trees, loot drops)
pub type EntityId = u64;

/// What kind of character an entity is
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CharacterKind {
    Player,
    Bandit,
    Villager,
    Tree,
}

impl CharacterKind {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Player => "player",
            Self::Bandit => "bandit",
            Self::Villager => "villager",
            Self::Tree => "tree",
        }
    }

    pub fn is_npc(&self) -> bool {
        matches!(self, Self::Bandit | Self::Villager)
    }
}

/// NPC behaviour state
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum AiState {
    #[default]
    Idle,
    Moving,
    Chasing,
    Attacking,
    Dialoguing,
}

/// Contents of a loot drop lying in the world
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum LootKind {
    Gold,
    Item(String),
}
