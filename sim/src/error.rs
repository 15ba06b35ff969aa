//! Error types.

use rpg_shared::{ArmorSlot, HandSlot};
use thiserror::Error;

/// Failures while setting up a simulation
#[derive(Debug, Error)]
pub enum SimError {
    #[error("failed to read config {path}: {source}")]
    ConfigRead {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config {path}: {source}")]
    ConfigParse {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("could not create the player at ({x}, {y})")]
    PlayerSpawn { x: f32, y: f32 },

    #[error("invalid world size {width}x{height}")]
    InvalidWorldSize { width: f32, height: f32 },
}

/// Reasons a player request was rejected
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RequestError {
    #[error("unknown item '{0}'")]
    UnknownItem(String),

    #[error("item '{item_id}' cannot be held in the {} hand", .slot.name())]
    WrongHand { item_id: String, slot: HandSlot },

    #[error("item '{item_id}' does not fit the {} slot", .slot.name())]
    WrongArmorSlot { item_id: String, slot: ArmorSlot },

    #[error("inventory index {0} is out of range")]
    InvalidInventoryIndex(usize),

    #[error("inventory slot {index} does not hold '{item_id}'")]
    ItemMismatch { index: usize, item_id: String },

    #[error("nothing equipped in the {} slot", .0.name())]
    NothingEquipped(ArmorSlot),

    #[error("inventory is full")]
    InventoryFull,

    #[error("there is no player")]
    NoPlayer,
}
