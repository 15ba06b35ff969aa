//! Simulated entities.

mod character;
mod factory;
mod item;
pub mod npc;
pub mod player;

pub use character::{
    max_health_for, tree_health_for, Character, Role, CHARACTER_RADIUS, TREE_ENDURANCE,
    TREE_TRUNK_RADIUS,
};
pub use factory::{CharacterFactory, PLAYER_SPEED, PLAYER_SLOW_SPEED};
pub use item::{LootDrop, GOLD_DROP_RADIUS, ITEM_DROP_RADIUS};
pub use npc::{BanditState, Brain, VillagerState};
pub use player::{Guard, Inventory, PlayerState};
