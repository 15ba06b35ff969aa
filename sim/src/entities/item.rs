//! Loot lying on the ground.

use rpg_shared::{EntityId, LootKind};

use crate::physics::{Circle, Vec2};

/// Pickup radius of a gold drop
pub const GOLD_DROP_RADIUS: f32 = 6.0;

/// Pickup radius of an item drop
pub const ITEM_DROP_RADIUS: f32 = 25.6;

/// A drop that the player collects by walking over it
#[derive(Debug, Clone, PartialEq)]
pub struct LootDrop {
    pub id: EntityId,
    pub kind: LootKind,
    /// Gold amount or item quantity
    pub value: u32,
    pub position: Vec2,
}

impl LootDrop {
    pub fn radius(&self) -> f32 {
        match self.kind {
            LootKind::Gold => GOLD_DROP_RADIUS,
            LootKind::Item(_) => ITEM_DROP_RADIUS,
        }
    }

    pub fn body(&self) -> Circle {
        Circle::at(self.position, self.radius())
    }
}
