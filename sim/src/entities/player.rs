//! Player-only state: inventory, gold, equipment and guard.

use rpg_shared::{Equipment, ItemDef, ItemInstance, INVENTORY_SIZE};

/// Fixed-size grid of item stacks
#[derive(Debug, Clone, PartialEq)]
pub struct Inventory {
    slots: Vec<Option<ItemInstance>>,
}

impl Inventory {
    pub fn new() -> Self {
        Self { slots: vec![None; INVENTORY_SIZE] }
    }

    pub fn slots(&self) -> &[Option<ItemInstance>] {
        &self.slots
    }

    pub fn get(&self, index: usize) -> Option<&ItemInstance> {
        self.slots.get(index).and_then(|slot| slot.as_ref())
    }

    /// Put `item` at `index`, returning what was there. Out-of-range indices are ignored.
    pub fn replace(&mut self, index: usize, item: Option<ItemInstance>) -> Option<ItemInstance> {
        let slot = self.slots.get_mut(index)?;
        std::mem::replace(slot, item)
    }

    pub fn first_empty(&self) -> Option<usize> {
        self.slots.iter().position(|slot| slot.is_none())
    }

    /// Index of the first stack matching `predicate`.
    pub fn position(&self, predicate: impl Fn(&ItemInstance) -> bool) -> Option<usize> {
        self.slots.iter().position(|slot| slot.as_ref().is_some_and(&predicate))
    }

    /// Add items, topping up existing stacks first and then filling empty slots.
    /// Returns the quantity that did not fit.
    pub fn add(&mut self, def: &ItemDef, quantity: u32) -> u32 {
        let max_stack = def.max_stack.max(1);
        let mut remaining = quantity;

        // Top up partial stacks of the same item
        if def.is_stackable() {
            for item in self.slots.iter_mut().flatten() {
                if remaining == 0 {
                    break;
                }
                if item.def.id == def.id && item.quantity < max_stack {
                    let can_add = (max_stack - item.quantity).min(remaining);
                    item.quantity += can_add;
                    remaining -= can_add;
                }
            }
        }

        // Spill what is left into empty slots
        for slot in &mut self.slots {
            if remaining == 0 {
                break;
            }
            if slot.is_none() {
                let add_amount = remaining.min(max_stack);
                *slot = Some(ItemInstance::new(def.clone(), add_amount));
                remaining -= add_amount;
            }
        }

        remaining
    }

    /// Remove one item from the stack at `index`, clearing the slot when it empties.
    pub fn consume_one(&mut self, index: usize) -> Option<ItemDef> {
        let slot = self.slots.get_mut(index)?;
        let item = slot.as_mut()?;
        let def = item.def.clone();
        item.quantity = item.quantity.saturating_sub(1);
        if item.quantity == 0 {
            *slot = None;
        }
        Some(def)
    }
}

impl Default for Inventory {
    fn default() -> Self {
        Self::new()
    }
}

/// A raised shield
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Guard {
    pub raised: bool,
    pub ends_at: u64,
    /// Angle (radians) the guard faces
    pub direction: f32,
}

impl Guard {
    /// Whether the guard still protects at `now`.
    pub fn is_up(&self, now: u64) -> bool {
        self.raised && now < self.ends_at
    }
}

/// State only the player carries
#[derive(Debug, Clone, Default)]
pub struct PlayerState {
    pub inventory: Inventory,
    pub gold: u64,
    pub equipment: Equipment,
    pub guard: Guard,
    pub last_primary_at: Option<u64>,
    pub last_off_hand_at: Option<u64>,
}

impl PlayerState {
    /// Whether an action with `cooldown_ms` last used at `last` may fire at `now`.
    pub fn ready(last: Option<u64>, cooldown_ms: u64, now: u64) -> bool {
        last.map_or(true, |at| now >= at + cooldown_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rpg_shared::ItemCatalog;

    #[test]
    fn test_stacking_fills_existing_stack_first() {
        let catalog = ItemCatalog::builtin();
        let logs = catalog.get("log").unwrap();
        let mut inventory = Inventory::new();

        assert_eq!(inventory.add(logs, 3), 0);
        assert_eq!(inventory.add(logs, 2), 0);
        assert_eq!(inventory.get(0).unwrap().quantity, 5);
        assert!(inventory.get(1).is_none());
    }

    #[test]
    fn test_full_stack_spills_into_next_slot() {
        let catalog = ItemCatalog::builtin();
        let logs = catalog.get("log").unwrap();
        let mut inventory = Inventory::new();

        assert_eq!(inventory.add(logs, 49), 0);
        assert_eq!(inventory.add(logs, 3), 0);
        assert_eq!(inventory.get(0).unwrap().quantity, 50);
        assert_eq!(inventory.get(1).unwrap().quantity, 2);
    }

    #[test]
    fn test_non_stackable_items_take_own_slots() {
        let catalog = ItemCatalog::builtin();
        let sword = catalog.get("iron_sword").unwrap();
        let mut inventory = Inventory::new();

        inventory.add(sword, 1);
        inventory.add(sword, 1);
        assert_eq!(inventory.get(0).unwrap().quantity, 1);
        assert_eq!(inventory.get(1).unwrap().quantity, 1);
    }

    #[test]
    fn test_full_inventory_rejects() {
        let catalog = ItemCatalog::builtin();
        let sword = catalog.get("iron_sword").unwrap();
        let potion = catalog.get("health_potion").unwrap();
        let mut inventory = Inventory::new();
        for _ in 0..INVENTORY_SIZE {
            assert_eq!(inventory.add(sword, 1), 0);
        }

        assert_eq!(inventory.add(potion, 1), 1);
        assert!(inventory.first_empty().is_none());
    }

    #[test]
    fn test_consume_one_clears_empty_stack() {
        let catalog = ItemCatalog::builtin();
        let potion = catalog.get("health_potion").unwrap();
        let mut inventory = Inventory::new();
        inventory.add(potion, 2);

        assert!(inventory.consume_one(0).is_some());
        assert_eq!(inventory.get(0).unwrap().quantity, 1);
        assert!(inventory.consume_one(0).is_some());
        assert!(inventory.get(0).is_none());
        assert!(inventory.consume_one(0).is_none());
    }

    #[test]
    fn test_cooldown_ready() {
        assert!(PlayerState::ready(None, 500, 0));
        assert!(!PlayerState::ready(Some(1000), 500, 1499));
        assert!(PlayerState::ready(Some(1000), 500, 1500));
    }
}
