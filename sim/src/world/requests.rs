//! Menu and dialogue requests from the presentation layer.

use log::{debug, warn};
use rpg_shared::{ArmorSlot, HandSlot, ItemInstance, PlayerRequest, INVENTORY_SIZE};

use super::GameWorld;
use crate::entities::PlayerState;
use crate::error::RequestError;

impl GameWorld {
    /// Apply a request. Rejections are logged and leave the world unchanged.
    pub fn handle_request(&mut self, request: PlayerRequest) -> Result<(), RequestError> {
        let result = self.apply_request(request);
        match &result {
            Err(RequestError::InventoryFull) => debug!("Request rejected: inventory is full"),
            Err(e) => warn!("Request rejected: {}", e),
            Ok(()) => {}
        }
        self.events.flush();
        result
    }

    fn apply_request(&mut self, request: PlayerRequest) -> Result<(), RequestError> {
        match request {
            PlayerRequest::EquipItem { item_id, slot } => self.equip_item(&item_id, slot),
            PlayerRequest::EquipArmor { item_id, inventory_index, slot } => {
                self.equip_armor(&item_id, inventory_index, slot)
            }
            PlayerRequest::UnequipArmor { slot } => self.unequip_armor(slot),
            PlayerRequest::CompleteDialogue => {
                self.close_dialogue();
                Ok(())
            }
            PlayerRequest::RequestStats => {
                self.emit_stats();
                Ok(())
            }
            PlayerRequest::RequestInventory => {
                self.emit_inventory();
                Ok(())
            }
            PlayerRequest::RequestEquipment => {
                self.emit_equipment();
                Ok(())
            }
        }
    }

    fn player_state_mut(&mut self) -> Result<&mut PlayerState, RequestError> {
        self.characters
            .get_mut(&self.player_id)
            .and_then(|player| player.player_mut())
            .ok_or(RequestError::NoPlayer)
    }

    /// Hold a copy of a catalog item in one hand.
    fn equip_item(&mut self, item_id: &str, slot: HandSlot) -> Result<(), RequestError> {
        let def = self
            .catalog
            .get(item_id)
            .cloned()
            .ok_or_else(|| RequestError::UnknownItem(item_id.to_string()))?;
        if !def.fits_hand(slot) {
            return Err(RequestError::WrongHand { item_id: item_id.to_string(), slot });
        }

        let state = self.player_state_mut()?;
        state.equipment.set_hand(slot, Some(ItemInstance::new(def, 1)));
        debug!("Equipped {} in the {} hand", item_id, slot.name());
        self.emit_equipment();
        Ok(())
    }

    /// Move armor from an inventory slot onto the body, swapping the old piece back.
    fn equip_armor(&mut self, item_id: &str, index: usize, slot: ArmorSlot) -> Result<(), RequestError> {
        if self.catalog.get(item_id).is_none() {
            return Err(RequestError::UnknownItem(item_id.to_string()));
        }
        if index >= INVENTORY_SIZE {
            return Err(RequestError::InvalidInventoryIndex(index));
        }

        let state = self.player_state_mut()?;
        let item = state
            .inventory
            .get(index)
            .filter(|item| item.id() == item_id)
            .ok_or_else(|| RequestError::ItemMismatch { index, item_id: item_id.to_string() })?;
        if item.def.armor_slot != Some(slot) {
            return Err(RequestError::WrongArmorSlot { item_id: item_id.to_string(), slot });
        }

        let item = state.inventory.replace(index, None);
        let previous = state.equipment.armor.replace(slot, item);
        state.inventory.replace(index, previous);
        debug!("Equipped {} on {}", item_id, slot.name());

        self.emit_inventory();
        self.emit_equipment();
        Ok(())
    }

    /// Move equipped armor into the first free inventory slot.
    fn unequip_armor(&mut self, slot: ArmorSlot) -> Result<(), RequestError> {
        let state = self.player_state_mut()?;
        if state.equipment.armor.get(slot).is_none() {
            return Err(RequestError::NothingEquipped(slot));
        }
        let index = state.inventory.first_empty().ok_or(RequestError::InventoryFull)?;

        let item = state.equipment.armor.take(slot);
        state.inventory.replace(index, item);
        debug!("Unequipped {} into slot {}", slot.name(), index);

        self.emit_inventory();
        self.emit_equipment();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::EventLog;
    use crate::physics::{Bounds, Vec2};
    use crate::world::Layout;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use rpg_shared::{DifficultySettings, GameEvent};

    fn sandbox() -> GameWorld {
        let layout = Layout::empty(Bounds::new(2000.0, 2000.0), Vec2::new(1000.0, 1000.0));
        GameWorld::from_layout(&layout, DifficultySettings::default(), StdRng::seed_from_u64(4)).unwrap()
    }

    fn equip_armor(item_id: &str, inventory_index: usize, slot: ArmorSlot) -> PlayerRequest {
        PlayerRequest::EquipArmor { item_id: item_id.into(), inventory_index, slot }
    }

    #[test]
    fn test_equip_item_checks_hand() {
        let mut world = sandbox();
        let result = world.handle_request(PlayerRequest::EquipItem {
            item_id: "crude_shield".into(),
            slot: HandSlot::Primary,
        });
        assert!(matches!(result, Err(RequestError::WrongHand { .. })));

        world
            .handle_request(PlayerRequest::EquipItem { item_id: "iron_axe".into(), slot: HandSlot::Primary })
            .unwrap();
        let state = world.player().unwrap().player().unwrap();
        assert_eq!(state.equipment.primary.as_ref().unwrap().id(), "iron_axe");
        // A copy is equipped; the inventory keeps its axe
        assert_eq!(state.inventory.get(1).unwrap().id(), "iron_axe");
    }

    #[test]
    fn test_unknown_item_rejected() {
        let mut world = sandbox();
        let result = world.handle_request(PlayerRequest::EquipItem {
            item_id: "mithril_sword".into(),
            slot: HandSlot::Primary,
        });
        assert_eq!(result, Err(RequestError::UnknownItem("mithril_sword".into())));
    }

    #[test]
    fn test_equip_armor_swaps_with_inventory() {
        let mut world = sandbox();
        world.handle_request(equip_armor("leather_coif", 4, ArmorSlot::Head)).unwrap();
        assert_eq!(world.equipped_armor(ArmorSlot::Head).unwrap().id(), "leather_coif");
        assert!(world.player().unwrap().player().unwrap().inventory.get(4).is_none());

        let coif = world.catalog().get("leather_coif").unwrap().clone();
        world.player_mut().unwrap().player_mut().unwrap().inventory.replace(9, Some(ItemInstance::new(coif, 1)));
        world.handle_request(equip_armor("leather_coif", 9, ArmorSlot::Head)).unwrap();
        // The previously worn coif went back into slot 9
        assert_eq!(world.player().unwrap().player().unwrap().inventory.get(9).unwrap().id(), "leather_coif");
    }

    #[test]
    fn test_equip_armor_validation() {
        let mut world = sandbox();
        assert_eq!(
            world.handle_request(equip_armor("leather_coif", 40, ArmorSlot::Head)),
            Err(RequestError::InvalidInventoryIndex(40))
        );
        assert!(matches!(
            world.handle_request(equip_armor("leather_coif", 5, ArmorSlot::Head)),
            Err(RequestError::ItemMismatch { index: 5, .. })
        ));
        assert!(matches!(
            world.handle_request(equip_armor("leather_tunic", 5, ArmorSlot::Head)),
            Err(RequestError::WrongArmorSlot { .. })
        ));
        assert!(world.equipped_armor(ArmorSlot::Head).is_none());
    }

    #[test]
    fn test_unequip_armor() {
        let mut world = sandbox();
        assert_eq!(
            world.handle_request(PlayerRequest::UnequipArmor { slot: ArmorSlot::Feet }),
            Err(RequestError::NothingEquipped(ArmorSlot::Feet))
        );

        world.handle_request(equip_armor("leather_tunic", 5, ArmorSlot::UpperBody)).unwrap();
        world.handle_request(PlayerRequest::UnequipArmor { slot: ArmorSlot::UpperBody }).unwrap();
        assert!(world.equipped_armor(ArmorSlot::UpperBody).is_none());
        assert_eq!(world.player().unwrap().player().unwrap().inventory.get(5).unwrap().id(), "leather_tunic");
    }

    #[test]
    fn test_unequip_into_full_inventory_fails() {
        let mut world = sandbox();
        world.handle_request(equip_armor("leather_pants", 6, ArmorSlot::LowerBody)).unwrap();
        let sword = world.catalog().get("iron_sword").unwrap().clone();
        let inventory = &mut world.player_mut().unwrap().player_mut().unwrap().inventory;
        while inventory.first_empty().is_some() {
            inventory.add(&sword, 1);
        }

        assert_eq!(
            world.handle_request(PlayerRequest::UnequipArmor { slot: ArmorSlot::LowerBody }),
            Err(RequestError::InventoryFull)
        );
        assert!(world.equipped_armor(ArmorSlot::LowerBody).is_some());
    }

    #[test]
    fn test_snapshot_requests() {
        let mut world = sandbox();
        let log = EventLog::new();
        world.subscribe(log.clone());

        world.handle_request(PlayerRequest::RequestStats).unwrap();
        world.handle_request(PlayerRequest::RequestInventory).unwrap();
        world.handle_request(PlayerRequest::RequestEquipment).unwrap();

        let events = log.events();
        assert!(matches!(&events[0], GameEvent::StatsChanged(s) if s.health == 55 && s.gold == 0));
        assert!(matches!(&events[1], GameEvent::InventoryChanged(slots) if slots.len() == INVENTORY_SIZE));
        assert!(matches!(&events[2], GameEvent::EquipmentChanged(e) if e.primary.is_some()));
    }
}
