//! Item definitions, equipment layout and the built-in item catalog.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Item types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ItemType {
    Weapon,
    Tool,
    Shield,
    Armor,
    Resource,
    Consumable,
}

/// Which hand slot(s) an item may occupy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Hand {
    Primary,
    OffHand,
    Any,
}

/// A concrete hand slot on a character
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HandSlot {
    Primary,
    OffHand,
}

impl HandSlot {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Primary => "primary",
            Self::OffHand => "offHand",
        }
    }
}

/// Kind of tool; only axes exist today
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ToolType {
    Axe,
}

/// Armor slots, in display order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ArmorSlot {
    Head,
    UpperBody,
    LowerBody,
    Feet,
    Hands,
    Accessory,
}

impl ArmorSlot {
    pub const ALL: [ArmorSlot; 6] = [
        ArmorSlot::Head,
        ArmorSlot::UpperBody,
        ArmorSlot::LowerBody,
        ArmorSlot::Feet,
        ArmorSlot::Hands,
        ArmorSlot::Accessory,
    ];

    pub fn index(&self) -> usize {
        *self as usize
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Head => "head",
            Self::UpperBody => "upperBody",
            Self::LowerBody => "lowerBody",
            Self::Feet => "feet",
            Self::Hands => "hands",
            Self::Accessory => "accessory",
        }
    }
}

/// Offensive stats for weapons and tools
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CombatStats {
    pub damage: u32,
    pub range: f32,
    pub cooldown_ms: u64,
    /// Displacement applied to a damaged target, in world units
    pub knockback: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ToolStats {
    pub tool_type: ToolType,
    pub tool_power: u32,
}

/// Shield timing
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BlockStats {
    pub block_duration_ms: u64,
    pub cooldown_ms: u64,
}

/// Item definition
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemDef {
    pub id: String,
    pub name: String,
    pub item_type: ItemType,
    pub hand: Option<Hand>,
    pub combat: Option<CombatStats>,
    pub tool: Option<ToolStats>,
    pub block: Option<BlockStats>,
    pub armor_slot: Option<ArmorSlot>,
    /// Defense granted while equipped (shields, armor)
    pub defense_bonus: u32,
    /// 1 for items that never stack
    pub max_stack: u32,
    pub heal_amount: u32,
}

impl ItemDef {
    fn base(id: &str, name: &str, item_type: ItemType) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            item_type,
            hand: None,
            combat: None,
            tool: None,
            block: None,
            armor_slot: None,
            defense_bonus: 0,
            max_stack: 1,
            heal_amount: 0,
        }
    }

    pub fn is_stackable(&self) -> bool {
        self.max_stack > 1
    }

    /// Whether the item may be held in the given hand slot.
    pub fn fits_hand(&self, slot: HandSlot) -> bool {
        match (self.hand, slot) {
            (Some(Hand::Any), _) => true,
            (Some(Hand::Primary), HandSlot::Primary) => true,
            (Some(Hand::OffHand), HandSlot::OffHand) => true,
            _ => false,
        }
    }

    pub fn is_axe(&self) -> bool {
        self.item_type == ItemType::Tool
            && matches!(self.tool, Some(ToolStats { tool_type: ToolType::Axe, .. }))
    }

    /// Weapons and tools can strike characters.
    pub fn can_strike(&self) -> bool {
        matches!(self.item_type, ItemType::Weapon | ItemType::Tool)
    }
}

/// A stack of items in an inventory or equipment slot
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemInstance {
    pub def: ItemDef,
    pub quantity: u32,
}

impl ItemInstance {
    pub fn new(def: ItemDef, quantity: u32) -> Self {
        Self { def, quantity }
    }

    pub fn id(&self) -> &str {
        &self.def.id
    }
}

/// Equipped armor, one optional item per slot
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ArmorSet {
    slots: [Option<ItemInstance>; 6],
}

impl ArmorSet {
    pub fn get(&self, slot: ArmorSlot) -> Option<&ItemInstance> {
        self.slots[slot.index()].as_ref()
    }

    /// Puts `item` in `slot`, returning whatever was there.
    pub fn replace(&mut self, slot: ArmorSlot, item: Option<ItemInstance>) -> Option<ItemInstance> {
        std::mem::replace(&mut self.slots[slot.index()], item)
    }

    pub fn take(&mut self, slot: ArmorSlot) -> Option<ItemInstance> {
        self.slots[slot.index()].take()
    }

    pub fn iter(&self) -> impl Iterator<Item = (ArmorSlot, &ItemInstance)> {
        ArmorSlot::ALL
            .iter()
            .filter_map(move |slot| self.get(*slot).map(|item| (*slot, item)))
    }
}

/// Everything a character holds or wears
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Equipment {
    pub primary: Option<ItemInstance>,
    pub off_hand: Option<ItemInstance>,
    pub armor: ArmorSet,
}

impl Equipment {
    pub fn hand(&self, slot: HandSlot) -> Option<&ItemInstance> {
        match slot {
            HandSlot::Primary => self.primary.as_ref(),
            HandSlot::OffHand => self.off_hand.as_ref(),
        }
    }

    pub fn set_hand(&mut self, slot: HandSlot, item: Option<ItemInstance>) -> Option<ItemInstance> {
        let target = match slot {
            HandSlot::Primary => &mut self.primary,
            HandSlot::OffHand => &mut self.off_hand,
        };
        std::mem::replace(target, item)
    }
}

/// Built-in item definitions
pub fn get_item_definitions() -> Vec<ItemDef> {
    let armor = |id: &str, name: &str, slot: ArmorSlot, defense: u32| ItemDef {
        armor_slot: Some(slot),
        defense_bonus: defense,
        ..ItemDef::base(id, name, ItemType::Armor)
    };

    vec![
        ItemDef {
            hand: Some(Hand::Primary),
            combat: Some(CombatStats { damage: 15, range: 80.0, cooldown_ms: 500, knockback: 8.0 }),
            ..ItemDef::base("iron_sword", "Iron Sword", ItemType::Weapon)
        },
        ItemDef {
            hand: Some(Hand::Primary),
            combat: Some(CombatStats { damage: 5, range: 75.0, cooldown_ms: 700, knockback: 10.0 }),
            tool: Some(ToolStats { tool_type: ToolType::Axe, tool_power: 10 }),
            ..ItemDef::base("iron_axe", "Iron Axe", ItemType::Tool)
        },
        ItemDef {
            hand: Some(Hand::Primary),
            combat: Some(CombatStats { damage: 12, range: 110.0, cooldown_ms: 600, knockback: 6.0 }),
            ..ItemDef::base("iron_spear", "Iron Spear", ItemType::Weapon)
        },
        ItemDef {
            max_stack: 50,
            ..ItemDef::base("log", "Log", ItemType::Resource)
        },
        ItemDef {
            max_stack: 10,
            heal_amount: 50,
            ..ItemDef::base("health_potion", "Health Potion", ItemType::Consumable)
        },
        ItemDef {
            hand: Some(Hand::OffHand),
            block: Some(BlockStats { block_duration_ms: 800, cooldown_ms: 2000 }),
            defense_bonus: 3,
            ..ItemDef::base("crude_shield", "Crude Shield", ItemType::Shield)
        },
        armor("leather_coif", "Leather Coif", ArmorSlot::Head, 1),
        armor("leather_tunic", "Leather Tunic", ArmorSlot::UpperBody, 2),
        armor("leather_pants", "Leather Pants", ArmorSlot::LowerBody, 1),
        armor("leather_boots", "Leather Boots", ArmorSlot::Feet, 1),
        armor("leather_gloves", "Leather Gloves", ArmorSlot::Hands, 1),
        armor("basic_amulet", "Basic Amulet", ArmorSlot::Accessory, 0),
    ]
}

/// Lookup table over item definitions, keyed by id
#[derive(Debug, Clone)]
pub struct ItemCatalog {
    items: HashMap<String, ItemDef>,
}

impl ItemCatalog {
    pub fn from_definitions(defs: Vec<ItemDef>) -> Self {
        let items = defs.into_iter().map(|def| (def.id.clone(), def)).collect();
        Self { items }
    }

    pub fn builtin() -> Self {
        Self::from_definitions(get_item_definitions())
    }

    pub fn get(&self, id: &str) -> Option<&ItemDef> {
        self.items.get(id)
    }

    /// Creates an instance of `id`, or `None` if the id is unknown.
    pub fn instance(&self, id: &str, quantity: u32) -> Option<ItemInstance> {
        self.get(id).map(|def| ItemInstance::new(def.clone(), quantity))
    }
}

impl Default for ItemCatalog {
    fn default() -> Self {
        Self::builtin()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_catalog_lookup() {
        let catalog = ItemCatalog::builtin();
        assert_eq!(get_item_definitions().len(), 12);
        assert!(get_item_definitions().iter().all(|def| catalog.get(&def.id).is_some()));

        let sword = catalog.get("iron_sword").unwrap();
        assert_eq!(sword.combat.unwrap().damage, 15);
        assert!(!sword.is_stackable());

        let logs = catalog.get("log").unwrap();
        assert_eq!(logs.max_stack, 50);
        assert!(catalog.get("mithril_sword").is_none());
    }

    #[test]
    fn test_hand_compatibility() {
        let catalog = ItemCatalog::builtin();
        let shield = catalog.get("crude_shield").unwrap();
        assert!(shield.fits_hand(HandSlot::OffHand));
        assert!(!shield.fits_hand(HandSlot::Primary));

        let potion = catalog.get("health_potion").unwrap();
        assert!(!potion.fits_hand(HandSlot::Primary));
        assert!(catalog.get("iron_axe").unwrap().is_axe());
    }

    #[test]
    fn test_armor_set_replace_returns_previous() {
        let catalog = ItemCatalog::builtin();
        let mut armor = ArmorSet::default();
        let coif = catalog.instance("leather_coif", 1).unwrap();

        assert!(armor.replace(ArmorSlot::Head, Some(coif.clone())).is_none());
        assert_eq!(armor.replace(ArmorSlot::Head, None), Some(coif));
        assert_eq!(armor.iter().count(), 0);
    }
}
