use serde::{Serialize, Deserialize};

/// Different categories of items with type-specific data
///
/// The inventory engine only looks at `Equipment` (to know which slot an
/// item occupies); the rest is carried for the shell's benefit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ItemProperties {
    /// Basic material (no special properties)
    Material,

    /// Consumable item (potions, food)
    Consumable {
        effect: ConsumableEffect,
    },

    /// Equipment item, worn in a specific slot
    Equipment {
        slot: EquipmentSlot,
    },

    /// Quest item, usually granted with `throw_if_failed`
    Quest,
}

impl ItemProperties {
    /// Returns the equipment slot for equippable items
    pub fn equipment_slot(&self) -> Option<EquipmentSlot> {
        match self {
            ItemProperties::Equipment { slot } => Some(*slot),
            _ => None,
        }
    }
}

/// Effects for consumable items
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ConsumableEffect {
    /// Restore health
    Heal(u32),

    /// Restore mana
    RestoreMana(u32),

    /// Custom effect (for special items)
    Custom(String),  // Effect ID to look up
}

/// Equipment slots for items
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EquipmentSlot {
    Head,
    Chest,
    Legs,
    Feet,
    MainHand,   // Weapon
    OffHand,    // Shield
    Accessory1,
    Accessory2,
}
