use std::collections::HashMap;
use super::definition::ItemDefinition;
use super::properties::*;

/// Read-only item lookup used by the inventory engine
///
/// The engine never mutates the catalog; it only asks for definitions.
pub trait ItemCatalog {
    /// Gets an item definition by ID
    fn get_item(&self, item_id: &str) -> Option<&ItemDefinition>;

    /// Returns false while the item database has not been populated
    fn is_loaded(&self) -> bool;
}

/// Central registry of all item definitions
///
/// This is the single source of truth for what items exist in the game.
/// All item references (in inventories, saves) use IDs that
/// look up definitions in this registry.
#[derive(Debug, Clone, Default)]
pub struct ItemRegistry {
    items: HashMap<String, ItemDefinition>,
}

impl ItemRegistry {
    /// Creates a new empty registry
    pub fn new() -> Self {
        ItemRegistry {
            items: HashMap::new(),
        }
    }

    /// Creates a registry with all base game items pre-registered
    pub fn create_default() -> Self {
        let mut registry = Self::new();
        registry.register_base_items();
        registry
    }

    /// Registers a new item definition
    ///
    /// Returns error if the ID is empty or already registered.
    pub fn register(&mut self, item: ItemDefinition) -> Result<(), String> {
        if item.id.is_empty() {
            return Err("Item id must not be empty".to_string());
        }
        if self.items.contains_key(&item.id) {
            return Err(format!("Item '{}' already registered", item.id));
        }

        self.items.insert(item.id.clone(), item);
        Ok(())
    }

    /// Gets an item definition by ID
    pub fn get(&self, id: &str) -> Option<&ItemDefinition> {
        self.items.get(id)
    }

    /// Returns true if an item with this ID exists
    pub fn exists(&self, id: &str) -> bool {
        self.items.contains_key(id)
    }

    /// Number of registered definitions
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Returns true if nothing is registered
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    // ======================================================================
    // Item Registration - Base Game Items
    // ======================================================================

    fn register_base_items(&mut self) {
        let base_items = [
            ItemDefinition::stackable(
                "potion",
                "Health Potion",
                10,
                ItemProperties::Consumable { effect: ConsumableEffect::Heal(50) },
            )
            .with_description("Restores 50 health when consumed."),
            ItemDefinition::stackable(
                "ether",
                "Ether",
                10,
                ItemProperties::Consumable { effect: ConsumableEffect::RestoreMana(30) },
            )
            .with_description("Restores 30 mana when consumed."),
            ItemDefinition::stackable("herb", "Herb", 99, ItemProperties::Material)
                .with_description("A common crafting herb."),
            ItemDefinition::single(
                "sword",
                "Iron Sword",
                ItemProperties::Equipment { slot: EquipmentSlot::MainHand },
            ),
            ItemDefinition::single(
                "shield",
                "Wooden Shield",
                ItemProperties::Equipment { slot: EquipmentSlot::OffHand },
            ),
            ItemDefinition::single(
                "helmet",
                "Leather Cap",
                ItemProperties::Equipment { slot: EquipmentSlot::Head },
            ),
            ItemDefinition::single("old_key", "Old Key", ItemProperties::Quest)
                .with_description("Opens the cellar door."),
        ];

        for item in base_items {
            let id = item.id.clone();
            if let Err(e) = self.register(item) {
                log::warn!("Skipping base item '{}': {}", id, e);
            }
        }
    }
}

impl ItemCatalog for ItemRegistry {
    fn get_item(&self, item_id: &str) -> Option<&ItemDefinition> {
        self.get(item_id)
    }

    fn is_loaded(&self) -> bool {
        !self.items.is_empty()
    }
}
