//! Inventory storage engine for a turn-based RPG
//!
//! Tracks every item instance the player owns, where it lives (bag,
//! storage, pocket, equipped), how full each location is, and keeps stack
//! quantities conserved through every add, remove, move and merge.
//!
//! Everything is single-threaded and synchronous. Mutations return an
//! `InventoryResult` instead of panicking; callers branch on
//! `InventoryError::kind()`.
//!
//! # Example
//!
//! ```
//! use rpg_inventory::{InventoryCore, ItemRegistry, Location};
//!
//! let catalog = ItemRegistry::create_default();
//! let mut core = InventoryCore::default();
//!
//! let added = core.add_item("potion", 3, true, &catalog).unwrap();
//! let potion = added.item.unwrap();
//! core.move_to_storage(potion, 3, &catalog).unwrap();
//!
//! assert_eq!(core.query().item_count_in_location("potion", Location::Storage), 3);
//! ```

pub mod config;
pub mod equipment;
pub mod inventory;
pub mod item;
pub mod save;

pub use config::InventoryConfig;
pub use equipment::{EquipmentTracker, Loadout};
pub use inventory::{
    CapacityEvent, CapacityManager, ErrorKind, InventoryCore, InventoryError, InventoryOutcome,
    InventoryResult, InventoryResultExt,
};
pub use item::{
    EquipmentSlot, InstanceId, ItemCatalog, ItemDefinition, ItemInstance, ItemProperties, ItemRegistry,
    Location,
};
pub use save::{InventorySaveData, MigrationReport, SaveError};
