// Inventory engine module
//
// This module provides the storage engine for the player's items:
// - Capacity limits per location
// - Stack merge/split arithmetic
// - Read-only queries and validated moves
// - The orchestrating InventoryCore and its result types

pub mod capacity;
pub mod collection;
pub mod core;
pub mod error;
pub mod location;
pub mod query;
pub mod stacking;

// Re-export main types
pub use capacity::{CapacityEvent, CapacityManager};
pub use collection::ItemCollection;
pub use self::core::InventoryCore;
pub use error::{ErrorKind, InventoryError, InventoryOutcome, InventoryResult, InventoryResultExt};
pub use location::LocationService;
pub use query::QueryService;
pub use stacking::StackingService;
