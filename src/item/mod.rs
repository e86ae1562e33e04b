// Item system module
//
// This module provides the item side of the inventory engine, including:
// - Item definitions and properties
// - Item catalog trait and the in-process registry
// - Item instances, their locations and handles

pub mod definition;
pub mod instance;
pub mod properties;
pub mod registry;

// Re-export main types for convenient access
pub use definition::ItemDefinition;
pub use instance::{InstanceId, ItemInstance, Location};
pub use properties::{ItemProperties, ConsumableEffect, EquipmentSlot};
pub use registry::{ItemCatalog, ItemRegistry};
