//! Save data types for the inventory
//!
//! This module defines the flat record the inventory produces and consumes.
//! It uses Serde for serialization/deserialization to JSON format; writing
//! the JSON to disk is the shell's job.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::item::Location;

/// Current save file version
///
/// Version 1 saves stored `is_in_bag`/`is_in_pocket` flags instead of a
/// location.
pub const CURRENT_SAVE_VERSION: u32 = 2;

/// Location as written in a save record
///
/// Any unrecognised name deserializes to `Unknown` so old or corrupted
/// saves still load; migration turns it into `Storage`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SavedLocation {
    Bag,
    Storage,
    Pocket,
    Equipped,
    None,
    #[serde(other)]
    Unknown,
}

impl SavedLocation {
    /// The runtime location, if this is a valid resting or equipped place
    pub fn to_location(self) -> Option<Location> {
        match self {
            SavedLocation::Bag => Some(Location::Bag),
            SavedLocation::Storage => Some(Location::Storage),
            SavedLocation::Pocket => Some(Location::Pocket),
            SavedLocation::Equipped => Some(Location::Equipped),
            SavedLocation::None | SavedLocation::Unknown => None,
        }
    }
}

impl From<Location> for SavedLocation {
    fn from(location: Location) -> Self {
        match location {
            Location::Bag => SavedLocation::Bag,
            Location::Storage => SavedLocation::Storage,
            Location::Pocket => SavedLocation::Pocket,
            Location::Equipped => SavedLocation::Equipped,
            Location::None => SavedLocation::None,
        }
    }
}

/// One item instance in a save record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemSaveData {
    pub item_id: String,

    /// Signed so corrupted negative values survive until migration fixes them
    pub quantity: i64,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<SavedLocation>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub previous_location: Option<SavedLocation>,

    /// Version 1 flag, replaced by `location`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_in_bag: Option<bool>,

    /// Version 1 flag, replaced by `location`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_in_pocket: Option<bool>,
}

/// The root inventory save structure
///
/// Capacities of 0 mean "missing" and are replaced by migration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InventorySaveData {
    #[serde(default = "legacy_version")]
    pub version: u32,

    #[serde(default)]
    pub items: Vec<ItemSaveData>,

    #[serde(default)]
    pub max_bag_slots: u32,

    #[serde(default)]
    pub max_storage_slots: u32,
}

fn legacy_version() -> u32 {
    1
}

impl Default for InventorySaveData {
    fn default() -> Self {
        InventorySaveData {
            version: CURRENT_SAVE_VERSION,
            items: Vec::new(),
            max_bag_slots: crate::config::DEFAULT_BAG_SLOTS as u32,
            max_storage_slots: crate::config::DEFAULT_STORAGE_SLOTS as u32,
        }
    }
}

impl InventorySaveData {
    /// Serialize to JSON (pretty format for readability/debugging)
    pub fn to_json_pretty(&self) -> Result<String, SaveError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Parses a record, rejecting saves from a newer game version
    pub fn from_json(json: &str) -> Result<Self, SaveError> {
        let data: InventorySaveData = serde_json::from_str(json)?;

        if data.version > CURRENT_SAVE_VERSION {
            return Err(SaveError::InvalidVersion(data.version));
        }

        Ok(data)
    }
}

/// Error types for save/load operations
#[derive(Debug, Error)]
pub enum SaveError {
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Invalid save version: {0}")]
    InvalidVersion(u32),
}
