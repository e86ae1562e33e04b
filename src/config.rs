//! Inventory configuration
//!
//! Holds the tunable values the engine needs at construction time. All
//! fields have defaults, so a partial JSON document is enough to override
//! a single value.

use serde::{Deserialize, Serialize};

/// Default number of bag slots for a new game (and for saves missing the field)
pub const DEFAULT_BAG_SLOTS: usize = 12;

/// Default number of storage slots for a new game (and for saves missing the field)
pub const DEFAULT_STORAGE_SLOTS: usize = 60;

/// Item ids with this prefix are skills, managed outside the inventory
pub const DEFAULT_SKILL_PREFIX: &str = "skill_";

/// Construction-time settings for an `InventoryCore`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct InventoryConfig {
    /// Bag slots for a fresh inventory
    pub default_bag_slots: usize,

    /// Storage slots for a fresh inventory
    pub default_storage_slots: usize,

    /// Reserved id prefix for skill/ability items
    pub skill_prefix: String,
}

impl InventoryConfig {
    /// Parses a config from JSON, filling missing fields with defaults
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

impl Default for InventoryConfig {
    fn default() -> Self {
        InventoryConfig {
            default_bag_slots: DEFAULT_BAG_SLOTS,
            default_storage_slots: DEFAULT_STORAGE_SLOTS,
            skill_prefix: DEFAULT_SKILL_PREFIX.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = InventoryConfig::default();
        assert_eq!(config.default_bag_slots, 12);
        assert_eq!(config.default_storage_slots, 60);
        assert_eq!(config.skill_prefix, "skill_");
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config = InventoryConfig::from_json(r#"{ "default_bag_slots": 20 }"#).unwrap();
        assert_eq!(config.default_bag_slots, 20);
        assert_eq!(config.default_storage_slots, DEFAULT_STORAGE_SLOTS);
        assert_eq!(config.skill_prefix, DEFAULT_SKILL_PREFIX);
    }

    #[test]
    fn test_invalid_json_is_an_error() {
        assert!(InventoryConfig::from_json("{ not json").is_err());
    }
}
