//! Load-time repair of inventory save records
//!
//! Migration is idempotent: running it on its own output changes nothing
//! and reports no corrections.

use super::types::{InventorySaveData, SavedLocation, CURRENT_SAVE_VERSION};
use crate::config::{DEFAULT_BAG_SLOTS, DEFAULT_STORAGE_SLOTS};

/// What migration had to fix, one line per correction
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MigrationReport {
    pub corrections: Vec<String>,
}

impl MigrationReport {
    /// Returns true if the record needed no repairs
    pub fn is_clean(&self) -> bool {
        self.corrections.is_empty()
    }

    pub(crate) fn correct(&mut self, message: String) {
        log::warn!("Save correction: {}", message);
        self.corrections.push(message);
    }
}

impl InventorySaveData {
    /// Repairs the record in place so it can be loaded
    ///
    /// # Rules
    /// - items with an empty id are dropped
    /// - a missing location comes from the version 1 flags
    /// - unknown locations become Storage
    /// - quantities of zero or less become 1
    /// - `previous_location` only survives on equipped items
    /// - zero (missing) capacities get the defaults
    pub fn migrate(&mut self) -> MigrationReport {
        let mut report = MigrationReport::default();

        let before = self.items.len();
        self.items.retain(|item| !item.item_id.is_empty());
        let dropped = before - self.items.len();
        if dropped > 0 {
            report.correct(format!("dropped {} item(s) with an empty id", dropped));
        }

        for (index, item) in self.items.iter_mut().enumerate() {
            let label = format!("item {} ({})", index, item.item_id);

            if item.location.is_none() {
                let derived = if item.is_in_pocket == Some(true) {
                    SavedLocation::Pocket
                } else if item.is_in_bag == Some(true) {
                    SavedLocation::Bag
                } else {
                    SavedLocation::Storage
                };
                item.location = Some(derived);
                report.correct(format!("{}: location set to {:?} from legacy flags", label, derived));
            }
            if item.is_in_bag.is_some() || item.is_in_pocket.is_some() {
                item.is_in_bag = None;
                item.is_in_pocket = None;
                report.correct(format!("{}: cleared legacy location flags", label));
            }

            if let Some(location @ (SavedLocation::Unknown | SavedLocation::None)) = item.location {
                item.location = Some(SavedLocation::Storage);
                report.correct(format!("{}: location {:?} moved to Storage", label, location));
            }

            if item.quantity <= 0 {
                report.correct(format!("{}: quantity {} corrected to 1", label, item.quantity));
                item.quantity = 1;
            }

            if let Some(previous) = item.previous_location {
                let equipped = item.location == Some(SavedLocation::Equipped);
                let valid_previous = matches!(
                    previous,
                    SavedLocation::Bag | SavedLocation::Storage | SavedLocation::Pocket
                );
                if !equipped || !valid_previous {
                    item.previous_location = None;
                    report.correct(format!("{}: cleared previous location {:?}", label, previous));
                }
            }
        }

        if self.max_bag_slots == 0 {
            self.max_bag_slots = DEFAULT_BAG_SLOTS as u32;
            report.correct(format!("bag capacity missing, using {}", DEFAULT_BAG_SLOTS));
        }
        if self.max_storage_slots == 0 {
            self.max_storage_slots = DEFAULT_STORAGE_SLOTS as u32;
            report.correct(format!("storage capacity missing, using {}", DEFAULT_STORAGE_SLOTS));
        }

        if self.version < CURRENT_SAVE_VERSION {
            log::debug!("Upgrading inventory save from version {} to {}", self.version, CURRENT_SAVE_VERSION);
            self.version = CURRENT_SAVE_VERSION;
        }

        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::save::ItemSaveData;

    fn item(item_id: &str, quantity: i64, location: Option<SavedLocation>) -> ItemSaveData {
        ItemSaveData {
            item_id: item_id.to_string(),
            quantity,
            location,
            previous_location: None,
            is_in_bag: None,
            is_in_pocket: None,
        }
    }

    fn malformed() -> InventorySaveData {
        let mut equipped = item("sword", 1, Some(SavedLocation::Equipped));
        equipped.previous_location = Some(SavedLocation::Unknown);
        let mut stale = item("shield", 1, Some(SavedLocation::Bag));
        stale.previous_location = Some(SavedLocation::Storage);

        InventorySaveData {
            version: 1,
            items: vec![
                item("potion", 0, Some(SavedLocation::Unknown)),
                item("", 4, Some(SavedLocation::Bag)),
                item("herb", -7, Some(SavedLocation::None)),
                equipped,
                stale,
            ],
            max_bag_slots: 0,
            max_storage_slots: 0,
        }
    }

    #[test]
    fn test_migration_fixes_malformed_record() {
        let mut data = malformed();
        let report = data.migrate();

        assert!(!report.is_clean());
        assert_eq!(data.version, CURRENT_SAVE_VERSION);
        assert_eq!(data.items.len(), 4);
        assert_eq!(data.items[0].location, Some(SavedLocation::Storage));
        assert_eq!(data.items[0].quantity, 1);
        assert_eq!(data.items[1].quantity, 1);
        assert_eq!(data.items[1].location, Some(SavedLocation::Storage));
        assert_eq!(data.items[2].previous_location, None);
        assert_eq!(data.items[3].previous_location, None);
        assert_eq!(data.max_bag_slots, 12);
        assert_eq!(data.max_storage_slots, 60);
    }

    #[test]
    fn test_migration_is_idempotent() {
        let mut once = malformed();
        once.migrate();
        let first = once.to_json_pretty().unwrap();

        let report = once.migrate();
        let second = once.to_json_pretty().unwrap();

        assert!(report.is_clean());
        assert_eq!(first, second);
    }

    #[test]
    fn test_legacy_flags_become_locations() {
        let json = r#"{
            "version": 1,
            "items": [
                { "item_id": "potion", "quantity": 3, "is_in_bag": true, "is_in_pocket": false },
                { "item_id": "ether", "quantity": 2, "is_in_bag": false, "is_in_pocket": true },
                { "item_id": "herb", "quantity": 9, "is_in_bag": false }
            ],
            "max_bag_slots": 12,
            "max_storage_slots": 60
        }"#;
        let mut data = InventorySaveData::from_json(json).unwrap();

        data.migrate();

        let locations: Vec<_> = data.items.iter().map(|i| i.location).collect();
        assert_eq!(
            locations,
            vec![Some(SavedLocation::Bag), Some(SavedLocation::Pocket), Some(SavedLocation::Storage)]
        );
        assert!(data.items.iter().all(|i| i.is_in_bag.is_none() && i.is_in_pocket.is_none()));
    }

    #[test]
    fn test_clean_record_has_no_corrections() {
        let mut data = InventorySaveData {
            items: vec![item("potion", 5, Some(SavedLocation::Bag))],
            ..InventorySaveData::default()
        };
        assert!(data.migrate().is_clean());
    }
}
