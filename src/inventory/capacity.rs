use crate::config::{InventoryConfig, DEFAULT_BAG_SLOTS, DEFAULT_STORAGE_SLOTS};
use crate::item::Location;

/// Capacity notifications, drained by the shell once per frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CapacityEvent {
    /// Slot limit of a location changed
    Changed {
        location: Location,
        old_slots: usize,
        new_slots: usize,
    },
}

/// Single source of truth for per-location slot limits
///
/// Only Bag and Storage are limited. Pocket and Equipped report zero and
/// are never checked by the engine.
#[derive(Debug, Clone)]
pub struct CapacityManager {
    max_bag_slots: usize,
    max_storage_slots: usize,
    events: Vec<CapacityEvent>,
}

impl CapacityManager {
    /// Creates a manager with explicit limits
    pub fn new(max_bag_slots: usize, max_storage_slots: usize) -> Self {
        CapacityManager {
            max_bag_slots,
            max_storage_slots,
            events: Vec::new(),
        }
    }

    /// Creates a manager with the configured starting limits
    pub fn from_config(config: &InventoryConfig) -> Self {
        Self::new(config.default_bag_slots, config.default_storage_slots)
    }

    pub fn max_bag_slots(&self) -> usize {
        self.max_bag_slots
    }

    pub fn max_storage_slots(&self) -> usize {
        self.max_storage_slots
    }

    /// Configured limit for a location (0 for unconstrained locations)
    pub fn get_max_slots(&self, location: Location) -> usize {
        match location {
            Location::Bag => self.max_bag_slots,
            Location::Storage => self.max_storage_slots,
            _ => 0,
        }
    }

    /// Returns true if one more instance fits
    pub fn has_space(&self, location: Location, current_count: usize) -> bool {
        current_count < self.get_max_slots(location)
    }

    pub fn get_empty_slots(&self, location: Location, current_count: usize) -> usize {
        self.get_max_slots(location).saturating_sub(current_count)
    }

    /// Returns true if `to_add` more instances fit
    pub fn can_add_items(&self, location: Location, current_count: usize, to_add: usize) -> bool {
        current_count + to_add <= self.get_max_slots(location)
    }

    /// How many of `to_add` instances would not fit
    pub fn get_overflow_amount(&self, location: Location, current_count: usize, to_add: usize) -> usize {
        (current_count + to_add).saturating_sub(self.get_max_slots(location))
    }

    /// Adds bag slots; non-positive deltas are ignored
    pub fn upgrade_bag(&mut self, additional_slots: i32) -> bool {
        self.upgrade(Location::Bag, additional_slots)
    }

    /// Adds storage slots; non-positive deltas are ignored
    pub fn upgrade_storage(&mut self, additional_slots: i32) -> bool {
        self.upgrade(Location::Storage, additional_slots)
    }

    fn upgrade(&mut self, location: Location, additional_slots: i32) -> bool {
        if additional_slots <= 0 {
            log::warn!(
                "Ignoring {} upgrade by {} slots (must be positive)",
                location, additional_slots
            );
            return false;
        }

        let old_slots = self.get_max_slots(location);
        let new_slots = old_slots + additional_slots as usize;
        self.set_slots(location, new_slots);
        log::info!("Upgraded {} capacity: {} -> {}", location, old_slots, new_slots);
        true
    }

    /// Bulk-set both limits (used when restoring a save)
    pub fn set_capacities(&mut self, max_bag_slots: usize, max_storage_slots: usize) {
        self.set_slots(Location::Bag, max_bag_slots);
        self.set_slots(Location::Storage, max_storage_slots);
    }

    fn set_slots(&mut self, location: Location, new_slots: usize) {
        let slot = match location {
            Location::Bag => &mut self.max_bag_slots,
            Location::Storage => &mut self.max_storage_slots,
            _ => return,
        };

        let old_slots = *slot;
        if old_slots == new_slots {
            return;
        }
        *slot = new_slots;
        self.events.push(CapacityEvent::Changed { location, old_slots, new_slots });
    }

    /// Takes all pending capacity notifications
    pub fn drain_events(&mut self) -> Vec<CapacityEvent> {
        std::mem::take(&mut self.events)
    }
}

impl Default for CapacityManager {
    fn default() -> Self {
        Self::new(DEFAULT_BAG_SLOTS, DEFAULT_STORAGE_SLOTS)
    }
}
