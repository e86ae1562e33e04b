use std::collections::HashMap;

use crate::inventory::core::lookup;
use crate::inventory::{InventoryCore, InventoryError, InventoryResult};
use crate::item::{EquipmentSlot, InstanceId, ItemCatalog, Location};

/// What the inventory needs to know from the equipment system
pub trait EquipmentTracker {
    /// Returns true if any instance of this item is currently worn
    fn is_item_equipped(&self, item_id: &str) -> bool;
}

/// Minimal equipment collaborator: one instance per slot
///
/// Slot rules live here; the location bookkeeping (including
/// `previous_location`) is done by `InventoryCore::equip_item` and
/// `unequip_item`.
#[derive(Debug, Clone, Default)]
pub struct Loadout {
    slots: HashMap<EquipmentSlot, (InstanceId, String)>,
}

impl Loadout {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuilds the slot map from the instances the core has equipped
    ///
    /// Used after `InventoryCore::load_save_data`. An instance whose item
    /// is not equipment, or whose slot is already taken, is left out and
    /// logged; it stays equipped in the core until unequipped there.
    pub fn from_equipped(core: &InventoryCore, catalog: &dyn ItemCatalog) -> Self {
        let mut loadout = Self::new();
        for item in core.query().equipped_items() {
            let slot = match lookup(catalog, &item.item_id) {
                Ok(definition) => definition.properties.equipment_slot(),
                Err(e) => {
                    log::warn!("Cannot restore equipped {} {}: {}", item.item_id, item.id, e);
                    continue;
                }
            };
            match slot {
                Some(slot) if !loadout.slots.contains_key(&slot) => {
                    loadout.slots.insert(slot, (item.id, item.item_id.clone()));
                }
                Some(slot) => log::warn!("Slot {:?} already restored, skipping {}", slot, item.id),
                None => log::warn!("Equipped {} {} has no equipment slot", item.item_id, item.id),
            }
        }
        loadout
    }

    /// The instance worn in a slot
    pub fn equipped(&self, slot: EquipmentSlot) -> Option<InstanceId> {
        self.slots.get(&slot).map(|(id, _)| *id)
    }

    /// Equips an instance into the slot its definition names
    ///
    /// The new item is equipped before the current occupant comes off. If
    /// the occupant cannot go back to where it came from, the new item is
    /// returned too and the slot keeps its occupant.
    pub fn equip(
        &mut self,
        core: &mut InventoryCore,
        instance: InstanceId,
        catalog: &dyn ItemCatalog,
    ) -> InventoryResult {
        let item_id = core
            .get(instance)
            .ok_or(InventoryError::InstanceNotFound(instance))?
            .item_id
            .clone();
        let definition = lookup(catalog, &item_id)?;
        let slot = definition.properties.equipment_slot().ok_or_else(|| {
            InventoryError::InvalidOperation(format!("{} cannot be equipped", definition.name))
        })?;

        let occupant = self.equipped(slot);
        if occupant == Some(instance) {
            return Err(InventoryError::AlreadyInLocation {
                item: instance,
                location: Location::Equipped,
            });
        }

        let outcome = core.equip_item(instance)?;

        // An occupant removed from the core in the meantime is simply forgotten
        let worn = occupant.filter(|id| core.get(*id).is_some_and(|s| s.location == Location::Equipped));
        if let Some(current) = worn {
            if let Err(e) = core.unequip_item(current, catalog) {
                if let Err(rollback) = core.unequip_item(instance, catalog) {
                    log::warn!("Could not return {} after failed swap: {}", instance, rollback);
                }
                return Err(e);
            }
        }

        self.slots.insert(slot, (instance, item_id));
        Ok(outcome)
    }

    /// Takes off whatever is in `slot`, returning it to its previous location
    pub fn unequip(
        &mut self,
        core: &mut InventoryCore,
        slot: EquipmentSlot,
        catalog: &dyn ItemCatalog,
    ) -> InventoryResult {
        let (instance, _) = self
            .slots
            .get(&slot)
            .cloned()
            .ok_or_else(|| InventoryError::InvalidOperation(format!("nothing equipped in {:?}", slot)))?;

        let outcome = core.unequip_item(instance, catalog)?;
        self.slots.remove(&slot);
        Ok(outcome)
    }
}

impl EquipmentTracker for Loadout {
    fn is_item_equipped(&self, item_id: &str) -> bool {
        self.slots.values().any(|(_, equipped)| equipped == item_id)
    }
}
