use std::collections::HashMap;

use super::capacity::CapacityManager;
use super::collection::ItemCollection;
use super::error::{ErrorKind, InventoryError, InventoryOutcome, InventoryResult};
use super::location::LocationService;
use super::query::QueryService;
use super::stacking::StackingService;
use crate::config::InventoryConfig;
use crate::equipment::EquipmentTracker;
use crate::item::{InstanceId, ItemCatalog, ItemDefinition, ItemInstance, Location};
use crate::save::{InventorySaveData, ItemSaveData, MigrationReport, SavedLocation};

/// Resolves a catalog entry, mapping misses to inventory errors
pub(crate) fn lookup<'c>(catalog: &'c dyn ItemCatalog, item_id: &str) -> Result<&'c ItemDefinition, InventoryError> {
    if !catalog.is_loaded() {
        return Err(InventoryError::DatabaseMissing);
    }
    catalog
        .get_item(item_id)
        .ok_or_else(|| InventoryError::UnknownItem(item_id.to_string()))
}

/// Owner of the player's items and the public mutation API
///
/// Every mutation goes through here. Capacity is checked before the
/// stacking/location services touch the collection, and this is the only
/// place that picks a fallback location.
#[derive(Debug, Clone)]
pub struct InventoryCore {
    items: ItemCollection,
    capacity: CapacityManager,
    skill_prefix: String,

    /// Stack limits seen in the catalog, so removals can re-merge stacks
    stack_limits: HashMap<String, u32>,
}

impl InventoryCore {
    pub fn new(config: &InventoryConfig) -> Self {
        InventoryCore {
            items: ItemCollection::new(),
            capacity: CapacityManager::from_config(config),
            skill_prefix: config.skill_prefix.clone(),
            stack_limits: HashMap::new(),
        }
    }

    // ======================================================================
    // Read access
    // ======================================================================

    pub fn items(&self) -> &[ItemInstance] {
        self.items.as_slice()
    }

    pub fn get(&self, id: InstanceId) -> Option<&ItemInstance> {
        self.items.get(id)
    }

    /// Read-only queries over the current items
    pub fn query(&self) -> QueryService<'_> {
        QueryService::new(&self.items, &self.skill_prefix)
    }

    pub fn capacity(&self) -> &CapacityManager {
        &self.capacity
    }

    pub fn capacity_mut(&mut self) -> &mut CapacityManager {
        &mut self.capacity
    }

    pub fn upgrade_bag(&mut self, additional_slots: i32) -> bool {
        self.capacity.upgrade_bag(additional_slots)
    }

    pub fn upgrade_storage(&mut self, additional_slots: i32) -> bool {
        self.capacity.upgrade_storage(additional_slots)
    }

    // ======================================================================
    // Internal helpers
    // ======================================================================

    fn definition<'c>(&mut self, catalog: &'c dyn ItemCatalog, item_id: &str) -> Result<&'c ItemDefinition, InventoryError> {
        let definition = lookup(catalog, item_id)?;
        self.stack_limits
            .insert(item_id.to_string(), definition.effective_max_stack());
        Ok(definition)
    }

    fn stacking(&mut self) -> StackingService<'_> {
        StackingService::new(&mut self.items)
    }

    fn locations(&mut self) -> LocationService<'_> {
        LocationService::new(&mut self.items, &self.skill_prefix)
    }

    fn is_skill_item(&self, item_id: &str) -> bool {
        self.query().is_skill_item(item_id)
    }

    fn has_slot(&self, location: Location) -> bool {
        self.capacity
            .has_space(location, self.query().item_count_by_location(location))
    }

    /// Units of an item a capacity-limited location can still absorb
    fn room_for(&self, item_id: &str, location: Location, definition: &ItemDefinition) -> u64 {
        let query = self.query();
        let max_stack_size = definition.effective_max_stack();
        let stack_space = if definition.is_stackable {
            query.stack_space_in_location(item_id, location, max_stack_size)
        } else {
            0
        };
        let empty_slots = query.empty_slots(location, &self.capacity);

        (empty_slots as u64)
            .saturating_mul(max_stack_size as u64)
            .saturating_add(stack_space)
    }

    fn location_full(&self, location: Location, requested: u32, item: Option<InstanceId>) -> InventoryError {
        let max_slots = self.capacity.get_max_slots(location);
        match location {
            Location::Bag => InventoryError::BagFull { max_slots, item },
            _ => InventoryError::StorageFull {
                max_slots,
                requested,
                completed: 0,
                item,
            },
        }
    }

    /// Merges partial stacks of one item in one resting location
    fn consolidate_location(&mut self, item_id: &str, location: Location) {
        if !location.is_resting() {
            return;
        }
        let Some(&max_stack_size) = self.stack_limits.get(item_id) else {
            return;
        };
        if max_stack_size > 1 {
            self.stacking().consolidate(item_id, location, max_stack_size);
        }
    }

    /// Picks where an add should start
    ///
    /// Bag when preferred and it can take at least one unit, otherwise
    /// Storage when it can.
    fn determine_target_location(
        &self,
        prefer_bag: bool,
        item_id: &str,
        definition: &ItemDefinition,
        quantity: u32,
    ) -> Result<Location, InventoryError> {
        if prefer_bag && self.room_for(item_id, Location::Bag, definition) > 0 {
            return Ok(Location::Bag);
        }
        if self.room_for(item_id, Location::Storage, definition) > 0 {
            return Ok(Location::Storage);
        }

        if prefer_bag {
            Err(InventoryError::NoSpace { item_id: item_id.to_string() })
        } else {
            Err(self.location_full(Location::Storage, quantity, None))
        }
    }

    // ======================================================================
    // Mutations
    // ======================================================================

    /// Adds new items to the bag or storage
    ///
    /// # Strategy
    /// 1. Resolve the catalog entry and a target location
    /// 2. Check the target (plus storage, when the bag is the target) can
    ///    absorb the whole quantity; otherwise fail without changing anything
    /// 3. Stackable: fill the target in one pass, overflow goes to storage
    /// 4. Non-stackable: one instance per unit, falling over from bag to
    ///    storage when the bag fills up
    pub fn add_item(
        &mut self,
        item_id: &str,
        quantity: u32,
        prefer_bag: bool,
        catalog: &dyn ItemCatalog,
    ) -> InventoryResult {
        if item_id.is_empty() {
            return Err(InventoryError::InvalidOperation("item id must not be empty".to_string()));
        }
        if quantity == 0 {
            return Err(InventoryError::InvalidOperation(format!("cannot add zero {}", item_id)));
        }

        let definition = self.definition(catalog, item_id)?;

        // Skills occupy no slots, so there is nothing to pre-flight
        if self.is_skill_item(item_id) {
            let location = if prefer_bag { Location::Bag } else { Location::Storage };
            let touched = self.stacking().add_to_existing_or_create_new(
                item_id,
                quantity,
                location,
                definition.effective_max_stack(),
            );
            log::debug!("Added skill {} x{} to {}", item_id, quantity, location);
            return Ok(InventoryOutcome::new(
                format!("Added {} x{}", definition.name, quantity),
                touched.last().copied(),
                quantity,
            ));
        }

        let target = self.determine_target_location(prefer_bag, item_id, definition, quantity)?;

        let target_room = self.room_for(item_id, target, definition);
        let fallback_room = if target == Location::Bag {
            self.room_for(item_id, Location::Storage, definition)
        } else {
            0
        };
        if quantity as u64 > target_room + fallback_room {
            log::info!(
                "Not enough room for {} x{} (room for {})",
                item_id, quantity, target_room + fallback_room
            );
            return Err(self.location_full(Location::Storage, quantity, None));
        }

        let last = if definition.is_stackable {
            let max_stack_size = definition.effective_max_stack();
            let into_target = (quantity as u64).min(target_room) as u32;
            let overflow = quantity - into_target;

            let mut touched = self
                .stacking()
                .add_to_existing_or_create_new(item_id, into_target, target, max_stack_size);
            if overflow > 0 {
                log::info!("Bag is full, {} x{} went to storage", item_id, overflow);
                touched.extend(self.stacking().add_to_existing_or_create_new(
                    item_id,
                    overflow,
                    Location::Storage,
                    max_stack_size,
                ));
            }
            touched.last().copied()
        } else {
            let mut location = target;
            let mut last = None;
            for added in 0..quantity {
                if !self.has_slot(location) && location == Location::Bag {
                    log::info!(
                        "Bag filled after {} of {} {}, continuing in storage",
                        added, quantity, item_id
                    );
                    location = Location::Storage;
                }
                if !self.has_slot(location) {
                    return Err(InventoryError::StorageFull {
                        max_slots: self.capacity.max_storage_slots(),
                        requested: quantity,
                        completed: added,
                        item: last,
                    });
                }
                last = Some(self.items.spawn(item_id, 1, location));
            }
            last
        };

        log::debug!("Added {} x{} (preferred {})", item_id, quantity, target);
        Ok(InventoryOutcome::new(
            format!("Added {} x{}", definition.name, quantity),
            last,
            quantity,
        ))
    }

    /// Removes `quantity` units from one instance
    ///
    /// The instance is deleted when it reaches zero.
    pub fn remove_item(&mut self, instance: InstanceId, quantity: u32) -> InventoryResult {
        if quantity == 0 {
            return Err(InventoryError::InvalidOperation("cannot remove zero items".to_string()));
        }
        let stack = self
            .items
            .get_mut(instance)
            .ok_or(InventoryError::InstanceNotFound(instance))?;
        if quantity > stack.quantity {
            return Err(InventoryError::InsufficientQuantity {
                item_id: stack.item_id.clone(),
                requested: quantity,
                available: stack.quantity,
                item: Some(instance),
            });
        }

        stack.quantity -= quantity;
        let item_id = stack.item_id.clone();
        let location = stack.location;
        if StackingService::should_remove_stack(stack) {
            self.items.remove(instance);
        }
        self.consolidate_location(&item_id, location);

        let remaining = self.items.contains(instance).then_some(instance);
        Ok(InventoryOutcome::new(
            format!("Removed {} x{}", item_id, quantity),
            remaining,
            quantity,
        ))
    }

    /// Consumes `quantity` units of an item across its unequipped stacks
    ///
    /// Pocket is used first, then bag, then storage; within a location
    /// the smallest stacks go first. Nothing changes if there is not enough.
    pub fn remove_item_by_id(&mut self, item_id: &str, quantity: u32) -> InventoryResult {
        if quantity == 0 {
            return Err(InventoryError::InvalidOperation("cannot remove zero items".to_string()));
        }

        let order = [Location::Pocket, Location::Bag, Location::Storage];
        let mut stacks: Vec<(usize, u32, InstanceId)> = self
            .items
            .iter()
            .filter(|item| item.item_id == item_id)
            .filter_map(|item| {
                let rank = order.iter().position(|l| *l == item.location)?;
                Some((rank, item.quantity, item.id))
            })
            .collect();
        let available: u64 = stacks.iter().map(|(_, quantity, _)| *quantity as u64).sum();
        if available < quantity as u64 {
            return Err(InventoryError::InsufficientQuantity {
                item_id: item_id.to_string(),
                requested: quantity,
                // below `quantity`, so it fits
                available: available as u32,
                item: None,
            });
        }
        stacks.sort_by_key(|(rank, quantity, _)| (*rank, *quantity));

        let mut remaining = quantity;
        for (_, _, id) in stacks {
            if remaining == 0 {
                break;
            }
            if let Some(stack) = self.items.get_mut(id) {
                remaining -= stack.take(remaining);
            }
        }
        self.stacking().remove_empty_stacks();
        for location in order {
            self.consolidate_location(item_id, location);
        }

        Ok(InventoryOutcome::new(
            format!("Removed {} x{}", item_id, quantity),
            None,
            quantity,
        ))
    }

    pub fn move_to_bag(&mut self, instance: InstanceId, quantity: u32, catalog: &dyn ItemCatalog) -> InventoryResult {
        self.move_to(instance, Location::Bag, quantity, catalog)
    }

    pub fn move_to_storage(&mut self, instance: InstanceId, quantity: u32, catalog: &dyn ItemCatalog) -> InventoryResult {
        self.move_to(instance, Location::Storage, quantity, catalog)
    }

    pub fn move_to_pocket(&mut self, instance: InstanceId, quantity: u32, catalog: &dyn ItemCatalog) -> InventoryResult {
        self.move_to(instance, Location::Pocket, quantity, catalog)
    }

    fn move_to(
        &mut self,
        instance: InstanceId,
        target: Location,
        quantity: u32,
        catalog: &dyn ItemCatalog,
    ) -> InventoryResult {
        let stack = self
            .items
            .get(instance)
            .ok_or(InventoryError::InstanceNotFound(instance))?;
        if quantity == 0 {
            return Err(InventoryError::InvalidOperation("cannot move zero items".to_string()));
        }
        if stack.location == target {
            return Err(InventoryError::AlreadyInLocation { item: instance, location: target });
        }
        if quantity > stack.quantity {
            return Err(InventoryError::InsufficientQuantity {
                item_id: stack.item_id.clone(),
                requested: quantity,
                available: stack.quantity,
                item: Some(instance),
            });
        }
        let item_id = stack.item_id.clone();
        let source_location = stack.location;

        let definition = self.definition(catalog, &item_id)?;

        // Room check: either existing stacks absorb everything or one slot is needed
        if target.is_capacity_limited() {
            let stack_space = if definition.is_stackable {
                self.query()
                    .stack_space_in_location(&item_id, target, definition.effective_max_stack())
            } else {
                0
            };
            if quantity as u64 > stack_space && !self.has_slot(target) {
                return Err(self.location_full(target, quantity, Some(instance)));
            }
        }

        if !self.locations().move_item(instance, target, quantity, definition) {
            return Err(InventoryError::Unknown(format!("move of {} to {} failed", instance, target)));
        }
        self.consolidate_location(&item_id, source_location);
        self.consolidate_location(&item_id, target);

        let moved = match self.items.get(instance) {
            Some(stack) if stack.location == target => Some(instance),
            _ => self
                .items
                .iter()
                .filter(|item| item.item_id == item_id && item.location == target)
                .map(|item| item.id)
                .last(),
        };
        Ok(InventoryOutcome::new(
            format!("Moved {} x{} to {}", definition.name, quantity, target),
            moved,
            quantity,
        ))
    }

    /// Puts an instance into the equipped state, remembering where it was
    ///
    /// Called by the equipment collaborator; slot rules live there.
    pub fn equip_item(&mut self, instance: InstanceId) -> InventoryResult {
        let stack = self
            .items
            .get(instance)
            .ok_or(InventoryError::InstanceNotFound(instance))?;
        if stack.location == Location::Equipped {
            return Err(InventoryError::AlreadyInLocation { item: instance, location: Location::Equipped });
        }
        if !stack.location.is_resting() {
            return Err(InventoryError::InvalidOperation(format!(
                "item {} has no valid location to equip from",
                instance
            )));
        }
        let previous = stack.location;
        let item_id = stack.item_id.clone();
        let quantity = stack.quantity;

        self.locations().relocate(instance, Location::Equipped);
        if let Some(stack) = self.items.get_mut(instance) {
            stack.previous_location = Some(previous);
        }

        log::debug!("Equipped {} {} from {}", item_id, instance, previous);
        Ok(InventoryOutcome::new(format!("Equipped {}", item_id), Some(instance), quantity))
    }

    /// Returns an equipped instance to where it was before equipping
    ///
    /// Falls back to the bag when the previous location is unknown. The
    /// move is capacity-checked like any other.
    pub fn unequip_item(&mut self, instance: InstanceId, catalog: &dyn ItemCatalog) -> InventoryResult {
        let stack = self
            .items
            .get(instance)
            .ok_or(InventoryError::InstanceNotFound(instance))?;
        if stack.location != Location::Equipped {
            return Err(InventoryError::InvalidOperation(format!("item {} is not equipped", instance)));
        }
        let target = stack
            .previous_location
            .filter(|location| location.is_resting())
            .unwrap_or(Location::Bag);
        let quantity = stack.quantity;

        self.move_to(instance, target, quantity, catalog)
    }

    /// Moves every unequipped bag item into storage
    ///
    /// Stops at the first item storage cannot take; stacks moved before
    /// that stay moved. Items the catalog doesn't know are left in the bag.
    pub fn store_all_items(&mut self, equipment: &dyn EquipmentTracker, catalog: &dyn ItemCatalog) -> InventoryResult {
        let candidates: Vec<(InstanceId, u32)> = self
            .query()
            .bag_items()
            .into_iter()
            .filter(|item| !equipment.is_item_equipped(&item.item_id))
            .map(|item| (item.id, item.quantity))
            .collect();
        let requested: u32 = candidates.iter().map(|(_, quantity)| quantity).sum();

        let mut stored = 0;
        for (id, _) in candidates {
            // Earlier moves may have merged this stack into another candidate
            let Some(stack) = self.items.get(id).filter(|s| s.location == Location::Bag) else {
                continue;
            };
            let quantity = stack.quantity;

            match self.move_to(id, Location::Storage, quantity, catalog) {
                Ok(_) => stored += quantity,
                Err(e) if e.kind() == ErrorKind::StorageFull => {
                    log::warn!("Storage filled after storing {} of {} items", stored, requested);
                    return Err(InventoryError::StorageFull {
                        max_slots: self.capacity.max_storage_slots(),
                        requested,
                        completed: stored,
                        item: Some(id),
                    });
                }
                Err(e) => log::warn!("Leaving {} in the bag: {}", id, e),
            }
        }

        log::info!("Stored {} items from the bag", stored);
        Ok(InventoryOutcome::new(format!("Stored {} items", stored), None, stored))
    }

    /// Empties the inventory (new game / deleted save)
    pub fn clear_all(&mut self) {
        log::info!("Clearing {} item instances", self.items.len());
        self.items.clear();
    }

    // ======================================================================
    // Persistence
    // ======================================================================

    /// Builds the flat save record for the current state
    pub fn to_save_data(&self) -> InventorySaveData {
        let items = self
            .items
            .iter()
            .filter(|item| {
                if item.location == Location::None {
                    log::warn!("Not saving {} {}: it has no location", item.item_id, item.id);
                    return false;
                }
                true
            })
            .map(|item| ItemSaveData {
                item_id: item.item_id.clone(),
                quantity: item.quantity as i64,
                location: Some(SavedLocation::from(item.location)),
                previous_location: item.previous_location.map(SavedLocation::from),
                is_in_bag: None,
                is_in_pocket: None,
            })
            .collect();

        InventorySaveData {
            items,
            max_bag_slots: u32::try_from(self.capacity.max_bag_slots()).unwrap_or(u32::MAX),
            max_storage_slots: u32::try_from(self.capacity.max_storage_slots()).unwrap_or(u32::MAX),
            ..InventorySaveData::default()
        }
    }

    /// Replaces the current state with a (migrated) save record
    ///
    /// Stacks larger than the catalog allows are split, and partial
    /// stacks are merged. Items unknown to the catalog are kept as-is, one
    /// stack per record. Bag stacks beyond the bag limit spill into
    /// storage; if storage cannot take them either, the load fails with
    /// `StorageFull` and the current state is left untouched.
    pub fn load_save_data(
        &mut self,
        mut data: InventorySaveData,
        catalog: &dyn ItemCatalog,
    ) -> Result<MigrationReport, InventoryError> {
        if !catalog.is_loaded() {
            return Err(InventoryError::DatabaseMissing);
        }
        let mut report = data.migrate();
        let max_bag_slots = data.max_bag_slots as usize;
        let max_storage_slots = data.max_storage_slots as usize;

        // Resolve every record and count the slots it needs before anything is replaced
        let mut records = Vec::with_capacity(data.items.len());
        let mut totals: HashMap<(String, Location), (u64, u32)> = HashMap::new();
        let mut unmerged_slots: HashMap<Location, u64> = HashMap::new();
        for record in &data.items {
            let location = record
                .location
                .and_then(SavedLocation::to_location)
                .unwrap_or(Location::Storage);
            let quantity = u32::try_from(record.quantity).unwrap_or(u32::MAX);

            let known = self.definition(catalog, &record.item_id).map(|d| d.effective_max_stack());
            let max_stack_size = match known {
                Ok(max_stack_size) => max_stack_size,
                Err(ref e) => {
                    log::warn!("Loading {} without a catalog entry: {}", record.item_id, e);
                    u32::MAX
                }
            };

            if location.is_capacity_limited() && !self.is_skill_item(&record.item_id) {
                if known.is_ok() {
                    let entry = totals
                        .entry((record.item_id.clone(), location))
                        .or_insert((0, max_stack_size));
                    entry.0 += quantity as u64;
                } else {
                    *unmerged_slots.entry(location).or_insert(0) += 1;
                }
            }
            records.push((record, location, quantity, max_stack_size));
        }

        let slots_needed = |location: Location| -> u64 {
            let merged: u64 = totals
                .iter()
                .filter(|((_, l), _)| *l == location)
                .map(|(_, (total, max_stack_size))| total.div_ceil(*max_stack_size as u64))
                .sum();
            merged + unmerged_slots.get(&location).copied().unwrap_or(0)
        };
        let bag_needed = slots_needed(Location::Bag);
        let bag_spill = bag_needed.saturating_sub(max_bag_slots as u64);
        let storage_needed = slots_needed(Location::Storage) + bag_spill;
        if storage_needed > max_storage_slots as u64 {
            log::warn!(
                "Save needs {} storage slots but only {} exist, refusing to load",
                storage_needed, max_storage_slots
            );
            return Err(InventoryError::StorageFull {
                max_slots: max_storage_slots,
                requested: u32::try_from(storage_needed).unwrap_or(u32::MAX),
                completed: 0,
                item: None,
            });
        }

        self.items.clear();
        self.capacity.set_capacities(max_bag_slots, max_storage_slots);

        let mut placed: Vec<(String, Location)> = Vec::new();
        for (record, location, quantity, max_stack_size) in records {
            let created = self
                .stacking()
                .create_new_stacks(&record.item_id, quantity, location, max_stack_size);
            if created.len() > 1 {
                log::warn!(
                    "Split oversized {} stack of {} into {} stacks",
                    record.item_id, quantity, created.len()
                );
            }
            if location == Location::Equipped {
                let previous = record.previous_location.and_then(SavedLocation::to_location);
                for id in &created {
                    if let Some(stack) = self.items.get_mut(*id) {
                        stack.previous_location = previous;
                    }
                }
            }
            placed.push((record.item_id.clone(), location));
        }

        placed.sort();
        placed.dedup();
        for (item_id, location) in placed {
            self.consolidate_location(&item_id, location);
        }

        // Same fallback as add_item: what the bag cannot hold goes to storage
        let spilled: Vec<(InstanceId, String)> = {
            let bag = self.query().bag_items();
            let excess = bag.len().saturating_sub(max_bag_slots);
            bag[bag.len() - excess..]
                .iter()
                .map(|item| (item.id, item.item_id.clone()))
                .collect()
        };
        if !spilled.is_empty() {
            for (id, _) in &spilled {
                self.locations().relocate(*id, Location::Storage);
            }
            for (_, item_id) in &spilled {
                self.consolidate_location(item_id, Location::Storage);
            }
            report.correct(format!("moved {} stack(s) from the full bag to storage", spilled.len()));
        }

        log::info!("Loaded {} item instances", self.items.len());
        Ok(report)
    }
}

impl Default for InventoryCore {
    fn default() -> Self {
        Self::new(&InventoryConfig::default())
    }
}
