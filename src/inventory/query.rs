use super::capacity::CapacityManager;
use super::collection::ItemCollection;
use crate::item::{InstanceId, ItemInstance, Location};

/// Read-only derived views over the item collection
///
/// Nothing here fails: missing data gives empty lists, zero, or false.
/// Skill items (reserved id prefix) belong to another system and are
/// left out of every per-location query, so they never take up a slot.
#[derive(Debug, Clone, Copy)]
pub struct QueryService<'a> {
    items: &'a ItemCollection,
    skill_prefix: &'a str,
}

impl<'a> QueryService<'a> {
    pub fn new(items: &'a ItemCollection, skill_prefix: &'a str) -> Self {
        QueryService { items, skill_prefix }
    }

    /// Returns true if this id is reserved for skills
    pub fn is_skill_item(&self, item_id: &str) -> bool {
        !self.skill_prefix.is_empty() && item_id.starts_with(self.skill_prefix)
    }

    fn in_location(&self, location: Location) -> impl Iterator<Item = &'a ItemInstance> + '_ {
        self.items
            .iter()
            .filter(move |item| item.location == location && !self.is_skill_item(&item.item_id))
    }

    /// Looks up a single instance
    pub fn find(&self, id: InstanceId) -> Option<&'a ItemInstance> {
        self.items.get(id)
    }

    /// All non-skill instances in a location, in collection order
    pub fn items_by_location(&self, location: Location) -> Vec<&'a ItemInstance> {
        self.in_location(location).collect()
    }

    pub fn bag_items(&self) -> Vec<&'a ItemInstance> {
        self.items_by_location(Location::Bag)
    }

    pub fn storage_items(&self) -> Vec<&'a ItemInstance> {
        self.items_by_location(Location::Storage)
    }

    pub fn pocket_items(&self) -> Vec<&'a ItemInstance> {
        self.items_by_location(Location::Pocket)
    }

    pub fn equipped_items(&self) -> Vec<&'a ItemInstance> {
        self.items_by_location(Location::Equipped)
    }

    /// Total quantity of an item across every location
    ///
    /// Summed as u64: several stacks of a large-stack item can exceed u32.
    pub fn item_count(&self, item_id: &str) -> u64 {
        self.items
            .iter()
            .filter(|item| item.item_id == item_id)
            .map(|item| item.quantity as u64)
            .sum()
    }

    /// Total quantity of an item in one location
    pub fn item_count_in_location(&self, item_id: &str, location: Location) -> u64 {
        self.items
            .iter()
            .filter(|item| item.item_id == item_id && item.location == location)
            .map(|item| item.quantity as u64)
            .sum()
    }

    /// Checks if at least `quantity` of an item is owned
    pub fn has_item(&self, item_id: &str, quantity: u32) -> bool {
        self.item_count(item_id) >= quantity as u64
    }

    /// Number of occupied slots (instances) in a location
    pub fn item_count_by_location(&self, location: Location) -> usize {
        self.in_location(location).count()
    }

    pub fn bag_count(&self) -> usize {
        self.item_count_by_location(Location::Bag)
    }

    pub fn storage_count(&self) -> usize {
        self.item_count_by_location(Location::Storage)
    }

    /// Free slots in a location according to the capacity limits
    pub fn empty_slots(&self, location: Location, capacity: &CapacityManager) -> usize {
        capacity.get_empty_slots(location, self.item_count_by_location(location))
    }

    /// Free units left in existing stacks of an item in one location
    pub fn stack_space_in_location(&self, item_id: &str, location: Location, max_stack_size: u32) -> u64 {
        self.in_location(location)
            .filter(|item| item.item_id == item_id)
            .map(|item| item.space_left(max_stack_size) as u64)
            .sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> ItemCollection {
        let mut items = ItemCollection::new();
        items.spawn("potion", 4, Location::Bag);
        items.spawn("potion", 10, Location::Storage);
        items.spawn("sword", 1, Location::Equipped);
        items.spawn("skill_fireball", 1, Location::Bag);
        items
    }

    #[test]
    fn test_counts_by_location_skip_skills() {
        let items = sample();
        let query = QueryService::new(&items, "skill_");

        assert_eq!(query.bag_count(), 1);
        assert_eq!(query.storage_count(), 1);
        assert_eq!(query.equipped_items().len(), 1);
        assert!(query.pocket_items().is_empty());
        assert!(query.is_skill_item("skill_fireball"));
    }

    #[test]
    fn test_item_count_spans_locations() {
        let items = sample();
        let query = QueryService::new(&items, "skill_");

        assert_eq!(query.item_count("potion"), 14);
        assert_eq!(query.item_count_in_location("potion", Location::Bag), 4);
        assert!(query.has_item("potion", 14));
        assert!(!query.has_item("potion", 15));
        assert_eq!(query.item_count("missing"), 0);
    }

    #[test]
    fn test_counts_past_u32_range() {
        let mut items = ItemCollection::new();
        items.spawn("gold", u32::MAX, Location::Bag);
        items.spawn("gold", u32::MAX - 5, Location::Storage);
        items.spawn("gold", 10, Location::Storage);
        let query = QueryService::new(&items, "skill_");

        assert_eq!(query.item_count("gold"), 2 * u32::MAX as u64 + 5);
        assert_eq!(query.item_count_in_location("gold", Location::Storage), u32::MAX as u64 + 5);
        assert!(query.has_item("gold", u32::MAX));
        assert_eq!(query.stack_space_in_location("gold", Location::Storage, u32::MAX), u32::MAX as u64 - 5);
    }

    #[test]
    fn test_empty_slots_and_stack_space() {
        let items = sample();
        let query = QueryService::new(&items, "skill_");
        let capacity = CapacityManager::new(3, 1);

        assert_eq!(query.empty_slots(Location::Bag, &capacity), 2);
        assert_eq!(query.empty_slots(Location::Storage, &capacity), 0);
        assert_eq!(query.stack_space_in_location("potion", Location::Bag, 10), 6);
        assert_eq!(query.stack_space_in_location("potion", Location::Storage, 10), 0);
    }
}
