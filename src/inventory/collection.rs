use crate::item::{InstanceId, ItemInstance, Location};

/// The canonical list of item instances plus its id allocator
///
/// Only `InventoryCore` owns one of these. Services get it borrowed for
/// the duration of a single core call.
#[derive(Debug, Clone, Default)]
pub struct ItemCollection {
    items: Vec<ItemInstance>,
    next_id: u64,
}

impl ItemCollection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates and stores a new instance, returning its handle
    pub fn spawn(&mut self, item_id: &str, quantity: u32, location: Location) -> InstanceId {
        self.next_id += 1;
        let id = InstanceId(self.next_id);
        self.items.push(ItemInstance::new(id, item_id, quantity, location));
        id
    }

    pub fn get(&self, id: InstanceId) -> Option<&ItemInstance> {
        self.items.iter().find(|item| item.id == id)
    }

    pub fn get_mut(&mut self, id: InstanceId) -> Option<&mut ItemInstance> {
        self.items.iter_mut().find(|item| item.id == id)
    }

    pub fn contains(&self, id: InstanceId) -> bool {
        self.get(id).is_some()
    }

    /// Removes an instance, returning it if it existed
    pub fn remove(&mut self, id: InstanceId) -> Option<ItemInstance> {
        let index = self.items.iter().position(|item| item.id == id)?;
        Some(self.items.remove(index))
    }

    pub fn retain(&mut self, keep: impl FnMut(&ItemInstance) -> bool) {
        self.items.retain(keep);
    }

    pub fn iter(&self) -> impl Iterator<Item = &ItemInstance> {
        self.items.iter()
    }

    pub fn as_slice(&self) -> &[ItemInstance] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Drops every instance; ids keep counting up
    pub fn clear(&mut self) {
        self.items.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ids_are_not_reused() {
        let mut items = ItemCollection::new();
        let first = items.spawn("potion", 1, Location::Bag);
        items.remove(first);
        items.clear();
        let second = items.spawn("potion", 1, Location::Bag);

        assert_ne!(first, second);
        assert!(!items.contains(first));
        assert_eq!(items.len(), 1);
    }
}
