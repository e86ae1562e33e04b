use super::collection::ItemCollection;
use crate::item::{InstanceId, ItemInstance, Location};

/// Merge/split arithmetic over a borrowed item collection
///
/// Knows nothing about capacity; callers decide whether new stacks are
/// allowed before asking for them.
#[derive(Debug)]
pub struct StackingService<'a> {
    items: &'a mut ItemCollection,
}

impl<'a> StackingService<'a> {
    pub fn new(items: &'a mut ItemCollection) -> Self {
        StackingService { items }
    }

    /// Returns true once a stack has nothing left in it
    pub fn should_remove_stack(instance: &ItemInstance) -> bool {
        instance.quantity == 0
    }

    /// First stack of this item in `location` that still has room
    ///
    /// "First" is collection order; use `add_to_existing_or_create_new`
    /// when the fill order matters.
    pub fn find_stack_with_space(&self, item_id: &str, location: Location, max_stack_size: u32) -> Option<InstanceId> {
        self.items
            .iter()
            .find(|item| {
                item.item_id == item_id && item.location == location && item.quantity < max_stack_size
            })
            .map(|item| item.id)
    }

    /// Moves up to `quantity` units from `source` into `target`
    ///
    /// Returns how many were actually moved, limited by the room left in
    /// `target` and by what `source` holds. An emptied source is left in
    /// place for the caller to purge.
    pub fn transfer_to_stack(
        &mut self,
        source: InstanceId,
        target: InstanceId,
        quantity: u32,
        max_stack_size: u32,
    ) -> u32 {
        if source == target {
            return 0;
        }

        let Some(space) = self.items.get(target).map(|t| t.space_left(max_stack_size)) else {
            return 0;
        };
        let Some(source_stack) = self.items.get_mut(source) else {
            return 0;
        };

        let moved = source_stack.take(quantity.min(space));
        if let Some(target_stack) = self.items.get_mut(target) {
            target_stack.quantity += moved;
        }
        moved
    }

    /// Creates as many stacks as needed to hold `total_quantity`
    ///
    /// Every stack is full except possibly the last one.
    pub fn create_new_stacks(
        &mut self,
        item_id: &str,
        total_quantity: u32,
        location: Location,
        max_stack_size: u32,
    ) -> Vec<InstanceId> {
        let max_stack_size = max_stack_size.max(1);
        let mut remaining = total_quantity;
        let mut created = Vec::new();

        while remaining > 0 {
            let stack_size = remaining.min(max_stack_size);
            created.push(self.items.spawn(item_id, stack_size, location));
            remaining -= stack_size;
        }

        created
    }

    /// Splits `quantity` off `source` into a new stack in the same location
    ///
    /// Returns None (and logs) when asked to split nothing or the whole
    /// stack; use a move for that instead.
    pub fn split_stack(&mut self, source: InstanceId, quantity: u32) -> Option<InstanceId> {
        let stack = self.items.get_mut(source)?;

        if quantity == 0 || quantity >= stack.quantity {
            log::warn!(
                "Cannot split {} of {} from stack {} holding {}",
                quantity, stack.item_id, source, stack.quantity
            );
            return None;
        }

        stack.quantity -= quantity;
        let item_id = stack.item_id.clone();
        let location = stack.location;
        Some(self.items.spawn(&item_id, quantity, location))
    }

    /// Adds `quantity` to existing stacks, then creates new ones
    ///
    /// # Strategy
    /// 1. Top up under-full stacks in `location`, smallest first
    ///    (ties keep collection order)
    /// 2. Create new stacks for whatever is left
    ///
    /// Returns every stack that received items.
    pub fn add_to_existing_or_create_new(
        &mut self,
        item_id: &str,
        quantity: u32,
        location: Location,
        max_stack_size: u32,
    ) -> Vec<InstanceId> {
        let mut candidates: Vec<(u32, InstanceId)> = self
            .items
            .iter()
            .filter(|item| {
                item.item_id == item_id && item.location == location && item.quantity < max_stack_size
            })
            .map(|item| (item.quantity, item.id))
            .collect();
        candidates.sort_by_key(|(quantity, _)| *quantity);

        let mut remaining = quantity;
        let mut touched = Vec::new();

        // Phase 1: Top up existing stacks
        for (_, id) in candidates {
            if remaining == 0 {
                break;
            }
            if let Some(stack) = self.items.get_mut(id) {
                let overflow = stack.add(remaining, max_stack_size);
                if overflow < remaining {
                    touched.push(id);
                }
                remaining = overflow;
            }
        }

        // Phase 2: New stacks for the remainder
        if remaining > 0 {
            touched.extend(self.create_new_stacks(item_id, remaining, location, max_stack_size));
        }

        touched
    }

    /// Pours smaller stacks into larger ones until at most one is partial
    pub fn consolidate(&mut self, item_id: &str, location: Location, max_stack_size: u32) {
        let mut stacks: Vec<(u32, InstanceId)> = self
            .items
            .iter()
            .filter(|item| item.item_id == item_id && item.location == location)
            .map(|item| (item.quantity, item.id))
            .collect();
        if stacks.len() < 2 {
            return;
        }
        stacks.sort_by(|a, b| b.0.cmp(&a.0));

        let mut front = 0;
        let mut back = stacks.len() - 1;
        while front < back {
            let (target, source) = (stacks[front].1, stacks[back].1);
            self.transfer_to_stack(source, target, u32::MAX, max_stack_size);

            let target_full = self.items.get(target).is_none_or(|t| t.space_left(max_stack_size) == 0);
            let source_empty = self.items.get(source).is_none_or(Self::should_remove_stack);
            if target_full {
                front += 1;
            }
            if source_empty {
                back -= 1;
            }
        }

        self.remove_empty_stacks();
    }

    /// Purges zero-quantity stacks, returning how many were removed
    pub fn remove_empty_stacks(&mut self) -> usize {
        let before = self.items.len();
        self.items.retain(|item| !Self::should_remove_stack(item));
        before - self.items.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn quantities(items: &ItemCollection, location: Location) -> Vec<u32> {
        items
            .iter()
            .filter(|item| item.location == location)
            .map(|item| item.quantity)
            .collect()
    }

    #[test]
    fn test_fill_smallest_stack_first() {
        let mut items = ItemCollection::new();
        let large = items.spawn("potion", 7, Location::Bag);
        let small = items.spawn("potion", 3, Location::Bag);

        let touched = StackingService::new(&mut items).add_to_existing_or_create_new("potion", 2, Location::Bag, 10);

        assert_eq!(touched, vec![small]);
        assert_eq!(items.get(small).unwrap().quantity, 5);
        assert_eq!(items.get(large).unwrap().quantity, 7);
    }

    #[test]
    fn test_fill_spills_into_new_stacks() {
        let mut items = ItemCollection::new();
        items.spawn("potion", 8, Location::Bag);
        items.spawn("potion", 4, Location::Storage);

        let touched = StackingService::new(&mut items).add_to_existing_or_create_new("potion", 15, Location::Bag, 10);

        assert_eq!(touched.len(), 3);
        assert_eq!(quantities(&items, Location::Bag), vec![10, 10, 3]);
        assert_eq!(quantities(&items, Location::Storage), vec![4]);
    }

    #[test]
    fn test_create_new_stacks_partial_last() {
        let mut items = ItemCollection::new();
        let created = StackingService::new(&mut items).create_new_stacks("herb", 25, Location::Storage, 10);

        assert_eq!(created.len(), 3);
        assert_eq!(quantities(&items, Location::Storage), vec![10, 10, 5]);
    }

    #[test]
    fn test_transfer_limited_by_target_space() {
        let mut items = ItemCollection::new();
        let source = items.spawn("potion", 6, Location::Bag);
        let target = items.spawn("potion", 8, Location::Storage);

        let moved = StackingService::new(&mut items).transfer_to_stack(source, target, 5, 10);

        assert_eq!(moved, 2);
        assert_eq!(items.get(source).unwrap().quantity, 4);
        assert_eq!(items.get(target).unwrap().quantity, 10);
    }

    #[test]
    fn test_split_rejects_whole_or_empty_amounts() {
        let mut items = ItemCollection::new();
        let source = items.spawn("potion", 5, Location::Bag);
        let mut stacking = StackingService::new(&mut items);

        assert_eq!(stacking.split_stack(source, 0), None);
        assert_eq!(stacking.split_stack(source, 5), None);
        assert_eq!(stacking.split_stack(source, 9), None);
        assert_eq!(items.len(), 1);
        assert_eq!(items.get(source).unwrap().quantity, 5);
    }

    #[test]
    fn test_split_then_merge_restores_stack() {
        let mut items = ItemCollection::new();
        let source = items.spawn("potion", 9, Location::Bag);

        let piece = StackingService::new(&mut items).split_stack(source, 4).unwrap();
        assert_eq!(items.get(source).unwrap().quantity, 5);
        assert_eq!(items.get(piece).unwrap().quantity, 4);

        let piece = items.remove(piece).unwrap();
        StackingService::new(&mut items).add_to_existing_or_create_new("potion", piece.quantity, Location::Bag, 10);

        assert_eq!(quantities(&items, Location::Bag), vec![9]);
    }

    #[test]
    fn test_consolidate_leaves_one_partial_stack() {
        let mut items = ItemCollection::new();
        items.spawn("potion", 3, Location::Bag);
        items.spawn("potion", 6, Location::Bag);
        items.spawn("potion", 4, Location::Bag);
        items.spawn("potion", 2, Location::Storage);

        StackingService::new(&mut items).consolidate("potion", Location::Bag, 10);

        let mut bag = quantities(&items, Location::Bag);
        bag.sort();
        assert_eq!(bag, vec![3, 10]);
        assert_eq!(quantities(&items, Location::Storage), vec![2]);
    }

    #[test]
    fn test_find_stack_with_space() {
        let mut items = ItemCollection::new();
        items.spawn("potion", 10, Location::Bag);
        let open = items.spawn("potion", 2, Location::Bag);
        let stacking = StackingService::new(&mut items);

        assert_eq!(stacking.find_stack_with_space("potion", Location::Bag, 10), Some(open));
        assert_eq!(stacking.find_stack_with_space("potion", Location::Storage, 10), None);
    }
}
