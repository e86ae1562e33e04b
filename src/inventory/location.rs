use super::collection::ItemCollection;
use super::query::QueryService;
use super::stacking::StackingService;
use crate::item::{InstanceId, ItemDefinition, Location};

/// Executes a move that the caller has already validated
///
/// Capacity is NOT checked here; `InventoryCore` does that before
/// calling in.
#[derive(Debug)]
pub struct LocationService<'a> {
    items: &'a mut ItemCollection,
    skill_prefix: &'a str,
}

impl<'a> LocationService<'a> {
    pub fn new(items: &'a mut ItemCollection, skill_prefix: &'a str) -> Self {
        LocationService { items, skill_prefix }
    }

    /// Moves `quantity` units of `source` to `target`
    ///
    /// # Strategy
    /// Stackable items first top up under-full stacks at the target. What
    /// is left either travels with the source instance itself (when it is
    /// everything the source still holds) or is split off and relocated.
    /// Non-stackable items are split only for partial moves.
    ///
    /// Returns false only for an unknown source or a zero quantity.
    pub fn move_item(
        &mut self,
        source: InstanceId,
        target: Location,
        quantity: u32,
        definition: &ItemDefinition,
    ) -> bool {
        let Some(stack) = self.items.get(source) else {
            log::warn!("Move requested for missing item {}", source);
            return false;
        };
        if quantity == 0 {
            return false;
        }
        let quantity = quantity.min(stack.quantity);

        if !definition.is_stackable {
            if quantity < stack.quantity {
                self.split_and_relocate(source, target, quantity);
            } else {
                self.relocate(source, target);
            }
            return true;
        }

        let max_stack_size = definition.effective_max_stack();
        let mut targets: Vec<(u32, InstanceId)> = QueryService::new(self.items, self.skill_prefix)
            .items_by_location(target)
            .into_iter()
            .filter(|item| {
                item.id != source && item.item_id == stack.item_id && item.quantity < max_stack_size
            })
            .map(|item| (item.quantity, item.id))
            .collect();
        targets.sort_by_key(|(quantity, _)| *quantity);

        let mut remaining = quantity;
        let mut stacking = StackingService::new(self.items);
        for (_, target_stack) in targets {
            if remaining == 0 {
                break;
            }
            remaining -= stacking.transfer_to_stack(source, target_stack, remaining, max_stack_size);
        }

        let source_left = self.items.get(source).map_or(0, |s| s.quantity);
        if remaining == 0 {
            if source_left == 0 {
                self.items.remove(source);
            }
        } else if remaining >= source_left {
            self.relocate(source, target);
        } else {
            self.split_and_relocate(source, target, remaining);
        }

        true
    }

    /// Changes an instance's location in place
    ///
    /// `previous_location` is only meaningful while equipped, so it is
    /// cleared for any other target.
    pub fn relocate(&mut self, source: InstanceId, target: Location) -> bool {
        let Some(stack) = self.items.get_mut(source) else {
            return false;
        };

        if target != Location::Equipped {
            stack.previous_location = None;
        }
        stack.location = target;
        true
    }

    fn split_and_relocate(&mut self, source: InstanceId, target: Location, quantity: u32) {
        if let Some(piece) = StackingService::new(self.items).split_stack(source, quantity) {
            self.relocate(piece, target);
        }
    }
}
