use serde::{Serialize, Deserialize};
use std::fmt;

/// Where an item instance currently lives
///
/// `None` only appears transiently while a failed placement is being
/// recovered; it is never a resting state and never persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Location {
    Bag,
    Storage,
    Pocket,
    Equipped,
    None,
}

impl Location {
    /// Returns true for locations whose slot count is limited by the engine
    pub fn is_capacity_limited(self) -> bool {
        matches!(self, Location::Bag | Location::Storage)
    }

    /// Returns true for locations an item can rest in between equips
    pub fn is_resting(self) -> bool {
        matches!(self, Location::Bag | Location::Storage | Location::Pocket)
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let name = match self {
            Location::Bag => "bag",
            Location::Storage => "storage",
            Location::Pocket => "pocket",
            Location::Equipped => "equipped",
            Location::None => "nowhere",
        };
        f.write_str(name)
    }
}

/// Handle for one item instance inside an `InventoryCore`
///
/// Ids are assigned in increasing order and never reused by the same
/// collection, so a stale id simply stops resolving.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct InstanceId(pub(crate) u64);

impl InstanceId {
    /// The raw numeric value (useful for UI keys)
    pub fn raw(self) -> u64 {
        self.0
    }
}

impl fmt::Display for InstanceId {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// One physical stack of a single item type
///
/// This represents a specific amount of an item type in one location.
/// It can be split/merged with other stacks of the same item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemInstance {
    /// Handle assigned by the owning collection
    pub id: InstanceId,

    /// ID of the item definition in the catalog
    pub item_id: String,

    /// How many of this item (1 to max_stack_size)
    pub quantity: u32,

    /// Current placement
    pub location: Location,

    /// Where the item was before being equipped
    pub previous_location: Option<Location>,
}

impl ItemInstance {
    pub(crate) fn new(id: InstanceId, item_id: impl Into<String>, quantity: u32, location: Location) -> Self {
        ItemInstance {
            id,
            item_id: item_id.into(),
            quantity,
            location,
            previous_location: None,
        }
    }

    /// Free units left before this stack hits `max_stack_size`
    pub fn space_left(&self, max_stack_size: u32) -> u32 {
        max_stack_size.saturating_sub(self.quantity)
    }

    /// Adds items to this stack
    ///
    /// Returns how many items couldn't fit (overflow)
    pub fn add(&mut self, amount: u32, max_stack_size: u32) -> u32 {
        let accepted = amount.min(self.space_left(max_stack_size));
        self.quantity += accepted;
        amount - accepted
    }

    /// Takes up to `amount` items from this stack
    ///
    /// Returns how many items were actually taken (might be less if stack is small)
    pub fn take(&mut self, amount: u32) -> u32 {
        let taken = amount.min(self.quantity);
        self.quantity -= taken;
        taken
    }

    /// Returns true if this stack is empty
    pub fn is_empty(&self) -> bool {
        self.quantity == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn instance(quantity: u32) -> ItemInstance {
        ItemInstance::new(InstanceId(1), "potion", quantity, Location::Bag)
    }

    #[test]
    fn test_add_returns_overflow() {
        let mut stack = instance(7);
        let overflow = stack.add(5, 10);
        assert_eq!(stack.quantity, 10);
        assert_eq!(overflow, 2);
    }

    #[test]
    fn test_add_over_full_stack_accepts_nothing() {
        let mut stack = instance(12);
        assert_eq!(stack.add(3, 10), 3);
        assert_eq!(stack.quantity, 12);
    }

    #[test]
    fn test_take_clamps_to_quantity() {
        let mut stack = instance(5);
        let taken = stack.take(10);
        assert_eq!(taken, 5);  // Only had 5 to take
        assert!(stack.is_empty());
    }

    #[test]
    fn test_location_flags() {
        assert!(Location::Bag.is_capacity_limited());
        assert!(!Location::Pocket.is_capacity_limited());
        assert!(Location::Pocket.is_resting());
        assert!(!Location::Equipped.is_resting());
        assert!(!Location::None.is_resting());
    }
}
