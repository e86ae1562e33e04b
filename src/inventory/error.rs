use crate::item::{InstanceId, Location};
use thiserror::Error;

/// Closed set of failure categories callers branch on
///
/// UI code should match on this (e.g. offer a storage upgrade on
/// `StorageFull`) instead of parsing messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    DatabaseMissing,
    ItemNotFound,
    NoSpace,
    BagFull,
    StorageFull,
    InsufficientQuantity,
    InvalidOperation,
    AlreadyInLocation,
    Unknown,
}

/// Errors that can occur during inventory operations
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InventoryError {
    /// The item catalog has not been loaded
    #[error("Item database is not loaded")]
    DatabaseMissing,

    /// Item ID doesn't exist in the catalog
    #[error("Unknown item id: {0}")]
    UnknownItem(String),

    /// Instance handle doesn't resolve (removed, merged, or never existed)
    #[error("Item {0} is not in the inventory")]
    InstanceNotFound(InstanceId),

    /// Neither the bag nor storage can take the item
    #[error("No space in bag or storage for {item_id}")]
    NoSpace { item_id: String },

    /// Bag has no room for the move
    #[error("Bag is full ({max_slots} slots)")]
    BagFull {
        max_slots: usize,
        item: Option<InstanceId>,
    },

    /// Storage has no room for the add or move
    #[error("Storage is full ({max_slots} slots), {completed} of {requested} handled")]
    StorageFull {
        max_slots: usize,
        requested: u32,
        completed: u32,
        item: Option<InstanceId>,
    },

    /// Tried to remove or move more items than exist
    #[error("Insufficient quantity of {item_id} (requested: {requested}, available: {available})")]
    InsufficientQuantity {
        item_id: String,
        requested: u32,
        available: u32,
        item: Option<InstanceId>,
    },

    /// Request makes no sense for the current state (zero quantity, empty id, ...)
    #[error("Invalid operation: {0}")]
    InvalidOperation(String),

    /// Item is already where it was asked to go
    #[error("Item {item} is already in {location}")]
    AlreadyInLocation {
        item: InstanceId,
        location: Location,
    },

    #[error("Unexpected inventory failure: {0}")]
    Unknown(String),
}

impl InventoryError {
    /// The category of this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            InventoryError::DatabaseMissing => ErrorKind::DatabaseMissing,
            InventoryError::UnknownItem(_) | InventoryError::InstanceNotFound(_) => {
                ErrorKind::ItemNotFound
            }
            InventoryError::NoSpace { .. } => ErrorKind::NoSpace,
            InventoryError::BagFull { .. } => ErrorKind::BagFull,
            InventoryError::StorageFull { .. } => ErrorKind::StorageFull,
            InventoryError::InsufficientQuantity { .. } => ErrorKind::InsufficientQuantity,
            InventoryError::InvalidOperation(_) => ErrorKind::InvalidOperation,
            InventoryError::AlreadyInLocation { .. } => ErrorKind::AlreadyInLocation,
            InventoryError::Unknown(_) => ErrorKind::Unknown,
        }
    }

    /// The instance this error is about, when there is one
    pub fn item(&self) -> Option<InstanceId> {
        match self {
            InventoryError::InstanceNotFound(id) => Some(*id),
            InventoryError::AlreadyInLocation { item, .. } => Some(*item),
            InventoryError::BagFull { item, .. }
            | InventoryError::StorageFull { item, .. }
            | InventoryError::InsufficientQuantity { item, .. } => *item,
            _ => None,
        }
    }
}

/// Successful outcome of a mutating inventory operation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InventoryOutcome {
    /// Human-readable summary for logs and toasts
    pub message: String,

    /// The instance most affected by the operation, if it still exists
    pub item: Option<InstanceId>,

    /// How many units were handled
    pub quantity: u32,
}

impl InventoryOutcome {
    pub(crate) fn new(message: impl Into<String>, item: Option<InstanceId>, quantity: u32) -> Self {
        InventoryOutcome {
            message: message.into(),
            item,
            quantity,
        }
    }
}

/// Result returned by every mutating inventory operation
pub type InventoryResult = Result<InventoryOutcome, InventoryError>;

/// Escape hatch for call sites where failure means a broken game state
pub trait InventoryResultExt {
    /// Returns the outcome, or aborts with the error kind and message
    ///
    /// Use only where a failure is an unrecoverable bug, such as granting
    /// a quest-critical item.
    fn throw_if_failed(self) -> InventoryOutcome;
}

impl InventoryResultExt for InventoryResult {
    fn throw_if_failed(self) -> InventoryOutcome {
        match self {
            Ok(outcome) => outcome,
            Err(e) => panic!("Inventory operation failed ({:?}): {}", e.kind(), e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kinds_cover_lookup_failures() {
        assert_eq!(InventoryError::UnknownItem("x".into()).kind(), ErrorKind::ItemNotFound);
        assert_eq!(InventoryError::InstanceNotFound(InstanceId(3)).kind(), ErrorKind::ItemNotFound);
        assert_eq!(InventoryError::DatabaseMissing.kind(), ErrorKind::DatabaseMissing);
    }

    #[test]
    fn test_item_reference() {
        let err = InventoryError::AlreadyInLocation {
            item: InstanceId(7),
            location: Location::Bag,
        };
        assert_eq!(err.item(), Some(InstanceId(7)));
        assert_eq!(err.to_string(), "Item #7 is already in bag");
        assert_eq!(InventoryError::NoSpace { item_id: "sword".into() }.item(), None);
    }

    #[test]
    fn test_throw_if_failed_passes_success_through() {
        let result: InventoryResult = Ok(InventoryOutcome::new("ok", None, 1));
        assert_eq!(result.throw_if_failed().quantity, 1);
    }

    #[test]
    #[should_panic(expected = "StorageFull")]
    fn test_throw_if_failed_panics_on_failure() {
        let result: InventoryResult = Err(InventoryError::StorageFull {
            max_slots: 0,
            requested: 1,
            completed: 0,
            item: None,
        });
        result.throw_if_failed();
    }
}
