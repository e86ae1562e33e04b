//! Save/Load records for the inventory
//!
//! This module provides the persistence boundary of the inventory:
//! - A flat, JSON-friendly record of items and capacities
//! - Idempotent load-time migration (including version 1 boolean flags)
//! - JSON helpers; file I/O and backups belong to the shell
//!
//! # Example Usage
//!
//! ```ignore
//! // Save
//! let json = core.to_save_data().to_json_pretty()?;
//!
//! // Load
//! let data = InventorySaveData::from_json(&json)?;
//! let report = core.load_save_data(data, &registry)?;
//! ```

pub mod migration;
pub mod types;

// Re-export commonly used types
pub use migration::MigrationReport;
pub use types::*;
