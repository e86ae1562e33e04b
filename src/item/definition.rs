use serde::{Serialize, Deserialize};
use super::properties::ItemProperties;

/// The blueprint for an item type
///
/// This defines the static properties of an item that are shared
/// across all instances. Think of it as the "class" and ItemInstance
/// as the "instance".
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemDefinition {
    /// Unique identifier (used for lookups and saves)
    pub id: String,

    /// Display name shown in UI
    pub name: String,

    /// Description shown in tooltips
    pub description: String,

    /// Whether several units can share one instance
    pub is_stackable: bool,

    /// Maximum stack size (ignored when not stackable)
    pub max_stack_size: u32,

    /// Item-specific properties and behaviors
    pub properties: ItemProperties,
}

impl ItemDefinition {
    /// Creates a new stackable item definition
    pub fn stackable(
        id: impl Into<String>,
        name: impl Into<String>,
        max_stack_size: u32,
        properties: ItemProperties,
    ) -> Self {
        ItemDefinition {
            id: id.into(),
            name: name.into(),
            description: String::new(),
            is_stackable: true,
            max_stack_size,
            properties,
        }
    }

    /// Creates a new non-stackable item definition
    pub fn single(
        id: impl Into<String>,
        name: impl Into<String>,
        properties: ItemProperties,
    ) -> Self {
        ItemDefinition {
            id: id.into(),
            name: name.into(),
            description: String::new(),
            is_stackable: false,
            max_stack_size: 1,
            properties,
        }
    }

    /// Sets the tooltip description
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// The stack limit the engine actually enforces
    ///
    /// Non-stackable items (and definitions with a zero limit) hold one
    /// unit per instance.
    pub fn effective_max_stack(&self) -> u32 {
        if self.is_stackable {
            self.max_stack_size.max(1)
        } else {
            1
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_effective_max_stack() {
        let potion = ItemDefinition::stackable("potion", "Potion", 10, ItemProperties::Material);
        assert_eq!(potion.effective_max_stack(), 10);

        let sword = ItemDefinition::single("sword", "Sword", ItemProperties::Material);
        assert_eq!(sword.effective_max_stack(), 1);

        let broken = ItemDefinition::stackable("dust", "Dust", 0, ItemProperties::Material);
        assert_eq!(broken.effective_max_stack(), 1);
    }
}
