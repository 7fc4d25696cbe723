#![forbid(unsafe_code)]

//! The shopping-list item: the sole entity of the data model.
//!
//! # Invariants
//!
//! 1. **Stable identity**: [`ItemId`] uniquely identifies an item across its
//!    lifetime. Every other field may change without changing identity.
//! 2. **Structural content equality**: `PartialEq` compares all fields.
//!    Downstream diffing matches identity by id and decides
//!    changed-vs-unchanged by full structural equality.
//! 3. New items start `enabled = true`.

use std::fmt;

/// Unique, stable identifier for an [`Item`].
///
/// Assigned once by the store at creation and never reused, even after the
/// item is deleted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ItemId(pub u64);

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A single shopping-list entry.
///
/// Identity lives in [`id`](Item::id); `name`, `count`, and `enabled` are
/// content and may be edited freely.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Item {
    /// Stable identity, assigned by the store.
    pub id: ItemId,
    /// Display name.
    pub name: String,
    /// Quantity to buy.
    pub count: u32,
    /// Whether the entry is active. Disabled entries render differently.
    pub enabled: bool,
}

impl Item {
    /// Create an item with the given identity. New items are enabled.
    #[must_use]
    pub fn new(id: ItemId, name: impl Into<String>, count: u32) -> Self {
        Self {
            id,
            name: name.into(),
            count,
            enabled: true,
        }
    }

    /// Copy of this item with `enabled` set to the given value.
    #[must_use]
    pub fn with_enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    /// Copy of this item with `enabled` flipped.
    #[must_use]
    pub fn toggled(self) -> Self {
        let enabled = !self.enabled;
        self.with_enabled(enabled)
    }
}

impl fmt::Display for Item {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} x{}", self.id, self.name, self.count)?;
        if !self.enabled {
            write!(f, " (disabled)")?;
        }
        Ok(())
    }
}
