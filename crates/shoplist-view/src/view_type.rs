#![forbid(unsafe_code)]

//! View-type resolution: which of the two row templates an item uses.

use std::fmt;

use shoplist_core::Item;

/// Tag selecting which visual template a handle renders.
///
/// Resolution is a pure function of the item's `enabled` flag and of nothing
/// else; two items with equal `enabled` always resolve to the same type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ViewType {
    /// Template for active entries.
    Enabled,
    /// Template for struck-out / inactive entries.
    Disabled,
}

impl ViewType {
    /// Resolve the view type for an item.
    #[must_use]
    pub fn of(item: &Item) -> Self {
        if item.enabled {
            Self::Enabled
        } else {
            Self::Disabled
        }
    }

    /// Both view types, for pool setup loops.
    #[must_use]
    pub const fn all() -> [Self; 2] {
        [Self::Enabled, Self::Disabled]
    }
}

impl fmt::Display for ViewType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Enabled => write!(f, "enabled"),
            Self::Disabled => write!(f, "disabled"),
        }
    }
}
