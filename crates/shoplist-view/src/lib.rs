#![forbid(unsafe_code)]

//! Rendering side of shoplist: view types, reusable handles, the bounded
//! recycling pool, and the [`ListView`] that ties them to the reconciler.
//!
//! Items render through one of two templates selected purely by their
//! `enabled` flag. A [`ViewHandle`] is the reusable per-row resource; the
//! [`HandlePool`] keeps a bounded free list per view type so scrolled-out
//! rows are recycled instead of rebuilt.
//!
//! # Invariants
//!
//! 1. A handle of view type T is only ever bound to an item whose resolved
//!    view type is T. When an item's `enabled` flag flips, the old handle is
//!    released and a handle of the correct type acquired; handles are never
//!    rebound across types.
//! 2. After any submit or scroll, every visible position's handle view type
//!    matches the item at that position.
//! 3. Binding overwrites both callback slots; recycled handles never carry
//!    stale callbacks or stale item references.
//! 4. All operations are synchronous; nothing blocks.

pub mod handle;
pub mod list_view;
pub mod pool;
pub mod view_type;

pub use handle::{ItemCallback, ViewHandle};
pub use list_view::ListView;
pub use pool::HandlePool;
pub use view_type::ViewType;

use shoplist_core::ItemId;

/// Errors from the rendering side.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewError {
    /// No handle template is registered for the requested view type. This is
    /// a setup bug, not a runtime condition: the pool must be configured with
    /// a template per view type before anything renders.
    UnknownViewType(ViewType),
    /// A submitted snapshot repeated an item id; the displayed sequence was
    /// retained.
    DuplicateItem(ItemId),
}

impl std::fmt::Display for ViewError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UnknownViewType(vt) => write!(f, "no template registered for view type {vt}"),
            Self::DuplicateItem(id) => write!(f, "duplicate item {id} in submitted snapshot"),
        }
    }
}

impl std::error::Error for ViewError {}

impl From<shoplist_reconcile::ReconcileError<ItemId>> for ViewError {
    fn from(err: shoplist_reconcile::ReconcileError<ItemId>) -> Self {
        match err {
            shoplist_reconcile::ReconcileError::DuplicateKey(id) => Self::DuplicateItem(id),
        }
    }
}
