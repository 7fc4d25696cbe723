#![forbid(unsafe_code)]

//! Public facade for the shoplist crates.
//!
//! Re-exports the data model (`shoplist-core`), the keyed diff engine
//! (`shoplist-reconcile`), the rendering side (`shoplist-view`), and the
//! application layer (`shoplist-app`) under one roof. Depend on this crate
//! unless you need exactly one layer.

pub use shoplist_app::{AddItem, DeleteItem, EditItem, EditorController, GetItem, ListController};
pub use shoplist_core::{Item, ItemId, ShopStore, SnapshotFeed, StoreError, Subscription};
pub use shoplist_reconcile::{ChangeOp, ChangeSet, Keyed, ReconcileError, Reconciler};
pub use shoplist_view::{HandlePool, ItemCallback, ListView, ViewError, ViewHandle, ViewType};

/// Everything a typical embedding needs.
pub mod prelude {
    pub use shoplist_app::{EditorController, ListController};
    pub use shoplist_core::{Item, ItemId, ShopStore};
    pub use shoplist_view::{HandlePool, ListView, ViewType};
}
