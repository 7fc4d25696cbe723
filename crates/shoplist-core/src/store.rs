#![forbid(unsafe_code)]

//! In-memory ordered item store with snapshot publication.
//!
//! [`ShopStore`] is the single writer for the item sequence. Every mutation
//! (add, edit, delete) publishes a full snapshot through the embedded
//! [`SnapshotFeed`]. The store hands out value copies only; subscribers and
//! callers can never alias its internals.
//!
//! Store handles are cheap clones sharing one underlying state, so the store
//! can be passed explicitly to each consumer instead of living in a global.
//!
//! # Invariants
//!
//! 1. Ids are assigned from a monotonically increasing counter and never
//!    reused, even after deletion.
//! 2. Every successful mutation publishes exactly one snapshot.
//! 3. Failed mutations (unknown id) publish nothing and change nothing.
//! 4. `subscribe` replays the current snapshot to the new subscriber alone,
//!    immediately, then delivers every future one. Existing subscribers are
//!    not notified by a registration.
//!
//! # Failure Modes
//!
//! | Failure | Cause | Behavior |
//! |---------|-------|----------|
//! | `UnknownItem` on edit | Id never existed or was deleted | `Err`, no snapshot |
//! | `UnknownItem` on delete | Same | `Err`, no snapshot |
//! | `UnknownItem` on get | Same | `Err` |

use std::cell::RefCell;
use std::rc::Rc;

use crate::feed::{SnapshotFeed, Subscription};
use crate::item::{Item, ItemId};

/// Errors from store operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// The given id does not name a live item.
    UnknownItem(ItemId),
}

impl std::fmt::Display for StoreError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UnknownItem(id) => write!(f, "unknown item {id}"),
        }
    }
}

impl std::error::Error for StoreError {}

/// Shared handle to the in-memory item store.
///
/// Cloning a `ShopStore` clones the handle, not the data: all clones see and
/// mutate the same sequence.
#[derive(Clone, Default)]
pub struct ShopStore {
    inner: Rc<RefCell<StoreInner>>,
    feed: Rc<SnapshotFeed>,
}

#[derive(Default)]
struct StoreInner {
    items: Vec<Item>,
    next_id: u64,
}

impl ShopStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a new item with a fresh unique id. The item starts enabled.
    ///
    /// Returns the stored item (including its assigned id) and publishes a
    /// snapshot.
    pub fn add(&self, name: impl Into<String>, count: u32) -> Item {
        let item = {
            let mut inner = self.inner.borrow_mut();
            let id = ItemId(inner.next_id);
            inner.next_id += 1;
            let item = Item::new(id, name, count);
            inner.items.push(item.clone());
            item
        };
        self.publish();
        item
    }

    /// Replace the stored item that shares `item.id`.
    ///
    /// Any field may change, including `enabled`. The item keeps its position
    /// in the sequence.
    pub fn edit(&self, item: Item) -> Result<(), StoreError> {
        {
            let mut inner = self.inner.borrow_mut();
            let slot = inner
                .items
                .iter_mut()
                .find(|existing| existing.id == item.id)
                .ok_or(StoreError::UnknownItem(item.id))?;
            *slot = item;
        }
        self.publish();
        Ok(())
    }

    /// Remove the item with the given id, returning it.
    pub fn delete(&self, id: ItemId) -> Result<Item, StoreError> {
        let removed = {
            let mut inner = self.inner.borrow_mut();
            let index = inner
                .items
                .iter()
                .position(|item| item.id == id)
                .ok_or(StoreError::UnknownItem(id))?;
            inner.items.remove(index)
        };
        self.publish();
        Ok(removed)
    }

    /// Look up an item by id.
    pub fn get(&self, id: ItemId) -> Result<Item, StoreError> {
        self.inner
            .borrow()
            .items
            .iter()
            .find(|item| item.id == id)
            .cloned()
            .ok_or(StoreError::UnknownItem(id))
    }

    /// Current ordered sequence, as a value copy.
    #[must_use]
    pub fn snapshot(&self) -> Vec<Item> {
        self.inner.borrow().items.clone()
    }

    /// Number of items.
    #[must_use]
    pub fn len(&self) -> usize {
        self.inner.borrow().items.len()
    }

    /// Whether the store holds no items.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.inner.borrow().items.is_empty()
    }

    /// Subscribe to snapshots.
    ///
    /// The callback fires once immediately with the current sequence, then
    /// once per future mutation. The replay goes to the new callback only;
    /// existing subscribers see nothing. Drop the returned guard to
    /// unsubscribe.
    pub fn subscribe(&self, callback: impl Fn(&[Item]) + 'static) -> Subscription {
        callback(&self.snapshot());
        self.feed.subscribe(callback)
    }

    fn publish(&self) {
        let snapshot = self.snapshot();
        self.feed.publish(&snapshot);
    }
}

impl std::fmt::Debug for ShopStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ShopStore")
            .field("len", &self.len())
            .field("feed", &self.feed)
            .finish()
    }
}
