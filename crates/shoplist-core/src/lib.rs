#![forbid(unsafe_code)]

//! Core data model for shoplist: items, the in-memory store, and the
//! snapshot feed that downstream consumers subscribe to.
//!
//! The store is the single writer. Every mutation produces a full ordered
//! snapshot that is pushed to all live subscribers; consumers never receive
//! incremental mutation events. Diffing against the previous snapshot is the
//! consumer's job (see the `shoplist-reconcile` crate).
//!
//! # Concurrency Model
//!
//! Single-threaded shared ownership via `Rc<RefCell<..>>`. [`ShopStore`] is
//! cheap to clone; clones share the same underlying state. Subscriptions are
//! RAII guards that unsubscribe on drop.

pub mod feed;
pub mod item;
pub mod store;

pub use feed::{SnapshotFeed, Subscription};
pub use item::{Item, ItemId};
pub use store::{ShopStore, StoreError};
