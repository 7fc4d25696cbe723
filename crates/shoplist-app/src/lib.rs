#![forbid(unsafe_code)]

//! Application layer for shoplist: one-method use cases over the store and
//! the controllers that wire store snapshots into the list view.
//!
//! Every dependency is passed explicitly; there is no global store. A
//! controller owns its [`ShopStore`](shoplist_core::ShopStore) handle and
//! its store subscription, so dropping the controller detaches it cleanly.

pub mod controller;
pub mod usecase;

pub use controller::{EditorController, ListController};
pub use usecase::{AddItem, DeleteItem, EditItem, GetItem};
