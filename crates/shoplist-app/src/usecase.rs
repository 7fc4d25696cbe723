#![forbid(unsafe_code)]

//! One-method use cases over the store.
//!
//! Each use case owns a store handle passed at construction. They add
//! nothing beyond routing and logging today; they exist so controllers and
//! future callers depend on a named operation rather than on the whole
//! store surface.

use shoplist_core::{Item, ItemId, ShopStore, StoreError};

/// Add a new item to the list.
#[derive(Clone)]
pub struct AddItem {
    store: ShopStore,
}

impl AddItem {
    /// Bind the use case to a store.
    #[must_use]
    pub fn new(store: ShopStore) -> Self {
        Self { store }
    }

    /// Create and store an item, returning it with its assigned id.
    pub fn run(&self, name: impl Into<String>, count: u32) -> Item {
        let item = self.store.add(name, count);
        tracing::debug!(id = item.id.0, name = %item.name, "item added");
        item
    }
}

/// Replace an existing item's content.
#[derive(Clone)]
pub struct EditItem {
    store: ShopStore,
}

impl EditItem {
    /// Bind the use case to a store.
    #[must_use]
    pub fn new(store: ShopStore) -> Self {
        Self { store }
    }

    /// Store the edited item under its existing id.
    pub fn run(&self, item: Item) -> Result<(), StoreError> {
        let id = item.id;
        self.store.edit(item)?;
        tracing::debug!(id = id.0, "item edited");
        Ok(())
    }
}

/// Remove an item by id.
#[derive(Clone)]
pub struct DeleteItem {
    store: ShopStore,
}

impl DeleteItem {
    /// Bind the use case to a store.
    #[must_use]
    pub fn new(store: ShopStore) -> Self {
        Self { store }
    }

    /// Delete and return the item.
    pub fn run(&self, id: ItemId) -> Result<Item, StoreError> {
        let item = self.store.delete(id)?;
        tracing::debug!(id = id.0, "item deleted");
        Ok(item)
    }
}

/// Look up an item by id.
#[derive(Clone)]
pub struct GetItem {
    store: ShopStore,
}

impl GetItem {
    /// Bind the use case to a store.
    #[must_use]
    pub fn new(store: ShopStore) -> Self {
        Self { store }
    }

    /// Fetch a copy of the item.
    pub fn run(&self, id: ItemId) -> Result<Item, StoreError> {
        self.store.get(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn add_edit_get_delete_round_trip() {
        let store = ShopStore::new();
        let add = AddItem::new(store.clone());
        let edit = EditItem::new(store.clone());
        let get = GetItem::new(store.clone());
        let delete = DeleteItem::new(store.clone());

        let item = add.run("Milk", 2);
        assert_eq!(get.run(item.id).unwrap(), item);

        let toggled = item.clone().toggled();
        edit.run(toggled.clone()).unwrap();
        assert_eq!(get.run(item.id).unwrap(), toggled);

        assert_eq!(delete.run(item.id).unwrap(), toggled);
        assert!(get.run(item.id).is_err());
    }

    #[test]
    fn use_cases_share_one_store() {
        let store = ShopStore::new();
        let add = AddItem::new(store.clone());
        let item = add.run("Bread", 1);
        assert_eq!(store.get(item.id).unwrap(), item);
    }

    #[test]
    fn edit_unknown_propagates() {
        let store = ShopStore::new();
        let edit = EditItem::new(store);
        let err = edit.run(Item::new(ItemId(7), "Ghost", 1)).unwrap_err();
        assert_eq!(err, StoreError::UnknownItem(ItemId(7)));
    }
}
