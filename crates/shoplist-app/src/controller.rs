#![forbid(unsafe_code)]

//! Controllers: store subscriptions, interaction routing, and the edit flow.
//!
//! [`ListController`] drives the main screen. It subscribes to the store and
//! submits every snapshot to its [`ListView`] in arrival order. Interactions
//! coming out of view handles are not acted on inline; they are queued as
//! messages and drained afterwards, so a long-press that edits the store
//! never re-enters the view while it is still borrowed for the interaction.
//!
//! [`EditorController`] drives the add/edit screen: look up, add, edit.
//!
//! # Invariants
//!
//! 1. Snapshots are submitted in the order the store publishes them; a later
//!    snapshot supersedes an earlier one.
//! 2. Dropping a controller drops its subscription; the store side stops
//!    delivering immediately.
//! 3. A long-press on a visible row toggles that item's `enabled` flag in
//!    the store; the resulting snapshot round-trips back into the view
//!    before the interaction call returns.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;

use shoplist_core::{Item, ItemId, ShopStore, StoreError, Subscription};
use shoplist_view::{ListView, ViewError};

use crate::usecase::{DeleteItem, EditItem, GetItem};

enum ListMsg {
    Activated(Item),
    LongPressed(Item),
}

/// Main-screen controller: store → reconciler → view, plus interactions.
pub struct ListController {
    store: ShopStore,
    view: Rc<RefCell<ListView>>,
    queue: Rc<RefCell<VecDeque<ListMsg>>>,
    on_activated: Option<Rc<dyn Fn(&Item)>>,
    edit_item: EditItem,
    delete_item: DeleteItem,
    _subscription: Subscription,
}

impl ListController {
    /// Wire a view to a store. The view's interaction callbacks are claimed
    /// by the controller; the current store snapshot is submitted before
    /// this returns.
    #[must_use]
    pub fn new(store: ShopStore, mut view: ListView) -> Self {
        let queue = Rc::new(RefCell::new(VecDeque::new()));

        let q = Rc::clone(&queue);
        view.on_item_activated(move |item| {
            q.borrow_mut().push_back(ListMsg::Activated(item.clone()));
        });
        let q = Rc::clone(&queue);
        view.on_item_long_pressed(move |item| {
            q.borrow_mut().push_back(ListMsg::LongPressed(item.clone()));
        });

        let view = Rc::new(RefCell::new(view));
        let sink = Rc::clone(&view);
        let subscription = store.subscribe(move |snapshot| {
            if let Err(err) = sink.borrow_mut().submit(snapshot) {
                // DuplicateItem cannot come out of the store (ids are
                // unique); UnknownViewType is a pool setup bug.
                tracing::error!(%err, "snapshot rejected by list view");
            }
        });

        Self {
            edit_item: EditItem::new(store.clone()),
            delete_item: DeleteItem::new(store.clone()),
            store,
            view,
            queue,
            on_activated: None,
            _subscription: subscription,
        }
    }

    /// Set the handler invoked when a row is activated (typically: open the
    /// editor for that item).
    pub fn on_item_activated(&mut self, callback: impl Fn(&Item) + 'static) {
        self.on_activated = Some(Rc::new(callback));
    }

    /// Run `f` against the view. Do not mutate the store from inside `f`.
    pub fn with_view<R>(&self, f: impl FnOnce(&ListView) -> R) -> R {
        f(&self.view.borrow())
    }

    /// The currently displayed sequence.
    #[must_use]
    pub fn displayed(&self) -> Vec<Item> {
        self.view.borrow().displayed().to_vec()
    }

    /// Scroll the view.
    pub fn scroll_to(&self, offset: usize) -> Result<(), ViewError> {
        self.view.borrow_mut().scroll_to(offset)
    }

    /// Deliver a primary activation to the row at `position`. Returns
    /// whether the position was visible.
    pub fn tap(&self, position: usize) -> bool {
        let delivered = self.view.borrow().activate(position);
        self.pump();
        delivered
    }

    /// Deliver a long-press to the row at `position`, toggling the item's
    /// `enabled` flag. Returns whether the interaction was handled.
    pub fn long_press(&self, position: usize) -> bool {
        let handled = self.view.borrow().long_press(position);
        self.pump();
        handled
    }

    /// Delete an item.
    pub fn delete(&self, id: ItemId) -> Result<Item, StoreError> {
        self.delete_item.run(id)
    }

    /// Flip an item's `enabled` flag.
    pub fn toggle_enabled(&self, id: ItemId) -> Result<(), StoreError> {
        let item = self.store.get(id)?;
        self.edit_item.run(item.toggled())
    }

    /// Drain queued interaction messages. The view is not borrowed while a
    /// message is processed, so handlers are free to mutate the store.
    fn pump(&self) {
        loop {
            let msg = self.queue.borrow_mut().pop_front();
            let Some(msg) = msg else { break };
            match msg {
                ListMsg::Activated(item) => {
                    if let Some(cb) = &self.on_activated {
                        cb(&item);
                    }
                }
                ListMsg::LongPressed(item) => {
                    if let Err(err) = self.edit_item.run(item.toggled()) {
                        tracing::warn!(%err, "toggle for long-pressed item failed");
                    }
                }
            }
        }
    }
}

impl std::fmt::Debug for ListController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ListController")
            .field("items", &self.store.len())
            .finish()
    }
}

/// Editor-screen controller: add, edit, and look up single items.
#[derive(Clone)]
pub struct EditorController {
    add: crate::usecase::AddItem,
    edit: EditItem,
    get: GetItem,
}

impl EditorController {
    /// Bind the editor to a store.
    #[must_use]
    pub fn new(store: ShopStore) -> Self {
        Self {
            add: crate::usecase::AddItem::new(store.clone()),
            edit: EditItem::new(store.clone()),
            get: GetItem::new(store),
        }
    }

    /// Add a new item; it starts enabled.
    pub fn add(&self, name: impl Into<String>, count: u32) -> Item {
        self.add.run(name, count)
    }

    /// Store edited content for an existing item.
    pub fn edit(&self, item: Item) -> Result<(), StoreError> {
        self.edit.run(item)
    }

    /// Load an item for editing.
    pub fn load(&self, id: ItemId) -> Result<Item, StoreError> {
        self.get.run(id)
    }
}
