#![forbid(unsafe_code)]

//! The reusable per-row render resource.
//!
//! A [`ViewHandle`] is bound to at most one item at a time. Binding writes
//! the item's display fields into the handle and overwrites both interaction
//! callback slots; nothing accumulates across binds, so a recycled handle is
//! indistinguishable from a fresh one after [`reset`](ViewHandle::reset).
//!
//! # Invariants
//!
//! 1. `bind` requires the handle's view type to match the item's resolved
//!    view type (debug-asserted; the list view upholds it in release builds).
//! 2. `bind` is repeat-safe: binding a different item fully replaces the
//!    previous item's fields and callbacks.
//! 3. `long_press` always reports the interaction as handled, suppressing
//!    any fallback interaction the host might otherwise run.

use std::rc::Rc;

use shoplist_core::Item;

use crate::view_type::ViewType;

/// Callback invoked with the item bound to the handle at interaction time.
pub type ItemCallback = Rc<dyn Fn(&Item)>;

/// A reusable render resource tagged with its view type.
#[derive(Clone)]
pub struct ViewHandle {
    view_type: ViewType,
    name: String,
    count_text: String,
    bound: Option<Item>,
    on_activate: Option<ItemCallback>,
    on_long_press: Option<ItemCallback>,
}

impl ViewHandle {
    /// Create an unbound handle for the given view type.
    #[must_use]
    pub fn new(view_type: ViewType) -> Self {
        Self {
            view_type,
            name: String::new(),
            count_text: String::new(),
            bound: None,
            on_activate: None,
            on_long_press: None,
        }
    }

    /// The template tag this handle was created for. Fixed for the handle's
    /// lifetime.
    #[must_use]
    pub fn view_type(&self) -> ViewType {
        self.view_type
    }

    /// Bind an item to this handle.
    ///
    /// Writes the display fields and replaces both callback slots. The
    /// caller must hand over a handle whose view type matches the item.
    pub fn bind(
        &mut self,
        item: &Item,
        on_activate: Option<ItemCallback>,
        on_long_press: Option<ItemCallback>,
    ) {
        debug_assert_eq!(
            self.view_type,
            ViewType::of(item),
            "handle bound across view types"
        );
        self.name = item.name.clone();
        self.count_text = item.count.to_string();
        self.bound = Some(item.clone());
        self.on_activate = on_activate;
        self.on_long_press = on_long_press;
    }

    /// Clear all bind state. Called by the pool on release so recycled
    /// handles carry nothing over.
    pub fn reset(&mut self) {
        self.name.clear();
        self.count_text.clear();
        self.bound = None;
        self.on_activate = None;
        self.on_long_press = None;
    }

    /// Displayed name field.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Displayed count field.
    #[must_use]
    pub fn count_text(&self) -> &str {
        &self.count_text
    }

    /// The item currently bound, if any.
    #[must_use]
    pub fn bound_item(&self) -> Option<&Item> {
        self.bound.as_ref()
    }

    /// Whether a bind is active.
    #[must_use]
    pub fn is_bound(&self) -> bool {
        self.bound.is_some()
    }

    /// Primary activation (a short interaction). Invokes the primary
    /// callback with the bound item, if both are present.
    pub fn activate(&self) {
        if let (Some(cb), Some(item)) = (&self.on_activate, &self.bound) {
            cb(item);
        }
    }

    /// Sustained/alternate activation. Invokes the secondary callback with
    /// the bound item and always reports the interaction handled.
    pub fn long_press(&self) -> bool {
        if let (Some(cb), Some(item)) = (&self.on_long_press, &self.bound) {
            cb(item);
        }
        true
    }
}

impl std::fmt::Debug for ViewHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ViewHandle")
            .field("view_type", &self.view_type)
            .field("name", &self.name)
            .field("count_text", &self.count_text)
            .field("bound", &self.bound.as_ref().map(|item| item.id))
            .finish()
    }
}
