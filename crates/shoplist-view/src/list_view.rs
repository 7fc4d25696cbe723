#![forbid(unsafe_code)]

//! The list view: reconciler, pool, and viewport wired together.
//!
//! [`ListView`] is the render target for item snapshots. Each submitted
//! snapshot is diffed against the displayed sequence, then every visible
//! position is rebound: a position keeps reusing a handle of the right view
//! type, and when an item's resolved view type changed (its `enabled` flag
//! flipped), the stale handle goes back to the pool and a handle of the
//! correct type is acquired instead.
//!
//! Only visible positions hold handles; scrolling releases handles that
//! leave the viewport and binds the ones that enter it.
//!
//! # Invariants
//!
//! 1. After `submit` or `scroll_to` returns `Ok`, for every visible position
//!    `p`: `handle_at(p).view_type() == ViewType::of(&displayed()[p])` and
//!    the handle's display fields reflect the item at `p`.
//! 2. Submissions apply in call order; a later snapshot supersedes an
//!    earlier one unconditionally.
//! 3. The number of live handles never exceeds the viewport height.
//! 4. The scroll offset is clamped to the displayed sequence on every
//!    rebind; a non-empty sequence always yields a non-empty visible range,
//!    even when a snapshot shrinks past the previous offset.
//!
//! # Failure Modes
//!
//! | Failure | Cause | Behavior |
//! |---------|-------|----------|
//! | `DuplicateItem` | Repeated id in a snapshot | `Err`, displayed sequence and bindings retained |
//! | `UnknownViewType` | Pool missing a template | `Err`, fatal setup bug |

use std::ops::Range;
use std::rc::Rc;

use shoplist_core::{Item, ItemId};
use shoplist_reconcile::{ChangeSet, Reconciler};

use crate::ViewError;
use crate::handle::{ItemCallback, ViewHandle};
use crate::pool::HandlePool;
use crate::view_type::ViewType;

/// Scrollable list of items rendered through pooled dual-type handles.
pub struct ListView {
    reconciler: Reconciler<Item>,
    pool: HandlePool,
    viewport_height: usize,
    scroll_offset: usize,
    /// Handles for the visible positions; index 0 is `scroll_offset`.
    bound: Vec<ViewHandle>,
    on_activate: Option<ItemCallback>,
    on_long_press: Option<ItemCallback>,
}

impl ListView {
    /// Create a list view over the given pool, showing at most
    /// `viewport_height` rows at a time.
    #[must_use]
    pub fn new(pool: HandlePool, viewport_height: usize) -> Self {
        Self {
            reconciler: Reconciler::new(),
            pool,
            viewport_height,
            scroll_offset: 0,
            bound: Vec::new(),
            on_activate: None,
            on_long_press: None,
        }
    }

    /// Set the primary-activation callback. Applied to every bind from the
    /// next `submit` or `scroll_to` on.
    pub fn on_item_activated(&mut self, callback: impl Fn(&Item) + 'static) {
        self.on_activate = Some(Rc::new(callback));
    }

    /// Set the long-press callback. Applied like
    /// [`on_item_activated`](Self::on_item_activated).
    pub fn on_item_long_pressed(&mut self, callback: impl Fn(&Item) + 'static) {
        self.on_long_press = Some(Rc::new(callback));
    }

    /// The sequence as of the last successful submit.
    #[must_use]
    pub fn displayed(&self) -> &[Item] {
        self.reconciler.displayed()
    }

    /// Number of displayed items.
    #[must_use]
    pub fn len(&self) -> usize {
        self.reconciler.displayed().len()
    }

    /// Whether the displayed sequence is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.reconciler.displayed().is_empty()
    }

    /// Current scroll offset (index of the first visible position).
    #[must_use]
    pub fn scroll_offset(&self) -> usize {
        self.scroll_offset
    }

    /// Rows the viewport can show.
    #[must_use]
    pub fn viewport_height(&self) -> usize {
        self.viewport_height
    }

    /// The range of absolute positions currently visible.
    #[must_use]
    pub fn visible_range(&self) -> Range<usize> {
        let start = self.scroll_offset.min(self.len());
        let end = (start + self.viewport_height).min(self.len());
        start..end
    }

    /// The handle bound at an absolute position, if that position is
    /// visible.
    #[must_use]
    pub fn handle_at(&self, position: usize) -> Option<&ViewHandle> {
        let range = self.visible_range();
        if range.contains(&position) {
            self.bound.get(position - range.start)
        } else {
            None
        }
    }

    /// Submit a new snapshot: reconcile, replace the displayed sequence,
    /// and rebind the viewport.
    ///
    /// # Errors
    ///
    /// [`ViewError::DuplicateItem`] leaves the displayed sequence and all
    /// bindings untouched. [`ViewError::UnknownViewType`] signals a pool
    /// misconfiguration and should be treated as fatal.
    pub fn submit(&mut self, snapshot: &[Item]) -> Result<ChangeSet<ItemId>, ViewError> {
        let ops = self.reconciler.submit(snapshot)?;
        #[cfg(feature = "tracing")]
        tracing::trace!(len = snapshot.len(), ops = ops.len(), "list view submit");
        if !ops.is_empty() {
            self.rebind()?;
        }
        Ok(ops)
    }

    /// Scroll so the first visible row is `offset` (clamped to the end of
    /// the sequence), then rebind the viewport.
    ///
    /// # Errors
    ///
    /// [`ViewError::UnknownViewType`] on pool misconfiguration.
    pub fn scroll_to(&mut self, offset: usize) -> Result<(), ViewError> {
        self.scroll_offset = offset;
        self.rebind()
    }

    /// Simulate a primary activation at an absolute position. Returns
    /// whether the position was visible (and thus delivered).
    pub fn activate(&self, position: usize) -> bool {
        match self.handle_at(position) {
            Some(handle) => {
                handle.activate();
                true
            }
            None => false,
        }
    }

    /// Simulate a long-press at an absolute position. Returns whether the
    /// interaction was handled; a visible position always handles it.
    pub fn long_press(&self, position: usize) -> bool {
        self.handle_at(position)
            .map(ViewHandle::long_press)
            .unwrap_or(false)
    }

    /// Pool statistics access for diagnostics.
    #[must_use]
    pub fn pool(&self) -> &HandlePool {
        &self.pool
    }

    /// Rebind every visible position, recycling handles by view type.
    ///
    /// Clamps the scroll offset first: a snapshot that shrank below the
    /// previous offset must not leave the viewport empty.
    fn rebind(&mut self) -> Result<(), ViewError> {
        self.scroll_offset = self.scroll_offset.min(self.len().saturating_sub(1));
        let range = self.visible_range();
        let items: Vec<Item> = self.reconciler.displayed()[range].to_vec();

        let mut spare = std::mem::take(&mut self.bound);
        let mut fresh = Vec::with_capacity(items.len());

        for item in &items {
            let view_type = ViewType::of(item);
            // Reuse a previously bound handle of the same type when one is
            // available; otherwise go to the pool. A handle whose type no
            // longer matches anything visible ends up released below.
            let mut handle = match spare.iter().position(|h| h.view_type() == view_type) {
                Some(index) => spare.swap_remove(index),
                None => match self.pool.acquire(view_type) {
                    Ok(handle) => handle,
                    Err(err) => {
                        // Hand everything back before surfacing the setup bug
                        // so no handle is leaked on the error path.
                        for h in spare.drain(..).chain(fresh.drain(..)) {
                            self.pool.release(h);
                        }
                        return Err(err);
                    }
                },
            };
            handle.bind(item, self.on_activate.clone(), self.on_long_press.clone());
            fresh.push(handle);
        }

        for handle in spare {
            self.pool.release(handle);
        }
        self.bound = fresh;
        Ok(())
    }
}

impl std::fmt::Debug for ListView {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ListView")
            .field("len", &self.len())
            .field("scroll_offset", &self.scroll_offset)
            .field("viewport_height", &self.viewport_height)
            .field("bound", &self.bound.len())
            .finish()
    }
}
