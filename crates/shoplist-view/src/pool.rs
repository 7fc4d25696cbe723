#![forbid(unsafe_code)]

//! Bounded per-view-type recycling pool for [`ViewHandle`]s.
//!
//! The pool owns a template (handle factory) per view type plus a free list
//! of released handles. Acquiring with an empty free list instantiates a
//! fresh handle from the template; releasing into a full free list discards
//! the handle.
//!
//! # Invariants
//!
//! 1. A free list never exceeds the configured per-type capacity.
//! 2. Released handles are reset before pooling; an acquired handle never
//!    exposes a previous bind.
//! 3. Acquiring a view type with no registered template fails with
//!    [`ViewError::UnknownViewType`]. This is a configuration error, not a
//!    runtime condition; callers are expected to treat it as fatal.

use std::rc::Rc;

use ahash::AHashMap;

use crate::ViewError;
use crate::handle::ViewHandle;
use crate::view_type::ViewType;

/// Per-type capacity used when none is configured. Matches the recycling
/// behavior the list was tuned for upstream.
pub const DEFAULT_POOL_CAPACITY: usize = 10;

type Template = Rc<dyn Fn() -> ViewHandle>;

/// Bounded handle pool with one template and one free list per view type.
pub struct HandlePool {
    capacity: usize,
    templates: AHashMap<ViewType, Template>,
    free: AHashMap<ViewType, Vec<ViewHandle>>,
    created: usize,
    recycled: usize,
    discarded: usize,
}

impl HandlePool {
    /// Create an empty pool with the default per-type capacity.
    #[must_use]
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_POOL_CAPACITY)
    }

    /// Create an empty pool holding at most `capacity` free handles per view
    /// type. A capacity of zero disables recycling entirely.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            capacity,
            templates: AHashMap::new(),
            free: AHashMap::new(),
            created: 0,
            recycled: 0,
            discarded: 0,
        }
    }

    /// Pool with the plain [`ViewHandle::new`] template registered for both
    /// view types. Sufficient unless rows need custom construction.
    #[must_use]
    pub fn with_default_templates() -> Self {
        let mut pool = Self::new();
        for view_type in ViewType::all() {
            pool.register(view_type, move || ViewHandle::new(view_type));
        }
        pool
    }

    /// Register (or replace) the template for a view type.
    pub fn register(&mut self, view_type: ViewType, template: impl Fn() -> ViewHandle + 'static) {
        self.templates.insert(view_type, Rc::new(template));
    }

    /// Whether a template is registered for the view type.
    #[must_use]
    pub fn has_template(&self, view_type: ViewType) -> bool {
        self.templates.contains_key(&view_type)
    }

    /// Take a handle of the given view type: recycled if available,
    /// otherwise freshly instantiated from the template.
    ///
    /// # Errors
    ///
    /// `UnknownViewType` if no template is registered for `view_type`.
    pub fn acquire(&mut self, view_type: ViewType) -> Result<ViewHandle, ViewError> {
        if let Some(handle) = self.free.get_mut(&view_type).and_then(Vec::pop) {
            self.recycled += 1;
            return Ok(handle);
        }
        let template = self
            .templates
            .get(&view_type)
            .ok_or(ViewError::UnknownViewType(view_type))?;
        let handle = template();
        debug_assert_eq!(
            handle.view_type(),
            view_type,
            "template produced a handle of the wrong view type"
        );
        self.created += 1;
        Ok(handle)
    }

    /// Return a handle. It is reset, then pooled under its view type, or
    /// discarded if the free list is at capacity.
    pub fn release(&mut self, mut handle: ViewHandle) {
        handle.reset();
        let free = self.free.entry(handle.view_type()).or_default();
        if free.len() < self.capacity {
            free.push(handle);
        } else {
            self.discarded += 1;
        }
    }

    /// Number of free handles pooled for a view type.
    #[must_use]
    pub fn pooled(&self, view_type: ViewType) -> usize {
        self.free.get(&view_type).map_or(0, Vec::len)
    }

    /// Handles instantiated from templates so far.
    #[must_use]
    pub fn created(&self) -> usize {
        self.created
    }

    /// Acquisitions served from the free lists so far.
    #[must_use]
    pub fn recycled(&self) -> usize {
        self.recycled
    }

    /// Releases dropped because the free list was full.
    #[must_use]
    pub fn discarded(&self) -> usize {
        self.discarded
    }
}

impl Default for HandlePool {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for HandlePool {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HandlePool")
            .field("capacity", &self.capacity)
            .field("created", &self.created)
            .field("recycled", &self.recycled)
            .field("discarded", &self.discarded)
            .finish()
    }
}
