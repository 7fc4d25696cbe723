#![forbid(unsafe_code)]

//! Keyed list reconciliation for shoplist.
//!
//! Given two ordered snapshots of keyed values, this crate computes the
//! positional operation sequence (insert, remove, move, update) that
//! transforms the first into the second. Identity is matched by key; whether
//! a surviving value "changed" is decided by structural equality.
//!
//! The [`Reconciler`] owns the currently displayed sequence and replaces it
//! on every [`submit`](Reconciler::submit), so callers only ever hand it the
//! newest snapshot. Overlapping submissions are last-write-wins at the
//! sequence level; ops are never diffed against each other.
//!
//! # Invariants
//!
//! 1. Submitting a sequence structurally identical to the displayed one
//!    yields an empty change-set (idempotence).
//! 2. Replaying an emitted change-set against the old sequence reproduces
//!    the new sequence exactly, ops applied in emission order.
//! 3. A key present in both sequences never produces an insert/remove pair;
//!    content-only changes produce exactly one update.
//! 4. A permutation of the displayed sequence produces only move ops.
//! 5. Duplicate keys within one submission abort it: the error is returned
//!    and the displayed sequence is retained unchanged.

pub mod diff;
pub mod reconciler;

pub use diff::{ChangeOp, ChangeSet};
pub use reconciler::{ReconcileError, Reconciler};

use core::hash::Hash;

use shoplist_core::{Item, ItemId};

/// Values that carry a stable identity usable for diff matching.
///
/// The key must stay constant for the lifetime of the logical entity;
/// everything else about the value is content.
pub trait Keyed {
    /// Identity type. Cheap to copy and hashable.
    type Key: Copy + Eq + Hash + core::fmt::Debug;

    /// This value's identity.
    fn key(&self) -> Self::Key;
}

impl Keyed for Item {
    type Key = ItemId;

    fn key(&self) -> ItemId {
        self.id
    }
}
