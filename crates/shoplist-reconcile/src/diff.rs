#![forbid(unsafe_code)]

//! Change operations and change-sets.
//!
//! A [`ChangeSet`] is an ordered list of [`ChangeOp`]s plus per-kind
//! counters. Ops are positional and apply in emission order: each op's
//! indices refer to the sequence as it stands after the preceding ops.

use std::fmt;

/// A single positional edit.
///
/// Indices are positions in the sequence *at the moment the op applies*,
/// not positions in the original snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeOp<K> {
    /// A value with a previously unseen key enters at `index`.
    Insert {
        /// Identity of the inserted value.
        key: K,
        /// Position it occupies after insertion.
        index: usize,
    },
    /// The value at `index` leaves the sequence.
    Remove {
        /// Identity of the removed value.
        key: K,
        /// Position it occupied before removal.
        index: usize,
    },
    /// The value at `from` relocates to `to` (identity and content intact
    /// at the time of the move; a content change is reported separately).
    Move {
        /// Identity of the moved value.
        key: K,
        /// Position before the move.
        from: usize,
        /// Position after the move.
        to: usize,
    },
    /// The value at `index` kept its key but changed content.
    Update {
        /// Identity of the changed value.
        key: K,
        /// Position of the value.
        index: usize,
    },
}

impl<K: fmt::Debug> fmt::Display for ChangeOp<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Insert { key, index } => write!(f, "insert {key:?} @ {index}"),
            Self::Remove { key, index } => write!(f, "remove {key:?} @ {index}"),
            Self::Move { key, from, to } => write!(f, "move {key:?} {from} -> {to}"),
            Self::Update { key, index } => write!(f, "update {key:?} @ {index}"),
        }
    }
}

/// Ordered list of edits produced by one reconciliation pass.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ChangeSet<K> {
    ops: Vec<ChangeOp<K>>,
    inserts: usize,
    removes: usize,
    moves: usize,
    updates: usize,
}

impl<K> ChangeSet<K> {
    /// Create an empty change-set.
    #[must_use]
    pub fn new() -> Self {
        Self {
            ops: Vec::new(),
            inserts: 0,
            removes: 0,
            moves: 0,
            updates: 0,
        }
    }

    pub(crate) fn push(&mut self, op: ChangeOp<K>) {
        match op {
            ChangeOp::Insert { .. } => self.inserts += 1,
            ChangeOp::Remove { .. } => self.removes += 1,
            ChangeOp::Move { .. } => self.moves += 1,
            ChangeOp::Update { .. } => self.updates += 1,
        }
        self.ops.push(op);
    }

    /// The ops, in application order.
    #[must_use]
    pub fn ops(&self) -> &[ChangeOp<K>] {
        &self.ops
    }

    /// Whether the pass produced no edits.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }

    /// Total number of ops.
    #[must_use]
    pub fn len(&self) -> usize {
        self.ops.len()
    }

    /// Number of insert ops.
    #[must_use]
    pub fn inserts(&self) -> usize {
        self.inserts
    }

    /// Number of remove ops.
    #[must_use]
    pub fn removes(&self) -> usize {
        self.removes
    }

    /// Number of move ops.
    #[must_use]
    pub fn moves(&self) -> usize {
        self.moves
    }

    /// Number of update ops.
    #[must_use]
    pub fn updates(&self) -> usize {
        self.updates
    }
}

impl<K> IntoIterator for ChangeSet<K> {
    type Item = ChangeOp<K>;
    type IntoIter = std::vec::IntoIter<ChangeOp<K>>;

    fn into_iter(self) -> Self::IntoIter {
        self.ops.into_iter()
    }
}

impl<K: fmt::Debug> fmt::Display for ChangeSet<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} ops (+{} -{} ~{} Δ{})",
            self.ops.len(),
            self.inserts,
            self.removes,
            self.moves,
            self.updates
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counters_track_pushes() {
        let mut set: ChangeSet<u32> = ChangeSet::new();
        assert!(set.is_empty());

        set.push(ChangeOp::Insert { key: 1, index: 0 });
        set.push(ChangeOp::Remove { key: 2, index: 1 });
        set.push(ChangeOp::Move {
            key: 3,
            from: 2,
            to: 0,
        });
        set.push(ChangeOp::Update { key: 3, index: 0 });

        assert_eq!(set.len(), 4);
        assert_eq!(set.inserts(), 1);
        assert_eq!(set.removes(), 1);
        assert_eq!(set.moves(), 1);
        assert_eq!(set.updates(), 1);
        assert!(!set.is_empty());
    }

    #[test]
    fn display_formats() {
        let op: ChangeOp<u32> = ChangeOp::Move {
            key: 7,
            from: 3,
            to: 0,
        };
        assert_eq!(op.to_string(), "move 7 3 -> 0");

        let mut set: ChangeSet<u32> = ChangeSet::new();
        set.push(op);
        assert_eq!(set.to_string(), "1 ops (+0 -0 ~1 Δ0)");
    }

    #[test]
    fn into_iter_preserves_order() {
        let mut set: ChangeSet<u32> = ChangeSet::new();
        set.push(ChangeOp::Remove { key: 9, index: 4 });
        set.push(ChangeOp::Insert { key: 8, index: 0 });

        let ops: Vec<_> = set.into_iter().collect();
        assert_eq!(
            ops,
            vec![
                ChangeOp::Remove { key: 9, index: 4 },
                ChangeOp::Insert { key: 8, index: 0 },
            ]
        );
    }
}
