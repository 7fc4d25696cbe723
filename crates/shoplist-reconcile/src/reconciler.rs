#![forbid(unsafe_code)]

//! The reconciliation engine: keyed diff between consecutive snapshots.
//!
//! # Algorithm
//!
//! One pass of removals followed by one pass of placement:
//!
//! 1. Index the incoming sequence by key (rejecting duplicates).
//! 2. Walk the working copy of the displayed sequence back-to-front and emit
//!    a `Remove` for every key absent from the incoming sequence.
//! 3. Walk the incoming sequence front-to-back. For each target position:
//!    the key is either already in place (emit `Update` if content differs),
//!    elsewhere in the working tail (emit `Move`, then `Update` if content
//!    differs), or new (emit `Insert`).
//!
//! Positions 0..target are final once the placement pass reaches `target`,
//! so the displaced-key search only ever scans the working tail. The pass is
//! O(n·m) worst case in tail scans and O(n) hashing; snapshots here are
//! human-scale lists, so the simple scan beats a fancier index.
//!
//! # Failure Modes
//!
//! | Failure | Cause | Behavior |
//! |---------|-------|----------|
//! | `DuplicateKey` | Repeated key in one submission | `Err`, displayed sequence retained |

use ahash::{AHashMap, AHashSet};

use crate::Keyed;
use crate::diff::{ChangeOp, ChangeSet};

/// Errors from a reconciliation pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReconcileError<K> {
    /// The submitted sequence contains the same key more than once. Diff
    /// correctness assumes key uniqueness, so the submission is rejected.
    DuplicateKey(K),
}

impl<K: core::fmt::Debug> std::fmt::Display for ReconcileError<K> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::DuplicateKey(key) => write!(f, "duplicate key {key:?} in submitted sequence"),
        }
    }
}

impl<K: core::fmt::Debug> std::error::Error for ReconcileError<K> {}

/// Diff engine owning the displayed sequence.
///
/// Starts empty; every successful [`submit`](Self::submit) replaces the
/// displayed sequence wholesale with the submitted one.
#[derive(Debug, Clone, Default)]
pub struct Reconciler<T> {
    displayed: Vec<T>,
}

impl<T> Reconciler<T>
where
    T: Keyed + Clone + PartialEq,
{
    /// Create an engine with an empty displayed sequence.
    #[must_use]
    pub fn new() -> Self {
        Self {
            displayed: Vec::new(),
        }
    }

    /// The sequence as of the last successful submit.
    #[must_use]
    pub fn displayed(&self) -> &[T] {
        &self.displayed
    }

    /// Reconcile the displayed sequence against `new`.
    ///
    /// Returns the positional op sequence transforming displayed into `new`
    /// and replaces the displayed sequence. Submitting a structurally
    /// identical sequence returns an empty change-set.
    ///
    /// # Errors
    ///
    /// `DuplicateKey` if `new` repeats a key; the displayed sequence is
    /// retained unchanged.
    pub fn submit(&mut self, new: &[T]) -> Result<ChangeSet<T::Key>, ReconcileError<T::Key>> {
        let mut target_keys = AHashSet::with_capacity(new.len());
        let mut target_index = AHashMap::with_capacity(new.len());
        for (index, value) in new.iter().enumerate() {
            if !target_keys.insert(value.key()) {
                return Err(ReconcileError::DuplicateKey(value.key()));
            }
            target_index.insert(value.key(), index);
        }

        let mut ops = ChangeSet::new();
        let mut working = self.displayed.clone();

        // Removal pass, back to front so indices stay valid as we shrink.
        for index in (0..working.len()).rev() {
            let key = working[index].key();
            if !target_index.contains_key(&key) {
                ops.push(ChangeOp::Remove { key, index });
                working.remove(index);
            }
        }

        // Placement pass. Everything before `target` is final, so a
        // displaced key can only live in the working tail.
        for (target, value) in new.iter().enumerate() {
            let key = value.key();
            let found = working[target..]
                .iter()
                .position(|w| w.key() == key)
                .map(|offset| target + offset);

            match found {
                None => {
                    ops.push(ChangeOp::Insert { key, index: target });
                    working.insert(target, value.clone());
                }
                Some(from) if from != target => {
                    ops.push(ChangeOp::Move {
                        key,
                        from,
                        to: target,
                    });
                    let moved = working.remove(from);
                    working.insert(target, moved);
                    if working[target] != *value {
                        ops.push(ChangeOp::Update { key, index: target });
                        working[target] = value.clone();
                    }
                }
                Some(_) => {
                    if working[target] != *value {
                        ops.push(ChangeOp::Update { key, index: target });
                        working[target] = value.clone();
                    }
                }
            }
        }

        debug_assert_eq!(working.len(), new.len());

        #[cfg(feature = "tracing")]
        tracing::trace!(
            old_len = self.displayed.len(),
            new_len = new.len(),
            ops = ops.len(),
            "reconciled snapshot"
        );

        self.displayed = new.to_vec();
        Ok(ops)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shoplist_core::{Item, ItemId};

    fn item(id: u64, name: &str, count: u32, enabled: bool) -> Item {
        Item::new(ItemId(id), name, count).with_enabled(enabled)
    }

    /// Replay a change-set against `old`, resolving inserted/updated content
    /// from `new` by key. Mirrors how a render target would consume the ops.
    fn replay(old: &[Item], new: &[Item], ops: &ChangeSet<ItemId>) -> Vec<Item> {
        let by_key = |key: ItemId| {
            new.iter()
                .find(|item| item.id == key)
                .expect("op key must exist in new sequence")
                .clone()
        };
        let mut seq = old.to_vec();
        for op in ops.ops() {
            match *op {
                ChangeOp::Insert { key, index } => seq.insert(index, by_key(key)),
                ChangeOp::Remove { key, index } => {
                    assert_eq!(seq[index].id, key, "remove key mismatch");
                    seq.remove(index);
                }
                ChangeOp::Move { key, from, to } => {
                    assert_eq!(seq[from].id, key, "move key mismatch");
                    let value = seq.remove(from);
                    seq.insert(to, value);
                }
                ChangeOp::Update { key, index } => {
                    assert_eq!(seq[index].id, key, "update key mismatch");
                    seq[index] = by_key(key);
                }
            }
        }
        seq
    }

    #[test]
    fn empty_to_populated_is_inserts_in_order() {
        let mut engine = Reconciler::new();
        let new = vec![
            item(1, "Milk", 2, true),
            item(2, "Bread", 1, true),
            item(3, "Eggs", 12, false),
        ];

        let ops = engine.submit(&new).unwrap();
        assert_eq!(ops.len(), 3);
        assert_eq!(ops.inserts(), 3);
        assert_eq!(
            ops.ops(),
            &[
                ChangeOp::Insert {
                    key: ItemId(1),
                    index: 0
                },
                ChangeOp::Insert {
                    key: ItemId(2),
                    index: 1
                },
                ChangeOp::Insert {
                    key: ItemId(3),
                    index: 2
                },
            ]
        );
        assert_eq!(engine.displayed(), new.as_slice());
    }

    #[test]
    fn populated_to_empty_is_removes() {
        let mut engine = Reconciler::new();
        let old = vec![item(1, "Milk", 2, true), item(2, "Bread", 1, true)];
        engine.submit(&old).unwrap();

        let ops = engine.submit(&[]).unwrap();
        assert_eq!(ops.removes(), 2);
        assert_eq!(ops.len(), 2);
        assert!(engine.displayed().is_empty());
    }

    #[test]
    fn resubmit_identical_is_empty() {
        let mut engine = Reconciler::new();
        let seq = vec![item(1, "Milk", 2, true), item(2, "Bread", 1, false)];
        engine.submit(&seq).unwrap();

        let ops = engine.submit(&seq).unwrap();
        assert!(ops.is_empty(), "idempotence: identical submit yields no ops");
    }

    #[test]
    fn content_only_change_is_one_update() {
        let mut engine = Reconciler::new();
        let old = vec![item(1, "Milk", 2, true), item(2, "Bread", 1, true)];
        engine.submit(&old).unwrap();

        let mut new = old.clone();
        new[1].count = 4;
        let ops = engine.submit(&new).unwrap();

        assert_eq!(
            ops.ops(),
            &[ChangeOp::Update {
                key: ItemId(2),
                index: 1
            }]
        );
    }

    #[test]
    fn permutation_yields_only_moves() {
        let mut engine = Reconciler::new();
        let old = vec![
            item(1, "Milk", 2, true),
            item(2, "Bread", 1, true),
            item(3, "Eggs", 12, true),
        ];
        engine.submit(&old).unwrap();

        let new = vec![old[2].clone(), old[0].clone(), old[1].clone()];
        let ops = engine.submit(&new).unwrap();

        assert_eq!(ops.moves(), ops.len(), "permutation must emit only moves");
        assert_eq!(ops.updates(), 0);
        assert_eq!(replay(&old, &new, &ops), new);
    }

    #[test]
    fn swap_with_enable_flip() {
        // The worked end-to-end example: swap two items while flipping the
        // second one's enabled flag.
        let mut engine = Reconciler::new();
        let old = vec![item(1, "Milk", 2, true), item(2, "Bread", 1, false)];
        engine.submit(&old).unwrap();

        let new = vec![item(2, "Bread", 1, true), item(1, "Milk", 2, true)];
        let ops = engine.submit(&new).unwrap();

        assert_eq!(
            ops.ops(),
            &[
                ChangeOp::Move {
                    key: ItemId(2),
                    from: 1,
                    to: 0
                },
                ChangeOp::Update {
                    key: ItemId(2),
                    index: 0
                },
            ]
        );
        assert_eq!(replay(&old, &new, &ops), new);
        assert_eq!(engine.displayed(), new.as_slice());
    }

    #[test]
    fn surviving_key_never_reinserted() {
        let mut engine = Reconciler::new();
        let old = vec![
            item(1, "Milk", 2, true),
            item(2, "Bread", 1, true),
            item(3, "Eggs", 12, true),
        ];
        engine.submit(&old).unwrap();

        // Drop item 1, move item 3 first, edit item 2.
        let new = vec![item(3, "Eggs", 6, true), item(2, "Bread", 1, false)];
        let ops = engine.submit(&new).unwrap();

        for op in ops.ops() {
            if let ChangeOp::Insert { key, .. } = op {
                panic!("surviving keys must not be inserted, got insert of {key:?}");
            }
        }
        assert_eq!(ops.removes(), 1);
        assert_eq!(replay(&old, &new, &ops), new);
    }

    #[test]
    fn duplicate_key_rejected_and_state_retained() {
        let mut engine = Reconciler::new();
        let old = vec![item(1, "Milk", 2, true)];
        engine.submit(&old).unwrap();

        let bad = vec![item(2, "Bread", 1, true), item(2, "Bread", 1, true)];
        let err = engine.submit(&bad).unwrap_err();
        assert_eq!(err, ReconcileError::DuplicateKey(ItemId(2)));
        assert_eq!(
            engine.displayed(),
            old.as_slice(),
            "failed submit must retain prior displayed sequence"
        );
    }

    #[test]
    fn later_submit_supersedes_earlier() {
        let mut engine = Reconciler::new();
        let first = vec![item(1, "Milk", 2, true)];
        let second = vec![item(2, "Bread", 1, true)];

        engine.submit(&first).unwrap();
        engine.submit(&second).unwrap();
        assert_eq!(engine.displayed(), second.as_slice());
    }

    #[test]
    fn error_display() {
        let err: ReconcileError<ItemId> = ReconcileError::DuplicateKey(ItemId(5));
        assert!(err.to_string().contains("duplicate key"));
    }

    mod properties {
        use super::*;
        use proptest::prelude::*;

        /// A snapshot with unique ids drawn from a small pool, so that
        /// consecutive snapshots share many keys (the interesting regime).
        fn snapshot_strategy() -> impl Strategy<Value = Vec<Item>> {
            proptest::collection::vec((0u64..12, 0u32..5, any::<bool>()), 0..12).prop_map(
                |entries| {
                    let mut seen = std::collections::HashSet::new();
                    entries
                        .into_iter()
                        .filter(|(id, _, _)| seen.insert(*id))
                        .map(|(id, count, enabled)| {
                            item(id, &format!("item-{id}"), count, enabled)
                        })
                        .collect()
                },
            )
        }

        proptest! {
            #[test]
            fn replay_reproduces_new_sequence(
                old in snapshot_strategy(),
                new in snapshot_strategy(),
            ) {
                let mut engine = Reconciler::new();
                engine.submit(&old).unwrap();
                let ops = engine.submit(&new).unwrap();
                prop_assert_eq!(replay(&old, &new, &ops), new.clone());
                prop_assert_eq!(engine.displayed(), new.as_slice());
            }

            #[test]
            fn submit_is_idempotent(seq in snapshot_strategy()) {
                let mut engine = Reconciler::new();
                engine.submit(&seq).unwrap();
                let ops = engine.submit(&seq).unwrap();
                prop_assert!(ops.is_empty());
            }

            #[test]
            fn permutations_produce_no_updates(seq in snapshot_strategy(), seed in any::<u64>()) {
                let mut engine = Reconciler::new();
                engine.submit(&seq).unwrap();

                // Deterministic shuffle driven by the seed.
                let mut shuffled = seq.clone();
                let mut state = seed | 1;
                for i in (1..shuffled.len()).rev() {
                    state = state.wrapping_mul(6364136223846793005).wrapping_add(1442695040888963407);
                    let j = (state % (i as u64 + 1)) as usize;
                    shuffled.swap(i, j);
                }

                let ops = engine.submit(&shuffled).unwrap();
                prop_assert_eq!(ops.updates(), 0);
                prop_assert_eq!(ops.inserts(), 0);
                prop_assert_eq!(ops.removes(), 0);
            }
        }
    }
}
