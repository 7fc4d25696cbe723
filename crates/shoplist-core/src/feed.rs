#![forbid(unsafe_code)]

//! Snapshot feed: subscriber registry for full-sequence item snapshots.
//!
//! The feed pushes the *entire* ordered sequence on every change. There is
//! deliberately no per-item mutation event; consumers reconstruct deltas by
//! diffing consecutive snapshots.
//!
//! # Invariants
//!
//! 1. Subscribers are notified in registration order.
//! 2. Dropping a [`Subscription`] removes the callback before the next
//!    notification cycle.
//! 3. Notification never holds the registry borrow while a callback runs, so
//!    callbacks may subscribe or publish re-entrantly without panicking.
//! 4. A callback registered during a notification pass does not observe that
//!    pass's snapshot (it starts with the next one, or the immediate replay
//!    done by the store on subscribe).
//!
//! # Failure Modes
//!
//! - Callback panic: propagates to the publisher; remaining subscribers for
//!   that pass are skipped. State is already updated by then.

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use crate::item::Item;

type Callback = Rc<dyn Fn(&[Item])>;

/// Registry of snapshot subscribers.
#[derive(Default)]
pub struct SnapshotFeed {
    inner: Rc<RefCell<FeedInner>>,
}

#[derive(Default)]
struct FeedInner {
    next_token: u64,
    subscribers: Vec<(u64, Callback)>,
}

impl SnapshotFeed {
    /// Create an empty feed.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a callback for future snapshots.
    ///
    /// The returned guard keeps the registration alive; drop it to
    /// unsubscribe.
    pub fn subscribe(&self, callback: impl Fn(&[Item]) + 'static) -> Subscription {
        let mut inner = self.inner.borrow_mut();
        let token = inner.next_token;
        inner.next_token += 1;
        inner.subscribers.push((token, Rc::new(callback)));
        Subscription {
            feed: Rc::downgrade(&self.inner),
            token,
        }
    }

    /// Push a snapshot to every live subscriber, in registration order.
    pub fn publish(&self, snapshot: &[Item]) {
        // Clone the callback list out so the registry borrow is released
        // before any callback runs.
        let callbacks: Vec<Callback> = self
            .inner
            .borrow()
            .subscribers
            .iter()
            .map(|(_, cb)| Rc::clone(cb))
            .collect();
        for cb in callbacks {
            cb(snapshot);
        }
    }

    /// Number of live subscriptions.
    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.inner.borrow().subscribers.len()
    }
}

impl std::fmt::Debug for SnapshotFeed {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SnapshotFeed")
            .field("subscribers", &self.subscriber_count())
            .finish()
    }
}

/// RAII guard for a feed registration. Dropping it unsubscribes.
pub struct Subscription {
    feed: Weak<RefCell<FeedInner>>,
    token: u64,
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(feed) = self.feed.upgrade() {
            feed.borrow_mut()
                .subscribers
                .retain(|(token, _)| *token != self.token);
        }
    }
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription")
            .field("token", &self.token)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::item::ItemId;
    use std::cell::Cell;

    fn sample(id: u64) -> Item {
        Item::new(ItemId(id), format!("item-{id}"), 1)
    }

    #[test]
    fn publish_reaches_subscriber() {
        let feed = SnapshotFeed::new();
        let seen = Rc::new(Cell::new(0usize));

        let s = Rc::clone(&seen);
        let _sub = feed.subscribe(move |snapshot| s.set(snapshot.len()));

        feed.publish(&[sample(1), sample(2)]);
        assert_eq!(seen.get(), 2);
    }

    #[test]
    fn subscribers_notified_in_registration_order() {
        let feed = SnapshotFeed::new();
        let order = Rc::new(RefCell::new(Vec::new()));

        let o1 = Rc::clone(&order);
        let _a = feed.subscribe(move |_| o1.borrow_mut().push("a"));
        let o2 = Rc::clone(&order);
        let _b = feed.subscribe(move |_| o2.borrow_mut().push("b"));

        feed.publish(&[]);
        assert_eq!(*order.borrow(), vec!["a", "b"]);
    }

    #[test]
    fn drop_unsubscribes() {
        let feed = SnapshotFeed::new();
        let hits = Rc::new(Cell::new(0u32));

        {
            let h = Rc::clone(&hits);
            let _sub = feed.subscribe(move |_| h.set(h.get() + 1));
            feed.publish(&[]);
            assert_eq!(hits.get(), 1);
        }

        feed.publish(&[]);
        assert_eq!(hits.get(), 1, "dropped subscription must not fire");
        assert_eq!(feed.subscriber_count(), 0);
    }

    #[test]
    fn reentrant_publish_does_not_panic() {
        let feed = SnapshotFeed::new();
        let inner_feed = SnapshotFeed::new();

        // Publishing from inside a callback exercises the borrow release.
        let _sub = feed.subscribe(move |snapshot| {
            inner_feed.publish(snapshot);
        });
        feed.publish(&[sample(1)]);
    }

    #[test]
    fn subscription_outliving_feed_is_harmless() {
        let sub = {
            let feed = SnapshotFeed::new();
            feed.subscribe(|_| {})
        };
        drop(sub); // feed is gone; drop must be a no-op
    }
}
