//! Min-priority frontier with a pending-key set.
//!
//! Ties on priority pop in insertion order. The pending set holds exactly the
//! keys of the entries currently in the heap, so a key can never be enqueued
//! twice at the same time.

use std::cmp::Reverse;
use std::collections::{BinaryHeap, HashSet};

use crate::solver::{SearchNode, StateKey};

/// A heap entry. `BinaryHeap` is a max-heap, so the ordering key is wrapped in
/// `Reverse` to pop the lowest `(priority, seq)` first.
#[derive(Debug)]
struct FrontierEntry<S> {
    order: Reverse<(i64, u64)>,
    key: StateKey,
    node: SearchNode<S>,
}

impl<S> PartialEq for FrontierEntry<S> {
    fn eq(&self, other: &Self) -> bool {
        self.order == other.order
    }
}

impl<S> Eq for FrontierEntry<S> {}

impl<S> PartialOrd for FrontierEntry<S> {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl<S> Ord for FrontierEntry<S> {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.order.cmp(&other.order)
    }
}

/// Best-first frontier.
///
/// Maintains:
/// - A `BinaryHeap` for O(log n) pop of the lowest-priority node
/// - A `HashSet<StateKey>` of keys currently enqueued
pub struct Frontier<S> {
    heap: BinaryHeap<FrontierEntry<S>>,
    pending: HashSet<StateKey>,
    next_seq: u64,
    high_water: usize,
}

impl<S> Frontier<S> {
    #[must_use]
    pub fn new() -> Self {
        Self {
            heap: BinaryHeap::new(),
            pending: HashSet::new(),
            next_seq: 0,
            high_water: 0,
        }
    }

    /// Enqueue `node` under `key` with the given priority.
    ///
    /// Returns `false` (and drops the node) if `key` is already pending.
    pub fn push(&mut self, key: StateKey, node: SearchNode<S>, priority: i64) -> bool {
        if !self.pending.insert(key.clone()) {
            return false;
        }
        let seq = self.next_seq;
        self.next_seq += 1;
        self.heap.push(FrontierEntry {
            order: Reverse((priority, seq)),
            key,
            node,
        });
        self.high_water = self.high_water.max(self.heap.len());
        true
    }

    /// Pop the lowest-priority node together with its priority and key.
    ///
    /// The key stops being pending as soon as its entry leaves the heap.
    #[must_use]
    pub fn pop(&mut self) -> Option<(i64, StateKey, SearchNode<S>)> {
        let FrontierEntry { order, key, node } = self.heap.pop()?;
        self.pending.remove(&key);
        let Reverse((priority, _)) = order;
        Some((priority, key, node))
    }

    /// Whether an entry with this key is currently enqueued.
    #[must_use]
    pub fn is_pending(&self, key: &StateKey) -> bool {
        self.pending.contains(key)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.heap.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }

    /// Largest number of entries held at once.
    #[must_use]
    pub fn high_water(&self) -> usize {
        self.high_water
    }

    /// Number of distinct pending keys. Always equal to [`Frontier::len`].
    #[must_use]
    pub fn pending_len(&self) -> usize {
        self.pending.len()
    }
}

impl<S> Default for Frontier<S> {
    fn default() -> Self {
        Self::new()
    }
}
