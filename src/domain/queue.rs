//! Expiry-ordered priority queue of matched wagers.
//!
//! A binary min-heap over [`QueueEntry`] values with a position index, so
//! that the earliest expiry is readable in O(1) and both pop-minimum and
//! removal of an arbitrary wager are O(log n).
//!
//! Ordering and identity are deliberately separate: heap order comes from
//! [`precedes`], which compares `(expires_at, wager_id)`, while entries are
//! equal exactly when their wager ids are. Entries sharing an expiry
//! therefore leave the queue in ascending wager-id order.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use super::id::WagerId;
use super::money::Timestamp;

/// A matched wager waiting for its expiry.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct QueueEntry {
    wager_id: WagerId,
    expires_at: Timestamp,
}

impl QueueEntry {
    #[must_use]
    pub const fn new(wager_id: WagerId, expires_at: Timestamp) -> Self {
        Self {
            wager_id,
            expires_at,
        }
    }

    #[must_use]
    pub const fn wager_id(&self) -> WagerId {
        self.wager_id
    }

    #[must_use]
    pub const fn expires_at(&self) -> Timestamp {
        self.expires_at
    }

    /// Whether the expiry lies strictly before `now`.
    #[must_use]
    pub const fn is_matured(&self, now: Timestamp) -> bool {
        self.expires_at < now
    }
}

impl PartialEq for QueueEntry {
    fn eq(&self, other: &Self) -> bool {
        self.wager_id == other.wager_id
    }
}

impl Eq for QueueEntry {}

/// Heap order: earlier expiry first, ties broken by lower wager id.
#[must_use]
pub fn precedes(a: &QueueEntry, b: &QueueEntry) -> bool {
    (a.expires_at, a.wager_id) < (b.expires_at, b.wager_id)
}

/// Min-heap of [`QueueEntry`] keyed by expiry.
///
/// Serializes as its entry list; the position index is rebuilt on load.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(from = "Vec<QueueEntry>", into = "Vec<QueueEntry>")]
pub struct ExpiryQueue {
    heap: Vec<QueueEntry>,
    positions: HashMap<WagerId, usize>,
}

impl ExpiryQueue {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.heap.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }

    #[must_use]
    pub fn contains(&self, wager_id: WagerId) -> bool {
        self.positions.contains_key(&wager_id)
    }

    /// Insert an entry. Returns false, leaving the queue unchanged, when
    /// the wager is already queued.
    pub fn push(&mut self, entry: QueueEntry) -> bool {
        if self.contains(entry.wager_id) {
            return false;
        }
        let index = self.heap.len();
        self.heap.push(entry);
        self.positions.insert(entry.wager_id, index);
        self.sift_up(index);
        true
    }

    /// The entry with the earliest expiry.
    #[must_use]
    pub fn peek(&self) -> Option<&QueueEntry> {
        self.heap.first()
    }

    /// Remove and return the entry with the earliest expiry.
    pub fn pop(&mut self) -> Option<QueueEntry> {
        let first = self.peek()?.wager_id;
        self.remove(first)
    }

    /// Pop the earliest entry only if it has matured at `now`.
    pub fn pop_matured(&mut self, now: Timestamp) -> Option<QueueEntry> {
        if self.peek()?.is_matured(now) {
            self.pop()
        } else {
            None
        }
    }

    /// Remove the entry for `wager_id` from anywhere in the heap.
    pub fn remove(&mut self, wager_id: WagerId) -> Option<QueueEntry> {
        let index = self.positions.remove(&wager_id)?;
        let removed = self.heap.swap_remove(index);
        if index < self.heap.len() {
            self.positions.insert(self.heap[index].wager_id, index);
            self.repair(index);
        }
        Some(removed)
    }

    /// Entries in settlement order. Allocates; the heap itself is untouched.
    #[must_use]
    pub fn sorted(&self) -> Vec<QueueEntry> {
        let mut entries = self.heap.clone();
        entries.sort_by_key(|entry| (entry.expires_at, entry.wager_id));
        entries
    }

    pub fn clear(&mut self) {
        self.heap.clear();
        self.positions.clear();
    }

    fn repair(&mut self, index: usize) {
        if index > 0 && precedes(&self.heap[index], &self.heap[(index - 1) / 2]) {
            self.sift_up(index);
        } else {
            self.sift_down(index);
        }
    }

    fn sift_up(&mut self, mut index: usize) {
        while index > 0 {
            let parent = (index - 1) / 2;
            if !precedes(&self.heap[index], &self.heap[parent]) {
                break;
            }
            self.swap(index, parent);
            index = parent;
        }
    }

    fn sift_down(&mut self, mut index: usize) {
        let len = self.heap.len();
        loop {
            let left = 2 * index + 1;
            let right = left + 1;
            let mut first = index;
            if left < len && precedes(&self.heap[left], &self.heap[first]) {
                first = left;
            }
            if right < len && precedes(&self.heap[right], &self.heap[first]) {
                first = right;
            }
            if first == index {
                break;
            }
            self.swap(index, first);
            index = first;
        }
    }

    fn swap(&mut self, a: usize, b: usize) {
        self.heap.swap(a, b);
        self.positions.insert(self.heap[a].wager_id, a);
        self.positions.insert(self.heap[b].wager_id, b);
    }
}

impl From<Vec<QueueEntry>> for ExpiryQueue {
    fn from(entries: Vec<QueueEntry>) -> Self {
        let mut queue = Self::new();
        for entry in entries {
            queue.push(entry);
        }
        queue
    }
}

impl From<ExpiryQueue> for Vec<QueueEntry> {
    fn from(queue: ExpiryQueue) -> Self {
        queue.heap
    }
}
