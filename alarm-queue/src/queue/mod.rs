//! Stable ordered queue keyed by a 64-bit timestamp.
//!
//! [`OrderedQueue`] keeps its entries in a singly-linked chain sorted
//! ascending by key.  Each node is exclusively owned by its predecessor (the
//! queue owns the head), so the chain can never contain a cycle or a shared
//! node.
//!
//! # Invariants (hold after every public call)
//! * keys read front-to-back are non-decreasing;
//! * entries with equal keys keep their insertion order;
//! * `len()` equals the number of linked nodes and an empty queue has no head;
//! * ranks always address the *current* sorted position (0 = minimum).
//!
//! Insertion, rank lookup and handle lookup are linear scans from the head.
//!
//! # Example
//! ```rust
//! use alarm_queue::OrderedQueue;
//!
//! let mut q = OrderedQueue::new();
//! q.insert("first five", 5);
//! q.insert("three", 3);
//! q.insert("second five", 5);
//!
//! assert_eq!(q.keys_ascending(), vec![3, 5, 5]);
//! assert_eq!(q.pop_min(), Ok("three"));
//! assert_eq!(q.pop_min(), Ok("first five"));
//! ```

pub mod error;

pub use error::QueueError;

use std::fmt;

use crate::entry::Entry;

// ── Handles ───────────────────────────────────────────────────────────────────

/// Opaque handle returned by [`OrderedQueue::insert`].
///
/// Unlike a rank, a handle keeps naming the same entry no matter how many
/// entries are popped or inserted in front of it.  Handles are never reused
/// within one queue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EntryId(u64);

// ── Internal chain ────────────────────────────────────────────────────────────

type Link<T> = Option<Box<Node<T>>>;

struct Node<T> {
    entry: Entry<T>,
    id: EntryId,
    next: Link<T>,
}

// ── OrderedQueue ──────────────────────────────────────────────────────────────

/// A priority queue of [`Entry`] values, sorted ascending by key and stable
/// among equal keys.
pub struct OrderedQueue<T> {
    head: Link<T>,
    len: usize,
    next_id: u64,
    /// Bumped by every mutating call; lets snapshot holders detect drift.
    generation: u64,
}

impl<T> OrderedQueue<T> {
    /// Creates an empty queue.
    pub fn new() -> Self {
        Self {
            head: None,
            len: 0,
            next_id: 0,
            generation: 0,
        }
    }

    /// Inserts `value` at its sorted position and returns a handle to it.
    ///
    /// The new entry is linked in front of the first node whose key is
    /// strictly greater than `key`, so it lands *after* every existing entry
    /// with an equal key.  Linear in the current length; never fails.
    pub fn insert(&mut self, value: T, key: i64) -> EntryId {
        let id = EntryId(self.next_id);
        self.next_id += 1;

        let pos = self.iter().take_while(|e| e.key() <= key).count();
        let link = self.link_at(pos);
        let next = link.take();
        *link = Some(Box::new(Node {
            entry: Entry::new(value, key),
            id,
            next,
        }));

        self.len += 1;
        self.generation += 1;
        id
    }

    /// Returns the value with the smallest key without removing it.
    ///
    /// # Errors
    /// [`QueueError::Underflow`] when the queue is empty.
    pub fn peek_min(&self) -> Result<&T, QueueError> {
        self.peek_min_entry().map(Entry::value)
    }

    /// Like [`peek_min`](Self::peek_min) but also exposes the key.
    pub fn peek_min_entry(&self) -> Result<&Entry<T>, QueueError> {
        self.head
            .as_deref()
            .map(|node| &node.entry)
            .ok_or(QueueError::Underflow)
    }

    /// Removes and returns the value with the smallest key.
    ///
    /// Among equal keys the earliest-inserted entry is returned first.
    ///
    /// # Errors
    /// [`QueueError::Underflow`] when the queue is empty.
    pub fn pop_min(&mut self) -> Result<T, QueueError> {
        self.pop_min_entry().map(Entry::into_value)
    }

    /// Like [`pop_min`](Self::pop_min) but returns the whole entry.
    pub fn pop_min_entry(&mut self) -> Result<Entry<T>, QueueError> {
        self.unlink_at(0).ok_or(QueueError::Underflow)
    }

    /// Removes and returns the value at sorted position `rank` (0 = minimum).
    ///
    /// Ranks below `rank` are unaffected; ranks above it shift down by one.
    ///
    /// # Errors
    /// * [`QueueError::Underflow`] when the queue is empty (checked first).
    /// * [`QueueError::OutOfRange`] when `rank < 0` or `rank >= len()`.
    pub fn remove_at(&mut self, rank: i64) -> Result<T, QueueError> {
        if self.is_empty() {
            return Err(QueueError::Underflow);
        }
        let out_of_range = QueueError::OutOfRange {
            rank,
            len: self.len,
        };
        let pos = usize::try_from(rank)
            .ok()
            .filter(|&p| p < self.len)
            .ok_or(out_of_range)?;

        self.unlink_at(pos)
            .map(Entry::into_value)
            .ok_or(out_of_range)
    }

    /// Removes the entry named by `id`, wherever it currently sits.
    ///
    /// Returns `None` if the entry has already been popped or removed.
    pub fn remove_by_id(&mut self, id: EntryId) -> Option<T> {
        let pos = self.nodes().position(|node| node.id == id)?;
        self.unlink_at(pos).map(Entry::into_value)
    }

    /// `true` when the queue holds no entries.  O(1).
    pub fn is_empty(&self) -> bool {
        self.head.is_none()
    }

    /// Number of stored entries.  O(1).
    pub fn len(&self) -> usize {
        self.len
    }

    /// Mutation counter: changes on every insert, pop, removal or clear and
    /// never on reads.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Returns an owned copy of all keys in ascending (rank) order.
    ///
    /// Index `i` of the result is the rank accepted by
    /// [`remove_at`](Self::remove_at) as long as the queue is not mutated in
    /// between.
    pub fn keys_ascending(&self) -> Vec<i64> {
        self.iter().map(Entry::key).collect()
    }

    /// Iterates the entries front-to-back (ascending by key).
    pub fn iter(&self) -> Iter<'_, T> {
        Iter {
            next: self.head.as_deref(),
            remaining: self.len,
        }
    }

    /// Drops every entry.
    pub fn clear(&mut self) {
        let mut cur = self.head.take();
        while let Some(mut node) = cur {
            cur = node.next.take();
        }
        self.len = 0;
        self.generation += 1;
    }

    // ── Chain helpers ─────────────────────────────────────────────────────────

    fn nodes(&self) -> impl Iterator<Item = &Node<T>> {
        std::iter::successors(self.head.as_deref(), |node| node.next.as_deref())
    }

    /// Returns the link that holds position `pos` (or the tail link when
    /// `pos >= len`).
    fn link_at(&mut self, pos: usize) -> &mut Link<T> {
        let mut cursor = &mut self.head;
        for _ in 0..pos {
            match cursor {
                Some(node) => cursor = &mut node.next,
                None => break,
            }
        }
        cursor
    }

    fn unlink_at(&mut self, pos: usize) -> Option<Entry<T>> {
        let link = self.link_at(pos);
        let mut node = link.take()?;
        *link = node.next.take();

        self.len -= 1;
        self.generation += 1;
        Some(node.entry)
    }
}

impl<T> Default for OrderedQueue<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Drop for OrderedQueue<T> {
    // Unlink iteratively: the default recursive drop of a long Box chain can
    // overflow the stack.
    fn drop(&mut self) {
        let mut cur = self.head.take();
        while let Some(mut node) = cur {
            cur = node.next.take();
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for OrderedQueue<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

/// Replays `(value, key)` pairs through [`OrderedQueue::insert`].
impl<T> FromIterator<(T, i64)> for OrderedQueue<T> {
    fn from_iter<I: IntoIterator<Item = (T, i64)>>(iter: I) -> Self {
        let mut q = Self::new();
        q.extend(iter);
        q
    }
}

impl<T> Extend<(T, i64)> for OrderedQueue<T> {
    fn extend<I: IntoIterator<Item = (T, i64)>>(&mut self, iter: I) {
        for (value, key) in iter {
            self.insert(value, key);
        }
    }
}

impl<'a, T> IntoIterator for &'a OrderedQueue<T> {
    type Item = &'a Entry<T>;
    type IntoIter = Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

// ── Iter ──────────────────────────────────────────────────────────────────────

/// Borrowing front-to-back iterator returned by [`OrderedQueue::iter`].
pub struct Iter<'a, T> {
    next: Option<&'a Node<T>>,
    remaining: usize,
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = &'a Entry<T>;

    fn next(&mut self) -> Option<Self::Item> {
        self.next.map(|node| {
            self.next = node.next.as_deref();
            self.remaining -= 1;
            &node.entry
        })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<T> ExactSizeIterator for Iter<'_, T> {}

// ── Tests ─────────────────────────────────────────────────────────────────────
