/*
SPDX-FileCopyrightText: Copyright 2026 LG Electronics Inc.
SPDX-License-Identifier: MIT
*/

//! Lock-guarded queue handle shared between the scheduler and the editor.
//!
//! [`SharedQueue`] wraps one [`OrderedQueue`] in a single
//! [`parking_lot::Mutex`].  Every method holds the lock for exactly one
//! call.
//!
//! # Rank stability across calls
//! A rank read in one call and used in a later call can address a different
//! entry if anything was popped or inserted in between (e.g. the scheduler
//! fired an alarm while the user was picking one to edit).  [`Snapshot`]
//! carries the queue generation it was read at, and
//! [`SharedQueue::remove_from_snapshot`] refuses with
//! [`QueueError::StaleSnapshot`] instead of removing the wrong entry.

use std::sync::Arc;

use parking_lot::Mutex;

use crate::entry::Entry;
use crate::queue::{EntryId, OrderedQueue, QueueError};

// ── Snapshot ──────────────────────────────────────────────────────────────────

/// Keys of a [`SharedQueue`] in rank order, tagged with the generation they
/// were read at.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snapshot {
    generation: u64,
    keys: Vec<i64>,
}

impl Snapshot {
    /// Keys ascending; index `i` is rank `i`.
    pub fn keys(&self) -> &[i64] {
        &self.keys
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }
}

// ── SharedQueue ───────────────────────────────────────────────────────────────

/// Cloneable, thread-safe handle to one [`OrderedQueue`].
///
/// Clones share the same queue.
pub struct SharedQueue<T> {
    inner: Arc<Mutex<OrderedQueue<T>>>,
}

impl<T> Clone for SharedQueue<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<T> Default for SharedQueue<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> From<OrderedQueue<T>> for SharedQueue<T> {
    fn from(queue: OrderedQueue<T>) -> Self {
        Self {
            inner: Arc::new(Mutex::new(queue)),
        }
    }
}

impl<T> SharedQueue<T> {
    pub fn new() -> Self {
        OrderedQueue::new().into()
    }

    /// See [`OrderedQueue::insert`].
    pub fn insert(&self, value: T, key: i64) -> EntryId {
        self.inner.lock().insert(value, key)
    }

    /// Smallest key currently queued.
    pub fn peek_min_key(&self) -> Result<i64, QueueError> {
        self.inner.lock().peek_min_entry().map(Entry::key)
    }

    /// See [`OrderedQueue::pop_min`].
    pub fn pop_min(&self) -> Result<T, QueueError> {
        self.inner.lock().pop_min()
    }

    /// See [`OrderedQueue::remove_at`].
    pub fn remove_at(&self, rank: i64) -> Result<T, QueueError> {
        self.inner.lock().remove_at(rank)
    }

    /// See [`OrderedQueue::remove_by_id`].
    pub fn remove_by_id(&self, id: EntryId) -> Option<T> {
        self.inner.lock().remove_by_id(id)
    }

    pub fn is_empty(&self) -> bool {
        self.inner.lock().is_empty()
    }

    pub fn len(&self) -> usize {
        self.inner.lock().len()
    }

    /// See [`OrderedQueue::keys_ascending`].
    pub fn keys_ascending(&self) -> Vec<i64> {
        self.inner.lock().keys_ascending()
    }

    /// Reads all keys and the current generation under one lock.
    pub fn snapshot(&self) -> Snapshot {
        let q = self.inner.lock();
        Snapshot {
            generation: q.generation(),
            keys: q.keys_ascending(),
        }
    }

    /// Removes the entry at `rank` of `snapshot`, provided the queue has not
    /// changed since the snapshot was taken.
    ///
    /// # Errors
    /// * [`QueueError::StaleSnapshot`] if any mutation happened in between.
    /// * Otherwise the errors of [`OrderedQueue::remove_at`].
    pub fn remove_from_snapshot(&self, snapshot: &Snapshot, rank: i64) -> Result<T, QueueError> {
        let mut q = self.inner.lock();
        check_fresh(&*q, snapshot)?;
        q.remove_at(rank)
    }

    /// Atomically replaces the entry at `rank` of `snapshot` with a new
    /// `(value, key)` and returns the old value.
    ///
    /// Either both the removal and the insertion happen or neither does.
    pub fn replace_from_snapshot(
        &self,
        snapshot: &Snapshot,
        rank: i64,
        value: T,
        key: i64,
    ) -> Result<(T, EntryId), QueueError> {
        let mut q = self.inner.lock();
        check_fresh(&*q, snapshot)?;
        let old = q.remove_at(rank)?;
        let id = q.insert(value, key);
        Ok((old, id))
    }

    /// Pops every entry whose key is `<= now` under a single lock
    /// acquisition, in ascending order.
    ///
    /// A popped entry is gone from the queue, so it can be returned by at
    /// most one call.
    pub fn pop_due(&self, now: i64) -> Vec<Entry<T>> {
        let mut q = self.inner.lock();
        let mut due = Vec::new();
        while q.peek_min_entry().is_ok_and(|e| e.key() <= now) {
            match q.pop_min_entry() {
                Ok(entry) => due.push(entry),
                Err(_) => break,
            }
        }
        due
    }

    /// Runs `f` with exclusive access to the queue.
    pub fn with<R>(&self, f: impl FnOnce(&mut OrderedQueue<T>) -> R) -> R {
        f(&mut *self.inner.lock())
    }
}

impl<T: Clone> SharedQueue<T> {
    /// Clone of the value with the smallest key.
    pub fn peek_min(&self) -> Result<T, QueueError> {
        self.inner.lock().peek_min().cloned()
    }
}

fn check_fresh<T>(q: &OrderedQueue<T>, snapshot: &Snapshot) -> Result<(), QueueError> {
    if q.generation() == snapshot.generation {
        Ok(())
    } else {
        Err(QueueError::StaleSnapshot {
            taken: snapshot.generation,
            current: q.generation(),
        })
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
