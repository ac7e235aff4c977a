/*
SPDX-FileCopyrightText: Copyright 2026 LG Electronics Inc.
SPDX-License-Identifier: MIT
*/

//! The value type stored in an [`OrderedQueue`](crate::OrderedQueue).
//!
//! An [`Entry`] pairs an arbitrary payload with an `i64` ordering key (for
//! alarms: the fire time in milliseconds since the Unix epoch).  Fields are
//! private so an entry cannot change once it has been linked into a queue.

use std::cmp::Ordering;

/// An immutable `(value, key)` pair.
///
/// Equality and ordering look at `key` only; two entries with the same key
/// compare equal regardless of their payloads.
#[derive(Debug, Clone, Copy)]
pub struct Entry<T> {
    value: T,
    key: i64,
}

impl<T> Entry<T> {
    pub fn new(value: T, key: i64) -> Self {
        Self { value, key }
    }

    /// The ordering key.
    pub fn key(&self) -> i64 {
        self.key
    }

    /// Borrow the payload.
    pub fn value(&self) -> &T {
        &self.value
    }

    pub fn into_value(self) -> T {
        self.value
    }

    /// Split the entry into `(value, key)`.
    pub fn into_parts(self) -> (T, i64) {
        (self.value, self.key)
    }
}

impl<T> PartialEq for Entry<T> {
    fn eq(&self, other: &Self) -> bool {
        self.key == other.key
    }
}

impl<T> Eq for Entry<T> {}

impl<T> PartialOrd for Entry<T> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<T> Ord for Entry<T> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.key.cmp(&other.key)
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
