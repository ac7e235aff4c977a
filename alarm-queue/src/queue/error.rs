/*
SPDX-FileCopyrightText: Copyright 2026 LG Electronics Inc.
SPDX-License-Identifier: MIT
*/

//! Structured error type for queue operations.
//!
//! Every variant is a recoverable "no applicable entry" condition rather than
//! a programming defect.  Callers typically treat [`QueueError::Underflow`] as
//! "nothing to do" and the other two as "refresh the list and retry".
//!
//! | Variant | Raised by | Meaning |
//! |---|---|---|
//! | `Underflow` | `peek_min`, `pop_min`, `remove_at` | the queue holds no entries |
//! | `OutOfRange` | `remove_at` | non-empty queue, rank does not index an entry |
//! | `StaleSnapshot` | `SharedQueue::remove_from_snapshot` | the queue changed after the snapshot was taken |

use thiserror::Error;

/// Error returned by [`OrderedQueue`](super::OrderedQueue) and
/// [`SharedQueue`](crate::SharedQueue).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum QueueError {
    /// An operation that needs at least one entry was called on an empty
    /// queue.
    #[error("queue underflow: the queue holds no entries")]
    Underflow,

    /// `rank` is negative or `>= len` on a non-empty queue.
    ///
    /// Kept distinct from [`QueueError::Underflow`] so the caller can tell a
    /// stale index apart from an empty queue.
    #[error("rank {rank} is out of range for a queue of {len} entries")]
    OutOfRange { rank: i64, len: usize },

    /// A rank taken from a [`Snapshot`](crate::Snapshot) was used after the
    /// queue had been mutated, so the rank may no longer address the entry
    /// the caller saw.
    #[error("snapshot from generation {taken} is stale (queue is at generation {current})")]
    StaleSnapshot { taken: u64, current: u64 },
}
