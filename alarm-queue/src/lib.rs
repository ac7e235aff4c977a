/*
SPDX-FileCopyrightText: Copyright 2026 LG Electronics Inc.
SPDX-License-Identifier: MIT
*/

//! Ordered alarm queue – the collection that keeps pending alarms sorted by
//! their firing time.
//!
//! Module layout:
//!
//! ```text
//! lib.rs
//! ├── entry.rs        – (value, key) pair, ordered by key only
//! ├── queue/          – stable singly-linked OrderedQueue + QueueError
//! └── shared.rs       – SharedQueue: one coarse lock per call, snapshots
//! ```
//!
//! # Example
//! ```rust
//! use alarm_queue::{OrderedQueue, QueueError};
//!
//! let mut q = OrderedQueue::new();
//! q.insert("late", 30);
//! q.insert("early", 10);
//! q.insert("middle", 20);
//!
//! assert_eq!(q.keys_ascending(), vec![10, 20, 30]);
//! assert_eq!(q.remove_at(1), Ok("middle"));
//! assert_eq!(q.pop_min(), Ok("early"));
//! assert_eq!(q.pop_min(), Ok("late"));
//! assert_eq!(q.pop_min(), Err(QueueError::Underflow));
//! ```

pub mod entry;
pub mod queue;
pub mod shared;

pub use entry::Entry;
pub use queue::{EntryId, OrderedQueue, QueueError};
pub use shared::{SharedQueue, Snapshot};
