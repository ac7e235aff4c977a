/*
SPDX-FileCopyrightText: Copyright 2026 LG Electronics Inc.
SPDX-License-Identifier: MIT
*/

//! Editing collaborator: add, list, edit and remove alarms.
//!
//! The editor works on ranks, exactly like a 0-indexed display list.  To keep
//! a rank chosen from a list from hitting a different alarm after the
//! scheduler has fired one, every rank-based call takes the [`AlarmList`] the
//! rank came from; if the queue has changed since, the call fails with
//! [`QueueError::StaleSnapshot`] and nothing is modified.

use alarm_queue::{QueueError, Snapshot};
use chrono::{DateTime, TimeZone};
use thiserror::Error;
use tracing::info;

use crate::alarm::{Alarm, AlarmError};
use crate::AlarmQueue;

// ── Errors ────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EditError {
    #[error(transparent)]
    Queue(#[from] QueueError),

    #[error(transparent)]
    Alarm(#[from] AlarmError),
}

// ── AlarmList ─────────────────────────────────────────────────────────────────

/// One line of the alarm list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AlarmRow {
    pub rank: usize,
    pub fire_at_ms: i64,
    pub local_time: String,
}

/// Display rows plus the snapshot they were built from.
#[derive(Debug, Clone)]
pub struct AlarmList {
    snapshot: Snapshot,
    rows: Vec<AlarmRow>,
}

impl AlarmList {
    pub fn rows(&self) -> &[AlarmRow] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn snapshot(&self) -> &Snapshot {
        &self.snapshot
    }
}

// ── AlarmEditor ───────────────────────────────────────────────────────────────

pub struct AlarmEditor {
    queue: AlarmQueue,
}

impl AlarmEditor {
    pub fn new(queue: AlarmQueue) -> Self {
        Self { queue }
    }

    /// Queues the next occurrence of `hour:minute` after `now`.
    pub fn add<Tz: TimeZone>(
        &self,
        hour: u32,
        minute: u32,
        now: &DateTime<Tz>,
    ) -> Result<Alarm, EditError> {
        let alarm = Alarm::next_occurrence(hour, minute, now)?;
        self.queue.insert(alarm, alarm.fire_at_ms());
        info!(
            fire_at_ms = alarm.fire_at_ms(),
            local_time = %alarm.local_time(),
            "Alarm added"
        );
        Ok(alarm)
    }

    /// Snapshot of the queue as display rows, rank order.
    pub fn list(&self) -> AlarmList {
        let snapshot = self.queue.snapshot();
        let rows = snapshot
            .keys()
            .iter()
            .enumerate()
            .map(|(rank, &key)| AlarmRow {
                rank,
                fire_at_ms: key,
                local_time: Alarm::new(key).local_time(),
            })
            .collect();
        AlarmList { snapshot, rows }
    }

    /// Removes the alarm shown at `rank` of `list`.
    pub fn remove(&self, list: &AlarmList, rank: i64) -> Result<Alarm, EditError> {
        let removed = self.queue.remove_from_snapshot(&list.snapshot, rank)?;
        info!(rank, fire_at_ms = removed.fire_at_ms(), "Alarm removed");
        Ok(removed)
    }

    /// Moves the alarm shown at `rank` of `list` to the next `hour:minute`.
    ///
    /// The new time is validated before anything is touched, and the
    /// removal and re-insertion happen under one queue lock.
    pub fn edit<Tz: TimeZone>(
        &self,
        list: &AlarmList,
        rank: i64,
        hour: u32,
        minute: u32,
        now: &DateTime<Tz>,
    ) -> Result<Alarm, EditError> {
        let alarm = Alarm::next_occurrence(hour, minute, now)?;
        let (old, _) =
            self.queue
                .replace_from_snapshot(&list.snapshot, rank, alarm, alarm.fire_at_ms())?;
        info!(
            rank,
            from_ms = old.fire_at_ms(),
            to_ms = alarm.fire_at_ms(),
            "Alarm edited"
        );
        Ok(alarm)
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2018, 5, 20, 12, 0, 0).unwrap()
    }

    fn ms(h: u32, m: u32) -> i64 {
        Utc.with_ymd_and_hms(2018, 5, 20, h, m, 0)
            .unwrap()
            .timestamp_millis()
    }

    fn editor_with(times: &[(u32, u32)]) -> (AlarmQueue, AlarmEditor) {
        let q = AlarmQueue::new();
        let editor = AlarmEditor::new(q.clone());
        for &(h, m) in times {
            editor.add(h, m, &now()).unwrap();
        }
        (q, editor)
    }

    #[test]
    fn add_inserts_next_occurrence() {
        let (q, editor) = editor_with(&[]);
        let alarm = editor.add(13, 30, &now()).unwrap();
        assert_eq!(alarm.fire_at_ms(), ms(13, 30));
        assert_eq!(q.keys_ascending(), vec![ms(13, 30)]);
    }

    #[test]
    fn add_rejects_invalid_time_without_inserting() {
        let (q, editor) = editor_with(&[]);
        let err = editor.add(99, 0, &now()).unwrap_err();
        assert!(matches!(err, EditError::Alarm(AlarmError::InvalidTime { .. })));
        assert!(q.is_empty());
    }

    #[test]
    fn list_rows_follow_rank_order() {
        let (_, editor) = editor_with(&[(18, 0), (13, 0), (15, 0)]);
        let list = editor.list();
        let keys: Vec<i64> = list.rows().iter().map(|r| r.fire_at_ms).collect();
        assert_eq!(keys, vec![ms(13, 0), ms(15, 0), ms(18, 0)]);
        assert_eq!(list.rows()[2].rank, 2);
        assert_eq!(list.len(), 3);
    }

    #[test]
    fn remove_by_rank_from_fresh_list() {
        let (q, editor) = editor_with(&[(13, 0), (14, 0), (15, 0)]);
        let list = editor.list();
        let removed = editor.remove(&list, 1).unwrap();
        assert_eq!(removed.fire_at_ms(), ms(14, 0));
        assert_eq!(q.keys_ascending(), vec![ms(13, 0), ms(15, 0)]);
    }

    #[test]
    fn remove_with_bad_rank_is_out_of_range() {
        let (_, editor) = editor_with(&[(13, 0), (14, 0)]);
        let list = editor.list();
        assert_eq!(
            editor.remove(&list, 2),
            Err(EditError::Queue(QueueError::OutOfRange { rank: 2, len: 2 }))
        );
        assert_eq!(
            editor.remove(&list, -1),
            Err(EditError::Queue(QueueError::OutOfRange { rank: -1, len: 2 }))
        );
    }

    #[test]
    fn remove_from_empty_list_is_underflow() {
        let (_, editor) = editor_with(&[]);
        let list = editor.list();
        assert!(list.is_empty());
        assert_eq!(
            editor.remove(&list, 0),
            Err(EditError::Queue(QueueError::Underflow))
        );
    }

    #[test]
    fn list_goes_stale_when_scheduler_pops() {
        let (q, editor) = editor_with(&[(13, 0), (14, 0)]);
        let list = editor.list();

        q.pop_min().unwrap(); // 13:00 fired

        let err = editor.remove(&list, 1).unwrap_err();
        assert!(matches!(err, EditError::Queue(QueueError::StaleSnapshot { .. })));
        assert_eq!(q.keys_ascending(), vec![ms(14, 0)], "14:00 must survive");
    }

    #[test]
    fn edit_moves_alarm_atomically() {
        let (q, editor) = editor_with(&[(13, 0), (14, 0)]);
        let list = editor.list();
        let moved = editor.edit(&list, 0, 16, 45, &now()).unwrap();
        assert_eq!(moved.fire_at_ms(), ms(16, 45));
        assert_eq!(q.keys_ascending(), vec![ms(14, 0), ms(16, 45)]);
    }

    #[test]
    fn edit_with_invalid_time_leaves_queue_untouched() {
        let (q, editor) = editor_with(&[(13, 0)]);
        let list = editor.list();
        assert!(editor.edit(&list, 0, 7, 75, &now()).is_err());
        assert_eq!(q.keys_ascending(), vec![ms(13, 0)]);
    }
}
