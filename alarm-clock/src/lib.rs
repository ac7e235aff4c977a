/*
SPDX-FileCopyrightText: Copyright 2026 LG Electronics Inc.
SPDX-License-Identifier: MIT
*/

//! Alarm clock – headless collaborators around the ordered alarm queue.
//!
//! Module layout:
//!
//! ```text
//! lib.rs
//! ├── alarm.rs        – Alarm value type, next-occurrence arithmetic
//! ├── config/         – YAML clock configuration
//! ├── calendar/       – iCalendar (.ics) load / save of pending alarms
//! ├── scheduler/      – due-alarm polling + notification
//! └── editor/         – list / add / edit / remove alarms by rank
//! ```
//!
//! All collaborators share one [`SharedQueue<Alarm>`](alarm_queue::SharedQueue);
//! the queue itself lives in the `alarm-queue` crate.

pub mod alarm;
pub mod calendar;
pub mod config;
pub mod editor;
pub mod scheduler;

/// The queue type every collaborator shares.
pub type AlarmQueue = alarm_queue::SharedQueue<alarm::Alarm>;
