/*
SPDX-FileCopyrightText: Copyright 2026 LG Electronics Inc.
SPDX-License-Identifier: MIT
*/

//! iCalendar persistence for pending alarms.
//!
//! The queue itself is never serialised.  Saving exports the queued keys in
//! ascending order and writes one `VEVENT` per key; loading replays one
//! insertion per `DTSTART` that still lies in the future.
//!
//! Layout written by [`generate`] (CRLF line endings, no trailing newline):
//! ```text
//! BEGIN:VCALENDAR
//! VERSION:2.0
//! PRODID:Alarm Clock
//! BEGIN:VEVENT
//! UID:0
//! DTSTAMP:20180520T120000Z
//! DTSTART:20180520T160428Z
//! DTEND:20180520T160428Z
//! END:VEVENT
//! END:VCALENDAR
//! ```
//!
//! All timestamps are UTC, matching the trailing `Z`.  Sub-second precision is
//! dropped on save.

pub mod error;

pub use error::CalendarError;

use std::fmt::Write as _;
use std::path::Path;

use anyhow::{Context, Result};
use chrono::{DateTime, NaiveDateTime, TimeZone, Utc};
use tracing::{debug, info, warn};

use crate::alarm::Alarm;
use crate::AlarmQueue;

// ── Constants ─────────────────────────────────────────────────────────────────

/// `PRODID` used when the configuration does not override it.
pub const DEFAULT_PRODID: &str = "Alarm Clock";

/// `chrono` layout of every iCalendar date-time we read or write (without the
/// trailing `Z`).
const ICAL_DATETIME_FORMAT: &str = "%Y%m%dT%H%M%S";

const CRLF: &str = "\r\n";

// ── Text level ────────────────────────────────────────────────────────────────

/// Formats a UTC instant as `yyyyMMddTHHmmss` (no `Z`).
pub fn format_datestamp(at: &DateTime<Utc>) -> String {
    at.format(ICAL_DATETIME_FORMAT).to_string()
}

/// Renders `keys` (already ascending) as a complete calendar.
///
/// `datestamp` becomes every event's `DTSTAMP`; `UID` is the event's index.
///
/// # Errors
/// [`CalendarError::UnrepresentableKey`] if a key is outside chrono's range.
pub fn generate(keys: &[i64], datestamp: &DateTime<Utc>, prodid: &str) -> Result<String, CalendarError> {
    let stamp = format_datestamp(datestamp);

    let mut out = String::new();
    push_line(&mut out, "BEGIN:VCALENDAR");
    push_line(&mut out, "VERSION:2.0");
    push_line(&mut out, &format!("PRODID:{prodid}"));

    for (uid, &key) in keys.iter().enumerate() {
        let start = Alarm::new(key)
            .utc()
            .ok_or(CalendarError::UnrepresentableKey(key))?;
        let event_date = format_datestamp(&start);

        push_line(&mut out, "BEGIN:VEVENT");
        push_line(&mut out, &format!("UID:{uid}"));
        push_line(&mut out, &format!("DTSTAMP:{stamp}Z"));
        push_line(&mut out, &format!("DTSTART:{event_date}Z"));
        push_line(&mut out, &format!("DTEND:{event_date}Z"));
        push_line(&mut out, "END:VEVENT");
    }

    out.push_str("END:VCALENDAR");
    Ok(out)
}

fn push_line(out: &mut String, line: &str) {
    // Writing into a String cannot fail.
    let _ = write!(out, "{line}{CRLF}");
}

/// Extracts every `DTSTART:` value as milliseconds since the epoch, in file
/// order.
///
/// Lines are matched after trimming surrounding whitespace; the trailing `Z`
/// is optional.  Every other line is ignored.
///
/// # Errors
/// [`CalendarError::InvalidTimestamp`] for the first malformed value.
pub fn parse_start_times(text: &str) -> Result<Vec<i64>, CalendarError> {
    let mut starts = Vec::new();

    for (idx, raw) in text.lines().enumerate() {
        let Some(value) = raw.trim().strip_prefix("DTSTART:") else {
            continue;
        };
        let value = value.trim();
        let digits = value.strip_suffix('Z').unwrap_or(value);

        let naive = NaiveDateTime::parse_from_str(digits, ICAL_DATETIME_FORMAT).map_err(|_| {
            CalendarError::InvalidTimestamp {
                line: idx + 1,
                value: value.to_string(),
            }
        })?;
        starts.push(Utc.from_utc_datetime(&naive).timestamp_millis());
    }

    Ok(starts)
}

// ── Queue level ───────────────────────────────────────────────────────────────

/// Outcome of [`load_into`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoadReport {
    /// Alarms inserted into the queue.
    pub loaded: usize,
    /// Events whose start was not strictly after the load time.
    pub skipped: usize,
}

/// Inserts one alarm per future `DTSTART` in `text`.
///
/// The whole text is parsed before anything is inserted, so a malformed file
/// leaves the queue untouched.
pub fn load_into(queue: &AlarmQueue, text: &str, now_ms: i64) -> Result<LoadReport, CalendarError> {
    let starts = parse_start_times(text)?;
    let mut report = LoadReport::default();

    for start in starts {
        if start > now_ms {
            queue.insert(Alarm::new(start), start);
            report.loaded += 1;
        } else {
            debug!(start, now_ms, "Skipping past alarm from calendar");
            report.skipped += 1;
        }
    }

    Ok(report)
}

/// Renders the current queue contents as calendar text.
pub fn export_queue(queue: &AlarmQueue, datestamp: &DateTime<Utc>, prodid: &str) -> Result<String, CalendarError> {
    generate(&queue.keys_ascending(), datestamp, prodid)
}

// ── File level ────────────────────────────────────────────────────────────────

/// Reads `path` and loads its future alarms into `queue`.
pub fn load_from_file(path: &Path, queue: &AlarmQueue, now_ms: i64) -> Result<LoadReport> {
    info!("Loading alarms from: {}", path.display());

    let text = std::fs::read_to_string(path)
        .with_context(|| format!("Cannot open calendar file: {}", path.display()))?;

    let report = load_into(queue, &text, now_ms)
        .with_context(|| format!("Failed to parse calendar file: {}", path.display()))?;

    if report.skipped > 0 {
        warn!(
            skipped = report.skipped,
            "Ignored alarms that are already in the past"
        );
    }
    info!(loaded = report.loaded, "Alarms loaded");

    Ok(report)
}

/// Writes the pending alarms of `queue` to `path`, stamped with the current
/// time.
pub fn save_to_file(path: &Path, queue: &AlarmQueue, prodid: &str) -> Result<usize> {
    let keys = queue.keys_ascending();
    let text = generate(&keys, &Utc::now(), prodid)
        .with_context(|| format!("Failed to render calendar for: {}", path.display()))?;

    std::fs::write(path, text)
        .with_context(|| format!("Cannot write calendar file: {}", path.display()))?;

    info!(count = keys.len(), "Saved alarms to {}", path.display());
    Ok(keys.len())
}

// ── Tests ─────────────────────────────────────────────────────────────────────
