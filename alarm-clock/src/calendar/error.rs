/*
SPDX-FileCopyrightText: Copyright 2026 LG Electronics Inc.
SPDX-License-Identifier: MIT
*/

//! Structured error type for the iCalendar layer.

use thiserror::Error;

/// Failure while reading or writing calendar text.
///
/// File I/O failures are not represented here: the file-level helpers in
/// [`calendar`](super) wrap these values in `anyhow` context instead.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CalendarError {
    /// A `DTSTART:` value is not in `yyyyMMddTHHmmss[Z]` form.
    #[error("line {line}: invalid DTSTART value '{value}' (expected yyyyMMddTHHmmssZ)")]
    InvalidTimestamp { line: usize, value: String },

    /// A queued key cannot be expressed as a calendar date-time.
    #[error("alarm timestamp {0} ms is outside the representable calendar range")]
    UnrepresentableKey(i64),
}
