/*
SPDX-FileCopyrightText: Copyright 2026 LG Electronics Inc.
SPDX-License-Identifier: MIT
*/

//! The alarm value stored in the queue.
//!
//! An [`Alarm`] is nothing more than its fire time in milliseconds since the
//! Unix epoch; the same value is used as the queue key.  The helpers here turn
//! a wall-clock `HH:MM` chosen by the user into that timestamp and back into
//! something displayable.

use std::fmt;

use chrono::{DateTime, Local, NaiveTime, TimeZone, Utc};
use thiserror::Error;

// ── Errors ────────────────────────────────────────────────────────────────────

/// Why an alarm time could not be built.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AlarmError {
    /// `hour` must be `0..=23` and `minute` `0..=59`.
    #[error("invalid alarm time {hour:02}:{minute:02} (expected 00:00 to 23:59)")]
    InvalidTime { hour: u32, minute: u32 },

    /// The text is not of the form `HH:MM` with numeric fields.
    #[error("malformed alarm time {0:?} (expected HH:MM)")]
    Malformed(String),

    /// No local instant for the requested time exists in the next few days
    /// (calendar overflow, or a time zone without that wall-clock time).
    #[error("no representable occurrence of {hour:02}:{minute:02} after the current time")]
    NoOccurrence { hour: u32, minute: u32 },
}

// ── Alarm ─────────────────────────────────────────────────────────────────────

/// A pending alarm: fires once at `fire_at_ms`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Alarm {
    fire_at_ms: i64,
}

impl Alarm {
    pub fn new(fire_at_ms: i64) -> Self {
        Self { fire_at_ms }
    }

    /// Fire time in milliseconds since the Unix epoch (the queue key).
    pub fn fire_at_ms(&self) -> i64 {
        self.fire_at_ms
    }

    /// Next `hour:minute:00` in `now`'s time zone that lies strictly after
    /// `now` – today if it is still ahead, tomorrow otherwise.
    ///
    /// Days on which that wall-clock time does not exist (DST gap) are
    /// skipped.
    pub fn next_occurrence<Tz: TimeZone>(
        hour: u32,
        minute: u32,
        now: &DateTime<Tz>,
    ) -> Result<Self, AlarmError> {
        let time =
            NaiveTime::from_hms_opt(hour, minute, 0).ok_or(AlarmError::InvalidTime { hour, minute })?;
        let no_occurrence = AlarmError::NoOccurrence { hour, minute };

        let tz = now.timezone();
        let mut date = now.date_naive();
        for _ in 0..3 {
            if let Some(candidate) = tz.from_local_datetime(&date.and_time(time)).earliest() {
                if candidate > *now {
                    return Ok(Self::new(candidate.timestamp_millis()));
                }
            }
            date = date.succ_opt().ok_or_else(|| no_occurrence.clone())?;
        }
        Err(no_occurrence)
    }

    /// `true` once `now_ms` has reached the fire time.
    pub fn is_due(&self, now_ms: i64) -> bool {
        self.fire_at_ms <= now_ms
    }

    /// Fire time as a UTC date-time, `None` if outside chrono's range.
    pub fn utc(&self) -> Option<DateTime<Utc>> {
        Utc.timestamp_millis_opt(self.fire_at_ms).single()
    }

    /// Fire time rendered in the local time zone, e.g. `2018-05-20 17:04`.
    pub fn local_time(&self) -> String {
        match self.utc() {
            Some(utc) => utc.with_timezone(&Local).format("%Y-%m-%d %H:%M").to_string(),
            None => format!("<{} ms>", self.fire_at_ms),
        }
    }
}

impl fmt::Display for Alarm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.fire_at_ms)
    }
}

/// Parses `"HH:MM"` into `(hour, minute)`.
pub fn parse_time_of_day(s: &str) -> Result<(u32, u32), AlarmError> {
    let malformed = || AlarmError::Malformed(s.to_string());
    let (h, m) = s.trim().split_once(':').ok_or_else(malformed)?;
    let hour: u32 = h.parse().map_err(|_| malformed())?;
    let minute: u32 = m.parse().map_err(|_| malformed())?;
    if hour > 23 || minute > 59 {
        return Err(AlarmError::InvalidTime { hour, minute });
    }
    Ok((hour, minute))
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::FixedOffset;

    fn utc(y: i32, mo: u32, d: u32, h: u32, mi: u32, s: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, mo, d, h, mi, s).unwrap()
    }

    #[test]
    fn display_is_the_millisecond_value() {
        let alarm = Alarm::new(1_500_000_000);
        assert_eq!(alarm.fire_at_ms(), 1_500_000_000);
        assert_eq!(alarm.to_string(), "1500000000");
    }

    #[test]
    fn next_occurrence_later_today() {
        let now = utc(2018, 5, 20, 16, 4, 28);
        let alarm = Alarm::next_occurrence(17, 0, &now).unwrap();
        assert_eq!(alarm.utc(), Some(utc(2018, 5, 20, 17, 0, 0)));
    }

    #[test]
    fn next_occurrence_rolls_to_tomorrow_when_passed() {
        let now = utc(2018, 5, 20, 16, 4, 28);
        // 16:04:00 is 28 s in the past
        let alarm = Alarm::next_occurrence(16, 4, &now).unwrap();
        assert_eq!(alarm.utc(), Some(utc(2018, 5, 21, 16, 4, 0)));
    }

    #[test]
    fn next_occurrence_exactly_now_rolls_to_tomorrow() {
        let now = utc(2018, 5, 20, 7, 30, 0);
        let alarm = Alarm::next_occurrence(7, 30, &now).unwrap();
        assert_eq!(alarm.utc(), Some(utc(2018, 5, 21, 7, 30, 0)));
    }

    #[test]
    fn next_occurrence_earlier_hour_later_minute_is_tomorrow() {
        // 15:50 has passed at 16:04 even though 50 > 04
        let now = utc(2018, 5, 20, 16, 4, 0);
        let alarm = Alarm::next_occurrence(15, 50, &now).unwrap();
        assert_eq!(alarm.utc(), Some(utc(2018, 5, 21, 15, 50, 0)));
    }

    #[test]
    fn next_occurrence_crosses_month_end() {
        let now = utc(2018, 5, 31, 23, 0, 0);
        let alarm = Alarm::next_occurrence(6, 0, &now).unwrap();
        assert_eq!(alarm.utc(), Some(utc(2018, 6, 1, 6, 0, 0)));
    }

    #[test]
    fn next_occurrence_honours_the_time_zone_of_now() {
        let plus_one = FixedOffset::east_opt(3600).unwrap();
        let now = plus_one.with_ymd_and_hms(2018, 5, 20, 17, 0, 0).unwrap();
        let alarm = Alarm::next_occurrence(18, 0, &now).unwrap();
        // 18:00 at +01:00 is 17:00 UTC
        assert_eq!(alarm.utc(), Some(utc(2018, 5, 20, 17, 0, 0)));
    }

    #[test]
    fn next_occurrence_rejects_invalid_time() {
        let now = utc(2018, 5, 20, 0, 0, 0);
        assert_eq!(
            Alarm::next_occurrence(24, 0, &now),
            Err(AlarmError::InvalidTime { hour: 24, minute: 0 })
        );
        assert!(Alarm::next_occurrence(7, 60, &now).is_err());
    }

    #[test]
    fn is_due_at_and_after_fire_time() {
        let alarm = Alarm::new(1_000);
        assert!(!alarm.is_due(999));
        assert!(alarm.is_due(1_000));
        assert!(alarm.is_due(1_001));
    }

    #[test]
    fn parse_time_of_day_accepts_hh_mm() {
        assert_eq!(parse_time_of_day("07:05"), Ok((7, 5)));
        assert_eq!(parse_time_of_day(" 23:59 "), Ok((23, 59)));
        assert_eq!(parse_time_of_day("0:0"), Ok((0, 0)));
    }

    #[test]
    fn parse_time_of_day_rejects_garbage() {
        assert_eq!(
            parse_time_of_day("7"),
            Err(AlarmError::Malformed("7".to_string()))
        );
        assert!(matches!(parse_time_of_day("ab:cd"), Err(AlarmError::Malformed(_))));
        assert_eq!(
            parse_time_of_day("25:00"),
            Err(AlarmError::InvalidTime { hour: 25, minute: 0 })
        );
    }

    #[test]
    fn malformed_time_reports_what_was_typed() {
        let err = parse_time_of_day("07:xx").unwrap_err();
        assert_eq!(err, AlarmError::Malformed("07:xx".to_string()));
        let msg = err.to_string();
        assert!(msg.contains("07:xx"), "{msg}");
        assert!(!msg.contains("00:00"), "{msg}");
    }

    #[test]
    fn local_time_handles_out_of_range_values() {
        assert!(Alarm::new(i64::MAX).local_time().starts_with('<'));
        assert_eq!(Alarm::new(0).local_time().len(), "1970-01-01 00:00".len());
    }
}
