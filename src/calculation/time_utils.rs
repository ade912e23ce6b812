//! Primitive time arithmetic.
//!
//! Punch clocks record seconds but the tolerance rules operate on whole
//! minutes. Durations are therefore kept in seconds and floored once at the
//! end, while journey comparisons strip seconds before subtracting.

use chrono::{NaiveDateTime, NaiveTime, Timelike};

use crate::error::{EngineError, EngineResult};

/// Minutes in a calendar day. Upper bound for configured break and tolerance
/// lengths.
pub const MINUTES_PER_DAY: i64 = 24 * 60;

const TIME_OF_DAY_FORMATS: [&str; 2] = ["%H:%M", "%H:%M:%S"];

const PUNCH_FORMATS: [&str; 4] = [
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M",
];

/// Floors a number of seconds to whole minutes.
///
/// # Example
///
/// ```
/// use ponto_engine::calculation::to_minutes_floor;
///
/// assert_eq!(to_minutes_floor(119), 1);
/// assert_eq!(to_minutes_floor(120), 2);
/// assert_eq!(to_minutes_floor(-1), -1);
/// ```
pub fn to_minutes_floor(seconds: i64) -> i64 {
    seconds.div_euclid(60)
}

/// Signed difference `real - scheduled` in whole minutes.
///
/// Seconds are dropped from both operands first, so `08:00:59` and
/// `08:00:00` compare equal.
///
/// # Example
///
/// ```
/// use ponto_engine::calculation::minute_delta;
/// use chrono::NaiveTime;
///
/// let scheduled = NaiveTime::from_hms_opt(8, 0, 0).unwrap();
/// let real = NaiveTime::from_hms_opt(8, 13, 59).unwrap();
/// assert_eq!(minute_delta(scheduled, real), 13);
/// assert_eq!(minute_delta(real, scheduled), -13);
/// ```
pub fn minute_delta(scheduled: NaiveTime, real: NaiveTime) -> i64 {
    minute_of_day(real) - minute_of_day(scheduled)
}

fn minute_of_day(time: NaiveTime) -> i64 {
    i64::from(time.hour()) * 60 + i64::from(time.minute())
}

/// Seconds elapsed between two instants, negative when `end` precedes `start`.
pub fn seconds_between(start: NaiveDateTime, end: NaiveDateTime) -> i64 {
    (end - start).num_seconds()
}

/// Seconds between two times of day, negative for an inverted window.
pub fn window_seconds(start: NaiveTime, end: NaiveTime) -> i64 {
    seconds_since_midnight(end) - seconds_since_midnight(start)
}

/// Seconds since midnight for a time of day.
pub fn seconds_since_midnight(time: NaiveTime) -> i64 {
    i64::from(time.num_seconds_from_midnight())
}

/// Parses `HH:MM` (or `HH:MM:SS`) into a time of day.
///
/// # Example
///
/// ```
/// use ponto_engine::calculation::parse_time_of_day;
/// use chrono::NaiveTime;
///
/// assert_eq!(
///     parse_time_of_day("13:30").unwrap(),
///     NaiveTime::from_hms_opt(13, 30, 0).unwrap()
/// );
/// assert!(parse_time_of_day("25:00").is_err());
/// ```
pub fn parse_time_of_day(value: &str) -> EngineResult<NaiveTime> {
    let value = value.trim();
    TIME_OF_DAY_FORMATS
        .iter()
        .find_map(|format| NaiveTime::parse_from_str(value, format).ok())
        .ok_or_else(|| EngineError::InvalidTimeValue {
            value: value.to_string(),
        })
}

/// Parses `HH:MM` into seconds since midnight.
///
/// # Example
///
/// ```
/// use ponto_engine::calculation::time_of_day_to_seconds;
///
/// assert_eq!(time_of_day_to_seconds("08:30").unwrap(), 30600);
/// assert!(time_of_day_to_seconds("eight").is_err());
/// ```
pub fn time_of_day_to_seconds(value: &str) -> EngineResult<i64> {
    parse_time_of_day(value).map(seconds_since_midnight)
}

/// Parses a punch timestamp such as `2025-03-10 08:02:41`.
///
/// Accepts a space or `T` separator, with or without seconds.
pub fn parse_punch(value: &str) -> EngineResult<NaiveDateTime> {
    let value = value.trim();
    PUNCH_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(value, format).ok())
        .ok_or_else(|| EngineError::InvalidTimeValue {
            value: value.to_string(),
        })
}
