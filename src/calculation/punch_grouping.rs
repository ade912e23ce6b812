//! Assignment of raw clock events to the four punch slots.

use chrono::{NaiveDateTime, NaiveTime, Timelike};
use serde::{Deserialize, Serialize};

use crate::models::{PunchDirection, PunchEvent, PunchSet};

/// Default cutoff separating morning from afternoon for sparse days.
pub fn default_noon_cutoff() -> NaiveTime {
    NaiveTime::from_hms_opt(12, 0, 0).unwrap_or_default()
}

/// Punches assigned to slots, with bookkeeping about what was dropped.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupedPunches {
    /// The assigned slots.
    pub punches: PunchSet,
    /// Number of punches left after deduplication.
    pub distinct_count: usize,
    /// Distinct punches beyond the fourth, which are not used.
    pub ignored_extras: usize,
    /// Duplicates removed (same minute and direction).
    pub duplicates_removed: usize,
}

fn minute_key(timestamp: NaiveDateTime) -> Option<NaiveDateTime> {
    timestamp.with_second(0)?.with_nanosecond(0)
}

/// Groups a day's clock events into a [`PunchSet`].
///
/// Events are sorted chronologically and deduplicated when they fall on the
/// same minute with the same direction. Then, by count:
///
/// | distinct | assignment                                                  |
/// |----------|-------------------------------------------------------------|
/// | 4+       | first four fill the slots in order, the rest are ignored    |
/// | 3        | `morning_entry`, `lunch_exit`, `afternoon_entry`            |
/// | 2        | morning pair if the first is before `noon`, else afternoon  |
/// | 1        | `morning_entry` if before `noon`, else `afternoon_entry`    |
///
/// # Example
///
/// ```
/// use ponto_engine::calculation::{default_noon_cutoff, group_punches};
/// use ponto_engine::models::{PunchDirection, PunchEvent};
/// use chrono::NaiveDateTime;
///
/// let event = |s: &str| PunchEvent {
///     timestamp: NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S").unwrap(),
///     direction: PunchDirection::Unknown,
/// };
/// let events = [event("2025-03-10 18:19:00"), event("2025-03-10 12:54:00")];
///
/// let grouped = group_punches(&events, default_noon_cutoff());
/// assert!(grouped.punches.morning_entry.is_none());
/// assert!(grouped.punches.afternoon_entry.is_some());
/// assert!(grouped.punches.final_exit.is_some());
/// ```
pub fn group_punches(events: &[PunchEvent], noon: NaiveTime) -> GroupedPunches {
    let mut sorted: Vec<&PunchEvent> = events.iter().collect();
    sorted.sort_by_key(|e| e.timestamp);

    let mut seen: Vec<(Option<NaiveDateTime>, PunchDirection)> = Vec::with_capacity(sorted.len());
    let mut distinct: Vec<NaiveDateTime> = Vec::with_capacity(sorted.len());
    for event in sorted {
        let key = (minute_key(event.timestamp), event.direction);
        if seen.contains(&key) {
            continue;
        }
        seen.push(key);
        distinct.push(event.timestamp);
    }

    let distinct_count = distinct.len();
    let duplicates_removed = events.len() - distinct_count;
    let ignored_extras = distinct_count.saturating_sub(4);

    let punches = match distinct.as_slice() {
        [] => PunchSet::default(),
        [only] if only.time() < noon => PunchSet {
            morning_entry: Some(*only),
            ..Default::default()
        },
        [only] => PunchSet {
            afternoon_entry: Some(*only),
            ..Default::default()
        },
        [first, second] if first.time() < noon => PunchSet {
            morning_entry: Some(*first),
            lunch_exit: Some(*second),
            ..Default::default()
        },
        [first, second] => PunchSet {
            afternoon_entry: Some(*first),
            final_exit: Some(*second),
            ..Default::default()
        },
        [first, second, third] => PunchSet {
            morning_entry: Some(*first),
            lunch_exit: Some(*second),
            afternoon_entry: Some(*third),
            final_exit: None,
        },
        [first, second, third, fourth, ..] => PunchSet {
            morning_entry: Some(*first),
            lunch_exit: Some(*second),
            afternoon_entry: Some(*third),
            final_exit: Some(*fourth),
        },
    };

    GroupedPunches {
        punches,
        distinct_count,
        ignored_extras,
        duplicates_removed,
    }
}
