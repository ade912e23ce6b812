//! Worked time calculation.
//!
//! Derives the actual worked duration from punch pairs. Seconds from every
//! contributing period are summed before the single floor to minutes.

use serde::{Deserialize, Serialize};

use crate::models::{AuditStep, PunchSet, ShiftOverride};

use super::time_utils::{seconds_between, to_minutes_floor};

/// How the punches were interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WorkedTimeMode {
    /// Four punches, two independent half-shifts.
    FullDay,
    /// Four punches, one continuous shift with an internal break.
    ContinuousShift,
    /// Only the morning pair is usable.
    MorningPair,
    /// Only the afternoon pair is usable.
    AfternoonPair,
    /// No complete pair; nothing is counted.
    NoPair,
}

/// The result of calculating worked time for one day.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkedTimeResult {
    /// Seconds worked in the first period (morning or pre-break).
    pub morning_seconds: i64,
    /// Seconds worked in the second period (afternoon or post-break).
    pub afternoon_seconds: i64,
    /// Sum of both periods.
    pub total_seconds: i64,
    /// `floor(total_seconds / 60)`.
    pub total_minutes: i64,
    /// How the punches were interpreted.
    pub mode: WorkedTimeMode,
    /// The audit step recording this calculation.
    pub audit_step: AuditStep,
}

/// Calculates the seconds worked from a day's punches.
///
/// Each period is `exit - entry` clamped at zero, so reversed punches never
/// produce negative work. Under a [`ShiftOverride`] the break between
/// `lunch_exit` and `afternoon_entry` is owed to the employee and is simply
/// not part of either period; it is never subtracted.
///
/// # Example
///
/// ```
/// use ponto_engine::calculation::{calculate_worked_time, WorkedTimeMode};
/// use ponto_engine::models::PunchSet;
/// use chrono::NaiveDateTime;
///
/// let at = |s: &str| NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M").unwrap();
/// let punches = PunchSet {
///     morning_entry: Some(at("2025-03-10 08:13")),
///     lunch_exit: Some(at("2025-03-10 12:11")),
///     afternoon_entry: Some(at("2025-03-10 14:11")),
///     final_exit: Some(at("2025-03-10 17:56")),
/// };
///
/// let result = calculate_worked_time(&punches, None, 1);
/// assert_eq!(result.mode, WorkedTimeMode::FullDay);
/// assert_eq!(result.total_minutes, 463);
/// ```
pub fn calculate_worked_time(
    punches: &PunchSet,
    shift_override: Option<&ShiftOverride>,
    step_number: u32,
) -> WorkedTimeResult {
    let morning_pair = match (punches.morning_entry, punches.lunch_exit) {
        (Some(entry), Some(exit)) => Some(seconds_between(entry, exit).max(0)),
        _ => None,
    };
    let afternoon_pair = match (punches.afternoon_entry, punches.final_exit) {
        (Some(entry), Some(exit)) => Some(seconds_between(entry, exit).max(0)),
        _ => None,
    };

    let (morning_seconds, afternoon_seconds, mode) = match (morning_pair, afternoon_pair) {
        (Some(first), Some(second)) if shift_override.is_some() => {
            (first, second, WorkedTimeMode::ContinuousShift)
        }
        (Some(morning), Some(afternoon)) => (morning, afternoon, WorkedTimeMode::FullDay),
        (Some(morning), None) => (morning, 0, WorkedTimeMode::MorningPair),
        (None, Some(afternoon)) => (0, afternoon, WorkedTimeMode::AfternoonPair),
        (None, None) => (0, 0, WorkedTimeMode::NoPair),
    };

    let total_seconds = morning_seconds + afternoon_seconds;
    let total_minutes = to_minutes_floor(total_seconds);

    let reasoning = match mode {
        WorkedTimeMode::FullDay => format!(
            "Full day: morning {}s + afternoon {}s = {}s, floored to {} min",
            morning_seconds, afternoon_seconds, total_seconds, total_minutes
        ),
        WorkedTimeMode::ContinuousShift => format!(
            "Continuous shift: pre-break {}s + post-break {}s = {}s, break not deducted, floored to {} min",
            morning_seconds, afternoon_seconds, total_seconds, total_minutes
        ),
        WorkedTimeMode::MorningPair => format!(
            "Partial day: only the morning pair is complete, {}s floored to {} min",
            total_seconds, total_minutes
        ),
        WorkedTimeMode::AfternoonPair => format!(
            "Partial day: only the afternoon pair is complete, {}s floored to {} min",
            total_seconds, total_minutes
        ),
        WorkedTimeMode::NoPair => {
            "No complete punch pair, worked time is zero".to_string()
        }
    };

    let audit_step = AuditStep {
        step_number,
        rule_id: "worked_time".to_string(),
        rule_name: "Worked Time".to_string(),
        clause_ref: String::new(),
        input: serde_json::json!({
            "punch_count": punches.count(),
            "shift_override": shift_override.map(|o| o.kind.to_string()),
        }),
        output: serde_json::json!({
            "mode": mode,
            "morning_seconds": morning_seconds,
            "afternoon_seconds": afternoon_seconds,
            "total_seconds": total_seconds,
            "total_minutes": total_minutes,
        }),
        reasoning,
    };

    WorkedTimeResult {
        morning_seconds,
        afternoon_seconds,
        total_seconds,
        total_minutes,
        mode,
        audit_step,
    }
}
