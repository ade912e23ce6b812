//! Midday break overrun.

use crate::models::{AuditStep, PunchSet, ScheduleSpec, ShiftOverride};

use super::time_utils::{seconds_between, to_minutes_floor, window_seconds};

/// The result of measuring the midday break against its allowance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IntervalExcessResult {
    /// Seconds actually spent on break, when measurable.
    pub real_break_seconds: Option<i64>,
    /// Seconds of break the schedule grants, when configured.
    pub expected_break_seconds: Option<i64>,
    /// Seconds beyond the allowance.
    pub excess_seconds: i64,
    /// `floor(excess_seconds / 60)`.
    pub excess_minutes: i64,
    /// The audit step recording this calculation.
    pub audit_step: AuditStep,
}

/// Measures how far the midday break exceeded its allowance.
///
/// The real break is `afternoon_entry - lunch_exit`. The expected break is
/// the override's `break_minutes`, or `afternoon_start - morning_end` for a
/// full-day schedule. `tolerance_minutes` widens the allowance. Absent punches
/// or schedule fields yield zero.
///
/// # Example
///
/// ```
/// use ponto_engine::calculation::calculate_interval_excess;
/// use ponto_engine::models::{PunchSet, ScheduleSpec};
/// use chrono::{NaiveDateTime, NaiveTime};
///
/// let at = |s: &str| NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M").ok();
/// let t = |h, m| NaiveTime::from_hms_opt(h, m, 0);
/// let schedule = ScheduleSpec {
///     morning_start: t(8, 0),
///     morning_end: t(12, 0),
///     afternoon_start: t(13, 0),
///     afternoon_end: t(17, 0),
/// };
/// let punches = PunchSet {
///     morning_entry: at("2025-03-10 07:55"),
///     lunch_exit: at("2025-03-10 12:05"),
///     afternoon_entry: at("2025-03-10 14:08"),
///     final_exit: at("2025-03-10 18:00"),
/// };
///
/// let result = calculate_interval_excess(&punches, &schedule, None, 0, 1);
/// assert_eq!(result.excess_minutes, 63);
/// ```
pub fn calculate_interval_excess(
    punches: &PunchSet,
    schedule: &ScheduleSpec,
    shift_override: Option<&ShiftOverride>,
    tolerance_minutes: i64,
    step_number: u32,
) -> IntervalExcessResult {
    let real_break_seconds = match (punches.lunch_exit, punches.afternoon_entry) {
        (Some(exit), Some(entry)) => Some(seconds_between(exit, entry)),
        _ => None,
    };

    let expected_break_seconds = match shift_override {
        Some(shift) => Some(shift.break_minutes.saturating_mul(60)),
        None => match (schedule.morning_end, schedule.afternoon_start) {
            (Some(end), Some(start)) => Some(window_seconds(end, start)),
            _ => None,
        },
    };

    let (excess_seconds, reasoning) = match (real_break_seconds, expected_break_seconds) {
        (Some(real), Some(expected)) => {
            let allowed = expected.saturating_add(tolerance_minutes.saturating_mul(60));
            let excess = real.saturating_sub(allowed).max(0);
            let reasoning = if excess > 0 {
                format!(
                    "Break of {}s exceeds allowance of {}s ({}s expected + {} min tolerance) by {}s",
                    real, allowed, expected, tolerance_minutes, excess
                )
            } else {
                format!("Break of {}s within allowance of {}s", real, allowed)
            };
            (excess, reasoning)
        }
        (None, _) => (
            0,
            "Break punches not both present, no interval excess".to_string(),
        ),
        (_, None) => (
            0,
            "Break not defined by schedule, no interval excess".to_string(),
        ),
    };

    let excess_minutes = to_minutes_floor(excess_seconds);

    let audit_step = AuditStep {
        step_number,
        rule_id: "interval_excess".to_string(),
        rule_name: "Interval Excess".to_string(),
        clause_ref: "CLT art. 71".to_string(),
        input: serde_json::json!({
            "real_break_seconds": real_break_seconds,
            "expected_break_seconds": expected_break_seconds,
            "tolerance_minutes": tolerance_minutes,
        }),
        output: serde_json::json!({
            "excess_seconds": excess_seconds,
            "excess_minutes": excess_minutes,
        }),
        reasoning,
    };

    IntervalExcessResult {
        real_break_seconds,
        expected_break_seconds,
        excess_seconds,
        excess_minutes,
        audit_step,
    }
}
