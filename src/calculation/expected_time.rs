//! Expected (scheduled) time calculation.

use crate::models::{AuditStep, ScheduleSpec, ShiftKind, ShiftOverride};

use super::time_utils::{to_minutes_floor, window_seconds};

/// The result of calculating the scheduled duration of a day.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExpectedTimeResult {
    /// Seconds scheduled in the morning half.
    pub morning_seconds: i64,
    /// Seconds scheduled in the afternoon half.
    pub afternoon_seconds: i64,
    /// Total scheduled seconds.
    pub total_seconds: i64,
    /// `floor(total_seconds / 60)`.
    pub total_minutes: i64,
    /// The audit step recording this calculation.
    pub audit_step: AuditStep,
}

/// Calculates the scheduled duration from the shift definition.
///
/// Without an override each half contributes `max(0, end - start)`, so an
/// inverted window counts as zero. With an override the day is one shift from
/// the kind's entry start to `afternoon_end`, less the break.
///
/// # Example
///
/// ```
/// use ponto_engine::calculation::calculate_expected_time;
/// use ponto_engine::models::{ScheduleSpec, ShiftKind, ShiftOverride};
/// use chrono::NaiveTime;
///
/// let t = |h, m| NaiveTime::from_hms_opt(h, m, 0);
/// let schedule = ScheduleSpec {
///     morning_start: t(7, 0),
///     morning_end: None,
///     afternoon_start: None,
///     afternoon_end: t(13, 15),
/// };
/// let shift_override = ShiftOverride { kind: ShiftKind::MorningOnly, break_minutes: 15 };
///
/// let result = calculate_expected_time(&schedule, Some(&shift_override), 1);
/// assert_eq!(result.total_minutes, 360);
/// ```
pub fn calculate_expected_time(
    schedule: &ScheduleSpec,
    shift_override: Option<&ShiftOverride>,
    step_number: u32,
) -> ExpectedTimeResult {
    let (morning_seconds, afternoon_seconds, reasoning) = match shift_override {
        Some(shift) => {
            let span = match (shift.entry_start(schedule), schedule.afternoon_end) {
                (Some(start), Some(end)) => Some(window_seconds(start, end)),
                _ => None,
            };
            let total = span
                .map(|span| span.saturating_sub(shift.break_minutes.saturating_mul(60)).max(0))
                .unwrap_or(0);
            let reasoning = match span {
                Some(span) => format!(
                    "{} shift: span {}s less {} min break = {}s",
                    shift.kind, span, shift.break_minutes, total
                ),
                None => format!(
                    "{} shift: entry start or afternoon end not configured, expected time is zero",
                    shift.kind
                ),
            };
            match shift.kind {
                ShiftKind::MorningOnly => (total, 0, reasoning),
                ShiftKind::AfternoonOnly => (0, total, reasoning),
            }
        }
        None => {
            let morning = match (schedule.morning_start, schedule.morning_end) {
                (Some(start), Some(end)) => window_seconds(start, end).max(0),
                _ => 0,
            };
            let afternoon = match (schedule.afternoon_start, schedule.afternoon_end) {
                (Some(start), Some(end)) => window_seconds(start, end).max(0),
                _ => 0,
            };
            let reasoning = format!(
                "Scheduled morning {}s + afternoon {}s = {}s",
                morning,
                afternoon,
                morning + afternoon
            );
            (morning, afternoon, reasoning)
        }
    };

    let total_seconds = morning_seconds + afternoon_seconds;
    let total_minutes = to_minutes_floor(total_seconds);

    let audit_step = AuditStep {
        step_number,
        rule_id: "expected_time".to_string(),
        rule_name: "Expected Time".to_string(),
        clause_ref: String::new(),
        input: serde_json::json!({
            "morning_start": schedule.morning_start.map(|t| t.format("%H:%M").to_string()),
            "morning_end": schedule.morning_end.map(|t| t.format("%H:%M").to_string()),
            "afternoon_start": schedule.afternoon_start.map(|t| t.format("%H:%M").to_string()),
            "afternoon_end": schedule.afternoon_end.map(|t| t.format("%H:%M").to_string()),
            "break_minutes": shift_override.map(|o| o.break_minutes),
        }),
        output: serde_json::json!({
            "morning_seconds": morning_seconds,
            "afternoon_seconds": afternoon_seconds,
            "total_seconds": total_seconds,
            "total_minutes": total_minutes,
        }),
        reasoning,
    };

    ExpectedTimeResult {
        morning_seconds,
        afternoon_seconds,
        total_seconds,
        total_minutes,
        audit_step,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveTime;

    fn t(h: u32, m: u32) -> Option<NaiveTime> {
        NaiveTime::from_hms_opt(h, m, 0)
    }

    fn schedule(
        morning_start: Option<NaiveTime>,
        morning_end: Option<NaiveTime>,
        afternoon_start: Option<NaiveTime>,
        afternoon_end: Option<NaiveTime>,
    ) -> ScheduleSpec {
        ScheduleSpec {
            morning_start,
            morning_end,
            afternoon_start,
            afternoon_end,
        }
    }

    #[test]
    fn test_full_day_schedule() {
        let full_day = schedule(t(8, 0), t(12, 0), t(14, 0), t(18, 0));
        let result = calculate_expected_time(&full_day, None, 2);
        assert_eq!(result.morning_seconds, 14_400);
        assert_eq!(result.afternoon_seconds, 14_400);
        assert_eq!(result.total_minutes, 480);
        assert_eq!(result.audit_step.step_number, 2);
    }

    #[test]
    fn test_afternoon_only_schedule() {
        let afternoon = schedule(None, None, t(13, 0), t(18, 0));
        let result = calculate_expected_time(&afternoon, None, 1);
        assert_eq!(result.morning_seconds, 0);
        assert_eq!(result.total_minutes, 300);
    }

    #[test]
    fn test_inverted_window_degrades_to_zero() {
        let inverted = schedule(t(12, 0), t(8, 0), t(13, 0), t(17, 0));
        let result = calculate_expected_time(&inverted, None, 1);
        assert_eq!(result.morning_seconds, 0);
        assert_eq!(result.total_minutes, 240);
    }

    #[test]
    fn test_unscheduled_day_expects_nothing() {
        let result = calculate_expected_time(&ScheduleSpec::default(), None, 1);
        assert_eq!(result.total_seconds, 0);
    }

    #[test]
    fn test_afternoon_only_override_uses_afternoon_start() {
        let shift_override = ShiftOverride {
            kind: ShiftKind::AfternoonOnly,
            break_minutes: 15,
        };
        let result = calculate_expected_time(
            &schedule(None, None, t(13, 0), t(19, 15)),
            Some(&shift_override),
            1,
        );
        assert_eq!(result.morning_seconds, 0);
        assert_eq!(result.afternoon_seconds, 6 * 3600);
        assert_eq!(result.total_minutes, 360);
    }

    #[test]
    fn test_override_break_longer_than_span_clamps() {
        let shift_override = ShiftOverride {
            kind: ShiftKind::MorningOnly,
            break_minutes: 600,
        };
        let result = calculate_expected_time(
            &schedule(t(8, 0), t(12, 0), t(13, 0), t(17, 0)),
            Some(&shift_override),
            1,
        );
        assert_eq!(result.total_seconds, 0);
    }

    #[test]
    fn test_override_missing_fields_is_zero() {
        let shift_override = ShiftOverride {
            kind: ShiftKind::MorningOnly,
            break_minutes: 15,
        };
        let result = calculate_expected_time(
            &schedule(None, None, t(13, 0), t(17, 0)),
            Some(&shift_override),
            1,
        );
        assert_eq!(result.total_seconds, 0);
        assert!(result.audit_step.reasoning.contains("not configured"));
    }
}
