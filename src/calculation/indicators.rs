//! Journey event identification and informal indicators.
//!
//! The journey start and end deltas found here feed the CLT tolerance
//! engine. The indicators themselves are raw and for display only; they
//! never affect the balance or the CLT figures.

use chrono::{NaiveDateTime, NaiveTime};

use crate::models::{AuditStep, InformalIndicators, PunchSet, ScheduleSpec, ShiftOverride};

use super::time_utils::minute_delta;

/// One journey event: the scheduled time and the punch compared against it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct JourneyEvent {
    /// Which punch slot was used.
    pub slot: &'static str,
    /// The scheduled time of day.
    pub scheduled: NaiveTime,
    /// The punch.
    pub real: NaiveDateTime,
    /// `minute_delta(scheduled, real)`.
    pub delta_minutes: i64,
}

/// The result of identifying the journey events of a day.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndicatorResult {
    /// Journey start, when both the schedule and the punch exist.
    pub start: Option<JourneyEvent>,
    /// Journey end, when both the schedule and the punch exist.
    pub end: Option<JourneyEvent>,
    /// Raw deviations derived from the two deltas.
    pub indicators: InformalIndicators,
    /// The audit step recording this calculation.
    pub audit_step: AuditStep,
}

impl IndicatorResult {
    /// Signed start delta in minutes.
    pub fn delta_start(&self) -> Option<i64> {
        self.start.map(|e| e.delta_minutes)
    }

    /// Signed end delta in minutes.
    pub fn delta_end(&self) -> Option<i64> {
        self.end.map(|e| e.delta_minutes)
    }
}

fn journey_event(
    slot: &'static str,
    scheduled: Option<NaiveTime>,
    real: Option<NaiveDateTime>,
) -> Option<JourneyEvent> {
    let scheduled = scheduled?;
    let real = real?;
    Some(JourneyEvent {
        slot,
        scheduled,
        real,
        delta_minutes: minute_delta(scheduled, real.time()),
    })
}

/// Identifies the journey start and end events and derives the indicators.
///
/// The start event is `morning_entry` against `morning_start` when the
/// morning is scheduled, otherwise `afternoon_entry` against
/// `afternoon_start`. The end event is `final_exit` against `afternoon_end`
/// when the afternoon is scheduled, otherwise `lunch_exit` against
/// `morning_end`. Under a shift override the journey is the single shift:
/// `morning_entry` against the kind's entry start, `final_exit` against
/// `afternoon_end`.
///
/// # Example
///
/// ```
/// use ponto_engine::calculation::calculate_indicators;
/// use ponto_engine::models::{PunchSet, ScheduleSpec};
/// use chrono::{NaiveDateTime, NaiveTime};
///
/// let at = |s: &str| NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M").ok();
/// let t = |h, m| NaiveTime::from_hms_opt(h, m, 0);
/// let schedule = ScheduleSpec {
///     morning_start: None,
///     morning_end: None,
///     afternoon_start: t(13, 0),
///     afternoon_end: t(18, 0),
/// };
/// let punches = PunchSet {
///     afternoon_entry: at("2025-03-10 12:54"),
///     final_exit: at("2025-03-10 18:19"),
///     ..Default::default()
/// };
///
/// let result = calculate_indicators(&punches, &schedule, None, 1);
/// assert_eq!(result.indicators.early_arrival_minutes, 6);
/// assert_eq!(result.indicators.overtime_minutes, 19);
/// ```
pub fn calculate_indicators(
    punches: &PunchSet,
    schedule: &ScheduleSpec,
    shift_override: Option<&ShiftOverride>,
    step_number: u32,
) -> IndicatorResult {
    let (start, end) = match shift_override {
        Some(shift) => (
            journey_event("morning_entry", shift.entry_start(schedule), punches.morning_entry),
            journey_event("final_exit", schedule.afternoon_end, punches.final_exit),
        ),
        None => {
            let start = if schedule.has_morning() {
                journey_event("morning_entry", schedule.morning_start, punches.morning_entry)
            } else {
                journey_event(
                    "afternoon_entry",
                    schedule.afternoon_start,
                    punches.afternoon_entry,
                )
            };
            let end = if schedule.has_afternoon() {
                journey_event("final_exit", schedule.afternoon_end, punches.final_exit)
            } else {
                journey_event("lunch_exit", schedule.morning_end, punches.lunch_exit)
            };
            (start, end)
        }
    };

    let delta_start = start.map(|e| e.delta_minutes).unwrap_or(0);
    let delta_end = end.map(|e| e.delta_minutes).unwrap_or(0);

    let indicators = InformalIndicators {
        delay_minutes: delta_start.max(0),
        early_arrival_minutes: (-delta_start).max(0),
        overtime_minutes: delta_end.max(0),
        early_exit_minutes: (-delta_end).max(0),
    };

    let describe = |label: &str, event: Option<JourneyEvent>| match event {
        Some(e) => format!(
            "{} {} at {} vs scheduled {} ({:+} min)",
            label,
            e.slot,
            e.real.format("%H:%M"),
            e.scheduled.format("%H:%M"),
            e.delta_minutes
        ),
        None => format!("{} not identifiable", label),
    };

    let audit_step = AuditStep {
        step_number,
        rule_id: "informal_indicators".to_string(),
        rule_name: "Informal Indicators".to_string(),
        clause_ref: String::new(),
        input: serde_json::json!({
            "start_slot": start.map(|e| e.slot),
            "end_slot": end.map(|e| e.slot),
        }),
        output: serde_json::json!({
            "delta_start": start.map(|e| e.delta_minutes),
            "delta_end": end.map(|e| e.delta_minutes),
            "delay_minutes": indicators.delay_minutes,
            "early_arrival_minutes": indicators.early_arrival_minutes,
            "overtime_minutes": indicators.overtime_minutes,
            "early_exit_minutes": indicators.early_exit_minutes,
        }),
        reasoning: format!(
            "{}; {}",
            describe("Journey start", start),
            describe("journey end", end)
        ),
    };

    IndicatorResult {
        start,
        end,
        indicators,
        audit_step,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ShiftKind;

    fn at(time_str: &str) -> Option<NaiveDateTime> {
        NaiveDateTime::parse_from_str(&format!("2025-03-10 {}", time_str), "%Y-%m-%d %H:%M:%S")
            .ok()
    }

    fn t(h: u32, m: u32) -> Option<NaiveTime> {
        NaiveTime::from_hms_opt(h, m, 0)
    }

    fn full_day(afternoon_start: u32, afternoon_end: u32) -> ScheduleSpec {
        ScheduleSpec {
            morning_start: t(8, 0),
            morning_end: t(12, 0),
            afternoon_start: t(afternoon_start, 0),
            afternoon_end: t(afternoon_end, 0),
        }
    }

    #[test]
    fn test_late_start_and_early_exit() {
        let punches = PunchSet {
            morning_entry: at("08:13:00"),
            lunch_exit: at("12:11:00"),
            afternoon_entry: at("14:11:00"),
            final_exit: at("17:56:00"),
        };
        let result = calculate_indicators(&punches, &full_day(14, 18), None, 1);

        assert_eq!(result.delta_start(), Some(13));
        assert_eq!(result.delta_end(), Some(-4));
        assert_eq!(
            result.indicators,
            InformalIndicators {
                delay_minutes: 13,
                early_arrival_minutes: 0,
                overtime_minutes: 0,
                early_exit_minutes: 4,
            }
        );
    }

    #[test]
    fn test_seconds_do_not_shift_deltas() {
        let punches = PunchSet {
            morning_entry: at("08:05:59"),
            final_exit: at("16:59:01"),
            ..Default::default()
        };
        let result = calculate_indicators(&punches, &full_day(13, 17), None, 1);

        assert_eq!(result.delta_start(), Some(5));
        assert_eq!(result.delta_end(), Some(-1));
    }

    #[test]
    fn test_morning_only_schedule_ends_at_lunch_exit() {
        let schedule = ScheduleSpec {
            morning_start: t(8, 0),
            morning_end: t(12, 0),
            ..Default::default()
        };
        let punches = PunchSet {
            morning_entry: at("07:50:00"),
            lunch_exit: at("12:20:00"),
            ..Default::default()
        };
        let result = calculate_indicators(&punches, &schedule, None, 1);

        assert_eq!(result.start.map(|e| e.slot), Some("morning_entry"));
        assert_eq!(result.end.map(|e| e.slot), Some("lunch_exit"));
        assert_eq!(result.indicators.early_arrival_minutes, 10);
        assert_eq!(result.indicators.overtime_minutes, 20);
    }

    #[test]
    fn test_missing_punch_leaves_event_unidentified() {
        let punches = PunchSet {
            lunch_exit: at("12:00:00"),
            afternoon_entry: at("13:00:00"),
            final_exit: at("17:30:00"),
            ..Default::default()
        };
        let result = calculate_indicators(&punches, &full_day(13, 17), None, 1);

        assert_eq!(result.delta_start(), None);
        assert_eq!(result.delta_end(), Some(30));
        assert_eq!(result.indicators.delay_minutes, 0);
        assert!(result.audit_step.reasoning.contains("not identifiable"));
    }

    #[test]
    fn test_override_uses_entry_start_of_kind() {
        let schedule = ScheduleSpec {
            afternoon_start: t(13, 0),
            afternoon_end: t(19, 15),
            ..Default::default()
        };
        let punches = PunchSet {
            morning_entry: at("13:08:00"),
            lunch_exit: at("16:00:00"),
            afternoon_entry: at("16:15:00"),
            final_exit: at("19:15:00"),
        };
        let shift_override = ShiftOverride {
            kind: ShiftKind::AfternoonOnly,
            break_minutes: 15,
        };
        let result = calculate_indicators(&punches, &schedule, Some(&shift_override), 1);

        assert_eq!(result.delta_start(), Some(8));
        assert_eq!(result.delta_end(), Some(0));
    }
}
