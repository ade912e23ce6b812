//! Day summary orchestration.
//!
//! Composes the worked, expected, indicator, interval and CLT calculations
//! into one immutable [`DaySummary`]. Nothing here fails: missing punches
//! downgrade the status and unreadable inputs are dropped with an audit step.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::models::{
    AuditStep, CompensationPolicy, DayStatus, DaySummary, HalfDayBreakdown, PunchSet,
    RawPunchSet, RawScheduleSpec, RejectedTimeValue, ScheduleSpec, ShiftOverride,
};

use super::clt_tolerance::{ToleranceRules, apply_clt_tolerance};
use super::expected_time::calculate_expected_time;
use super::indicators::calculate_indicators;
use super::interval_excess::calculate_interval_excess;
use super::worked_time::calculate_worked_time;

/// Per-call knobs for the day summary.
///
/// # Example
///
/// ```
/// use ponto_engine::calculation::SummaryOptions;
/// use ponto_engine::models::CompensationPolicy;
///
/// let options = SummaryOptions::default();
/// assert_eq!(options.interval_tolerance_minutes, 0);
/// assert_eq!(options.compensation_policy, CompensationPolicy::HourBank);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SummaryOptions {
    /// Extra minutes allowed on top of the scheduled break.
    #[serde(default)]
    pub interval_tolerance_minutes: i64,
    /// How over/under time is compensated.
    #[serde(default)]
    pub compensation_policy: CompensationPolicy,
    /// Per-event and daily tolerance limits.
    #[serde(default)]
    pub tolerance_rules: ToleranceRules,
}

/// Returns the punch slots the schedule shape requires, by name.
///
/// A shift override or a full-day schedule requires all four; a single-half
/// schedule requires its pair; an unscheduled day requires nothing specific.
pub fn required_slots(
    schedule: &ScheduleSpec,
    shift_override: Option<&ShiftOverride>,
) -> &'static [&'static str] {
    const ALL: &[&str] = &["morning_entry", "lunch_exit", "afternoon_entry", "final_exit"];
    const MORNING: &[&str] = &["morning_entry", "lunch_exit"];
    const AFTERNOON: &[&str] = &["afternoon_entry", "final_exit"];

    if shift_override.is_some() || schedule.is_full_day() {
        ALL
    } else if schedule.has_morning() {
        MORNING
    } else if schedule.has_afternoon() {
        AFTERNOON
    } else {
        &[]
    }
}

/// Determines whether the punches satisfy the schedule shape.
///
/// # Example
///
/// ```
/// use ponto_engine::calculation::determine_status;
/// use ponto_engine::models::{DayStatus, PunchSet, ScheduleSpec};
///
/// // No schedule and no punches: nothing to accept.
/// assert_eq!(
///     determine_status(&PunchSet::default(), &ScheduleSpec::default(), None),
///     DayStatus::Inconsistent
/// );
/// ```
pub fn determine_status(
    punches: &PunchSet,
    schedule: &ScheduleSpec,
    shift_override: Option<&ShiftOverride>,
) -> DayStatus {
    let required = required_slots(schedule, shift_override);
    let complete = if required.is_empty() {
        !punches.is_empty()
    } else {
        missing_slots(punches, required).is_empty()
    };

    if complete {
        DayStatus::Ok
    } else {
        DayStatus::Inconsistent
    }
}

fn missing_slots(punches: &PunchSet, required: &[&'static str]) -> Vec<&'static str> {
    required
        .iter()
        .copied()
        .filter(|slot| {
            let present = match *slot {
                "morning_entry" => punches.morning_entry.is_some(),
                "lunch_exit" => punches.lunch_exit.is_some(),
                "afternoon_entry" => punches.afternoon_entry.is_some(),
                _ => punches.final_exit.is_some(),
            };
            !present
        })
        .collect()
}

/// Computes the summary of one employee-day.
///
/// Pure and deterministic: identical arguments always produce an identical
/// [`DaySummary`], including its audit trail.
///
/// # Example
///
/// ```
/// use ponto_engine::calculation::{calculate_day_summary, SummaryOptions};
/// use ponto_engine::models::{DayStatus, PunchSet, ScheduleSpec};
/// use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
///
/// let at = |s: &str| NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M").ok();
/// let t = |h, m| NaiveTime::from_hms_opt(h, m, 0);
/// let schedule = ScheduleSpec {
///     morning_start: t(8, 0),
///     morning_end: t(12, 0),
///     afternoon_start: t(14, 0),
///     afternoon_end: t(18, 0),
/// };
/// let punches = PunchSet {
///     morning_entry: at("2025-03-10 08:13"),
///     lunch_exit: at("2025-03-10 12:11"),
///     afternoon_entry: at("2025-03-10 14:11"),
///     final_exit: at("2025-03-10 17:56"),
/// };
/// let date = NaiveDate::from_ymd_opt(2025, 3, 10).unwrap();
///
/// let summary = calculate_day_summary(&punches, &schedule, date, None, &SummaryOptions::default());
/// assert_eq!(summary.status, DayStatus::Ok);
/// assert_eq!(summary.worked_minutes, 463);
/// assert_eq!(summary.balance_minutes, -17);
/// assert_eq!(summary.clt.late_minutes, 8);
/// assert_eq!(summary.clt.net_balance_minutes, -8);
/// ```
pub fn calculate_day_summary(
    punches: &PunchSet,
    schedule: &ScheduleSpec,
    date: NaiveDate,
    shift_override: Option<&ShiftOverride>,
    options: &SummaryOptions,
) -> DaySummary {
    summarize(punches, schedule, date, shift_override, options, Vec::new())
}

/// Computes the summary of one employee-day from unparsed inputs.
///
/// Every punch or schedule value that cannot be read is treated as absent
/// and recorded in a leading `input_parsing` audit step.
pub fn calculate_day_summary_from_raw(
    raw_punches: &RawPunchSet,
    raw_schedule: &RawScheduleSpec,
    date: NaiveDate,
    shift_override: Option<&ShiftOverride>,
    options: &SummaryOptions,
) -> DaySummary {
    let (punches, mut rejected) = raw_punches.parse();
    let (schedule, rejected_schedule) = raw_schedule.parse();
    rejected.extend(rejected_schedule);

    calculate_day_summary_with_rejections(
        &punches,
        &schedule,
        date,
        shift_override,
        options,
        &rejected,
    )
}

/// Computes the summary of one employee-day whose inputs were parsed by the
/// caller, recording the values that were dropped along the way.
///
/// With no rejections this is identical to [`calculate_day_summary`].
pub fn calculate_day_summary_with_rejections(
    punches: &PunchSet,
    schedule: &ScheduleSpec,
    date: NaiveDate,
    shift_override: Option<&ShiftOverride>,
    options: &SummaryOptions,
    rejected: &[RejectedTimeValue],
) -> DaySummary {
    let mut audit_trail = Vec::new();
    if !rejected.is_empty() {
        debug!(
            %date,
            rejected = rejected.len(),
            "Unreadable time values treated as absent"
        );
        audit_trail.push(input_parsing_step(rejected));
    }

    summarize(punches, schedule, date, shift_override, options, audit_trail)
}

fn input_parsing_step(rejected: &[RejectedTimeValue]) -> AuditStep {
    AuditStep {
        step_number: 1,
        rule_id: "input_parsing".to_string(),
        rule_name: "Input Parsing".to_string(),
        clause_ref: String::new(),
        input: serde_json::json!(rejected),
        output: serde_json::json!({ "treated_as_absent": rejected.len() }),
        reasoning: format!(
            "Unreadable values treated as absent: {}",
            rejected
                .iter()
                .map(|r| format!("{}='{}'", r.field, r.value))
                .collect::<Vec<_>>()
                .join(", ")
        ),
    }
}

fn summarize(
    punches: &PunchSet,
    schedule: &ScheduleSpec,
    date: NaiveDate,
    shift_override: Option<&ShiftOverride>,
    options: &SummaryOptions,
    mut audit_trail: Vec<AuditStep>,
) -> DaySummary {
    let mut step_number = audit_trail.len() as u32 + 1;

    // Completeness
    let required = required_slots(schedule, shift_override);
    let missing = missing_slots(punches, required);
    let status = determine_status(punches, schedule, shift_override);
    audit_trail.push(AuditStep {
        step_number,
        rule_id: "punch_completeness".to_string(),
        rule_name: "Punch Completeness".to_string(),
        clause_ref: String::new(),
        input: serde_json::json!({
            "required": required,
            "punch_count": punches.count(),
        }),
        output: serde_json::json!({
            "status": status,
            "missing": missing,
        }),
        reasoning: match (status, required.is_empty()) {
            (DayStatus::Ok, true) => "No schedule configured; punches accepted as recorded".to_string(),
            (DayStatus::Ok, false) => format!("All {} required punches present", required.len()),
            (DayStatus::Inconsistent, true) => {
                "No schedule configured and no punches recorded".to_string()
            }
            (DayStatus::Inconsistent, false) => format!(
                "Missing required punches: {}; figures computed from the punches present",
                missing.join(", ")
            ),
        },
    });
    step_number += 1;

    let worked = calculate_worked_time(punches, shift_override, step_number);
    audit_trail.push(worked.audit_step.clone());
    step_number += 1;

    let expected = calculate_expected_time(schedule, shift_override, step_number);
    audit_trail.push(expected.audit_step.clone());
    step_number += 1;

    let balance_seconds = worked.total_seconds - expected.total_seconds;
    let balance_minutes = worked.total_minutes - expected.total_minutes;
    audit_trail.push(AuditStep {
        step_number,
        rule_id: "day_balance".to_string(),
        rule_name: "Day Balance".to_string(),
        clause_ref: String::new(),
        input: serde_json::json!({
            "worked_minutes": worked.total_minutes,
            "expected_minutes": expected.total_minutes,
        }),
        output: serde_json::json!({
            "balance_minutes": balance_minutes,
        }),
        reasoning: format!(
            "{} min worked - {} min expected = {:+} min",
            worked.total_minutes, expected.total_minutes, balance_minutes
        ),
    });
    step_number += 1;

    let indicators = calculate_indicators(punches, schedule, shift_override, step_number);
    audit_trail.push(indicators.audit_step.clone());
    step_number += 1;

    let interval = calculate_interval_excess(
        punches,
        schedule,
        shift_override,
        options.interval_tolerance_minutes,
        step_number,
    );
    audit_trail.push(interval.audit_step.clone());
    step_number += 1;

    let clt = apply_clt_tolerance(
        indicators.delta_start(),
        indicators.delta_end(),
        interval.excess_minutes,
        options.compensation_policy,
        &options.tolerance_rules,
        step_number,
    );
    audit_trail.extend(clt.audit_steps);

    debug!(
        %date,
        %status,
        worked_minutes = worked.total_minutes,
        expected_minutes = expected.total_minutes,
        net_balance_minutes = clt.figures.net_balance_minutes,
        "Day summary computed"
    );

    DaySummary {
        date,
        status,
        compensation_policy: options.compensation_policy,
        worked_seconds: worked.total_seconds,
        worked_minutes: worked.total_minutes,
        expected_seconds: expected.total_seconds,
        expected_minutes: expected.total_minutes,
        balance_seconds,
        balance_minutes,
        indicators: indicators.indicators,
        interval_excess_seconds: interval.excess_seconds,
        interval_excess_minutes: interval.excess_minutes,
        clt: clt.figures,
        breakdown: HalfDayBreakdown {
            morning_worked_seconds: worked.morning_seconds,
            afternoon_worked_seconds: worked.afternoon_seconds,
            morning_expected_seconds: expected.morning_seconds,
            afternoon_expected_seconds: expected.afternoon_seconds,
        },
        audit_trail,
    }
}
