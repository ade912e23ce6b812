//! Statutory tolerance under CLT art. 58 §1º.
//!
//! Variations of up to five minutes at each journey event, capped at ten
//! minutes per day, are not counted as overtime nor deducted. This module
//! applies that rule to the journey start and end deltas, deducts any midday
//! break overrun, and resolves the result under the employer's compensation
//! policy.
//!
//! The steps run in a fixed order:
//! 1. per-event tolerance
//! 2. daily cap recovery
//! 3. break-overrun deduction
//! 4. compensation-policy resolution

use serde::{Deserialize, Serialize};

use crate::models::{AuditStep, CltFigures, CompensationPolicy};

/// Minutes of variation tolerated at a single journey event (CLT art. 58 §1º).
pub const STATUTORY_EVENT_TOLERANCE_MINUTES: i64 = 5;

/// Maximum minutes tolerated across the whole day (CLT art. 58 §1º).
pub const STATUTORY_DAILY_CAP_MINUTES: i64 = 10;

const CLAUSE_REF: &str = "CLT art. 58 §1º; TST Súmula 366";

/// Tolerance limits applied by the engine.
///
/// # Example
///
/// ```
/// use ponto_engine::calculation::ToleranceRules;
///
/// let rules = ToleranceRules::default();
/// assert_eq!(rules.per_event_minutes, 5);
/// assert_eq!(rules.daily_cap_minutes, 10);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToleranceRules {
    /// Minutes tolerated at each journey event.
    pub per_event_minutes: i64,
    /// Minutes tolerated across the day.
    pub daily_cap_minutes: i64,
}

impl Default for ToleranceRules {
    fn default() -> Self {
        Self {
            per_event_minutes: STATUTORY_EVENT_TOLERANCE_MINUTES,
            daily_cap_minutes: STATUTORY_DAILY_CAP_MINUTES,
        }
    }
}

/// Tolerated and chargeable portions of one journey event.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventSplit {
    /// Minutes absorbed by the tolerance.
    pub tolerated: i64,
    /// Minutes that count.
    pub chargeable: i64,
}

impl EventSplit {
    fn from_delta(delta: Option<i64>, per_event_minutes: i64) -> Self {
        let magnitude = delta.map(i64::abs).unwrap_or(0);
        let tolerated = magnitude.min(per_event_minutes.max(0));
        Self {
            tolerated,
            chargeable: magnitude - tolerated,
        }
    }

    fn recover(&mut self, minutes: i64) -> i64 {
        let taken = minutes.min(self.tolerated);
        self.tolerated -= taken;
        self.chargeable += taken;
        taken
    }
}

/// The result of applying the CLT tolerance rules to one day.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CltToleranceResult {
    /// The tolerance-adjusted figures.
    pub figures: CltFigures,
    /// Journey start split after the daily cap.
    pub start: EventSplit,
    /// Journey end split after the daily cap.
    pub end: EventSplit,
    /// One audit step per rule application, in order.
    pub audit_steps: Vec<AuditStep>,
}

impl CltToleranceResult {
    /// Total minutes tolerated across both journey events.
    pub fn tolerated_total(&self) -> i64 {
        self.start.tolerated + self.end.tolerated
    }
}

/// Applies per-event tolerance, the daily cap, break-overrun deduction and
/// compensation-policy resolution.
///
/// `delta_start` and `delta_end` are signed minutes (`real - scheduled`) for
/// the journey start and end; `None` means the event could not be
/// identified and contributes nothing.
///
/// # Example
///
/// ```
/// use ponto_engine::calculation::{apply_clt_tolerance, ToleranceRules};
/// use ponto_engine::models::CompensationPolicy;
///
/// let result = apply_clt_tolerance(
///     Some(7),
///     Some(7),
///     0,
///     CompensationPolicy::HourBank,
///     &ToleranceRules::default(),
///     1,
/// );
/// assert_eq!(result.tolerated_total(), 10);
/// assert_eq!(result.figures.late_minutes, 2);
/// assert_eq!(result.figures.overtime_minutes, 2);
/// assert_eq!(result.figures.net_balance_minutes, 0);
/// ```
pub fn apply_clt_tolerance(
    delta_start: Option<i64>,
    delta_end: Option<i64>,
    interval_excess_minutes: i64,
    policy: CompensationPolicy,
    rules: &ToleranceRules,
    start_step_number: u32,
) -> CltToleranceResult {
    let mut audit_steps = Vec::with_capacity(4);
    let mut step_number = start_step_number;

    // Step 1: per-event tolerance
    let mut start = EventSplit::from_delta(delta_start, rules.per_event_minutes);
    let mut end = EventSplit::from_delta(delta_end, rules.per_event_minutes);

    audit_steps.push(AuditStep {
        step_number,
        rule_id: "clt_per_event_tolerance".to_string(),
        rule_name: "Per-Event Tolerance".to_string(),
        clause_ref: CLAUSE_REF.to_string(),
        input: serde_json::json!({
            "delta_start": delta_start,
            "delta_end": delta_end,
            "per_event_minutes": rules.per_event_minutes,
        }),
        output: serde_json::json!({
            "start": start,
            "end": end,
        }),
        reasoning: format!(
            "{}; {}",
            describe_event("Start", delta_start, start, rules.per_event_minutes),
            describe_event("end", delta_end, end, rules.per_event_minutes)
        ),
    });
    step_number += 1;

    // Step 2: daily cap
    let tolerated_before = start.tolerated + end.tolerated;
    let over_cap = (tolerated_before - rules.daily_cap_minutes.max(0)).max(0);
    let reasoning = if over_cap == 0 {
        format!(
            "{} min tolerated is within the {} min daily cap",
            tolerated_before, rules.daily_cap_minutes
        )
    } else {
        let mut remaining = over_cap;
        if start.tolerated >= end.tolerated {
            remaining -= start.recover(remaining);
            end.recover(remaining);
        } else {
            remaining -= end.recover(remaining);
            start.recover(remaining);
        }
        format!(
            "{} min tolerated exceeds the {} min daily cap; {} min converted to chargeable",
            tolerated_before, rules.daily_cap_minutes, over_cap
        )
    };

    audit_steps.push(AuditStep {
        step_number,
        rule_id: "clt_daily_cap".to_string(),
        rule_name: "Daily Tolerance Cap".to_string(),
        clause_ref: CLAUSE_REF.to_string(),
        input: serde_json::json!({
            "tolerated_total": tolerated_before,
            "daily_cap_minutes": rules.daily_cap_minutes,
        }),
        output: serde_json::json!({
            "recovered_minutes": over_cap,
            "start": start,
            "end": end,
        }),
        reasoning,
    });
    step_number += 1;

    let start_sign = delta_start.unwrap_or(0).signum();
    let end_sign = delta_end.unwrap_or(0).signum();

    let mut late = if start_sign > 0 { start.chargeable } else { 0 };
    let mut early_arrival = if start_sign < 0 { start.chargeable } else { 0 };
    let mut overtime = if end_sign > 0 { end.chargeable } else { 0 };
    let early_exit = if end_sign < 0 { end.chargeable } else { 0 };

    // Step 3: break overrun eats overtime, then early arrival, then becomes lateness
    let excess = interval_excess_minutes.max(0);
    let from_overtime = excess.min(overtime);
    overtime -= from_overtime;
    let from_early_arrival = (excess - from_overtime).min(early_arrival);
    early_arrival -= from_early_arrival;
    let added_to_late = excess - from_overtime - from_early_arrival;
    late += added_to_late;

    audit_steps.push(AuditStep {
        step_number,
        rule_id: "clt_break_overrun".to_string(),
        rule_name: "Break Overrun Deduction".to_string(),
        clause_ref: "CLT art. 71".to_string(),
        input: serde_json::json!({
            "interval_excess_minutes": excess,
        }),
        output: serde_json::json!({
            "from_overtime": from_overtime,
            "from_early_arrival": from_early_arrival,
            "added_to_late": added_to_late,
        }),
        reasoning: if excess == 0 {
            "No break overrun to deduct".to_string()
        } else {
            format!(
                "{} min break overrun: {} min from overtime, {} min from early arrival, {} min added to late",
                excess, from_overtime, from_early_arrival, added_to_late
            )
        },
    });
    step_number += 1;

    // Step 4: compensation policy
    let figures = match policy {
        CompensationPolicy::HourBank => CltFigures {
            late_minutes: late,
            early_arrival_minutes: early_arrival,
            overtime_minutes: overtime,
            early_exit_minutes: early_exit,
            net_balance_minutes: (overtime + early_arrival) - (late + early_exit),
            payable_overtime_minutes: None,
            deductible_shortfall_minutes: None,
        },
        CompensationPolicy::Payroll => CltFigures {
            late_minutes: late,
            early_arrival_minutes: early_arrival,
            overtime_minutes: overtime,
            early_exit_minutes: early_exit,
            net_balance_minutes: 0,
            payable_overtime_minutes: Some(overtime + early_arrival),
            deductible_shortfall_minutes: Some(late + early_exit),
        },
    };

    audit_steps.push(AuditStep {
        step_number,
        rule_id: "clt_compensation_policy".to_string(),
        rule_name: "Compensation Policy".to_string(),
        clause_ref: "CLT art. 59".to_string(),
        input: serde_json::json!({
            "policy": policy,
            "late": late,
            "early_arrival": early_arrival,
            "overtime": overtime,
            "early_exit": early_exit,
        }),
        output: serde_json::json!(figures),
        reasoning: match policy {
            CompensationPolicy::HourBank => format!(
                "Hour bank nets ({} + {}) - ({} + {}) = {} min",
                overtime, early_arrival, late, early_exit, figures.net_balance_minutes
            ),
            CompensationPolicy::Payroll => format!(
                "Payroll keeps {} min payable overtime and {} min deductible shortfall apart",
                overtime + early_arrival,
                late + early_exit
            ),
        },
    });

    CltToleranceResult {
        figures,
        start,
        end,
        audit_steps,
    }
}

fn describe_event(label: &str, delta: Option<i64>, split: EventSplit, limit: i64) -> String {
    match delta {
        None => format!("{} event not identifiable", label),
        Some(delta) if split.chargeable == 0 => {
            format!("{} delta {:+} min within the {} min tolerance", label, delta, limit)
        }
        Some(delta) => format!(
            "{} delta {:+} min exceeds the {} min tolerance, {} min chargeable",
            label, delta, limit, split.chargeable
        ),
    }
}
