//! Day summary models.
//!
//! This module contains the [`DaySummary`] type and the structures it is
//! assembled from: informal indicators, CLT-adjusted figures, the per-half-day
//! breakdown and the audit trail. It also holds [`PeriodTotals`], the
//! aggregate of many day summaries.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::CompensationPolicy;

/// Completeness status of a computed day.
///
/// Advisory only: an inconsistent day still carries every figure that could
/// be derived from the punches present.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DayStatus {
    /// All punches required by the schedule shape are present.
    #[default]
    Ok,
    /// At least one required punch is missing.
    Inconsistent,
}

impl std::fmt::Display for DayStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DayStatus::Ok => write!(f, "OK"),
            DayStatus::Inconsistent => write!(f, "INCONSISTENT"),
        }
    }
}

/// Raw, untolerated journey deviations shown for information only.
///
/// # Example
///
/// ```
/// use ponto_engine::models::InformalIndicators;
///
/// let indicators = InformalIndicators {
///     delay_minutes: 13,
///     early_exit_minutes: 4,
///     ..Default::default()
/// };
/// assert_eq!(indicators.early_arrival_minutes, 0);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InformalIndicators {
    /// Minutes the journey started after schedule.
    pub delay_minutes: i64,
    /// Minutes the journey started before schedule.
    pub early_arrival_minutes: i64,
    /// Minutes the journey ended after schedule.
    pub overtime_minutes: i64,
    /// Minutes the journey ended before schedule.
    pub early_exit_minutes: i64,
}

/// Tolerance-adjusted figures under CLT art. 58 §1º.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CltFigures {
    /// Chargeable late arrival.
    pub late_minutes: i64,
    /// Chargeable early arrival.
    pub early_arrival_minutes: i64,
    /// Chargeable overtime at the end of the journey.
    pub overtime_minutes: i64,
    /// Chargeable early departure.
    pub early_exit_minutes: i64,
    /// Net balance under the hour bank; always zero under payroll.
    pub net_balance_minutes: i64,
    /// Overtime plus early arrival, reported only under payroll.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payable_overtime_minutes: Option<i64>,
    /// Late plus early exit, reported only under payroll.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deductible_shortfall_minutes: Option<i64>,
}

/// Worked and expected seconds per half of the day.
///
/// Under a shift override the morning/afternoon worked values are the
/// pre-break and post-break periods of the single shift, and the whole
/// expected time sits in the half the shift starts in.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HalfDayBreakdown {
    /// Seconds worked before the midday break.
    pub morning_worked_seconds: i64,
    /// Seconds worked after the midday break.
    pub afternoon_worked_seconds: i64,
    /// Seconds scheduled in the morning half.
    pub morning_expected_seconds: i64,
    /// Seconds scheduled in the afternoon half.
    pub afternoon_expected_seconds: i64,
}

/// A single step in the audit trail recording a calculation decision.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditStep {
    /// The sequential step number.
    pub step_number: u32,
    /// The unique identifier of the rule that was applied.
    pub rule_id: String,
    /// The human-readable name of the rule.
    pub rule_name: String,
    /// Statutory or case-law reference, empty when the step is bookkeeping.
    pub clause_ref: String,
    /// The input data for this step.
    pub input: serde_json::Value,
    /// The output data from this step.
    pub output: serde_json::Value,
    /// Human-readable explanation of the decision.
    pub reasoning: String,
}

impl AuditStep {
    /// Renders the step as one audit line.
    ///
    /// # Example
    ///
    /// ```
    /// use ponto_engine::models::AuditStep;
    ///
    /// let step = AuditStep {
    ///     step_number: 3,
    ///     rule_id: "interval_excess".to_string(),
    ///     rule_name: "Interval Excess".to_string(),
    ///     clause_ref: String::new(),
    ///     input: serde_json::json!({}),
    ///     output: serde_json::json!({}),
    ///     reasoning: "break within allowance".to_string(),
    /// };
    /// assert_eq!(step.audit_line(), "[3] Interval Excess: break within allowance");
    /// ```
    pub fn audit_line(&self) -> String {
        if self.clause_ref.is_empty() {
            format!("[{}] {}: {}", self.step_number, self.rule_name, self.reasoning)
        } else {
            format!(
                "[{}] {} ({}): {}",
                self.step_number, self.rule_name, self.clause_ref, self.reasoning
            )
        }
    }
}

/// The complete, immutable result of summarising one employee-day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DaySummary {
    /// The day that was summarised.
    pub date: NaiveDate,
    /// Completeness of the punches against the schedule shape.
    pub status: DayStatus,
    /// The policy the CLT figures were resolved under.
    pub compensation_policy: CompensationPolicy,
    /// Total seconds worked.
    pub worked_seconds: i64,
    /// `floor(worked_seconds / 60)`.
    pub worked_minutes: i64,
    /// Total seconds scheduled.
    pub expected_seconds: i64,
    /// `floor(expected_seconds / 60)`.
    pub expected_minutes: i64,
    /// `worked_seconds - expected_seconds`.
    pub balance_seconds: i64,
    /// `worked_minutes - expected_minutes`.
    pub balance_minutes: i64,
    /// Informational journey deviations.
    pub indicators: InformalIndicators,
    /// Seconds the midday break ran over its allowance.
    pub interval_excess_seconds: i64,
    /// `floor(interval_excess_seconds / 60)`.
    pub interval_excess_minutes: i64,
    /// Tolerance-adjusted figures.
    pub clt: CltFigures,
    /// Per-half-day breakdown.
    pub breakdown: HalfDayBreakdown,
    /// Every decision taken while computing this summary.
    pub audit_trail: Vec<AuditStep>,
}

impl DaySummary {
    /// Human-readable audit lines, one per audit step.
    pub fn audit_lines(&self) -> Vec<String> {
        self.audit_trail.iter().map(AuditStep::audit_line).collect()
    }

    /// Returns true when the status is [`DayStatus::Inconsistent`].
    pub fn is_inconsistent(&self) -> bool {
        self.status == DayStatus::Inconsistent
    }
}

/// Aggregated figures over a run of day summaries.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PeriodTotals {
    /// Number of days aggregated.
    pub days: u32,
    /// Days whose status was inconsistent.
    pub inconsistent_days: u32,
    /// Sum of worked minutes.
    pub worked_minutes: i64,
    /// Sum of expected minutes.
    pub expected_minutes: i64,
    /// Sum of daily balances.
    pub balance_minutes: i64,
    /// Sum of chargeable late minutes.
    pub late_minutes: i64,
    /// Sum of chargeable early-arrival minutes.
    pub early_arrival_minutes: i64,
    /// Sum of chargeable overtime minutes.
    pub overtime_minutes: i64,
    /// Sum of chargeable early-exit minutes.
    pub early_exit_minutes: i64,
    /// Hour-bank balance carried by the period (hour-bank days only).
    pub hour_bank_minutes: i64,
    /// Overtime owed on payroll days.
    pub payable_overtime_minutes: i64,
    /// Shortfall deducted on payroll days.
    pub deductible_shortfall_minutes: i64,
    /// `worked_minutes` as decimal hours.
    pub worked_hours: Decimal,
    /// `hour_bank_minutes` as decimal hours.
    pub hour_bank_hours: Decimal,
    /// `payable_overtime_minutes` as decimal hours.
    pub payable_overtime_hours: Decimal,
    /// `deductible_shortfall_minutes` as decimal hours.
    pub deductible_shortfall_hours: Decimal,
}
