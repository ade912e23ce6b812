//! Request types for the day-summary API.
//!
//! Punch and schedule times arrive as strings and are parsed leniently: a
//! value that cannot be read is dropped and shows up in the audit trail
//! rather than failing the request.

use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};

use crate::calculation::{MINUTES_PER_DAY, group_punches, parse_punch};
use crate::error::{EngineError, EngineResult};
use crate::models::{
    CompensationPolicy, PunchDirection, PunchEvent, PunchSet, RawPunchSet, RawScheduleSpec,
    RejectedTimeValue, ShiftOverride,
};

fn check_day_minutes(field: &str, minutes: i64) -> EngineResult<()> {
    if !(0..=MINUTES_PER_DAY).contains(&minutes) {
        return Err(EngineError::InvalidRequest {
            field: field.to_string(),
            message: format!("must be between 0 and {}", MINUTES_PER_DAY),
        });
    }
    Ok(())
}

/// A clock event as sent by the client.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PunchEventRequest {
    /// Timestamp, `YYYY-MM-DD HH:MM[:SS]` or the `T`-separated form.
    pub timestamp: String,
    /// Direction, if the clock recorded one.
    #[serde(default)]
    pub direction: PunchDirection,
}

/// Request body for the `/day-summary` endpoint.
///
/// Exactly one of `slots` or `events` must be present. Without `schedule`,
/// the schedule is looked up by `employee_id`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DaySummaryRequest {
    /// The day being summarized.
    pub date: NaiveDate,
    /// Employee whose configured schedule and policy apply.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub employee_id: Option<String>,
    /// Punches already assigned to slots.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub slots: Option<RawPunchSet>,
    /// Unassigned clock events, grouped into slots by the engine.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub events: Option<Vec<PunchEventRequest>>,
    /// Explicit schedule, overriding any configured one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schedule: Option<RawScheduleSpec>,
    /// Continuous-shift reinterpretation.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shift_override: Option<ShiftOverride>,
    /// Extra break minutes allowed before an overrun counts.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub interval_tolerance_minutes: Option<i64>,
    /// Compensation policy for this day.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub compensation_policy: Option<CompensationPolicy>,
}

/// Punches resolved from a request, with the values that could not be read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedPunches {
    /// The slot assignment.
    pub punches: PunchSet,
    /// Values treated as absent.
    pub rejected: Vec<RejectedTimeValue>,
}

impl DaySummaryRequest {
    /// Checks the structural rules serde cannot express.
    pub fn validate(&self) -> EngineResult<()> {
        match (&self.slots, &self.events) {
            (None, None) => {
                return Err(EngineError::InvalidRequest {
                    field: "slots".to_string(),
                    message: "either slots or events must be provided".to_string(),
                });
            }
            (Some(_), Some(_)) => {
                return Err(EngineError::InvalidRequest {
                    field: "events".to_string(),
                    message: "slots and events are mutually exclusive".to_string(),
                });
            }
            _ => {}
        }

        if self.schedule.is_none() && self.employee_id.is_none() {
            return Err(EngineError::InvalidRequest {
                field: "schedule".to_string(),
                message: "a schedule or an employee_id is required".to_string(),
            });
        }

        if let Some(minutes) = self.interval_tolerance_minutes {
            check_day_minutes("interval_tolerance_minutes", minutes)?;
        }

        if let Some(shift_override) = self.shift_override {
            check_day_minutes("shift_override.break_minutes", shift_override.break_minutes)?;
        }

        Ok(())
    }

    /// Resolves the punches from `slots` or by grouping `events`.
    pub fn resolve_punches(&self, noon: NaiveTime) -> ResolvedPunches {
        if let Some(events) = &self.events {
            let mut rejected = Vec::new();
            let parsed: Vec<PunchEvent> = events
                .iter()
                .enumerate()
                .filter_map(|(index, event)| match parse_punch(&event.timestamp) {
                    Ok(timestamp) => Some(PunchEvent {
                        timestamp,
                        direction: event.direction,
                    }),
                    Err(_) => {
                        rejected.push(RejectedTimeValue {
                            field: format!("events[{}]", index),
                            value: event.timestamp.clone(),
                        });
                        None
                    }
                })
                .collect();
            let grouped = group_punches(&parsed, noon);
            return ResolvedPunches {
                punches: grouped.punches,
                rejected,
            };
        }

        let (punches, rejected) = self.slots.clone().unwrap_or_default().parse();
        ResolvedPunches { punches, rejected }
    }
}

/// Request body for the `/period-summary` endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PeriodSummaryRequest {
    /// Employee applied to every day that does not name one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub employee_id: Option<String>,
    /// The days to summarize.
    pub days: Vec<DaySummaryRequest>,
}

impl PeriodSummaryRequest {
    /// Checks the period-level rules.
    pub fn validate(&self) -> EngineResult<()> {
        if self.days.is_empty() {
            return Err(EngineError::InvalidRequest {
                field: "days".to_string(),
                message: "at least one day is required".to_string(),
            });
        }
        Ok(())
    }
}
