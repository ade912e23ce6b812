//! Schedule, shift override and compensation policy models.

use chrono::NaiveTime;
use serde::{Deserialize, Serialize};

use crate::calculation::parse_time_of_day;

use super::RejectedTimeValue;

/// The expected shift shape for one day.
///
/// The morning half is scheduled when both `morning_start` and `morning_end`
/// are present; likewise for the afternoon.
///
/// # Example
///
/// ```
/// use ponto_engine::models::ScheduleSpec;
/// use chrono::NaiveTime;
///
/// let t = |h, m| NaiveTime::from_hms_opt(h, m, 0);
/// let schedule = ScheduleSpec {
///     morning_start: None,
///     morning_end: None,
///     afternoon_start: t(13, 0),
///     afternoon_end: t(18, 0),
/// };
/// assert!(!schedule.has_morning());
/// assert!(schedule.has_afternoon());
/// assert!(!schedule.is_full_day());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleSpec {
    /// Scheduled start of the morning half.
    #[serde(default)]
    pub morning_start: Option<NaiveTime>,
    /// Scheduled end of the morning half.
    #[serde(default)]
    pub morning_end: Option<NaiveTime>,
    /// Scheduled start of the afternoon half.
    #[serde(default)]
    pub afternoon_start: Option<NaiveTime>,
    /// Scheduled end of the afternoon half.
    #[serde(default)]
    pub afternoon_end: Option<NaiveTime>,
}

impl ScheduleSpec {
    /// Returns true when the morning half is scheduled.
    pub fn has_morning(&self) -> bool {
        self.morning_start.is_some() && self.morning_end.is_some()
    }

    /// Returns true when the afternoon half is scheduled.
    pub fn has_afternoon(&self) -> bool {
        self.afternoon_start.is_some() && self.afternoon_end.is_some()
    }

    /// Returns true when both halves are scheduled.
    pub fn is_full_day(&self) -> bool {
        self.has_morning() && self.has_afternoon()
    }

    /// Returns true when no half is scheduled.
    pub fn is_unscheduled(&self) -> bool {
        !self.has_morning() && !self.has_afternoon()
    }
}

/// A schedule as raw `HH:MM` strings, before parsing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawScheduleSpec {
    /// Scheduled start of the morning half.
    #[serde(default)]
    pub morning_start: Option<String>,
    /// Scheduled end of the morning half.
    #[serde(default)]
    pub morning_end: Option<String>,
    /// Scheduled start of the afternoon half.
    #[serde(default)]
    pub afternoon_start: Option<String>,
    /// Scheduled end of the afternoon half.
    #[serde(default)]
    pub afternoon_end: Option<String>,
}

impl RawScheduleSpec {
    /// Parses every field; unreadable values become absent and are reported.
    pub fn parse(&self) -> (ScheduleSpec, Vec<RejectedTimeValue>) {
        let mut rejected = Vec::new();
        let mut field = |name: &str, value: &Option<String>| -> Option<NaiveTime> {
            let value = value.as_deref().map(str::trim).filter(|v| !v.is_empty())?;
            match parse_time_of_day(value) {
                Ok(time) => Some(time),
                Err(_) => {
                    rejected.push(RejectedTimeValue {
                        field: name.to_string(),
                        value: value.to_string(),
                    });
                    None
                }
            }
        };

        let schedule = ScheduleSpec {
            morning_start: field("morning_start", &self.morning_start),
            morning_end: field("morning_end", &self.morning_end),
            afternoon_start: field("afternoon_start", &self.afternoon_start),
            afternoon_end: field("afternoon_end", &self.afternoon_end),
        };

        (schedule, rejected)
    }
}

/// Which scheduled start a continuous shift begins from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ShiftKind {
    /// The shift begins at `morning_start` and runs to `afternoon_end`.
    MorningOnly,
    /// The shift begins at `afternoon_start` and runs to `afternoon_end`.
    AfternoonOnly,
}

impl std::fmt::Display for ShiftKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ShiftKind::MorningOnly => write!(f, "MORNING_ONLY"),
            ShiftKind::AfternoonOnly => write!(f, "AFTERNOON_ONLY"),
        }
    }
}

/// Reinterprets a 4-punch day as one continuous shift with an internal break.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShiftOverride {
    /// Where the continuous shift starts.
    pub kind: ShiftKind,
    /// Length of the internal break in minutes.
    pub break_minutes: i64,
}

impl ShiftOverride {
    /// The scheduled entry time for this shift kind, if configured.
    pub fn entry_start(&self, schedule: &ScheduleSpec) -> Option<NaiveTime> {
        match self.kind {
            ShiftKind::MorningOnly => schedule.morning_start,
            ShiftKind::AfternoonOnly => schedule.afternoon_start,
        }
    }
}

/// How daily over/under time is compensated.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CompensationPolicy {
    /// Overtime and shortfall are netted into a carried balance.
    #[default]
    HourBank,
    /// Overtime is paid and shortfall deducted; the two are never netted.
    Payroll,
}

impl std::fmt::Display for CompensationPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CompensationPolicy::HourBank => write!(f, "HOUR_BANK"),
            CompensationPolicy::Payroll => write!(f, "PAYROLL"),
        }
    }
}
