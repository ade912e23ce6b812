//! Configuration types for the day-summary engine.
//!
//! The `*File` structures mirror the YAML layout and are deserialized as-is;
//! the loader then validates them into [`EngineSettings`] and [`ScheduleBook`].

use chrono::{Datelike, NaiveDate, NaiveTime, Weekday};
use serde::Deserialize;
use std::collections::{BTreeMap, HashMap};

use crate::calculation::{SummaryOptions, ToleranceRules};
use crate::error::{EngineError, EngineResult};
use crate::models::{CompensationPolicy, RawScheduleSpec, ScheduleSpec, ShiftOverride};

/// Metadata identifying the rule set.
#[derive(Debug, Clone, Deserialize)]
pub struct EngineMetadata {
    /// Human-readable name of the rule set.
    pub name: String,
    /// Version or effective date of the rule set.
    pub version: String,
    /// Legal basis the tolerance rules implement.
    pub legal_basis: String,
}

/// `engine.yaml` as written on disk.
#[derive(Debug, Clone, Deserialize)]
pub struct EngineFile {
    /// Rule set metadata.
    pub engine: EngineMetadata,
    /// Per-event and daily tolerance limits.
    #[serde(default)]
    pub tolerance: ToleranceRules,
    /// Extra break minutes allowed before an overrun counts.
    #[serde(default)]
    pub interval_tolerance_minutes: i64,
    /// Policy used when neither the request nor the employee names one.
    #[serde(default)]
    pub default_compensation_policy: CompensationPolicy,
    /// `HH:MM` cutoff separating morning from afternoon punches.
    pub noon_cutoff: String,
}

/// Validated engine-wide settings.
#[derive(Debug, Clone)]
pub struct EngineSettings {
    /// Rule set metadata.
    pub metadata: EngineMetadata,
    /// Per-event and daily tolerance limits.
    pub tolerance: ToleranceRules,
    /// Extra break minutes allowed before an overrun counts.
    pub interval_tolerance_minutes: i64,
    /// Policy used when neither the request nor the employee names one.
    pub default_compensation_policy: CompensationPolicy,
    /// Cutoff separating morning from afternoon punches.
    pub noon_cutoff: NaiveTime,
}

impl EngineSettings {
    /// Summary options derived from these settings and an optional policy.
    pub fn summary_options(&self, policy: Option<CompensationPolicy>) -> SummaryOptions {
        SummaryOptions {
            interval_tolerance_minutes: self.interval_tolerance_minutes,
            compensation_policy: policy.unwrap_or(self.default_compensation_policy),
            tolerance_rules: self.tolerance,
        }
    }
}

/// One scheduled day as written in YAML.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ScheduledDayFile {
    /// The four schedule times.
    #[serde(flatten)]
    pub schedule: RawScheduleSpec,
    /// Optional continuous-shift reinterpretation.
    #[serde(default)]
    pub shift_override: Option<ShiftOverride>,
}

/// A per-date replacement for the weekday default.
#[derive(Debug, Clone, Deserialize)]
pub struct DateOverrideFile {
    /// The date replaced.
    pub date: NaiveDate,
    /// The schedule in force on that date.
    #[serde(flatten)]
    pub day: ScheduledDayFile,
}

/// One employee's entry in `schedules.yaml`.
#[derive(Debug, Clone, Deserialize)]
pub struct EmployeeScheduleFile {
    /// Display name.
    pub name: String,
    /// Policy for this employee, if it differs from the engine default.
    #[serde(default)]
    pub compensation_policy: Option<CompensationPolicy>,
    /// Weekday defaults keyed by lowercase English weekday name.
    #[serde(default)]
    pub weekly: BTreeMap<String, ScheduledDayFile>,
    /// Date overrides.
    #[serde(default)]
    pub overrides: Vec<DateOverrideFile>,
}

/// `schedules.yaml` as written on disk.
#[derive(Debug, Clone, Deserialize)]
pub struct SchedulesFile {
    /// Employees keyed by id.
    pub employees: BTreeMap<String, EmployeeScheduleFile>,
}

/// The schedule in force for one employee-day.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScheduledDay {
    /// Parsed schedule times.
    pub schedule: ScheduleSpec,
    /// Continuous-shift reinterpretation, if any.
    pub shift_override: Option<ShiftOverride>,
}

/// One employee's validated schedules.
#[derive(Debug, Clone)]
pub struct EmployeeSchedule {
    /// Display name.
    pub name: String,
    /// Policy for this employee, if it differs from the engine default.
    pub compensation_policy: Option<CompensationPolicy>,
    weekly: HashMap<Weekday, ScheduledDay>,
    overrides: HashMap<NaiveDate, ScheduledDay>,
}

impl EmployeeSchedule {
    /// Creates an employee schedule from validated parts.
    pub fn new(
        name: String,
        compensation_policy: Option<CompensationPolicy>,
        weekly: HashMap<Weekday, ScheduledDay>,
        overrides: HashMap<NaiveDate, ScheduledDay>,
    ) -> Self {
        Self {
            name,
            compensation_policy,
            weekly,
            overrides,
        }
    }

    /// Resolves the schedule for a date.
    ///
    /// A date override fully replaces the weekday default. A weekday without
    /// an entry is a day off and resolves to an empty schedule.
    pub fn day(&self, date: NaiveDate) -> ScheduledDay {
        self.overrides
            .get(&date)
            .or_else(|| self.weekly.get(&date.weekday()))
            .cloned()
            .unwrap_or_default()
    }
}

/// All configured employee schedules.
#[derive(Debug, Clone, Default)]
pub struct ScheduleBook {
    employees: HashMap<String, EmployeeSchedule>,
}

impl ScheduleBook {
    /// Creates a schedule book from validated employee schedules.
    pub fn new(employees: HashMap<String, EmployeeSchedule>) -> Self {
        Self { employees }
    }

    /// Looks up one employee.
    pub fn employee(&self, employee_id: &str) -> Option<&EmployeeSchedule> {
        self.employees.get(employee_id)
    }

    /// Number of employees configured.
    pub fn len(&self) -> usize {
        self.employees.len()
    }

    /// True when no employee is configured.
    pub fn is_empty(&self) -> bool {
        self.employees.is_empty()
    }

    /// Resolves the schedule in force for an employee on a date.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::ScheduleNotFound`] for an unknown employee.
    pub fn schedule_for(&self, employee_id: &str, date: NaiveDate) -> EngineResult<ScheduledDay> {
        self.employee(employee_id)
            .map(|employee| employee.day(date))
            .ok_or_else(|| EngineError::ScheduleNotFound {
                employee_id: employee_id.to_string(),
                date,
            })
    }
}

/// Maps a lowercase English weekday name to a [`Weekday`].
///
/// Abbreviations and other casings that chrono would accept are rejected so
/// `schedules.yaml` keys stay uniform.
pub fn parse_weekday(name: &str) -> Option<Weekday> {
    let full_lowercase = name.len() > 3 && name.chars().all(|c| c.is_ascii_lowercase());
    name.parse::<Weekday>().ok().filter(|_| full_lowercase)
}
