//! Configuration loading functionality.
//!
//! This module provides the [`ConfigLoader`] type for loading engine settings
//! and employee schedules from YAML files.

use chrono::{NaiveDate, NaiveTime};
use std::collections::HashMap;
use std::fs;
use std::path::Path;

use crate::calculation::{MINUTES_PER_DAY, SummaryOptions, parse_time_of_day};
use crate::error::{EngineError, EngineResult};
use crate::models::CompensationPolicy;

use super::types::{
    EmployeeSchedule, EngineFile, EngineSettings, ScheduleBook, ScheduledDay, ScheduledDayFile,
    SchedulesFile, parse_weekday,
};

/// Loads and provides access to engine configuration.
///
/// # Directory Structure
///
/// ```text
/// config/clt/
/// ├── engine.yaml     # Tolerance rules, interval tolerance, default policy, noon cutoff
/// └── schedules.yaml  # Per-employee weekly schedules and date overrides
/// ```
///
/// # Example
///
/// ```no_run
/// use ponto_engine::config::ConfigLoader;
/// use chrono::NaiveDate;
///
/// let loader = ConfigLoader::load("./config/clt").unwrap();
///
/// let date = NaiveDate::from_ymd_opt(2025, 3, 10).unwrap();
/// let day = loader.schedule_for("emp_001", date).unwrap();
/// println!("Full day: {}", day.schedule.is_full_day());
/// ```
#[derive(Debug, Clone)]
pub struct ConfigLoader {
    settings: EngineSettings,
    schedules: ScheduleBook,
}

impl ConfigLoader {
    /// Loads configuration from the specified directory.
    ///
    /// # Errors
    ///
    /// - [`EngineError::ConfigNotFound`] when a file is missing
    /// - [`EngineError::ConfigParseError`] when a file is not valid YAML, a
    ///   time cannot be read, or a weekday name is unknown
    ///
    /// # Example
    ///
    /// ```no_run
    /// use ponto_engine::config::ConfigLoader;
    ///
    /// let loader = ConfigLoader::load("./config/clt")?;
    /// # Ok::<(), ponto_engine::error::EngineError>(())
    /// ```
    pub fn load<P: AsRef<Path>>(path: P) -> EngineResult<Self> {
        let path = path.as_ref();

        let engine_path = path.join("engine.yaml");
        let engine_file = Self::load_yaml::<EngineFile>(&engine_path)?;
        let settings = Self::build_settings(engine_file, &engine_path)?;

        let schedules_path = path.join("schedules.yaml");
        let schedules_file = Self::load_yaml::<SchedulesFile>(&schedules_path)?;
        let schedules = Self::build_schedule_book(schedules_file, &schedules_path)?;

        Ok(Self {
            settings,
            schedules,
        })
    }

    /// Loads and parses a YAML file.
    fn load_yaml<T: serde::de::DeserializeOwned>(path: &Path) -> EngineResult<T> {
        let path_str = path.display().to_string();

        let content = fs::read_to_string(path).map_err(|_| EngineError::ConfigNotFound {
            path: path_str.clone(),
        })?;

        serde_yaml::from_str(&content).map_err(|e| EngineError::ConfigParseError {
            path: path_str,
            message: e.to_string(),
        })
    }

    fn parse_error(path: &Path, message: String) -> EngineError {
        EngineError::ConfigParseError {
            path: path.display().to_string(),
            message,
        }
    }

    fn build_settings(file: EngineFile, path: &Path) -> EngineResult<EngineSettings> {
        let noon_cutoff = parse_time_of_day(&file.noon_cutoff)
            .map_err(|e| Self::parse_error(path, format!("noon_cutoff: {}", e)))?;

        if file.tolerance.per_event_minutes < 0 || file.tolerance.daily_cap_minutes < 0 {
            return Err(Self::parse_error(
                path,
                "tolerance minutes must not be negative".to_string(),
            ));
        }
        if !(0..=MINUTES_PER_DAY).contains(&file.interval_tolerance_minutes) {
            return Err(Self::parse_error(
                path,
                format!("interval_tolerance_minutes must be between 0 and {}", MINUTES_PER_DAY),
            ));
        }

        Ok(EngineSettings {
            metadata: file.engine,
            tolerance: file.tolerance,
            interval_tolerance_minutes: file.interval_tolerance_minutes,
            default_compensation_policy: file.default_compensation_policy,
            noon_cutoff,
        })
    }

    fn build_day(day: &ScheduledDayFile, context: &str, path: &Path) -> EngineResult<ScheduledDay> {
        let (schedule, rejected) = day.schedule.parse();
        if let Some(first) = rejected.first() {
            return Err(Self::parse_error(
                path,
                format!("{}.{}: invalid time '{}'", context, first.field, first.value),
            ));
        }
        let break_out_of_range = day
            .shift_override
            .is_some_and(|o| !(0..=MINUTES_PER_DAY).contains(&o.break_minutes));
        if break_out_of_range {
            return Err(Self::parse_error(
                path,
                format!(
                    "{}.shift_override.break_minutes must be between 0 and {}",
                    context, MINUTES_PER_DAY
                ),
            ));
        }
        Ok(ScheduledDay {
            schedule,
            shift_override: day.shift_override,
        })
    }

    fn build_schedule_book(file: SchedulesFile, path: &Path) -> EngineResult<ScheduleBook> {
        let mut employees = HashMap::with_capacity(file.employees.len());

        for (employee_id, entry) in file.employees {
            let mut weekly = HashMap::with_capacity(entry.weekly.len());
            for (weekday_name, day) in &entry.weekly {
                let weekday = parse_weekday(weekday_name).ok_or_else(|| {
                    Self::parse_error(
                        path,
                        format!("{}: unknown weekday '{}'", employee_id, weekday_name),
                    )
                })?;
                let context = format!("{}.weekly.{}", employee_id, weekday_name);
                weekly.insert(weekday, Self::build_day(day, &context, path)?);
            }

            let mut overrides = HashMap::with_capacity(entry.overrides.len());
            for date_override in &entry.overrides {
                let context = format!("{}.overrides.{}", employee_id, date_override.date);
                let day = Self::build_day(&date_override.day, &context, path)?;
                if overrides.insert(date_override.date, day).is_some() {
                    return Err(Self::parse_error(
                        path,
                        format!("{}: duplicate override", context),
                    ));
                }
            }

            employees.insert(
                employee_id,
                EmployeeSchedule::new(entry.name, entry.compensation_policy, weekly, overrides),
            );
        }

        Ok(ScheduleBook::new(employees))
    }

    /// Returns the engine-wide settings.
    pub fn settings(&self) -> &EngineSettings {
        &self.settings
    }

    /// Returns the loaded schedules.
    pub fn schedule_book(&self) -> &ScheduleBook {
        &self.schedules
    }

    /// Cutoff separating morning from afternoon punches.
    pub fn noon_cutoff(&self) -> NaiveTime {
        self.settings.noon_cutoff
    }

    /// Resolves the schedule in force for an employee on a date.
    pub fn schedule_for(&self, employee_id: &str, date: NaiveDate) -> EngineResult<ScheduledDay> {
        self.schedules.schedule_for(employee_id, date)
    }

    /// Summary options for a request.
    ///
    /// The policy is chosen from the request, then the employee's configured
    /// policy, then the engine default.
    pub fn summary_options(
        &self,
        employee_id: Option<&str>,
        requested_policy: Option<CompensationPolicy>,
    ) -> SummaryOptions {
        let employee_policy = employee_id
            .and_then(|id| self.schedules.employee(id))
            .and_then(|employee| employee.compensation_policy);
        self.settings
            .summary_options(requested_policy.or(employee_policy))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calculation::ToleranceRules;
    use crate::models::ShiftKind;

    fn config_path() -> &'static str {
        "./config/clt"
    }

    fn date(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 3, day).unwrap()
    }

    fn t(h: u32, m: u32) -> Option<NaiveTime> {
        NaiveTime::from_hms_opt(h, m, 0)
    }

    #[test]
    fn test_load_valid_configuration() {
        let result = ConfigLoader::load(config_path());
        assert!(result.is_ok(), "Failed to load config: {:?}", result.err());

        let loader = result.unwrap();
        assert_eq!(loader.settings().tolerance, ToleranceRules::default());
        assert_eq!(loader.settings().interval_tolerance_minutes, 0);
        assert_eq!(
            loader.settings().default_compensation_policy,
            CompensationPolicy::HourBank
        );
        assert_eq!(loader.noon_cutoff(), NaiveTime::from_hms_opt(12, 0, 0).unwrap());
        assert_eq!(loader.schedule_book().len(), 3);
    }

    #[test]
    fn test_full_day_employee_weekday() {
        let loader = ConfigLoader::load(config_path()).unwrap();

        // 2025-03-10 is a Monday
        let day = loader.schedule_for("emp_001", date(10)).unwrap();
        assert_eq!(day.schedule.morning_start, t(8, 0));
        assert_eq!(day.schedule.morning_end, t(12, 0));
        assert_eq!(day.schedule.afternoon_start, t(14, 0));
        assert_eq!(day.schedule.afternoon_end, t(18, 0));
        assert_eq!(day.shift_override, None);
    }

    #[test]
    fn test_weekend_is_unscheduled() {
        let loader = ConfigLoader::load(config_path()).unwrap();

        let day = loader.schedule_for("emp_001", date(16)).unwrap();
        assert!(day.schedule.is_unscheduled());
    }

    #[test]
    fn test_date_override_loaded() {
        let loader = ConfigLoader::load(config_path()).unwrap();

        let day = loader.schedule_for("emp_001", date(14)).unwrap();
        let shift_override = day.shift_override.unwrap();
        assert_eq!(shift_override.kind, ShiftKind::MorningOnly);
        assert_eq!(shift_override.break_minutes, 15);
        assert_eq!(day.schedule.morning_start, t(7, 0));
        assert_eq!(day.schedule.afternoon_end, t(13, 15));
    }

    #[test]
    fn test_afternoon_only_employee() {
        let loader = ConfigLoader::load(config_path()).unwrap();

        let day = loader.schedule_for("emp_002", date(11)).unwrap();
        assert!(!day.schedule.has_morning());
        assert_eq!(day.schedule.afternoon_start, t(13, 0));
        assert_eq!(day.schedule.afternoon_end, t(18, 0));
    }

    #[test]
    fn test_unknown_employee_returns_error() {
        let loader = ConfigLoader::load(config_path()).unwrap();

        match loader.schedule_for("unknown", date(10)) {
            Err(EngineError::ScheduleNotFound { employee_id, .. }) => {
                assert_eq!(employee_id, "unknown");
            }
            _ => panic!("Expected ScheduleNotFound error"),
        }
    }

    #[test]
    fn test_employee_policy_applies_unless_request_overrides() {
        let loader = ConfigLoader::load(config_path()).unwrap();

        let payroll = loader.summary_options(Some("emp_003"), None);
        assert_eq!(payroll.compensation_policy, CompensationPolicy::Payroll);

        let requested = loader.summary_options(Some("emp_003"), Some(CompensationPolicy::HourBank));
        assert_eq!(requested.compensation_policy, CompensationPolicy::HourBank);

        let defaulted = loader.summary_options(None, None);
        assert_eq!(defaulted.compensation_policy, CompensationPolicy::HourBank);
    }

    #[test]
    fn test_load_missing_directory_returns_error() {
        let result = ConfigLoader::load("/nonexistent/path");

        match result {
            Err(EngineError::ConfigNotFound { path }) => {
                assert!(path.contains("engine.yaml"));
            }
            _ => panic!("Expected ConfigNotFound error"),
        }
    }

    #[test]
    fn test_invalid_schedule_time_is_a_parse_error() {
        let dir = std::env::temp_dir().join(format!("ponto-config-{}", uuid::Uuid::new_v4()));
        fs::create_dir_all(&dir).unwrap();
        fs::copy(
            Path::new(config_path()).join("engine.yaml"),
            dir.join("engine.yaml"),
        )
        .unwrap();
        fs::write(
            dir.join("schedules.yaml"),
            "employees:\n  emp_x:\n    name: X\n    weekly:\n      monday:\n        morning_start: \"8h\"\n        morning_end: \"12:00\"\n",
        )
        .unwrap();

        let result = ConfigLoader::load(&dir);
        fs::remove_dir_all(&dir).ok();

        match result {
            Err(EngineError::ConfigParseError { path, message }) => {
                assert!(path.contains("schedules.yaml"));
                assert!(message.contains("emp_x.weekly.monday.morning_start"));
            }
            other => panic!("Expected ConfigParseError, got {:?}", other),
        }
    }

    #[test]
    fn test_unknown_weekday_is_a_parse_error() {
        let dir = std::env::temp_dir().join(format!("ponto-config-{}", uuid::Uuid::new_v4()));
        fs::create_dir_all(&dir).unwrap();
        fs::copy(
            Path::new(config_path()).join("engine.yaml"),
            dir.join("engine.yaml"),
        )
        .unwrap();
        fs::write(
            dir.join("schedules.yaml"),
            "employees:\n  emp_x:\n    name: X\n    weekly:\n      segunda:\n        morning_start: \"08:00\"\n",
        )
        .unwrap();

        let result = ConfigLoader::load(&dir);
        fs::remove_dir_all(&dir).ok();

        assert!(matches!(result, Err(EngineError::ConfigParseError { .. })));
    }

    fn load_with_schedules(schedules_yaml: &str) -> EngineResult<ConfigLoader> {
        let dir = std::env::temp_dir().join(format!("ponto-config-{}", uuid::Uuid::new_v4()));
        fs::create_dir_all(&dir).unwrap();
        fs::copy(
            Path::new(config_path()).join("engine.yaml"),
            dir.join("engine.yaml"),
        )
        .unwrap();
        fs::write(dir.join("schedules.yaml"), schedules_yaml).unwrap();

        let result = ConfigLoader::load(&dir);
        fs::remove_dir_all(&dir).ok();
        result
    }

    #[test]
    fn test_interval_tolerance_longer_than_a_day_is_a_parse_error() {
        let dir = std::env::temp_dir().join(format!("ponto-config-{}", uuid::Uuid::new_v4()));
        fs::create_dir_all(&dir).unwrap();
        let engine = fs::read_to_string(Path::new(config_path()).join("engine.yaml"))
            .unwrap()
            .replace(
                "interval_tolerance_minutes: 0",
                "interval_tolerance_minutes: 100000000000000000",
            );
        fs::write(dir.join("engine.yaml"), engine).unwrap();
        fs::copy(
            Path::new(config_path()).join("schedules.yaml"),
            dir.join("schedules.yaml"),
        )
        .unwrap();

        let result = ConfigLoader::load(&dir);
        fs::remove_dir_all(&dir).ok();

        match result {
            Err(EngineError::ConfigParseError { message, .. }) => {
                assert!(message.contains("interval_tolerance_minutes"));
            }
            other => panic!("Expected ConfigParseError, got {:?}", other.map(|_| ())),
        }
    }

    #[test]
    fn test_negative_override_break_is_a_parse_error() {
        let result = load_with_schedules(
            "employees:\n  emp_x:\n    name: X\n    weekly:\n      monday:\n        morning_start: \"07:00\"\n        afternoon_end: \"13:15\"\n        shift_override:\n          kind: MORNING_ONLY\n          break_minutes: -60\n",
        );

        match result {
            Err(EngineError::ConfigParseError { message, .. }) => {
                assert!(message.contains("emp_x.weekly.monday.shift_override.break_minutes"));
            }
            other => panic!("Expected ConfigParseError, got {:?}", other.map(|_| ())),
        }
    }

    #[test]
    fn test_override_break_longer_than_a_day_is_a_parse_error() {
        let result = load_with_schedules(
            "employees:\n  emp_x:\n    name: X\n    weekly: {}\n    overrides:\n      - date: \"2025-03-14\"\n        morning_start: \"07:00\"\n        afternoon_end: \"13:15\"\n        shift_override:\n          kind: MORNING_ONLY\n          break_minutes: 100000000000000000\n",
        );

        assert!(matches!(result, Err(EngineError::ConfigParseError { .. })));
    }
}
