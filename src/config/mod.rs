//! Configuration loading and schedule lookup.
//!
//! Engine settings and employee schedules are read from YAML files. Schedule
//! times are validated at load time, so lookups never fail on bad data.
//!
//! # Example
//!
//! ```no_run
//! use ponto_engine::config::ConfigLoader;
//!
//! let config = ConfigLoader::load("./config/clt").unwrap();
//! println!("Loaded rule set: {}", config.settings().metadata.name);
//! ```

mod loader;
mod types;

pub use loader::ConfigLoader;
pub use types::{
    DateOverrideFile, EmployeeSchedule, EmployeeScheduleFile, EngineFile, EngineMetadata,
    EngineSettings, ScheduleBook, ScheduledDay, ScheduledDayFile, SchedulesFile, parse_weekday,
};
