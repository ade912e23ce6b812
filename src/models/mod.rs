//! Core data models for the ponto engine.
//!
//! This module contains the punch, schedule and summary types shared by the
//! calculation, configuration and API layers.

mod day_summary;
mod punch;
mod schedule;

pub use day_summary::{
    AuditStep, CltFigures, DayStatus, DaySummary, HalfDayBreakdown, InformalIndicators,
    PeriodTotals,
};
pub use punch::{PunchDirection, PunchEvent, PunchSet, RawPunchSet, RejectedTimeValue};
pub use schedule::{CompensationPolicy, RawScheduleSpec, ScheduleSpec, ShiftKind, ShiftOverride};
