//! Calculation logic for the day-summary engine.
//!
//! Each step is a pure function taking a `step_number` and returning a result
//! that carries its own audit step. [`calculate_day_summary`] composes them:
//! completeness, worked time, expected time, balance, journey indicators,
//! interval excess and the CLT tolerance engine. Punch grouping and period
//! totals sit on either side of the day calculation.

mod clt_tolerance;
mod day_summary;
mod expected_time;
mod indicators;
mod interval_excess;
mod period_totals;
mod punch_grouping;
mod time_utils;
mod worked_time;

pub use clt_tolerance::{
    CltToleranceResult, EventSplit, STATUTORY_DAILY_CAP_MINUTES, STATUTORY_EVENT_TOLERANCE_MINUTES,
    ToleranceRules, apply_clt_tolerance,
};
pub use day_summary::{
    SummaryOptions, calculate_day_summary, calculate_day_summary_from_raw,
    calculate_day_summary_with_rejections, determine_status, required_slots,
};
pub use expected_time::{ExpectedTimeResult, calculate_expected_time};
pub use indicators::{IndicatorResult, JourneyEvent, calculate_indicators};
pub use interval_excess::{IntervalExcessResult, calculate_interval_excess};
pub use period_totals::{minutes_to_hours, summarize_period};
pub use punch_grouping::{GroupedPunches, default_noon_cutoff, group_punches};
pub use time_utils::{
    MINUTES_PER_DAY, minute_delta, parse_punch, parse_time_of_day, seconds_between,
    seconds_since_midnight, time_of_day_to_seconds, to_minutes_floor, window_seconds,
};
pub use worked_time::{WorkedTimeMode, WorkedTimeResult, calculate_worked_time};
