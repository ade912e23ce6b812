//! Aggregation of day summaries into period totals.
//!
//! Minute sums stay integral. Hour figures are derived with `Decimal` so
//! payroll exports see exact two-place values.

use rust_decimal::Decimal;

use crate::models::{CompensationPolicy, DaySummary, PeriodTotals};

/// Converts whole minutes to hours rounded to two decimal places.
///
/// # Example
///
/// ```
/// use ponto_engine::calculation::minutes_to_hours;
/// use rust_decimal::Decimal;
/// use std::str::FromStr;
///
/// assert_eq!(minutes_to_hours(463), Decimal::from_str("7.72").unwrap());
/// assert_eq!(minutes_to_hours(-90), Decimal::from_str("-1.5").unwrap());
/// ```
pub fn minutes_to_hours(minutes: i64) -> Decimal {
    (Decimal::from(minutes) / Decimal::from(60)).round_dp(2)
}

/// Sums a set of day summaries.
///
/// The hour bank only accumulates net balances of `HOUR_BANK` days; payroll
/// days contribute to the payable and deductible totals instead.
pub fn summarize_period(days: &[DaySummary]) -> PeriodTotals {
    let mut totals = PeriodTotals::default();

    for day in days {
        totals.days += 1;
        if day.is_inconsistent() {
            totals.inconsistent_days += 1;
        }
        totals.worked_minutes += day.worked_minutes;
        totals.expected_minutes += day.expected_minutes;
        totals.balance_minutes += day.balance_minutes;
        totals.late_minutes += day.clt.late_minutes;
        totals.early_arrival_minutes += day.clt.early_arrival_minutes;
        totals.overtime_minutes += day.clt.overtime_minutes;
        totals.early_exit_minutes += day.clt.early_exit_minutes;

        match day.compensation_policy {
            CompensationPolicy::HourBank => {
                totals.hour_bank_minutes += day.clt.net_balance_minutes;
            }
            CompensationPolicy::Payroll => {
                totals.payable_overtime_minutes += day.clt.payable_overtime_minutes.unwrap_or(0);
                totals.deductible_shortfall_minutes +=
                    day.clt.deductible_shortfall_minutes.unwrap_or(0);
            }
        }
    }

    totals.worked_hours = minutes_to_hours(totals.worked_minutes);
    totals.hour_bank_hours = minutes_to_hours(totals.hour_bank_minutes);
    totals.payable_overtime_hours = minutes_to_hours(totals.payable_overtime_minutes);
    totals.deductible_shortfall_hours = minutes_to_hours(totals.deductible_shortfall_minutes);

    totals
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calculation::{SummaryOptions, calculate_day_summary};
    use crate::models::{PunchSet, ScheduleSpec};
    use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn schedule() -> ScheduleSpec {
        let t = |h| NaiveTime::from_hms_opt(h, 0, 0);
        ScheduleSpec {
            morning_start: t(8),
            morning_end: t(12),
            afternoon_start: t(13),
            afternoon_end: t(17),
        }
    }

    fn day(day_of_month: u32, times: [&str; 4], policy: CompensationPolicy) -> DaySummary {
        let date = NaiveDate::from_ymd_opt(2025, 3, day_of_month).unwrap();
        let at = |s: &str| {
            NaiveDateTime::parse_from_str(
                &format!("2025-03-{:02} {}", day_of_month, s),
                "%Y-%m-%d %H:%M",
            )
            .ok()
        };
        let punches = PunchSet {
            morning_entry: at(times[0]),
            lunch_exit: at(times[1]),
            afternoon_entry: at(times[2]),
            final_exit: at(times[3]),
        };
        let options = SummaryOptions {
            compensation_policy: policy,
            ..Default::default()
        };
        calculate_day_summary(&punches, &schedule(), date, None, &options)
    }

    #[test]
    fn test_empty_period() {
        let totals = summarize_period(&[]);
        assert_eq!(totals, PeriodTotals::default());
        assert_eq!(totals.worked_hours, Decimal::ZERO);
    }

    #[test]
    fn test_hour_bank_accumulates_net_balances() {
        let days = [
            // late 8
            day(10, ["08:13", "12:00", "13:00", "17:00"], CompensationPolicy::HourBank),
            // overtime 20
            day(11, ["08:00", "12:00", "13:00", "17:25"], CompensationPolicy::HourBank),
        ];
        let totals = summarize_period(&days);

        assert_eq!(totals.days, 2);
        assert_eq!(totals.late_minutes, 8);
        assert_eq!(totals.overtime_minutes, 20);
        assert_eq!(totals.hour_bank_minutes, 12);
        assert_eq!(totals.hour_bank_hours, dec("0.20"));
        assert_eq!(totals.payable_overtime_minutes, 0);
    }

    #[test]
    fn test_payroll_days_stay_out_of_hour_bank() {
        let days = [
            day(10, ["08:13", "12:00", "13:00", "17:25"], CompensationPolicy::Payroll),
            day(11, ["08:00", "12:00", "13:00", "17:25"], CompensationPolicy::HourBank),
        ];
        let totals = summarize_period(&days);

        assert_eq!(totals.payable_overtime_minutes, 20);
        assert_eq!(totals.deductible_shortfall_minutes, 8);
        assert_eq!(totals.hour_bank_minutes, 20);
        assert_eq!(totals.payable_overtime_hours, dec("0.33"));
        assert_eq!(totals.deductible_shortfall_hours, dec("0.13"));
    }

    #[test]
    fn test_counts_inconsistent_days_and_raw_balance() {
        let date = NaiveDate::from_ymd_opt(2025, 3, 12).unwrap();
        let missing = calculate_day_summary(
            &PunchSet::default(),
            &schedule(),
            date,
            None,
            &SummaryOptions::default(),
        );
        let days = [
            day(10, ["08:00", "12:00", "13:00", "17:00"], CompensationPolicy::HourBank),
            missing,
        ];
        let totals = summarize_period(&days);

        assert_eq!(totals.inconsistent_days, 1);
        assert_eq!(totals.worked_minutes, 480);
        assert_eq!(totals.expected_minutes, 960);
        assert_eq!(totals.balance_minutes, -480);
        assert_eq!(totals.worked_hours, dec("8"));
    }
}
