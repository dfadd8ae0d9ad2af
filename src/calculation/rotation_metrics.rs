//! Monthly rotation indicator calculation.
//!
//! This module classifies the workers of two snapshots (the first day of the
//! target month and the last day of the prior month) into retired,
//! start-of-period and end-of-period cohorts, and derives the average
//! workforce and the rotation percentage for the month.

use chrono::NaiveDate;
use rust_decimal::Decimal;

use crate::error::EngineResult;
use crate::models::{
    EmployeeSnapshotRecord, MonthlyRotationIndicators, ReferenceDates, month_name, round_2dp,
};

/// Returns true if the worker's contract ended inside the retirement window.
///
/// The window runs from day 2 of the target month through day 1 of the
/// following month, both inclusive. A contract ending on the last day of the
/// month is a same-day exit: the worker is present at period end and is not
/// counted as retired. Because the next month's window starts on its day 2,
/// a month-end contract end is never counted as retired in any month; it only
/// shows up in `same_day_exit_count`. Open-ended and unusable end dates never
/// retire.
pub fn is_retired(record: &EmployeeSnapshotRecord, dates: &ReferenceDates) -> bool {
    record.contract_end_date().is_some_and(|end| {
        end >= dates.retire_window_start
            && end <= dates.retire_window_end
            && end != dates.month_end
    })
}

/// Returns true if the worker was employed at the close of the prior month.
///
/// The contract must have started on or before `prev_month_end` and must not
/// have ended on or before it.
pub fn is_active_at_period_start(record: &EmployeeSnapshotRecord, dates: &ReferenceDates) -> bool {
    is_active_on(record, dates.prev_month_end, |end, day| end > day)
}

/// Returns true if the worker is employed on the last day of the month.
///
/// A contract ending exactly on the last day still counts as active.
pub fn is_active_at_month_end(record: &EmployeeSnapshotRecord, dates: &ReferenceDates) -> bool {
    is_active_on(record, dates.month_end, |end, day| end >= day)
}

/// Returns true if the worker's contract ends exactly on the last day of the month.
pub fn is_same_day_exit(record: &EmployeeSnapshotRecord, dates: &ReferenceDates) -> bool {
    record.contract_end_date() == Some(dates.month_end)
}

fn is_active_on(
    record: &EmployeeSnapshotRecord,
    day: NaiveDate,
    still_employed: impl Fn(NaiveDate, NaiveDate) -> bool,
) -> bool {
    let Some(start) = record.contract_start_date() else {
        return false;
    };
    if start > day {
        return false;
    }
    match record.contract_end_date() {
        Some(end) => still_employed(end, day),
        None => true,
    }
}

/// Computes the average workforce, `(start + end) / 2`, to two decimals.
///
/// # Example
///
/// ```
/// use rotation_engine::calculation::average_workforce;
/// use rust_decimal::Decimal;
///
/// assert_eq!(average_workforce(10, 8), Decimal::new(900, 2));
/// assert_eq!(average_workforce(3, 4), Decimal::new(350, 2));
/// ```
pub fn average_workforce(start_count: usize, end_count: usize) -> Decimal {
    round_2dp(Decimal::from(start_count + end_count) / Decimal::TWO)
}

/// Computes `retired / start * 100` to two decimals, or zero when nobody
/// was employed at the start of the period.
///
/// # Example
///
/// ```
/// use rotation_engine::calculation::rotation_percentage;
/// use rust_decimal::Decimal;
///
/// assert_eq!(rotation_percentage(2, 10), Decimal::new(2000, 2));
/// assert_eq!(rotation_percentage(5, 0), Decimal::ZERO);
/// ```
pub fn rotation_percentage(retired_count: usize, start_count: usize) -> Decimal {
    if start_count == 0 {
        return round_2dp(Decimal::ZERO);
    }
    round_2dp(Decimal::from(retired_count) / Decimal::from(start_count) * Decimal::ONE_HUNDRED)
}

/// Computes the rotation indicators for one calendar month.
///
/// # Arguments
///
/// * `current` - Snapshot as of the first day of the target month
/// * `previous` - Snapshot as of the last day of the prior month; when empty,
///   the start-of-period cohort is taken from `current` instead
/// * `year` - The calendar year
/// * `month` - The month number (1-12)
///
/// # Returns
///
/// The month's indicators, or `InvalidPeriod` if the year/month pair does
/// not name a calendar month.
///
/// # Headcount at period end
///
/// Workers whose contract ends on the last day of the month already satisfy
/// the active-at-month-end rule, so the end-of-period headcount counts them
/// once. They are also reported separately as `same_day_exit_count`.
///
/// # Example
///
/// ```
/// use rotation_engine::calculation::compute_monthly;
///
/// let indicators = compute_monthly(&[], &[], 2025, 9).unwrap();
/// assert_eq!(indicators.month_name, "September");
/// assert_eq!(indicators.start_count, 0);
/// assert_eq!(indicators.rotation_percentage.to_string(), "0.00");
/// ```
pub fn compute_monthly(
    current: &[EmployeeSnapshotRecord],
    previous: &[EmployeeSnapshotRecord],
    year: i32,
    month: u32,
) -> EngineResult<MonthlyRotationIndicators> {
    let dates = ReferenceDates::for_month(year, month)?;

    let retired_workers: Vec<EmployeeSnapshotRecord> = current
        .iter()
        .filter(|r| is_retired(r, &dates))
        .cloned()
        .collect();

    let start_source = if previous.is_empty() { current } else { previous };
    let start_workers: Vec<EmployeeSnapshotRecord> = start_source
        .iter()
        .filter(|r| is_active_at_period_start(r, &dates))
        .cloned()
        .collect();

    let active_at_month_end_count = current
        .iter()
        .filter(|r| is_active_at_month_end(r, &dates))
        .count();
    let same_day_exit_count = current
        .iter()
        .filter(|r| is_same_day_exit(r, &dates))
        .count();

    let retired_count = retired_workers.len();
    let start_count = start_workers.len();
    let end_count = active_at_month_end_count;

    Ok(MonthlyRotationIndicators {
        year,
        month,
        month_name: month_name(month),
        retired_count,
        retired_workers,
        start_count,
        start_workers,
        end_count,
        active_at_month_end_count,
        same_day_exit_count,
        average_workers: average_workforce(start_count, end_count),
        rotation_percentage: rotation_percentage(retired_count, start_count),
        reference_dates: dates,
        error: None,
    })
}
