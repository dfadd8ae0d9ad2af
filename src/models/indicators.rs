//! Rotation indicator models.
//!
//! This module contains the [`MonthlyRotationIndicators`] and
//! [`AnnualRotationIndicators`] types produced by the engine, along with the
//! [`ReferenceDates`] that anchor a monthly computation.

use std::collections::BTreeMap;

use chrono::{Month, NaiveDate};
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

use crate::error::{EngineError, EngineResult};

use super::{EmployeeSnapshotRecord, RotationFilter};

/// Rounds a value to two decimal places, half away from zero.
///
/// The result always carries a scale of two, so `9` renders as `9.00`.
pub fn round_2dp(value: Decimal) -> Decimal {
    let mut rounded = value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    rounded.rescale(2);
    rounded
}

/// The calendar dates a monthly computation is anchored on.
///
/// # Example
///
/// ```
/// use rotation_engine::models::ReferenceDates;
/// use chrono::NaiveDate;
///
/// let dates = ReferenceDates::for_month(2025, 3).unwrap();
/// assert_eq!(dates.month_start, NaiveDate::from_ymd_opt(2025, 3, 1).unwrap());
/// assert_eq!(dates.prev_month_end, NaiveDate::from_ymd_opt(2025, 2, 28).unwrap());
/// assert_eq!(dates.month_end, NaiveDate::from_ymd_opt(2025, 3, 31).unwrap());
/// assert_eq!(dates.retire_window_start, NaiveDate::from_ymd_opt(2025, 3, 2).unwrap());
/// assert_eq!(dates.retire_window_end, NaiveDate::from_ymd_opt(2025, 4, 1).unwrap());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReferenceDates {
    /// Day 1 of the target month; the current snapshot is taken here.
    pub month_start: NaiveDate,
    /// Last day of the prior month; the previous snapshot is taken here.
    pub prev_month_end: NaiveDate,
    /// Last day of the target month.
    pub month_end: NaiveDate,
    /// First day of the retirement window (day 2 of the target month).
    pub retire_window_start: NaiveDate,
    /// Last day of the retirement window (day 1 of the following month).
    pub retire_window_end: NaiveDate,
}

impl ReferenceDates {
    /// Derives the reference dates for a calendar month.
    ///
    /// Returns `InvalidPeriod` if the month is outside 1-12 or the year
    /// cannot be represented.
    pub fn for_month(year: i32, month: u32) -> EngineResult<Self> {
        let invalid = || EngineError::InvalidPeriod { year, month };

        if !(1..=12).contains(&month) {
            return Err(invalid());
        }

        let month_start = NaiveDate::from_ymd_opt(year, month, 1).ok_or_else(invalid)?;
        let (next_year, next_month) = if month == 12 {
            (year + 1, 1)
        } else {
            (year, month + 1)
        };
        let retire_window_end =
            NaiveDate::from_ymd_opt(next_year, next_month, 1).ok_or_else(invalid)?;
        let month_end = retire_window_end.pred_opt().ok_or_else(invalid)?;
        let prev_month_end = month_start.pred_opt().ok_or_else(invalid)?;
        let retire_window_start = month_start.succ_opt().ok_or_else(invalid)?;

        Ok(Self {
            month_start,
            prev_month_end,
            month_end,
            retire_window_start,
            retire_window_end,
        })
    }
}

/// Returns the English name of a month number (1-12).
pub fn month_name(month: u32) -> String {
    u8::try_from(month)
        .ok()
        .and_then(|m| Month::try_from(m).ok())
        .map(|m| m.name().to_string())
        .unwrap_or_default()
}

/// Rotation indicators for one calendar month.
///
/// A degraded entry (one whose snapshots could not be fetched) has every
/// count and rate at zero, empty worker lists, and a populated `error`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthlyRotationIndicators {
    /// The calendar year.
    pub year: i32,
    /// The month number (1-12).
    pub month: u32,
    /// The month name (e.g., "September").
    pub month_name: String,
    /// Number of workers whose contract ended inside the retirement window.
    pub retired_count: usize,
    /// Workers whose contract ended inside the retirement window.
    pub retired_workers: Vec<EmployeeSnapshotRecord>,
    /// Headcount at the start of the period.
    pub start_count: usize,
    /// Workers active at the start of the period.
    pub start_workers: Vec<EmployeeSnapshotRecord>,
    /// Headcount at the end of the period, each worker counted once.
    pub end_count: usize,
    /// Workers active on the last day of the month.
    pub active_at_month_end_count: usize,
    /// Workers whose contract ends exactly on the last day of the month.
    ///
    /// These are already part of `active_at_month_end_count`.
    pub same_day_exit_count: usize,
    /// Average workforce, `(start + end) / 2`.
    pub average_workers: Decimal,
    /// Retired workers as a percentage of the starting headcount.
    pub rotation_percentage: Decimal,
    /// The reference dates used in the computation.
    pub reference_dates: ReferenceDates,
    /// Why this month could not be computed, for degraded entries.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl MonthlyRotationIndicators {
    /// Creates the zero-valued entry for a month whose snapshots failed.
    pub fn degraded(
        year: i32,
        month: u32,
        reference_dates: ReferenceDates,
        error: impl Into<String>,
    ) -> Self {
        Self {
            year,
            month,
            month_name: month_name(month),
            retired_count: 0,
            retired_workers: Vec::new(),
            start_count: 0,
            start_workers: Vec::new(),
            end_count: 0,
            active_at_month_end_count: 0,
            same_day_exit_count: 0,
            average_workers: Decimal::ZERO,
            rotation_percentage: Decimal::ZERO,
            reference_dates,
            error: Some(error.into()),
        }
    }

    /// Returns true if this entry stands in for a month that failed.
    pub fn is_degraded(&self) -> bool {
        self.error.is_some()
    }
}

/// Roll-up totals across the twelve months of a year.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnnualTotals {
    /// Sum of retired workers over every month.
    pub total_retired: usize,
    /// Sum of monthly average workforce divided by twelve.
    pub average_workers_per_month: Decimal,
    /// `total_retired / average_workers_per_month * 100`.
    pub annual_rotation_percentage: Decimal,
}

impl AnnualTotals {
    /// Rolls up a set of monthly indicators.
    ///
    /// Degraded months contribute zero to every sum; the monthly average is
    /// still divided by twelve.
    ///
    /// # Example
    ///
    /// ```
    /// use rotation_engine::models::{AnnualTotals, MonthlyRotationIndicators, ReferenceDates};
    /// use rust_decimal::Decimal;
    ///
    /// let months: Vec<MonthlyRotationIndicators> = (1..=12)
    ///     .map(|m| {
    ///         let dates = ReferenceDates::for_month(2025, m).unwrap();
    ///         let mut entry = MonthlyRotationIndicators::degraded(2025, m, dates, "n/a");
    ///         entry.error = None;
    ///         entry.retired_count = 1;
    ///         entry.average_workers = Decimal::new(100, 0);
    ///         entry
    ///     })
    ///     .collect();
    ///
    /// let totals = AnnualTotals::from_months(months.iter());
    /// assert_eq!(totals.total_retired, 12);
    /// assert_eq!(totals.average_workers_per_month, Decimal::new(10000, 2));
    /// assert_eq!(totals.annual_rotation_percentage, Decimal::new(1200, 2));
    /// ```
    pub fn from_months<'a>(months: impl Iterator<Item = &'a MonthlyRotationIndicators>) -> Self {
        let (total_retired, average_sum) = months.fold(
            (0usize, Decimal::ZERO),
            |(retired, averages), month| {
                (retired + month.retired_count, averages + month.average_workers)
            },
        );

        // Both reported values derive from the unrounded mean.
        let mean = average_sum / Decimal::from(12);
        let annual_rotation_percentage = if mean.is_zero() {
            Decimal::ZERO
        } else {
            round_2dp(Decimal::from(total_retired) / mean * Decimal::ONE_HUNDRED)
        };

        Self {
            total_retired,
            average_workers_per_month: round_2dp(mean),
            annual_rotation_percentage,
        }
    }
}

/// Rotation indicators for a full calendar year.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnnualRotationIndicators {
    /// The calendar year.
    pub year: i32,
    /// The filter the snapshots were restricted by.
    pub filter: RotationFilter,
    /// Monthly indicators keyed by month number (1-12).
    pub months: BTreeMap<u32, MonthlyRotationIndicators>,
    /// Roll-up totals.
    pub totals: AnnualTotals,
    /// Months that could not be computed, in ascending order.
    pub degraded_months: Vec<u32>,
    /// Number of months computed from real snapshots.
    pub successful_months: usize,
}

impl AnnualRotationIndicators {
    /// Assembles the annual report from a complete month map.
    pub fn from_months(
        year: i32,
        filter: RotationFilter,
        months: BTreeMap<u32, MonthlyRotationIndicators>,
    ) -> Self {
        let totals = AnnualTotals::from_months(months.values());
        let degraded_months: Vec<u32> = months
            .values()
            .filter(|m| m.is_degraded())
            .map(|m| m.month)
            .collect();
        let successful_months = months.len() - degraded_months.len();

        Self {
            year,
            filter,
            months,
            totals,
            degraded_months,
            successful_months,
        }
    }
}
