use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use chrono::NaiveDate;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tracing::{debug, info, warn};

use crate::calculation::{compute_monthly, extract_filter_options};
use crate::config::EngineConfig;
use crate::error::{EngineError, EngineResult};
use crate::fetcher::SnapshotFetcher;
use crate::models::{
    AnnualRotationIndicators, EmployeeSnapshotRecord, FilterOptions, MonthlyRotationIndicators,
    ReferenceDates, RotationFilter,
};

/// Computes rotation indicators from snapshots served by a fetcher.
///
/// # Example
///
/// ```
/// use std::sync::Arc;
/// use rotation_engine::config::EngineConfig;
/// use rotation_engine::fetcher::InMemorySnapshotFetcher;
/// use rotation_engine::models::RotationFilter;
/// use rotation_engine::service::RotationService;
///
/// # #[tokio::main]
/// # async fn main() {
/// let service = RotationService::new(
///     Arc::new(InMemorySnapshotFetcher::new()),
///     EngineConfig::default(),
/// );
/// let annual = service
///     .compute_annual(2025, &RotationFilter::default())
///     .await
///     .unwrap();
/// assert_eq!(annual.months.len(), 12);
/// assert_eq!(annual.totals.total_retired, 0);
/// # }
/// ```
#[derive(Clone)]
pub struct RotationService {
    fetcher: Arc<dyn SnapshotFetcher>,
    config: EngineConfig,
}

impl RotationService {
    /// Creates a service over a fetcher and configuration.
    pub fn new(fetcher: Arc<dyn SnapshotFetcher>, config: EngineConfig) -> Self {
        Self { fetcher, config }
    }

    /// Returns the engine configuration.
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Computes the indicators for one month.
    ///
    /// The year policy and the month number are checked before any fetch.
    /// Unlike [`compute_annual`](Self::compute_annual), a fetch failure is
    /// returned to the caller.
    pub async fn compute_month(
        &self,
        year: i32,
        month: u32,
        filter: &RotationFilter,
    ) -> EngineResult<MonthlyRotationIndicators> {
        self.config.settings().validate_year(year)?;
        ReferenceDates::for_month(year, month)?;

        let started = Instant::now();
        let indicators = month_unit(
            Arc::clone(&self.fetcher),
            year,
            month,
            filter,
            self.config.settings().fetch_timeout(),
        )
        .await?;

        info!(
            year,
            month,
            retired = indicators.retired_count,
            start = indicators.start_count,
            end = indicators.end_count,
            duration_us = started.elapsed().as_micros(),
            "Monthly rotation computed"
        );

        Ok(indicators)
    }

    /// Computes the indicators for all twelve months of a year.
    ///
    /// Months run concurrently, at most `concurrency_limit` at a time; each
    /// running month has both of its snapshot fetches in flight. A month
    /// whose snapshots cannot be fetched (error, timeout or task panic) is
    /// recorded as a degraded entry and the others still complete; only an
    /// out-of-range year fails the whole call.
    ///
    /// Dropping the returned future aborts all in-flight month tasks.
    pub async fn compute_annual(
        &self,
        year: i32,
        filter: &RotationFilter,
    ) -> EngineResult<AnnualRotationIndicators> {
        self.config.settings().validate_year(year)?;

        let started = Instant::now();
        let timeout = self.config.settings().fetch_timeout();
        let semaphore = Arc::new(Semaphore::new(self.config.settings().concurrency_limit));
        let mut tasks = JoinSet::new();

        for month in 1..=12u32 {
            let fetcher = Arc::clone(&self.fetcher);
            let semaphore = Arc::clone(&semaphore);
            let filter = filter.clone();

            tasks.spawn(async move {
                // The semaphore is never closed.
                let _permit = semaphore.acquire_owned().await.ok();
                debug!(year, month, "Month task started");
                let result = month_unit(fetcher, year, month, &filter, timeout).await;
                (month, result)
            });
        }

        let mut months = BTreeMap::new();
        let mut task_failure = None;

        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok((month, Ok(indicators))) => {
                    debug!(year, month, retired = indicators.retired_count, "Month computed");
                    months.insert(month, indicators);
                }
                Ok((month, Err(err))) => {
                    warn!(
                        year,
                        month,
                        fetch_failure = err.is_fetch_failure(),
                        error = %err,
                        "Month degraded"
                    );
                    let dates = ReferenceDates::for_month(year, month)?;
                    months.insert(
                        month,
                        MonthlyRotationIndicators::degraded(year, month, dates, err.to_string()),
                    );
                }
                Err(join_error) => {
                    warn!(year, error = %join_error, "Month task failed");
                    task_failure = Some(join_error.to_string());
                }
            }
        }

        // A panicked task cannot report its month; fill the gaps.
        for month in 1..=12u32 {
            if !months.contains_key(&month) {
                let dates = ReferenceDates::for_month(year, month)?;
                let message = task_failure
                    .clone()
                    .unwrap_or_else(|| "month task did not complete".to_string());
                months.insert(
                    month,
                    MonthlyRotationIndicators::degraded(year, month, dates, message),
                );
            }
        }

        let annual = AnnualRotationIndicators::from_months(year, filter.clone(), months);

        info!(
            year,
            successful_months = annual.successful_months,
            degraded_months = ?annual.degraded_months,
            total_retired = annual.totals.total_retired,
            duration_us = started.elapsed().as_micros(),
            "Annual rotation computed"
        );

        Ok(annual)
    }

    /// Returns the filtered workforce snapshot for a date.
    pub async fn personnel(
        &self,
        reference_date: NaiveDate,
        filter: &RotationFilter,
    ) -> EngineResult<Vec<EmployeeSnapshotRecord>> {
        fetch_snapshot(
            self.fetcher.as_ref(),
            reference_date,
            filter,
            self.config.settings().fetch_timeout(),
        )
        .await
    }

    /// Returns the filter options present in the unfiltered snapshot for a
    /// date.
    pub async fn filter_options(&self, reference_date: NaiveDate) -> EngineResult<FilterOptions> {
        let snapshot = fetch_snapshot(
            self.fetcher.as_ref(),
            reference_date,
            &RotationFilter::default(),
            self.config.settings().fetch_timeout(),
        )
        .await?;
        Ok(extract_filter_options(&snapshot))
    }
}

/// Fetches both snapshots of a month and computes its indicators.
async fn month_unit(
    fetcher: Arc<dyn SnapshotFetcher>,
    year: i32,
    month: u32,
    filter: &RotationFilter,
    timeout: Duration,
) -> EngineResult<MonthlyRotationIndicators> {
    let dates = ReferenceDates::for_month(year, month)?;

    let (current, previous) = tokio::try_join!(
        fetch_snapshot(fetcher.as_ref(), dates.month_start, filter, timeout),
        fetch_snapshot(fetcher.as_ref(), dates.prev_month_end, filter, timeout),
    )?;

    compute_monthly(&current, &previous, year, month)
}

async fn fetch_snapshot(
    fetcher: &dyn SnapshotFetcher,
    reference_date: NaiveDate,
    filter: &RotationFilter,
    timeout: Duration,
) -> EngineResult<Vec<EmployeeSnapshotRecord>> {
    match tokio::time::timeout(timeout, fetcher.fetch(reference_date, filter)).await {
        Ok(result) => result,
        Err(_) => Err(EngineError::FetchTimeout {
            reference_date,
            timeout_ms: u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX),
        }),
    }
}
