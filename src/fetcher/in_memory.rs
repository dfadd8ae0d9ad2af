//! In-memory snapshot fetcher.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::NaiveDate;

use crate::error::EngineResult;
use crate::models::{EmployeeSnapshotRecord, RotationFilter};

use super::SnapshotFetcher;

/// Serves pre-loaded snapshots keyed by reference date.
///
/// Filters are applied client-side. A date with no snapshot yields an empty
/// workforce.
///
/// # Example
///
/// ```
/// use rotation_engine::fetcher::{InMemorySnapshotFetcher, SnapshotFetcher};
/// use rotation_engine::models::RotationFilter;
/// use chrono::NaiveDate;
///
/// # #[tokio::main]
/// # async fn main() {
/// let date = NaiveDate::from_ymd_opt(2025, 9, 1).unwrap();
/// let fetcher = InMemorySnapshotFetcher::new().with_snapshot(date, vec![]);
/// let snapshot = fetcher.fetch(date, &RotationFilter::default()).await.unwrap();
/// assert!(snapshot.is_empty());
/// # }
/// ```
#[derive(Debug, Clone, Default)]
pub struct InMemorySnapshotFetcher {
    snapshots: HashMap<NaiveDate, Vec<EmployeeSnapshotRecord>>,
}

impl InMemorySnapshotFetcher {
    /// Creates an empty fetcher.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a snapshot, returning the fetcher.
    pub fn with_snapshot(
        mut self,
        reference_date: NaiveDate,
        records: Vec<EmployeeSnapshotRecord>,
    ) -> Self {
        self.insert(reference_date, records);
        self
    }

    /// Adds or replaces the snapshot for a reference date.
    pub fn insert(&mut self, reference_date: NaiveDate, records: Vec<EmployeeSnapshotRecord>) {
        self.snapshots.insert(reference_date, records);
    }

    /// Returns the number of stored snapshots.
    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    /// Returns true if no snapshot is stored.
    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }
}

#[async_trait]
impl SnapshotFetcher for InMemorySnapshotFetcher {
    async fn fetch(
        &self,
        reference_date: NaiveDate,
        filter: &RotationFilter,
    ) -> EngineResult<Vec<EmployeeSnapshotRecord>> {
        let snapshot = self
            .snapshots
            .get(&reference_date)
            .cloned()
            .unwrap_or_default();
        Ok(filter.apply(snapshot))
    }
}
