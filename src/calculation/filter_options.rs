//! Filter option extraction.
//!
//! Derives the distinct companies, personnel areas, cost centers and jobs
//! present in an unfiltered snapshot, for populating filter selectors.

use std::collections::BTreeSet;

use crate::models::{EmployeeSnapshotRecord, FilterOptions, OrgDimension};

/// Extracts the sorted, de-duplicated dimension values of a snapshot.
///
/// Lists are ordered lexicographically by code, then by description. A
/// record with an empty code contributes nothing to that dimension.
///
/// # Example
///
/// ```
/// use rotation_engine::calculation::extract_filter_options;
///
/// let options = extract_filter_options(&[]);
/// assert!(options.companies.is_empty());
/// assert!(options.jobs.is_empty());
/// ```
pub fn extract_filter_options(snapshot: &[EmployeeSnapshotRecord]) -> FilterOptions {
    let mut companies = BTreeSet::new();
    let mut personnel_areas = BTreeSet::new();
    let mut cost_centers = BTreeSet::new();
    let mut jobs = BTreeSet::new();

    for record in snapshot {
        if !record.company_code.is_empty() {
            companies.insert(record.company_code.clone());
        }
        insert_dimension(&mut personnel_areas, &record.personnel_area);
        insert_dimension(&mut cost_centers, &record.cost_center);
        insert_dimension(
            &mut jobs,
            &OrgDimension::new(record.job_code.as_str(), record.job_description.as_str()),
        );
    }

    FilterOptions {
        companies: companies.into_iter().collect(),
        personnel_areas: personnel_areas.into_iter().collect(),
        cost_centers: cost_centers.into_iter().collect(),
        jobs: jobs.into_iter().collect(),
    }
}

fn insert_dimension(set: &mut BTreeSet<OrgDimension>, value: &OrgDimension) {
    if !value.code.is_empty() {
        set.insert(value.clone());
    }
}
