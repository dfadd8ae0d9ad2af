//! Rotation filter model.
//!
//! A [`RotationFilter`] restricts a snapshot to a subset of companies,
//! personnel areas, cost centers and jobs. Values within one field are
//! OR-combined; distinct fields are AND-combined; an empty field places no
//! restriction.

use serde::{Deserialize, Serialize};

use super::EmployeeSnapshotRecord;

/// Optional dimension restrictions applied to a snapshot.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RotationFilter {
    /// Company codes to keep.
    #[serde(default)]
    pub company_codes: Vec<String>,
    /// Personnel-area codes to keep.
    #[serde(default)]
    pub personnel_areas: Vec<String>,
    /// Cost-center codes to keep.
    #[serde(default)]
    pub cost_centers: Vec<String>,
    /// Job codes to keep.
    #[serde(default)]
    pub job_codes: Vec<String>,
}

impl RotationFilter {
    /// Builds a filter from comma-separated field values.
    ///
    /// Each value is split on `,`, trimmed, and blanks are dropped.
    ///
    /// # Example
    ///
    /// ```
    /// use rotation_engine::models::RotationFilter;
    ///
    /// let filter = RotationFilter::from_csv_fields(Some("1000, 2000"), None, Some(""), None);
    /// assert_eq!(filter.company_codes, vec!["1000", "2000"]);
    /// assert!(filter.cost_centers.is_empty());
    /// ```
    pub fn from_csv_fields(
        company_codes: Option<&str>,
        personnel_areas: Option<&str>,
        cost_centers: Option<&str>,
        job_codes: Option<&str>,
    ) -> Self {
        Self {
            company_codes: split_csv(company_codes),
            personnel_areas: split_csv(personnel_areas),
            cost_centers: split_csv(cost_centers),
            job_codes: split_csv(job_codes),
        }
    }

    /// Returns true if no field restricts anything.
    pub fn is_empty(&self) -> bool {
        self.company_codes.is_empty()
            && self.personnel_areas.is_empty()
            && self.cost_centers.is_empty()
            && self.job_codes.is_empty()
    }

    /// Returns true if the record passes every restricted field.
    pub fn matches(&self, record: &EmployeeSnapshotRecord) -> bool {
        field_matches(&self.company_codes, &record.company_code)
            && field_matches(&self.personnel_areas, &record.personnel_area.code)
            && field_matches(&self.cost_centers, &record.cost_center.code)
            && field_matches(&self.job_codes, &record.job_code)
    }

    /// Keeps only the records that match this filter.
    pub fn apply(&self, records: Vec<EmployeeSnapshotRecord>) -> Vec<EmployeeSnapshotRecord> {
        if self.is_empty() {
            return records;
        }
        records.into_iter().filter(|r| self.matches(r)).collect()
    }
}

fn field_matches(allowed: &[String], value: &str) -> bool {
    allowed.is_empty() || allowed.iter().any(|a| a == value)
}

fn split_csv(raw: Option<&str>) -> Vec<String> {
    raw.map(|s| {
        s.split(',')
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .map(str::to_string)
            .collect()
    })
    .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{DateValue, OrgDimension};
    use rust_decimal::Decimal;

    fn record(company: &str, area: &str, cost_center: &str, job: &str) -> EmployeeSnapshotRecord {
        EmployeeSnapshotRecord {
            id: format!("{}-{}-{}-{}", company, area, cost_center, job),
            name: "Test".to_string(),
            job_code: job.to_string(),
            job_description: String::new(),
            organizational_unit: OrgDimension::default(),
            personnel_area: OrgDimension::new(area, ""),
            cost_center: OrgDimension::new(cost_center, ""),
            company_code: company.to_string(),
            contracted_hours: Decimal::ZERO,
            contract_start: DateValue::Unusable,
            contract_end: DateValue::OpenEnded,
        }
    }

    #[test]
    fn test_empty_filter_matches_everything() {
        let filter = RotationFilter::default();
        assert!(filter.is_empty());
        assert!(filter.matches(&record("1000", "P1", "C1", "J1")));
    }

    #[test]
    fn test_values_within_field_are_or_combined() {
        let filter = RotationFilter {
            company_codes: vec!["1000".to_string(), "2000".to_string()],
            ..Default::default()
        };
        assert!(filter.matches(&record("1000", "P1", "C1", "J1")));
        assert!(filter.matches(&record("2000", "P1", "C1", "J1")));
        assert!(!filter.matches(&record("3000", "P1", "C1", "J1")));
    }

    #[test]
    fn test_fields_are_and_combined() {
        let filter = RotationFilter {
            company_codes: vec!["1000".to_string()],
            job_codes: vec!["J2".to_string()],
            ..Default::default()
        };
        assert!(!filter.matches(&record("1000", "P1", "C1", "J1")));
        assert!(filter.matches(&record("1000", "P1", "C1", "J2")));
        assert!(!filter.matches(&record("2000", "P1", "C1", "J2")));
    }

    #[test]
    fn test_personnel_area_and_cost_center_use_codes() {
        let filter = RotationFilter {
            personnel_areas: vec!["P2".to_string()],
            cost_centers: vec!["C9".to_string()],
            ..Default::default()
        };
        assert!(filter.matches(&record("1000", "P2", "C9", "J1")));
        assert!(!filter.matches(&record("1000", "P2", "C1", "J1")));
    }

    #[test]
    fn test_apply_keeps_matching_records_in_order() {
        let filter = RotationFilter::from_csv_fields(None, Some("P1,P3"), None, None);
        let kept = filter.apply(vec![
            record("1000", "P1", "C1", "J1"),
            record("1000", "P2", "C1", "J1"),
            record("1000", "P3", "C1", "J1"),
        ]);
        let areas: Vec<&str> = kept.iter().map(|r| r.personnel_area.code.as_str()).collect();
        assert_eq!(areas, vec!["P1", "P3"]);
    }

    #[test]
    fn test_from_csv_fields_trims_and_drops_blanks() {
        let filter =
            RotationFilter::from_csv_fields(Some(" 1000 ,,2000 "), Some(" "), None, Some("J1"));
        assert_eq!(filter.company_codes, vec!["1000", "2000"]);
        assert!(filter.personnel_areas.is_empty());
        assert!(filter.cost_centers.is_empty());
        assert_eq!(filter.job_codes, vec!["J1"]);
    }
}
