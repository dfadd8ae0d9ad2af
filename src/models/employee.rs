//! Employee snapshot record and related types.
//!
//! This module defines the [`EmployeeSnapshotRecord`] struct, one worker's
//! state as the HR source reports it on a reference date.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::DateValue;

/// An organizational dimension value: a code plus its description.
#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct OrgDimension {
    /// The dimension code (e.g., "P001").
    pub code: String,
    /// The human-readable description.
    #[serde(default)]
    pub description: String,
}

impl OrgDimension {
    /// Creates a dimension value from a code and description.
    pub fn new(code: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            description: description.into(),
        }
    }
}

/// One worker's state as of a snapshot reference date.
///
/// Contract start is never [`DateValue::OpenEnded`]; the date normalizer
/// maps a missing or sentinel start to [`DateValue::Unusable`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmployeeSnapshotRecord {
    /// Unique identifier for the employee.
    pub id: String,
    /// The employee's display name.
    pub name: String,
    /// The job code.
    pub job_code: String,
    /// The job description.
    #[serde(default)]
    pub job_description: String,
    /// The organizational unit the employee belongs to.
    #[serde(default)]
    pub organizational_unit: OrgDimension,
    /// The personnel area.
    #[serde(default)]
    pub personnel_area: OrgDimension,
    /// The cost center.
    #[serde(default)]
    pub cost_center: OrgDimension,
    /// The company code.
    pub company_code: String,
    /// Contracted hours.
    #[serde(default)]
    pub contracted_hours: Decimal,
    /// Contract start date.
    pub contract_start: DateValue,
    /// Contract end date.
    pub contract_end: DateValue,
}

impl EmployeeSnapshotRecord {
    /// Returns the contract start if it is a concrete date.
    ///
    /// # Examples
    ///
    /// ```
    /// use rotation_engine::models::{DateValue, EmployeeSnapshotRecord, OrgDimension};
    /// use chrono::NaiveDate;
    /// use rust_decimal::Decimal;
    ///
    /// let start = NaiveDate::from_ymd_opt(2023, 6, 1).unwrap();
    /// let record = EmployeeSnapshotRecord {
    ///     id: "1001".to_string(),
    ///     name: "Ana Pérez".to_string(),
    ///     job_code: "J01".to_string(),
    ///     job_description: "Enfermera".to_string(),
    ///     organizational_unit: OrgDimension::default(),
    ///     personnel_area: OrgDimension::new("P001", "Bucaramanga"),
    ///     cost_center: OrgDimension::new("C100", "Urgencias"),
    ///     company_code: "1000".to_string(),
    ///     contracted_hours: Decimal::new(48, 0),
    ///     contract_start: DateValue::Date(start),
    ///     contract_end: DateValue::OpenEnded,
    /// };
    /// assert_eq!(record.contract_start_date(), Some(start));
    /// assert_eq!(record.contract_end_date(), None);
    /// ```
    pub fn contract_start_date(&self) -> Option<NaiveDate> {
        self.contract_start.as_date()
    }

    /// Returns the contract end if it is a concrete date.
    ///
    /// Open-ended and unusable end dates both mean "still employed".
    pub fn contract_end_date(&self) -> Option<NaiveDate> {
        self.contract_end.as_date()
    }
}
