//! Query-string types for the rotation API.
//!
//! Every rotation endpoint accepts the same optional, comma-separated filter
//! parameters: `company_code`, `personnel_area`, `cost_center` and
//! `job_code`.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::models::RotationFilter;

/// Query for `GET /rotation/monthly`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonthlyQuery {
    /// The calendar year.
    pub year: i32,
    /// The month number (1-12).
    pub month: u32,
    /// Comma-separated company codes.
    #[serde(default)]
    pub company_code: Option<String>,
    /// Comma-separated personnel area codes.
    #[serde(default)]
    pub personnel_area: Option<String>,
    /// Comma-separated cost center codes.
    #[serde(default)]
    pub cost_center: Option<String>,
    /// Comma-separated job codes.
    #[serde(default)]
    pub job_code: Option<String>,
}

impl MonthlyQuery {
    /// Builds the filter from the query parameters.
    pub fn filter(&self) -> RotationFilter {
        RotationFilter::from_csv_fields(
            self.company_code.as_deref(),
            self.personnel_area.as_deref(),
            self.cost_center.as_deref(),
            self.job_code.as_deref(),
        )
    }
}

/// Query for `GET /rotation/annual`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnnualQuery {
    /// The calendar year.
    pub year: i32,
    /// Comma-separated company codes.
    #[serde(default)]
    pub company_code: Option<String>,
    /// Comma-separated personnel area codes.
    #[serde(default)]
    pub personnel_area: Option<String>,
    /// Comma-separated cost center codes.
    #[serde(default)]
    pub cost_center: Option<String>,
    /// Comma-separated job codes.
    #[serde(default)]
    pub job_code: Option<String>,
}

impl AnnualQuery {
    /// Builds the filter from the query parameters.
    pub fn filter(&self) -> RotationFilter {
        RotationFilter::from_csv_fields(
            self.company_code.as_deref(),
            self.personnel_area.as_deref(),
            self.cost_center.as_deref(),
            self.job_code.as_deref(),
        )
    }
}

/// Query for `GET /rotation/personnel`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PersonnelQuery {
    /// The snapshot reference date (`YYYY-MM-DD`).
    pub date: NaiveDate,
    /// Comma-separated company codes.
    #[serde(default)]
    pub company_code: Option<String>,
    /// Comma-separated personnel area codes.
    #[serde(default)]
    pub personnel_area: Option<String>,
    /// Comma-separated cost center codes.
    #[serde(default)]
    pub cost_center: Option<String>,
    /// Comma-separated job codes.
    #[serde(default)]
    pub job_code: Option<String>,
}

impl PersonnelQuery {
    /// Builds the filter from the query parameters.
    pub fn filter(&self) -> RotationFilter {
        RotationFilter::from_csv_fields(
            self.company_code.as_deref(),
            self.personnel_area.as_deref(),
            self.cost_center.as_deref(),
            self.job_code.as_deref(),
        )
    }
}

/// Query for `GET /rotation/filter-options`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FilterOptionsQuery {
    /// The snapshot reference date (`YYYY-MM-DD`).
    pub date: NaiveDate,
}
