//! HTTP API module for the Rotation Indicator Engine.
//!
//! This module exposes the rotation service as JSON endpoints:
//!
//! - `GET /rotation/monthly?year=&month=` - indicators for one month
//! - `GET /rotation/annual?year=` - indicators for a full year
//! - `GET /rotation/personnel?date=` - the workforce snapshot for a date
//! - `GET /rotation/filter-options?date=` - filter values present on a date
//!
//! The rotation endpoints also accept comma-separated `company_code`,
//! `personnel_area`, `cost_center` and `job_code` filters.

mod handlers;
mod request;
mod response;
mod state;

pub use handlers::create_router;
pub use request::{AnnualQuery, FilterOptionsQuery, MonthlyQuery, PersonnelQuery};
pub use response::{ApiError, ApiErrorResponse, PersonnelListing};
pub use state::AppState;
