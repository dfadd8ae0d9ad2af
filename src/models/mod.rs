//! Core data models for the Rotation Indicator Engine.
//!
//! This module contains all the domain models used throughout the engine.

mod date_value;
mod employee;
mod filter;
mod filter_options;
mod indicators;

pub use date_value::{DateValue, is_sentinel_date};
pub use employee::{EmployeeSnapshotRecord, OrgDimension};
pub use filter::RotationFilter;
pub use filter_options::FilterOptions;
pub use indicators::{
    AnnualRotationIndicators, AnnualTotals, MonthlyRotationIndicators, ReferenceDates, month_name,
    round_2dp,
};
