//! Calculation logic for the Rotation Indicator Engine.
//!
//! This module contains the pure functions of the engine: contract date
//! normalization, monthly cohort classification with its averages and
//! rotation percentage, and filter option extraction.

mod date_normalizer;
mod filter_options;
mod rotation_metrics;

pub use date_normalizer::{
    SENTINEL_EPOCH_MILLIS, SENTINEL_YYYYMMDD, normalize_contract_end, normalize_contract_start,
    normalize_date,
};
pub use filter_options::extract_filter_options;
pub use rotation_metrics::{
    average_workforce, compute_monthly, is_active_at_month_end, is_active_at_period_start,
    is_retired, is_same_day_exit, rotation_percentage,
};
