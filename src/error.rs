//! Error types for the Rotation Indicator Engine.
//!
//! This module provides strongly-typed errors using the `thiserror` crate
//! for all error conditions that can occur while fetching snapshots and
//! computing rotation indicators.

use chrono::NaiveDate;
use thiserror::Error;

/// The main error type for the Rotation Indicator Engine.
///
/// Parameter errors are raised before any snapshot is fetched. Fetch errors
/// are fatal for a single-month request but only degrade the affected month
/// inside an annual computation.
///
/// # Example
///
/// ```
/// use rotation_engine::error::EngineError;
///
/// let error = EngineError::InvalidPeriod { year: 2025, month: 13 };
/// assert_eq!(error.to_string(), "Invalid period: year 2025, month 13");
/// ```
#[derive(Debug, Error)]
pub enum EngineError {
    /// Configuration file was not found at the specified path.
    #[error("Configuration file not found: {path}")]
    ConfigNotFound {
        /// The path that was not found.
        path: String,
    },

    /// Configuration file could not be parsed.
    #[error("Failed to parse configuration file '{path}': {message}")]
    ConfigParseError {
        /// The path to the file that failed to parse.
        path: String,
        /// A description of the parse error.
        message: String,
    },

    /// Configuration parsed but holds inconsistent values.
    #[error("Invalid configuration: {message}")]
    InvalidConfig {
        /// What is wrong with the configuration.
        message: String,
    },

    /// The year/month pair does not name a real calendar month.
    #[error("Invalid period: year {year}, month {month}")]
    InvalidPeriod {
        /// The requested year.
        year: i32,
        /// The requested month.
        month: u32,
    },

    /// The year is outside the range allowed by the configured policy.
    #[error("Year {year} is outside the supported range {min}-{max}")]
    YearOutOfRange {
        /// The requested year.
        year: i32,
        /// Lowest supported year.
        min: i32,
        /// Highest supported year.
        max: i32,
    },

    /// The snapshot source could not be reached or returned an error.
    #[error("Snapshot fetch failed for {reference_date}: {message}")]
    FetchFailed {
        /// The reference date of the snapshot that was requested.
        reference_date: NaiveDate,
        /// A description of the failure.
        message: String,
    },

    /// The snapshot source did not answer within the configured timeout.
    #[error("Snapshot fetch for {reference_date} timed out after {timeout_ms} ms")]
    FetchTimeout {
        /// The reference date of the snapshot that was requested.
        reference_date: NaiveDate,
        /// The timeout that elapsed.
        timeout_ms: u64,
    },

    /// The snapshot source rejected the supplied credentials.
    #[error("Unauthorized: {message}")]
    Unauthorized {
        /// A description of the rejection.
        message: String,
    },

    /// The snapshot source answered with a payload that could not be decoded.
    #[error("Malformed snapshot payload: {message}")]
    MalformedPayload {
        /// A description of the decoding error.
        message: String,
    },
}

impl EngineError {
    /// Returns true for errors raised while obtaining a snapshot.
    ///
    /// These are the errors that degrade a single month of an annual
    /// computation instead of failing the whole request.
    pub fn is_fetch_failure(&self) -> bool {
        matches!(
            self,
            EngineError::FetchFailed { .. }
                | EngineError::FetchTimeout { .. }
                | EngineError::Unauthorized { .. }
                | EngineError::MalformedPayload { .. }
        )
    }
}

/// A type alias for Results that return EngineError.
pub type EngineResult<T> = Result<T, EngineError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_not_found_displays_path() {
        let error = EngineError::ConfigNotFound {
            path: "/missing/engine.yaml".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "Configuration file not found: /missing/engine.yaml"
        );
    }

    #[test]
    fn test_config_parse_error_displays_path_and_message() {
        let error = EngineError::ConfigParseError {
            path: "/config/bad.yaml".to_string(),
            message: "invalid YAML syntax".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "Failed to parse configuration file '/config/bad.yaml': invalid YAML syntax"
        );
    }

    #[test]
    fn test_invalid_period_displays_year_and_month() {
        let error = EngineError::InvalidPeriod {
            year: 2025,
            month: 0,
        };
        assert_eq!(error.to_string(), "Invalid period: year 2025, month 0");
    }

    #[test]
    fn test_year_out_of_range_displays_bounds() {
        let error = EngineError::YearOutOfRange {
            year: 2019,
            min: 2020,
            max: 2030,
        };
        assert_eq!(
            error.to_string(),
            "Year 2019 is outside the supported range 2020-2030"
        );
    }

    #[test]
    fn test_fetch_failed_displays_reference_date() {
        let error = EngineError::FetchFailed {
            reference_date: NaiveDate::from_ymd_opt(2025, 5, 31).unwrap(),
            message: "connection refused".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "Snapshot fetch failed for 2025-05-31: connection refused"
        );
    }

    #[test]
    fn test_fetch_timeout_displays_timeout() {
        let error = EngineError::FetchTimeout {
            reference_date: NaiveDate::from_ymd_opt(2025, 6, 1).unwrap(),
            timeout_ms: 30000,
        };
        assert_eq!(
            error.to_string(),
            "Snapshot fetch for 2025-06-01 timed out after 30000 ms"
        );
    }

    #[test]
    fn test_fetch_failures_are_classified() {
        let date = NaiveDate::from_ymd_opt(2025, 6, 1).unwrap();
        assert!(
            EngineError::FetchFailed {
                reference_date: date,
                message: "x".to_string()
            }
            .is_fetch_failure()
        );
        assert!(
            EngineError::Unauthorized {
                message: "x".to_string()
            }
            .is_fetch_failure()
        );
        assert!(
            EngineError::MalformedPayload {
                message: "x".to_string()
            }
            .is_fetch_failure()
        );
        assert!(
            !EngineError::InvalidPeriod {
                year: 2025,
                month: 13
            }
            .is_fetch_failure()
        );
    }

    #[test]
    fn test_errors_implement_std_error() {
        fn assert_error<T: std::error::Error + Send + Sync + 'static>() {}
        assert_error::<EngineError>();
    }

    #[test]
    fn test_error_propagation_with_question_mark() {
        fn returns_invalid_period() -> EngineResult<()> {
            Err(EngineError::InvalidPeriod {
                year: 2025,
                month: 13,
            })
        }

        fn propagates_error() -> EngineResult<()> {
            returns_invalid_period()?;
            Ok(())
        }

        assert!(propagates_error().is_err());
    }
}
