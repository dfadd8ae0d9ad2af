//! Canonical contract date representation.
//!
//! The HR source encodes contract dates in several wire formats. Every one of
//! them is folded into a [`DateValue`] by the date normalizer, so the rotation
//! rules only ever deal with three cases.

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

/// A normalized contract date.
///
/// # Example
///
/// ```
/// use rotation_engine::models::DateValue;
/// use chrono::NaiveDate;
///
/// let date = NaiveDate::from_ymd_opt(2025, 9, 13).unwrap();
/// assert_eq!(DateValue::from(date).as_date(), Some(date));
///
/// let sentinel = NaiveDate::from_ymd_opt(9999, 12, 31).unwrap();
/// assert_eq!(DateValue::from(sentinel), DateValue::OpenEnded);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "date", rename_all = "snake_case")]
pub enum DateValue {
    /// A concrete calendar date.
    Date(NaiveDate),
    /// No termination date is scheduled.
    OpenEnded,
    /// A value was supplied but could not be read as a date.
    Unusable,
}

impl DateValue {
    /// Returns the calendar date if this value is concrete.
    pub fn as_date(&self) -> Option<NaiveDate> {
        match self {
            DateValue::Date(date) => Some(*date),
            DateValue::OpenEnded | DateValue::Unusable => None,
        }
    }

    /// Returns true if this value is a concrete calendar date.
    pub fn is_concrete(&self) -> bool {
        matches!(self, DateValue::Date(_))
    }

    /// Returns true if this value is the open-ended marker.
    pub fn is_open_ended(&self) -> bool {
        matches!(self, DateValue::OpenEnded)
    }
}

impl From<NaiveDate> for DateValue {
    fn from(date: NaiveDate) -> Self {
        if is_sentinel_date(date) {
            DateValue::OpenEnded
        } else {
            DateValue::Date(date)
        }
    }
}

/// Returns true for 9999-12-31, the source system's "no end date" value.
pub fn is_sentinel_date(date: NaiveDate) -> bool {
    date.year() == 9999 && date.month() == 12 && date.day() == 31
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_concrete_date_passes_through() {
        let date = NaiveDate::from_ymd_opt(2024, 2, 29).unwrap();
        let value = DateValue::from(date);
        assert_eq!(value, DateValue::Date(date));
        assert!(value.is_concrete());
        assert!(!value.is_open_ended());
    }

    #[test]
    fn test_sentinel_date_is_open_ended() {
        let value = DateValue::from(NaiveDate::from_ymd_opt(9999, 12, 31).unwrap());
        assert_eq!(value, DateValue::OpenEnded);
        assert_eq!(value.as_date(), None);
    }

    #[test]
    fn test_other_year_9999_dates_stay_concrete() {
        let date = NaiveDate::from_ymd_opt(9999, 12, 30).unwrap();
        assert_eq!(DateValue::from(date), DateValue::Date(date));
    }

    #[test]
    fn test_unusable_has_no_date() {
        assert_eq!(DateValue::Unusable.as_date(), None);
        assert!(!DateValue::Unusable.is_concrete());
        assert!(!DateValue::Unusable.is_open_ended());
    }

    #[test]
    fn test_serialization_shape() {
        let date = DateValue::Date(NaiveDate::from_ymd_opt(2025, 9, 30).unwrap());
        assert_eq!(
            serde_json::to_string(&date).unwrap(),
            r#"{"kind":"date","date":"2025-09-30"}"#
        );
        assert_eq!(
            serde_json::to_string(&DateValue::OpenEnded).unwrap(),
            r#"{"kind":"open_ended"}"#
        );
    }
}
