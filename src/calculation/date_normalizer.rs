//! Contract date normalization.
//!
//! The HR source reports what is logically one date field in several wire
//! shapes depending on the endpoint: OData `/Date(millis)/` strings, SAP
//! `YYYYMMDD` digits (as strings or numbers), ISO-8601 strings, structured
//! `{year, month, day}` objects and objects wrapping any of these under a
//! `value` key. Two of them carry a "no end date" sentinel. This module folds
//! all of them into a [`DateValue`].

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde_json::{Map, Number, Value};

use crate::models::DateValue;

/// Epoch milliseconds of 9999-12-31, the OData "no end date" sentinel.
pub const SENTINEL_EPOCH_MILLIS: i64 = 253_402_214_400_000;

/// The SAP `YYYYMMDD` "no end date" sentinel.
pub const SENTINEL_YYYYMMDD: i64 = 99_991_231;

/// Keys under which a wrapper object may carry the actual date.
const VALUE_KEYS: [&str; 4] = ["value", "Value", "date", "Date"];

/// Normalizes a raw wire value into a [`DateValue`].
///
/// This function is total: it never panics and never fails. Null and blank
/// strings mean "no value supplied" and map to [`DateValue::OpenEnded`];
/// values that look like a date but cannot be read map to
/// [`DateValue::Unusable`].
///
/// # Examples
///
/// ```
/// use rotation_engine::calculation::normalize_date;
/// use rotation_engine::models::DateValue;
/// use chrono::NaiveDate;
/// use serde_json::json;
///
/// assert_eq!(normalize_date(&json!(99991231)), DateValue::OpenEnded);
/// assert_eq!(normalize_date(&json!("/Date(253402214400000)/")), DateValue::OpenEnded);
/// assert_eq!(
///     normalize_date(&json!("20250913")),
///     DateValue::Date(NaiveDate::from_ymd_opt(2025, 9, 13).unwrap())
/// );
/// assert_eq!(normalize_date(&json!("not a date")), DateValue::Unusable);
/// ```
pub fn normalize_date(raw: &Value) -> DateValue {
    normalize_value(raw, false)
}

/// Normalizes a contract start date.
///
/// A start date is never open-ended: a missing or sentinel start cannot place
/// a worker in any cohort, so it becomes [`DateValue::Unusable`].
pub fn normalize_contract_start(raw: &Value) -> DateValue {
    match normalize_date(raw) {
        DateValue::OpenEnded => DateValue::Unusable,
        value => value,
    }
}

/// Normalizes a contract end date.
///
/// Unusable end dates are kept as such; the rotation rules treat them like
/// open-ended ones.
pub fn normalize_contract_end(raw: &Value) -> DateValue {
    normalize_date(raw)
}

fn normalize_value(raw: &Value, nested: bool) -> DateValue {
    match raw {
        Value::Null => DateValue::OpenEnded,
        Value::String(s) => normalize_str(s),
        Value::Number(n) => match integral(n) {
            Some(n) => normalize_integer(n),
            None => DateValue::Unusable,
        },
        Value::Object(map) => {
            if let Some(value) = structured_date(map) {
                return value;
            }
            if nested {
                return DateValue::Unusable;
            }
            VALUE_KEYS
                .iter()
                .find_map(|key| map.get(*key))
                .map(|inner| normalize_value(inner, true))
                .unwrap_or(DateValue::Unusable)
        }
        Value::Bool(_) | Value::Array(_) => DateValue::Unusable,
    }
}

fn normalize_str(raw: &str) -> DateValue {
    let s = raw.trim();
    if s.is_empty() {
        return DateValue::OpenEnded;
    }

    if let Some(inner) = s.strip_prefix("/Date(").and_then(|r| r.strip_suffix(")/")) {
        return parse_epoch(inner);
    }

    if s.len() == 8 && s.bytes().all(|b| b.is_ascii_digit()) {
        return match s.parse::<i64>() {
            Ok(n) => normalize_integer(n),
            Err(_) => DateValue::Unusable,
        };
    }

    if s.contains('-') || s.contains('T') {
        return parse_iso(s);
    }

    DateValue::Unusable
}

/// Parses the inside of `/Date(...)/`, ignoring any `+hhmm`/`-hhmm` offset.
fn parse_epoch(inner: &str) -> DateValue {
    let offset_at = inner
        .char_indices()
        .skip(1)
        .find(|(_, c)| *c == '+' || *c == '-')
        .map(|(i, _)| i)
        .unwrap_or(inner.len());

    let millis = match inner[..offset_at].parse::<i64>() {
        Ok(millis) => millis,
        Err(_) => return DateValue::Unusable,
    };

    if millis == SENTINEL_EPOCH_MILLIS {
        return DateValue::OpenEnded;
    }

    DateTime::<Utc>::from_timestamp_millis(millis)
        .map(|dt| DateValue::from(dt.date_naive()))
        .unwrap_or(DateValue::Unusable)
}

fn normalize_integer(n: i64) -> DateValue {
    if n == SENTINEL_YYYYMMDD {
        return DateValue::OpenEnded;
    }
    if !(10_000_000..=99_999_999).contains(&n) {
        return DateValue::Unusable;
    }

    let year = (n / 10_000) as i32;
    let month = ((n / 100) % 100) as u32;
    let day = (n % 100) as u32;

    NaiveDate::from_ymd_opt(year, month, day)
        .map(DateValue::from)
        .unwrap_or(DateValue::Unusable)
}

fn parse_iso(s: &str) -> DateValue {
    if let Ok(date) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        return DateValue::from(date);
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return DateValue::from(dt.with_timezone(&Utc).date_naive());
    }
    for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, format) {
            return DateValue::from(dt.date());
        }
    }
    DateValue::Unusable
}

/// Reads `{year, month, day}` objects. Returns `None` if there is no `year`.
fn structured_date(map: &Map<String, Value>) -> Option<DateValue> {
    let year = map.get("year")?;

    let part = |value: Option<&Value>| value.and_then(Value::as_i64);
    let date = part(Some(year))
        .and_then(|y| i32::try_from(y).ok())
        .zip(part(map.get("month")).and_then(|m| u32::try_from(m).ok()))
        .zip(part(map.get("day")).and_then(|d| u32::try_from(d).ok()))
        .and_then(|((y, m), d)| NaiveDate::from_ymd_opt(y, m, d));

    Some(date.map(DateValue::from).unwrap_or(DateValue::Unusable))
}

fn integral(n: &Number) -> Option<i64> {
    n.as_i64().or_else(|| {
        n.as_f64()
            .filter(|f| f.fract() == 0.0 && f.abs() < 1e15)
            .map(|f| f as i64)
    })
}
