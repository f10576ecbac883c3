//! Civil temporal coercion.
//!
//! The service returns DATE/TIME/DATETIME cells in civil (timezone-less)
//! form. Before a row reaches the caller, those cells are coerced into the
//! cursor's value types: absolute UTC timestamps for dates and datetimes,
//! and a formatted wall-clock string for times.
//!
//! Coercion never fails: a cell whose shape does not match its type tag is
//! handed back unmodified and continues through the conversion pipeline.

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, Utc};

use crate::models::FieldType;
use crate::value::Value;

/// Wire format for coerced TIME cells: `HH:MM:SS.ssssss`.
///
/// This is the stable contract for TIME columns — wall-clock time is
/// reported as text with microsecond precision, never anchored to a date.
pub const TIME_LAYOUT: &str = "%H:%M:%S%.6f";

/// Coerce a civil temporal cell under its column type tag.
///
/// Returns `Some(coerced)` when the cell matched the expected civil shape,
/// `None` when it did not (including `Null` and already-coerced values, so
/// re-coercion is a no-op).
pub fn coerce(field_type: FieldType, value: &Value) -> Option<Value> {
    match (field_type, value) {
        (FieldType::Date, Value::Date(date)) => Some(Value::Timestamp(date_to_timestamp(*date))),
        (FieldType::DateTime, Value::DateTime(datetime)) => {
            Some(Value::Timestamp(datetime_to_timestamp(*datetime)))
        }
        (FieldType::Time, Value::Time(time)) => Some(Value::String(format_time(*time))),
        _ => None,
    }
}

/// Midnight UTC on the given calendar date.
pub fn date_to_timestamp(date: NaiveDate) -> DateTime<Utc> {
    date.and_time(NaiveTime::MIN).and_utc()
}

/// The civil datetime anchored to UTC, all fields preserved.
pub fn datetime_to_timestamp(datetime: NaiveDateTime) -> DateTime<Utc> {
    datetime.and_utc()
}

/// Wall-clock time in the `HH:MM:SS.ssssss` wire format.
pub fn format_time(time: NaiveTime) -> String {
    time.format(TIME_LAYOUT).to_string()
}

#[cfg(test)]
mod tests {
    use chrono::Timelike;

    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_date_coerces_to_midnight_utc() {
        let coerced = coerce(FieldType::Date, &Value::Date(date(2024, 3, 9)));
        let Some(Value::Timestamp(ts)) = coerced else {
            panic!("expected timestamp, got {coerced:?}");
        };
        assert_eq!(ts.to_rfc3339(), "2024-03-09T00:00:00+00:00");
    }

    #[test]
    fn test_datetime_preserves_all_fields() {
        let civil = date(2024, 3, 9).and_hms_nano_opt(13, 45, 30, 123_456_789).unwrap();
        let Some(Value::Timestamp(ts)) = coerce(FieldType::DateTime, &Value::DateTime(civil))
        else {
            panic!("datetime shape must coerce");
        };
        assert_eq!(ts.date_naive(), date(2024, 3, 9));
        assert_eq!(ts.hour(), 13);
        assert_eq!(ts.minute(), 45);
        assert_eq!(ts.second(), 30);
        assert_eq!(ts.nanosecond(), 123_456_789);
    }

    #[test]
    fn test_time_formats_with_six_fraction_digits() {
        let cases = [
            (NaiveTime::from_hms_opt(0, 0, 0).unwrap(), "00:00:00.000000"),
            (NaiveTime::from_hms_opt(23, 59, 59).unwrap(), "23:59:59.000000"),
            (
                NaiveTime::from_hms_micro_opt(13, 45, 30, 500_000).unwrap(),
                "13:45:30.500000",
            ),
            (
                NaiveTime::from_hms_micro_opt(1, 2, 3, 4).unwrap(),
                "01:02:03.000004",
            ),
            (
                // Sub-microsecond precision truncates to micros
                NaiveTime::from_hms_nano_opt(1, 2, 3, 123_456_789).unwrap(),
                "01:02:03.123456",
            ),
        ];
        for (time, expected) in cases {
            let Some(Value::String(formatted)) = coerce(FieldType::Time, &Value::Time(time)) else {
                panic!("time shape must coerce");
            };
            assert_eq!(formatted, expected);
        }
    }

    #[test]
    fn test_coercion_is_idempotent() {
        let civil = Value::Date(date(2024, 3, 9));
        let first = coerce(FieldType::Date, &civil).expect("first pass must match");
        assert_eq!(
            coerce(FieldType::Date, &first),
            None,
            "re-coercing an already-coerced value must be a no-op"
        );
    }

    #[test]
    fn test_unmatched_shapes_do_not_coerce() {
        assert_eq!(coerce(FieldType::Date, &Value::Null), None);
        assert_eq!(coerce(FieldType::Date, &Value::Int(7)), None);
        assert_eq!(
            coerce(FieldType::Time, &Value::String("13:45:30".to_string())),
            None
        );
        assert_eq!(
            coerce(FieldType::Integer, &Value::Date(date(2024, 1, 1))),
            None,
            "non-temporal type tags never coerce"
        );
    }
}
