//! Cell value model for query results.
//!
//! Raw cells arrive from the wire as JSON and are decoded into [`Value`]
//! under the result schema, so that the conversion pipeline works on a
//! tagged representation instead of inspecting JSON shapes per cell.
//! Civil temporal variants (`Date`, `Time`, `DateTime`) are the
//! pre-coercion form; `Timestamp` and formatted strings are what the
//! cursor hands to callers after coercion.

use std::sync::Arc;

use base64::{engine::general_purpose, Engine as _};
use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, SecondsFormat, Utc};
use serde::{Serialize, Serializer};
use serde_json::Value as JsonValue;

use crate::models::{FieldDescriptor, FieldType};
use crate::temporal::TIME_LAYOUT;

const DATE_LAYOUT: &str = "%Y-%m-%d";
const DATETIME_LAYOUT: &str = "%Y-%m-%dT%H:%M:%S%.f";
const DATETIME_LAYOUT_SPACED: &str = "%Y-%m-%d %H:%M:%S%.f";

/// A single cell value, raw or converted.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// Absent cell
    Null,
    /// Boolean
    Bool(bool),
    /// 64-bit signed integer
    Int(i64),
    /// 64-bit floating point
    Float(f64),
    /// UTF-8 string
    String(String),
    /// Binary data
    Bytes(Vec<u8>),
    /// Civil calendar date, pre-coercion
    Date(NaiveDate),
    /// Civil wall-clock time, pre-coercion
    Time(NaiveTime),
    /// Civil date and time, pre-coercion
    DateTime(NaiveDateTime),
    /// Absolute instant (coerced temporal or native timestamp)
    Timestamp(DateTime<Utc>),
    /// Repeated group or record row
    Array(Vec<Value>),
    /// Captured nested column, ready for rerouting
    Nested(NestedToken),
    /// JSON document cell
    Json(Box<JsonValue>),
}

impl Value {
    /// Decode a raw wire cell under its column descriptor.
    ///
    /// Temporal cells that do not parse stay as `String` and fall through
    /// coercion unmodified; decoding never fails.
    pub fn decode(field: &FieldDescriptor, raw: JsonValue) -> Value {
        if raw.is_null() {
            return Value::Null;
        }
        match field.field_type {
            FieldType::String => match raw {
                JsonValue::String(s) => Value::String(s),
                other => Value::from_json(other),
            },
            FieldType::Bytes => match raw {
                JsonValue::String(s) => match general_purpose::STANDARD.decode(&s) {
                    Ok(bytes) => Value::Bytes(bytes),
                    Err(_) => Value::String(s),
                },
                other => Value::from_json(other),
            },
            FieldType::Integer => match raw {
                JsonValue::Number(n) => match n.as_i64() {
                    Some(i) => Value::Int(i),
                    None => n.as_f64().map(Value::Float).unwrap_or(Value::Null),
                },
                // Large integers are transported as strings
                JsonValue::String(s) => match s.parse::<i64>() {
                    Ok(i) => Value::Int(i),
                    Err(_) => Value::String(s),
                },
                other => Value::from_json(other),
            },
            FieldType::Float => match raw {
                JsonValue::Number(n) => n.as_f64().map(Value::Float).unwrap_or(Value::Null),
                JsonValue::String(s) => match s.parse::<f64>() {
                    Ok(f) => Value::Float(f),
                    Err(_) => Value::String(s),
                },
                other => Value::from_json(other),
            },
            FieldType::Numeric => match raw {
                // Arbitrary precision: keep the textual form
                JsonValue::String(s) => Value::String(s),
                JsonValue::Number(n) => n.as_f64().map(Value::Float).unwrap_or(Value::Null),
                other => Value::from_json(other),
            },
            FieldType::Boolean => match raw {
                JsonValue::Bool(b) => Value::Bool(b),
                other => Value::from_json(other),
            },
            FieldType::Timestamp => match raw {
                JsonValue::String(s) => match DateTime::parse_from_rfc3339(&s) {
                    Ok(ts) => Value::Timestamp(ts.with_timezone(&Utc)),
                    Err(_) => Value::String(s),
                },
                other => Value::from_json(other),
            },
            FieldType::Date => match raw {
                JsonValue::String(s) => match NaiveDate::parse_from_str(&s, DATE_LAYOUT) {
                    Ok(d) => Value::Date(d),
                    Err(_) => Value::String(s),
                },
                other => Value::from_json(other),
            },
            FieldType::Time => match raw {
                JsonValue::String(s) => match NaiveTime::parse_from_str(&s, "%H:%M:%S%.f") {
                    Ok(t) => Value::Time(t),
                    Err(_) => Value::String(s),
                },
                other => Value::from_json(other),
            },
            FieldType::DateTime => match raw {
                JsonValue::String(s) => NaiveDateTime::parse_from_str(&s, DATETIME_LAYOUT)
                    .or_else(|_| NaiveDateTime::parse_from_str(&s, DATETIME_LAYOUT_SPACED))
                    .map(Value::DateTime)
                    .unwrap_or(Value::String(s)),
                other => Value::from_json(other),
            },
            FieldType::Record => Value::decode_record(&field.fields, raw),
            FieldType::Json => Value::Json(Box::new(raw)),
        }
    }

    /// Decode a `RECORD` cell.
    ///
    /// A record cell is either a sequence of record rows (each itself an
    /// array, aligned with the sub-schema) or the cells of a single record
    /// aligned positionally. The converter normalizes the single-record
    /// shape later; decoding only types the cells.
    fn decode_record(fields: &[FieldDescriptor], raw: JsonValue) -> Value {
        let JsonValue::Array(items) = raw else {
            return Value::from_json(raw);
        };
        let is_rows = items.first().map(JsonValue::is_array).unwrap_or(false);
        if is_rows {
            let rows = items
                .into_iter()
                .map(|item| match item {
                    JsonValue::Array(cells) => Value::Array(Self::decode_record_row(fields, cells)),
                    other => Value::from_json(other),
                })
                .collect();
            Value::Array(rows)
        } else {
            Value::Array(Self::decode_record_row(fields, items))
        }
    }

    fn decode_record_row(fields: &[FieldDescriptor], cells: Vec<JsonValue>) -> Vec<Value> {
        cells
            .into_iter()
            .enumerate()
            .map(|(index, cell)| match fields.get(index) {
                Some(field) => Value::decode(field, cell),
                None => Value::from_json(cell),
            })
            .collect()
    }

    /// Decode untyped JSON, used when a cell does not match its descriptor.
    pub fn from_json(raw: JsonValue) -> Value {
        match raw {
            JsonValue::Null => Value::Null,
            JsonValue::Bool(b) => Value::Bool(b),
            JsonValue::Number(n) => match n.as_i64() {
                Some(i) => Value::Int(i),
                None => n.as_f64().map(Value::Float).unwrap_or(Value::Null),
            },
            JsonValue::String(s) => Value::String(s),
            JsonValue::Array(items) => {
                Value::Array(items.into_iter().map(Value::from_json).collect())
            }
            object => Value::Json(Box::new(object)),
        }
    }

    /// True for `Array` values
    pub fn is_array(&self) -> bool {
        matches!(self, Value::Array(_))
    }
}

impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Value::Null => serializer.serialize_unit(),
            Value::Bool(b) => serializer.serialize_bool(*b),
            Value::Int(i) => serializer.serialize_i64(*i),
            Value::Float(f) => serializer.serialize_f64(*f),
            Value::String(s) => serializer.serialize_str(s),
            Value::Bytes(bytes) => {
                serializer.serialize_str(&general_purpose::STANDARD.encode(bytes))
            }
            Value::Date(d) => serializer.collect_str(&d.format(DATE_LAYOUT)),
            Value::Time(t) => serializer.collect_str(&t.format(TIME_LAYOUT)),
            Value::DateTime(dt) => serializer.collect_str(&dt.format(DATETIME_LAYOUT)),
            Value::Timestamp(ts) => {
                serializer.serialize_str(&ts.to_rfc3339_opts(SecondsFormat::Micros, true))
            }
            Value::Array(values) => values.serialize(serializer),
            Value::Nested(token) => token.serialize(serializer),
            Value::Json(json) => json.serialize(serializer),
        }
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Int(i)
    }
}

impl From<f64> for Value {
    fn from(f: f64) -> Self {
        Value::Float(f)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

/// Captured nested column, produced when a `RECORD` column's cell is
/// converted.
///
/// Holds the raw nested rows and the sub-schema that describes them. A
/// token has no identity of its own; its only use is as the bind argument
/// of a reroute statement, which re-materializes it as a fresh cursor.
/// Serializes as the bare nested rows (tracing/debug only — the sub-schema
/// travels inside the token, not on the wire).
#[derive(Debug, Clone, PartialEq)]
pub struct NestedToken {
    values: Vec<Value>,
    schema: Arc<[FieldDescriptor]>,
}

impl NestedToken {
    pub(crate) fn new(values: Vec<Value>, schema: Arc<[FieldDescriptor]>) -> Self {
        Self { values, schema }
    }

    /// Nested rows, one `Value::Array` per record
    pub fn values(&self) -> &[Value] {
        &self.values
    }

    /// Sub-schema of the column that produced this token; never empty
    pub fn schema(&self) -> &[FieldDescriptor] {
        &self.schema
    }

    pub(crate) fn into_parts(self) -> (Vec<Value>, Arc<[FieldDescriptor]>) {
        (self.values, self.schema)
    }
}

impl Serialize for NestedToken {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.values.serialize(serializer)
    }
}
