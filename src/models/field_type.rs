use serde::{Deserialize, Serialize};

/// Data type tag for a result column
///
/// Mirrors the Strata type system. Temporal tags (`Date`, `Time`,
/// `DateTime`) mark columns whose cells arrive in the service's civil
/// (timezone-less) representation and are coerced on read; `Record` marks
/// nested/repeated columns.
///
/// # Example JSON
///
/// ```json
/// "INTEGER"
/// "RECORD"
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FieldType {
    /// UTF-8 string
    String,
    /// Binary data, base64 on the wire
    Bytes,
    /// 64-bit signed integer
    Integer,
    /// 64-bit floating point
    Float,
    /// Arbitrary-precision decimal, kept as text
    Numeric,
    /// Boolean
    Boolean,
    /// Absolute instant, RFC 3339 on the wire
    Timestamp,
    /// Civil calendar date (no timezone)
    Date,
    /// Civil wall-clock time (no timezone).
    ///
    /// Coerced cells use the stable wire format `HH:MM:SS.ssssss`.
    Time,
    /// Civil date and time (no timezone)
    DateTime,
    /// Nested/repeated group of sub-records
    Record,
    /// JSON document
    Json,
}
