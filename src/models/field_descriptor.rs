use serde::{Deserialize, Serialize};

use super::field_mode::FieldMode;
use super::field_type::FieldType;

/// A column descriptor in the result schema returned by Strata queries
///
/// Carries everything the client needs to decode and convert a column's
/// cells: the name, the type tag, and — for `RECORD` columns — the nested
/// sub-schema describing each sub-record, in positional order.
///
/// # Example (JSON representation)
///
/// ```json
/// {
///   "name": "tags",
///   "type": "RECORD",
///   "mode": "REPEATED",
///   "fields": [{"name": "tag", "type": "STRING"}]
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldDescriptor {
    /// Column name
    pub name: String,

    /// Data type tag
    #[serde(rename = "type")]
    pub field_type: FieldType,

    /// Nested sub-schema; empty for scalar columns
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub fields: Vec<FieldDescriptor>,

    /// Cardinality, when the server reports it
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mode: Option<FieldMode>,
}

impl FieldDescriptor {
    /// Scalar column descriptor with no sub-schema
    pub fn new(name: impl Into<String>, field_type: FieldType) -> Self {
        Self {
            name: name.into(),
            field_type,
            fields: Vec::new(),
            mode: None,
        }
    }

    /// `RECORD` column descriptor with the given sub-schema
    pub fn record(name: impl Into<String>, fields: Vec<FieldDescriptor>) -> Self {
        Self {
            name: name.into(),
            field_type: FieldType::Record,
            fields,
            mode: Some(FieldMode::Repeated),
        }
    }
}
