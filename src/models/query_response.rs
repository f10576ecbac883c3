use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

use super::error_detail::ErrorDetail;
use super::field_descriptor::FieldDescriptor;

/// One page of a query result
///
/// Rows are arrays of raw cells ordered by the schema; the schema order is
/// the positional contract for every row in every page of the result.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueryResponse {
    /// Schema describing the result columns, in positional order
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub schema: Vec<FieldDescriptor>,

    /// Result rows as arrays of raw cells (ordered by schema)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rows: Option<Vec<Vec<JsonValue>>>,

    /// Rows affected or returned by this request
    #[serde(default)]
    pub row_count: u64,

    /// Continuation token; absent on the final page
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page_token: Option<String>,

    /// Total rows in the full result, when the server knows it
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_rows: Option<u64>,

    /// Error details for failed statements
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<ErrorDetail>,

    /// Optional message for non-query statements
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl QueryResponse {
    /// Column names in schema order
    pub fn column_names(&self) -> Vec<String> {
        let mut names = Vec::with_capacity(self.schema.len());
        for field in &self.schema {
            names.push(field.name.clone());
        }
        names
    }
}
