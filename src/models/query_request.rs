use serde::{Deserialize, Serialize};

use super::query_parameter::QueryParameter;

/// Request payload for query execution.
///
/// The same payload shape is used for the first page and for page
/// continuations; continuations carry the `page_token` from the previous
/// response alongside the original statement.
///
/// # Examples
///
/// ```rust
/// use strata_link::models::QueryRequest;
///
/// let request = QueryRequest {
///     sql: "SELECT * FROM events".to_string(),
///     params: None,
///     default_dataset: Some("analytics".to_string()),
///     page_token: None,
///     max_rows: None,
/// };
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueryRequest {
    /// Statement text (may contain `?` or `@name` placeholders)
    pub sql: String,

    /// Optional bind parameters
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub params: Option<Vec<QueryParameter>>,

    /// Default dataset for unqualified table names
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_dataset: Option<String>,

    /// Continuation token from the previous page
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page_token: Option<String>,

    /// Page size hint
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_rows: Option<u32>,
}
