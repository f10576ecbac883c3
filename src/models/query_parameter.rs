use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

/// A bind parameter sent with a query or exec request
///
/// Positional parameters omit the name; named parameters bind to
/// `@name` placeholders in the statement text.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueryParameter {
    /// Parameter name; `None` for positional binding
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// Parameter value as JSON
    pub value: JsonValue,
}
