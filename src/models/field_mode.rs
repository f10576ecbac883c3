use serde::{Deserialize, Serialize};

/// Cardinality of a result column
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FieldMode {
    /// Cell may be null
    Nullable,
    /// Cell is always present
    Required,
    /// Cell holds zero or more values
    Repeated,
}
