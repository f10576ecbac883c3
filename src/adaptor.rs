//! Per-column value adaptation seam.
//!
//! Callers may supply a [`SchemaAdaptor`] when preparing a statement; it is
//! consulted once per column at schema-build time, and the resolved
//! [`ColumnAdaptor`]s then run on every converted cell of their column.
//! An adaptor sees either a scalar cell (raw or unmatched-temporal) or a
//! [`NestedToken`](crate::NestedToken), and must handle both.

use std::collections::HashMap;
use std::sync::Arc;

use crate::error::AdaptorError;
use crate::value::Value;

/// Reserved statement text for nested-column rerouting.
///
/// A statement whose text equals this sentinel is never sent to the
/// service: its single bind argument must be a captured nested column,
/// and the result is a fresh cursor over the nested rows.
pub const REROUTE_QUERY: &str = "SELECT * FROM __strata_reroute__";

/// Transforms the converted value of a single column.
pub trait ColumnAdaptor: Send + Sync {
    /// Adapt one cell; the error becomes a
    /// [`Conversion`](crate::StrataLinkError::Conversion) failure for the
    /// row being read.
    fn adapt_value(&self, value: Value) -> Result<Value, AdaptorError>;
}

/// Resolves column adaptors by column name.
///
/// Absence of a match is not an error — the column simply goes unadapted.
pub trait SchemaAdaptor: Send + Sync {
    /// Adaptor for the named column, if any.
    fn column_adaptor(&self, name: &str) -> Option<Arc<dyn ColumnAdaptor>>;
}

/// Resolve the adaptor for one column. No capability means no adaptation.
pub(crate) fn resolve_column_adaptor(
    name: &str,
    schema_adaptor: Option<&Arc<dyn SchemaAdaptor>>,
) -> Option<Arc<dyn ColumnAdaptor>> {
    schema_adaptor.and_then(|adaptor| adaptor.column_adaptor(name))
}

/// Map-backed [`SchemaAdaptor`].
///
/// # Examples
///
/// ```rust
/// use std::sync::Arc;
/// use strata_link::{ColumnAdaptor, StaticSchemaAdaptor, Value};
///
/// struct Upper;
/// impl ColumnAdaptor for Upper {
///     fn adapt_value(&self, value: Value) -> Result<Value, strata_link::AdaptorError> {
///         match value {
///             Value::String(s) => Ok(Value::String(s.to_uppercase())),
///             other => Ok(other),
///         }
///     }
/// }
///
/// let adaptor = StaticSchemaAdaptor::new().with_column("name", Arc::new(Upper));
/// ```
#[derive(Default)]
pub struct StaticSchemaAdaptor {
    adaptors: HashMap<String, Arc<dyn ColumnAdaptor>>,
}

impl StaticSchemaAdaptor {
    /// Empty capability: present, but adapts nothing.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an adaptor for the named column.
    pub fn with_column(mut self, name: impl Into<String>, adaptor: Arc<dyn ColumnAdaptor>) -> Self {
        self.adaptors.insert(name.into(), adaptor);
        self
    }
}

impl SchemaAdaptor for StaticSchemaAdaptor {
    fn column_adaptor(&self, name: &str) -> Option<Arc<dyn ColumnAdaptor>> {
        self.adaptors.get(name).cloned()
    }
}
