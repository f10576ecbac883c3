//! Result schema and the per-cell conversion pipeline.
//!
//! A [`Schema`] is built once per statement (or reroute) from the wire
//! descriptors, with each column's adaptor resolved up front. It is
//! immutable afterwards; the cursor calls [`Schema::convert_column_value`]
//! once per cell, keyed by position.

use std::sync::Arc;

use crate::adaptor::{resolve_column_adaptor, ColumnAdaptor, SchemaAdaptor};
use crate::error::{Result, StrataLinkError};
use crate::models::{FieldDescriptor, FieldType};
use crate::temporal;
use crate::value::{NestedToken, Value};

/// One built column: name, type tag, nested sub-schema and resolved adaptor.
pub(crate) struct Column {
    name: String,
    field_type: FieldType,
    nested: Option<Arc<[FieldDescriptor]>>,
    adaptor: Option<Arc<dyn ColumnAdaptor>>,
}

impl Column {
    /// Convert one raw cell of this column.
    ///
    /// Stage order is fixed: temporal coercion (matching cells return
    /// immediately, bypassing the adaptor), nested-column capture, then
    /// the resolved adaptor.
    fn convert_value(&self, value: Value) -> Result<Value> {
        if let Some(coerced) = temporal::coerce(self.field_type, &value) {
            return Ok(coerced);
        }

        let working = match (&self.nested, value) {
            (Some(nested), Value::Array(mut values)) => {
                // Normalize a singleton record group to "sequence of records"
                if let Some(first) = values.first() {
                    if !first.is_array() {
                        values = vec![Value::Array(values)];
                    }
                }
                Value::Nested(NestedToken::new(values, Arc::clone(nested)))
            }
            (_, value) => value,
        };

        match &self.adaptor {
            Some(adaptor) => adaptor
                .adapt_value(working)
                .map_err(|source| StrataLinkError::Conversion {
                    column: self.name.clone(),
                    source,
                }),
            None => Ok(working),
        }
    }
}

/// Ordered, immutable result schema bound to resolved column adaptors.
///
/// Column order is the positional contract: it matches the order cells
/// arrive in every row sourced under this schema, at every nesting depth.
pub struct Schema {
    names: Vec<String>,
    columns: Vec<Column>,
}

impl Schema {
    /// Build a schema from wire descriptors, resolving each column's
    /// adaptor by name.
    ///
    /// Nested sub-schemas are captured verbatim, never expanded here —
    /// they materialize lazily as tokens at conversion time, so the build
    /// is linear in the column count regardless of nested fan-out.
    pub fn build(
        fields: &[FieldDescriptor],
        schema_adaptor: Option<&Arc<dyn SchemaAdaptor>>,
    ) -> Schema {
        let mut names = Vec::with_capacity(fields.len());
        let mut columns = Vec::with_capacity(fields.len());
        for field in fields {
            let nested = if field.fields.is_empty() {
                None
            } else {
                Some(Arc::from(field.fields.as_slice()))
            };
            names.push(field.name.clone());
            columns.push(Column {
                name: field.name.clone(),
                field_type: field.field_type,
                nested,
                adaptor: resolve_column_adaptor(&field.name, schema_adaptor),
            });
        }
        Schema { names, columns }
    }

    /// Column names in positional order.
    pub fn column_names(&self) -> &[String] {
        &self.names
    }

    /// Number of columns.
    pub fn len(&self) -> usize {
        self.columns.len()
    }

    /// True when the schema has no columns.
    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// Convert the raw cell at `index` through the column's pipeline.
    ///
    /// An out-of-range index hands the cell back unchanged; positional
    /// metadata from the service is not trusted enough to panic over.
    pub fn convert_column_value(&self, index: usize, value: Value) -> Result<Value> {
        match self.columns.get(index) {
            Some(column) => column.convert_value(value),
            None => Ok(value),
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::adaptor::StaticSchemaAdaptor;
    use crate::error::AdaptorError;

    use super::*;

    fn scalar(name: &str) -> FieldDescriptor {
        FieldDescriptor::new(name, FieldType::String)
    }

    fn tags_record() -> FieldDescriptor {
        FieldDescriptor::record("tags", vec![scalar("tag")])
    }

    struct Upper;

    impl ColumnAdaptor for Upper {
        fn adapt_value(&self, value: Value) -> std::result::Result<Value, AdaptorError> {
            match value {
                Value::String(s) => Ok(Value::String(s.to_uppercase())),
                other => Ok(other),
            }
        }
    }

    struct Fail;

    impl ColumnAdaptor for Fail {
        fn adapt_value(&self, _value: Value) -> std::result::Result<Value, AdaptorError> {
            Err("adaptor rejected the value".into())
        }
    }

    // ==================== Schema Build Tests ====================

    #[test]
    fn test_build_preserves_column_order() {
        let schema = Schema::build(&[scalar("id"), scalar("name"), tags_record()], None);
        assert_eq!(schema.column_names(), &["id", "name", "tags"]);
        assert_eq!(schema.len(), 3);
    }

    #[test]
    fn test_build_resolves_adaptors_by_name() {
        let capability: Arc<dyn SchemaAdaptor> =
            Arc::new(StaticSchemaAdaptor::new().with_column("name", Arc::new(Upper)));
        let schema = Schema::build(&[scalar("id"), scalar("name")], Some(&capability));

        assert!(schema.columns[0].adaptor.is_none(), "unmatched column stays unadapted");
        assert!(schema.columns[1].adaptor.is_some());
    }

    // ==================== Conversion Tests ====================

    #[test]
    fn test_scalar_column_passes_through() {
        let schema = Schema::build(&[scalar("id")], None);
        let converted = schema.convert_column_value(0, Value::Int(7)).unwrap();
        assert_eq!(converted, Value::Int(7));
    }

    #[test]
    fn test_out_of_range_index_is_a_noop() {
        let schema = Schema::build(&[scalar("id")], None);
        let converted = schema
            .convert_column_value(9, Value::String("stray".to_string()))
            .unwrap();
        assert_eq!(converted, Value::String("stray".to_string()));
    }

    #[test]
    fn test_nested_rows_shape_is_kept() {
        let schema = Schema::build(&[tags_record()], None);
        // Already "sequence of records": [[a,b],[c,d]]
        let raw = Value::Array(vec![
            Value::Array(vec![Value::from("a"), Value::from("b")]),
            Value::Array(vec![Value::from("c"), Value::from("d")]),
        ]);
        let Value::Nested(token) = schema.convert_column_value(0, raw.clone()).unwrap() else {
            panic!("nested column must convert to a token");
        };
        let Value::Array(expected) = raw else { unreachable!() };
        assert_eq!(token.values(), expected.as_slice());
        assert_eq!(token.schema(), &[scalar("tag")]);
    }

    #[test]
    fn test_singleton_record_is_wrapped() {
        let schema = Schema::build(&[tags_record()], None);
        // One record of two cells: [a,b] — not itself a sequence of sequences
        let raw = Value::Array(vec![Value::from("a"), Value::from("b")]);
        let Value::Nested(token) = schema.convert_column_value(0, raw).unwrap() else {
            panic!("nested column must convert to a token");
        };
        assert_eq!(
            token.values(),
            &[Value::Array(vec![Value::from("a"), Value::from("b")])],
            "singleton record group must be wrapped once"
        );
    }

    #[test]
    fn test_nested_column_with_non_array_cell_passes_through() {
        let schema = Schema::build(&[tags_record()], None);
        let converted = schema.convert_column_value(0, Value::Null).unwrap();
        assert_eq!(converted, Value::Null);
    }

    #[test]
    fn test_adaptor_runs_after_capture() {
        struct CountRows;
        impl ColumnAdaptor for CountRows {
            fn adapt_value(&self, value: Value) -> std::result::Result<Value, AdaptorError> {
                match value {
                    Value::Nested(token) => Ok(Value::Int(token.values().len() as i64)),
                    other => Ok(other),
                }
            }
        }
        let capability: Arc<dyn SchemaAdaptor> =
            Arc::new(StaticSchemaAdaptor::new().with_column("tags", Arc::new(CountRows)));
        let schema = Schema::build(&[tags_record()], Some(&capability));

        let raw = Value::Array(vec![
            Value::Array(vec![Value::from("x")]),
            Value::Array(vec![Value::from("y")]),
        ]);
        let converted = schema.convert_column_value(0, raw).unwrap();
        assert_eq!(converted, Value::Int(2), "adaptor must see the captured token");
    }

    #[test]
    fn test_adaptor_failure_carries_column_name() {
        let capability: Arc<dyn SchemaAdaptor> =
            Arc::new(StaticSchemaAdaptor::new().with_column("id", Arc::new(Fail)));
        let schema = Schema::build(&[scalar("id")], Some(&capability));

        let err = schema.convert_column_value(0, Value::Int(1)).unwrap_err();
        match err {
            StrataLinkError::Conversion { column, .. } => assert_eq!(column, "id"),
            other => panic!("expected Conversion error, got {other}"),
        }
    }

    #[test]
    fn test_coerced_temporal_bypasses_adaptor() {
        let capability: Arc<dyn SchemaAdaptor> =
            Arc::new(StaticSchemaAdaptor::new().with_column("d", Arc::new(Fail)));
        let schema = Schema::build(
            &[FieldDescriptor::new("d", FieldType::Date)],
            Some(&capability),
        );

        let civil = Value::Date(chrono::NaiveDate::from_ymd_opt(2024, 3, 9).unwrap());
        let converted = schema
            .convert_column_value(0, civil)
            .expect("coerced temporal must not reach the failing adaptor");
        assert!(matches!(converted, Value::Timestamp(_)));
    }

    #[test]
    fn test_unmatched_temporal_reaches_adaptor() {
        let capability: Arc<dyn SchemaAdaptor> =
            Arc::new(StaticSchemaAdaptor::new().with_column("d", Arc::new(Upper)));
        let schema = Schema::build(
            &[FieldDescriptor::new("d", FieldType::Date)],
            Some(&capability),
        );

        let converted = schema
            .convert_column_value(0, Value::String("raw".to_string()))
            .unwrap();
        assert_eq!(converted, Value::String("RAW".to_string()));
    }
}
