//! Prepared statements, parameter building and the reroute protocol.
//!
//! A [`Statement`] either executes against the service or — when its text
//! is the [`REROUTE_QUERY`] sentinel — re-materializes a previously
//! captured nested column as a fresh in-memory cursor. The reroute path
//! never touches the network.

use std::sync::Arc;

use log::debug;
use tokio_util::sync::CancellationToken;

use crate::adaptor::{SchemaAdaptor, REROUTE_QUERY};
use crate::error::{Result, StrataLinkError};
use crate::models::{QueryParameter, QueryRequest};
use crate::remote::{RemoteCursor, Transport};
use crate::rows::{MemoryRows, RowSource, Rows};
use crate::schema::Schema;
use crate::value::Value;

/// A bind parameter for a statement.
#[derive(Debug, Clone)]
pub struct Param {
    name: Option<String>,
    value: Value,
}

impl Param {
    /// Positional parameter.
    pub fn positional(value: impl Into<Value>) -> Self {
        Self {
            name: None,
            value: value.into(),
        }
    }

    /// Named parameter, binding to an `@name` placeholder.
    pub fn named(name: impl Into<String>, value: impl Into<Value>) -> Self {
        Self {
            name: Some(name.into()),
            value: value.into(),
        }
    }
}

impl From<Value> for Param {
    fn from(value: Value) -> Self {
        Param::positional(value)
    }
}

/// Outcome of a non-query statement.
#[derive(Debug, Clone)]
pub struct ExecResult {
    /// Rows affected or returned
    pub row_count: u64,
}

/// A prepared statement bound to a client's transport.
///
/// Created by [`StrataLinkClient::prepare`](crate::StrataLinkClient::prepare).
/// The schema adaptor, when one is supplied, is threaded explicitly into
/// every schema built for this statement — including schemas built by
/// reroute expansions.
pub struct Statement {
    transport: Transport,
    query: String,
    default_dataset: Option<String>,
    schema_adaptor: Option<Arc<dyn SchemaAdaptor>>,
    cancel: CancellationToken,
}

impl Statement {
    pub(crate) fn new(
        transport: Transport,
        query: String,
        default_dataset: Option<String>,
    ) -> Self {
        Self {
            transport,
            query,
            default_dataset,
            schema_adaptor: None,
            cancel: CancellationToken::new(),
        }
    }

    /// Attach a schema adaptor; required for reroute statements.
    pub fn with_schema_adaptor(mut self, adaptor: Arc<dyn SchemaAdaptor>) -> Self {
        self.schema_adaptor = Some(adaptor);
        self
    }

    /// Use an external cancellation token for the remote read path.
    pub fn with_cancellation(mut self, cancel: CancellationToken) -> Self {
        self.cancel = cancel;
        self
    }

    /// Execute the statement and return a cursor over its rows.
    ///
    /// Reroute sentinel statements are intercepted here and expanded
    /// locally; everything else is posted to the service.
    pub async fn query(&self, params: Vec<Param>) -> Result<Rows> {
        debug!("[LINK_QUERY] query:{}", preview(&self.query));
        log_params(&params);

        if self.query == REROUTE_QUERY {
            return self.reroute(params);
        }

        let request = self.build_request(params)?;
        let response = self.transport.execute(&request, &self.cancel).await?;
        debug!(
            "[LINK_QUERY] result: columns={:?} rows={}",
            response.column_names(),
            response.row_count
        );

        let schema = Schema::build(&response.schema, self.schema_adaptor.as_ref());
        let cursor = RemoteCursor::new(
            self.transport.clone(),
            request,
            response,
            self.cancel.clone(),
        );
        Ok(Rows::new(schema, RowSource::Remote(cursor)))
    }

    /// Execute a non-query statement.
    ///
    /// The reroute sentinel is a query-only protocol and is not
    /// intercepted here.
    pub async fn execute(&self, params: Vec<Param>) -> Result<ExecResult> {
        debug!("[LINK_EXEC] exec:{}", preview(&self.query));
        log_params(&params);

        let request = self.build_request(params)?;
        let response = self.transport.execute(&request, &self.cancel).await?;
        Ok(ExecResult {
            row_count: response.row_count,
        })
    }

    /// Expand a captured nested column into a fresh cursor.
    ///
    /// Preconditions, each a distinct failure: exactly one bind argument;
    /// that argument is a nested token; a schema adaptor is attached (the
    /// nested schema is always rebuilt through the adaptor path, even when
    /// no column needs adaptation). Pure and local: no network.
    fn reroute(&self, mut params: Vec<Param>) -> Result<Rows> {
        if params.len() != 1 {
            return Err(StrataLinkError::MissingReroutingArgument);
        }
        let Param {
            value: Value::Nested(token),
            ..
        } = params.remove(0)
        else {
            return Err(StrataLinkError::InvalidReroutingArgument);
        };
        let Some(schema_adaptor) = &self.schema_adaptor else {
            return Err(StrataLinkError::MissingSchemaAdaptor);
        };

        debug!(
            "[REROUTE] expanding nested column: rows={} columns={}",
            token.values().len(),
            token.schema().len()
        );

        let schema = Schema::build(token.schema(), Some(schema_adaptor));
        let (values, _) = token.into_parts();
        Ok(Rows::new(
            schema,
            RowSource::Memory(MemoryRows::new(values)),
        ))
    }

    fn build_request(&self, params: Vec<Param>) -> Result<QueryRequest> {
        Ok(QueryRequest {
            sql: self.query.clone(),
            params: build_parameters(params)?,
            default_dataset: self.default_dataset.clone(),
            page_token: None,
            max_rows: None,
        })
    }
}

fn build_parameters(params: Vec<Param>) -> Result<Option<Vec<QueryParameter>>> {
    if params.is_empty() {
        return Ok(None);
    }
    let mut parameters = Vec::with_capacity(params.len());
    for param in params {
        parameters.push(QueryParameter {
            name: param.name,
            value: serde_json::to_value(&param.value)?,
        });
    }
    Ok(Some(parameters))
}

fn preview(sql: &str) -> String {
    let flat = sql.replace('\n', " ");
    // Truncate on a char boundary; statement text may be multibyte
    match flat.char_indices().nth(80) {
        Some((boundary, _)) => format!("{}...", &flat[..boundary]),
        None => flat,
    }
}

fn log_params(params: &[Param]) {
    if !log::log_enabled!(log::Level::Debug) {
        return;
    }
    for param in params {
        match &param.name {
            Some(name) => debug!("[LINK_QUERY] - param:{}={:?}", name, param.value),
            None => debug!("[LINK_QUERY] - param:{:?}", param.value),
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use crate::adaptor::StaticSchemaAdaptor;
    use crate::client::StrataLinkClient;
    use crate::models::{FieldDescriptor, FieldType};

    use super::*;

    fn client() -> StrataLinkClient {
        StrataLinkClient::builder()
            .base_url("http://localhost:1")
            .build()
            .expect("offline client")
    }

    fn empty_adaptor() -> Arc<dyn SchemaAdaptor> {
        Arc::new(StaticSchemaAdaptor::new())
    }

    fn sample_token() -> Value {
        // Capture a token the same way the converter does
        let descriptor = FieldDescriptor::record(
            "tags",
            vec![FieldDescriptor::new("tag", FieldType::String)],
        );
        let schema = Schema::build(&[descriptor], None);
        let raw = Value::Array(vec![
            Value::Array(vec![Value::from("x")]),
            Value::Array(vec![Value::from("y")]),
        ]);
        schema.convert_column_value(0, raw).unwrap()
    }

    // ==================== Reroute Precondition Tests ====================

    #[tokio::test]
    async fn test_reroute_without_argument_fails() {
        let statement = client()
            .prepare(REROUTE_QUERY)
            .with_schema_adaptor(empty_adaptor());
        let err = statement.query(vec![]).await.unwrap_err();
        assert!(matches!(err, StrataLinkError::MissingReroutingArgument));
    }

    #[tokio::test]
    async fn test_reroute_with_extra_arguments_fails() {
        let statement = client()
            .prepare(REROUTE_QUERY)
            .with_schema_adaptor(empty_adaptor());
        let params = vec![
            Param::positional(sample_token()),
            Param::positional(Value::Int(1)),
        ];
        let err = statement.query(params).await.unwrap_err();
        assert!(matches!(err, StrataLinkError::MissingReroutingArgument));
    }

    #[tokio::test]
    async fn test_reroute_with_non_token_argument_fails() {
        let statement = client()
            .prepare(REROUTE_QUERY)
            .with_schema_adaptor(empty_adaptor());
        let err = statement
            .query(vec![Param::positional(Value::Int(42))])
            .await
            .unwrap_err();
        assert!(matches!(err, StrataLinkError::InvalidReroutingArgument));
    }

    #[tokio::test]
    async fn test_reroute_without_schema_adaptor_fails() {
        let statement = client().prepare(REROUTE_QUERY);
        let err = statement
            .query(vec![Param::positional(sample_token())])
            .await
            .unwrap_err();
        assert!(matches!(err, StrataLinkError::MissingSchemaAdaptor));
    }

    // ==================== Reroute Expansion Tests ====================

    #[tokio::test]
    async fn test_reroute_yields_cursor_over_nested_rows() {
        let statement = client()
            .prepare(REROUTE_QUERY)
            .with_schema_adaptor(empty_adaptor());
        let mut rows = statement
            .query(vec![Param::positional(sample_token())])
            .await
            .unwrap();

        assert_eq!(rows.column_names(), &["tag"]);
        assert_eq!(rows.next().await.unwrap(), Some(vec![Value::from("x")]));
        assert_eq!(rows.next().await.unwrap(), Some(vec![Value::from("y")]));
        assert_eq!(rows.next().await.unwrap(), None);
        rows.close().await.unwrap();
    }

    // ==================== Remote Read Cancellation Tests ====================

    #[tokio::test]
    async fn test_cancelled_query_surfaces_remote_read() {
        let cancel = CancellationToken::new();
        cancel.cancel();

        let statement = client()
            .prepare("SELECT id FROM events")
            .with_cancellation(cancel);
        let err = statement.query(vec![]).await.unwrap_err();
        assert!(
            matches!(err, StrataLinkError::RemoteRead(_)),
            "a cancelled fetch must surface as a remote-read error, got {err}"
        );
    }

    // ==================== Statement Logging Tests ====================

    #[test]
    fn test_preview_truncates_on_char_boundary() {
        let mut sql = "S".repeat(79);
        sql.push_str("é…");
        let truncated = preview(&sql);
        assert!(truncated.ends_with("é..."), "got {truncated}");

        let short = "SELECT *\nFROM t";
        assert_eq!(preview(short), "SELECT * FROM t");
    }

    // ==================== Parameter Building Tests ====================

    #[test]
    fn test_build_parameters_empty_is_none() {
        assert!(build_parameters(vec![]).unwrap().is_none());
    }

    #[test]
    fn test_build_parameters_positional_and_named() {
        let built = build_parameters(vec![
            Param::positional(Value::Int(42)),
            Param::named("who", Value::from("alice")),
        ])
        .unwrap()
        .unwrap();

        assert_eq!(built.len(), 2);
        assert_eq!(built[0].name, None);
        assert_eq!(built[0].value, json!(42));
        assert_eq!(built[1].name.as_deref(), Some("who"));
        assert_eq!(built[1].value, json!("alice"));
    }

    #[test]
    fn test_nested_token_parameter_serializes_as_bare_values() {
        let built = build_parameters(vec![Param::positional(sample_token())])
            .unwrap()
            .unwrap();
        assert_eq!(built[0].value, json!([["x"], ["y"]]));
    }
}
