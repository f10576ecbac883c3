//! Strata client with builder pattern.
//!
//! The client owns the HTTP transport and hands out prepared
//! [`Statement`]s bound to it.

use std::sync::Arc;
use std::time::Duration;

use tokio_util::sync::CancellationToken;

use crate::adaptor::SchemaAdaptor;
use crate::error::{Result, StrataLinkError};
use crate::remote::Transport;
use crate::rows::Rows;
use crate::statement::{ExecResult, Param, Statement};
use crate::AuthProvider;

/// Client for the Strata columnar analytical table service.
///
/// Use [`StrataLinkClient::builder`] to construct instances.
///
/// # Examples
///
/// ```rust,no_run
/// use strata_link::StrataLinkClient;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let client = StrataLinkClient::builder()
///     .base_url("https://strata.internal:8443")
///     .default_dataset("analytics")
///     .timeout(std::time::Duration::from_secs(30))
///     .build()?;
///
/// let mut rows = client.query("SELECT id, tags FROM events", vec![]).await?;
/// while let Some(row) = rows.next().await? {
///     println!("{row:?}");
/// }
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct StrataLinkClient {
    transport: Transport,
    default_dataset: Option<String>,
}

impl StrataLinkClient {
    /// Create a new builder for configuring the client.
    pub fn builder() -> StrataLinkClientBuilder {
        StrataLinkClientBuilder::new()
    }

    /// Prepare a statement for execution.
    ///
    /// Nested-column expansion goes through the same call: prepare the
    /// [`REROUTE_QUERY`](crate::REROUTE_QUERY) sentinel, attach a schema
    /// adaptor, and bind a captured token as the single parameter.
    pub fn prepare(&self, query: impl Into<String>) -> Statement {
        Statement::new(
            self.transport.clone(),
            query.into(),
            self.default_dataset.clone(),
        )
    }

    /// Prepare a statement with a schema adaptor attached.
    pub fn prepare_with_adaptor(
        &self,
        query: impl Into<String>,
        adaptor: Arc<dyn SchemaAdaptor>,
    ) -> Statement {
        self.prepare(query).with_schema_adaptor(adaptor)
    }

    /// Execute a query and return its cursor.
    pub async fn query(&self, sql: &str, params: Vec<Param>) -> Result<Rows> {
        self.prepare(sql).query(params).await
    }

    /// Execute a non-query statement.
    pub async fn execute(&self, sql: &str, params: Vec<Param>) -> Result<ExecResult> {
        self.prepare(sql).execute(params).await
    }

    /// Cancellation token factory for callers that want to abort remote
    /// reads: pass the token to [`Statement::with_cancellation`] and
    /// cancel it from anywhere.
    pub fn cancellation_token() -> CancellationToken {
        CancellationToken::new()
    }
}

/// Builder for configuring [`StrataLinkClient`] instances.
pub struct StrataLinkClientBuilder {
    base_url: Option<String>,
    default_dataset: Option<String>,
    timeout: Duration,
    connect_timeout: Duration,
    auth: AuthProvider,
}

impl StrataLinkClientBuilder {
    fn new() -> Self {
        Self {
            base_url: None,
            default_dataset: None,
            timeout: Duration::from_secs(30),
            connect_timeout: Duration::from_secs(10),
            auth: AuthProvider::none(),
        }
    }

    /// Set the base URL of the Strata service (required).
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    /// Default dataset for unqualified table names.
    pub fn default_dataset(mut self, dataset: impl Into<String>) -> Self {
        self.default_dataset = Some(dataset.into());
        self
    }

    /// Request timeout for HTTP requests.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Connection establishment timeout.
    pub fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    /// Set authentication provider.
    pub fn auth(mut self, auth: AuthProvider) -> Self {
        self.auth = auth;
        self
    }

    /// Build the client.
    pub fn build(self) -> Result<StrataLinkClient> {
        let base_url = self
            .base_url
            .ok_or_else(|| StrataLinkError::ConfigurationError("base_url is required".into()))?;
        let base_url = base_url.trim_end_matches('/').to_string();

        // Keep-alive pooling: page fetches reuse the same connection
        let http_client = reqwest::Client::builder()
            .timeout(self.timeout)
            .connect_timeout(self.connect_timeout)
            .pool_max_idle_per_host(10)
            .pool_idle_timeout(Duration::from_secs(90))
            .build()
            .map_err(|e| StrataLinkError::ConfigurationError(e.to_string()))?;

        Ok(StrataLinkClient {
            transport: Transport {
                http_client,
                base_url,
                auth: self.auth,
            },
            default_dataset: self.default_dataset,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_pattern() {
        let result = StrataLinkClient::builder()
            .base_url("http://localhost:8443")
            .default_dataset("analytics")
            .timeout(Duration::from_secs(10))
            .auth(AuthProvider::bearer("test_token"))
            .build();

        assert!(result.is_ok());
    }

    #[test]
    fn test_builder_missing_url() {
        let result = StrataLinkClient::builder().build();
        assert!(matches!(
            result,
            Err(StrataLinkError::ConfigurationError(_))
        ));
    }

    #[test]
    fn test_builder_trims_trailing_slash() {
        let client = StrataLinkClient::builder()
            .base_url("http://localhost:8443/")
            .build()
            .unwrap();
        assert_eq!(client.transport.base_url, "http://localhost:8443");
    }
}
