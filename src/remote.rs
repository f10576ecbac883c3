//! HTTP transport and the remote paginated cursor.
//!
//! The service speaks JSON over a single query endpoint; page
//! continuations re-post the statement with the previous response's
//! `page_token`. The page fetch is the library's only suspension point
//! and honors a cancellation token: a cancelled fetch surfaces as a
//! remote-read error, never as partial data.

use std::collections::VecDeque;
use std::time::Instant;

use log::{debug, warn};
use serde_json::Value as JsonValue;
use tokio_util::sync::CancellationToken;

use crate::auth::AuthProvider;
use crate::error::{Result, StrataLinkError};
use crate::models::{FieldDescriptor, QueryRequest, QueryResponse};
use crate::value::Value;

pub(crate) const QUERY_PATH: &str = "/v1/api/query";

/// Shared request plumbing: one per client, cloned into statements.
#[derive(Clone)]
pub(crate) struct Transport {
    pub(crate) http_client: reqwest::Client,
    pub(crate) base_url: String,
    pub(crate) auth: AuthProvider,
}

impl Transport {
    /// Post one query request and decode the response page.
    pub(crate) async fn execute(
        &self,
        request: &QueryRequest,
        cancel: &CancellationToken,
    ) -> Result<QueryResponse> {
        let url = format!("{}{}", self.base_url, QUERY_PATH);
        let req_builder = self
            .auth
            .apply_to_request(self.http_client.post(&url).json(request));

        debug!("[LINK_HTTP] POST {}", url);
        let start = Instant::now();

        let fetch = async {
            let response = req_builder.send().await?;
            let status = response.status();
            debug!(
                "[LINK_HTTP] response: status={} duration_ms={}",
                status,
                start.elapsed().as_millis()
            );

            if status.is_success() {
                let parsed: QueryResponse = response.json().await?;
                if let Some(error) = &parsed.error {
                    warn!(
                        "[LINK_HTTP] statement failed: code={} message=\"{}\"",
                        error.code, error.message
                    );
                    return Err(StrataLinkError::ServerError {
                        status_code: status.as_u16(),
                        message: error.message.clone(),
                    });
                }
                Ok(parsed)
            } else {
                let error_text = response
                    .text()
                    .await
                    .unwrap_or_else(|_| "Unknown error".to_string());

                // Prefer the structured error message when the body parses
                let message = match serde_json::from_str::<QueryResponse>(&error_text) {
                    Ok(body) => match body.error {
                        Some(err) => err.message,
                        None => error_text,
                    },
                    Err(_) => error_text,
                };

                warn!(
                    "[LINK_HTTP] server error: status={} message=\"{}\" duration_ms={}",
                    status,
                    message,
                    start.elapsed().as_millis()
                );

                Err(StrataLinkError::ServerError {
                    status_code: status.as_u16(),
                    message,
                })
            }
        };

        tokio::select! {
            // Cancellation wins over an in-flight fetch
            biased;
            _ = cancel.cancelled() => {
                warn!("[LINK_HTTP] request cancelled after {}ms", start.elapsed().as_millis());
                Err(StrataLinkError::RemoteRead("query cancelled".to_string()))
            }
            result = fetch => result,
        }
    }
}

/// Remote-cursor row source: buffers the current page and fetches the
/// next one on demand. Finite, not restartable.
pub(crate) struct RemoteCursor {
    transport: Transport,
    request: QueryRequest,
    wire_schema: Vec<FieldDescriptor>,
    buffered: VecDeque<Vec<JsonValue>>,
    page_token: Option<String>,
    closed: bool,
    cancel: CancellationToken,
}

impl RemoteCursor {
    /// Wrap the first response page; `request` is re-posted (with the
    /// continuation token) for every further page.
    pub(crate) fn new(
        transport: Transport,
        request: QueryRequest,
        first_page: QueryResponse,
        cancel: CancellationToken,
    ) -> Self {
        let mut buffered = VecDeque::new();
        if let Some(rows) = first_page.rows {
            buffered.extend(rows);
        }
        Self {
            transport,
            request,
            wire_schema: first_page.schema,
            buffered,
            page_token: first_page.page_token,
            closed: false,
            cancel,
        }
    }

    pub(crate) async fn next(&mut self) -> Result<Option<Vec<Value>>> {
        loop {
            if let Some(row) = self.buffered.pop_front() {
                return Ok(Some(self.decode_row(row)));
            }
            if self.closed {
                return Ok(None);
            }
            let Some(token) = self.page_token.take() else {
                return Ok(None);
            };

            self.request.page_token = Some(token);
            let response = self
                .transport
                .execute(&self.request, &self.cancel)
                .await
                .map_err(|err| match err {
                    err @ StrataLinkError::RemoteRead(_) => err,
                    other => StrataLinkError::RemoteRead(other.to_string()),
                })?;

            self.page_token = response.page_token;
            if let Some(rows) = response.rows {
                self.buffered.extend(rows);
            }
            debug!(
                "[CURSOR] fetched page: rows={} more={}",
                self.buffered.len(),
                self.page_token.is_some()
            );
        }
    }

    /// Drop the continuation; no further pages will be requested.
    pub(crate) async fn close(&mut self) -> Result<()> {
        self.closed = true;
        self.buffered.clear();
        self.page_token = None;
        Ok(())
    }

    fn decode_row(&self, row: Vec<JsonValue>) -> Vec<Value> {
        row.into_iter()
            .enumerate()
            .map(|(index, cell)| match self.wire_schema.get(index) {
                Some(field) => Value::decode(field, cell),
                None => Value::from_json(cell),
            })
            .collect()
    }
}
