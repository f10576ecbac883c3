//! Rust client for the Strata columnar analytical table service.
//!
//! Strata results are columnar and may contain nested/repeated columns;
//! this crate exposes them through a flat, cursor-based relational API.
//! Each cell is converted on read: civil DATE/DATETIME cells become UTC
//! timestamps, TIME cells become `HH:MM:SS.ssssss` strings, and nested
//! columns are captured as opaque [`NestedToken`]s. A token can be
//! "rerouted" — bound as the single parameter of the reserved
//! [`REROUTE_QUERY`] statement — to obtain a fresh cursor over the nested
//! rows, recursively, without the flat API ever seeing a non-flat row.
//!
//! # Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use strata_link::{
//!     Param, StaticSchemaAdaptor, StrataLinkClient, Value, REROUTE_QUERY,
//! };
//!
//! # async fn example() -> strata_link::Result<()> {
//! let client = StrataLinkClient::builder()
//!     .base_url("https://strata.internal:8443")
//!     .build()?;
//!
//! let adaptor = Arc::new(StaticSchemaAdaptor::new());
//! let statement = client.prepare_with_adaptor("SELECT id, tags FROM events", adaptor.clone());
//! let mut rows = statement.query(vec![]).await?;
//!
//! while let Some(row) = rows.next().await? {
//!     if let Some(Value::Nested(token)) = row.into_iter().nth(1) {
//!         // Expand the nested column as an ordinary query
//!         let reroute = client.prepare_with_adaptor(REROUTE_QUERY, adaptor.clone());
//!         let mut nested = reroute.query(vec![Param::positional(Value::Nested(token))]).await?;
//!         while let Some(nested_row) = nested.next().await? {
//!             println!("{nested_row:?}");
//!         }
//!     }
//! }
//! # Ok(())
//! # }
//! ```

pub mod adaptor;
pub mod auth;
pub mod client;
pub mod error;
pub mod models;
pub mod rows;
pub mod schema;
pub mod statement;
pub mod temporal;
pub mod value;

mod remote;

pub use adaptor::{ColumnAdaptor, SchemaAdaptor, StaticSchemaAdaptor, REROUTE_QUERY};
pub use auth::AuthProvider;
pub use client::{StrataLinkClient, StrataLinkClientBuilder};
pub use error::{AdaptorError, Result, StrataLinkError};
pub use rows::Rows;
pub use schema::Schema;
pub use statement::{ExecResult, Param, Statement};
pub use value::{NestedToken, Value};
