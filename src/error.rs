//! Error types for the strata-link client library.

use thiserror::Error;

/// Underlying cause carried by adaptor failures.
pub type AdaptorError = Box<dyn std::error::Error + Send + Sync>;

/// Errors that can occur in strata-link operations
#[derive(Error, Debug)]
pub enum StrataLinkError {
    /// Reroute statement invoked without a bind argument
    #[error("expected a rerouting argument")]
    MissingReroutingArgument,

    /// Reroute statement invoked with a value that is not a nested token
    #[error("expected a rerouting argument with nested rows")]
    InvalidReroutingArgument,

    /// Reroute statement invoked without a schema adaptor
    #[error("expected a rerouting schema adaptor")]
    MissingSchemaAdaptor,

    /// A column adaptor rejected a value during row conversion
    #[error("conversion failed for column '{column}': {source}")]
    Conversion {
        column: String,
        #[source]
        source: AdaptorError,
    },

    /// Network or service failure while fetching cursor rows
    #[error("remote read failed: {0}")]
    RemoteRead(String),

    /// Server rejected a query or exec request
    #[error("server error ({status_code}): {message}")]
    ServerError { status_code: u16, message: String },

    /// Invalid client configuration
    #[error("configuration error: {0}")]
    ConfigurationError(String),

    /// HTTP transport error
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// Wire payload could not be decoded
    #[error("decode error: {0}")]
    Decode(#[from] serde_json::Error),
}

/// Result type for strata-link operations
pub type Result<T> = std::result::Result<T, StrataLinkError>;
