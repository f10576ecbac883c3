//! Authentication provider for the Strata client.
//!
//! Attaches the appropriate Authorization header to HTTP requests.
//! Transport-level concerns beyond the header are out of scope here.

use base64::{engine::general_purpose, Engine as _};

/// Authentication credentials for the Strata service.
///
/// # Examples
///
/// ```rust
/// use strata_link::AuthProvider;
///
/// // Bearer token authentication
/// let auth = AuthProvider::bearer("eyJhbGc...");
///
/// // HTTP Basic Auth
/// let auth = AuthProvider::basic("svc-reporting", "secret");
///
/// // No authentication
/// let auth = AuthProvider::none();
/// ```
#[derive(Debug, Clone)]
pub enum AuthProvider {
    /// No Authorization header
    None,
    /// Bearer token
    Bearer(String),
    /// HTTP Basic Auth (username, password)
    Basic(String, String),
}

impl AuthProvider {
    /// No authentication.
    pub fn none() -> Self {
        AuthProvider::None
    }

    /// Bearer token authentication.
    pub fn bearer(token: impl Into<String>) -> Self {
        AuthProvider::Bearer(token.into())
    }

    /// HTTP Basic Auth.
    pub fn basic(username: impl Into<String>, password: impl Into<String>) -> Self {
        AuthProvider::Basic(username.into(), password.into())
    }

    /// Attach the Authorization header, if any, to an outgoing request.
    pub(crate) fn apply_to_request(
        &self,
        builder: reqwest::RequestBuilder,
    ) -> reqwest::RequestBuilder {
        match self {
            AuthProvider::None => builder,
            AuthProvider::Bearer(token) => {
                builder.header("Authorization", format!("Bearer {token}"))
            }
            AuthProvider::Basic(username, password) => {
                let encoded =
                    general_purpose::STANDARD.encode(format!("{username}:{password}"));
                builder.header("Authorization", format!("Basic {encoded}"))
            }
        }
    }
}
