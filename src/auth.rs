//! Shared-secret check for the ping endpoint.

use axum::http::HeaderValue;

/// Header carrying the client token
pub const TOKEN_HEADER: &str = "x-api-token";

/// How incoming pings are authenticated, decided once at startup
#[derive(Clone, PartialEq, Eq)]
pub enum AuthPolicy {
    /// Accept every request
    NoAuth,
    /// Require `X-API-Token` to equal the secret exactly
    TokenAuth(String),
}

impl AuthPolicy {
    /// An absent or empty token disables the check
    pub fn from_token(token: Option<String>) -> Self {
        match token {
            Some(secret) if !secret.is_empty() => AuthPolicy::TokenAuth(secret),
            _ => AuthPolicy::NoAuth,
        }
    }

    /// Whether a request presenting `header` may proceed.
    ///
    /// Header bytes must equal the secret's UTF-8 bytes; a missing header
    /// is compared as the empty string.
    pub fn permits(&self, header: Option<&HeaderValue>) -> bool {
        match self {
            AuthPolicy::NoAuth => true,
            AuthPolicy::TokenAuth(secret) => {
                let presented = header.map(HeaderValue::as_bytes).unwrap_or(b"");
                presented == secret.as_bytes()
            }
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            AuthPolicy::NoAuth => "none",
            AuthPolicy::TokenAuth(_) => "token",
        }
    }
}

impl std::fmt::Debug for AuthPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AuthPolicy::NoAuth => write!(f, "NoAuth"),
            AuthPolicy::TokenAuth(_) => write!(f, "TokenAuth(<redacted>)"),
        }
    }
}
