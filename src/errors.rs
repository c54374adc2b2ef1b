// Error types for the token manager and its acquisition attempts

use http::StatusCode;
use thiserror::Error;

/// Errors surfaced to callers of the token manager
#[derive(Error, Debug)]
pub enum TokenError {
    /// A credential field was missing or blank
    #[error("invalid argument: '{field}' is required and must not be empty")]
    InvalidArgument { field: &'static str },

    /// A token was requested before credentials were configured
    #[error("token manager is not configured, call configure() first")]
    NotConfigured,

    /// Every candidate endpoint was tried without producing a usable token
    #[error("failed to acquire access token, all {endpoints} endpoint(s) exhausted")]
    AcquisitionFailed {
        endpoints: usize,
        #[source]
        last: Option<AttemptFailure>,
    },
}

/// Why a single candidate endpoint did not yield a token.
/// Recovered locally by the acquisition loop.
#[derive(Error, Debug)]
pub enum AttemptFailure {
    #[error("transport error: {0}")]
    Transport(#[from] TransportError),

    #[error("endpoint '{url}' answered with status {status}")]
    Status { url: String, status: StatusCode },

    #[error("endpoint '{url}' returned a body that is not a JSON object: {reason}")]
    InvalidBody { url: String, reason: String },

    #[error("endpoint '{url}' returned no access_token")]
    MissingAccessToken { url: String },
}

/// Failures below the HTTP status level
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TransportError {
    #[error("request to '{url}' timed out")]
    Timeout { url: String },

    #[error("connection to '{url}' failed: {message}")]
    Connection { url: String, message: String },

    #[error("request to '{url}' failed: {message}")]
    Request { url: String, message: String },
}
