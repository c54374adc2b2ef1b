//! # Token Manager Library
//!
//! Obtains an OAuth2 client-credentials access token for a single workspace,
//! caches it and renews it on demand before it expires.
//!
//! Modules:
//! - `manager`: the token manager and its process-wide instance
//! - `sources`: HTTP transport, endpoint fallback and response parsing
//! - `cache`: credentials and cached token state
//! - `config`: YAML configuration, defaults and validation
//! - `helpers`: clock abstraction and time arithmetic

pub mod cache;
pub mod config;
pub mod errors;
pub mod helpers;
pub mod manager;
pub mod observability;
pub mod sources;
pub mod utils;

#[cfg(test)]
mod tests;

pub use crate::errors::{AttemptFailure, TokenError, TransportError};
pub use crate::helpers::time::{Clock, SystemClock};
pub use crate::manager::token_manager::{get_token_manager, TokenInfo, TokenManager};
pub use crate::sources::transport::{BodyEncoding, HttpTransport, ReqwestTransport, TokenRequest, TransportResponse};
