//! Sources module
//!
//! Token endpoint client: HTTP transport, acquisition loop and response parsing.
pub mod fetch;
pub mod parser;
pub mod transport;
