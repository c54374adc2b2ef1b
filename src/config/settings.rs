use serde::Deserialize;

use crate::utils::constants::{
    DEFAULT_ENDPOINTS, DEFAULT_FORM_FALLBACK_STATUS, DEFAULT_REQUEST_TIMEOUT_SECONDS,
    DEFAULT_SAFETY_MARGIN_SECONDS,
};

/// ================================
/// Full service configuration
/// ================================
#[derive(Debug, Deserialize, Clone, Default)]
pub struct ServiceConfig {
    pub credentials: Option<CredentialsConfig>,
    #[serde(default)]
    pub token: TokenConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// ================================
/// Credentials
/// ================================
#[derive(Deserialize, Clone)]
pub struct CredentialsConfig {
    pub client_id: String,
    pub client_secret: String,
    pub workspace_id: String,
}

impl std::fmt::Debug for CredentialsConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CredentialsConfig")
            .field("client_id", &self.client_id)
            .field("client_secret", &"<redacted>")
            .field("workspace_id", &self.workspace_id)
            .finish()
    }
}

/// ================================
/// Token acquisition
/// ================================
#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
pub struct TokenConfig {
    /// Candidate token endpoints, tried in order
    #[serde(default = "default_endpoints")]
    pub endpoints: Vec<String>,
    /// Per-request timeout
    #[serde(default = "default_request_timeout_seconds")]
    pub request_timeout_seconds: u64,
    /// Tokens are treated as expired this long before their nominal expiry
    #[serde(default = "default_safety_margin_seconds")]
    pub safety_margin_seconds: u64,
    /// Status that triggers one form-encoded retry of the same endpoint.
    /// `null` disables the retry.
    #[serde(default = "default_form_fallback_status")]
    pub form_fallback_status: Option<u16>,
}

impl Default for TokenConfig {
    fn default() -> Self {
        Self {
            endpoints: default_endpoints(),
            request_timeout_seconds: default_request_timeout_seconds(),
            safety_margin_seconds: default_safety_margin_seconds(),
            form_fallback_status: default_form_fallback_status(),
        }
    }
}

fn default_endpoints() -> Vec<String> {
    DEFAULT_ENDPOINTS.iter().map(|url| url.to_string()).collect()
}

fn default_request_timeout_seconds() -> u64 {
    DEFAULT_REQUEST_TIMEOUT_SECONDS
}

fn default_safety_margin_seconds() -> u64 {
    DEFAULT_SAFETY_MARGIN_SECONDS
}

fn default_form_fallback_status() -> Option<u16> {
    Some(DEFAULT_FORM_FALLBACK_STATUS)
}

/// ================================
/// Logging
/// ================================
#[derive(Debug, Deserialize, Clone)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String, // allowed: trace, debug, info, warn, error
    #[serde(default)]
    pub format: LogFormat,
}

impl LoggingConfig {
    pub fn new(level: String, format: LogFormat) -> Self {
        Self { level, format }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: LogFormat::default(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_owned()
}

#[derive(Clone, Debug, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    Json,
    #[default]
    Compact,
}
