//! Shared constants and defaults

pub const DEFAULT_SAFETY_MARGIN_SECONDS: u64 = 300;
pub const DEFAULT_REQUEST_TIMEOUT_SECONDS: u64 = 30;
pub const DEFAULT_FORM_FALLBACK_STATUS: u16 = 500;

pub const GRANT_TYPE_CLIENT_CREDENTIALS: &str = "client_credentials";

/// Known equivalent token endpoints, in the order they are tried
pub const DEFAULT_ENDPOINTS: [&str; 3] = [
    "https://api.airbyte.com/api/public/v1/applications/token",
    "https://api.airbyte.com/v1/applications/token",
    "https://api.airbyte.ai/api/v1/applications/token",
];
