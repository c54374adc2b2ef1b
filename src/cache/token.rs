use std::fmt;

use chrono::{DateTime, Duration, Utc};

pub const DEFAULT_TOKEN_TYPE: &str = "Bearer";

/// Cached access token and its metadata.
///
/// `expires_at` is only ever set together with `access_token`.
#[derive(Clone, PartialEq, Eq)]
pub struct TokenState {
    access_token: Option<String>,
    token_type: String,
    expires_at: Option<DateTime<Utc>>,
}

impl Default for TokenState {
    fn default() -> Self {
        Self {
            access_token: None,
            token_type: DEFAULT_TOKEN_TYPE.to_owned(),
            expires_at: None,
        }
    }
}

impl TokenState {
    pub fn issued(access_token: String, token_type: String, expires_at: Option<DateTime<Utc>>) -> Self {
        Self {
            access_token: Some(access_token),
            token_type,
            expires_at,
        }
    }

    pub fn access_token(&self) -> Option<&str> {
        self.access_token.as_deref()
    }

    pub fn token_type(&self) -> &str {
        &self.token_type
    }

    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        self.expires_at
    }

    pub fn has_token(&self) -> bool {
        self.access_token.is_some()
    }

    /// Drop the token and its expiry. The last known token type is kept.
    pub fn clear(&mut self) {
        self.access_token = None;
        self.expires_at = None;
    }

    /// A token is usable while `now` is strictly before `expires_at - safety_margin`.
    /// Tokens issued without expiry information never expire.
    pub fn is_valid(&self, now: DateTime<Utc>, safety_margin: Duration) -> bool {
        if self.access_token.is_none() {
            return false;
        }
        match self.expires_at {
            None => true,
            Some(expires_at) => expires_at
                .checked_sub_signed(safety_margin)
                .map(|refresh_at| now < refresh_at)
                .unwrap_or(false),
        }
    }
}

impl fmt::Debug for TokenState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenState")
            .field("access_token", &self.access_token.as_ref().map(|_| "<redacted>"))
            .field("token_type", &self.token_type)
            .field("expires_at", &self.expires_at)
            .finish()
    }
}
