//! Token acquisition
//!
//! Walks the candidate endpoints in order and returns the first usable token.
//! Each endpoint gets a JSON attempt; when it answers with the configured fallback
//! status the same endpoint is retried once with a form-encoded body.

use std::time::Duration;

use http::StatusCode;
use tracing::{debug, info, warn};

use crate::cache::credentials::Credentials;
use crate::cache::token::TokenState;
use crate::config::settings::TokenConfig;
use crate::errors::{AttemptFailure, TokenError};
use crate::helpers::time::Clock;
use crate::observability::metrics::get_metrics;
use crate::sources::parser::parse_token_response;
use crate::sources::transport::{BodyEncoding, HttpTransport, TokenRequest};
use crate::utils::constants::GRANT_TYPE_CLIENT_CREDENTIALS;

/// Runtime view of `TokenConfig` used while acquiring.
#[derive(Debug, Clone)]
pub struct AcquisitionPlan {
    pub endpoints: Vec<String>,
    pub timeout: Duration,
    pub form_fallback_status: Option<StatusCode>,
}

impl From<&TokenConfig> for AcquisitionPlan {
    fn from(cfg: &TokenConfig) -> Self {
        Self {
            endpoints: cfg.endpoints.clone(),
            timeout: Duration::from_secs(cfg.request_timeout_seconds),
            // invalid codes are rejected by config validation
            form_fallback_status: cfg.form_fallback_status.and_then(|s| StatusCode::from_u16(s).ok()),
        }
    }
}

/// Next step after a single POST
enum Step {
    Done(TokenState),
    /// Retry the same endpoint with a different encoding
    Switch(BodyEncoding),
    /// Soft failure, move to the next endpoint
    Advance(AttemptFailure),
}

impl AcquisitionPlan {
    pub fn token_request(credentials: &Credentials) -> TokenRequest {
        TokenRequest {
            client_id: credentials.client_id().to_owned(),
            client_secret: credentials.client_secret().to_owned(),
            grant_type: GRANT_TYPE_CLIENT_CREDENTIALS,
            scope: credentials.scope(),
        }
    }

    /// Fetch a new token. Per-endpoint failures are logged and skipped; only
    /// exhaustion of the whole list is returned as an error.
    pub async fn acquire<T, C>(
        &self,
        transport: &T,
        clock: &C,
        credentials: &Credentials,
    ) -> Result<TokenState, TokenError>
    where
        T: HttpTransport,
        C: Clock,
    {
        let metrics = get_metrics().await;
        let timer = std::time::Instant::now();
        let payload = Self::token_request(credentials);
        let mut last_failure: Option<AttemptFailure> = None;

        info!(endpoints = self.endpoints.len(), "acquiring access token");

        for (idx, url) in self.endpoints.iter().enumerate() {
            let mut encoding = BodyEncoding::Json;
            loop {
                debug!(attempt = idx + 1, url = %url, encoding = encoding.as_str(), "requesting token");
                metrics.acquisition_attempts.with_label_values(&[encoding.as_str()]).inc();

                match self.attempt(transport, clock, url, encoding, &payload).await {
                    Step::Done(token) => {
                        info!(
                            url = %url,
                            encoding = encoding.as_str(),
                            token_type = token.token_type(),
                            expires_at = ?token.expires_at(),
                            "access token acquired"
                        );
                        metrics.acquisition_duration.with_label_values(&["success"]).observe(timer.elapsed().as_secs_f64());
                        return Ok(token);
                    }
                    Step::Switch(next) => {
                        warn!(url = %url, "endpoint rejected JSON body, retrying form-encoded");
                        encoding = next;
                    }
                    Step::Advance(failure) => {
                        warn!(url = %url, encoding = encoding.as_str(), error = %failure, "token endpoint failed");
                        metrics.acquisition_failures.with_label_values(&[failure_reason(&failure)]).inc();
                        last_failure = Some(failure);
                        break;
                    }
                }
            }
        }

        metrics.acquisition_duration.with_label_values(&["failure"]).observe(timer.elapsed().as_secs_f64());
        warn!(endpoints = self.endpoints.len(), "all token endpoints exhausted");
        Err(TokenError::AcquisitionFailed {
            endpoints: self.endpoints.len(),
            last: last_failure,
        })
    }

    async fn attempt<T, C>(
        &self,
        transport: &T,
        clock: &C,
        url: &str,
        encoding: BodyEncoding,
        payload: &TokenRequest,
    ) -> Step
    where
        T: HttpTransport,
        C: Clock,
    {
        let response = match transport.post(url, encoding, payload, self.timeout).await {
            Ok(response) => response,
            Err(e) => return Step::Advance(AttemptFailure::Transport(e)),
        };

        if response.status == StatusCode::OK {
            return match parse_token_response(url, &response.body, clock.now()) {
                Ok(token) => Step::Done(token),
                Err(failure) => Step::Advance(failure),
            };
        }

        if encoding == BodyEncoding::Json && self.form_fallback_status == Some(response.status) {
            return Step::Switch(BodyEncoding::Form);
        }

        debug!(url = %url, status = %response.status, body = %response.body, "unexpected token endpoint response");
        Step::Advance(AttemptFailure::Status {
            url: url.to_owned(),
            status: response.status,
        })
    }
}

fn failure_reason(failure: &AttemptFailure) -> &'static str {
    match failure {
        AttemptFailure::Transport(_) => "transport",
        AttemptFailure::Status { .. } => "status",
        AttemptFailure::InvalidBody { .. } => "invalid_body",
        AttemptFailure::MissingAccessToken { .. } => "missing_token",
    }
}
