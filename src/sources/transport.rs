use std::future::Future;
use std::time::Duration;

use http::header::ACCEPT;
use http::StatusCode;
use reqwest::Client;
use serde::Serialize;

use crate::errors::TransportError;

const APPLICATION_JSON: &str = "application/json";

/// Request body encodings accepted by the token endpoints
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BodyEncoding {
    Json,
    Form,
}

impl BodyEncoding {
    pub fn as_str(&self) -> &'static str {
        match self {
            BodyEncoding::Json => "json",
            BodyEncoding::Form => "form",
        }
    }
}

/// Client-credentials grant request, identical for both encodings.
#[derive(Clone, PartialEq, Eq, Serialize)]
pub struct TokenRequest {
    pub client_id: String,
    pub client_secret: String,
    pub grant_type: &'static str,
    pub scope: String,
}

impl std::fmt::Debug for TokenRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenRequest")
            .field("client_id", &self.client_id)
            .field("grant_type", &self.grant_type)
            .field("scope", &self.scope)
            .finish_non_exhaustive()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportResponse {
    pub status: StatusCode,
    pub body: String,
}

/// The HTTP capability the token manager depends on.
///
/// Implementations send `payload` as a POST with `accept: application/json` and the
/// content type matching `encoding`, bounded by `timeout`. Transport level failures
/// are reported as `TransportError`, never folded into a status code.
pub trait HttpTransport: Send + Sync {
    fn post(
        &self,
        url: &str,
        encoding: BodyEncoding,
        payload: &TokenRequest,
        timeout: Duration,
    ) -> impl Future<Output = Result<TransportResponse, TransportError>> + Send;
}

/// `reqwest` backed transport.
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: Client,
}

impl ReqwestTransport {
    /// Idle connections are not pooled, every attempt opens its own connection.
    pub fn new() -> Result<Self, reqwest::Error> {
        let client = Client::builder().pool_max_idle_per_host(0).build()?;
        Ok(Self { client })
    }
}

impl HttpTransport for ReqwestTransport {
    async fn post(
        &self,
        url: &str,
        encoding: BodyEncoding,
        payload: &TokenRequest,
        timeout: Duration,
    ) -> Result<TransportResponse, TransportError> {
        let request = self
            .client
            .post(url)
            .header(ACCEPT, APPLICATION_JSON)
            .timeout(timeout);

        // json() and form() also set the matching content-type header
        let request = match encoding {
            BodyEncoding::Json => request.json(payload),
            BodyEncoding::Form => request.form(payload),
        };

        let response = request.send().await.map_err(|err| classify(url, err))?;
        let status = response.status();
        let body = response.text().await.map_err(|err| classify(url, err))?;
        Ok(TransportResponse { status, body })
    }
}

fn classify(url: &str, err: reqwest::Error) -> TransportError {
    let url = url.to_owned();
    if err.is_timeout() {
        TransportError::Timeout { url }
    } else if err.is_connect() {
        TransportError::Connection {
            url,
            message: err.to_string(),
        }
    } else {
        TransportError::Request {
            url,
            message: err.to_string(),
        }
    }
}
