use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use serde::Serialize;
use tokio::sync::{watch, Mutex, OnceCell};
use tracing::{debug, info};

use crate::cache::credentials::Credentials;
use crate::cache::token::TokenState;
use crate::config::settings::TokenConfig;
use crate::errors::TokenError;
use crate::helpers::time::{safety_margin, Clock, SystemClock};
use crate::observability::metrics::{get_metrics, OUTCOME_CACHE_HIT, OUTCOME_ERROR, OUTCOME_FETCHED};
use crate::sources::fetch::AcquisitionPlan;
use crate::sources::transport::{HttpTransport, ReqwestTransport};

pub const AUTHORIZATION_HEADER: &str = "Authorization";

static TOKEN_MANAGER: OnceCell<Arc<TokenManager>> = OnceCell::const_new();

/// Process-wide manager with the default endpoint list.
///
/// The first call builds it, later calls return the same instance without touching
/// its credentials or cached token.
pub async fn get_token_manager() -> Result<&'static Arc<TokenManager>, reqwest::Error> {
    TOKEN_MANAGER
        .get_or_try_init(|| async {
            info!("Initializing TokenManager ...");
            TokenManager::from_config(&TokenConfig::default()).map(Arc::new)
        })
        .await
}

/// Side-effect free snapshot returned by `get_token_info`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TokenInfo {
    pub has_token: bool,
    pub token_type: String,
    pub expires_at: Option<DateTime<Utc>>,
    pub is_valid: bool,
    pub is_configured: bool,
}

/// Mutable state, only touched while holding the manager lock
#[derive(Debug, Default)]
struct ManagerState {
    credentials: Option<Credentials>,
    token: TokenState,
}

/// Copy of the state published after every mutation, readable without the lock
#[derive(Debug, Clone, Default)]
struct TokenView {
    configured: bool,
    token: TokenState,
}

/// Caches one client-credentials token and renews it on demand.
///
/// Every mutation, including the network round trip of a renewal, runs under a
/// single lock, so concurrent callers that find the token invalid wait for one
/// acquisition instead of starting their own.
pub struct TokenManager<T = ReqwestTransport, C = SystemClock> {
    state: Mutex<ManagerState>,
    view: watch::Sender<TokenView>,
    plan: AcquisitionPlan,
    safety_margin: Duration,
    transport: T,
    clock: C,
}

impl TokenManager {
    pub fn from_config(cfg: &TokenConfig) -> Result<Self, reqwest::Error> {
        Ok(Self::new(cfg, ReqwestTransport::new()?, SystemClock))
    }
}

impl<T, C> TokenManager<T, C>
where
    T: HttpTransport,
    C: Clock,
{
    pub fn new(cfg: &TokenConfig, transport: T, clock: C) -> Self {
        let (view, _) = watch::channel(TokenView::default());
        Self {
            state: Mutex::new(ManagerState::default()),
            view,
            plan: AcquisitionPlan::from(cfg),
            safety_margin: safety_margin(cfg.safety_margin_seconds),
            transport,
            clock,
        }
    }

    /// Replace the credentials and drop any cached token.
    /// On error nothing changes.
    pub async fn configure(
        &self,
        client_id: impl Into<String>,
        client_secret: impl Into<String>,
        workspace_id: impl Into<String>,
    ) -> Result<(), TokenError> {
        let credentials = Credentials::new(client_id, client_secret, workspace_id)?;
        let mut state = self.state.lock().await;
        info!(client_id = credentials.client_id(), workspace_id = credentials.workspace_id(), "token manager configured");
        state.credentials = Some(credentials);
        state.token.clear();
        self.publish(&state).await;
        Ok(())
    }

    pub fn is_configured(&self) -> bool {
        self.view.borrow().configured
    }

    /// Cached token, renewed first when missing or inside the safety margin.
    pub async fn get_token(&self) -> Result<String, TokenError> {
        self.current_token().await.map(|(token, _)| token)
    }

    /// `{"Authorization": "<token_type> <token>"}` for the current token.
    pub async fn get_auth_header(&self) -> Result<HashMap<String, String>, TokenError> {
        let (token, token_type) = self.current_token().await?;
        Ok(HashMap::from([(
            AUTHORIZATION_HEADER.to_owned(),
            format!("{} {}", token_type, token),
        )]))
    }

    /// Forget the cached token so the next request acquires a new one.
    pub async fn invalidate_token(&self) {
        let mut state = self.state.lock().await;
        state.token.clear();
        self.publish(&state).await;
        get_metrics().await.invalidations.inc();
        info!("token invalidated");
    }

    /// Never waits for an acquisition in progress and never triggers one.
    pub fn get_token_info(&self) -> TokenInfo {
        let view = self.view.borrow();
        TokenInfo {
            has_token: view.token.has_token(),
            token_type: view.token.token_type().to_owned(),
            expires_at: view.token.expires_at(),
            is_valid: view.token.is_valid(self.clock.now(), self.safety_margin),
            is_configured: view.configured,
        }
    }

    /// Token and token type read in one critical section.
    async fn current_token(&self) -> Result<(String, String), TokenError> {
        let metrics = get_metrics().await;
        let mut state = self.state.lock().await;

        let credentials = state.credentials.as_ref().ok_or(TokenError::NotConfigured)?;

        if state.token.is_valid(self.clock.now(), self.safety_margin) {
            if let Some(token) = state.token.access_token() {
                metrics.token_requests.with_label_values(&[OUTCOME_CACHE_HIT]).inc();
                return Ok((token.to_owned(), state.token.token_type().to_owned()));
            }
        }

        debug!("token missing or about to expire, acquiring a new one");
        let fresh = match self.plan.acquire(&self.transport, &self.clock, credentials).await {
            Ok(token) => token,
            Err(e) => {
                metrics.token_requests.with_label_values(&[OUTCOME_ERROR]).inc();
                return Err(e);
            }
        };

        let result = fresh
            .access_token()
            .map(|token| (token.to_owned(), fresh.token_type().to_owned()));
        state.token = fresh;
        self.publish(&state).await;
        metrics.token_requests.with_label_values(&[OUTCOME_FETCHED]).inc();

        result.ok_or(TokenError::AcquisitionFailed {
            endpoints: self.plan.endpoints.len(),
            last: None,
        })
    }

    async fn publish(&self, state: &ManagerState) {
        let expiry = state.token.expires_at().map(|t| t.timestamp()).unwrap_or(0);
        get_metrics().await.token_expiry_unix.set(expiry);
        self.view.send_replace(TokenView {
            configured: state.credentials.is_some(),
            token: state.token.clone(),
        });
    }
}
