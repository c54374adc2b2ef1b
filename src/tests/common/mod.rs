// tests/common/mod.rs
use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use chrono::{DateTime, TimeZone, Utc};
use http::StatusCode;
use serde_json::Value;

use crate::config::settings::TokenConfig;
use crate::errors::TransportError;
use crate::helpers::time::Clock;
use crate::manager::token_manager::TokenManager;
use crate::sources::transport::{BodyEncoding, HttpTransport, TokenRequest, TransportResponse};

pub const FIRST: &str = "https://first.auth.test/token";
pub const SECOND: &str = "https://second.auth.test/token";
pub const THIRD: &str = "https://third.auth.test/token";

pub type Reply = Result<TransportResponse, TransportError>;

pub fn ok_json(body: Value) -> Reply {
    Ok(TransportResponse {
        status: StatusCode::OK,
        body: body.to_string(),
    })
}

pub fn status(code: u16) -> Reply {
    Ok(TransportResponse {
        status: StatusCode::from_u16(code).unwrap(),
        body: format!("status {}", code),
    })
}

pub fn timeout(url: &str) -> Reply {
    Err(TransportError::Timeout { url: url.to_owned() })
}

#[derive(Debug, Clone)]
pub struct Call {
    pub url: String,
    pub encoding: BodyEncoding,
    pub payload: TokenRequest,
}

#[derive(Default)]
struct Script {
    replies: HashMap<(String, BodyEncoding), VecDeque<Reply>>,
    calls: Vec<Call>,
}

/// Scripted transport. Replies are queued per (url, encoding); the last queued
/// reply repeats forever, unscripted pairs answer 404.
#[derive(Clone, Default)]
pub struct MockTransport {
    script: Arc<Mutex<Script>>,
    delay: Option<Duration>,
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_delay(delay: Duration) -> Self {
        Self {
            delay: Some(delay),
            ..Self::default()
        }
    }

    pub fn on(&self, url: &str, encoding: BodyEncoding, reply: Reply) -> &Self {
        self.script
            .lock()
            .unwrap()
            .replies
            .entry((url.to_owned(), encoding))
            .or_default()
            .push_back(reply);
        self
    }

    pub fn calls(&self) -> Vec<Call> {
        self.script.lock().unwrap().calls.clone()
    }

    pub fn call_count(&self) -> usize {
        self.script.lock().unwrap().calls.len()
    }

    pub fn visited(&self) -> Vec<(String, BodyEncoding)> {
        self.calls().into_iter().map(|c| (c.url, c.encoding)).collect()
    }
}

impl HttpTransport for MockTransport {
    async fn post(
        &self,
        url: &str,
        encoding: BodyEncoding,
        payload: &TokenRequest,
        _timeout: Duration,
    ) -> Result<TransportResponse, TransportError> {
        let reply = {
            let mut script = self.script.lock().unwrap();
            script.calls.push(Call {
                url: url.to_owned(),
                encoding,
                payload: payload.clone(),
            });
            match script.replies.get_mut(&(url.to_owned(), encoding)) {
                Some(queue) if queue.len() > 1 => queue.pop_front().unwrap(),
                Some(queue) if !queue.is_empty() => queue[0].clone(),
                _ => status(404),
            }
        };
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        reply
    }
}

/// Clock that only moves when told to.
#[derive(Clone)]
pub struct ManualClock(Arc<Mutex<DateTime<Utc>>>);

impl ManualClock {
    pub fn new() -> Self {
        Self(Arc::new(Mutex::new(Utc.with_ymd_and_hms(2026, 2, 10, 9, 0, 0).unwrap())))
    }

    pub fn advance(&self, by: chrono::Duration) {
        let mut now = self.0.lock().unwrap();
        *now += by;
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        *self.0.lock().unwrap()
    }
}

pub fn token_config(endpoints: &[&str]) -> TokenConfig {
    TokenConfig {
        endpoints: endpoints.iter().map(|e| e.to_string()).collect(),
        ..TokenConfig::default()
    }
}

/// Manager over the three test endpoints, already configured.
pub async fn configured_manager(transport: &MockTransport, clock: &ManualClock) -> TokenManager<MockTransport, ManualClock> {
    let manager = TokenManager::new(&token_config(&[FIRST, SECOND, THIRD]), transport.clone(), clock.clone());
    manager.configure("client-1", "secret-1", "ws-1").await.unwrap();
    manager
}
