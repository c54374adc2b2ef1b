use chrono::{DateTime, Utc};
use serde_json::Value;
use tracing::warn;

use crate::cache::token::{TokenState, DEFAULT_TOKEN_TYPE};
use crate::errors::AttemptFailure;
use crate::helpers::time::expires_at_from;

static ACCESS_TOKEN_FIELD: &str = "access_token";
static TOKEN_TYPE_FIELD: &str = "token_type";
static EXPIRES_IN_FIELD: &str = "expires_in";

/// Turn a 200 response body into a fresh `TokenState`.
///
/// Only `access_token` is required. `token_type` falls back to `Bearer`, and a missing
/// or zero `expires_in` leaves the token without expiry.
pub fn parse_token_response(url: &str, body: &str, now: DateTime<Utc>) -> Result<TokenState, AttemptFailure> {
    let json: Value = serde_json::from_str(body).map_err(|e| AttemptFailure::InvalidBody {
        url: url.to_owned(),
        reason: e.to_string(),
    })?;
    let object = json.as_object().ok_or_else(|| AttemptFailure::InvalidBody {
        url: url.to_owned(),
        reason: "top-level value is not an object".to_owned(),
    })?;

    let access_token = object
        .get(ACCESS_TOKEN_FIELD)
        .and_then(Value::as_str)
        .filter(|token| !token.is_empty())
        .ok_or_else(|| AttemptFailure::MissingAccessToken { url: url.to_owned() })?
        .to_owned();

    let token_type = object
        .get(TOKEN_TYPE_FIELD)
        .and_then(Value::as_str)
        .filter(|token_type| !token_type.is_empty())
        .unwrap_or(DEFAULT_TOKEN_TYPE)
        .to_owned();

    let expires_at = match object.get(EXPIRES_IN_FIELD).and_then(expires_in_seconds) {
        Some(0) | None => None,
        Some(seconds) => expires_at_from(now, seconds),
    };

    Ok(TokenState::issued(access_token, token_type, expires_at))
}

/// `expires_in` as integer seconds. Numeric strings are accepted, anything else is ignored.
fn expires_in_seconds(value: &Value) -> Option<i64> {
    let seconds = match value {
        Value::Number(n) => n.as_i64().or_else(|| n.as_f64().map(|f| f as i64)),
        Value::String(s) => s.trim().parse::<i64>().ok(),
        _ => None,
    };
    if seconds.is_none() && !value.is_null() {
        warn!(value = %value, "ignoring unparseable expires_in");
    }
    seconds
}
