//! Configuration validation with aggregated errors.
//! All issues are collected first and reported together.

use anyhow::{bail, Result};
use http::StatusCode;
use reqwest::Url;
use tracing::{error, info};

use crate::config::settings::{CredentialsConfig, ServiceConfig, TokenConfig};

pub fn validate_service_config(cfg: &ServiceConfig) -> Result<()> {
    let mut errors: Vec<String> = Vec::new();

    validate_token(&cfg.token, &mut errors);
    if let Some(credentials) = &cfg.credentials {
        validate_credentials(credentials, &mut errors);
    }

    if errors.is_empty() {
        info!("config validation passed");
        return Ok(());
    }
    for e in &errors {
        error!("config: {}", e);
    }
    bail!("config validation failed:\n  - {}", errors.join("\n  - "))
}

fn validate_token(token: &TokenConfig, errors: &mut Vec<String>) {
    if token.endpoints.is_empty() {
        errors.push("token.endpoints is empty; at least one endpoint required".to_string());
    }
    for (idx, endpoint) in token.endpoints.iter().enumerate() {
        match Url::parse(endpoint) {
            Ok(url) if matches!(url.scheme(), "http" | "https") => {}
            Ok(url) => errors.push(format!(
                "token.endpoints[{}] '{}' has unsupported scheme '{}'",
                idx,
                endpoint,
                url.scheme()
            )),
            Err(e) => errors.push(format!(
                "token.endpoints[{}] '{}' is not a valid URL: {}",
                idx, endpoint, e
            )),
        }
    }
    if token.request_timeout_seconds == 0 {
        errors.push("token.request_timeout_seconds must be > 0".to_string());
    }
    if let Some(status) = token.form_fallback_status {
        if StatusCode::from_u16(status).is_err() {
            errors.push(format!(
                "token.form_fallback_status '{}' is not a valid HTTP status",
                status
            ));
        }
    }
}

fn validate_credentials(credentials: &CredentialsConfig, errors: &mut Vec<String>) {
    let fields = [
        ("client_id", &credentials.client_id),
        ("client_secret", &credentials.client_secret),
        ("workspace_id", &credentials.workspace_id),
    ];
    for (name, value) in fields {
        if value.trim().is_empty() {
            errors.push(format!("credentials.{} must not be empty", name));
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        assert!(validate_service_config(&ServiceConfig::default()).is_ok());
    }

    #[test]
    fn collects_every_issue() {
        let cfg = ServiceConfig {
            credentials: Some(CredentialsConfig {
                client_id: "id".into(),
                client_secret: "".into(),
                workspace_id: "ws".into(),
            }),
            token: TokenConfig {
                endpoints: vec!["ftp://example.test/token".into(), "not a url".into()],
                request_timeout_seconds: 0,
                safety_margin_seconds: 300,
                form_fallback_status: Some(42),
            },
            ..Default::default()
        };
        let msg = validate_service_config(&cfg).unwrap_err().to_string();
        assert!(msg.contains("unsupported scheme 'ftp'"));
        assert!(msg.contains("token.endpoints[1]"));
        assert!(msg.contains("request_timeout_seconds"));
        assert!(msg.contains("form_fallback_status '42'"));
        assert!(msg.contains("credentials.client_secret"));
    }

    #[test]
    fn empty_endpoint_list_is_rejected() {
        let cfg = ServiceConfig {
            token: TokenConfig {
                endpoints: vec![],
                ..Default::default()
            },
            ..Default::default()
        };
        assert!(validate_service_config(&cfg).is_err());
    }
}
