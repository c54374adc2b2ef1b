use std::fmt;

use crate::errors::TokenError;

/// Client-credentials triple for a single workspace.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    client_id: String,
    client_secret: String,
    workspace_id: String,
}

impl Credentials {
    /// Every field is required; blank values are rejected with the offending field name.
    pub fn new(
        client_id: impl Into<String>,
        client_secret: impl Into<String>,
        workspace_id: impl Into<String>,
    ) -> Result<Self, TokenError> {
        let client_id = required("client_id", client_id.into())?;
        let client_secret = required("client_secret", client_secret.into())?;
        let workspace_id = required("workspace_id", workspace_id.into())?;
        Ok(Self {
            client_id,
            client_secret,
            workspace_id,
        })
    }

    pub fn client_id(&self) -> &str {
        &self.client_id
    }

    pub fn client_secret(&self) -> &str {
        &self.client_secret
    }

    pub fn workspace_id(&self) -> &str {
        &self.workspace_id
    }

    pub fn scope(&self) -> String {
        format!("workspace:{}", self.workspace_id)
    }
}

fn required(field: &'static str, value: String) -> Result<String, TokenError> {
    if value.trim().is_empty() {
        return Err(TokenError::InvalidArgument { field });
    }
    Ok(value)
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("client_id", &self.client_id)
            .field("client_secret", &"<redacted>")
            .field("workspace_id", &self.workspace_id)
            .finish()
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn rejects_blank_fields() {
        let err = Credentials::new("id", "  ", "ws").unwrap_err();
        assert!(matches!(err, TokenError::InvalidArgument { field: "client_secret" }));

        let err = Credentials::new("", "secret", "ws").unwrap_err();
        assert!(matches!(err, TokenError::InvalidArgument { field: "client_id" }));

        let err = Credentials::new("id", "secret", "").unwrap_err();
        assert!(matches!(err, TokenError::InvalidArgument { field: "workspace_id" }));
    }

    #[test]
    fn scope_is_workspace_prefixed() {
        let creds = Credentials::new("id", "s3cr3t-value", "ws-42").unwrap();
        assert_eq!(creds.scope(), "workspace:ws-42");
        assert!(!format!("{:?}", creds).contains("s3cr3t-value"));
    }
}
