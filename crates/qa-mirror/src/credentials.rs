//! Credential material for the remote sheet.
//!
//! The file is JSON in one of two shapes:
//!
//! - a Google service-account key file (`"type": "service_account"` with a
//!   `private_key`). Access tokens are minted from it with the OAuth JWT
//!   bearer flow for [`SCOPES`] and refreshed before they expire.
//! - an object carrying a ready `access_token` (for example one printed by
//!   `gcloud auth print-access-token`). Used as-is; it is never refreshed.

use crate::MirrorError;
use async_trait::async_trait;
use std::path::Path;
use std::sync::Arc;
use yup_oauth2::authenticator::DefaultAuthenticator;
use yup_oauth2::{ServiceAccountAuthenticator, ServiceAccountKey};

/// Drive (lookup, create) and Sheets (append) access.
pub const SCOPES: [&str; 2] = [
    "https://spreadsheets.google.com/feeds",
    "https://www.googleapis.com/auth/drive",
];

#[derive(Clone)]
pub enum Credentials {
    ServiceAccount(ServiceAccountKey),
    AccessToken(String),
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Credentials::ServiceAccount(key) => f
                .debug_struct("ServiceAccount")
                .field("client_email", &key.client_email)
                .field("token_uri", &key.token_uri)
                .finish_non_exhaustive(),
            Credentials::AccessToken(_) => f.debug_tuple("AccessToken").field(&"<redacted>").finish(),
        }
    }
}

impl Credentials {
    pub fn from_file(path: &Path) -> Result<Self, MirrorError> {
        let err = |reason: String| MirrorError::Credentials {
            path: path.to_path_buf(),
            reason,
        };
        let text = std::fs::read_to_string(path).map_err(|e| err(e.to_string()))?;
        let doc: serde_json::Value =
            serde_json::from_str(&text).map_err(|e| err(e.to_string()))?;

        if doc.get("private_key").is_some() {
            let key = yup_oauth2::parse_service_account_key(text.as_bytes())
                .map_err(|e| err(format!("invalid service-account key: {e}")))?;
            return Ok(Credentials::ServiceAccount(key));
        }

        match doc.get("access_token").and_then(|t| t.as_str()) {
            Some(token) if !token.trim().is_empty() => Ok(Credentials::AccessToken(token.to_string())),
            Some(_) => Err(err("access_token is empty".to_string())),
            None => Err(err(
                "expected a service-account key (private_key) or an access_token".to_string(),
            )),
        }
    }

    pub fn client_email(&self) -> Option<&str> {
        match self {
            Credentials::ServiceAccount(key) => Some(key.client_email.as_str()),
            Credentials::AccessToken(_) => None,
        }
    }

    /// Turn the credentials into something that hands out bearer tokens.
    pub async fn token_source(&self) -> Result<Arc<dyn TokenSource>, MirrorError> {
        match self {
            Credentials::AccessToken(token) => Ok(Arc::new(StaticToken(token.clone()))),
            Credentials::ServiceAccount(key) => {
                let auth = ServiceAccountAuthenticator::builder(key.clone())
                    .build()
                    .await
                    .map_err(|e| MirrorError::Token(e.to_string()))?;
                tracing::debug!(client_email = %key.client_email, "service-account authenticator ready");
                Ok(Arc::new(ServiceAccountTokens { auth }))
            }
        }
    }
}

/// Source of the bearer token sent with every request.
#[async_trait]
pub trait TokenSource: Send + Sync {
    async fn access_token(&self) -> Result<String, MirrorError>;
}

/// A fixed token.
pub struct StaticToken(pub String);

#[async_trait]
impl TokenSource for StaticToken {
    async fn access_token(&self) -> Result<String, MirrorError> {
        Ok(self.0.clone())
    }
}

/// Tokens minted from a service-account key; cached by the authenticator
/// until shortly before expiry.
struct ServiceAccountTokens {
    auth: DefaultAuthenticator,
}

#[async_trait]
impl TokenSource for ServiceAccountTokens {
    async fn access_token(&self) -> Result<String, MirrorError> {
        let token = self
            .auth
            .token(&SCOPES)
            .await
            .map_err(|e| MirrorError::Token(e.to_string()))?;
        token
            .token()
            .map(str::to_string)
            .ok_or_else(|| MirrorError::Token("token endpoint returned no access token".to_string()))
    }
}
