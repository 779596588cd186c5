use std::fmt;
use std::path::{Path, PathBuf};

use chrono::Duration;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use url::Url;

use crate::config::AuthConfig;

pub mod provider;
pub mod session;

pub use provider::{GitHubEndpoints, GitHubProvider, IdentityProvider};
pub use session::{SessionCodec, SessionData};

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Failed to read credentials file {path}: {source}")]
    CredentialsUnreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid credentials file {path}: {source}")]
    CredentialsInvalid {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("OAuth2 state does not match the session")]
    StateMismatch,

    #[error("Token exchange rejected: {0}")]
    Exchange(String),

    #[error("Identity provider request failed: {0}")]
    Provider(#[from] reqwest::Error),

    #[error("Session signing failed: {0}")]
    Session(#[source] jsonwebtoken::errors::Error),
}

/// OAuth2 application credentials, as stored in the credentials file
#[derive(Clone, Deserialize)]
pub struct Credentials {
    #[serde(rename = "clientid")]
    pub client_id: String,
    #[serde(rename = "secret")]
    pub client_secret: String,
}

impl Credentials {
    pub fn from_file(path: &Path) -> Result<Self, AuthError> {
        let raw = std::fs::read_to_string(path).map_err(|source| AuthError::CredentialsUnreadable {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&raw).map_err(|source| AuthError::CredentialsInvalid {
            path: path.to_path_buf(),
            source,
        })
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("client_id", &self.client_id)
            .field("client_secret", &"<redacted>")
            .finish()
    }
}

/// Authenticated user descriptor handed to protected handlers
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthUser {
    pub login: String,
    pub name: String,
    pub email: String,
    pub company: String,
    pub url: String,
}

/// Immutable OAuth2 client configuration, built once at startup
#[derive(Clone)]
pub struct OAuthConfig {
    pub credentials: Credentials,
    pub redirect_url: Url,
    pub scopes: Vec<String>,
    pub session_name: String,
    pub sessions: SessionCodec,
}

impl OAuthConfig {
    /// Load the credentials file and assemble the client configuration
    pub fn setup(config: &AuthConfig) -> Result<Self, AuthError> {
        let credentials = Credentials::from_file(&config.credentials_file)?;
        let oauth = Self::new(credentials, config)?;
        tracing::info!(
            "OAuth2 configured for client {} (redirect {})",
            oauth.credentials.client_id,
            oauth.redirect_url
        );
        Ok(oauth)
    }

    pub fn new(credentials: Credentials, config: &AuthConfig) -> Result<Self, AuthError> {
        let redirect_url = Url::parse(&config.redirect_url)?;
        let ttl = Duration::hours(config.session_ttl_hours as i64);

        Ok(Self {
            credentials,
            redirect_url,
            scopes: config.scopes.clone(),
            session_name: config.session_name.clone(),
            sessions: SessionCodec::new(config.session_secret.as_bytes(), ttl),
        })
    }
}

impl fmt::Debug for OAuthConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OAuthConfig")
            .field("credentials", &self.credentials)
            .field("redirect_url", &self.redirect_url.as_str())
            .field("scopes", &self.scopes)
            .field("session_name", &self.session_name)
            .finish_non_exhaustive()
    }
}
