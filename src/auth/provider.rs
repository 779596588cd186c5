use async_trait::async_trait;
use reqwest::header::ACCEPT;
use serde::Deserialize;
use url::Url;

use super::{AuthError, AuthUser, OAuthConfig};

/// OAuth2 authorization-code provider seam
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Where the login handler sends the browser
    fn authorize_url(&self, oauth: &OAuthConfig, state: &str) -> Result<Url, AuthError>;

    /// Trade an authorization code for the user's profile
    async fn exchange(&self, oauth: &OAuthConfig, code: &str) -> Result<AuthUser, AuthError>;
}

/// GitHub endpoints; overridable so tests can point at a mock server
#[derive(Debug, Clone)]
pub struct GitHubEndpoints {
    pub authorize_url: String,
    pub token_url: String,
    pub api_url: String,
}

impl Default for GitHubEndpoints {
    fn default() -> Self {
        Self {
            authorize_url: "https://github.com/login/oauth/authorize".to_string(),
            token_url: "https://github.com/login/oauth/access_token".to_string(),
            api_url: "https://api.github.com".to_string(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: Option<String>,
    error: Option<String>,
    error_description: Option<String>,
}

#[derive(Debug, Deserialize)]
struct GitHubUser {
    login: String,
    name: Option<String>,
    email: Option<String>,
    company: Option<String>,
    html_url: String,
}

impl From<GitHubUser> for AuthUser {
    fn from(user: GitHubUser) -> Self {
        Self {
            login: user.login,
            name: user.name.unwrap_or_default(),
            email: user.email.unwrap_or_default(),
            company: user.company.unwrap_or_default(),
            url: user.html_url,
        }
    }
}

pub struct GitHubProvider {
    client: reqwest::Client,
    endpoints: GitHubEndpoints,
}

impl GitHubProvider {
    pub fn new() -> Result<Self, AuthError> {
        Self::with_endpoints(GitHubEndpoints::default())
    }

    pub fn with_endpoints(endpoints: GitHubEndpoints) -> Result<Self, AuthError> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("person-api/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self { client, endpoints })
    }
}

#[async_trait]
impl IdentityProvider for GitHubProvider {
    fn authorize_url(&self, oauth: &OAuthConfig, state: &str) -> Result<Url, AuthError> {
        let scope = oauth.scopes.join(" ");
        let url = Url::parse_with_params(
            &self.endpoints.authorize_url,
            &[
                ("client_id", oauth.credentials.client_id.as_str()),
                ("redirect_uri", oauth.redirect_url.as_str()),
                ("scope", scope.as_str()),
                ("state", state),
                ("response_type", "code"),
            ],
        )?;
        Ok(url)
    }

    async fn exchange(&self, oauth: &OAuthConfig, code: &str) -> Result<AuthUser, AuthError> {
        let token: TokenResponse = self
            .client
            .post(&self.endpoints.token_url)
            .header(ACCEPT, "application/json")
            .form(&[
                ("client_id", oauth.credentials.client_id.as_str()),
                ("client_secret", oauth.credentials.client_secret.as_str()),
                ("code", code),
                ("redirect_uri", oauth.redirect_url.as_str()),
            ])
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        // GitHub reports a bad code with 200 and an `error` field
        let access_token = match token.access_token {
            Some(t) if !t.is_empty() => t,
            _ => {
                let reason = token
                    .error_description
                    .or(token.error)
                    .unwrap_or_else(|| "no access token in response".to_string());
                return Err(AuthError::Exchange(reason));
            }
        };

        let user: GitHubUser = self
            .client
            .get(format!("{}/user", self.endpoints.api_url.trim_end_matches('/')))
            .bearer_auth(access_token)
            .header(ACCEPT, "application/vnd.github+json")
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        tracing::debug!(login = %user.login, "fetched GitHub profile");
        Ok(user.into())
    }
}
