use clap::Parser;
use serde::{Deserialize, Serialize};
use std::env;
use std::path::PathBuf;

pub const DEFAULT_REDIRECT_URL: &str = "http://localhost:8080/auth/";
pub const DEFAULT_CREDENTIALS_FILE: &str = "clientid.github.json";

/// Command-line flags
#[derive(Debug, Clone, Parser)]
#[command(name = "person-api", version, about = "Person CRUD API with a GitHub-gated private area")]
pub struct Args {
    /// URL to be redirected to after the provider login
    #[arg(long = "redirect", default_value = DEFAULT_REDIRECT_URL)]
    pub redirect: String,

    /// Credential JSON file
    #[arg(long = "cred-file", default_value = DEFAULT_CREDENTIALS_FILE)]
    pub cred_file: PathBuf,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub auth: AuthConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub listen_addr: String,
    pub request_timeout_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
    /// Seconds to wait for a pooled connection
    pub connection_timeout: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    pub redirect_url: String,
    pub credentials_file: PathBuf,
    pub scopes: Vec<String>,
    pub session_name: String,
    /// Signs the session cookie
    pub session_secret: String,
    pub session_ttl_hours: u64,
}

impl AppConfig {
    /// Defaults for the given flags, then environment overrides
    pub fn from_args(args: Args) -> Self {
        Self::defaults(args).with_env_overrides()
    }

    fn defaults(args: Args) -> Self {
        Self {
            server: ServerConfig {
                listen_addr: "localhost:8080".to_string(),
                request_timeout_secs: 30,
            },
            database: DatabaseConfig {
                url: "sqlite://test.db".to_string(),
                max_connections: 5,
                connection_timeout: 5,
            },
            auth: AuthConfig {
                redirect_url: args.redirect,
                credentials_file: args.cred_file,
                scopes: vec!["read:user".to_string()],
                session_name: "person_session".to_string(),
                session_secret: "secret".to_string(),
                session_ttl_hours: 24,
            },
        }
    }

    fn with_env_overrides(mut self) -> Self {
        // Server overrides
        if let Ok(v) = env::var("LISTEN_ADDR") {
            self.server.listen_addr = v;
        }
        if let Ok(v) = env::var("REQUEST_TIMEOUT_SECS") {
            self.server.request_timeout_secs = v.parse().unwrap_or(self.server.request_timeout_secs);
        }

        // Database overrides
        if let Ok(v) = env::var("DATABASE_URL") {
            self.database.url = v;
        }
        if let Ok(v) = env::var("DATABASE_MAX_CONNECTIONS") {
            self.database.max_connections = v.parse().unwrap_or(self.database.max_connections);
        }
        if let Ok(v) = env::var("DATABASE_CONNECTION_TIMEOUT") {
            self.database.connection_timeout = v.parse().unwrap_or(self.database.connection_timeout);
        }

        // Auth overrides
        if let Ok(v) = env::var("SESSION_NAME") {
            self.auth.session_name = v;
        }
        if let Ok(v) = env::var("SESSION_SECRET") {
            self.auth.session_secret = v;
        }
        if let Ok(v) = env::var("SESSION_TTL_HOURS") {
            self.auth.session_ttl_hours = v.parse().unwrap_or(self.auth.session_ttl_hours);
        }
        if let Ok(v) = env::var("OAUTH_SCOPES") {
            self.auth.scopes = v
                .split(',')
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect();
        }

        self
    }
}
