use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use super::{AuthError, AuthUser};

/// What the session cookie remembers between requests
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SessionData {
    /// Pending OAuth2 `state` issued by the login handler
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user: Option<AuthUser>,
}

#[derive(Debug, Serialize, Deserialize)]
struct SessionClaims {
    #[serde(flatten)]
    data: SessionData,
    exp: i64,
    iat: i64,
}

/// Signs and verifies session cookie values (HS256)
#[derive(Clone)]
pub struct SessionCodec {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    ttl: Duration,
}

impl SessionCodec {
    pub fn new(secret: &[u8], ttl: Duration) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            ttl,
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    pub fn encode(&self, data: &SessionData) -> Result<String, AuthError> {
        let now = Utc::now();
        let claims = SessionClaims {
            data: data.clone(),
            exp: (now + self.ttl).timestamp(),
            iat: now.timestamp(),
        };
        encode(&Header::default(), &claims, &self.encoding_key).map_err(AuthError::Session)
    }

    /// `None` for tampered, expired or foreign cookies
    pub fn decode(&self, token: &str) -> Option<SessionData> {
        match decode::<SessionClaims>(token, &self.decoding_key, &Validation::default()) {
            Ok(token_data) => Some(token_data.claims.data),
            Err(e) => {
                tracing::debug!("Discarding session cookie: {}", e);
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user() -> AuthUser {
        AuthUser {
            login: "octocat".into(),
            name: "The Octocat".into(),
            email: "octocat@github.com".into(),
            company: "GitHub".into(),
            url: "https://github.com/octocat".into(),
        }
    }

    #[test]
    fn encoded_session_decodes_with_same_secret() {
        let codec = SessionCodec::new(b"secret", Duration::hours(1));
        let data = SessionData { state: Some("abc".into()), user: Some(user()) };

        let token = codec.encode(&data).unwrap();
        assert_eq!(codec.decode(&token), Some(data));
    }

    #[test]
    fn foreign_secret_is_rejected() {
        let issuer = SessionCodec::new(b"secret", Duration::hours(1));
        let verifier = SessionCodec::new(b"other", Duration::hours(1));
        let token = issuer.encode(&SessionData { state: None, user: Some(user()) }).unwrap();

        assert_eq!(verifier.decode(&token), None);
    }

    #[test]
    fn tampered_token_is_rejected() {
        let codec = SessionCodec::new(b"secret", Duration::hours(1));
        let token = codec.encode(&SessionData::default()).unwrap();
        let mut tampered = token.clone();
        tampered.push('x');

        assert_eq!(codec.decode(&tampered), None);
        assert_eq!(codec.decode("not-a-token"), None);
    }

    #[test]
    fn expired_session_is_rejected() {
        let codec = SessionCodec::new(b"secret", Duration::hours(-2));
        let token = codec.encode(&SessionData { state: None, user: Some(user()) }).unwrap();

        assert_eq!(codec.decode(&token), None);
    }
}
