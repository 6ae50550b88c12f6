//! Signed, time-limited access tokens.
//!
//! Tokens are compact HS256 JWTs carrying the user id, email and an `exp`
//! claim. Nothing is stored server-side: a token is valid exactly when its
//! signature matches the configured key and `exp` is still in the future, so
//! issuer and verifier need reasonably synchronized clocks.

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{
    decode, encode, errors::ErrorKind, Algorithm, DecodingKey, EncodingKey, Header, Validation,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::AuthConfig;

/// Who a token is issued for
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    pub id: String,
    pub email: String,
}

/// JWT claims. `exp` is a unix timestamp in seconds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    pub id: String,
    pub email: String,
    pub exp: i64,
}

impl Claims {
    pub fn identity(&self) -> Identity {
        Identity {
            id: self.id.clone(),
            email: self.email.clone(),
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TokenError {
    #[error("failed to sign token: {0}")]
    Signing(String),

    #[error("token signature is invalid")]
    InvalidSignature,

    #[error("token has expired")]
    Expired,

    #[error("token is malformed: {0}")]
    Malformed(String),
}

/// Issues and verifies access tokens with a pre-shared symmetric key.
pub struct TokenCodec {
    key: Vec<u8>,
    lifetime: Duration,
}

impl TokenCodec {
    pub fn new(key: impl Into<Vec<u8>>, lifetime: Duration) -> Self {
        Self {
            key: key.into(),
            lifetime,
        }
    }

    pub fn from_config(config: &AuthConfig) -> Self {
        let lifetime = Duration::try_minutes(config.jwt_expired_min).unwrap_or(Duration::MAX);
        Self::new(config.jwt_key.as_bytes().to_vec(), lifetime)
    }

    pub fn lifetime(&self) -> Duration {
        self.lifetime
    }

    /// Issue a token for `identity` expiring `lifetime` from now
    pub fn issue(&self, identity: &Identity) -> Result<String, TokenError> {
        self.issue_at(identity, Utc::now())
    }

    /// Issue a token as if the current time were `now`
    pub fn issue_at(&self, identity: &Identity, now: DateTime<Utc>) -> Result<String, TokenError> {
        if self.key.is_empty() {
            return Err(TokenError::Signing("signing key is empty".to_string()));
        }

        let expires_at = now
            .checked_add_signed(self.lifetime)
            .ok_or_else(|| TokenError::Signing("token lifetime is out of range".to_string()))?;

        let claims = Claims {
            id: identity.id.clone(),
            email: identity.email.clone(),
            exp: expires_at.timestamp(),
        };

        encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(&self.key),
        )
        .map_err(|e| TokenError::Signing(e.to_string()))
    }

    /// Check signature and expiry, returning the embedded claims
    pub fn verify(&self, token: &str) -> Result<Claims, TokenError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;

        decode::<Claims>(token, &DecodingKey::from_secret(&self.key), &validation)
            .map(|data| data.claims)
            .map_err(|e| match e.kind() {
                ErrorKind::InvalidSignature => TokenError::InvalidSignature,
                ErrorKind::ExpiredSignature => TokenError::Expired,
                _ => TokenError::Malformed(e.to_string()),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn identity() -> Identity {
        Identity {
            id: "user-1".to_string(),
            email: "tenant@example.com".to_string(),
        }
    }

    fn codec(key: &str) -> TokenCodec {
        TokenCodec::new(key.as_bytes().to_vec(), Duration::minutes(30))
    }

    #[test]
    fn test_issue_then_verify() {
        let codec = codec("room-secret");
        let token = codec.issue(&identity()).unwrap();

        assert_eq!(token.split('.').count(), 3);

        let claims = codec.verify(&token).unwrap();
        assert_eq!(claims.identity(), identity());
        assert!(claims.exp > Utc::now().timestamp());
    }

    #[test]
    fn test_expiration_uses_lifetime() {
        let codec = codec("room-secret");
        let now = Utc::now();
        let token = codec.issue_at(&identity(), now).unwrap();

        let claims = codec.verify(&token).unwrap();
        assert_eq!(claims.exp, (now + Duration::minutes(30)).timestamp());
    }

    #[test]
    fn test_expired_token_rejected() {
        let codec = codec("room-secret");
        let issued = Utc::now() - Duration::hours(2);
        let token = codec.issue_at(&identity(), issued).unwrap();

        assert_eq!(codec.verify(&token), Err(TokenError::Expired));
    }

    #[test]
    fn test_wrong_key_rejected() {
        let token = codec("room-secret").issue(&identity()).unwrap();
        let result = codec("another-secret").verify(&token);

        assert_eq!(result, Err(TokenError::InvalidSignature));
    }

    #[test]
    fn test_garbage_is_malformed() {
        let codec = codec("room-secret");
        assert!(matches!(codec.verify("not-a-token"), Err(TokenError::Malformed(_))));
        assert!(matches!(codec.verify(""), Err(TokenError::Malformed(_))));
        assert!(matches!(codec.verify("a.b.c"), Err(TokenError::Malformed(_))));
    }

    #[test]
    fn test_other_algorithm_is_malformed() {
        let claims = Claims {
            id: "user-1".to_string(),
            email: "tenant@example.com".to_string(),
            exp: (Utc::now() + Duration::minutes(5)).timestamp(),
        };
        let token = encode(
            &Header::new(Algorithm::HS512),
            &claims,
            &EncodingKey::from_secret(b"room-secret"),
        )
        .unwrap();

        assert!(matches!(codec("room-secret").verify(&token), Err(TokenError::Malformed(_))));
    }

    #[test]
    fn test_empty_key_cannot_sign() {
        let codec = TokenCodec::new(Vec::new(), Duration::minutes(5));
        assert!(matches!(codec.issue(&identity()), Err(TokenError::Signing(_))));
    }

    #[test]
    fn test_oversized_lifetime_cannot_sign() {
        let codec = TokenCodec::new(b"room-secret".to_vec(), Duration::minutes(1_000_000_000_000));
        assert!(matches!(codec.issue(&identity()), Err(TokenError::Signing(_))));

        let config = AuthConfig {
            jwt_key: "room-secret".to_string(),
            jwt_expired_min: i64::MAX,
            ..AuthConfig::default()
        };
        let codec = TokenCodec::from_config(&config);
        assert!(matches!(codec.issue(&identity()), Err(TokenError::Signing(_))));
    }

    #[test]
    fn test_from_config() {
        let config = AuthConfig {
            jwt_key: "from-config".to_string(),
            jwt_expired_min: 15,
            ..AuthConfig::default()
        };
        let codec = TokenCodec::from_config(&config);
        assert_eq!(codec.lifetime(), Duration::minutes(15));
        assert!(codec.verify(&codec.issue(&identity()).unwrap()).is_ok());
    }
}
