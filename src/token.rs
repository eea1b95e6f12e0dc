//! Manage json web tokens.

use std::time::{SystemTime, SystemTimeError, UNIX_EPOCH};

use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{
    Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode,
};
use serde::{Deserialize, Serialize};

/// Token lifetime in seconds: 7 days.
pub const EXPIRATION_TIME: u64 = 60 * 60 * 24 * 7;

/// Pieces of information asserted on a JWT.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct Claims {
    /// User ID.
    pub sub: String,
    /// Identifies the time at which the JWT was issued.
    pub iat: u64,
    /// Identifies the expiration time on or after which the JWT must not be
    /// accepted for processing.
    pub exp: u64,
}

/// Why a token was rejected.
#[derive(Debug, thiserror::Error)]
pub enum TokenError {
    #[error("token has expired")]
    Expired,
    #[error("token signature does not match")]
    InvalidSignature,
    #[error("token is malformed")]
    Malformed,
    #[error("system clock is set before the unix epoch")]
    Clock(#[from] SystemTimeError),
    #[error("token could not be signed: {0}")]
    Signing(jsonwebtoken::errors::Error),
}

/// Manage JWT tokens signed with a server-held secret.
#[derive(Clone)]
pub struct TokenManager {
    algorithm: Algorithm,
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
}

impl TokenManager {
    /// Create a new [`TokenManager`] instance.
    pub fn new(secret: &str) -> Self {
        Self {
            algorithm: Algorithm::HS256,
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
        }
    }

    /// Create a new token expiring [`EXPIRATION_TIME`] seconds from now.
    pub fn create(&self, user_id: &str) -> Result<String, TokenError> {
        let now = unix_now()?;
        self.create_with_expiry(user_id, now + EXPIRATION_TIME)
    }

    /// Create a new token with an explicit expiration timestamp.
    pub fn create_with_expiry(
        &self,
        user_id: &str,
        expires_at: u64,
    ) -> Result<String, TokenError> {
        let claims = Claims {
            sub: user_id.to_owned(),
            iat: unix_now()?,
            exp: expires_at,
        };

        encode(&Header::new(self.algorithm), &claims, &self.encoding_key)
            .map_err(TokenError::Signing)
    }

    /// Decode and check a token. Pure computation, no I/O.
    pub fn decode(&self, token: &str) -> Result<Claims, TokenError> {
        let validation = Validation::new(self.algorithm);

        decode::<Claims>(token, &self.decoding_key, &validation)
            .map(|data| data.claims)
            .map_err(|err| match err.kind() {
                ErrorKind::ExpiredSignature => TokenError::Expired,
                ErrorKind::InvalidSignature => TokenError::InvalidSignature,
                _ => TokenError::Malformed,
            })
    }
}

fn unix_now() -> Result<u64, SystemTimeError> {
    Ok(SystemTime::now().duration_since(UNIX_EPOCH)?.as_secs())
}
