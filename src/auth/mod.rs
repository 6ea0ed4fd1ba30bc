use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::ApiError;

pub mod password;

#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    /// Subject: the principal's user id
    pub sub: Uuid,
    /// Unique token id, so two logins in the same second still yield
    /// distinct tokens
    pub jti: Uuid,
    pub iat: i64,
    pub exp: i64,
}

impl Claims {
    pub fn new(subject: Uuid, ttl: Duration) -> Self {
        let now = Utc::now();
        Self {
            sub: subject,
            jti: Uuid::new_v4(),
            iat: now.timestamp(),
            exp: (now + ttl).timestamp(),
        }
    }
}

/// Issues and verifies signed bearer tokens. Constructed once at startup and
/// shared read-only across requests; the session store remains the authority
/// on whether an issued token is still usable.
pub struct TokenService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    ttl: Duration,
}

impl TokenService {
    pub fn new(secret: &str, ttl: Duration) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            ttl,
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Sign a token embedding the subject id and a TTL-derived expiry.
    pub fn issue(&self, subject: Uuid) -> Result<String, ApiError> {
        let claims = Claims::new(subject, self.ttl);
        encode(&Header::default(), &claims, &self.encoding_key).map_err(|e| {
            tracing::error!("token generation failed: {}", e);
            ApiError::unexpected()
        })
    }

    /// Verify signature, structure and embedded expiry. Fails closed: any
    /// defect yields the same 401.
    pub fn verify(&self, token: &str) -> Result<Uuid, ApiError> {
        decode::<Claims>(token, &self.decoding_key, &Validation::default())
            .map(|data| data.claims.sub)
            .map_err(|_| ApiError::unauthenticated("Invalid token"))
    }
}
