pub mod password;

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use crate::config::SecurityConfig;

pub use password::{hash_password, verify_dummy, verify_password};

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Token generation failed: {0}")]
    TokenGeneration(String),

    #[error("Token expired")]
    Expired,

    #[error("Invalid token: {0}")]
    InvalidToken(String),

    #[error("Password hashing failed: {0}")]
    Hashing(String),
}

#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: Uuid,
    pub iss: String,
    pub iat: i64,
    pub exp: i64,
}

/// Bearer token issued at login.
#[derive(Debug, Serialize)]
pub struct AccessToken {
    pub access_token: String,
    pub token_type: &'static str,
    /// Seconds until the token expires.
    pub expires_in: i64,
}

/// Password hashing plus HS256 token issue/validation, keyed from configuration.
#[derive(Clone)]
pub struct CredentialVerifier {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    issuer: String,
    ttl: Duration,
}

impl CredentialVerifier {
    pub fn new(security: &SecurityConfig) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(security.jwt_secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(security.jwt_secret.as_bytes()),
            issuer: security.jwt_issuer.clone(),
            ttl: Duration::minutes(security.jwt_expiry_minutes),
        }
    }

    /// Argon2 work runs on the blocking pool, off the async workers.
    pub async fn hash(&self, secret: &str) -> Result<String, AuthError> {
        let secret = secret.to_owned();
        blocking(move || hash_password(&secret)).await
    }

    pub async fn verify(&self, secret: &str, digest: &str) -> Result<bool, AuthError> {
        let (secret, digest) = (secret.to_owned(), digest.to_owned());
        blocking(move || verify_password(&secret, &digest)).await
    }

    /// Same cost as [`verify`](Self::verify), for a login whose email matched nothing.
    pub async fn verify_unknown(&self, secret: &str) -> Result<(), AuthError> {
        let secret = secret.to_owned();
        blocking(move || {
            verify_dummy(&secret);
            Ok(())
        })
        .await
    }

    pub fn issue(&self, subject: Uuid) -> Result<AccessToken, AuthError> {
        let now = Utc::now();
        let claims = Claims {
            sub: subject,
            iss: self.issuer.clone(),
            iat: now.timestamp(),
            exp: (now + self.ttl).timestamp(),
        };
        let token = encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| AuthError::TokenGeneration(e.to_string()))?;
        Ok(AccessToken {
            access_token: token,
            token_type: "bearer",
            expires_in: self.ttl.num_seconds(),
        })
    }

    /// Returns the subject of a token with a valid signature, issuer and expiry.
    pub fn validate(&self, token: &str) -> Result<Uuid, AuthError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_issuer(&[&self.issuer]);
        validation.leeway = 0;

        decode::<Claims>(token, &self.decoding_key, &validation)
            .map(|data| data.claims.sub)
            .map_err(|e| match e.kind() {
                jsonwebtoken::errors::ErrorKind::ExpiredSignature => AuthError::Expired,
                _ => AuthError::InvalidToken(e.to_string()),
            })
    }
}

async fn blocking<T, F>(work: F) -> Result<T, AuthError>
where
    T: Send + 'static,
    F: FnOnce() -> Result<T, AuthError> + Send + 'static,
{
    tokio::task::spawn_blocking(work)
        .await
        .map_err(|e| AuthError::Hashing(e.to_string()))?
}

impl std::fmt::Debug for CredentialVerifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CredentialVerifier")
            .field("issuer", &self.issuer)
            .field("ttl", &self.ttl)
            .finish_non_exhaustive()
    }
}
