//! # Authweave Token
//!
//! Signed, client-held session tokens for the authweave framework. Sessions
//! are encoded JWTs (HS256) carried in a cookie; there is no server-side
//! session store.

#![warn(missing_docs)]

use authweave_core::{AuthError, SessionToken};
use chrono::Utc;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

/// The claims carried by a session JWT.
///
/// The enriched session token is flattened into the claim set, so the wire
/// shape is `{id, name, email, profileUrl, iat, exp}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// The enriched session token.
    #[serde(flatten)]
    pub session: SessionToken,
    /// Issued-at, unix seconds.
    pub iat: i64,
    /// Expiry, unix seconds.
    pub exp: i64,
    /// Issuer, when configured.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub iss: Option<String>,
}

/// Signs and validates session JWTs.
#[derive(Clone)]
pub struct TokenManager {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    issuer: Option<String>,
}

impl TokenManager {
    /// Create a manager signing with the given HS256 secret.
    pub fn new(secret: &[u8]) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            issuer: None,
        }
    }

    /// Set the `iss` claim to embed in issued tokens and require on validation.
    pub fn with_issuer(mut self, issuer: impl Into<String>) -> Self {
        self.issuer = Some(issuer.into());
        self
    }

    /// Sign a session token; `max_age` bounds the `exp` claim.
    pub fn issue_session_token(
        &self,
        session: &SessionToken,
        max_age: chrono::Duration,
    ) -> Result<String, AuthError> {
        let now = Utc::now();
        let claims = Claims {
            session: session.clone(),
            iat: now.timestamp(),
            exp: (now + max_age).timestamp(),
            iss: self.issuer.clone(),
        };

        encode(&Header::default(), &claims, &self.encoding_key)
            .map_err(|e| AuthError::Token(e.to_string()))
    }

    /// Validate a session JWT and return its claims.
    ///
    /// Expired or tampered tokens surface as [`AuthError::Token`].
    pub fn validate_session_token(&self, token: &str) -> Result<Claims, AuthError> {
        let mut validation = Validation::new(Algorithm::HS256);
        if let Some(issuer) = &self.issuer {
            validation.set_issuer(&[issuer]);
        }

        let token_data = decode::<Claims>(token, &self.decoding_key, &validation)
            .map_err(|e| AuthError::Token(e.to_string()))?;

        Ok(token_data.claims)
    }
}
