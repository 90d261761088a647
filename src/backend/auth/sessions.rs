/**
 * Session Tokens and Identity Verification
 *
 * This module handles JWT token generation and validation. A token is the
 * credential a client presents on the socket handshake; verifying it yields
 * the `UserIdentity` bound to the connection for its whole lifetime.
 *
 * Tokens are HS256-signed and carry `sub` (user id), `name` (display name),
 * `iat` and `exp`. Verification is pure: it checks signature and expiry and
 * touches no shared state.
 */

use crate::shared::ChatError;
use chrono::Utc;
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// JWT claims structure
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Claims {
    /// User ID
    pub sub: String,
    /// Display name
    #[serde(default)]
    pub name: String,
    /// Expiration time (Unix timestamp)
    pub exp: u64,
    /// Issued at time (Unix timestamp)
    pub iat: u64,
}

/// Verified identity of a user
///
/// Produced only by [`TokenKeys::verify`]; immutable once bound to a
/// connection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserIdentity {
    pub user_id: Uuid,
    pub display_name: String,
}

/// Signing and verification keys plus the token lifetime
#[derive(Clone)]
pub struct TokenKeys {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
    ttl_secs: u64,
}

impl fmt::Debug for TokenKeys {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenKeys")
            .field("ttl_secs", &self.ttl_secs)
            .finish_non_exhaustive()
    }
}

impl TokenKeys {
    /// Create keys from a shared secret
    ///
    /// # Arguments
    /// * `secret` - HMAC secret
    /// * `ttl_secs` - Lifetime of issued tokens
    pub fn new(secret: &str, ttl_secs: u64) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            validation: Validation::default(),
            ttl_secs,
        }
    }

    /// Create a token for a user
    ///
    /// # Returns
    /// Signed JWT string valid for the configured lifetime
    pub fn create_token(&self, identity: &UserIdentity) -> Result<String, jsonwebtoken::errors::Error> {
        let now = unix_now();
        let claims = Claims {
            sub: identity.user_id.to_string(),
            name: identity.display_name.clone(),
            exp: now + self.ttl_secs,
            iat: now,
        };
        self.sign(&claims)
    }

    /// Sign arbitrary claims
    pub fn sign(&self, claims: &Claims) -> Result<String, jsonwebtoken::errors::Error> {
        encode(&Header::default(), claims, &self.encoding)
    }

    /// Verify and decode a JWT token
    pub fn verify_token(&self, token: &str) -> Result<Claims, jsonwebtoken::errors::Error> {
        let token_data = decode::<Claims>(token, &self.decoding, &self.validation)?;
        Ok(token_data.claims)
    }

    /// Resolve a presented credential to a user identity
    ///
    /// # Errors
    ///
    /// `ChatError::Unauthenticated` when the credential is missing, malformed,
    /// expired, signed with another key, or names no valid user id.
    pub fn verify(&self, credential: Option<&str>) -> Result<UserIdentity, ChatError> {
        let token = credential
            .map(str::trim)
            .filter(|token| !token.is_empty())
            .ok_or_else(|| ChatError::unauthenticated("missing credential"))?;

        let claims = self.verify_token(token).map_err(|err| {
            let reason = match err.kind() {
                ErrorKind::ExpiredSignature => "credential expired",
                ErrorKind::InvalidSignature => "invalid credential signature",
                _ => "malformed credential",
            };
            ChatError::unauthenticated(reason)
        })?;

        let user_id = Uuid::parse_str(&claims.sub)
            .map_err(|_| ChatError::unauthenticated("malformed credential"))?;

        Ok(UserIdentity {
            user_id,
            display_name: claims.name,
        })
    }
}

fn unix_now() -> u64 {
    u64::try_from(Utc::now().timestamp()).unwrap_or_default()
}
