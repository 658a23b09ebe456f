/// Access-token issuance and validation (HS256).
///
/// The codec is built once from the signing secret and shared across the
/// application; nothing here reaches into ambient configuration. Tokens from
/// any other issuer tag fail validation even when signed with the same
/// secret, which keeps differently-scoped token types from being replayed
/// as access tokens.
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use uuid::Uuid;

use crate::auth::claims::Claims;
use crate::error::AuthError;

/// Issuer tag stamped into every access token.
pub const ACCESS_TOKEN_ISSUER: &str = "bulletin-access";

#[derive(Clone)]
pub struct AccessTokenCodec {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
}

impl AccessTokenCodec {
    pub fn new(secret: &str) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_issuer(&[ACCESS_TOKEN_ISSUER]);
        // Expiry is strict: a token one second past exp is rejected.
        validation.leeway = 0;

        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            validation,
        }
    }

    /// Issue a signed access token for `user_id`, valid for `ttl` from now.
    ///
    /// # Errors
    /// `SigningFailure` if claim serialization or signing fails.
    pub fn issue(&self, user_id: Uuid, ttl: chrono::Duration) -> Result<String, AuthError> {
        let claims = Claims::new(user_id, ttl, ACCESS_TOKEN_ISSUER);

        encode(&Header::default(), &claims, &self.encoding_key)
            .map_err(|e| AuthError::SigningFailure(e.to_string()))
    }

    /// Validate a token and return its subject user ID.
    ///
    /// Checks run in a fixed order, and the reported kind is the first
    /// failing check: signature, then expiry, then issuer. Structural or
    /// claim decoding problems report `TokenMalformed`.
    pub fn validate(&self, token: &str) -> Result<Uuid, AuthError> {
        let data = decode::<Claims>(token, &self.decoding_key, &self.validation).map_err(|e| {
            match e.kind() {
                ErrorKind::InvalidSignature => AuthError::SignatureInvalid,
                ErrorKind::ExpiredSignature => AuthError::TokenExpired,
                ErrorKind::InvalidIssuer => AuthError::IssuerMismatch,
                _ => AuthError::TokenMalformed,
            }
        })?;

        data.claims.user_id()
    }
}
