/// Session lifecycle
///
/// Ties credential verification, access-token issuance, and refresh
/// sessions together. Every failure that reaches a client goes through
/// `AppError`, so the HTTP layer decides how much detail to reveal.
use std::sync::Arc;

use chrono::{Duration, Utc};
use uuid::Uuid;

use crate::auth::jwt::AccessTokenCodec;
use crate::auth::password::verify_password;
use crate::auth::refresh_token::generate_refresh_token;
use crate::error::{AppError, AuthError, DatabaseError};
use crate::store::{CredentialStore, RefreshTokenStore, UserRecord};

/// How many times a colliding refresh token is regenerated before the
/// login is abandoned.
const REFRESH_INSERT_ATTEMPTS: u32 = 3;

/// Everything a successful login hands back to the client.
pub struct IssuedSession {
    pub user: UserRecord,
    pub access_token: String,
    pub refresh_token: String,
}

pub struct SessionLifecycle {
    users: Arc<dyn CredentialStore>,
    sessions: Arc<dyn RefreshTokenStore>,
    codec: AccessTokenCodec,
    access_token_ttl: Duration,
    refresh_token_ttl: Duration,
}

impl SessionLifecycle {
    pub fn new(
        users: Arc<dyn CredentialStore>,
        sessions: Arc<dyn RefreshTokenStore>,
        codec: AccessTokenCodec,
        access_token_ttl: Duration,
        refresh_token_ttl: Duration,
    ) -> Self {
        Self {
            users,
            sessions,
            codec,
            access_token_ttl,
            refresh_token_ttl,
        }
    }

    /// Verify credentials and open a new session.
    ///
    /// Returns the account plus a fresh access token and refresh
    /// token. Unknown emails, wrong passwords, and unreadable stored
    /// hashes all surface as authentication failures.
    pub async fn login(&self, email: &str, password: &str) -> Result<IssuedSession, AppError> {
        let user = self
            .users
            .find_user_by_email(email)
            .await?
            .ok_or(AuthError::UnknownUser)?;

        verify_password(password, &user.password_hash)?;

        let access_token = self.codec.issue(user.id, self.access_token_ttl)?;
        let refresh_token = self.persist_new_refresh_token(user.id).await?;

        Ok(IssuedSession {
            user,
            access_token,
            refresh_token,
        })
    }

    /// Exchange a live refresh token for a new access token.
    ///
    /// The refresh token stays valid afterwards; revoked and expired
    /// sessions are rejected without detail.
    pub async fn refresh(&self, refresh_token: &str) -> Result<String, AppError> {
        let record = self
            .sessions
            .find_by_token(refresh_token)
            .await?
            .ok_or(AuthError::UnknownToken)?;

        if record.is_revoked() {
            tracing::warn!(user_id = %record.user_id, "refresh attempted on a revoked session");
            return Err(AuthError::SessionInvalid.into());
        }
        if record.is_expired() {
            tracing::info!(user_id = %record.user_id, "refresh attempted on an expired session");
            return Err(AuthError::SessionInvalid.into());
        }

        let access_token = self.codec.issue(record.user_id, self.access_token_ttl)?;
        Ok(access_token)
    }

    /// Close the session behind a refresh token.
    ///
    /// Revoking twice is fine; the first revocation timestamp wins.
    /// Only a token that was never stored is an error.
    pub async fn revoke(&self, refresh_token: &str) -> Result<(), AppError> {
        let found = self.sessions.revoke(refresh_token).await?;
        if !found {
            return Err(AuthError::UnknownToken.into());
        }
        Ok(())
    }

    /// Store a freshly generated refresh token, regenerating if the
    /// token collides with a stored one.
    async fn persist_new_refresh_token(&self, user_id: Uuid) -> Result<String, AppError> {
        let expires_at = Utc::now() + self.refresh_token_ttl;

        for attempt in 1..=REFRESH_INSERT_ATTEMPTS {
            let token = generate_refresh_token();
            match self.sessions.insert(&token, user_id, expires_at).await {
                Ok(()) => return Ok(token),
                Err(DatabaseError::UniqueConstraintViolation(_)) => {
                    tracing::warn!(
                        user_id = %user_id,
                        attempt,
                        "refresh token collided with a stored one, regenerating"
                    );
                }
                Err(e) => return Err(e.into()),
            }
        }

        Err(AppError::Internal(
            "refresh token generation kept colliding".to_string(),
        ))
    }
}
