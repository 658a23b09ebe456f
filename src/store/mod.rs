/// Persistence layer
///
/// Storage is reached through object-safe traits so handlers and the
/// session lifecycle never depend on a concrete backend. `postgres`
/// holds the sqlx-backed implementations used in production, `memory`
/// holds the hashmap-backed ones used by the integration tests.

mod memory;
mod postgres;

pub use memory::InMemoryCredentialStore;
pub use memory::InMemoryPostStore;
pub use memory::InMemoryRefreshTokenStore;
pub use postgres::PgCredentialStore;
pub use postgres::PgPostStore;
pub use postgres::PgRefreshTokenStore;

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::error::DatabaseError;

/// The three storage handles the application runs on. Cloning is
/// cheap; all clones share the same backends.
#[derive(Clone)]
pub struct Stores {
    pub users: Arc<dyn CredentialStore>,
    pub sessions: Arc<dyn RefreshTokenStore>,
    pub posts: Arc<dyn PostStore>,
}

impl Stores {
    /// Production wiring over a shared connection pool.
    pub fn postgres(pool: PgPool) -> Self {
        Self {
            users: Arc::new(PgCredentialStore::new(pool.clone())),
            sessions: Arc::new(PgRefreshTokenStore::new(pool.clone())),
            posts: Arc::new(PgPostStore::new(pool)),
        }
    }

    /// Self-contained wiring for tests and local experiments.
    pub fn in_memory() -> Self {
        Self {
            users: Arc::new(InMemoryCredentialStore::new()),
            sessions: Arc::new(InMemoryRefreshTokenStore::new()),
            posts: Arc::new(InMemoryPostStore::new()),
        }
    }
}

/// A registered account row.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct UserRecord {
    pub id: Uuid,
    pub email: String,
    pub password_hash: String,
    pub is_premium: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A persisted refresh session. The opaque token itself is the lookup
/// key and is not part of the record.
#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct RefreshTokenRecord {
    pub user_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
    pub revoked_at: Option<DateTime<Utc>>,
}

impl RefreshTokenRecord {
    pub fn is_revoked(&self) -> bool {
        self.revoked_at.is_some()
    }

    pub fn is_expired(&self) -> bool {
        self.expires_at <= Utc::now()
    }
}

/// A published post row.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct PostRecord {
    pub id: Uuid,
    pub body: String,
    pub author_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Account storage.
#[async_trait]
pub trait CredentialStore: Send + Sync {
    /// Looks up an account by email. `Ok(None)` means no such account.
    async fn find_user_by_email(&self, email: &str) -> Result<Option<UserRecord>, DatabaseError>;

    /// Creates an account. Fails with `UniqueConstraintViolation` when
    /// the email is already registered.
    async fn insert_user(
        &self,
        email: &str,
        password_hash: &str,
    ) -> Result<UserRecord, DatabaseError>;

    /// Flags an account as premium. Returns `false` when no account
    /// with that id exists.
    async fn upgrade_to_premium(&self, user_id: Uuid) -> Result<bool, DatabaseError>;

    /// Deletes every account.
    async fn clear_all(&self) -> Result<(), DatabaseError>;
}

/// Refresh session storage.
#[async_trait]
pub trait RefreshTokenStore: Send + Sync {
    /// Persists a new session under `token`. Fails with
    /// `UniqueConstraintViolation` when the token is already stored.
    async fn insert(
        &self,
        token: &str,
        user_id: Uuid,
        expires_at: DateTime<Utc>,
    ) -> Result<(), DatabaseError>;

    /// Looks up the session persisted under `token`.
    async fn find_by_token(&self, token: &str)
        -> Result<Option<RefreshTokenRecord>, DatabaseError>;

    /// Marks the session as revoked, keeping the original timestamp if
    /// it was already revoked. Returns `false` when the token is not
    /// stored at all.
    async fn revoke(&self, token: &str) -> Result<bool, DatabaseError>;

    /// Deletes every session.
    async fn clear_all(&self) -> Result<(), DatabaseError>;
}

/// Post storage.
#[async_trait]
pub trait PostStore: Send + Sync {
    async fn insert(&self, body: &str, author_id: Uuid) -> Result<PostRecord, DatabaseError>;

    /// All posts, oldest first.
    async fn list(&self) -> Result<Vec<PostRecord>, DatabaseError>;

    /// Posts by one author, oldest first.
    async fn list_by_author(&self, author_id: Uuid) -> Result<Vec<PostRecord>, DatabaseError>;

    async fn get(&self, id: Uuid) -> Result<Option<PostRecord>, DatabaseError>;

    async fn delete(&self, id: Uuid) -> Result<(), DatabaseError>;

    /// Deletes every post.
    async fn clear_all(&self) -> Result<(), DatabaseError>;
}
