/// In-memory storage backends
///
/// Each store keeps its rows in a `tokio::sync::RwLock<HashMap>`, so a
/// single call is atomic but nothing survives a restart. The
/// integration tests run the whole application against these.
use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::error::DatabaseError;
use crate::store::{
    CredentialStore, PostRecord, PostStore, RefreshTokenRecord, RefreshTokenStore, UserRecord,
};

/// Accounts keyed by email.
#[derive(Default)]
pub struct InMemoryCredentialStore {
    users: RwLock<HashMap<String, UserRecord>>,
}

impl InMemoryCredentialStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl CredentialStore for InMemoryCredentialStore {
    async fn find_user_by_email(&self, email: &str) -> Result<Option<UserRecord>, DatabaseError> {
        let users = self.users.read().await;
        Ok(users.get(email).cloned())
    }

    async fn insert_user(
        &self,
        email: &str,
        password_hash: &str,
    ) -> Result<UserRecord, DatabaseError> {
        let mut users = self.users.write().await;
        if users.contains_key(email) {
            return Err(DatabaseError::UniqueConstraintViolation(
                "email is already registered".to_string(),
            ));
        }
        let now = Utc::now();
        let user = UserRecord {
            id: Uuid::new_v4(),
            email: email.to_string(),
            password_hash: password_hash.to_string(),
            is_premium: false,
            created_at: now,
            updated_at: now,
        };
        users.insert(email.to_string(), user.clone());
        Ok(user)
    }

    async fn upgrade_to_premium(&self, user_id: Uuid) -> Result<bool, DatabaseError> {
        let mut users = self.users.write().await;
        match users.values_mut().find(|user| user.id == user_id) {
            Some(user) => {
                user.is_premium = true;
                user.updated_at = Utc::now();
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn clear_all(&self) -> Result<(), DatabaseError> {
        self.users.write().await.clear();
        Ok(())
    }
}

/// Refresh sessions keyed by the opaque token.
#[derive(Default)]
pub struct InMemoryRefreshTokenStore {
    sessions: RwLock<HashMap<String, RefreshTokenRecord>>,
}

impl InMemoryRefreshTokenStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl RefreshTokenStore for InMemoryRefreshTokenStore {
    async fn insert(
        &self,
        token: &str,
        user_id: Uuid,
        expires_at: DateTime<Utc>,
    ) -> Result<(), DatabaseError> {
        let mut sessions = self.sessions.write().await;
        if sessions.contains_key(token) {
            return Err(DatabaseError::UniqueConstraintViolation(
                "refresh token already exists".to_string(),
            ));
        }
        sessions.insert(
            token.to_string(),
            RefreshTokenRecord {
                user_id,
                created_at: Utc::now(),
                expires_at,
                revoked_at: None,
            },
        );
        Ok(())
    }

    async fn find_by_token(
        &self,
        token: &str,
    ) -> Result<Option<RefreshTokenRecord>, DatabaseError> {
        let sessions = self.sessions.read().await;
        Ok(sessions.get(token).cloned())
    }

    async fn revoke(&self, token: &str) -> Result<bool, DatabaseError> {
        let mut sessions = self.sessions.write().await;
        match sessions.get_mut(token) {
            Some(session) => {
                if session.revoked_at.is_none() {
                    session.revoked_at = Some(Utc::now());
                }
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn clear_all(&self) -> Result<(), DatabaseError> {
        self.sessions.write().await.clear();
        Ok(())
    }
}

/// Posts keyed by id.
#[derive(Default)]
pub struct InMemoryPostStore {
    posts: RwLock<HashMap<Uuid, PostRecord>>,
}

impl InMemoryPostStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl PostStore for InMemoryPostStore {
    async fn insert(&self, body: &str, author_id: Uuid) -> Result<PostRecord, DatabaseError> {
        let mut posts = self.posts.write().await;
        let now = Utc::now();
        let post = PostRecord {
            id: Uuid::new_v4(),
            body: body.to_string(),
            author_id,
            created_at: now,
            updated_at: now,
        };
        posts.insert(post.id, post.clone());
        Ok(post)
    }

    async fn list(&self) -> Result<Vec<PostRecord>, DatabaseError> {
        let posts = self.posts.read().await;
        let mut rows: Vec<PostRecord> = posts.values().cloned().collect();
        rows.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id)));
        Ok(rows)
    }

    async fn list_by_author(&self, author_id: Uuid) -> Result<Vec<PostRecord>, DatabaseError> {
        let posts = self.posts.read().await;
        let mut rows: Vec<PostRecord> = posts
            .values()
            .filter(|post| post.author_id == author_id)
            .cloned()
            .collect();
        rows.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id)));
        Ok(rows)
    }

    async fn get(&self, id: Uuid) -> Result<Option<PostRecord>, DatabaseError> {
        let posts = self.posts.read().await;
        Ok(posts.get(&id).cloned())
    }

    async fn delete(&self, id: Uuid) -> Result<(), DatabaseError> {
        self.posts.write().await.remove(&id);
        Ok(())
    }

    async fn clear_all(&self) -> Result<(), DatabaseError> {
        self.posts.write().await.clear();
        Ok(())
    }
}
