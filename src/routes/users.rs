/// User Routes
///
/// Handles account creation.

use actix_web::{web, HttpResponse};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::auth::hash_password;
use crate::error::{AppError, ErrorContext};
use crate::store::{Stores, UserRecord};
use crate::validators::is_valid_email;

/// User creation request
#[derive(Deserialize)]
pub struct CreateUserRequest {
    pub email: String,
    pub password: String,
}

/// Public view of an account. The password hash never leaves the
/// server.
#[derive(Serialize)]
pub struct UserBody {
    pub id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub email: String,
    pub is_premium: bool,
}

impl From<UserRecord> for UserBody {
    fn from(user: UserRecord) -> Self {
        Self {
            id: user.id,
            created_at: user.created_at,
            updated_at: user.updated_at,
            email: user.email,
            is_premium: user.is_premium,
        }
    }
}

/// POST /api/users
///
/// Create a new account with email and password. No tokens are issued;
/// the client logs in afterwards.
///
/// # Errors
/// - 400: Invalid email shape
/// - 409: Email already registered
/// - 500: Internal server error
pub async fn create_user(
    form: web::Json<CreateUserRequest>,
    stores: web::Data<Stores>,
) -> Result<HttpResponse, AppError> {
    let context = ErrorContext::new("user_creation");

    let email = is_valid_email(&form.email)?;
    let password_hash = hash_password(&form.password)?;

    let user = stores.users.insert_user(&email, &password_hash).await?;

    tracing::info!(
        request_id = %context.request_id,
        user_id = %user.id,
        "User created"
    );

    Ok(HttpResponse::Created().json(UserBody::from(user)))
}
