/// Authentication Routes
///
/// Handles login, access-token refresh, and session revocation. The
/// refresh and revoke endpoints read the refresh token from the
/// Authorization header, never from the body.

use actix_web::{web, HttpRequest, HttpResponse};
use serde::{Deserialize, Serialize};

use crate::auth::{authorization_header, extract_bearer, SessionLifecycle};
use crate::error::{AppError, ErrorContext};
use crate::routes::users::UserBody;
use crate::validators::is_valid_email;

/// User login request
#[derive(Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Login response: the account plus both tokens.
#[derive(Serialize)]
pub struct LoginResponse {
    #[serde(flatten)]
    pub user: UserBody,
    pub token: String,
    pub refresh_token: String,
}

/// Refresh response carrying the new access token.
#[derive(Serialize)]
pub struct RefreshResponse {
    pub token: String,
}

/// POST /api/login
///
/// Authenticate with email and password and open a session.
///
/// # Errors
/// - 400: Invalid email shape
/// - 401: Authentication failure; unknown emails and wrong passwords
///   get the same answer
/// - 500: Internal server error
pub async fn login(
    form: web::Json<LoginRequest>,
    lifecycle: web::Data<SessionLifecycle>,
) -> Result<HttpResponse, AppError> {
    let context = ErrorContext::new("user_login");

    let email = is_valid_email(&form.email)?;
    let issued = lifecycle.login(&email, &form.password).await?;

    tracing::info!(
        request_id = %context.request_id,
        user_id = %issued.user.id,
        "User logged in"
    );

    Ok(HttpResponse::Ok().json(LoginResponse {
        user: UserBody::from(issued.user),
        token: issued.access_token,
        refresh_token: issued.refresh_token,
    }))
}

/// POST /api/refresh
///
/// Exchange the refresh token in the Authorization header for a new
/// access token. The refresh token itself stays valid.
///
/// # Errors
/// - 401: Missing or malformed header, unknown token, or closed session
/// - 500: Internal server error
pub async fn refresh_access_token(
    req: HttpRequest,
    lifecycle: web::Data<SessionLifecycle>,
) -> Result<HttpResponse, AppError> {
    let context = ErrorContext::new("token_refresh");

    let refresh_token = extract_bearer(authorization_header(&req))?;
    let token = lifecycle.refresh(refresh_token).await?;

    tracing::info!(request_id = %context.request_id, "Access token refreshed");

    Ok(HttpResponse::Ok().json(RefreshResponse { token }))
}

/// POST /api/revoke
///
/// Close the session behind the refresh token in the Authorization
/// header. Revoking an already-revoked session succeeds again.
///
/// # Errors
/// - 401: Missing or malformed header, or a token that was never issued
/// - 500: Internal server error
pub async fn revoke_refresh_token(
    req: HttpRequest,
    lifecycle: web::Data<SessionLifecycle>,
) -> Result<HttpResponse, AppError> {
    let context = ErrorContext::new("session_revocation");

    let refresh_token = extract_bearer(authorization_header(&req))?;
    lifecycle.revoke(refresh_token).await?;

    tracing::info!(request_id = %context.request_id, "Session revoked");

    Ok(HttpResponse::NoContent().finish())
}
