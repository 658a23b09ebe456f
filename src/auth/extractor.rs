/// Request authentication
///
/// `AuthenticatedUser` is an extractor, not a middleware, so one route
/// on a path can require a bearer token while another stays public.
/// Handlers that need the caller's identity take it as an argument and
/// actix rejects the request before the handler runs.
use std::future::{ready, Ready};

use actix_web::dev::Payload;
use actix_web::http::header::AUTHORIZATION;
use actix_web::{web, FromRequest, HttpRequest};
use uuid::Uuid;

use crate::auth::headers::extract_bearer;
use crate::auth::jwt::AccessTokenCodec;
use crate::error::AppError;

/// The verified identity behind a request's bearer token.
#[derive(Debug, Clone, Copy)]
pub struct AuthenticatedUser {
    pub user_id: Uuid,
}

/// The raw Authorization header value, if the client sent one.
pub fn authorization_header(req: &HttpRequest) -> Option<&str> {
    req.headers()
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
}

impl FromRequest for AuthenticatedUser {
    type Error = AppError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        ready(authenticate(req))
    }
}

fn authenticate(req: &HttpRequest) -> Result<AuthenticatedUser, AppError> {
    let token = extract_bearer(authorization_header(req))?;
    let codec = req
        .app_data::<web::Data<AccessTokenCodec>>()
        .ok_or_else(|| AppError::Internal("access token codec is not configured".to_string()))?;
    let user_id = codec.validate(token)?;
    Ok(AuthenticatedUser { user_id })
}
