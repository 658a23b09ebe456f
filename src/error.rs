/// Unified error handling for the whole application.
///
/// Three layers:
/// 1. Domain error enums carrying the precise internal failure kind
/// 2. A single `AppError` used for control flow in handlers and services
/// 3. The HTTP translation boundary (`ResponseError`) that logs the precise
///    kind and renders a uniform external body, so authentication internals
///    never leak through a response
use actix_web::{error::ResponseError, http::StatusCode, HttpResponse};
use std::error::Error as StdError;
use std::fmt;

/// Validation errors for input data
#[derive(Debug, Clone)]
pub enum ValidationError {
    EmptyField(String),
    TooShort(String, usize),
    TooLong(String, usize),
    InvalidFormat(String),
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationError::EmptyField(field) => write!(f, "{} is empty", field),
            ValidationError::TooShort(field, min) => {
                write!(f, "{} is too short (minimum {} characters)", field, min)
            }
            ValidationError::TooLong(field, max) => {
                write!(f, "{} is too long (maximum {} characters)", field, max)
            }
            ValidationError::InvalidFormat(field) => write!(f, "{} has invalid format", field),
        }
    }
}

impl StdError for ValidationError {}

/// Store and database operation errors
#[derive(Debug)]
pub enum DatabaseError {
    UniqueConstraintViolation(String),
    NotFound(String),
    QueryExecution(String),
    ConnectionPool(String),
    UnexpectedError(String),
}

impl fmt::Display for DatabaseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DatabaseError::UniqueConstraintViolation(msg) => {
                write!(f, "Duplicate entry: {}", msg)
            }
            DatabaseError::NotFound(msg) => write!(f, "Not found: {}", msg),
            DatabaseError::QueryExecution(msg) => write!(f, "Query error: {}", msg),
            DatabaseError::ConnectionPool(msg) => write!(f, "Database connection error: {}", msg),
            DatabaseError::UnexpectedError(msg) => write!(f, "Database error: {}", msg),
        }
    }
}

impl StdError for DatabaseError {}

/// Authentication and authorization failures.
///
/// Variants stay precise in logs and control flow; the HTTP boundary
/// collapses them into two uniform messages (one for the login path, one
/// for token handling) so a caller cannot probe which check rejected them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthError {
    // credential verification
    UnknownUser,
    BadCredentials,
    MalformedHash,
    // access token validation, ordered by check priority
    SignatureInvalid,
    TokenExpired,
    IssuerMismatch,
    TokenMalformed,
    // authorization header parsing
    MissingHeader,
    MalformedHeader,
    WrongScheme(String),
    // refresh session state
    UnknownToken,
    SessionInvalid,
    // webhook shared key
    InvalidApiKey,
    // resource ownership
    Forbidden(String),
    // infrastructure, not an authentication outcome
    HashingFailure(String),
    SigningFailure(String),
}

impl fmt::Display for AuthError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AuthError::UnknownUser => write!(f, "no user with that email"),
            AuthError::BadCredentials => write!(f, "password mismatch"),
            AuthError::MalformedHash => write!(f, "stored password hash is not a valid bcrypt digest"),
            AuthError::SignatureInvalid => write!(f, "token signature verification failed"),
            AuthError::TokenExpired => write!(f, "token has expired"),
            AuthError::IssuerMismatch => write!(f, "token issuer is not recognized"),
            AuthError::TokenMalformed => write!(f, "token is malformed"),
            AuthError::MissingHeader => write!(f, "no authorization header"),
            AuthError::MalformedHeader => write!(f, "malformed authorization header"),
            AuthError::WrongScheme(scheme) => {
                write!(f, "unexpected authorization scheme: {}", scheme)
            }
            AuthError::UnknownToken => write!(f, "refresh token not recognized"),
            AuthError::SessionInvalid => write!(f, "session is expired or revoked"),
            AuthError::InvalidApiKey => write!(f, "api key mismatch"),
            AuthError::Forbidden(msg) => write!(f, "{}", msg),
            AuthError::HashingFailure(msg) => write!(f, "password hashing failed: {}", msg),
            AuthError::SigningFailure(msg) => write!(f, "token signing failed: {}", msg),
        }
    }
}

impl StdError for AuthError {}

impl AuthError {
    /// Failures that can only happen on the email/password path.
    fn is_login_failure(&self) -> bool {
        matches!(
            self,
            AuthError::UnknownUser | AuthError::BadCredentials | AuthError::MalformedHash
        )
    }

    /// Failures that mean the service itself broke, not the caller.
    fn is_infrastructure(&self) -> bool {
        matches!(
            self,
            AuthError::HashingFailure(_) | AuthError::SigningFailure(_)
        )
    }
}

/// Central error type that all application errors map to
#[derive(Debug)]
pub enum AppError {
    Validation(ValidationError),
    Database(DatabaseError),
    Auth(AuthError),
    Internal(String),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Validation(e) => write!(f, "{}", e),
            AppError::Database(e) => write!(f, "{}", e),
            AppError::Auth(e) => write!(f, "{}", e),
            AppError::Internal(msg) => write!(f, "Internal error: {}", msg),
        }
    }
}

impl StdError for AppError {}

impl From<ValidationError> for AppError {
    fn from(err: ValidationError) -> Self {
        AppError::Validation(err)
    }
}

impl From<DatabaseError> for AppError {
    fn from(err: DatabaseError) -> Self {
        AppError::Database(err)
    }
}

impl From<AuthError> for AppError {
    fn from(err: AuthError) -> Self {
        AppError::Auth(err)
    }
}

impl From<sqlx::Error> for DatabaseError {
    fn from(err: sqlx::Error) -> Self {
        match &err {
            sqlx::Error::Database(db) => {
                // 23505 is the Postgres SQLSTATE for unique_violation
                if db.code().as_deref() == Some("23505") {
                    DatabaseError::UniqueConstraintViolation(db.message().to_string())
                } else {
                    DatabaseError::QueryExecution(db.message().to_string())
                }
            }
            sqlx::Error::RowNotFound => DatabaseError::NotFound("record not found".to_string()),
            sqlx::Error::PoolTimedOut | sqlx::Error::PoolClosed | sqlx::Error::Io(_) => {
                DatabaseError::ConnectionPool(err.to_string())
            }
            _ => DatabaseError::UnexpectedError(err.to_string()),
        }
    }
}

/// Error response structure for HTTP responses
#[derive(Debug, serde::Serialize)]
pub struct ErrorResponse {
    /// Unique error ID for correlating a response with the server log
    pub error_id: String,
    /// Human-readable error message
    pub message: String,
    /// Error code for client-side handling
    pub code: String,
    /// HTTP status code
    pub status: u16,
    /// Timestamp when the error occurred
    pub timestamp: String,
}

impl ErrorResponse {
    pub fn new(error_id: String, message: String, code: String, status: u16) -> Self {
        Self {
            error_id,
            message,
            code,
            status,
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }
}

/// Trait for converting errors to HTTP responses with proper logging
pub trait ErrorHandler {
    fn error_response(&self, request_id: &str) -> (StatusCode, ErrorResponse);
    fn log_error(&self, request_id: &str);
}

impl ErrorHandler for AppError {
    fn error_response(&self, request_id: &str) -> (StatusCode, ErrorResponse) {
        let (status, code, message) = match self {
            AppError::Validation(e) => (
                StatusCode::BAD_REQUEST,
                "VALIDATION_ERROR".to_string(),
                e.to_string(),
            ),

            AppError::Database(e) => match e {
                DatabaseError::UniqueConstraintViolation(_) => (
                    StatusCode::CONFLICT,
                    "DUPLICATE_ENTRY".to_string(),
                    e.to_string(),
                ),
                DatabaseError::NotFound(_) => (
                    StatusCode::NOT_FOUND,
                    "NOT_FOUND".to_string(),
                    e.to_string(),
                ),
                DatabaseError::ConnectionPool(_) => (
                    StatusCode::SERVICE_UNAVAILABLE,
                    "SERVICE_UNAVAILABLE".to_string(),
                    "Database service temporarily unavailable".to_string(),
                ),
                _ => (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "DATABASE_ERROR".to_string(),
                    "Database error occurred".to_string(),
                ),
            },

            // The uniform-message boundary: every authentication failure in
            // one flow gets the same status, code and message regardless of
            // which internal check rejected the request.
            AppError::Auth(e) => {
                if e.is_infrastructure() {
                    (
                        StatusCode::INTERNAL_SERVER_ERROR,
                        "INTERNAL_ERROR".to_string(),
                        "Internal server error".to_string(),
                    )
                } else if let AuthError::Forbidden(msg) = e {
                    (StatusCode::FORBIDDEN, "FORBIDDEN".to_string(), msg.clone())
                } else if e.is_login_failure() {
                    (
                        StatusCode::UNAUTHORIZED,
                        "INVALID_CREDENTIALS".to_string(),
                        "Invalid email or password".to_string(),
                    )
                } else {
                    (
                        StatusCode::UNAUTHORIZED,
                        "INVALID_CREDENTIALS".to_string(),
                        "Invalid credentials".to_string(),
                    )
                }
            }

            AppError::Internal(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "INTERNAL_ERROR".to_string(),
                "Internal server error".to_string(),
            ),
        };

        let error_response =
            ErrorResponse::new(request_id.to_string(), message, code, status.as_u16());

        (status, error_response)
    }

    fn log_error(&self, request_id: &str) {
        match self {
            AppError::Validation(e) => {
                tracing::warn!(
                    request_id = request_id,
                    error = %e,
                    "Validation error"
                );
            }
            AppError::Database(DatabaseError::UniqueConstraintViolation(_)) => {
                tracing::warn!(
                    request_id = request_id,
                    error = %self,
                    "Duplicate entry attempt"
                );
            }
            AppError::Database(DatabaseError::NotFound(_)) => {
                tracing::warn!(
                    request_id = request_id,
                    error = %self,
                    "Record not found"
                );
            }
            AppError::Database(e) => {
                tracing::error!(
                    request_id = request_id,
                    error = %e,
                    "Database error"
                );
            }
            // Rejected credentials and tokens are expected outcomes, never
            // system faults; only hashing/signing breakage is an error.
            AppError::Auth(e) if e.is_infrastructure() => {
                tracing::error!(
                    request_id = request_id,
                    error = %e,
                    "Authentication infrastructure failure"
                );
            }
            AppError::Auth(e) => {
                tracing::warn!(
                    request_id = request_id,
                    error = %e,
                    "Authentication failure"
                );
            }
            AppError::Internal(msg) => {
                tracing::error!(
                    request_id = request_id,
                    error = %msg,
                    "Internal error"
                );
            }
        }
    }
}

impl ResponseError for AppError {
    fn error_response(&self) -> HttpResponse {
        let request_id = uuid::Uuid::new_v4().to_string();
        self.log_error(&request_id);

        let (status, error_response) = <Self as ErrorHandler>::error_response(self, &request_id);

        HttpResponse::build(status).json(error_response)
    }

    fn status_code(&self) -> StatusCode {
        match self {
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::Database(e) => match e {
                DatabaseError::UniqueConstraintViolation(_) => StatusCode::CONFLICT,
                DatabaseError::NotFound(_) => StatusCode::NOT_FOUND,
                DatabaseError::ConnectionPool(_) => StatusCode::SERVICE_UNAVAILABLE,
                _ => StatusCode::INTERNAL_SERVER_ERROR,
            },
            AppError::Auth(e) => {
                if e.is_infrastructure() {
                    StatusCode::INTERNAL_SERVER_ERROR
                } else if matches!(e, AuthError::Forbidden(_)) {
                    StatusCode::FORBIDDEN
                } else {
                    StatusCode::UNAUTHORIZED
                }
            }
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// Error context for enhanced logging in request handlers
#[derive(Debug, Clone)]
pub struct ErrorContext {
    pub request_id: String,
    pub operation: String,
}

impl ErrorContext {
    pub fn new(operation: impl Into<String>) -> Self {
        Self {
            request_id: uuid::Uuid::new_v4().to_string(),
            operation: operation.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_error_display() {
        let err = ValidationError::EmptyField("email".to_string());
        assert_eq!(err.to_string(), "email is empty");
    }

    #[test]
    fn test_app_error_conversion() {
        let val_err = ValidationError::InvalidFormat("test".to_string());
        let app_err: AppError = val_err.into();
        match app_err {
            AppError::Validation(_) => (),
            _ => panic!("Expected Validation error"),
        }
    }

    #[test]
    fn test_unknown_user_and_bad_password_share_one_external_shape() {
        let unknown: AppError = AuthError::UnknownUser.into();
        let mismatch: AppError = AuthError::BadCredentials.into();

        let (status_a, body_a) = ErrorHandler::error_response(&unknown, "req-1");
        let (status_b, body_b) = ErrorHandler::error_response(&mismatch, "req-1");

        assert_eq!(status_a, StatusCode::UNAUTHORIZED);
        assert_eq!(status_a, status_b);
        assert_eq!(body_a.message, body_b.message);
        assert_eq!(body_a.code, body_b.code);
        assert_eq!(body_a.message, "Invalid email or password");
    }

    #[test]
    fn test_token_failures_share_one_external_shape() {
        let kinds = vec![
            AuthError::SignatureInvalid,
            AuthError::TokenExpired,
            AuthError::IssuerMismatch,
            AuthError::TokenMalformed,
            AuthError::MissingHeader,
            AuthError::MalformedHeader,
            AuthError::WrongScheme("Basic".to_string()),
            AuthError::UnknownToken,
            AuthError::SessionInvalid,
            AuthError::InvalidApiKey,
        ];

        for kind in kinds {
            let err: AppError = kind.clone().into();
            let (status, body) = ErrorHandler::error_response(&err, "req-2");
            assert_eq!(status, StatusCode::UNAUTHORIZED, "kind: {:?}", kind);
            assert_eq!(body.message, "Invalid credentials", "kind: {:?}", kind);
            assert_eq!(body.code, "INVALID_CREDENTIALS", "kind: {:?}", kind);
        }
    }

    #[test]
    fn test_hashing_failure_is_internal_not_unauthorized() {
        let err: AppError = AuthError::HashingFailure("rng exhausted".to_string()).into();
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);

        let (_, body) = ErrorHandler::error_response(&err, "req-3");
        assert_eq!(body.message, "Internal server error");
        assert!(!body.message.contains("rng"));
    }

    #[test]
    fn test_forbidden_maps_to_403() {
        let err: AppError = AuthError::Forbidden("posts can only be deleted by their author".to_string()).into();
        assert_eq!(err.status_code(), StatusCode::FORBIDDEN);
    }

    #[test]
    fn test_duplicate_entry_maps_to_conflict() {
        let err: AppError =
            DatabaseError::UniqueConstraintViolation("email is already registered".to_string())
                .into();
        assert_eq!(err.status_code(), StatusCode::CONFLICT);
    }

    #[test]
    fn test_error_response_creation() {
        let request_id = "test-123".to_string();
        let response = ErrorResponse::new(
            request_id.clone(),
            "Test error".to_string(),
            "TEST_ERROR".to_string(),
            400,
        );

        assert_eq!(response.error_id, request_id);
        assert_eq!(response.code, "TEST_ERROR");
        assert_eq!(response.status, 400);
    }
}
