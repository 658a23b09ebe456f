/// Authentication module
///
/// Handles password hashing, access-token signing and validation,
/// refresh sessions, and authorization-header parsing.

mod claims;
mod extractor;
mod headers;
mod jwt;
mod password;
mod refresh_token;
mod session;

pub use claims::Claims;
pub use extractor::authorization_header;
pub use extractor::AuthenticatedUser;
pub use headers::extract_api_key;
pub use headers::extract_bearer;
pub use jwt::AccessTokenCodec;
pub use jwt::ACCESS_TOKEN_ISSUER;
pub use password::hash_password;
pub use password::verify_password;
pub use refresh_token::generate_refresh_token;
pub use session::IssuedSession;
pub use session::SessionLifecycle;
