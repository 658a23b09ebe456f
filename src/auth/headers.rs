/// Authorization-header parsing.
///
/// Pure functions over the raw header value; no I/O, no secrets, no store
/// access. Expected forms are `Bearer <token>` and `ApiKey <key>` with a
/// single space and a case-sensitive scheme.
use crate::error::AuthError;

/// Extract the token from a `Bearer <token>` header value.
///
/// # Errors
/// `MissingHeader` when the header is absent, `MalformedHeader` when there
/// is no scheme/token split, `WrongScheme` for any scheme other than
/// `Bearer`.
pub fn extract_bearer(header: Option<&str>) -> Result<&str, AuthError> {
    extract_scheme(header, "Bearer")
}

/// Extract the key from an `ApiKey <key>` header value.
///
/// Same error contract as [`extract_bearer`].
pub fn extract_api_key(header: Option<&str>) -> Result<&str, AuthError> {
    extract_scheme(header, "ApiKey")
}

fn extract_scheme<'a>(header: Option<&'a str>, scheme: &str) -> Result<&'a str, AuthError> {
    let value = header.ok_or(AuthError::MissingHeader)?;
    let (found, token) = value.split_once(' ').ok_or(AuthError::MalformedHeader)?;

    if found != scheme {
        return Err(AuthError::WrongScheme(found.to_string()));
    }

    Ok(token)
}
