/// Password hashing and verification (bcrypt).
///
/// Every hash call draws a fresh random salt, so two hashes of the same
/// password never compare equal; the work factor rides inside the emitted
/// digest. Comparison happens inside the bcrypt crate in constant time.
use bcrypt::{hash, verify, DEFAULT_COST};

use crate::error::AuthError;

/// Hash a plaintext password for storage.
///
/// # Errors
/// `HashingFailure` if the bcrypt routine itself fails (salt generation or
/// resource exhaustion); never fails on password content.
pub fn hash_password(password: &str) -> Result<String, AuthError> {
    hash(password, DEFAULT_COST).map_err(|e| AuthError::HashingFailure(e.to_string()))
}

/// Verify a plaintext password against a stored hash.
///
/// # Errors
/// `BadCredentials` when the password does not match; `MalformedHash` when
/// the stored value is not a valid bcrypt digest. The two stay distinct for
/// diagnostics and collapse into one message at the HTTP boundary.
pub fn verify_password(password: &str, password_hash: &str) -> Result<(), AuthError> {
    match verify(password, password_hash) {
        Ok(true) => Ok(()),
        Ok(false) => Err(AuthError::BadCredentials),
        Err(_) => Err(AuthError::MalformedHash),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_and_verify_round_trip() {
        let password = "correct horse battery staple";
        let password_hash = hash_password(password).expect("failed to hash password");

        assert_ne!(password, password_hash);
        assert!(password_hash.starts_with("$2"));
        assert_eq!(verify_password(password, &password_hash), Ok(()));
    }

    #[test]
    fn test_wrong_password_is_rejected() {
        let password_hash = hash_password("correct horse battery staple")
            .expect("failed to hash password");

        assert_eq!(
            verify_password("incorrect horse", &password_hash),
            Err(AuthError::BadCredentials)
        );
    }

    #[test]
    fn test_empty_password_does_not_match() {
        let password_hash = hash_password("anything").expect("failed to hash password");

        assert_eq!(
            verify_password("", &password_hash),
            Err(AuthError::BadCredentials)
        );
    }

    #[test]
    fn test_same_password_hashes_differently() {
        let password = "correct horse battery staple";
        let first = hash_password(password).expect("failed to hash password");
        let second = hash_password(password).expect("failed to hash password");

        // Fresh salt per call; both still verify.
        assert_ne!(first, second);
        assert_eq!(verify_password(password, &first), Ok(()));
        assert_eq!(verify_password(password, &second), Ok(()));
    }

    #[test]
    fn test_malformed_stored_hash_is_distinguished() {
        assert_eq!(
            verify_password("anything", "not-a-bcrypt-digest"),
            Err(AuthError::MalformedHash)
        );
        assert_eq!(
            verify_password("anything", ""),
            Err(AuthError::MalformedHash)
        );
    }
}
