/// Opaque refresh-token generation.
///
/// A refresh token is 32 bytes from a cryptographically secure source,
/// hex-encoded to a 64-character string. Nothing here probes the store for
/// uniqueness; with 256 bits of entropy a repeat is vanishingly unlikely,
/// and the store's uniqueness constraint turns one into a retryable insert
/// conflict rather than an overwrite.
use rand::{thread_rng, Rng};

pub fn generate_refresh_token() -> String {
    let mut bytes = [0u8; 32];
    thread_rng().fill(&mut bytes);
    hex::encode(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_is_64_hex_characters() {
        let token = generate_refresh_token();

        assert_eq!(token.len(), 64);
        assert!(token.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn test_tokens_do_not_repeat() {
        let first = generate_refresh_token();
        let second = generate_refresh_token();

        assert_ne!(first, second);
    }
}
