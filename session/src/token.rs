//! Session token generation.

use crate::constants::tokens::TOKEN_BYTES;
use crate::state::SessionToken;
use base64::Engine;
use rand::RngCore;
use rand::rngs::OsRng;

/// Generate a new session token.
///
/// Draws [`TOKEN_BYTES`] bytes (256 bits) from the operating system CSPRNG
/// and encodes them as unpadded URL-safe base64 (43 characters).
///
/// # Examples
///
/// ```
/// use schoolpulse_session::token::generate_token;
///
/// let token = generate_token();
/// assert_eq!(token.as_str().len(), 43);
/// assert_ne!(token, generate_token());
/// ```
#[must_use]
pub fn generate_token() -> SessionToken {
    let mut random_bytes = [0u8; TOKEN_BYTES];
    OsRng.fill_bytes(&mut random_bytes);
    SessionToken::new(base64::engine::general_purpose::URL_SAFE_NO_PAD.encode(random_bytes))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_token_is_url_safe() {
        let token = generate_token();

        assert!(
            token
                .as_str()
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
        );
    }

    #[test]
    fn test_token_decodes_to_256_bits() {
        let token = generate_token();
        let bytes = base64::engine::general_purpose::URL_SAFE_NO_PAD
            .decode(token.as_str())
            .expect("token should be valid base64");

        assert_eq!(bytes.len(), TOKEN_BYTES);
    }

    #[test]
    fn test_tokens_are_unique() {
        let tokens: HashSet<SessionToken> = (0..1000).map(|_| generate_token()).collect();
        assert_eq!(tokens.len(), 1000);
    }
}
