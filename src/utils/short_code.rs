//! Random short-code and opaque-token generation.
//!
//! Short codes are drawn from the 62-character alphanumeric alphabet; at the
//! default length of 8 the space is 62^8 (~218 trillion), so collisions are
//! handled with a bounded retry at the call site rather than here.

use rand::distr::{Alphanumeric, SampleString};

/// Default short-code length.
pub const DEFAULT_SHORT_CODE_LENGTH: usize = 8;

/// Length of opaque time-limited tokens (password reset, email confirmation).
pub const OPAQUE_TOKEN_LENGTH: usize = 48;

/// Generates a random alphanumeric short code of the given length.
///
/// The caller is responsible for uniqueness: regenerate on collision.
pub fn generate_short_code(length: usize) -> String {
    Alphanumeric.sample_string(&mut rand::rng(), length)
}

/// Generates a 48-character URL-safe opaque token.
pub fn generate_opaque_token() -> String {
    Alphanumeric.sample_string(&mut rand::rng(), OPAQUE_TOKEN_LENGTH)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_short_code_has_requested_length() {
        assert_eq!(generate_short_code(DEFAULT_SHORT_CODE_LENGTH).len(), 8);
        assert_eq!(generate_short_code(16).len(), 16);
    }

    #[test]
    fn test_short_code_is_alphanumeric() {
        let code = generate_short_code(DEFAULT_SHORT_CODE_LENGTH);
        assert!(code.chars().all(|c| c.is_ascii_alphanumeric()));
    }

    #[test]
    fn test_short_codes_are_distinct() {
        let mut codes = HashSet::new();
        for _ in 0..1000 {
            codes.insert(generate_short_code(DEFAULT_SHORT_CODE_LENGTH));
        }
        assert_eq!(codes.len(), 1000);
    }

    #[test]
    fn test_opaque_token_shape() {
        let token = generate_opaque_token();
        assert_eq!(token.len(), OPAQUE_TOKEN_LENGTH);
        assert!(token.chars().all(|c| c.is_ascii_alphanumeric()));
    }
}
