//! Time-limited single-use token entity.

use chrono::{DateTime, Duration, Utc};

/// What flow a token authorizes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenType {
    PasswordReset,
    EmailConfirmation,
}

impl TokenType {
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "password_reset" => Some(Self::PasswordReset),
            "email_confirmation" => Some(Self::EmailConfirmation),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::PasswordReset => "password_reset",
            Self::EmailConfirmation => "email_confirmation",
        }
    }
}

/// Opaque token usable once, within a type-specific TTL of its creation.
#[derive(Debug, Clone)]
pub struct TimeLimitedToken {
    pub id: i64,
    pub user_id: i64,
    pub token: String,
    pub token_type: TokenType,
    pub created_at: DateTime<Utc>,
    pub used_at: Option<DateTime<Utc>>,
}

impl TimeLimitedToken {
    pub fn is_used(&self) -> bool {
        self.used_at.is_some()
    }

    /// Expiry check: `now >= created_at + ttl`.
    pub fn is_expired(&self, ttl: Duration) -> bool {
        Utc::now() >= self.created_at + ttl
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn token_created_at(created_at: DateTime<Utc>) -> TimeLimitedToken {
        TimeLimitedToken {
            id: 1,
            user_id: 7,
            token: "t".repeat(48),
            token_type: TokenType::PasswordReset,
            created_at,
            used_at: None,
        }
    }

    #[test]
    fn test_token_type_round_trip() {
        assert_eq!(
            TokenType::parse("password_reset"),
            Some(TokenType::PasswordReset)
        );
        assert_eq!(
            TokenType::parse("email_confirmation"),
            Some(TokenType::EmailConfirmation)
        );
        assert_eq!(TokenType::parse("session"), None);
        assert_eq!(TokenType::PasswordReset.as_str(), "password_reset");
    }

    #[test]
    fn test_not_expired_just_before_ttl() {
        // Created 3h59m ago with a 4h TTL.
        let token = token_created_at(Utc::now() - Duration::minutes(239));
        assert!(!token.is_expired(Duration::hours(4)));
    }

    #[test]
    fn test_expired_just_after_ttl() {
        // Created 4h01m ago with a 4h TTL.
        let token = token_created_at(Utc::now() - Duration::minutes(241));
        assert!(token.is_expired(Duration::hours(4)));
    }

    #[test]
    fn test_is_used() {
        let mut token = token_created_at(Utc::now());
        assert!(!token.is_used());
        token.used_at = Some(Utc::now());
        assert!(token.is_used());
    }
}
