// Password hashing and password-reset tokens
// Uses bcrypt for both the account password and the reset-token secret

use bcrypt::{hash, verify, DEFAULT_COST};
use uuid::Uuid;

/// How long a password-reset token stays valid
pub const RESET_TOKEN_VALIDITY_MINUTES: i64 = 10;

/// Hashes a password using bcrypt
pub fn hash_password(password: &str) -> Result<String, String> {
    hash(password, DEFAULT_COST).map_err(|e| e.to_string())
}

/// Verifies a password against a bcrypt hash
pub fn verify_password(password: &str, hash: &str) -> Result<bool, String> {
    verify(password, hash).map_err(|e| e.to_string())
}

/// A freshly issued password-reset token
///
/// `token` goes into the email; only `secret_hash` is persisted, so a
/// database leak does not expose usable reset tokens.
#[derive(Debug)]
pub struct ResetToken {
    /// Single-use token in the form `<user_id>.<secret>`
    pub token: String,
    /// bcrypt hash of the secret half
    pub secret_hash: String,
}

/// Issues a reset token for a user
pub fn generate_reset_token(user_id: Uuid) -> Result<ResetToken, String> {
    let secret = Uuid::new_v4().simple().to_string();
    let secret_hash = hash(&secret, DEFAULT_COST).map_err(|e| e.to_string())?;

    Ok(ResetToken {
        token: format!("{}.{}", user_id, secret),
        secret_hash,
    })
}

/// Splits a reset token back into its user id and secret halves
///
/// Returns `None` for anything that does not look like an issued token.
pub fn parse_reset_token(token: &str) -> Option<(Uuid, &str)> {
    let (user_part, secret) = token.split_once('.')?;
    if secret.is_empty() {
        return None;
    }
    let user_id = Uuid::parse_str(user_part).ok()?;
    Some((user_id, secret))
}

/// Verifies a reset-token secret against the stored hash
pub fn verify_reset_secret(secret: &str, secret_hash: &str) -> bool {
    verify(secret, secret_hash).unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_and_verify_password() {
        let password = "test_password_123";
        let hash = hash_password(password).expect("valid hash");

        let valid = verify_password(password, &hash).expect("valid verification");
        assert!(valid);
    }

    #[test]
    fn verify_wrong_password() {
        let password = "test_password_123";
        let hash = hash_password(password).expect("valid hash");

        let valid = verify_password("wrong_password", &hash).expect("valid verification");
        assert!(!valid);
    }

    #[test]
    fn reset_token_round_trip() {
        let user_id = Uuid::new_v4();
        let issued = generate_reset_token(user_id).expect("token issued");

        let (parsed_id, secret) = parse_reset_token(&issued.token).expect("parseable token");
        assert_eq!(parsed_id, user_id);
        assert!(verify_reset_secret(secret, &issued.secret_hash));
    }

    #[test]
    fn tampered_secret_fails_verification() {
        let issued = generate_reset_token(Uuid::new_v4()).expect("token issued");
        assert!(!verify_reset_secret("not-the-secret", &issued.secret_hash));
    }

    #[test]
    fn parse_rejects_malformed_tokens() {
        assert!(parse_reset_token("no-separator").is_none());
        assert!(parse_reset_token("not-a-uuid.secret").is_none());
        assert!(parse_reset_token(&format!("{}.", Uuid::new_v4())).is_none());
    }
}
