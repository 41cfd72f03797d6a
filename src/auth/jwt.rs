// JWT token creation and verification
// Token lifetime comes from JWT_EXPIRES_IN_HOURS (default 8)

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

const DEFAULT_EXPIRY_HOURS: i64 = 8;

/// JWT claims structure
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    /// User ID (subject)
    pub sub: Uuid,
    /// Expiry timestamp (seconds since epoch)
    pub exp: usize,
}

fn expiry_hours() -> i64 {
    std::env::var("JWT_EXPIRES_IN_HOURS")
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(DEFAULT_EXPIRY_HOURS)
}

/// Creates a JWT token for a user
///
/// Signed with HS256; carries the user id in the `sub` claim.
///
/// # Example
/// ```
/// use wildtrails_api::auth::jwt::create_token;
/// use uuid::Uuid;
///
/// let token = create_token(Uuid::new_v4(), "your-secret-key").expect("valid token");
/// assert!(!token.is_empty());
/// ```
pub fn create_token(user_id: Uuid, secret: &str) -> Result<String, String> {
    let expiry = Utc::now() + Duration::hours(expiry_hours());
    let claims = Claims {
        sub: user_id,
        exp: expiry.timestamp() as usize,
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_ref()),
    )
    .map_err(|e| e.to_string())
}

/// Verifies and decodes a JWT token
///
/// # Returns
/// * `Ok(Claims)` - The decoded claims if token is valid
/// * `Err(String)` - If token is invalid or expired
pub fn verify_token(token: &str, secret: &str) -> Result<Claims, String> {
    decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_ref()),
        &Validation::default(),
    )
    .map(|data| data.claims)
    .map_err(|e| e.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    const TEST_SECRET: &str = "test-secret-key-for-unit-tests";

    #[test]
    fn create_and_verify_token() {
        let user_id = Uuid::new_v4();
        let token = create_token(user_id, TEST_SECRET).expect("valid token");

        let claims = verify_token(&token, TEST_SECRET).expect("valid verification");
        assert_eq!(claims.sub, user_id);
    }

    #[test]
    fn wrong_secret_fails() {
        let user_id = Uuid::new_v4();
        let token = create_token(user_id, TEST_SECRET).expect("valid token");

        let result = verify_token(&token, "wrong-secret");
        assert!(result.is_err());
    }

    #[test]
    fn invalid_token_fails() {
        let result = verify_token("invalid.token.string", TEST_SECRET);
        assert!(result.is_err());
    }

    #[test]
    fn token_expiry_is_in_the_future() {
        let user_id = Uuid::new_v4();
        let token = create_token(user_id, TEST_SECRET).expect("valid token");

        let claims = verify_token(&token, TEST_SECRET).expect("valid verification");
        assert!(claims.exp as i64 > Utc::now().timestamp());
    }
}
