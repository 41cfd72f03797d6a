// HTTP handlers for the REST sub-routers

pub mod auth;
pub mod bookings;
pub mod reviews;
pub mod tours;
pub mod users;

use sqlx::PgPool;
use uuid::Uuid;

use crate::api::errors::ApiError;
use crate::domain::repositories::user_repository::{User, UserRepository};
use crate::domain::user::value_objects::UserRole;
use crate::infrastructure::repositories::PostgresUserRepository;

/// Loads the account behind a verified token
///
/// Tokens can outlive their accounts, so a missing or deactivated user is
/// an authentication failure, not a server error.
pub(crate) async fn load_current_user(pool: &PgPool, user_id: Uuid) -> Result<User, ApiError> {
    let user_repo = PostgresUserRepository::new(pool.clone());
    let user = user_repo
        .find_by_id(user_id)
        .await
        .map_err(|e| ApiError::internal_server_error(format!("Database error: {}", e)))?
        .ok_or_else(|| {
            ApiError::unauthorized("The user belonging to this token no longer exists.")
        })?;

    if !user.is_active {
        return Err(ApiError::unauthorized("Account is disabled"));
    }

    Ok(user)
}

/// Rejects callers whose role is not in the allowed set
pub(crate) fn require_role(user: &User, allowed: &[UserRole]) -> Result<(), ApiError> {
    if allowed.contains(&user.role) {
        Ok(())
    } else {
        Err(ApiError::forbidden(
            "You do not have permission to perform this action",
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::user::value_objects::Email;

    fn user_with_role(role: UserRole) -> User {
        User {
            id: Uuid::new_v4(),
            name: "Test User".to_string(),
            email: Email::new("test@example.com").unwrap(),
            role,
            password_hash: "hash".to_string(),
            is_active: true,
            password_reset_hash: None,
            password_reset_expires: None,
        }
    }

    #[test]
    fn matching_role_is_allowed() {
        let admin = user_with_role(UserRole::Admin);
        assert!(require_role(&admin, &[UserRole::Admin, UserRole::LeadGuide]).is_ok());
    }

    #[test]
    fn missing_role_is_forbidden() {
        let user = user_with_role(UserRole::User);
        let err = require_role(&user, &[UserRole::Admin]).unwrap_err();
        assert_eq!(err.status, axum::http::StatusCode::FORBIDDEN);
    }
}
