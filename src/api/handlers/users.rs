use axum::{extract::State, http::StatusCode, Json};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::api::errors::ApiError;
use crate::api::handlers::{load_current_user, require_role};
use crate::api::middleware::JwtAuth;
use crate::api::state::AppState;
use crate::domain::repositories::user_repository::{User, UserRepository};
use crate::domain::user::value_objects::{Email as EmailAddress, UserRole};
use crate::infrastructure::repositories::PostgresUserRepository;

/// Public view of a user account
#[derive(Debug, Serialize)]
pub struct UserResponse {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub role: UserRole,
}

impl From<&User> for UserResponse {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            name: user.name.clone(),
            email: user.email.to_string(),
            role: user.role,
        }
    }
}

/// Request body for profile updates
///
/// The password fields exist only to reject password changes on this
/// route; passwords move through the reset flow.
#[derive(Debug, Deserialize)]
pub struct UpdateMeRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
    pub password_confirm: Option<String>,
}

/// Current user's profile
///
/// GET /api/v1/users/me
pub async fn me(
    State(state): State<AppState>,
    JwtAuth(user_id): JwtAuth,
) -> Result<Json<UserResponse>, ApiError> {
    let user = load_current_user(&state.pool, user_id).await?;
    Ok(Json(UserResponse::from(&user)))
}

/// Update the current user's name and email
///
/// PATCH /api/v1/users/me
pub async fn update_me(
    State(state): State<AppState>,
    JwtAuth(user_id): JwtAuth,
    Json(req): Json<UpdateMeRequest>,
) -> Result<Json<UserResponse>, ApiError> {
    if req.password.is_some() || req.password_confirm.is_some() {
        return Err(ApiError::bad_request(
            "This route is not for password updates. Please use /forgot-password.",
        ));
    }

    let user = load_current_user(&state.pool, user_id).await?;

    let name = match req.name {
        Some(name) if !name.trim().is_empty() => name,
        Some(_) => return Err(ApiError::bad_request("Name cannot be empty")),
        None => user.name.clone(),
    };

    let email = match req.email {
        Some(email) => EmailAddress::new(&email)
            .map_err(|e| ApiError::bad_request(format!("Invalid email: {}", e)))?,
        None => user.email.clone(),
    };

    let user_repo = PostgresUserRepository::new(state.pool.clone());
    user_repo
        .update_profile(user.id, &name, &email)
        .await
        .map_err(|e| {
            if e.contains("duplicate") || e.contains("unique") {
                ApiError::bad_request("Email already registered")
            } else {
                ApiError::internal_server_error(format!("Failed to update profile: {}", e))
            }
        })?;

    Ok(Json(UserResponse {
        id: user.id,
        name,
        email: email.to_string(),
        role: user.role,
    }))
}

/// Soft-delete the current account
///
/// DELETE /api/v1/users/me
pub async fn delete_me(
    State(state): State<AppState>,
    JwtAuth(user_id): JwtAuth,
) -> Result<StatusCode, ApiError> {
    let user = load_current_user(&state.pool, user_id).await?;

    let user_repo = PostgresUserRepository::new(state.pool.clone());
    user_repo
        .deactivate(user.id)
        .await
        .map_err(|e| ApiError::internal_server_error(format!("Failed to deactivate: {}", e)))?;

    Ok(StatusCode::NO_CONTENT)
}

/// List all accounts (admin only)
///
/// GET /api/v1/users
pub async fn list_users(
    State(state): State<AppState>,
    JwtAuth(user_id): JwtAuth,
) -> Result<Json<Vec<UserResponse>>, ApiError> {
    let caller = load_current_user(&state.pool, user_id).await?;
    require_role(&caller, &[UserRole::Admin])?;

    let user_repo = PostgresUserRepository::new(state.pool.clone());
    let users = user_repo
        .find_all()
        .await
        .map_err(|e| ApiError::internal_server_error(format!("Database error: {}", e)))?;

    Ok(Json(users.iter().map(UserResponse::from).collect()))
}
