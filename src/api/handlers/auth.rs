use axum::{extract::Path, extract::State, http::StatusCode, Json};
use chrono::{Duration, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::api::errors::ApiError;
use crate::api::state::AppState;
use crate::auth::jwt::create_token;
use crate::auth::password::{
    generate_reset_token, hash_password, parse_reset_token, verify_password,
    verify_reset_secret, RESET_TOKEN_VALIDITY_MINUTES,
};
use crate::domain::repositories::user_repository::{User, UserRepository};
use crate::domain::user::value_objects::{Email as EmailAddress, UserRole};
use crate::infrastructure::email::Email;
use crate::infrastructure::repositories::PostgresUserRepository;

/// Request body for account signup
#[derive(Debug, Deserialize)]
pub struct SignupRequest {
    pub name: String,
    pub email: String,
    pub password: String,
    pub password_confirm: String,
}

/// Response from successful signup or login
#[derive(Debug, Serialize)]
pub struct TokenResponse {
    pub token: String,
    pub user_id: Uuid,
}

/// Request body for login
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Request body for requesting a password reset
#[derive(Debug, Deserialize)]
pub struct ForgotPasswordRequest {
    pub email: String,
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

/// Request body for completing a password reset
#[derive(Debug, Deserialize)]
pub struct ResetPasswordRequest {
    pub password: String,
    pub password_confirm: String,
}

fn jwt_secret() -> String {
    std::env::var("JWT_SECRET").unwrap_or_else(|_| "dev-secret-key".to_string())
}

fn validate_password(password: &str, confirm: &str) -> Result<(), ApiError> {
    if password.len() < 8 {
        return Err(ApiError::bad_request(
            "Password must be at least 8 characters",
        ));
    }
    if password != confirm {
        return Err(ApiError::bad_request("Passwords do not match"));
    }
    Ok(())
}

/// Register a new account and send the welcome email
///
/// POST /api/v1/users/signup
pub async fn signup(
    State(state): State<AppState>,
    Json(req): Json<SignupRequest>,
) -> Result<(StatusCode, Json<TokenResponse>), ApiError> {
    if req.name.trim().is_empty() {
        return Err(ApiError::bad_request("Name cannot be empty"));
    }

    let email = EmailAddress::new(&req.email)
        .map_err(|e| ApiError::bad_request(format!("Invalid email: {}", e)))?;

    validate_password(&req.password, &req.password_confirm)?;

    let password_hash = hash_password(&req.password)
        .map_err(|e| ApiError::internal_server_error(format!("Failed to hash password: {}", e)))?;

    let user = User {
        id: Uuid::new_v4(),
        name: req.name,
        email,
        role: UserRole::User,
        password_hash,
        is_active: true,
        password_reset_hash: None,
        password_reset_expires: None,
    };

    let user_repo = PostgresUserRepository::new(state.pool.clone());
    let user_id = user_repo.create(user.clone()).await.map_err(|e| {
        if e.contains("duplicate") || e.contains("unique") {
            ApiError::bad_request("Email already registered")
        } else {
            ApiError::internal_server_error(format!("Failed to create user: {}", e))
        }
    })?;

    // Welcome email points at the account page
    let account_url = format!("{}/me", state.config.public_url);
    Email::new(&user, account_url, &state.config.email)
        .send_welcome(&state.mailer)
        .await
        .map_err(|e| {
            tracing::error!("Welcome email failed for {}: {}", user.email, e);
            ApiError::bad_gateway("Failed to send the welcome email. Please try again later.")
        })?;

    let token = create_token(user_id, &jwt_secret())
        .map_err(|e| ApiError::internal_server_error(format!("Failed to create token: {}", e)))?;

    Ok((StatusCode::CREATED, Json(TokenResponse { token, user_id })))
}

/// Login with email and password
///
/// POST /api/v1/users/login
pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> Result<Json<TokenResponse>, ApiError> {
    let email = EmailAddress::new(&req.email)
        .map_err(|e| ApiError::bad_request(format!("Invalid email: {}", e)))?;

    let user_repo = PostgresUserRepository::new(state.pool.clone());
    let user = user_repo
        .find_by_email(&email)
        .await
        .map_err(|e| ApiError::internal_server_error(format!("Database error: {}", e)))?
        .ok_or_else(|| ApiError::unauthorized("Incorrect email or password"))?;

    if !user.is_active {
        return Err(ApiError::unauthorized("Account is disabled"));
    }

    let valid = verify_password(&req.password, &user.password_hash).map_err(|e| {
        ApiError::internal_server_error(format!("Password verification failed: {}", e))
    })?;

    if !valid {
        return Err(ApiError::unauthorized("Incorrect email or password"));
    }

    let _ = user_repo.update_last_login(user.id).await;

    let token = create_token(user.id, &jwt_secret())
        .map_err(|e| ApiError::internal_server_error(format!("Failed to create token: {}", e)))?;

    Ok(Json(TokenResponse {
        token,
        user_id: user.id,
    }))
}

/// Issue a password-reset token and email it to the account
///
/// POST /api/v1/users/forgot-password
pub async fn forgot_password(
    State(state): State<AppState>,
    Json(req): Json<ForgotPasswordRequest>,
) -> Result<Json<MessageResponse>, ApiError> {
    let email = EmailAddress::new(&req.email)
        .map_err(|e| ApiError::bad_request(format!("Invalid email: {}", e)))?;

    let user_repo = PostgresUserRepository::new(state.pool.clone());
    let user = user_repo
        .find_by_email(&email)
        .await
        .map_err(|e| ApiError::internal_server_error(format!("Database error: {}", e)))?
        .ok_or_else(|| ApiError::not_found("There is no user with that email address."))?;

    let reset = generate_reset_token(user.id)
        .map_err(|e| ApiError::internal_server_error(format!("Failed to issue token: {}", e)))?;
    let expires = Utc::now() + Duration::minutes(RESET_TOKEN_VALIDITY_MINUTES);

    user_repo
        .set_password_reset(user.id, &reset.secret_hash, expires)
        .await
        .map_err(|e| ApiError::internal_server_error(format!("Failed to store token: {}", e)))?;

    let reset_url = format!(
        "{}/api/v1/users/reset-password/{}",
        state.config.public_url, reset.token
    );

    // A token we could not deliver must not stay usable
    if let Err(e) = Email::new(&user, reset_url, &state.config.email)
        .send_password_reset(&state.mailer)
        .await
    {
        tracing::error!("Password reset email failed for {}: {}", user.email, e);
        let _ = user_repo.clear_password_reset(user.id).await;
        return Err(ApiError::bad_gateway(
            "There was an error sending the email. Try again later!",
        ));
    }

    Ok(Json(MessageResponse {
        message: "Token sent to email!".to_string(),
    }))
}

/// Set a new password using an emailed reset token
///
/// PATCH /api/v1/users/reset-password/:token
pub async fn reset_password(
    State(state): State<AppState>,
    Path(token): Path<String>,
    Json(req): Json<ResetPasswordRequest>,
) -> Result<Json<TokenResponse>, ApiError> {
    const INVALID_TOKEN: &str = "Token is invalid or has expired";

    let (user_id, secret) =
        parse_reset_token(&token).ok_or_else(|| ApiError::bad_request(INVALID_TOKEN))?;

    let user_repo = PostgresUserRepository::new(state.pool.clone());
    let user = user_repo
        .find_by_id(user_id)
        .await
        .map_err(|e| ApiError::internal_server_error(format!("Database error: {}", e)))?
        .ok_or_else(|| ApiError::bad_request(INVALID_TOKEN))?;

    let secret_hash = user
        .password_reset_hash
        .as_deref()
        .ok_or_else(|| ApiError::bad_request(INVALID_TOKEN))?;

    let expires = user
        .password_reset_expires
        .ok_or_else(|| ApiError::bad_request(INVALID_TOKEN))?;

    if expires < Utc::now() || !verify_reset_secret(secret, secret_hash) {
        return Err(ApiError::bad_request(INVALID_TOKEN));
    }

    validate_password(&req.password, &req.password_confirm)?;

    let password_hash = hash_password(&req.password)
        .map_err(|e| ApiError::internal_server_error(format!("Failed to hash password: {}", e)))?;

    user_repo
        .update_password(user.id, &password_hash)
        .await
        .map_err(|e| ApiError::internal_server_error(format!("Failed to update password: {}", e)))?;

    let token = create_token(user.id, &jwt_secret())
        .map_err(|e| ApiError::internal_server_error(format!("Failed to create token: {}", e)))?;

    Ok(Json(TokenResponse {
        token,
        user_id: user.id,
    }))
}

/// Health check endpoint
///
/// GET /health
pub async fn health_check() -> &'static str {
    "OK"
}
