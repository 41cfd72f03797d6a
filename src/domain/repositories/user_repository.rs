use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::domain::user::value_objects::{Email, UserRole};

/// User data for persistence
///
/// Simple struct for account CRUD operations. `password_reset_hash` holds
/// a bcrypt hash of the reset-token secret, never the token itself.
#[derive(Debug, Clone)]
pub struct User {
    pub id: Uuid,
    pub name: String,
    pub email: Email,
    pub role: UserRole,
    pub password_hash: String,
    pub is_active: bool,
    pub password_reset_hash: Option<String>,
    pub password_reset_expires: Option<DateTime<Utc>>,
}

/// Repository trait for user accounts
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Create a new user
    async fn create(&self, user: User) -> Result<Uuid, String>;

    /// Find a user by ID
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, String>;

    /// Find a user by email address
    async fn find_by_email(&self, email: &Email) -> Result<Option<User>, String>;

    /// List all users, newest first
    async fn find_all(&self) -> Result<Vec<User>, String>;

    /// Update name and email for a user
    async fn update_profile(&self, id: Uuid, name: &str, email: &Email) -> Result<(), String>;

    /// Replace the stored password hash
    async fn update_password(&self, id: Uuid, password_hash: &str) -> Result<(), String>;

    /// Store a password-reset token hash and its expiry
    async fn set_password_reset(
        &self,
        id: Uuid,
        token_hash: &str,
        expires: DateTime<Utc>,
    ) -> Result<(), String>;

    /// Clear any pending password-reset token
    async fn clear_password_reset(&self, id: Uuid) -> Result<(), String>;

    /// Soft-delete: mark the account inactive
    async fn deactivate(&self, id: Uuid) -> Result<(), String>;

    /// Update user's last login timestamp
    async fn update_last_login(&self, id: Uuid) -> Result<(), String>;
}
