use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::domain::repositories::user_repository::{User, UserRepository};
use crate::domain::user::value_objects::{Email, UserRole};

/// PostgreSQL implementation of UserRepository
pub struct PostgresUserRepository {
    pool: PgPool,
}

impl PostgresUserRepository {
    /// Creates a new PostgresUserRepository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(sqlx::FromRow)]
struct UserRow {
    id: Uuid,
    name: String,
    email: String,
    role: UserRole,
    password_hash: String,
    is_active: bool,
    password_reset_hash: Option<String>,
    password_reset_expires: Option<DateTime<Utc>>,
}

impl UserRow {
    fn into_user(self) -> Result<User, String> {
        let email = Email::new(&self.email)
            .map_err(|e| format!("Invalid email from database: {}", e))?;

        Ok(User {
            id: self.id,
            name: self.name,
            email,
            role: self.role,
            password_hash: self.password_hash,
            is_active: self.is_active,
            password_reset_hash: self.password_reset_hash,
            password_reset_expires: self.password_reset_expires,
        })
    }
}

const USER_COLUMNS: &str = "id, name, email, role, password_hash, is_active, \
                            password_reset_hash, password_reset_expires";

#[async_trait]
impl UserRepository for PostgresUserRepository {
    async fn create(&self, user: User) -> Result<Uuid, String> {
        sqlx::query(
            r#"
            INSERT INTO users (id, name, email, role, password_hash, is_active)
            VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(user.id)
        .bind(&user.name)
        .bind(user.email.as_str())
        .bind(user.role)
        .bind(&user.password_hash)
        .bind(user.is_active)
        .execute(&self.pool)
        .await
        .map_err(|e| format!("Failed to create user: {}", e))?;

        Ok(user.id)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, String> {
        let row = sqlx::query_as::<_, UserRow>(&format!(
            "SELECT {} FROM users WHERE id = $1",
            USER_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| format!("Failed to find user by id: {}", e))?;

        row.map(UserRow::into_user).transpose()
    }

    async fn find_by_email(&self, email: &Email) -> Result<Option<User>, String> {
        let row = sqlx::query_as::<_, UserRow>(&format!(
            "SELECT {} FROM users WHERE email = $1",
            USER_COLUMNS
        ))
        .bind(email.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| format!("Failed to find user by email: {}", e))?;

        row.map(UserRow::into_user).transpose()
    }

    async fn find_all(&self) -> Result<Vec<User>, String> {
        let rows = sqlx::query_as::<_, UserRow>(&format!(
            "SELECT {} FROM users ORDER BY created_at DESC",
            USER_COLUMNS
        ))
        .fetch_all(&self.pool)
        .await
        .map_err(|e| format!("Failed to list users: {}", e))?;

        rows.into_iter().map(UserRow::into_user).collect()
    }

    async fn update_profile(&self, id: Uuid, name: &str, email: &Email) -> Result<(), String> {
        sqlx::query(
            r#"
            UPDATE users
            SET name = $2, email = $3, updated_at = NOW()
            WHERE id = $1
            "#,
        )
        .bind(id)
        .bind(name)
        .bind(email.as_str())
        .execute(&self.pool)
        .await
        .map_err(|e| format!("Failed to update profile: {}", e))?;

        Ok(())
    }

    async fn update_password(&self, id: Uuid, password_hash: &str) -> Result<(), String> {
        sqlx::query(
            r#"
            UPDATE users
            SET password_hash = $2,
                password_reset_hash = NULL,
                password_reset_expires = NULL,
                updated_at = NOW()
            WHERE id = $1
            "#,
        )
        .bind(id)
        .bind(password_hash)
        .execute(&self.pool)
        .await
        .map_err(|e| format!("Failed to update password: {}", e))?;

        Ok(())
    }

    async fn set_password_reset(
        &self,
        id: Uuid,
        token_hash: &str,
        expires: DateTime<Utc>,
    ) -> Result<(), String> {
        sqlx::query(
            r#"
            UPDATE users
            SET password_reset_hash = $2,
                password_reset_expires = $3,
                updated_at = NOW()
            WHERE id = $1
            "#,
        )
        .bind(id)
        .bind(token_hash)
        .bind(expires)
        .execute(&self.pool)
        .await
        .map_err(|e| format!("Failed to store reset token: {}", e))?;

        Ok(())
    }

    async fn clear_password_reset(&self, id: Uuid) -> Result<(), String> {
        sqlx::query(
            r#"
            UPDATE users
            SET password_reset_hash = NULL,
                password_reset_expires = NULL,
                updated_at = NOW()
            WHERE id = $1
            "#,
        )
        .bind(id)
        .execute(&self.pool)
        .await
        .map_err(|e| format!("Failed to clear reset token: {}", e))?;

        Ok(())
    }

    async fn deactivate(&self, id: Uuid) -> Result<(), String> {
        sqlx::query(
            r#"
            UPDATE users
            SET is_active = FALSE, updated_at = NOW()
            WHERE id = $1
            "#,
        )
        .bind(id)
        .execute(&self.pool)
        .await
        .map_err(|e| format!("Failed to deactivate user: {}", e))?;

        Ok(())
    }

    async fn update_last_login(&self, id: Uuid) -> Result<(), String> {
        sqlx::query(
            r#"
            UPDATE users
            SET last_login = NOW(), updated_at = NOW()
            WHERE id = $1
            "#,
        )
        .bind(id)
        .execute(&self.pool)
        .await
        .map_err(|e| format!("Failed to update last login: {}", e))?;

        Ok(())
    }
}
