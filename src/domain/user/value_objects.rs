use serde::{Deserialize, Serialize};
use std::fmt;

/// Email value object representing a valid email address
///
/// # Invariants
/// - Must contain '@' character
/// - Must be at least 3 characters long
/// - Is immutable after construction
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Email(String);

impl Email {
    /// Creates a new Email value object
    ///
    /// # Example
    /// ```
    /// use wildtrails_api::domain::user::value_objects::Email;
    ///
    /// let email = Email::new("test@example.com").expect("valid email");
    /// assert_eq!(email.as_str(), "test@example.com");
    /// ```
    pub fn new(email: impl Into<String>) -> Result<Self, String> {
        let email = email.into();
        if Self::is_valid(&email) {
            Ok(Email(email))
        } else {
            Err(format!("Invalid email: {}", email))
        }
    }

    fn is_valid(email: &str) -> bool {
        email.contains('@') && email.len() >= 3
    }

    /// Returns the email as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Email {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Authorization role assigned to a user account
///
/// Stored in Postgres as the `user_role` enum. `LeadGuide` serializes as
/// "lead-guide" on the wire and in the database.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "user_role", rename_all = "kebab-case")]
#[serde(rename_all = "kebab-case")]
pub enum UserRole {
    User,
    Guide,
    LeadGuide,
    Admin,
}

impl UserRole {
    /// Roles allowed to create, update, and delete tours
    pub fn can_manage_tours(&self) -> bool {
        matches!(self, UserRole::Admin | UserRole::LeadGuide)
    }

    /// Only plain users write reviews; staff accounts cannot review tours
    pub fn can_write_reviews(&self) -> bool {
        matches!(self, UserRole::User)
    }
}

impl fmt::Display for UserRole {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let label = match self {
            UserRole::User => "user",
            UserRole::Guide => "guide",
            UserRole::LeadGuide => "lead-guide",
            UserRole::Admin => "admin",
        };
        write!(f, "{}", label)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn valid_email() {
        assert!(Email::new("test@example.com").is_ok());
    }

    #[test]
    fn valid_email_with_subdomain() {
        assert!(Email::new("user@mail.example.com").is_ok());
    }

    #[test]
    fn invalid_email_no_at_symbol() {
        assert!(Email::new("invalid").is_err());
    }

    #[test]
    fn invalid_email_empty() {
        assert!(Email::new("").is_err());
    }

    #[test]
    fn email_display() {
        let email = Email::new("test@example.com").unwrap();
        assert_eq!(format!("{}", email), "test@example.com");
    }

    #[test]
    fn admin_and_lead_guide_manage_tours() {
        assert!(UserRole::Admin.can_manage_tours());
        assert!(UserRole::LeadGuide.can_manage_tours());
        assert!(!UserRole::Guide.can_manage_tours());
        assert!(!UserRole::User.can_manage_tours());
    }

    #[test]
    fn only_plain_users_write_reviews() {
        assert!(UserRole::User.can_write_reviews());
        assert!(!UserRole::Guide.can_write_reviews());
        assert!(!UserRole::Admin.can_write_reviews());
    }

    #[test]
    fn lead_guide_serializes_kebab_case() {
        let json = serde_json::to_string(&UserRole::LeadGuide).unwrap();
        assert_eq!(json, "\"lead-guide\"");
    }

    #[test]
    fn role_display() {
        assert_eq!(UserRole::LeadGuide.to_string(), "lead-guide");
        assert_eq!(UserRole::User.to_string(), "user");
    }
}
