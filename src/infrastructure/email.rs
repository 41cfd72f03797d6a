// Transactional email over an HTTP mail API
// Transport is selected by deployment environment: production talks TLS to
// the hosted mail service, development posts to a local mail catcher.

use reqwest::Client;
use serde::Serialize;
use thiserror::Error;

use crate::config::{Config, EmailConfig, Environment};
use crate::domain::repositories::user_repository::User;

/// Display name used in the `from` field alongside EMAIL_FROM
const SENDER_NAME: &str = "Wildtrails";

/// Errors that can occur while sending mail
#[derive(Debug, Error)]
pub enum EmailError {
    #[error("mail transport request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("mail API rejected the message: HTTP {status}")]
    Rejected { status: u16 },
}

/// Message payload accepted by the mail API
#[derive(Debug, Serialize)]
struct OutgoingMessage<'a> {
    from: &'a str,
    to: &'a str,
    subject: &'a str,
    html: &'a str,
    text: &'a str,
}

/// HTTP client for the mail API
#[derive(Debug, Clone)]
pub struct Mailer {
    client: Client,
    base_url: String,
    username: String,
    password: String,
}

impl Mailer {
    pub fn new(base_url: String, username: String, password: String) -> Self {
        Self {
            client: Client::new(),
            base_url,
            username,
            password,
        }
    }

    /// Builds the mailer for the configured environment
    pub fn from_config(config: &Config) -> Self {
        Self::new(
            transport_base_url(&config.email, config.environment),
            config.email.username.clone(),
            config.email.password.clone(),
        )
    }

    async fn deliver(&self, message: &OutgoingMessage<'_>) -> Result<(), EmailError> {
        let response = self
            .client
            .post(format!("{}/messages", self.base_url))
            .basic_auth(&self.username, Some(&self.password))
            .json(message)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(EmailError::Rejected {
                status: response.status().as_u16(),
            });
        }

        Ok(())
    }
}

/// Picks the mail endpoint for the environment
fn transport_base_url(email: &EmailConfig, environment: Environment) -> String {
    if environment.is_production() {
        format!("https://{}", email.host)
    } else {
        format!("http://{}:{}", email.host, email.port)
    }
}

/// A transactional email addressed to one user
///
/// Carries everything the templates need: the recipient, their first name
/// for the greeting, and the action URL the email points at.
#[derive(Debug, Clone)]
pub struct Email {
    to: String,
    first_name: String,
    url: String,
    from: String,
}

impl Email {
    /// Builds an email for a user
    ///
    /// The greeting name is the first word of the user's full name.
    pub fn new(user: &User, url: String, config: &EmailConfig) -> Self {
        let first_name = user
            .name
            .split_whitespace()
            .next()
            .unwrap_or(user.name.as_str())
            .to_string();

        Self {
            to: user.email.to_string(),
            first_name,
            url,
            from: format!("{} <{}>", SENDER_NAME, config.from_address),
        }
    }

    pub fn to(&self) -> &str {
        &self.to
    }

    pub fn first_name(&self) -> &str {
        &self.first_name
    }

    pub fn sender(&self) -> &str {
        &self.from
    }

    /// Sends the account-welcome email
    pub async fn send_welcome(&self, mailer: &Mailer) -> Result<(), EmailError> {
        self.send(
            mailer,
            "Welcome to the Wildtrails family!",
            &welcome_html(&self.first_name, &self.url),
            &welcome_text(&self.first_name, &self.url),
        )
        .await
    }

    /// Sends the password-reset email
    pub async fn send_password_reset(&self, mailer: &Mailer) -> Result<(), EmailError> {
        self.send(
            mailer,
            "Your password reset token (valid for only 10 minutes)",
            &password_reset_html(&self.first_name, &self.url),
            &password_reset_text(&self.first_name, &self.url),
        )
        .await
    }

    async fn send(
        &self,
        mailer: &Mailer,
        subject: &str,
        html: &str,
        text: &str,
    ) -> Result<(), EmailError> {
        let message = OutgoingMessage {
            from: &self.from,
            to: &self.to,
            subject,
            html,
            text,
        };

        mailer.deliver(&message).await
    }
}

fn welcome_html(first_name: &str, url: &str) -> String {
    format!(
        "<h1>Hi {first_name},</h1>\
         <p>Welcome to Wildtrails, we're glad to have you!</p>\
         <p>We're all a big family here, so make sure to upload your user photo \
         so we get to know you a bit better.</p>\
         <p><a href=\"{url}\">Visit your account page</a></p>\
         <p>If you need any help with booking your next tour, please don't \
         hesitate to contact us.</p>"
    )
}

fn welcome_text(first_name: &str, url: &str) -> String {
    format!(
        "Hi {first_name},\n\nWelcome to Wildtrails, we're glad to have you!\n\n\
         Visit your account page: {url}\n"
    )
}

fn password_reset_html(first_name: &str, url: &str) -> String {
    format!(
        "<h1>Hi {first_name},</h1>\
         <p>Forgot your password? Submit a request with your new password to:</p>\
         <p><a href=\"{url}\">{url}</a></p>\
         <p>If you didn't forget your password, please ignore this email.</p>"
    )
}

fn password_reset_text(first_name: &str, url: &str) -> String {
    format!(
        "Hi {first_name},\n\nForgot your password? Submit a request with your \
         new password to: {url}\n\nIf you didn't forget your password, please \
         ignore this email.\n"
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::user::value_objects::{Email as EmailAddress, UserRole};
    use uuid::Uuid;

    fn test_config() -> EmailConfig {
        EmailConfig {
            from_address: "hello@wildtrails.io".to_string(),
            username: "apikey".to_string(),
            password: "secret".to_string(),
            host: "localhost".to_string(),
            port: 2525,
        }
    }

    fn test_user(name: &str) -> User {
        User {
            id: Uuid::new_v4(),
            name: name.to_string(),
            email: EmailAddress::new("leo@example.com").unwrap(),
            role: UserRole::User,
            password_hash: "hash".to_string(),
            is_active: true,
            password_reset_hash: None,
            password_reset_expires: None,
        }
    }

    #[test]
    fn greeting_name_is_first_word_of_full_name() {
        let user = test_user("Leo Gilbert Carter");
        let email = Email::new(&user, "http://localhost/me".to_string(), &test_config());

        assert_eq!(email.first_name(), "Leo");
    }

    #[test]
    fn single_word_name_is_used_as_is() {
        let user = test_user("Leo");
        let email = Email::new(&user, "http://localhost/me".to_string(), &test_config());

        assert_eq!(email.first_name(), "Leo");
    }

    #[test]
    fn sender_combines_display_name_and_address() {
        let user = test_user("Leo Gilbert");
        let email = Email::new(&user, "http://localhost/me".to_string(), &test_config());

        assert_eq!(email.sender(), "Wildtrails <hello@wildtrails.io>");
        assert_eq!(email.to(), "leo@example.com");
    }

    #[test]
    fn development_transport_targets_local_catcher() {
        let url = transport_base_url(&test_config(), Environment::Development);
        assert_eq!(url, "http://localhost:2525");
    }

    #[test]
    fn production_transport_uses_tls_host() {
        let mut config = test_config();
        config.host = "api.mailprovider.com".to_string();

        let url = transport_base_url(&config, Environment::Production);
        assert_eq!(url, "https://api.mailprovider.com");
    }

    #[test]
    fn templates_mention_name_and_url() {
        let html = welcome_html("Leo", "http://localhost/me");
        assert!(html.contains("Hi Leo"));
        assert!(html.contains("http://localhost/me"));

        let reset = password_reset_text("Leo", "http://localhost/reset/abc");
        assert!(reset.contains("http://localhost/reset/abc"));
    }

    #[tokio::test]
    async fn unreachable_transport_surfaces_error() {
        // Port 9 (discard) is not listening; the send must fail, not hang
        let mailer = Mailer::new(
            "http://127.0.0.1:9".to_string(),
            "user".to_string(),
            "pass".to_string(),
        );
        let user = test_user("Leo Gilbert");
        let email = Email::new(&user, "http://localhost/me".to_string(), &test_config());

        let result = email.send_welcome(&mailer).await;
        assert!(matches!(result, Err(EmailError::Transport(_))));
    }
}
