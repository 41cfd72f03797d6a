use sqlx::PgPool;

use crate::config::Config;
use crate::infrastructure::email::Mailer;
use crate::infrastructure::payments::CheckoutClient;

/// Shared application state handed to handlers via `State`
#[derive(Clone)]
pub struct AppState {
    pub pool: PgPool,
    pub config: Config,
    pub mailer: Mailer,
    pub checkout: CheckoutClient,
}

impl AppState {
    /// Wires up the outbound integrations from configuration
    pub fn new(pool: PgPool, config: Config) -> Self {
        let mailer = Mailer::from_config(&config);
        let checkout = CheckoutClient::new(config.checkout.secret_key.clone());

        Self {
            pool,
            config,
            mailer,
            checkout,
        }
    }
}
