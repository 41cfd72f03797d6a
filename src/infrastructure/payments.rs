// Hosted payment checkout integration
// Creates checkout sessions against the provider's REST API; the browser
// then redirects to the returned session URL.

use reqwest::Client;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::Deserialize;
use thiserror::Error;

const DEFAULT_BASE_URL: &str = "https://api.stripe.com";

/// Errors that can occur while creating a checkout session
#[derive(Debug, Error)]
pub enum CheckoutError {
    #[error("checkout request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("checkout provider rejected the request: HTTP {status}")]
    Provider { status: u16, body: String },
}

/// A pending payment transaction with the hosted provider
#[derive(Debug, Clone, Deserialize)]
pub struct CheckoutSession {
    /// Session identifier the client hands to the provider's redirect SDK
    pub id: String,
    /// Hosted payment page the browser navigates to
    pub url: String,
}

/// Everything needed to open a checkout session for one tour purchase
#[derive(Debug, Clone)]
pub struct CheckoutParams {
    pub product_name: String,
    pub product_description: String,
    pub unit_amount_cents: i64,
    pub currency: String,
    pub customer_email: String,
    pub client_reference_id: String,
    pub success_url: String,
    pub cancel_url: String,
}

/// Client for the checkout provider's session API
#[derive(Debug, Clone)]
pub struct CheckoutClient {
    client: Client,
    base_url: String,
    secret_key: String,
}

impl CheckoutClient {
    pub fn new(secret_key: String) -> Self {
        Self::with_base_url(secret_key, DEFAULT_BASE_URL.to_string())
    }

    pub fn with_base_url(secret_key: String, base_url: String) -> Self {
        Self {
            client: Client::new(),
            base_url,
            secret_key,
        }
    }

    /// Creates a checkout session with a single line item
    pub async fn create_session(
        &self,
        params: &CheckoutParams,
    ) -> Result<CheckoutSession, CheckoutError> {
        let form = [
            ("mode", "payment".to_string()),
            ("success_url", params.success_url.clone()),
            ("cancel_url", params.cancel_url.clone()),
            ("customer_email", params.customer_email.clone()),
            ("client_reference_id", params.client_reference_id.clone()),
            ("line_items[0][quantity]", "1".to_string()),
            (
                "line_items[0][price_data][currency]",
                params.currency.clone(),
            ),
            (
                "line_items[0][price_data][unit_amount]",
                params.unit_amount_cents.to_string(),
            ),
            (
                "line_items[0][price_data][product_data][name]",
                params.product_name.clone(),
            ),
            (
                "line_items[0][price_data][product_data][description]",
                params.product_description.clone(),
            ),
        ];

        let response = self
            .client
            .post(format!("{}/v1/checkout/sessions", self.base_url))
            .bearer_auth(&self.secret_key)
            .form(&form)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(CheckoutError::Provider {
                status: status.as_u16(),
                body,
            });
        }

        Ok(response.json().await?)
    }
}

/// Converts a decimal price into the integer minor units the provider expects
pub fn amount_in_cents(price: Decimal) -> i64 {
    (price * Decimal::from(100))
        .round()
        .to_i64()
        .unwrap_or(i64::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_params() -> CheckoutParams {
        CheckoutParams {
            product_name: "The Forest Hiker Tour".to_string(),
            product_description: "Breathtaking hike".to_string(),
            unit_amount_cents: 49700,
            currency: "usd".to_string(),
            customer_email: "leo@example.com".to_string(),
            client_reference_id: "tour-id".to_string(),
            success_url: "http://localhost:3000/".to_string(),
            cancel_url: "http://localhost:3000/tours".to_string(),
        }
    }

    #[test]
    fn whole_prices_convert_to_cents() {
        assert_eq!(amount_in_cents(Decimal::from(497)), 49700);
    }

    #[test]
    fn fractional_prices_convert_to_cents() {
        assert_eq!(amount_in_cents(Decimal::new(1999, 2)), 1999);
        assert_eq!(amount_in_cents(Decimal::new(25050, 2)), 25050);
    }

    #[tokio::test]
    async fn unreachable_provider_surfaces_error_without_session() {
        // Port 9 (discard) is not listening; no session may come back
        let client = CheckoutClient::with_base_url(
            "sk_test_unused".to_string(),
            "http://127.0.0.1:9".to_string(),
        );

        let result = client.create_session(&test_params()).await;
        assert!(matches!(result, Err(CheckoutError::Transport(_))));
    }
}
