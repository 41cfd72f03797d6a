use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::api::errors::ApiError;
use crate::api::handlers::tours::find_tour;
use crate::api::handlers::{load_current_user, require_role};
use crate::api::middleware::JwtAuth;
use crate::api::state::AppState;
use crate::domain::booking::Booking;
use crate::domain::repositories::booking_repository::BookingRepository;
use crate::domain::user::value_objects::UserRole;
use crate::infrastructure::payments::{amount_in_cents, CheckoutParams, CheckoutSession};
use crate::infrastructure::repositories::PostgresBookingRepository;

/// Response wrapping a freshly created checkout session
///
/// The client redirects the browser to `session.url`; `session.id` feeds
/// the provider's redirect SDK.
#[derive(Debug, Serialize)]
pub struct CheckoutSessionResponse {
    pub status: &'static str,
    pub session: CheckoutSessionView,
}

#[derive(Debug, Serialize)]
pub struct CheckoutSessionView {
    pub id: String,
    pub url: String,
}

impl From<CheckoutSession> for CheckoutSessionView {
    fn from(session: CheckoutSession) -> Self {
        Self {
            id: session.id,
            url: session.url,
        }
    }
}

/// Request body for recording a booking directly (admin)
#[derive(Debug, Deserialize)]
pub struct CreateBookingRequest {
    pub tour_id: Uuid,
    pub user_id: Uuid,
    pub price: Decimal,
}

/// API view of a booking
#[derive(Debug, Serialize)]
pub struct BookingResponse {
    pub id: Uuid,
    pub tour_id: Uuid,
    pub user_id: Uuid,
    pub price: Decimal,
    pub paid: bool,
    pub created_at: DateTime<Utc>,
}

impl From<&Booking> for BookingResponse {
    fn from(booking: &Booking) -> Self {
        Self {
            id: booking.id(),
            tour_id: booking.tour_id(),
            user_id: booking.user_id(),
            price: booking.price(),
            paid: booking.paid(),
            created_at: booking.created_at(),
        }
    }
}

/// Open a hosted checkout session for a tour
///
/// GET /api/v1/bookings/checkout-session/:tour_id
pub async fn checkout_session(
    State(state): State<AppState>,
    JwtAuth(user_id): JwtAuth,
    Path(tour_id): Path<Uuid>,
) -> Result<Json<CheckoutSessionResponse>, ApiError> {
    let caller = load_current_user(&state.pool, user_id).await?;
    let tour = find_tour(&state, tour_id).await?;

    let params = CheckoutParams {
        product_name: format!("{} Tour", tour.name()),
        product_description: tour.summary().to_string(),
        unit_amount_cents: amount_in_cents(tour.price()),
        currency: "usd".to_string(),
        customer_email: caller.email.to_string(),
        client_reference_id: tour.id().to_string(),
        success_url: state.config.checkout.success_url.clone(),
        cancel_url: state.config.checkout.cancel_url.clone(),
    };

    let session = state.checkout.create_session(&params).await.map_err(|e| {
        tracing::error!("Checkout session for tour {} failed: {}", tour_id, e);
        ApiError::bad_gateway("Unable to start the checkout. Please try again later.")
    })?;

    Ok(Json(CheckoutSessionResponse {
        status: "success",
        session: session.into(),
    }))
}

/// Record a booking directly (admin only)
///
/// POST /api/v1/bookings
pub async fn create_booking(
    State(state): State<AppState>,
    JwtAuth(user_id): JwtAuth,
    Json(req): Json<CreateBookingRequest>,
) -> Result<(StatusCode, Json<BookingResponse>), ApiError> {
    let caller = load_current_user(&state.pool, user_id).await?;
    require_role(&caller, &[UserRole::Admin])?;

    find_tour(&state, req.tour_id).await?;

    let (booking, events) =
        Booking::new(req.tour_id, req.user_id, req.price).map_err(ApiError::bad_request)?;

    let booking_repo = PostgresBookingRepository::new(state.pool.clone());
    booking_repo
        .create(&booking)
        .await
        .map_err(|e| ApiError::internal_server_error(format!("Failed to create booking: {}", e)))?;

    for event in events {
        tracing::info!("booking event: {:?}", event);
    }

    Ok((StatusCode::CREATED, Json(BookingResponse::from(&booking))))
}

/// The caller's bookings, newest first
///
/// GET /api/v1/bookings
pub async fn my_bookings(
    State(state): State<AppState>,
    JwtAuth(user_id): JwtAuth,
) -> Result<Json<Vec<BookingResponse>>, ApiError> {
    let caller = load_current_user(&state.pool, user_id).await?;

    let booking_repo = PostgresBookingRepository::new(state.pool.clone());
    let bookings = booking_repo
        .find_by_user(caller.id)
        .await
        .map_err(|e| ApiError::internal_server_error(format!("Database error: {}", e)))?;

    Ok(Json(bookings.iter().map(BookingResponse::from).collect()))
}
