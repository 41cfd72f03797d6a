// Router assembly
// Wires the sub-routers behind the global middleware pipeline; unmatched
// paths fall through to the structured 404 handler.

use axum::{
    extract::DefaultBodyLimit,
    http::Uri,
    middleware::{from_fn, from_fn_with_state},
    routing::{delete, get, patch, post},
    Router,
};
use std::time::Duration;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::api::errors::ApiError;
use crate::api::handlers::{auth, bookings, reviews, tours, users};
use crate::api::middleware::param_pollution::dedup_query_params;
use crate::api::middleware::rate_limit::{rate_limit, RateLimiter};
use crate::api::middleware::sanitize::{sanitize_request, BODY_LIMIT_BYTES};
use crate::api::middleware::security::security_headers;
use crate::api::state::AppState;

/// Builds the application router with a limiter sized from configuration
pub fn app(state: AppState) -> Router {
    let limiter = RateLimiter::new(
        state.config.rate_limit_max,
        Duration::from_secs(state.config.rate_limit_window_secs),
    );
    app_with_limiter(state, limiter)
}

/// Builds the application router around an existing rate limiter
pub fn app_with_limiter(state: AppState, limiter: RateLimiter) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let users_router = Router::new()
        .route("/signup", post(auth::signup))
        .route("/login", post(auth::login))
        .route("/forgot-password", post(auth::forgot_password))
        .route("/reset-password/:token", patch(auth::reset_password))
        .route(
            "/me",
            get(users::me).patch(users::update_me).delete(users::delete_me),
        )
        .route("/", get(users::list_users));

    let tours_router = Router::new()
        .route("/", get(tours::list_tours).post(tours::create_tour))
        .route(
            "/:id",
            get(tours::get_tour)
                .patch(tours::update_tour)
                .delete(tours::delete_tour),
        )
        .route("/:id/map", get(tours::tour_map))
        .route(
            "/:id/reviews",
            get(reviews::list_tour_reviews).post(reviews::create_review),
        );

    let reviews_router = Router::new().route("/:id", delete(reviews::delete_review));

    let bookings_router = Router::new()
        .route("/", get(bookings::my_bookings).post(bookings::create_booking))
        .route(
            "/checkout-session/:tour_id",
            get(bookings::checkout_session),
        );

    // Layers wrap everything added before them, so requests pass through
    // security headers, tracing, rate limiting, sanitization, and the
    // parameter-pollution guard before reaching a router or the fallback.
    Router::new()
        .route("/health", get(auth::health_check))
        .nest("/api/v1/users", users_router)
        .nest("/api/v1/tours", tours_router)
        .nest("/api/v1/reviews", reviews_router)
        .nest("/api/v1/bookings", bookings_router)
        .fallback(not_found)
        .layer(DefaultBodyLimit::max(BODY_LIMIT_BYTES))
        .layer(from_fn(dedup_query_params))
        .layer(from_fn(sanitize_request))
        .layer(from_fn_with_state(limiter, rate_limit))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .layer(from_fn(security_headers))
        .with_state(state)
}

/// Unmatched routes become a structured 404 naming the requested URL
async fn not_found(uri: Uri) -> ApiError {
    ApiError::not_found(format!("Can't find {} on this server!", uri))
}
