use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::api::errors::ApiError;
use crate::api::handlers::load_current_user;
use crate::api::handlers::tours::find_tour;
use crate::api::middleware::JwtAuth;
use crate::api::state::AppState;
use crate::domain::repositories::review_repository::ReviewRepository;
use crate::domain::review::Review;
use crate::domain::user::value_objects::UserRole;
use crate::infrastructure::repositories::PostgresReviewRepository;

/// Request body for creating a review
#[derive(Debug, Deserialize)]
pub struct CreateReviewRequest {
    pub rating: i32,
    pub review: String,
}

/// API view of a review
#[derive(Debug, Serialize)]
pub struct ReviewResponse {
    pub id: Uuid,
    pub tour_id: Uuid,
    pub author_id: Uuid,
    pub rating: i32,
    pub review: String,
    pub created_at: DateTime<Utc>,
}

impl From<&Review> for ReviewResponse {
    fn from(review: &Review) -> Self {
        Self {
            id: review.id(),
            tour_id: review.tour_id(),
            author_id: review.author_id(),
            rating: review.rating(),
            review: review.body().to_string(),
            created_at: review.created_at(),
        }
    }
}

/// Reviews for a tour, newest first
///
/// GET /api/v1/tours/:id/reviews
pub async fn list_tour_reviews(
    State(state): State<AppState>,
    Path(tour_id): Path<Uuid>,
) -> Result<Json<Vec<ReviewResponse>>, ApiError> {
    // 404 for a missing tour rather than an empty list
    find_tour(&state, tour_id).await?;

    let review_repo = PostgresReviewRepository::new(state.pool.clone());
    let reviews = review_repo
        .find_by_tour(tour_id)
        .await
        .map_err(|e| ApiError::internal_server_error(format!("Database error: {}", e)))?;

    Ok(Json(reviews.iter().map(ReviewResponse::from).collect()))
}

/// Review a tour (plain users only, one review per tour)
///
/// POST /api/v1/tours/:id/reviews
pub async fn create_review(
    State(state): State<AppState>,
    JwtAuth(user_id): JwtAuth,
    Path(tour_id): Path<Uuid>,
    Json(req): Json<CreateReviewRequest>,
) -> Result<(StatusCode, Json<ReviewResponse>), ApiError> {
    let caller = load_current_user(&state.pool, user_id).await?;
    if !caller.role.can_write_reviews() {
        return Err(ApiError::forbidden(
            "You do not have permission to perform this action",
        ));
    }

    find_tour(&state, tour_id).await?;

    let review =
        Review::new(tour_id, caller.id, req.rating, req.review).map_err(ApiError::bad_request)?;

    let review_repo = PostgresReviewRepository::new(state.pool.clone());
    review_repo.create(&review).await.map_err(|e| {
        if e.contains("duplicate") || e.contains("unique") {
            ApiError::bad_request("You have already reviewed this tour")
        } else {
            ApiError::internal_server_error(format!("Failed to create review: {}", e))
        }
    })?;

    review_repo
        .recalculate_tour_ratings(tour_id)
        .await
        .map_err(|e| {
            ApiError::internal_server_error(format!("Failed to update tour ratings: {}", e))
        })?;

    Ok((StatusCode::CREATED, Json(ReviewResponse::from(&review))))
}

/// Delete a review (its author, or an admin)
///
/// DELETE /api/v1/reviews/:id
pub async fn delete_review(
    State(state): State<AppState>,
    JwtAuth(user_id): JwtAuth,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    let caller = load_current_user(&state.pool, user_id).await?;

    let review_repo = PostgresReviewRepository::new(state.pool.clone());
    let review = review_repo
        .find_by_id(id)
        .await
        .map_err(|e| ApiError::internal_server_error(format!("Database error: {}", e)))?
        .ok_or_else(|| ApiError::not_found("No review found with that ID"))?;

    if review.author_id() != caller.id && caller.role != UserRole::Admin {
        return Err(ApiError::forbidden(
            "You do not have permission to perform this action",
        ));
    }

    review_repo
        .delete(id)
        .await
        .map_err(|e| ApiError::internal_server_error(format!("Failed to delete review: {}", e)))?;

    review_repo
        .recalculate_tour_ratings(review.tour_id())
        .await
        .map_err(|e| {
            ApiError::internal_server_error(format!("Failed to update tour ratings: {}", e))
        })?;

    Ok(StatusCode::NO_CONTENT)
}
