use axum::{
    extract::{Path, State},
    http::{StatusCode, Uri},
    Json,
};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::api::errors::ApiError;
use crate::api::handlers::{load_current_user, require_role};
use crate::api::middleware::JwtAuth;
use crate::api::query::parse_tour_query;
use crate::api::state::AppState;
use crate::domain::repositories::tour_repository::TourRepository;
use crate::domain::tour::value_objects::{Difficulty, Location};
use crate::domain::tour::{NewTour, Tour, TourChanges};
use crate::domain::user::value_objects::UserRole;
use crate::infrastructure::maps::static_map_url;
use crate::infrastructure::repositories::PostgresTourRepository;

const TOUR_NOT_FOUND: &str = "No tour found with that ID";

/// Request body for creating a tour
#[derive(Debug, Deserialize)]
pub struct CreateTourRequest {
    pub name: String,
    pub duration_days: i32,
    pub max_group_size: i32,
    pub difficulty: Difficulty,
    pub price: Decimal,
    pub price_discount: Option<Decimal>,
    pub summary: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub locations: Vec<Location>,
}

/// Request body for partially updating a tour
///
/// `price_discount` is doubly optional: absent leaves the discount alone,
/// `null` clears it.
#[derive(Debug, Deserialize, Default)]
pub struct UpdateTourRequest {
    pub name: Option<String>,
    pub duration_days: Option<i32>,
    pub max_group_size: Option<i32>,
    pub difficulty: Option<Difficulty>,
    pub price: Option<Decimal>,
    #[serde(default, with = "serde_double_option")]
    pub price_discount: Option<Option<Decimal>>,
    pub summary: Option<String>,
    pub description: Option<String>,
    pub locations: Option<Vec<Location>>,
}

/// Distinguishes an absent field from an explicit null
mod serde_double_option {
    use rust_decimal::Decimal;
    use serde::{Deserialize, Deserializer};

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<Option<Decimal>>, D::Error>
    where
        D: Deserializer<'de>,
    {
        Option::<Decimal>::deserialize(deserializer).map(Some)
    }
}

/// API view of a tour
#[derive(Debug, Serialize)]
pub struct TourResponse {
    pub id: Uuid,
    pub name: String,
    pub slug: String,
    pub duration_days: i32,
    pub max_group_size: i32,
    pub difficulty: Difficulty,
    pub price: Decimal,
    pub price_discount: Option<Decimal>,
    pub summary: String,
    pub description: String,
    pub ratings_average: f64,
    pub ratings_quantity: i32,
    pub locations: Vec<Location>,
    pub created_at: DateTime<Utc>,
}

impl From<&Tour> for TourResponse {
    fn from(tour: &Tour) -> Self {
        Self {
            id: tour.id(),
            name: tour.name().to_string(),
            slug: tour.slug().to_string(),
            duration_days: tour.duration_days(),
            max_group_size: tour.max_group_size(),
            difficulty: tour.difficulty(),
            price: tour.price(),
            price_discount: tour.price_discount(),
            summary: tour.summary().to_string(),
            description: tour.description().to_string(),
            ratings_average: tour.ratings_average(),
            ratings_quantity: tour.ratings_quantity(),
            locations: tour.locations().to_vec(),
            created_at: tour.created_at(),
        }
    }
}

/// Payload the client map widget renders from
#[derive(Debug, Serialize)]
pub struct TourMapResponse {
    pub access_token: String,
    pub map_url: String,
    pub locations: Vec<Location>,
}

/// List tours with filtering, sorting, and pagination
///
/// GET /api/v1/tours
pub async fn list_tours(
    State(state): State<AppState>,
    uri: Uri,
) -> Result<Json<Vec<TourResponse>>, ApiError> {
    let query = parse_tour_query(uri.query());

    let tour_repo = PostgresTourRepository::new(state.pool.clone());
    let tours = tour_repo
        .list(&query)
        .await
        .map_err(|e| ApiError::internal_server_error(format!("Database error: {}", e)))?;

    Ok(Json(tours.iter().map(TourResponse::from).collect()))
}

/// Get a tour by ID
///
/// GET /api/v1/tours/:id
pub async fn get_tour(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<TourResponse>, ApiError> {
    let tour = find_tour(&state, id).await?;
    Ok(Json(TourResponse::from(&tour)))
}

/// Create a new tour (admin or lead guide)
///
/// POST /api/v1/tours
pub async fn create_tour(
    State(state): State<AppState>,
    JwtAuth(user_id): JwtAuth,
    Json(req): Json<CreateTourRequest>,
) -> Result<(StatusCode, Json<TourResponse>), ApiError> {
    let caller = load_current_user(&state.pool, user_id).await?;
    require_role(&caller, &[UserRole::Admin, UserRole::LeadGuide])?;

    let tour = Tour::new(NewTour {
        name: req.name,
        duration_days: req.duration_days,
        max_group_size: req.max_group_size,
        difficulty: req.difficulty,
        price: req.price,
        price_discount: req.price_discount,
        summary: req.summary,
        description: req.description,
        locations: req.locations,
    })
    .map_err(ApiError::bad_request)?;

    let tour_repo = PostgresTourRepository::new(state.pool.clone());
    tour_repo.save(&tour).await.map_err(|e| {
        if e.contains("duplicate") || e.contains("unique") {
            ApiError::bad_request("A tour with that name already exists")
        } else {
            ApiError::internal_server_error(format!("Failed to save tour: {}", e))
        }
    })?;

    Ok((StatusCode::CREATED, Json(TourResponse::from(&tour))))
}

/// Partially update a tour (admin or lead guide)
///
/// PATCH /api/v1/tours/:id
pub async fn update_tour(
    State(state): State<AppState>,
    JwtAuth(user_id): JwtAuth,
    Path(id): Path<Uuid>,
    Json(req): Json<UpdateTourRequest>,
) -> Result<Json<TourResponse>, ApiError> {
    let caller = load_current_user(&state.pool, user_id).await?;
    require_role(&caller, &[UserRole::Admin, UserRole::LeadGuide])?;

    let mut tour = find_tour(&state, id).await?;

    tour.apply(TourChanges {
        name: req.name,
        duration_days: req.duration_days,
        max_group_size: req.max_group_size,
        difficulty: req.difficulty,
        price: req.price,
        price_discount: req.price_discount,
        summary: req.summary,
        description: req.description,
        locations: req.locations,
    })
    .map_err(ApiError::bad_request)?;

    let tour_repo = PostgresTourRepository::new(state.pool.clone());
    tour_repo
        .save(&tour)
        .await
        .map_err(|e| ApiError::internal_server_error(format!("Failed to save tour: {}", e)))?;

    Ok(Json(TourResponse::from(&tour)))
}

/// Delete a tour (admin or lead guide)
///
/// DELETE /api/v1/tours/:id
pub async fn delete_tour(
    State(state): State<AppState>,
    JwtAuth(user_id): JwtAuth,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    let caller = load_current_user(&state.pool, user_id).await?;
    require_role(&caller, &[UserRole::Admin, UserRole::LeadGuide])?;

    let tour_repo = PostgresTourRepository::new(state.pool.clone());
    tour_repo.delete(id).await.map_err(|e| {
        if e.contains("not found") {
            ApiError::not_found(TOUR_NOT_FOUND)
        } else {
            ApiError::internal_server_error(format!("Failed to delete tour: {}", e))
        }
    })?;

    Ok(StatusCode::NO_CONTENT)
}

/// Map-widget payload for a tour's itinerary
///
/// GET /api/v1/tours/:id/map
pub async fn tour_map(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<TourMapResponse>, ApiError> {
    let tour = find_tour(&state, id).await?;

    let map_url = static_map_url(tour.locations(), &state.config.mapbox_access_token);

    Ok(Json(TourMapResponse {
        access_token: state.config.mapbox_access_token.clone(),
        map_url,
        locations: tour.locations().to_vec(),
    }))
}

pub(crate) async fn find_tour(state: &AppState, id: Uuid) -> Result<Tour, ApiError> {
    let tour_repo = PostgresTourRepository::new(state.pool.clone());
    tour_repo
        .find_by_id(id)
        .await
        .map_err(|e| ApiError::internal_server_error(format!("Database error: {}", e)))?
        .ok_or_else(|| ApiError::not_found(TOUR_NOT_FOUND))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn absent_discount_leaves_field_untouched() {
        let req: UpdateTourRequest = serde_json::from_str(r#"{ "price": 450 }"#).unwrap();
        assert_eq!(req.price_discount, None);
    }

    #[test]
    fn null_discount_clears_it() {
        let req: UpdateTourRequest =
            serde_json::from_str(r#"{ "price_discount": null }"#).unwrap();
        assert_eq!(req.price_discount, Some(None));
    }

    #[test]
    fn numeric_discount_sets_a_value() {
        let req: UpdateTourRequest =
            serde_json::from_str(r#"{ "price_discount": 299 }"#).unwrap();
        assert_eq!(req.price_discount, Some(Some(Decimal::from(299))));
    }

    #[test]
    fn create_request_defaults_description_and_locations() {
        let req: CreateTourRequest = serde_json::from_str(
            r#"{
                "name": "The Forest Hiker",
                "duration_days": 5,
                "max_group_size": 25,
                "difficulty": "easy",
                "price": 397,
                "summary": "Breathtaking hike"
            }"#,
        )
        .unwrap();

        assert!(req.description.is_empty());
        assert!(req.locations.is_empty());
        assert_eq!(req.difficulty, Difficulty::Easy);
    }
}
