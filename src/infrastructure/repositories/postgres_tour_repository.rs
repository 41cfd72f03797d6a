use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::types::Json;
use sqlx::{PgPool, QueryBuilder};
use uuid::Uuid;

use crate::domain::repositories::tour_repository::{TourQuery, TourRepository, TourSort};
use crate::domain::tour::value_objects::{Difficulty, Location};
use crate::domain::tour::Tour;

/// PostgreSQL implementation of TourRepository
///
/// Listing builds its WHERE clause dynamically from the query options;
/// every filter value goes through a bind parameter.
pub struct PostgresTourRepository {
    pool: PgPool,
}

impl PostgresTourRepository {
    /// Creates a new PostgresTourRepository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(sqlx::FromRow)]
struct TourRow {
    id: Uuid,
    name: String,
    slug: String,
    duration_days: i32,
    max_group_size: i32,
    difficulty: Difficulty,
    price: Decimal,
    price_discount: Option<Decimal>,
    summary: String,
    description: String,
    ratings_average: f64,
    ratings_quantity: i32,
    locations: Json<Vec<Location>>,
    created_at: DateTime<Utc>,
}

impl TourRow {
    fn into_tour(self) -> Tour {
        Tour::from_persistence(
            self.id,
            self.name,
            self.slug,
            self.duration_days,
            self.max_group_size,
            self.difficulty,
            self.price,
            self.price_discount,
            self.summary,
            self.description,
            self.ratings_average,
            self.ratings_quantity,
            self.locations.0,
            self.created_at,
        )
    }
}

const TOUR_COLUMNS: &str = "id, name, slug, duration_days, max_group_size, difficulty, \
                            price, price_discount, summary, description, ratings_average, \
                            ratings_quantity, locations, created_at";

#[async_trait]
impl TourRepository for PostgresTourRepository {
    async fn save(&self, tour: &Tour) -> Result<(), String> {
        sqlx::query(
            r#"
            INSERT INTO tours (
                id, name, slug, duration_days, max_group_size, difficulty,
                price, price_discount, summary, description,
                ratings_average, ratings_quantity, locations, created_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14)
            ON CONFLICT (id) DO UPDATE SET
                name = EXCLUDED.name,
                slug = EXCLUDED.slug,
                duration_days = EXCLUDED.duration_days,
                max_group_size = EXCLUDED.max_group_size,
                difficulty = EXCLUDED.difficulty,
                price = EXCLUDED.price,
                price_discount = EXCLUDED.price_discount,
                summary = EXCLUDED.summary,
                description = EXCLUDED.description,
                locations = EXCLUDED.locations
            "#,
        )
        .bind(tour.id())
        .bind(tour.name())
        .bind(tour.slug())
        .bind(tour.duration_days())
        .bind(tour.max_group_size())
        .bind(tour.difficulty())
        .bind(tour.price())
        .bind(tour.price_discount())
        .bind(tour.summary())
        .bind(tour.description())
        .bind(tour.ratings_average())
        .bind(tour.ratings_quantity())
        .bind(Json(tour.locations()))
        .bind(tour.created_at())
        .execute(&self.pool)
        .await
        .map_err(|e| format!("Failed to save tour: {}", e))?;

        Ok(())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Tour>, String> {
        let row = sqlx::query_as::<_, TourRow>(&format!(
            "SELECT {} FROM tours WHERE id = $1",
            TOUR_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| format!("Failed to find tour by id: {}", e))?;

        Ok(row.map(TourRow::into_tour))
    }

    async fn list(&self, query: &TourQuery) -> Result<Vec<Tour>, String> {
        let mut builder: QueryBuilder<sqlx::Postgres> =
            QueryBuilder::new(format!("SELECT {} FROM tours WHERE TRUE", TOUR_COLUMNS));

        if !query.durations.is_empty() {
            builder.push(" AND duration_days = ANY(");
            builder.push_bind(query.durations.clone());
            builder.push(")");
        }
        if !query.difficulties.is_empty() {
            builder.push(" AND difficulty = ANY(");
            builder.push_bind(query.difficulties.clone());
            builder.push(")");
        }
        if !query.prices.is_empty() {
            builder.push(" AND price = ANY(");
            builder.push_bind(query.prices.clone());
            builder.push(")");
        }
        if !query.max_group_sizes.is_empty() {
            builder.push(" AND max_group_size = ANY(");
            builder.push_bind(query.max_group_sizes.clone());
            builder.push(")");
        }

        builder.push(match query.sort {
            TourSort::PriceAsc => " ORDER BY price ASC",
            TourSort::PriceDesc => " ORDER BY price DESC",
            TourSort::RatingsAsc => " ORDER BY ratings_average ASC",
            TourSort::RatingsDesc => " ORDER BY ratings_average DESC",
            TourSort::CreatedAtAsc => " ORDER BY created_at ASC",
            TourSort::CreatedAtDesc => " ORDER BY created_at DESC",
        });

        builder.push(" LIMIT ");
        builder.push_bind(i64::from(query.effective_limit()));
        builder.push(" OFFSET ");
        builder.push_bind(query.offset());

        let rows = builder
            .build_query_as::<TourRow>()
            .fetch_all(&self.pool)
            .await
            .map_err(|e| format!("Failed to list tours: {}", e))?;

        Ok(rows.into_iter().map(TourRow::into_tour).collect())
    }

    async fn delete(&self, id: Uuid) -> Result<(), String> {
        let result = sqlx::query("DELETE FROM tours WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| format!("Failed to delete tour: {}", e))?;

        if result.rows_affected() == 0 {
            return Err(format!("Tour not found: {}", id));
        }

        Ok(())
    }
}
