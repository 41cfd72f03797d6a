use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::domain::repositories::review_repository::ReviewRepository;
use crate::domain::review::Review;
use crate::domain::tour::tour::DEFAULT_RATINGS_AVERAGE;

/// PostgreSQL implementation of ReviewRepository
pub struct PostgresReviewRepository {
    pool: PgPool,
}

impl PostgresReviewRepository {
    /// Creates a new PostgresReviewRepository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(sqlx::FromRow)]
struct ReviewRow {
    id: Uuid,
    tour_id: Uuid,
    author_id: Uuid,
    rating: i32,
    body: String,
    created_at: DateTime<Utc>,
}

impl ReviewRow {
    fn into_review(self) -> Review {
        Review::from_persistence(
            self.id,
            self.tour_id,
            self.author_id,
            self.rating,
            self.body,
            self.created_at,
        )
    }
}

#[async_trait]
impl ReviewRepository for PostgresReviewRepository {
    async fn create(&self, review: &Review) -> Result<(), String> {
        sqlx::query(
            r#"
            INSERT INTO reviews (id, tour_id, author_id, rating, body, created_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(review.id())
        .bind(review.tour_id())
        .bind(review.author_id())
        .bind(review.rating())
        .bind(review.body())
        .bind(review.created_at())
        .execute(&self.pool)
        .await
        .map_err(|e| format!("Failed to create review: {}", e))?;

        Ok(())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Review>, String> {
        let row = sqlx::query_as::<_, ReviewRow>(
            "SELECT id, tour_id, author_id, rating, body, created_at
             FROM reviews WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| format!("Failed to find review by id: {}", e))?;

        Ok(row.map(ReviewRow::into_review))
    }

    async fn find_by_tour(&self, tour_id: Uuid) -> Result<Vec<Review>, String> {
        let rows = sqlx::query_as::<_, ReviewRow>(
            "SELECT id, tour_id, author_id, rating, body, created_at
             FROM reviews WHERE tour_id = $1
             ORDER BY created_at DESC",
        )
        .bind(tour_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| format!("Failed to find reviews by tour: {}", e))?;

        Ok(rows.into_iter().map(ReviewRow::into_review).collect())
    }

    async fn delete(&self, id: Uuid) -> Result<(), String> {
        let result = sqlx::query("DELETE FROM reviews WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| format!("Failed to delete review: {}", e))?;

        if result.rows_affected() == 0 {
            return Err(format!("Review not found: {}", id));
        }

        Ok(())
    }

    async fn recalculate_tour_ratings(&self, tour_id: Uuid) -> Result<(), String> {
        // A tour with no reviews reverts to the default rating
        sqlx::query(
            r#"
            UPDATE tours SET
                ratings_quantity = stats.quantity,
                ratings_average = stats.average
            FROM (
                SELECT
                    COUNT(*)::int AS quantity,
                    COALESCE(ROUND(AVG(rating)::numeric, 1)::float8, $2) AS average
                FROM reviews
                WHERE tour_id = $1
            ) AS stats
            WHERE tours.id = $1
            "#,
        )
        .bind(tour_id)
        .bind(DEFAULT_RATINGS_AVERAGE)
        .execute(&self.pool)
        .await
        .map_err(|e| format!("Failed to recalculate tour ratings: {}", e))?;

        Ok(())
    }
}
