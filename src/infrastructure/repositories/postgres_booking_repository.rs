use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::PgPool;
use uuid::Uuid;

use crate::domain::booking::Booking;
use crate::domain::repositories::booking_repository::BookingRepository;

/// PostgreSQL implementation of BookingRepository
pub struct PostgresBookingRepository {
    pool: PgPool,
}

impl PostgresBookingRepository {
    /// Creates a new PostgresBookingRepository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(sqlx::FromRow)]
struct BookingRow {
    id: Uuid,
    tour_id: Uuid,
    user_id: Uuid,
    price: Decimal,
    paid: bool,
    created_at: DateTime<Utc>,
}

impl BookingRow {
    fn into_booking(self) -> Booking {
        Booking::from_persistence(
            self.id,
            self.tour_id,
            self.user_id,
            self.price,
            self.paid,
            self.created_at,
        )
    }
}

#[async_trait]
impl BookingRepository for PostgresBookingRepository {
    async fn create(&self, booking: &Booking) -> Result<Uuid, String> {
        sqlx::query(
            r#"
            INSERT INTO bookings (id, tour_id, user_id, price, paid, created_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(booking.id())
        .bind(booking.tour_id())
        .bind(booking.user_id())
        .bind(booking.price())
        .bind(booking.paid())
        .bind(booking.created_at())
        .execute(&self.pool)
        .await
        .map_err(|e| format!("Failed to create booking: {}", e))?;

        Ok(booking.id())
    }

    async fn find_by_user(&self, user_id: Uuid) -> Result<Vec<Booking>, String> {
        let rows = sqlx::query_as::<_, BookingRow>(
            "SELECT id, tour_id, user_id, price, paid, created_at
             FROM bookings WHERE user_id = $1
             ORDER BY created_at DESC",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| format!("Failed to find bookings by user: {}", e))?;

        Ok(rows.into_iter().map(BookingRow::into_booking).collect())
    }
}
