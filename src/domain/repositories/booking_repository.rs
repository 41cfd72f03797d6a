use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::booking::Booking;

/// Repository trait for the Booking aggregate
#[async_trait]
pub trait BookingRepository: Send + Sync {
    /// Record a booking
    async fn create(&self, booking: &Booking) -> Result<Uuid, String>;

    /// All bookings made by a user, newest first
    async fn find_by_user(&self, user_id: Uuid) -> Result<Vec<Booking>, String>;
}
