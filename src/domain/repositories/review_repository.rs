use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::review::Review;

/// Repository trait for the Review aggregate
///
/// Creating or deleting a review changes the aggregate ratings stored on
/// the reviewed tour; implementations keep the two in step via
/// `recalculate_tour_ratings`.
#[async_trait]
pub trait ReviewRepository: Send + Sync {
    /// Create a review; fails if the author already reviewed the tour
    async fn create(&self, review: &Review) -> Result<(), String>;

    /// Find a review by its ID
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Review>, String>;

    /// All reviews for a tour, newest first
    async fn find_by_tour(&self, tour_id: Uuid) -> Result<Vec<Review>, String>;

    /// Delete a review by ID
    async fn delete(&self, id: Uuid) -> Result<(), String>;

    /// Recompute the tour's ratings_average / ratings_quantity from its
    /// reviews; a tour with no reviews reverts to the defaults
    async fn recalculate_tour_ratings(&self, tour_id: Uuid) -> Result<(), String>;
}
