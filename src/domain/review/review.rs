use chrono::{DateTime, Utc};
use uuid::Uuid;

/// Review aggregate root
///
/// A rating and write-up left by a user for a tour they took.
///
/// # Invariants
/// - Rating is an integer between 1 and 5
/// - Body cannot be empty
/// - One review per (tour, author) pair, enforced by the repository
#[derive(Debug, Clone)]
pub struct Review {
    id: Uuid,
    tour_id: Uuid,
    author_id: Uuid,
    rating: i32,
    body: String,
    created_at: DateTime<Utc>,
}

impl Review {
    /// Creates a new Review, enforcing rating and body rules
    pub fn new(tour_id: Uuid, author_id: Uuid, rating: i32, body: String) -> Result<Self, String> {
        if !(1..=5).contains(&rating) {
            return Err(format!("Rating must be between 1 and 5, got {}", rating));
        }
        if body.trim().is_empty() {
            return Err("Review cannot be empty".to_string());
        }

        Ok(Self {
            id: Uuid::new_v4(),
            tour_id,
            author_id,
            rating,
            body,
            created_at: Utc::now(),
        })
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn tour_id(&self) -> Uuid {
        self.tour_id
    }

    pub fn author_id(&self) -> Uuid {
        self.author_id
    }

    pub fn rating(&self) -> i32 {
        self.rating
    }

    pub fn body(&self) -> &str {
        &self.body
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Reconstructs a Review from persistence layer data
    pub fn from_persistence(
        id: Uuid,
        tour_id: Uuid,
        author_id: Uuid,
        rating: i32,
        body: String,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            tour_id,
            author_id,
            rating,
            body,
            created_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_review_with_valid_rating() {
        let review = Review::new(
            Uuid::new_v4(),
            Uuid::new_v4(),
            5,
            "Amazing guide, stunning views".to_string(),
        );

        assert!(review.is_ok());
        assert_eq!(review.unwrap().rating(), 5);
    }

    #[test]
    fn rating_below_one_fails() {
        let result = Review::new(Uuid::new_v4(), Uuid::new_v4(), 0, "text".to_string());
        assert!(result.is_err());
    }

    #[test]
    fn rating_above_five_fails() {
        let result = Review::new(Uuid::new_v4(), Uuid::new_v4(), 6, "text".to_string());
        assert!(result.is_err());
    }

    #[test]
    fn empty_body_fails() {
        let result = Review::new(Uuid::new_v4(), Uuid::new_v4(), 3, "   ".to_string());
        assert!(result.is_err());
        assert!(result.unwrap_err().contains("empty"));
    }

    #[test]
    fn every_rating_in_range_is_accepted() {
        for rating in 1..=5 {
            assert!(
                Review::new(Uuid::new_v4(), Uuid::new_v4(), rating, "ok".to_string()).is_ok(),
                "rating {} should be valid",
                rating
            );
        }
    }
}
