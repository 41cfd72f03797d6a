use async_trait::async_trait;
use rust_decimal::Decimal;
use uuid::Uuid;

use crate::domain::tour::value_objects::Difficulty;
use crate::domain::tour::Tour;

/// Sort order for tour listings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TourSort {
    PriceAsc,
    PriceDesc,
    RatingsAsc,
    RatingsDesc,
    CreatedAtAsc,
    #[default]
    CreatedAtDesc,
}

/// Filter, sort, and pagination options for listing tours
///
/// Multi-value filters match any of the given values; an empty vec means
/// the field is unfiltered. These are the fields the parameter-pollution
/// whitelist allows to repeat in the query string.
#[derive(Debug, Clone, Default)]
pub struct TourQuery {
    pub durations: Vec<i32>,
    pub difficulties: Vec<Difficulty>,
    pub prices: Vec<Decimal>,
    pub max_group_sizes: Vec<i32>,
    pub sort: TourSort,
    pub page: u32,
    pub limit: u32,
}

impl TourQuery {
    /// Default page size when the client does not ask for one
    pub const DEFAULT_LIMIT: u32 = 100;

    pub fn offset(&self) -> i64 {
        let page = self.page.max(1);
        i64::from(page - 1) * i64::from(self.effective_limit())
    }

    pub fn effective_limit(&self) -> u32 {
        if self.limit == 0 {
            Self::DEFAULT_LIMIT
        } else {
            self.limit
        }
    }
}

/// Repository trait for the Tour aggregate
#[async_trait]
pub trait TourRepository: Send + Sync {
    /// Save a tour (insert or update)
    async fn save(&self, tour: &Tour) -> Result<(), String>;

    /// Find a tour by its ID
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Tour>, String>;

    /// List tours matching the query options
    async fn list(&self, query: &TourQuery) -> Result<Vec<Tour>, String>;

    /// Delete a tour by ID
    async fn delete(&self, id: Uuid) -> Result<(), String>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn offset_is_zero_for_first_page() {
        let query = TourQuery {
            page: 1,
            limit: 10,
            ..Default::default()
        };
        assert_eq!(query.offset(), 0);
    }

    #[test]
    fn offset_skips_previous_pages() {
        let query = TourQuery {
            page: 3,
            limit: 10,
            ..Default::default()
        };
        assert_eq!(query.offset(), 20);
    }

    #[test]
    fn page_zero_is_treated_as_first_page() {
        let query = TourQuery {
            page: 0,
            limit: 10,
            ..Default::default()
        };
        assert_eq!(query.offset(), 0);
    }

    #[test]
    fn limit_zero_falls_back_to_default() {
        let query = TourQuery::default();
        assert_eq!(query.effective_limit(), TourQuery::DEFAULT_LIMIT);
    }
}
