// Tour listing query options
// Parsed by hand from the raw query string because the whitelisted filter
// fields may legitimately repeat (multi-value filters), which the usual
// struct extractor cannot express.

use rust_decimal::Decimal;

use crate::domain::repositories::tour_repository::{TourQuery, TourSort};

/// Parses listing options from a request's raw query string
///
/// Unknown keys and unparseable values are ignored, so a sloppy client
/// degrades to a broader listing rather than an error.
pub fn parse_tour_query(raw: Option<&str>) -> TourQuery {
    let mut query = TourQuery {
        page: 1,
        limit: TourQuery::DEFAULT_LIMIT,
        ..Default::default()
    };

    let Some(raw) = raw else {
        return query;
    };

    for pair in raw.split('&') {
        let Some((key, value)) = pair.split_once('=') else {
            continue;
        };

        match key {
            "duration" => {
                if let Ok(days) = value.parse::<i32>() {
                    query.durations.push(days);
                }
            }
            "difficulty" => {
                if let Ok(difficulty) = value.parse() {
                    query.difficulties.push(difficulty);
                }
            }
            "price" => {
                if let Ok(price) = value.parse::<Decimal>() {
                    query.prices.push(price);
                }
            }
            "max_group_size" => {
                if let Ok(size) = value.parse::<i32>() {
                    query.max_group_sizes.push(size);
                }
            }
            "sort" => {
                if let Some(sort) = parse_sort(value) {
                    query.sort = sort;
                }
            }
            "page" => {
                if let Ok(page) = value.parse::<u32>() {
                    query.page = page.max(1);
                }
            }
            "limit" => {
                if let Ok(limit) = value.parse::<u32>() {
                    if limit > 0 {
                        query.limit = limit;
                    }
                }
            }
            _ => {}
        }
    }

    query
}

fn parse_sort(value: &str) -> Option<TourSort> {
    match value {
        "price" => Some(TourSort::PriceAsc),
        "-price" => Some(TourSort::PriceDesc),
        "ratings_average" => Some(TourSort::RatingsAsc),
        "-ratings_average" => Some(TourSort::RatingsDesc),
        "created_at" => Some(TourSort::CreatedAtAsc),
        "-created_at" => Some(TourSort::CreatedAtDesc),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::tour::value_objects::Difficulty;

    #[test]
    fn empty_query_uses_defaults() {
        let query = parse_tour_query(None);

        assert!(query.durations.is_empty());
        assert!(query.difficulties.is_empty());
        assert_eq!(query.page, 1);
        assert_eq!(query.limit, TourQuery::DEFAULT_LIMIT);
        assert_eq!(query.sort, TourSort::CreatedAtDesc);
    }

    #[test]
    fn repeated_whitelisted_filters_collect_all_values() {
        let query = parse_tour_query(Some("duration=5&duration=9&difficulty=easy"));

        assert_eq!(query.durations, vec![5, 9]);
        assert_eq!(query.difficulties, vec![Difficulty::Easy]);
    }

    #[test]
    fn repeated_prices_collect_all_values() {
        let query = parse_tour_query(Some("price=397&price=497.50"));

        assert_eq!(query.prices.len(), 2);
        assert_eq!(query.prices[1], "497.50".parse::<Decimal>().unwrap());
    }

    #[test]
    fn sort_descending_by_price() {
        let query = parse_tour_query(Some("sort=-price"));
        assert_eq!(query.sort, TourSort::PriceDesc);
    }

    #[test]
    fn unknown_sort_keeps_default() {
        let query = parse_tour_query(Some("sort=name"));
        assert_eq!(query.sort, TourSort::CreatedAtDesc);
    }

    #[test]
    fn pagination_is_clamped_to_sane_values() {
        let query = parse_tour_query(Some("page=0&limit=0"));

        assert_eq!(query.page, 1);
        assert_eq!(query.limit, TourQuery::DEFAULT_LIMIT);
    }

    #[test]
    fn garbage_values_are_ignored() {
        let query = parse_tour_query(Some("duration=abc&difficulty=extreme&price=x"));

        assert!(query.durations.is_empty());
        assert!(query.difficulties.is_empty());
        assert!(query.prices.is_empty());
    }
}
