// HTTP parameter pollution guard for /api query strings
// Repeated parameters collapse to their last occurrence, except the
// whitelisted filter fields where repeats are legitimate multi-value
// filters.

use axum::{
    extract::Request,
    middleware::Next,
    response::{IntoResponse, Response},
};
use std::collections::HashMap;

use crate::api::errors::ApiError;
use crate::api::middleware::sanitize::rebuild_uri;

/// Query parameters allowed to appear more than once
pub const DUPLICATE_WHITELIST: &[&str] = &[
    "duration",
    "ratings_quantity",
    "ratings_average",
    "max_group_size",
    "difficulty",
    "price",
];

/// Middleware collapsing duplicate query parameters on /api requests
pub async fn dedup_query_params(req: Request, next: Next) -> Response {
    if !req.uri().path().starts_with("/api") {
        return next.run(req).await;
    }

    let deduped = match req.uri().query() {
        Some(query) => {
            let deduped = dedup_query(query);
            (deduped != query).then_some(deduped)
        }
        None => None,
    };

    let Some(deduped) = deduped else {
        return next.run(req).await;
    };

    let (mut parts, body) = req.into_parts();
    match rebuild_uri(&parts.uri, &deduped) {
        Ok(uri) => parts.uri = uri,
        Err(_) => return ApiError::bad_request("Malformed query string").into_response(),
    }

    next.run(Request::from_parts(parts, body)).await
}

/// Collapses duplicate keys in a raw query string, keeping the last value
pub fn dedup_query(raw: &str) -> String {
    let mut result: Vec<&str> = Vec::new();
    let mut seen_at: HashMap<&str, usize> = HashMap::new();

    for pair in raw.split('&') {
        let key = pair.split_once('=').map(|(key, _)| key).unwrap_or(pair);

        if DUPLICATE_WHITELIST.contains(&key) {
            result.push(pair);
            continue;
        }

        match seen_at.get(key) {
            Some(&index) => result[index] = pair,
            None => {
                seen_at.insert(key, result.len());
                result.push(pair);
            }
        }
    }

    result.join("&")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn duplicate_sort_keeps_last_value() {
        assert_eq!(dedup_query("sort=price&sort=-price"), "sort=-price");
    }

    #[test]
    fn whitelisted_duration_keeps_duplicates() {
        assert_eq!(
            dedup_query("duration=5&duration=9"),
            "duration=5&duration=9"
        );
    }

    #[test]
    fn whitelisted_price_and_difficulty_keep_duplicates() {
        assert_eq!(
            dedup_query("price=397&price=497&difficulty=easy&difficulty=medium"),
            "price=397&price=497&difficulty=easy&difficulty=medium"
        );
    }

    #[test]
    fn mixed_query_only_collapses_unlisted_keys() {
        assert_eq!(
            dedup_query("sort=price&duration=5&sort=-price&duration=9&page=1&page=3"),
            "sort=-price&duration=5&duration=9&page=3"
        );
    }

    #[test]
    fn unique_keys_are_untouched() {
        assert_eq!(
            dedup_query("difficulty=easy&page=2&limit=10"),
            "difficulty=easy&page=2&limit=10"
        );
    }
}
