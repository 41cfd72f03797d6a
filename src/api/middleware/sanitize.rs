// Input sanitization for /api requests
// Two guards from the original pipeline: query-injection (drop object keys
// that start with '$' or contain '.') and XSS (HTML-escape every incoming
// string). Runs before handler deserialization so handlers only ever see
// cleaned input.

use axum::{
    body::{to_bytes, Body},
    extract::Request,
    http::header::{CONTENT_LENGTH, CONTENT_TYPE},
    http::uri::PathAndQuery,
    http::{HeaderValue, Uri},
    middleware::Next,
    response::{IntoResponse, Response},
};
use serde_json::Value;

use crate::api::errors::ApiError;

/// Cap applied to JSON bodies, matching the original 10kb parser limit
pub const BODY_LIMIT_BYTES: usize = 10 * 1024;

/// Middleware sanitizing the query string and JSON body of /api requests
pub async fn sanitize_request(req: Request, next: Next) -> Response {
    if !req.uri().path().starts_with("/api") {
        return next.run(req).await;
    }

    let (mut parts, body) = req.into_parts();

    let cleaned_query = match parts.uri.query() {
        Some(query) => {
            let cleaned = sanitize_query(query);
            (cleaned != query).then_some(cleaned)
        }
        None => None,
    };
    if let Some(cleaned) = cleaned_query {
        match rebuild_uri(&parts.uri, &cleaned) {
            Ok(uri) => parts.uri = uri,
            Err(_) => return ApiError::bad_request("Malformed query string").into_response(),
        }
    }

    let is_json = parts
        .headers
        .get(CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .map(|value| value.starts_with("application/json"))
        .unwrap_or(false);

    if !is_json {
        return next.run(Request::from_parts(parts, body)).await;
    }

    let bytes = match to_bytes(body, BODY_LIMIT_BYTES).await {
        Ok(bytes) => bytes,
        Err(_) => {
            return ApiError::payload_too_large("Request body exceeds the 10 KB limit")
                .into_response()
        }
    };

    // Malformed JSON passes through untouched so the handler's extractor
    // reports it with its normal rejection
    let sanitized = match serde_json::from_slice::<Value>(&bytes) {
        Ok(mut value) => {
            sanitize_value(&mut value);
            serde_json::to_vec(&value).unwrap_or_else(|_| bytes.to_vec())
        }
        Err(_) => bytes.to_vec(),
    };

    parts
        .headers
        .insert(CONTENT_LENGTH, HeaderValue::from(sanitized.len()));

    next.run(Request::from_parts(parts, Body::from(sanitized))).await
}

/// Recursively cleans a JSON value in place
pub fn sanitize_value(value: &mut Value) {
    match value {
        Value::Object(map) => {
            let suspect: Vec<String> = map
                .keys()
                .filter(|key| is_suspect_key(key))
                .cloned()
                .collect();
            for key in suspect {
                map.remove(&key);
            }
            for nested in map.values_mut() {
                sanitize_value(nested);
            }
        }
        Value::Array(items) => {
            for item in items {
                sanitize_value(item);
            }
        }
        Value::String(text) => *text = escape_html(text),
        _ => {}
    }
}

/// Keys that could smuggle operators into a query
pub fn is_suspect_key(key: &str) -> bool {
    key.starts_with('$') || key.contains('.')
}

/// Escapes the characters that could inject executable markup
pub fn escape_html(input: &str) -> String {
    input
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#x27;")
}

/// Escapes the decoded values of a raw query string, re-encoding the result
pub fn sanitize_query(raw: &str) -> String {
    raw.split('&')
        .map(|pair| match pair.split_once('=') {
            Some((key, value)) => {
                let decoded = percent_decode(value);
                let escaped = escape_html(&decoded);
                if escaped == decoded {
                    pair.to_string()
                } else {
                    format!("{}={}", key, percent_encode(&escaped))
                }
            }
            None => pair.to_string(),
        })
        .collect::<Vec<_>>()
        .join("&")
}

/// Swaps the query string on a request URI
pub(crate) fn rebuild_uri(uri: &Uri, new_query: &str) -> Result<Uri, String> {
    let path = uri.path();
    let path_and_query = if new_query.is_empty() {
        path.to_string()
    } else {
        format!("{}?{}", path, new_query)
    };

    let mut parts = uri.clone().into_parts();
    parts.path_and_query = Some(
        path_and_query
            .parse::<PathAndQuery>()
            .map_err(|e| e.to_string())?,
    );

    Uri::from_parts(parts).map_err(|e| e.to_string())
}

fn hex_value(byte: u8) -> Option<u8> {
    match byte {
        b'0'..=b'9' => Some(byte - b'0'),
        b'a'..=b'f' => Some(byte - b'a' + 10),
        b'A'..=b'F' => Some(byte - b'A' + 10),
        _ => None,
    }
}

fn percent_decode(input: &str) -> String {
    let bytes = input.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        match bytes[i] {
            b'+' => {
                out.push(b' ');
                i += 1;
            }
            b'%' if i + 2 < bytes.len() => {
                match (hex_value(bytes[i + 1]), hex_value(bytes[i + 2])) {
                    (Some(high), Some(low)) => {
                        out.push(high * 16 + low);
                        i += 3;
                    }
                    _ => {
                        out.push(b'%');
                        i += 1;
                    }
                }
            }
            byte => {
                out.push(byte);
                i += 1;
            }
        }
    }
    String::from_utf8_lossy(&out).into_owned()
}

fn percent_encode(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for byte in input.bytes() {
        match byte {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'_' | b'.' | b'~' => {
                out.push(byte as char)
            }
            b' ' => out.push('+'),
            _ => out.push_str(&format!("%{:02X}", byte)),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn operator_keys_are_dropped() {
        let mut value = json!({
            "email": { "$gt": "" },
            "password": "pass1234"
        });

        sanitize_value(&mut value);

        assert!(value["email"].get("$gt").is_none());
        assert_eq!(value["password"], "pass1234");
    }

    #[test]
    fn dotted_keys_are_dropped() {
        let mut value = json!({ "a.b": 1, "name": "Leo" });

        sanitize_value(&mut value);

        assert!(value.get("a.b").is_none());
        assert_eq!(value["name"], "Leo");
    }

    #[test]
    fn nested_strings_are_escaped() {
        let mut value = json!({
            "review": "<script>alert('x')</script>",
            "tags": ["fine", "<b>bold</b>"]
        });

        sanitize_value(&mut value);

        assert_eq!(
            value["review"],
            "&lt;script&gt;alert(&#x27;x&#x27;)&lt;/script&gt;"
        );
        assert_eq!(value["tags"][1], "&lt;b&gt;bold&lt;/b&gt;");
    }

    #[test]
    fn ampersand_is_escaped_first() {
        assert_eq!(escape_html("a&lt;"), "a&amp;lt;");
    }

    #[test]
    fn clean_values_are_untouched() {
        let mut value = json!({ "name": "The Forest Hiker", "price": 397 });
        let before = value.clone();

        sanitize_value(&mut value);

        assert_eq!(value, before);
    }

    #[test]
    fn query_values_are_escaped() {
        let cleaned = sanitize_query("name=%3Cscript%3E&price=397");
        assert_eq!(cleaned, "name=%26lt%3Bscript%26gt%3B&price=397");
    }

    #[test]
    fn clean_query_is_returned_verbatim() {
        assert_eq!(sanitize_query("difficulty=easy&price=397"), "difficulty=easy&price=397");
    }

    #[test]
    fn percent_decode_handles_plus_and_hex() {
        assert_eq!(percent_decode("a+b%3Cc"), "a b<c");
        assert_eq!(percent_decode("100%"), "100%");
    }

    #[test]
    fn percent_encode_round_trips() {
        let original = "a b<c&d";
        assert_eq!(percent_decode(&percent_encode(original)), original);
    }

    #[test]
    fn rebuild_uri_swaps_query() {
        let uri: Uri = "/api/v1/tours?price=1".parse().unwrap();
        let rebuilt = rebuild_uri(&uri, "price=2").unwrap();
        assert_eq!(rebuilt.query(), Some("price=2"));
        assert_eq!(rebuilt.path(), "/api/v1/tours");
    }

    #[test]
    fn rebuild_uri_can_drop_query() {
        let uri: Uri = "/api/v1/tours?price=1".parse().unwrap();
        let rebuilt = rebuild_uri(&uri, "").unwrap();
        assert_eq!(rebuilt.query(), None);
    }
}
