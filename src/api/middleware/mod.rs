// Request-pipeline middleware, applied in registration order:
// security headers, tracing, rate limiting, sanitization, parameter
// pollution guard, then the routers.

pub mod auth;
pub mod param_pollution;
pub mod rate_limit;
pub mod sanitize;
pub mod security;

pub use auth::JwtAuth;
pub use rate_limit::{RateLimiter, RATE_LIMIT_MESSAGE};
