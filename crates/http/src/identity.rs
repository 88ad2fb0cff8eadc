//! Caller identity as asserted by the gateway in front of this service.

use axum::http::HeaderMap;
use weather_cache_core::UserId;

/// Header carrying the authenticated user id. Trusted as-is.
pub const USER_HEADER: &str = "x-authenticated-user";

/// `None` for anonymous callers, including a blank or non-UTF-8 header.
pub fn authenticated_user(headers: &HeaderMap) -> Option<UserId> {
    headers.get(USER_HEADER).and_then(|v| v.to_str().ok()).and_then(UserId::new)
}
