//! Backend route table.
//!
//! Paths are relative to the API base (`/api` in the browser, `{base_url}/api`
//! in the CLI). Transports join them with [`join`].

#[cfg(test)]
#[path = "endpoints_test.rs"]
mod endpoints_test;

use crate::types::ProductQuery;

pub const AUTH_ME: &str = "/auth/me";
pub const AUTH_SESSION: &str = "/auth/session";
pub const AUTH_LOGOUT: &str = "/auth/logout";
pub const AUTH_LOGIN: &str = "/auth/login";
pub const AUTH_GOOGLE: &str = "/auth/google";
pub const AUTH_GOOGLE_MOBILE: &str = "/auth/google/mobile";
pub const PRODUCTS: &str = "/products";
pub const CATEGORIES: &str = "/categories";
pub const ADMIN_ANALYTICS: &str = "/admin/analytics";
pub const HEALTH: &str = "/health";

/// Join an API base and a route path without doubling the slash.
#[must_use]
pub fn join(base: &str, path: &str) -> String {
    format!("{}{}", base.trim_end_matches('/'), path)
}

/// `GET /products` with the query's filters.
#[must_use]
pub fn products(query: &ProductQuery) -> String {
    let qs = query.to_query_string();
    if qs.is_empty() { PRODUCTS.to_owned() } else { format!("{PRODUCTS}?{qs}") }
}

/// `/products/{id}` with the id percent-encoded as a single path segment.
#[must_use]
pub fn product(id: &str) -> String {
    format!("{PRODUCTS}/{}", encode_segment(id))
}

/// Bearer header value for a session token.
#[must_use]
pub fn bearer(token: &str) -> String {
    format!("Bearer {token}")
}

fn encode_segment(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for byte in raw.bytes() {
        if byte.is_ascii_alphanumeric() || matches!(byte, b'-' | b'_' | b'.' | b'~') {
            out.push(char::from(byte));
        } else {
            out.push_str(&format!("%{byte:02X}"));
        }
    }
    out
}
