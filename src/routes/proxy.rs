//! Same-origin `/api` proxy.
//!
//! DESIGN
//! ======
//! Requests under `/api/*` are forwarded verbatim (method, path, query, body)
//! to the configured backend. The path is taken from the raw request URI so
//! percent-encoded segments reach the backend still encoded. Only an
//! allow-list of headers crosses in either direction; cookies are included so
//! OAuth state cookies survive the redirect round trip. Upstream redirects are passed through untouched so the OAuth
//! entry point still sends the browser to the provider.
//!
//! ERROR HANDLING
//! ==============
//! Upstream statuses are relayed as-is, including 4xx/5xx. Only transport
//! failures (connect, timeout, body read) become `502 Bad Gateway`.

#[cfg(test)]
#[path = "proxy_test.rs"]
mod proxy_test;

use axum::body::{Body, Bytes};
use axum::extract::State;
use axum::http::{HeaderMap, HeaderName, Method, StatusCode, Uri, header};
use axum::response::{IntoResponse, Response};

use crate::state::AppState;

/// Request headers copied from the browser to the backend.
pub const FORWARDED_REQUEST_HEADERS: [HeaderName; 4] =
    [header::AUTHORIZATION, header::CONTENT_TYPE, header::ACCEPT, header::COOKIE];

/// Response headers copied from the backend to the browser.
pub const RETURNED_RESPONSE_HEADERS: [HeaderName; 3] = [header::CONTENT_TYPE, header::LOCATION, header::SET_COOKIE];

#[derive(Debug, thiserror::Error)]
pub enum ProxyError {
    #[error("backend unreachable: {0}")]
    Upstream(#[from] reqwest::Error),
}

impl IntoResponse for ProxyError {
    fn into_response(self) -> Response {
        (StatusCode::BAD_GATEWAY, self.to_string()).into_response()
    }
}

/// Copy the allow-listed headers from `source`.
pub fn select_headers(source: &HeaderMap, allowed: &[HeaderName]) -> HeaderMap {
    let mut out = HeaderMap::new();
    for name in allowed {
        for value in source.get_all(name) {
            out.append(name.clone(), value.clone());
        }
    }
    out
}

/// Backend URL for `/api/{path}?{query}`. `path` is used as given, still
/// percent-encoded.
pub fn upstream_url(backend: &str, path: &str, query: Option<&str>) -> String {
    let base = backend.trim_end_matches('/');
    let path = path.trim_start_matches('/');
    match query.filter(|q| !q.is_empty()) {
        Some(q) => format!("{base}/api/{path}?{q}"),
        None => format!("{base}/api/{path}"),
    }
}

/// Raw, still-encoded path after the `/api/` prefix.
pub fn api_tail(uri: &Uri) -> &str {
    let path = uri.path();
    path.strip_prefix("/api/").or_else(|| path.strip_prefix("/api")).unwrap_or(path)
}

pub async fn forward(
    State(state): State<AppState>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Response, ProxyError> {
    let url = upstream_url(&state.backend_url, api_tail(&uri), uri.query());
    tracing::debug!(%method, %url, "proxying");

    let upstream = state
        .http
        .request(method, &url)
        .headers(select_headers(&headers, &FORWARDED_REQUEST_HEADERS))
        .body(body)
        .send()
        .await
        .inspect_err(|e| tracing::warn!(error = %e, %url, "proxy request failed"))?;

    let status = upstream.status();
    let returned = select_headers(upstream.headers(), &RETURNED_RESPONSE_HEADERS);
    let bytes = upstream.bytes().await?;

    let mut response = Response::new(Body::from(bytes));
    *response.status_mut() = status;
    *response.headers_mut() = returned;
    Ok(response)
}
