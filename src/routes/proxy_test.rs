use super::*;

use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use axum::extract::RawQuery;
use axum::http::HeaderValue;
use axum::response::Redirect;
use axum::routing::{any, get};

use crate::routes::api_routes;

// =============================================================================
// Pure helpers
// =============================================================================

#[test]
fn upstream_url_keeps_api_prefix_and_query() {
    assert_eq!(
        upstream_url("http://backend:8001", "products", Some("category=shoes")),
        "http://backend:8001/api/products?category=shoes"
    );
    assert_eq!(upstream_url("http://backend:8001/", "/auth/me", None), "http://backend:8001/api/auth/me");
    assert_eq!(upstream_url("http://backend:8001", "health", Some("")), "http://backend:8001/api/health");
}

#[test]
fn select_headers_drops_everything_not_listed() {
    let mut source = HeaderMap::new();
    source.insert(header::AUTHORIZATION, HeaderValue::from_static("Bearer t"));
    source.insert(header::COOKIE, HeaderValue::from_static("sid=1"));
    source.insert(header::HOST, HeaderValue::from_static("localhost:3000"));
    source.insert(header::ORIGIN, HeaderValue::from_static("http://localhost:3000"));

    let selected = select_headers(&source, &FORWARDED_REQUEST_HEADERS);
    assert_eq!(selected.len(), 2);
    assert_eq!(selected.get(header::AUTHORIZATION).unwrap(), "Bearer t");
    assert_eq!(selected.get(header::COOKIE).unwrap(), "sid=1");
}

#[test]
fn select_headers_keeps_repeated_set_cookie() {
    let mut source = HeaderMap::new();
    source.append(header::SET_COOKIE, HeaderValue::from_static("state=abc; Path=/"));
    source.append(header::SET_COOKIE, HeaderValue::from_static("nonce=xyz; Path=/"));
    source.insert(header::SERVER, HeaderValue::from_static("uvicorn"));

    let selected = select_headers(&source, &RETURNED_RESPONSE_HEADERS);
    let cookies: Vec<_> = selected.get_all(header::SET_COOKIE).iter().collect();
    assert_eq!(cookies, vec!["state=abc; Path=/", "nonce=xyz; Path=/"]);
    assert!(selected.get(header::SERVER).is_none());
}

#[test]
fn api_tail_keeps_percent_encoding() {
    let uri: Uri = "/api/products/a%2Fb%3Fc?x=1".parse().unwrap();
    assert_eq!(api_tail(&uri), "products/a%2Fb%3Fc");
    let bare: Uri = "/api".parse().unwrap();
    assert_eq!(api_tail(&bare), "");
}

#[test]
fn proxy_error_maps_to_bad_gateway() {
    let rt = tokio::runtime::Runtime::new().unwrap();
    let err = rt.block_on(async {
        reqwest::Client::new().get("http://127.0.0.1:1/api/health").send().await.unwrap_err()
    });
    let response = ProxyError::from(err).into_response();
    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
}

// =============================================================================
// End-to-end through a stub backend
// =============================================================================

async fn echo(method: Method, RawQuery(query): RawQuery, headers: HeaderMap, body: String) -> Response {
    let auth = headers.get(header::AUTHORIZATION).and_then(|v| v.to_str().ok()).map(str::to_owned);
    let cookie = headers.get(header::COOKIE).is_some();
    let payload = serde_json::json!({
        "method": method.as_str(),
        "query": query,
        "authorization": auth,
        "cookie_forwarded": cookie,
        "body": body,
    });
    axum::Json(payload).into_response()
}

async fn raw_path(uri: Uri) -> String {
    uri.to_string()
}

async fn oauth_start() -> Response {
    let mut response = Redirect::temporary("https://accounts.example/o/oauth2/auth").into_response();
    let headers = response.headers_mut();
    headers.append(header::SET_COOKIE, HeaderValue::from_static("oauth_state=abc; Path=/; HttpOnly"));
    headers.append(header::SET_COOKIE, HeaderValue::from_static("oauth_nonce=xyz; Path=/; HttpOnly"));
    response
}

async fn missing() -> Response {
    (StatusCode::NOT_FOUND, axum::Json(serde_json::json!({ "detail": "Product not found" }))).into_response()
}

async fn spawn(router: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    format!("http://{addr}")
}

async fn spawn_host(backend_url: &str) -> String {
    let state = AppState {
        http: reqwest::Client::builder()
            .redirect(reqwest::redirect::Policy::none())
            .timeout(Duration::from_secs(5))
            .build()
            .unwrap(),
        backend_url: Arc::from(backend_url),
    };
    spawn(api_routes(state)).await
}

async fn spawn_backend() -> String {
    let router = Router::new()
        .route("/api/echo", any(echo))
        .route("/api/products/missing", get(missing))
        .route("/api/raw/{*rest}", any(raw_path))
        .route("/api/auth/google", get(oauth_start));
    spawn(router).await
}

fn browser() -> reqwest::Client {
    reqwest::Client::builder().redirect(reqwest::redirect::Policy::none()).build().unwrap()
}

#[tokio::test]
async fn forwards_method_query_body_and_allowed_headers() {
    let host = spawn_host(&spawn_backend().await).await;

    let resp = browser()
        .post(format!("{host}/api/echo?limit=4"))
        .header(header::AUTHORIZATION, "Bearer tok")
        .header(header::COOKIE, "sid=1")
        .body("hello")
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let body: serde_json::Value = resp.json().await.unwrap();
    assert_eq!(body["method"], "POST");
    assert_eq!(body["query"], "limit=4");
    assert_eq!(body["authorization"], "Bearer tok");
    assert_eq!(body["cookie_forwarded"], true);
    assert_eq!(body["body"], "hello");
}

#[tokio::test]
async fn relays_error_status_and_body() {
    let host = spawn_host(&spawn_backend().await).await;

    let resp = browser().get(format!("{host}/api/products/missing")).send().await.unwrap();

    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    let body: serde_json::Value = resp.json().await.unwrap();
    assert_eq!(body["detail"], "Product not found");
}

#[tokio::test]
async fn passes_redirects_through_to_the_browser() {
    let host = spawn_host(&spawn_backend().await).await;

    let resp = browser().get(format!("{host}/api/auth/google")).send().await.unwrap();

    assert_eq!(resp.status(), StatusCode::TEMPORARY_REDIRECT);
    assert_eq!(resp.headers().get(header::LOCATION).unwrap(), "https://accounts.example/o/oauth2/auth");
    let cookies: Vec<_> = resp.headers().get_all(header::SET_COOKIE).iter().collect();
    assert_eq!(cookies, vec!["oauth_state=abc; Path=/; HttpOnly", "oauth_nonce=xyz; Path=/; HttpOnly"]);
}

#[tokio::test]
async fn encoded_path_segments_reach_backend_unchanged() {
    let host = spawn_host(&spawn_backend().await).await;

    let resp = browser().get(format!("{host}/api/raw/a%2Fb%3Fc")).send().await.unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(resp.text().await.unwrap(), "/api/raw/a%2Fb%3Fc");
}

#[tokio::test]
async fn encoded_path_keeps_real_query_separate() {
    let host = spawn_host(&spawn_backend().await).await;

    let resp = browser().get(format!("{host}/api/raw/a%3Fb?limit=2")).send().await.unwrap();

    assert_eq!(resp.text().await.unwrap(), "/api/raw/a%3Fb?limit=2");
}

#[tokio::test]
async fn unreachable_backend_is_bad_gateway() {
    let host = spawn_host("http://127.0.0.1:1").await;

    let resp = browser().get(format!("{host}/api/health")).send().await.unwrap();

    assert_eq!(resp.status(), StatusCode::BAD_GATEWAY);
    assert!(resp.text().await.unwrap().starts_with("backend unreachable"));
}

#[tokio::test]
async fn healthz_reports_ok() {
    let host = spawn_host("http://127.0.0.1:1").await;

    let resp = browser().get(format!("{host}/healthz")).send().await.unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let body: serde_json::Value = resp.json().await.unwrap();
    assert_eq!(body["status"], "ok");
}
