//! REST transport for the storefront backend.
//!
//! Client-side (hydrate): real HTTP calls via `gloo-net`.
//! Server-side (SSR): stubs returning a network error since these endpoints
//! are only meaningful in the browser.
//!
//! ERROR HANDLING
//! ==============
//! Every response goes through `storefront_core::response`, so views branch
//! on `ApiError` classes rather than raw statuses. Nothing here retries.

#![allow(clippy::unused_async)]

#[cfg(test)]
#[path = "api_test.rs"]
mod api_test;

use async_trait::async_trait;
use storefront_core::endpoints;
use storefront_core::{
    Analytics, ApiError, AuthBackend, CatalogApi, Product, ProductDraft, ProductQuery, SessionGrant, UserRecord,
};

/// API base used when no build-time override is set.
pub const DEFAULT_API_BASE: &str = "/api";

/// Resolve the API base from an optional build-time override.
fn resolve_api_base(raw: Option<&str>) -> String {
    raw.map(str::trim)
        .filter(|base| !base.is_empty())
        .unwrap_or(DEFAULT_API_BASE)
        .trim_end_matches('/')
        .to_owned()
}

#[cfg(not(feature = "hydrate"))]
fn unavailable() -> ApiError {
    ApiError::Network("not available on server".to_owned())
}

/// HTTP implementation of the auth and catalog collaborators.
#[derive(Clone, Debug)]
pub struct HttpBackend {
    base: String,
}

impl Default for HttpBackend {
    fn default() -> Self {
        Self::from_env()
    }
}

impl HttpBackend {
    #[must_use]
    pub fn new(base: &str) -> Self {
        Self { base: resolve_api_base(Some(base)) }
    }

    /// Base from `STOREFRONT_API_BASE` at build time, else `/api`.
    #[must_use]
    pub fn from_env() -> Self {
        Self { base: resolve_api_base(option_env!("STOREFRONT_API_BASE")) }
    }

    #[must_use]
    pub fn base(&self) -> &str {
        &self.base
    }

    fn url(&self, path: &str) -> String {
        endpoints::join(&self.base, path)
    }
}

#[cfg(feature = "hydrate")]
mod transport {
    use gloo_net::http::{Request, RequestBuilder, Response};
    use serde::Serialize;
    use serde::de::DeserializeOwned;
    use storefront_core::{ApiError, endpoints, response};

    pub fn authorized(builder: RequestBuilder, bearer: Option<&str>) -> RequestBuilder {
        match bearer {
            Some(token) => builder.header("Authorization", &endpoints::bearer(token)),
            None => builder,
        }
    }

    pub fn with_json<B: Serialize>(builder: RequestBuilder, body: &B) -> Result<Request, ApiError> {
        builder.json(body).map_err(|e| ApiError::Network(e.to_string()))
    }

    async fn read(resp: Response) -> Result<(u16, String), ApiError> {
        let status = resp.status();
        let body = resp.text().await.map_err(|e| ApiError::Network(e.to_string()))?;
        Ok((status, body))
    }

    pub async fn send_builder<T: DeserializeOwned>(builder: RequestBuilder) -> Result<T, ApiError> {
        let resp = builder.send().await.map_err(|e| ApiError::Network(e.to_string()))?;
        let (status, body) = read(resp).await?;
        response::decode_json(status, &body)
    }

    pub async fn send_request<T: DeserializeOwned>(request: Request) -> Result<T, ApiError> {
        let resp = request.send().await.map_err(|e| ApiError::Network(e.to_string()))?;
        let (status, body) = read(resp).await?;
        response::decode_json(status, &body)
    }

    pub async fn send_empty(builder: RequestBuilder) -> Result<(), ApiError> {
        let resp = builder.send().await.map_err(|e| ApiError::Network(e.to_string()))?;
        let (status, body) = read(resp).await?;
        response::expect_success(status, &body)
    }
}

#[async_trait(?Send)]
impl AuthBackend for HttpBackend {
    async fn current_user(&self, token: &str) -> Result<UserRecord, ApiError> {
        #[cfg(feature = "hydrate")]
        {
            let builder = gloo_net::http::Request::get(&self.url(endpoints::AUTH_ME));
            transport::send_builder(transport::authorized(builder, Some(token))).await
        }
        #[cfg(not(feature = "hydrate"))]
        {
            let _ = (self.url(endpoints::AUTH_ME), token);
            Err(unavailable())
        }
    }

    async fn exchange_session_id(&self, session_id: &str) -> Result<SessionGrant, ApiError> {
        #[cfg(feature = "hydrate")]
        {
            let body = storefront_core::types::SessionExchange { session_id };
            let request =
                transport::with_json(gloo_net::http::Request::post(&self.url(endpoints::AUTH_SESSION)), &body)?;
            transport::send_request(request).await
        }
        #[cfg(not(feature = "hydrate"))]
        {
            let _ = session_id;
            Err(unavailable())
        }
    }

    async fn exchange_google_token(&self, access_token: &str) -> Result<SessionGrant, ApiError> {
        #[cfg(feature = "hydrate")]
        {
            let body = storefront_core::types::GoogleExchange { access_token };
            let request =
                transport::with_json(gloo_net::http::Request::post(&self.url(endpoints::AUTH_GOOGLE_MOBILE)), &body)?;
            transport::send_request(request).await
        }
        #[cfg(not(feature = "hydrate"))]
        {
            let _ = access_token;
            Err(unavailable())
        }
    }

    async fn logout(&self, token: &str) -> Result<(), ApiError> {
        #[cfg(feature = "hydrate")]
        {
            let builder = gloo_net::http::Request::post(&self.url(endpoints::AUTH_LOGOUT));
            transport::send_empty(transport::authorized(builder, Some(token))).await
        }
        #[cfg(not(feature = "hydrate"))]
        {
            let _ = token;
            Err(unavailable())
        }
    }

    async fn login_url(&self) -> Result<String, ApiError> {
        #[cfg(feature = "hydrate")]
        {
            let builder = gloo_net::http::Request::get(&self.url(endpoints::AUTH_LOGIN));
            let body: storefront_core::types::AuthUrl = transport::send_builder(builder).await?;
            Ok(body.auth_url)
        }
        #[cfg(not(feature = "hydrate"))]
        {
            Err(unavailable())
        }
    }

    fn google_login_url(&self) -> String {
        self.url(endpoints::AUTH_GOOGLE)
    }
}

#[async_trait(?Send)]
impl CatalogApi for HttpBackend {
    async fn list_products(&self, query: &ProductQuery, bearer: Option<&str>) -> Result<Vec<Product>, ApiError> {
        #[cfg(feature = "hydrate")]
        {
            let builder = gloo_net::http::Request::get(&self.url(&endpoints::products(query)));
            let products = transport::send_builder(transport::authorized(builder, bearer)).await?;
            Ok(query.apply_limit(products))
        }
        #[cfg(not(feature = "hydrate"))]
        {
            let _ = (query, bearer);
            Err(unavailable())
        }
    }

    async fn get_product(&self, id: &str, bearer: Option<&str>) -> Result<Product, ApiError> {
        #[cfg(feature = "hydrate")]
        {
            let builder = gloo_net::http::Request::get(&self.url(&endpoints::product(id)));
            transport::send_builder(transport::authorized(builder, bearer)).await
        }
        #[cfg(not(feature = "hydrate"))]
        {
            let _ = (id, bearer);
            Err(unavailable())
        }
    }

    async fn list_categories(&self, bearer: Option<&str>) -> Result<Vec<String>, ApiError> {
        #[cfg(feature = "hydrate")]
        {
            let builder = gloo_net::http::Request::get(&self.url(endpoints::CATEGORIES));
            let list: storefront_core::CategoryList =
                transport::send_builder(transport::authorized(builder, bearer)).await?;
            Ok(list.categories)
        }
        #[cfg(not(feature = "hydrate"))]
        {
            let _ = bearer;
            Err(unavailable())
        }
    }

    async fn create_product(&self, draft: &ProductDraft, bearer: Option<&str>) -> Result<Product, ApiError> {
        #[cfg(feature = "hydrate")]
        {
            let builder = transport::authorized(gloo_net::http::Request::post(&self.url(endpoints::PRODUCTS)), bearer);
            transport::send_request(transport::with_json(builder, draft)?).await
        }
        #[cfg(not(feature = "hydrate"))]
        {
            let _ = (draft, bearer);
            Err(unavailable())
        }
    }

    async fn update_product(&self, id: &str, draft: &ProductDraft, bearer: Option<&str>) -> Result<Product, ApiError> {
        #[cfg(feature = "hydrate")]
        {
            let builder =
                transport::authorized(gloo_net::http::Request::put(&self.url(&endpoints::product(id))), bearer);
            transport::send_request(transport::with_json(builder, draft)?).await
        }
        #[cfg(not(feature = "hydrate"))]
        {
            let _ = (id, draft, bearer);
            Err(unavailable())
        }
    }

    async fn delete_product(&self, id: &str, bearer: Option<&str>) -> Result<(), ApiError> {
        #[cfg(feature = "hydrate")]
        {
            let builder = gloo_net::http::Request::delete(&self.url(&endpoints::product(id)));
            transport::send_empty(transport::authorized(builder, bearer)).await
        }
        #[cfg(not(feature = "hydrate"))]
        {
            let _ = (id, bearer);
            Err(unavailable())
        }
    }

    async fn analytics(&self, bearer: Option<&str>) -> Result<Analytics, ApiError> {
        #[cfg(feature = "hydrate")]
        {
            let builder = gloo_net::http::Request::get(&self.url(endpoints::ADMIN_ANALYTICS));
            transport::send_builder(transport::authorized(builder, bearer)).await
        }
        #[cfg(not(feature = "hydrate"))]
        {
            let _ = bearer;
            Err(unavailable())
        }
    }
}
