//! `reqwest` transport for the session store and catalog commands.
//!
//! ERROR HANDLING
//! ==============
//! Transport failures become `ApiError::Network`; status and body go through
//! `storefront_core::response` so the CLI classifies failures exactly like
//! the browser client does.

#[cfg(test)]
#[path = "rest_test.rs"]
mod rest_test;

use async_trait::async_trait;
use reqwest::RequestBuilder;
use reqwest::header::AUTHORIZATION;
use serde::de::DeserializeOwned;
use serde_json::Value;
use storefront_core::types::{AuthUrl, GoogleExchange, SessionExchange};
use storefront_core::{
    Analytics, ApiError, AuthBackend, CatalogApi, CategoryList, Product, ProductDraft, ProductQuery, SessionGrant,
    UserRecord, endpoints, response,
};

use crate::error::CliError;

/// `{base_url}/api`, accepting a base with or without the `/api` suffix.
pub fn api_base(base_url: &str) -> Result<String, CliError> {
    let parsed = url::Url::parse(base_url.trim()).map_err(|e| CliError::InvalidBaseUrl(format!("{base_url}: {e}")))?;
    if !matches!(parsed.scheme(), "http" | "https") {
        return Err(CliError::InvalidBaseUrl(base_url.to_owned()));
    }
    let origin = parsed.as_str().trim_end_matches('/');
    let origin = origin.strip_suffix("/api").unwrap_or(origin);
    Ok(format!("{origin}/api"))
}

fn network(e: reqwest::Error) -> ApiError {
    ApiError::Network(e.to_string())
}

fn authorized(builder: RequestBuilder, token: Option<&str>) -> RequestBuilder {
    match token {
        Some(token) => builder.header(AUTHORIZATION, endpoints::bearer(token)),
        None => builder,
    }
}

async fn read(builder: RequestBuilder) -> Result<(u16, String), ApiError> {
    let resp = builder.send().await.map_err(network)?;
    let status = resp.status().as_u16();
    let body = resp.text().await.map_err(network)?;
    tracing::debug!(status, "response received");
    Ok((status, body))
}

async fn send<T: DeserializeOwned>(builder: RequestBuilder) -> Result<T, ApiError> {
    let (status, body) = read(builder).await?;
    response::decode_json(status, &body)
}

async fn send_empty(builder: RequestBuilder) -> Result<(), ApiError> {
    let (status, body) = read(builder).await?;
    response::expect_success(status, &body)
}

#[derive(Clone, Debug)]
pub struct RestBackend {
    client: reqwest::Client,
    api_base: String,
}

impl RestBackend {
    pub fn new(base_url: &str) -> Result<Self, CliError> {
        let client = reqwest::Client::builder().redirect(reqwest::redirect::Policy::none()).build()?;
        Ok(Self { client, api_base: api_base(base_url)? })
    }

    pub fn api_base(&self) -> &str {
        &self.api_base
    }

    fn url(&self, path: &str) -> String {
        endpoints::join(&self.api_base, path)
    }

    /// `GET /health`.
    pub async fn health(&self) -> Result<Value, ApiError> {
        send(self.client.get(self.url(endpoints::HEALTH))).await
    }
}

#[async_trait(?Send)]
impl AuthBackend for RestBackend {
    async fn current_user(&self, token: &str) -> Result<UserRecord, ApiError> {
        send(authorized(self.client.get(self.url(endpoints::AUTH_ME)), Some(token))).await
    }

    async fn exchange_session_id(&self, session_id: &str) -> Result<SessionGrant, ApiError> {
        let body = SessionExchange { session_id };
        send(self.client.post(self.url(endpoints::AUTH_SESSION)).json(&body)).await
    }

    async fn exchange_google_token(&self, access_token: &str) -> Result<SessionGrant, ApiError> {
        let body = GoogleExchange { access_token };
        send(self.client.post(self.url(endpoints::AUTH_GOOGLE_MOBILE)).json(&body)).await
    }

    async fn logout(&self, token: &str) -> Result<(), ApiError> {
        send_empty(authorized(self.client.post(self.url(endpoints::AUTH_LOGOUT)), Some(token))).await
    }

    async fn login_url(&self) -> Result<String, ApiError> {
        let body: AuthUrl = send(self.client.get(self.url(endpoints::AUTH_LOGIN))).await?;
        Ok(body.auth_url)
    }

    fn google_login_url(&self) -> String {
        self.url(endpoints::AUTH_GOOGLE)
    }
}

#[async_trait(?Send)]
impl CatalogApi for RestBackend {
    async fn list_products(&self, query: &ProductQuery, bearer: Option<&str>) -> Result<Vec<Product>, ApiError> {
        let products = send(authorized(self.client.get(self.url(&endpoints::products(query))), bearer)).await?;
        Ok(query.apply_limit(products))
    }

    async fn get_product(&self, id: &str, bearer: Option<&str>) -> Result<Product, ApiError> {
        send(authorized(self.client.get(self.url(&endpoints::product(id))), bearer)).await
    }

    async fn list_categories(&self, bearer: Option<&str>) -> Result<Vec<String>, ApiError> {
        let list: CategoryList = send(authorized(self.client.get(self.url(endpoints::CATEGORIES)), bearer)).await?;
        Ok(list.categories)
    }

    async fn create_product(&self, draft: &ProductDraft, bearer: Option<&str>) -> Result<Product, ApiError> {
        send(authorized(self.client.post(self.url(endpoints::PRODUCTS)), bearer).json(draft)).await
    }

    async fn update_product(&self, id: &str, draft: &ProductDraft, bearer: Option<&str>) -> Result<Product, ApiError> {
        send(authorized(self.client.put(self.url(&endpoints::product(id))), bearer).json(draft)).await
    }

    async fn delete_product(&self, id: &str, bearer: Option<&str>) -> Result<(), ApiError> {
        send_empty(authorized(self.client.delete(self.url(&endpoints::product(id))), bearer)).await
    }

    async fn analytics(&self, bearer: Option<&str>) -> Result<Analytics, ApiError> {
        send(authorized(self.client.get(self.url(endpoints::ADMIN_ANALYTICS)), bearer)).await
    }
}
