//! Injected collaborators: REST transport and URL access.
//!
//! SYSTEM CONTEXT
//! ==============
//! The browser client implements these traits over `gloo-net` and
//! `window.location`; the CLI implements them over `reqwest` and a pasted
//! URL. Futures are not required to be `Send` because the browser
//! transport runs on the single-threaded wasm executor.

use std::sync::{Mutex, PoisonError};

use async_trait::async_trait;

use crate::error::ApiError;
use crate::types::{Analytics, Product, ProductDraft, ProductQuery, SessionGrant, UserRecord};

/// Authentication endpoints under `/api/auth`.
#[async_trait(?Send)]
pub trait AuthBackend {
    /// `GET /auth/me` with the given bearer token.
    async fn current_user(&self, token: &str) -> Result<UserRecord, ApiError>;

    /// `POST /auth/session { session_id }`.
    async fn exchange_session_id(&self, session_id: &str) -> Result<SessionGrant, ApiError>;

    /// `POST /auth/google/mobile { access_token }`.
    async fn exchange_google_token(&self, access_token: &str) -> Result<SessionGrant, ApiError>;

    /// `POST /auth/logout` with the given bearer token.
    async fn logout(&self, token: &str) -> Result<(), ApiError>;

    /// `GET /auth/login`, returning the provider URL to navigate to.
    async fn login_url(&self) -> Result<String, ApiError>;

    /// Absolute or base-relative URL of the OAuth redirect entry point.
    fn google_login_url(&self) -> String;
}

/// Stateless catalog collaborator. `bearer` is attached when present.
#[async_trait(?Send)]
pub trait CatalogApi {
    async fn list_products(&self, query: &ProductQuery, bearer: Option<&str>) -> Result<Vec<Product>, ApiError>;

    async fn get_product(&self, id: &str, bearer: Option<&str>) -> Result<Product, ApiError>;

    async fn list_categories(&self, bearer: Option<&str>) -> Result<Vec<String>, ApiError>;

    async fn create_product(&self, draft: &ProductDraft, bearer: Option<&str>) -> Result<Product, ApiError>;

    async fn update_product(&self, id: &str, draft: &ProductDraft, bearer: Option<&str>) -> Result<Product, ApiError>;

    async fn delete_product(&self, id: &str, bearer: Option<&str>) -> Result<(), ApiError>;

    async fn analytics(&self, bearer: Option<&str>) -> Result<Analytics, ApiError>;
}

/// Access to the visible URL.
pub trait Location {
    /// Current absolute URL, if there is one.
    fn href(&self) -> Option<String>;

    /// Replace the visible URL without navigating or adding history.
    fn replace(&self, href: &str);

    /// Navigate away to `href`.
    fn assign(&self, href: &str);
}

/// Location held in memory. Records navigations instead of performing them.
#[derive(Debug, Default)]
pub struct MemoryLocation {
    href: Mutex<Option<String>>,
    assigned: Mutex<Vec<String>>,
}

impl MemoryLocation {
    #[must_use]
    pub fn new(href: impl Into<String>) -> Self {
        Self { href: Mutex::new(Some(href.into())), assigned: Mutex::default() }
    }

    /// Navigations requested through [`Location::assign`], oldest first.
    #[must_use]
    pub fn assigned(&self) -> Vec<String> {
        self.assigned.lock().unwrap_or_else(PoisonError::into_inner).clone()
    }
}

impl Location for MemoryLocation {
    fn href(&self) -> Option<String> {
        self.href.lock().unwrap_or_else(PoisonError::into_inner).clone()
    }

    fn replace(&self, href: &str) {
        *self.href.lock().unwrap_or_else(PoisonError::into_inner) = Some(href.to_owned());
    }

    fn assign(&self, href: &str) {
        self.assigned.lock().unwrap_or_else(PoisonError::into_inner).push(href.to_owned());
    }
}
