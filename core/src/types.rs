//! REST payload types for the storefront backend.
//!
//! DESIGN
//! ======
//! These types mirror the backend JSON so serde round-trips stay lossless.
//! Fields the backend may omit carry `#[serde(default)]`, and string enums
//! keep unknown values instead of failing the whole response.

#[cfg(test)]
#[path = "types_test.rs"]
mod types_test;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

// =============================================================================
// USERS
// =============================================================================

/// Account role as reported by the backend. Unknown roles read as `Customer`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Role {
    #[default]
    Customer,
    Admin,
}

impl From<String> for Role {
    fn from(raw: String) -> Self {
        if raw.eq_ignore_ascii_case("admin") { Self::Admin } else { Self::Customer }
    }
}

impl From<Role> for String {
    fn from(role: Role) -> Self {
        match role {
            Role::Customer => "customer".to_owned(),
            Role::Admin => "admin".to_owned(),
        }
    }
}

/// An authenticated user as returned by `/api/auth/me`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct UserRecord {
    /// Backend user identifier.
    pub id: String,
    /// Display name.
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub role: Role,
    /// Avatar image URL, if the identity provider supplied one.
    #[serde(default)]
    pub picture: Option<String>,
    /// Identity provider label (e.g. `"google"`).
    #[serde(default)]
    pub provider: Option<String>,
}

impl UserRecord {
    #[must_use]
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }

    /// Uppercased first letter of the name, used for avatar placeholders.
    #[must_use]
    pub fn initial(&self) -> String {
        self.name
            .chars()
            .next()
            .map(|c| c.to_uppercase().collect())
            .unwrap_or_else(|| "?".to_owned())
    }
}

/// Successful credential exchange: a session token plus the user it belongs to.
///
/// `POST /auth/session` names the token `session_token`; the Google exchange
/// names it `access_token`.
#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct SessionGrant {
    pub user: UserRecord,
    #[serde(alias = "session_token", alias = "access_token")]
    pub token: String,
}

/// Body of `POST /auth/session`.
#[derive(Clone, Debug, Serialize)]
pub struct SessionExchange<'a> {
    pub session_id: &'a str,
}

/// Body of `POST /auth/google/mobile`.
#[derive(Clone, Debug, Serialize)]
pub struct GoogleExchange<'a> {
    pub access_token: &'a str,
}

/// Response of `GET /auth/login` (legacy redirect flow).
#[derive(Clone, Debug, Deserialize)]
pub struct AuthUrl {
    pub auth_url: String,
}

// =============================================================================
// CATALOG
// =============================================================================

/// Publication status of a product. Unrecognized values are preserved.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ProductStatus {
    #[default]
    Active,
    Inactive,
    Draft,
    Other(String),
}

impl From<String> for ProductStatus {
    fn from(raw: String) -> Self {
        match raw.as_str() {
            "active" => Self::Active,
            "inactive" => Self::Inactive,
            "draft" => Self::Draft,
            _ => Self::Other(raw),
        }
    }
}

impl From<ProductStatus> for String {
    fn from(status: ProductStatus) -> Self {
        match status {
            ProductStatus::Active => "active".to_owned(),
            ProductStatus::Inactive => "inactive".to_owned(),
            ProductStatus::Draft => "draft".to_owned(),
            ProductStatus::Other(raw) => raw,
        }
    }
}

/// A catalog product.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub price: f64,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub stock: i64,
    /// Base64-encoded image blobs, cover image first.
    #[serde(default)]
    pub images: Vec<String>,
    #[serde(default)]
    pub status: ProductStatus,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub created_by: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
}

impl Product {
    #[must_use]
    pub fn in_stock(&self) -> bool {
        self.stock > 0
    }

    /// Displayable source for the cover image: the first blob as a data URL,
    /// falling back to `image_url`.
    #[must_use]
    pub fn cover_image(&self) -> Option<String> {
        self.images
            .first()
            .map(|blob| image_data_url(blob))
            .or_else(|| self.image_url.clone())
    }
}

/// Wrap a base64 blob as a `data:` URL. Blobs that already are data URLs pass through.
#[must_use]
pub fn image_data_url(blob: &str) -> String {
    if blob.starts_with("data:") {
        blob.to_owned()
    } else {
        format!("data:image/jpeg;base64,{blob}")
    }
}

/// Create/update payload for admin product writes. Absent fields are not sent.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProductDraft {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stock: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub images: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<ProductStatus>,
}

/// Catalog filter for `GET /products`.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ProductQuery {
    pub category: Option<String>,
    pub search: Option<String>,
    pub min_price: Option<f64>,
    pub max_price: Option<f64>,
    pub sort_by: Option<String>,
    /// Applied locally after the response arrives; the backend has no limit parameter.
    pub limit: Option<usize>,
}

impl ProductQuery {
    /// Query parameters in backend order, skipping unset and blank values.
    #[must_use]
    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();
        let mut push_text = |key: &'static str, value: &Option<String>| {
            if let Some(value) = value.as_deref().map(str::trim).filter(|v| !v.is_empty()) {
                pairs.push((key, value.to_owned()));
            }
        };
        push_text("category", &self.category);
        push_text("search", &self.search);
        if let Some(min) = self.min_price {
            pairs.push(("min_price", min.to_string()));
        }
        if let Some(max) = self.max_price {
            pairs.push(("max_price", max.to_string()));
        }
        if let Some(sort) = self.sort_by.as_deref().map(str::trim).filter(|v| !v.is_empty()) {
            pairs.push(("sort_by", sort.to_owned()));
        }
        pairs
    }

    /// URL-encoded query string without the leading `?`.
    #[must_use]
    pub fn to_query_string(&self) -> String {
        let mut serializer = url::form_urlencoded::Serializer::new(String::new());
        for (key, value) in self.query_pairs() {
            serializer.append_pair(key, &value);
        }
        serializer.finish()
    }

    /// Truncate a fetched list to `limit`.
    #[must_use]
    pub fn apply_limit(&self, mut products: Vec<Product>) -> Vec<Product> {
        if let Some(limit) = self.limit {
            products.truncate(limit);
        }
        products
    }
}

/// Response of `GET /categories`.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct CategoryList {
    #[serde(default)]
    pub categories: Vec<String>,
}

// =============================================================================
// ANALYTICS
// =============================================================================

/// One bar of the page-view histogram.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageViews {
    #[serde(alias = "_id")]
    pub page: String,
    pub count: u64,
}

/// Response of `GET /admin/analytics`.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Analytics {
    pub total_visitors: u64,
    pub unique_visitors: u64,
    pub total_products: u64,
    pub total_users: u64,
    #[serde(deserialize_with = "deserialize_page_views")]
    pub page_views: Vec<PageViews>,
}

/// Accept the histogram either as `[{page, count}]` or as `{page: count}`.
fn deserialize_page_views<'de, D>(deserializer: D) -> Result<Vec<PageViews>, D::Error>
where
    D: Deserializer<'de>,
{
    use serde::de::Error as _;

    match Value::deserialize(deserializer)? {
        Value::Null => Ok(Vec::new()),
        Value::Array(items) => items
            .into_iter()
            .map(|item| PageViews::deserialize(item).map_err(D::Error::custom))
            .collect(),
        Value::Object(map) => {
            let mut views: Vec<PageViews> = map
                .into_iter()
                .filter_map(|(page, count)| count.as_u64().map(|count| PageViews { page, count }))
                .collect();
            views.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.page.cmp(&b.page)));
            Ok(views)
        }
        other => Err(D::Error::custom(format!("expected page view list or map, got {other}"))),
    }
}
