//! Error taxonomy for backend calls, session transitions, and persistence.
//!
//! ERROR HANDLING
//! ==============
//! Transport code maps every non-2xx response through
//! [`ApiError::from_response`] so the session store and views can branch on
//! the failure class (auth, authorization, not-found) instead of raw status
//! codes. No variant implies a retry; every call is attempted once.

#[cfg(test)]
#[path = "error_test.rs"]
mod error_test;

/// Message shown when an auth exchange fails without a backend explanation.
pub const AUTH_FAILED_MESSAGE: &str = "Authorization failed";

/// Failure of a single REST call.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ApiError {
    /// The request never produced an HTTP response.
    #[error("network error: {0}")]
    Network(String),
    /// 401: missing, invalid, or expired credential.
    #[error("not authenticated")]
    Unauthorized { detail: Option<String> },
    /// 403: authenticated but not allowed (e.g. non-admin on admin endpoints).
    #[error("forbidden")]
    Forbidden { detail: Option<String> },
    /// 404: the requested resource does not exist.
    #[error("not found")]
    NotFound,
    /// Any other non-success status.
    #[error("request failed with status {status}")]
    Status { status: u16, detail: Option<String> },
    /// The response body did not match the expected schema.
    #[error("invalid response body: {0}")]
    Decode(String),
}

impl ApiError {
    /// Classify a non-success response by status, keeping the backend `detail` if any.
    #[must_use]
    pub fn from_response(status: u16, body: &str) -> Self {
        let detail = detail_message(body);
        match status {
            401 => Self::Unauthorized { detail },
            403 => Self::Forbidden { detail },
            404 => Self::NotFound,
            _ => Self::Status { status, detail },
        }
    }

    /// Backend-provided explanation, when the response carried one.
    #[must_use]
    pub fn detail(&self) -> Option<&str> {
        match self {
            Self::Unauthorized { detail } | Self::Forbidden { detail } | Self::Status { detail, .. } => {
                detail.as_deref()
            }
            Self::Network(_) | Self::NotFound | Self::Decode(_) => None,
        }
    }

    /// Human-readable message for auth flows.
    #[must_use]
    pub fn user_message(&self) -> String {
        self.detail().unwrap_or(AUTH_FAILED_MESSAGE).to_owned()
    }

    #[must_use]
    pub fn is_auth_failure(&self) -> bool {
        matches!(self, Self::Unauthorized { .. })
    }

    #[must_use]
    pub fn is_authorization_failure(&self) -> bool {
        matches!(self, Self::Forbidden { .. })
    }
}

/// Extract `detail` from a JSON error body.
///
/// Accepts a plain string or a list of `{ "msg": ... }` validation entries,
/// joined with `"; "`.
#[must_use]
pub fn detail_message(body: &str) -> Option<String> {
    let value: serde_json::Value = serde_json::from_str(body).ok()?;
    match value.get("detail")? {
        serde_json::Value::String(text) if !text.trim().is_empty() => Some(text.clone()),
        serde_json::Value::Array(items) => {
            let messages: Vec<&str> = items
                .iter()
                .filter_map(|item| item.get("msg").and_then(serde_json::Value::as_str))
                .collect();
            if messages.is_empty() { None } else { Some(messages.join("; ")) }
        }
        _ => None,
    }
}

/// Failure of a session store transition.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum SessionError {
    #[error(transparent)]
    Api(#[from] ApiError),
    /// `login` was called with a blank identifier; no request was made.
    #[error("session identifier is empty")]
    EmptyIdentifier,
    /// A later login/logout started before this call resolved; its result was discarded.
    #[error("superseded by a newer session operation")]
    Superseded,
}

impl SessionError {
    /// Human-readable message for the login UI.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::Api(error) => error.user_message(),
            Self::EmptyIdentifier | Self::Superseded => self.to_string(),
        }
    }
}

/// Failure writing persisted session data.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    /// No durable storage is reachable (private mode, SSR, missing file permissions).
    #[error("storage unavailable")]
    Unavailable,
    #[error("storage write failed: {0}")]
    Write(String),
    #[error("storage encode failed: {0}")]
    Encode(#[from] serde_json::Error),
}
