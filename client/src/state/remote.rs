//! Fetch status for data a view requested from the backend.

#[cfg(test)]
#[path = "remote_test.rs"]
mod remote_test;

use storefront_core::ApiError;

#[derive(Clone, Debug, Default, PartialEq)]
pub enum Remote<T> {
    #[default]
    Loading,
    Ready(T),
    Failed(String),
}

impl<T> Remote<T> {
    pub fn from_result(result: Result<T, ApiError>) -> Self {
        match result {
            Ok(value) => Self::Ready(value),
            Err(e) => Self::Failed(failure_message(&e)),
        }
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, Self::Loading)
    }

    pub fn ready(&self) -> Option<&T> {
        match self {
            Self::Ready(value) => Some(value),
            Self::Loading | Self::Failed(_) => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            Self::Failed(message) => Some(message),
            Self::Loading | Self::Ready(_) => None,
        }
    }
}

/// Short user-facing text for a failed fetch.
pub fn failure_message(error: &ApiError) -> String {
    match error {
        ApiError::NotFound => "Not found.".to_owned(),
        ApiError::Unauthorized { .. } => "Please sign in first.".to_owned(),
        ApiError::Forbidden { .. } => "You do not have access to this page.".to_owned(),
        other => other.detail().map_or_else(|| other.to_string(), str::to_owned),
    }
}
