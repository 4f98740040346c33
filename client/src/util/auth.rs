//! Shared auth UI helpers.
//!
//! SYSTEM CONTEXT
//! ==============
//! Admin routes apply identical redirect behavior: once the session has
//! resolved, anyone who is not an admin is sent home. Authorization failures
//! are redirects, not error screens.

#[cfg(test)]
#[path = "auth_test.rs"]
mod auth_test;

use leptos::prelude::*;
use leptos_router::NavigateOptions;
use storefront_core::{ApiError, Session};

/// True once startup resolved and the session lacks admin rights.
pub fn should_redirect_non_admin(session: &Session) -> bool {
    session.is_resolved() && !session.is_admin()
}

/// Redirect to `/` whenever the resolved session is not an admin.
pub fn install_admin_guard<F>(session: RwSignal<Session>, navigate: F)
where
    F: Fn(&str, NavigateOptions) + Clone + 'static,
{
    Effect::new(move || {
        if should_redirect_non_admin(&session.get()) {
            navigate("/", NavigateOptions { replace: true, ..NavigateOptions::default() });
        }
    });
}

/// Pass `result` through, sending the user home first if the backend refused
/// the credential or the role.
pub fn leave_if_denied<T, F>(result: Result<T, ApiError>, navigate: &F) -> Result<T, ApiError>
where
    F: Fn(&str, NavigateOptions),
{
    if let Err(e) = &result {
        if e.is_auth_failure() || e.is_authorization_failure() {
            navigate("/", NavigateOptions { replace: true, ..NavigateOptions::default() });
        }
    }
    result
}
