//! Session snapshot observed by views.

#[cfg(test)]
#[path = "session_test.rs"]
mod session_test;

use crate::types::UserRecord;

/// Coarse lifecycle of a session, derived from [`Session`] fields.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SessionStatus {
    /// `initialize` has not finished yet.
    Uninitialized,
    /// A login or validation call is in flight.
    Authenticating,
    Authenticated,
    Unauthenticated,
}

/// Current authentication state.
///
/// `user` and `token` are either both set or both unset once a transition
/// completes. `error` holds the latest user-visible auth failure.
#[derive(Clone, Debug, PartialEq)]
pub struct Session {
    pub user: Option<UserRecord>,
    pub token: Option<String>,
    pub loading: bool,
    pub error: Option<String>,
    pub initialized: bool,
}

impl Default for Session {
    fn default() -> Self {
        Self { user: None, token: None, loading: true, error: None, initialized: false }
    }
}

impl Session {
    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.user.is_some() && self.token.is_some()
    }

    #[must_use]
    pub fn is_admin(&self) -> bool {
        self.is_authenticated() && self.user.as_ref().is_some_and(UserRecord::is_admin)
    }

    /// Startup has finished and nothing is in flight; guards may decide now.
    #[must_use]
    pub fn is_resolved(&self) -> bool {
        self.initialized && !self.loading
    }

    #[must_use]
    pub fn status(&self) -> SessionStatus {
        if self.is_authenticated() {
            SessionStatus::Authenticated
        } else if !self.initialized {
            SessionStatus::Uninitialized
        } else if self.loading {
            SessionStatus::Authenticating
        } else {
            SessionStatus::Unauthenticated
        }
    }

    pub(crate) fn sign_in(&mut self, token: String, user: UserRecord) {
        self.token = Some(token);
        self.user = Some(user);
        self.loading = false;
        self.error = None;
    }

    pub(crate) fn sign_out(&mut self) {
        self.token = None;
        self.user = None;
        self.loading = false;
    }
}
