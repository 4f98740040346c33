//! Session store: the single source of truth for who is logged in.
//!
//! SYSTEM CONTEXT
//! ==============
//! Mounted once at the application root (or once per CLI invocation) and
//! shared by reference. Views read [`SessionStore::snapshot`] or subscribe;
//! only the store mutates the session and the persisted token/user pair.
//!
//! DESIGN
//! ======
//! Every login/logout bumps a request generation. An async result is applied
//! only if its generation is still current when it resolves, so a logout
//! issued while a login is in flight always wins and the stale login reports
//! [`SessionError::Superseded`]. State sits behind a mutex and the generation
//! is atomic, which keeps the store `Send + Sync` for reactive contexts even
//! though backend futures are not `Send`.
//!
//! ERROR HANDLING
//! ==============
//! Persisted-token validation failures degrade silently to signed out. A
//! handshake token that fails validation sets [`AUTH_FAILED_MESSAGE`]. Logout
//! failures are logged and swallowed. Storage write failures are logged and
//! never abort a transition.

#[cfg(test)]
#[path = "store_test.rs"]
mod store_test;

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};

use crate::backend::{AuthBackend, Location};
use crate::endpoints;
use crate::error::{AUTH_FAILED_MESSAGE, SessionError};
use crate::handshake::{self, Handshake};
use crate::persist::{KeyValueStore, Persistence};
use crate::session::Session;
use crate::types::UserRecord;

type Listener = Box<dyn Fn(&Session) + Send + Sync>;

pub struct SessionStore<B, K, L> {
    backend: B,
    persistence: Persistence<K>,
    location: L,
    state: Mutex<Session>,
    generation: AtomicU64,
    listeners: Mutex<Vec<Listener>>,
}

impl<B, K, L> SessionStore<B, K, L>
where
    B: AuthBackend,
    K: KeyValueStore,
    L: Location,
{
    pub fn new(backend: B, storage: K, location: L) -> Self {
        Self {
            backend,
            persistence: Persistence::new(storage),
            location,
            state: Mutex::new(Session::default()),
            generation: AtomicU64::new(0),
            listeners: Mutex::default(),
        }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn storage(&self) -> &K {
        self.persistence.store()
    }

    pub fn location(&self) -> &L {
        &self.location
    }

    pub fn snapshot(&self) -> Session {
        self.lock_state().clone()
    }

    pub fn token(&self) -> Option<String> {
        self.lock_state().token.clone()
    }

    /// `Authorization` header value for the current token.
    pub fn bearer(&self) -> Option<String> {
        self.token().map(|token| endpoints::bearer(&token))
    }

    /// Register a listener called with the new snapshot after every
    /// transition. Listeners must not call `subscribe` themselves.
    pub fn subscribe(&self, listener: impl Fn(&Session) + Send + Sync + 'static) {
        self.listeners.lock().unwrap_or_else(PoisonError::into_inner).push(Box::new(listener));
    }

    // =========================================================================
    // LIFECYCLE
    // =========================================================================

    /// Resolve the session once: URL handshake first, then the persisted
    /// token. Later calls return the current snapshot without backend calls.
    pub async fn initialize(&self) -> Session {
        let already = self.update(|session| std::mem::replace(&mut session.initialized, true));
        if already {
            return self.snapshot();
        }
        let generation = self.begin();

        let href = self.location.href();
        let handshake = href.as_deref().map_or(Handshake::None, handshake::parse);
        if let Some(clean) = href.as_deref().and_then(handshake::strip) {
            self.location.replace(&clean);
        }

        match handshake {
            Handshake::Token(token) => self.adopt_handshake_token(generation, token).await,
            Handshake::SessionId(session_id) => match self.exchange_session_id(generation, &session_id).await {
                Ok(_) | Err(SessionError::Superseded) => {}
                Err(e) => {
                    log::warn!("session id handshake failed: {e}");
                    let message = e.user_message();
                    self.commit(generation, |session, _| {
                        session.loading = false;
                        session.error = Some(message);
                    });
                }
            },
            Handshake::Error(message) => {
                log::info!("auth redirect returned error: {message}");
                self.commit(generation, |session, _| {
                    session.loading = false;
                    session.error = Some(message);
                });
            }
            Handshake::None => self.restore_persisted(generation).await,
        }

        self.snapshot()
    }

    async fn adopt_handshake_token(&self, generation: u64, token: String) {
        match self.backend.current_user(&token).await {
            Ok(user) => {
                log::info!("signed in from redirect as {}", user.id);
                self.commit(generation, |session, persistence| adopt(session, persistence, token, user));
            }
            Err(e) => {
                log::warn!("redirect token rejected: {e}");
                self.commit(generation, |session, _| {
                    session.sign_out();
                    session.error = Some(AUTH_FAILED_MESSAGE.to_owned());
                });
            }
        }
    }

    async fn restore_persisted(&self, generation: u64) {
        let Some(persisted) = self.persistence.load() else {
            self.commit(generation, |session, _| session.loading = false);
            return;
        };

        match self.backend.current_user(&persisted.token).await {
            Ok(fresh) => {
                let user = match persisted.user {
                    Some(cached) if cached.id == fresh.id => cached,
                    _ => fresh,
                };
                self.commit(generation, |session, persistence| {
                    adopt(session, persistence, persisted.token, user);
                });
            }
            Err(e) => {
                log::info!("persisted session rejected, clearing: {e}");
                self.commit(generation, |session, persistence| {
                    persistence.clear();
                    session.sign_out();
                });
            }
        }
    }

    // =========================================================================
    // LOGIN / LOGOUT
    // =========================================================================

    /// Exchange a one-time session identifier for a token.
    ///
    /// On failure the session is left as it was and the error goes to the caller.
    ///
    /// # Errors
    ///
    /// [`SessionError::EmptyIdentifier`] for a blank id (no request is made),
    /// [`SessionError::Superseded`] if a newer login/logout started meanwhile,
    /// or the backend failure.
    pub async fn login(&self, session_id: &str) -> Result<UserRecord, SessionError> {
        let session_id = session_id.trim();
        if session_id.is_empty() {
            return Err(SessionError::EmptyIdentifier);
        }
        let generation = self.begin();
        let prior_loading = self.update(|session| std::mem::replace(&mut session.loading, true));

        let result = self.exchange_session_id(generation, session_id).await;
        if let Err(SessionError::Api(e)) = &result {
            log::warn!("session login failed: {e}");
            self.commit(generation, |session, _| session.loading = prior_loading);
        }
        result
    }

    async fn exchange_session_id(&self, generation: u64, session_id: &str) -> Result<UserRecord, SessionError> {
        let grant = self.backend.exchange_session_id(session_id).await?;
        let user = grant.user.clone();
        let applied = self.commit(generation, |session, persistence| {
            adopt(session, persistence, grant.token, grant.user);
        });
        if applied { Ok(user) } else { Err(SessionError::Superseded) }
    }

    /// Exchange a Google access token obtained out of band.
    ///
    /// # Errors
    ///
    /// [`SessionError::EmptyIdentifier`] for a blank token,
    /// [`SessionError::Superseded`] if a newer login/logout started meanwhile,
    /// or the backend failure (also recorded in `error`).
    pub async fn login_with_google_token(&self, access_token: &str) -> Result<UserRecord, SessionError> {
        let access_token = access_token.trim();
        if access_token.is_empty() {
            return Err(SessionError::EmptyIdentifier);
        }
        let generation = self.begin();
        self.update(|session| {
            session.loading = true;
            session.error = None;
        });

        match self.backend.exchange_google_token(access_token).await {
            Ok(grant) => {
                let user = grant.user.clone();
                let applied = self.commit(generation, |session, persistence| {
                    adopt(session, persistence, grant.token, grant.user);
                });
                if applied { Ok(user) } else { Err(SessionError::Superseded) }
            }
            Err(e) => {
                log::warn!("google token exchange failed: {e}");
                let message = e.user_message();
                self.commit(generation, |session, _| {
                    session.loading = false;
                    session.error = Some(message);
                });
                Err(e.into())
            }
        }
    }

    /// Navigate to the backend's OAuth entry point. The flow comes back
    /// through the `token`/`error` handshake on the next `initialize`.
    pub fn login_with_google_redirect(&self) {
        self.begin();
        self.update(|session| {
            session.loading = true;
            session.error = None;
        });
        let url = self.backend.google_login_url();
        log::info!("redirecting to {url}");
        self.location.assign(&url);
    }

    /// Legacy flow: ask the backend for a provider URL and navigate to it.
    ///
    /// # Errors
    ///
    /// [`SessionError::Superseded`] if a newer login/logout started meanwhile,
    /// or the backend failure (also recorded in `error`).
    pub async fn login_with_redirect(&self) -> Result<String, SessionError> {
        let generation = self.begin();
        self.update(|session| {
            session.loading = true;
            session.error = None;
        });

        match self.backend.login_url().await {
            Ok(url) if self.is_current(generation) => {
                self.location.assign(&url);
                Ok(url)
            }
            Ok(_) => Err(SessionError::Superseded),
            Err(e) => {
                log::warn!("login url request failed: {e}");
                let message = e.user_message();
                self.commit(generation, |session, _| {
                    session.loading = false;
                    session.error = Some(message);
                });
                Err(e.into())
            }
        }
    }

    /// Sign out locally right away, then tell the backend if a token was held.
    /// A token still only in storage (store never initialized) counts as held.
    /// Backend failures are logged only.
    pub async fn logout(&self) {
        self.begin();
        let token = {
            let mut state = self.lock_state();
            let token = state.token.take().or_else(|| self.persistence.load().map(|persisted| persisted.token));
            state.sign_out();
            state.error = None;
            state.initialized = true;
            self.persistence.clear();
            let snapshot = state.clone();
            drop(state);
            self.notify(&snapshot);
            token
        };

        if let Some(token) = token {
            if let Err(e) = self.backend.logout(&token).await {
                log::warn!("logout request failed: {e}");
            }
        }
    }

    pub fn clear_error(&self) {
        self.update(|session| session.error = None);
    }

    // =========================================================================
    // INTERNALS
    // =========================================================================

    fn lock_state(&self) -> MutexGuard<'_, Session> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn begin(&self) -> u64 {
        self.generation.fetch_add(1, Ordering::SeqCst) + 1
    }

    fn is_current(&self, generation: u64) -> bool {
        self.generation.load(Ordering::SeqCst) == generation
    }

    /// Apply unconditionally and notify.
    fn update<R>(&self, apply: impl FnOnce(&mut Session) -> R) -> R {
        let mut state = self.lock_state();
        let result = apply(&mut state);
        let snapshot = state.clone();
        drop(state);
        self.notify(&snapshot);
        result
    }

    /// Apply only if `generation` is still current. Returns whether it applied.
    fn commit(&self, generation: u64, apply: impl FnOnce(&mut Session, &Persistence<K>)) -> bool {
        let mut state = self.lock_state();
        if !self.is_current(generation) {
            return false;
        }
        apply(&mut state, &self.persistence);
        let snapshot = state.clone();
        drop(state);
        self.notify(&snapshot);
        true
    }

    fn notify(&self, snapshot: &Session) {
        let listeners = self.listeners.lock().unwrap_or_else(PoisonError::into_inner);
        for listener in listeners.iter() {
            listener(snapshot);
        }
    }
}

fn adopt<K: KeyValueStore>(session: &mut Session, persistence: &Persistence<K>, token: String, user: UserRecord) {
    if let Err(e) = persistence.save(&token, &user) {
        log::warn!("failed to persist session: {e}");
    }
    session.sign_in(token, user);
}
