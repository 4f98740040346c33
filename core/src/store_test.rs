use super::*;
use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::AtomicUsize;

use async_trait::async_trait;

use crate::backend::MemoryLocation;
use crate::error::ApiError;
use crate::persist::{MemoryStore, TOKEN_KEY, USER_KEY};
use crate::session::SessionStatus;
use crate::types::{Role, SessionGrant};

const HOME: &str = "https://shop.example/";
const GOOGLE_ENTRY: &str = "https://shop.example/api/auth/google";

fn user(id: &str, name: &str) -> UserRecord {
    UserRecord {
        id: id.to_owned(),
        name: name.to_owned(),
        email: format!("{id}@example.com"),
        role: Role::Customer,
        picture: None,
        provider: Some("google".to_owned()),
    }
}

fn grant(token: &str, id: &str) -> SessionGrant {
    SessionGrant { user: user(id, "Alice"), token: token.to_owned() }
}

/// Backend answering from fixed tables and recording every call.
#[derive(Default)]
struct ScriptedBackend {
    tokens: HashMap<String, UserRecord>,
    sessions: HashMap<String, SessionGrant>,
    google: HashMap<String, SessionGrant>,
    login_url: Option<String>,
    logout_fails: bool,
    calls: Mutex<Vec<String>>,
}

impl ScriptedBackend {
    fn with_token(mut self, token: &str, record: UserRecord) -> Self {
        self.tokens.insert(token.to_owned(), record);
        self
    }

    fn with_session(mut self, session_id: &str, grant: SessionGrant) -> Self {
        self.tokens.insert(grant.token.clone(), grant.user.clone());
        self.sessions.insert(session_id.to_owned(), grant);
        self
    }

    fn with_google(mut self, access_token: &str, grant: SessionGrant) -> Self {
        self.google.insert(access_token.to_owned(), grant);
        self
    }

    fn record(&self, call: String) {
        self.calls.lock().unwrap().push(call);
    }

    fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait(?Send)]
impl AuthBackend for ScriptedBackend {
    async fn current_user(&self, token: &str) -> Result<UserRecord, ApiError> {
        self.record(format!("me:{token}"));
        self.tokens.get(token).cloned().ok_or(ApiError::Unauthorized { detail: None })
    }

    async fn exchange_session_id(&self, session_id: &str) -> Result<SessionGrant, ApiError> {
        self.record(format!("session:{session_id}"));
        tokio::task::yield_now().await;
        self.sessions
            .get(session_id)
            .cloned()
            .ok_or(ApiError::Unauthorized { detail: Some("Invalid session".to_owned()) })
    }

    async fn exchange_google_token(&self, access_token: &str) -> Result<SessionGrant, ApiError> {
        self.record(format!("google:{access_token}"));
        self.google
            .get(access_token)
            .cloned()
            .ok_or(ApiError::Status { status: 400, detail: Some("Invalid Google token".to_owned()) })
    }

    async fn logout(&self, token: &str) -> Result<(), ApiError> {
        self.record(format!("logout:{token}"));
        if self.logout_fails { Err(ApiError::Network("connection reset".to_owned())) } else { Ok(()) }
    }

    async fn login_url(&self) -> Result<String, ApiError> {
        self.record("login_url".to_owned());
        self.login_url.clone().ok_or(ApiError::Status { status: 503, detail: None })
    }

    fn google_login_url(&self) -> String {
        GOOGLE_ENTRY.to_owned()
    }
}

type TestStore = SessionStore<ScriptedBackend, MemoryStore, MemoryLocation>;

fn make_store(backend: ScriptedBackend, href: &str) -> TestStore {
    SessionStore::new(backend, MemoryStore::new(), MemoryLocation::new(href))
}

fn make_store_with_storage(backend: ScriptedBackend, storage: MemoryStore) -> TestStore {
    SessionStore::new(backend, storage, MemoryLocation::new(HOME))
}

fn persisted(token: &str, cached: &UserRecord) -> MemoryStore {
    MemoryStore::with_entries([
        (TOKEN_KEY.to_owned(), token.to_owned()),
        (USER_KEY.to_owned(), serde_json::to_string(cached).unwrap()),
    ])
}

// =============================================================================
// initialize
// =============================================================================

#[tokio::test]
async fn initialize_without_token_or_params_is_signed_out() {
    let store = make_store(ScriptedBackend::default(), HOME);
    let session = store.initialize().await;

    assert!(!session.is_authenticated());
    assert!(!session.loading);
    assert_eq!(session.error, None);
    assert_eq!(session.status(), SessionStatus::Unauthenticated);
    assert!(store.backend().calls().is_empty());
}

#[tokio::test]
async fn initialize_with_url_token_authenticates_and_strips_url() {
    let backend = ScriptedBackend::default().with_token("good", user("u-1", "Alice"));
    let store = make_store(backend, "https://shop.example/profile?token=good");

    let session = store.initialize().await;

    assert!(session.is_authenticated());
    assert_eq!(session.token.as_deref(), Some("good"));
    assert_eq!(store.location().href().as_deref(), Some("https://shop.example/profile"));
    assert_eq!(store.storage().get(TOKEN_KEY).as_deref(), Some("good"));
    assert_eq!(store.backend().calls(), vec!["me:good"]);
}

#[tokio::test]
async fn initialize_with_rejected_url_token_sets_error() {
    let store = make_store(ScriptedBackend::default(), "https://shop.example/profile#token=forged");

    let session = store.initialize().await;

    assert!(!session.is_authenticated());
    assert!(!session.loading);
    assert_eq!(session.error.as_deref(), Some(AUTH_FAILED_MESSAGE));
    assert_eq!(store.location().href().as_deref(), Some("https://shop.example/profile"));
    assert!(store.storage().is_empty());
}

#[tokio::test]
async fn initialize_with_error_param_adopts_message() {
    let store = make_store(ScriptedBackend::default(), "https://shop.example/?error=Access%20denied");

    let session = store.initialize().await;

    assert_eq!(session.error.as_deref(), Some("Access denied"));
    assert!(!session.loading);
    assert_eq!(store.location().href().as_deref(), Some(HOME));
    assert!(store.backend().calls().is_empty());
}

#[tokio::test]
async fn initialize_with_session_id_fragment_exchanges_it() {
    let backend = ScriptedBackend::default().with_session("one-time", grant("sess-tok", "u-1"));
    let store = make_store(backend, "https://shop.example/profile#session_id=one-time");

    let session = store.initialize().await;

    assert!(session.is_authenticated());
    assert_eq!(session.token.as_deref(), Some("sess-tok"));
    assert_eq!(store.location().href().as_deref(), Some("https://shop.example/profile"));
}

#[tokio::test]
async fn initialize_with_bad_session_id_fragment_sets_error() {
    let store = make_store(ScriptedBackend::default(), "https://shop.example/#session_id=stale");

    let session = store.initialize().await;

    assert!(!session.is_authenticated());
    assert!(!session.loading);
    assert_eq!(session.error.as_deref(), Some("Invalid session"));
}

#[tokio::test]
async fn valid_persisted_token_restores_cached_user_with_one_call() {
    let cached = user("u-1", "Alice (cached)");
    let backend = ScriptedBackend::default().with_token("good", user("u-1", "Alice"));
    let store = make_store_with_storage(backend, persisted("good", &cached));

    let session = store.initialize().await;

    assert!(session.is_authenticated());
    assert_eq!(session.user, Some(cached));
    assert_eq!(store.backend().calls(), vec!["me:good"]);
}

#[tokio::test]
async fn persisted_token_for_other_user_uses_fresh_record() {
    let fresh = user("u-2", "Bob");
    let backend = ScriptedBackend::default().with_token("good", fresh.clone());
    let store = make_store_with_storage(backend, persisted("good", &user("u-1", "Alice")));

    let session = store.initialize().await;

    assert_eq!(session.user, Some(fresh.clone()));
    let stored: UserRecord = serde_json::from_str(&store.storage().get(USER_KEY).unwrap()).unwrap();
    assert_eq!(stored, fresh);
}

#[tokio::test]
async fn invalid_persisted_token_clears_storage_without_error() {
    let store = make_store_with_storage(ScriptedBackend::default(), persisted("expired", &user("u-1", "Alice")));

    let session = store.initialize().await;

    assert!(!session.is_authenticated());
    assert!(!session.loading);
    assert_eq!(session.error, None);
    assert!(store.storage().is_empty());
}

#[tokio::test]
async fn initialize_twice_makes_no_second_backend_call() {
    let backend = ScriptedBackend::default().with_token("good", user("u-1", "Alice"));
    let store = make_store_with_storage(backend, persisted("good", &user("u-1", "Alice")));

    let first = store.initialize().await;
    let second = store.initialize().await;

    assert_eq!(first, second);
    assert_eq!(store.backend().calls().len(), 1);
}

// =============================================================================
// login
// =============================================================================

#[tokio::test]
async fn login_with_valid_session_id_populates_and_persists() {
    let backend = ScriptedBackend::default().with_session("sid", grant("tok", "u-1"));
    let store = make_store(backend, HOME);
    store.initialize().await;

    let record = store.login("  sid ").await.unwrap();

    assert_eq!(record.id, "u-1");
    let session = store.snapshot();
    assert!(session.is_authenticated());
    assert_eq!(store.bearer().as_deref(), Some("Bearer tok"));
    assert_eq!(store.storage().get(TOKEN_KEY).as_deref(), Some("tok"));
}

#[tokio::test]
async fn login_with_invalid_session_id_leaves_state_unchanged() {
    let store = make_store(ScriptedBackend::default(), HOME);
    store.initialize().await;
    let before = store.snapshot();

    let result = store.login("bogus").await;

    assert!(matches!(result, Err(SessionError::Api(ApiError::Unauthorized { .. }))));
    assert_eq!(store.snapshot(), before);
    assert!(store.storage().is_empty());
}

#[tokio::test]
async fn login_with_blank_id_makes_no_call() {
    let store = make_store(ScriptedBackend::default(), HOME);

    assert_eq!(store.login("   ").await, Err(SessionError::EmptyIdentifier));
    assert!(store.backend().calls().is_empty());
}

#[tokio::test]
async fn google_token_login_adopts_grant() {
    let backend = ScriptedBackend::default().with_google("g-access", grant("jwt", "u-9"));
    let store = make_store(backend, HOME);
    store.initialize().await;

    let record = store.login_with_google_token("g-access").await.unwrap();

    assert_eq!(record.id, "u-9");
    assert_eq!(store.token().as_deref(), Some("jwt"));
    assert_eq!(store.snapshot().error, None);
}

#[tokio::test]
async fn google_token_failure_sets_backend_detail() {
    let store = make_store(ScriptedBackend::default(), HOME);
    store.initialize().await;

    let result = store.login_with_google_token("nope").await;

    assert!(result.is_err());
    let session = store.snapshot();
    assert!(!session.loading);
    assert_eq!(session.error.as_deref(), Some("Invalid Google token"));
}

#[tokio::test]
async fn google_redirect_marks_loading_and_navigates() {
    let store = make_store(ScriptedBackend::default(), HOME);
    store.initialize().await;
    store.update(|session| session.error = Some("stale".to_owned()));

    store.login_with_google_redirect();

    let session = store.snapshot();
    assert!(session.loading);
    assert_eq!(session.error, None);
    assert_eq!(store.location().assigned(), vec![GOOGLE_ENTRY]);
}

#[tokio::test]
async fn legacy_redirect_navigates_to_auth_url() {
    let backend = ScriptedBackend { login_url: Some("https://accounts.example/auth".to_owned()), ..Default::default() };
    let store = make_store(backend, HOME);

    let url = store.login_with_redirect().await.unwrap();

    assert_eq!(url, "https://accounts.example/auth");
    assert_eq!(store.location().assigned(), vec![url]);
}

#[tokio::test]
async fn legacy_redirect_failure_sets_error() {
    let store = make_store(ScriptedBackend::default(), HOME);

    assert!(store.login_with_redirect().await.is_err());
    let session = store.snapshot();
    assert!(!session.loading);
    assert_eq!(session.error.as_deref(), Some(AUTH_FAILED_MESSAGE));
    assert!(store.location().assigned().is_empty());
}

// =============================================================================
// logout
// =============================================================================

#[tokio::test]
async fn login_then_logout_returns_to_initial_state() {
    let backend = ScriptedBackend::default().with_session("sid", grant("tok", "u-1"));
    let store = make_store(backend, HOME);
    let initial = store.initialize().await;

    store.login("sid").await.unwrap();
    store.logout().await;

    assert_eq!(store.snapshot(), initial);
    assert!(store.storage().is_empty());
    assert!(store.backend().calls().contains(&"logout:tok".to_owned()));
}

#[tokio::test]
async fn logout_while_signed_out_makes_no_call() {
    let store = make_store(ScriptedBackend::default(), HOME);
    store.initialize().await;

    store.logout().await;

    assert!(store.backend().calls().is_empty());
    assert_eq!(store.snapshot().error, None);
}

#[tokio::test]
async fn logout_failure_still_clears_locally() {
    let backend = ScriptedBackend { logout_fails: true, ..Default::default() }.with_token("good", user("u-1", "Alice"));
    let store = make_store_with_storage(backend, persisted("good", &user("u-1", "Alice")));
    store.initialize().await;

    store.logout().await;

    assert!(!store.snapshot().is_authenticated());
    assert_eq!(store.snapshot().error, None);
    assert!(store.storage().is_empty());
}

#[tokio::test]
async fn logout_without_initialize_revokes_persisted_token() {
    let store = make_store_with_storage(ScriptedBackend::default(), persisted("saved", &user("u-1", "Alice")));

    store.logout().await;

    assert_eq!(store.backend().calls(), vec!["logout:saved".to_owned()]);
    assert_eq!(store.snapshot().status(), SessionStatus::Unauthenticated);
    assert!(store.storage().is_empty());
}

#[tokio::test]
async fn logout_during_inflight_login_wins() {
    let backend = ScriptedBackend::default().with_session("sid", grant("tok", "u-1"));
    let store = make_store(backend, HOME);
    store.initialize().await;

    let (login, ()) = tokio::join!(store.login("sid"), store.logout());

    assert_eq!(login, Err(SessionError::Superseded));
    let session = store.snapshot();
    assert!(!session.is_authenticated());
    assert!(!session.loading);
    assert!(store.storage().is_empty());
}

// =============================================================================
// observers
// =============================================================================

#[tokio::test]
async fn subscribers_see_every_transition() {
    let backend = ScriptedBackend::default().with_session("sid", grant("tok", "u-1"));
    let store = make_store(backend, HOME);
    let seen = Arc::new(AtomicUsize::new(0));
    let authenticated = Arc::new(Mutex::new(Vec::new()));
    {
        let seen = Arc::clone(&seen);
        let authenticated = Arc::clone(&authenticated);
        store.subscribe(move |session| {
            seen.fetch_add(1, Ordering::SeqCst);
            authenticated.lock().unwrap().push(session.is_authenticated());
        });
    }

    store.initialize().await;
    store.login("sid").await.unwrap();
    store.logout().await;

    assert!(seen.load(Ordering::SeqCst) >= 4);
    let history = authenticated.lock().unwrap().clone();
    assert_eq!(history.last(), Some(&false));
    assert!(history.contains(&true));
}

#[tokio::test]
async fn clear_error_only_resets_error() {
    let store = make_store(ScriptedBackend::default(), "https://shop.example/?error=denied");
    store.initialize().await;

    store.clear_error();

    let session = store.snapshot();
    assert_eq!(session.error, None);
    assert!(session.initialized);
    assert!(!session.loading);
}
