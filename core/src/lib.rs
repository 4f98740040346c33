//! Session store and catalog wire model shared by the storefront surfaces.
//!
//! This crate owns everything that is not tied to a particular runtime: the
//! authentication state machine, token persistence, OAuth handshake parsing,
//! and the REST schema. The browser client, the host, and the CLI each plug
//! in their own HTTP transport, key/value storage, and URL access through the
//! traits in [`backend`] and [`persist`].

pub mod backend;
pub mod endpoints;
pub mod error;
pub mod handshake;
pub mod persist;
pub mod response;
pub mod session;
pub mod store;
pub mod types;

pub use backend::{AuthBackend, CatalogApi, Location, MemoryLocation};
pub use error::{AUTH_FAILED_MESSAGE, ApiError, SessionError, StorageError};
pub use handshake::Handshake;
pub use persist::{KeyValueStore, MemoryStore, PersistedSession, Persistence};
pub use session::{Session, SessionStatus};
pub use store::SessionStore;
pub use types::{
    Analytics, CategoryList, PageViews, Product, ProductDraft, ProductQuery, ProductStatus, Role, SessionGrant,
    UserRecord,
};
