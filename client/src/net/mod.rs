//! Networking modules.
//!
//! SYSTEM CONTEXT
//! ==============
//! `api` implements the session store's `AuthBackend` and the stateless
//! `CatalogApi` over HTTP. Wire types live in `storefront-core`.

pub mod api;
