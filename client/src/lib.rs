//! # client
//!
//! Leptos + WASM storefront UI: catalog browsing, product detail, the admin
//! console, and Google sign-in. Authentication state lives in the
//! `storefront-core` session store; this crate supplies its browser
//! transport, `localStorage` persistence, and `window.location` access.

pub mod app;
pub mod components;
pub mod net;
pub mod pages;
pub mod state;
pub mod util;

/// WASM entry point: hydrate the server-rendered shell.
#[cfg(feature = "hydrate")]
#[wasm_bindgen::prelude::wasm_bindgen]
pub fn hydrate() {
    console_error_panic_hook::set_once();
    let _ = console_log::init_with_level(log::Level::Debug);
    leptos::mount::hydrate_body(app::App);
}
