//! `window.location` adapter for the session store.

use storefront_core::Location;

/// The browser address bar as a [`Location`]. Inert during SSR.
#[derive(Clone, Copy, Debug, Default)]
pub struct BrowserLocation;

impl Location for BrowserLocation {
    fn href(&self) -> Option<String> {
        #[cfg(feature = "hydrate")]
        {
            web_sys::window()?.location().href().ok()
        }
        #[cfg(not(feature = "hydrate"))]
        {
            None
        }
    }

    fn replace(&self, href: &str) {
        #[cfg(feature = "hydrate")]
        {
            let Some(history) = web_sys::window().and_then(|w| w.history().ok()) else {
                return;
            };
            if let Err(e) = history.replace_state_with_url(&wasm_bindgen::JsValue::NULL, "", Some(href)) {
                log::warn!("history.replaceState failed: {e:?}");
            }
        }
        #[cfg(not(feature = "hydrate"))]
        {
            let _ = href;
        }
    }

    fn assign(&self, href: &str) {
        #[cfg(feature = "hydrate")]
        {
            if let Some(window) = web_sys::window() {
                let _ = window.location().assign(href);
            }
        }
        #[cfg(not(feature = "hydrate"))]
        {
            let _ = href;
        }
    }
}
