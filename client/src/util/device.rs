//! Browser glue for device variant detection and the persisted override.

use leptos::prelude::*;
use storefront_core::KeyValueStore;

use crate::state::device::{DeviceState, Variant, classify_width};
use crate::util::storage::BrowserStorage;

pub const VARIANT_STORAGE_KEY: &str = "storefront_variant";

/// Current `window.innerWidth`, if running in a browser.
pub fn viewport_width() -> Option<f64> {
    #[cfg(feature = "hydrate")]
    {
        web_sys::window()?.inner_width().ok()?.as_f64()
    }
    #[cfg(not(feature = "hydrate"))]
    {
        None
    }
}

pub fn load_forced() -> Option<Variant> {
    BrowserStorage.get(VARIANT_STORAGE_KEY).as_deref().and_then(Variant::parse)
}

/// Persist the override; `None` returns to automatic detection.
pub fn save_forced(forced: Option<Variant>) {
    match forced {
        Some(variant) => {
            let _ = BrowserStorage.set(VARIANT_STORAGE_KEY, variant.as_str());
        }
        None => BrowserStorage.remove(VARIANT_STORAGE_KEY),
    }
}

/// Initial device state. Desktop on the server.
pub fn detect() -> DeviceState {
    DeviceState { detected: viewport_width().map_or(Variant::Desktop, classify_width), forced: load_forced() }
}

/// Re-classify the viewport on every window resize.
pub fn install_resize_listener(device: RwSignal<DeviceState>) {
    #[cfg(feature = "hydrate")]
    {
        let _ = window_event_listener(leptos::ev::resize, move |_| {
            if let Some(width) = viewport_width() {
                let detected = classify_width(width);
                if device.get_untracked().detected != detected {
                    device.update(|d| d.detected = detected);
                }
            }
        });
    }
    #[cfg(not(feature = "hydrate"))]
    {
        let _ = device;
    }
}
