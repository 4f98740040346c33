//! Reusable UI component modules.
//!
//! SYSTEM CONTEXT
//! ==============
//! Components render navigation chrome and catalog tiles while reading shared
//! session and device state from Leptos context providers.

pub mod device_switcher;
pub mod login_modal;
pub mod navbar;
pub mod product_card;
