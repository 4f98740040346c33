//! Page modules for route-level screens.
//!
//! ARCHITECTURE
//! ============
//! Each page owns route-scoped fetching and delegates rendering details
//! to `components`. Admin pages share the redirect guard in `util::auth`.

pub mod about;
pub mod admin;
pub mod admin_products;
pub mod analytics;
pub mod categories;
pub mod home;
pub mod product_detail;
pub mod products;
pub mod profile;
