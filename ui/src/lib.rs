//! Shared UI crate for the ambiti territoriali dashboard. Records, the
//! filter/sort engine, export and every view live here; the platform
//! crates only launch it.

pub mod core;
pub mod dashboard;
pub mod i18n;
pub mod records;
pub mod views;

pub mod components {
    pub mod app_navbar;
    pub mod toast;
    pub use app_navbar::{AppNavbar, AppShell};
}

use crate::core::config::AppConfig;
use crate::dashboard::context::{use_app_context_provider, AppContext};

/// Installs the toast manager and the dashboard context for a launcher root.
pub fn use_app_providers(config: AppConfig) -> AppContext {
    components::toast::use_toast_provider(config.features.notifications);
    use_app_context_provider(config)
}
