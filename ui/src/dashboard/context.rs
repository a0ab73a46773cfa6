//! Application context shared by every dashboard component.

use dioxus::prelude::*;

use super::DashboardState;
use crate::core::config::{AppConfig, Theme};
use crate::core::format::NumberLocale;
use crate::core::{platform, storage};

#[derive(Clone, Copy)]
pub struct AppContext {
    pub config: Signal<AppConfig>,
    pub state: Signal<DashboardState>,
    pub theme: Signal<Theme>,
}

impl AppContext {
    pub fn locale(&self) -> NumberLocale {
        NumberLocale::from_tag(&self.config.read().app.locale)
    }

    /// Flips between light and dark and persists the choice.
    pub fn toggle_theme(&mut self) -> Theme {
        let next = self.theme.peek().toggled(platform::prefers_dark());
        self.theme.set(next);
        if let Err(err) = storage::save_theme(next) {
            tracing::warn!("Theme not persisted: {err}");
        }
        next
    }
}

/// URL override first, then the stored preference, then the configured default.
pub fn initial_theme(config: &AppConfig, query: &str, stored: Option<Theme>) -> Theme {
    if AppConfig::theme_overridden(query) {
        return config.ui.theme;
    }
    stored.unwrap_or(config.ui.theme)
}

/// Builds the context once at the root from an already-resolved config.
pub fn use_app_context_provider(config: AppConfig) -> AppContext {
    use_context_provider(move || {
        let theme = initial_theme(&config, &platform::query_string(), storage::load_theme());
        tracing::debug!("Starting with theme {theme}");
        AppContext {
            state: Signal::new(DashboardState::new(&config)),
            theme: Signal::new(theme),
            config: Signal::new(config),
        }
    })
}

pub fn use_app_context() -> AppContext {
    use_context::<AppContext>()
}
