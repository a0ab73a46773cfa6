#![cfg_attr(all(windows, not(debug_assertions)), windows_subsystem = "windows")]

use std::path::PathBuf;

#[cfg(feature = "desktop")]
use dioxus::desktop::{tao::window::WindowBuilder, Config};
use dioxus::prelude::*;

use ui::components::AppShell;
use ui::core::config::AppConfig;
use ui::views::Dashboard;

#[derive(Debug, Clone, Routable, PartialEq)]
#[rustfmt::skip]
enum Route {
    #[layout(DesktopShell)]
    #[route("/")]
    Dashboard {},
}

const MAIN_CSS_INLINE: &str = include_str!(concat!(
    env!("CARGO_MANIFEST_DIR"),
    "/../ui/assets/theme/main.css"
)); // Shared theme from ui/assets/theme/main.css, always inlined.

#[cfg(feature = "desktop")]
fn main() {
    let config = desktop_config();
    dioxus_logger::init(config.log_level()).expect("failed to init logger");
    tracing::info!("Starting {} v{}", config.app.title, config.app.version);

    LaunchBuilder::desktop()
        .with_cfg(
            Config::new()
                .with_window(
                    WindowBuilder::new()
                        .with_title(format!("{} – v{}", config.app.title, config.app.version))
                        .with_maximized(true),
                )
                .with_resource_directory(resolve_resource_dir()),
        )
        .launch(App);
}

#[cfg(all(feature = "server", not(feature = "desktop")))]
fn main() {
    LaunchBuilder::server().launch(App);
}

/// Environment config with the dataset resolved against the bundled assets.
fn desktop_config() -> AppConfig {
    let mut config = AppConfig::from_environment();
    let bundled = resolve_resource_dir().join("data.json");
    if bundled.is_file() && config.data.json_file == AppConfig::default().data.json_file {
        config.data.json_file = bundled.to_string_lossy().into_owned();
    }
    config
}

#[component]
fn App() -> Element {
    ui::i18n::init();

    // AppNavbar writes the selected language here; the keyed wrapper remounts on change.
    let lang_code = use_signal(ui::i18n::current_language);
    use_context_provider(|| lang_code);

    let config = use_hook(desktop_config);
    ui::use_app_providers(config);

    rsx! {
        document::Style { "{MAIN_CSS_INLINE}" }

        div {
            key: "{lang_code()}",
            Router::<Route> { }
        }
    }
}

fn resolve_resource_dir() -> PathBuf {
    #[cfg(debug_assertions)]
    {
        // During `cargo run` / `dx serve` load directly from the crate.
        PathBuf::from(concat!(env!("CARGO_MANIFEST_DIR"), "/assets"))
    }

    #[cfg(not(debug_assertions))]
    {
        std::env::current_exe()
            .ok()
            .and_then(|exe| exe.parent().map(|dir| dir.join("assets")))
            .unwrap_or_else(|| PathBuf::from("assets"))
    }
}

/// Desktop layout: the shared shell around the routed page.
#[component]
fn DesktopShell() -> Element {
    rsx! {
        AppShell {
            Outlet::<Route> {}
        }
    }
}
