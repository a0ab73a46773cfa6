use dioxus::prelude::*;

use ui::components::AppShell;
use ui::core::config::AppConfig;
use ui::views::Dashboard;

#[derive(Debug, Clone, Routable, PartialEq)]
#[rustfmt::skip]
enum Route {
    #[layout(WebShell)]
    #[route("/")]
    Dashboard {},
}

const MAIN_CSS_INLINE: &str = include_str!(concat!(
    env!("CARGO_MANIFEST_DIR"),
    "/../ui/assets/theme/main.css"
));

fn main() {
    let config = AppConfig::from_environment();
    dioxus_logger::init(config.log_level()).expect("failed to init logger");
    tracing::info!("Starting {} v{}", config.app.title, config.app.version);
    dioxus::launch(App);
}

#[component]
fn App() -> Element {
    ui::i18n::init();

    // The navbar writes the selected language here; the keyed wrapper remounts on change.
    let lang_code = use_signal(ui::i18n::current_language);
    use_context_provider(|| lang_code);

    let config = use_hook(AppConfig::from_environment);
    ui::use_app_providers(config);

    rsx! {
        document::Style { "{MAIN_CSS_INLINE}" }

        div {
            key: "{lang_code()}",
            Router::<Route> {}
        }
    }
}

/// Web layout: the shared shell around the routed page.
#[component]
fn WebShell() -> Element {
    rsx! {
        AppShell {
            Outlet::<Route> {}
        }
    }
}
