use dioxus::prelude::*;

use crate::components::toast::{use_toast, ToastFrame};
use crate::core::config::Theme;
use crate::core::platform;
use crate::dashboard::context::use_app_context;
use crate::i18n;
use crate::t;

const NAVBAR_CSS: Asset = asset!("/assets/styling/navbar.css");
const NAVBAR_CSS_INLINE: &str = include_str!(concat!(
    env!("CARGO_MANIFEST_DIR"),
    "/assets/styling/navbar.css"
));

/// Header: application title, theme toggle and language switcher.
///
/// Launchers provide a `Signal<String>` holding the active language tag;
/// the switcher writes the new tag there so the keyed page remounts.
#[component]
pub fn AppNavbar() -> Element {
    i18n::init();

    let mut ctx = use_app_context();
    let mut toasts = use_toast();
    let lang_signal = try_use_context::<Signal<String>>();
    let active_lang = lang_signal.map(|tag| tag()).unwrap_or_else(i18n::current_language);
    let languages: Vec<(String, String)> = use_hook(i18n::available_languages)
        .into_iter()
        .map(|tag| {
            let name = i18n::language_name(&tag).map_or_else(|| tag.clone(), str::to_owned);
            (tag, name)
        })
        .collect();

    let (title, version, themes_enabled) = {
        let config = ctx.config.read();
        (
            config.app.title.clone(),
            config.app.version.clone(),
            config.features.themes,
        )
    };

    let dark = (ctx.theme)().resolve(platform::prefers_dark()) == Theme::Dark;
    let (theme_icon, theme_label) = if dark {
        ("☀", t!("theme-to-light"))
    } else {
        ("☾", t!("theme-to-dark"))
    };

    let switch_language = move |evt: FormEvent| {
        let tag = evt.value();
        if let Err(err) = i18n::set_language(&tag) {
            tracing::warn!("Language {tag} unavailable: {err}");
            return;
        }
        tracing::debug!("Language switched to {tag}");
        if let Some(mut signal) = lang_signal {
            signal.set(tag);
        }
    };

    rsx! {
        document::Link { rel: "stylesheet", href: NAVBAR_CSS }
        if cfg!(all(not(debug_assertions), not(target_arch = "wasm32"))) {
            document::Style { "{NAVBAR_CSS_INLINE}" }
        }

        header { id: "navbar", class: "navbar",
            div { class: "navbar__inner",
                div { class: "navbar__brand",
                    span { class: "navbar__brand-link",
                        span { class: "navbar__brand-spark", "aria-hidden": "true" }
                        span { class: "navbar__brand-mark", "{title}" }
                    }
                    span { class: "navbar__brand-subtitle", {t!("tagline", version = version)} }
                }

                div { class: "navbar__controls",
                    if themes_enabled {
                        button {
                            r#type: "button",
                            class: "navbar__theme",
                            title: "{theme_label}",
                            "aria-label": "{theme_label}",
                            onclick: move |_| {
                                let next = ctx.toggle_theme();
                                tracing::debug!("Theme set to {next}");
                                toasts.info(t!("theme-changed"));
                            },
                            "{theme_icon}"
                        }
                    }

                    if languages.len() > 1 {
                        div { class: "navbar__locale",
                            label { class: "visually-hidden", r#for: "locale-select", {t!("nav-language-label")} }
                            select {
                                id: "locale-select",
                                value: "{active_lang}",
                                onchange: switch_language,
                                for (tag, name) in languages.into_iter() {
                                    option {
                                        key: "{tag}",
                                        value: "{tag}",
                                        selected: tag == active_lang,
                                        "{name}"
                                    }
                                }
                            }
                        }
                    }
                }
            }
        }
    }
}

/// Root layout: themed wrapper, navbar, page content and toasts.
#[component]
pub fn AppShell(children: Element) -> Element {
    let ctx = use_app_context();
    let theme = (ctx.theme)().resolve(platform::prefers_dark());
    let class = if ctx.config.read().ui.compact_mode {
        "app-shell app-shell--compact"
    } else {
        "app-shell"
    };

    rsx! {
        div { class: class, "data-theme": theme.as_str(),
            AppNavbar {}
            main { class: "app-shell__content", {children} }
            ToastFrame {}
        }
    }
}
