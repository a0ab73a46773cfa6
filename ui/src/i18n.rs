//! Localized strings for the dashboard chrome.
//!
//! Bundles live under `ui/i18n/<tag>/ambiti_ui.ftl` and are compiled in with
//! `rust-embed`. `en-US` is the reference bundle every other locale must
//! match (see `tests/i18n_missing_keys.rs`); `it-IT` mirrors the language
//! of the data itself.
//!
//! Call sites go through [`t!`](crate::t), which checks keys and arguments
//! against the reference bundle at compile time.

use std::collections::BTreeSet;
use std::sync::Once;

use i18n_embed::fluent::FluentLanguageLoader;
use i18n_embed::{I18nEmbedError, LanguageLoader};
use once_cell::sync::Lazy;
use rust_embed::Embed;
use unic_langid::LanguageIdentifier;

pub use i18n_embed_fl::fl;

/// Looks up a message in the shared loader.
///
/// ```ignore
/// t!("table-title")
/// t!("load-success", count = 12)
/// ```
#[macro_export]
macro_rules! t {
    ($key:literal) => {
        $crate::i18n::fl!(&*$crate::i18n::LOADER, $key)
    };
    ($key:literal, $( $arg:ident = $value:expr ),+ $(,)?) => {
        $crate::i18n::fl!(&*$crate::i18n::LOADER, $key, $( $arg = $value ),+ )
    };
}

const DOMAIN: &str = "ambiti_ui";
const REFERENCE: &str = "en-US";

#[derive(Embed)]
#[folder = "i18n"]
struct Bundles;

pub static LOADER: Lazy<FluentLanguageLoader> = Lazy::new(|| {
    let reference: LanguageIdentifier = REFERENCE.parse().unwrap_or_default();
    FluentLanguageLoader::new(DOMAIN, reference)
});

static SELECTED: Once = Once::new();

/// Selects the best bundle for the host languages. Safe to call from every root.
pub fn init() {
    SELECTED.call_once(|| {
        let requested = host_languages();
        match i18n_embed::select(&*LOADER, &Bundles, &requested) {
            Ok(selected) => tracing::debug!("UI languages: {selected:?}"),
            Err(err) => tracing::warn!("Keeping {REFERENCE} strings: {err}"),
        }
    });
}

/// Switches the bundle at runtime. A tag that does not parse is ignored.
pub fn set_language(tag: &str) -> Result<(), I18nEmbedError> {
    let Ok(language) = tag.parse::<LanguageIdentifier>() else {
        return Ok(());
    };
    i18n_embed::select(&*LOADER, &Bundles, &[language])?;
    Ok(())
}

pub fn current_language() -> String {
    LOADER.current_language().to_string()
}

/// Tags of the embedded bundles, sorted.
pub fn available_languages() -> Vec<String> {
    Bundles::iter()
        .filter_map(|path| path.split('/').next().map(str::to_owned))
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// Name of a language in that language, for the switcher.
pub fn language_name(tag: &str) -> Option<&'static str> {
    match tag.split('-').next()? {
        "it" => Some("Italiano"),
        "en" => Some("English"),
        _ => None,
    }
}

fn host_languages() -> Vec<LanguageIdentifier> {
    #[cfg(target_arch = "wasm32")]
    {
        i18n_embed::WebLanguageRequester::requested_languages()
    }

    #[cfg(not(target_arch = "wasm32"))]
    {
        i18n_embed::DesktopLanguageRequester::requested_languages()
    }
}
