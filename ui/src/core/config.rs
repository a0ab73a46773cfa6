//! Application settings tree with dotted-path access.
//!
//! The tree is seeded from [`AppConfig::default`], optionally adjusted by
//! URL query parameters at startup, and then handed to the UI through
//! context. Paths use the camelCase key names, e.g.
//! `config.get("export.formats.json.formatted")`.

use std::{fmt, str::FromStr};

use serde::{de::DeserializeOwned, Deserialize, Serialize};
use serde_json::Value;

use super::error::{AppError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    Light,
    Dark,
    #[default]
    Auto,
}

impl Theme {
    /// Resolves `Auto` against the host colour scheme.
    pub fn resolve(self, prefers_dark: bool) -> Theme {
        match self {
            Theme::Auto if prefers_dark => Theme::Dark,
            Theme::Auto => Theme::Light,
            concrete => concrete,
        }
    }

    /// Light and dark swap; `Auto` resolves first.
    pub fn toggled(self, prefers_dark: bool) -> Theme {
        match self.resolve(prefers_dark) {
            Theme::Dark => Theme::Light,
            _ => Theme::Dark,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Theme::Light => "light",
            Theme::Dark => "dark",
            Theme::Auto => "auto",
        }
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Theme {
    type Err = AppError;

    fn from_str(raw: &str) -> Result<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "light" => Ok(Theme::Light),
            "dark" => Ok(Theme::Dark),
            "auto" => Ok(Theme::Auto),
            other => Err(AppError::Config(format!("unknown theme `{other}`"))),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct AppInfo {
    pub title: String,
    pub version: String,
    pub author: String,
    pub description: String,
    pub language: String,
    pub locale: String,
}

impl Default for AppInfo {
    fn default() -> Self {
        Self {
            title: "Ambiti Territoriali - Dashboard".into(),
            version: env!("CARGO_PKG_VERSION").into(),
            author: "Dashboard Team".into(),
            description: "Dashboard per l'analisi degli ambiti territoriali italiani".into(),
            language: "it".into(),
            locale: "it-IT".into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct DefaultSort {
    pub key: Option<String>,
    pub direction: String,
}

impl Default for DefaultSort {
    fn default() -> Self {
        Self {
            key: Some("regione".into()),
            direction: "asc".into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct DataSettings {
    pub json_file: String,
    pub auto_refresh: bool,
    pub enable_cache: bool,
    pub max_records: usize,
    pub default_sort: DefaultSort,
}

impl Default for DataSettings {
    fn default() -> Self {
        Self {
            json_file: "./data.json".into(),
            auto_refresh: false,
            enable_cache: false,
            max_records: 10_000,
            default_sort: DefaultSort::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Breakpoints {
    pub mobile: u32,
    pub tablet: u32,
    pub desktop: u32,
}

impl Default for Breakpoints {
    fn default() -> Self {
        Self {
            mobile: 768,
            tablet: 1024,
            desktop: 1280,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct UiSettings {
    pub theme: Theme,
    pub compact_mode: bool,
    pub enable_animations: bool,
    pub show_tooltips: bool,
    pub responsive_breakpoints: Breakpoints,
}

impl Default for UiSettings {
    fn default() -> Self {
        Self {
            theme: Theme::Auto,
            compact_mode: false,
            enable_animations: true,
            show_tooltips: true,
            responsive_breakpoints: Breakpoints::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Features {
    pub analytics: bool,
    pub charts: bool,
    pub export: bool,
    pub notifications: bool,
    pub themes: bool,
    pub validation: bool,
    pub search: bool,
    pub filters: bool,
    pub expandable_rows: bool,
    pub sorting: bool,
}

impl Default for Features {
    fn default() -> Self {
        Self {
            analytics: true,
            charts: true,
            export: true,
            notifications: true,
            themes: true,
            validation: true,
            search: true,
            filters: true,
            expandable_rows: true,
            sorting: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct FormatSettings {
    pub enabled: bool,
    pub filename: String,
    pub include_timestamp: bool,
    pub formatted: bool,
}

impl FormatSettings {
    fn named(filename: &str) -> Self {
        Self {
            enabled: true,
            filename: filename.into(),
            include_timestamp: true,
            formatted: true,
        }
    }
}

impl Default for FormatSettings {
    fn default() -> Self {
        Self::named("ambiti_territoriali")
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ExportFormats {
    pub csv_aggregato: FormatSettings,
    pub csv_dettagliato: FormatSettings,
    pub excel: FormatSettings,
    pub json: FormatSettings,
    pub html: FormatSettings,
}

impl Default for ExportFormats {
    fn default() -> Self {
        Self {
            csv_aggregato: FormatSettings::named("ambiti_territoriali_aggregato"),
            csv_dettagliato: FormatSettings::named("ambiti_territoriali_dettagliato"),
            excel: FormatSettings::named("ambiti_territoriali"),
            json: FormatSettings::named("ambiti_territoriali"),
            html: FormatSettings::named("ambiti_territoriali_report"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ExportSettings {
    pub formats: ExportFormats,
    pub include_metadata: bool,
}

impl Default for ExportSettings {
    fn default() -> Self {
        Self {
            formats: ExportFormats::default(),
            include_metadata: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ValidationSettings {
    pub enabled: bool,
    pub strict: bool,
    pub auto_fix: bool,
    pub show_warnings: bool,
    pub required_fields: Vec<String>,
}

impl Default for ValidationSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            strict: false,
            auto_fix: true,
            show_warnings: true,
            required_fields: ["regione", "provincia", "numeroComuni", "entiUnici"]
                .into_iter()
                .map(String::from)
                .collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct DevelopmentSettings {
    pub enable_debug_mode: bool,
    pub enable_console_logging: bool,
    pub show_performance_metrics: bool,
    pub enable_test_suite: bool,
}

impl Default for DevelopmentSettings {
    fn default() -> Self {
        Self {
            enable_debug_mode: false,
            enable_console_logging: true,
            show_performance_metrics: false,
            enable_test_suite: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default, rename_all = "camelCase")]
pub struct AppConfig {
    pub app: AppInfo,
    pub data: DataSettings,
    pub ui: UiSettings,
    pub features: Features,
    pub export: ExportSettings,
    pub validation: ValidationSettings,
    pub development: DevelopmentSettings,
}

impl AppConfig {
    /// Defaults plus the overrides found in the current URL query.
    pub fn from_environment() -> Self {
        let mut config = Self::default();
        config.apply_query(&super::platform::query_string());
        config
    }

    /// Value at a dotted path such as `ui.theme`, if the path exists.
    pub fn get(&self, path: &str) -> Option<Value> {
        let tree = serde_json::to_value(self).ok()?;
        path.split('.')
            .try_fold(&tree, |node, key| node.get(key))
            .cloned()
    }

    /// Typed lookup with a fallback for missing paths or mismatched types.
    pub fn get_or<T: DeserializeOwned>(&self, path: &str, default: T) -> T {
        self.get(path)
            .and_then(|value| serde_json::from_value(value).ok())
            .unwrap_or(default)
    }

    /// Writes `value` at a dotted path. The whole tree is re-validated;
    /// on a type mismatch or unknown key the config is left untouched.
    pub fn set(&mut self, path: &str, value: Value) -> Result<()> {
        let mut tree = serde_json::to_value(&*self)?;
        let mut keys: Vec<&str> = path.split('.').collect();
        let last = keys
            .pop()
            .filter(|key| !key.is_empty())
            .ok_or_else(|| AppError::Config("empty setting path".into()))?;

        let mut node = &mut tree;
        for key in keys {
            let object = node
                .as_object_mut()
                .ok_or_else(|| AppError::Config(format!("`{key}` is not a section")))?;
            node = object
                .entry(key.to_string())
                .or_insert_with(|| Value::Object(Default::default()));
        }
        node.as_object_mut()
            .ok_or_else(|| AppError::Config(format!("`{path}` has no parent section")))?
            .insert(last.to_string(), value.clone());

        let updated: AppConfig = serde_json::from_value(tree)
            .map_err(|err| AppError::Config(format!("invalid value for `{path}`: {err}")))?;
        if updated.get(path).as_ref() != Some(&value) {
            return Err(AppError::Config(format!("unknown setting `{path}`")));
        }
        *self = updated;
        Ok(())
    }

    pub fn is_enabled(&self, feature: &str) -> bool {
        self.get_or(&format!("features.{feature}"), false)
    }

    /// Applies `debug=true`, `theme=<name>` and `compact=true`.
    pub fn apply_query(&mut self, query: &str) {
        for pair in query.trim_start_matches('?').split('&') {
            let (key, value) = pair.split_once('=').unwrap_or((pair, ""));
            match (key, value) {
                ("debug", "true") => {
                    self.development.enable_debug_mode = true;
                    self.development.enable_console_logging = true;
                    self.development.show_performance_metrics = true;
                }
                ("theme", name) if !name.is_empty() => match name.parse::<Theme>() {
                    Ok(theme) => self.ui.theme = theme,
                    Err(err) => tracing::warn!("Ignoring theme override: {err}"),
                },
                ("compact", "true") => self.ui.compact_mode = true,
                _ => {}
            }
        }
    }

    /// Whether the theme came from the URL rather than the defaults.
    pub fn theme_overridden(query: &str) -> bool {
        query
            .trim_start_matches('?')
            .split('&')
            .any(|pair| pair.starts_with("theme=") && pair.len() > "theme=".len())
    }

    pub fn log_level(&self) -> tracing::Level {
        if self.development.enable_debug_mode {
            tracing::Level::DEBUG
        } else {
            tracing::Level::INFO
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn dotted_get_reads_nested_values() {
        let config = AppConfig::default();
        assert_eq!(config.get("ui.theme"), Some(json!("auto")));
        assert_eq!(config.get("data.jsonFile"), Some(json!("./data.json")));
        assert_eq!(config.get("ui.nope"), None);
        assert!(config.get_or("export.formats.json.formatted", false));
        assert_eq!(config.get_or("missing.path", 42u32), 42);
    }

    #[test]
    fn set_writes_through_and_validates() {
        let mut config = AppConfig::default();
        config.set("ui.compactMode", json!(true)).unwrap();
        assert!(config.ui.compact_mode);

        let err = config.set("ui.compactMode", json!("yes")).unwrap_err();
        assert!(matches!(err, AppError::Config(_)));
        assert!(config.ui.compact_mode);

        assert!(config.set("ui.unknownKnob", json!(1)).is_err());
        assert!(config.set("", json!(1)).is_err());
    }

    #[test]
    fn feature_flags() {
        let mut config = AppConfig::default();
        assert!(config.is_enabled("charts"));
        config.features.charts = false;
        assert!(!config.is_enabled("charts"));
        assert!(!config.is_enabled("teleport"));
    }

    #[test]
    fn query_overrides() {
        let mut config = AppConfig::default();
        config.apply_query("?debug=true&theme=dark&compact=true&other=1");
        assert!(config.development.enable_debug_mode);
        assert!(config.development.show_performance_metrics);
        assert_eq!(config.ui.theme, Theme::Dark);
        assert!(config.ui.compact_mode);
        assert_eq!(config.log_level(), tracing::Level::DEBUG);
    }

    #[test]
    fn bad_theme_override_is_ignored() {
        let mut config = AppConfig::default();
        config.apply_query("theme=neon&debug=false");
        assert_eq!(config.ui.theme, Theme::Auto);
        assert!(!config.development.enable_debug_mode);
        assert!(AppConfig::theme_overridden("?theme=dark"));
        assert!(!AppConfig::theme_overridden("theme="));
    }

    #[test]
    fn theme_toggle_and_resolve() {
        assert_eq!(Theme::Auto.resolve(true), Theme::Dark);
        assert_eq!(Theme::Auto.toggled(false), Theme::Dark);
        assert_eq!(Theme::Dark.toggled(false), Theme::Light);
        assert_eq!("LIGHT".parse::<Theme>().unwrap(), Theme::Light);
    }
}
