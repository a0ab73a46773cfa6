//! Local persistence for the theme preference.
//!
//! Values are stored JSON-encoded under a plain key: `localStorage` in the
//! browser, one small file per key in the platform config directory natively.

use serde::{de::DeserializeOwned, Serialize};

use super::config::Theme;
use super::error::{AppError, Result};

pub const THEME_KEY: &str = "theme";

pub fn load_theme() -> Option<Theme> {
    match load::<Theme>(THEME_KEY) {
        Ok(theme) => theme,
        Err(err) => {
            tracing::warn!("Ignoring stored theme: {err}");
            None
        }
    }
}

pub fn save_theme(theme: Theme) -> Result<()> {
    save(THEME_KEY, &theme)
}

fn load<T: DeserializeOwned>(key: &str) -> Result<Option<T>> {
    match read_raw(key)? {
        Some(raw) => Ok(Some(serde_json::from_str(&raw)?)),
        None => Ok(None),
    }
}

fn save<T: Serialize>(key: &str, value: &T) -> Result<()> {
    let raw = serde_json::to_string(value)?;
    write_raw(key, &raw)
}

#[cfg(target_arch = "wasm32")]
fn local_storage() -> Result<web_sys::Storage> {
    web_sys::window()
        .and_then(|window| window.local_storage().ok().flatten())
        .ok_or_else(|| AppError::Storage("localStorage unavailable".into()))
}

#[cfg(target_arch = "wasm32")]
fn read_raw(key: &str) -> Result<Option<String>> {
    local_storage()?
        .get_item(key)
        .map_err(|_| AppError::Storage(format!("unable to read `{key}`")))
}

#[cfg(target_arch = "wasm32")]
fn write_raw(key: &str, raw: &str) -> Result<()> {
    local_storage()?
        .set_item(key, raw)
        .map_err(|_| AppError::Storage(format!("unable to write `{key}`")))
}

#[cfg(not(target_arch = "wasm32"))]
fn key_path(key: &str) -> Result<std::path::PathBuf> {
    Ok(super::platform::project_dirs()?
        .config_dir()
        .join(format!("{key}.json")))
}

#[cfg(not(target_arch = "wasm32"))]
fn read_raw(key: &str) -> Result<Option<String>> {
    let path = key_path(key)?;
    match std::fs::read_to_string(&path) {
        Ok(raw) => Ok(Some(raw)),
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(None),
        Err(err) => Err(AppError::Storage(err.to_string())),
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn write_raw(key: &str, raw: &str) -> Result<()> {
    let path = key_path(key)?;
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|err| AppError::Storage(err.to_string()))?;
    }
    std::fs::write(&path, raw).map_err(|err| AppError::Storage(err.to_string()))
}
