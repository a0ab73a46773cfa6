//! Host integration: timers, URL query, colour scheme, data fetch and downloads.
//!
//! Every function has a browser branch and a native branch so the rest of
//! the crate never needs its own `cfg(target_arch)` switches.

use super::error::{AppError, Result};

pub async fn sleep_ms(ms: u32) {
    #[cfg(target_arch = "wasm32")]
    {
        gloo_timers::future::TimeoutFuture::new(ms).await;
    }

    #[cfg(not(target_arch = "wasm32"))]
    {
        tokio::time::sleep(std::time::Duration::from_millis(u64::from(ms))).await;
    }
}

/// Query string without the leading `?`. Native builds read `AMBITI_QUERY`.
pub fn query_string() -> String {
    #[cfg(target_arch = "wasm32")]
    {
        web_sys::window()
            .and_then(|window| window.location().search().ok())
            .map(|search| search.trim_start_matches('?').to_string())
            .unwrap_or_default()
    }

    #[cfg(not(target_arch = "wasm32"))]
    {
        std::env::var("AMBITI_QUERY").unwrap_or_default()
    }
}

pub fn prefers_dark() -> bool {
    #[cfg(target_arch = "wasm32")]
    {
        web_sys::window()
            .and_then(|window| window.match_media("(prefers-color-scheme: dark)").ok())
            .flatten()
            .map(|query| query.matches())
            .unwrap_or(false)
    }

    #[cfg(not(target_arch = "wasm32"))]
    {
        false
    }
}

/// Fetches the data source as text. Browser builds issue a GET; native builds read the path.
pub async fn fetch_text(path: &str) -> Result<String> {
    #[cfg(target_arch = "wasm32")]
    {
        use wasm_bindgen::JsCast;
        use wasm_bindgen_futures::JsFuture;

        let window = web_sys::window().ok_or_else(|| platform_error("window unavailable"))?;
        let response: web_sys::Response = JsFuture::from(window.fetch_with_str(path))
            .await
            .map_err(|_| platform_error("network request failed"))?
            .dyn_into()
            .map_err(|_| platform_error("unexpected fetch response"))?;

        if !response.ok() {
            return Err(AppError::Fetch {
                status: response.status(),
                reason: response.status_text(),
            });
        }

        let body = response
            .text()
            .map_err(|_| platform_error("response body unavailable"))?;
        JsFuture::from(body)
            .await
            .map_err(|_| platform_error("response body unreadable"))?
            .as_string()
            .ok_or_else(|| platform_error("response body is not text"))
    }

    #[cfg(not(target_arch = "wasm32"))]
    {
        std::fs::read_to_string(path).map_err(|err| AppError::Fetch {
            status: if err.kind() == std::io::ErrorKind::NotFound {
                404
            } else {
                500
            },
            reason: err.to_string(),
        })
    }
}

/// Offers `bytes` as a download. Native builds write into the exports
/// directory and return the written path.
pub async fn download_bytes(filename: &str, mime: &str, bytes: Vec<u8>) -> Result<Option<String>> {
    #[cfg(target_arch = "wasm32")]
    {
        use wasm_bindgen::JsCast;
        use web_sys::{Blob, BlobPropertyBag, HtmlAnchorElement, Url};

        let array = js_sys::Uint8Array::from(bytes.as_slice());
        let parts = js_sys::Array::new();
        parts.push(&array.buffer());

        let opts = BlobPropertyBag::new();
        opts.set_type(mime);
        let blob = Blob::new_with_u8_array_sequence_and_options(&parts, &opts)
            .map_err(|_| AppError::Export("failed to create blob".into()))?;
        let url = Url::create_object_url_with_blob(&blob)
            .map_err(|_| AppError::Export("unable to create download".into()))?;

        let document = web_sys::window()
            .and_then(|w| w.document())
            .ok_or_else(|| platform_error("document unavailable"))?;
        let anchor: HtmlAnchorElement = document
            .create_element("a")
            .map_err(|_| platform_error("unable to create anchor"))?
            .dyn_into()
            .map_err(|_| platform_error("anchor cast failed"))?;
        anchor.set_href(&url);
        anchor.set_download(filename);
        anchor.style().set_property("display", "none").ok();

        document
            .body()
            .ok_or_else(|| platform_error("missing body"))?
            .append_child(&anchor)
            .ok();
        anchor.click();
        anchor.remove();
        Url::revoke_object_url(&url).ok();

        Ok(None)
    }

    #[cfg(not(target_arch = "wasm32"))]
    {
        use std::fs;

        let _ = mime;
        let dir = export_dir()?;
        fs::create_dir_all(&dir).map_err(|err| AppError::Export(err.to_string()))?;
        let path = dir.join(filename);
        fs::write(&path, &bytes).map_err(|err| AppError::Export(err.to_string()))?;
        Ok(Some(path.to_string_lossy().to_string()))
    }
}

#[cfg(not(target_arch = "wasm32"))]
pub(crate) fn project_dirs() -> Result<directories::ProjectDirs> {
    directories::ProjectDirs::from("it", "Ambiti", "AmbitiDashboard")
        .ok_or_else(|| platform_error("unable to determine application directories"))
}

#[cfg(not(target_arch = "wasm32"))]
fn export_dir() -> Result<std::path::PathBuf> {
    Ok(project_dirs()?.data_dir().join("exports"))
}

fn platform_error(message: &str) -> AppError {
    AppError::Platform(message.to_string())
}
