//! Dataset loading with the example-data fallback.

use dioxus::prelude::*;

use super::DashboardState;
use crate::core::error::{AppError, Result};
use crate::core::platform;
use crate::core::timing::Stopwatch;
use crate::records::dataset::{example_records, normalize, parse_document};
use crate::records::AmbitoRecord;

#[derive(Debug)]
pub enum LoadOutcome {
    Loaded(usize),
    /// The source failed; the example dataset is shown instead.
    Fallback(AppError),
}

pub async fn fetch_dataset(path: &str, max_records: usize) -> Result<Vec<AmbitoRecord>> {
    let stopwatch = Stopwatch::start();
    let text = platform::fetch_text(path).await?;
    let records = normalize(parse_document(&text)?, max_records);
    tracing::debug!(
        "Fetched {} records from {path} in {:.1}ms",
        records.len(),
        stopwatch.elapsed_ms()
    );
    Ok(records)
}

pub fn example_dataset(max_records: usize) -> Vec<AmbitoRecord> {
    normalize(example_records(), max_records)
}

/// Fetches `path` into `state`. The loading flag is raised for the whole
/// call and lowered on every path; overlapping loads resolve last-wins.
pub async fn load_into(
    mut state: Signal<DashboardState>,
    path: String,
    max_records: usize,
) -> LoadOutcome {
    state.write().begin_load();
    let outcome = match fetch_dataset(&path, max_records).await {
        Ok(records) => {
            let count = records.len();
            state.write().set_data(records);
            LoadOutcome::Loaded(count)
        }
        Err(err) => {
            tracing::warn!("Unable to load {path}: {err}");
            state.write().set_data(example_dataset(max_records));
            LoadOutcome::Fallback(err)
        }
    };
    state.write().finish_load();
    outcome
}
