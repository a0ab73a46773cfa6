use dioxus::prelude::*;
use serde_json::{json, Value};
use time::{macros::format_description, format_description::well_known::Rfc3339, Date, OffsetDateTime};

use super::engine::Filters;
use super::table;
use super::DashboardState;
use crate::core::config::{AppConfig, FormatSettings};
use crate::core::csv::{to_csv, CsvRow};
use crate::core::error::{AppError, Result};
use crate::core::format::NumberLocale;
use crate::core::platform;
use crate::components::toast::use_toast;
use crate::records::{AmbitoRecord, SchemaVariant};
use crate::t;

const LIST_SEPARATOR: &str = "; ";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    CsvAggregato,
    CsvDettagliato,
    Json,
    Html,
    Excel,
}

impl ExportFormat {
    pub const ALL: [ExportFormat; 5] = [
        ExportFormat::CsvAggregato,
        ExportFormat::CsvDettagliato,
        ExportFormat::Json,
        ExportFormat::Html,
        ExportFormat::Excel,
    ];

    pub fn settings(self, config: &AppConfig) -> &FormatSettings {
        let formats = &config.export.formats;
        match self {
            Self::CsvAggregato => &formats.csv_aggregato,
            Self::CsvDettagliato => &formats.csv_dettagliato,
            Self::Json => &formats.json,
            Self::Html => &formats.html,
            Self::Excel => &formats.excel,
        }
    }

    pub fn extension(self) -> &'static str {
        match self {
            Self::CsvAggregato | Self::CsvDettagliato => "csv",
            Self::Json => "json",
            Self::Html => "html",
            Self::Excel => "xlsx",
        }
    }

    pub fn mime(self) -> &'static str {
        match self {
            Self::CsvAggregato | Self::CsvDettagliato => "text/csv",
            Self::Json => "application/json",
            Self::Html => "text/html",
            Self::Excel => "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet",
        }
    }

    fn label(self) -> String {
        match self {
            Self::CsvAggregato => t!("export-csv-aggregato"),
            Self::CsvDettagliato => t!("export-csv-dettagliato"),
            Self::Json => t!("export-json"),
            Self::Html => t!("export-html"),
            Self::Excel => t!("export-excel"),
        }
    }
}

/// A rendered export ready to hand to the platform.
#[derive(Debug, Clone, PartialEq)]
pub struct ExportFile {
    pub filename: String,
    pub mime: &'static str,
    pub content: String,
}

fn number_text(value: Option<f64>) -> String {
    value.map(|n| n.to_string()).unwrap_or_default()
}

fn text(value: Option<&str>) -> String {
    value.unwrap_or_default().to_string()
}

fn cell(key: &str, value: String) -> (String, String) {
    (key.to_string(), value)
}

/// One row per record holding the record's own fields.
///
/// Nested records fill the district, lead municipality and entity columns
/// and leave the flat counts empty; flat records do the opposite.
pub fn aggregated_rows<'a>(records: impl Iterator<Item = &'a AmbitoRecord>) -> Vec<CsvRow> {
    records
        .map(|record| {
            let nested = record.schema == SchemaVariant::Nested;
            let ente = record.ente_gestore.as_ref().filter(|_| nested);
            let enti = if nested {
                String::new()
            } else {
                record.enti.join(LIST_SEPARATOR)
            };
            vec![
                cell("regione", text(record.regione.as_deref())),
                cell("provincia", text(record.provincia_any())),
                cell("nominativoAmbito", text(record.nominativo.as_deref())),
                cell("comuneCapofila", text(ente.and_then(|e| e.comune_capofila.as_deref()))),
                cell("ente", text(ente.and_then(|e| e.ente.as_deref()))),
                cell("indirizzo", text(ente.and_then(|e| e.indirizzo.as_deref()))),
                cell("numeroComuni", number_text(record.numero_comuni)),
                cell("entiUnici", number_text(record.enti_unici)),
                cell("ambitiUnici", number_text(record.ambiti_unici)),
                cell("entiDistinti", enti),
                cell("comuniDistinti", record.comuni.join(LIST_SEPARATOR)),
            ]
        })
        .collect()
}

/// One row per detail entry; records without details keep a single row.
pub fn detailed_rows<'a>(records: impl Iterator<Item = &'a AmbitoRecord>) -> Vec<CsvRow> {
    let mut rows = Vec::new();
    for record in records {
        let base = vec![
            cell("regione", text(record.regione.as_deref())),
            cell("provincia", text(record.provincia_any())),
            cell("numeroComuni", number_text(Some(record.comuni_count()))),
            cell("entiUnici", number_text(Some(record.enti_count()))),
            cell("ambitiUnici", number_text(record.ambiti_unici)),
        ];
        if record.dettagli.is_empty() {
            let mut row = base;
            row.push(cell("ente", text(record.ente_name())));
            for key in ["indirizzo", "comune", "cap", "codice"] {
                row.push(cell(key, String::new()));
            }
            rows.push(row);
            continue;
        }
        for sede in &record.dettagli {
            let mut row = base.clone();
            row.extend([
                cell("ente", text(sede.ente.as_deref())),
                cell("indirizzo", text(sede.indirizzo.as_deref())),
                cell("comune", text(sede.comune.as_deref())),
                cell("cap", text(sede.cap.as_deref())),
                cell("codice", text(sede.codice.as_deref())),
            ]);
            rows.push(row);
        }
    }
    rows
}

/// Dataset envelope carrying the records as they were loaded.
pub fn json_document<'a>(
    records: impl Iterator<Item = &'a AmbitoRecord>,
    filters: &Filters,
    config: &AppConfig,
    exported_at: OffsetDateTime,
) -> Result<String> {
    let sources: Vec<Value> = records.map(|record| record.source.clone()).collect();
    let document = if config.export.include_metadata {
        let export_date = exported_at
            .format(&Rfc3339)
            .map_err(|err| AppError::Export(err.to_string()))?;
        json!({
            "metadata": {
                "title": config.app.title,
                "exportDate": export_date,
                "recordCount": sources.len(),
                "filters": filters,
                "version": config.app.version,
            },
            "ambiti_territoriali": sources,
        })
    } else {
        json!({ "ambiti_territoriali": sources })
    };

    let rendered = if config.export.formats.json.formatted {
        serde_json::to_string_pretty(&document)?
    } else {
        serde_json::to_string(&document)?
    };
    Ok(rendered)
}

/// `<base>[_YYYY-MM-DD].<ext>`
pub fn filename(settings: &FormatSettings, extension: &str, date: Date) -> String {
    let mut name = settings.filename.clone();
    if settings.include_timestamp {
        let stamp = date
            .format(&format_description!("[year]-[month]-[day]"))
            .unwrap_or_default();
        if !stamp.is_empty() {
            name.push('_');
            name.push_str(&stamp);
        }
    }
    format!("{name}.{extension}")
}

/// Renders the filtered view in `format`.
pub fn prepare(
    format: ExportFormat,
    state: &DashboardState,
    config: &AppConfig,
    now: OffsetDateTime,
    locale: NumberLocale,
) -> Result<ExportFile> {
    let settings = format.settings(config);
    if !settings.enabled {
        return Err(AppError::Export(format!("{} export is disabled", format.extension())));
    }
    if format != ExportFormat::Excel && state.filtered_len() == 0 {
        return Err(AppError::Export("the current view has no records".into()));
    }

    let content = match format {
        ExportFormat::CsvAggregato => to_csv(&aggregated_rows(state.filtered())),
        ExportFormat::CsvDettagliato => to_csv(&detailed_rows(state.filtered())),
        ExportFormat::Json => json_document(state.filtered(), state.filters(), config, now)?,
        ExportFormat::Html => html_report(state, config, now, locale)?,
        ExportFormat::Excel => return Err(AppError::NotImplemented("Excel")),
    };

    Ok(ExportFile {
        filename: filename(settings, format.extension(), now.date()),
        mime: format.mime(),
        content,
    })
}

fn html_report(
    state: &DashboardState,
    config: &AppConfig,
    now: OffsetDateTime,
    locale: NumberLocale,
) -> Result<String> {
    let mut expanded_view = state.clone();
    expanded_view.expand_all();
    let view = table::render(&expanded_view, locale);
    let generated = now
        .format(&Rfc3339)
        .map_err(|err| AppError::Export(err.to_string()))?;
    let title = &config.app.title;

    Ok(format!(
        "<!DOCTYPE html>\n<html lang=\"it\">\n<head><meta charset=\"utf-8\"><title>{}</title></head>\n<body>\n{}<p>{}</p>\n</body>\n</html>\n",
        crate::core::format::sanitize(title),
        table::to_html(&view, title),
        crate::core::format::sanitize(&generated),
    ))
}

/// Hands the file to the platform and describes where it went.
pub async fn deliver(file: ExportFile) -> Result<Option<String>> {
    platform::download_bytes(&file.filename, file.mime, file.content.into_bytes()).await
}

#[component]
pub fn ExportPanel(
    state: Signal<DashboardState>,
    config: Signal<AppConfig>,
    locale: NumberLocale,
) -> Element {
    let busy = use_signal(|| false);
    let toasts = use_toast();
    let total = state.read().filtered_len();

    let run_export = move |format: ExportFormat| {
        let mut busy = busy;
        let mut toasts = toasts;
        if busy() {
            return;
        }
        let prepared = prepare(
            format,
            &state.read(),
            &config.read(),
            OffsetDateTime::now_utc(),
            locale,
        );
        let file = match prepared {
            Ok(file) => file,
            Err(err) => {
                toasts.failure(&t!("export-failed"), &err);
                return;
            }
        };

        busy.set(true);
        spawn(async move {
            let filename = file.filename.clone();
            match deliver(file).await {
                Ok(Some(path)) => toasts.success(t!("export-saved", path = path)),
                Ok(None) => toasts.success(t!("export-started", filename = filename)),
                Err(err) => toasts.failure(&t!("export-failed"), &err),
            }
            busy.set(false);
        });
    };

    let formats: Vec<ExportFormat> = ExportFormat::ALL
        .into_iter()
        .filter(|format| format.settings(&config.read()).enabled)
        .collect();

    rsx! {
        section { class: "card export",
            div { class: "card__header",
                h2 { {t!("export-title")} }
                span { class: "card__meta", {t!("export-count", count = total)} }
            }
            div { class: "export__actions",
                for format in formats.into_iter() {
                    button {
                        r#type: "button",
                        class: if format == ExportFormat::Excel { "button button--ghost" } else { "button" },
                        disabled: busy() || (total == 0 && format != ExportFormat::Excel),
                        onclick: move |_| run_export(format),
                        {format.label()}
                    }
                }
            }
        }
    }
}
