use dioxus::prelude::*;

use crate::components::toast::use_toast;
use crate::core::error::AppError;
use crate::dashboard::charts::{build_analytics, build_charts, AnalyticsPanel, ChartsPanel};
use crate::dashboard::context::use_app_context;
use crate::dashboard::engine::SortKey;
use crate::dashboard::export::ExportPanel;
use crate::dashboard::filters::FilterBar;
use crate::dashboard::import::parse_upload;
use crate::dashboard::load::{example_dataset, load_into, LoadOutcome};
use crate::dashboard::summary::SummaryCards;
use crate::dashboard::table::{self, DataTable};
use crate::dashboard::verify::verify;
use crate::records::dataset::normalize;
use crate::records::{AmbitoRecord, RecordId};
use crate::t;

#[component]
pub fn Dashboard() -> Element {
    // Re-render when the navbar switches language.
    let _lang = try_use_context::<Signal<String>>().map(|code| code());

    let ctx = use_app_context();
    let toasts = use_toast();
    let config = ctx.config;
    let mut state = ctx.state;
    let mut show_charts = use_signal(|| false);
    let mut show_analytics = use_signal(|| false);

    let reload = move || {
        let mut toasts = toasts;
        let (path, max_records) = {
            let config = config.read();
            (config.data.json_file.clone(), config.data.max_records)
        };
        spawn(async move {
            match load_into(state, path, max_records).await {
                LoadOutcome::Loaded(count) => toasts.success(t!("load-success", count = count)),
                LoadOutcome::Fallback(err) => {
                    toasts.warning(t!("load-fallback", reason = err.to_string()))
                }
            }
        });
    };
    // A language switch remounts the page; keep whatever is already loaded.
    use_hook(move || {
        let idle = {
            let current = state.peek();
            !current.has_data() && !current.is_loading()
        };
        if idle {
            reload();
        }
    });

    let load_example = move |_| {
        let mut toasts = toasts;
        let records = example_dataset(config.read().data.max_records);
        let count = records.len();
        state.write().set_data(records);
        toasts.success(t!("example-loaded", count = count));
    };

    let on_upload = move |evt: FormEvent| {
        let mut toasts = toasts;
        let max_records = config.read().data.max_records;
        spawn(async move {
            let Some(engine) = evt.files() else {
                return;
            };
            let Some(name) = engine.files().into_iter().next() else {
                return;
            };
            let parsed = match engine.read_file_to_string(&name).await {
                Some(contents) => parse_upload(&name, &contents),
                None => Err(AppError::Platform(format!("unable to read {name}"))),
            };
            match parsed {
                Ok(values) => {
                    let records = normalize(values, max_records);
                    let count = records.len();
                    state.write().set_data(records);
                    toasts.success(t!("upload-success", count = count, name = name));
                }
                Err(err) => toasts.failure(&t!("upload-failed"), &err),
            }
        });
    };

    let on_verify = move |_| {
        let mut toasts = toasts;
        let report = verify(&state.read(), &config.read().validation.required_fields);
        if report.is_ok() {
            toasts.success(t!("verify-ok", count = report.total_records));
        } else {
            toasts.warning(t!("verify-issues", count = report.issues.len()));
        }
    };

    let locale = ctx.locale();
    let features = config.read().features.clone();
    let snapshot = state.read();
    let table_view = table::render(&snapshot, locale);
    let options = snapshot.filter_options();
    let stats = snapshot.stats();
    let total = snapshot.records().len();
    let shown = snapshot.filtered_len();
    let loading = snapshot.is_loading();
    let has_data = snapshot.has_data();
    let visible: Vec<&AmbitoRecord> = snapshot.filtered().collect();
    let charts = (features.charts && show_charts()).then(|| build_charts(&visible));
    let analytics = (features.analytics && show_analytics())
        .then(|| build_analytics(&visible).map_err(|err| err.to_string()));
    drop(visible);
    drop(snapshot);

    rsx! {
        section { class: "page page-dashboard",
            div { class: "page__header",
                h1 { {t!("dashboard-title")} }
                p { class: "page__lead", {t!("dashboard-lead")} }
            }

            div { class: "toolbar",
                button {
                    r#type: "button",
                    class: "button button--primary",
                    disabled: loading,
                    onclick: move |_| reload(),
                    {t!("action-reload")}
                }
                button { r#type: "button", class: "button", onclick: load_example, {t!("action-example")} }
                label { class: "button button--ghost toolbar__upload",
                    {t!("action-upload")}
                    input {
                        r#type: "file",
                        accept: ".json,.csv",
                        class: "visually-hidden",
                        onchange: on_upload,
                    }
                }
                if features.charts {
                    button {
                        r#type: "button",
                        class: "button button--ghost",
                        "aria-pressed": show_charts(),
                        onclick: move |_| show_charts.set(!show_charts()),
                        {if show_charts() { t!("action-hide-charts") } else { t!("action-show-charts") }}
                    }
                }
                if features.analytics {
                    button {
                        r#type: "button",
                        class: "button button--ghost",
                        "aria-pressed": show_analytics(),
                        onclick: move |_| show_analytics.set(!show_analytics()),
                        {if show_analytics() { t!("action-hide-analytics") } else { t!("action-show-analytics") }}
                    }
                }
                if features.validation {
                    button {
                        r#type: "button",
                        class: "button button--ghost",
                        disabled: !has_data,
                        onclick: on_verify,
                        {t!("action-verify")}
                    }
                }
            }

            SummaryCards { stats, total, locale }

            if features.filters {
                FilterBar {
                    state,
                    options,
                    on_clear: move |_| {
                        let mut toasts = toasts;
                        state.write().clear_filters();
                        toasts.info(t!("filters-cleared"));
                    },
                }
            }

            if let Some(view) = charts {
                ChartsPanel { view }
            }
            if let Some(outcome) = analytics {
                AnalyticsPanel { analytics: outcome, locale }
            }

            section { class: "card table-card",
                div { class: "card__header",
                    h2 { {t!("table-title")} }
                    span { class: "card__meta", {t!("table-count", shown = shown, total = total)} }
                    if features.expandable_rows {
                        div { class: "card__actions",
                            button {
                                r#type: "button",
                                class: "button button--ghost",
                                disabled: shown == 0,
                                onclick: move |_| {
                                    let mut toasts = toasts;
                                    state.write().expand_all();
                                    toasts.info(t!("rows-expanded"));
                                },
                                {t!("action-expand-all")}
                            }
                            button {
                                r#type: "button",
                                class: "button button--ghost",
                                disabled: shown == 0,
                                onclick: move |_| {
                                    let mut toasts = toasts;
                                    state.write().collapse_all();
                                    toasts.info(t!("rows-collapsed"));
                                },
                                {t!("action-collapse-all")}
                            }
                        }
                    }
                }
                DataTable {
                    view: table_view,
                    sortable: features.sorting,
                    expandable: features.expandable_rows,
                    on_sort: move |key: SortKey| state.write().sort_by(key),
                    on_toggle: move |id: RecordId| {
                        state.write().toggle_row(id);
                    },
                }
            }

            if features.export {
                ExportPanel { state, config, locale }
            }

            if loading {
                div { class: "loading-overlay", role: "alert", "aria-busy": "true",
                    div { class: "loading-overlay__spinner" }
                    p { {t!("loading")} }
                }
            }
        }
    }
}
