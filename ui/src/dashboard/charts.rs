use dioxus::prelude::*;

use crate::core::collections::{distinct_count, frequency_table};
use crate::core::error::{AppError, Result};
use crate::core::format::{self, NumberLocale};
use crate::records::AmbitoRecord;
use crate::t;

pub const TOP_REGIONI: usize = 10;
pub const TOP_PROVINCE: usize = 10;
pub const TOP_ENTI: usize = 8;

#[derive(Debug, Clone, PartialEq)]
pub struct Bar {
    pub label: String,
    pub count: usize,
    /// Width relative to the largest bar, 0-100.
    pub width_pct: f64,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct ChartsView {
    pub by_regione: Vec<Bar>,
    pub by_provincia: Vec<Bar>,
    pub by_ente: Vec<Bar>,
}

impl ChartsView {
    pub fn is_empty(&self) -> bool {
        self.by_regione.is_empty() && self.by_provincia.is_empty() && self.by_ente.is_empty()
    }
}

pub fn build_charts(records: &[&AmbitoRecord]) -> ChartsView {
    ChartsView {
        by_regione: bars(records.iter().filter_map(|r| r.regione.as_deref()), TOP_REGIONI),
        by_provincia: bars(records.iter().filter_map(|r| r.provincia_any()), TOP_PROVINCE),
        by_ente: bars(records.iter().filter_map(|r| r.ente_name()), TOP_ENTI),
    }
}

fn bars<'a>(values: impl Iterator<Item = &'a str>, top: usize) -> Vec<Bar> {
    let table = frequency_table(values);
    let max = table.first().map(|(_, count)| *count).unwrap_or(0);
    table
        .into_iter()
        .take(top)
        .map(|(label, count)| Bar {
            label,
            count,
            width_pct: if max == 0 {
                0.0
            } else {
                count as f64 / max as f64 * 100.0
            },
        })
        .collect()
}

#[derive(Debug, Clone, PartialEq)]
pub struct AnalyticsView {
    pub ambiti: usize,
    pub avg_comuni: f64,
    pub avg_enti: f64,
    pub regioni: usize,
    pub province: usize,
}

pub fn build_analytics(records: &[&AmbitoRecord]) -> Result<AnalyticsView> {
    let ambiti = records.len();
    if ambiti == 0 {
        return Ok(AnalyticsView {
            ambiti,
            avg_comuni: 0.0,
            avg_enti: 0.0,
            regioni: 0,
            province: 0,
        });
    }

    let comuni: f64 = records.iter().map(|r| r.comuni_count()).sum();
    let enti: f64 = records.iter().map(|r| r.enti_count()).sum();
    if !comuni.is_finite() || !enti.is_finite() {
        return Err(AppError::Analytics("totals overflowed".into()));
    }

    Ok(AnalyticsView {
        ambiti,
        avg_comuni: comuni / ambiti as f64,
        avg_enti: enti / ambiti as f64,
        regioni: distinct_count(records.iter().filter_map(|r| r.regione.as_deref())),
        province: distinct_count(records.iter().filter_map(|r| r.provincia_any())),
    })
}

#[component]
pub fn ChartsPanel(view: ChartsView) -> Element {
    rsx! {
        section { class: "card charts",
            div { class: "card__header",
                h2 { {t!("charts-title")} }
            }
            if view.is_empty() {
                p { class: "card__placeholder", {t!("charts-empty")} }
            } else {
                div { class: "charts__grid",
                    if !view.by_regione.is_empty() {
                        BarChart { title: t!("charts-by-regione"), bars: view.by_regione.clone() }
                    }
                    if !view.by_provincia.is_empty() {
                        BarChart { title: t!("charts-by-provincia"), bars: view.by_provincia.clone() }
                    }
                    if !view.by_ente.is_empty() {
                        BarChart { title: t!("charts-by-ente"), bars: view.by_ente.clone() }
                    }
                }
            }
        }
    }
}

#[component]
fn BarChart(title: String, bars: Vec<Bar>) -> Element {
    rsx! {
        div { class: "chart",
            h3 { class: "chart__title", "{title}" }
            ul { class: "chart__bars",
                for bar in bars.iter() {
                    li { class: "chart__row", key: "{bar.label}",
                        span { class: "chart__label", title: "{bar.label}", "{bar.label}" }
                        span { class: "chart__track",
                            span { class: "chart__fill", style: format!("width: {:.1}%", bar.width_pct) }
                        }
                        span { class: "chart__count", "{bar.count}" }
                    }
                }
            }
        }
    }
}

#[component]
pub fn AnalyticsPanel(
    analytics: std::result::Result<AnalyticsView, String>,
    locale: NumberLocale,
) -> Element {
    rsx! {
        section { class: "card analytics",
            div { class: "card__header",
                h2 { {t!("analytics-title")} }
            }
            {match analytics {
                Ok(view) => rsx! {
                    div { class: "highlights",
                        {highlight(t!("analytics-avg-comuni"), format::format_number(view.avg_comuni, 1, locale))}
                        {highlight(t!("analytics-avg-enti"), format::format_number(view.avg_enti, 1, locale))}
                        {highlight(t!("analytics-regioni"), format::format_count(view.regioni, locale))}
                        {highlight(t!("analytics-province"), format::format_count(view.province, locale))}
                    }
                },
                Err(message) => rsx! {
                    p { class: "card__meta card__meta--error", {t!("analytics-error", reason = message)} }
                },
            }}
        }
    }
}

fn highlight(label: String, value: String) -> Element {
    rsx! {
        div { class: "highlight",
            span { class: "highlight__label", "{label}" }
            strong { class: "highlight__value", "{value}" }
        }
    }
}
