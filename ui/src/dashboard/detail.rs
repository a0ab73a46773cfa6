use dioxus::prelude::*;

use crate::core::format::or_na;
use crate::records::AmbitoRecord;
use crate::t;

pub const COMUNI_LIMIT: usize = 15;
pub const SEDI_LIMIT: usize = 10;

#[derive(Debug, Clone, PartialEq)]
pub struct SedeRow {
    pub ente: String,
    pub indirizzo: String,
    pub comune: String,
    pub cap: String,
    pub codice: String,
}

/// Expanded block shown beneath a table row.
#[derive(Debug, Clone, PartialEq)]
pub struct DetailView {
    pub ente: String,
    pub indirizzo: String,
    pub comune_capofila: String,
    pub provincia: String,
    pub comuni: Vec<String>,
    pub comuni_hidden: usize,
    pub sedi: Vec<SedeRow>,
    pub sedi_hidden: usize,
}

impl DetailView {
    pub fn from_record(record: &AmbitoRecord) -> Self {
        let gestore = record.ente_gestore.as_ref();

        let sedi = record
            .dettagli
            .iter()
            .take(SEDI_LIMIT)
            .map(|sede| SedeRow {
                ente: or_na(sede.ente.as_deref()),
                indirizzo: or_na(sede.indirizzo.as_deref()),
                comune: or_na(sede.comune.as_deref()),
                cap: or_na(sede.cap.as_deref()),
                codice: or_na(sede.codice.as_deref()),
            })
            .collect();

        Self {
            ente: or_na(record.ente_name()),
            indirizzo: or_na(gestore.and_then(|e| e.indirizzo.as_deref())),
            comune_capofila: or_na(record.comune_capofila()),
            provincia: or_na(record.provincia_any()),
            comuni: record.comuni.iter().take(COMUNI_LIMIT).cloned().collect(),
            comuni_hidden: record.comuni.len().saturating_sub(COMUNI_LIMIT),
            sedi,
            sedi_hidden: record.dettagli.len().saturating_sub(SEDI_LIMIT),
        }
    }
}

#[component]
pub fn DetailBlock(view: DetailView) -> Element {
    let comuni_count = view.comuni.len() + view.comuni_hidden;
    let sedi_count = view.sedi.len() + view.sedi_hidden;
    let comuni_hidden = view.comuni_hidden;
    let sedi_hidden = view.sedi_hidden;

    rsx! {
        div { class: "detail",
            div { class: "detail__section",
                h4 { class: "detail__title", {t!("detail-ente-heading")} }
                dl { class: "detail__facts",
                    dt { {t!("detail-ente")} }
                    dd { "{view.ente}" }
                    dt { {t!("detail-indirizzo")} }
                    dd { "{view.indirizzo}" }
                    dt { {t!("detail-capofila")} }
                    dd { "{view.comune_capofila}" }
                    dt { {t!("detail-provincia")} }
                    dd { "{view.provincia}" }
                }
            }

            div { class: "detail__section",
                h4 { class: "detail__title", {t!("detail-comuni-heading", count = comuni_count)} }
                if view.comuni.is_empty() {
                    p { class: "detail__empty", {t!("detail-comuni-empty")} }
                } else {
                    ul { class: "detail__chips",
                        for comune in view.comuni.iter() {
                            li { class: "detail__chip", "{comune}" }
                        }
                    }
                    if comuni_hidden > 0 {
                        p { class: "detail__more", {t!("detail-more", count = comuni_hidden)} }
                    }
                }
            }

            if !view.sedi.is_empty() {
                div { class: "detail__section",
                    h4 { class: "detail__title", {t!("detail-sedi-heading", count = sedi_count)} }
                    table { class: "detail__table",
                        thead {
                            tr {
                                th { {t!("detail-ente")} }
                                th { {t!("detail-indirizzo")} }
                                th { {t!("detail-comune")} }
                                th { "CAP" }
                                th { {t!("detail-codice")} }
                            }
                        }
                        tbody {
                            for sede in view.sedi.iter() {
                                tr {
                                    td { "{sede.ente}" }
                                    td { "{sede.indirizzo}" }
                                    td { "{sede.comune}" }
                                    td { "{sede.cap}" }
                                    td { "{sede.codice}" }
                                }
                            }
                        }
                    }
                    if sedi_hidden > 0 {
                        p { class: "detail__more", {t!("detail-more", count = sedi_hidden)} }
                    }
                }
            }
        }
    }
}
