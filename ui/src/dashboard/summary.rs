use dioxus::prelude::*;

use super::engine::SummaryStats;
use crate::core::format::{self, NumberLocale};
use crate::t;

#[component]
pub fn SummaryCards(stats: SummaryStats, total: usize, locale: NumberLocale) -> Element {
    let shown = format::format_count(stats.ambiti, locale);
    let total_text = format::format_count(total, locale);

    rsx! {
        section { class: "summary",
            {stat_card(t!("summary-ambiti"), shown.clone(), Some(t!("summary-of-total", shown = shown.clone(), total = total_text)))}
            {stat_card(t!("summary-comuni"), format::format_number(stats.comuni_total, 0, locale), None)}
            {stat_card(t!("summary-comuni-distinti"), format::format_count(stats.comuni_distinct, locale), None)}
            {stat_card(t!("summary-enti"), format::format_count(stats.enti_distinct, locale), None)}
        }
    }
}

fn stat_card(label: String, value: String, meta: Option<String>) -> Element {
    rsx! {
        div { class: "stat-card",
            span { class: "stat-card__label", "{label}" }
            strong { class: "stat-card__value", "{value}" }
            if let Some(meta) = meta {
                span { class: "stat-card__meta", "{meta}" }
            }
        }
    }
}
