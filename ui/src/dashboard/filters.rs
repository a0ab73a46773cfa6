use dioxus::prelude::*;

use super::engine::FilterField;
use super::{DashboardState, FilterOptions};
use crate::core::timing::Debouncer;
use crate::t;

const TEXT_DEBOUNCE_MS: u32 = 300;

/// Region and province selects apply immediately; the text filters settle first.
#[component]
pub fn FilterBar(
    mut state: Signal<DashboardState>,
    options: FilterOptions,
    on_clear: EventHandler<()>,
) -> Element {
    let filters = state.read().filters().clone();

    rsx! {
        section { class: "card filters",
            div { class: "filters__grid",
                div { class: "filters__field",
                    label { r#for: "filter-regione", {t!("filter-regione")} }
                    select {
                        id: "filter-regione",
                        value: "{filters.regione}",
                        onchange: move |evt: FormEvent| state.write().set_filter(FilterField::Regione, evt.value()),
                        option { value: "", {t!("filter-all")} }
                        for regione in options.regioni.iter() {
                            option { key: "{regione}", value: "{regione}", "{regione}" }
                        }
                    }
                }
                div { class: "filters__field",
                    label { r#for: "filter-provincia", {t!("filter-provincia")} }
                    select {
                        id: "filter-provincia",
                        value: "{filters.provincia}",
                        onchange: move |evt: FormEvent| state.write().set_filter(FilterField::Provincia, evt.value()),
                        option { value: "", {t!("filter-all")} }
                        for provincia in options.province.iter() {
                            option { key: "{provincia}", value: "{provincia}", "{provincia}" }
                        }
                    }
                }
                SearchField {
                    state,
                    field: FilterField::Ente,
                    id: "filter-ente",
                    label: t!("filter-ente"),
                    placeholder: t!("filter-ente-placeholder"),
                }
                SearchField {
                    state,
                    field: FilterField::Comune,
                    id: "filter-comune",
                    label: t!("filter-comune"),
                    placeholder: t!("filter-comune-placeholder"),
                }
                div { class: "filters__actions",
                    button {
                        r#type: "button",
                        class: "button button--ghost",
                        disabled: filters.is_empty(),
                        onclick: move |_| on_clear.call(()),
                        {t!("filter-clear")}
                    }
                }
            }
        }
    }
}

#[component]
fn SearchField(
    mut state: Signal<DashboardState>,
    field: FilterField,
    id: &'static str,
    label: String,
    placeholder: String,
) -> Element {
    let mut draft = use_signal(|| state.peek().filters().get(field).to_string());
    let debouncer = use_hook(|| Debouncer::new(TEXT_DEBOUNCE_MS));
    let applied = use_memo(move || state.read().filters().get(field).to_string());

    // Follow external resets such as "clear filters".
    use_effect(move || {
        if applied().is_empty() {
            draft.set(String::new());
        }
    });

    let on_input = move |evt: FormEvent| {
        let value = evt.value();
        draft.set(value.clone());
        let ticket = debouncer.ticket();
        spawn(async move {
            if ticket.settle().await {
                state.write().set_filter(field, value);
            }
        });
    };

    rsx! {
        div { class: "filters__field",
            label { r#for: id, "{label}" }
            input {
                id: id,
                r#type: "search",
                placeholder: "{placeholder}",
                autocomplete: "off",
                value: "{draft}",
                oninput: on_input,
            }
        }
    }
}
