//! Table view model, its HTML serialization and the `DataTable` component.

use dioxus::prelude::*;

use super::detail::{DetailBlock, DetailView};
use super::engine::{SortDirection, SortKey};
use super::DashboardState;
use crate::core::format::{self, NumberLocale};
use crate::records::RecordId;
use crate::t;

const ENTE_CHARS: usize = 40;
const CAPOFILA_CHARS: usize = 30;
const NOMINATIVO_CHARS: usize = 40;

/// Display text plus the full value when the text was shortened.
#[derive(Debug, Clone, PartialEq)]
pub struct Cell {
    pub text: String,
    pub title: Option<String>,
}

impl Cell {
    fn plain(value: Option<&str>) -> Self {
        Self {
            text: format::or_na(value),
            title: None,
        }
    }

    fn truncated(value: Option<&str>, max_chars: usize) -> Self {
        let full = format::or_na(value);
        let (text, cut) = format::truncate(&full, max_chars);
        Self {
            text,
            title: cut.then_some(full),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct DataRow {
    pub id: RecordId,
    pub position: usize,
    pub regione: Cell,
    pub provincia: Cell,
    pub ente: Cell,
    pub comune_capofila: Cell,
    pub nominativo: Cell,
    pub numero_comuni: String,
    pub expanded: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub enum TableRow {
    Data(DataRow),
    /// Always directly after the data row it belongs to.
    Detail(RecordId, DetailView),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmptyState {
    NoData,
    NoResults,
}

#[derive(Debug, Clone, PartialEq)]
pub enum TableBody {
    Loading,
    Empty(EmptyState),
    Rows(Vec<TableRow>),
}

#[derive(Debug, Clone, PartialEq)]
pub struct ColumnHeader {
    pub key: SortKey,
    pub direction: Option<SortDirection>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TableView {
    pub columns: Vec<ColumnHeader>,
    pub body: TableBody,
}

impl TableView {
    pub fn data_rows(&self) -> impl Iterator<Item = &DataRow> {
        self.rows().iter().filter_map(|row| match row {
            TableRow::Data(data) => Some(data),
            TableRow::Detail(..) => None,
        })
    }

    pub fn detail_count(&self) -> usize {
        self.rows()
            .iter()
            .filter(|row| matches!(row, TableRow::Detail(..)))
            .count()
    }

    fn rows(&self) -> &[TableRow] {
        match &self.body {
            TableBody::Rows(rows) => rows,
            _ => &[],
        }
    }
}

/// Pure projection of the dashboard state into table rows.
pub fn render(state: &DashboardState, locale: NumberLocale) -> TableView {
    let sort = state.sort();
    let columns = SortKey::TABLE_COLUMNS
        .iter()
        .map(|&key| ColumnHeader {
            key,
            direction: sort.direction_for(key),
        })
        .collect();

    let body = if state.is_loading() {
        TableBody::Loading
    } else if !state.has_data() {
        TableBody::Empty(EmptyState::NoData)
    } else if state.filtered_len() == 0 {
        TableBody::Empty(EmptyState::NoResults)
    } else {
        let mut rows = Vec::with_capacity(state.filtered_len());
        for (position, record) in state.filtered().enumerate() {
            let expanded = state.is_expanded(record.id);
            rows.push(TableRow::Data(DataRow {
                id: record.id,
                position,
                regione: Cell::plain(record.regione.as_deref()),
                provincia: Cell::plain(record.provincia_any()),
                ente: Cell::truncated(record.ente_name(), ENTE_CHARS),
                comune_capofila: Cell::truncated(record.comune_capofila(), CAPOFILA_CHARS),
                nominativo: Cell::truncated(record.nominativo.as_deref(), NOMINATIVO_CHARS),
                numero_comuni: format::format_number(record.comuni_count(), 0, locale),
                expanded,
            }));
            if expanded {
                rows.push(TableRow::Detail(record.id, DetailView::from_record(record)));
            }
        }
        TableBody::Rows(rows)
    };

    TableView { columns, body }
}

/// Standalone HTML fragment of the view; every dataset value is escaped.
pub fn to_html(view: &TableView, title: &str) -> String {
    let esc = format::sanitize;
    let mut html = String::new();
    html.push_str(&format!("<h1>{}</h1>\n", esc(title)));
    html.push_str("<table class=\"ambiti-table\">\n<thead><tr>");
    for column in &view.columns {
        html.push_str(&format!("<th>{}</th>", esc(column.key.heading())));
    }
    html.push_str("</tr></thead>\n<tbody>\n");

    let span = view.columns.len();
    match &view.body {
        TableBody::Loading => {
            html.push_str(&format!("<tr><td colspan=\"{span}\">...</td></tr>\n"));
        }
        TableBody::Empty(empty) => {
            let (class, title, hint) = match empty {
                EmptyState::NoData => (
                    "empty--no-data",
                    t!("empty-no-data-title"),
                    t!("empty-no-data-hint"),
                ),
                EmptyState::NoResults => (
                    "empty--no-results",
                    t!("empty-no-results-title"),
                    t!("empty-no-results-hint"),
                ),
            };
            html.push_str(&format!(
                "<tr class=\"{class}\"><td colspan=\"{span}\"><strong>{}</strong><p>{}</p></td></tr>\n",
                esc(&title),
                esc(&hint)
            ));
        }
        TableBody::Rows(rows) => {
            for row in rows {
                match row {
                    TableRow::Data(data) => {
                        html.push_str("<tr>");
                        for cell in [
                            &data.regione,
                            &data.provincia,
                            &data.ente,
                            &data.comune_capofila,
                            &data.nominativo,
                        ] {
                            match &cell.title {
                                Some(full) => html.push_str(&format!(
                                    "<td title=\"{}\">{}</td>",
                                    esc(full),
                                    esc(&cell.text)
                                )),
                                None => html.push_str(&format!("<td>{}</td>", esc(&cell.text))),
                            }
                        }
                        html.push_str(&format!("<td>{}</td></tr>\n", esc(&data.numero_comuni)));
                    }
                    TableRow::Detail(_, detail) => {
                        html.push_str(&format!("<tr class=\"detail\"><td colspan=\"{span}\">"));
                        detail_html(&mut html, detail);
                        html.push_str("</td></tr>\n");
                    }
                }
            }
        }
    }
    html.push_str("</tbody>\n</table>\n");
    html
}

/// Same sections as [`DetailBlock`]: entity facts, municipalities, sedi.
fn detail_html(html: &mut String, detail: &DetailView) {
    let esc = format::sanitize;
    let more = |html: &mut String, hidden: usize| {
        if hidden > 0 {
            html.push_str(&format!(
                "<p class=\"detail__more\">{}</p>",
                esc(&t!("detail-more", count = hidden))
            ));
        }
    };

    html.push_str(&format!(
        "<h4>{}</h4><dl class=\"detail__facts\">",
        esc(&t!("detail-ente-heading"))
    ));
    for (label, value) in [
        (t!("detail-ente"), &detail.ente),
        (t!("detail-indirizzo"), &detail.indirizzo),
        (t!("detail-capofila"), &detail.comune_capofila),
        (t!("detail-provincia"), &detail.provincia),
    ] {
        html.push_str(&format!("<dt>{}</dt><dd>{}</dd>", esc(&label), esc(value)));
    }
    html.push_str("</dl>");

    let comuni_count = detail.comuni.len() + detail.comuni_hidden;
    html.push_str(&format!(
        "<h4>{}</h4>",
        esc(&t!("detail-comuni-heading", count = comuni_count))
    ));
    if detail.comuni.is_empty() {
        html.push_str(&format!(
            "<p class=\"detail__empty\">{}</p>",
            esc(&t!("detail-comuni-empty"))
        ));
    } else {
        let comuni: Vec<String> = detail.comuni.iter().map(|c| esc(c)).collect();
        html.push_str(&format!("<p class=\"detail__chips\">{}</p>", comuni.join(", ")));
        more(html, detail.comuni_hidden);
    }

    if detail.sedi.is_empty() {
        return;
    }
    let sedi_count = detail.sedi.len() + detail.sedi_hidden;
    html.push_str(&format!(
        "<h4>{}</h4><table class=\"detail__table\"><thead><tr><th>{}</th><th>{}</th><th>{}</th><th>CAP</th><th>{}</th></tr></thead><tbody>",
        esc(&t!("detail-sedi-heading", count = sedi_count)),
        esc(&t!("detail-ente")),
        esc(&t!("detail-indirizzo")),
        esc(&t!("detail-comune")),
        esc(&t!("detail-codice")),
    ));
    for sede in &detail.sedi {
        html.push_str("<tr>");
        for value in [&sede.ente, &sede.indirizzo, &sede.comune, &sede.cap, &sede.codice] {
            html.push_str(&format!("<td>{}</td>", esc(value)));
        }
        html.push_str("</tr>");
    }
    html.push_str("</tbody></table>");
    more(html, detail.sedi_hidden);
}

#[component]
pub fn DataTable(
    view: TableView,
    sortable: bool,
    expandable: bool,
    on_sort: EventHandler<SortKey>,
    on_toggle: EventHandler<RecordId>,
) -> Element {
    let span = view.columns.len() + usize::from(expandable);

    rsx! {
        div { class: "table-wrapper",
            table { class: "ambiti-table",
                thead {
                    tr {
                        for column in view.columns.iter().cloned() {
                            {render_header(column, sortable, on_sort)}
                        }
                        if expandable {
                            th { class: "ambiti-table__toggle-col", span { class: "visually-hidden", {t!("table-details")} } }
                        }
                    }
                }
                tbody {
                    {match view.body.clone() {
                        TableBody::Loading => rsx! {
                            tr { td { class: "ambiti-table__message", colspan: "{span}", {t!("table-loading")} } }
                        },
                        TableBody::Empty(EmptyState::NoData) => rsx! {
                            tr { td { class: "ambiti-table__message", colspan: "{span}",
                                strong { {t!("empty-no-data-title")} }
                                p { {t!("empty-no-data-hint")} }
                            } }
                        },
                        TableBody::Empty(EmptyState::NoResults) => rsx! {
                            tr { td { class: "ambiti-table__message", colspan: "{span}",
                                strong { {t!("empty-no-results-title")} }
                                p { {t!("empty-no-results-hint")} }
                            } }
                        },
                        TableBody::Rows(rows) => rsx! {
                            for row in rows.into_iter() {
                                {render_row(row, span, expandable, on_toggle)}
                            }
                        },
                    }}
                }
            }
        }
    }
}

fn render_header(column: ColumnHeader, sortable: bool, on_sort: EventHandler<SortKey>) -> Element {
    let key = column.key;
    let label = column_label(key);
    let (indicator, aria_sort) = match column.direction {
        Some(SortDirection::Asc) => ("▲", "ascending"),
        Some(SortDirection::Desc) => ("▼", "descending"),
        None => ("", "none"),
    };

    if !sortable {
        return rsx! { th { "{label}" } };
    }

    rsx! {
        th { "aria-sort": aria_sort,
            button {
                r#type: "button",
                class: "ambiti-table__sort",
                onclick: move |_| on_sort.call(key),
                "{label}"
                span { class: "ambiti-table__sort-indicator", "{indicator}" }
            }
        }
    }
}

fn render_row(row: TableRow, span: usize, expandable: bool, on_toggle: EventHandler<RecordId>) -> Element {
    match row {
        TableRow::Data(data) => {
            let id = data.id;
            let class = if data.expanded {
                "ambiti-table__row ambiti-table__row--expanded"
            } else {
                "ambiti-table__row"
            };
            let toggle_label = if data.expanded {
                t!("table-collapse")
            } else {
                t!("table-expand")
            };

            rsx! {
                tr { key: "{id}", class: class,
                    {render_cell(data.regione)}
                    {render_cell(data.provincia)}
                    {render_cell(data.ente)}
                    {render_cell(data.comune_capofila)}
                    {render_cell(data.nominativo)}
                    td { class: "ambiti-table__number", "{data.numero_comuni}" }
                    if expandable {
                        td {
                            button {
                                r#type: "button",
                                class: "ambiti-table__toggle",
                                "aria-expanded": data.expanded,
                                title: "{toggle_label}",
                                onclick: move |_| on_toggle.call(id),
                                if data.expanded { "−" } else { "+" }
                            }
                        }
                    }
                }
            }
        }
        TableRow::Detail(id, detail) => rsx! {
            tr { key: "{id}-detail", class: "ambiti-table__detail",
                td { colspan: "{span}", DetailBlock { view: detail } }
            }
        },
    }
}

fn render_cell(cell: Cell) -> Element {
    match cell.title {
        Some(full) => rsx! { td { title: "{full}", "{cell.text}" } },
        None => rsx! { td { "{cell.text}" } },
    }
}

fn column_label(key: SortKey) -> String {
    match key {
        SortKey::Regione => t!("column-regione"),
        SortKey::Provincia => t!("column-provincia"),
        SortKey::Ente => t!("column-ente"),
        SortKey::ComuneCapofila => t!("column-capofila"),
        SortKey::Nominativo => t!("column-nominativo"),
        SortKey::NumeroComuni => t!("column-numero-comuni"),
        SortKey::EntiUnici => t!("column-enti-unici"),
        SortKey::AmbitiUnici => t!("column-ambiti-unici"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::AppConfig;
    use crate::dashboard::engine::FilterField;
    use crate::records::AmbitoRecord;
    use serde_json::json;

    fn state_with(values: Vec<serde_json::Value>) -> DashboardState {
        let mut state = DashboardState::new(&AppConfig::default());
        state.set_data(values.into_iter().map(AmbitoRecord::from_value).collect());
        state
    }

    #[test]
    fn empty_states_are_distinct() {
        let mut state = state_with(vec![]);
        assert_eq!(
            render(&state, NumberLocale::Italian).body,
            TableBody::Empty(EmptyState::NoData)
        );

        state = state_with(vec![json!({"regione": "LAZIO"})]);
        state.set_filter(FilterField::Regione, "sicilia");
        assert_eq!(
            render(&state, NumberLocale::Italian).body,
            TableBody::Empty(EmptyState::NoResults)
        );
    }

    #[test]
    fn loading_replaces_rows() {
        let mut state = state_with(vec![json!({"regione": "LAZIO"})]);
        state.begin_load();
        assert_eq!(render(&state, NumberLocale::Italian).body, TableBody::Loading);
    }

    #[test]
    fn long_entity_names_keep_full_tooltip() {
        let long = "CONSORZIO INTERCOMUNALE DEI SERVIZI SOCIO ASSISTENZIALI DEL TERRITORIO";
        let state = state_with(vec![json!({"dettaglioEnte": {"ente": long}})]);
        let view = render(&state, NumberLocale::Italian);
        let row = view.data_rows().next().unwrap();
        assert!(row.ente.text.ends_with("..."));
        assert_eq!(row.ente.text.chars().count(), ENTE_CHARS + 3);
        assert_eq!(row.ente.title.as_deref(), Some(long));
        assert_eq!(row.regione.title, None);
    }

    #[test]
    fn detail_row_follows_its_record() {
        let mut state = state_with(vec![
            json!({"regione": "A"}),
            json!({"regione": "B"}),
            json!({"regione": "C"}),
        ]);
        let id = state.filtered().nth(1).map(|r| r.id).unwrap();
        state.toggle_row(id);

        let view = render(&state, NumberLocale::Italian);
        let TableBody::Rows(rows) = &view.body else {
            panic!("expected rows");
        };
        assert_eq!(rows.len(), 4);
        assert!(matches!(&rows[1], TableRow::Data(d) if d.id == id && d.expanded));
        assert!(matches!(&rows[2], TableRow::Detail(detail_id, _) if *detail_id == id));
    }

    #[test]
    fn sorted_column_carries_direction() {
        let mut state = state_with(vec![json!({"regione": "A"})]);
        state.sort_by(SortKey::Provincia);
        let view = render(&state, NumberLocale::Italian);
        let provincia = view.columns.iter().find(|c| c.key == SortKey::Provincia).unwrap();
        assert_eq!(provincia.direction, Some(SortDirection::Asc));
        let regione = view.columns.iter().find(|c| c.key == SortKey::Regione).unwrap();
        assert_eq!(regione.direction, None);
    }

    #[test]
    fn html_detail_carries_sedi_and_overflow_notes() {
        let comuni: Vec<String> = (0..18).map(|n| format!("COMUNE {n}")).collect();
        let sedi: Vec<serde_json::Value> = (0..12)
            .map(|n| json!({"ente": format!("ENTE {n}"), "cap": "00100", "codice": "H501"}))
            .collect();
        let mut state = state_with(vec![json!({
            "regione": "LAZIO",
            "comuniDistinti": comuni,
            "dettagliEnti": sedi,
        })]);
        state.expand_all();

        let html = to_html(&render(&state, NumberLocale::Italian), "Report");
        assert!(html.contains("<table class=\"detail__table\">"));
        assert!(html.contains("<td>ENTE 9</td>"));
        assert!(!html.contains("<td>ENTE 10</td>"));
        assert!(!html.contains("COMUNE 15"));
        assert_eq!(html.matches("class=\"detail__more\"").count(), 2);
    }

    #[test]
    fn html_empty_states_differ() {
        let mut state = state_with(vec![]);
        let no_data = to_html(&render(&state, NumberLocale::Italian), "Report");
        assert!(no_data.contains("empty--no-data"));

        state = state_with(vec![json!({"regione": "LAZIO"})]);
        state.set_filter(FilterField::Regione, "sicilia");
        let no_results = to_html(&render(&state, NumberLocale::Italian), "Report");
        assert!(no_results.contains("empty--no-results"));
        assert!(!no_results.contains("N/A"));
    }

    #[test]
    fn html_escapes_dataset_text() {
        let state = state_with(vec![json!({
            "regione": "<script>alert('x')</script>",
            "dettaglioEnte": {"ente": "A & B \"S.p.A.\""},
        })]);
        let html = to_html(&render(&state, NumberLocale::Italian), "Report <1>");
        assert!(!html.contains("<script>"));
        assert!(html.contains("&lt;script&gt;"));
        assert!(html.contains("A &amp; B &quot;S.p.A.&quot;"));
        assert!(html.contains("Report &lt;1&gt;"));
    }
}
