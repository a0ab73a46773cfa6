//! End-to-end behavior of the dashboard pipeline: load, filter, sort, expand, export, re-import.

use serde_json::json;
use time::macros::datetime;
use ui::core::config::AppConfig;
use ui::core::format::NumberLocale;
use ui::dashboard::engine::{FilterField, SortKey};
use ui::dashboard::export::{prepare, ExportFormat};
use ui::dashboard::import::parse_upload;
use ui::dashboard::table::{self, TableBody, TableRow};
use ui::dashboard::DashboardState;
use ui::records::dataset::{example_records, normalize};

fn loaded() -> DashboardState {
    let mut state = DashboardState::new(&AppConfig::default());
    state.set_data(normalize(example_records(), 1_000));
    state
}

fn regioni(state: &DashboardState) -> Vec<String> {
    state
        .filtered()
        .map(|record| record.regione.clone().unwrap_or_default())
        .collect()
}

fn comuni(state: &DashboardState) -> Vec<f64> {
    state.filtered().map(|record| record.comuni_count()).collect()
}

#[test]
fn default_sort_orders_by_regione() {
    let state = loaded();
    assert_eq!(
        regioni(&state),
        ["EMILIA-ROMAGNA", "LAZIO", "LOMBARDIA", "PIEMONTE", "VENETO"]
    );
}

#[test]
fn partial_regione_filter_narrows_view_and_stats() {
    let mut state = loaded();
    state.set_filter(FilterField::Regione, "laz");

    assert_eq!(regioni(&state), ["LAZIO"]);
    let stats = state.stats();
    assert_eq!(stats.ambiti, 1);
    assert_eq!(stats.comuni_total, 121.0);
}

#[test]
fn numero_comuni_sorts_numerically_and_toggles() {
    let mut state = loaded();
    state.sort_by(SortKey::NumeroComuni);
    assert_eq!(comuni(&state), [38.0, 44.0, 60.0, 121.0, 134.0]);

    state.sort_by(SortKey::NumeroComuni);
    assert_eq!(comuni(&state), [134.0, 121.0, 60.0, 44.0, 38.0]);
}

#[test]
fn clearing_filters_restores_the_sorted_view() {
    let mut state = loaded();
    state.sort_by(SortKey::NumeroComuni);
    let before = regioni(&state);

    state.set_filter(FilterField::Ente, "capitale");
    state.set_filter(FilterField::Comune, "fiumicino");
    assert_eq!(regioni(&state), ["LAZIO"]);

    state.clear_filters();
    assert_eq!(regioni(&state), before);
    assert_eq!(state.stats().ambiti, 5);
}

#[test]
fn filters_combine_with_and() {
    let mut state = loaded();
    state.set_filter(FilterField::Regione, "l");
    assert_eq!(regioni(&state), ["EMILIA-ROMAGNA", "LAZIO", "LOMBARDIA"]);

    state.clear_filters();
    state.set_filter(FilterField::Ente, "comune di");
    assert_eq!(
        regioni(&state),
        ["EMILIA-ROMAGNA", "LOMBARDIA", "PIEMONTE", "VENETO"]
    );

    state.set_filter(FilterField::Regione, "l");
    assert_eq!(regioni(&state), ["EMILIA-ROMAGNA", "LOMBARDIA"]);
}

#[test]
fn ties_keep_their_load_order() {
    let mut state = DashboardState::new(&AppConfig::default());
    state.set_data(normalize(
        vec![
            json!({"regione": "UMBRIA", "numeroComuni": 20}),
            json!({"regione": "MARCHE", "numeroComuni": 12}),
            json!({"regione": "ABRUZZO", "numeroComuni": 20}),
            json!({"regione": "MOLISE", "numeroComuni": 12}),
        ],
        1_000,
    ));

    state.sort_by(SortKey::NumeroComuni);
    assert_eq!(regioni(&state), ["MARCHE", "MOLISE", "UMBRIA", "ABRUZZO"]);
    state.sort_by(SortKey::NumeroComuni);
    assert_eq!(regioni(&state), ["UMBRIA", "ABRUZZO", "MARCHE", "MOLISE"]);
}

#[test]
fn expanding_a_row_inserts_its_detail_right_after_it() {
    let mut state = loaded();
    let target = state.filtered().nth(2).map(|record| record.id).expect("five rows");
    assert!(state.toggle_row(target));

    let view = table::render(&state, NumberLocale::Italian);
    let TableBody::Rows(rows) = &view.body else {
        panic!("expected rows, got {:?}", view.body);
    };
    assert_eq!(rows.len(), 6);
    assert_eq!(view.detail_count(), 1);
    match (&rows[2], &rows[3]) {
        (TableRow::Data(data), TableRow::Detail(id, _)) => {
            assert_eq!(data.id, target);
            assert!(data.expanded);
            assert_eq!(*id, target);
        }
        other => panic!("unexpected row pair {other:?}"),
    }

    state.collapse_all();
    assert_eq!(table::render(&state, NumberLocale::Italian).detail_count(), 0);
}

#[test]
fn expansion_survives_filtering_but_not_reload() {
    let mut state = loaded();
    let lazio = state
        .filtered()
        .find(|record| record.regione.as_deref() == Some("LAZIO"))
        .map(|record| record.id)
        .expect("lazio present");
    state.toggle_row(lazio);

    state.set_filter(FilterField::Provincia, "RM");
    assert!(state.is_expanded(lazio));
    assert_eq!(table::render(&state, NumberLocale::Italian).detail_count(), 1);

    state.set_data(normalize(example_records(), 1_000));
    assert_eq!(state.expanded_count(), 0);
}

#[test]
fn json_export_reimports_the_filtered_view() {
    let config = AppConfig::default();
    let mut state = loaded();
    state.set_filter(FilterField::Regione, "l");

    let file = prepare(
        ExportFormat::Json,
        &state,
        &config,
        datetime!(2024-03-05 10:00 UTC),
        NumberLocale::Italian,
    )
    .expect("json export");
    assert!(file.filename.ends_with("_2024-03-05.json"));

    let reimported = normalize(parse_upload(&file.filename, &file.content).expect("import"), 1_000);
    let mut again = DashboardState::new(&config);
    again.set_data(reimported);

    assert_eq!(regioni(&again), regioni(&state));
    assert_eq!(again.stats().comuni_total, state.stats().comuni_total);
}

#[test]
fn aggregated_csv_reimports_counts_and_lists() {
    let config = AppConfig::default();
    let state = loaded();
    let file = prepare(
        ExportFormat::CsvAggregato,
        &state,
        &config,
        datetime!(2024-03-05 10:00 UTC),
        NumberLocale::Italian,
    )
    .expect("csv export");

    let reimported = normalize(parse_upload("ambiti.csv", &file.content).expect("import"), 1_000);
    assert_eq!(reimported.len(), 5);

    let mut again = DashboardState::new(&config);
    again.set_data(reimported);
    assert_eq!(again.stats(), state.stats());

    let lombardia = again
        .records()
        .iter()
        .find(|record| record.regione.as_deref() == Some("LOMBARDIA"))
        .expect("lombardia present");
    assert_eq!(lombardia.comuni, ["MILANO", "MONZA", "BERGAMO", "BRESCIA"]);
    assert_eq!(lombardia.enti.len(), 2);
}

#[test]
fn aggregated_csv_keeps_nested_district_fields() {
    let config = AppConfig::default();
    let mut state = DashboardState::new(&config);
    state.set_data(normalize(
        vec![json!({
            "regione": "LAZIO",
            "nominativoAmbito": "AMBITO RM 5.1",
            "dettaglioEnte": {
                "ente": "COMUNE DI GUIDONIA MONTECELIO",
                "indirizzo": "Piazza Matteotti 20",
                "comuneCapofila": "GUIDONIA MONTECELIO",
                "provincia": "RM"
            },
            "comuniCompetenza": ["GUIDONIA MONTECELIO", "FONTE NUOVA"]
        })],
        1_000,
    ));
    let file = prepare(
        ExportFormat::CsvAggregato,
        &state,
        &config,
        datetime!(2024-03-05 10:00 UTC),
        NumberLocale::Italian,
    )
    .expect("csv export");

    let reimported = normalize(parse_upload("ambiti.csv", &file.content).expect("import"), 1_000);
    let original = &state.records()[0];
    let record = &reimported[0];
    assert_eq!(record.schema, original.schema);
    assert_eq!(record.nominativo.as_deref(), Some("AMBITO RM 5.1"));
    assert_eq!(record.comune_capofila(), Some("GUIDONIA MONTECELIO"));
    assert_eq!(record.ente_gestore, original.ente_gestore);
    assert_eq!(record.comuni, original.comuni);
    assert_eq!(record.numero_comuni, None);

    let mut again = DashboardState::new(&config);
    again.set_data(reimported);
    again.set_filter(FilterField::Ente, "guidonia");
    again.set_filter(FilterField::Comune, "fonte nuova");
    assert_eq!(again.filtered_len(), 1);
}

#[test]
fn empty_view_cannot_be_exported() {
    let mut state = loaded();
    state.set_filter(FilterField::Regione, "atlantide");

    let result = prepare(
        ExportFormat::CsvAggregato,
        &state,
        &AppConfig::default(),
        datetime!(2024-03-05 10:00 UTC),
        NumberLocale::Italian,
    );
    assert!(result.is_err());
}
