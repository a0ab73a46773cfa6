//! Dataset documents: envelope unwrapping, normalization and the built-in example set.

use serde_json::{json, Value};

use super::AmbitoRecord;
use crate::core::error::Result;

/// Record list inside a loaded document.
///
/// Tries `ambiti_territoriali`, then `data`, then the document itself; a
/// lone object becomes a one-element list. `null` yields nothing.
pub fn extract_records(document: Value) -> Vec<Value> {
    let payload = match document {
        Value::Object(mut object) => {
            if let Some(inner) = object.remove("ambiti_territoriali").filter(present) {
                inner
            } else if let Some(inner) = object.remove("data").filter(present) {
                inner
            } else {
                Value::Object(object)
            }
        }
        other => other,
    };

    match payload {
        Value::Array(items) => items,
        Value::Null => Vec::new(),
        single => vec![single],
    }
}

fn present(value: &Value) -> bool {
    !matches!(value, Value::Null | Value::Bool(false))
}

pub fn parse_document(text: &str) -> Result<Vec<Value>> {
    let document: Value = serde_json::from_str(text)?;
    Ok(extract_records(document))
}

/// Normalizes every source record, keeping at most `max_records`.
pub fn normalize(values: Vec<Value>, max_records: usize) -> Vec<AmbitoRecord> {
    if values.len() > max_records {
        tracing::warn!(
            "Dataset has {} records, keeping the first {max_records}",
            values.len()
        );
    }
    values
        .into_iter()
        .take(max_records)
        .map(AmbitoRecord::from_value)
        .collect()
}

/// Small flat-layout dataset shown when `data.json` cannot be loaded.
pub fn example_records() -> Vec<Value> {
    vec![
        json!({
            "regione": "PIEMONTE",
            "provincia": "TO",
            "numeroComuni": 38,
            "entiUnici": 2,
            "ambitiUnici": 2,
            "entiDistinti": ["COMUNE DI TORINO", "CONSORZIO INTERCOMUNALE"],
            "comuniDistinti": ["TORINO", "MONCALIERI", "COLLEGNO", "RIVOLI"],
            "dettagliEnti": [{
                "ente": "COMUNE DI TORINO",
                "indirizzo": "Piazza Palazzo di Città 1",
                "comuneAmbito": "TORINO",
                "cap": "10122",
                "codice": "L219"
            }]
        }),
        json!({
            "regione": "LOMBARDIA",
            "provincia": "MI",
            "numeroComuni": 134,
            "entiUnici": 8,
            "ambitiUnici": 12,
            "entiDistinti": ["COMUNE DI MILANO", "CITTÀ METROPOLITANA"],
            "comuniDistinti": ["MILANO", "MONZA", "BERGAMO", "BRESCIA"],
            "dettagliEnti": [{
                "ente": "COMUNE DI MILANO",
                "indirizzo": "Piazza della Scala 2",
                "comuneAmbito": "MILANO",
                "cap": "20121",
                "codice": "F205"
            }]
        }),
        json!({
            "regione": "LAZIO",
            "provincia": "RM",
            "numeroComuni": 121,
            "entiUnici": 5,
            "ambitiUnici": 8,
            "entiDistinti": ["ROMA CAPITALE", "CITTÀ METROPOLITANA DI ROMA"],
            "comuniDistinti": ["ROMA", "FIUMICINO", "TIVOLI", "FRASCATI"],
            "dettagliEnti": [{
                "ente": "ROMA CAPITALE",
                "indirizzo": "Piazza del Campidoglio 1",
                "comuneAmbito": "ROMA",
                "cap": "00186",
                "codice": "H501"
            }]
        }),
        json!({
            "regione": "VENETO",
            "provincia": "VE",
            "numeroComuni": 44,
            "entiUnici": 3,
            "ambitiUnici": 4,
            "entiDistinti": ["COMUNE DI VENEZIA", "UNIONE VENEZIANA"],
            "comuniDistinti": ["VENEZIA", "MESTRE", "CHIOGGIA", "MIRA"],
            "dettagliEnti": [{
                "ente": "COMUNE DI VENEZIA",
                "indirizzo": "Ca' Farsetti",
                "comuneAmbito": "VENEZIA",
                "cap": "30124",
                "codice": "L736"
            }]
        }),
        json!({
            "regione": "EMILIA-ROMAGNA",
            "provincia": "BO",
            "numeroComuni": 60,
            "entiUnici": 4,
            "ambitiUnici": 6,
            "entiDistinti": ["COMUNE DI BOLOGNA", "CITTÀ METROPOLITANA BOLOGNA"],
            "comuniDistinti": ["BOLOGNA", "IMOLA", "CASALECCHIO", "FAENZA"],
            "dettagliEnti": [{
                "ente": "COMUNE DI BOLOGNA",
                "indirizzo": "Piazza Maggiore 6",
                "comuneAmbito": "BOLOGNA",
                "cap": "40124",
                "codice": "A944"
            }]
        }),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn envelope_priority() {
        let both = json!({"ambiti_territoriali": [{"regione": "A"}], "data": [{}, {}]});
        assert_eq!(extract_records(both).len(), 1);

        let data_only = json!({"data": [{}, {}]});
        assert_eq!(extract_records(data_only).len(), 2);

        let bare_array = json!([{}, {}, {}]);
        assert_eq!(extract_records(bare_array).len(), 3);
    }

    #[test]
    fn lone_object_is_wrapped() {
        let records = extract_records(json!({"regione": "LAZIO"}));
        assert_eq!(records, vec![json!({"regione": "LAZIO"})]);

        let inner_object = extract_records(json!({"ambiti_territoriali": {"regione": "LAZIO"}}));
        assert_eq!(inner_object, vec![json!({"regione": "LAZIO"})]);
    }

    #[test]
    fn null_envelope_falls_through() {
        let records = extract_records(json!({"ambiti_territoriali": null, "data": [{}]}));
        assert_eq!(records.len(), 1);
        assert!(extract_records(Value::Null).is_empty());
    }

    #[test]
    fn malformed_json_is_an_error() {
        assert!(parse_document("{not json").is_err());
    }

    #[test]
    fn normalize_caps_record_count() {
        let records = normalize(example_records(), 3);
        assert_eq!(records.len(), 3);
        assert_eq!(records[2].regione.as_deref(), Some("LAZIO"));
    }
}
