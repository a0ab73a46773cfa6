//! Source shapes of an ambito as found in `data.json` or an imported file.
//!
//! Two layouts exist: the older flat one (counts plus `entiDistinti`,
//! `comuniDistinti`, `dettagliEnti`) and the newer nested one
//! (`dettaglioEnte`, `comuniCompetenza`, `dettagliComuni`). Every field is
//! optional and deserialized leniently: a value of the wrong type reads as
//! absent instead of failing the record.

use serde::{de::DeserializeOwned, Deserialize, Deserializer};
use serde_json::{Map, Value};

use crate::core::csv::CsvRow;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchemaVariant {
    Flat,
    Nested,
    Unknown,
}

const NESTED_KEYS: &[&str] = &[
    "dettaglioEnte",
    "comuniCompetenza",
    "nominativoAmbito",
    "dettagliComuni",
];

const FLAT_KEYS: &[&str] = &[
    "numeroComuni",
    "entiUnici",
    "ambitiUnici",
    "entiDistinti",
    "comuniDistinti",
    "dettagliEnti",
];

impl SchemaVariant {
    pub fn detect(value: &Value) -> Self {
        let Some(object) = value.as_object() else {
            return Self::Unknown;
        };
        if NESTED_KEYS.iter().any(|key| object.contains_key(*key)) {
            Self::Nested
        } else if FLAT_KEYS.iter().any(|key| object.contains_key(*key)) {
            Self::Flat
        } else {
            Self::Unknown
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Common {
    #[serde(deserialize_with = "text")]
    pub regione: Option<String>,
    #[serde(deserialize_with = "text")]
    pub provincia: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct DettaglioEnteFlat {
    #[serde(deserialize_with = "text")]
    pub ente: Option<String>,
    #[serde(deserialize_with = "text")]
    pub indirizzo: Option<String>,
    #[serde(deserialize_with = "text")]
    pub comune_ambito: Option<String>,
    #[serde(deserialize_with = "text")]
    pub cap: Option<String>,
    #[serde(deserialize_with = "text")]
    pub codice: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct FlatAmbito {
    #[serde(flatten)]
    pub common: Common,
    #[serde(deserialize_with = "number")]
    pub numero_comuni: Option<f64>,
    #[serde(deserialize_with = "number")]
    pub enti_unici: Option<f64>,
    #[serde(deserialize_with = "number")]
    pub ambiti_unici: Option<f64>,
    #[serde(deserialize_with = "texts")]
    pub enti_distinti: Vec<String>,
    #[serde(deserialize_with = "texts")]
    pub comuni_distinti: Vec<String>,
    #[serde(deserialize_with = "objects")]
    pub dettagli_enti: Vec<DettaglioEnteFlat>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct DettaglioEnte {
    #[serde(deserialize_with = "text")]
    pub ente: Option<String>,
    #[serde(deserialize_with = "text")]
    pub indirizzo: Option<String>,
    #[serde(deserialize_with = "text")]
    pub comune_capofila: Option<String>,
    #[serde(deserialize_with = "text")]
    pub provincia: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct DettaglioComune {
    #[serde(deserialize_with = "text")]
    pub comune: Option<String>,
    #[serde(deserialize_with = "text")]
    pub cap: Option<String>,
    #[serde(deserialize_with = "text")]
    pub codice: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct NestedAmbito {
    #[serde(flatten)]
    pub common: Common,
    #[serde(deserialize_with = "text")]
    pub nominativo_ambito: Option<String>,
    #[serde(deserialize_with = "object")]
    pub dettaglio_ente: Option<DettaglioEnte>,
    #[serde(deserialize_with = "texts")]
    pub comuni_competenza: Vec<String>,
    #[serde(deserialize_with = "objects")]
    pub dettagli_comuni: Vec<DettaglioComune>,
    #[serde(deserialize_with = "number")]
    pub numero_comuni: Option<f64>,
}

/// Aggregated CSV columns that only nested records fill.
const NESTED_CSV_MARKERS: &[&str] = &["nominativoAmbito", "comuneCapofila"];

/// CSV column to `dettaglioEnte` field.
const ENTE_CSV_COLUMNS: &[(&str, &str)] = &[
    ("ente", "ente"),
    ("indirizzo", "indirizzo"),
    ("comuneCapofila", "comuneCapofila"),
    ("provincia", "provincia"),
];

/// Rebuilds a source record from one CSV row.
///
/// Blank cells are dropped. A row naming a district or a lead municipality
/// was written from a nested record: its entity columns go back into
/// `dettaglioEnte` and `comuniDistinti` back into `comuniCompetenza`.
/// Any other row keeps its columns as they are.
pub fn from_csv_row(row: CsvRow) -> Value {
    let mut object: Map<String, Value> = row
        .into_iter()
        .filter(|(_, value)| !value.trim().is_empty())
        .map(|(key, value)| (key, Value::String(value)))
        .collect();

    if !NESTED_CSV_MARKERS.iter().any(|key| object.contains_key(*key)) {
        return Value::Object(object);
    }

    let mut ente = Map::new();
    for (column, field) in ENTE_CSV_COLUMNS {
        if let Some(value) = object.remove(*column) {
            ente.insert((*field).to_string(), value);
        }
    }
    if let Some(comuni) = object.remove("comuniDistinti") {
        object.insert("comuniCompetenza".into(), comuni);
    }
    object.remove("entiDistinti");
    object.insert("dettaglioEnte".into(), Value::Object(ente));
    Value::Object(object)
}

/// A source record resolved to one of the known layouts.
#[derive(Debug, Clone)]
pub enum SourceRecord {
    Flat(FlatAmbito),
    Nested(NestedAmbito),
    Unknown(Common),
}

impl SourceRecord {
    pub fn parse(value: &Value) -> Self {
        match SchemaVariant::detect(value) {
            SchemaVariant::Nested => Self::Nested(lenient_from(value)),
            SchemaVariant::Flat => Self::Flat(lenient_from(value)),
            SchemaVariant::Unknown => Self::Unknown(lenient_from(value)),
        }
    }

    pub fn variant(&self) -> SchemaVariant {
        match self {
            Self::Flat(_) => SchemaVariant::Flat,
            Self::Nested(_) => SchemaVariant::Nested,
            Self::Unknown(_) => SchemaVariant::Unknown,
        }
    }
}

fn lenient_from<T: DeserializeOwned + Default>(value: &Value) -> T {
    if value.is_object() {
        T::deserialize(value).unwrap_or_default()
    } else {
        T::default()
    }
}

/// Text of a scalar: strings are trimmed, numbers and booleans stringified, blanks dropped.
pub(crate) fn scalar_text(value: &Value) -> Option<String> {
    let text = match value {
        Value::String(s) => s.trim().to_string(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        _ => return None,
    };
    (!text.is_empty()).then_some(text)
}

/// Finite number from a JSON number or a numeric string.
pub(crate) fn scalar_number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }
    .filter(|n| n.is_finite())
}

fn text<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<String>, D::Error> {
    Ok(scalar_text(&Value::deserialize(deserializer)?))
}

fn number<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<f64>, D::Error> {
    Ok(scalar_number(&Value::deserialize(deserializer)?))
}

/// Arrays of scalars, or a `;`-separated string as written by the CSV export.
fn texts<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<String>, D::Error> {
    Ok(match Value::deserialize(deserializer)? {
        Value::Array(items) => items.iter().filter_map(scalar_text).collect(),
        Value::String(joined) => joined
            .split(';')
            .map(str::trim)
            .filter(|part| !part.is_empty())
            .map(String::from)
            .collect(),
        _ => Vec::new(),
    })
}

fn object<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned + Default,
{
    let value = Value::deserialize(deserializer)?;
    Ok(value.is_object().then(|| lenient_from(&value)))
}

fn objects<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned + Default,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::Array(items) => items
            .iter()
            .filter(|item| item.is_object())
            .map(lenient_from)
            .collect(),
        _ => Vec::new(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn detects_variants() {
        assert_eq!(
            SchemaVariant::detect(&json!({"dettaglioEnte": {}})),
            SchemaVariant::Nested
        );
        assert_eq!(
            SchemaVariant::detect(&json!({"numeroComuni": 3})),
            SchemaVariant::Flat
        );
        assert_eq!(
            SchemaVariant::detect(&json!({"regione": "LAZIO"})),
            SchemaVariant::Unknown
        );
        assert_eq!(SchemaVariant::detect(&json!("LAZIO")), SchemaVariant::Unknown);
    }

    #[test]
    fn wrong_types_read_as_absent_and_joined_lists_split() {
        let record = SourceRecord::parse(&json!({
            "regione": ["not", "a", "string"],
            "numeroComuni": "121",
            "entiUnici": "many",
            "entiDistinti": "ROMA CAPITALE; CITTÀ METROPOLITANA",
            "comuniDistinti": {"ROMA": true},
            "dettagliEnti": [{"ente": "ROMA CAPITALE", "cap": 186}, "junk"]
        }));
        let SourceRecord::Flat(flat) = record else {
            panic!("expected flat record");
        };
        assert_eq!(flat.common.regione, None);
        assert_eq!(flat.numero_comuni, Some(121.0));
        assert_eq!(flat.enti_unici, None);
        assert_eq!(flat.enti_distinti, vec!["ROMA CAPITALE", "CITTÀ METROPOLITANA"]);
        assert!(flat.comuni_distinti.is_empty());
        assert_eq!(flat.dettagli_enti.len(), 1);
        assert_eq!(flat.dettagli_enti[0].cap.as_deref(), Some("186"));
    }

    #[test]
    fn nested_entity_must_be_an_object() {
        let record = SourceRecord::parse(&json!({
            "dettaglioEnte": "COMUNE DI ROMA",
            "comuniCompetenza": ["ROMA", 12, null, " "]
        }));
        let SourceRecord::Nested(nested) = record else {
            panic!("expected nested record");
        };
        assert!(nested.dettaglio_ente.is_none());
        assert_eq!(nested.comuni_competenza, vec!["ROMA".to_string(), "12".to_string()]);
    }

    #[test]
    fn csv_row_with_district_name_rebuilds_nested_entity() {
        let row: CsvRow = [
            ("regione", "LAZIO"),
            ("provincia", "RM"),
            ("nominativoAmbito", "AMBITO RM 5.1"),
            ("comuneCapofila", "GUIDONIA MONTECELIO"),
            ("ente", "COMUNE DI GUIDONIA"),
            ("indirizzo", "Piazza Matteotti 20"),
            ("numeroComuni", ""),
            ("entiDistinti", ""),
            ("comuniDistinti", "GUIDONIA MONTECELIO; FONTE NUOVA"),
        ]
        .into_iter()
        .map(|(key, value)| (key.to_string(), value.to_string()))
        .collect();

        let value = from_csv_row(row);
        assert_eq!(value["dettaglioEnte"]["comuneCapofila"], "GUIDONIA MONTECELIO");
        assert_eq!(value["dettaglioEnte"]["provincia"], "RM");
        assert!(value.get("numeroComuni").is_none());

        let SourceRecord::Nested(nested) = SourceRecord::parse(&value) else {
            panic!("expected nested record");
        };
        assert_eq!(nested.nominativo_ambito.as_deref(), Some("AMBITO RM 5.1"));
        assert_eq!(nested.comuni_competenza, vec!["GUIDONIA MONTECELIO", "FONTE NUOVA"]);
    }

    #[test]
    fn csv_row_without_district_stays_flat() {
        let row: CsvRow = vec![
            ("regione".to_string(), "VENETO".to_string()),
            ("numeroComuni".to_string(), "44".to_string()),
            ("ente".to_string(), "COMUNE DI VENEZIA".to_string()),
            ("nominativoAmbito".to_string(), " ".to_string()),
        ];
        let value = from_csv_row(row);
        assert_eq!(SchemaVariant::detect(&value), SchemaVariant::Flat);
        assert_eq!(value["ente"], "COMUNE DI VENEZIA");
    }

    #[test]
    fn non_finite_numbers_are_absent() {
        assert_eq!(scalar_number(&json!("NaN")), None);
        assert_eq!(scalar_number(&json!("inf")), None);
        assert_eq!(scalar_number(&json!(" 44 ")), Some(44.0));
    }
}
