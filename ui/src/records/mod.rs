//! Normalized ambito records.
//!
//! Source records come in two layouts (see [`schema`]); each one is
//! resolved exactly once, when a dataset is loaded, into [`AmbitoRecord`].
//! Filtering, sorting, rendering and export then read a single shape.

pub mod dataset;
pub mod schema;

use serde_json::Value;
use uuid::Uuid;

pub use schema::SchemaVariant;
use schema::SourceRecord;

/// Stable identity assigned at load time; survives filtering and sorting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RecordId(Uuid);

impl RecordId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for RecordId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for RecordId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0.simple())
    }
}

/// Managing entity of an ambito.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EnteGestore {
    pub ente: Option<String>,
    pub indirizzo: Option<String>,
    pub comune_capofila: Option<String>,
    pub provincia: Option<String>,
}

/// One row of the per-municipality detail table.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DettaglioSede {
    pub ente: Option<String>,
    pub indirizzo: Option<String>,
    pub comune: Option<String>,
    pub cap: Option<String>,
    pub codice: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AmbitoRecord {
    pub id: RecordId,
    pub schema: SchemaVariant,
    pub regione: Option<String>,
    pub provincia: Option<String>,
    pub nominativo: Option<String>,
    pub ente_gestore: Option<EnteGestore>,
    /// Managing entity names: `entiDistinti` (flat) or the nested `dettaglioEnte.ente`.
    pub enti: Vec<String>,
    /// Competent municipalities: `comuniCompetenza` (nested) or `comuniDistinti` (flat).
    pub comuni: Vec<String>,
    pub dettagli: Vec<DettaglioSede>,
    pub numero_comuni: Option<f64>,
    pub enti_unici: Option<f64>,
    pub ambiti_unici: Option<f64>,
    /// The record exactly as loaded, used for JSON export.
    pub source: Value,
}

impl AmbitoRecord {
    pub fn from_value(source: Value) -> Self {
        let mut record = Self {
            id: RecordId::new(),
            schema: SchemaVariant::Unknown,
            regione: None,
            provincia: None,
            nominativo: None,
            ente_gestore: None,
            enti: Vec::new(),
            comuni: Vec::new(),
            dettagli: Vec::new(),
            numero_comuni: None,
            enti_unici: None,
            ambiti_unici: None,
            source: Value::Null,
        };

        let parsed = SourceRecord::parse(&source);
        record.schema = parsed.variant();
        match parsed {
            SourceRecord::Nested(nested) => {
                record.regione = nested.common.regione;
                record.provincia = nested.common.provincia;
                record.nominativo = nested.nominativo_ambito;
                record.numero_comuni = nested.numero_comuni;
                record.comuni = nested.comuni_competenza;

                let ente = nested.dettaglio_ente.map(|d| EnteGestore {
                    ente: d.ente,
                    indirizzo: d.indirizzo,
                    comune_capofila: d.comune_capofila,
                    provincia: d.provincia,
                });
                if let Some(name) = ente.as_ref().and_then(|e| e.ente.clone()) {
                    record.enti.push(name);
                }
                let ente_name = ente.as_ref().and_then(|e| e.ente.clone());
                record.dettagli = nested
                    .dettagli_comuni
                    .into_iter()
                    .map(|d| DettaglioSede {
                        ente: ente_name.clone(),
                        indirizzo: None,
                        comune: d.comune,
                        cap: d.cap,
                        codice: d.codice,
                    })
                    .collect();
                record.ente_gestore = ente;
            }
            SourceRecord::Flat(flat) => {
                record.regione = flat.common.regione;
                record.provincia = flat.common.provincia;
                record.numero_comuni = flat.numero_comuni;
                record.enti_unici = flat.enti_unici;
                record.ambiti_unici = flat.ambiti_unici;
                record.enti = flat.enti_distinti;
                record.comuni = flat.comuni_distinti;
                record.ente_gestore = flat.dettagli_enti.first().map(|d| EnteGestore {
                    ente: d.ente.clone().or_else(|| record.enti.first().cloned()),
                    indirizzo: d.indirizzo.clone(),
                    comune_capofila: d.comune_ambito.clone(),
                    provincia: None,
                });
                record.dettagli = flat
                    .dettagli_enti
                    .into_iter()
                    .map(|d| DettaglioSede {
                        ente: d.ente,
                        indirizzo: d.indirizzo,
                        comune: d.comune_ambito,
                        cap: d.cap,
                        codice: d.codice,
                    })
                    .collect();
            }
            SourceRecord::Unknown(common) => {
                record.regione = common.regione;
                record.provincia = common.provincia;
            }
        }

        record.source = source;
        record
    }

    /// Province from the record itself, else from the managing entity.
    pub fn provincia_any(&self) -> Option<&str> {
        self.provincia.as_deref().or_else(|| {
            self.ente_gestore
                .as_ref()
                .and_then(|e| e.provincia.as_deref())
        })
    }

    pub fn ente_name(&self) -> Option<&str> {
        self.ente_gestore
            .as_ref()
            .and_then(|e| e.ente.as_deref())
            .or_else(|| self.enti.first().map(String::as_str))
    }

    pub fn comune_capofila(&self) -> Option<&str> {
        self.ente_gestore
            .as_ref()
            .and_then(|e| e.comune_capofila.as_deref())
    }

    /// Declared `numeroComuni`, else the number of listed municipalities.
    pub fn comuni_count(&self) -> f64 {
        self.numero_comuni.unwrap_or(self.comuni.len() as f64)
    }

    /// Declared `entiUnici`, else the number of listed entities.
    pub fn enti_count(&self) -> f64 {
        self.enti_unici.unwrap_or(self.enti.len() as f64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn nested_record_normalizes() {
        let record = AmbitoRecord::from_value(json!({
            "regione": "LAZIO",
            "nominativoAmbito": "AMBITO RM 5.1",
            "dettaglioEnte": {
                "ente": "COMUNE DI GUIDONIA",
                "indirizzo": "Piazza Matteotti 20",
                "comuneCapofila": "GUIDONIA MONTECELIO",
                "provincia": "RM"
            },
            "comuniCompetenza": ["GUIDONIA MONTECELIO", "FONTE NUOVA"],
            "dettagliComuni": [{"comune": "FONTE NUOVA", "cap": "00013", "codice": "M309"}]
        }));
        assert_eq!(record.schema, SchemaVariant::Nested);
        assert_eq!(record.provincia, None);
        assert_eq!(record.provincia_any(), Some("RM"));
        assert_eq!(record.ente_name(), Some("COMUNE DI GUIDONIA"));
        assert_eq!(record.comune_capofila(), Some("GUIDONIA MONTECELIO"));
        assert_eq!(record.enti, vec!["COMUNE DI GUIDONIA".to_string()]);
        assert_eq!(record.comuni_count(), 2.0);
        assert_eq!(record.dettagli[0].ente.as_deref(), Some("COMUNE DI GUIDONIA"));
        assert_eq!(record.dettagli[0].codice.as_deref(), Some("M309"));
    }

    #[test]
    fn flat_record_normalizes() {
        let record = AmbitoRecord::from_value(json!({
            "regione": "VENETO",
            "provincia": "VE",
            "numeroComuni": 44,
            "entiUnici": 3,
            "entiDistinti": ["COMUNE DI VENEZIA", "UNIONE VENEZIANA"],
            "comuniDistinti": ["VENEZIA", "MIRA"],
            "dettagliEnti": [{
                "ente": "COMUNE DI VENEZIA",
                "indirizzo": "Ca' Farsetti",
                "comuneAmbito": "VENEZIA",
                "cap": "30124",
                "codice": "L736"
            }]
        }));
        assert_eq!(record.schema, SchemaVariant::Flat);
        assert_eq!(record.comuni_count(), 44.0);
        assert_eq!(record.enti_count(), 3.0);
        assert_eq!(record.comune_capofila(), Some("VENEZIA"));
        assert_eq!(record.dettagli[0].comune.as_deref(), Some("VENEZIA"));
    }

    #[test]
    fn anything_else_normalizes_to_empty() {
        let record = AmbitoRecord::from_value(json!(42));
        assert_eq!(record.schema, SchemaVariant::Unknown);
        assert_eq!(record.regione, None);
        assert_eq!(record.ente_name(), None);
        assert_eq!(record.comuni_count(), 0.0);
        assert_eq!(record.source, json!(42));
    }

    #[test]
    fn ids_are_unique() {
        let a = AmbitoRecord::from_value(json!({}));
        let b = AmbitoRecord::from_value(json!({}));
        assert_ne!(a.id, b.id);
    }
}
