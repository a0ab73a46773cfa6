//! Filter, sort and aggregate pipeline.
//!
//! A pure function of `(records, filters, sort)`: it yields the positions of
//! the visible records in display order plus summary statistics computed
//! over exactly those records.

use std::{cmp::Ordering, fmt, str::FromStr};

use serde::Serialize;

use crate::core::collections::distinct_count;
use crate::records::AmbitoRecord;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterField {
    Regione,
    Provincia,
    Ente,
    Comune,
}

/// Active filter values; an empty string disables that filter.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Filters {
    pub regione: String,
    pub provincia: String,
    pub ente: String,
    pub comune: String,
}

impl Filters {
    pub fn get(&self, field: FilterField) -> &str {
        match field {
            FilterField::Regione => &self.regione,
            FilterField::Provincia => &self.provincia,
            FilterField::Ente => &self.ente,
            FilterField::Comune => &self.comune,
        }
    }

    pub fn set(&mut self, field: FilterField, value: impl Into<String>) {
        let value = value.into();
        match field {
            FilterField::Regione => self.regione = value,
            FilterField::Provincia => self.provincia = value,
            FilterField::Ente => self.ente = value,
            FilterField::Comune => self.comune = value,
        }
    }

    pub fn is_empty(&self) -> bool {
        [&self.regione, &self.provincia, &self.ente, &self.comune]
            .iter()
            .all(|value| value.trim().is_empty())
    }

    /// All active filters must match (case-insensitive substring).
    pub fn matches(&self, record: &AmbitoRecord) -> bool {
        let regione = needle(&self.regione);
        let provincia = needle(&self.provincia);
        let ente = needle(&self.ente);
        let comune = needle(&self.comune);

        if let Some(needle) = regione.as_deref() {
            if !contains(record.regione.as_deref(), needle) {
                return false;
            }
        }

        if let Some(needle) = provincia.as_deref() {
            let on_entity = record
                .ente_gestore
                .as_ref()
                .and_then(|e| e.provincia.as_deref());
            if !contains(record.provincia.as_deref(), needle) && !contains(on_entity, needle) {
                return false;
            }
        }

        if let Some(needle) = ente.as_deref() {
            let mut haystack = record.enti.join(" ");
            if let Some(capofila) = record.comune_capofila() {
                haystack.push(' ');
                haystack.push_str(capofila);
            }
            if !contains(Some(&haystack), needle) {
                return false;
            }
        }

        if let Some(needle) = comune.as_deref() {
            let in_list = record
                .comuni
                .iter()
                .any(|comune| contains(Some(comune), needle));
            if !in_list && !contains(record.comune_capofila(), needle) {
                return false;
            }
        }

        true
    }
}

fn needle(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_lowercase())
}

fn contains(haystack: Option<&str>, needle: &str) -> bool {
    haystack
        .map(|value| value.to_lowercase().contains(needle))
        .unwrap_or(false)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

impl SortDirection {
    pub fn toggled(self) -> Self {
        match self {
            Self::Asc => Self::Desc,
            Self::Desc => Self::Asc,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Asc => "asc",
            Self::Desc => "desc",
        }
    }
}

impl FromStr for SortDirection {
    type Err = String;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "asc" => Ok(Self::Asc),
            "desc" => Ok(Self::Desc),
            other => Err(format!("unknown sort direction `{other}`")),
        }
    }
}

/// Sortable table columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SortKey {
    Regione,
    Provincia,
    Ente,
    ComuneCapofila,
    Nominativo,
    NumeroComuni,
    EntiUnici,
    AmbitiUnici,
}

impl SortKey {
    pub const TABLE_COLUMNS: [SortKey; 6] = [
        SortKey::Regione,
        SortKey::Provincia,
        SortKey::Ente,
        SortKey::ComuneCapofila,
        SortKey::Nominativo,
        SortKey::NumeroComuni,
    ];

    pub fn column(self) -> &'static str {
        match self {
            Self::Regione => "regione",
            Self::Provincia => "provincia",
            Self::Ente => "ente",
            Self::ComuneCapofila => "comuneCapofila",
            Self::Nominativo => "nominativoAmbito",
            Self::NumeroComuni => "numeroComuni",
            Self::EntiUnici => "entiUnici",
            Self::AmbitiUnici => "ambitiUnici",
        }
    }

    /// Italian column heading used in exported reports.
    pub fn heading(self) -> &'static str {
        match self {
            Self::Regione => "Regione",
            Self::Provincia => "Provincia",
            Self::Ente => "Ente gestore",
            Self::ComuneCapofila => "Comune capofila",
            Self::Nominativo => "Ambito",
            Self::NumeroComuni => "N. comuni",
            Self::EntiUnici => "Enti unici",
            Self::AmbitiUnici => "Ambiti unici",
        }
    }

    /// Comparable text for a record; absent values read as empty.
    pub fn extract(self, record: &AmbitoRecord) -> String {
        let text = |value: Option<&str>| value.unwrap_or_default().to_string();
        let number = |value: Option<f64>| value.map(|n| n.to_string()).unwrap_or_default();
        match self {
            Self::Regione => text(record.regione.as_deref()),
            Self::Provincia => text(record.provincia_any()),
            Self::Ente => text(record.ente_name()),
            Self::ComuneCapofila => text(record.comune_capofila()),
            Self::Nominativo => text(record.nominativo.as_deref()),
            Self::NumeroComuni => number(record.numero_comuni),
            Self::EntiUnici => number(record.enti_unici),
            Self::AmbitiUnici => number(record.ambiti_unici),
        }
    }
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.column())
    }
}

impl FromStr for SortKey {
    type Err = String;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let key = match raw.trim() {
            "regione" => Self::Regione,
            "provincia" => Self::Provincia,
            "ente" => Self::Ente,
            "comuneCapofila" => Self::ComuneCapofila,
            "nominativoAmbito" => Self::Nominativo,
            "numeroComuni" => Self::NumeroComuni,
            "entiUnici" => Self::EntiUnici,
            "ambitiUnici" => Self::AmbitiUnici,
            other => return Err(format!("unknown sort column `{other}`")),
        };
        Ok(key)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SortConfig {
    pub key: Option<SortKey>,
    pub direction: SortDirection,
}

impl SortConfig {
    /// Header click: same column flips direction, another column restarts ascending.
    pub fn click(&mut self, key: SortKey) {
        if self.key == Some(key) {
            self.direction = self.direction.toggled();
        } else {
            self.key = Some(key);
            self.direction = SortDirection::Asc;
        }
    }

    pub fn direction_for(&self, key: SortKey) -> Option<SortDirection> {
        (self.key == Some(key)).then_some(self.direction)
    }
}

/// Numeric comparison when both sides parse as numbers, text comparison otherwise.
pub fn compare_values(a: &str, b: &str) -> Ordering {
    match (parse_numeric(a), parse_numeric(b)) {
        (Some(x), Some(y)) => x.partial_cmp(&y).unwrap_or(Ordering::Equal),
        _ => a.cmp(b),
    }
}

fn parse_numeric(value: &str) -> Option<f64> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return None;
    }
    trimmed.parse::<f64>().ok().filter(|n| !n.is_nan())
}

/// Summary figures over the visible records.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct SummaryStats {
    pub ambiti: usize,
    /// Sum of declared `numeroComuni`, else listed municipalities per record.
    pub comuni_total: f64,
    pub comuni_distinct: usize,
    pub enti_distinct: usize,
}

/// Output of one pipeline run.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Derived {
    /// Positions into the record list, in display order.
    pub view: Vec<usize>,
    pub stats: SummaryStats,
}

pub fn filter_positions(records: &[AmbitoRecord], filters: &Filters) -> Vec<usize> {
    records
        .iter()
        .enumerate()
        .filter(|(_, record)| filters.matches(record))
        .map(|(position, _)| position)
        .collect()
}

/// Stable sort of `view` by the configured key; no key keeps the order.
pub fn sort_positions(records: &[AmbitoRecord], view: &mut [usize], sort: &SortConfig) {
    let Some(key) = sort.key else {
        return;
    };
    let keys: Vec<String> = records.iter().map(|record| key.extract(record)).collect();
    view.sort_by(|&a, &b| {
        let ordering = compare_values(&keys[a], &keys[b]);
        match sort.direction {
            SortDirection::Asc => ordering,
            SortDirection::Desc => ordering.reverse(),
        }
    });
}

pub fn summarize(records: &[AmbitoRecord], view: &[usize]) -> SummaryStats {
    let visible = || view.iter().map(|&position| &records[position]);
    SummaryStats {
        ambiti: view.len(),
        comuni_total: visible().map(AmbitoRecord::comuni_count).sum(),
        comuni_distinct: distinct_count(
            visible().flat_map(|record| record.comuni.iter().map(String::as_str)),
        ),
        enti_distinct: distinct_count(
            visible().flat_map(|record| record.enti.iter().map(String::as_str)),
        ),
    }
}

pub fn derive(records: &[AmbitoRecord], filters: &Filters, sort: &SortConfig) -> Derived {
    let mut view = filter_positions(records, filters);
    sort_positions(records, &mut view, sort);
    let stats = summarize(records, &view);
    Derived { view, stats }
}
