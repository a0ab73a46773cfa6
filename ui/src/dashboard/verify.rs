//! Self-check of the rendered dashboard against the loaded dataset.

use std::collections::{BTreeSet, HashSet};

use serde_json::Value;

use super::{engine, DashboardState};
use crate::records::AmbitoRecord;

#[derive(Debug, Clone, PartialEq)]
pub enum Issue {
    /// Unfiltered view does not list every record exactly once.
    CountMismatch { expected: usize, shown: usize },
    /// Values present in the data but absent from a filter select.
    FilterMismatch { field: &'static str, missing: Vec<String> },
    StatsMismatch,
    MissingFields { position: usize, label: String, fields: Vec<String> },
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct VerificationReport {
    pub total_records: usize,
    pub shown_records: usize,
    pub issues: Vec<Issue>,
}

impl VerificationReport {
    pub fn is_ok(&self) -> bool {
        self.issues.is_empty()
    }

    pub fn incomplete_records(&self) -> usize {
        self.issues
            .iter()
            .filter(|issue| matches!(issue, Issue::MissingFields { .. }))
            .count()
    }
}

pub fn verify(state: &DashboardState, required_fields: &[String]) -> VerificationReport {
    let records = state.records();
    let mut issues = Vec::new();

    if state.filters().is_empty() {
        let shown: HashSet<_> = state.filtered().map(|record| record.id).collect();
        if shown.len() != records.len() || state.filtered_len() != records.len() {
            issues.push(Issue::CountMismatch {
                expected: records.len(),
                shown: state.filtered_len(),
            });
        }
    }

    let options = state.filter_options();
    let regioni: BTreeSet<&str> = records.iter().filter_map(|r| trimmed(r.regione.as_deref())).collect();
    let province: BTreeSet<&str> = records.iter().filter_map(|r| trimmed(r.provincia_any())).collect();
    for (field, expected, offered) in [
        ("regione", regioni, &options.regioni),
        ("provincia", province, &options.province),
    ] {
        let missing: Vec<String> = expected
            .into_iter()
            .filter(|value| !offered.iter().any(|option| option == value))
            .map(String::from)
            .collect();
        if !missing.is_empty() {
            issues.push(Issue::FilterMismatch { field, missing });
        }
    }

    let positions: Vec<usize> = state
        .filtered()
        .filter_map(|shown| records.iter().position(|record| record.id == shown.id))
        .collect();
    if recount(records, &positions) != state.stats() {
        issues.push(Issue::StatsMismatch);
    }

    for (position, record) in records.iter().enumerate() {
        let fields: Vec<String> = required_fields
            .iter()
            .filter(|field| !has_field(record, field))
            .cloned()
            .collect();
        if !fields.is_empty() {
            issues.push(Issue::MissingFields {
                position,
                label: record.regione.clone().unwrap_or_else(|| format!("#{position}")),
                fields,
            });
        }
    }

    let report = VerificationReport {
        total_records: records.len(),
        shown_records: state.filtered_len(),
        issues,
    };
    if report.is_ok() {
        tracing::info!("Data verification passed for {} records", report.total_records);
    } else {
        for issue in &report.issues {
            tracing::warn!("Data verification: {issue:?}");
        }
    }
    report
}

fn trimmed(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

fn recount(records: &[AmbitoRecord], positions: &[usize]) -> engine::SummaryStats {
    let mut comuni = HashSet::new();
    let mut enti = HashSet::new();
    let mut comuni_total = 0.0;
    for &position in positions {
        let record = &records[position];
        comuni_total += record.comuni_count();
        comuni.extend(record.comuni.iter().map(|c| c.trim()).filter(|c| !c.is_empty()));
        enti.extend(record.enti.iter().map(|e| e.trim()).filter(|e| !e.is_empty()));
    }
    engine::SummaryStats {
        ambiti: positions.len(),
        comuni_total,
        comuni_distinct: comuni.len(),
        enti_distinct: enti.len(),
    }
}

/// Known fields resolve through the normalized record, others through the source.
fn has_field(record: &AmbitoRecord, field: &str) -> bool {
    match field {
        "regione" => trimmed(record.regione.as_deref()).is_some(),
        "provincia" => trimmed(record.provincia_any()).is_some(),
        "numeroComuni" => record.numero_comuni.is_some() || !record.comuni.is_empty(),
        "entiUnici" => record.enti_unici.is_some() || !record.enti.is_empty(),
        "ente" => trimmed(record.ente_name()).is_some(),
        other => match record.source.get(other) {
            None | Some(Value::Null) => false,
            Some(Value::String(text)) => !text.trim().is_empty(),
            Some(Value::Array(items)) => !items.is_empty(),
            Some(_) => true,
        },
    }
}
