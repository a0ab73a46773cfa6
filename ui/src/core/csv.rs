//! Minimal CSV writer and reader matching the dashboard's export format.
//!
//! The writer quotes every field and doubles embedded quotes. The reader is
//! a plain comma split: it strips one pair of surrounding quotes and undoes
//! quote doubling, but a comma inside a quoted field still splits it.

/// One output row as ordered `(column, value)` pairs.
pub type CsvRow = Vec<(String, String)>;

/// Serializes rows using the columns of the first row as the header.
/// Later rows are looked up by column name; missing columns are empty.
pub fn to_csv(rows: &[CsvRow]) -> String {
    let Some(first) = rows.first() else {
        return String::new();
    };
    let headers: Vec<&str> = first.iter().map(|(key, _)| key.as_str()).collect();

    let mut lines = Vec::with_capacity(rows.len() + 1);
    lines.push(headers.join(","));
    for row in rows {
        let line = headers
            .iter()
            .map(|header| {
                let value = row
                    .iter()
                    .find(|(key, _)| key == header)
                    .map(|(_, value)| value.as_str())
                    .unwrap_or("");
                quote(value)
            })
            .collect::<Vec<_>>()
            .join(",");
        lines.push(line);
    }
    lines.join("\n")
}

fn quote(value: &str) -> String {
    format!("\"{}\"", value.replace('"', "\"\""))
}

/// Parses a header line plus data lines into `(column, value)` rows.
/// Blank lines are skipped; short lines pad with empty values.
pub fn parse_csv(text: &str) -> Vec<CsvRow> {
    let mut lines = text.lines();
    let Some(header_line) = lines.next() else {
        return Vec::new();
    };
    let headers: Vec<String> = header_line.split(',').map(unquote).collect();

    lines
        .filter(|line| !line.trim().is_empty())
        .map(|line| {
            let values: Vec<String> = line.split(',').map(unquote).collect();
            headers
                .iter()
                .enumerate()
                .map(|(idx, header)| {
                    (header.clone(), values.get(idx).cloned().unwrap_or_default())
                })
                .collect()
        })
        .collect()
}

fn unquote(raw: &str) -> String {
    let trimmed = raw.trim();
    let inner = trimmed
        .strip_prefix('"')
        .and_then(|rest| rest.strip_suffix('"'))
        .unwrap_or(trimmed);
    inner.replace("\"\"", "\"")
}
