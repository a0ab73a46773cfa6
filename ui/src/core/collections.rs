//! Grouping and de-duplication helpers over record fields.

use std::collections::{BTreeSet, HashMap};

/// Sorted, de-duplicated, non-blank values.
pub fn unique_sorted<'a, I>(values: I) -> Vec<String>
where
    I: IntoIterator<Item = &'a str>,
{
    values
        .into_iter()
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// Number of distinct non-blank values.
pub fn distinct_count<'a, I>(values: I) -> usize
where
    I: IntoIterator<Item = &'a str>,
{
    values
        .into_iter()
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .collect::<BTreeSet<_>>()
        .len()
}

/// Counts occurrences per value, ordered by count descending.
/// Equal counts keep the order in which values were first seen.
pub fn frequency_table<'a, I>(values: I) -> Vec<(String, usize)>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut slots: HashMap<&'a str, usize> = HashMap::new();
    let mut table: Vec<(String, usize)> = Vec::new();
    for value in values {
        let value = value.trim();
        if value.is_empty() {
            continue;
        }
        match slots.get(value) {
            Some(&slot) => table[slot].1 += 1,
            None => {
                slots.insert(value, table.len());
                table.push((value.to_string(), 1));
            }
        }
    }
    table.sort_by(|a, b| b.1.cmp(&a.1));
    table
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unique_sorted_drops_blanks_and_duplicates() {
        let values = ["VE", "", "RM", "VE", " RM "];
        assert_eq!(unique_sorted(values), vec!["RM".to_string(), "VE".to_string()]);
        assert_eq!(distinct_count(values), 2);
    }

    #[test]
    fn frequency_is_descending_and_stable() {
        let table = frequency_table(["B", "A", "B", "C", "A", "D"]);
        assert_eq!(
            table,
            vec![
                ("B".to_string(), 2),
                ("A".to_string(), 2),
                ("C".to_string(), 1),
                ("D".to_string(), 1),
            ]
        );
    }
}
