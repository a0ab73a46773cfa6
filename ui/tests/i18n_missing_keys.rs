use std::collections::{BTreeMap, BTreeSet};

/// Translation completeness test.
/// Every non-fallback locale must define the keys of the fallback (en-US)
/// `ambiti_ui.ftl`, and use the same `$variables` in each message.
///
/// The parser is a line heuristic: comments and blank lines are skipped,
/// `key = value` lines define messages, continuation lines are ignored.
///
/// To add a locale create `ui/i18n/<locale>/ambiti_ui.ftl`, copy the keys
/// from `en-US/ambiti_ui.ftl` and register it below.
const EN_US: &str = include_str!("../i18n/en-US/ambiti_ui.ftl");
const IT_IT: &str = include_str!("../i18n/it-IT/ambiti_ui.ftl");

const LOCALES: &[(&str, &str)] = &[("it-IT", IT_IT)];

#[test]
fn all_locales_have_all_fallback_keys() {
    let fallback = parse_messages(EN_US, "en-US");
    assert!(!fallback.is_empty(), "Fallback (en-US) contains no keys.");

    let mut failures = Vec::new();
    for (locale, src) in LOCALES {
        let messages = parse_messages(src, locale);
        let missing: Vec<&str> = fallback
            .keys()
            .filter(|key| !messages.contains_key(*key))
            .map(String::as_str)
            .collect();
        if !missing.is_empty() {
            failures.push(format!(
                "Locale {locale} is missing {} key(s):\n  {}",
                missing.len(),
                missing.join("\n  ")
            ));
        }
    }

    if !failures.is_empty() {
        panic!(
            "Translation completeness check failed:\n\n{}\n\nHint: copy the missing keys from en-US, then translate.",
            failures.join("\n\n")
        );
    }
}

#[test]
fn translations_use_the_fallback_variables() {
    let fallback = parse_messages(EN_US, "en-US");
    for (locale, src) in LOCALES {
        for (key, value) in parse_messages(src, locale) {
            if let Some(reference) = fallback.get(&key) {
                assert_eq!(
                    variables(reference),
                    variables(&value),
                    "{locale} `{key}` uses different variables than en-US"
                );
            }
        }
    }
}

/// Message key to value. Panics on duplicate definitions.
fn parse_messages(src: &str, locale: &str) -> BTreeMap<String, String> {
    let mut messages = BTreeMap::new();
    let mut dups = BTreeSet::new();

    for raw in src.lines() {
        if raw.starts_with(char::is_whitespace) {
            continue;
        }
        let line = raw.trim();
        if line.is_empty() || line.starts_with('#') || line.starts_with('.') {
            continue;
        }
        let Some((left, right)) = line.split_once('=') else {
            continue;
        };
        let key = left.trim();
        if key.is_empty() || key.contains(char::is_whitespace) || key.starts_with(['[', '@']) {
            continue;
        }
        if messages
            .insert(key.to_string(), right.trim().to_string())
            .is_some()
        {
            dups.insert(format!("{key}  (line: \"{raw}\")"));
        }
    }

    if !dups.is_empty() {
        panic!(
            "Duplicate key definitions in {locale}:\n  {}",
            dups.into_iter().collect::<Vec<_>>().join("\n  ")
        );
    }
    messages
}

fn variables(value: &str) -> BTreeSet<String> {
    value
        .split('$')
        .skip(1)
        .map(|rest| {
            rest.chars()
                .take_while(|c| c.is_ascii_alphanumeric() || *c == '_' || *c == '-')
                .collect()
        })
        .collect()
}
