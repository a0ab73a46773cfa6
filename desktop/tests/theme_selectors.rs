#![cfg(test)]
/*!
Theme selector lint for the desktop build.

Checks that the selectors the shared dashboard components rely on remain in
the unified theme (`ui/assets/theme/main.css`), so a refactor cannot silently
drop styling from packaged desktop builds.

If you rename or remove a selector:
    1. Update the Dioxus component markup.
    2. Adjust REQUIRED_SELECTORS accordingly.

A substring check is enough as an early warning; no CSS parser is pulled in.
*/

const THEME_CSS: &str = include_str!(concat!(
    env!("CARGO_MANIFEST_DIR"),
    "/../ui/assets/theme/main.css"
));

/// Core selectors / tokens that must exist in the shared theme for desktop.
const REQUIRED_SELECTORS: &[&str] = &[
    // Global / layout
    ":root",
    "body {",
    ".app-shell",
    ".app-shell--compact",
    ".page {",
    ".visually-hidden",
    // Buttons & cards
    ".button {",
    ".button--primary",
    ".button--ghost",
    ".card {",
    ".card__header",
    ".card__meta--error",
    ".card__placeholder",
    // Summary & filters
    ".summary",
    ".stat-card__value",
    ".filters__grid",
    ".filters__field",
    // Table
    ".ambiti-table",
    ".ambiti-table__sort",
    ".ambiti-table__sort-indicator",
    ".ambiti-table__toggle",
    ".ambiti-table__row--expanded",
    ".ambiti-table__detail",
    ".ambiti-table__message",
    // Detail block
    ".detail__section",
    ".detail__chip",
    ".detail__table",
    ".detail__more",
    // Charts & analytics
    ".chart__row",
    ".chart__fill",
    ".highlight__value",
    // Export & feedback
    ".export__actions",
    ".toast--success",
    ".toast--warning",
    ".toast--error",
    ".loading-overlay",
    // Media query token (sanity check responsive block exists)
    "@media (max-width: 720px)",
];

#[test]
fn unified_theme_contains_required_selectors() {
    let missing: Vec<&str> = REQUIRED_SELECTORS
        .iter()
        .copied()
        .filter(|sel| !THEME_CSS.contains(sel))
        .collect();

    if !missing.is_empty() {
        panic!(
            "Missing {} required CSS selectors/tokens in unified theme:\n{}",
            missing.len(),
            missing.join("\n")
        );
    }
}

#[test]
fn unified_theme_not_trivially_empty() {
    let non_ws_len = THEME_CSS.chars().filter(|c| !c.is_whitespace()).count();
    assert!(
        non_ws_len > 4_000,
        "Embedded theme appears unexpectedly small ({non_ws_len} non-whitespace chars) - \
         did the file get truncated or path change?"
    );
}
