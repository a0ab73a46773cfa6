#![cfg(test)]
//! Ensures the embedded desktop CSS (shared theme) stays present and non-trivial.
//!
//! The desktop build inlines `ui/assets/theme/main.css`; a truncated file or a
//! broken path would only show up as unstyled UI at runtime.
//!
//! If you rename or relocate the theme, update both this test and the
//! `include_str!` constant in `desktop/src/main.rs`.

const EMBEDDED_CSS: &str = include_str!(concat!(
    env!("CARGO_MANIFEST_DIR"),
    "/../ui/assets/theme/main.css"
));

const NAVBAR_CSS: &str = include_str!(concat!(
    env!("CARGO_MANIFEST_DIR"),
    "/../ui/assets/styling/navbar.css"
));

#[test]
fn embedded_css_file_exists_and_is_not_empty() {
    assert!(
        !EMBEDDED_CSS.trim().is_empty(),
        "Embedded CSS file appears to be empty. If this is intentional, remove the test."
    );
    assert!(!NAVBAR_CSS.trim().is_empty(), "Navbar stylesheet is empty");
}

#[test]
fn embedded_css_contains_expected_tokens() {
    let required = ["--color-bg", "[data-theme=\"dark\"]", "body {", ".button--primary"];
    for token in required {
        assert!(
            EMBEDDED_CSS.contains(token),
            "Expected token `{token}` missing from embedded CSS"
        );
    }
}

#[test]
fn dark_theme_overrides_every_light_color() {
    let (light, rest) = EMBEDDED_CSS
        .split_once("[data-theme=\"dark\"]")
        .expect("dark theme block present");
    let dark = rest.split('}').next().unwrap_or_default();
    for line in light.lines().map(str::trim) {
        if let Some(name) = line.strip_prefix("--color-").and_then(|l| l.split(':').next()) {
            assert!(
                dark.contains(&format!("--color-{name}:")),
                "dark theme does not override --color-{name}"
            );
        }
    }
}
