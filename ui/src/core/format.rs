//! Formatting helpers for presenting counts, averages and table cells.

/// Separator conventions for the locales the dashboard ships with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NumberLocale {
    #[default]
    Italian,
    English,
}

impl NumberLocale {
    pub fn from_tag(tag: &str) -> Self {
        if tag.to_ascii_lowercase().starts_with("en") {
            Self::English
        } else {
            Self::Italian
        }
    }

    fn separators(self) -> (char, char) {
        match self {
            Self::Italian => ('.', ','),
            Self::English => (',', '.'),
        }
    }
}

/// Groups thousands and fixes the number of decimals. Non-finite input renders as `0`.
pub fn format_number(value: f64, decimals: usize, locale: NumberLocale) -> String {
    if !value.is_finite() {
        return "0".to_string();
    }
    let (thousands, decimal) = locale.separators();
    let fixed = format!("{:.*}", decimals, value.abs());
    let (int_part, frac_part) = fixed.split_once('.').unwrap_or((fixed.as_str(), ""));

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (idx, ch) in int_part.chars().enumerate() {
        if idx > 0 && (int_part.len() - idx) % 3 == 0 {
            grouped.push(thousands);
        }
        grouped.push(ch);
    }

    let negative = value < 0.0 && fixed.chars().any(|c| c.is_ascii_digit() && c != '0');
    let mut out = String::new();
    if negative {
        out.push('-');
    }
    out.push_str(&grouped);
    if !frac_part.is_empty() {
        out.push(decimal);
        out.push_str(frac_part);
    }
    out
}

pub fn format_count(value: usize, locale: NumberLocale) -> String {
    format_number(value as f64, 0, locale)
}

/// Cuts `value` to `max_chars` characters and appends `...` when it was longer.
/// Returns the display text and whether truncation happened.
pub fn truncate(value: &str, max_chars: usize) -> (String, bool) {
    if value.chars().count() <= max_chars {
        return (value.to_string(), false);
    }
    let mut cut: String = value.chars().take(max_chars).collect();
    cut.push_str("...");
    (cut, true)
}

/// Entity-escapes the five markup-significant characters.
pub fn sanitize(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for ch in value.chars() {
        match ch {
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            '&' => out.push_str("&amp;"),
            other => out.push(other),
        }
    }
    out
}

/// Placeholder used for absent table values.
pub fn or_na(value: Option<&str>) -> String {
    match value.map(str::trim) {
        Some(v) if !v.is_empty() => v.to_string(),
        _ => "N/A".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn italian_grouping() {
        assert_eq!(format_number(1234567.0, 0, NumberLocale::Italian), "1.234.567");
        assert_eq!(format_number(12.345, 1, NumberLocale::Italian), "12,3");
        assert_eq!(format_number(999.0, 0, NumberLocale::Italian), "999");
    }

    #[test]
    fn english_grouping_and_sign() {
        assert_eq!(format_number(-1234.5, 2, NumberLocale::English), "-1,234.50");
        assert_eq!(format_number(-0.01, 0, NumberLocale::English), "0");
    }

    #[test]
    fn non_finite_is_zero() {
        assert_eq!(format_number(f64::NAN, 1, NumberLocale::Italian), "0");
        assert_eq!(format_number(f64::INFINITY, 0, NumberLocale::English), "0");
    }

    #[test]
    fn truncate_counts_characters() {
        assert_eq!(truncate("CITTÀ", 10), ("CITTÀ".to_string(), false));
        assert_eq!(truncate("CITTÀ METROPOLITANA", 5), ("CITTÀ...".to_string(), true));
    }

    #[test]
    fn sanitize_escapes_markup() {
        assert_eq!(
            sanitize(r#"<b onclick="x">Ca' & Co</b>"#),
            "&lt;b onclick=&quot;x&quot;&gt;Ca&#39; &amp; Co&lt;/b&gt;"
        );
    }

    #[test]
    fn or_na_handles_blank() {
        assert_eq!(or_na(None), "N/A");
        assert_eq!(or_na(Some("  ")), "N/A");
        assert_eq!(or_na(Some("ROMA")), "ROMA");
    }

    #[test]
    fn locale_from_tag() {
        assert_eq!(NumberLocale::from_tag("it-IT"), NumberLocale::Italian);
        assert_eq!(NumberLocale::from_tag("en-US"), NumberLocale::English);
    }
}
