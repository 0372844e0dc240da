//! String utilities for the domain layer.
//!
//! Small, allocation-light helpers shared by the persona output parser,
//! the request classifier and the round context builder.

/// Truncate a string to a maximum length with ellipsis (UTF-8 safe)
///
/// Uses byte length for max_len but ensures truncation occurs at valid
/// UTF-8 character boundaries.
pub fn truncate(s: &str, max_len: usize) -> String {
    if s.len() <= max_len {
        s.to_string()
    } else {
        let target = max_len.saturating_sub(3);
        let mut end = target.min(s.len());
        while end > 0 && !s.is_char_boundary(end) {
            end -= 1;
        }
        format!("{}...", &s[..end])
    }
}

/// Collapse all runs of whitespace (including newlines) into single spaces.
pub fn collapse_whitespace(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Strip a leading list marker (`-`, `*`, `+`, `•`, `1.`, `2)`) from a line.
///
/// Returns `None` when the line is not a list item.
pub fn strip_list_marker(line: &str) -> Option<&str> {
    let trimmed = line.trim_start();

    for marker in ["- ", "* ", "+ ", "• "] {
        if let Some(rest) = trimmed.strip_prefix(marker) {
            return Some(rest.trim());
        }
    }
    if matches!(trimmed, "-" | "*" | "+" | "•") {
        return Some("");
    }

    let digits = trimmed.chars().take_while(|c| c.is_ascii_digit()).count();
    if digits > 0 {
        let rest = &trimmed[digits..];
        if let Some(rest) = rest.strip_prefix(". ").or_else(|| rest.strip_prefix(") ")) {
            return Some(rest.trim());
        }
    }

    None
}

/// Whether a field value is a "nothing here" placeholder such as `none` or `N/A`.
pub fn is_placeholder(value: &str) -> bool {
    let normalized = value
        .trim()
        .trim_end_matches('.')
        .trim_matches(|c| c == '*' || c == '_' || c == '`')
        .to_ascii_lowercase();

    matches!(
        normalized.as_str(),
        "" | "none"
            | "n/a"
            | "na"
            | "-"
            | "nil"
            | "null"
            | "nothing"
            | "no"
            | "no change"
            | "unchanged"
            | "not applicable"
    )
}

/// Extract the first number in a string, honouring a directly preceding minus sign.
///
/// `"85%"` gives 85.0, `"about -5 points"` gives -5.0, `"high"` gives `None`.
pub fn first_number(s: &str) -> Option<f64> {
    let start = s.find(|c: char| c.is_ascii_digit())?;
    let end = s[start..]
        .find(|c: char| !(c.is_ascii_digit() || c == '.'))
        .map(|offset| start + offset)
        .unwrap_or(s.len());

    let value: f64 = s[start..end].trim_end_matches('.').parse().ok()?;
    if s[..start].ends_with('-') {
        Some(-value)
    } else {
        Some(value)
    }
}

/// Split lowercase text into alphanumeric words (`p95`, `sign-off` stays whole).
pub fn words(s: &str) -> impl Iterator<Item = &str> {
    s.split(|c: char| !(c.is_alphanumeric() || c == '-' || c == '_'))
        .map(|w| w.trim_matches('-'))
        .filter(|w| !w.is_empty())
}
