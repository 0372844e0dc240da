//! Persona output parsing.
//!
//! Turns one persona's free-form round output into a [`PersonaRecord`].
//! Pure domain logic: no I/O, just line-oriented pattern matching.
//!
//! # Expected Format
//!
//! ```text
//! VERDICT: CONDITIONAL_GO
//! CONFIDENCE: 80
//! CONVICTION: 65
//! REASONING:
//! The migration is reversible, but only once the backfill job exists.
//! INFO_NEEDED:
//! - Where is "BackfillJob" implemented?
//! BLOCKERS:
//! - No rollback plan
//! AGREES_WITH: maintainer, sre
//! DISAGREES_WITH: security - overstates the exposure
//! CHANGED_POSITION: from STOP to CONDITIONAL_GO - the flag makes it reversible
//! ESCALATE_TO: none
//! RECRUITS: dba - schema change needs review
//! ```
//!
//! Headers match case-insensitively and may carry markdown decoration
//! (`**Verdict:**`, `## Reasoning:`). Each field is extracted independently:
//! one malformed field never prevents the others from being recovered.
//!
//! | Problem | Severity | Effect |
//! |---------|----------|--------|
//! | Missing / invalid verdict | error | verdict unset |
//! | Missing / empty reasoning | error | empty reasoning kept |
//! | Missing / malformed score | warning | default used |
//! | Out-of-range score | warning | value clamped |
//! | Optional section absent | none | empty value |

use super::record::{
    DEFAULT_CONFIDENCE, DEFAULT_CONVICTION, PersonaRecord, PersonaRef, PositionChange,
};
use super::verdict::Verdict;
use crate::core::string::{collapse_whitespace, first_number, is_placeholder, strip_list_marker};

/// Field headers the parser recognises
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Field {
    Verdict,
    Confidence,
    Conviction,
    Reasoning,
    InfoNeeded,
    Blockers,
    EscalateTo,
    AgreesWith,
    DisagreesWith,
    ChangedPosition,
    Recruits,
}

impl Field {
    /// Field names match in any case. The single-word aliases only match
    /// when shouted, since "Escalate: ..." or "Blocker: ..." is ordinary
    /// prose inside reasoning.
    fn from_key(key: &str) -> Option<Self> {
        let key = key.trim().replace([' ', '-'], "_");
        let upper = key.to_ascii_uppercase();
        let shouted = key == upper;
        let field = match upper.as_str() {
            "VERDICT" => Field::Verdict,
            "CONFIDENCE" => Field::Confidence,
            "CONVICTION" => Field::Conviction,
            "REASONING" => Field::Reasoning,
            "INFO_NEEDED" | "INFORMATION_NEEDED" => Field::InfoNeeded,
            "BLOCKERS" => Field::Blockers,
            "BLOCKER" if shouted => Field::Blockers,
            "ESCALATE_TO" => Field::EscalateTo,
            "ESCALATE" if shouted => Field::EscalateTo,
            "AGREES_WITH" | "AGREE_WITH" => Field::AgreesWith,
            "DISAGREES_WITH" | "DISAGREE_WITH" => Field::DisagreesWith,
            "CHANGED_POSITION" | "POSITION_CHANGE" => Field::ChangedPosition,
            "RECRUITS" => Field::Recruits,
            "RECRUIT" if shouted => Field::Recruits,
            _ => return None,
        };
        Some(field)
    }

    fn label(&self) -> &'static str {
        match self {
            Field::Verdict => "VERDICT",
            Field::Confidence => "CONFIDENCE",
            Field::Conviction => "CONVICTION",
            Field::Reasoning => "REASONING",
            Field::InfoNeeded => "INFO_NEEDED",
            Field::Blockers => "BLOCKERS",
            Field::EscalateTo => "ESCALATE_TO",
            Field::AgreesWith => "AGREES_WITH",
            Field::DisagreesWith => "DISAGREES_WITH",
            Field::ChangedPosition => "CHANGED_POSITION",
            Field::Recruits => "RECRUITS",
        }
    }
}

/// One header and everything up to the next header
#[derive(Debug)]
struct Section<'a> {
    field: Field,
    inline: &'a str,
    body: Vec<&'a str>,
}

impl Section<'_> {
    /// Inline value and body joined, surrounding blank lines removed
    fn text(&self) -> String {
        let mut lines = Vec::with_capacity(self.body.len() + 1);
        if !self.inline.is_empty() {
            lines.push(self.inline);
        }
        lines.extend(self.body.iter().copied());
        lines.join("\n").trim().to_string()
    }

    /// List items: the inline value plus one item per bulleted line.
    ///
    /// Unbulleted lines continue the previous item (wrapped bullets);
    /// placeholder items such as `none` are dropped.
    fn entries(&self) -> Vec<String> {
        let mut items: Vec<String> = Vec::new();
        if !self.inline.is_empty() {
            items.push(self.inline.to_string());
        }

        for line in &self.body {
            if line.trim().is_empty() {
                continue;
            }
            match strip_list_marker(line) {
                Some(item) => items.push(item.to_string()),
                None => match items.last_mut() {
                    Some(last) => {
                        last.push(' ');
                        last.push_str(line.trim());
                    }
                    None => items.push(line.trim().to_string()),
                },
            }
        }

        items
            .into_iter()
            .map(|item| collapse_whitespace(&item))
            .filter(|item| !is_placeholder(item))
            .collect()
    }
}

/// The raw text split into header sections
struct Sections<'a> {
    sections: Vec<Section<'a>>,
}

impl<'a> Sections<'a> {
    fn new(raw: &'a str) -> Self {
        let mut sections: Vec<Section<'a>> = Vec::new();

        for line in raw.lines() {
            if let Some((field, inline)) = split_header(line) {
                sections.push(Section {
                    field,
                    inline,
                    body: Vec::new(),
                });
            } else if let Some(current) = sections.last_mut() {
                current.body.push(line);
            }
            // Preamble before the first header is ignored
        }

        Self { sections }
    }

    /// First section for a field; later duplicates are reported, not merged
    fn get(&self, field: Field) -> Option<&Section<'a>> {
        self.sections.iter().find(|s| s.field == field)
    }

    fn duplicate_warnings(&self) -> Vec<String> {
        let mut seen: Vec<Field> = Vec::new();
        let mut warnings = Vec::new();
        for section in &self.sections {
            if seen.contains(&section.field) {
                let warning = format!(
                    "Duplicate {} field; using the first occurrence",
                    section.field.label()
                );
                if !warnings.contains(&warning) {
                    warnings.push(warning);
                }
            } else {
                seen.push(section.field);
            }
        }
        warnings
    }
}

/// Recognise `KEY: value` header lines, tolerating markdown decoration.
fn split_header(line: &str) -> Option<(Field, &str)> {
    let trimmed = line
        .trim()
        .trim_start_matches(['#', '*', '_', '>'])
        .trim_start();
    let (key, rest) = trimmed.split_once(':')?;
    let field = Field::from_key(key.trim_end_matches(['*', '_']))?;
    let value = rest.trim().trim_start_matches(['*', '_']).trim();
    Some((field, value))
}

/// Parse one persona's raw round output.
///
/// Never fails: problems are reported through `parse_errors` and
/// `parse_warnings` on the returned record.
///
/// # Examples
///
/// ```
/// use council_domain::{Verdict, parse_persona_output};
///
/// let raw = "VERDICT: stop\nCONFIDENCE: 150\nCONVICTION: 80\nREASONING:\nNo rollback path.";
/// let record = parse_persona_output(raw, "security");
///
/// assert_eq!(record.verdict, Some(Verdict::Stop));
/// assert_eq!(record.confidence, 100);
/// assert!(record.parse_success);
/// assert_eq!(record.parse_warnings.len(), 1);
/// ```
pub fn parse_persona_output(raw: &str, persona: &str) -> PersonaRecord {
    let sections = Sections::new(raw);
    let mut record = PersonaRecord::new(persona.trim());
    let mut errors = Vec::new();
    let mut warnings = sections.duplicate_warnings();

    match extract_verdict(sections.get(Field::Verdict)) {
        Ok(verdict) => record.verdict = Some(verdict),
        Err(error) => errors.push(error),
    }

    let (confidence, warning) = extract_score(
        sections.get(Field::Confidence),
        Field::Confidence,
        DEFAULT_CONFIDENCE,
    );
    record.confidence = confidence;
    warnings.extend(warning);

    let (conviction, warning) = extract_score(
        sections.get(Field::Conviction),
        Field::Conviction,
        DEFAULT_CONVICTION,
    );
    record.conviction = conviction;
    warnings.extend(warning);

    let (reasoning, error) = extract_reasoning(sections.get(Field::Reasoning));
    record.reasoning = reasoning;
    errors.extend(error);

    record.info_needed = list_field(&sections, Field::InfoNeeded);
    record.blockers = list_field(&sections, Field::Blockers);
    record.agrees_with = extract_agreements(sections.get(Field::AgreesWith));
    record.disagrees_with = sections
        .get(Field::DisagreesWith)
        .map(|s| s.entries().iter().filter_map(|e| parse_persona_ref(e)).collect())
        .unwrap_or_default();
    record.escalate_to = first_persona_ref(sections.get(Field::EscalateTo));
    record.recruits = first_persona_ref(sections.get(Field::Recruits));
    record.changed_position = sections
        .get(Field::ChangedPosition)
        .and_then(extract_position_change);

    record.parse_success =
        record.verdict.is_some() && !record.reasoning.is_empty() && errors.is_empty();
    record.parse_errors = errors;
    record.parse_warnings = warnings;
    record
}

fn extract_verdict(section: Option<&Section<'_>>) -> Result<Verdict, String> {
    let section = section.ok_or_else(|| "Missing VERDICT field".to_string())?;
    let token = section
        .entries()
        .into_iter()
        .next()
        .and_then(|value| value.split_whitespace().next().map(str::to_string))
        .unwrap_or_default();

    // "CONDITIONAL GO" spans two words
    let candidate = if token.eq_ignore_ascii_case("conditional") {
        section.inline.trim().to_string()
    } else {
        token.clone()
    };

    candidate
        .parse::<Verdict>()
        .or_else(|_| token.parse::<Verdict>())
        .map_err(|_| format!("Invalid VERDICT value: '{}'", candidate.trim()))
}

/// Numeric 0-100 field. Returns the value plus an optional warning.
fn extract_score(section: Option<&Section<'_>>, field: Field, default: u8) -> (u8, Option<String>) {
    let Some(section) = section else {
        return (
            default,
            Some(format!(
                "Missing {} field, defaulting to {}",
                field.label(),
                default
            )),
        );
    };

    let text = section.text();
    let Some(value) = first_number(&text) else {
        return (
            default,
            Some(format!(
                "Could not parse {} value '{}', defaulting to {}",
                field.label(),
                text,
                default
            )),
        );
    };

    let clamped = value.clamp(0.0, 100.0).round() as u8;
    if !(0.0..=100.0).contains(&value) {
        let warning = format!(
            "{} value {} out of range, clamped to {}",
            field.label(),
            value,
            clamped
        );
        return (clamped, Some(warning));
    }

    (clamped, None)
}

fn extract_reasoning(section: Option<&Section<'_>>) -> (String, Option<String>) {
    match section {
        None => (String::new(), Some("Missing REASONING field".to_string())),
        Some(section) => {
            let text = section.text();
            if text.is_empty() {
                (text, Some("Empty REASONING field".to_string()))
            } else {
                (text, None)
            }
        }
    }
}

fn list_field(sections: &Sections<'_>, field: Field) -> Vec<String> {
    sections
        .get(field)
        .map(Section::entries)
        .unwrap_or_default()
}

/// `AGREES_WITH: a, b and c` or one name per bullet
fn extract_agreements(section: Option<&Section<'_>>) -> Vec<String> {
    let Some(section) = section else {
        return Vec::new();
    };

    let mut names: Vec<String> = Vec::new();
    for entry in section.entries() {
        for part in entry.split([',', ';']).flat_map(|p| p.split(" and ")) {
            let name = clean_persona_name(part);
            if !name.is_empty() && !is_placeholder(&name) && !names.contains(&name) {
                names.push(name);
            }
        }
    }
    names
}

fn first_persona_ref(section: Option<&Section<'_>>) -> Option<PersonaRef> {
    section?
        .entries()
        .iter()
        .find_map(|entry| parse_persona_ref(entry))
}

/// `persona - reason`, `persona: reason`, `persona (reason)` or just `persona`
fn parse_persona_ref(text: &str) -> Option<PersonaRef> {
    let text = text.trim();
    if is_placeholder(text) {
        return None;
    }

    let (name, reason) = split_name_reason(text);
    let persona = clean_persona_name(name);
    if persona.is_empty() || is_placeholder(&persona) {
        return None;
    }
    Some(PersonaRef::new(persona, reason))
}

fn split_name_reason(text: &str) -> (&str, String) {
    const SEPARATORS: [&str; 6] = [" - ", " – ", " — ", ":", "(", " because "];

    let split = SEPARATORS
        .iter()
        .filter_map(|sep| text.find(sep).map(|index| (index, *sep)))
        .min_by_key(|(index, _)| *index);

    match split {
        Some((index, sep)) => {
            let reason = text[index + sep.len()..]
                .trim()
                .trim_end_matches(')')
                .trim();
            (&text[..index], reason.to_string())
        }
        None => (text, String::new()),
    }
}

fn clean_persona_name(name: &str) -> String {
    name.trim()
        .trim_matches(|c: char| matches!(c, '@' | '*' | '`' | '"' | '\'' | '.' | '[' | ']'))
        .trim()
        .to_string()
}

/// `from X to Y - reason`, or `from:` / `to:` / `reason:` lines
fn extract_position_change(section: &Section<'_>) -> Option<PositionChange> {
    let mut from = None;
    let mut to = None;
    let mut reason = None;

    for entry in section.entries() {
        if let Some((key, value)) = entry.split_once(':') {
            let value = value.trim().to_string();
            match key.trim().to_ascii_lowercase().as_str() {
                "from" => {
                    from = Some(normalize_position(&value));
                    continue;
                }
                "to" => {
                    to = Some(normalize_position(&value));
                    continue;
                }
                "reason" | "because" | "why" => {
                    reason = Some(value);
                    continue;
                }
                _ => {}
            }
        }
        if from.is_none()
            && to.is_none()
            && let Some(change) = parse_inline_change(&entry)
        {
            return Some(change);
        }
        // Unlabelled text after labelled lines reads as the reason
        if reason.is_none() && (from.is_some() || to.is_some()) {
            reason = Some(entry);
        }
    }

    if from.is_none() && to.is_none() {
        return None;
    }
    Some(PositionChange {
        from: from.unwrap_or_default(),
        to: to.unwrap_or_default(),
        reason: reason.unwrap_or_default(),
    })
}

fn parse_inline_change(text: &str) -> Option<PositionChange> {
    // ASCII lowercasing keeps byte offsets aligned with `text`
    let lower = text.to_ascii_lowercase();
    let from_start = lower.find("from ")? + "from ".len();
    let to_start = from_start + lower[from_start..].find(" to ")?;

    let from = text[from_start..to_start].trim();
    let rest = text[to_start + " to ".len()..].trim();

    const SEPARATORS: [&str; 7] = [" - ", " – ", " — ", ":", ",", ";", " because "];
    let split = SEPARATORS
        .iter()
        .filter_map(|sep| rest.find(sep).map(|index| (index, *sep)))
        .min_by_key(|(index, _)| *index);

    let (to, reason) = match split {
        Some((index, sep)) => (&rest[..index], rest[index + sep.len()..].trim()),
        None => (rest, ""),
    };

    if from.is_empty() || to.trim().is_empty() {
        return None;
    }
    Some(PositionChange {
        from: normalize_position(from),
        to: normalize_position(to),
        reason: reason.to_string(),
    })
}

/// Canonical verdict token when the text names one, otherwise the trimmed text
fn normalize_position(value: &str) -> String {
    value
        .parse::<Verdict>()
        .map(|v| v.to_string())
        .unwrap_or_else(|_| value.trim().to_string())
}
