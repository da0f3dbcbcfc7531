//! Span extraction: isolating the translatable substring of a line
//!
//! Extraction attempts run in a fixed order: whole-line backtick content
//! first (dialogue and free text, which may itself contain double quotes),
//! then the table of quoted field patterns, then interface captions. The
//! identifier forms `tip "..."` and `string "..."` are recognized here only
//! to be refused — they are ids, not prose.
//!
//! Every returned [`Span`] carries its reconstruction template: prefix and
//! suffix include the delimiters, so untouched bytes stay untouched.

use crate::line::{Span, SpanType};
use regex::Regex;
use std::sync::LazyLock;

static BACKTICK_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\s*`)([^`]+)(`\s*)$").expect("hard-coded pattern"));

static BUTTON_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"^(\s*button\s+\w+\s+")([^"]+)(".*)$"#).expect("hard-coded pattern")
});

static LABEL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"^(\s*label\s+")([^"]+)(".*)$"#).expect("hard-coded pattern"));

static BARE_QUOTED_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"^(\s*")([^"]+)("\s*)$"#).expect("hard-coded pattern"));

static IDENTIFIER_FORM_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"^\s*(?:tip|string)\s+""#).expect("hard-coded pattern"));

/// Quoted fields whose value is prose; order is the extraction priority
const QUOTED_FIELDS: &[&str] = &[
    "description",
    "spaceport",
    "landscape",
    "tribute",
    "bribe",
    "fine",
    "friendly hail",
    "hostile hail",
    "language",
    "currency",
    "plural",
    "noun",
    "explanation",
    "tooltip",
    "help",
    "message",
    "name",
];

static QUOTED_FIELD_RES: LazyLock<Vec<(&'static str, Regex)>> = LazyLock::new(|| {
    QUOTED_FIELDS
        .iter()
        .map(|field| {
            let pattern = format!(r#"^(\s*{}\s+")([^"]+)(".*)$"#, field.replace(' ', r"\s+"));
            (*field, Regex::new(&pattern).expect("hard-coded pattern"))
        })
        .collect()
});

static BACKTICK_FIELD_RES: LazyLock<Vec<(&'static str, Regex)>> = LazyLock::new(|| {
    ["description", "spaceport"]
        .iter()
        .map(|field| {
            let pattern = format!(r"^(\s*{}\s+`)([^`]+)(`\s*)$", field);
            (*field, Regex::new(&pattern).expect("hard-coded pattern"))
        })
        .collect()
});

fn span_from_captures(
    caps: &regex::Captures<'_>,
    span_type: SpanType,
    field: Option<&str>,
) -> Span {
    Span {
        prefix: caps[1].to_string(),
        text: caps[2].to_string(),
        suffix: caps[3].to_string(),
        span_type,
        field: field.map(|f| f.to_string()),
    }
}

/// True for the identifier-only constructs that must never be extracted
pub fn is_identifier_form(line: &str) -> bool {
    IDENTIFIER_FORM_RE.is_match(line)
}

/// Whole-line backtick content, e.g. `` `Welcome to the spaceport.` ``
pub fn backtick_span(line: &str) -> Option<Span> {
    BACKTICK_RE
        .captures(line)
        .map(|caps| span_from_captures(&caps, SpanType::Backtick, None))
}

/// `field `text`` form where both backtick delimiters sit on one line
/// (planet descriptions and spaceport paragraphs)
pub fn backtick_field_span(line: &str) -> Option<Span> {
    for (field, re) in BACKTICK_FIELD_RES.iter() {
        if let Some(caps) = re.captures(line) {
            return Some(span_from_captures(&caps, SpanType::Backtick, Some(field)));
        }
    }
    None
}

/// `field "text"` form from the quoted field table
pub fn quoted_field_span(line: &str) -> Option<Span> {
    for (field, re) in QUOTED_FIELD_RES.iter() {
        if let Some(caps) = re.captures(line) {
            return Some(span_from_captures(&caps, SpanType::QuotedField, Some(field)));
        }
    }
    None
}

/// `button KEY "text"` interface caption
pub fn button_span(line: &str) -> Option<Span> {
    BUTTON_RE
        .captures(line)
        .map(|caps| span_from_captures(&caps, SpanType::Button, Some("button")))
}

/// `label "text"` interface caption
pub fn label_span(line: &str) -> Option<Span> {
    LABEL_RE
        .captures(line)
        .map(|caps| span_from_captures(&caps, SpanType::Label, Some("label")))
}

/// A line that is nothing but one quoted string (phrase word entries,
/// commodity ids, news phrases)
pub fn bare_quoted_span(line: &str) -> Option<Span> {
    BARE_QUOTED_RE
        .captures(line)
        .map(|caps| span_from_captures(&caps, SpanType::QuotedField, None))
}

/// General-purpose extraction in fixed priority order
///
/// Backtick whole lines, then the quoted field table, then interface
/// captions. Identifier forms and bare quoted lines return `None`; bare
/// quoted entries are only meaningful inside specific block kinds and are
/// requested explicitly by those transformers.
pub fn extract(line: &str) -> Option<Span> {
    if is_identifier_form(line) {
        return None;
    }
    if let Some(span) = backtick_span(line) {
        return Some(span);
    }
    if let Some(span) = quoted_field_span(line) {
        return Some(span);
    }
    if let Some(span) = button_span(line) {
        return Some(span);
    }
    if let Some(span) = label_span(line) {
        return Some(span);
    }
    None
}

/// Heuristic for phrase/person word entries that are proper names:
/// at least two whitespace-separated tokens, each starting uppercase
pub fn looks_like_proper_name(text: &str) -> bool {
    let tokens: Vec<&str> = text.split_whitespace().collect();
    tokens.len() >= 2
        && tokens
            .iter()
            .all(|t| t.chars().next().is_some_and(|c| c.is_uppercase()))
}
