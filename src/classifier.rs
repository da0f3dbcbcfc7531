//! Line classifier: the single ordered rule table shared by every
//! transformer
//!
//! `classify` is a pure function of the line and its block context. The
//! precedence is explicit and total:
//!
//! 1. Permanent deny — `tip "..."` and `string "..."` are identifiers and
//!    always classify as `Never`, even though they look like interface
//!    captions.
//! 2. Interface exemptions — `label "..."` and `button KEY "..."` are
//!    translatable even though their first word is a technical keyword.
//! 3. Structural patterns — comments, definitions, bare technical
//!    assignments, numeric and coordinate lines, short lines, and the
//!    technical-first-word fallback.
//! 4. Anything left is handed to the span extractor.

use crate::extract;
use crate::line::Decision;
use crate::scope::Block;
use regex::{Regex, RegexSet};
use std::sync::LazyLock;

/// Structural patterns, matched against the trimmed line, case-insensitive.
/// One shared table; per-kind transformers never fork it.
const STRUCTURAL_PATTERNS: &[&str] = &[
    r"^#.*",
    // top-level definitions carry technical names
    r#"^ship\s+"[^"]*""#,
    r#"^outfit\s+"[^"]*""#,
    r#"^planet\s+"[^"]*""#,
    r#"^system\s+"[^"]*""#,
    r#"^government\s+"[^"]*""#,
    r#"^event\s+"[^"]*""#,
    r#"^mission\s+"[^"]*""#,
    r#"^conversation\s+"[^"]*""#,
    r#"^fleet\s+"[^"]*""#,
    r#"^effect\s+"[^"]*""#,
    r#"^phrase\s+"[^"]*""#,
    r#"^commodity\s+"[^"]*""#,
    r#"^interface\s+"[^"]*""#,
    r"^word$",
    r"^trade$",
    // bare technical assignments
    r"^sprite\s+",
    r"^sound\s+",
    r"^thumbnail\s+",
    r"^icon\s+",
    r"^category\s+",
    r"^cost\s+\d+",
    r"^mass\s+\d+",
    r"^licenses?\s+",
    r"^pos\s+",
    r#"^government\s+[^"]*$"#,
    r"^music\s+",
    r"^habitable\s+",
    r"^belt\s+",
    r"^link\s+",
    r"^asteroids\s+",
    r"^trade\s+",
    r"^fleet\s+",
    r"^object\s+",
    r"^minables\s+",
    r"^hazard\s+",
    r"^invisible$",
    r"^attributes\s+",
    r"^attribute\s+",
    r"^weapon\s+",
    r"^engine\s+",
    r"^map\s+",
    r"^space\s+",
    r"^shipyard\s+",
    r"^outfitter\s+",
    // mission control flow
    r"^(to\s+)?(offer|complete|fail|accept|decline)$",
    r"^(source|destination|passengers|cargo|payment)\s+",
    r"^(landing|takeoff|assisting|boarding)$",
    r"^(minor|repeat|clearance)$",
    r"^random\s+<\s*\d+",
    r#"^not\s+"[^"]*""#,
    r"^(log|set|clear)\s+",
    // interface layout
    r"^color\s+",
    r"^panel\s+",
    r"^point\s+",
    r"^from\s+",
    r"^to\s+\d+",
    r"^center\s+",
    r"^dimensions\s+",
    r"^align\s+",
    r"^outline\s+",
    r"^image\s+",
    r"^box\s+",
    r"^bar\s+",
    r"^ring\s+",
    r"^value\s+",
    r"^visible\s+",
    r"^active\s+",
    r"^anchor\s+",
    r"^line$",
    r"^truncate\s+",
    r"^width\s+",
    r"^height\s+",
    r"^size\s+",
    r"^colored$",
    r"^reversed$",
    // coordinates and numbers
    r"^variant\s+\d+",
    r"^turret\s+-?\d+\s+-?\d+",
    r"^gun\s+-?\d+\s+-?\d+",
    r#"^"[^"]*"\s+\d+"#,
    r"^-?\d+\s+-?\d+",
    r"^\d+$",
];

static STRUCTURAL_SET: LazyLock<RegexSet> = LazyLock::new(|| {
    RegexSet::new(
        STRUCTURAL_PATTERNS
            .iter()
            .map(|p| format!("(?i){}", p)),
    )
    .expect("hard-coded pattern")
});

static SYMBOLS_ONLY_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[\d\s.\-+*/()\[\]<>=]+$").expect("hard-coded pattern"));

/// First words that block a line outright. `tip`, `label`, `button`, and
/// `text` are deliberately absent; the first two have their own rules above
/// this table in the precedence.
const TECHNICAL_WORDS: &[&str] = &[
    "ship",
    "outfit",
    "planet",
    "system",
    "government",
    "event",
    "mission",
    "conversation",
    "fleet",
    "effect",
    "phrase",
    "word",
    "sprite",
    "sound",
    "thumbnail",
    "icon",
    "category",
    "cost",
    "mass",
    "licenses",
    "license",
    "pos",
    "music",
    "habitable",
    "belt",
    "link",
    "asteroids",
    "trade",
    "object",
    "minables",
    "hazard",
    "invisible",
    "attributes",
    "weapon",
    "engine",
    "offer",
    "complete",
    "fail",
    "accept",
    "decline",
    "source",
    "destination",
    "passengers",
    "cargo",
    "payment",
    "landing",
    "takeoff",
    "assisting",
    "boarding",
    "minor",
    "repeat",
    "clearance",
    "random",
    "not",
    "log",
    "set",
    "clear",
    "commodity",
    "to",
    "color",
    "interface",
    "panel",
    "point",
    "from",
    "center",
    "dimensions",
    "align",
];

fn first_word_is_technical(trimmed: &str) -> bool {
    trimmed
        .split_whitespace()
        .next()
        .is_some_and(|w| TECHNICAL_WORDS.contains(&w.to_lowercase().as_str()))
}

/// Snake_case single tokens are ids, not prose (`tutorial_basics`)
fn is_identifier_value(text: &str) -> bool {
    !text.contains(char::is_whitespace) && text.contains('_')
}

/// True when the line is structural under the shared rule table
///
/// Exemptions and permanent denials are handled by [`classify`]; this only
/// answers the pattern-table question.
pub fn is_structural(line: &str) -> bool {
    let trimmed = line.trim();
    if trimmed.is_empty() {
        return true;
    }
    if STRUCTURAL_SET.is_match(trimmed) {
        return true;
    }
    if SYMBOLS_ONLY_RE.is_match(trimmed) {
        return true;
    }
    if trimmed.len() < 3 {
        return true;
    }
    first_word_is_technical(trimmed)
}

/// Classify a line in its block context
///
/// Pure function; repeated calls on the same inputs always yield the same
/// decision. The block only influences which extractor form is tried for the
/// residual cases — the deny and exemption tiers are context-free.
pub fn classify(line: &str, _current_block: Option<&Block>) -> Decision {
    let trimmed = line.trim();

    // tier 1: permanent deny
    if extract::is_identifier_form(trimmed) {
        return Decision::Never;
    }

    // tier 2: interface exemptions outrank the technical-keyword block
    if let Some(span) = extract::button_span(line) {
        return Decision::Translatable(span);
    }
    if let Some(span) = extract::label_span(line) {
        return Decision::Translatable(span);
    }

    // tier 3: structural pattern table
    if is_structural(line) {
        return Decision::Structural;
    }

    // tier 4: hand the residue to the extractor
    match extract::extract(line) {
        Some(span) if is_identifier_value(&span.text) => Decision::Never,
        Some(span) => Decision::Translatable(span),
        None => Decision::Never,
    }
}
