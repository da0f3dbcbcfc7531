//! Token-preservation codec for game text
//!
//! Game prose is full of substrings the engine interprets at runtime: tag
//! variables like `<destination>`, quantities like `5000 credits`, coordinate
//! pairs, quoted proper nouns, and file references. Sending those to a
//! machine translation provider corrupts them (providers translate numbers,
//! lower-case tokens, and reword names), so each protected substring is
//! swapped for a uniquely numbered placeholder before the call and restored
//! afterwards.
//!
//! Placeholder format: `__{CATEGORY}_{n}__` where `n` comes from one counter
//! shared across all categories, so no two live placeholders ever collide.
//!
//! Restoration is three-staged: exact match, then a lower-cased match
//! (providers routinely case-fold injected tokens), then a final sweep that
//! pairs any residual placeholder-shaped substring with its map entry
//! case-insensitively. The sweep is heuristic by design; it only ever
//! rewrites substrings shaped like `__WORD_N__`.

use crate::mt::error::MtResult;
use crate::mt::translator::MachineTranslator;
use regex::Regex;
use std::sync::LazyLock;
use std::time::Duration;

/// Pause after every successful provider call, to stay under rate limits
const PROVIDER_PAUSE_MS: u64 = 100;

/// Minimum remaining length worth sending to the provider
const MIN_SHIELDED_LEN: usize = 3;

static TAG_VARIABLE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<[^>]+>").expect("hard-coded pattern"));
static UNIT_QUANTITY_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b\d+(?:[.,]\d+)?\s*(?:credits?|tons?|jumps?|days?|units?|MW|GW|kW|km|m)\b")
        .expect("hard-coded pattern")
});
static COORDINATE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b-?\d+(?:\.\d+)?\s+-?\d+(?:\.\d+)?\b").expect("hard-coded pattern")
});
static QUOTED_NAME_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#""[A-Z][^"]*""#).expect("hard-coded pattern"));
static FILE_REFERENCE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b\w+\.\w+\b").expect("hard-coded pattern"));
static RESIDUAL_PLACEHOLDER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"__[A-Za-z]+_\d+__").expect("hard-coded pattern"));

/// Category of a protected substring
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenCategory {
    /// `<name>` runtime variable substituted by the game engine
    TagVariable,
    /// Number plus game unit, e.g. `5000 credits`, `10 tons`
    UnitQuantity,
    /// Two numbers separated by whitespace, e.g. `150.5 -200.3`
    CoordinatePair,
    /// Quoted text starting with an uppercase letter, e.g. `"Sparrow"`
    QuotedProperNoun,
    /// Dotted token, e.g. `flagship.png`
    FileReference,
}

impl TokenCategory {
    fn placeholder_stem(self) -> &'static str {
        match self {
            TokenCategory::TagVariable => "GAMEVAR",
            TokenCategory::UnitQuantity => "GAMEUNIT",
            TokenCategory::CoordinatePair => "COORD",
            TokenCategory::QuotedProperNoun => "QUOTEDNAME",
            TokenCategory::FileReference => "FILE",
        }
    }
}

/// One protected substring and the placeholder standing in for it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreservedToken {
    pub placeholder: String,
    pub original: String,
    pub category: TokenCategory,
}

/// Preservation map produced by [`protect`], consumed by [`restore`]
#[derive(Debug, Clone, Default)]
pub struct ShieldMap {
    tokens: Vec<PreservedToken>,
}

impl ShieldMap {
    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn tokens(&self) -> &[PreservedToken] {
        &self.tokens
    }
}

/// Replace every match of one protection pass with placeholders
///
/// Matches are collected left-to-right; each distinct matched substring is
/// replaced everywhere it still occurs, under a single placeholder, so a tag
/// that appears twice maps to one placeholder appearing twice.
fn protect_pass(
    text: &mut String,
    re: &Regex,
    category: TokenCategory,
    counter: &mut usize,
    map: &mut ShieldMap,
) {
    let matches: Vec<String> = re.find_iter(text).map(|m| m.as_str().to_string()).collect();
    for matched in matches {
        if !text.contains(&matched) {
            // Already swallowed by an earlier replacement in this pass
            continue;
        }
        let placeholder = format!("__{}_{}__", category.placeholder_stem(), *counter);
        *counter += 1;
        *text = text.replace(&matched, &placeholder);
        map.tokens.push(PreservedToken {
            placeholder,
            original: matched,
            category,
        });
    }
}

/// Shield all game tokens in a span of text
///
/// Runs the five protection passes in fixed order (tags, unit quantities,
/// coordinates, quoted proper nouns, file references). Earlier passes remove
/// their matches from the text, so later passes cannot re-match inside them.
///
/// # Returns
///
/// The shielded text and the preservation map needed to undo it.
pub fn protect(text: &str) -> (String, ShieldMap) {
    let mut shielded = text.to_string();
    let mut map = ShieldMap::default();
    let mut counter = 0usize;

    protect_pass(
        &mut shielded,
        &TAG_VARIABLE_RE,
        TokenCategory::TagVariable,
        &mut counter,
        &mut map,
    );
    protect_pass(
        &mut shielded,
        &UNIT_QUANTITY_RE,
        TokenCategory::UnitQuantity,
        &mut counter,
        &mut map,
    );
    protect_pass(
        &mut shielded,
        &COORDINATE_RE,
        TokenCategory::CoordinatePair,
        &mut counter,
        &mut map,
    );
    protect_pass(
        &mut shielded,
        &QUOTED_NAME_RE,
        TokenCategory::QuotedProperNoun,
        &mut counter,
        &mut map,
    );
    protect_pass(
        &mut shielded,
        &FILE_REFERENCE_RE,
        TokenCategory::FileReference,
        &mut counter,
        &mut map,
    );

    (shielded, map)
}

/// Restore shielded tokens in provider output
///
/// Stage 1: exact placeholder match. Stage 2: lower-cased placeholder
/// (providers case-fold tokens they do not recognize as words). Stage 3:
/// sweep any residual placeholder-shaped substring and pair it with its map
/// entry case-insensitively.
pub fn restore(translated: &str, map: &ShieldMap) -> String {
    let mut result = translated.to_string();

    for token in &map.tokens {
        if result.contains(&token.placeholder) {
            result = result.replace(&token.placeholder, &token.original);
        } else {
            let lowered = token.placeholder.to_lowercase();
            if result.contains(&lowered) {
                result = result.replace(&lowered, &token.original);
            }
        }
    }

    // Final sweep for placeholders the provider mangled into mixed case
    let residuals: Vec<String> = RESIDUAL_PLACEHOLDER_RE
        .find_iter(&result)
        .map(|m| m.as_str().to_string())
        .collect();
    for residual in residuals {
        if let Some(token) = map
            .tokens
            .iter()
            .find(|t| t.placeholder.eq_ignore_ascii_case(&residual))
        {
            result = result.replace(&residual, &token.original);
        }
    }

    result
}

/// Remove acute accents from the fixed vowel set, preserving case
///
/// The game font renders accented vowels poorly, so translated text is
/// normalized to `á→a, é→e, í→i, ó→o, ú→u` (and uppercase equivalents).
/// Other characters, including `ñ`, pass through untouched.
pub fn strip_accents(text: &str) -> String {
    text.chars()
        .map(|c| match c {
            'á' => 'a',
            'é' => 'e',
            'í' => 'i',
            'ó' => 'o',
            'ú' => 'u',
            'Á' => 'A',
            'É' => 'E',
            'Í' => 'I',
            'Ó' => 'O',
            'Ú' => 'U',
            other => other,
        })
        .collect()
}

/// Translate one span with full token shielding
///
/// The complete codec round trip: protect tokens, strip and remember the
/// leading `_` hotkey marker and trailing `...`, call the provider, restore
/// tokens, normalize accents, re-attach the stripped decorations. Spans that
/// are too short after shielding skip the provider entirely and come back
/// unchanged. Whitespace padding inside the span delimiters is carried
/// around the call untouched, so an echoing provider reproduces the input
/// exactly.
///
/// A fixed pause follows every successful provider call. Provider errors are
/// returned to the caller, which keeps the original text.
pub async fn translate_shielded(
    provider: &dyn MachineTranslator,
    text: &str,
    source_locale: &str,
    target_locale: &str,
) -> MtResult<String> {
    let without_leading = text.trim_start();
    let leading = &text[..text.len() - without_leading.len()];
    let core = without_leading.trim_end();
    let trailing = &without_leading[core.len()..];

    if core.len() < 2 {
        return Ok(text.to_string());
    }

    let (mut shielded, map) = protect(core);

    let hotkey_prefix = if shielded.starts_with('_') {
        shielded.remove(0);
        true
    } else {
        false
    };

    let ellipsis_suffix = if shielded.ends_with("...") {
        shielded.truncate(shielded.len() - 3);
        true
    } else {
        false
    };

    if shielded.trim().len() < MIN_SHIELDED_LEN {
        return Ok(text.to_string());
    }

    let translated = provider
        .translate(&shielded, source_locale, target_locale)
        .await?;
    tokio::time::sleep(Duration::from_millis(PROVIDER_PAUSE_MS)).await;

    let restored = restore(&translated, &map);
    let mut normalized = strip_accents(&restored);

    if hotkey_prefix {
        normalized.insert(0, '_');
    }
    if ellipsis_suffix {
        normalized.push_str("...");
    }

    Ok(format!("{}{}{}", leading, normalized, trailing))
}
