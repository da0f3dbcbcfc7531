//! Data model for source lines and classification decisions

/// One raw line of a game data file, immutable once read
///
/// `text` holds the line without its terminator; `has_newline` remembers
/// whether the source line ended in `\n` so reconstruction can reproduce the
/// file byte for byte, including a missing final newline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceLine {
    pub text: String,
    /// 1-based line number
    pub index: usize,
    pub has_newline: bool,
}

impl SourceLine {
    /// Split decoded file content into source lines
    ///
    /// `\r\n` terminators are kept intact: the `\r` stays at the end of
    /// `text` so untouched lines round-trip exactly.
    pub fn split_content(content: &str) -> Vec<SourceLine> {
        content
            .split_inclusive('\n')
            .enumerate()
            .map(|(i, raw)| {
                let has_newline = raw.ends_with('\n');
                let text = if has_newline {
                    raw[..raw.len() - 1].to_string()
                } else {
                    raw.to_string()
                };
                SourceLine {
                    text,
                    index: i + 1,
                    has_newline,
                }
            })
            .collect()
    }

    /// The line exactly as it appeared in the source, terminator included
    pub fn raw(&self) -> String {
        if self.has_newline {
            format!("{}\n", self.text)
        } else {
            self.text.clone()
        }
    }

    /// Number of leading whitespace characters (tabs and spaces each count 1)
    pub fn indent(&self) -> usize {
        self.text.len() - self.text.trim_start().len()
    }
}

/// Where a translatable span came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpanType {
    /// Whole-line backtick content (dialogue, free text)
    Backtick,
    /// `field "text"` quoted field value
    QuotedField,
    /// `button KEY "text"` interface button caption
    Button,
    /// `label "text"` interface label caption
    Label,
}

/// The exact substring of a line eligible for translation, plus its
/// reconstruction template
///
/// `prefix` and `suffix` include the span delimiters, so rebuilding is
/// always `prefix + text + suffix` and everything outside `text` stays
/// byte-identical to the source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Span {
    pub prefix: String,
    pub text: String,
    pub suffix: String,
    pub span_type: SpanType,
    /// Field keyword that introduced the span (`description`, `tribute`, …);
    /// `None` for bare backtick or bare quoted content
    pub field: Option<String>,
}

impl Span {
    /// Rebuild the line around replacement text, preserving the original
    /// prefix, suffix, and line terminator
    pub fn rebuild(&self, replacement: &str, had_newline: bool) -> String {
        let mut line = format!("{}{}{}", self.prefix, replacement, self.suffix);
        if had_newline {
            line.push('\n');
        }
        line
    }

    /// True when rebuilding with the original text reproduces the source
    /// line exactly; anything else is a reconstruction mismatch
    pub fn reassembles(&self, original: &str) -> bool {
        format!("{}{}{}", self.prefix, self.text, self.suffix) == original
    }
}

/// Classification outcome for one line in its block context
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decision {
    /// Never translate, under any context (identifiers, commodity ids)
    Never,
    /// Structural line: keyword, definition, number, comment — pass through
    Structural,
    /// Carries a translatable span
    Translatable(Span),
}
