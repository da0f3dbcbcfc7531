//! Per-kind transformers over one shared per-line algorithm
//!
//! Every transformer walks a file the same way: track the block scope,
//! classify the line, extract the span if the block's allow-list admits it,
//! run the shield codec around the provider, rebuild the line around the
//! translated text. Everything that can go wrong per field is a `Result`
//! converted to kept-original; a bad span never aborts the file.
//!
//! The per-kind differences are confined to [`Transformer::decide`]: which
//! span forms a block kind admits. The rule table itself is shared (see
//! `classifier`); no transformer forks it.

use crate::classifier;
use crate::config::TranslatorConfig;
use crate::dispatch::TransformerKind;
use crate::error::TransformError;
use crate::extract;
use crate::line::{Decision, SourceLine, Span, SpanType};
use crate::mt::{MachineTranslator, translate_shielded};
use crate::scope::{Block, BlockKind, ScopeTracker};
use std::sync::atomic::{AtomicBool, Ordering};

/// Per-file outcome; the assembler writes only when `lines_translated > 0`
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct FileReport {
    pub lines_translated: usize,
    pub lines_skipped: usize,
    /// Recoverable problems kept for the log stream (provider failures,
    /// reconstruction mismatches)
    pub warnings: Vec<String>,
}

/// One file-kind transformer bound to a provider and configuration
pub struct Transformer<'a> {
    kind: TransformerKind,
    config: &'a TranslatorConfig,
    provider: &'a dyn MachineTranslator,
    source_locale: &'a str,
    target_locale: &'a str,
}

impl<'a> Transformer<'a> {
    pub fn new(
        kind: TransformerKind,
        config: &'a TranslatorConfig,
        provider: &'a dyn MachineTranslator,
        source_locale: &'a str,
        target_locale: &'a str,
    ) -> Self {
        Self {
            kind,
            config,
            provider,
            source_locale,
            target_locale,
        }
    }

    /// Span the current line may translate, given its block context
    ///
    /// `None` means pass through unchanged. Block kinds with a configured
    /// field allow-list gate quoted fields through it; kinds without one
    /// (missions, conversations, interface) accept whatever the shared
    /// classifier admits.
    fn decide(&self, line: &SourceLine, block: Option<&Block>) -> Option<Span> {
        let kind = block.map(|b| b.kind);
        if let Some(k) = kind {
            if k != BlockKind::Other && !self.kind.allowed_kinds().contains(&k) {
                return None;
            }
        }

        match kind {
            Some(BlockKind::Planet) => self.decide_planet(line),
            // a bare quoted line in a commodity block is the technical id;
            // only incidental backtick prose qualifies
            Some(BlockKind::Commodity) => extract::backtick_span(&line.text),
            Some(BlockKind::Phrase) | Some(BlockKind::Person) => {
                self.decide_word_entry(line)
            }
            Some(BlockKind::News) => self.decide_news(line),
            Some(BlockKind::Help) => extract::backtick_span(&line.text),
            Some(
                k @ (BlockKind::Ship
                | BlockKind::Outfit
                | BlockKind::Effect
                | BlockKind::Minable
                | BlockKind::Government
                | BlockKind::Fleet
                | BlockKind::Start),
            ) => self.decide_listed_fields(line, block, k),
            _ => self.decide_general(line, block),
        }
    }

    /// Kinds whose quoted fields are gated by the configured allow-list
    fn decide_listed_fields(
        &self,
        line: &SourceLine,
        block: Option<&Block>,
        kind: BlockKind,
    ) -> Option<Span> {
        let span = self.classify_span(line, block)?;
        match &span.field {
            Some(field) if self.config.field_allowed(kind, field) => Some(span),
            // backtick dialogue inside a block is always prose
            None if span.span_type == SpanType::Backtick => Some(span),
            _ => None,
        }
    }

    /// Planet blocks: backtick description/spaceport (both delimiters on
    /// one line) plus the quoted hail/tribute prose fields
    fn decide_planet(&self, line: &SourceLine) -> Option<Span> {
        if let Some(span) = extract::backtick_field_span(&line.text) {
            return Some(span);
        }
        let span = extract::quoted_field_span(&line.text)?;
        let field = span.field.as_deref()?;
        if matches!(field, "tribute" | "bribe" | "fine" | "friendly hail" | "hostile hail")
            && self.config.field_allowed(BlockKind::Planet, field)
        {
            Some(span)
        } else {
            None
        }
    }

    /// Phrase/person word entries: bare quoted lines that are not
    /// proper-name-shaped
    fn decide_word_entry(&self, line: &SourceLine) -> Option<Span> {
        let span = extract::bare_quoted_span(&line.text)?;
        if extract::looks_like_proper_name(&span.text) {
            return None;
        }
        Some(span)
    }

    /// News blocks: the message field, or a quoted multi-word phrase
    /// (single-word quoted entries are names)
    fn decide_news(&self, line: &SourceLine) -> Option<Span> {
        if let Some(span) = extract::quoted_field_span(&line.text) {
            if span.field.as_deref() == Some("message") {
                return Some(span);
            }
            return None;
        }
        let span = extract::bare_quoted_span(&line.text)?;
        if span.text.split_whitespace().count() >= 2 {
            Some(span)
        } else {
            None
        }
    }

    /// Blocks without a configured field list, and lines outside any block
    ///
    /// `name` fields are display names only inside `start` blocks (handled
    /// by the allow-list path); everywhere else they are identifiers.
    fn decide_general(&self, line: &SourceLine, block: Option<&Block>) -> Option<Span> {
        let span = self.classify_span(line, block)?;
        if span.field.as_deref() == Some("name") {
            return None;
        }
        Some(span)
    }

    fn classify_span(&self, line: &SourceLine, block: Option<&Block>) -> Option<Span> {
        match classifier::classify(&line.text, block) {
            Decision::Translatable(span) => Some(span),
            Decision::Never | Decision::Structural => None,
        }
    }

    /// Translate one span; any failure keeps the original text
    async fn translate_span(&self, span: &Span) -> Result<String, TransformError> {
        translate_shielded(
            self.provider,
            &span.text,
            self.source_locale,
            self.target_locale,
        )
        .await
        .map_err(TransformError::from)
    }

    /// Run the shared per-line algorithm over decoded file content
    ///
    /// Returns `None` when cancelled mid-file; the partial buffer is
    /// discarded by the caller and nothing is written. Otherwise the
    /// rewritten content and the per-file report.
    pub async fn transform_content(
        &self,
        content: &str,
        cancel: &AtomicBool,
    ) -> Option<(String, FileReport)> {
        let lines = SourceLine::split_content(content);
        let mut tracker = ScopeTracker::new();
        let mut out = String::with_capacity(content.len());
        let mut report = FileReport::default();

        for line in &lines {
            if cancel.load(Ordering::Relaxed) {
                return None;
            }

            let block = tracker.observe(line);
            let Some(span) = self.decide(line, block.as_ref()) else {
                out.push_str(&line.raw());
                continue;
            };

            if !span.reassembles(&line.text) {
                report.warnings.push(
                    TransformError::ReconstructionMismatch {
                        line_index: line.index,
                    }
                    .to_string(),
                );
                report.lines_skipped += 1;
                out.push_str(&line.raw());
                continue;
            }

            match self.translate_span(&span).await {
                Ok(translated) if translated != span.text => {
                    out.push_str(&span.rebuild(&translated, line.has_newline));
                    report.lines_translated += 1;
                }
                Ok(_) => {
                    // provider echoed the input; not a translation
                    report.lines_skipped += 1;
                    out.push_str(&line.raw());
                }
                Err(e) => {
                    report
                        .warnings
                        .push(format!("line {}: {}", line.index, e));
                    report.lines_skipped += 1;
                    out.push_str(&line.raw());
                }
            }
        }

        Some((out, report))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mt::{MockMode, MockTranslator};
    use std::collections::HashMap;

    async fn run(kind: TransformerKind, mode: MockMode, content: &str) -> (String, FileReport) {
        let config = TranslatorConfig::default();
        let mock = MockTranslator::new(mode);
        let transformer = Transformer::new(kind, &config, &mock, "en", "es");
        transformer
            .transform_content(content, &AtomicBool::new(false))
            .await
            .unwrap()
    }

    // ========== Ship / Outfit ==========

    #[tokio::test]
    async fn test_ship_description_translated_definition_untouched() {
        let content = "ship \"Sparrow\"\n\tsprite \"ship/sparrow\"\n\tdescription \"A sturdy light freighter.\"\n";
        let (out, report) = run(TransformerKind::ShipOutfit, MockMode::Suffix, content).await;
        assert_eq!(report.lines_translated, 1);
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines[0], "ship \"Sparrow\"");
        assert_eq!(lines[1], "\tsprite \"ship/sparrow\"");
        assert_eq!(lines[2], "\tdescription \"A sturdy light freighter._es\"");
    }

    #[tokio::test]
    async fn test_ship_technical_fields_untouched() {
        let content = "ship \"Sparrow\"\n\tmass 50\n\tgun -7 -28\n\tcost 225000\n";
        let (out, report) = run(TransformerKind::ShipOutfit, MockMode::Suffix, content).await;
        assert_eq!(report.lines_translated, 0);
        assert_eq!(out, content);
    }

    #[tokio::test]
    async fn test_outfit_tooltip_allowed_by_config() {
        let content = "outfit \"Hyperdrive\"\n\ttooltip \"Lets you travel between systems.\"\n";
        let (_, report) = run(TransformerKind::ShipOutfit, MockMode::Suffix, content).await;
        assert_eq!(report.lines_translated, 1);
    }

    // ========== Planet ==========

    #[tokio::test]
    async fn test_planet_backtick_description_translated() {
        let content = "planet \"Earth\"\n\tdescription `Humanity's ancient home.`\n";
        let (out, report) = run(TransformerKind::Planet, MockMode::Suffix, content).await;
        assert_eq!(report.lines_translated, 1);
        assert!(out.contains("`Humanity's ancient home._es`"));
    }

    #[tokio::test]
    async fn test_planet_quoted_description_not_translated() {
        // planet descriptions qualify only in backtick form
        let content = "planet \"Earth\"\n\tdescription \"Humanity's ancient home.\"\n";
        let (out, report) = run(TransformerKind::Planet, MockMode::Suffix, content).await;
        assert_eq!(report.lines_translated, 0);
        assert_eq!(out, content);
    }

    #[tokio::test]
    async fn test_unquoted_planet_name_still_gated() {
        // `planet Luna` opens a planet block like the quoted form does, so
        // the backtick-only description rule still applies
        let content = "planet Luna\n\tdescription \"A quoted planet description.\"\n";
        let (out, report) = run(TransformerKind::Planet, MockMode::Suffix, content).await;
        assert_eq!(report.lines_translated, 0);
        assert_eq!(out, content);
    }

    #[tokio::test]
    async fn test_commodity_price_columns_still_gated() {
        let content = "commodity \"Food\" 100 600\n\t\"Ration Packs\"\n";
        let (out, report) = run(TransformerKind::Commodity, MockMode::Suffix, content).await;
        assert_eq!(report.lines_translated, 0);
        assert_eq!(out, content);
    }

    #[tokio::test]
    async fn test_planet_tribute_translated() {
        let content = "planet \"Earth\"\n\ttribute \"You will pay for this insolence!\"\n";
        let (_, report) = run(TransformerKind::Planet, MockMode::Suffix, content).await;
        assert_eq!(report.lines_translated, 1);
    }

    // ========== Commodity ==========

    #[tokio::test]
    async fn test_commodity_bare_id_never_translated() {
        let content = "trade\ncommodity \"Food\"\n\t\"Food\"\n\t\"Clothing\"\n";
        let (out, report) = run(TransformerKind::Commodity, MockMode::Suffix, content).await;
        assert_eq!(report.lines_translated, 0);
        assert_eq!(out, content);
    }

    // ========== General: Phrase / News / Help ==========

    #[tokio::test]
    async fn test_phrase_proper_names_skipped_words_translated() {
        let content = "phrase \"greetings\"\n\tword\n\t\t\"James Watt\"\n\t\t\"welcome aboard\"\n";
        let (out, report) = run(TransformerKind::General, MockMode::Suffix, content).await;
        assert_eq!(report.lines_translated, 1);
        assert!(out.contains("\"James Watt\""));
        assert!(out.contains("\"welcome aboard_es\""));
    }

    #[tokio::test]
    async fn test_news_single_word_name_skipped() {
        let content = "news \"port gossip\"\n\tmessage \"Did you hear about the pirates?\"\n\t\"Dockworker\"\n";
        let (out, report) = run(TransformerKind::General, MockMode::Suffix, content).await;
        assert_eq!(report.lines_translated, 1);
        assert!(out.contains("\"Dockworker\""));
        assert!(out.contains("pirates?_es"));
    }

    #[tokio::test]
    async fn test_help_identifier_never_translated() {
        let content = "help \"tutorial_basics\"\n\t`Press J to jump between systems.`\n";
        let (out, report) = run(TransformerKind::General, MockMode::Suffix, content).await;
        assert_eq!(report.lines_translated, 1);
        assert!(out.contains("help \"tutorial_basics\""));
        assert!(out.contains("`Press J to jump between systems._es`"));
    }

    #[tokio::test]
    async fn test_mission_name_field_kept() {
        let content = "mission \"Cargo Run\"\n\tname \"Cargo Run\"\n";
        let (out, report) = run(TransformerKind::General, MockMode::Suffix, content).await;
        assert_eq!(report.lines_translated, 0);
        assert_eq!(out, content);
    }

    #[tokio::test]
    async fn test_start_name_field_translated() {
        let content = "start\n\tname \"New Horizons\"\n\tdescription \"Your story begins here.\"\n";
        let (_, report) = run(TransformerKind::General, MockMode::Suffix, content).await;
        assert_eq!(report.lines_translated, 2);
    }

    #[tokio::test]
    async fn test_mission_dialogue_and_interface_captions() {
        let content = "mission \"First Contact\"\n\tdescription \"Carry a message to <planet>.\"\n\t`The alien ship drifts closer.`\n";
        let (out, report) = run(TransformerKind::General, MockMode::Suffix, content).await;
        assert_eq!(report.lines_translated, 2);
        assert!(out.contains("<planet>"));
    }

    #[tokio::test]
    async fn test_interface_label_and_button() {
        let content = "interface \"main menu\"\n\tlabel \"New Pilot\"\n\tbutton q \"_Quit\"\n\tpos 100 50\n";
        let (out, report) = run(TransformerKind::General, MockMode::Suffix, content).await;
        assert_eq!(report.lines_translated, 2);
        assert!(out.contains("\tpos 100 50"));
        assert!(out.contains("\"New Pilot_es\""));
        // hotkey marker survives around the translated caption
        assert!(out.contains("\"_Quit_es\""));
    }

    // ========== Failure Semantics ==========

    #[tokio::test]
    async fn test_failing_provider_leaves_file_byte_identical() {
        let content = "ship \"Sparrow\"\n\tdescription \"A sturdy light freighter.\"\n\n\t`Some dialogue here.`\n";
        let (out, report) = run(
            TransformerKind::General,
            MockMode::Error("API unavailable".to_string()),
            content,
        )
        .await;
        assert_eq!(report.lines_translated, 0);
        assert_eq!(out, content);
        assert!(!report.warnings.is_empty());
    }

    #[tokio::test]
    async fn test_identity_provider_is_idempotent() {
        let content = "ship \"Sparrow\"\n\tdescription \"A sturdy light freighter.\"\n";
        let (first, report) = run(TransformerKind::ShipOutfit, MockMode::NoOp, content).await;
        assert_eq!(report.lines_translated, 0);
        assert_eq!(first, content);
        let (second, report) = run(TransformerKind::ShipOutfit, MockMode::NoOp, &first).await;
        assert_eq!(report.lines_translated, 0);
        assert_eq!(second, first);
    }

    #[tokio::test]
    async fn test_second_pass_over_translated_output_stable() {
        let mut map = HashMap::new();
        map.insert(
            ("A sturdy light freighter.".to_string(), "es".to_string()),
            "Un carguero ligero y resistente.".to_string(),
        );
        map.insert(
            (
                "Un carguero ligero y resistente.".to_string(),
                "es".to_string(),
            ),
            "Un carguero ligero y resistente.".to_string(),
        );
        let content = "ship \"Sparrow\"\n\tdescription \"A sturdy light freighter.\"\n";
        let (first, report) = run(
            TransformerKind::ShipOutfit,
            MockMode::Mappings(map.clone()),
            content,
        )
        .await;
        assert_eq!(report.lines_translated, 1);
        let (second, report) = run(TransformerKind::ShipOutfit, MockMode::Mappings(map), &first).await;
        assert_eq!(report.lines_translated, 0);
        assert_eq!(second, first);
    }

    // ========== Cancellation ==========

    #[tokio::test]
    async fn test_cancel_discards_buffer() {
        let config = TranslatorConfig::default();
        let mock = MockTranslator::new(MockMode::Suffix);
        let transformer =
            Transformer::new(TransformerKind::General, &config, &mock, "en", "es");
        let cancel = AtomicBool::new(true);
        let result = transformer
            .transform_content("\t`Some dialogue.`\n", &cancel)
            .await;
        assert!(result.is_none());
    }

    // ========== Terminator Preservation ==========

    #[tokio::test]
    async fn test_missing_final_newline_preserved() {
        let content = "\t`Final line without newline.`";
        let (out, report) = run(TransformerKind::General, MockMode::Suffix, content).await;
        assert_eq!(report.lines_translated, 1);
        assert!(!out.ends_with('\n'));
        assert_eq!(out, "\t`Final line without newline._es`");
    }
}
