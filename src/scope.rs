//! Block-scope tracking: which top-level definition a line belongs to
//!
//! A file is a sequence of definition blocks opened by a top-level keyword
//! (optionally with a quoted name) and closed by a blank line, by the next
//! top-level keyword at an indent no deeper than the opener, or by end of
//! file. Comment lines never close a block. The tracker is a per-file state
//! machine `Outside ⇄ InBlock(kind)` driven one line at a time.

use crate::line::SourceLine;
use regex::Regex;
use std::sync::LazyLock;

/// Top-level definition keywords the tracker recognizes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BlockKind {
    Ship,
    Outfit,
    Effect,
    Minable,
    Planet,
    Commodity,
    Government,
    Fleet,
    Start,
    Phrase,
    Person,
    Help,
    News,
    Interface,
    Mission,
    Conversation,
    Event,
    /// Recognized opener outside the named set; fields pass through
    Other,
}

impl BlockKind {
    /// Keyword as it appears at the start of an opening line
    pub fn keyword(&self) -> &'static str {
        match self {
            BlockKind::Ship => "ship",
            BlockKind::Outfit => "outfit",
            BlockKind::Effect => "effect",
            BlockKind::Minable => "minable",
            BlockKind::Planet => "planet",
            BlockKind::Commodity => "commodity",
            BlockKind::Government => "government",
            BlockKind::Fleet => "fleet",
            BlockKind::Start => "start",
            BlockKind::Phrase => "phrase",
            BlockKind::Person => "person",
            BlockKind::Help => "help",
            BlockKind::News => "news",
            BlockKind::Interface => "interface",
            BlockKind::Mission => "mission",
            BlockKind::Conversation => "conversation",
            BlockKind::Event => "event",
            BlockKind::Other => "",
        }
    }

    fn from_keyword(word: &str) -> Option<BlockKind> {
        match word {
            "ship" => Some(BlockKind::Ship),
            "outfit" => Some(BlockKind::Outfit),
            "effect" => Some(BlockKind::Effect),
            "minable" => Some(BlockKind::Minable),
            "planet" => Some(BlockKind::Planet),
            "commodity" => Some(BlockKind::Commodity),
            "government" => Some(BlockKind::Government),
            "fleet" => Some(BlockKind::Fleet),
            "start" => Some(BlockKind::Start),
            "phrase" => Some(BlockKind::Phrase),
            "person" => Some(BlockKind::Person),
            "help" => Some(BlockKind::Help),
            "news" => Some(BlockKind::News),
            "interface" => Some(BlockKind::Interface),
            "mission" => Some(BlockKind::Mission),
            "conversation" => Some(BlockKind::Conversation),
            "event" => Some(BlockKind::Event),
            _ => None,
        }
    }
}

/// One open definition scope
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Block {
    pub kind: BlockKind,
    /// Quoted name from the opening line; empty when the opener had none
    pub name: String,
    /// Indent of the opening line
    pub indent: usize,
}

static OPENER_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"^([a-z]+)(?:\s+(?:"([^"]*)"|([^"\s]+)))?(?:\s+.*)?$"#)
        .expect("hard-coded pattern")
});

/// Parse a candidate block opener: `keyword`, `keyword "name"`, or
/// `keyword name`, with trailing tokens ignored
///
/// Data files use both name forms (`planet Luna`, `planet "New Boston"`)
/// and some openers carry extra columns (`commodity "Food" 100 600`).
/// Only lines whose keyword is a recognized top-level kind open a block;
/// other keyword-shaped lines are plain structure.
pub fn parse_opener(line: &SourceLine) -> Option<Block> {
    let indent = line.indent();
    let trimmed = line.text.trim();
    let caps = OPENER_RE.captures(trimmed)?;
    let kind = BlockKind::from_keyword(&caps[1])?;
    let name = caps
        .get(2)
        .or_else(|| caps.get(3))
        .map(|m| m.as_str().to_string())
        .unwrap_or_default();
    Some(Block { kind, name, indent })
}

/// Per-file state machine: `Outside ⇄ InBlock`
#[derive(Debug, Default)]
pub struct ScopeTracker {
    current: Option<Block>,
}

impl ScopeTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// The block the upcoming line belongs to, if any
    pub fn current(&self) -> Option<&Block> {
        self.current.as_ref()
    }

    /// Advance the machine past one line and return the block context that
    /// applies to that line
    ///
    /// A blank line closes the current block. A new top-level opener at an
    /// indent no deeper than the current block's opener replaces it.
    /// Comments leave the state untouched.
    pub fn observe(&mut self, line: &SourceLine) -> Option<Block> {
        let trimmed = line.text.trim();

        if trimmed.starts_with('#') {
            return self.current.clone();
        }

        if trimmed.is_empty() {
            self.current = None;
            return None;
        }

        if let Some(block) = parse_opener(line) {
            let replaces = match &self.current {
                Some(open) => block.indent <= open.indent,
                None => true,
            };
            if replaces {
                self.current = Some(block);
                return self.current.clone();
            }
        }

        self.current.clone()
    }
}
