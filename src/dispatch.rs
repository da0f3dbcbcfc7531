//! File-kind dispatcher: filename → transformer routing
//!
//! One ordered lookup table instead of name-by-name branching. A new
//! top-level DSL keyword or file family is a table entry, never a new branch
//! in the processing loop. The dispatcher owns no policy of its own beyond
//! the table; exclusions come from the injected [`TranslatorConfig`].

use crate::config::TranslatorConfig;
use crate::scope::BlockKind;

/// Which per-kind transformer handles a file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransformerKind {
    /// ships/outfits/engines/weapons/power: descriptive fields only
    ShipOutfit,
    /// map planets: backtick descriptions plus hail/tribute prose
    Planet,
    /// commodities: bare quoted lines are ids; only incidental backtick
    /// prose qualifies
    Commodity,
    /// everything else: missions, conversations, interface, phrases, news
    General,
}

impl TransformerKind {
    /// Block kinds this transformer may open scopes for
    pub fn allowed_kinds(&self) -> &'static [BlockKind] {
        match self {
            TransformerKind::ShipOutfit => &[
                BlockKind::Ship,
                BlockKind::Outfit,
                BlockKind::Effect,
                BlockKind::Minable,
            ],
            TransformerKind::Planet => &[BlockKind::Planet],
            TransformerKind::Commodity => &[BlockKind::Commodity],
            TransformerKind::General => &[
                BlockKind::Ship,
                BlockKind::Outfit,
                BlockKind::Effect,
                BlockKind::Minable,
                BlockKind::Planet,
                BlockKind::Government,
                BlockKind::Fleet,
                BlockKind::Start,
                BlockKind::Phrase,
                BlockKind::Person,
                BlockKind::Help,
                BlockKind::News,
                BlockKind::Interface,
                BlockKind::Mission,
                BlockKind::Conversation,
                BlockKind::Event,
            ],
        }
    }
}

/// Routing decision for one filename
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    Excluded,
    Transform(TransformerKind),
}

/// Filename families that get a special transformer, checked in order
/// before falling through to the general one
const SPECIAL_FILES: &[(&str, TransformerKind)] = &[
    ("commodities.txt", TransformerKind::Commodity),
    ("map planets.txt", TransformerKind::Planet),
    ("ships.txt", TransformerKind::ShipOutfit),
    ("outfits.txt", TransformerKind::ShipOutfit),
    ("engines.txt", TransformerKind::ShipOutfit),
    ("weapons.txt", TransformerKind::ShipOutfit),
    ("power.txt", TransformerKind::ShipOutfit),
];

/// Filename router built over an injected configuration
#[derive(Debug, Clone)]
pub struct Dispatcher {
    config: TranslatorConfig,
}

impl Dispatcher {
    pub fn new(config: TranslatorConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &TranslatorConfig {
        &self.config
    }

    /// Route a filename: config exclusions first, then the special table,
    /// then the general transformer
    pub fn route(&self, filename: &str) -> Route {
        let lower = filename.to_lowercase();

        // commodities and map planets are config-excluded for the general
        // path but carried by their special transformers, so the table is
        // consulted before the exclusion list
        for (name, kind) in SPECIAL_FILES {
            if lower == *name {
                return Route::Transform(*kind);
            }
        }

        if self.config.file_excluded(&lower) {
            return Route::Excluded;
        }

        Route::Transform(TransformerKind::General)
    }
}
