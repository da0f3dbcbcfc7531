//! Injected translator configuration
//!
//! Which folders and root files are scanned, which filenames are refused,
//! and which fields each block kind may translate. Constructed explicitly
//! and passed into the dispatcher and worker; nothing here is global state.
//! The defaults mirror the stock game data layout and are conservative:
//! only folders whose content is known to be prose-heavy are included, and
//! technical files are excluded by name or fragment.

use crate::scope::BlockKind;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::path::Path;

/// Selection and policy configuration, serializable to JSON
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TranslatorConfig {
    /// Data subfolders scanned for translatable files
    pub included_folders: Vec<String>,
    /// Files directly under the data root that are always processed
    pub included_root_files: Vec<String>,
    /// Filenames never processed, regardless of folder
    pub excluded_files: Vec<String>,
    /// Filename fragments that exclude a file wherever it appears
    pub excluded_fragments: Vec<String>,
    /// Filename fragments that mark a faction-folder file as safe prose
    pub safe_file_fragments: Vec<String>,
    /// Per-kind field allow-lists, keyed by the block keyword
    pub field_allow_lists: HashMap<String, HashSet<String>>,
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

fn string_set(items: &[&str]) -> HashSet<String> {
    items.iter().map(|s| s.to_string()).collect()
}

impl Default for TranslatorConfig {
    fn default() -> Self {
        let mut field_allow_lists = HashMap::new();
        let descriptive = [
            "description",
            "plural",
            "noun",
            "explanation",
            "tooltip",
            "help",
        ];
        for kind in ["ship", "outfit", "effect", "minable"] {
            field_allow_lists.insert(kind.to_string(), string_set(&descriptive));
        }
        field_allow_lists.insert(
            "planet".to_string(),
            string_set(&[
                "description",
                "spaceport",
                "tribute",
                "bribe",
                "fine",
                "friendly hail",
                "hostile hail",
            ]),
        );
        field_allow_lists.insert(
            "government".to_string(),
            string_set(&["description", "friendly hail", "hostile hail", "bribe", "fine"]),
        );
        field_allow_lists.insert("fleet".to_string(), string_set(&["description"]));
        field_allow_lists.insert("start".to_string(), string_set(&["name", "description"]));
        field_allow_lists.insert("news".to_string(), string_set(&["message"]));

        Self {
            included_folders: strings(&[
                "human", "hai", "korath", "wanderer", "remnant", "pug", "quarg", "coalition",
                "_ui",
            ]),
            included_root_files: strings(&["map planets.txt", "dialog phrases.txt"]),
            excluded_files: strings(&[
                "fleets.txt",
                "governments.txt",
                "systems.txt",
                "planets.txt",
                "map systems.txt",
                "variants.txt",
                "persons.txt",
                "effects.txt",
                "hazards.txt",
                "formations.txt",
                "stars.txt",
                "series.txt",
                "derelicts.txt",
                "wormhole.txt",
                "globals.txt",
                "gamerules.txt",
                "categories.txt",
            ]),
            excluded_fragments: strings(&["derelict", "variant", "formation", "hazard"]),
            safe_file_fragments: strings(&[
                "mission",
                "conversation",
                "dialog",
                "hail",
                "news",
                "event",
                "campaign",
                "intro",
                "job",
                "names",
                "sales",
                "ships",
                "outfits",
                "engines",
                "weapons",
                "power",
            ]),
            field_allow_lists,
        }
    }
}

impl TranslatorConfig {
    /// Load from a JSON file, as persisted by a front end
    pub fn load(path: &Path) -> std::io::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        serde_json::from_str(&content).map_err(std::io::Error::other)
    }

    /// Persist to JSON, pretty-printed for hand editing
    pub fn save(&self, path: &Path) -> std::io::Result<()> {
        let json = serde_json::to_string_pretty(self).map_err(std::io::Error::other)?;
        std::fs::write(path, json)
    }

    /// Is `field` translatable inside a block of `kind`?
    pub fn field_allowed(&self, kind: BlockKind, field: &str) -> bool {
        self.field_allow_lists
            .get(kind.keyword())
            .is_some_and(|fields| fields.contains(field))
    }

    /// Filename-level refusal: exact name or fragment match
    pub fn file_excluded(&self, filename: &str) -> bool {
        let lower = filename.to_lowercase();
        self.excluded_files.iter().any(|f| f == &lower)
            || self.excluded_fragments.iter().any(|f| lower.contains(f))
    }

    /// Faction-folder safety check: a file qualifies when a safe fragment
    /// appears in its name and no exclusion applies
    pub fn file_safe(&self, filename: &str) -> bool {
        if self.file_excluded(filename) {
            return false;
        }
        let lower = filename.to_lowercase();
        self.safe_file_fragments.iter().any(|f| lower.contains(f))
    }
}
