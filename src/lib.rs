//! Selective machine translation for line-oriented game data files
//!
//! The engine rewrites only the human-readable prose inside a keyword- and
//! indentation-structured data language, leaving every structural token
//! byte-identical so the output remains valid engine input. The pipeline per
//! file: block-scope tracking drives a line classifier, the span extractor
//! isolates the translatable substring, the shield codec protects game
//! tokens around the external provider call, and the output assembler
//! mirrors the file into a plugin tree only when something actually changed.

pub mod classifier;
pub mod config;
pub mod dispatch;
pub mod error;
pub mod extract;
pub mod line;
pub mod mt;
pub mod output;
pub mod scope;
pub mod transform;
pub mod worker;

pub use config::TranslatorConfig;
pub use dispatch::{Dispatcher, Route, TransformerKind};
pub use error::{TransformError, TransformResult};
pub use line::{Decision, SourceLine, Span, SpanType};
pub use mt::{GoogleTranslateProvider, MachineTranslator, MockMode, MockTranslator};
pub use scope::{Block, BlockKind, ScopeTracker};
pub use transform::{FileReport, Transformer};
pub use worker::{RunSummary, Worker, WorkerEvent, WorkerOptions};
