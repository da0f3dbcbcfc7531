/// Machine Translation Module
///
/// Everything that touches the external translation provider lives here:
///
/// 1. **MachineTranslator trait** - provider abstraction (Google Translate,
///    mock) so the pipeline never couples to one backend
/// 2. **Shield codec** - protects game tokens (tag variables, quantities,
///    coordinates, proper nouns, file references) around provider calls and
///    restores them afterwards, surviving provider case-folding
/// 3. **Providers** - Google Translate API v2 over reqwest, plus a
///    deterministic mock for tests
///
/// The rest of the crate only ever calls [`shield::translate_shielded`],
/// which performs the full protect → translate → restore → normalize round
/// trip for one span.
pub mod error;
pub mod google_translate;
pub mod mock;
pub mod shield;
pub mod translator;

pub use error::{MtError, MtResult};
pub use google_translate::GoogleTranslateProvider;
pub use mock::{MockMode, MockTranslator};
pub use shield::{PreservedToken, ShieldMap, TokenCategory, protect, restore, translate_shielded};
pub use translator::MachineTranslator;
