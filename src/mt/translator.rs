//! Machine translation trait and locale utilities
//!
//! Defines the `MachineTranslator` trait for provider abstraction, so the
//! transformation pipeline never couples to a specific MT backend
//! (Google Translate, mock, etc.).

use crate::mt::error::{MtError, MtResult};
use async_trait::async_trait;

/// Generic trait for machine translation providers
///
/// Implementations handle the actual translation work, whether through an
/// API (Google Translate) or deterministic logic (Mock). All methods are
/// async to support I/O-bound operations like network requests.
///
/// The core never retries a failed call; resilience lives one layer up,
/// where a failed field keeps its original text.
#[async_trait]
pub trait MachineTranslator: Send + Sync {
    /// Translate a single text string from source to target locale
    ///
    /// # Arguments
    ///
    /// * `text` - The text to translate
    /// * `source_locale` - Source language code (e.g., "en")
    /// * `target_locale` - Target language code (e.g., "es", "fr")
    ///
    /// # Returns
    ///
    /// * `Ok(String)` - The translated text
    /// * `Err(MtError)` - If translation fails
    async fn translate(
        &self,
        text: &str,
        source_locale: &str,
        target_locale: &str,
    ) -> MtResult<String>;

    /// Get the name of this translation provider
    ///
    /// Used in log lines to identify which provider handled a translation.
    fn provider_name(&self) -> &str;
}

/// Normalize a locale code by stripping region information
///
/// Converts BCP 47 codes to base language codes:
/// - `en-US` → `en`
/// - `zh-Hans` → `zh`
/// - `es` → `es` (unchanged)
pub fn normalize_locale(locale: &str) -> String {
    locale.split('-').next().unwrap_or(locale).to_lowercase()
}

/// Validate that a locale code is in acceptable format
///
/// Checks that the code is non-empty and contains only alphanumeric
/// characters, hyphens, and underscores.
pub fn validate_locale(locale: &str) -> MtResult<()> {
    if locale.is_empty() {
        return Err(MtError::InvalidLocale("Locale code is empty".to_string()));
    }

    if !locale
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
    {
        return Err(MtError::InvalidLocale(format!(
            "Invalid characters in locale code: {}",
            locale
        )));
    }

    Ok(())
}
