//! Mock machine translator for testing
//!
//! Deterministic, API-free provider for exercising the full pipeline without
//! network access. The `Suffix` mode is the workhorse: it appends the target
//! locale so tests can tell translated lines from untouched ones, while
//! leaving shield placeholders intact.

use crate::mt::error::MtResult;
use crate::mt::translator::MachineTranslator;
use async_trait::async_trait;
use std::collections::HashMap;

/// Mock translation modes for different test scenarios
#[derive(Debug, Clone)]
pub enum MockMode {
    /// Append locale suffix: "hello" → "hello_es"
    Suffix,

    /// Predefined mappings: (text, target_locale) → translation,
    /// falling back to suffix behavior for unknown inputs
    Mappings(HashMap<(String, String), String>),

    /// Lower-case the whole output, placeholders included — simulates the
    /// case-folding real providers apply to injected tokens
    Lowercase,

    /// Always fail with the given message
    Error(String),

    /// Identity: return input unchanged
    NoOp,
}

/// Mock translator simulating various provider behaviors
#[derive(Debug, Clone)]
pub struct MockTranslator {
    mode: MockMode,
}

impl MockTranslator {
    pub fn new(mode: MockMode) -> Self {
        Self { mode }
    }

    fn apply_translation(&self, text: &str, _source: &str, target: &str) -> MtResult<String> {
        use crate::mt::error::MtError;

        match &self.mode {
            MockMode::Suffix => Ok(format!("{}_{}", text, target)),
            MockMode::Mappings(map) => {
                let key = (text.to_string(), target.to_string());
                Ok(map
                    .get(&key)
                    .cloned()
                    .unwrap_or_else(|| format!("{}_{}", text, target)))
            }
            MockMode::Lowercase => Ok(text.to_lowercase()),
            MockMode::Error(msg) => Err(MtError::TranslationError(msg.clone())),
            MockMode::NoOp => Ok(text.to_string()),
        }
    }
}

#[async_trait]
impl MachineTranslator for MockTranslator {
    async fn translate(
        &self,
        text: &str,
        source_locale: &str,
        target_locale: &str,
    ) -> MtResult<String> {
        self.apply_translation(text, source_locale, target_locale)
    }

    fn provider_name(&self) -> &str {
        "Mock Translator"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_suffix_translation() {
        let mock = MockTranslator::new(MockMode::Suffix);
        let result = mock.translate("hello", "en", "es").await.unwrap();
        assert_eq!(result, "hello_es");
    }

    #[tokio::test]
    async fn test_suffix_preserves_placeholders() {
        let mock = MockTranslator::new(MockMode::Suffix);
        let result = mock
            .translate("go to __GAMEVAR_0__ now", "en", "es")
            .await
            .unwrap();
        assert!(result.contains("__GAMEVAR_0__"));
    }

    #[tokio::test]
    async fn test_mapping_translation() {
        let mut map = HashMap::new();
        map.insert(
            ("hello".to_string(), "es".to_string()),
            "hola".to_string(),
        );
        let mock = MockTranslator::new(MockMode::Mappings(map));
        assert_eq!(mock.translate("hello", "en", "es").await.unwrap(), "hola");
    }

    #[tokio::test]
    async fn test_mapping_fallback_to_suffix() {
        let mock = MockTranslator::new(MockMode::Mappings(HashMap::new()));
        let result = mock.translate("unknown", "en", "es").await.unwrap();
        assert_eq!(result, "unknown_es");
    }

    #[tokio::test]
    async fn test_lowercase_mangles_placeholders() {
        let mock = MockTranslator::new(MockMode::Lowercase);
        let result = mock
            .translate("Visit __GAMEVAR_0__ Today", "en", "es")
            .await
            .unwrap();
        assert_eq!(result, "visit __gamevar_0__ today");
    }

    #[tokio::test]
    async fn test_error_mode() {
        let mock = MockTranslator::new(MockMode::Error("API unavailable".to_string()));
        let result = mock.translate("hello", "en", "es").await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_noop_returns_input() {
        let mock = MockTranslator::new(MockMode::NoOp);
        let text = "A sturdy light freighter.";
        assert_eq!(mock.translate(text, "en", "es").await.unwrap(), text);
    }

    #[test]
    fn test_provider_name() {
        let mock = MockTranslator::new(MockMode::Suffix);
        assert_eq!(mock.provider_name(), "Mock Translator");
    }
}
