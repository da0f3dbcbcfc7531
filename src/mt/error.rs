/// Error types for the machine translation side of the pipeline
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MtError {
    /// Provider configuration problem (missing/empty API key, bad endpoint)
    ConfigError(String),
    /// Network failure while talking to the provider
    NetworkError(String),
    /// Invalid language code passed to the provider
    InvalidLocale(String),
    /// The provider accepted the request but translation failed
    TranslationError(String),
}

impl std::fmt::Display for MtError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MtError::ConfigError(msg) => write!(f, "Configuration error: {}", msg),
            MtError::NetworkError(msg) => write!(f, "Network error: {}", msg),
            MtError::InvalidLocale(msg) => write!(f, "Invalid locale: {}", msg),
            MtError::TranslationError(msg) => write!(f, "Translation error: {}", msg),
        }
    }
}

impl std::error::Error for MtError {}

impl From<reqwest::Error> for MtError {
    fn from(err: reqwest::Error) -> Self {
        MtError::NetworkError(err.to_string())
    }
}

/// Result type for MT operations
pub type MtResult<T> = Result<T, MtError>;
