//! Crate-wide error taxonomy
//!
//! Everything here is "skip, keep original, log" territory except `Setup`:
//! decode failures fall back, provider failures keep the source text,
//! reconstruction mismatches keep the line, and a write failure only loses
//! that one file. Only an unreadable source root aborts a run.

use crate::mt::MtError;
use std::fmt;

#[derive(Debug)]
pub enum TransformError {
    /// Source bytes could not be decoded even with fallbacks
    Decode(String),
    /// The external provider failed for one span
    Provider(MtError),
    /// A matched extraction pattern failed to reassemble the source line
    /// byte for byte; signals an unhandled DSL edge case
    ReconstructionMismatch {
        line_index: usize,
    },
    /// Destination file could not be written
    Write(std::io::Error),
    /// Unrecoverable run setup failure (unreadable source root)
    Setup(String),
}

impl fmt::Display for TransformError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransformError::Decode(msg) => write!(f, "Decode error: {}", msg),
            TransformError::Provider(e) => write!(f, "Provider error: {}", e),
            TransformError::ReconstructionMismatch { line_index } => {
                write!(
                    f,
                    "Reconstruction mismatch at line {}: extracted span does not reassemble the source line",
                    line_index
                )
            }
            TransformError::Write(e) => write!(f, "Write error: {}", e),
            TransformError::Setup(msg) => write!(f, "Setup error: {}", msg),
        }
    }
}

impl std::error::Error for TransformError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            TransformError::Provider(e) => Some(e),
            TransformError::Write(e) => Some(e),
            _ => None,
        }
    }
}

impl From<MtError> for TransformError {
    fn from(err: MtError) -> Self {
        TransformError::Provider(err)
    }
}

impl From<std::io::Error> for TransformError {
    fn from(err: std::io::Error) -> Self {
        TransformError::Write(err)
    }
}

pub type TransformResult<T> = Result<T, TransformError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_messages() {
        let err = TransformError::Decode("bad byte at 14".to_string());
        assert!(err.to_string().contains("Decode error"));

        let err = TransformError::ReconstructionMismatch { line_index: 42 };
        assert!(err.to_string().contains("line 42"));
    }

    #[test]
    fn test_from_mt_error() {
        let err: TransformError = MtError::TranslationError("boom".to_string()).into();
        assert!(matches!(err, TransformError::Provider(_)));
    }

    #[test]
    fn test_source_chain() {
        use std::error::Error;
        let err = TransformError::Provider(MtError::TranslationError("boom".to_string()));
        assert!(err.source().is_some());
        let err = TransformError::Setup("unreadable".to_string());
        assert!(err.source().is_none());
    }
}
