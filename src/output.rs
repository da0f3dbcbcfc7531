//! File decoding and output assembly
//!
//! Reading honors a BOM when present, then tries strict UTF-8, then
//! Windows-1252, then lossy UTF-8 as the last resort. Writing is the
//! mirror-tree side: the destination file is created only when at least one
//! line was translated, parent directories included, and always as UTF-8
//! with a byte-order mark regardless of what the source decoded from.

use crate::error::{TransformError, TransformResult};
use encoding_rs::{Encoding, UTF_8, WINDOWS_1252};
use std::path::Path;

/// Decode raw file bytes, with fallbacks
///
/// The detected encoding is used only for decoding; output encoding is
/// fixed by [`write_translated`].
pub fn decode_bytes(bytes: &[u8]) -> String {
    if let Some((encoding, bom_len)) = Encoding::for_bom(bytes) {
        let (text, _, _) = encoding.decode(&bytes[bom_len..]);
        return text.into_owned();
    }

    if let Ok(text) = std::str::from_utf8(bytes) {
        return text.to_string();
    }

    let (text, _, had_errors) = WINDOWS_1252.decode(bytes);
    if !had_errors {
        return text.into_owned();
    }

    let (text, _, _) = UTF_8.decode(bytes);
    text.into_owned()
}

/// Read and decode one source file
pub fn read_source(path: &Path) -> TransformResult<String> {
    let bytes = std::fs::read(path)
        .map_err(|e| TransformError::Decode(format!("{}: {}", path.display(), e)))?;
    Ok(decode_bytes(&bytes))
}

/// Write translated content as UTF-8 with a BOM, creating the destination
/// directory tree
pub fn write_translated(path: &Path, content: &str) -> TransformResult<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let mut data = String::with_capacity(content.len() + 1);
    data.push('\u{FEFF}');
    data.push_str(content);
    std::fs::write(path, data)?;
    Ok(())
}
